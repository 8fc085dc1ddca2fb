//! IEEE 802 MAC-48 hardware addresses.
//!
//! Accepted text layouts:
//!
//! ```text
//! 3cecef123456
//! 3c:ec:ef:12:34:56
//! 3c-ec-ef-12-34-56
//! 3cec.ef12.3456
//! ```
//!
//! The canonical form is lowercase hex without separators.

use crate::oui::{Oui, OUI_LEN};
use crate::{Error, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of bytes in a MAC-48 address.
pub const MAC_LEN: usize = 6;

/// A 6-byte hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MacAddress([u8; MAC_LEN]);

impl MacAddress {
    /// Creates an address from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; MAC_LEN]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a vendor prefix and the three device bytes.
    #[must_use]
    pub const fn from_parts(oui: Oui, device: [u8; 3]) -> Self {
        let p = oui.octets();
        Self([p[0], p[1], p[2], device[0], device[1], device[2]])
    }

    /// Parses an address in one of the four supported layouts.
    ///
    /// Any deviation in length, separator placement, separator consistency
    /// or digit validity is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMac`] carrying the rejected input.
    pub fn parse(s: &str) -> Result<Self> {
        let b = s.as_bytes();
        let invalid = || Error::InvalidMac(s.to_string());
        let mut out = [0u8; MAC_LEN];

        match b.len() {
            12 => {
                for (i, pair) in b.chunks_exact(2).enumerate() {
                    out[i] = hex_pair(pair).ok_or_else(invalid)?;
                }
            }
            17 if b[2] == b':' || b[2] == b'-' => {
                let sep = b[2];
                for (i, byte) in out.iter_mut().enumerate() {
                    let at = i * 3;
                    if i < MAC_LEN - 1 && b[at + 2] != sep {
                        return Err(invalid());
                    }
                    *byte = hex_pair(&b[at..at + 2]).ok_or_else(invalid)?;
                }
            }
            14 if b[4] == b'.' => {
                for group in 0..3 {
                    let at = group * 5;
                    if group < 2 && b[at + 4] != b'.' {
                        return Err(invalid());
                    }
                    out[group * 2] = hex_pair(&b[at..at + 2]).ok_or_else(invalid)?;
                    out[group * 2 + 1] = hex_pair(&b[at + 2..at + 4]).ok_or_else(invalid)?;
                }
            }
            _ => return Err(invalid()),
        }

        Ok(Self(out))
    }

    /// Returns the raw address bytes.
    #[must_use]
    pub const fn octets(&self) -> [u8; MAC_LEN] {
        self.0
    }

    /// Returns the vendor prefix of this address.
    #[must_use]
    pub const fn oui(&self) -> Oui {
        Oui::new([self.0[0], self.0[1], self.0[2]])
    }

    /// Returns the three bytes following the vendor prefix.
    #[must_use]
    pub fn device_bytes(&self) -> [u8; MAC_LEN - OUI_LEN] {
        [self.0[3], self.0[4], self.0[5]]
    }

    /// Uppercase hex without separators, as used in keying material.
    #[must_use]
    pub fn to_upper_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

fn hex_pair(pair: &[u8]) -> Option<u8> {
    let mut byte = [0u8; 1];
    hex::decode_to_slice(pair, &mut byte).ok()?;
    Some(byte[0])
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for MacAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<[u8; MAC_LEN]> for MacAddress {
    fn from(bytes: [u8; MAC_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
