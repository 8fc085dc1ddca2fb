//! Organizationally Unique Identifiers.

use crate::{Error, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of bytes in an OUI.
pub const OUI_LEN: usize = 3;

/// MAC address blocks assigned to the BMC vendor.
///
/// Every brute-force search walks the full device range of each prefix, so
/// adding an entry here widens what can be recovered.
pub const VENDOR_OUIS: [Oui; 7] = [
    Oui::new([0x00, 0x25, 0x90]),
    Oui::new([0x00, 0x30, 0x48]),
    Oui::new([0x0c, 0xc4, 0x7a]),
    Oui::new([0x3c, 0xec, 0xef]),
    Oui::new([0x7c, 0xc2, 0x55]),
    Oui::new([0x90, 0x5a, 0x08]),
    Oui::new([0xac, 0x1f, 0x6b]),
];

/// A 3-byte vendor prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Oui([u8; OUI_LEN]);

impl Oui {
    #[must_use]
    pub const fn new(octets: [u8; OUI_LEN]) -> Self {
        Self(octets)
    }

    #[must_use]
    pub const fn octets(&self) -> [u8; OUI_LEN] {
        self.0
    }

    /// Parses `aabbcc`, `aa:bb:cc` or `aa-bb-cc`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOui`] carrying the rejected input.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidOui(s.to_string());
        let digits: String = match s.len() {
            6 => s.to_string(),
            8 => {
                let b = s.as_bytes();
                let sep = b[2];
                if !(sep == b':' || sep == b'-') || b[5] != sep {
                    return Err(invalid());
                }
                s.split(sep as char).collect()
            }
            _ => return Err(invalid()),
        };

        let mut out = [0u8; OUI_LEN];
        hex::decode_to_slice(digits, &mut out).map_err(|_| invalid())?;
        Ok(Self(out))
    }

    /// Returns true if `self` is one of [`VENDOR_OUIS`].
    #[must_use]
    pub fn is_vendor(&self) -> bool {
        VENDOR_OUIS.contains(self)
    }
}

impl fmt::Display for Oui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}:{:02x}:{:02x}", self.0[0], self.0[1], self.0[2])
    }
}

impl FromStr for Oui {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Oui {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
