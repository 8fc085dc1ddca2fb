//! OOB product keys.
//!
//! The oldest scheme: the key is the first 12 bytes of
//! `HMAC-SHA1(OOB_HMAC_KEY, mac)`, printed as six dash-separated groups of
//! four uppercase hex digits. There is nothing to decode; a key is checked by
//! encoding the candidate MAC again and comparing.

use crate::error::{LicenseError, LicenseResult};
use bmckey_net::MacAddress;
use bmckey_search::SearchOptions;
use hmac::{Hmac, Mac};
use once_cell::sync::Lazy;
use sha1::Sha1;
use std::fmt;
use std::str::FromStr;

type HmacSha1 = Hmac<Sha1>;

/// Length of an OOB product key in bytes.
pub const OOB_KEY_LEN: usize = 12;

/// HMAC key for SFT-OOB-LIC product keys.
pub const OOB_HMAC_KEY: [u8; 12] = [
    0x85, 0x44, 0xe3, 0xb4, 0x7e, 0xca, 0x58, 0xf9, 0x58, 0x30, 0x43, 0xf8,
];

/// A second HMAC key shipped alongside [`OOB_HMAC_KEY`] by the vendor tools.
/// Nothing is known to use it.
pub const HSDC_HMAC_KEY: [u8; 12] = [
    0x39, 0xcb, 0x2a, 0x1a, 0x3d, 0x74, 0x8f, 0xf1, 0xde, 0xe4, 0x6b, 0x87,
];

// Keyed once and cloned per MAC; brute force encodes millions of candidates.
static OOB_MAC: Lazy<HmacSha1> = Lazy::new(|| {
    <HmacSha1 as Mac>::new_from_slice(&OOB_HMAC_KEY).expect("HMAC can take key of any size")
});

/// An OOB product key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OobProductKey([u8; OOB_KEY_LEN]);

impl OobProductKey {
    /// Derives the product key for a BMC MAC address.
    #[must_use]
    pub fn encode(mac: &MacAddress) -> Self {
        let mut hmac = OOB_MAC.clone();
        hmac.update(&mac.octets());
        let digest = hmac.finalize().into_bytes();

        let mut key = [0u8; OOB_KEY_LEN];
        key.copy_from_slice(&digest[..OOB_KEY_LEN]);
        Self(key)
    }

    /// Parses a product key, ignoring case and any non-hex characters such
    /// as dashes.
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly 24 hex digits remain.
    pub fn parse(key: &str) -> LicenseResult<Self> {
        let digits: String = key.chars().filter(char::is_ascii_hexdigit).collect();
        if digits.len() != OOB_KEY_LEN * 2 {
            return Err(LicenseError::InvalidKeyFormat(format!(
                "product key without separators must have a length of {}, got {}",
                OOB_KEY_LEN * 2,
                digits.len()
            )));
        }

        let mut bytes = [0u8; OOB_KEY_LEN];
        hex::decode_to_slice(&digits, &mut bytes)
            .map_err(|e| LicenseError::InvalidKeyFormat(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Creates a key from its raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; OOB_KEY_LEN]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; OOB_KEY_LEN] {
        &self.0
    }

    /// Returns true if this key was issued for `mac`.
    #[must_use]
    pub fn matches(&self, mac: &MacAddress) -> bool {
        Self::encode(mac) == *self
    }
}

impl fmt::Display for OobProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.0.chunks(2).enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{:02X}{:02X}", group[0], group[1])?;
        }
        Ok(())
    }
}

impl FromStr for OobProductKey {
    type Err = LicenseError;

    fn from_str(s: &str) -> LicenseResult<Self> {
        Self::parse(s)
    }
}

/// Recovers the MAC address an OOB product key was issued for.
///
/// # Errors
///
/// Returns [`LicenseError::Search`] wrapping `NotFound` if no address in
/// `options.blocks` produces `key`.
pub fn brute_force_mac(key: &OobProductKey, options: &SearchOptions) -> LicenseResult<MacAddress> {
    let key = *key;
    Ok(bmckey_search::search(options, move |mac| key.matches(mac))?)
}
