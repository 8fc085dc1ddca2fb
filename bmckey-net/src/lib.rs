//! Hardware address model for bmckey.
//!
//! This crate defines the link-layer types every license scheme is bound to:
//! - `MacAddress`: a 6-byte IEEE 802 MAC-48 address with strict text parsing
//! - `Oui`: a 3-byte vendor prefix
//! - `VENDOR_OUIS`: the prefixes registered to the BMC vendor, which bound
//!   the brute-force search space

mod mac;
mod oui;

pub use mac::{MacAddress, MAC_LEN};
pub use oui::{Oui, OUI_LEN, VENDOR_OUIS};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing hardware addresses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid MAC address: {0}")]
    InvalidMac(String),

    #[error("invalid OUI: {0}")]
    InvalidOui(String),
}
