//! BMC product key schemes.
//!
//! Three generations of hardware-bound product keys, each tied to the MAC
//! address of the BMC it activates:
//! - [`oob`]: HMAC-SHA1 digest of the MAC, rendered as dashed hex
//! - [`json`]: RSA/SHA-256 signed JSON license, verification only
//! - [`binary`]: AES-128-CBC encrypted record with an additive checksum
//!
//! Every scheme also exposes a `brute_force_mac` helper that recovers the
//! bound address by driving its verification predicate through
//! [`bmckey_search::search`].
//!
//! # Example
//!
//! ```
//! use bmckey_license::oob::OobProductKey;
//! use bmckey_net::MacAddress;
//!
//! let mac = MacAddress::parse("3c:ec:ef:12:34:56").unwrap();
//! let key = OobProductKey::encode(&mac);
//! assert_eq!(key.to_string(), "CE27-F641-9B04-6B24-5D04-5D32");
//! ```

pub mod binary;
mod error;
pub mod json;
pub mod oob;

pub use error::{LicenseError, LicenseResult};

pub use bmckey_net::MacAddress;
pub use bmckey_search::SearchOptions;
