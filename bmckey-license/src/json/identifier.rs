//! Software identifiers carried by JSON licenses.

use crate::error::{LicenseError, LicenseResult};
use serde::Serialize;

/// A license type as named in JSON licenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SoftwareIdentifier {
    /// SKU used in vendor documentation and as `LicenseName`.
    pub sku: &'static str,
    /// Numeric identifier, carried as `LicenseID`.
    pub id: u8,
}

pub const OOB: SoftwareIdentifier = SoftwareIdentifier { sku: "SFT-OOB-LIC", id: 1 };
pub const DCMS: SoftwareIdentifier = SoftwareIdentifier { sku: "SFT-DCMS-SINGLE", id: 2 };
pub const SPM: SoftwareIdentifier = SoftwareIdentifier { sku: "SFT-SPM-LIC", id: 3 };
pub const SVC: SoftwareIdentifier = SoftwareIdentifier { sku: "SFT-DCMS-SVC-KEY", id: 4 };
pub const SDDC: SoftwareIdentifier = SoftwareIdentifier { sku: "SFT-SDDC-SINGLE", id: 5 };

/// Every known JSON software identifier.
pub static REGISTRY: [SoftwareIdentifier; 5] = [OOB, DCMS, SPM, SVC, SDDC];

/// Returns every registered identifier.
#[must_use]
pub fn list() -> &'static [SoftwareIdentifier] {
    &REGISTRY
}

/// Looks up an identifier by SKU.
///
/// # Errors
///
/// Returns [`LicenseError::UnknownSoftwareIdentifier`] if no identifier matches.
pub fn by_sku(sku: &str) -> LicenseResult<&'static SoftwareIdentifier> {
    REGISTRY
        .iter()
        .find(|s| s.sku == sku)
        .ok_or_else(|| LicenseError::UnknownSoftwareIdentifier(format!("SKU '{sku}'")))
}

/// Looks up an identifier by numeric ID.
///
/// # Errors
///
/// Returns [`LicenseError::UnknownSoftwareIdentifier`] if no identifier matches.
pub fn by_id(id: u8) -> LicenseResult<&'static SoftwareIdentifier> {
    REGISTRY
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| LicenseError::UnknownSoftwareIdentifier(format!("ID 0x{id:02X}")))
}
