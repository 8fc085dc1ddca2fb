//! Software identifiers carried by binary product keys.

use crate::error::{LicenseError, LicenseResult};
use serde::Serialize;

/// A license type as stored in binary product keys.
///
/// The ID byte is written into the header and again into the encrypted
/// block, followed by the NUL-terminated display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SoftwareIdentifier {
    /// Vendor SKU. The three oldest identifiers were never sold under one.
    pub sku: Option<&'static str>,
    /// Name stored inside the encrypted block.
    pub display_name: &'static str,
    pub id: u8,
}

impl SoftwareIdentifier {
    const fn new(sku: Option<&'static str>, display_name: &'static str, id: u8) -> Self {
        Self {
            sku,
            display_name,
            id,
        }
    }
}

pub const RESERVED: SoftwareIdentifier = SoftwareIdentifier::new(None, "Reserved", 0);
pub const SSM: SoftwareIdentifier = SoftwareIdentifier::new(None, "SSM", 1);
pub const SD5: SoftwareIdentifier = SoftwareIdentifier::new(None, "SD5", 2);
pub const SUM: SoftwareIdentifier = SoftwareIdentifier::new(Some("SFT-SUM-LIC"), "SUM", 3);
pub const SPM: SoftwareIdentifier = SoftwareIdentifier::new(Some("SFT-SPM-LIC"), "SPM", 4);
pub const SCM: SoftwareIdentifier = SoftwareIdentifier::new(Some("SFT-SCM-LIC"), "SCM", 5);
pub const ALL: SoftwareIdentifier = SoftwareIdentifier::new(Some("SFT-DCMS-SINGLE"), "ALL", 6);
pub const SITE: SoftwareIdentifier = SoftwareIdentifier::new(Some("SFT-DCMS-SITE"), "SITE", 7);
pub const CALL_HOME: SoftwareIdentifier =
    SoftwareIdentifier::new(Some("SFT-DCMS-CALL-HOME"), "DCMS-CALL-HOME", 8);
pub const SVC: SoftwareIdentifier =
    SoftwareIdentifier::new(Some("SFT-DCMS-SVC-KEY"), "SFT-DCMS-SVC-KEY", 9);
pub const SDDC: SoftwareIdentifier =
    SoftwareIdentifier::new(Some("SFT-SDDC-SINGLE"), "SFT-SDDC-SINGLE", 210);

/// Every known binary software identifier, in ID order.
pub static REGISTRY: [SoftwareIdentifier; 11] =
    [RESERVED, SSM, SD5, SUM, SPM, SCM, ALL, SITE, CALL_HOME, SVC, SDDC];

/// Returns every registered identifier.
#[must_use]
pub fn list() -> &'static [SoftwareIdentifier] {
    &REGISTRY
}

/// Looks up an identifier by SKU. Identifiers without a SKU never match.
///
/// # Errors
///
/// Returns [`LicenseError::UnknownSoftwareIdentifier`] if no identifier matches.
pub fn by_sku(sku: &str) -> LicenseResult<&'static SoftwareIdentifier> {
    REGISTRY
        .iter()
        .find(|s| s.sku == Some(sku))
        .ok_or_else(|| LicenseError::UnknownSoftwareIdentifier(format!("SKU '{sku}'")))
}

/// Looks up an identifier by display name.
///
/// # Errors
///
/// Returns [`LicenseError::UnknownSoftwareIdentifier`] if no identifier matches.
pub fn by_display_name(name: &str) -> LicenseResult<&'static SoftwareIdentifier> {
    REGISTRY
        .iter()
        .find(|s| s.display_name == name)
        .ok_or_else(|| LicenseError::UnknownSoftwareIdentifier(format!("display name '{name}'")))
}

/// Looks up an identifier by ID byte.
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
