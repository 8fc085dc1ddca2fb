//! Signed JSON licenses.
//!
//! Licenses use the format:
//!
//! ```text
//! {"ProductKey":{"Node":{"LicenseID":"1","LicenseName":"SFT-OOB-LIC","CreateDate":"20200921"},
//!                "Signature":"<base64>"}}
//! ```
//!
//! The signature is RSA PKCS#1 v1.5 over
//! `SHA-256(MAC ‖ LicenseID ‖ LicenseName ‖ CreateDate)`, where MAC is the
//! uppercase hex address without separators. Only verification is possible;
//! the signing key is not available.

pub mod identifier;

pub use identifier::SoftwareIdentifier;

use crate::error::{LicenseError, LicenseResult};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bmckey_net::MacAddress;
use bmckey_search::SearchOptions;
use once_cell::sync::OnceCell;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Public key the vendor signs JSON licenses with (PKCS#1, PEM).
pub const LICENSE_SIGNING_PUBLIC_KEY: &str = "-----BEGIN RSA PUBLIC KEY-----
MIIBCAKCAQEAvDb4MxWw/FTi8pscP6S2YAl/3gmVOj/StG0lu3PdCSmdpzmzbOU9
KBS3t0yPZ0ynUQj/qXOwaVLvBJ+uCE0pGIRWkzBersVUzmXXN8Dza5yOzlLIdsVn
amUrKcRHgC+otRE/gnCxIiioacy9TkA96otbAvztCl1j1W8oCixazpfwZrayy12y
CcOyquZr3prngLCgOWa9e9cLSekKuvYXPKPC0CogLz0ueg+y+gcWGHGwbMtERLGf
WYDrXD1mdlV0EL4A5H4v9bqzn0yHe9dIb7+tdMHiN+qLjMzcVSzwfXu7Abk7rPOz
wBY6gMvfhfaOTj8aU5JFQ3DEBdTPOwgtSwIBAw==
-----END RSA PUBLIC KEY-----
";

static VENDOR_KEY: OnceCell<RsaPublicKey> = OnceCell::new();

/// Returns the embedded vendor public key, parsed on first use.
pub fn vendor_public_key() -> LicenseResult<&'static RsaPublicKey> {
    VENDOR_KEY.get_or_try_init(|| {
        RsaPublicKey::from_pkcs1_pem(LICENSE_SIGNING_PUBLIC_KEY).map_err(|e| {
            LicenseError::InvalidKeyFormat(format!("embedded public key: {e}"))
        })
    })
}

#[derive(Serialize, Deserialize)]
struct Document {
    #[serde(rename = "ProductKey")]
    product_key: ProductKeyNode,
}

#[derive(Serialize, Deserialize)]
struct ProductKeyNode {
    #[serde(rename = "Node")]
    node: Node,
    #[serde(rename = "Signature")]
    signature: String,
}

#[derive(Serialize, Deserialize)]
struct Node {
    #[serde(rename = "LicenseID")]
    license_id: String,
    #[serde(rename = "LicenseName")]
    license_name: String,
    #[serde(rename = "CreateDate")]
    create_date: String,
}

/// A parsed JSON license. Parsing does not verify the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct License {
    license_id: String,
    license_name: String,
    create_date: String,
    signature: Vec<u8>,
}

impl License {
    /// Creates a license from its parts.
    ///
    /// # Errors
    ///
    /// Returns an error if `create_date` is not eight ASCII digits.
    pub fn new(
        license_id: impl Into<String>,
        license_name: impl Into<String>,
        create_date: impl Into<String>,
        signature: Vec<u8>,
    ) -> LicenseResult<Self> {
        let create_date = create_date.into();
        if create_date.len() != 8 || !create_date.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LicenseError::InvalidKeyFormat(format!(
                "CreateDate must be YYYYMMDD, got '{create_date}'"
            )));
        }

        Ok(Self {
            license_id: license_id.into(),
            license_name: license_name.into(),
            create_date,
            signature,
        })
    }

    /// Parses a license document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, a field is missing, the
    /// signature is not base64, or the creation date is not `YYYYMMDD`.
    pub fn parse(json: &str) -> LicenseResult<Self> {
        let doc: Document = serde_json::from_str(json.trim())?;
        let ProductKeyNode { node, signature } = doc.product_key;

        let signature = BASE64.decode(signature.trim()).map_err(|e| {
            LicenseError::InvalidKeyFormat(format!("invalid signature base64: {e}"))
        })?;

        Self::new(node.license_id, node.license_name, node.create_date, signature)
    }

    /// Serializes the license back to its wire document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> LicenseResult<String> {
        let doc = Document {
            product_key: ProductKeyNode {
                node: Node {
                    license_id: self.license_id.clone(),
                    license_name: self.license_name.clone(),
                    create_date: self.create_date.clone(),
                },
                signature: BASE64.encode(&self.signature),
            },
        };
        Ok(serde_json::to_string(&doc)?)
    }

    #[must_use]
    pub fn license_id(&self) -> &str {
        &self.license_id
    }

    #[must_use]
    pub fn license_name(&self) -> &str {
        &self.license_name
    }

    /// Creation date as `YYYYMMDD`.
    #[must_use]
    pub fn create_date(&self) -> &str {
        &self.create_date
    }

    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Resolves `LicenseName` against the JSON registry.
    pub fn software_identifier(&self) -> LicenseResult<&'static SoftwareIdentifier> {
        identifier::by_sku(&self.license_name)
    }

    /// The message the vendor signed for `mac`.
    #[must_use]
    pub fn signed_message(&self, mac: &MacAddress) -> Vec<u8> {
        let mut message = mac.to_upper_hex().into_bytes();
        message.extend_from_slice(self.license_id.as_bytes());
        message.extend_from_slice(self.license_name.as_bytes());
        message.extend_from_slice(self.create_date.as_bytes());
        message
    }

    /// Verifies the signature for `mac` against the embedded vendor key.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::VerificationFailed`] if the signature does not
    /// match.
    pub fn verify(&self, mac: &MacAddress) -> LicenseResult<()> {
        self.verify_with_key(mac, vendor_public_key()?)
    }

    /// Verifies the signature for `mac` against an explicit public key.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::VerificationFailed`] if the signature does not
    /// match. The cause is never reported.
    pub fn verify_with_key(&self, mac: &MacAddress, key: &RsaPublicKey) -> LicenseResult<()> {
        let hashed = Sha256::digest(self.signed_message(mac));
        key.verify(Pkcs1v15Sign::new::<Sha256>(), &hashed, &self.signature)
            .map_err(|_| LicenseError::VerificationFailed)
    }
}

/// Recovers the MAC address a license was signed for, using the vendor key.
///
/// # Errors
///
/// Returns [`LicenseError::Search`] if no address in `options.blocks`
/// verifies.
pub fn brute_force_mac(license: &License, options: &SearchOptions) -> LicenseResult<MacAddress> {
    brute_force_mac_with_key(license, vendor_public_key()?, options)
}

/// Recovers the MAC address a license was signed for, using `key`.
///
/// # Errors
///
/// Returns [`LicenseError::Search`] if no address in `options.blocks`
/// verifies.
pub fn brute_force_mac_with_key(
    license: &License,
    key: &RsaPublicKey,
    options: &SearchOptions,
) -> LicenseResult<MacAddress> {
    let license = license.clone();
    let key = key.clone();
    Ok(bmckey_search::search(options, move |mac| {
        license.verify_with_key(mac, &key).is_ok()
    })?)
}
