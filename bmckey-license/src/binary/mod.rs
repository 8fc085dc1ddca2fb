//! Binary (non-JSON) product keys.
//!
//! A key is the base64 encoding of a 16-byte cleartext header followed by an
//! AES-128-CBC encrypted block:
//!
//! ```text
//! header (16 bytes, cleartext)
//!   format version (0x00) | software ID | 14 reserved zero bytes
//! encrypted block (239 bytes before PKCS#7 padding)
//!   format version | software ID | display name\0 | software version\0
//!   | invoice number\0 | creation date (u32 LE) | expiration date (u32 LE)
//!   | property length | property | secret length | secret data
//!   | checksum | zero padding
//! ```
//!
//! The block key and IV come from `MD5(MAC ‖ "ejmb")`, so only the BMC the
//! key was issued for can decrypt it. Secret data is a further digest of the
//! MAC and the key's identifier, version, expiration and property. The
//! checksum is the wrapping byte sum of the header and every block field up
//! to and including the secret data.

mod cipher;
pub mod identifier;
mod record;

pub use identifier::SoftwareIdentifier;

use crate::error::{LicenseError, LicenseResult};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bmckey_net::MacAddress;
use bmckey_search::SearchOptions;
use chrono::{DateTime, Timelike, Utc};
use cipher::KeyIv;
use record::{Reader, Writer};
use serde::{Serialize, Serializer};
use tracing::debug;

/// The only format version in use.
pub const FORMAT_VERSION: u8 = 0x00;

/// Length of the cleartext header.
pub const HEADER_LEN: usize = 16;

/// Length of the encrypted block before PKCS#7 padding.
pub const ENCRYPTED_BLOCK_LEN: usize = 239;

/// Maximum length of the plaintext record: header plus encrypted block.
pub const MAX_RECORD_LEN: usize = HEADER_LEN + ENCRYPTED_BLOCK_LEN;

/// A binary product key.
///
/// The public fields describe the license; [`ProductKey::secret_data`] and
/// [`ProductKey::checksum`] are derived from them and a MAC address when the
/// key is sealed or encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductKey {
    pub format_version: u8,
    pub software_identifier: SoftwareIdentifier,
    pub software_version: String,
    pub invoice_number: String,
    pub creation_date: DateTime<Utc>,
    /// The Unix epoch means the key never expires.
    pub expiration_date: DateTime<Utc>,
    /// Opaque property bytes. Their meaning is not known.
    #[serde(serialize_with = "serialize_hex")]
    pub property: Vec<u8>,
    #[serde(serialize_with = "serialize_ascii")]
    secret_data: Vec<u8>,
    checksum: u8,
}

fn serialize_hex<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&hex::encode_upper(bytes))
}

fn serialize_ascii<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&String::from_utf8_lossy(bytes))
}

impl Default for ProductKey {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductKey {
    /// Creates a `Reserved` key with version and invoice `none`, created now
    /// and never expiring.
    #[must_use]
    pub fn new() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            software_identifier: identifier::RESERVED,
            software_version: "none".to_string(),
            invoice_number: "none".to_string(),
            creation_date: whole_seconds(Utc::now()),
            expiration_date: DateTime::from_timestamp(0, 0).unwrap_or_default(),
            property: Vec::new(),
            secret_data: Vec::new(),
            checksum: 0,
        }
    }

    /// Secret data derived for the MAC this key was sealed for; empty until
    /// sealed.
    #[must_use]
    pub fn secret_data(&self) -> &[u8] {
        &self.secret_data
    }

    #[must_use]
    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    #[must_use]
    pub fn never_expires(&self) -> bool {
        self.expiration_date.timestamp() == 0
    }

    /// Returns a copy with dates truncated to whole seconds and the secret
    /// data and checksum computed for `mac`.
    ///
    /// # Errors
    ///
    /// Returns an error if a field cannot be represented in the record or
    /// the record would exceed [`MAX_RECORD_LEN`].
    pub fn sealed(&self, mac: &MacAddress) -> LicenseResult<Self> {
        let mut key = self.clone();
        key.creation_date = whole_seconds(key.creation_date);
        key.expiration_date = whole_seconds(key.expiration_date);
        key.secret_data = cipher::secret_data(mac, &key.secret_keying_material());

        let block = key.block_fields()?;
        let len = HEADER_LEN + block.len() + 1;
        if len > MAX_RECORD_LEN {
            return Err(LicenseError::RecordTooLong(len));
        }

        key.checksum = key.compute_checksum(&block);
        Ok(key)
    }

    /// Serializes the sealed key to its plaintext record: the header followed
    /// by the unencrypted, unpadded block. Always [`MAX_RECORD_LEN`] bytes.
    ///
    /// # Errors
    ///
    /// See [`ProductKey::sealed`].
    pub fn to_plaintext(&self, mac: &MacAddress) -> LicenseResult<Vec<u8>> {
        let key = self.sealed(mac)?;

        let mut record = Vec::with_capacity(MAX_RECORD_LEN);
        record.extend_from_slice(&key.header());
        record.extend_from_slice(&key.block_fields()?);
        record.push(key.checksum);
        record.resize(MAX_RECORD_LEN, 0);
        Ok(record)
    }

    /// Parses a plaintext record, checking every structural invariant.
    ///
    /// Checks run in record order and stop at the first failure: header
    /// version, reserved bytes, block version and ID against the header,
    /// display name against the registry, the checksum, then padding.
    ///
    /// # Errors
    ///
    /// Returns the error for the first check that fails.
    pub fn from_plaintext(record: &[u8]) -> LicenseResult<Self> {
        if record.len() > MAX_RECORD_LEN {
            return Err(LicenseError::RecordTooLong(record.len()));
        }

        let mut r = Reader::new(record);

        let header_version = r.u8("header format version")?;
        if header_version != FORMAT_VERSION {
            return Err(LicenseError::UnsupportedFormatVersion(header_version));
        }
        let header_id = r.u8("header software identifier")?;
        while r.position() < HEADER_LEN {
            let offset = r.position();
            let value = r.u8("reserved header bytes")?;
            if value != 0 {
                return Err(LicenseError::ReservedByteSet { offset, value });
            }
        }

        let block_version = r.u8("format version")?;
        if block_version != header_version {
            return Err(LicenseError::FormatVersionMismatch {
                header: header_version,
                block: block_version,
            });
        }
        let block_id = r.u8("software identifier")?;
        if block_id != header_id {
            return Err(LicenseError::SoftwareIdentifierMismatch {
                header: header_id,
                block: block_id,
            });
        }

        let name = r.cstr("software identifier name")?;
        let software_identifier = *identifier::by_id(block_id)?;
        if name != software_identifier.display_name.as_bytes() {
            return Err(LicenseError::DisplayNameMismatch {
                id: block_id,
                found: String::from_utf8_lossy(name).into_owned(),
                expected: software_identifier.display_name,
            });
        }

        let mut key = Self {
            format_version: block_version,
            software_identifier,
            software_version: r.string("software version")?,
            invoice_number: r.string("invoice number")?,
            creation_date: r.date("creation date")?,
            expiration_date: r.date("expiration date")?,
            property: r.prefixed("property")?.to_vec(),
            secret_data: r.prefixed("secret data")?.to_vec(),
            checksum: 0,
        };

        let stored = r.u8("checksum")?;
        let computed = key.compute_checksum(&key.block_fields()?);
        if stored != computed {
            return Err(LicenseError::ChecksumMismatch { stored, computed });
        }
        key.checksum = stored;

        if let Some(&b) = r.rest().iter().find(|&&b| b != 0) {
            return Err(LicenseError::NonZeroPadding(b));
        }

        Ok(key)
    }

    /// Seals the key for `mac`, encrypts it and returns the base64 text.
    ///
    /// # Errors
    ///
    /// See [`ProductKey::sealed`].
    pub fn encode(&self, mac: &MacAddress) -> LicenseResult<String> {
        let record = self.to_plaintext(mac)?;
        let (header, block) = record.split_at(HEADER_LEN);

        let mut raw = header.to_vec();
        raw.extend_from_slice(&cipher::encrypt(block, &KeyIv::for_block(mac)));
        Ok(BASE64.encode(raw))
    }

    /// Decodes and validates a product key issued for `mac`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not base64, the block does not decrypt
    /// under `mac`, or any structural check fails.
    pub fn decode(encoded: &str, mac: &MacAddress) -> LicenseResult<Self> {
        let raw = decode_base64(encoded)?;
        Self::decrypt(&raw, mac).inspect_err(|e| debug!("Rejected product key for {mac}: {e}"))
    }

    fn decrypt(raw: &[u8], mac: &MacAddress) -> LicenseResult<Self> {
        if raw.len() <= HEADER_LEN {
            return Err(LicenseError::InvalidKeyFormat(format!(
                "product key is {} bytes, too short for a header and encrypted block",
                raw.len()
            )));
        }

        let (header, ciphertext) = raw.split_at(HEADER_LEN);
        let block = cipher::decrypt(ciphertext, &KeyIv::for_block(mac))?;

        let mut record = Vec::with_capacity(HEADER_LEN + block.len());
        record.extend_from_slice(header);
        record.extend_from_slice(&block);
        Self::from_plaintext(&record)
    }

    fn header(&self) -> [u8; HEADER_LEN] {
        let mut header = [0u8; HEADER_LEN];
        header[0] = self.format_version;
        header[1] = self.software_identifier.id;
        header
    }

    /// Encrypted block fields from the format version through the secret
    /// data.
    fn block_fields(&self) -> LicenseResult<Vec<u8>> {
        let mut w = Writer::with_capacity(ENCRYPTED_BLOCK_LEN);
        w.u8(self.format_version);
        w.u8(self.software_identifier.id);
        w.cstr("software identifier name", self.software_identifier.display_name)?;
        w.cstr("software version", &self.software_version)?;
        w.cstr("invoice number", &self.invoice_number)?;
        w.date("creation date", &self.creation_date)?;
        w.date("expiration date", &self.expiration_date)?;
        w.prefixed("property", &self.property)?;
        w.prefixed("secret data", &self.secret_data)?;
        Ok(w.into_bytes())
    }

    fn compute_checksum(&self, block_fields: &[u8]) -> u8 {
        self.header()
            .iter()
            .chain(block_fields)
            .fold(0u8, |sum, &b| sum.wrapping_add(b))
    }

    fn secret_keying_material(&self) -> String {
        format!(
            "{:02X}{}{}{}",
            self.software_identifier.id,
            self.software_version,
            self.expiration_date.timestamp(),
            hex::encode_upper(&self.property)
        )
    }
}

fn whole_seconds(date: DateTime<Utc>) -> DateTime<Utc> {
    date.with_nanosecond(0).unwrap_or(date)
}

fn decode_base64(encoded: &str) -> LicenseResult<Vec<u8>> {
    BASE64
        .decode(encoded.trim())
        .map_err(|e| LicenseError::InvalidKeyFormat(format!("invalid base64: {e}")))
}

/// Recovers the MAC address a binary product key was issued for.
///
/// Each candidate first decrypts a single block and compares its version and
/// ID bytes with the cleartext header; only survivors are fully decoded.
///
/// # Errors
///
/// Returns an error if `encoded` is not base64 or is too short, or
/// [`LicenseError::Search`] if no address in `options.blocks` decodes it.
pub fn brute_force_mac(encoded: &str, options: &SearchOptions) -> LicenseResult<MacAddress> {
    let raw = decode_base64(encoded)?;
    if raw.len() < HEADER_LEN + cipher::BLOCK_SIZE {
        return Err(LicenseError::InvalidKeyFormat(format!(
            "product key is {} bytes, too short for a header and encrypted block",
            raw.len()
        )));
    }

    Ok(bmckey_search::search(options, move |mac| {
        let k = KeyIv::for_block(mac);
        match cipher::decrypt_first_block(&raw[HEADER_LEN..], &k) {
            Some(first) if first[..2] == raw[..2] => ProductKey::decrypt(&raw, mac).is_ok(),
            _ => false,
        }
    })?)
}
