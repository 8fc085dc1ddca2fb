//! Error types for the product key schemes.

use thiserror::Error;

/// Product key errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Product key text is malformed (length, characters, base64, JSON shape).
    #[error("invalid product key format: {0}")]
    InvalidKeyFormat(String),

    /// A MAC address could not be parsed.
    #[error(transparent)]
    Mac(#[from] bmckey_net::Error),

    /// JSON license signature did not verify. Deliberately carries no detail.
    #[error("license verification failed")]
    VerificationFailed,

    /// Software identifier is not in the registry.
    #[error("software identifier {0} not found in the registry")]
    UnknownSoftwareIdentifier(String),

    /// A field cannot be represented in the binary record.
    #[error("invalid product key field: {0}")]
    InvalidField(String),

    /// The binary record does not fit in its fixed size.
    #[error("product key record is {0} bytes, maximum is {max}", max = crate::binary::MAX_RECORD_LEN)]
    RecordTooLong(usize),

    /// The encrypted block could not be decrypted.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// The record ended before a field was complete.
    #[error("product key record truncated while reading {0}")]
    Truncated(&'static str),

    /// Header format version is not supported.
    #[error("format version must be 0x00, actual version is 0x{0:02X}")]
    UnsupportedFormatVersion(u8),

    /// Header and encrypted block disagree on the format version.
    #[error(
        "format versions do not match: header has 0x{header:02X}, encrypted block has 0x{block:02X}"
    )]
    FormatVersionMismatch { header: u8, block: u8 },

    /// Header and encrypted block disagree on the software identifier.
    #[error(
        "software identifiers do not match: header has 0x{header:02X}, encrypted block has 0x{block:02X}"
    )]
    SoftwareIdentifierMismatch { header: u8, block: u8 },

    /// Display name stored in the key does not belong to its identifier.
    #[error(
        "software identifier name '{found}' does not match '{expected}' registered for 0x{id:02X}"
    )]
    DisplayNameMismatch {
        id: u8,
        found: String,
        expected: &'static str,
    },

    /// A reserved header byte is set.
    #[error("reserved header byte {offset} is 0x{value:02X}, must be 0x00")]
    ReservedByteSet { offset: usize, value: u8 },

    /// Stored checksum does not match the record contents.
    #[error("checksum stored in product key is 0x{stored:02X}, calculated checksum is 0x{computed:02X}")]
    ChecksumMismatch { stored: u8, computed: u8 },

    /// Bytes after the checksum are not zero.
    #[error("padding bytes must be 0x00, encountered 0x{0:02X}")]
    NonZeroPadding(u8),

    /// Brute-force search failed.
    #[error(transparent)]
    Search(#[from] bmckey_search::SearchError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for product key operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
