//! Field-level reading and writing of the plaintext record.

use crate::error::{LicenseError, LicenseResult};
use chrono::{DateTime, Utc};

/// Sequential reader over a decrypted record. Each read names the field it
/// is reading so truncation errors say where the record ended.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn u8(&mut self, field: &'static str) -> LicenseResult<u8> {
        let b = *self.buf.get(self.pos).ok_or(LicenseError::Truncated(field))?;
        self.pos += 1;
        Ok(b)
    }

    pub(crate) fn take(&mut self, len: usize, field: &'static str) -> LicenseResult<&'a [u8]> {
        let end = self.pos + len;
        let bytes = self.buf.get(self.pos..end).ok_or(LicenseError::Truncated(field))?;
        self.pos = end;
        Ok(bytes)
    }

    /// Reads bytes up to a NUL terminator and consumes the terminator.
    pub(crate) fn cstr(&mut self, field: &'static str) -> LicenseResult<&'a [u8]> {
        let rest = &self.buf[self.pos..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(LicenseError::Truncated(field))?;
        self.pos += len + 1;
        Ok(&rest[..len])
    }

    /// Reads a NUL-terminated string that must be UTF-8.
    pub(crate) fn string(&mut self, field: &'static str) -> LicenseResult<String> {
        let bytes = self.cstr(field)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| LicenseError::InvalidField(format!("{field} is not valid UTF-8")))
    }

    /// Reads a little-endian `u32` of Unix seconds.
    pub(crate) fn date(&mut self, field: &'static str) -> LicenseResult<DateTime<Utc>> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.take(4, field)?);
        let secs = u32::from_le_bytes(bytes);
        DateTime::from_timestamp(i64::from(secs), 0)
            .ok_or_else(|| LicenseError::InvalidField(format!("{field} out of range")))
    }

    /// Reads a length byte followed by that many bytes.
    pub(crate) fn prefixed(&mut self, field: &'static str) -> LicenseResult<&'a [u8]> {
        let len = self.u8(field)?;
        self.take(usize::from(len), field)
    }

    pub(crate) fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }
}

/// Builds the plaintext record field by field.
#[derive(Default)]
pub(crate) struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn u8(&mut self, b: u8) {
        self.buf.push(b);
    }

    pub(crate) fn cstr(&mut self, field: &'static str, s: &str) -> LicenseResult<()> {
        if s.as_bytes().contains(&0) {
            return Err(LicenseError::InvalidField(format!("{field} contains a NUL byte")));
        }
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
        Ok(())
    }

    pub(crate) fn date(&mut self, field: &'static str, date: &DateTime<Utc>) -> LicenseResult<()> {
        let secs = u32::try_from(date.timestamp()).map_err(|_| {
            LicenseError::InvalidField(format!(
                "{field} {date} is outside 1970-01-01T00:00:00Z..=2106-02-07T06:28:15Z"
            ))
        })?;
        self.buf.extend_from_slice(&secs.to_le_bytes());
        Ok(())
    }

    pub(crate) fn prefixed(&mut self, field: &'static str, bytes: &[u8]) -> LicenseResult<()> {
        let len = u8::try_from(bytes.len()).map_err(|_| {
            LicenseError::InvalidField(format!("{field} is {} bytes, maximum is 255", bytes.len()))
        })?;
        self.buf.push(len);
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
