//! Encoder for the binary header log.
//!
//! The production corpus is produced by an external converter; these helpers
//! exist so fixtures and tests can build logs byte-for-byte identical to it.

use std::io::Write;

use super::{HeaderSet, LogFormatError, MAX_FIELD_LEN};

fn checked_len(field: &'static str, bytes: &[u8]) -> Result<u16, LogFormatError> {
    if bytes.len() > MAX_FIELD_LEN {
        return Err(LogFormatError::FieldTooLong {
            field,
            len: bytes.len(),
        });
    }
    Ok(bytes.len() as u16)
}

/// Write one header record.
///
/// # Errors
///
/// Fails if the name is empty, either field exceeds 65535 bytes, or the
/// writer fails.
pub fn write_record<W: Write>(out: &mut W, name: &[u8], value: &[u8]) -> Result<(), LogFormatError> {
    if name.is_empty() {
        return Err(LogFormatError::EmptyName);
    }
    let name_len = checked_len("name", name)?;
    let value_len = checked_len("value", value)?;

    out.write_all(&name_len.to_be_bytes())?;
    out.write_all(&value_len.to_be_bytes())?;
    out.write_all(name)?;
    out.write_all(value)?;
    Ok(())
}

/// Write the sentinel record that closes a header set.
pub fn write_sentinel<W: Write>(out: &mut W) -> Result<(), LogFormatError> {
    out.write_all(&[0, 0, 0, 0])?;
    Ok(())
}

/// Write every header of `set` followed by a sentinel.
pub fn write_header_set<W: Write>(out: &mut W, set: &HeaderSet) -> Result<(), LogFormatError> {
    for (name, value) in set.iter() {
        write_record(out, name, value)?;
    }
    write_sentinel(out)
}

/// Encode `set` into a fresh buffer.
pub fn encode_header_set(set: &HeaderSet) -> Result<Vec<u8>, LogFormatError> {
    let mut out = Vec::new();
    write_header_set(&mut out, set)?;
    Ok(out)
}
