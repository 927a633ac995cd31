//! Binary header log format
//!
//! Captured responses are stored as a flat sequence of length-prefixed
//! records. Each record is a header name and value; a record with an empty
//! name closes the current block of headers.
//!
//! # Format
//!
//! ```text
//! +-------------+--------------+------------+-------------+
//! | name_len u16| value_len u16| name bytes | value bytes |   <- record
//! +-------------+--------------+------------+-------------+
//! | 0x0000      | value_len    |            | ignored     |   <- sentinel
//! ```
//!
//! Lengths are big-endian. Names and values are Latin-1 text.
//!
//! # Structure
//!
//! - `reader` - Streaming decoder producing [`HeaderSet`]s
//! - `writer` - Encoder for the same format (fixtures, tests)

mod reader;
mod writer;

pub use reader::{BlockReader, ReaderStats, DEFAULT_CHUNK_SIZE};
pub use writer::{encode_header_set, write_header_set, write_record, write_sentinel};

/// Size of the two big-endian length fields that start every record.
pub const RECORD_PREFIX_LEN: usize = 4;

/// Largest name or value a record can carry.
pub const MAX_FIELD_LEN: usize = u16::MAX as usize;

/// Pseudo-header carrying the request URL.
pub const URL_PSEUDO_HEADER: &[u8] = b":url";

/// Pseudo-header carrying the request origin (scheme, host and port).
pub const ORIGIN_PSEUDO_HEADER: &[u8] = b":origin";

/// Errors produced while encoding records.
#[derive(Debug, thiserror::Error)]
pub enum LogFormatError {
    #[error("{field} is {len} bytes, records hold at most {MAX_FIELD_LEN}")]
    FieldTooLong { field: &'static str, len: usize },

    #[error("Header name must not be empty (an empty name is the block sentinel)")]
    EmptyName,

    #[error("Failed to write record: {0}")]
    Io(#[from] std::io::Error),
}

/// All headers captured for one response, in capture order.
///
/// Behaves as an ordered map: inserting a name that is already present
/// replaces its value and keeps the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    fields: Vec<(Vec<u8>, Vec<u8>)>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a header value.
    pub fn insert(&mut self, name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &[u8]) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|(n, _)| n.as_slice() == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn contains(&self, name: &[u8]) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate `(name, value)` pairs in capture order, pseudo-headers included.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.fields
            .iter()
            .map(|(n, v)| (n.as_slice(), v.as_slice()))
    }

    /// The `:url` pseudo-header, if captured.
    pub fn url(&self) -> Option<&[u8]> {
        self.get(URL_PSEUDO_HEADER)
    }

    /// The `:origin` pseudo-header, if captured.
    pub fn origin(&self) -> Option<&[u8]> {
        self.get(ORIGIN_PSEUDO_HEADER)
    }
}

impl<N, V> FromIterator<(N, V)> for HeaderSet
where
    N: Into<Vec<u8>>,
    V: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut set = HeaderSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

/// Returns true for pseudo-headers (names starting with `:`).
pub fn is_pseudo_header(name: &[u8]) -> bool {
    name.first() == Some(&b':')
}

/// Decode Latin-1 bytes into a `String` (every byte maps to one char).
pub fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_in_place() {
        let mut set = HeaderSet::new();
        set.insert(&b"age"[..], &b"1"[..]);
        set.insert(&b"vary"[..], &b"accept"[..]);
        set.insert(&b"age"[..], &b"2"[..]);

        let names: Vec<&[u8]> = set.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec![&b"age"[..], &b"vary"[..]]);
        assert_eq!(set.get(b"age"), Some(&b"2"[..]));
    }

    #[test]
    fn pseudo_headers_are_accessible() {
        let set: HeaderSet = vec![
            (b":url".to_vec(), b"https://a.example/x".to_vec()),
            (b":origin".to_vec(), b"https://a.example".to_vec()),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.url(), Some(&b"https://a.example/x"[..]));
        assert_eq!(set.origin(), Some(&b"https://a.example"[..]));
        assert!(is_pseudo_header(b":url"));
        assert!(!is_pseudo_header(b"cache-control"));
    }

    #[test]
    fn latin1_maps_high_bytes() {
        assert_eq!(latin1_to_string(b"caf\xe9"), "café");
    }
}
