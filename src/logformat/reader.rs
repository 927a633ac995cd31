//! Streaming decoder for the binary header log.
//!
//! [`BlockReader`] pulls bytes from any [`Read`] in fixed-size chunks and
//! yields one [`HeaderSet`] per sentinel record. A record that straddles two
//! chunks is handled by sliding the unconsumed tail to the front of the
//! working buffer and appending the next chunk, so no byte is read twice.
//!
//! # Truncation
//!
//! Archives are frequently cut short. When the stream ends in the middle of
//! a record, or after records that were never closed by a sentinel, those
//! bytes are dropped and counted in [`ReaderStats`]; the reader then reports
//! a normal end of stream.
//!
//! # Example
//!
//! ```
//! use hcensus::logformat::{encode_header_set, BlockReader, HeaderSet};
//!
//! let mut set = HeaderSet::new();
//! set.insert(&b"cache-control"[..], &b"max-age=60"[..]);
//! let bytes = encode_header_set(&set)?;
//!
//! let mut reader = BlockReader::new(bytes.as_slice());
//! let decoded = reader.next_set()?.expect("one block");
//! assert_eq!(decoded, set);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::io::{self, ErrorKind, Read};
use std::mem;

use serde::Serialize;
use tracing::debug;

use super::{HeaderSet, RECORD_PREFIX_LEN};

/// Default number of bytes requested from the underlying stream per read.
pub const DEFAULT_CHUNK_SIZE: usize = 1 << 20;

/// Counters describing what the reader consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReaderStats {
    /// Header sets emitted (one per sentinel)
    pub blocks: u64,
    /// Records decoded, sentinels included
    pub records: u64,
    /// Bytes consumed by complete records
    pub bytes_consumed: u64,
    /// Bytes of an incomplete trailing record dropped at end of stream
    pub truncated_bytes: u64,
    /// Complete records dropped because no sentinel followed them
    pub unterminated_records: u64,
}

impl ReaderStats {
    /// Add another reader's counters to this one.
    pub fn add(&mut self, other: &ReaderStats) {
        self.blocks += other.blocks;
        self.records += other.records;
        self.bytes_consumed += other.bytes_consumed;
        self.truncated_bytes += other.truncated_bytes;
        self.unterminated_records += other.unterminated_records;
    }
}

/// Decodes a byte stream of length-prefixed records into header sets.
pub struct BlockReader<R> {
    inner: R,
    /// Working buffer; `buf[start..end]` holds unconsumed bytes
    buf: Vec<u8>,
    start: usize,
    end: usize,
    chunk_size: usize,
    /// Header set being assembled from the current block
    current: HeaderSet,
    stats: ReaderStats,
    finished: bool,
}

impl<R: Read> BlockReader<R> {
    /// Create a reader with the default chunk size.
    pub fn new(inner: R) -> Self {
        Self::with_chunk_size(inner, DEFAULT_CHUNK_SIZE)
    }

    /// Create a reader that requests `chunk_size` bytes per read.
    ///
    /// The working buffer still grows to fit any single record, so even a
    /// one-byte chunk size decodes correctly.
    pub fn with_chunk_size(inner: R, chunk_size: usize) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            start: 0,
            end: 0,
            chunk_size: chunk_size.max(1),
            current: HeaderSet::new(),
            stats: ReaderStats::default(),
            finished: false,
        }
    }

    pub fn stats(&self) -> ReaderStats {
        self.stats
    }

    /// Decode the next complete header set.
    ///
    /// Returns `Ok(None)` once the stream is exhausted. Partial trailing
    /// data is discarded rather than reported as an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the underlying reader fails with something
    /// other than `ErrorKind::Interrupted`.
    pub fn next_set(&mut self) -> io::Result<Option<HeaderSet>> {
        if self.finished {
            return Ok(None);
        }

        loop {
            if !self.fill(RECORD_PREFIX_LEN)? {
                self.finish();
                return Ok(None);
            }

            let prefix = &self.buf[self.start..self.start + RECORD_PREFIX_LEN];
            let name_len = u16::from_be_bytes([prefix[0], prefix[1]]) as usize;
            let value_len = u16::from_be_bytes([prefix[2], prefix[3]]) as usize;
            let record_len = RECORD_PREFIX_LEN + name_len + value_len;

            if !self.fill(record_len)? {
                self.finish();
                return Ok(None);
            }

            let name_start = self.start + RECORD_PREFIX_LEN;
            let value_start = name_start + name_len;
            let record_end = value_start + value_len;

            self.stats.records += 1;
            self.stats.bytes_consumed += record_len as u64;

            if name_len == 0 {
                self.start = record_end;
                self.stats.blocks += 1;
                return Ok(Some(mem::take(&mut self.current)));
            }

            self.current.insert(
                &self.buf[name_start..value_start],
                &self.buf[value_start..record_end],
            );
            self.start = record_end;
        }
    }

    /// Make sure at least `needed` unconsumed bytes are buffered.
    ///
    /// Returns `Ok(false)` if the stream ended first.
    fn fill(&mut self, needed: usize) -> io::Result<bool> {
        if self.end - self.start >= needed {
            return Ok(true);
        }

        // Slide the unconsumed tail to the front before appending.
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }

        while self.end < needed {
            let want = self.end + self.chunk_size;
            if self.buf.len() < want {
                self.buf.resize(want, 0);
            }
            match self.inner.read(&mut self.buf[self.end..want]) {
                Ok(0) => return Ok(false),
                Ok(n) => self.end += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(true)
    }

    /// Drop whatever is left at end of stream and record it.
    fn finish(&mut self) {
        let leftover = self.end - self.start;
        if leftover > 0 {
            debug!(bytes = leftover, "Discarding incomplete trailing record");
            self.stats.truncated_bytes += leftover as u64;
        }
        if !self.current.is_empty() {
            debug!(
                records = self.current.len(),
                "Discarding records not closed by a sentinel"
            );
            self.stats.unterminated_records += self.current.len() as u64;
            self.current = HeaderSet::new();
        }
        self.start = 0;
        self.end = 0;
        self.finished = true;
    }
}

impl<R: Read> Iterator for BlockReader<R> {
    type Item = io::Result<HeaderSet>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_set() {
            Ok(Some(set)) => Some(Ok(set)),
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
