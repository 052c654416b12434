//! Record header
//!
//! The fixed 9-byte prefix of every record: flags, key length, value length.

use crate::error::{Result, StashError};

use super::{FLAG_LIVE, HEADER_SIZE};

/// Decoded record header
///
/// Cheap to copy; holds only the flags byte and the two length fields. The
/// lengths locate the record body and, via [`total_size`](Self::total_size),
/// the offset of the next record in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    flags: u8,
    key_len: u32,
    value_len: u32,
}

impl RecordHeader {
    /// Build a header for a freshly written (live) record
    pub fn new(key_len: u32, value_len: u32) -> Self {
        Self {
            flags: FLAG_LIVE,
            key_len,
            value_len,
        }
    }

    /// Decode a header from a byte window read at `offset`
    ///
    /// `offset` is diagnostic only: it names the file position a failing
    /// window came from. Fails with `TruncatedHeader` when fewer than 9 bytes
    /// are available.
    pub fn decode(buf: &[u8], offset: u64) -> Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(StashError::TruncatedHeader {
                offset,
                got: buf.len() as u64,
            });
        }

        Ok(Self {
            flags: buf[0],
            key_len: u32::from_be_bytes([buf[1], buf[2], buf[3], buf[4]]),
            value_len: u32::from_be_bytes([buf[5], buf[6], buf[7], buf[8]]),
        })
    }

    /// Encode back to the 9 on-disk bytes
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0] = self.flags;
        bytes[1..5].copy_from_slice(&self.key_len.to_be_bytes());
        bytes[5..9].copy_from_slice(&self.value_len.to_be_bytes());
        bytes
    }

    /// Is this record live (bit 0 of flags set)?
    pub fn is_live(&self) -> bool {
        self.flags & FLAG_LIVE != 0
    }

    /// Key length in bytes
    pub fn key_len(&self) -> u32 {
        self.key_len
    }

    /// Value length in bytes
    pub fn value_len(&self) -> u32 {
        self.value_len
    }

    /// Declared body size: key_len + value_len (u64 to avoid u32 overflow)
    pub fn body_size(&self) -> u64 {
        self.key_len as u64 + self.value_len as u64
    }

    /// Full record size including the header, i.e. the distance to the next
    /// record's offset
    pub fn total_size(&self) -> u64 {
        HEADER_SIZE as u64 + self.body_size()
    }

    /// Copy of this header with the live bit cleared
    ///
    /// Writing the returned header's bytes back over the original 9 bytes is
    /// the only supported mutation of an existing record.
    pub fn cleared(&self) -> Self {
        Self {
            flags: self.flags & !FLAG_LIVE,
            ..*self
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
