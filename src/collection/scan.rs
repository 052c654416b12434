//! Record scanner
//!
//! Forward scan cursor over a collection's backing file. Decodes one header
//! per step, skips tombstoned ranges without touching their bodies, and
//! yields live records with their key already read.
//!
//! There is no in-file index: the only way to locate anything is this
//! offset-by-offset walk from position 0.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};

use crate::error::{Result, StashError};
use crate::record::{RecordHeader, HEADER_SIZE};

/// A live record encountered during a scan
pub(crate) struct LiveRecord {
    /// File offset of the record's first header byte
    pub offset: u64,
    pub header: RecordHeader,
    pub key: Vec<u8>,
}

/// Forward scan over the record stream
///
/// The file length is captured once at construction; every step re-seeks to
/// the cursor's offset, so callers may interleave their own positioned writes
/// (tombstone rewrites) between steps.
pub(crate) struct RecordScanner<'a> {
    file: &'a File,
    len: u64,
    offset: u64,
}

impl<'a> RecordScanner<'a> {
    pub(crate) fn new(file: &'a File) -> Result<Self> {
        let len = file.metadata()?.len();
        Ok(Self {
            file,
            len,
            offset: 0,
        })
    }

    /// Advance to the next live record and read its key
    ///
    /// Returns:
    /// - `Ok(Some(record))` — a live record, cursor already advanced past it
    /// - `Ok(None)` — clean end of file
    /// - `Err(TruncatedHeader)` — fewer than 9 bytes remained at the cursor
    /// - `Err(TruncatedRecord)` — a header declared more body bytes than the
    ///   file contains (checked before any body read, for dead records too,
    ///   so a malformed length can never stall or overrun the scan)
    pub(crate) fn next_live(&mut self) -> Result<Option<LiveRecord>> {
        let mut file = self.file;

        loop {
            let remaining = self.len.saturating_sub(self.offset);
            if remaining == 0 {
                return Ok(None);
            }
            if remaining < HEADER_SIZE as u64 {
                return Err(StashError::TruncatedHeader {
                    offset: self.offset,
                    got: remaining,
                });
            }

            file.seek(SeekFrom::Start(self.offset))?;
            let mut buf = [0u8; HEADER_SIZE];
            file.read_exact(&mut buf)?;
            let header = RecordHeader::decode(&buf, self.offset)?;

            if header.total_size() > remaining {
                return Err(StashError::TruncatedRecord {
                    offset: self.offset,
                    expected: header.body_size(),
                    got: remaining - HEADER_SIZE as u64,
                });
            }

            let record_offset = self.offset;
            // total_size >= 9, so the cursor always makes progress
            self.offset += header.total_size();

            if !header.is_live() {
                tracing::trace!(
                    offset = record_offset,
                    size = header.total_size(),
                    "skipping tombstoned record"
                );
                continue;
            }

            let mut key = vec![0u8; header.key_len() as usize];
            file.read_exact(&mut key)
                .map_err(|e| self.body_read_error(e, record_offset, &header))?;

            return Ok(Some(LiveRecord {
                offset: record_offset,
                header,
                key,
            }));
        }
    }

    /// Read the value bytes of a live record yielded by [`next_live`](Self::next_live)
    pub(crate) fn read_value(&mut self, record: &LiveRecord) -> Result<Vec<u8>> {
        let mut file = self.file;

        let value_offset = record.offset + HEADER_SIZE as u64 + record.header.key_len() as u64;
        file.seek(SeekFrom::Start(value_offset))?;

        let mut value = vec![0u8; record.header.value_len() as usize];
        file.read_exact(&mut value)
            .map_err(|e| self.body_read_error(e, record.offset, &record.header))?;

        Ok(value)
    }

    /// A short body read means the file shrank under us (bounds were already
    /// validated against the captured length): surface it as truncation, not
    /// as a bare I/O failure.
    fn body_read_error(
        &self,
        err: std::io::Error,
        offset: u64,
        header: &RecordHeader,
    ) -> StashError {
        if err.kind() == ErrorKind::UnexpectedEof {
            StashError::TruncatedRecord {
                offset,
                expected: header.body_size(),
                got: self.len.saturating_sub(offset + HEADER_SIZE as u64),
            }
        } else {
            StashError::Io(err)
        }
    }
}
