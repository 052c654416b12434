//! Collection engine
//!
//! A collection is one logical key-value namespace backed by exactly one
//! append-only file of records (see [`crate::record`] for the layout).
//!
//! ## Operations
//!
//! Both `get` and `put` are single forward scans from offset 0:
//! - `get` stops at the first live record whose key matches and returns its
//!   value; reaching end of file means not found.
//! - `put` tombstones every live record with the same key in place (9-byte
//!   header rewrite, body untouched), then appends the new record at end of
//!   file. Scanning past the first match keeps the file free of stale live
//!   duplicates even if earlier corruption recovery produced them.
//!
//! ## Concurrency
//!
//! All calls on one Collection serialize through a Mutex held for the whole
//! scan(-plus-write). The backing file is locked exclusively at open, so a
//! second handle on the same path is refused rather than racing the first.
//!
//! ## Durability
//!
//! Appends are not synced unless [`Config::sync_on_put`](crate::Config) is
//! set; a torn write is detected as truncation on the next scan.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use parking_lot::Mutex;

use crate::error::{Result, StashError};
use crate::record::encode_record;

mod scan;

use scan::RecordScanner;

/// Name of the backing record file inside a collection directory
pub const RECORDS_FILE: &str = "records.log";

/// A named key-value namespace backed by one record file
#[derive(Debug)]
pub struct Collection {
    /// Collection directory
    path: PathBuf,

    /// fsync file data after each append
    sync_on_put: bool,

    /// Exclusive access to the backing file for the duration of each call
    file: Mutex<File>,
}

impl Collection {
    /// Open (or create) the collection rooted at `dir`
    ///
    /// Creates the directory and backing file if absent, opens the file
    /// read-write, and takes an exclusive advisory lock on it. A second open
    /// of the same path fails with `CollectionLocked`.
    pub(crate) fn open(dir: &Path, sync_on_put: bool) -> Result<Self> {
        fs::create_dir_all(dir)?;

        let file_path = dir.join(RECORDS_FILE);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&file_path)?;

        file.try_lock_exclusive().map_err(|e| {
            if e.kind() == ErrorKind::WouldBlock {
                StashError::CollectionLocked(file_path.clone())
            } else {
                StashError::Io(e)
            }
        })?;

        let size = file.metadata()?.len();
        tracing::debug!(path = %file_path.display(), size, "opened collection");

        Ok(Self {
            path: dir.to_path_buf(),
            sync_on_put,
            file: Mutex::new(file),
        })
    }

    /// Get the value for `key`
    ///
    /// Returns:
    /// - `Ok(Some(value))` — first live record with this key
    /// - `Ok(None)` — no live record with this key (a normal result)
    /// - `Err(TruncatedRecord)` — a record body is cut short (corruption)
    ///
    /// A partial header at the very tail of the file (a torn final append) is
    /// treated as the end of usable data, not as an error.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let file = self.file.lock();
        let mut scanner = RecordScanner::new(&file)?;

        loop {
            match scanner.next_live() {
                Ok(Some(record)) if record.key == key => {
                    let value = scanner.read_value(&record)?;
                    tracing::trace!(offset = record.offset, "get hit");
                    return Ok(Some(value));
                }
                Ok(Some(_)) => continue,
                Ok(None) => return Ok(None),
                Err(StashError::TruncatedHeader { offset, got }) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        offset,
                        got,
                        "partial trailing header, treating as end of data"
                    );
                    return Ok(None);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Write `value` under `key`
    ///
    /// Scans the whole file, tombstoning every live record with this key in
    /// place, then appends the new record at end of file. Any truncation seen
    /// during the scan (a partial trailing header included) aborts the call
    /// before the append: writing past a half-written record would bury it.
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        // Length limits are checked before any disk state changes
        let record = encode_record(key, value)?;

        let file = self.file.lock();

        let mut tombstoned = 0u32;
        let mut scanner = RecordScanner::new(&file)?;
        while let Some(found) = scanner.next_live()? {
            if found.key == key {
                let mut writer: &File = &file;
                writer.seek(SeekFrom::Start(found.offset))?;
                writer.write_all(&found.header.cleared().encode())?;
                tombstoned += 1;
            }
        }

        let mut writer: &File = &file;
        let offset = writer.seek(SeekFrom::End(0))?;
        writer.write_all(&record)?;

        if self.sync_on_put {
            file.sync_data()?;
        }

        tracing::debug!(
            path = %self.path.display(),
            offset,
            bytes = record.len(),
            tombstoned,
            "appended record"
        );

        Ok(())
    }

    /// Collection directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sync and release the backing file
    ///
    /// Dropping the Collection releases the file (and its lock) as well;
    /// `close` additionally syncs and reports failures.
    pub fn close(self) -> Result<()> {
        let Self { path, file, .. } = self;
        let file = file.into_inner();

        file.sync_all()?;
        FileExt::unlock(&file)?;
        tracing::debug!(path = %path.display(), "closed collection");

        Ok(())
    }
}
