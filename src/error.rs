//! Error types for stashdb
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using StashError
pub type Result<T> = std::result::Result<T, StashError>;

/// Unified error type for stashdb operations
#[derive(Debug, Error)]
pub enum StashError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Record Stream Corruption
    // -------------------------------------------------------------------------
    /// Fewer than a full 9-byte header remained at `offset`.
    ///
    /// A trailing partial header is benign for reads (end of usable data) but
    /// fatal for writes, which must not append past a half-written record.
    #[error("truncated record header at offset {offset}: {got} of 9 bytes available")]
    TruncatedHeader { offset: u64, got: u64 },

    /// A header at `offset` declared more body bytes than the file contains.
    #[error("truncated record at offset {offset}: header declares {expected} body bytes, {got} available")]
    TruncatedRecord { offset: u64, expected: u64, got: u64 },

    // -------------------------------------------------------------------------
    // Record Limits
    // -------------------------------------------------------------------------
    /// Key or value length does not fit the on-disk u32 length fields.
    #[error("record too large: key {key_len} bytes, value {value_len} bytes (u32 max each)")]
    RecordTooLarge { key_len: usize, value_len: usize },

    // -------------------------------------------------------------------------
    // Store / Collection Lifecycle
    // -------------------------------------------------------------------------
    /// The root filesystem is mounted read-only (detected at store open).
    #[error("read-only medium: cannot write under {0:?}")]
    ReadOnlyMedium(PathBuf),

    /// The collection's backing file is exclusively locked by another handle.
    #[error("collection already open: {0:?}")]
    CollectionLocked(PathBuf),

    /// Collection names must be plain path components.
    #[error("invalid collection name: {0:?}")]
    InvalidCollectionName(String),
}
