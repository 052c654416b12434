//! Record codec
//!
//! Translates between an in-memory `(live, key, value)` triple and its on-disk
//! representation, and back.
//!
//! ## On-Disk Format
//!
//! A collection file is a plain concatenation of records, no file header, no
//! magic, no checksums:
//!
//! ```text
//! repeat until EOF:
//! ┌──────────┬──────────────┬──────────────┬───────────┬─────────────┐
//! │ flags(1) │ key_len (4)  │ value_len(4) │    key    │    value    │
//! │ bit0=live│   u32 BE     │    u32 BE    │ key_len B │ value_len B │
//! └──────────┴──────────────┴──────────────┴───────────┴─────────────┘
//! ```
//!
//! Keys and values are arbitrary bytes, empty sequences included. A record is
//! never moved or resized once written; overwriting a key appends a new record
//! and clears bit 0 of every older copy's flags byte in place (tombstoning).

mod codec;
mod header;

pub use codec::encode_record;
pub use header::RecordHeader;

/// Fixed size of the record header: flags (1) + key_len (4) + value_len (4)
pub const HEADER_SIZE: usize = 9;

/// Flags bit 0: record is live (not tombstoned)
pub const FLAG_LIVE: u8 = 0x01;
