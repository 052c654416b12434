//! # stashdb
//!
//! An embedded key-value store with:
//! - Named collections, one append-only record file each
//! - Tombstone-based overwrites (records are never rewritten, only flagged dead)
//! - Linear-scan reads over a self-describing record stream
//! - Exclusive per-collection file ownership
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Store (root dir)                       │
//! │        open root, probe writability, hand out collections    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ collection("users")
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Collection                              │
//! │       get/put via forward scan + append (Mutex-serialized)   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────▼────────────┐
//!          │      Record Codec       │
//!          │  9-byte header + body   │
//!          └────────────┬────────────┘
//!                       │
//!               {root}/users/records.log
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use stashdb::Store;
//!
//! let store = Store::open("./data")?;
//! let users = store.collection("users")?;
//! users.put(b"alice", b"42")?;
//! assert_eq!(users.get(b"alice")?, Some(b"42".to_vec()));
//! # Ok::<(), stashdb::StashError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod collection;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StashError};
pub use config::Config;
pub use collection::Collection;
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of stashdb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
