//! Store
//!
//! The root handle: a directory-scoped factory mapping collection names to
//! [`Collection`] instances. Each collection lives in its own sub-directory
//! of the root.
//!
//! Opening a store creates the root directory if absent and probes that the
//! medium is writable, so a read-only mount fails fast with `ReadOnlyMedium`
//! before any collection is touched. The store itself holds no OS resources;
//! dropping it is a no-op, and collections outlive it independently.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::collection::Collection;
use crate::config::Config;
use crate::error::{Result, StashError};

/// Probe file created and removed at open time to detect read-only media
const WRITE_PROBE: &str = ".stashdb-write-probe";

/// EROFS on Linux and macOS
const EROFS: i32 = 30;

/// Root handle over a directory of collections
#[derive(Debug)]
pub struct Store {
    config: Config,
}

impl Store {
    /// Open a store rooted at `root` with default configuration
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        Self::with_config(Config::builder().root_dir(root).build())
    }

    /// Open a store with explicit configuration
    pub fn with_config(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.root_dir)?;
        Self::probe_writable(&config.root_dir)?;

        tracing::info!(
            root = %config.root_dir.display(),
            version = crate::VERSION,
            "opened store"
        );

        Ok(Self { config })
    }

    /// Root directory holding all collection sub-directories
    pub fn root_dir(&self) -> &Path {
        &self.config.root_dir
    }

    /// Open (or create) the named collection
    ///
    /// The name becomes a sub-directory of the root, so it must be a plain
    /// path component: non-empty, no separators, not `.` or `..`.
    pub fn collection(&self, name: &str) -> Result<Collection> {
        Self::validate_name(name)?;
        Collection::open(
            &self.config.root_dir.join(name),
            self.config.sync_on_put,
        )
    }

    fn validate_name(name: &str) -> Result<()> {
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.chars().any(|c| c == '/' || c == '\\');

        if plain {
            Ok(())
        } else {
            Err(StashError::InvalidCollectionName(name.to_string()))
        }
    }

    /// Create and remove a throwaway file under `root`; a refusal tells us
    /// the medium cannot back a store at all.
    fn probe_writable(root: &Path) -> Result<()> {
        let probe = root.join(WRITE_PROBE);

        match OpenOptions::new().write(true).create(true).open(&probe) {
            Ok(file) => {
                drop(file);
                let _ = fs::remove_file(&probe);
                Ok(())
            }
            Err(e)
                if e.kind() == ErrorKind::PermissionDenied
                    || (cfg!(unix) && e.raw_os_error() == Some(EROFS)) =>
            {
                Err(StashError::ReadOnlyMedium(root.to_path_buf()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
