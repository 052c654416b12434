//! Configuration for stashdb
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a stashdb Store instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all collections.
    /// Internal structure:
    ///   {root_dir}/
    ///     ├── {collection-a}/records.log
    ///     └── {collection-b}/records.log
    pub root_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// Sync file data to disk after every appended record.
    ///
    /// Off by default: the engine detects torn writes on the next scan rather
    /// than paying an fsync per put.
    pub sync_on_put: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./stashdb_data"),
            sync_on_put: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the root directory (parent of all collection directories)
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.root_dir = path.into();
        self
    }

    /// Enable or disable fsync after each put
    pub fn sync_on_put(mut self, sync: bool) -> Self {
        self.config.sync_on_put = sync;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
