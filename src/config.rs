//! Configuration for blocktable
//!
//! Centralized configuration with sensible defaults.

use serde::{Deserialize, Serialize};

/// Options applied when a block store is opened
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Durability
    // -------------------------------------------------------------------------
    /// When to push written blocks to disk
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------
    /// Check that blocks are sorted before every binary search.
    /// Costs a full scan per search; meant for debugging callers.
    pub verify_sorted: bool,
}

/// Block store sync strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStrategy {
    /// Leave flushing to the OS
    #[default]
    Never,

    /// fsync after every append/update (safest, slowest)
    EveryWrite,
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
    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Enable or disable sortedness verification in searches
    pub fn verify_sorted(mut self, verify: bool) -> Self {
        self.config.verify_sorted = verify;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
