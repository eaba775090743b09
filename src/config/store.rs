//! Live configuration store.
//!
//! Holds the single configuration snapshot currently served. Readers get an
//! `Arc` to an immutable `GlobalConfig`; the reload task replaces the whole
//! snapshot at once, so a reader sees either the old or the new value.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::schedule::model::GlobalConfig;

/// Atomically replaceable holder of the current configuration.
pub struct ConfigStore {
    current: ArcSwap<GlobalConfig>,
}

impl ConfigStore {
    /// Create a store holding the empty configuration.
    pub fn new() -> Self {
        Self::with_config(GlobalConfig::empty())
    }

    pub fn with_config(config: GlobalConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(config),
        }
    }

    /// The currently installed configuration. Lock-free.
    pub fn get(&self) -> Arc<GlobalConfig> {
        self.current.load_full()
    }

    /// Replace the installed configuration.
    pub fn set(&self, config: GlobalConfig) {
        self.current.store(Arc::new(config));
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore").field("current", &self.get()).finish()
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}
