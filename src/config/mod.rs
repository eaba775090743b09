//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (YAML/TOML)
//!     → loader.rs (read & deserialize into schema.rs)
//!     → validation.rs (resolve timezones, parse window bounds)
//!     → GlobalConfig (validated, immutable)
//!     → store.rs (shared via Arc to every scrape)
//!
//! On file change:
//!     watcher.rs receives the event
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap in store.rs, or keep the current config on error
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - A load either yields a complete config or an error, never a partial one
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError, ConfigFormat};
pub use store::ConfigStore;
pub use validation::ValidationError;
pub use watcher::ConfigWatcher;
