//! Time-of-use Prometheus exporter library.

pub mod cli;
pub mod config;
pub mod exporter;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod schedule;

pub use config::ConfigStore;
pub use lifecycle::{Shutdown, ShutdownSignal};
pub use schedule::GlobalConfig;
