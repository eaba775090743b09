//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (reload counters for self-telemetry)
//!
//! Consumers:
//!     → stdout log collection
//!     → /metrics scrape
//! ```

pub mod logging;
pub mod metrics;
