//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing and timeout layers)
//!     → /metrics: store snapshot → exporter → Prometheus text
//!     → Send to client
//! ```

pub mod server;

pub use server::{AppState, MetricsServer};
