//! Metric projection and exposition.
//!
//! # Data Flow
//! ```text
//! scrape
//!     → ConfigStore::get() (one snapshot per pass)
//!     → Utc::now() (one instant per pass)
//!     → projection.rs (describe + collect observations)
//!     → render.rs (Prometheus text)
//! ```

pub mod projection;
pub mod render;

pub use projection::{Collector, Descriptor, Observation};
pub use render::render;
