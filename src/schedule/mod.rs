//! Time-of-use schedules.
//!
//! # Data Flow
//! ```text
//! GlobalConfig snapshot (model.rs)
//!     → schedule converted into its own timezone by the caller
//!     → matcher.rs (active window, value, label overlay)
//!     → Evaluation { window, value, labels }
//! ```
//!
//! # Design Decisions
//! - Window bounds are parsed once at load time into `DayOffset` (offset.rs)
//! - Evaluation is O(windows) and allocation-light; nothing is re-parsed per scrape

pub mod matcher;
pub mod model;
pub mod offset;

pub use matcher::{evaluate, Evaluation};
pub use model::{GlobalConfig, Labels, LocalizedTimezone, Schedule, TimeWindow};
pub use offset::{DayOffset, TimeParseError};
