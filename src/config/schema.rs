//! Configuration document schema.
//!
//! This module defines the raw shape of the schedule configuration file.
//! All types derive Serde traits for deserialization from YAML or TOML.
//! Nothing here is validated; see `validation.rs` for the conversion into
//! the schedule model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root of the configuration document.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RawConfig {
    /// IANA timezones to emit localized calendar facts for.
    pub localized_timezones: Vec<String>,

    /// Time-of-use schedules.
    #[serde(rename = "time_of_use", alias = "schedules")]
    pub schedules: Vec<RawSchedule>,
}

/// A single time-of-use schedule as written by the operator.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RawSchedule {
    /// Metric name.
    pub name: String,

    /// Metric help text.
    pub description: String,

    /// IANA timezone; empty means UTC.
    #[serde(default)]
    pub timezone: String,

    /// Base labels.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// Value reported when no window is active.
    #[serde(default)]
    pub default_value: f64,

    /// Windows, first match wins.
    #[serde(default, rename = "time_windows", alias = "windows")]
    pub windows: Vec<RawTimeWindow>,
}

/// A time window as written by the operator.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RawTimeWindow {
    /// Value reported while the window is active.
    pub value: f64,

    /// Inclusive start, `HH:MM`.
    pub start: String,

    /// Exclusive end, `HH:MM`.
    pub end: String,

    /// Label overrides applied while active.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// Weekdays (0 = Sunday .. 6 = Saturday). Empty means every day.
    #[serde(default)]
    pub days: Vec<i64>,
}
