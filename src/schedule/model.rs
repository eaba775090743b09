//! Validated schedule model.
//!
//! Values of these types are only built by
//! [`validate_config`](crate::config::validation::validate_config) and are
//! immutable afterwards. Every derived field (resolved zones, parsed offsets,
//! weekdays) is always present.

use std::collections::BTreeMap;

use chrono::Weekday;
use chrono_tz::Tz;

use crate::schedule::offset::DayOffset;

/// Label key carrying the schedule's timezone.
pub const TZ_LABEL: &str = "tz";

/// Label value used when a schedule does not name a timezone.
pub const DEFAULT_TZ_NAME: &str = "UTC";

pub type Labels = BTreeMap<String, String>;

/// A complete, validated configuration snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalConfig {
    /// Timezones for which raw calendar facts are emitted, in declared order.
    pub localized_timezones: Vec<LocalizedTimezone>,

    /// Schedules in declared order.
    pub schedules: Vec<Schedule>,
}

impl GlobalConfig {
    /// The configuration served before anything has been loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.localized_timezones.is_empty() && self.schedules.is_empty()
    }
}

/// A configured timezone together with its resolved zone.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizedTimezone {
    pub name: String,
    pub tz: Tz,
}

/// One named time-of-use rule set.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    /// Emitted metric name.
    pub name: String,

    /// Emitted metric help text.
    pub description: String,

    /// Value of the `tz` label: the configured zone name, or `UTC` when unset.
    pub timezone: String,

    /// Zone the schedule is evaluated in.
    pub tz: Tz,

    /// Reported when no window is active.
    pub default_value: f64,

    /// Base labels, beneath per-window overrides.
    pub labels: Labels,

    /// Windows in declared order; the first active one wins.
    pub windows: Vec<TimeWindow>,
}

/// A sub-interval `[start, end)` of a day, optionally limited to some weekdays.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWindow {
    pub value: f64,
    pub start: DayOffset,
    pub end: DayOffset,

    /// Overrides applied on top of the schedule labels while active.
    pub labels: Labels,

    /// Empty means every day.
    pub days: Vec<Weekday>,
}

impl TimeWindow {
    /// Whether the window is active at `offset` on `weekday`.
    pub fn is_active(&self, weekday: Weekday, offset: DayOffset) -> bool {
        let day_matches = self.days.is_empty() || self.days.contains(&weekday);
        day_matches && self.start <= offset && offset < self.end
    }
}
