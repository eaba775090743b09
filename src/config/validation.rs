//! Configuration validation.
//!
//! # Responsibilities
//! - Resolve every timezone name into a `chrono_tz::Tz`
//! - Parse every window bound into a `DayOffset`
//! - Check weekday ordinals and Prometheus naming rules
//! - Keep schedule gauges out of the exporter's own `tou_exporter_` namespace
//!
//! # Design Decisions
//! - Pure function: RawConfig → Result<GlobalConfig, ValidationError>
//! - Fail fast: the first error is returned and nothing is kept
//! - Runs before config is accepted into the system

use std::fmt;

use chrono::Weekday;
use chrono_tz::Tz;
use thiserror::Error;

use crate::config::schema::{RawConfig, RawSchedule, RawTimeWindow};
use crate::schedule::model::{GlobalConfig, LocalizedTimezone, Schedule, TimeWindow, DEFAULT_TZ_NAME};
use crate::schedule::offset::{DayOffset, TimeParseError};

/// Which bound of a window failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowBound {
    Start,
    End,
}

impl fmt::Display for WindowBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowBound::Start => f.write_str("start"),
            WindowBound::End => f.write_str("end"),
        }
    }
}

/// Semantic errors found after the document parsed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid localized timezone {timezone:?}")]
    InvalidLocalizedTimezone { timezone: String },

    #[error("schedule {schedule:?}: invalid timezone {timezone:?}")]
    InvalidScheduleTimezone { schedule: String, timezone: String },

    #[error("schedule {schedule:?}, window {window}: invalid {bound} {raw:?}: {source}")]
    InvalidTimeFormat {
        schedule: String,
        window: usize,
        bound: WindowBound,
        raw: String,
        #[source]
        source: TimeParseError,
    },

    #[error("schedule {schedule:?}, window {window}: invalid day {day}, must be 0 (Sunday) to 6 (Saturday)")]
    InvalidDay { schedule: String, window: usize, day: i64 },

    #[error("schedule {schedule:?}: {name:?} is not a valid metric name or uses the reserved \"tou_exporter_\" prefix")]
    InvalidMetricName { schedule: String, name: String },

    #[error("schedule {schedule:?}: {label:?} is not a valid label name")]
    InvalidLabelName { schedule: String, label: String },
}

/// Prefix of every metric the exporter emits on its own behalf.
pub const RESERVED_METRIC_PREFIX: &str = "tou_exporter_";

/// Turn a parsed document into a validated configuration.
pub fn validate_config(raw: RawConfig) -> Result<GlobalConfig, ValidationError> {
    let mut localized_timezones: Vec<LocalizedTimezone> = Vec::with_capacity(raw.localized_timezones.len());
    for name in raw.localized_timezones {
        let tz: Tz = name
            .parse()
            .map_err(|_| ValidationError::InvalidLocalizedTimezone { timezone: name.clone() })?;
        if localized_timezones.iter().any(|l| l.name == name) {
            tracing::debug!(timezone = %name, "Skipping duplicate localized timezone");
            continue;
        }
        localized_timezones.push(LocalizedTimezone { name, tz });
    }

    let zones = raw
        .schedules
        .iter()
        .map(resolve_schedule_timezone)
        .collect::<Result<Vec<_>, _>>()?;

    let schedules = raw
        .schedules
        .into_iter()
        .zip(zones)
        .map(|(schedule, (timezone, tz))| build_schedule(schedule, timezone, tz))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GlobalConfig {
        localized_timezones,
        schedules,
    })
}

fn resolve_schedule_timezone(schedule: &RawSchedule) -> Result<(String, Tz), ValidationError> {
    if schedule.timezone.is_empty() {
        return Ok((DEFAULT_TZ_NAME.to_string(), Tz::UTC));
    }
    let tz = schedule
        .timezone
        .parse()
        .map_err(|_| ValidationError::InvalidScheduleTimezone {
            schedule: schedule.name.clone(),
            timezone: schedule.timezone.clone(),
        })?;
    Ok((schedule.timezone.clone(), tz))
}

fn build_schedule(raw: RawSchedule, timezone: String, tz: Tz) -> Result<Schedule, ValidationError> {
    let windows = raw
        .windows
        .into_iter()
        .enumerate()
        .map(|(i, w)| build_window(&raw.name, i, w))
        .collect::<Result<Vec<_>, _>>()?;

    if !is_valid_metric_name(&raw.name) || raw.name.starts_with(RESERVED_METRIC_PREFIX) {
        return Err(ValidationError::InvalidMetricName {
            schedule: raw.name.clone(),
            name: raw.name,
        });
    }

    let label_keys = raw.labels.keys().chain(windows.iter().flat_map(|w| w.labels.keys()));
    for label in label_keys {
        if !is_valid_label_name(label) {
            return Err(ValidationError::InvalidLabelName {
                schedule: raw.name.clone(),
                label: label.clone(),
            });
        }
    }

    Ok(Schedule {
        name: raw.name,
        description: raw.description,
        timezone,
        tz,
        default_value: raw.default_value,
        labels: raw.labels,
        windows,
    })
}

fn build_window(schedule: &str, index: usize, raw: RawTimeWindow) -> Result<TimeWindow, ValidationError> {
    tracing::debug!(schedule, window = index, start = %raw.start, end = %raw.end, "Parsing time window");

    let parse = |bound: WindowBound, text: &str| {
        text.parse::<DayOffset>()
            .map_err(|source| ValidationError::InvalidTimeFormat {
                schedule: schedule.to_string(),
                window: index,
                bound,
                raw: text.to_string(),
                source,
            })
    };
    let start = parse(WindowBound::Start, &raw.start)?;
    let end = parse(WindowBound::End, &raw.end)?;

    let days = raw
        .days
        .iter()
        .map(|&day| {
            weekday_from_ordinal(day).ok_or_else(|| ValidationError::InvalidDay {
                schedule: schedule.to_string(),
                window: index,
                day,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if start >= end {
        tracing::warn!(schedule, window = index, %start, %end, "Time window is empty and will never match");
    }

    Ok(TimeWindow {
        value: raw.value,
        start,
        end,
        labels: raw.labels,
        days,
    })
}

/// 0 = Sunday .. 6 = Saturday.
pub fn weekday_from_ordinal(day: i64) -> Option<Weekday> {
    match day {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
pub fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`, excluding the reserved `__` prefix.
pub fn is_valid_label_name(name: &str) -> bool {
    if name.starts_with("__") {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn raw_window(start: &str, end: &str) -> RawTimeWindow {
        RawTimeWindow {
            value: 1.0,
            start: start.into(),
            end: end.into(),
            labels: BTreeMap::new(),
            days: Vec::new(),
        }
    }

    fn raw_schedule(name: &str, timezone: &str, windows: Vec<RawTimeWindow>) -> RawSchedule {
        RawSchedule {
            name: name.into(),
            description: "desc".into(),
            timezone: timezone.into(),
            labels: BTreeMap::new(),
            default_value: 0.5,
            windows,
        }
    }

    #[test]
    fn test_valid_config() {
        let mut peak = raw_window("07:00", "11:00");
        peak.days = vec![2, 3];
        let raw = RawConfig {
            localized_timezones: vec!["Pacific/Auckland".into()],
            schedules: vec![raw_schedule("electricity_price", "Pacific/Auckland", vec![peak])],
        };

        let config = validate_config(raw).unwrap();
        assert_eq!(config.localized_timezones[0].tz, chrono_tz::Pacific::Auckland);
        let schedule = &config.schedules[0];
        assert_eq!(schedule.timezone, "Pacific/Auckland");
        assert_eq!(schedule.windows[0].start, DayOffset::from_hm(7, 0).unwrap());
        assert_eq!(schedule.windows[0].end, DayOffset::from_hm(11, 0).unwrap());
        assert_eq!(schedule.windows[0].days, vec![Weekday::Tue, Weekday::Wed]);
    }

    #[test]
    fn test_empty_timezone_defaults_to_utc() {
        let raw = RawConfig {
            localized_timezones: Vec::new(),
            schedules: vec![raw_schedule("price", "", Vec::new())],
        };
        let config = validate_config(raw).unwrap();
        assert_eq!(config.schedules[0].tz, Tz::UTC);
        assert_eq!(config.schedules[0].timezone, "UTC");
    }

    #[test]
    fn test_invalid_localized_timezone() {
        let raw = RawConfig {
            localized_timezones: vec!["Pacific/Auckland".into(), "Mars/Olympus".into()],
            schedules: Vec::new(),
        };
        assert_eq!(
            validate_config(raw),
            Err(ValidationError::InvalidLocalizedTimezone {
                timezone: "Mars/Olympus".into()
            })
        );
    }

    #[test]
    fn test_duplicate_localized_timezones_collapse() {
        let raw = RawConfig {
            localized_timezones: vec![
                "Pacific/Chatham".into(),
                "UTC".into(),
                "Pacific/Chatham".into(),
            ],
            schedules: Vec::new(),
        };
        let names: Vec<String> = validate_config(raw)
            .unwrap()
            .localized_timezones
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["Pacific/Chatham", "UTC"]);
    }

    #[test]
    fn test_invalid_schedule_timezone() {
        let raw = RawConfig {
            localized_timezones: Vec::new(),
            schedules: vec![raw_schedule("price", "Nowhere/Special", Vec::new())],
        };
        assert_eq!(
            validate_config(raw),
            Err(ValidationError::InvalidScheduleTimezone {
                schedule: "price".into(),
                timezone: "Nowhere/Special".into(),
            })
        );
    }

    #[test]
    fn test_invalid_window_bound_names_field() {
        let raw = RawConfig {
            localized_timezones: Vec::new(),
            schedules: vec![raw_schedule(
                "price",
                "",
                vec![raw_window("07:00", "11:00"), raw_window("11:00", "21:00:00")],
            )],
        };
        match validate_config(raw) {
            Err(ValidationError::InvalidTimeFormat {
                schedule,
                window,
                bound,
                raw,
                ..
            }) => {
                assert_eq!(schedule, "price");
                assert_eq!(window, 1);
                assert_eq!(bound, WindowBound::End);
                assert_eq!(raw, "21:00:00");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_day() {
        let mut w = raw_window("07:00", "11:00");
        w.days = vec![1, 7];
        let raw = RawConfig {
            localized_timezones: Vec::new(),
            schedules: vec![raw_schedule("price", "", vec![w])],
        };
        assert_eq!(
            validate_config(raw),
            Err(ValidationError::InvalidDay {
                schedule: "price".into(),
                window: 0,
                day: 7
            })
        );
    }

    #[test]
    fn test_invalid_names() {
        let raw = RawConfig {
            localized_timezones: Vec::new(),
            schedules: vec![raw_schedule("electricity-price", "", Vec::new())],
        };
        assert!(matches!(
            validate_config(raw),
            Err(ValidationError::InvalidMetricName { .. })
        ));

        let mut schedule = raw_schedule("price", "", Vec::new());
        schedule.labels.insert("power co".into(), "x".into());
        let raw = RawConfig {
            localized_timezones: Vec::new(),
            schedules: vec![schedule],
        };
        assert!(matches!(
            validate_config(raw),
            Err(ValidationError::InvalidLabelName { .. })
        ));
    }

    #[test]
    fn test_reserved_prefix_rejected() {
        for name in ["tou_exporter_localized_minute", "tou_exporter_config_reloads_total"] {
            let raw = RawConfig {
                localized_timezones: vec!["UTC".into()],
                schedules: vec![raw_schedule(name, "", Vec::new())],
            };
            assert_eq!(
                validate_config(raw),
                Err(ValidationError::InvalidMetricName {
                    schedule: name.into(),
                    name: name.into(),
                })
            );
        }

        let raw = RawConfig {
            localized_timezones: vec!["UTC".into()],
            schedules: vec![raw_schedule("tou_exporter", "", Vec::new())],
        };
        assert!(validate_config(raw).is_ok());
    }

    #[test]
    fn test_name_rules() {
        assert!(is_valid_metric_name("tou:price_2"));
        assert!(!is_valid_metric_name("2price"));
        assert!(!is_valid_metric_name(""));
        assert!(is_valid_label_name("_provider"));
        assert!(!is_valid_label_name("__name__"));
        assert!(!is_valid_label_name("a:b"));
    }
}
