//! Projection of a configuration snapshot onto metric observations.
//!
//! # Responsibilities
//! - Describe every series a snapshot can produce
//! - Collect one pass of observations for a single captured instant
//!
//! # Design Decisions
//! - The caller captures `now` once, in UTC; every localized timezone and
//!   every schedule is derived from that same instant
//! - A series that cannot be emitted is skipped on its own; the rest of the
//!   pass is unaffected

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Month, Timelike, Utc, Weekday};
use chrono_tz::Tz;

use crate::schedule::matcher::evaluate;
use crate::schedule::model::{GlobalConfig, LocalizedTimezone, TZ_LABEL};

pub const LOCALIZED_MINUTE: &str = "tou_exporter_localized_minute";
pub const LOCALIZED_HOUR: &str = "tou_exporter_localized_hour";
pub const LOCALIZED_DAY_OF_WEEK: &str = "tou_exporter_localized_day_of_week";
pub const LOCALIZED_DAY_OF_MONTH: &str = "tou_exporter_localized_day_of_month";
pub const LOCALIZED_MONTH: &str = "tou_exporter_localized_month";

/// Static shape of a metric series.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub name: String,
    pub help: String,
}

/// One gauge reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub name: String,
    pub labels: Vec<(String, String)>,
    pub value: f64,
}

impl Observation {
    fn new(name: &str, labels: Vec<(String, String)>, value: f64) -> Self {
        Self {
            name: name.to_string(),
            labels,
            value,
        }
    }
}

fn localized_descriptors() -> [Descriptor; 5] {
    let d = |name: &str, help: &str| Descriptor {
        name: name.to_string(),
        help: help.to_string(),
    };
    [
        d(LOCALIZED_MINUTE, "Minute of the hour from 0-59 in a specific timezone"),
        d(LOCALIZED_HOUR, "Hour of the day from 0-23 in a specific timezone"),
        d(
            LOCALIZED_DAY_OF_WEEK,
            "Day of the week from 0-6 in a specific timezone. 0 is Sunday.",
        ),
        d(LOCALIZED_DAY_OF_MONTH, "Day of the month from 1-31 in a specific timezone"),
        d(LOCALIZED_MONTH, "Month of the year from 1-12 in a specific timezone"),
    ]
}

/// Describes and collects the series of one configuration snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Collector<'a> {
    config: &'a GlobalConfig,
}

impl<'a> Collector<'a> {
    pub fn new(config: &'a GlobalConfig) -> Self {
        Self { config }
    }

    /// Every series this snapshot can emit.
    pub fn describe(&self) -> Vec<Descriptor> {
        let mut descriptors = localized_descriptors().to_vec();
        descriptors.extend(self.config.schedules.iter().map(|s| Descriptor {
            name: s.name.clone(),
            help: s.description.clone(),
        }));
        descriptors
    }

    /// Observations for the instant `now`.
    pub fn collect(&self, now: DateTime<Utc>) -> Vec<Observation> {
        let mut observations =
            Vec::with_capacity(self.config.localized_timezones.len() * 5 + self.config.schedules.len());

        for localized in &self.config.localized_timezones {
            observations.extend(localized_facts(localized, now));
        }

        let mut seen: HashSet<(String, Vec<(String, String)>)> = HashSet::new();
        for schedule in &self.config.schedules {
            let local = now.with_timezone(&schedule.tz);
            let evaluation = evaluate(schedule, &local);
            let labels: Vec<(String, String)> = evaluation.labels.into_iter().collect();

            if !seen.insert((schedule.name.clone(), labels.clone())) {
                tracing::warn!(
                    schedule = %schedule.name,
                    "Skipping duplicate series, another schedule already emitted the same name and labels"
                );
                continue;
            }

            tracing::trace!(
                schedule = %schedule.name,
                value = evaluation.value,
                matched = evaluation.window.is_some(),
                "Evaluated schedule"
            );
            observations.push(Observation {
                name: schedule.name.clone(),
                labels,
                value: evaluation.value,
            });
        }

        observations
    }
}

fn localized_facts(localized: &LocalizedTimezone, now: DateTime<Utc>) -> [Observation; 5] {
    let local: DateTime<Tz> = now.with_timezone(&localized.tz);
    let tz = || (TZ_LABEL.to_string(), localized.name.clone());
    let weekday = local.weekday();
    let month = month_name(local.month());

    [
        Observation::new(LOCALIZED_MINUTE, vec![tz()], f64::from(local.minute())),
        Observation::new(LOCALIZED_HOUR, vec![tz()], f64::from(local.hour())),
        Observation::new(
            LOCALIZED_DAY_OF_WEEK,
            vec![tz(), ("day".to_string(), weekday_name(weekday).to_string())],
            f64::from(weekday.num_days_from_sunday()),
        ),
        Observation::new(LOCALIZED_DAY_OF_MONTH, vec![tz()], f64::from(local.day())),
        Observation::new(
            LOCALIZED_MONTH,
            vec![tz(), ("month".to_string(), month.to_string())],
            f64::from(local.month()),
        ),
    ]
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or("", |m| m.name())
}
