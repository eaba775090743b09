//! Time window matching and label resolution.
//!
//! # Responsibilities
//! - Find the active window of a schedule for a local wall-clock reading
//! - Resolve the reported value (window value or schedule default)
//! - Overlay labels: `tz` < schedule labels < active window labels
//!
//! # Design Decisions
//! - No timezone conversion here; callers pass a reading already in the
//!   schedule's zone
//! - First matching window in declared order wins, overlaps are not reported
//! - Windows never wrap past midnight

use chrono::{Datelike, Timelike};

use crate::schedule::model::{Labels, Schedule, TimeWindow, TZ_LABEL};
use crate::schedule::offset::DayOffset;

/// Result of evaluating one schedule at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<'a> {
    /// The window that matched, if any.
    pub window: Option<&'a TimeWindow>,
    pub value: f64,
    pub labels: Labels,
}

/// Find the first window of `schedule` active at `local`.
pub fn active_window<'a, T>(schedule: &'a Schedule, local: &T) -> Option<&'a TimeWindow>
where
    T: Datelike + Timelike,
{
    let weekday = local.weekday();
    let now = DayOffset::of_time(local);
    schedule.windows.iter().find(|w| w.is_active(weekday, now))
}

/// Evaluate `schedule` at `local`, which must already be in the schedule's timezone.
pub fn evaluate<'a, T>(schedule: &'a Schedule, local: &T) -> Evaluation<'a>
where
    T: Datelike + Timelike,
{
    let window = active_window(schedule, local);

    let mut labels = Labels::new();
    labels.insert(TZ_LABEL.to_string(), schedule.timezone.clone());
    labels.extend(schedule.labels.iter().map(|(k, v)| (k.clone(), v.clone())));
    if let Some(w) = window {
        labels.extend(w.labels.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    Evaluation {
        window,
        value: window.map_or(schedule.default_value, |w| w.value),
        labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::model::DEFAULT_TZ_NAME;
    use chrono::{NaiveDate, TimeZone, Utc, Weekday};
    use chrono_tz::Tz;

    fn window(value: f64, start: &str, end: &str) -> TimeWindow {
        TimeWindow {
            value,
            start: start.parse().unwrap(),
            end: end.parse().unwrap(),
            labels: Labels::new(),
            days: Vec::new(),
        }
    }

    fn schedule(default_value: f64, windows: Vec<TimeWindow>) -> Schedule {
        Schedule {
            name: "test".into(),
            description: "test description".into(),
            timezone: DEFAULT_TZ_NAME.into(),
            tz: Tz::UTC,
            default_value,
            labels: Labels::new(),
            windows,
        }
    }

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, 0)
            .unwrap()
    }

    #[test]
    fn test_end_boundary_returns_default() {
        let s = schedule(123.0, vec![window(456.0, "11:59", "12:01")]);

        let eval = evaluate(&s, &at(2023, 12, 1, 12, 1));
        assert_eq!(eval.value, 123.0);
        assert!(eval.window.is_none());

        let eval = evaluate(&s, &at(2023, 12, 1, 12, 0));
        assert_eq!(eval.value, 456.0);
        assert!(eval.window.is_some());
    }

    #[test]
    fn test_adjacent_windows_start_boundary_wins() {
        let s = schedule(
            123.0,
            vec![window(456.0, "07:00", "12:00"), window(789.0, "12:00", "17:00")],
        );
        assert_eq!(evaluate(&s, &at(2023, 12, 1, 12, 0)).value, 789.0);
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        let s = schedule(
            0.0,
            vec![window(1.0, "08:00", "18:00"), window(2.0, "09:00", "10:00")],
        );
        assert_eq!(evaluate(&s, &at(2023, 12, 1, 9, 30)).value, 1.0);
    }

    #[test]
    fn test_late_night_boundaries() {
        let s = schedule(-1.0, vec![window(0.0, "23:57", "23:59")]);
        assert_eq!(evaluate(&s, &at(2023, 12, 9, 23, 57)).value, 0.0);
        assert_eq!(evaluate(&s, &at(2023, 12, 9, 23, 58)).value, 0.0);
        assert_eq!(evaluate(&s, &at(2023, 12, 9, 23, 59)).value, -1.0);
    }

    #[test]
    fn test_zero_windows_reports_default() {
        let mut s = schedule(42.0, Vec::new());
        s.labels.insert("provider".into(), "Power Co".into());
        let eval = evaluate(&s, &at(2023, 12, 1, 3, 0));
        assert_eq!(eval.value, 42.0);
        assert_eq!(
            eval.labels,
            Labels::from([
                ("provider".to_string(), "Power Co".to_string()),
                ("tz".to_string(), "UTC".to_string()),
            ])
        );
    }

    #[test]
    fn test_days_filter() {
        let mut w = window(5.0, "07:00", "11:00");
        w.days = vec![Weekday::Tue, Weekday::Wed];
        let s = schedule(1.0, vec![w]);

        // 2023-12-04 is a Monday.
        for (day, expected) in [(3, 1.0), (4, 1.0), (5, 5.0), (6, 5.0), (7, 1.0), (8, 1.0), (9, 1.0)] {
            assert_eq!(
                evaluate(&s, &at(2023, 12, day, 8, 0)).value,
                expected,
                "2023-12-{day:02}"
            );
        }
    }

    #[test]
    fn test_window_labels_override_base() {
        let mut w = window(1.0, "11:00", "13:00");
        w.labels.insert("foo".into(), "baz".into());
        let mut s = schedule(0.0, vec![w]);
        s.labels.insert("foo".into(), "bar".into());
        s.labels.insert("baz".into(), "qux".into());

        let inside = evaluate(&s, &at(2023, 12, 13, 12, 0));
        assert_eq!(inside.labels.get("foo").map(String::as_str), Some("baz"));
        assert_eq!(inside.labels.get("baz").map(String::as_str), Some("qux"));
        assert_eq!(inside.labels.get("tz").map(String::as_str), Some("UTC"));

        let outside = evaluate(&s, &at(2023, 12, 13, 14, 0));
        assert_eq!(outside.labels.get("foo").map(String::as_str), Some("bar"));
    }

    #[test]
    fn test_base_labels_can_override_tz() {
        let mut s = schedule(0.0, Vec::new());
        s.labels.insert("tz".into(), "local".into());
        let eval = evaluate(&s, &at(2023, 12, 13, 12, 0));
        assert_eq!(eval.labels.get("tz").map(String::as_str), Some("local"));
    }

    #[test]
    fn test_timezone_changes_selected_window() {
        let mut chatham = schedule(0.0, vec![window(1.0, "09:00", "10:00")]);
        chatham.tz = chrono_tz::Pacific::Chatham;
        chatham.timezone = "Pacific/Chatham".into();
        let utc = schedule(0.0, vec![window(1.0, "09:00", "10:00")]);

        // 09:48 on 1 Feb in Chatham (UTC+13:45 during daylight time).
        let instant = Utc.with_ymd_and_hms(2023, 1, 31, 20, 3, 4).unwrap();
        assert_eq!(evaluate(&chatham, &instant.with_timezone(&chatham.tz)).value, 1.0);
        assert_eq!(evaluate(&utc, &instant.with_timezone(&utc.tz)).value, 0.0);
    }

    #[test]
    fn test_just_after_midnight_in_chatham() {
        let s = schedule(0.0, vec![window(1.0, "00:00", "00:01")]);
        let local = chrono_tz::Pacific::Chatham
            .with_ymd_and_hms(2023, 12, 9, 0, 0, 0)
            .unwrap()
            + chrono::Duration::nanoseconds(1);
        assert_eq!(evaluate(&s, &local).value, 1.0);
    }
}
