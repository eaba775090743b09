//! In-day offsets and the `HH:MM` time-bound grammar.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::Timelike;
use thiserror::Error;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Errors produced when a time bound does not follow the `HH:MM` grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("invalid time format, must be hh:mm, got {0:?}")]
    Format(String),

    #[error("invalid hour {0:?}, must be a number from 0 to 23")]
    Hour(String),

    #[error("invalid minute {0:?}, must be a number from 0 to 59")]
    Minute(String),
}

/// Duration since local midnight.
///
/// Parsed bounds are always within `[00:00, 23:59]`. Offsets taken from a
/// wall-clock reading keep sub-second precision so that `00:00:00.000000001`
/// sorts after a `00:00` bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DayOffset(Duration);

impl DayOffset {
    /// Build an offset from hour and minute, rejecting out-of-range parts.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self(Duration::from_secs(
            u64::from(hour) * SECS_PER_HOUR + u64::from(minute) * SECS_PER_MINUTE,
        )))
    }

    /// Offset of a wall-clock reading from its own midnight.
    pub fn of_time<T: Timelike>(time: &T) -> Self {
        // chrono encodes a leap second as nanosecond >= 1e9; clamp it into the last second.
        let nanos = time.nanosecond().min(NANOS_PER_SEC - 1);
        Self(Duration::new(u64::from(time.num_seconds_from_midnight()), nanos))
    }

    pub fn hour(&self) -> u32 {
        (self.0.as_secs() / SECS_PER_HOUR) as u32
    }

    pub fn minute(&self) -> u32 {
        ((self.0.as_secs() % SECS_PER_HOUR) / SECS_PER_MINUTE) as u32
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl FromStr for DayOffset {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hh, mm) = s
            .split_once(':')
            .filter(|(_, mm)| !mm.contains(':'))
            .ok_or_else(|| TimeParseError::Format(s.to_string()))?;

        let hour = parse_part(hh)
            .filter(|h| *h <= 23)
            .ok_or_else(|| TimeParseError::Hour(hh.to_string()))?;
        let minute = parse_part(mm)
            .filter(|m| *m <= 59)
            .ok_or_else(|| TimeParseError::Minute(mm.to_string()))?;

        Self::from_hm(hour, minute).ok_or_else(|| TimeParseError::Format(s.to_string()))
    }
}

/// One or two ASCII digits. Signs and whitespace are rejected.
fn parse_part(part: &str) -> Option<u32> {
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl fmt::Display for DayOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}
