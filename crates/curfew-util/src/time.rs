//! Time types for curfewd
//!
//! All wall-clock time in curfewd is UTC: the clock source below and every
//! schedule window literal share the same reference, so evaluation never
//! mixes time zones.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `CURFEWD_MOCK_TIME` environment variable can be set
//! to override the system time for all time-sensitive operations. This is
//! useful for exercising schedule windows without waiting for them.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2026-02-14 19:59:50`), interpreted
//! as UTC.
//!
//! Example:
//! ```bash
//! CURFEWD_MOCK_TIME="2026-02-14 19:59:50" cargo run
//! ```

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc, Weekday};
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "CURFEWD_MOCK_TIME";

/// Cached mock time offset from the real time when the process started.
/// This allows mock time to advance naturally.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

fn mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                match NaiveDateTime::parse_from_str(&mock_time_str, "%Y-%m-%d %H:%M:%S") {
                    Ok(naive_dt) => {
                        let mock_dt = naive_dt.and_utc();
                        let real_now = Utc::now();
                        let offset = mock_dt.signed_duration_since(real_now);
                        tracing::info!(
                            mock_time = %mock_time_str,
                            offset_secs = offset.num_seconds(),
                            "Mock time enabled"
                        );
                        return Some(offset);
                    }
                    Err(_) => {
                        tracing::warn!(
                            mock_time = %mock_time_str,
                            expected_format = "%Y-%m-%d %H:%M:%S",
                            "Invalid mock time format"
                        );
                    }
                }
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    mock_time_offset().is_some()
}

/// Get the current UTC time, respecting mock time settings in debug builds.
///
/// In release builds, this always returns the real system time.
/// In debug builds, if `CURFEWD_MOCK_TIME` is set, this returns a time
/// that advances from the mock time at the same rate as real time.
pub fn now() -> DateTime<Utc> {
    let real_now = Utc::now();

    if let Some(offset) = mock_time_offset() {
        real_now + offset
    } else {
        real_now
    }
}

/// A clock time within one day, second resolution.
///
/// Ordered by seconds since midnight. Schedule windows are expressed purely
/// in `TimeOfDay` so they apply to every day their profile covers, never to
/// one fixed calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl TimeOfDay {
    pub const fn new(hour: u8, minute: u8, second: u8) -> Option<Self> {
        if hour < 24 && minute < 60 && second < 60 {
            Some(Self {
                hour,
                minute,
                second,
            })
        } else {
            None
        }
    }

    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
            second: time.second() as u8,
        }
    }

    pub fn to_naive_time(self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour as u32, self.minute as u32, self.second as u32)
    }

    /// Returns seconds since midnight
    pub const fn as_seconds_from_midnight(&self) -> u32 {
        (self.hour as u32) * 3600 + (self.minute as u32) * 60 + self.second as u32
    }
}

impl PartialOrd for TimeOfDay {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeOfDay {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_seconds_from_midnight()
            .cmp(&other.as_seconds_from_midnight())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// A calendar date plus a time of day, in UTC.
///
/// Ordered by date first, then time of day. Produced by the clock source at
/// evaluation time; schedule windows never carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TimePoint {
    pub day: NaiveDate,
    pub time: TimeOfDay,
}

impl TimePoint {
    pub fn new(day: NaiveDate, time: TimeOfDay) -> Self {
        Self { day, time }
    }

    /// Split a UTC timestamp into its calendar day and time-of-day parts.
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        Self {
            day: dt.date_naive(),
            time: TimeOfDay::from_naive_time(dt.time()),
        }
    }

    pub fn weekday(&self) -> Weekday {
        self.day.weekday()
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.time)
    }
}
