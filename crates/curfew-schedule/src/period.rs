//! Allowed time-of-day windows

use curfew_util::TimeOfDay;
use serde::Serialize;
use std::fmt;

/// One contiguous window of the day during which connectivity is allowed.
///
/// Bounds are inclusive at both ends. A period is day-agnostic: it applies
/// to whichever days its profile is attached to, so `contains` compares
/// time-of-day only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl Period {
    /// Returns `None` unless `start <= end`.
    pub const fn new(start: TimeOfDay, end: TimeOfDay) -> Option<Self> {
        if start.as_seconds_from_midnight() <= end.as_seconds_from_midnight() {
            Some(Self { start, end })
        } else {
            None
        }
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    /// Whether `time` falls within this window, inclusive at both bounds.
    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.start <= time && time <= self.end
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tod(hour: u8, minute: u8, second: u8) -> TimeOfDay {
        TimeOfDay::new(hour, minute, second).unwrap()
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(Period::new(tod(10, 0, 0), tod(5, 30, 0)).is_none());
        assert!(Period::new(tod(5, 30, 0), tod(5, 30, 0)).is_some());
    }

    #[test]
    fn membership_is_inclusive_at_both_bounds() {
        let period = Period::new(tod(5, 30, 0), tod(10, 0, 0)).unwrap();

        assert!(period.contains(tod(6, 0, 0)));
        assert!(period.contains(tod(5, 30, 0)));
        assert!(period.contains(tod(10, 0, 0)));

        assert!(!period.contains(tod(10, 0, 1)));
        assert!(!period.contains(tod(5, 29, 59)));
    }

    #[test]
    fn degenerate_period_matches_exactly_one_second() {
        let period = Period::new(tod(12, 0, 0), tod(12, 0, 0)).unwrap();

        assert!(period.contains(tod(12, 0, 0)));
        assert!(!period.contains(tod(11, 59, 59)));
        assert!(!period.contains(tod(12, 0, 1)));
    }

    #[test]
    fn display_format() {
        let period = Period::new(tod(4, 30, 0), tod(20, 0, 0)).unwrap();
        assert_eq!(period.to_string(), "04:30:00-20:00:00");
    }
}
