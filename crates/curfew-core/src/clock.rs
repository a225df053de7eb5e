//! Clock abstraction

use curfew_util::TimePoint;
use std::sync::Mutex;

/// Supplies the current time to the switch.
///
/// One canonical reference end-to-end: implementations must return UTC,
/// the same reference the schedule literals use.
pub trait Clock: Send + Sync {
    fn now(&self) -> TimePoint;
}

/// Production clock over the UTC time source in `curfew-util` (which
/// honors `CURFEWD_MOCK_TIME` in debug builds).
#[derive(Debug, Default)]
pub struct UtcClock;

impl Clock for UtcClock {
    fn now(&self) -> TimePoint {
        TimePoint::from_datetime(&curfew_util::now())
    }
}

/// Settable clock for tests: ticks only when told to.
pub struct ManualClock {
    now: Mutex<TimePoint>,
}

impl ManualClock {
    pub fn new(now: TimePoint) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: TimePoint) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> TimePoint {
        *self.now.lock().unwrap()
    }
}
