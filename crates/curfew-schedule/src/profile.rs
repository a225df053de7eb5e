//! Per-day-type connectivity profiles

use crate::Period;
use curfew_util::TimeOfDay;
use serde::Serialize;
use std::fmt;

/// Whether the network should be reachable at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NetworkState {
    Allowed,
    Forbidden,
}

impl fmt::Display for NetworkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkState::Allowed => write!(f, "allowed"),
            NetworkState::Forbidden => write!(f, "forbidden"),
        }
    }
}

/// The set of allowed windows for one kind of day.
///
/// Evaluation is any-match: a time inside at least one period is allowed,
/// anything else is forbidden. Periods are kept in construction order, so
/// iteration is deterministic; they need not be sorted or disjoint.
#[derive(Debug, Clone, Serialize)]
pub struct DayProfile {
    allowed: Vec<Period>,
}

impl DayProfile {
    pub fn new(allowed: Vec<Period>) -> Self {
        Self { allowed }
    }

    pub fn periods(&self) -> &[Period] {
        &self.allowed
    }

    /// Decide the state for a time of day. Total over its domain; a profile
    /// with no periods forbids everything.
    pub fn state_at(&self, time: TimeOfDay) -> NetworkState {
        if self.allowed.iter().any(|period| period.contains(time)) {
            NetworkState::Allowed
        } else {
            NetworkState::Forbidden
        }
    }
}
