//! Day-type classification and schedule lookup

use crate::{DayProfile, NetworkState, Period};
use chrono::{Datelike, NaiveDate, Weekday};
use curfew_util::{TimeOfDay, TimePoint};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Classification of a calendar date, driving which profile applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum DayType {
    Week,
    WeekEnd,
    Holiday,
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayType::Week => write!(f, "week"),
            DayType::WeekEnd => write!(f, "weekend"),
            DayType::Holiday => write!(f, "holiday"),
        }
    }
}

/// Errors from schedule evaluation
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The schedule has no profile for a day type the classifier produced.
    /// This is a construction bug: the daemon must stop rather than guess,
    /// since a silent default could leave the network in the wrong state
    /// indefinitely.
    #[error("No profile configured for day type '{0}'")]
    MissingProfile(DayType),
}

/// Maps each day type to its profile and evaluates timestamps against it.
///
/// Backed by a `BTreeMap` so lookup, iteration, and serialized output are
/// deterministic.
#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    profiles: BTreeMap<DayType, DayProfile>,
}

impl Schedule {
    pub fn new(profiles: BTreeMap<DayType, DayProfile>) -> Self {
        Self { profiles }
    }

    pub fn profile(&self, day_type: DayType) -> Option<&DayProfile> {
        self.profiles.get(&day_type)
    }

    /// Classify a calendar date. Saturday and Sunday are weekend days,
    /// everything else is a week day.
    // TODO: classify public holidays once a holiday calendar source exists;
    // until then DayType::Holiday is never returned.
    pub fn classify_day(date: NaiveDate) -> DayType {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => DayType::WeekEnd,
            _ => DayType::Week,
        }
    }

    /// Decide the state at `at`: classify its calendar day, then evaluate
    /// the matching profile against its time-of-day component.
    pub fn state_at(&self, at: &TimePoint) -> Result<NetworkState, ScheduleError> {
        let day_type = Self::classify_day(at.day);
        let profile = self
            .profiles
            .get(&day_type)
            .ok_or(ScheduleError::MissingProfile(day_type))?;
        Ok(profile.state_at(at.time))
    }

    /// The built-in curfew: week days allow 04:30:00-20:00:00, weekend days
    /// allow 05:30:00-10:00:00 and 12:00:00-18:00:00, holidays follow the
    /// weekend profile. All times UTC.
    pub fn default_curfew() -> Self {
        let weekend = DayProfile::new(vec![
            period(tod(5, 30, 0), tod(10, 0, 0)),
            period(tod(12, 0, 0), tod(18, 0, 0)),
        ]);

        let week = DayProfile::new(vec![period(tod(4, 30, 0), tod(20, 0, 0))]);

        let mut profiles = BTreeMap::new();
        profiles.insert(DayType::Week, week);
        profiles.insert(DayType::Holiday, weekend.clone());
        profiles.insert(DayType::WeekEnd, weekend);

        Self::new(profiles)
    }
}

const fn tod(hour: u8, minute: u8, second: u8) -> TimeOfDay {
    match TimeOfDay::new(hour, minute, second) {
        Some(t) => t,
        None => panic!("invalid time-of-day literal"),
    }
}

const fn period(start: TimeOfDay, end: TimeOfDay) -> Period {
    match Period::new(start, end) {
        Some(p) => p,
        None => panic!("invalid period literal"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn at(day: NaiveDate, hour: u8, minute: u8, second: u8) -> TimePoint {
        TimePoint::new(day, TimeOfDay::new(hour, minute, second).unwrap())
    }

    #[test]
    fn classifies_weekdays_and_weekends() {
        // 2026-02-09 is a Monday
        assert_eq!(Schedule::classify_day(date(2026, 2, 9)), DayType::Week);
        assert_eq!(Schedule::classify_day(date(2026, 2, 10)), DayType::Week);
        assert_eq!(Schedule::classify_day(date(2026, 2, 13)), DayType::Week);
        assert_eq!(Schedule::classify_day(date(2026, 2, 14)), DayType::WeekEnd);
        assert_eq!(Schedule::classify_day(date(2026, 2, 15)), DayType::WeekEnd);
    }

    #[test]
    fn default_curfew_week_day() {
        let schedule = Schedule::default_curfew();
        let tuesday = date(2026, 2, 10);

        assert_eq!(
            schedule.state_at(&at(tuesday, 12, 0, 0)).unwrap(),
            NetworkState::Allowed
        );
        assert_eq!(
            schedule.state_at(&at(tuesday, 21, 0, 0)).unwrap(),
            NetworkState::Forbidden
        );
        // Inclusive window bounds
        assert_eq!(
            schedule.state_at(&at(tuesday, 4, 30, 0)).unwrap(),
            NetworkState::Allowed
        );
        assert_eq!(
            schedule.state_at(&at(tuesday, 20, 0, 0)).unwrap(),
            NetworkState::Allowed
        );
        assert_eq!(
            schedule.state_at(&at(tuesday, 20, 0, 1)).unwrap(),
            NetworkState::Forbidden
        );
    }

    #[test]
    fn default_curfew_weekend_day() {
        let schedule = Schedule::default_curfew();
        let saturday = date(2026, 2, 14);

        assert_eq!(
            schedule.state_at(&at(saturday, 12, 0, 0)).unwrap(),
            NetworkState::Allowed
        );
        // Gap between the morning and afternoon windows
        assert_eq!(
            schedule.state_at(&at(saturday, 11, 0, 0)).unwrap(),
            NetworkState::Forbidden
        );
        assert_eq!(
            schedule.state_at(&at(saturday, 6, 0, 0)).unwrap(),
            NetworkState::Allowed
        );
        assert_eq!(
            schedule.state_at(&at(saturday, 19, 0, 0)).unwrap(),
            NetworkState::Forbidden
        );
    }

    #[test]
    fn holiday_profile_matches_weekend() {
        let schedule = Schedule::default_curfew();

        let holiday = schedule.profile(DayType::Holiday).unwrap();
        let weekend = schedule.profile(DayType::WeekEnd).unwrap();

        assert_eq!(holiday.periods(), weekend.periods());
    }

    #[test]
    fn missing_profile_is_a_loud_error() {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            DayType::WeekEnd,
            DayProfile::new(vec![period(tod(12, 0, 0), tod(18, 0, 0))]),
        );
        let schedule = Schedule::new(profiles);

        // Tuesday classifies as Week, which has no profile
        let result = schedule.state_at(&at(date(2026, 2, 10), 12, 0, 0));
        assert!(matches!(
            result,
            Err(ScheduleError::MissingProfile(DayType::Week))
        ));
    }

    #[test]
    fn schedule_serializes_with_day_type_keys() {
        let schedule = Schedule::default_curfew();
        let json = serde_json::to_value(&schedule).unwrap();

        assert!(json["profiles"]["Week"]["allowed"].is_array());
        assert!(json["profiles"]["WeekEnd"]["allowed"].is_array());
        assert!(json["profiles"]["Holiday"]["allowed"].is_array());
    }
}
