use chrono::{NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("Invalid time `{0}`. Use HH:MM.")]
    Format(String),

    #[error("Hour `{0}` is out of range")]
    Hour(u32),

    #[error("Minute `{0}` is out of range")]
    Minute(u32),
}

/// Hour and minute attached to one endpoint of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(NaiveTime::MIN);

    pub fn new(hour: u32, minute: u32) -> Result<Self, TimeParseError> {
        if hour > 23 {
            return Err(TimeParseError::Hour(hour));
        }
        if minute > 59 {
            return Err(TimeParseError::Minute(minute));
        }
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(TimeOfDay)
            .ok_or_else(|| TimeParseError::Format(format!("{hour}:{minute}")))
    }

    /// The hour and minute already carried by `value`.
    pub fn of(value: NaiveDateTime) -> Self {
        NaiveTime::from_hms_opt(value.hour(), value.minute(), 0)
            .map(TimeOfDay)
            .unwrap_or(Self::MIDNIGHT)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn parse(value: &str) -> Result<Self, TimeParseError> {
        let trimmed = value.trim();
        let (hour, minute) = trimmed
            .split_once(':')
            .ok_or_else(|| TimeParseError::Format(trimmed.to_string()))?;
        let hour = hour
            .parse::<u32>()
            .map_err(|_| TimeParseError::Format(trimmed.to_string()))?;
        let minute = minute
            .parse::<u32>()
            .map_err(|_| TimeParseError::Format(trimmed.to_string()))?;
        Self::new(hour, minute)
    }
}

impl Default for TimeOfDay {
    fn default() -> Self {
        Self::MIDNIGHT
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Same calendar day as `date`, hour and minute from `time` (midnight when
/// absent). Call once per endpoint; the two endpoints are stamped
/// independently.
pub fn stamp(date: NaiveDateTime, time: Option<TimeOfDay>) -> NaiveDateTime {
    let time = time.unwrap_or(TimeOfDay::MIDNIGHT);
    NaiveDateTime::new(date.date(), time.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 4, 12)
            .unwrap()
            .and_hms_opt(h, m, 41)
            .unwrap()
    }

    #[test]
    fn stamp_replaces_hour_and_minute_only() {
        let time = TimeOfDay::new(14, 5).unwrap();
        let stamped = stamp(at(3, 20), Some(time));
        assert_eq!(stamped.date(), at(0, 0).date());
        assert_eq!(stamped.hour(), 14);
        assert_eq!(stamped.minute(), 5);
    }

    #[test]
    fn stamp_without_time_is_midnight() {
        let stamped = stamp(at(8, 45), None);
        assert_eq!(stamped.time(), NaiveTime::MIN);
    }

    #[test]
    fn parse_accepts_hh_mm() {
        let time = TimeOfDay::parse(" 07:30 ").unwrap();
        assert_eq!(time.hour(), 7);
        assert_eq!(time.minute(), 30);
        assert_eq!(time.to_string(), "07:30");
    }

    #[test]
    fn parse_rejects_out_of_range() {
        assert_eq!(TimeOfDay::parse("24:00"), Err(TimeParseError::Hour(24)));
        assert_eq!(TimeOfDay::parse("10:60"), Err(TimeParseError::Minute(60)));
        assert!(matches!(TimeOfDay::parse("noon"), Err(TimeParseError::Format(_))));
    }

    #[test]
    fn of_drops_seconds() {
        let time = TimeOfDay::of(at(9, 15));
        assert_eq!(time, TimeOfDay::new(9, 15).unwrap());
    }
}
