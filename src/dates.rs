use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which end of a range an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "from"),
            Endpoint::End => write!(f, "to"),
        }
    }
}

/// A possibly half-open day interval.
///
/// Either endpoint may be absent while a gesture is in progress. Ordering
/// comparisons only ever look at the calendar day; the time of day stamped
/// onto an endpoint is carried along but never decides which end is earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Self {
        Self { from, to }
    }

    pub fn from_days(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self {
            from: from.map(at_midnight),
            to: to.map(at_midnight),
        }
    }

    pub fn from_single(date: NaiveDate) -> Self {
        Self::from_days(Some(date), Some(date))
    }

    pub fn from_bounds(start: NaiveDate, end: NaiveDate) -> Self {
        Self::from_days(Some(start), Some(end))
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.from.map(|value| value.date())
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.to.map(|value| value.date())
    }

    pub fn endpoint(&self, endpoint: Endpoint) -> Option<NaiveDateTime> {
        match endpoint {
            Endpoint::Start => self.from,
            Endpoint::End => self.to,
        }
    }

    pub fn with_endpoint(self, endpoint: Endpoint, value: Option<NaiveDateTime>) -> Self {
        match endpoint {
            Endpoint::Start => Self { from: value, ..self },
            Endpoint::End => Self { to: value, ..self },
        }
    }

    /// Both endpoints present and `from` falls on a later day than `to`.
    pub fn is_inverted(&self) -> bool {
        matches!((self.start_date(), self.end_date()), (Some(start), Some(end)) if start > end)
    }

    /// Swaps the endpoints (times included) when they are out of order.
    pub fn normalized(self) -> Self {
        if self.is_inverted() {
            Self {
                from: self.to,
                to: self.from,
            }
        } else {
            self
        }
    }

    /// Day-granular equality of both endpoints, used to highlight presets.
    pub fn same_days(&self, other: &DateRange) -> bool {
        match (
            self.start_date(),
            other.start_date(),
            self.end_date(),
            other.end_date(),
        ) {
            (Some(a_from), Some(b_from), Some(a_to), Some(b_to)) => {
                a_from == b_from && a_to == b_to
            }
            _ => false,
        }
    }

    pub fn label(&self, include_time: bool) -> String {
        let from = self
            .from
            .map(|value| format_display(value, include_time))
            .unwrap_or_default();
        let to = self
            .to
            .map(|value| format_display(value, include_time))
            .unwrap_or_default();
        format!("{from} - {to}")
    }
}

pub fn at_midnight(date: NaiveDate) -> NaiveDateTime {
    NaiveDateTime::new(date, NaiveTime::MIN)
}

pub fn same_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date()
}

/// Optional-aware day equality; two absent values never match.
pub fn same_day_opt(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if same_day(a, b))
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month preceding `date`'s month.
///
/// Two months are shown side by side, so centering on this month keeps the
/// anchor date in the right-hand pane.
pub fn previous_month(date: NaiveDate) -> NaiveDate {
    shift_months(date, -1)
}

pub fn shift_months(date: NaiveDate, delta: i32) -> NaiveDate {
    let start = month_start(date);
    let shifted = if delta >= 0 {
        start.checked_add_months(Months::new(delta.unsigned_abs()))
    } else {
        start.checked_sub_months(Months::new(delta.unsigned_abs()))
    };
    shifted.unwrap_or(start)
}

pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| "Invalid date format. Use YYYY-MM-DD.".to_string())
}

pub fn format_display(value: NaiveDateTime, include_time: bool) -> String {
    if include_time {
        value.format("%d %b %Y %H:%M").to_string()
    } else {
        value.format("%d %b %Y").to_string()
    }
}

pub fn format_anchor(value: NaiveDateTime) -> String {
    value.format("%-d %b %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_date_valid() {
        let date = parse_date("2026-02-03").unwrap();
        assert_eq!(date.year(), 2026);
        assert_eq!(date.month(), 2);
        assert_eq!(date.day(), 3);
    }

    #[test]
    fn parse_date_invalid() {
        assert!(parse_date("02-03-2026").is_err());
    }

    #[test]
    fn range_label_contains_both_days() {
        let range = DateRange::from_bounds(day(2026, 1, 1), day(2026, 1, 10));
        let label = range.label(false);
        assert_eq!(label, "01 Jan 2026 - 10 Jan 2026");
    }

    #[test]
    fn label_with_time_appends_hours() {
        let from = day(2026, 1, 1).and_hms_opt(9, 30, 0).unwrap();
        let range = DateRange::new(Some(from), None);
        assert_eq!(range.label(true), "01 Jan 2026 09:30 - ");
    }

    #[test]
    fn ordering_ignores_time_of_day() {
        let from = day(2026, 1, 5).and_hms_opt(23, 0, 0).unwrap();
        let to = day(2026, 1, 5).and_hms_opt(1, 0, 0).unwrap();
        let range = DateRange::new(Some(from), Some(to));
        assert!(!range.is_inverted());
        assert_eq!(range.normalized(), range);
    }

    #[test]
    fn normalized_swaps_inverted_endpoints() {
        let range = DateRange::from_bounds(day(2026, 3, 9), day(2026, 3, 2));
        let fixed = range.normalized();
        assert_eq!(fixed.start_date(), Some(day(2026, 3, 2)));
        assert_eq!(fixed.end_date(), Some(day(2026, 3, 9)));
    }

    #[test]
    fn previous_month_wraps_year() {
        assert_eq!(previous_month(day(2026, 1, 20)), day(2025, 12, 1));
        assert_eq!(shift_months(day(2026, 1, 31), 1), day(2026, 2, 1));
    }

    #[test]
    fn months_between_counts_calendar_months() {
        assert_eq!(months_between(day(2025, 12, 31), day(2026, 1, 1)), 1);
        assert_eq!(months_between(day(2026, 1, 1), day(2026, 1, 31)), 0);
    }

    #[test]
    fn same_days_requires_both_endpoints() {
        let a = DateRange::from_bounds(day(2026, 1, 1), day(2026, 1, 2));
        let b = DateRange::from_days(Some(day(2026, 1, 1)), None);
        assert!(a.same_days(&a));
        assert!(!a.same_days(&b));
    }
}
