use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Predicate describing days the calendar must not offer.
///
/// The serialized form is what appears under `disabled_days` in the config
/// file, e.g. `{"before": "2026-01-01"}` or `{"days_of_week": ["Sat", "Sun"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateMatcher {
    /// Exactly one calendar day.
    Day(NaiveDate),
    /// Any day in the list.
    Days(Vec<NaiveDate>),
    /// Inclusive span. With no `to` only `from` itself matches.
    Range {
        from: NaiveDate,
        #[serde(default)]
        to: Option<NaiveDate>,
    },
    /// Every day strictly before the given day.
    Before(NaiveDate),
    /// Every day strictly after the given day.
    After(NaiveDate),
    /// Days strictly between `after` and `before`; when `after` is not earlier
    /// than `before` the interval flips to "outside".
    Interval { after: NaiveDate, before: NaiveDate },
    DaysOfWeek(Vec<Weekday>),
    Always,
}

impl DateMatcher {
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            DateMatcher::Day(day) => *day == date,
            DateMatcher::Days(days) => days.contains(&date),
            DateMatcher::Range { from, to } => match to {
                Some(to) if from <= to => (*from..=*to).contains(&date),
                Some(to) => (*to..=*from).contains(&date),
                None => *from == date,
            },
            DateMatcher::Before(day) => date < *day,
            DateMatcher::After(day) => date > *day,
            DateMatcher::Interval { after, before } => {
                let is_after = date > *after;
                let is_before = date < *before;
                if before > after {
                    is_after && is_before
                } else {
                    is_after || is_before
                }
            }
            DateMatcher::DaysOfWeek(days) => days.contains(&date.weekday()),
            DateMatcher::Always => true,
        }
    }
}

/// True when any matcher in the set disables `date`.
pub fn is_disabled(matchers: &[DateMatcher], date: NaiveDate) -> bool {
    matchers.iter().any(|matcher| matcher.matches(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn before_and_after_are_exclusive() {
        let before = DateMatcher::Before(day(2026, 1, 5));
        assert!(before.matches(day(2026, 1, 4)));
        assert!(!before.matches(day(2026, 1, 5)));

        let after = DateMatcher::After(day(2026, 1, 5));
        assert!(after.matches(day(2026, 1, 6)));
        assert!(!after.matches(day(2026, 1, 5)));
    }

    #[test]
    fn range_is_inclusive_and_order_agnostic() {
        let range = DateMatcher::Range {
            from: day(2026, 1, 10),
            to: Some(day(2026, 1, 3)),
        };
        assert!(range.matches(day(2026, 1, 3)));
        assert!(range.matches(day(2026, 1, 10)));
        assert!(!range.matches(day(2026, 1, 11)));

        let open = DateMatcher::Range {
            from: day(2026, 1, 10),
            to: None,
        };
        assert!(open.matches(day(2026, 1, 10)));
        assert!(!open.matches(day(2026, 1, 11)));
    }

    #[test]
    fn interval_closed_and_outside() {
        let closed = DateMatcher::Interval {
            after: day(2026, 1, 1),
            before: day(2026, 1, 5),
        };
        assert!(closed.matches(day(2026, 1, 3)));
        assert!(!closed.matches(day(2026, 1, 1)));
        assert!(!closed.matches(day(2026, 1, 5)));

        let outside = DateMatcher::Interval {
            after: day(2026, 1, 5),
            before: day(2026, 1, 1),
        };
        assert!(outside.matches(day(2025, 12, 31)));
        assert!(outside.matches(day(2026, 1, 6)));
        assert!(!outside.matches(day(2026, 1, 3)));
    }

    #[test]
    fn weekends_match_by_weekday() {
        let weekends = DateMatcher::DaysOfWeek(vec![Weekday::Sat, Weekday::Sun]);
        assert!(weekends.matches(day(2026, 2, 7)));
        assert!(!weekends.matches(day(2026, 2, 9)));
    }

    #[test]
    fn any_matcher_disables() {
        let set = vec![DateMatcher::Day(day(2026, 1, 1)), DateMatcher::Days(vec![day(2026, 1, 9)])];
        assert!(is_disabled(&set, day(2026, 1, 9)));
        assert!(!is_disabled(&set, day(2026, 1, 2)));
        assert!(!is_disabled(&[], day(2026, 1, 2)));
        assert!(is_disabled(&[DateMatcher::Always], day(1999, 1, 1)));
    }

    #[test]
    fn deserializes_from_config_shape() {
        let parsed: Vec<DateMatcher> = serde_json::from_str(
            r#"[{"before":"2026-01-01"},{"days_of_week":["Sat","Sun"]},{"range":{"from":"2026-03-01","to":"2026-03-04"}},"always"]"#,
        )
        .unwrap();
        assert_eq!(parsed[0], DateMatcher::Before(day(2026, 1, 1)));
        assert_eq!(parsed[1], DateMatcher::DaysOfWeek(vec![Weekday::Sat, Weekday::Sun]));
        assert_eq!(parsed[3], DateMatcher::Always);
    }
}
