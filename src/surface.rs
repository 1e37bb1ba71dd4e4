use chrono::{Datelike, Duration, NaiveDate};

use crate::dates::{DateRange, month_start, shift_months};
use crate::matcher::{DateMatcher, is_disabled};
use crate::selection::RawSelection;

/// Range-mode click pairing as done by common web calendar widgets.
///
/// `selected` is whatever range the calendar currently shows. The result is
/// the calendar's new selection: clicking an existing `from` clears it,
/// clicking an existing `to` restarts from that day, and otherwise the nearer
/// endpoint moves.
pub fn add_to_range(
    day: NaiveDate,
    selected: Option<&DateRange>,
) -> Option<(Option<NaiveDate>, Option<NaiveDate>)> {
    let (from, to) = selected
        .map(|range| (range.start_date(), range.end_date()))
        .unwrap_or((None, None));

    match (from, to) {
        (Some(from), Some(to)) => {
            if to == day && from == day {
                None
            } else if to == day {
                Some((Some(to), None))
            } else if from == day {
                None
            } else if from > day {
                Some((Some(day), Some(to)))
            } else {
                Some((Some(from), Some(day)))
            }
        }
        (None, Some(to)) => {
            if day > to {
                Some((Some(to), Some(day)))
            } else {
                Some((Some(day), Some(to)))
            }
        }
        (Some(from), None) => {
            if day < from {
                Some((Some(day), Some(from)))
            } else {
                Some((Some(from), Some(day)))
            }
        }
        (None, None) => Some((Some(day), None)),
    }
}

/// Keyboard-driven two-month calendar standing in for the external surface.
#[derive(Debug, Clone)]
pub struct CalendarSurface {
    pub cursor: NaiveDate,
    pub enable_year_navigation: bool,
    pub disable_navigation: bool,
}

impl CalendarSurface {
    pub fn new(cursor: NaiveDate, enable_year_navigation: bool, disable_navigation: bool) -> Self {
        Self {
            cursor,
            enable_year_navigation,
            disable_navigation,
        }
    }

    pub fn move_days(&mut self, days: i64) {
        self.cursor += Duration::days(days);
    }

    /// Keeps the cursor inside the two visible months starting at `month`.
    pub fn clamp_to(&mut self, month: NaiveDate) {
        let first = month_start(month);
        let last = shift_months(first, 2) - Duration::days(1);
        if self.cursor < first {
            self.cursor = first;
        } else if self.cursor > last {
            self.cursor = last;
        }
    }

    /// The month to show after a navigation request, or `None` when the
    /// request is not allowed.
    pub fn navigate(&self, month: NaiveDate, delta: i32) -> Option<NaiveDate> {
        if self.disable_navigation {
            return None;
        }
        if delta.abs() >= 12 && !self.enable_year_navigation {
            return None;
        }
        Some(shift_months(month, delta))
    }

    /// Pairs a click on the cursor day with the shown selection. Disabled
    /// days are not clickable.
    pub fn click(&self, shown: Option<&DateRange>, disabled: &[DateMatcher]) -> Option<RawSelection> {
        if is_disabled(disabled, self.cursor) {
            return None;
        }
        Some(RawSelection::from_surface(add_to_range(self.cursor, shown)))
    }

    pub fn cursor_label(&self) -> String {
        format!("{} {}", self.cursor.format("%a %d %b"), self.cursor.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    #[test]
    fn first_click_starts_partial_range() {
        assert_eq!(add_to_range(day(5), None), Some((Some(day(5)), None)));
    }

    #[test]
    fn clicking_existing_from_clears() {
        let range = DateRange::from_bounds(day(5), day(20));
        assert_eq!(add_to_range(day(5), Some(&range)), None);
    }

    #[test]
    fn clicking_existing_to_restarts_there() {
        let range = DateRange::from_bounds(day(5), day(20));
        assert_eq!(add_to_range(day(20), Some(&range)), Some((Some(day(20)), None)));
    }

    #[test]
    fn inside_click_moves_end_and_outside_click_moves_start() {
        let range = DateRange::from_bounds(day(5), day(20));
        assert_eq!(
            add_to_range(day(10), Some(&range)),
            Some((Some(day(5)), Some(day(10))))
        );
        assert_eq!(
            add_to_range(day(2), Some(&range)),
            Some((Some(day(2)), Some(day(20))))
        );
    }

    #[test]
    fn same_day_on_open_range_closes_it() {
        let range = DateRange::from_days(Some(day(5)), None);
        assert_eq!(
            add_to_range(day(5), Some(&range)),
            Some((Some(day(5)), Some(day(5))))
        );
    }

    #[test]
    fn disabled_cursor_does_not_click() {
        let surface = CalendarSurface::new(day(3), false, false);
        let disabled = vec![DateMatcher::Before(day(5))];
        assert_eq!(surface.click(None, &disabled), None);
        assert_eq!(
            surface.click(None, &[]),
            Some(RawSelection::PartialRange(day(3)))
        );
    }

    #[test]
    fn navigation_respects_flags() {
        let locked = CalendarSurface::new(day(3), true, true);
        assert_eq!(locked.navigate(day(1), 1), None);

        let monthly = CalendarSurface::new(day(3), false, false);
        assert_eq!(monthly.navigate(day(1), -12), None);
        assert_eq!(
            monthly.navigate(day(1), 1),
            NaiveDate::from_ymd_opt(2026, 2, 1)
        );
    }

    #[test]
    fn clamp_keeps_cursor_in_visible_months() {
        let mut surface = CalendarSurface::new(day(3), false, false);
        surface.clamp_to(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(surface.cursor, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        surface.cursor = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
        surface.clamp_to(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(surface.cursor, NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
    }
}
