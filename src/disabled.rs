use chrono::NaiveDate;

use crate::engine::EditMode;
use crate::matcher::DateMatcher;

/// Caller matchers plus whatever the current selection phase implies.
///
/// A settled range makes the whole grid inert until an anchor is clicked
/// again; while editing the end, days before the start cannot be picked.
pub fn compose(
    caller: &[DateMatcher],
    mode: EditMode,
    has_user_selected_range: bool,
    is_selecting_end_date: bool,
    temp_from: Option<NaiveDate>,
) -> Vec<DateMatcher> {
    let mut matchers = caller.to_vec();

    if mode == EditMode::None && has_user_selected_range && !is_selecting_end_date {
        matchers.push(DateMatcher::Always);
    }

    if mode == EditMode::EditingEnd {
        if let Some(from) = temp_from {
            matchers.push(DateMatcher::Before(from));
        }
    }

    matchers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::is_disabled;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    #[test]
    fn caller_matchers_pass_through_unchanged() {
        let caller = vec![DateMatcher::Day(day(9))];
        let set = compose(&caller, EditMode::None, false, false, None);
        assert_eq!(set, caller);
    }

    #[test]
    fn settled_range_disables_everything() {
        let set = compose(&[], EditMode::None, true, false, Some(day(5)));
        assert_eq!(set, vec![DateMatcher::Always]);
        assert!(is_disabled(&set, day(31)));
    }

    #[test]
    fn picking_end_keeps_grid_live() {
        let set = compose(&[], EditMode::None, true, true, Some(day(5)));
        assert!(set.is_empty());
    }

    #[test]
    fn editing_end_blocks_days_before_start() {
        let set = compose(&[], EditMode::EditingEnd, true, false, Some(day(5)));
        assert!(is_disabled(&set, day(3)));
        assert!(!is_disabled(&set, day(5)));
        assert!(!is_disabled(&set, day(20)));
    }

    #[test]
    fn editing_end_without_start_adds_nothing() {
        let set = compose(&[], EditMode::EditingEnd, false, false, None);
        assert!(set.is_empty());
    }

    #[test]
    fn editing_start_adds_nothing() {
        let caller = vec![DateMatcher::After(day(28))];
        let set = compose(&caller, EditMode::EditingStart, true, false, Some(day(5)));
        assert_eq!(set, caller);
    }
}
