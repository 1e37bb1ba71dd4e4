use chrono::NaiveDate;

/// What the calendar surface reports after one gesture.
///
/// A range-mode calendar hands back an optional, possibly partial range and
/// cannot tell a one-day pick from a two-day pick. [`RawSelection::from_surface`]
/// sorts that out once so the engine never looks at the raw shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawSelection {
    /// The surface cleared its selection (usually a click on an endpoint).
    None,
    /// `from` and `to` land on the same day.
    SingleDay(NaiveDate),
    /// Only `from` is set.
    PartialRange(NaiveDate),
    FullRange(NaiveDate, NaiveDate),
}

impl RawSelection {
    pub fn from_surface(range: Option<(Option<NaiveDate>, Option<NaiveDate>)>) -> Self {
        match range {
            None => RawSelection::None,
            Some((Some(from), Some(to))) if from == to => RawSelection::SingleDay(from),
            Some((Some(from), Some(to))) => RawSelection::FullRange(from, to),
            Some((Some(from), None)) => RawSelection::PartialRange(from),
            // A `to` without a `from` is never produced by a range click; the
            // engine treats it like a one-sided pick of that day.
            Some((None, Some(to))) => RawSelection::PartialRange(to),
            Some((None, None)) => RawSelection::None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, RawSelection::None)
    }

    pub fn from(&self) -> Option<NaiveDate> {
        match self {
            RawSelection::None => None,
            RawSelection::SingleDay(day) | RawSelection::PartialRange(day) => Some(*day),
            RawSelection::FullRange(from, _) => Some(*from),
        }
    }

    pub fn to(&self) -> Option<NaiveDate> {
        match self {
            RawSelection::None | RawSelection::PartialRange(_) => None,
            RawSelection::SingleDay(day) => Some(*day),
            RawSelection::FullRange(_, to) => Some(*to),
        }
    }

    /// `to` when present, otherwise `from`.
    pub fn latest_pick(&self) -> Option<NaiveDate> {
        self.to().or_else(|| self.from())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    #[test]
    fn same_day_range_is_single_day() {
        let raw = RawSelection::from_surface(Some((Some(day(4)), Some(day(4)))));
        assert_eq!(raw, RawSelection::SingleDay(day(4)));
        assert_eq!(raw.from(), Some(day(4)));
        assert_eq!(raw.to(), Some(day(4)));
    }

    #[test]
    fn partial_and_full_ranges() {
        assert_eq!(
            RawSelection::from_surface(Some((Some(day(4)), None))),
            RawSelection::PartialRange(day(4))
        );
        let full = RawSelection::from_surface(Some((Some(day(4)), Some(day(9)))));
        assert_eq!(full, RawSelection::FullRange(day(4), day(9)));
        assert_eq!(full.latest_pick(), Some(day(9)));
    }

    #[test]
    fn cleared_selection_is_none() {
        assert!(RawSelection::from_surface(None).is_none());
        assert!(RawSelection::from_surface(Some((None, None))).is_none());
        assert_eq!(RawSelection::None.latest_pick(), None);
    }
}
