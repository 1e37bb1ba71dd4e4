use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::dates::{DateRange, Endpoint};

/// A named shortcut offered next to the calendar grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub label: String,
    pub value: PresetValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetValue {
    Date(NaiveDate),
    Range(DateRange),
}

impl Preset {
    pub fn date(label: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            label: label.into(),
            value: PresetValue::Date(date),
        }
    }

    pub fn range(label: impl Into<String>, range: DateRange) -> Self {
        Self {
            label: label.into(),
            value: PresetValue::Range(range),
        }
    }

    /// The range adopted when the preset is picked.
    pub fn as_range(&self) -> DateRange {
        match &self.value {
            PresetValue::Date(date) => DateRange::from_single(*date),
            PresetValue::Range(range) => *range,
        }
    }

    pub fn matches(&self, current: Option<&DateRange>) -> bool {
        current.is_some_and(|current| current.same_days(&self.as_range()))
    }

    fn checked_days(&self) -> Vec<(Option<Endpoint>, NaiveDate)> {
        match &self.value {
            PresetValue::Date(date) => vec![(None, *date)],
            PresetValue::Range(range) => [
                (Endpoint::Start, range.start_date()),
                (Endpoint::End, range.end_date()),
            ]
            .into_iter()
            .filter_map(|(endpoint, date)| date.map(|date| (Some(endpoint), date)))
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundKind {
    FromYear,
    ToYear,
    FromMonth,
    ToMonth,
    FromDay,
    ToDay,
}

impl BoundKind {
    /// Checking order; the first violation wins.
    pub const ORDER: [BoundKind; 6] = [
        BoundKind::FromYear,
        BoundKind::ToYear,
        BoundKind::FromMonth,
        BoundKind::ToMonth,
        BoundKind::FromDay,
        BoundKind::ToDay,
    ];

    /// The range endpoint this bound limits.
    fn endpoint(&self) -> Endpoint {
        match self {
            BoundKind::FromYear | BoundKind::FromMonth | BoundKind::FromDay => Endpoint::Start,
            BoundKind::ToYear | BoundKind::ToMonth | BoundKind::ToDay => Endpoint::End,
        }
    }

    fn relation(&self) -> &'static str {
        match self {
            BoundKind::FromYear | BoundKind::FromMonth | BoundKind::FromDay => "before",
            BoundKind::ToYear | BoundKind::ToMonth | BoundKind::ToDay => "after",
        }
    }
}

impl fmt::Display for BoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BoundKind::FromYear => "fromYear",
            BoundKind::ToYear => "toYear",
            BoundKind::FromMonth => "fromMonth",
            BoundKind::ToMonth => "toMonth",
            BoundKind::FromDay => "fromDay",
            BoundKind::ToDay => "toDay",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Preset {preset_label}{qualifier} is {relation} {bound} {bound_value}.",
    qualifier = endpoint_qualifier(.endpoint),
    relation = .bound.relation()
)]
pub struct PresetOutOfBoundsError {
    pub preset_label: String,
    pub bound: BoundKind,
    pub bound_value: String,
    /// `None` for single-date presets.
    pub endpoint: Option<Endpoint>,
}

fn endpoint_qualifier(endpoint: &Option<Endpoint>) -> String {
    endpoint
        .map(|endpoint| format!("'s '{endpoint}'"))
        .unwrap_or_default()
}

/// Optional limits on which dates the picker accepts.
///
/// Years compare as numbers; months compare by month of year and days by day
/// of month, so `from_month: 2026-03-01` rejects any January or February.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(default)]
    pub from_year: Option<i32>,
    #[serde(default)]
    pub to_year: Option<i32>,
    #[serde(default)]
    pub from_month: Option<NaiveDate>,
    #[serde(default)]
    pub to_month: Option<NaiveDate>,
    #[serde(default)]
    pub from_day: Option<NaiveDate>,
    #[serde(default)]
    pub to_day: Option<NaiveDate>,
}

impl Bounds {
    pub fn is_empty(&self) -> bool {
        *self == Bounds::default()
    }

    /// The formatted bound value when `date` violates `kind`.
    fn violated(&self, kind: BoundKind, date: NaiveDate) -> Option<String> {
        match kind {
            BoundKind::FromYear => self
                .from_year
                .filter(|year| date.year() < *year)
                .map(|year| year.to_string()),
            BoundKind::ToYear => self
                .to_year
                .filter(|year| date.year() > *year)
                .map(|year| year.to_string()),
            BoundKind::FromMonth => self
                .from_month
                .filter(|month| date.month() < month.month())
                .map(|month| month.format("%b, %Y").to_string()),
            BoundKind::ToMonth => self
                .to_month
                .filter(|month| date.month() > month.month())
                .map(|month| month.format("%b, %Y").to_string()),
            BoundKind::FromDay => self
                .from_day
                .filter(|day| date.day() < day.day())
                .map(|day| day.format("%b %d, %Y").to_string()),
            BoundKind::ToDay => self
                .to_day
                .filter(|day| date.day() > day.day())
                .map(|day| day.format("%b %d, %Y").to_string()),
        }
    }
}

/// Rejects the first preset that falls outside `bounds`.
///
/// Bounds are checked in [`BoundKind::ORDER`]. A date preset is checked
/// against every bound; a range preset checks its `from` against the `from_*`
/// bounds and its `to` against the `to_*` bounds. Absent endpoints are skipped.
pub fn validate(presets: &[Preset], bounds: &Bounds) -> Result<(), PresetOutOfBoundsError> {
    if presets.is_empty() || bounds.is_empty() {
        return Ok(());
    }

    for preset in presets {
        let days = preset.checked_days();
        for kind in BoundKind::ORDER {
            for (endpoint, date) in &days {
                if endpoint.is_some_and(|endpoint| endpoint != kind.endpoint()) {
                    continue;
                }
                if let Some(bound_value) = bounds.violated(kind, *date) {
                    return Err(PresetOutOfBoundsError {
                        preset_label: preset.label.clone(),
                        bound: kind,
                        bound_value,
                        endpoint: *endpoint,
                    });
                }
            }
        }
    }

    Ok(())
}
