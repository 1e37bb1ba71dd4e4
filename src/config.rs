use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::dates::DateRange;
use crate::engine::EngineOptions;
use crate::matcher::DateMatcher;
use crate::preset::{Bounds, Preset};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Home directory not found")]
    NoHome,

    #[error("Failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(serde_json::Error),

    #[error("Preset `{0}` needs exactly one of `date` or `date_range`")]
    PresetShape(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Terminal,
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Start,
    #[default]
    Center,
    End,
}

/// Labels for the action buttons and time fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Translations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

impl Translations {
    pub fn apply(&self) -> &str {
        self.apply.as_deref().unwrap_or("Apply")
    }

    pub fn cancel(&self) -> &str {
        self.cancel.as_deref().unwrap_or("Cancel")
    }

    pub fn reset(&self) -> &str {
        self.reset.as_deref().unwrap_or("Clear")
    }

    pub fn start(&self) -> &str {
        self.start.as_deref().unwrap_or("Start")
    }

    pub fn end(&self) -> &str {
        self.end.as_deref().unwrap_or("End")
    }

    pub fn range(&self) -> &str {
        self.range.as_deref().unwrap_or("Range")
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RangeEntry {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl From<RangeEntry> for DateRange {
    fn from(value: RangeEntry) -> Self {
        DateRange::from_days(value.from, value.to)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresetEntry {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<RangeEntry>,
}

impl TryFrom<&PresetEntry> for Preset {
    type Error = ConfigError;

    fn try_from(value: &PresetEntry) -> Result<Self, Self::Error> {
        match (value.date, value.date_range) {
            (Some(date), None) => Ok(Preset::date(value.label.clone(), date)),
            (None, Some(range)) => Ok(Preset::range(value.label.clone(), range.into())),
            _ => Err(ConfigError::PresetShape(value.label.clone())),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickerConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub presets: Vec<PresetEntry>,
    #[serde(flatten)]
    pub bounds: Bounds,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled_days: Vec<DateMatcher>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<RangeEntry>,
    #[serde(default)]
    pub show_time_picker: bool,
    #[serde(default)]
    pub enable_year_navigation: bool,
    #[serde(default)]
    pub disable_navigation: bool,
    #[serde(default)]
    pub translations: Translations,
    #[serde(default)]
    pub align: Align,
    #[serde(default)]
    pub theme: ThemePreference,
}

impl PickerConfig {
    pub fn engine_options(&self) -> Result<EngineOptions, ConfigError> {
        let presets = self
            .presets
            .iter()
            .map(Preset::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EngineOptions {
            presets,
            bounds: self.bounds.clone(),
            disabled_days: self.disabled_days.clone(),
            default_value: self.default_value.map(DateRange::from),
            value: None,
            show_time_picker: self.show_time_picker,
        })
    }

    /// Presets relative to `today`, written by `--init`.
    pub fn starter(today: NaiveDate) -> Self {
        let week_ago = today - Duration::days(7);
        let month_start = today.with_day(1).unwrap_or(today);
        Self {
            presets: vec![
                PresetEntry {
                    label: "Today".to_string(),
                    date: None,
                    date_range: Some(RangeEntry {
                        from: Some(today),
                        to: Some(today),
                    }),
                },
                PresetEntry {
                    label: "Last 7 days".to_string(),
                    date: None,
                    date_range: Some(RangeEntry {
                        from: Some(week_ago),
                        to: Some(today),
                    }),
                },
                PresetEntry {
                    label: "This month".to_string(),
                    date: None,
                    date_range: Some(RangeEntry {
                        from: Some(month_start),
                        to: Some(today),
                    }),
                },
            ],
            default_value: Some(RangeEntry {
                from: Some(week_ago),
                to: Some(today),
            }),
            ..Self::default()
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".rangepick.json");
    Some(path)
}

pub fn log_path() -> Option<PathBuf> {
    let mut path = dirs::cache_dir()?;
    path.push("rangepick.log");
    Some(path)
}

/// Loads `explicit` if given, else the default path. Only a missing default
/// file falls back to an empty config.
pub fn read_config(explicit: Option<&Path>) -> Result<PickerConfig, ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (config_path().ok_or(ConfigError::NoHome)?, false),
    };

    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(PickerConfig::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    parse_config(&contents).map_err(|source| ConfigError::Parse { path, source })
}

pub fn parse_config(contents: &str) -> Result<PickerConfig, serde_json::Error> {
    serde_json::from_str(contents)
}

pub fn write_config(path: &Path, config: &PickerConfig) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(config).map_err(ConfigError::Serialize)?;
    fs::write(path, json).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::PresetValue;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_object_is_default() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, PickerConfig::default());
        assert_eq!(config.align, Align::Center);
        assert!(config.bounds.is_empty());
    }

    #[test]
    fn parses_full_config() {
        let config = parse_config(
            r#"{
                "presets": [
                    {"label": "Launch", "date": "2026-03-01"},
                    {"label": "Q1", "date_range": {"from": "2026-01-01", "to": "2026-03-31"}}
                ],
                "from_year": 2020,
                "to_day": "2026-01-28",
                "disabled_days": [{"after": "2026-12-31"}],
                "default_value": {"from": "2026-02-01", "to": "2026-02-07"},
                "show_time_picker": true,
                "translations": {"apply": "ตกลง"},
                "align": "end",
                "theme": "dark"
            }"#,
        )
        .unwrap();

        assert_eq!(config.bounds.from_year, Some(2020));
        assert_eq!(config.bounds.to_day, Some(day(2026, 1, 28)));
        assert_eq!(config.translations.apply(), "ตกลง");
        assert_eq!(config.translations.cancel(), "Cancel");
        assert_eq!(config.align, Align::End);
        assert_eq!(config.theme, ThemePreference::Dark);

        let options = config.engine_options().unwrap();
        assert_eq!(options.presets.len(), 2);
        assert_eq!(options.presets[0].value, PresetValue::Date(day(2026, 3, 1)));
        assert_eq!(
            options.default_value,
            Some(DateRange::from_bounds(day(2026, 2, 1), day(2026, 2, 7)))
        );
        assert!(options.show_time_picker);
        assert_eq!(options.disabled_days, vec![DateMatcher::After(day(2026, 12, 31))]);
    }

    #[test]
    fn preset_needs_exactly_one_value() {
        let config = parse_config(r#"{"presets": [{"label": "Nothing"}]}"#).unwrap();
        let err = config.engine_options().unwrap_err();
        assert!(matches!(err, ConfigError::PresetShape(label) if label == "Nothing"));
    }

    #[test]
    fn write_failure_is_reported_as_write_error() {
        let missing = std::env::temp_dir()
            .join("rangepick-missing-dir")
            .join("nested")
            .join("config.json");
        let err = write_config(&missing, &PickerConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Write { ref path, .. } if *path == missing));
        assert!(err.to_string().starts_with("Failed to write"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_config(r#"{"presets": 3}"#).is_err());
    }

    #[test]
    fn starter_config_survives_serialization() {
        let starter = PickerConfig::starter(day(2026, 2, 14));
        let json = serde_json::to_string_pretty(&starter).unwrap();
        let parsed = parse_config(&json).unwrap();
        assert_eq!(parsed, starter);
        assert_eq!(parsed.presets[2].date_range.unwrap().from, Some(day(2026, 2, 1)));
    }
}
