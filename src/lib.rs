//! Date-range picking logic.
//!
//! - **engine**: the selection state machine and the [`Engine`] wrapper
//! - **selection**: translation of calendar clicks into unambiguous picks
//! - **disabled**: matcher set offered back to the calendar
//! - **preset**: named shortcuts and their bound validation
//! - **time**: time-of-day stamping
//! - **surface**: a keyboard calendar that behaves like a range-mode web calendar
//! - **config**: JSON configuration file

pub mod config;
pub mod dates;
pub mod disabled;
pub mod engine;
pub mod matcher;
pub mod preset;
pub mod selection;
pub mod surface;
pub mod time;

pub use dates::{DateRange, Endpoint};
pub use engine::{EditMode, Effect, Engine, EngineOptions, Event, Phase, SelectionSession};
pub use matcher::DateMatcher;
pub use preset::{Bounds, Preset, PresetOutOfBoundsError};
pub use selection::RawSelection;
pub use time::TimeOfDay;
