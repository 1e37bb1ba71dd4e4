use chrono::{Duration as ChronoDuration, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};
use log::{debug, warn};
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};

use rangepick::config::{Align, ThemePreference, Translations};
use rangepick::dates::{month_start, shift_months};
use rangepick::surface::CalendarSurface;
use rangepick::{DateRange, Effect, Endpoint, Engine, Event, TimeOfDay};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Closed,
    Picker,
    TimeInput(Endpoint),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerFocus {
    Calendar,
    Presets,
}

pub struct App {
    pub should_quit: bool,
    pub mode: Mode,
    pub focus: PickerFocus,
    pub status: Option<String>,
    pub input: String,
    pub engine: Engine,
    pub surface: CalendarSurface,
    pub preset_state: ListState,
    pub translations: Translations,
    pub align: Align,
    pub theme: ThemePreference,
    pub show_help: bool,
    applied: Option<DateRange>,
    toast: Option<Toast>,
}

pub struct AppSettings {
    pub translations: Translations,
    pub align: Align,
    pub theme: ThemePreference,
    pub enable_year_navigation: bool,
    pub disable_navigation: bool,
}

impl App {
    pub fn new(engine: Engine, settings: AppSettings) -> Self {
        let mut preset_state = ListState::default();
        if !engine.presets().is_empty() {
            preset_state.select(Some(0));
        }
        let applied = engine.session().committed;
        let surface = CalendarSurface::new(
            engine.today(),
            settings.enable_year_navigation,
            settings.disable_navigation,
        );

        App {
            should_quit: false,
            mode: Mode::Closed,
            focus: PickerFocus::Calendar,
            status: None,
            input: String::new(),
            engine,
            surface,
            preset_state,
            translations: settings.translations,
            align: settings.align,
            theme: settings.theme,
            show_help: false,
            applied,
            toast: None,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if self.show_help {
            match key.code {
                KeyCode::Char('h') | KeyCode::Char('?') | KeyCode::Esc => self.show_help = false,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match self.mode {
            Mode::Closed => self.handle_closed_input(key),
            Mode::Picker => match self.focus {
                PickerFocus::Calendar => self.handle_calendar_input(key),
                PickerFocus::Presets => self.handle_preset_input(key),
            },
            Mode::TimeInput(endpoint) => self.handle_time_input(endpoint, key),
        }
    }

    /// The last applied range, printed on exit.
    pub fn take_applied(&mut self) -> Option<DateRange> {
        self.applied.take()
    }

    fn handle_closed_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('h') | KeyCode::Char('?') => self.show_help = true,
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('o') => self.open_picker(),
            _ => {}
        }
    }

    fn handle_calendar_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('h') | KeyCode::Char('?') => self.show_help = true,
            KeyCode::Left => self.move_cursor(-1),
            KeyCode::Right => self.move_cursor(1),
            KeyCode::Up => self.move_cursor(-7),
            KeyCode::Down => self.move_cursor(7),
            KeyCode::PageUp | KeyCode::Char('[') => self.navigate(-1),
            KeyCode::PageDown | KeyCode::Char(']') => self.navigate(1),
            KeyCode::Char('{') => self.navigate(-12),
            KeyCode::Char('}') => self.navigate(12),
            KeyCode::Enter | KeyCode::Char(' ') => self.click_cursor(),
            KeyCode::Char('s') => self.dispatch(Event::StartAnchor),
            KeyCode::Char('e') => self.dispatch(Event::EndAnchor),
            KeyCode::Char('t') => self.enter_time_input(Endpoint::Start),
            KeyCode::Char('T') => self.enter_time_input(Endpoint::End),
            KeyCode::Char('a') => self.dispatch(Event::Apply),
            KeyCode::Char('r') => self.dispatch(Event::Reset),
            KeyCode::Char('c') | KeyCode::Esc => self.dispatch(Event::Cancel),
            KeyCode::Tab => {
                if !self.engine.presets().is_empty() {
                    self.focus = PickerFocus::Presets;
                }
            }
            _ => {}
        }
    }

    fn handle_preset_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up => self.select_previous_preset(),
            KeyCode::Down => self.select_next_preset(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(index) = self.preset_state.selected() {
                    let effects = self.engine.select_preset(index);
                    self.after_dispatch(effects);
                }
            }
            KeyCode::Tab => self.focus = PickerFocus::Calendar,
            KeyCode::Char('a') => self.dispatch(Event::Apply),
            KeyCode::Char('c') | KeyCode::Esc => self.dispatch(Event::Cancel),
            _ => {}
        }
    }

    fn handle_time_input(&mut self, endpoint: Endpoint, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let value = self.input.trim();
                let time = if value.is_empty() {
                    None
                } else {
                    match TimeOfDay::parse(value) {
                        Ok(time) => Some(time),
                        Err(err) => {
                            self.status = Some(err.to_string());
                            return;
                        }
                    }
                };
                self.input.clear();
                self.mode = Mode::Picker;
                self.status = None;
                self.dispatch(Event::TimeChange(endpoint, time));
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(ch) => {
                if ch.is_ascii_digit() || ch == ':' {
                    self.input.push(ch);
                }
            }
            KeyCode::Esc => {
                self.input.clear();
                self.status = None;
                self.mode = Mode::Picker;
            }
            _ => {}
        }
    }

    fn open_picker(&mut self) {
        self.dispatch(Event::Open);
        self.mode = Mode::Picker;
        self.focus = PickerFocus::Calendar;
        self.status = None;
        self.surface.cursor = self
            .engine
            .session()
            .committed
            .and_then(|range| range.start_date())
            .unwrap_or_else(|| self.engine.today());
        self.surface.clamp_to(self.engine.session().month);
    }

    fn enter_time_input(&mut self, endpoint: Endpoint) {
        if !self.engine.show_time_picker() {
            return;
        }
        let held = match endpoint {
            Endpoint::Start => self.engine.session().start_time,
            Endpoint::End => self.engine.session().end_time,
        };
        self.input = held.map(|time| time.to_string()).unwrap_or_default();
        self.mode = Mode::TimeInput(endpoint);
    }

    fn click_cursor(&mut self) {
        let disabled = self.engine.disabled_days();
        let shown = self.engine.session().displayed().copied();
        match self.surface.click(shown.as_ref(), &disabled) {
            Some(raw) => self.dispatch(Event::Select(raw)),
            None => debug!("{} is disabled", self.surface.cursor),
        }
    }

    fn move_cursor(&mut self, days: i64) {
        self.surface.move_days(days);
        let month = self.engine.session().month;
        let last_visible = shift_months(month, 2) - ChronoDuration::days(1);
        let cursor = self.surface.cursor;

        let target = if cursor < month {
            Some(month_start(cursor))
        } else if cursor > last_visible {
            Some(shift_months(cursor, -1))
        } else {
            None
        };

        if let Some(target) = target {
            let delta = if target < month { -1 } else { 1 };
            match self.surface.navigate(month, delta) {
                Some(_) => self.dispatch(Event::MonthChange(target)),
                None => self.surface.clamp_to(month),
            }
        }
    }

    fn navigate(&mut self, delta: i32) {
        let month = self.engine.session().month;
        match self.surface.navigate(month, delta) {
            Some(target) => {
                self.dispatch(Event::MonthChange(target));
                self.surface.clamp_to(target);
            }
            None if delta.abs() >= 12 && !self.surface.disable_navigation => {
                self.status = Some("Year navigation is off.".to_string());
            }
            None => self.status = Some("Navigation is disabled.".to_string()),
        }
    }

    fn dispatch(&mut self, event: Event) {
        let effects = self.engine.dispatch(event);
        self.after_dispatch(effects);
    }

    fn after_dispatch(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Changed(range) => {
                    let message = match range {
                        Some(range) => {
                            format!("Applied {}", range.label(self.engine.show_time_picker()))
                        }
                        None => "Applied empty range.".to_string(),
                    };
                    self.set_toast(message, false);
                    self.applied = range;
                }
                Effect::Blurred => {
                    self.mode = Mode::Closed;
                    self.focus = PickerFocus::Calendar;
                }
            }
        }

        if self.mode != Mode::Closed {
            self.surface.clamp_to(self.engine.session().month);
        }
    }

    fn select_previous_preset(&mut self) {
        let len = self.engine.presets().len();
        if len == 0 {
            return;
        }
        let selected = self.preset_state.selected().unwrap_or(0);
        let new_index = if selected == 0 { len - 1 } else { selected - 1 };
        self.preset_state.select(Some(new_index));
    }

    fn select_next_preset(&mut self) {
        let len = self.engine.presets().len();
        if len == 0 {
            return;
        }
        let selected = self.preset_state.selected().unwrap_or(0);
        let new_index = if selected + 1 >= len { 0 } else { selected + 1 };
        self.preset_state.select(Some(new_index));
    }

    /// Keeps "today" current for sessions left open across midnight.
    pub fn tick(&mut self, today: NaiveDate) {
        if today != self.engine.today() {
            warn!("date rolled over to {today}");
            self.engine.set_today(today);
        }
    }

    pub fn active_toast(&mut self) -> Option<ToastView> {
        let toast = self.toast.as_ref()?;
        if toast.created_at.elapsed() > Duration::from_secs(2) {
            self.toast = None;
            return None;
        }
        Some(ToastView {
            message: toast.message.clone(),
            is_error: toast.is_error,
        })
    }

    fn set_toast(&mut self, message: impl Into<String>, is_error: bool) {
        self.toast = Some(Toast {
            message: message.into(),
            created_at: Instant::now(),
            is_error,
        });
    }
}

struct Toast {
    message: String,
    created_at: Instant,
    is_error: bool,
}

pub struct ToastView {
    pub message: String,
    pub is_error: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use rangepick::{EngineOptions, Phase, Preset};

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app(options: EngineOptions) -> App {
        let engine = Engine::new(options, day(2, 14)).unwrap();
        App::new(
            engine,
            AppSettings {
                translations: Translations::default(),
                align: Align::Center,
                theme: ThemePreference::Terminal,
                enable_year_navigation: false,
                disable_navigation: false,
            },
        )
    }

    #[test]
    fn two_clicks_then_apply() {
        let mut app = app(EngineOptions::default());
        app.handle_key_event(key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Picker);
        assert_eq!(app.surface.cursor, day(2, 14));

        for _ in 0..4 {
            app.handle_key_event(key(KeyCode::Left));
        }
        app.handle_key_event(key(KeyCode::Enter));
        assert_eq!(app.engine.session().phase, Phase::PickingEnd);

        app.handle_key_event(key(KeyCode::Right));
        app.handle_key_event(key(KeyCode::Right));
        app.handle_key_event(key(KeyCode::Enter));
        assert_eq!(app.engine.session().phase, Phase::Settled);

        app.handle_key_event(key(KeyCode::Char('a')));
        assert_eq!(app.mode, Mode::Closed);
        assert_eq!(
            app.take_applied(),
            Some(DateRange::from_bounds(day(2, 10), day(2, 12)))
        );
    }

    #[test]
    fn settled_calendar_ignores_clicks() {
        let mut app = app(EngineOptions::default());
        app.handle_key_event(key(KeyCode::Enter));
        app.handle_key_event(key(KeyCode::Enter));
        app.handle_key_event(key(KeyCode::Enter));
        let settled = app.engine.session().clone();
        assert_eq!(settled.phase, Phase::Settled);

        app.handle_key_event(key(KeyCode::Right));
        app.handle_key_event(key(KeyCode::Enter));
        assert_eq!(app.engine.session().committed, settled.committed);
    }

    #[test]
    fn escape_cancels_back_to_default() {
        let default_value = DateRange::from_bounds(day(2, 1), day(2, 7));
        let mut app = app(EngineOptions {
            default_value: Some(default_value),
            ..EngineOptions::default()
        });
        app.handle_key_event(key(KeyCode::Enter));
        app.handle_key_event(key(KeyCode::Char('e')));
        app.handle_key_event(key(KeyCode::Right));
        app.handle_key_event(key(KeyCode::Enter));
        app.handle_key_event(key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Closed);
        assert_eq!(app.engine.session().committed, Some(default_value));
    }

    #[test]
    fn preset_pick_from_list() {
        let week = DateRange::from_bounds(day(2, 7), day(2, 14));
        let mut app = app(EngineOptions {
            presets: vec![Preset::date("Valentine", day(2, 14)), Preset::range("Week", week)],
            ..EngineOptions::default()
        });
        app.handle_key_event(key(KeyCode::Enter));
        app.handle_key_event(key(KeyCode::Tab));
        assert_eq!(app.focus, PickerFocus::Presets);
        app.handle_key_event(key(KeyCode::Down));
        app.handle_key_event(key(KeyCode::Enter));
        assert_eq!(app.engine.session().committed, Some(week));
        assert!(app.engine.preset_matches(1));
    }

    #[test]
    fn time_input_requires_time_picker() {
        let mut app = app(EngineOptions::default());
        app.handle_key_event(key(KeyCode::Enter));
        app.handle_key_event(key(KeyCode::Char('t')));
        assert_eq!(app.mode, Mode::Picker);
    }

    #[test]
    fn time_input_rejects_bad_value() {
        let mut app = app(EngineOptions {
            show_time_picker: true,
            ..EngineOptions::default()
        });
        app.handle_key_event(key(KeyCode::Enter));
        app.handle_key_event(key(KeyCode::Char('t')));
        assert_eq!(app.mode, Mode::TimeInput(Endpoint::Start));
        assert_eq!(app.input, "00:00");
        app.handle_key_event(key(KeyCode::Backspace));
        app.handle_key_event(key(KeyCode::Char('9')));
        app.handle_key_event(key(KeyCode::Char('9')));
        app.handle_key_event(key(KeyCode::Enter));
        assert!(app.status.is_some());
        assert_eq!(app.mode, Mode::TimeInput(Endpoint::Start));
    }
}
