use chrono::NaiveDate;
use log::{debug, info};

use crate::dates::{
    DateRange, Endpoint, at_midnight, format_anchor, month_start, months_between, previous_month,
    same_day_opt,
};
use crate::disabled;
use crate::matcher::DateMatcher;
use crate::preset::{self, Bounds, Preset, PresetOutOfBoundsError};
use crate::selection::RawSelection;
use crate::time::{self, TimeOfDay};

/// Which endpoint of an existing range is being revised through its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    None,
    EditingStart,
    EditingEnd,
}

/// Where the picker is within a selection gesture.
///
/// The editing phases remember whether a range was already produced in this
/// session so that finishing the edit lands back in the right resting phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    PickingEnd,
    Settled,
    EditingStart { selected: bool },
    EditingEnd { selected: bool },
}

impl Phase {
    fn resting(selected: bool) -> Self {
        if selected { Phase::Settled } else { Phase::Idle }
    }

    pub fn edit_mode(&self) -> EditMode {
        match self {
            Phase::EditingStart { .. } => EditMode::EditingStart,
            Phase::EditingEnd { .. } => EditMode::EditingEnd,
            Phase::Idle | Phase::PickingEnd | Phase::Settled => EditMode::None,
        }
    }

    pub fn is_selecting_end_date(&self) -> bool {
        matches!(self, Phase::PickingEnd)
    }

    pub fn has_user_selected_range(&self) -> bool {
        match self {
            Phase::Idle => false,
            Phase::PickingEnd | Phase::Settled => true,
            Phase::EditingStart { selected } | Phase::EditingEnd { selected } => *selected,
        }
    }
}

/// Everything one open picker owns. Replaced wholesale by [`step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSession {
    pub committed: Option<DateRange>,
    pub temp: Option<DateRange>,
    pub phase: Phase,
    /// First day of the left-hand visible month.
    pub month: NaiveDate,
    pub start_time: Option<TimeOfDay>,
    pub end_time: Option<TimeOfDay>,
    pub open: bool,
}

impl SelectionSession {
    pub fn new(value: Option<DateRange>, today: NaiveDate) -> Self {
        let (start_time, end_time) = held_times(value.as_ref());
        Self {
            committed: value,
            temp: value,
            phase: Phase::Idle,
            month: closed_month(value.as_ref(), today),
            start_time,
            end_time,
            open: false,
        }
    }

    pub fn edit_mode(&self) -> EditMode {
        self.phase.edit_mode()
    }

    /// Temp while an anchor edit is running, committed otherwise.
    pub fn displayed(&self) -> Option<&DateRange> {
        if self.edit_mode() == EditMode::None {
            self.committed.as_ref()
        } else {
            self.temp.as_ref()
        }
    }

    pub fn disabled_days(&self, caller: &[DateMatcher]) -> Vec<DateMatcher> {
        disabled::compose(
            caller,
            self.edit_mode(),
            self.phase.has_user_selected_range(),
            self.phase.is_selecting_end_date(),
            self.temp.as_ref().and_then(DateRange::start_date),
        )
    }

    fn with_range(&self, range: DateRange) -> Self {
        Self {
            committed: Some(range),
            temp: Some(range),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Open,
    /// Popover dismissed without pressing apply.
    Close,
    Select(RawSelection),
    Preset(DateRange),
    StartAnchor,
    EndAnchor,
    TimeChange(Endpoint, Option<TimeOfDay>),
    Apply,
    Cancel,
    Reset,
    MonthChange(NaiveDate),
    /// The controlled `value` changed from outside.
    Sync(Option<DateRange>),
}

/// Notifications for the enclosing form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Changed(Option<DateRange>),
    Blurred,
}

/// Inputs a transition reads but never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Env {
    pub default_value: Option<DateRange>,
    pub today: NaiveDate,
    pub show_time_picker: bool,
}

pub fn step(session: &SelectionSession, event: Event, env: &Env) -> (SelectionSession, Vec<Effect>) {
    match event {
        Event::Open => (open(session), Vec::new()),
        Event::Close => {
            if session.open {
                cancel(session, env)
            } else {
                (session.clone(), Vec::new())
            }
        }
        Event::Select(raw) => (select(session, raw, env), Vec::new()),
        Event::Preset(range) => (pick_preset(session, range), Vec::new()),
        Event::StartAnchor => (anchor(session, Endpoint::Start), Vec::new()),
        Event::EndAnchor => (anchor(session, Endpoint::End), Vec::new()),
        Event::TimeChange(endpoint, time) => (change_time(session, endpoint, time), Vec::new()),
        Event::Apply => apply(session, env),
        Event::Cancel => cancel(session, env),
        Event::Reset => (reset(session, env), Vec::new()),
        Event::MonthChange(month) => (
            SelectionSession {
                month: month_start(month),
                ..session.clone()
            },
            Vec::new(),
        ),
        Event::Sync(value) => (sync(session, value, env), Vec::new()),
    }
}

fn open(session: &SelectionSession) -> SelectionSession {
    if session.open {
        return session.clone();
    }
    SelectionSession {
        temp: session.committed,
        phase: Phase::Idle,
        open: true,
        ..session.clone()
    }
}

fn select(session: &SelectionSession, raw: RawSelection, env: &Env) -> SelectionSession {
    let committed = session.committed.unwrap_or_default();

    let next = match session.phase {
        Phase::EditingStart { selected } => {
            // Re-clicking the current start surfaces the real pick in `to`.
            let pick = if same_day_opt(raw.from().map(at_midnight), committed.from) {
                raw.to()
            } else {
                raw.from()
            };

            let Some(day) = pick else {
                let mut next = SelectionSession {
                    phase: Phase::EditingEnd { selected },
                    ..session.clone()
                };
                if let Some(to) = committed.to {
                    next.month = previous_month(to.date());
                }
                return next;
            };

            let start = at_midnight(day);
            let end = match committed.to {
                Some(to) if day > to.date() => Some(start),
                other => other,
            };
            let mut next = session.with_range(DateRange::new(Some(start), end));
            next.phase = Phase::EditingEnd { selected };
            if let Some(end) = end {
                next.month = previous_month(end.date());
            }
            next
        }
        Phase::EditingEnd { selected } => {
            let anchor = session
                .temp
                .and_then(|temp| temp.from)
                .or(committed.from);
            let to = match raw.latest_pick() {
                Some(day) => Some(at_midnight(day)),
                None => anchor,
            };
            let mut next = session.with_range(DateRange::new(anchor, to));
            next.phase = Phase::resting(selected);
            next
        }
        Phase::PickingEnd => {
            // A cleared selection means the start was clicked again: one-day range.
            let to = match raw.latest_pick() {
                Some(day) => Some(at_midnight(day)),
                None => committed.from,
            };
            let mut next = session.with_range(DateRange::new(committed.from, to));
            next.phase = Phase::Settled;
            next
        }
        Phase::Idle => match raw {
            RawSelection::None => {
                debug!("cleared selection with nothing picked, ignoring");
                return session.clone();
            }
            RawSelection::SingleDay(day) => {
                let mut next = session.with_range(DateRange::from_single(day));
                next.phase = Phase::Settled;
                next
            }
            RawSelection::PartialRange(day) | RawSelection::FullRange(day, _) => {
                let start = match raw.to() {
                    Some(to) if same_day_opt(Some(at_midnight(day)), committed.from) => to,
                    _ => day,
                };
                let provisional = DateRange::from_bounds(start, env.today);
                let mut next = session.with_range(provisional);
                next.phase = Phase::PickingEnd;
                next.month = previous_month(env.today);
                next
            }
        },
        Phase::Settled => {
            if raw.is_none() {
                debug!("cleared selection on a settled range, ignoring");
                return session.clone();
            }
            session.with_range(DateRange::from_days(raw.from(), raw.to()))
        }
    };

    if env.show_time_picker {
        stamp_times(next)
    } else {
        next
    }
}

/// Puts the held times onto the freshly picked endpoints, defaulting an
/// endpoint's held time to midnight the first time it is needed.
fn stamp_times(session: SelectionSession) -> SelectionSession {
    let Some(range) = session.committed else {
        return session;
    };

    let mut start_time = session.start_time;
    let mut end_time = session.end_time;
    let mut stamped = range;

    if let Some(from) = range.from {
        let held = *start_time.get_or_insert(TimeOfDay::MIDNIGHT);
        stamped.from = Some(time::stamp(from, Some(held)));
    }
    if let Some(to) = range.to {
        let held = *end_time.get_or_insert(TimeOfDay::MIDNIGHT);
        stamped.to = Some(time::stamp(to, Some(held)));
    }

    SelectionSession {
        start_time,
        end_time,
        ..session.with_range(stamped)
    }
}

fn pick_preset(session: &SelectionSession, range: DateRange) -> SelectionSession {
    let mut next = session.with_range(range);
    next.phase = Phase::EditingStart { selected: true };
    if let (Some(from), Some(to)) = (range.start_date(), range.end_date()) {
        next.month = if months_between(from, to) >= 1 {
            month_start(from)
        } else {
            previous_month(from)
        };
    }
    next
}

fn anchor(session: &SelectionSession, endpoint: Endpoint) -> SelectionSession {
    let selected = session.phase.has_user_selected_range();
    let mut next = SelectionSession {
        temp: session.committed,
        phase: match endpoint {
            Endpoint::Start => Phase::EditingStart { selected },
            Endpoint::End => Phase::EditingEnd { selected },
        },
        ..session.clone()
    };
    if let Some(value) = session.committed.and_then(|range| range.endpoint(endpoint)) {
        next.month = previous_month(value.date());
    }
    next
}

fn change_time(
    session: &SelectionSession,
    endpoint: Endpoint,
    time: Option<TimeOfDay>,
) -> SelectionSession {
    let mut next = session.clone();
    match endpoint {
        Endpoint::Start => next.start_time = time,
        Endpoint::End => next.end_time = time,
    }

    let restamp = |range: Option<DateRange>| {
        range.map(|range| match range.endpoint(endpoint) {
            Some(value) => range.with_endpoint(endpoint, Some(time::stamp(value, time))),
            None => range,
        })
    };
    next.committed = restamp(session.committed);
    next.temp = restamp(session.temp);
    next
}

fn apply(session: &SelectionSession, env: &Env) -> (SelectionSession, Vec<Effect>) {
    let chosen = if session.edit_mode() == EditMode::None {
        session.committed
    } else {
        session.temp
    };
    let inverted = chosen.is_some_and(|range| range.is_inverted());
    let effective = chosen.map(DateRange::normalized);

    // Held times travel with their endpoints.
    let (start_time, end_time) = if inverted {
        (session.end_time, session.start_time)
    } else {
        (session.start_time, session.end_time)
    };

    let next = SelectionSession {
        committed: effective,
        temp: effective,
        phase: Phase::Idle,
        month: closed_month(effective.as_ref(), env.today),
        start_time,
        end_time,
        open: false,
    };
    (next, vec![Effect::Changed(effective), Effect::Blurred])
}

fn cancel(_session: &SelectionSession, env: &Env) -> (SelectionSession, Vec<Effect>) {
    let default_value = env.default_value;
    let (start_time, end_time) = held_times(default_value.as_ref());
    let next = SelectionSession {
        committed: default_value,
        temp: default_value,
        phase: Phase::Idle,
        month: closed_month(default_value.as_ref(), env.today),
        start_time,
        end_time,
        open: false,
    };
    (next, vec![Effect::Blurred])
}

fn reset(session: &SelectionSession, env: &Env) -> SelectionSession {
    let default_value = env.default_value;
    let mut next = SelectionSession {
        committed: default_value,
        temp: default_value,
        phase: Phase::Idle,
        ..session.clone()
    };
    if let Some(from) = default_value.and_then(|range| range.from) {
        next.month = previous_month(from.date());
    }
    next
}

fn sync(session: &SelectionSession, value: Option<DateRange>, env: &Env) -> SelectionSession {
    let value = value.or(env.default_value);
    let (start_time, end_time) = held_times(value.as_ref());
    SelectionSession {
        committed: value,
        temp: value,
        start_time,
        end_time,
        ..session.clone()
    }
}

fn held_times(range: Option<&DateRange>) -> (Option<TimeOfDay>, Option<TimeOfDay>) {
    let of = |value: Option<chrono::NaiveDateTime>| {
        Some(value.map(TimeOfDay::of).unwrap_or(TimeOfDay::MIDNIGHT))
    };
    (
        of(range.and_then(|range| range.from)),
        of(range.and_then(|range| range.to)),
    )
}

fn closed_month(range: Option<&DateRange>, today: NaiveDate) -> NaiveDate {
    let anchor = range.and_then(DateRange::start_date).unwrap_or(today);
    previous_month(anchor)
}

/// Construction-time inputs for an [`Engine`].
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub presets: Vec<Preset>,
    pub bounds: Bounds,
    pub disabled_days: Vec<DateMatcher>,
    pub default_value: Option<DateRange>,
    /// Controlled value; falls back to `default_value` when absent.
    pub value: Option<DateRange>,
    pub show_time_picker: bool,
}

/// One picker instance: validated configuration plus its live session.
#[derive(Debug, Clone)]
pub struct Engine {
    presets: Vec<Preset>,
    disabled_days: Vec<DateMatcher>,
    env: Env,
    session: SelectionSession,
}

impl Engine {
    pub fn new(options: EngineOptions, today: NaiveDate) -> Result<Self, PresetOutOfBoundsError> {
        preset::validate(&options.presets, &options.bounds)?;

        let env = Env {
            default_value: options.default_value,
            today,
            show_time_picker: options.show_time_picker,
        };
        let session = SelectionSession::new(options.value.or(options.default_value), today);

        Ok(Self {
            presets: options.presets,
            disabled_days: options.disabled_days,
            env,
            session,
        })
    }

    pub fn dispatch(&mut self, event: Event) -> Vec<Effect> {
        let label = format!("{event:?}");
        match event {
            Event::Cancel => info!("cancelled, restoring default"),
            Event::Reset => info!("reset to default"),
            _ => {}
        }
        let (next, effects) = step(&self.session, event, &self.env);
        if next.phase != self.session.phase {
            debug!("{label}: {:?} -> {:?}", self.session.phase, next.phase);
        } else {
            debug!("{label}: stays {:?}", next.phase);
        }
        for effect in &effects {
            if let Effect::Changed(range) = effect {
                info!("applied range {:?}", range.map(|range| range.label(self.env.show_time_picker)));
            }
        }
        self.session = next;
        effects
    }

    /// Adopts the preset at `index`; out-of-range indexes do nothing.
    pub fn select_preset(&mut self, index: usize) -> Vec<Effect> {
        match self.presets.get(index).map(Preset::as_range) {
            Some(range) => self.dispatch(Event::Preset(range)),
            None => Vec::new(),
        }
    }

    pub fn session(&self) -> &SelectionSession {
        &self.session
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn show_time_picker(&self) -> bool {
        self.env.show_time_picker
    }

    pub fn today(&self) -> NaiveDate {
        self.env.today
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.env.today = today;
    }

    pub fn disabled_days(&self) -> Vec<DateMatcher> {
        self.session.disabled_days(&self.disabled_days)
    }

    /// Text for the closed trigger button.
    pub fn trigger_label(&self) -> Option<String> {
        match self.session.displayed() {
            Some(range) => Some(range.label(self.env.show_time_picker)),
            None => self.placeholder(),
        }
    }

    pub fn placeholder(&self) -> Option<String> {
        let default_value = self.env.default_value?;
        if default_value.from.is_none() || default_value.to.is_none() {
            return None;
        }
        Some(default_value.label(false))
    }

    /// Text for the start or end anchor, falling back to the default value.
    pub fn anchor_label(&self, endpoint: Endpoint) -> String {
        self.session
            .displayed()
            .and_then(|range| range.endpoint(endpoint))
            .or_else(|| self.env.default_value.and_then(|range| range.endpoint(endpoint)))
            .map(format_anchor)
            .unwrap_or_default()
    }

    pub fn preset_matches(&self, index: usize) -> bool {
        self.presets
            .get(index)
            .is_some_and(|preset| preset.matches(self.session.committed.as_ref()))
    }
}
