use chrono::{Datelike, Duration, NaiveDate};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap,
};

use crate::app::{App, Mode, PickerFocus};
use rangepick::config::{Align, ThemePreference};
use rangepick::dates::shift_months;
use rangepick::matcher::is_disabled;
use rangepick::{DateMatcher, DateRange, EditMode, Endpoint, TimeOfDay};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    let theme = theme_from(app.theme);
    draw_background(frame, size, &theme);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    draw_trigger(frame, app, layout[0], &theme);
    frame.render_widget(Paragraph::new(footer_line(app, &theme)), layout[2]);

    if matches!(app.mode, Mode::Picker | Mode::TimeInput(_)) {
        draw_picker(frame, app, layout[1], &theme);
    }
    if let Mode::TimeInput(endpoint) = app.mode {
        draw_time_input(frame, app, size, endpoint, &theme);
    }

    if !app.show_help {
        if let Some(toast) = app.active_toast() {
            draw_toast(frame, size, &toast.message, toast.is_error, &theme);
        }
    }

    if app.show_help {
        draw_help(frame, size, &theme);
    }
}

fn draw_trigger(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let (text, style) = match app.engine.trigger_label() {
        Some(label) => (label, Style::default().add_modifier(Modifier::BOLD)),
        None => ("Pick a date range".to_string(), theme.muted_style()),
    };
    let alignment = match app.align {
        Align::Start => Alignment::Left,
        Align::Center => Alignment::Center,
        Align::End => Alignment::Right,
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(text, style)))
        .alignment(alignment)
        .block(panel_block(app.translations.range(), theme));
    frame.render_widget(paragraph, area);
}

fn draw_picker(frame: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let has_presets = !app.engine.presets().is_empty();
    let popover = centered_rect(if has_presets { 90 } else { 70 }, 90, area);
    frame.render_widget(Clear, popover);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(if has_presets {
            vec![Constraint::Length(24), Constraint::Min(0)]
        } else {
            vec![Constraint::Length(0), Constraint::Min(0)]
        })
        .split(popover);

    if has_presets {
        draw_presets(frame, app, columns[0], theme);
    }

    let time_rows = if app.engine.show_time_picker() { 3 } else { 0 };
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(time_rows),
            Constraint::Length(3),
        ])
        .split(columns[1]);

    frame.render_widget(
        Paragraph::new(anchor_line(app, theme)).block(panel_block("", theme)),
        sections[0],
    );
    draw_months(frame, app, sections[1], theme);
    if app.engine.show_time_picker() {
        frame.render_widget(
            Paragraph::new(time_line(app, theme)).block(panel_block("Time", theme)),
            sections[2],
        );
    }
    frame.render_widget(
        Paragraph::new(actions_line(app, theme))
            .alignment(Alignment::Right)
            .block(panel_block("", theme)),
        sections[3],
    );
}

fn draw_presets(frame: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let items: Vec<ListItem> = app
        .engine
        .presets()
        .iter()
        .enumerate()
        .map(|(index, preset)| {
            let style = if app.engine.preset_matches(index) {
                Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(preset.label.clone(), style)))
        })
        .collect();

    let highlight = if app.focus == PickerFocus::Presets {
        Style::default()
            .bg(theme.accent)
            .fg(theme.accent_contrast())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let list = List::new(items)
        .block(panel_block("Presets", theme))
        .highlight_style(highlight)
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut app.preset_state);
}

/// Start and end anchors. The anchor being edited is highlighted.
fn anchor_line(app: &App, theme: &Theme) -> Line<'static> {
    let mode = app.engine.session().edit_mode();
    let anchor_style = |active: bool| {
        if active {
            Style::default()
                .bg(theme.accent)
                .fg(theme.accent_contrast())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        }
    };
    let value = |endpoint: Endpoint| {
        let label = app.engine.anchor_label(endpoint);
        if label.is_empty() { "-".to_string() } else { label }
    };

    Line::from(vec![
        Span::styled(format!("{}: ", app.translations.start()), theme.muted_style()),
        Span::styled(
            format!(" {} ", value(Endpoint::Start)),
            anchor_style(mode == EditMode::EditingStart),
        ),
        Span::raw("  →  "),
        Span::styled(format!("{}: ", app.translations.end()), theme.muted_style()),
        Span::styled(
            format!(" {} ", value(Endpoint::End)),
            anchor_style(mode == EditMode::EditingEnd),
        ),
        Span::raw("   "),
        Span::styled(app.surface.cursor_label(), theme.muted_style()),
    ])
}

fn draw_months(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let session = app.engine.session();
    let shown = session.displayed().copied();
    let disabled = app.engine.disabled_days();
    let view = CalendarView {
        shown,
        disabled: &disabled,
        today: app.engine.today(),
        cursor: app.surface.cursor,
    };

    for (offset, half) in halves.iter().enumerate() {
        let month = shift_months(session.month, offset as i32);
        let title = month.format("%B %Y").to_string();
        let paragraph = Paragraph::new(build_calendar_lines(month, &view, theme))
            .alignment(Alignment::Center)
            .block(panel_block(&title, theme));
        frame.render_widget(paragraph, *half);
    }
}

struct CalendarView<'a> {
    shown: Option<DateRange>,
    disabled: &'a [DateMatcher],
    today: NaiveDate,
    cursor: NaiveDate,
}

fn build_calendar_lines(month: NaiveDate, view: &CalendarView, theme: &Theme) -> Vec<Line<'static>> {
    let cell_width = 3;
    let mut lines = Vec::new();
    let header_labels = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
    let mut header_spans = Vec::new();
    for (index, label) in header_labels.iter().enumerate() {
        let text = format!("{:^width$}", label, width = cell_width);
        header_spans.push(Span::styled(text, theme.muted_style()));
        if index < header_labels.len() - 1 {
            header_spans.push(Span::raw(" "));
        }
    }
    lines.push(Line::from(header_spans));

    let last = shift_months(month, 1) - Duration::days(1);
    let mut week_cells: Vec<Option<NaiveDate>> = Vec::new();
    let mut current = month;
    let offset = current.weekday().num_days_from_monday() as usize;
    for _ in 0..offset {
        week_cells.push(None);
    }

    while current <= last {
        week_cells.push(Some(current));
        if week_cells.len() == 7 {
            lines.push(calendar_week_line(&week_cells, view, theme, cell_width));
            week_cells.clear();
        }
        current = current.succ_opt().unwrap_or(current + Duration::days(1));
    }

    if !week_cells.is_empty() {
        while week_cells.len() < 7 {
            week_cells.push(None);
        }
        lines.push(calendar_week_line(&week_cells, view, theme, cell_width));
    }

    lines
}

fn calendar_week_line(
    week_cells: &[Option<NaiveDate>],
    view: &CalendarView,
    theme: &Theme,
    cell_width: usize,
) -> Line<'static> {
    let mut spans = Vec::new();
    for (index, cell) in week_cells.iter().enumerate() {
        let span = match cell {
            Some(date) => {
                let label = format!("{:>width$}", date.day(), width = cell_width);
                Span::styled(label, day_style(*date, view, theme))
            }
            None => Span::raw(format!("{:width$}", "", width = cell_width)),
        };
        spans.push(span);
        if index < week_cells.len() - 1 {
            spans.push(Span::raw(" "));
        }
    }
    Line::from(spans)
}

fn day_style(date: NaiveDate, view: &CalendarView, theme: &Theme) -> Style {
    let (from, to) = view
        .shown
        .map(|range| (range.start_date(), range.end_date()))
        .unwrap_or((None, None));

    let mut style = if Some(date) == from || Some(date) == to {
        Style::default()
            .bg(theme.accent)
            .fg(theme.accent_contrast())
            .add_modifier(Modifier::BOLD)
    } else if from.zip(to).is_some_and(|(from, to)| {
        let (low, high) = if from <= to { (from, to) } else { (to, from) };
        date > low && date < high
    }) {
        Style::default().fg(theme.highlight)
    } else if is_disabled(view.disabled, date) {
        theme.muted_style().add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(theme.text)
    };

    if date == view.today {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if date == view.cursor {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

fn time_line(app: &App, theme: &Theme) -> Line<'static> {
    let session = app.engine.session();
    let show = |time: Option<TimeOfDay>| {
        time.map(|time| time.to_string())
            .unwrap_or_else(|| "--:--".to_string())
    };
    Line::from(vec![
        Span::styled(format!("{} ", app.translations.start()), theme.muted_style()),
        Span::raw(show(session.start_time)),
        Span::raw("   "),
        Span::styled(format!("{} ", app.translations.end()), theme.muted_style()),
        Span::raw(show(session.end_time)),
        Span::raw("   "),
        Span::styled("t / T edit", theme.muted_style()),
    ])
}

fn actions_line(app: &App, theme: &Theme) -> Line<'static> {
    let status = app.status.clone().unwrap_or_default();
    Line::from(vec![
        if status.is_empty() {
            Span::raw("")
        } else {
            Span::styled(format!("{status}   "), Style::default().fg(theme.error))
        },
        Span::styled(format!("r {}", app.translations.reset()), theme.muted_style()),
        Span::raw("   "),
        Span::styled(format!("c {}", app.translations.cancel()), theme.muted_style()),
        Span::raw("   "),
        Span::styled(format!("a {}", app.translations.apply()), theme.title_style()),
        Span::raw(" "),
    ])
}

fn footer_line(app: &App, theme: &Theme) -> Line<'static> {
    let hints = match app.mode {
        Mode::Closed => "Enter open · h help · q quit",
        Mode::Picker => "arrows move · Enter pick · s/e anchors · Tab presets · h help",
        Mode::TimeInput(_) => "HH:MM · Enter set · empty clears · Esc back",
    };
    Line::from(vec![
        Span::styled("Rangepick", theme.title_style()),
        Span::raw("   "),
        Span::styled(hints, theme.muted_style()),
    ])
}

fn draw_time_input(frame: &mut Frame, app: &App, area: Rect, endpoint: Endpoint, theme: &Theme) {
    let block = centered_rect(40, 20, area);
    frame.render_widget(Clear, block);
    let title = match endpoint {
        Endpoint::Start => app.translations.start(),
        Endpoint::End => app.translations.end(),
    };
    let mut lines = vec![
        Line::from(Span::styled("Time (HH:MM)", theme.muted_style())),
        Line::from(Span::styled(
            format!("{}_", app.input),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(status) = app.status.as_deref() {
        lines.push(Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(theme.error),
        )));
    }
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(panel_block(title, theme))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, block);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let vertical = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);
    vertical[1]
}

fn draw_toast(frame: &mut Frame, area: Rect, message: &str, is_error: bool, theme: &Theme) {
    let width = (message.len() as u16 + 6).clamp(20, area.width.saturating_sub(2));
    let height = 3;
    let x = area.x + area.width.saturating_sub(width + 1);
    let y = area.y + area.height.saturating_sub(height + 2);
    let rect = Rect::new(x, y, width, height);

    frame.render_widget(Clear, rect);
    let style = if is_error {
        Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.success).add_modifier(Modifier::BOLD)
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(message.to_string(), style)))
        .alignment(Alignment::Center)
        .block(panel_block(toast_title(is_error), theme));
    frame.render_widget(paragraph, rect);
}

fn toast_title(is_error: bool) -> &'static str {
    if is_error { "Error" } else { "Applied" }
}

fn draw_help(frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = centered_rect(70, 70, area);
    frame.render_widget(Clear, block);

    let header_style = Style::default().add_modifier(Modifier::BOLD).fg(theme.accent);
    let key_style = Style::default().fg(theme.highlight);
    let entry = |key: &'static str, action: &'static str| {
        Row::new(vec![
            Cell::from(Span::styled(key, key_style)),
            Cell::from(action),
        ])
    };
    let header = |title: &'static str| {
        Row::new(vec![
            Cell::from(Span::styled(title, header_style)),
            Cell::from(""),
        ])
    };

    let rows = vec![
        header("Calendar"),
        entry("Arrows", "Move the cursor by a day or a week"),
        entry("Enter / Space", "Pick the day under the cursor"),
        entry("PgUp / PgDn  [ ]", "Previous / next month"),
        entry("{ }", "Previous / next year"),
        Row::new(vec![Cell::from(""), Cell::from("")]),
        header("Range"),
        entry("s", "Edit the start date"),
        entry("e", "Edit the end date"),
        entry("Tab", "Switch between calendar and presets"),
        entry("t / T", "Set start / end time"),
        Row::new(vec![Cell::from(""), Cell::from("")]),
        header("Actions"),
        entry("a", "Apply the range"),
        entry("c / Esc", "Cancel and restore the default"),
        entry("r", "Reset to the default"),
        entry("q", "Quit"),
        entry("h / ?", "Toggle help"),
    ];

    let table = Table::new(rows, [Constraint::Length(18), Constraint::Min(10)])
        .block(panel_block("Help", theme))
        .column_spacing(2);
    frame.render_widget(table, block);
}

fn draw_background(frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = Block::default().style(Style::default().bg(theme.bg).fg(theme.text));
    frame.render_widget(block, area);
}

fn panel_block(title: &str, theme: &Theme) -> Block<'static> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style())
        .style(theme.panel_style());
    if title.is_empty() {
        return block;
    }
    block.title(Line::from(Span::styled(
        format!(" {} ", title),
        theme.title_style(),
    )))
}

#[derive(Clone, Copy)]
struct Theme {
    bg: Color,
    panel: Color,
    border: Color,
    text: Color,
    muted: Color,
    accent: Color,
    highlight: Color,
    success: Color,
    error: Color,
    accent_dark: Color,
}

impl Theme {
    fn panel_style(&self) -> Style {
        Style::default().bg(self.panel).fg(self.text)
    }

    fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    fn title_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    fn accent_contrast(&self) -> Color {
        if matches!(self.bg, Color::Rgb(242, 244, 248)) {
            self.accent_dark
        } else {
            Color::Black
        }
    }
}

fn theme_from(pref: ThemePreference) -> Theme {
    match pref {
        ThemePreference::Terminal => Theme {
            bg: Color::Reset,
            panel: Color::Reset,
            border: Color::DarkGray,
            text: Color::Reset,
            muted: Color::DarkGray,
            accent: Color::Blue,
            highlight: Color::Yellow,
            success: Color::Green,
            error: Color::Red,
            accent_dark: Color::Black,
        },
        ThemePreference::Dark => Theme {
            bg: Color::Rgb(16, 20, 30),
            panel: Color::Rgb(24, 30, 44),
            border: Color::Rgb(60, 72, 100),
            text: Color::Rgb(226, 232, 245),
            muted: Color::Rgb(140, 152, 180),
            accent: Color::Rgb(110, 170, 255),
            highlight: Color::Rgb(250, 200, 110),
            success: Color::Rgb(120, 210, 150),
            error: Color::Rgb(250, 120, 120),
            accent_dark: Color::Rgb(30, 56, 100),
        },
        ThemePreference::Light => Theme {
            bg: Color::Rgb(242, 244, 248),
            panel: Color::Rgb(255, 255, 255),
            border: Color::Rgb(206, 214, 228),
            text: Color::Rgb(28, 34, 46),
            muted: Color::Rgb(96, 110, 136),
            accent: Color::Rgb(64, 120, 230),
            highlight: Color::Rgb(236, 150, 60),
            success: Color::Rgb(40, 146, 92),
            error: Color::Rgb(214, 64, 82),
            accent_dark: Color::Rgb(20, 36, 66),
        },
    }
}
