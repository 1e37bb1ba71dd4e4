use std::error::Error;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::Parser;
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::info;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use rangepick::Engine;
use rangepick::config::{self, PickerConfig};
use rangepick::dates::parse_date;

mod app;
mod ui;

use app::{App, AppSettings};

/// Pick a date range in the terminal and print it.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Config file to read instead of ~/.rangepick.json
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show the time row and stamp picked days with times
    #[arg(long)]
    time: bool,

    /// Treat this day (YYYY-MM-DD) as today
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,

    /// Write a starter config and exit
    #[arg(long)]
    init: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging();

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    if args.init {
        let path = match args.config.clone() {
            Some(path) => path,
            None => config::config_path().ok_or(config::ConfigError::NoHome)?,
        };
        config::write_config(&path, &PickerConfig::starter(today))?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let mut picker = config::read_config(args.config.as_deref())?;
    if args.time {
        picker.show_time_picker = true;
    }

    let engine = Engine::new(picker.engine_options()?, today)?;
    info!(
        "starting with {} presets, today {today}",
        engine.presets().len()
    );
    let settings = AppSettings {
        translations: picker.translations.clone(),
        align: picker.align,
        theme: picker.theme,
        enable_year_navigation: picker.enable_year_navigation,
        disable_navigation: picker.disable_navigation,
    };
    let pinned_today = args.today.is_some();

    let mut stdout = std::io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(engine, settings);

    loop {
        if !pinned_today {
            app.tick(Local::now().date_naive());
        }

        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(120))? {
            let event = event::read()?;
            if let Event::Key(key) = event {
                if key.kind == KeyEventKind::Press {
                    app.handle_key_event(key);
                }
            }
        }
    }

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(range) = app.take_applied() {
        println!("{}", range.label(picker.show_time_picker));
    }

    Ok(())
}

/// Logs go to a file so they never draw over the terminal UI.
fn init_logging() {
    let Some(path) = config::log_path() else {
        return;
    };
    let file = match open_log_file(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Logging disabled, cannot open {}: {err}", path.display());
            return;
        }
    };

    let env = env_logger::Env::default().filter_or("RANGEPICK_LOG", "warn");
    let result = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
    if let Err(err) = result {
        eprintln!("Logging disabled: {err}");
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    File::create(path)
}
