//! ACS Contraindication Checklist — interactive Ratatui TUI
//!
//! Opens the durable checklist under the configured storage directory and
//! presents it as an accordion of drugs. See `ui` for the layout and `app`
//! for the key bindings.
//!
//! Usage:
//!   cargo run -p acscheck-tui
//!   cargo run -p acscheck-tui -- --config acscheck.toml
//!   cargo run -p acscheck-tui -- --storage-dir /tmp/acs
//!
//! Logs go to `<storage_dir>/acscheck.log` (filter with RUST_LOG, default
//! `info`) so they do not draw over the alternate screen.

mod app;
mod ui;

use std::{
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use acscheck_config::Settings;
use acscheck_contracts::error::ChecklistResult;
use acscheck_core::{ChecklistStore, PersistenceAdapter, SystemClock};
use acscheck_storage::FileSlot;
use acscheck_verify::StateShapeVerifier;

use app::App;

const LOG_FILE: &str = "acscheck.log";

// ── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "acscheck-tui", about = "ACS contraindication checklist")]
struct Cli {
    /// Settings file (TOML). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the checklist file; overrides the settings file.
    #[arg(long)]
    storage_dir: Option<PathBuf>,
}

// ── Startup ───────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let store = match open_store(&cli) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("acscheck-tui: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(App::new(store)) {
        eprintln!("acscheck-tui: terminal error: {}", e);
        std::process::exit(1);
    }
}

fn open_store(cli: &Cli) -> ChecklistResult<ChecklistStore> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.storage_dir {
        settings.storage_dir = dir.clone();
    }

    if let Err(e) = init_logging(&settings.storage_dir) {
        eprintln!(
            "acscheck-tui: logging disabled, cannot open {}: {}",
            settings.storage_dir.join(LOG_FILE).display(),
            e
        );
    }

    let catalog = Arc::new(settings.catalog()?);
    let slot = FileSlot::new(&settings.storage_dir, &settings.storage_key);
    info!(path = %slot.path().display(), drugs = catalog.len(), "starting checklist session");

    let persistence =
        PersistenceAdapter::new(Box::new(slot), Box::new(StateShapeVerifier::new()), catalog);
    Ok(ChecklistStore::open(persistence, Box::new(SystemClock)))
}

fn init_logging(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

// ── Main event loop ───────────────────────────────────────────────────────────

fn run(mut app: App) -> io::Result<()> {
    // Restore the terminal before the panic message is printed.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    while !app.should_quit() {
        terminal.draw(|f| ui::draw(f, app))?;

        // Key releases are reported on some platforms; act on presses only.
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
    }
    info!("checklist session closed");
    Ok(())
}
