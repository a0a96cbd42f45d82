//! userlist-viewer binary entry point.
//!
//! Loads configuration, starts the background fetch, initializes the
//! terminal in raw mode, runs the TUI event loop, and restores the
//! terminal state on exit.
//!
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt};

use userlist_viewer::app::{self, AppState, Keymap, Settings};
use userlist_viewer::error::{Context, Result, simple_error};
use userlist_viewer::remote::{self, HttpUserSource, PendingFetch};
use userlist_viewer::ui::theme::Theme;

/// Browse a remote user directory in the terminal.
#[derive(Parser, Debug)]
#[command(name = "userlist-viewer")]
#[command(version)]
struct Args {
    /// User directory endpoint (overrides settings.conf)
    #[arg(short, long, env = "USERLIST_ENDPOINT")]
    endpoint: Option<String>,

    /// Number of users to request
    #[arg(short, long, env = "USERLIST_SIZE")]
    size: Option<usize>,

    /// Rows per page
    #[arg(short, long)]
    page_size: Option<usize>,

    /// Field the search box matches against
    #[arg(long)]
    search_field: Option<String>,

    /// Directory holding settings.conf, theme.conf and keybinds.conf
    #[arg(short, long, env = "USERLIST_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Log file (the terminal is taken by the UI)
    #[arg(long, env = "USERLIST_LOG_FILE")]
    log_file: Option<PathBuf>,
}

fn init_logging(path: PathBuf) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_ctx(|| format!("open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,userlist_viewer=debug"));
    fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| simple_error(format!("init logging: {e}")))?;
    Ok(())
}

/// Settings file first, then command-line overrides.
fn load_settings(args: &Args) -> Settings {
    let dir = args.config_dir.as_deref();
    let mut settings = Settings::load_or_init(&app::config_file_write_path(dir, "settings.conf"));
    if let Some(endpoint) = &args.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if let Some(size) = args.size {
        settings.fetch_size = size;
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size.max(1);
    }
    if let Some(field) = &args.search_field {
        settings.search_field = field.clone();
    }
    settings
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let args = Args::parse();
    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("userlist-viewer.log"));
    init_logging(log_file)?;

    let dir = args.config_dir.as_deref();
    let settings = load_settings(&args);
    let theme = Theme::load_or_init(&app::config_file_write_path(dir, "theme.conf"));
    let keymap = Keymap::load_or_init(&app::config_file_write_path(dir, "keybinds.conf"));
    tracing::info!(
        endpoint = %settings.endpoint,
        size = settings.fetch_size,
        page_size = settings.page_size,
        "starting"
    );

    let fetch = match HttpUserSource::new(settings.endpoint.clone()) {
        Ok(source) => remote::spawn_fetch(source, settings.fetch_size),
        Err(e) => PendingFetch::ready(Err(e)),
    };
    let state = AppState::new(settings, theme, keymap);

    let mut terminal = init_terminal().map_err(|e| simple_error(format!("init terminal: {e}")))?;

    let res = app::run(&mut terminal, state, fetch);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
