//! SectorScope TUI: linked sector scatter and price timeline.

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::info;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use sectorscope_core::config::{DashboardConfig, APP_DIR};
use sectorscope_tui::app::{AppState, ErrorCategory};
use sectorscope_tui::worker::{self, WorkerResponse};
use sectorscope_tui::{input, ui};

#[derive(Parser, Debug)]
#[command(name = "sectorscope-tui", version, about = "Interactive sector scatter and price timeline")]
struct Args {
    /// Config file (default: <config dir>/sectorscope/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Company summary CSV
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Long-format price CSV
    #[arg(long)]
    prices: Option<PathBuf>,

    /// Filings CSV
    #[arg(long)]
    filings: Option<PathBuf>,
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_logging(config_dir: Option<&Path>) {
    let Some(dir) = config_dir.map(|d| d.join(APP_DIR)) else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = File::create(dir.join("sectorscope.log")) else {
        return;
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config_dir = dirs::config_dir();
    init_logging(config_dir.as_deref());

    let fallback = config_dir.as_deref().map(DashboardConfig::default_path);
    let mut config = DashboardConfig::load(args.config.as_deref(), fallback.as_deref())
        .context("loading configuration")?;
    if let Some(p) = args.summary {
        config.data.summary = p;
    }
    if let Some(p) = args.prices {
        config.data.prices = p;
    }
    if let Some(p) = args.filings {
        config.data.filings = Some(p);
    }
    info!("starting with {:?}", config.data);

    // Restore the terminal before printing a panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen, DisableMouseCapture);
        default_hook(info);
    }));

    let (tx, rx) = mpsc::channel();
    let loaders = worker::spawn_loaders(&config.data, tx);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let size = terminal.size()?;
    let mut app = AppState::new(&config, Rect::new(0, 0, size.width, size.height));
    let result = run_app(&mut terminal, &mut app, &rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    for handle in loaders {
        let _ = handle.join();
    }
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    rx: &Receiver<WorkerResponse>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        while let Ok(resp) = rx.try_recv() {
            handle_worker_response(app, resp);
        }

        app.tick();

        // 50ms poll for a ~20 FPS tick.
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::Resize(w, h) => app.resize(Rect::new(0, 0, w, h)),
                _ => {}
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}

fn handle_worker_response(app: &mut AppState, resp: WorkerResponse) {
    if let Some((dataset, cause)) = resp.failure() {
        app.push_error(
            ErrorCategory::Data,
            format!("Failed to load {dataset}"),
            cause.to_string(),
        );
    }
    app.dispatch(resp.into_event());
}
