mod app;
mod document;
mod host;
mod renderer;

use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use folio_core::EngineConfig;
use folio_core::content::Portfolio;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::{App, Control};

/// Preview a portfolio page in the terminal.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Portfolio content (JSON). Uses the bundled sample when omitted.
    portfolio: Option<PathBuf>,

    /// Engine configuration (JSON). Every field is optional.
    #[arg(long, value_name = "ENGINE_JSON")]
    config: Option<PathBuf>,

    /// Write logs to this file. `RUST_LOG` selects the level.
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log {
        init_tracing(path)?;
    }

    let portfolio = match &cli.portfolio {
        Some(path) => {
            let data = std::fs::read(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Portfolio::from_json(&data).with_context(|| format!("loading {}", path.display()))?
        }
        None => Portfolio::sample()?,
    };
    let config = match &cli.config {
        Some(path) => {
            let data = std::fs::read(path)
                .with_context(|| format!("reading {}", path.display()))?;
            EngineConfig::from_json(&data).with_context(|| format!("loading {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    info!(owner = %portfolio.owner.name, "starting preview");

    run_tui(portfolio, config)
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,folio_core=debug,folio=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run_tui(portfolio: Portfolio, config: EngineConfig) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut app = App::new(portfolio, config, size.width, size.height.saturating_sub(1));
    let result = event_loop(&mut terminal, &mut app);
    app.shutdown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    let started = Instant::now();
    let now_ms = || started.elapsed().as_secs_f64() * 1000.0;

    loop {
        app.tick(now_ms());
        if app.take_dirty() {
            terminal.draw(|frame| renderer::draw(frame, app))?;
        }

        // Animations need frames; otherwise wake up rarely.
        let timeout = if app.is_animating() {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(100)
        };
        if !event::poll(timeout)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if app.handle_key(key.code) == Control::Quit {
                    break;
                }
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse.kind),
            Event::Resize(width, height) => app.resize(width, height.saturating_sub(1)),
            _ => {}
        }
    }
    Ok(())
}
