//! loglens - log analysis client
//!
//! Terminal UI: upload a log file, read the diagnostic summary, ask
//! follow-up questions, and export a report.

mod app;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use loglens_core::{Config, HttpAnalysisService, Session};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::App;

#[derive(Parser)]
#[command(name = "loglens")]
#[command(about = "Upload a log file, read its analysis, and ask questions about it")]
#[command(version)]
struct Args {
    /// Log file to preselect
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging (to file, not stdout since we have a TUI)
    let _log_guard =
        loglens_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("loglens TUI starting up");

    // Workflows run on the runtime's worker threads; the UI loop stays on this one.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let _runtime_guard = runtime.enter();

    let service = HttpAnalysisService::new(&config.service)
        .context("failed to create analysis service client")?;
    tracing::info!(base_url = %service.base_url(), "Using analysis service");

    let session = Session::new(Arc::new(service), &config);
    let mut app = App::new(session, args.file);

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    tracing::info!(
        in_flight = app.session.in_flight(),
        "loglens TUI shutting down"
    );

    result
}

/// Run the main application loop.
fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Apply finished workflows before drawing
        app.tick();

        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
