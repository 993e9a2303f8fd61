//! countrydir - Browse the countries of the world from the terminal
//!
//! A terminal UI application that lists every country from the REST Countries
//! API, with search, region filtering and a detail view per country.

use std::io;
use std::panic;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use countrydir::app::App;
use countrydir::cli::{Cli, StartupConfig};
use countrydir::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Runs the TUI until the user quits
async fn run(config: StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::with_startup_config(config);

    // Initial render to show loading state
    terminal.draw(|f| ui::render(f, &app))?;

    // Trigger initial data load
    app.load_initial().await;

    // Main event loop
    loop {
        if app.take_retry_request() {
            info!("retrying country list");
            app.load_initial().await;
        }

        if app.has_pending_detail() {
            terminal.draw(|f| ui::render_loading(f, "Loading country..."))?;
            app.load_pending_detail().await;
        }

        // Fold in finished searches and region fetches
        app.process_messages();

        // Render UI
        terminal.draw(|f| ui::render(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Reject bad arguments before the terminal is taken over
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match logging::init(config.log_file.clone()) {
        Ok(path) => info!(path = %path.display(), api_url = %config.api_url, "countrydir starting"),
        Err(e) => eprintln!("warning: logging disabled: {}", e),
    }

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    if let Err(e) = run(config).await {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        warn!(error = %e, "terminal error");
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
