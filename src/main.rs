//! swa - weather.gov dashboard for the terminal
//!
//! A terminal UI application that displays active alerts, an 8-hour
//! temperature and feels-like chart, and the multi-day forecast from the
//! National Weather Service API.

mod app;
mod cache;
mod cli;
mod config;
mod data;
mod logging;
mod refresh;
mod ui;

use std::io;
use std::panic;
use std::process;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use app::App;
use cache::{CacheManager, POINT_CACHE_KEY};
use cli::{Cli, StartupConfig};
use config::Config;
use data::NwsClient;
use refresh::{try_recv, RefreshConfig, RefreshHandle, RefreshMessage};

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

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let startup = match StartupConfig::from_cli(&cli) {
        Ok(startup) => startup,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    };

    let log_path = logging::init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), log = ?log_path, "starting swa");

    let config = Config::load()?;
    let client = NwsClient::new(&config.user_agent)?;
    let cache = CacheManager::new();

    if startup.forget_point {
        if let Some(cache) = &cache {
            cache.remove(POINT_CACHE_KEY)?;
            tracing::info!("forgot remembered point");
        }
    }

    let refresh_minutes = startup.refresh_minutes(&config);
    let mut app = App::new(client, cache, &startup, &config);

    if startup.once {
        let dashboard = app.load_dashboard().await?;
        print!("{}", ui::render_text(&dashboard)?);
        return Ok(());
    }

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut refresh = RefreshHandle::spawn(RefreshConfig::from_minutes(refresh_minutes));

    // Initial render to show loading state
    terminal.draw(|f| ui::render(f, &app))?;

    // Trigger initial data load
    app.refresh().await;

    // Main event loop
    loop {
        terminal.draw(|f| ui::render(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        while let Some(RefreshMessage::RefreshDue) = try_recv(&mut refresh) {
            app.refresh_requested = true;
        }

        if app.should_quit {
            break;
        }

        if app.refresh_requested {
            app.refresh().await;
        }
    }

    refresh.shutdown().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}
