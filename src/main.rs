mod action;
mod api;
mod app;
mod cli;
mod client;
mod config;
mod detail;
mod error;
mod event;
mod history;
mod loader;
mod route;
mod tui;
mod types;
mod ui;

use std::panic;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::api::ComicApi;
use crate::app::App;
use crate::cli::Cli;
use crate::client::ComicClient;
use crate::config::Config;
use crate::event::Event;
use crate::history::{FileHistory, HistorySource};
use crate::route::Navigation;
use crate::tui::EventHandler;
use crate::types::DetailState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref())?;

    let mut config = Config::load();
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.trim_end_matches('/').to_string();
    }
    if let Some(path) = &cli.history {
        config.history.path = Some(path.clone());
    }

    let state = cli.detail_state()?;
    let api = ComicClient::new(&config.api.base_url)?;
    let history = FileHistory::new(config.history_path());

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let app_config = AppConfig {
        route_id: cli.route_id,
        state,
        api: Arc::new(api),
        history: Arc::new(history),
        grid_columns: config.ui.grid_columns,
    };

    // Run the application
    let result = run(app_config).await;

    // Restore terminal
    tui::restore()?;

    // Hand the navigation request to whoever launched us
    if let Some(nav) = result? {
        println!("{}", serde_json::to_string(&nav.hand_off())?);
    }

    Ok(())
}

struct AppConfig {
    route_id: String,
    state: DetailState,
    api: Arc<dyn ComicApi>,
    history: Arc<dyn HistorySource>,
    grid_columns: usize,
}

fn init_logging(log_file: Option<&Path>) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}

async fn run(config: AppConfig) -> Result<Option<Navigation>, Box<dyn std::error::Error>> {
    // Initialize terminal
    let mut terminal = tui::init()?;

    // Create action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    // Create app state; mounting starts the detail fetch
    let mut app = App::new(
        config.route_id,
        config.state,
        config.api,
        config.history,
        config.grid_columns,
        action_tx.clone(),
    );

    // Create event handler
    let tick_rate = Duration::from_millis(100);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    // Main loop
    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(app.navigation.take())
}
