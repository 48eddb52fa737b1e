mod config;
mod controller;
mod error;
mod logging;
mod model;
mod services;
mod view;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use config::Config;
use controller::AppController;
use model::{AppModel, Screen, SearchSettings};
use services::{
    HttpContentService, JsonFavoritesStore, JsonUserStore, NominatimSearch, ProcessPlayer,
    Services, TcpConnectivityProbe,
};
use view::AppView;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StartScreen {
    Tracks,
    Books,
    Profile,
}

impl From<StartScreen> for Screen {
    fn from(screen: StartScreen) -> Self {
        match screen {
            StartScreen::Tracks => Screen::Tracks,
            StartScreen::Books => Screen::Books,
            StartScreen::Profile => Screen::Profile,
        }
    }
}

/// Terminal browser for audio tracks, books and your birth-chart profile
#[derive(Debug, Parser)]
#[command(name = "browse-rs", version, about)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Screen to open on start
    #[arg(short, long, value_enum, default_value_t = StartScreen::Tracks)]
    screen: StartScreen,

    /// Content API base URL, overriding the config file
    #[arg(long)]
    content_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = match logging::init_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("=== browse-rs starting ===");

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.content_url {
        config.services.content_url = url;
    }

    let (services, player_events) = build_services(&config)?;

    let app_model = AppModel::new(SearchSettings {
        min_query_len: config.search.min_query_len,
        debounce: config.search.debounce(),
    });
    app_model.set_screen(cli.screen.into()).await;

    let controller = AppController::new(app_model.clone(), services);
    controller.start_player_event_listener(player_events);

    // Initial loads run in the background so the UI comes up at once
    controller.spawn_load(Screen::Tracks);
    controller.spawn_load(Screen::Books);
    controller.spawn_load(Screen::Profile);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app_model, controller.clone()).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    controller.stop_playback().await;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("browse-rs shutting down");
    Ok(())
}

fn build_services(
    config: &Config,
) -> Result<(Services, tokio::sync::mpsc::UnboundedReceiver<model::PlayerEvent>)> {
    let client = services::http_client(&config.services)?;
    let (player, player_events) =
        ProcessPlayer::new(config.player.command.clone(), config.player.args.clone());

    tracing::info!(
        content_url = %config.services.content_url,
        data_dir = %config.storage.data_dir.display(),
        player = %config.player.command,
        "Services configured"
    );

    let services = Services {
        content: Arc::new(HttpContentService::new(client.clone(), config.services.content_url.clone())),
        connectivity: Arc::new(TcpConnectivityProbe::new(
            config.services.connectivity_host.clone(),
            config.services.connectivity_timeout(),
            config.services.offline_message.clone(),
        )),
        locations: Arc::new(NominatimSearch::new(
            client,
            config.services.geocoder_url.clone(),
            config.search.result_limit,
        )),
        favorites: Arc::new(JsonFavoritesStore::new(config.storage.favorites_path())),
        users: Arc::new(JsonUserStore::new(config.storage.profile_path())),
        player: Arc::new(player),
    };
    Ok((services, player_events))
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: AppModel,
    controller: AppController,
) -> Result<()> {
    loop {
        // Auto-clear old errors (after 5 seconds)
        model.auto_clear_old_errors().await;

        let state = model.render_state().await;
        let should_quit = model.should_quit().await;

        terminal.draw(|f| {
            AppView::render(f, &state);
        })?;

        // Handle input with shorter poll time for smoother UI updates
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
