mod config;
mod db;
mod error;
mod handlers;
mod leaderboard;
mod loader;
mod models;
mod ranking;
mod tasks;
mod view;

use config::Config;
use db::Preferences;
use handlers::{AppEvent, Console, HELP};
use leaderboard::Leaderboard;
use loader::{CsvLoader, source_for};
use log::{error, info, warn};
use models::Theme;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };

    // Theme persistence is optional; the board works without it.
    let prefs = match Preferences::open(&config.database_url).await {
        Ok(prefs) => Some(prefs),
        Err(e) => {
            warn!("Theme preference unavailable ({}): {}", config.database_url, e);
            None
        }
    };
    let theme = match &prefs {
        Some(prefs) => match prefs.theme().await {
            Ok(theme) => theme.unwrap_or(Theme::Dark),
            Err(e) => {
                warn!("Failed to read theme preference: {}", e);
                Theme::Dark
            }
        },
        None => Theme::Dark,
    };

    let loader = CsvLoader::new(source_for(&config.csv_locator));
    let board = Arc::new(Leaderboard::new(loader, config.ranking));
    info!(
        "Serving leaderboard from {} (total items: {})",
        board.locator(),
        config.ranking.total_items
    );

    let (events, mut inbox) = mpsc::unbounded_channel();
    let mut console = Console::new(board, prefs, theme, &config, events.clone());
    console.start(config.refresh_interval);
    println!("{}", HELP);

    // Stdin commands feed the same loop as timers and finished loads.
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if events.send(AppEvent::Input(line)).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    break;
                }
            }
        }
        let _ = events.send(AppEvent::InputClosed);
    });

    while let Some(event) = inbox.recv().await {
        if console.handle(event).await.is_break() {
            break;
        }
    }
    info!("Shutting down");
}
