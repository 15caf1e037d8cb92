mod app;

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};

use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};
use trilha_core::{
    config::{self, AppConfig},
    TriviaGame,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;

    let board = config
        .resource_loader()
        .load()
        .context("failed to load board data")?;
    let (resolver, illustrations) = board.into_parts(config.tile_policy);
    let game = TriviaGame::with_seed(resolver, illustrations, config.seed);
    info!(policy = %config.tile_policy, "Game ready");

    let mut app = app::TrilhaApp::new(game);
    app.run().await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("trilha.log");

    let env_filter = EnvFilter::from_default_env();

    // The terminal is in raw mode while the app runs, so only log to file.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_ansi(false)
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
