//! Stagekeeper - Discord bot refereeing Smash-style crew battles
//!
//! Keeps every match's state in memory, renders it into a single embed
//! edited in place, and referees picks, bans, and wins per match mode.

mod arena;
mod common;
mod config;
mod discord;
mod roster;

use anyhow::Result;
use tokio::signal;
use tracing::{error, info};

use config::env::get_config_path;
use discord::BotBuilder;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Stagekeeper v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_path = get_config_path();
    info!("Loading configuration from {}...", config_path);

    let config = config::load_and_validate(&config_path).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        error!("Please ensure {} exists and is properly formatted.", config_path);
        e
    })?;

    info!("Configuration loaded successfully");
    info!("  Command prefix: {}", config.discord.command_prefix);
    info!("  Default mode: {}", config.arena.default_mode);
    info!(
        "  Idle timeout: {}s (+{}s to confirm)",
        config.arena.idle_timeout_secs, config.arena.confirm_timeout_secs
    );

    let mut bot = BotBuilder::new(config).build().await?;

    tokio::select! {
        biased;
        _ = shutdown_signal() => {
            info!("Shutdown signal received - stopping...");
        }
        result = bot.run() => {
            if let Err(e) = result {
                error!("Discord client error: {}", e);
            }
        }
    }

    info!("Exiting...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
