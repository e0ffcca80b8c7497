//! Gemini Tic-Tac-Toe - Unified CLI
//!
//! Play in the terminal or serve the game over HTTP.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use gemini_tictactoe::{
    GameConfig, GameController, LlmClient, LlmMoveProvider, MoveProvider, OfflineMoveProvider,
};
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,gemini_tictactoe=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command.clone().unwrap_or(Command::Tui) {
        Command::Tui => {
            initialize_file_tracing()?;
            let controller = build_controller(&cli)?;
            gemini_tictactoe::tui::run_tui(controller).await
        }
        Command::Serve { port, host } => {
            initialize_tracing();
            let controller = build_controller(&cli)?;
            gemini_tictactoe::server::serve(controller, host, port).await
        }
    }
}

/// Loads configuration and wires the move provider into a controller.
#[instrument(skip(cli), fields(config_path = %cli.config.display(), offline = cli.offline))]
fn build_controller(cli: &Cli) -> Result<GameController> {
    let mut config = GameConfig::load_or_default(&cli.config)?;
    if let Some(mode) = cli.mode {
        info!(mode = %mode, "Overriding starting mode");
        config = config.with_mode(mode);
    }

    let provider: Arc<dyn MoveProvider> = if cli.offline {
        info!("Using offline AI");
        Arc::new(OfflineMoveProvider::default())
    } else {
        let llm_config = config
            .create_llm_config()
            .context("LLM unavailable; set the API key or pass --offline")?;
        Arc::new(LlmMoveProvider::new(LlmClient::new(llm_config)))
    };

    Ok(GameController::new(provider, *config.mode(), config.ai_delay()))
}

/// Logs to stderr.
fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Tracing initialized");
}

/// Logs to a file so output doesn't corrupt the terminal UI.
fn initialize_file_tracing() -> Result<()> {
    let log_file = std::fs::File::create("gemini_tictactoe_tui.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();

    info!("Tracing initialized");
    Ok(())
}
