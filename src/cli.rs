//! Command-line interface for gemini_tictactoe.

use clap::{Parser, Subcommand};
use gemini_tictactoe::GameMode;

/// Gemini Tic-Tac-Toe - play a friend or an LLM
#[derive(Parser, Debug)]
#[command(name = "gemini_tictactoe")]
#[command(about = "Tic-tac-toe against a friend or an LLM-driven AI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the game configuration file
    #[arg(short, long, default_value = "tictactoe.toml", global = true)]
    pub config: std::path::PathBuf,

    /// Starting mode (overrides the config file)
    #[arg(long, value_enum, global = true)]
    pub mode: Option<GameMode>,

    /// Use the built-in offline AI instead of an LLM
    #[arg(long, global = true)]
    pub offline: bool,

    /// Subcommand to run (defaults to the terminal UI)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Play in the terminal
    Tui,

    /// Serve the JSON game API over HTTP
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}
