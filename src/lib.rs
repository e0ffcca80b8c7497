//! Gemini Tic-Tac-Toe library
//!
//! Tic-tac-toe against a friend or an LLM-driven opponent.
//!
//! # Architecture
//!
//! - **Games**: board, win detection, and the pure turn-taking state machine
//! - **Providers**: AI move sources (LLM-backed or offline)
//! - **Controller**: async driver that runs the delayed, cancellable AI turn
//! - **Front-ends**: terminal UI and a JSON HTTP API
//!
//! # Example
//!
//! ```no_run
//! use gemini_tictactoe::{GameController, GameMode, OfflineMoveProvider};
//! use std::{sync::Arc, time::Duration};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let provider = Arc::new(OfflineMoveProvider::default());
//! let controller = GameController::new(provider, GameMode::Ai, Duration::from_millis(500));
//!
//! controller.click(4)?;
//! let view = controller.view();
//! println!("{}", view.status_line());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod controller;
pub mod game_config;
pub mod games;
pub mod llm_client;
pub mod providers;
pub mod server;
pub mod tui;

// Crate-level exports - Controller
pub use controller::GameController;

// Crate-level exports - Configuration
pub use game_config::{ConfigError, GameConfig};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - Move providers
pub use providers::{LlmMoveProvider, MoveProvider, OfflineMoveProvider, ProviderError};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    AiPlacement, AiTicket, Board, Evaluation, GameMode, GameState, GameStatus, GameView,
    MoveError, Player, Position, Square, WINNING_LINES, evaluate,
};
