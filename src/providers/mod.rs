//! AI move providers.
//!
//! A provider looks at a board and names the square O should take. Its
//! answer is untrusted: the state machine re-validates it before applying.

mod llm;
mod offline;

pub use llm::{LlmMoveProvider, MOVE_SCHEMA, parse_move};
pub use offline::OfflineMoveProvider;

use crate::games::tictactoe::Board;
use crate::llm_client::LlmError;
use derive_more::{Display, Error};
use tracing::{error, instrument};

/// Source of AI moves for the O side.
#[async_trait::async_trait]
pub trait MoveProvider: Send + Sync {
    /// Requests a move for O on `board`.
    ///
    /// Returns the chosen square (0-8).
    async fn request_move(&self, board: &Board) -> Result<usize, ProviderError>;

    /// Returns the provider's display name.
    fn name(&self) -> &str;
}

/// The move provider could not produce a move.
#[derive(Debug, Clone, Display, Error)]
#[display("Provider error: {} at {}:{}", message, file, line)]
pub struct ProviderError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ProviderError {
    /// Creates a new provider error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(error_message = %message, "Provider error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<LlmError> for ProviderError {
    #[track_caller]
    fn from(err: LlmError) -> Self {
        Self::new(err.message)
    }
}
