//! Local move provider that needs no network access.

use super::{MoveProvider, ProviderError};
use crate::games::tictactoe::{Board, Player, evaluate};
use tracing::{debug, instrument};

/// Squares tried when nothing is forced: center, corners, then edges.
const PREFERENCE: [usize; 9] = [4, 0, 2, 6, 8, 1, 3, 5, 7];

/// Plays O with the same priorities the LLM is asked to follow:
/// win, else block, else the best open square.
#[derive(Debug, Clone)]
pub struct OfflineMoveProvider {
    name: String,
}

impl OfflineMoveProvider {
    /// Creates an offline provider.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Chooses a square for O without any I/O.
    #[instrument(skip(board))]
    pub fn choose(board: &Board) -> Option<usize> {
        let open = board.empty_squares();
        let completes = |player: Player| {
            open.iter().copied().find(|&cell| {
                board
                    .with(cell, player)
                    .is_some_and(|next| evaluate(&next).winner == Some(player))
            })
        };

        completes(Player::O)
            .or_else(|| completes(Player::X))
            .or_else(|| PREFERENCE.into_iter().find(|&cell| board.is_empty(cell)))
    }
}

impl Default for OfflineMoveProvider {
    fn default() -> Self {
        Self::new("Offline AI")
    }
}

#[async_trait::async_trait]
impl MoveProvider for OfflineMoveProvider {
    async fn request_move(&self, board: &Board) -> Result<usize, ProviderError> {
        let cell = Self::choose(board)
            .ok_or_else(|| ProviderError::new("No valid moves available"))?;
        debug!(ai = %self.name, position = cell, "AI chose position");
        Ok(cell)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
