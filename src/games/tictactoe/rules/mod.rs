//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](super::Board). Status is never stored;
//! callers derive it from the board whenever they need it.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{evaluate, Evaluation, WINNING_LINES};

use super::{Board, GameStatus};
use tracing::instrument;

/// Derives the game status from a board.
///
/// A completed line beats a full board.
#[instrument(level = "trace")]
pub fn status(board: &Board) -> GameStatus {
    match evaluate(board) {
        Evaluation {
            winner: Some(winner),
            line: Some(line),
        } => GameStatus::Won { winner, line },
        _ if is_full(board) => GameStatus::Draw,
        _ => GameStatus::InProgress,
    }
}
