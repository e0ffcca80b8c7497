//! Win detection logic for tic-tac-toe.

use super::super::{Board, Player, Square};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The eight winning lines: rows, then columns, then diagonals.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Result of scanning a board for a completed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Evaluation {
    /// Player owning the completed line.
    pub winner: Option<Player>,
    /// The completed line.
    pub line: Option<[usize; 3]>,
}

/// Checks the board for three in a row.
///
/// Lines are scanned in [`WINNING_LINES`] order and the first match wins.
#[instrument(level = "trace")]
pub fn evaluate(board: &Board) -> Evaluation {
    for line in WINNING_LINES {
        let [a, b, c] = line;
        if let Some(Square::Occupied(player)) = board.get(a)
            && board.get(b) == Some(Square::Occupied(player))
            && board.get(c) == Some(Square::Occupied(player))
        {
            return Evaluation {
                winner: Some(player),
                line: Some(line),
            };
        }
    }

    Evaluation::default()
}
