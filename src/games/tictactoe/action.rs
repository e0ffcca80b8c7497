//! Move outcomes and rejections for tic-tac-toe.
//!
//! Rejected transitions are values, not panics. Callers that only care
//! about "did anything change" treat an `Err` as a no-op.

use super::{Player, Position};
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Reason a transition was not applied.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// The index does not address a square.
    #[display("Square {} is out of range (must be 0-8)", _0)]
    OutOfRange(usize),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// It is not a human's turn.
    #[display("It's not your turn: {} is played by the AI", _0)]
    NotYourTurn(Player),

    /// An AI move is in flight.
    #[display("The AI is thinking")]
    AiPending,

    /// The state does not call for an AI move.
    #[display("It is not the AI's turn")]
    AiTurnNotDue,

    /// An AI result was issued for an older game state.
    #[display("Stale AI result for generation {} (current {})", issued, current)]
    Stale {
        /// Generation the request was issued for.
        issued: u64,
        /// Generation of the current state.
        current: u64,
    },

    /// No empty square remains to repair an invalid AI move.
    #[display("No empty squares remain")]
    NoEmptySquares,
}

impl std::error::Error for MoveError {}

/// Handle for an in-flight AI request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct AiTicket {
    /// Generation of the state the request was issued for.
    pub generation: u64,
    /// Board snapshot sent to the move provider.
    pub board: super::Board,
}

/// Where an AI move actually landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct AiPlacement {
    /// Index the provider asked for.
    pub requested: usize,
    /// Square that received the mark.
    pub position: Position,
    /// True when the requested index was unusable and a random empty
    /// square was chosen instead.
    pub repaired: bool,
}
