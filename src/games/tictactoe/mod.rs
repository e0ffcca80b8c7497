//! Tic-tac-toe: board, rules, and the turn-taking state machine.

mod action;
mod game;
mod position;
pub mod rules;
mod types;

pub use action::{AiPlacement, AiTicket, MoveError};
pub use game::{GameState, GameView};
pub use position::Position;
pub use rules::{evaluate, Evaluation, WINNING_LINES};
pub use types::{Board, GameMode, GameStatus, Player, Square};
