//! Turn-taking state machine for tic-tac-toe.
//!
//! [`GameState`] is a plain value. Every transition borrows the current
//! state and returns a new one, so a rejected transition leaves the caller's
//! state exactly as it was.
//!
//! The AI side runs in two halves: [`GameState::begin_ai_request`] hands out
//! an [`AiTicket`] stamped with the state's generation, and
//! [`GameState::apply_ai_move`] / [`GameState::fail_ai_request`] only accept
//! a result whose generation still matches. Any accepted board change,
//! restart, or mode switch bumps the generation, which retires outstanding
//! tickets.

use super::action::{AiPlacement, AiTicket, MoveError};
use super::rules;
use super::{Board, GameMode, GameStatus, Player, Position};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Complete state of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    to_move: Player,
    mode: GameMode,
    ai_pending: bool,
    error: Option<String>,
    generation: u64,
}

impl GameState {
    /// Creates a fresh game in the given mode.
    #[instrument]
    pub fn new(mode: GameMode) -> Self {
        Self {
            board: Board::new(),
            to_move: Player::X,
            mode,
            ai_pending: false,
            error: None,
            generation: 0,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player whose turn it is.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Returns the mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// True while an AI request is in flight.
    pub fn ai_pending(&self) -> bool {
        self.ai_pending
    }

    /// Returns the last provider failure, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the generation token of this state.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Derives the game status from the board.
    pub fn status(&self) -> GameStatus {
        rules::status(&self.board)
    }

    /// Returns true once the game is decided.
    pub fn is_over(&self) -> bool {
        self.status().is_over()
    }

    /// True when the AI should be asked for a move.
    ///
    /// A failed request blocks the AI turn until restart or mode change.
    pub fn ai_turn_due(&self) -> bool {
        self.mode == GameMode::Ai
            && self.to_move == Player::O
            && !self.ai_pending
            && self.error.is_none()
            && !self.is_over()
    }

    /// Places the current player's mark at `cell` on behalf of a human.
    #[instrument(skip(self), fields(generation = self.generation, to_move = %self.to_move))]
    pub fn apply_human_move(&self, cell: usize) -> Result<Self, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        if self.ai_pending {
            return Err(MoveError::AiPending);
        }
        if self.mode == GameMode::Ai && self.to_move == Player::O {
            return Err(MoveError::NotYourTurn(self.to_move));
        }
        let position = Position::from_index(cell).ok_or(MoveError::OutOfRange(cell))?;
        if !self.board.is_empty(cell) {
            return Err(MoveError::SquareOccupied(position));
        }

        let next = self.place(cell)?;
        debug!(position = %position, status = ?next.status(), "Human move applied");
        Ok(next)
    }

    /// Marks an AI request as in flight and returns its ticket.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn begin_ai_request(&self) -> Result<(Self, AiTicket), MoveError> {
        if self.ai_pending {
            return Err(MoveError::AiPending);
        }
        if !self.ai_turn_due() {
            return Err(MoveError::AiTurnNotDue);
        }

        let next = Self {
            ai_pending: true,
            error: None,
            ..self.clone()
        };
        debug!("AI request started");
        Ok((next, AiTicket::new(self.generation, self.board)))
    }

    /// Applies the provider's answer to the ticket issued at `generation`.
    ///
    /// An out-of-range or occupied `cell` is repaired by choosing uniformly
    /// among the empty squares.
    #[instrument(skip(self, rng), fields(current = self.generation))]
    pub fn apply_ai_move<R: Rng + ?Sized>(
        &self,
        generation: u64,
        cell: usize,
        rng: &mut R,
    ) -> Result<(Self, AiPlacement), MoveError> {
        self.check_ticket(generation)?;

        let (target, repaired) = if self.board.is_empty(cell) {
            (cell, false)
        } else {
            let target = *self
                .board
                .empty_squares()
                .choose(rng)
                .ok_or(MoveError::NoEmptySquares)?;
            warn!(
                requested = cell,
                chosen = target,
                "AI chose an unavailable square, using a random empty one"
            );
            (target, true)
        };

        let mut next = self.place(target)?;
        next.ai_pending = false;
        next.error = None;

        let position = Position::from_index(target).ok_or(MoveError::OutOfRange(target))?;
        info!(position = %position, repaired, "AI move applied");
        Ok((next, AiPlacement::new(cell, position, repaired)))
    }

    /// Records a failed AI request issued at `generation`.
    ///
    /// Board and turn are left as they were.
    #[instrument(skip(self, message), fields(current = self.generation))]
    pub fn fail_ai_request(
        &self,
        generation: u64,
        message: impl Into<String>,
    ) -> Result<Self, MoveError> {
        self.check_ticket(generation)?;
        let message = message.into();
        warn!(error = %message, "AI request failed");
        Ok(Self {
            ai_pending: false,
            error: Some(message),
            ..self.clone()
        })
    }

    /// Starts over in the same mode.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn restart(&self) -> Self {
        info!(mode = %self.mode, "Restarting game");
        Self {
            generation: self.generation + 1,
            ..Self::new(self.mode)
        }
    }

    /// Switches mode, discarding the current game.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn set_mode(&self, mode: GameMode) -> Self {
        info!(from = %self.mode, to = %mode, "Changing game mode");
        Self {
            generation: self.generation + 1,
            ..Self::new(mode)
        }
    }

    /// Snapshot for the presentation layer.
    pub fn view(&self) -> GameView {
        let status = self.status();
        let winning_line = match status {
            GameStatus::Won { line, .. } => Some(line),
            _ => None,
        };
        GameView {
            board: self.board.marks(),
            status,
            winner: status.winner(),
            winning_line,
            next_player: self.to_move,
            mode: self.mode,
            ai_thinking: self.ai_pending,
            error: self.error.clone(),
            generation: self.generation,
        }
    }

    fn check_ticket(&self, generation: u64) -> Result<(), MoveError> {
        if generation != self.generation {
            return Err(MoveError::Stale {
                issued: generation,
                current: self.generation,
            });
        }
        if !self.ai_pending {
            return Err(MoveError::AiTurnNotDue);
        }
        Ok(())
    }

    /// Writes the current player's mark at `cell` and hands the turn over.
    fn place(&self, cell: usize) -> Result<Self, MoveError> {
        let board = self
            .board
            .with(cell, self.to_move)
            .ok_or(MoveError::OutOfRange(cell))?;
        Ok(Self {
            board,
            to_move: self.to_move.opponent(),
            generation: self.generation + 1,
            ..self.clone()
        })
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameMode::default())
    }
}

/// Everything a front-end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    /// Marks in row-major order, `None` for empty.
    pub board: [Option<Player>; 9],
    /// Derived status.
    pub status: GameStatus,
    /// Winner, if decided by a line.
    pub winner: Option<Player>,
    /// Completed line, if any.
    pub winning_line: Option<[usize; 3]>,
    /// Player to move next.
    pub next_player: Player,
    /// Current mode.
    pub mode: GameMode,
    /// True while the AI is choosing.
    pub ai_thinking: bool,
    /// Last provider failure.
    pub error: Option<String>,
    /// Generation token of the state.
    pub generation: u64,
}

impl GameView {
    /// True if `cell` is part of the winning line.
    pub fn is_winning_cell(&self, cell: usize) -> bool {
        self.winning_line.is_some_and(|line| line.contains(&cell))
    }

    /// One-line summary of the game status.
    pub fn status_line(&self) -> String {
        match self.status {
            GameStatus::Won { winner, .. } => format!("Winner: {winner}"),
            GameStatus::Draw => "It's a Draw!".to_string(),
            GameStatus::InProgress => format!("Next player: {}", self.next_player),
        }
    }
}

impl Default for GameView {
    fn default() -> Self {
        GameState::default().view()
    }
}
