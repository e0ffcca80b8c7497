//! Core domain types for tic-tac-toe.

use serde::{Deserialize, Serialize};

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second, played by the AI in AI mode).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Returns the mark drawn on the board.
    pub fn symbol(self) -> &'static str {
        match self {
            Player::X => "X",
            Player::O => "O",
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

impl Square {
    /// Returns the occupying player, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Square::Empty => None,
            Square::Occupied(player) => Some(player),
        }
    }
}

/// 3x3 tic-tac-toe board.
///
/// Boards are values: a move produces a new board and leaves the
/// original untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Creates a board from optional marks, `None` meaning empty.
    pub fn from_marks(marks: [Option<Player>; 9]) -> Self {
        Self {
            squares: marks.map(|mark| mark.map_or(Square::Empty, Square::Occupied)),
        }
    }

    /// Gets the square at the given index (0-8).
    pub fn get(&self, pos: usize) -> Option<Square> {
        self.squares.get(pos).copied()
    }

    /// Returns a copy of this board with `player` written at `pos`.
    ///
    /// Returns `None` when `pos` is out of range.
    pub fn with(&self, pos: usize, player: Player) -> Option<Self> {
        let mut next = *self;
        *next.squares.get_mut(pos)? = Square::Occupied(player);
        Some(next)
    }

    /// Checks if a square is empty. Out-of-range indices are never empty.
    pub fn is_empty(&self, pos: usize) -> bool {
        matches!(self.get(pos), Some(Square::Empty))
    }

    /// Indices of all empty squares, ascending.
    pub fn empty_squares(&self) -> Vec<usize> {
        (0..9).filter(|&pos| self.is_empty(pos)).collect()
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Returns the board as optional marks, `None` meaning empty.
    pub fn marks(&self) -> [Option<Player>; 9] {
        self.squares.map(Square::player)
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty squares show their 1-based number.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => (pos + 1).to_string(),
                    Square::Occupied(player) => player.symbol().to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Who drives the O side.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameMode {
    /// Two humans share the board.
    #[default]
    Human,
    /// The human plays X, the AI move provider plays O.
    Ai,
}

impl GameMode {
    /// Returns the display label for this mode.
    pub fn label(self) -> &'static str {
        match self {
            GameMode::Human => "Player vs Player",
            GameMode::Ai => "Player vs AI",
        }
    }

    /// Switches to the other mode.
    pub fn toggle(self) -> Self {
        match self {
            GameMode::Human => GameMode::Ai,
            GameMode::Ai => GameMode::Human,
        }
    }
}

/// Current status of the game, always derived from the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win along `line`.
    Won {
        /// The winning player.
        winner: Player,
        /// Indices of the completed line.
        line: [usize; 3],
    },
    /// Board is full with no winner.
    Draw,
}

impl GameStatus {
    /// Returns true once the game is decided.
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// Returns the winner, if any.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameStatus::Won { winner, .. } => Some(*winner),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_leaves_original_untouched() {
        let board = Board::new();
        let next = board.with(4, Player::X).unwrap();
        assert!(board.is_empty(4));
        assert_eq!(next.get(4), Some(Square::Occupied(Player::X)));
    }

    #[test]
    fn test_with_out_of_range() {
        assert!(Board::new().with(9, Player::O).is_none());
    }

    #[test]
    fn test_display_numbers_empty_squares() {
        let board = Board::new().with(0, Player::X).unwrap();
        assert_eq!(board.display(), "X|2|3\n-+-+-\n4|5|6\n-+-+-\n7|8|9");
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&GameMode::Ai).unwrap(), "\"ai\"");
        assert_eq!(GameMode::Human.to_string(), "human");
    }
}
