//! Keyboard mapping for the game screen.

use crate::games::tictactoe::Position;
use crossterm::event::KeyCode;

/// What a key press asks the game to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the cursor.
    Cursor(Position),
    /// Click a square.
    Click(usize),
    /// Switch between player-vs-player and player-vs-AI.
    ToggleMode,
    /// Start over.
    Restart,
    /// Leave the TUI.
    Quit,
}

/// Moves cursor based on arrow keys.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    match key {
        KeyCode::Left => cursor.step(0, -1),
        KeyCode::Right => cursor.step(0, 1),
        KeyCode::Up => cursor.step(-1, 0),
        KeyCode::Down => cursor.step(1, 0),
        _ => cursor,
    }
}

/// Maps a key press to an action.
///
/// Digits 1-9 click the matching square directly.
pub fn action_for(cursor: Position, key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => {
            Some(Action::Cursor(move_cursor(cursor, key)))
        }
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Click(cursor.to_index())),
        KeyCode::Char(c @ '1'..='9') => c
            .to_digit(10)
            .map(|digit| Action::Click(digit as usize - 1)),
        KeyCode::Char('m') => Some(Action::ToggleMode),
        KeyCode::Char('r') => Some(Action::Restart),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}
