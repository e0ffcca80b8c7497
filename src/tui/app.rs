//! Application state and logic.

use super::input::Action;
use crate::games::tictactoe::{GameView, MoveError, Position};
use tracing::debug;

/// Main application state.
#[derive(Debug, Clone)]
pub struct App {
    view: GameView,
    cursor: Position,
    notice: Option<String>,
    provider_name: String,
    should_quit: bool,
}

impl App {
    /// Creates a new application.
    pub fn new(view: GameView, provider_name: impl Into<String>) -> Self {
        Self {
            view,
            cursor: Position::Center,
            notice: None,
            provider_name: provider_name.into(),
            should_quit: false,
        }
    }

    /// Gets the latest game view.
    pub fn view(&self) -> &GameView {
        &self.view
    }

    /// Gets the cursor position.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Gets the transient notice shown under the board.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Gets the AI's display name.
    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    /// True once the user asked to quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Replaces the game view.
    pub fn set_view(&mut self, view: GameView) {
        if view.generation != self.view.generation {
            self.notice = None;
        }
        self.view = view;
    }

    /// Applies the local part of an action.
    ///
    /// Returns the action if the controller still has to handle it.
    pub fn apply(&mut self, action: Action) -> Option<Action> {
        debug!(?action, "Handling action");
        match action {
            Action::Cursor(position) => {
                self.cursor = position;
                None
            }
            Action::Quit => {
                self.should_quit = true;
                None
            }
            Action::Click(cell) => {
                if let Some(position) = Position::from_index(cell) {
                    self.cursor = position;
                }
                Some(action)
            }
            Action::ToggleMode | Action::Restart => {
                self.notice = None;
                Some(action)
            }
        }
    }

    /// Records a rejected click.
    pub fn reject(&mut self, error: &MoveError) {
        self.notice = Some(error.to_string());
    }
}
