//! Terminal UI for Gemini Tic-Tac-Toe.

mod app;
mod input;
mod ui;

pub use app::App;
pub use input::{Action, action_for, move_cursor};

use crate::controller::GameController;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Runs the terminal UI until the user quits.
#[instrument(skip(controller), fields(provider = %controller.provider_name()))]
pub async fn run_tui(controller: GameController) -> Result<()> {
    info!("Starting Gemini Tic-Tac-Toe TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_game(&mut terminal, &controller).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

/// Draw, poll input, and forward actions until quit.
async fn run_game(terminal: &mut Tui, controller: &GameController) -> Result<()> {
    let mut updates = controller.subscribe();
    let mut app = App::new(updates.borrow_and_update().clone(), controller.provider_name());

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        // Let background AI tasks run between polls.
        let input = tokio::task::block_in_place(|| -> io::Result<Option<Event>> {
            if event::poll(Duration::from_millis(100))? {
                event::read().map(Some)
            } else {
                Ok(None)
            }
        })?;

        if let Some(Event::Key(key)) = input
            && key.kind == KeyEventKind::Press
            && let Some(action) = action_for(app.cursor(), key.code)
            && let Some(action) = app.apply(action)
        {
            dispatch(controller, &mut app, action);
        }

        if app.should_quit() {
            info!("User quit");
            return Ok(());
        }

        if updates.has_changed()? {
            app.set_view(updates.borrow_and_update().clone());
        }
    }
}

fn dispatch(controller: &GameController, app: &mut App, action: Action) {
    debug!(?action, "Dispatching to controller");
    match action {
        Action::Click(cell) => {
            if let Err(e) = controller.click(cell) {
                app.reject(&e);
            }
        }
        Action::ToggleMode => {
            controller.select_mode(app.view().mode.toggle());
        }
        Action::Restart => {
            controller.restart();
        }
        Action::Cursor(_) | Action::Quit => {}
    }
}
