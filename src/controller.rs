//! Async driver that runs a game against a move provider.
//!
//! The controller owns the current [`GameState`], applies front-end events
//! to it, and runs the AI turn in a background task: wait out the delay,
//! start the request, call the provider without holding the lock, then apply
//! the answer. Every step re-checks the generation, and restarting or
//! switching modes aborts the task outright.

use crate::games::tictactoe::{AiTicket, GameMode, GameState, GameView, MoveError};
use crate::providers::{MoveProvider, ProviderError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Shared handle to one running game.
///
/// Cloning is cheap; all clones drive the same game. The pending AI task is
/// aborted when the last clone is dropped.
#[derive(Clone)]
pub struct GameController {
    shared: Arc<Shared>,
}

struct Shared {
    state: Mutex<GameState>,
    provider: Arc<dyn MoveProvider>,
    ai_delay: Duration,
    updates: watch::Sender<GameView>,
    ai_task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for GameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("provider", &self.shared.provider.name())
            .field("ai_delay", &self.shared.ai_delay)
            .finish_non_exhaustive()
    }
}

impl GameController {
    /// Creates a controller with a fresh game in `mode`.
    ///
    /// Must be called inside a Tokio runtime.
    #[instrument(skip(provider), fields(provider = %provider.name()))]
    pub fn new(provider: Arc<dyn MoveProvider>, mode: GameMode, ai_delay: Duration) -> Self {
        info!("Creating game controller");
        let state = GameState::new(mode);
        let (updates, _) = watch::channel(state.view());
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                provider,
                ai_delay,
                updates,
                ai_task: Mutex::new(None),
            }),
        }
    }

    /// Returns the current view.
    pub fn view(&self) -> GameView {
        self.shared.lock_state().view()
    }

    /// Returns the name of the AI move provider.
    pub fn provider_name(&self) -> &str {
        self.shared.provider.name()
    }

    /// Subscribes to view updates.
    pub fn subscribe(&self) -> watch::Receiver<GameView> {
        self.shared.updates.subscribe()
    }

    /// Handles a click on `cell`.
    ///
    /// A rejected click changes nothing.
    #[instrument(skip(self))]
    pub fn click(&self, cell: usize) -> Result<GameView, MoveError> {
        let mut state = self.shared.lock_state();
        let next = state.apply_human_move(cell).inspect_err(|e| {
            debug!(error = %e, "Click ignored");
        })?;
        Ok(self.shared.commit(&mut state, next))
    }

    /// Starts a new game in the current mode.
    #[instrument(skip(self))]
    pub fn restart(&self) -> GameView {
        self.reset(|state| state.restart())
    }

    /// Switches mode and starts a new game.
    #[instrument(skip(self))]
    pub fn select_mode(&self, mode: GameMode) -> GameView {
        self.reset(|state| state.set_mode(mode))
    }

    fn reset(&self, transition: impl FnOnce(&GameState) -> GameState) -> GameView {
        let mut state = self.shared.lock_state();
        self.shared.cancel_ai_turn();
        let next = transition(&*state);
        self.shared.commit(&mut state, next)
    }
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, GameState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_task(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.ai_task.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `next`, publishes its view, and schedules the AI turn if due.
    ///
    /// Runs with the state lock held so subscribers see views in the same
    /// order the state changed.
    fn commit(self: &Arc<Self>, state: &mut GameState, next: GameState) -> GameView {
        let view = next.view();
        self.updates.send_replace(view.clone());
        self.schedule_ai_turn(&next);
        *state = next;
        view
    }

    fn cancel_ai_turn(&self) {
        if let Some(task) = self.lock_task().take() {
            debug!("Cancelling pending AI turn");
            task.abort();
        }
    }

    /// Spawns the delayed AI turn if `state` calls for one.
    fn schedule_ai_turn(self: &Arc<Self>, state: &GameState) {
        if !state.ai_turn_due() {
            return;
        }

        let generation = state.generation();
        debug!(generation, delay_ms = self.ai_delay.as_millis() as u64, "Scheduling AI turn");
        let task = tokio::spawn(run_ai_turn(
            Arc::downgrade(self),
            Arc::clone(&self.provider),
            self.ai_delay,
            generation,
        ));
        if let Some(previous) = self.lock_task().replace(task) {
            previous.abort();
        }
    }

    /// Marks the AI request as started if `generation` is still current.
    fn begin_ai_request(self: &Arc<Self>, generation: u64) -> Option<AiTicket> {
        let mut state = self.lock_state();
        if state.generation() != generation {
            debug!(issued = generation, current = state.generation(), "AI turn superseded");
            return None;
        }
        let (next, ticket) = state
            .begin_ai_request()
            .inspect_err(|e| debug!(error = %e, "AI turn no longer due"))
            .ok()?;
        self.commit(&mut state, next);
        Some(ticket)
    }

    /// Applies the provider's answer for `ticket`.
    fn resolve_ai_request(self: &Arc<Self>, ticket: AiTicket, result: Result<usize, ProviderError>) {
        let mut state = self.lock_state();
        let outcome = match result {
            Ok(cell) => state
                .apply_ai_move(ticket.generation, cell, &mut rand::thread_rng())
                .map(|(next, _)| next),
            Err(e) => {
                warn!(error = %e, "Move provider failed");
                state.fail_ai_request(
                    ticket.generation,
                    format!(
                        "{} failed to make a move. Please check your API key or try again.",
                        self.provider.name()
                    ),
                )
            }
        };
        match outcome {
            Ok(next) => {
                self.commit(&mut state, next);
            }
            Err(e) => debug!(error = %e, "Discarding AI result"),
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.cancel_ai_turn();
    }
}

/// Body of the background AI turn.
///
/// Holds only a weak reference so a dropped controller is never kept alive
/// by its own pending task.
#[instrument(skip(shared, provider), fields(provider = %provider.name()))]
async fn run_ai_turn(
    shared: Weak<Shared>,
    provider: Arc<dyn MoveProvider>,
    delay: Duration,
    generation: u64,
) {
    tokio::time::sleep(delay).await;

    let Some(ticket) = shared.upgrade().and_then(|s| s.begin_ai_request(generation)) else {
        return;
    };

    info!("Requesting AI move");
    let result = provider.request_move(&ticket.board).await;

    match shared.upgrade() {
        Some(shared) => shared.resolve_ai_request(ticket, result),
        None => debug!("Controller dropped while AI was thinking"),
    }
}
