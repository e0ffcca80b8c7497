//! Tests for the async game controller and its AI turn.

use gemini_tictactoe::{
    Board, GameController, GameMode, GameView, MoveError, MoveProvider, OfflineMoveProvider,
    Player, ProviderError,
};
use std::sync::{Arc, Barrier};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Notify, watch};

const DELAY: Duration = Duration::from_millis(10);

/// Provider with a fixed answer that counts its calls.
struct ScriptedProvider {
    answer: Option<usize>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl ScriptedProvider {
    fn answering(cell: usize) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(cell),
            calls: AtomicUsize::new(0),
            gate: None,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            calls: AtomicUsize::new(0),
            gate: None,
        })
    }

    fn gated(cell: usize, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(cell),
            calls: AtomicUsize::new(0),
            gate: Some(gate),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MoveProvider for ScriptedProvider {
    async fn request_move(&self, _board: &Board) -> Result<usize, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.answer
            .ok_or_else(|| ProviderError::new("Failed to get AI move"))
    }

    fn name(&self) -> &str {
        "Scripted AI"
    }
}

async fn wait_for(
    rx: &mut watch::Receiver<GameView>,
    pred: impl FnMut(&GameView) -> bool,
) -> GameView {
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(pred))
        .await
        .expect("timed out waiting for view")
        .expect("controller dropped")
        .clone()
}

fn count(view: &GameView, player: Player) -> usize {
    view.board.iter().filter(|m| **m == Some(player)).count()
}

#[tokio::test]
async fn test_offline_ai_answers_after_human_move() {
    let controller = GameController::new(
        Arc::new(OfflineMoveProvider::default()),
        GameMode::Ai,
        DELAY,
    );
    let mut rx = controller.subscribe();

    let view = controller.click(0).unwrap();
    assert_eq!(view.next_player, Player::O);

    let view = wait_for(&mut rx, |v| count(v, Player::O) == 1).await;
    assert_eq!(view.board[4], Some(Player::O));
    assert_eq!(view.next_player, Player::X);
    assert!(!view.ai_thinking);
}

#[tokio::test]
async fn test_occupied_answer_is_repaired() {
    let provider = ScriptedProvider::answering(4);
    let controller = GameController::new(provider.clone(), GameMode::Ai, DELAY);
    let mut rx = controller.subscribe();

    controller.click(4).unwrap();
    let view = wait_for(&mut rx, |v| count(v, Player::O) == 1).await;

    assert_eq!(view.board[4], Some(Player::X));
    assert_eq!(view.next_player, Player::X);
    assert_eq!(view.error, None);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_provider_failure_surfaces_error_and_does_not_retry() {
    let provider = ScriptedProvider::failing();
    let controller = GameController::new(provider.clone(), GameMode::Ai, DELAY);
    let mut rx = controller.subscribe();

    let before = controller.click(0).unwrap();
    let view = wait_for(&mut rx, |v| v.error.is_some()).await;

    assert!(!view.ai_thinking);
    assert_eq!(view.board, before.board);
    assert_eq!(view.next_player, Player::O);
    assert!(view.error.unwrap().contains("Scripted AI"));

    tokio::time::sleep(DELAY * 5).await;
    assert_eq!(provider.calls(), 1);
    assert!(matches!(controller.click(1), Err(MoveError::NotYourTurn(Player::O))));

    let view = controller.restart();
    assert_eq!(view.error, None);
    assert_eq!(view.board, [None; 9]);
}

#[tokio::test]
async fn test_restart_during_delay_cancels_request() {
    let provider = ScriptedProvider::answering(4);
    let controller =
        GameController::new(provider.clone(), GameMode::Ai, Duration::from_millis(100));

    controller.click(0).unwrap();
    let view = controller.restart();
    tokio::time::sleep(Duration::from_millis(250)).await;

    assert_eq!(provider.calls(), 0);
    assert_eq!(controller.view(), view);
}

#[tokio::test]
async fn test_late_answer_after_restart_is_discarded() {
    let gate = Arc::new(Notify::new());
    let provider = ScriptedProvider::gated(4, gate.clone());
    let controller = GameController::new(provider.clone(), GameMode::Ai, DELAY);
    let mut rx = controller.subscribe();

    controller.click(0).unwrap();
    wait_for(&mut rx, |v| v.ai_thinking).await;

    let restarted = controller.restart();
    gate.notify_one();
    tokio::time::sleep(DELAY * 5).await;

    assert_eq!(controller.view(), restarted);
    assert_eq!(restarted.board, [None; 9]);
    assert!(!restarted.ai_thinking);
}

#[tokio::test]
async fn test_clicks_ignored_while_thinking() {
    let gate = Arc::new(Notify::new());
    let provider = ScriptedProvider::gated(4, gate.clone());
    let controller = GameController::new(provider, GameMode::Ai, DELAY);
    let mut rx = controller.subscribe();

    controller.click(0).unwrap();
    let thinking = wait_for(&mut rx, |v| v.ai_thinking).await;
    assert_eq!(controller.click(1), Err(MoveError::AiPending));
    assert_eq!(controller.view(), thinking);

    gate.notify_one();
    let view = wait_for(&mut rx, |v| !v.ai_thinking).await;
    assert_eq!(view.board[4], Some(Player::O));
}

#[tokio::test]
async fn test_human_mode_never_asks_provider() {
    let provider = ScriptedProvider::answering(4);
    let controller = GameController::new(provider.clone(), GameMode::Human, DELAY);

    controller.click(0).unwrap();
    let view = controller.click(1).unwrap();
    tokio::time::sleep(DELAY * 5).await;

    assert_eq!(view.board[1], Some(Player::O));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_select_mode_resets_board() {
    let provider = ScriptedProvider::answering(4);
    let controller = GameController::new(provider, GameMode::Human, DELAY);

    controller.click(0).unwrap();
    let view = controller.select_mode(GameMode::Ai);

    assert_eq!(view.mode, GameMode::Ai);
    assert_eq!(view.board, [None; 9]);
    assert_eq!(view.next_player, Player::X);
}

#[tokio::test]
async fn test_dropping_controller_cancels_pending_turn() {
    let provider = ScriptedProvider::answering(4);
    let controller =
        GameController::new(provider.clone(), GameMode::Ai, Duration::from_millis(50));

    controller.click(0).unwrap();
    drop(controller);
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(provider.calls(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_clicks_publish_latest_view() {
    let controller = GameController::new(
        Arc::new(OfflineMoveProvider::default()),
        GameMode::Human,
        DELAY,
    );
    let rx = controller.subscribe();

    for _ in 0..2000 {
        controller.restart();
        let barrier = Barrier::new(2);
        std::thread::scope(|scope| {
            for cell in [0, 1] {
                let (controller, barrier) = (&controller, &barrier);
                scope.spawn(move || {
                    barrier.wait();
                    // Either order is fine; both clicks land.
                    let _ = controller.click(cell);
                });
            }
        });
        let view = controller.view();
        assert_eq!(*rx.borrow(), view);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_restart_racing_ai_answer_publishes_latest_view() {
    let controller = GameController::new(
        Arc::new(OfflineMoveProvider::default()),
        GameMode::Ai,
        Duration::ZERO,
    );
    let rx = controller.subscribe();

    for _ in 0..200 {
        controller.click(0).unwrap();
        tokio::task::yield_now().await;
        let view = controller.restart();
        assert_eq!(*rx.borrow(), view);
        assert_eq!(controller.view(), view);
    }
}
