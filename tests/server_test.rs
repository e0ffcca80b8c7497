//! Tests for the JSON HTTP API.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use gemini_tictactoe::server::{RejectedMove, router};
use gemini_tictactoe::{GameController, GameMode, GameView, OfflineMoveProvider, Player};
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn controller(mode: GameMode) -> GameController {
    GameController::new(
        Arc::new(OfflineMoveProvider::default()),
        mode,
        Duration::from_millis(10),
    )
}

async fn send(
    controller: &GameController,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();
    let response = router(controller.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&controller(GameMode::Human), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn test_get_game_returns_fresh_view() {
    let (status, body) = send(&controller(GameMode::Human), "GET", "/api/game", None).await;
    assert_eq!(status, StatusCode::OK);
    let view: GameView = serde_json::from_slice(&body).unwrap();
    assert_eq!(view.board, [None; 9]);
    assert_eq!(view.next_player, Player::X);
}

#[tokio::test]
async fn test_move_then_rejected_repeat() {
    let controller = controller(GameMode::Human);

    let (status, body) = send(&controller, "POST", "/api/move", Some(r#"{"cell": 4}"#)).await;
    assert_eq!(status, StatusCode::OK);
    let view: GameView = serde_json::from_slice(&body).unwrap();
    assert_eq!(view.board[4], Some(Player::X));

    let (status, body) = send(&controller, "POST", "/api/move", Some(r#"{"cell": 4}"#)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let rejected: RejectedMove = serde_json::from_slice(&body).unwrap();
    assert!(rejected.message.contains("occupied"));
    assert_eq!(rejected.view, view);
}

#[tokio::test]
async fn test_mode_and_restart() {
    let controller = controller(GameMode::Human);
    send(&controller, "POST", "/api/move", Some(r#"{"cell": 0}"#)).await;

    let (status, body) = send(&controller, "POST", "/api/mode", Some(r#"{"mode": "ai"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    let view: GameView = serde_json::from_slice(&body).unwrap();
    assert_eq!(view.mode, GameMode::Ai);
    assert_eq!(view.board, [None; 9]);

    let (status, body) = send(&controller, "POST", "/api/restart", None).await;
    assert_eq!(status, StatusCode::OK);
    let view: GameView = serde_json::from_slice(&body).unwrap();
    assert_eq!(view.mode, GameMode::Ai);
}

#[tokio::test]
async fn test_view_json_shape() {
    let (_, body) = send(&controller(GameMode::Ai), "GET", "/api/game", None).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"]["state"], "in_progress");
    assert_eq!(json["mode"], "ai");
    assert_eq!(json["board"][0], serde_json::Value::Null);
}
