//! JSON HTTP API for browser front-ends.
//!
//! Every endpoint answers with the current [`GameView`], so a page can
//! re-render from any response.

use crate::controller::GameController;
use crate::games::tictactoe::{GameMode, GameView};
use anyhow::Result;
use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tracing::{debug, info, instrument};

/// Body of `POST /api/move`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Square index (0-8).
    pub cell: usize,
}

/// Body of `POST /api/mode`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeRequest {
    /// Requested mode.
    pub mode: GameMode,
}

/// Response for a click that was not applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedMove {
    /// Why the click was ignored.
    pub message: String,
    /// Unchanged game view.
    pub view: GameView,
}

/// Builds the API router around `controller`.
pub fn router(controller: GameController) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/game", get(get_game))
        .route("/api/move", post(make_move))
        .route("/api/restart", post(restart))
        .route("/api/mode", post(select_mode))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(controller)
}

/// Serves the API until the process is stopped.
#[instrument(skip(controller))]
pub async fn serve(controller: GameController, host: String, port: u16) -> Result<()> {
    let app = router(controller);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!("Server ready at http://{}:{}/", host, port);
    info!("Endpoints: GET /api/game, POST /api/move, POST /api/restart, POST /api/mode");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn get_game(State(controller): State<GameController>) -> Json<GameView> {
    Json(controller.view())
}

#[instrument(skip(controller))]
async fn make_move(
    State(controller): State<GameController>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<GameView>, (StatusCode, Json<RejectedMove>)> {
    controller.click(request.cell).map(Json).map_err(|e| {
        (
            StatusCode::CONFLICT,
            Json(RejectedMove {
                message: e.to_string(),
                view: controller.view(),
            }),
        )
    })
}

#[instrument(skip(controller))]
async fn restart(State(controller): State<GameController>) -> Json<GameView> {
    Json(controller.restart())
}

#[instrument(skip(controller))]
async fn select_mode(
    State(controller): State<GameController>,
    Json(request): Json<ModeRequest>,
) -> Json<GameView> {
    Json(controller.select_mode(request.mode))
}
