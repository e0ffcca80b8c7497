//! Integration tests against live LLM APIs.
//!
//! Run with `--features api` and the matching API key in the environment.

use gemini_tictactoe::{
    Board, LlmClient, LlmConfig, LlmMoveProvider, LlmProvider, MoveProvider, Player,
};
use std::sync::LazyLock;
use tracing::instrument;

const GREETING_SYSTEM: &str = "You are a helpful assistant. Always answer in JSON.";
const GREETING_USER: &str = "Reply with {\"greeting\": \"Hello, world!\"} and nothing else.";

static GREETING_SCHEMA: LazyLock<serde_json::Value> = LazyLock::new(|| {
    serde_json::json!({
        "type": "OBJECT",
        "properties": { "greeting": { "type": "STRING" } },
        "required": ["greeting"]
    })
});

fn assert_greeting(response: &str) {
    let json: serde_json::Value = serde_json::from_str(response).expect("Response should be JSON");
    assert!(json["greeting"].is_string(), "Missing greeting in {response}");
}

fn client(provider: LlmProvider, key_var: &str, model: &str) -> LlmClient {
    dotenvy::dotenv().ok();
    let api_key = std::env::var(key_var).unwrap_or_else(|_| panic!("{key_var} not set"));
    LlmClient::new(LlmConfig::new(provider, api_key, model.to_string(), 1024, 0.5))
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_gemini_connectivity() {
    let client = client(LlmProvider::Gemini, "GEMINI_API_KEY", "gemini-2.5-flash");

    let response = client
        .generate_json(GREETING_SYSTEM, GREETING_USER, &GREETING_SCHEMA)
        .await
        .expect("Failed to generate");

    assert_greeting(&response);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_anthropic_connectivity() {
    let client = client(
        LlmProvider::Anthropic,
        "ANTHROPIC_API_KEY",
        "claude-3-5-haiku-20241022",
    );

    let response = client
        .generate_json(GREETING_SYSTEM, GREETING_USER, &GREETING_SCHEMA)
        .await
        .expect("Failed to generate");

    assert_greeting(&response);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_openai_connectivity() {
    let client = client(LlmProvider::OpenAI, "OPENAI_API_KEY", "gpt-4o-mini");

    let response = client
        .generate_json(GREETING_SYSTEM, GREETING_USER, &GREETING_SCHEMA)
        .await
        .expect("Failed to generate");

    assert_greeting(&response);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_gemini_returns_a_board_index() {
    let provider = LlmMoveProvider::new(client(
        LlmProvider::Gemini,
        "GEMINI_API_KEY",
        "gemini-2.5-flash",
    ));
    // X threatens the top row.
    let board = Board::new()
        .with(0, Player::X)
        .and_then(|b| b.with(1, Player::X))
        .and_then(|b| b.with(4, Player::O))
        .expect("valid board");

    let cell = provider.request_move(&board).await.expect("Failed to get move");
    assert!(cell <= 8);
    eprintln!("Gemini chose {}", cell);
}
