//! Move provider backed by an LLM.

use super::{MoveProvider, ProviderError};
use crate::games::tictactoe::{Board, Player};
use crate::llm_client::LlmClient;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::{debug, info, instrument, warn};

const SYSTEM_PROMPT: &str = "You are an expert Tic Tac Toe player. Your role is to play as 'O'. \
Always answer with a single JSON object of the form {\"move\": <index>} and nothing else.";

/// Response schema sent to providers that support constrained JSON output.
pub static MOVE_SCHEMA: LazyLock<serde_json::Value> = LazyLock::new(|| {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "move": {
                "type": "INTEGER",
                "description": "The index of the square (0-8) for the next move."
            }
        },
        "required": ["move"]
    })
});

#[derive(Debug, Deserialize)]
struct MoveResponse {
    #[serde(rename = "move")]
    cell: i64,
}

/// Asks an LLM to play O.
#[derive(Debug, Clone)]
pub struct LlmMoveProvider {
    client: LlmClient,
    name: String,
}

impl LlmMoveProvider {
    /// Creates a provider around an LLM client.
    #[instrument(skip(client), fields(provider = ?client.config().provider()))]
    pub fn new(client: LlmClient) -> Self {
        let name = format!("{} AI", client.config().provider());
        info!(name = %name, model = %client.config().model(), "Creating LLM move provider");
        Self { client, name }
    }

    /// Builds the per-move prompt for `board`.
    pub fn prompt(board: &Board) -> String {
        let cells: Vec<&str> = board
            .marks()
            .into_iter()
            .map(|mark| mark.map_or("null", Player::symbol))
            .collect();
        let board_state = serde_json::Value::from(cells).to_string();

        format!(
            "The user, playing as 'X', has provided the current state of the board.\n\
             The board is a 9-element array, where indices 0-8 correspond to the squares \
             from top-left to bottom-right.\n\
             'X' represents the user's move, 'O' represents your move, and 'null' represents \
             an empty square.\n\n\
             Your task is to determine the best possible move for 'O'.\n\
             1. If you can win, take the winning move.\n\
             2. If you cannot win, but the player 'X' can win on their next turn, block their \
             winning move.\n\
             3. Otherwise, choose the strategically best available square.\n\n\
             Your response must be a valid JSON object with a single integer field \"move\".\n\
             Only choose an empty square (a square with a 'null' value).\n\n\
             Current board state:\n{}\n\n\
             Analyze the board and return your optimal move.",
            board_state
        )
    }
}

#[async_trait::async_trait]
impl MoveProvider for LlmMoveProvider {
    #[instrument(skip(self, board), fields(provider = %self.name))]
    async fn request_move(&self, board: &Board) -> Result<usize, ProviderError> {
        debug!(board = %board.display(), "Requesting move from LLM");
        let response = self
            .client
            .generate_json(SYSTEM_PROMPT, &Self::prompt(board), &MOVE_SCHEMA)
            .await
            .map_err(|e| {
                warn!(error = %e, "LLM request failed");
                ProviderError::from(e)
            })?;

        let cell = parse_move(&response)?;
        info!(cell, "LLM chose move");
        Ok(cell)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Extracts `{"move": n}` from a model reply.
///
/// Accepts surrounding prose and markdown code fences. Fails unless `n` is
/// in 0-8; whether the square is free is not checked here.
#[instrument(skip(response), fields(response_length = response.len()))]
pub fn parse_move(response: &str) -> Result<usize, ProviderError> {
    let start = response.find('{');
    let end = response.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &response[start..=end],
        _ => {
            return Err(ProviderError::new(format!(
                "No JSON object in response: {}",
                response.trim()
            )));
        }
    };

    let parsed: MoveResponse = serde_json::from_str(json)
        .map_err(|e| ProviderError::new(format!("Failed to parse move: {}", e)))?;

    usize::try_from(parsed.cell)
        .ok()
        .filter(|cell| *cell <= 8)
        .ok_or_else(|| ProviderError::new(format!("Invalid move received from AI: {}", parsed.cell)))
}
