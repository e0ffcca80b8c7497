//! Game configuration loaded from TOML.

use crate::games::tictactoe::GameMode;
use crate::llm_client::{LlmConfig, LlmProvider};
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings for the AI opponent and the game front-ends.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct GameConfig {
    /// LLM provider (gemini, openai, or anthropic).
    #[serde(default = "default_provider")]
    llm_provider: LlmProvider,

    /// LLM model name (e.g., "gemini-2.5-flash", "gpt-4o-mini").
    #[serde(default = "default_model")]
    llm_model: String,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    temperature: f32,

    /// Pause before asking the AI for a move, in milliseconds.
    #[serde(default = "default_ai_delay_ms")]
    ai_delay_ms: u64,

    /// Mode a new session starts in.
    #[serde(default)]
    mode: GameMode,
}

fn default_provider() -> LlmProvider {
    LlmProvider::Gemini
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

// Gemini 2.5 counts thinking tokens against the output budget.
fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.5
}

fn default_ai_delay_ms() -> u64 {
    500
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            llm_provider: default_provider(),
            llm_model: default_model(),
            llm_max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            ai_delay_ms: default_ai_delay_ms(),
            mode: GameMode::default(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(provider = %config.llm_provider, model = %config.llm_model, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Delay before each AI request.
    pub fn ai_delay(&self) -> Duration {
        Duration::from_millis(self.ai_delay_ms)
    }

    /// Creates LLM configuration from this config.
    ///
    /// Reads the API key from `GEMINI_API_KEY` (or `API_KEY`),
    /// `OPENAI_API_KEY`, or `ANTHROPIC_API_KEY` depending on the provider.
    #[instrument(skip(self), fields(provider = ?self.llm_provider, model = %self.llm_model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");

        let api_key = match self.llm_provider {
            LlmProvider::Gemini => std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("API_KEY"))
                .map_err(|_| {
                    ConfigError::new(
                        "GEMINI_API_KEY (or API_KEY) environment variable not set".to_string(),
                    )
                })?,
            LlmProvider::OpenAI => std::env::var("OPENAI_API_KEY").map_err(|_| {
                ConfigError::new("OPENAI_API_KEY environment variable not set".to_string())
            })?,
            LlmProvider::Anthropic => std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
                ConfigError::new("ANTHROPIC_API_KEY environment variable not set".to_string())
            })?,
        };

        Ok(LlmConfig::new(
            self.llm_provider,
            api_key,
            self.llm_model.clone(),
            self.llm_max_tokens,
            self.temperature,
        ))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
