//! LLM API client abstraction for Gemini, OpenAI, and Anthropic.

use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    },
};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini.
    Gemini,
    /// OpenAI (GPT models).
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

/// Configuration for LLM client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    provider: LlmProvider,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl LlmConfig {
    /// Creates a new LLM configuration.
    #[instrument(skip(api_key), fields(provider = ?provider, model = %model))]
    pub fn new(
        provider: LlmProvider,
        api_key: String,
        model: String,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        debug!("Creating LLM config");
        Self {
            provider,
            api_key,
            model,
            max_tokens,
            temperature,
        }
    }

    /// Gets the provider.
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Gets the model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// LLM client that abstracts over multiple providers.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Creates a new LLM client.
    #[instrument(skip(config), fields(provider = ?config.provider()))]
    pub fn new(config: LlmConfig) -> Self {
        info!("Creating LLM client");
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Asks the model for a JSON object answering `user_message`.
    ///
    /// Each provider is pushed toward JSON its own way: Gemini enforces
    /// `schema` server-side, OpenAI runs in JSON-object mode, and Anthropic
    /// has its reply prefilled with `{`.
    #[instrument(skip(self, system_prompt, user_message, schema), fields(provider = ?self.config.provider, model = %self.config.model))]
    pub async fn generate_json(
        &self,
        system_prompt: &str,
        user_message: &str,
        schema: &serde_json::Value,
    ) -> Result<String, LlmError> {
        let content = match self.config.provider {
            LlmProvider::Gemini => {
                let url = format!("{}/{}:generateContent", GEMINI_BASE_URL, self.config.model);
                let request = self
                    .http
                    .post(&url)
                    .header("x-goog-api-key", &self.config.api_key)
                    .json(&self.gemini_body(system_prompt, user_message, schema));
                let response = Self::send_json(request, "Gemini").await?;
                Self::extract_text(&response, "/candidates/0/content/parts/0/text", "Gemini")?
            }
            LlmProvider::Anthropic => {
                let request = self
                    .http
                    .post(ANTHROPIC_URL)
                    .header("x-api-key", &self.config.api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&self.anthropic_body(system_prompt, user_message));
                let response = Self::send_json(request, "Anthropic").await?;
                // The reply continues the prefilled opening brace.
                let rest = Self::extract_text(&response, "/content/0/text", "Anthropic")?;
                format!("{{{}", rest)
            }
            LlmProvider::OpenAI => self.generate_openai(system_prompt, user_message).await?,
        };

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }

    /// Request body for Gemini `generateContent` with a response schema.
    fn gemini_body(
        &self,
        system_prompt: &str,
        user_message: &str,
        schema: &serde_json::Value,
    ) -> serde_json::Value {
        serde_json::json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": [{ "role": "user", "parts": [{ "text": user_message }] }],
            "generationConfig": {
                "temperature": self.config.temperature,
                "maxOutputTokens": self.config.max_tokens,
                "responseMimeType": "application/json",
                "responseSchema": schema,
            },
        })
    }

    /// Request body for the Anthropic messages API, prefilled with `{`.
    fn anthropic_body(&self, system_prompt: &str, user_message: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": system_prompt,
            "messages": [
                { "role": "user", "content": user_message },
                { "role": "assistant", "content": "{" },
            ],
        })
    }

    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_openai(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        let client = OpenAIClient::with_config(
            OpenAIConfig::new().with_api_key(self.config.api_key.clone()),
        );

        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_prompt)
            .build()
            .map_err(|e| LlmError::new(format!("Failed to build system message: {}", e)))?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| LlmError::new(format!("Failed to build user message: {}", e)))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages([
                ChatCompletionRequestMessage::System(system),
                ChatCompletionRequestMessage::User(user),
            ])
            .response_format(ResponseFormat::JsonObject)
            .max_completion_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .build()
            .map_err(|e| LlmError::new(format!("Failed to build request: {}", e)))?;

        debug!("Sending request to OpenAI");
        let response = client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::new(format!("OpenAI API error: {}", e)))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::new("No content in OpenAI response".to_string()))
    }

    /// Sends `request` and parses the body, failing on non-success status.
    async fn send_json(
        request: reqwest::RequestBuilder,
        provider: &str,
    ) -> Result<serde_json::Value, LlmError> {
        debug!(provider, "Sending request");
        let response = request
            .send()
            .await
            .map_err(|e| LlmError::new(format!("{} API request failed: {}", provider, e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| LlmError::new(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(LlmError::new(format!(
                "{} API error {}: {}",
                provider, status, response_text
            )));
        }

        debug!(response_length = response_text.len(), provider, "Parsing response");
        serde_json::from_str(&response_text)
            .map_err(|e| LlmError::new(format!("Failed to parse response: {}", e)))
    }

    /// Pulls the reply text out of a provider response at a JSON pointer.
    fn extract_text(
        response: &serde_json::Value,
        pointer: &str,
        provider: &str,
    ) -> Result<String, LlmError> {
        response
            .pointer(pointer)
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                error!(response = %response, provider, "No text content in response");
                LlmError::new(format!("No text content in {} response", provider))
            })
    }
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "LLM error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(provider: LlmProvider) -> LlmClient {
        LlmClient::new(LlmConfig::new(
            provider,
            "test-key".to_string(),
            "test-model".to_string(),
            64,
            0.5,
        ))
    }

    #[test]
    fn test_gemini_body_carries_schema() {
        let schema = serde_json::json!({ "type": "OBJECT" });
        let body = client(LlmProvider::Gemini).gemini_body("sys", "user", &schema);
        assert_eq!(body["generationConfig"]["responseSchema"], schema);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 64);
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "sys");
    }

    #[test]
    fn test_anthropic_body_prefills_brace() {
        let body = client(LlmProvider::Anthropic).anthropic_body("sys", "user");
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"][1]["role"], "assistant");
        assert_eq!(body["messages"][1]["content"], "{");
    }

    #[test]
    fn test_extract_text_follows_pointer() {
        let response = serde_json::json!({ "content": [{ "text": "\"move\": 4}" }] });
        assert_eq!(
            LlmClient::extract_text(&response, "/content/0/text", "Anthropic").unwrap(),
            "\"move\": 4}"
        );
        assert!(LlmClient::extract_text(&response, "/candidates/0", "Gemini").is_err());
    }
}
