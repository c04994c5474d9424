/// LLM Client: the single point of entry for all generative-model calls in Scout.
///
/// ARCHITECTURAL RULE: No other module may call a vendor API directly.
/// Orchestrators depend on the `Completion` trait; `LlmClient` is the HTTP-backed
/// implementation, dispatching on `ModelConfig::provider`.
///
/// No retries happen here. A failed call is a failed call; callers decide what to do.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod config;
pub mod prompts;

pub use config::{ModelConfig, Provider};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 0.2;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Uniform "send messages, receive text" contract over every backend.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError>;
}

/// Builds a `Completion` for a resolved model configuration.
///
/// Carried in `AppState` as `Arc<dyn CompletionFactory>` so handlers never
/// construct HTTP clients themselves.
pub trait CompletionFactory: Send + Sync {
    fn connect(&self, config: ModelConfig) -> Result<Arc<dyn Completion>, LlmError>;
}

/// Production factory: every connection is an `LlmClient` over HTTPS.
pub struct HttpCompletionFactory;

impl CompletionFactory for HttpCompletionFactory {
    fn connect(&self, config: ModelConfig) -> Result<Arc<dyn Completion>, LlmError> {
        Ok(Arc::new(LlmClient::new(config)?))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

/// Both vendors wrap failures as `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP client
// ────────────────────────────────────────────────────────────────────────────

/// HTTP-backed completion client for one `ModelConfig`.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: ModelConfig,
}

impl LlmClient {
    pub fn new(config: ModelConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    async fn call_openai(&self, messages: &[Message]) -> Result<String, LlmError> {
        let request_body = OpenAiRequest {
            model: &self.config.model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(read_api_error(response).await);
        }

        let body: OpenAiResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyContent)
    }

    async fn call_anthropic(&self, messages: &[Message]) -> Result<String, LlmError> {
        let (system, turns) = split_system(messages);
        let request_body = AnthropicRequest {
            model: &self.config.model,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system,
            messages: turns,
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", self.config.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(read_api_error(response).await);
        }

        let body: AnthropicResponse = response.json().await?;
        if let Some(usage) = &body.usage {
            debug!(
                "Anthropic call succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }

        body.content
            .into_iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text)
            .ok_or(LlmError::EmptyContent)
    }
}

#[async_trait]
impl Completion for LlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        debug!(
            provider = %self.config.provider,
            model = %self.config.model,
            messages = messages.len(),
            "Sending completion request"
        );
        match self.config.provider {
            Provider::OpenAi => self.call_openai(messages).await,
            Provider::Anthropic => self.call_anthropic(messages).await,
        }
    }
}

/// Anthropic takes system instructions out-of-band; fold every system turn into one field.
fn split_system(messages: &[Message]) -> (Option<String>, Vec<WireMessage<'_>>) {
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();
    let turns = messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| WireMessage {
            role: m.role.as_str(),
            content: &m.content,
        })
        .collect();
    let system = (!system.is_empty()).then(|| system.join("\n\n"));
    (system, turns)
}

async fn read_api_error(response: reqwest::Response) -> LlmError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api { status, message }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
