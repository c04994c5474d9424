use std::fmt;
use std::str::FromStr;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::LlmError;

/// Supported generative backends. Selection is a plain `match`, never a lookup by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
        }
    }

    /// Model used when the caller names a provider but no model.
    pub fn default_model(self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Anthropic => "claude-3-5-sonnet-20240620",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            other => Err(LlmError::Configuration(format!(
                "Unsupported provider '{other}'. Choose 'openai' or 'anthropic'."
            ))),
        }
    }
}

/// Resolved settings for one backend. Immutable once built.
///
/// `Debug` comes from `SecretString`, which prints `[REDACTED]` for the key.
/// Deliberately not `Serialize`.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub provider: Provider,
    pub model: String,
    pub api_key: SecretString,
}

impl ModelConfig {
    /// Validates raw settings. Unsupported providers and blank keys are rejected
    /// here, so no request can ever be built from them.
    pub fn new(provider: &str, model: &str, api_key: &str) -> Result<Self, LlmError> {
        Self::for_provider(provider.parse()?, model, api_key)
    }

    /// Like `new`, for a provider that is already known to be supported.
    /// A blank model selects the provider's default model.
    pub fn for_provider(provider: Provider, model: &str, api_key: &str) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::Configuration(format!(
                "An API key is required for provider '{provider}'"
            )));
        }
        let model = match model.trim() {
            "" => provider.default_model().to_string(),
            m => m.to_string(),
        };
        Ok(Self {
            provider,
            model,
            api_key: SecretString::from(api_key.trim().to_string()),
        })
    }
}
