use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::llm_client::{LlmError, ModelConfig, Provider};
use crate::profile::parser::{ExtractionOptions, DEFAULT_MAX_INPUT_CHARS};

/// Application configuration loaded from environment variables.
///
/// No API key is required at startup: without one the service still parses CVs
/// heuristically, and callers may supply their own key per request.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub llm_provider: Provider,
    pub llm_model: Option<String>,
    pub openai_api_key: Option<SecretString>,
    pub anthropic_api_key: Option<SecretString>,
    pub extraction: ExtractionOptions,
    /// Largest accepted CV upload request, in bytes.
    pub max_upload_bytes: usize,
}

/// Default upload ceiling: 25 MiB, enough for scanned multi-page CVs.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Per-request model settings. Unset fields fall back to the configured defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelSettings {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm_provider = std::env::var("LLM_PROVIDER")
            .unwrap_or_else(|_| "openai".to_string())
            .parse::<Provider>()
            .context("LLM_PROVIDER must be 'openai' or 'anthropic'")?;

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_provider,
            llm_model: optional_env("LLM_MODEL"),
            openai_api_key: optional_env(Provider::OpenAi.api_key_var()).map(SecretString::from),
            anthropic_api_key: optional_env(Provider::Anthropic.api_key_var())
                .map(SecretString::from),
            extraction: ExtractionOptions {
                max_input_chars: std::env::var("EXTRACTION_MAX_CHARS")
                    .unwrap_or_else(|_| DEFAULT_MAX_INPUT_CHARS.to_string())
                    .parse::<usize>()
                    .context("EXTRACTION_MAX_CHARS must be a positive integer")?,
            },
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a positive integer")?,
        })
    }

    fn api_key_for(&self, provider: Provider) -> Option<&SecretString> {
        match provider {
            Provider::OpenAi => self.openai_api_key.as_ref(),
            Provider::Anthropic => self.anthropic_api_key.as_ref(),
        }
    }

    /// Merges per-request settings over the configured defaults.
    ///
    /// `Ok(None)` means no API key is available for the chosen provider.
    /// An unsupported provider name is a configuration error.
    pub fn resolve_model(&self, settings: &ModelSettings) -> Result<Option<ModelConfig>, LlmError> {
        let provider = match non_blank(&settings.provider) {
            Some(raw) => raw.parse::<Provider>()?,
            None => self.llm_provider,
        };

        let api_key = match non_blank(&settings.api_key) {
            Some(key) => key.to_string(),
            None => match self.api_key_for(provider) {
                Some(key) => key.expose_secret().to_string(),
                None => return Ok(None),
            },
        };

        // The configured model only applies to the configured provider.
        let model = match non_blank(&settings.model) {
            Some(model) => model.to_string(),
            None if provider == self.llm_provider => self.llm_model.clone().unwrap_or_default(),
            None => String::new(),
        };

        ModelConfig::for_provider(provider, &model, &api_key).map(Some)
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
