use std::sync::Arc;

use crate::config::{Config, ModelSettings};
use crate::errors::AppError;
use crate::llm_client::{Completion, CompletionFactory};
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    /// Builds completion backends per request. Default: HttpCompletionFactory.
    pub completions: Arc<dyn CompletionFactory>,
}

impl AppState {
    /// Resolves request settings and connects a backend.
    ///
    /// `Ok(None)` when no API key is available; unsupported providers fail here,
    /// before any backend is constructed.
    pub fn completion(
        &self,
        settings: &ModelSettings,
    ) -> Result<Option<Arc<dyn Completion>>, AppError> {
        match self.config.resolve_model(settings)? {
            Some(model) => {
                tracing::debug!("Connecting {} backend ({})", model.provider, model.model);
                Ok(Some(self.completions.connect(model)?))
            }
            None => Ok(None),
        }
    }

    /// Like `completion`, but a missing API key is a validation error with `message`.
    pub fn require_completion(
        &self,
        settings: &ModelSettings,
        message: &str,
    ) -> Result<Arc<dyn Completion>, AppError> {
        self.completion(settings)?
            .ok_or_else(|| AppError::Validation(message.to_string()))
    }
}
