//! Axum route handlers for the Matching API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::config::ModelSettings;
use crate::errors::AppError;
use crate::matching::analysis::{analyze_candidate, ScoreReport};
use crate::matching::outreach::{draft_outreach, Language};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub target_direction: String,
    #[serde(default)]
    pub model: ModelSettings,
}

#[derive(Debug, Deserialize)]
pub struct OutreachRequest {
    #[serde(default)]
    pub institute_value: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub model: ModelSettings,
}

#[derive(Debug, Serialize)]
pub struct OutreachResponse {
    pub candidate: String,
    pub language: Language,
    pub email: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/candidates/:name/analysis
///
/// Scores the stored profile against a research direction and keeps the report
/// for the outreach step.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<ScoreReport>, AppError> {
    let profile = state
        .sessions
        .profile(&name)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Candidate '{name}' not found")))?;

    let completion =
        state.require_completion(&request.model, "API key required for LLM analysis.")?;

    let report = analyze_candidate(&profile, &request.target_direction, completion.as_ref()).await?;
    state.sessions.save_analysis(&name, report.clone()).await;

    Ok(Json(report))
}

/// POST /api/v1/candidates/:name/outreach
///
/// Drafts an outreach email. Requires a prior analysis of the same candidate.
pub async fn handle_outreach(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<OutreachRequest>,
) -> Result<Json<OutreachResponse>, AppError> {
    if state.sessions.analysis(&name).await.is_none() {
        return Err(AppError::Validation(
            "Run a matching analysis first to prepare outreach content.".to_string(),
        ));
    }

    let profile = state.sessions.profile(&name).await.ok_or_else(|| {
        AppError::NotFound(format!("Profile for '{name}' missing. Please rerun analysis."))
    })?;

    let completion =
        state.require_completion(&request.model, "API key required for outreach generation.")?;

    let email = draft_outreach(
        &profile,
        &request.institute_value,
        request.language,
        completion.as_ref(),
    )
    .await?;

    Ok(Json(OutreachResponse {
        candidate: name,
        language: request.language,
        email,
    }))
}
