//! Axum route handlers for the Candidate API.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ModelSettings;
use crate::errors::AppError;
use crate::llm_client::Completion;
use crate::profile::demo::demo_profile;
use crate::profile::document::extract_text;
use crate::profile::models::CVProfile;
use crate::profile::parser::parse_profile;
use crate::session::CandidateRow;
use crate::state::AppState;

const MISSING_KEY_FOR_PARSING: &str = "Provide an API key or disable LLM parsing.";

/// Path segments under `/api/v1/candidates` taken by fixed routes.
const RESERVED_NAMES: [&str; 3] = ["parse", "parse-text", "demo"];

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseTextRequest {
    pub text: String,
    pub candidate_name: Option<String>,
    #[serde(default = "default_use_llm")]
    pub use_llm: bool,
    #[serde(default)]
    pub model: ModelSettings,
}

fn default_use_llm() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub profile: CVProfile,
}

#[derive(Debug, Serialize)]
pub struct CandidateListResponse {
    pub candidates: Vec<CandidateRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/candidates/parse
///
/// Multipart upload: `file` (PDF), optional `candidate_name`, `use_llm`,
/// `provider`, `model`, `api_key`.
pub async fn handle_parse_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParseResponse>, AppError> {
    let mut file: Option<Vec<u8>> = None;
    let mut candidate_name: Option<String> = None;
    let mut use_llm = true;
    let mut settings = ModelSettings::default();

    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => file = Some(field.bytes().await.map_err(invalid_multipart)?.to_vec()),
            "candidate_name" => candidate_name = Some(field.text().await.map_err(invalid_multipart)?),
            "use_llm" => use_llm = parse_flag(&field.text().await.map_err(invalid_multipart)?)?,
            "provider" => settings.provider = Some(field.text().await.map_err(invalid_multipart)?),
            "model" => settings.model = Some(field.text().await.map_err(invalid_multipart)?),
            "api_key" => settings.api_key = Some(field.text().await.map_err(invalid_multipart)?),
            _ => {}
        }
    }

    let bytes = file
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::Validation("Please upload a PDF file first.".to_string()))?;

    // Settings are checked before the document is touched.
    let completion = connect_for_parsing(&state, use_llm, &settings)?;

    let text = tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Text extraction task failed: {e}")))??;

    let profile = ingest(&state, &text, candidate_name.as_deref(), completion).await?;
    Ok(Json(ParseResponse { profile }))
}

/// POST /api/v1/candidates/parse-text
///
/// Same pipeline as the upload route, for text that was extracted elsewhere.
pub async fn handle_parse_text(
    State(state): State<AppState>,
    Json(request): Json<ParseTextRequest>,
) -> Result<Json<ParseResponse>, AppError> {
    let completion = connect_for_parsing(&state, request.use_llm, &request.model)?;
    let profile = ingest(
        &state,
        &request.text,
        request.candidate_name.as_deref(),
        completion,
    )
    .await?;
    Ok(Json(ParseResponse { profile }))
}

/// POST /api/v1/candidates/demo
///
/// Stores the built-in demo profile so matching and outreach can be tried without a CV.
pub async fn handle_load_demo(State(state): State<AppState>) -> Json<ParseResponse> {
    let profile = demo_profile();
    state.sessions.save_profile(profile.clone()).await;
    info!("Demo profile added for {}", profile.name);
    Json(ParseResponse { profile })
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(State(state): State<AppState>) -> Json<CandidateListResponse> {
    Json(CandidateListResponse {
        candidates: state.sessions.candidate_table().await,
    })
}

/// GET /api/v1/candidates/:name
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CVProfile>, AppError> {
    state
        .sessions
        .profile(&name)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Candidate '{name}' not found")))
}

/// DELETE /api/v1/session
pub async fn handle_clear_session(State(state): State<AppState>) -> StatusCode {
    state.sessions.clear().await;
    info!("Session cleared");
    StatusCode::NO_CONTENT
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn connect_for_parsing(
    state: &AppState,
    use_llm: bool,
    settings: &ModelSettings,
) -> Result<Option<Arc<dyn Completion>>, AppError> {
    if !use_llm {
        return Ok(None);
    }
    state
        .require_completion(settings, MISSING_KEY_FOR_PARSING)
        .map(Some)
}

/// Parses, applies the recruiter's name override, and stores the profile.
async fn ingest(
    state: &AppState,
    text: &str,
    candidate_name: Option<&str>,
    completion: Option<Arc<dyn Completion>>,
) -> Result<CVProfile, AppError> {
    let candidate_name = candidate_name.map(str::trim).filter(|n| !n.is_empty());
    if let Some(name) = candidate_name {
        check_candidate_name(name)?;
    }

    let profile = parse_profile(text, completion.as_deref(), &state.config.extraction).await;
    let profile = match candidate_name {
        Some(name) => profile.with_name(name),
        None => profile,
    };
    check_candidate_name(&profile.name)?;

    state.sessions.save_profile(profile.clone()).await;
    info!("Parsed profile saved for {}", profile.name);
    Ok(profile)
}

/// Names are path segments of the candidate routes: fixed segments and `/` cannot be addressed.
fn check_candidate_name(name: &str) -> Result<(), AppError> {
    if name.contains('/') || RESERVED_NAMES.contains(&name) {
        return Err(AppError::Validation(format!(
            "Candidate name '{name}' cannot be used; set candidate_name to another value."
        )));
    }
    Ok(())
}

fn parse_flag(raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(AppError::Validation(format!(
            "use_llm must be true or false, got '{other}'"
        ))),
    }
}

fn invalid_multipart(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(format!("CV upload is too large: {}", e.body_text()));
    }
    AppError::Validation(format!("Invalid multipart body: {e}"))
}
