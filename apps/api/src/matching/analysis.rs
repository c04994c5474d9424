//! Analysis orchestrator: scores a candidate profile against a target research direction.
//!
//! One LLM call. A reply that does not decode into `ScoreReport` is not an error:
//! the raw text is kept as `reasoning` with a `N/A` score. Upstream failures propagate.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{strip_json_fences, Completion, Message};
use crate::matching::prompts::matching_prompt;
use crate::profile::models::{list_or_empty, text_or_empty, CVProfile, NOT_AVAILABLE};

/// Models answer with `85`, `85.5`, or `"85/100"`; all are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuitabilityScore {
    Value(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub suitability_score: SuitabilityScore,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub reasoning: String,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub gaps: Vec<String>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub recommended_projects: Vec<String>,
}

impl ScoreReport {
    /// Report for a reply we could not decode: every byte of the reply survives in `reasoning`.
    pub fn degraded(raw_reply: &str) -> Self {
        Self {
            suitability_score: SuitabilityScore::Text(NOT_AVAILABLE.to_string()),
            reasoning: raw_reply.to_string(),
            strengths: vec![],
            gaps: vec![],
            recommended_projects: vec![],
        }
    }
}

/// Scores `profile` against `target_direction` with a single completion call.
pub async fn analyze_candidate(
    profile: &CVProfile,
    target_direction: &str,
    completion: &dyn Completion,
) -> Result<ScoreReport, AppError> {
    let target_direction = target_direction.trim();
    if target_direction.is_empty() {
        return Err(AppError::Validation(
            "target_direction cannot be empty".to_string(),
        ));
    }

    let prompt = matching_prompt(&profile.to_prompt_json(), target_direction);
    let messages = [Message::system(JSON_ONLY_SYSTEM), Message::user(prompt)];
    let reply = completion
        .complete(&messages)
        .await
        .map_err(|e| AppError::Llm(format!("Match analysis failed: {e}")))?;

    let report = decode_report(&reply);
    info!(
        "Match analysis for {}: score={:?}",
        profile.name, report.suitability_score
    );
    Ok(report)
}

/// Decodes a matching reply, degrading instead of failing.
pub fn decode_report(reply: &str) -> ScoreReport {
    match serde_json::from_str::<ScoreReport>(strip_json_fences(reply)) {
        Ok(report) => report,
        Err(e) => {
            warn!("Match reply is not a score report ({e}); keeping raw text");
            ScoreReport::degraded(reply)
        }
    }
}
