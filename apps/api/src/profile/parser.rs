//! Structured parse orchestrator: generative extraction with unconditional heuristic fallback.
//!
//! Flow: heuristic_extract (always) → extraction prompt + truncated CV text → LLM →
//!       strip fences → JSON decode → CVProfile::from_value.
//!
//! Any upstream, decode, or schema failure returns the heuristic profile with
//! `LLM_FALLBACK_NOTE` appended. This function never fails outward.

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{strip_json_fences, Completion, LlmError, Message};
use crate::profile::heuristic::heuristic_extract;
use crate::profile::models::{CVProfile, SchemaError};
use crate::profile::prompts::extraction_prompt;

/// Appended to the heuristic profile's notes when the generative path fails.
pub const LLM_FALLBACK_NOTE: &str = "LLM parsing failed to return valid JSON.";

/// Longer documents are cut to this many characters before extraction.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 12_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionOptions {
    pub max_input_chars: usize,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }
}

#[derive(Debug, Error)]
enum StructuredParseError {
    #[error("completion failed: {0}")]
    Upstream(#[from] LlmError),

    #[error("reply is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("reply does not match the profile schema: {0}")]
    Schema(#[from] SchemaError),
}

/// Parses CV text into a profile.
///
/// With `completion == None` this is the heuristic path. Otherwise the generative
/// result wins when it validates, and the heuristic result (annotated) is returned
/// when it does not.
pub async fn parse_profile(
    text: &str,
    completion: Option<&dyn Completion>,
    options: &ExtractionOptions,
) -> CVProfile {
    let baseline = heuristic_extract(text);

    let Some(completion) = completion else {
        info!("Heuristic CV parse ({} chars)", text.chars().count());
        return baseline;
    };

    match structured_parse(text, completion, options).await {
        Ok(profile) => {
            info!(
                "Structured CV parse succeeded: {} publications, {} grants",
                profile.key_publications.len(),
                profile.grants.len()
            );
            profile
        }
        Err(e) => {
            warn!("Structured CV parse failed, using heuristic profile: {e}");
            baseline.with_note(LLM_FALLBACK_NOTE)
        }
    }
}

async fn structured_parse(
    text: &str,
    completion: &dyn Completion,
    options: &ExtractionOptions,
) -> Result<CVProfile, StructuredParseError> {
    let messages = [
        Message::system(extraction_prompt()),
        Message::user(truncate_chars(text, options.max_input_chars)),
    ];
    let reply = completion.complete(&messages).await?;
    let value: Value = serde_json::from_str(strip_json_fences(&reply))?;
    Ok(CVProfile::from_value(value)?)
}

/// Cuts `text` to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
