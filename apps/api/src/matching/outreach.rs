//! Outreach orchestrator: drafts a personalized invitation email.
//!
//! The reply is prose and is returned exactly as the model wrote it.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{Completion, Message};
use crate::matching::prompts::{outreach_prompt, OUTREACH_SYSTEM};
use crate::profile::models::CVProfile;

/// Languages the outreach writer is offered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Chinese,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => f.write_str("English"),
            Language::Chinese => f.write_str("Chinese"),
        }
    }
}

/// Drafts an outreach email for `profile` with a single completion call.
pub async fn draft_outreach(
    profile: &CVProfile,
    institute_value: &str,
    language: Language,
    completion: &dyn Completion,
) -> Result<String, AppError> {
    let prompt = outreach_prompt(&profile.to_prompt_json(), institute_value.trim(), language);
    let messages = [Message::system(OUTREACH_SYSTEM), Message::user(prompt)];
    let email = completion
        .complete(&messages)
        .await
        .map_err(|e| AppError::Llm(format!("Outreach drafting failed: {e}")))?;

    info!(
        "Drafted {} outreach for {} ({} chars)",
        language,
        profile.name,
        email.chars().count()
    );
    Ok(email)
}
