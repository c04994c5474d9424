// All LLM prompt builders for the Matching module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::matching::outreach::Language;

/// System prompt for outreach drafting: prose, not JSON.
pub const OUTREACH_SYSTEM: &str = "You are an experienced academic recruiter writing on behalf of \
    a medical research institute. Write in plain prose. \
    Do NOT invent achievements that are not in the candidate profile.";

/// Matching prompt: candidate profile JSON + free-text research direction.
pub fn matching_prompt(cv_summary: &str, target_direction: &str) -> String {
    format!(
        r#"You are assisting a medical research institute to evaluate faculty candidates.
Consider the following parsed CV data:

{cv_summary}

Target research direction: {target_direction}

Return a JSON object with this EXACT schema:
{{
  "suitability_score": 0-100,
  "reasoning": "2-3 sentences",
  "strengths": ["string"],
  "gaps": ["string"],
  "recommended_projects": ["short project idea"]
}}"#
    )
}

/// Outreach prompt: candidate profile JSON + institute value proposition + language.
pub fn outreach_prompt(candidate_profile: &str, institute_value: &str, language: Language) -> String {
    format!(
        r#"Write a concise, respectful outreach email to a senior scientist about joining our institute.
Use an academic tone and reference specific achievements from the profile below.

Candidate profile:

{candidate_profile}

Institute value proposition: {institute_value}
Language: {language}

Include a specific paper or grant mention to prove personalization."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_prompt_embeds_inputs_and_fields() {
        let prompt = matching_prompt("{\"name\": \"Dr. Ada Zhang\"}", "Tumor immunology");
        assert!(prompt.contains("\"name\": \"Dr. Ada Zhang\""));
        assert!(prompt.contains("Target research direction: Tumor immunology"));
        for field in [
            "suitability_score",
            "reasoning",
            "strengths",
            "gaps",
            "recommended_projects",
        ] {
            assert!(prompt.contains(field), "missing {field}");
        }
    }

    #[test]
    fn test_matching_prompt_is_deterministic() {
        assert_eq!(
            matching_prompt("{}", "Neuroscience"),
            matching_prompt("{}", "Neuroscience")
        );
    }

    #[test]
    fn test_outreach_prompt_names_language_and_value() {
        let prompt = outreach_prompt("{}", "Startup package of $2M", Language::Chinese);
        assert!(prompt.contains("Language: Chinese"));
        assert!(prompt.contains("Institute value proposition: Startup package of $2M"));
        assert!(prompt.contains("paper or grant"));
    }
}
