// Profile extraction prompt.

use crate::llm_client::prompts::MISSING_VALUE_INSTRUCTION;

/// Extraction prompt template. Replace `{missing_value_instruction}` before sending.
const EXTRACTION_PROMPT_TEMPLATE: &str = r#"You are an expert research administrator. Extract the following fields from the provided CV text.

Return a compact JSON object with this EXACT schema (no extra fields):
{
  "name": "string",
  "current_institution": "string",
  "estimated_ranking": "string",
  "h_index": "string" | null,
  "research_focus_keywords": ["string"],
  "key_publications": [
    {"title": "string", "journal": "string", "year": 2023}
  ],
  "grants": [
    {"title": "string", "amount": "string" | null, "year": 2021, "sponsor": "string" | null}
  ],
  "notes": "string"
}

RULES:
1. Journals of interest include Nature, Science, Cell, and The Lancet.
2. `year` must be an integer or null.
3. `h_index` is text; keep approximations such as "~40" as written.
4. {missing_value_instruction}
5. Return ONLY the JSON object. Nothing else, no code fences."#;

/// System prompt for the structured CV extraction call. The CV text goes in the user turn.
pub fn extraction_prompt() -> String {
    EXTRACTION_PROMPT_TEMPLATE.replace("{missing_value_instruction}", MISSING_VALUE_INSTRUCTION)
}
