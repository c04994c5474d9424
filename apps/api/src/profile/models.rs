//! Candidate profile schema: the canonical structured record every parse path produces.
//!
//! Absent data is always a sentinel (`Unknown`, `N/A`) or an empty list, never a missing key.
//! `CVProfile::from_value` is the validating factory used on generative replies.

use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Sentinel for a candidate whose name could not be determined.
pub const UNKNOWN: &str = "Unknown";
/// Sentinel for any other text field without data.
pub const NOT_AVAILABLE: &str = "N/A";

/// Separator placed between accumulated notes.
const NOTE_SEPARATOR: &str = " | ";

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Expected a JSON object for the profile, found {0}")]
    NotAnObject(&'static str),

    #[error("Profile field has an incompatible shape: {0}")]
    Field(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    #[serde(default = "not_available", deserialize_with = "text_or_not_available")]
    pub title: String,
    #[serde(default = "not_available", deserialize_with = "text_or_not_available")]
    pub journal: String,
    #[serde(default, deserialize_with = "optional_year")]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    #[serde(default = "not_available", deserialize_with = "text_or_not_available")]
    pub title: String,
    /// Free text, currency left as written ("$500K", "¥2M").
    #[serde(default, deserialize_with = "optional_text")]
    pub amount: Option<String>,
    #[serde(default, deserialize_with = "optional_year")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "optional_text")]
    pub sponsor: Option<String>,
}

/// Structured representation of a parsed academic CV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CVProfile {
    #[serde(default = "unknown", deserialize_with = "text_or_unknown")]
    pub name: String,
    #[serde(default = "not_available", deserialize_with = "text_or_not_available")]
    pub current_institution: String,
    #[serde(default = "not_available", deserialize_with = "text_or_not_available")]
    pub estimated_ranking: String,
    /// Kept as text: CVs say "~40" or "35-40" as often as "37".
    #[serde(default, deserialize_with = "optional_text")]
    pub h_index: Option<String>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub research_focus_keywords: Vec<String>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub key_publications: Vec<Publication>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub grants: Vec<Grant>,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub notes: String,
}

impl Default for CVProfile {
    fn default() -> Self {
        Self {
            name: unknown(),
            current_institution: not_available(),
            estimated_ranking: not_available(),
            h_index: None,
            research_focus_keywords: Vec::new(),
            key_publications: Vec::new(),
            grants: Vec::new(),
            notes: String::new(),
        }
    }
}

impl CVProfile {
    /// Builds a profile from an arbitrary decoded JSON value.
    ///
    /// Missing or null fields take their defaults. A present field with an
    /// incompatible shape (a list given as a scalar, a null list entry) fails.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        if !value.is_object() {
            return Err(SchemaError::NotAnObject(json_kind(&value)));
        }
        let mut profile: CVProfile = serde_json::from_value(value)?;
        profile.research_focus_keywords = dedup_preserving_order(profile.research_focus_keywords);
        Ok(profile)
    }

    /// Returns the profile with `note` appended to any existing notes.
    pub fn with_note(mut self, note: &str) -> Self {
        if self.notes.trim().is_empty() {
            self.notes = note.to_string();
        } else {
            self.notes = format!("{}{NOTE_SEPARATOR}{note}", self.notes);
        }
        self
    }

    /// Returns the profile under a recruiter-supplied display name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.trim().to_string();
        self
    }

    /// Pretty JSON in the wire shape, for embedding in prompts.
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

pub fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field decoders
// ────────────────────────────────────────────────────────────────────────────

fn unknown() -> String {
    UNKNOWN.to_string()
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

/// Scalars become text, null becomes `None`, lists and objects are rejected.
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) => Err(D::Error::invalid_type(Unexpected::Seq, &"a string")),
        Value::Object(_) => Err(D::Error::invalid_type(Unexpected::Map, &"a string")),
    }
}

fn text_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_else(unknown))
}

fn text_or_not_available<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_else(not_available))
}

pub(crate) fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

/// Integer years, numeric strings, and "not available" markers.
fn optional_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .and_then(|y| i32::try_from(y).ok())
            .map(Some)
            .ok_or_else(|| D::Error::invalid_value(Unexpected::Other("number"), &"a year")),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || s.eq_ignore_ascii_case(NOT_AVAILABLE) || s.eq_ignore_ascii_case("unknown") {
                return Ok(None);
            }
            s.parse::<i32>()
                .map(Some)
                .map_err(|_| D::Error::invalid_value(Unexpected::Str(s), &"a year"))
        }
        Value::Bool(b) => Err(D::Error::invalid_type(Unexpected::Bool(b), &"a year")),
        Value::Array(_) => Err(D::Error::invalid_type(Unexpected::Seq, &"a year")),
        Value::Object(_) => Err(D::Error::invalid_type(Unexpected::Map, &"a year")),
    }
}

/// A null list is an empty list; a null entry inside a list is still an error.
pub(crate) fn list_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
