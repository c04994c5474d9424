//! Heuristic extractor: a best-effort profile from raw text, no external calls.
//!
//! This is the always-available baseline: it runs without credentials and
//! never fails, whatever the input.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::profile::models::{dedup_preserving_order, CVProfile, Publication};

/// Note attached to every heuristic profile.
pub const HEURISTIC_NOTE: &str = "Heuristic extraction; refine with LLM for richer details.";

/// Journals whose mere mention is worth surfacing as a publication highlight.
pub const HIGHLIGHT_JOURNALS: [&str; 4] = ["Nature", "Science", "Cell", "Lancet"];

const MAX_KEYWORDS: usize = 10;

static H_INDEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)H-?Index[:\s]+(\d+)").expect("h-index pattern is valid"));

static CAPITALIZED_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-zA-Z]{3,}\b").expect("keyword pattern is valid"));

/// Derives a profile from `text` using fixed pattern rules.
///
/// - `h_index`: digits after the first "H-Index"/"HIndex" (any case)
/// - keywords: capitalized words of 4+ letters, first 10 distinct in text order
/// - publications: one highlight per journal in `HIGHLIGHT_JOURNALS` mentioned anywhere
pub fn heuristic_extract(text: &str) -> CVProfile {
    CVProfile {
        h_index: extract_h_index(text),
        research_focus_keywords: extract_keywords(text),
        key_publications: journal_highlights(text),
        notes: HEURISTIC_NOTE.to_string(),
        ..CVProfile::default()
    }
}

fn extract_h_index(text: &str) -> Option<String> {
    H_INDEX
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn extract_keywords(text: &str) -> Vec<String> {
    let words = CAPITALIZED_WORD
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    let mut keywords = dedup_preserving_order(words);
    keywords.truncate(MAX_KEYWORDS);
    keywords
}

fn journal_highlights(text: &str) -> Vec<Publication> {
    let lowered = text.to_lowercase();
    HIGHLIGHT_JOURNALS
        .iter()
        .filter(|journal| lowered.contains(&journal.to_lowercase()))
        .map(|journal| Publication {
            title: format!("Highlight from {journal}"),
            journal: journal.to_string(),
            year: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::models::{NOT_AVAILABLE, UNKNOWN};

    const SAMPLE_CV: &str = r#"
        Curriculum Vitae — Dr. Mei Tanaka
        Associate Professor, Department of Immunology, Kyoto University
        Google Scholar H-Index: 37, citations 8,200
        Selected publications:
          Tumor microenvironment remodeling. Nature Medicine, 2022.
          Single-cell atlas of lymph nodes. SCIENCE, 2020.
        Funding: JSPS Kakenhi grant, 2019–2023.
    "#;

    #[test]
    fn test_empty_text_yields_sparse_valid_profile() {
        let profile = heuristic_extract("");
        assert_eq!(profile.name, UNKNOWN);
        assert_eq!(profile.current_institution, NOT_AVAILABLE);
        assert!(profile.h_index.is_none());
        assert!(profile.research_focus_keywords.is_empty());
        assert!(profile.key_publications.is_empty());
        assert_eq!(profile.notes, HEURISTIC_NOTE);
    }

    #[test]
    fn test_h_index_captured_any_case() {
        assert_eq!(
            heuristic_extract("h-index: 37").h_index.as_deref(),
            Some("37")
        );
        assert_eq!(
            heuristic_extract("Profile HINDEX 12 overall").h_index.as_deref(),
            Some("12")
        );
        assert_eq!(heuristic_extract(SAMPLE_CV).h_index.as_deref(), Some("37"));
    }

    #[test]
    fn test_h_index_absent_is_none() {
        assert!(heuristic_extract("Index of works, 40 papers").h_index.is_none());
    }

    #[test]
    fn test_first_h_index_wins() {
        let profile = heuristic_extract("H-Index: 21 (Scopus), H-Index: 25 (Scholar)");
        assert_eq!(profile.h_index.as_deref(), Some("21"));
    }

    #[test]
    fn test_journal_hints_one_per_journal() {
        let profile = heuristic_extract("nature 2020, Nature 2021, THE LANCET 2019");
        let journals: Vec<&str> = profile
            .key_publications
            .iter()
            .map(|p| p.journal.as_str())
            .collect();
        assert_eq!(journals, vec!["Nature", "Lancet"]);
        assert_eq!(profile.key_publications[0].title, "Highlight from Nature");
        assert!(profile.key_publications.iter().all(|p| p.year.is_none()));
    }

    #[test]
    fn test_all_four_journals_detected() {
        let profile = heuristic_extract("nature science cell lancet");
        assert_eq!(profile.key_publications.len(), 4);
    }

    #[test]
    fn test_absent_journals_produce_no_entries() {
        let profile = heuristic_extract("Published in PNAS and eLife.");
        assert!(profile.key_publications.is_empty());
    }

    #[test]
    fn test_keywords_deduplicated_in_order_of_appearance() {
        let profile = heuristic_extract("Immunology and Genomics. Immunology again, then Proteomics.");
        assert_eq!(
            profile.research_focus_keywords,
            vec!["Immunology", "Genomics", "Proteomics"]
        );
    }

    #[test]
    fn test_keywords_skip_short_and_lowercase_words() {
        let profile = heuristic_extract("The DNA lab uses Rust and python for Bioinformatics");
        assert_eq!(profile.research_focus_keywords, vec!["Rust", "Bioinformatics"]);
    }

    #[test]
    fn test_keywords_truncated_to_ten() {
        let text = "Alpha Bravo Charlie Delta Echo Foxtrot Golf Hotel India Juliet Kilo Lima";
        let profile = heuristic_extract(text);
        assert_eq!(profile.research_focus_keywords.len(), MAX_KEYWORDS);
        assert_eq!(profile.research_focus_keywords[0], "Alpha");
        assert_eq!(profile.research_focus_keywords[9], "Juliet");
    }

    #[test]
    fn test_extraction_is_deterministic() {
        assert_eq!(heuristic_extract(SAMPLE_CV), heuristic_extract(SAMPLE_CV));
    }
}
