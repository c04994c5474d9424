//! Session state: parsed profiles and score reports, keyed by candidate name.
//!
//! Process-local, starts empty, gone on restart. The lock serializes concurrent
//! requests; the core modules themselves hold no shared state.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::matching::analysis::ScoreReport;
use crate::profile::models::CVProfile;

#[derive(Default)]
struct SessionMaps {
    profiles: BTreeMap<String, CVProfile>,
    analyses: BTreeMap<String, ScoreReport>,
}

/// One row of the candidate overview table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRow {
    pub name: String,
    pub institution: String,
    pub h_index: Option<String>,
    /// Research keywords joined with ", ".
    pub focus: String,
    /// Journals of the key publications joined with ", ".
    pub publications: String,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<SessionMaps>>,
}

impl SessionStore {
    /// Stores `profile` under its name, replacing any earlier parse of the same name.
    pub async fn save_profile(&self, profile: CVProfile) {
        let mut maps = self.inner.write().await;
        maps.profiles.insert(profile.name.clone(), profile);
    }

    pub async fn profile(&self, name: &str) -> Option<CVProfile> {
        self.inner.read().await.profiles.get(name).cloned()
    }

    pub async fn save_analysis(&self, name: &str, report: ScoreReport) {
        let mut maps = self.inner.write().await;
        maps.analyses.insert(name.to_string(), report);
    }

    pub async fn analysis(&self, name: &str) -> Option<ScoreReport> {
        self.inner.read().await.analyses.get(name).cloned()
    }

    /// Overview of every parsed candidate, sorted by name.
    pub async fn candidate_table(&self) -> Vec<CandidateRow> {
        self.inner
            .read()
            .await
            .profiles
            .iter()
            .map(|(name, profile)| CandidateRow {
                name: name.clone(),
                institution: profile.current_institution.clone(),
                h_index: profile.h_index.clone(),
                focus: profile.research_focus_keywords.join(", "),
                publications: profile
                    .key_publications
                    .iter()
                    .map(|p| p.journal.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
            .collect()
    }

    /// Ends the session: forgets every profile and report.
    pub async fn clear(&self) {
        let mut maps = self.inner.write().await;
        maps.profiles.clear();
        maps.analyses.clear();
    }
}
