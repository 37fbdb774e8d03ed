//! Redistribution policy configuration.
//!
//! Every policy constant the engine consults lives here. Nothing in the
//! pipeline reads a hidden default; callers either pass
//! `RedistributionConfig::default()` or load one from JSON.

use crate::error::{RosterError, RosterResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CAP: u32 = 9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedistributionConfig {
    /// Maximum total caseload any one staff member may carry after the run.
    pub cap: u32,
    /// Note phrases marking a multi-day absence. P2 tiers of a matching
    /// record are redistributed even when the record is present today.
    pub absence_phrases: Vec<String>,
    /// Note phrases marking a supervision context. Cases owned by a
    /// matching record are never placed through the secondary pool.
    pub restricted_phrases: Vec<String>,
    /// Allow present staff with no declared capacity to absorb residuals.
    pub secondary_pool_enabled: bool,
    /// Rank same-ward helpers ahead of cross-ward helpers.
    pub ward_affinity_enabled: bool,
    /// Words that turn a non-numeric can-help / need-help cell into 1.
    pub affirmative_keywords: Vec<String>,
    /// Whole-cell answers that force a non-numeric can-help / need-help
    /// cell to 0. Only an exact match counts, so "Sure, no problem" still
    /// reads as affirmative while a bare "not able" reads as 0.
    pub negative_keywords: Vec<String>,
}

impl Default for RedistributionConfig {
    fn default() -> Self {
        Self {
            cap: DEFAULT_CAP,
            absence_phrases: vec!["away the rest of the week".into()],
            restricted_phrases: vec!["mentoring".into(), "student".into()],
            secondary_pool_enabled: true,
            ward_affinity_enabled: true,
            affirmative_keywords: ["yes", "ok", "able", "can", "sure"]
                .into_iter()
                .map(String::from)
                .collect(),
            negative_keywords: ["no", "none", "not able", "unable", "cannot", "can't"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl RedistributionConfig {
    /// Load from a JSON file. Missing keys fall back to the defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: RedistributionConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject phrase lists containing blank entries. A blank phrase would
    /// match every note and silently flag the whole roster.
    pub fn validate(&self) -> RosterResult<()> {
        let lists = [
            ("absence_phrases", &self.absence_phrases),
            ("restricted_phrases", &self.restricted_phrases),
            ("affirmative_keywords", &self.affirmative_keywords),
            ("negative_keywords", &self.negative_keywords),
        ];
        for (key, list) in lists {
            if list.iter().any(|p| p.trim().is_empty()) {
                return Err(RosterError::InvalidConfig(format!(
                    "{key} contains a blank entry"
                )));
            }
        }
        Ok(())
    }
}
