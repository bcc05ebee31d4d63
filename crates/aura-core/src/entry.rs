//! Journal entries as supplied by the frontend, and their validation.
//!
//! Presence and primitive types are enforced by deserialization; the inclusive
//! [1, 10] bounds on mood and energy are enforced by [`Entry::validate`].

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{AuraError, AuraResult};

/// Accepted range for both `mood` and `energy`.
pub const SCORE_RANGE: RangeInclusive<i64> = 1..=10;

/// One day's mood/energy record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    /// ISO 8601 date or datetime (`2024-01-01` or `2024-01-01T08:30:00Z`).
    pub date: String,
    pub mood: i64,
    pub energy: i64,
    pub note: String,
    pub tags: Vec<String>,
}

impl Entry {
    /// Check the score bounds. `path` prefixes the field name in the error (e.g. `entries[3]`).
    pub fn validate(&self, path: &str) -> AuraResult<()> {
        check_score(path, "mood", self.mood)?;
        check_score(path, "energy", self.energy)?;
        Ok(())
    }

    /// Calendar day of the entry: the `YYYY-MM-DD` part of `date`.
    pub fn day(&self) -> &str {
        let date = self.date.trim();
        date.split(['T', ' ']).next().unwrap_or(date)
    }
}

fn check_score(path: &str, field: &str, value: i64) -> AuraResult<()> {
    if SCORE_RANGE.contains(&value) {
        Ok(())
    } else {
        Err(AuraError::validation(
            format!("{}.{}", path, field),
            format!(
                "must be between {} and {}, got {}",
                SCORE_RANGE.start(),
                SCORE_RANGE.end(),
                value
            ),
        ))
    }
}

/// Body of `POST /api/v1/analyze-patterns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub entries: Vec<Entry>,
}

impl AnalysisRequest {
    /// Strict parse of a raw JSON body. Missing or mistyped fields become `MalformedBody`.
    pub fn from_slice(body: &[u8]) -> AuraResult<Self> {
        serde_json::from_slice(body).map_err(|e| AuraError::MalformedBody(e.to_string()))
    }

    /// Validate every entry; the first offending field wins.
    pub fn validate(&self) -> AuraResult<()> {
        for (i, entry) in self.entries.iter().enumerate() {
            entry.validate(&format!("entries[{}]", i))?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Number of distinct calendar days covered by `entries`.
pub fn day_count(entries: &[Entry]) -> usize {
    entries.iter().map(Entry::day).collect::<BTreeSet<_>>().len()
}
