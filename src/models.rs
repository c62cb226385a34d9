//! Data models for the summariser.
//!
//! This module contains the raw compliance-checker input shapes and the
//! aggregated summary structures produced from them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use thiserror::Error;

/// Errors raised while reading a compliance-checker results document.
#[derive(Debug, Error)]
pub enum InputError {
    /// The document is not valid JSON or does not have the expected shape
    /// (missing tier, missing `name`/`value`/`msgs` on a record, ...).
    #[error("malformed results document: {0}")]
    Format(#[from] serde_json::Error),
}

/// Priority tier of a check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "high_priorities")]
    High,
    #[serde(rename = "medium_priorities")]
    Medium,
    #[serde(rename = "low_priorities")]
    Low,
}

impl Tier {
    /// All tiers in report order.
    pub const ALL: [Tier; 3] = [Tier::High, Tier::Medium, Tier::Low];

    /// Returns the heading used in the text report.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::High => "HIGH",
            Tier::Medium => "MEDIUM",
            Tier::Low => "LOW",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single sub-check result that may or may not be a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Name of the failing sub-check.
    pub name: String,
    /// `(score, out_of)` pair.
    pub value: (u64, u64),
    /// Diagnostic messages.
    pub msgs: Vec<String>,
}

impl Candidate {
    /// A candidate whose score reaches its maximum is a pass.
    pub fn is_failure(&self) -> bool {
        let (score, out_of) = self.value;
        score != out_of
    }
}

/// Result of one named check on one file. Every tier must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub high_priorities: Vec<Candidate>,
    pub medium_priorities: Vec<Candidate>,
    pub low_priorities: Vec<Candidate>,
}

impl CheckResult {
    /// Records for the given tier, in document order.
    pub fn tier(&self, tier: Tier) -> &[Candidate] {
        match tier {
            Tier::High => &self.high_priorities,
            Tier::Medium => &self.medium_priorities,
            Tier::Low => &self.low_priorities,
        }
    }
}

/// Check results keyed by check name, in document order.
pub type FileChecks = IndexMap<String, CheckResult>;

/// The full compliance-checker document: file identifier to checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawResults {
    pub files: BTreeMap<String, FileChecks>,
}

impl RawResults {
    /// Parse a results document from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parse a results document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, InputError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Number of distinct file identifiers.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// All occurrences of one diagnostic message within a failure group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageGroup {
    pub text: String,
    pub count: usize,
    /// Sorted, duplicates allowed.
    pub files: Vec<String>,
}

impl MessageGroup {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            count: 0,
            files: Vec::new(),
        }
    }
}

/// All occurrences of one named failure within a (tier, check) bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureGroup {
    pub name: String,
    pub count: usize,
    /// Sorted, duplicates allowed.
    pub files: Vec<String>,
    pub messages: Vec<MessageGroup>,
}

impl FailureGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: 0,
            files: Vec::new(),
            messages: Vec::new(),
        }
    }
}

/// Failure groups for one tier, keyed by check name in first-seen order.
pub type TierSummary = IndexMap<String, Vec<FailureGroup>>;

/// Aggregated summary over every file in a results document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Total distinct files in the input.
    pub file_count: usize,
    /// Files without a single failing record.
    pub clean_file_count: usize,
    /// Non-empty tiers only, in tier order.
    pub summary: IndexMap<Tier, TierSummary>,
}

impl Summary {
    /// Number of files with at least one failure.
    pub fn failing_file_count(&self) -> usize {
        self.file_count - self.clean_file_count
    }

    /// Returns true when no file reported a failure.
    pub fn is_clean(&self) -> bool {
        self.summary.is_empty()
    }

    /// The highest-priority tier that has any failure.
    pub fn highest_failing_tier(&self) -> Option<Tier> {
        Tier::ALL
            .into_iter()
            .find(|tier| self.summary.contains_key(tier))
    }

    /// Iterate over every failure group with its tier and check name.
    pub fn groups(&self) -> impl Iterator<Item = (Tier, &str, &FailureGroup)> {
        self.summary.iter().flat_map(|(tier, checks)| {
            checks.iter().flat_map(move |(check, groups)| {
                groups.iter().map(move |g| (*tier, check.as_str(), g))
            })
        })
    }
}
