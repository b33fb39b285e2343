//! GenerationResult - the export / re-apply interchange record

use serde::{Deserialize, Serialize};

use super::candidate::Candidate;

/// Prefixes of model replies that are refusals or chatter rather than a
/// description. Matched case-sensitively against the start of the text.
pub const REFUSAL_PREFIXES: &[&str] = &["Please", "I'm unable", "I can't", "Sure!"];

/// `{ url, generated_alt_text }` record.
///
/// The relay server variant writes `alt_text` instead of `generated_alt_text`;
/// both are accepted on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    #[serde(default, alias = "alt_text")]
    pub generated_alt_text: String,
}

impl GenerationResult {
    pub fn new(url: impl Into<String>, generated_alt_text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            element_id: None,
            generated_alt_text: generated_alt_text.into(),
        }
    }

    /// Build the export record for a candidate that has a generated description.
    pub fn from_candidate(candidate: &Candidate) -> Option<Self> {
        candidate.generated_description().map(|text| Self {
            url: candidate.source_url.clone(),
            element_id: Some(candidate.node_id.to_string()),
            generated_alt_text: text.to_string(),
        })
    }

    pub fn is_refusal(&self) -> bool {
        REFUSAL_PREFIXES
            .iter()
            .any(|prefix| self.generated_alt_text.starts_with(prefix))
    }

    /// Whether the record can be applied: it has a URL to join on and a
    /// non-empty, non-refusal text.
    pub fn is_usable(&self) -> bool {
        !self.url.is_empty() && !self.generated_alt_text.trim().is_empty() && !self.is_refusal()
    }
}
