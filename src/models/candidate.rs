//! Candidate - one image node that has no description yet

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Opaque node identifier handed out by the host.
///
/// The host owns the node; the workflow only ever holds this borrowed id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A node as seen by one scan, before the candidate filter is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedNode {
    pub node_id: NodeId,
    pub source_url: String,
    pub current_description: Option<String>,
}

impl ScannedNode {
    /// A node is a candidate when it has a URL and no description.
    pub fn is_candidate(&self) -> bool {
        !self.source_url.is_empty() && !has_text(self.current_description.as_deref())
    }
}

/// An image lacking a description, eligible for generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub node_id: NodeId,
    pub source_url: String,
    generated_description: Option<String>,
}

impl Candidate {
    pub fn new(node_id: NodeId, source_url: impl Into<String>) -> Self {
        Self {
            node_id,
            source_url: source_url.into(),
            generated_description: None,
        }
    }

    pub fn generated_description(&self) -> Option<&str> {
        self.generated_description
            .as_deref()
            .filter(|text| !text.is_empty())
    }

    /// Attach the generated description.
    ///
    /// Returns `false` and leaves the candidate untouched if a description
    /// was already attached in this scan cycle.
    pub fn attach_description(&mut self, text: impl Into<String>) -> bool {
        if self.generated_description.is_some() {
            return false;
        }
        self.generated_description = Some(text.into());
        true
    }
}

impl TryFrom<ScannedNode> for Candidate {
    type Error = ScannedNode;

    fn try_from(node: ScannedNode) -> Result<Self, Self::Error> {
        if node.is_candidate() {
            Ok(Candidate::new(node.node_id, node.source_url))
        } else {
            Err(node)
        }
    }
}

pub(crate) fn has_text(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanned(url: &str, current: Option<&str>) -> ScannedNode {
        ScannedNode {
            node_id: NodeId::new("n1"),
            source_url: url.to_string(),
            current_description: current.map(str::to_string),
        }
    }

    #[test]
    fn candidate_requires_url_and_missing_description() {
        assert!(scanned("a.png", None).is_candidate());
        assert!(scanned("a.png", Some("")).is_candidate());
        assert!(scanned("a.png", Some("  ")).is_candidate());
        assert!(!scanned("a.png", Some("existing")).is_candidate());
        assert!(!scanned("", None).is_candidate());
    }

    #[test]
    fn description_attaches_once() {
        let mut candidate = Candidate::new(NodeId::new("n1"), "a.png");
        assert_eq!(candidate.generated_description(), None);
        assert!(candidate.attach_description("A red bicycle."));
        assert!(!candidate.attach_description("Something else"));
        assert_eq!(candidate.generated_description(), Some("A red bicycle."));
    }
}
