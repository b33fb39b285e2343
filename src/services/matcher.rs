//! Result matcher
//!
//! Joins previously exported results back onto freshly scanned nodes by URL.
//! Host URLs for the same asset often differ in CDN host or path, so the join
//! is fuzzy: containment in either direction, or the same final path segment.
//! Short generic URLs can therefore match more than intended.

use tracing::debug;

use crate::models::GenerationResult;

/// Text after the final `/`.
pub fn trailing_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Whether a stored record URL refers to the node's image.
pub fn urls_match(node_url: &str, record_url: &str) -> bool {
    if node_url.is_empty() || record_url.is_empty() {
        return false;
    }
    if node_url.contains(record_url) || record_url.contains(node_url) {
        return true;
    }
    let segment = trailing_segment(node_url);
    !segment.is_empty() && segment == trailing_segment(record_url)
}

/// Usable records, in file order
#[derive(Debug, Clone, Default)]
pub struct ResultMatcher {
    records: Vec<GenerationResult>,
    discarded: usize,
}

impl ResultMatcher {
    /// Drops refusals, empty texts and records without a URL.
    pub fn new(records: Vec<GenerationResult>) -> Self {
        let total = records.len();
        let records: Vec<GenerationResult> =
            records.into_iter().filter(GenerationResult::is_usable).collect();
        let discarded = total - records.len();
        if discarded > 0 {
            debug!("Discarded {} unusable results", discarded);
        }
        Self { records, discarded }
    }

    pub fn records(&self) -> &[GenerationResult] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// First record matching the node URL.
    pub fn find(&self, node_url: &str) -> Option<&GenerationResult> {
        self.records
            .iter()
            .find(|record| urls_match(node_url, &record.url))
    }
}
