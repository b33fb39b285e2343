//! Node scanner - capability layer
//!
//! Only answers "which image nodes lack a description"; read-only.

use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::error::{AppResult, HostResult};
use crate::infrastructure::{AccessorPlan, HostCanvas};
use crate::models::{Candidate, NodeId, ScannedNode};

/// Which nodes a scan covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanScope {
    /// Every image node on the canvas
    #[default]
    Document,
    /// The host selection; an empty selection means the whole canvas
    SelectionOrDocument,
}

/// Node scanner
pub struct NodeScanner<'a> {
    host: &'a dyn HostCanvas,
    plan: &'a AccessorPlan,
}

impl<'a> NodeScanner<'a> {
    pub fn new(host: &'a dyn HostCanvas, plan: &'a AccessorPlan) -> Self {
        Self { host, plan }
    }

    /// Candidates in document order: nodes with a URL and no description.
    ///
    /// A failing host enumeration is a scan-level error; a failing node is
    /// logged and skipped.
    pub async fn scan(&self) -> AppResult<Vec<Candidate>> {
        let nodes = self.scan_nodes(ScanScope::Document).await?;
        let total = nodes.len();
        let candidates: Vec<Candidate> = nodes
            .into_iter()
            .filter_map(|node| Candidate::try_from(node).ok())
            .collect();
        info!(
            "🔍 Scan complete: {} of {} image nodes lack alt text",
            candidates.len(),
            total
        );
        Ok(candidates)
    }

    /// Every node in scope that has a resolvable URL, with its current
    /// description.
    pub async fn scan_nodes(&self, scope: ScanScope) -> AppResult<Vec<ScannedNode>> {
        let node_ids = self.nodes_in_scope(scope).await?;
        let mut scanned = Vec::with_capacity(node_ids.len());

        for node_id in node_ids {
            match self.read_node(&node_id).await {
                Ok(Some(node)) => scanned.push(node),
                Ok(None) => debug!("Node {} has no image URL, skipping", node_id),
                Err(e) => warn!("Error processing node {}: {}", node_id, e),
            }
        }

        Ok(scanned)
    }

    /// Image nodes in scope. A selection is narrowed to its image nodes.
    async fn nodes_in_scope(&self, scope: ScanScope) -> AppResult<Vec<NodeId>> {
        let images = self.host.image_nodes().await?;
        if scope == ScanScope::SelectionOrDocument {
            let selection = self.host.selection().await?;
            if !selection.is_empty() {
                let image_set: HashSet<&NodeId> = images.iter().collect();
                let selected: Vec<NodeId> = selection
                    .into_iter()
                    .filter(|id| image_set.contains(id))
                    .collect();
                debug!("Scanning {} selected image nodes", selected.len());
                return Ok(selected);
            }
        }
        Ok(images)
    }

    async fn read_node(&self, node_id: &NodeId) -> HostResult<Option<ScannedNode>> {
        let Some(source_url) = self.plan.resolve_url(self.host, node_id).await? else {
            return Ok(None);
        };
        let current_description = self.plan.resolve_description(self.host, node_id).await?;
        Ok(Some(ScannedNode {
            node_id: node_id.clone(),
            source_url,
            current_description,
        }))
    }
}
