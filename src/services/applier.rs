//! Description applier - capability layer
//!
//! Writes descriptions back through the host. Every node is independent:
//! one failed write never blocks the others.

use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::infrastructure::{AccessorPlan, HostCanvas};
use crate::models::{Candidate, NodeId, ScannedNode};
use crate::services::matcher::ResultMatcher;

/// Aggregate outcome of an apply batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub success: usize,
    pub failure: usize,
    /// Re-apply mode: nodes with no matching record
    pub unmatched: usize,
    /// Re-apply mode: nodes already written this session
    pub already_applied: usize,
}

impl ApplySummary {
    pub fn status_message(&self) -> String {
        let mut message = format!("Applied alt text to {} images", self.success);
        if self.failure > 0 {
            message.push_str(&format!(", {} failed", self.failure));
        }
        message
    }
}

/// Description applier
pub struct DescriptionApplier<'a> {
    host: &'a dyn HostCanvas,
    plan: &'a AccessorPlan,
}

impl<'a> DescriptionApplier<'a> {
    pub fn new(host: &'a dyn HostCanvas, plan: &'a AccessorPlan) -> Self {
        Self { host, plan }
    }

    /// Direct mode: write every generated description from this run.
    pub async fn apply_generated(&self, candidates: &[Candidate]) -> ApplySummary {
        let mut summary = ApplySummary::default();

        for candidate in candidates {
            let Some(text) = candidate.generated_description() else {
                continue;
            };
            if self.write(&candidate.node_id, text).await {
                summary.success += 1;
            } else {
                summary.failure += 1;
            }
        }

        info!("✓ {}", summary.status_message());
        summary
    }

    /// Re-apply mode: match loaded results onto scanned nodes by URL.
    ///
    /// Nodes in `applied` are skipped; successfully written nodes are added.
    pub async fn apply_matched(
        &self,
        nodes: &[ScannedNode],
        matcher: &ResultMatcher,
        applied: &mut HashSet<NodeId>,
    ) -> ApplySummary {
        let mut summary = ApplySummary::default();

        for node in nodes {
            if applied.contains(&node.node_id) {
                summary.already_applied += 1;
                continue;
            }
            let Some(record) = matcher.find(&node.source_url) else {
                debug!("No result matches {} ({})", node.node_id, node.source_url);
                summary.unmatched += 1;
                continue;
            };
            if self.write(&node.node_id, &record.generated_alt_text).await {
                applied.insert(node.node_id.clone());
                summary.success += 1;
            } else {
                summary.failure += 1;
            }
        }

        info!(
            "✓ {} ({} unmatched, {} already applied)",
            summary.status_message(),
            summary.unmatched,
            summary.already_applied
        );
        summary
    }

    async fn write(&self, node_id: &NodeId, text: &str) -> bool {
        match self.plan.write_description(self.host, node_id, text).await {
            Ok(sink) => {
                debug!("[{}] written via {:?}", node_id, sink);
                true
            }
            Err(e) => {
                warn!("❌ Error applying alt text to {}: {}", node_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{HostFeatures, SnapshotCanvas, SnapshotNode};
    use crate::models::GenerationResult;

    fn generated(id: &str, url: &str, text: Option<&str>) -> Candidate {
        let mut candidate = Candidate::new(NodeId::new(id), url);
        if let Some(text) = text {
            candidate.attach_description(text);
        }
        candidate
    }

    fn scanned(id: &str, url: &str) -> ScannedNode {
        ScannedNode {
            node_id: NodeId::new(id),
            source_url: url.to_string(),
            current_description: None,
        }
    }

    #[tokio::test]
    async fn direct_mode_writes_only_generated() {
        let canvas = SnapshotCanvas::from_nodes(vec![
            SnapshotNode::image("a", "a.png"),
            SnapshotNode::image("b", "b.png"),
        ]);
        let plan = AccessorPlan::standard();
        let summary = DescriptionApplier::new(&canvas, &plan)
            .apply_generated(&[
                generated("a", "a.png", Some("A red bicycle.")),
                generated("b", "b.png", None),
            ])
            .await;

        assert_eq!((summary.success, summary.failure), (1, 0));
        let writes = canvas.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].node_id.as_str(), "a");
        assert_eq!(writes[0].accessor, "setAltText");
        assert_eq!(writes[0].value, "A red bicycle.");
    }

    #[tokio::test]
    async fn one_failure_does_not_block_others() {
        let canvas = SnapshotCanvas::from_nodes(vec![
            SnapshotNode::image("a", "a.png"),
            SnapshotNode::image("b", "b.png"),
        ])
        .with_failing_node("a");
        let plan = AccessorPlan::standard();
        let summary = DescriptionApplier::new(&canvas, &plan)
            .apply_generated(&[
                generated("a", "a.png", Some("A")),
                generated("b", "b.png", Some("B")),
            ])
            .await;
        assert_eq!((summary.success, summary.failure), (1, 1));
        assert_eq!(summary.status_message(), "Applied alt text to 1 images, 1 failed");
    }

    #[tokio::test]
    async fn falls_back_to_attribute_update() {
        let canvas = SnapshotCanvas::from_nodes(vec![SnapshotNode::image("a", "a.png")])
            .with_features(HostFeatures {
                alt_text: false,
                plugin_data: false,
                ..Default::default()
            });
        let plan = AccessorPlan::standard();
        DescriptionApplier::new(&canvas, &plan)
            .apply_generated(&[generated("a", "a.png", Some("A"))])
            .await;
        assert_eq!(canvas.writes()[0].accessor, "setAttributes");
        assert_eq!(canvas.snapshot().nodes[0].attributes["alt"], "A");
    }

    #[tokio::test]
    async fn reapply_is_idempotent_per_session() {
        let canvas = SnapshotCanvas::from_nodes(vec![
            SnapshotNode::image("a", "https://cdn2/y/photo123.jpg"),
            SnapshotNode::image("b", "https://cdn2/y/other.jpg"),
        ]);
        let plan = AccessorPlan::standard();
        let matcher = ResultMatcher::new(vec![GenerationResult::new(
            "https://cdn/x/photo123.jpg",
            "A lighthouse at dusk.",
        )]);
        let nodes = vec![
            scanned("a", "https://cdn2/y/photo123.jpg"),
            scanned("b", "https://cdn2/y/other.jpg"),
        ];
        let mut applied = HashSet::new();
        let applier = DescriptionApplier::new(&canvas, &plan);

        let first = applier.apply_matched(&nodes, &matcher, &mut applied).await;
        assert_eq!((first.success, first.unmatched), (1, 1));

        let second = applier.apply_matched(&nodes, &matcher, &mut applied).await;
        assert_eq!((second.success, second.already_applied), (0, 1));

        assert_eq!(canvas.writes().len(), 1);
        assert_eq!(
            canvas.snapshot().nodes[0].alt_text.as_deref(),
            Some("A lighthouse at dusk.")
        );
    }
}
