//! Snapshot canvas - a `HostCanvas` over a JSON document snapshot
//!
//! Stands in for the live editor: the binary loads a snapshot exported from
//! the design tool, runs the workflow against it, and saves it back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::host::HostCanvas;
use crate::error::{AppError, AppResult, HostError, HostResult};
use crate::models::NodeId;

const IMAGE_NODE_TYPE: &str = "Image";

fn default_node_type() -> String {
    IMAGE_NODE_TYPE.to_string()
}

/// One node of the document snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: NodeId,
    #[serde(rename = "type", default = "default_node_type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub plugin_data: BTreeMap<String, String>,
}

impl SnapshotNode {
    /// Image node whose URL is served by the image-data accessor.
    pub fn image(id: &str, url: &str) -> Self {
        Self {
            id: NodeId::new(id),
            node_type: default_node_type(),
            image_url: Some(url.to_string()),
            alt_text: None,
            attributes: BTreeMap::new(),
            plugin_data: BTreeMap::new(),
        }
    }

    pub fn with_alt_text(mut self, alt: &str) -> Self {
        self.alt_text = Some(alt.to_string());
        self
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_plugin_data(mut self, key: &str, value: &str) -> Self {
        self.plugin_data.insert(key.to_string(), value.to_string());
        self
    }

}

/// Serialized document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    #[serde(default)]
    pub nodes: Vec<SnapshotNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selection: Vec<NodeId>,
}

/// Which optional accessors the simulated host exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostFeatures {
    pub image_data: bool,
    pub alt_text: bool,
    pub attributes: bool,
    pub plugin_data: bool,
}

impl Default for HostFeatures {
    fn default() -> Self {
        Self {
            image_data: true,
            alt_text: true,
            attributes: true,
            plugin_data: true,
        }
    }
}

/// A recorded write through the host surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub node_id: NodeId,
    pub accessor: String,
    pub value: String,
}

/// In-process host canvas
pub struct SnapshotCanvas {
    document: Mutex<DocumentSnapshot>,
    features: HostFeatures,
    failing_nodes: HashSet<NodeId>,
    fail_enumeration: bool,
    writes: Mutex<Vec<WriteRecord>>,
}

impl SnapshotCanvas {
    pub fn new(document: DocumentSnapshot) -> Self {
        Self {
            document: Mutex::new(document),
            features: HostFeatures::default(),
            failing_nodes: HashSet::new(),
            fail_enumeration: false,
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn from_nodes(nodes: Vec<SnapshotNode>) -> Self {
        Self::new(DocumentSnapshot {
            nodes,
            selection: Vec::new(),
        })
    }

    pub fn with_features(mut self, features: HostFeatures) -> Self {
        self.features = features;
        self
    }

    /// Every accessor call on this node fails with a host error.
    pub fn with_failing_node(mut self, id: &str) -> Self {
        self.failing_nodes.insert(NodeId::new(id));
        self
    }

    /// Node enumeration itself fails.
    pub fn with_failing_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }

    pub async fn load(path: &Path) -> AppResult<Self> {
        let path_str = path.display().to_string();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::file_read_failed(&path_str, e))?;
        let document: DocumentSnapshot =
            serde_json::from_str(&content).map_err(|e| AppError::json_parse_failed(&path_str, e))?;
        debug!("Loaded {} nodes from {}", document.nodes.len(), path_str);
        Ok(Self::new(document))
    }

    pub async fn save(&self, path: &Path) -> AppResult<()> {
        let content = serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| AppError::serialize_failed("document snapshot", e))?;
        tokio::fs::write(path, content)
            .await
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        self.lock_document().clone()
    }

    pub fn set_selection(&self, selection: Vec<NodeId>) {
        self.lock_document().selection = selection;
    }

    pub fn writes(&self) -> Vec<WriteRecord> {
        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock_document(&self) -> MutexGuard<'_, DocumentSnapshot> {
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_node(&self, node: &NodeId, operation: &str) -> HostResult<()> {
        if self.failing_nodes.contains(node) {
            return Err(HostError::failed(operation, format!("node {} is locked", node)));
        }
        Ok(())
    }

    fn read<F>(&self, node: &NodeId, operation: &str, f: F) -> HostResult<Option<String>>
    where
        F: FnOnce(&SnapshotNode) -> Option<String>,
    {
        self.check_node(node, operation)?;
        let document = self.lock_document();
        let found = document
            .nodes
            .iter()
            .find(|n| &n.id == node)
            .ok_or_else(|| HostError::NodeNotFound {
                node_id: node.to_string(),
            })?;
        Ok(f(found))
    }

    fn write<F>(&self, node: &NodeId, operation: &str, value: &str, f: F) -> HostResult<()>
    where
        F: FnOnce(&mut SnapshotNode),
    {
        self.check_node(node, operation)?;
        {
            let mut document = self.lock_document();
            let found = document
                .nodes
                .iter_mut()
                .find(|n| &n.id == node)
                .ok_or_else(|| HostError::NodeNotFound {
                    node_id: node.to_string(),
                })?;
            f(found);
        }
        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(WriteRecord {
                node_id: node.clone(),
                accessor: operation.to_string(),
                value: value.to_string(),
            });
        Ok(())
    }
}

#[async_trait]
impl HostCanvas for SnapshotCanvas {
    async fn image_nodes(&self) -> HostResult<Vec<NodeId>> {
        if self.fail_enumeration {
            return Err(HostError::failed("getImageNodes", "canvas is not available"));
        }
        Ok(self
            .lock_document()
            .nodes
            .iter()
            .filter(|n| n.node_type == IMAGE_NODE_TYPE)
            .map(|n| n.id.clone())
            .collect())
    }

    async fn selection(&self) -> HostResult<Vec<NodeId>> {
        Ok(self.lock_document().selection.clone())
    }

    async fn image_data_url(&self, node: &NodeId) -> HostResult<Option<String>> {
        if !self.features.image_data {
            return Err(HostError::unsupported("getImageUrl"));
        }
        self.read(node, "getImageUrl", |n| n.image_url.clone())
    }

    async fn alt_text(&self, node: &NodeId) -> HostResult<Option<String>> {
        if !self.features.alt_text {
            return Err(HostError::unsupported("getAltText"));
        }
        self.read(node, "getAltText", |n| n.alt_text.clone())
    }

    async fn set_alt_text(&self, node: &NodeId, text: &str) -> HostResult<()> {
        if !self.features.alt_text {
            return Err(HostError::unsupported("setAltText"));
        }
        self.write(node, "setAltText", text, |n| n.alt_text = Some(text.to_string()))
    }

    async fn attribute(&self, node: &NodeId, name: &str) -> HostResult<Option<String>> {
        if !self.features.attributes {
            return Err(HostError::unsupported("getAttribute"));
        }
        self.read(node, "getAttribute", |n| n.attributes.get(name).cloned())
    }

    async fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> HostResult<()> {
        if !self.features.attributes {
            return Err(HostError::unsupported("setAttributes"));
        }
        self.write(node, "setAttributes", value, |n| {
            n.attributes.insert(name.to_string(), value.to_string());
        })
    }

    async fn plugin_data(&self, node: &NodeId, key: &str) -> HostResult<Option<String>> {
        if !self.features.plugin_data {
            return Err(HostError::unsupported("getPluginData"));
        }
        self.read(node, "getPluginData", |n| n.plugin_data.get(key).cloned())
    }

    async fn set_plugin_data(&self, node: &NodeId, key: &str, value: &str) -> HostResult<()> {
        if !self.features.plugin_data {
            return Err(HostError::unsupported("setPluginData"));
        }
        self.write(node, "setPluginData", value, |n| {
            n.plugin_data.insert(key.to_string(), value.to_string());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn only_image_nodes_are_enumerated() {
        let mut frame = SnapshotNode::image("frame", "");
        frame.node_type = "Frame".into();
        let canvas = SnapshotCanvas::from_nodes(vec![SnapshotNode::image("a", "a.png"), frame]);
        assert_eq!(canvas.image_nodes().await.unwrap(), vec![NodeId::new("a")]);
    }

    #[tokio::test]
    async fn disabled_features_report_unsupported() {
        let canvas = SnapshotCanvas::from_nodes(vec![SnapshotNode::image("a", "a.png")])
            .with_features(HostFeatures {
                alt_text: false,
                ..Default::default()
            });
        let err = canvas.set_alt_text(&NodeId::new("a"), "x").await.unwrap_err();
        assert!(err.is_unsupported());
        assert!(canvas.writes().is_empty());
    }

    #[tokio::test]
    async fn snapshot_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("document.json");
        let canvas = SnapshotCanvas::from_nodes(vec![SnapshotNode::image("a", "a.png")]);
        canvas.set_alt_text(&NodeId::new("a"), "A cat").await.unwrap();
        canvas.save(&path).await.unwrap();

        let reloaded = SnapshotCanvas::load(&path).await.unwrap();
        assert_eq!(reloaded.snapshot().nodes[0].alt_text.as_deref(), Some("A cat"));
    }

    #[test]
    fn node_type_defaults_to_image() {
        let document: DocumentSnapshot =
            serde_json::from_str(r#"{"nodes":[{"id":"a","attributes":{"src":"a.png"}}]}"#).unwrap();
        assert_eq!(document.nodes[0].node_type, "Image");
        assert_eq!(document.nodes[0].attributes["src"], "a.png");
    }
}
