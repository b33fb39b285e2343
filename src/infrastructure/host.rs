//! Host canvas - infrastructure layer
//!
//! The design tool owns the document; this trait only exposes capabilities.

use async_trait::async_trait;

use crate::error::{HostError, HostResult};
use crate::models::NodeId;

/// Host canvas capability surface
///
/// Responsibilities:
/// - enumerate image nodes and the current selection
/// - read/write the primitive accessors a host variant may expose
/// - know nothing about candidates, selection sets or generation
///
/// Optional accessors default to `HostError::Unsupported`, which the
/// accessor plan treats as "try the next strategy".
#[async_trait]
pub trait HostCanvas: Send + Sync {
    /// All image nodes visible on the current canvas, in document order.
    async fn image_nodes(&self) -> HostResult<Vec<NodeId>>;

    /// Nodes the user has selected. Empty means "no selection".
    async fn selection(&self) -> HostResult<Vec<NodeId>> {
        Ok(Vec::new())
    }

    /// Primary image-data accessor.
    async fn image_data_url(&self, _node: &NodeId) -> HostResult<Option<String>> {
        Err(HostError::unsupported("getImageUrl"))
    }

    /// Dedicated description accessor.
    async fn alt_text(&self, _node: &NodeId) -> HostResult<Option<String>> {
        Err(HostError::unsupported("getAltText"))
    }

    async fn set_alt_text(&self, _node: &NodeId, _text: &str) -> HostResult<()> {
        Err(HostError::unsupported("setAltText"))
    }

    /// Generic attribute / prop read.
    async fn attribute(&self, _node: &NodeId, _name: &str) -> HostResult<Option<String>> {
        Err(HostError::unsupported("getAttribute"))
    }

    /// Generic attribute update.
    async fn set_attribute(&self, _node: &NodeId, _name: &str, _value: &str) -> HostResult<()> {
        Err(HostError::unsupported("setAttributes"))
    }

    /// Secondary key-value store attached to the node.
    async fn plugin_data(&self, _node: &NodeId, _key: &str) -> HostResult<Option<String>> {
        Err(HostError::unsupported("getPluginData"))
    }

    async fn set_plugin_data(&self, _node: &NodeId, _key: &str, _value: &str) -> HostResult<()> {
        Err(HostError::unsupported("setPluginData"))
    }
}
