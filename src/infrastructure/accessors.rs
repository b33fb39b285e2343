//! Accessor plan - ordered fallback strategies per host operation
//!
//! The plugin variants differ only in which accessors they try and in what
//! order. Those orders live here, configured once, instead of being
//! re-implemented in every stage.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use super::host::HostCanvas;
use crate::error::{ConfigError, HostError, HostResult};
use crate::models::NodeId;

/// Generic attribute holding the image source.
pub const SRC_ATTRIBUTE: &str = "src";
/// Generic attribute holding the description.
pub const ALT_ATTRIBUTE: &str = "alt";
/// Plugin-data key the description is stored under.
pub const ALT_TEXT_DATA_KEY: &str = "altText";

/// Where an image URL can be read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlSource {
    ImageData,
    Attribute(String),
}

/// Where a current description can be read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionSource {
    AltText,
    Attribute(String),
    PluginData(String),
}

/// Where a description can be written to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionSink {
    AltText,
    PluginData(String),
    Attribute(String),
}

/// Ordered fallback strategies for every host operation the workflow uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorPlan {
    pub url_sources: Vec<UrlSource>,
    pub description_sources: Vec<DescriptionSource>,
    pub description_sinks: Vec<DescriptionSink>,
}

impl Default for AccessorPlan {
    fn default() -> Self {
        Self::standard()
    }
}

impl AccessorPlan {
    /// Full chain: dedicated accessors first, then generic attributes, then
    /// plugin data.
    pub fn standard() -> Self {
        Self {
            url_sources: vec![
                UrlSource::ImageData,
                UrlSource::Attribute(SRC_ATTRIBUTE.to_string()),
            ],
            description_sources: vec![
                DescriptionSource::AltText,
                DescriptionSource::Attribute(ALT_ATTRIBUTE.to_string()),
                DescriptionSource::PluginData(ALT_TEXT_DATA_KEY.to_string()),
            ],
            description_sinks: vec![
                DescriptionSink::AltText,
                DescriptionSink::PluginData(ALT_TEXT_DATA_KEY.to_string()),
                DescriptionSink::Attribute(ALT_ATTRIBUTE.to_string()),
            ],
        }
    }

    /// Props-only hosts: read `src`/`alt`, write through an attribute update.
    pub fn attributes_only() -> Self {
        Self {
            url_sources: vec![
                UrlSource::ImageData,
                UrlSource::Attribute(SRC_ATTRIBUTE.to_string()),
            ],
            description_sources: vec![DescriptionSource::Attribute(ALT_ATTRIBUTE.to_string())],
            description_sinks: vec![DescriptionSink::Attribute(ALT_ATTRIBUTE.to_string())],
        }
    }

    /// First non-empty URL, `None` if no strategy produced one.
    pub async fn resolve_url<H>(&self, host: &H, node: &NodeId) -> HostResult<Option<String>>
    where
        H: HostCanvas + ?Sized,
    {
        for source in &self.url_sources {
            let value = match source {
                UrlSource::ImageData => host.image_data_url(node).await,
                UrlSource::Attribute(name) => host.attribute(node, name).await,
            };
            if let Some(url) = first_text(value)? {
                return Ok(Some(url));
            }
        }
        Ok(None)
    }

    /// First non-empty current description, `None` if the node has none.
    pub async fn resolve_description<H>(
        &self,
        host: &H,
        node: &NodeId,
    ) -> HostResult<Option<String>>
    where
        H: HostCanvas + ?Sized,
    {
        for source in &self.description_sources {
            let value = match source {
                DescriptionSource::AltText => host.alt_text(node).await,
                DescriptionSource::Attribute(name) => host.attribute(node, name).await,
                DescriptionSource::PluginData(key) => host.plugin_data(node, key).await,
            };
            if let Some(text) = first_text(value)? {
                return Ok(Some(text));
            }
        }
        Ok(None)
    }

    /// Write through the first sink the host supports.
    ///
    /// Returns the sink that accepted the write.
    pub async fn write_description<H>(
        &self,
        host: &H,
        node: &NodeId,
        text: &str,
    ) -> HostResult<&DescriptionSink>
    where
        H: HostCanvas + ?Sized,
    {
        for sink in &self.description_sinks {
            let outcome = match sink {
                DescriptionSink::AltText => host.set_alt_text(node, text).await,
                DescriptionSink::PluginData(key) => host.set_plugin_data(node, key, text).await,
                DescriptionSink::Attribute(name) => host.set_attribute(node, name, text).await,
            };
            match outcome {
                Ok(()) => return Ok(sink),
                Err(e) if e.is_unsupported() => {
                    debug!("{}, trying next sink", e);
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
        Err(HostError::NoWritableAccessor {
            node_id: node.to_string(),
        })
    }
}

impl FromStr for AccessorPlan {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::standard()),
            "attributes" | "attributes_only" => Ok(Self::attributes_only()),
            other => Err(ConfigError::UnknownVariant {
                what: "accessor plan".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Unsupported or empty means "no value from this strategy".
fn first_text(value: HostResult<Option<String>>) -> HostResult<Option<String>> {
    match value {
        Ok(Some(text)) if !text.trim().is_empty() => Ok(Some(text)),
        Ok(_) => Ok(None),
        Err(e) if e.is_unsupported() => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Host exposing only attributes and plugin data.
    #[derive(Default)]
    struct PropsHost {
        src: Option<String>,
        alt: Option<String>,
        plugin_alt: Option<String>,
        writes: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HostCanvas for PropsHost {
        async fn image_nodes(&self) -> HostResult<Vec<NodeId>> {
            Ok(vec![NodeId::new("n1")])
        }

        async fn attribute(&self, _node: &NodeId, name: &str) -> HostResult<Option<String>> {
            Ok(match name {
                SRC_ATTRIBUTE => self.src.clone(),
                ALT_ATTRIBUTE => self.alt.clone(),
                _ => None,
            })
        }

        async fn plugin_data(&self, _node: &NodeId, _key: &str) -> HostResult<Option<String>> {
            Ok(self.plugin_alt.clone())
        }

        async fn set_plugin_data(&self, _node: &NodeId, key: &str, value: &str) -> HostResult<()> {
            self.writes
                .lock()
                .unwrap()
                .push(format!("plugin:{}={}", key, value));
            Ok(())
        }
    }

    #[tokio::test]
    async fn url_falls_back_to_src_attribute() {
        let host = PropsHost {
            src: Some("https://cdn/a.png".into()),
            ..Default::default()
        };
        let url = AccessorPlan::standard()
            .resolve_url(&host, &NodeId::new("n1"))
            .await
            .unwrap();
        assert_eq!(url.as_deref(), Some("https://cdn/a.png"));
    }

    #[tokio::test]
    async fn description_falls_back_to_plugin_data() {
        let host = PropsHost {
            alt: Some(String::new()),
            plugin_alt: Some("stored".into()),
            ..Default::default()
        };
        let description = AccessorPlan::standard()
            .resolve_description(&host, &NodeId::new("n1"))
            .await
            .unwrap();
        assert_eq!(description.as_deref(), Some("stored"));
    }

    #[tokio::test]
    async fn write_skips_unsupported_sinks() {
        let host = PropsHost::default();
        let plan = AccessorPlan::standard();
        let sink = plan
            .write_description(&host, &NodeId::new("n1"), "A cat")
            .await
            .unwrap();
        assert_eq!(sink, &DescriptionSink::PluginData(ALT_TEXT_DATA_KEY.into()));
        assert_eq!(*host.writes.lock().unwrap(), vec!["plugin:altText=A cat"]);
    }

    #[tokio::test]
    async fn write_without_any_sink_fails() {
        let host = PropsHost::default();
        let err = AccessorPlan::attributes_only()
            .write_description(&host, &NodeId::new("n1"), "A cat")
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::NoWritableAccessor { .. }));
    }

    #[test]
    fn plan_parses_from_name() {
        assert_eq!("standard".parse::<AccessorPlan>().unwrap(), AccessorPlan::standard());
        assert_eq!(
            "attributes".parse::<AccessorPlan>().unwrap(),
            AccessorPlan::attributes_only()
        );
        assert!("bogus".parse::<AccessorPlan>().is_err());
    }
}
