//! Relay server client
//!
//! Talks to the alt-text relay server instead of the model provider:
//! `POST <base>/generate-batch` authenticated with `X-API-Key`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::vision_client::{
    extract_error_message, DescribeRequest, DescriptionClient, GENERIC_FAILURE_MESSAGE,
};
use crate::error::GenerateError;

#[derive(Debug, Serialize)]
struct BatchImage<'a> {
    url: &'a str,
    context: String,
}

#[derive(Debug, Serialize)]
struct BatchRequest<'a> {
    images: Vec<BatchImage<'a>>,
}

#[derive(Debug, Deserialize)]
struct BatchItem {
    #[serde(default)]
    url: String,
    #[serde(default)]
    alt_text: String,
    #[serde(default)]
    cached: bool,
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    results: Vec<BatchItem>,
}

/// Relay server client
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/generate-batch", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl DescriptionClient for RelayClient {
    async fn describe(
        &self,
        request: &DescribeRequest<'_>,
        api_key: &str,
    ) -> Result<String, GenerateError> {
        let endpoint = self.endpoint();
        let body = BatchRequest {
            images: vec![BatchImage {
                url: request.url,
                context: format!("Framer element ID: {}", request.node_id),
            }],
        };

        let response = self
            .http
            .post(&endpoint)
            .header("X-API-Key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::transport(&endpoint, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GenerateError::transport(&endpoint, e))?;

        if !status.is_success() {
            warn!("Relay returned {} for {}", status, request.url);
            return Err(GenerateError::Api {
                status: Some(status.as_u16()),
                message: extract_error_message(&text)
                    .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
            });
        }

        let parsed: BatchResponse = serde_json::from_str(&text)
            .map_err(|e| GenerateError::transport(&endpoint, e))?;

        pick_result(parsed, request.url)
    }
}

/// The relay answers a one-image batch; prefer the item echoing our URL.
fn pick_result(response: BatchResponse, url: &str) -> Result<String, GenerateError> {
    let mut results = response.results;
    let index = results.iter().position(|item| item.url == url).unwrap_or(0);
    if index >= results.len() {
        return Err(GenerateError::EmptyCompletion {
            url: url.to_string(),
        });
    }
    let item = results.swap_remove(index);
    if item.cached {
        debug!("Relay served cached alt text for {}", url);
    }
    let text = item.alt_text.trim();
    if text.is_empty() {
        return Err(GenerateError::EmptyCompletion {
            url: url.to_string(),
        });
    }
    Ok(text.to_string())
}
