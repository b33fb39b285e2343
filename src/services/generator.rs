//! Description generator - capability layer
//!
//! One external call per selected candidate, strictly in order, never
//! concurrent. Per-item failures are counted and never abort the batch.
//!
//! ## Delay policy
//! Before each call the generator waits `interval`, but only once at least
//! one call has succeeded. Consecutive failures are therefore not throttled.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::clients::{DescribeRequest, DescriptionClient};
use crate::error::{AppResult, WorkflowError};
use crate::models::{Candidate, NodeId};
use crate::services::selection::SelectionSet;
use crate::utils::logging::truncate_text;

/// Pause between requests
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Real timer
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Progress after one attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationProgress {
    pub attempted: usize,
    pub selected: usize,
}

impl GenerationProgress {
    pub fn message(&self) -> String {
        format!(
            "Generating alt text for image {}/{}...",
            self.attempted, self.selected
        )
    }
}

/// One failed item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailure {
    pub node_id: NodeId,
    pub url: String,
    pub message: String,
}

/// Aggregate outcome of a generation batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub success: usize,
    pub failure: usize,
    pub failures: Vec<GenerationFailure>,
}

impl GenerationSummary {
    pub fn attempted(&self) -> usize {
        self.success + self.failure
    }

    pub fn status_message(&self) -> String {
        let mut message = format!("Generated alt text for {} images", self.success);
        if self.failure > 0 {
            message.push_str(&format!(", {} failed", self.failure));
        }
        message
    }
}

/// Description generator
pub struct DescriptionGenerator<'a> {
    client: &'a dyn DescriptionClient,
    delay: &'a dyn Delay,
    interval: Duration,
}

impl<'a> DescriptionGenerator<'a> {
    pub fn new(client: &'a dyn DescriptionClient, delay: &'a dyn Delay, interval: Duration) -> Self {
        Self {
            client,
            delay,
            interval,
        }
    }

    /// Generate descriptions for the selected candidates.
    ///
    /// Fails without making any call when the credential or the selection is
    /// empty. Otherwise always returns a summary with
    /// `success + failure == selection size`.
    pub async fn generate<F>(
        &self,
        candidates: &mut [Candidate],
        selection: &SelectionSet,
        api_key: &str,
        mut on_progress: F,
    ) -> AppResult<GenerationSummary>
    where
        F: FnMut(GenerationProgress),
    {
        if api_key.trim().is_empty() {
            return Err(WorkflowError::MissingCredential.into());
        }
        let indices = selection.selected_indices(candidates);
        if indices.is_empty() {
            return Err(WorkflowError::EmptySelection.into());
        }

        let selected = indices.len();
        info!("🤖 Generating alt text for {} images", selected);
        let mut summary = GenerationSummary::default();

        for index in indices {
            let candidate = &mut candidates[index];

            if summary.success > 0 {
                self.delay.wait(self.interval).await;
            }

            let request = DescribeRequest {
                node_id: &candidate.node_id,
                url: &candidate.source_url,
            };
            match self.client.describe(&request, api_key).await {
                Ok(text) if !text.trim().is_empty() => {
                    let text = text.trim();
                    debug!(
                        "[{}] {}",
                        candidate.node_id,
                        truncate_text(text, 60)
                    );
                    if !candidate.attach_description(text) {
                        warn!("[{}] already has generated alt text, keeping it", candidate.node_id);
                    }
                    summary.success += 1;
                }
                Ok(_) => {
                    warn!("[{}] empty alt text for {}", candidate.node_id, candidate.source_url);
                    summary.failure += 1;
                    summary.failures.push(GenerationFailure {
                        node_id: candidate.node_id.clone(),
                        url: candidate.source_url.clone(),
                        message: "Empty alt text returned".to_string(),
                    });
                }
                Err(e) => {
                    warn!(
                        "[{}] ❌ Error generating alt text for {}: {}",
                        candidate.node_id, candidate.source_url, e
                    );
                    summary.failure += 1;
                    summary.failures.push(GenerationFailure {
                        node_id: candidate.node_id.clone(),
                        url: candidate.source_url.clone(),
                        message: e.to_string(),
                    });
                }
            }

            on_progress(GenerationProgress {
                attempted: summary.attempted(),
                selected,
            });
        }

        info!(
            "✓ Generation finished: {} succeeded, {} failed",
            summary.success, summary.failure
        );
        Ok(summary)
    }
}
