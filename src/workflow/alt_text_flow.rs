//! Alt text flow - workflow layer
//!
//! Defines the whole cycle for one document:
//! scan → select → generate → apply (or re-apply from an exported file).
//!
//! The flow owns the workflow state and is the only place phases change.
//! Stages are delegated to `services`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::clients::DescriptionClient;
use crate::config::{Config, Settings};
use crate::error::{AppError, AppResult, WorkflowError};
use crate::infrastructure::{AccessorPlan, HostCanvas};
use crate::models::{GenerationResult, NodeId};
use crate::services::applier::{ApplySummary, DescriptionApplier};
use crate::services::export;
use crate::services::generator::{Delay, DescriptionGenerator, GenerationSummary, TokioDelay};
use crate::services::matcher::ResultMatcher;
use crate::services::scanner::{NodeScanner, ScanScope};
use crate::workflow::state::{Phase, WorkflowState};

/// Alt text flow
///
/// - owns `WorkflowState`; no ambient globals
/// - reads the credential from `Settings` at the start of each operation
/// - holds the host and client only as capabilities
pub struct AltTextFlow {
    host: Arc<dyn HostCanvas>,
    client: Box<dyn DescriptionClient>,
    delay: Box<dyn Delay>,
    plan: AccessorPlan,
    settings: Settings,
    settings_path: Option<PathBuf>,
    request_interval: Duration,
    clear_delay: Duration,
    rescan_after_apply: bool,
    state: WorkflowState,
}

impl AltTextFlow {
    pub fn new(
        host: Arc<dyn HostCanvas>,
        client: Box<dyn DescriptionClient>,
        config: &Config,
    ) -> Self {
        Self {
            host,
            client,
            delay: Box::new(TokioDelay),
            plan: config.accessor_plan.clone(),
            settings: config.settings(),
            settings_path: None,
            request_interval: Duration::from_millis(config.request_delay_ms),
            clear_delay: Duration::from_millis(config.clear_delay_ms),
            rescan_after_apply: config.rescan_after_apply,
            state: WorkflowState::default(),
        }
    }

    pub fn with_delay(mut self, delay: Box<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    // ========== settings ==========

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Edit settings in memory; nothing is persisted until `save_settings`.
    pub fn update_settings(&mut self, api_key: impl Into<String>, api_url: impl Into<String>) {
        self.settings.api_key = api_key.into();
        self.settings.api_url = api_url.into();
    }

    pub fn save_settings(&mut self) -> AppResult<()> {
        if let Some(path) = &self.settings_path {
            self.settings.save(path)?;
        }
        self.state.set_status("Settings saved successfully");
        Ok(())
    }

    // ========== scan ==========

    /// Scan the canvas for images without alt text.
    ///
    /// Every candidate found is pre-selected. On a host failure the
    /// candidate set is emptied and the phase returns to idle.
    pub async fn scan(&mut self) -> AppResult<usize> {
        self.state
            .begin(Phase::Scanning, "scan", &[Phase::Idle, Phase::Scanned, Phase::Generated])?;
        self.state.clear_working_set();

        let result = NodeScanner::new(self.host.as_ref(), &self.plan).scan().await;
        match result {
            Ok(candidates) => {
                let found = candidates.len();
                self.state.replace_candidates(candidates);
                self.state.phase = Phase::Scanned;
                if found == 0 {
                    self.state.set_status("All images have alt text!");
                } else {
                    self.state
                        .set_status(format!("Found {} images without alt text", found));
                }
                Ok(found)
            }
            Err(e) => {
                error!("❌ Scan failed: {}", e);
                self.state.phase = Phase::Idle;
                self.state.set_error(format!("Error analyzing page: {}", e));
                Err(e)
            }
        }
    }

    // ========== selection ==========

    pub fn toggle(&mut self, id: &NodeId) -> bool {
        self.state.selection.toggle(id)
    }

    pub fn select_all(&mut self) {
        self.state.selection.select_all();
    }

    pub fn clear_selection(&mut self) {
        self.state.selection.clear();
    }

    pub fn toggle_all(&mut self) {
        self.state.selection.toggle_all();
    }

    // ========== generate ==========

    /// Generate alt text for the selected candidates.
    ///
    /// A missing credential or empty selection is reported without leaving
    /// the scanned phase. Per-image failures are counted, never fatal.
    pub async fn generate(&mut self) -> AppResult<GenerationSummary> {
        self.state
            .begin(Phase::Generating, "generate", &[Phase::Scanned])?;
        self.state.set_status("Generating alt text...");

        let generator = DescriptionGenerator::new(
            self.client.as_ref(),
            self.delay.as_ref(),
            self.request_interval,
        );
        let WorkflowState {
            candidates,
            selection,
            status,
            ..
        } = &mut self.state;
        let result = generator
            .generate(candidates, selection, &self.settings.api_key, |progress| {
                *status = Some(progress.message());
            })
            .await;

        match result {
            Ok(summary) => {
                self.state.phase = Phase::Generated;
                self.state.set_status(summary.status_message());
                self.state.last_generation = Some(summary.clone());
                Ok(summary)
            }
            Err(e @ AppError::Workflow(_)) => {
                warn!("Generation not started: {}", e);
                self.state.phase = Phase::Scanned;
                self.state.status = None;
                self.state.set_error(e.to_string());
                Err(e)
            }
            Err(e) => {
                error!("❌ Generation aborted: {}", e);
                self.state.phase = Phase::Idle;
                self.state.set_error(format!("Error generating alt text: {}", e));
                Err(e)
            }
        }
    }

    // ========== apply ==========

    /// Write this run's generated descriptions back to the canvas.
    pub async fn apply(&mut self) -> AppResult<ApplySummary> {
        if !self.state.phase.is_busy() && !self.state.has_generated() {
            let e = WorkflowError::NothingToApply;
            self.state.set_error(e.to_string());
            return Err(e.into());
        }
        self.state
            .begin(Phase::Applying, "apply", &[Phase::Generated])?;
        self.state.set_status("Applying alt text...");

        let summary = DescriptionApplier::new(self.host.as_ref(), &self.plan)
            .apply_generated(&self.state.candidates)
            .await;

        self.finish_apply(summary).await
    }

    /// Re-apply mode: load an exported results file and apply it by URL.
    pub async fn reapply_from_file(
        &mut self,
        path: &Path,
        scope: ScanScope,
    ) -> AppResult<ApplySummary> {
        let records = match export::load_results(path).await {
            Ok(records) => records,
            Err(e) => {
                self.state.set_error(format!("Error applying alt text: {}", e));
                return Err(e);
            }
        };
        self.reapply(records, scope).await
    }

    /// Re-apply already loaded records onto a fresh scan of `scope`.
    pub async fn reapply(
        &mut self,
        records: Vec<GenerationResult>,
        scope: ScanScope,
    ) -> AppResult<ApplySummary> {
        let matcher = ResultMatcher::new(records);
        if matcher.is_empty() {
            let e = WorkflowError::NoResultsLoaded;
            self.state.set_error(e.to_string());
            return Err(e.into());
        }
        info!(
            "Loaded {} valid alt texts from generation results ({} discarded)",
            matcher.len(),
            matcher.discarded()
        );

        self.state.begin(
            Phase::Applying,
            "apply",
            &[Phase::Idle, Phase::Scanned, Phase::Generated],
        )?;
        self.state.set_status(format!(
            "Loaded {} valid alt texts from generation results",
            matcher.len()
        ));

        let scanner = NodeScanner::new(self.host.as_ref(), &self.plan);
        let nodes = match scanner.scan_nodes(scope).await {
            Ok(nodes) => nodes,
            Err(e) => {
                error!("❌ Re-apply aborted: {}", e);
                self.state.phase = Phase::Idle;
                self.state.set_error(format!("Error applying alt text: {}", e));
                return Err(e);
            }
        };

        let summary = DescriptionApplier::new(self.host.as_ref(), &self.plan)
            .apply_matched(&nodes, &matcher, &mut self.state.applied)
            .await;

        self.finish_apply(summary).await
    }

    async fn finish_apply(&mut self, summary: ApplySummary) -> AppResult<ApplySummary> {
        self.state.set_status(summary.status_message());
        self.state.last_apply = Some(summary.clone());

        if summary.success > 0 {
            self.delay.wait(self.clear_delay).await;
            self.state.clear_working_set();
        }
        self.state.phase = Phase::Idle;

        if summary.success > 0 && self.rescan_after_apply {
            // the apply itself succeeded; a failed rescan is only recorded
            if let Err(e) = self.scan().await {
                warn!("Rescan after apply failed: {}", e);
            }
        }
        Ok(summary)
    }

    // ========== export ==========

    /// Export generated descriptions so they can be re-applied later.
    pub async fn export_results(&mut self, path: &Path) -> AppResult<usize> {
        let results = export::results_from_candidates(&self.state.candidates);
        export::write_results(path, &results).await?;
        Ok(results.len())
    }
}
