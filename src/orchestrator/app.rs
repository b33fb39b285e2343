//! Application - orchestration layer
//!
//! ## Responsibilities
//!
//! 1. **Initialization**: load the document snapshot, pick the client
//! 2. **Run**: drive one mode of the workflow end to end
//! 3. **Persistence**: export results, save the document back
//! 4. **Statistics**: print the run summary
//!
//! No stage logic lives here; everything goes through `AltTextFlow`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients;
use crate::config::{Config, RunMode};
use crate::infrastructure::SnapshotCanvas;
use crate::services::scanner::ScanScope;
use crate::utils::logging::{log_stage, log_startup, print_final_stats};
use crate::workflow::AltTextFlow;

/// Application
pub struct App {
    config: Config,
    canvas: Arc<SnapshotCanvas>,
    flow: AltTextFlow,
}

impl App {
    /// Initialize the application
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let document_path = PathBuf::from(&config.document_path);
        let canvas = Arc::new(
            SnapshotCanvas::load(&document_path)
                .await
                .with_context(|| format!("cannot open document {}", document_path.display()))?,
        );

        let client = clients::client_for(&config);
        let flow = AltTextFlow::new(canvas.clone(), client, &config)
            .with_settings_path(crate::config::settings_path(&config));

        Ok(Self {
            config,
            canvas,
            flow,
        })
    }

    /// Run the configured mode
    pub async fn run(mut self) -> Result<()> {
        match self.config.mode {
            RunMode::Generate => self.run_generate().await?,
            RunMode::Reapply => self.run_reapply().await?,
        }

        self.canvas
            .save(Path::new(&self.config.document_path))
            .await
            .context("cannot save document")?;
        info!("💾 Document saved to {}", self.config.document_path);

        let state = self.flow.state();
        let generated = state
            .last_generation
            .as_ref()
            .map(|s| (s.success, s.failure));
        let applied = state
            .last_apply
            .as_ref()
            .map(|s| (s.success, s.failure))
            .unwrap_or((0, 0));
        print_final_stats(generated, applied);
        Ok(())
    }

    async fn run_generate(&mut self) -> Result<()> {
        log_stage("Scanning for images without alt text");
        let found = self.flow.scan().await?;
        if found == 0 {
            info!("✓ All images have alt text!");
            return Ok(());
        }
        self.log_status();

        log_stage("Generating alt text");
        let summary = self.flow.generate().await?;
        self.log_status();
        for failure in &summary.failures {
            warn!("  ✗ {} ({}): {}", failure.node_id, failure.url, failure.message);
        }
        if summary.success == 0 {
            warn!("⚠️ Nothing was generated, skipping apply");
            return Ok(());
        }

        let results_path = PathBuf::from(&self.config.results_file);
        let exported = self.flow.export_results(&results_path).await?;
        info!("📁 Exported {} results to {}", exported, results_path.display());

        log_stage("Applying alt text");
        self.flow.apply().await?;
        self.log_status();
        Ok(())
    }

    async fn run_reapply(&mut self) -> Result<()> {
        log_stage("Re-applying exported alt text");
        let results_path = PathBuf::from(&self.config.results_file);
        self.flow
            .reapply_from_file(&results_path, ScanScope::SelectionOrDocument)
            .await?;
        self.log_status();
        Ok(())
    }

    fn log_status(&self) {
        if let Some(status) = &self.flow.state().status {
            info!("{}", status);
        }
    }
}
