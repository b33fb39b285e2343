/// Logging utilities
///
/// Subscriber setup plus banner helpers for the binary's output.
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, RunMode};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` for this crate
/// when `verbose` is on. Calling twice is harmless.
pub fn init(verbose: bool) {
    let default_directive = if verbose {
        "info,framer_alt_text=debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Startup banner
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 Alt text generator starting");
    info!(
        "📋 Mode: {}",
        match config.mode {
            RunMode::Generate => "generate",
            RunMode::Reapply => "re-apply",
        }
    );
    match config.relay_url.as_deref() {
        Some(url) => info!("🌐 Relay server: {}", url),
        None => info!("🤖 Model: {} @ {}", config.model_name, config.api_base_url),
    }
    info!("📄 Document: {}", config.document_path);
    info!("{}", "=".repeat(60));
}

/// Stage header
pub fn log_stage(name: &str) {
    info!("\n{}", "─".repeat(60));
    info!("▶ {}", name);
    info!("{}", "─".repeat(60));
}

/// Final statistics
///
/// # Arguments
/// - `generated`: (success, failed) of the generation batch, if one ran
/// - `applied`: (success, failed) of the apply batch
pub fn print_final_stats(generated: Option<(usize, usize)>, applied: (usize, usize)) {
    info!("\n{}", "=".repeat(60));
    info!("📊 Run summary");
    info!(
        "Finished at: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    if let Some((success, failed)) = generated {
        info!("✅ Generated: {}", success);
        info!("❌ Generation failed: {}", failed);
    }
    info!("✅ Applied: {}", applied.0);
    info!("❌ Apply failed: {}", applied.1);
    info!("{}", "=".repeat(60));
}

/// Truncate long text for log display
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
