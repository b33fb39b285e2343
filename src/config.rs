use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::error::{AppError, AppResult, ConfigError, FileError};
use crate::infrastructure::AccessorPlan;

/// What the binary does on one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// scan → generate → export → apply
    #[default]
    Generate,
    /// load an exported results file and match it onto a fresh scan
    Reapply,
}

impl FromStr for RunMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "generate" => Ok(RunMode::Generate),
            "reapply" | "re-apply" | "apply" => Ok(RunMode::Reapply),
            other => Err(ConfigError::UnknownVariant {
                what: "run mode".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Program configuration
#[derive(Clone, Debug)]
pub struct Config {
    // --- completion API ---
    pub api_key: String,
    pub api_base_url: String,
    pub model_name: String,
    /// Relay server base URL; when set, requests go through the relay
    pub relay_url: Option<String>,
    pub max_tokens: u32,
    /// Pause before each request once one has succeeded
    pub request_delay_ms: u64,
    /// Pause before the working set is cleared after an apply
    pub clear_delay_ms: u64,
    // --- files ---
    pub document_path: String,
    pub results_file: String,
    pub settings_file: String,
    // --- behaviour ---
    pub accessor_plan: AccessorPlan,
    pub mode: RunMode,
    pub rescan_after_apply: bool,
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: "https://api.openai.com/v1".to_string(),
            model_name: "gpt-4o-mini".to_string(),
            relay_url: None,
            max_tokens: 300,
            request_delay_ms: 2000,
            clear_delay_ms: 2000,
            document_path: "document.json".to_string(),
            results_file: "alt_text_results.json".to_string(),
            settings_file: "alt_text_settings.toml".to_string(),
            accessor_plan: AccessorPlan::standard(),
            mode: RunMode::Generate,
            rescan_after_apply: false,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// Defaults, then the saved settings file, then the environment.
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("ALT_TEXT_SETTINGS_FILE") {
            config.settings_file = path;
        }
        let settings = Settings::load(Path::new(&config.settings_file))?;
        config.apply_settings(&settings);
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        if !settings.api_key.is_empty() {
            self.api_key = settings.api_key.clone();
        }
        if !settings.api_url.is_empty() {
            self.relay_url = Some(settings.api_url.clone());
        }
    }

    /// Overlay environment variables read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("ALT_TEXT_API_KEY").or_else(|| lookup("OPENAI_API_KEY")) {
            self.api_key = key;
        }
        if let Some(url) = lookup("ALT_TEXT_API_BASE_URL") {
            self.api_base_url = url;
        }
        if let Some(model) = lookup("ALT_TEXT_MODEL") {
            self.model_name = model;
        }
        if let Some(url) = lookup("ALT_TEXT_RELAY_URL") {
            self.relay_url = Some(url).filter(|u| !u.is_empty());
        }
        if let Some(tokens) = parse_var(&lookup, "ALT_TEXT_MAX_TOKENS", "u32")? {
            self.max_tokens = tokens;
        }
        if let Some(ms) = parse_var(&lookup, "ALT_TEXT_REQUEST_DELAY_MS", "u64")? {
            self.request_delay_ms = ms;
        }
        if let Some(ms) = parse_var(&lookup, "ALT_TEXT_CLEAR_DELAY_MS", "u64")? {
            self.clear_delay_ms = ms;
        }
        if let Some(path) = lookup("ALT_TEXT_DOCUMENT") {
            self.document_path = path;
        }
        if let Some(path) = lookup("ALT_TEXT_RESULTS_FILE") {
            self.results_file = path;
        }
        if let Some(path) = lookup("ALT_TEXT_SETTINGS_FILE") {
            self.settings_file = path;
        }
        if let Some(plan) = lookup("ALT_TEXT_ACCESSORS") {
            self.accessor_plan = plan.parse()?;
        }
        if let Some(mode) = lookup("ALT_TEXT_MODE") {
            self.mode = mode.parse()?;
        }
        if let Some(rescan) = parse_var(&lookup, "ALT_TEXT_RESCAN", "bool")? {
            self.rescan_after_apply = rescan;
        }
        if let Some(verbose) = parse_var(&lookup, "VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = verbose;
        }
        Ok(())
    }

    pub fn settings(&self) -> Settings {
        Settings {
            api_key: self.api_key.clone(),
            api_url: self.relay_url.clone().unwrap_or_default(),
        }
    }
}

fn parse_var<T, F>(lookup: &F, var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}

/// User settings persisted between sessions
///
/// Read at startup, written only on an explicit save. No schema version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_url: String,
}

impl Settings {
    /// A missing file yields empty settings.
    pub fn load(path: &Path) -> AppResult<Self> {
        let path_str = path.display().to_string();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file at {}", path_str);
                return Ok(Self::default());
            }
            Err(e) => return Err(AppError::file_read_failed(path_str, e)),
        };
        toml::from_str(&content).map_err(|source| {
            AppError::File(FileError::TomlParseFailed {
                path: path_str,
                source,
            })
        })
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::serialize_failed("settings", e))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::file_write_failed(parent.display().to_string(), e))?;
        }
        std::fs::write(path, content)
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))
    }
}

pub fn settings_path(config: &Config) -> PathBuf {
    PathBuf::from(&config.settings_file)
}
