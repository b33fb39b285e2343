use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Host canvas errors
    #[error("host error: {0}")]
    Host(#[from] HostError),
    /// Description generation errors
    #[error("generation error: {0}")]
    Generate(#[from] GenerateError),
    /// File errors (results export, settings, document snapshot)
    #[error("file error: {0}")]
    File(#[from] FileError),
    /// Workflow precondition / state machine errors
    #[error("{0}")]
    Workflow(#[from] WorkflowError),
    /// Configuration errors
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Host canvas errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The host does not expose this accessor
    #[error("accessor not supported by host: {capability}")]
    Unsupported { capability: &'static str },
    /// The node handle no longer resolves
    #[error("node not found: {node_id}")]
    NodeNotFound { node_id: String },
    /// The host call itself failed
    #[error("{operation} failed: {message}")]
    Failed { operation: String, message: String },
    /// Every configured write strategy was unsupported
    #[error("no writable description accessor for node {node_id}")]
    NoWritableAccessor { node_id: String },
}

impl HostError {
    pub fn unsupported(capability: &'static str) -> Self {
        HostError::Unsupported { capability }
    }

    pub fn failed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        HostError::Failed {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, HostError::Unsupported { .. })
    }
}

/// Completion API errors
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Non-success response, with the body's `error.message` when present
    #[error("{message}")]
    Api {
        status: Option<u16>,
        message: String,
    },
    /// Request could not be sent or the response could not be read
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Request could not be built
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Success status but no completion text
    #[error("empty completion for {url}")]
    EmptyCompletion { url: String },
}

/// File errors
#[derive(Debug, Error)]
pub enum FileError {
    #[error("file not found: {path}")]
    NotFound { path: String },
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse JSON in {path}: {source}")]
    JsonParseFailed {
        path: String,
        source: serde_json::Error,
    },
    #[error("failed to parse TOML in {path}: {source}")]
    TomlParseFailed {
        path: String,
        source: toml::de::Error,
    },
    #[error("failed to serialize {what}: {message}")]
    SerializeFailed { what: String, message: String },
}

/// Workflow errors. The display text is what the status area shows.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Please enter your OpenAI API key")]
    MissingCredential,
    #[error("Please select at least one image")]
    EmptySelection,
    #[error("Another operation is running: {phase}")]
    Busy { phase: String },
    #[error("Cannot {action} while {phase}")]
    InvalidTransition { action: String, phase: String },
    #[error("No generated alt text to apply")]
    NothingToApply,
    #[error("No valid alt text results loaded")]
    NoResultsLoaded,
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("env var {var_name}: value '{value}' is not a valid {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    #[error("unknown {what}: {value}")]
    UnknownVariant { what: String, value: String },
}

// ========== convenience constructors ==========

impl AppError {
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return AppError::File(FileError::NotFound { path });
        }
        AppError::File(FileError::ReadFailed { path, source })
    }

    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    pub fn json_parse_failed(path: impl Into<String>, source: serde_json::Error) -> Self {
        AppError::File(FileError::JsonParseFailed {
            path: path.into(),
            source,
        })
    }

    pub fn serialize_failed(what: impl Into<String>, err: impl std::fmt::Display) -> Self {
        AppError::File(FileError::SerializeFailed {
            what: what.into(),
            message: err.to_string(),
        })
    }
}

impl GenerateError {
    pub fn transport(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        GenerateError::Transport {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;

/// Host call result type
pub type HostResult<T> = Result<T, HostError>;
