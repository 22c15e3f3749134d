//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use ftthmap_config::ConfigError;
use ftthmap_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const EMPTY_DATASET: i32 = 6;
    pub const LOAD: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Load ─────────────────────────────────────────────────────────
    #[error("Could not load address data from {origin}")]
    #[diagnostic(
        code(ftthmap::load_failed),
        help(
            "Check that the data file exists and is reachable.\n\
             Source: {origin}\n\
             Pass another with --data, or configure one with: ftthmap config init"
        )
    )]
    LoadFailed {
        origin: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{url} responded with HTTP {status}")]
    #[diagnostic(
        code(ftthmap::http_status),
        help("The data file URL may be wrong or the file not yet published.")
    )]
    HttpStatus { url: String, status: u16 },

    #[error("Address data from {origin} is malformed")]
    #[diagnostic(
        code(ftthmap::decode),
        help("Expected a JSON array of address records.\n{message}")
    )]
    Decode { origin: String, message: String },

    #[error("No address records found in {origin}")]
    #[diagnostic(
        code(ftthmap::empty_dataset),
        help("The data file is an empty array. Regenerate it, or point --data elsewhere.")
    )]
    EmptyDataset { origin: String },

    #[error("Loading timed out after {seconds}s")]
    #[diagnostic(
        code(ftthmap::timeout),
        help("Increase the limit with --timeout, or drop it to wait indefinitely.")
    )]
    Timeout { seconds: u64 },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Dataset '{name}' not found in configuration")]
    #[diagnostic(
        code(ftthmap::dataset_not_found),
        help(
            "Available datasets: {available}\n\
             Add one with: ftthmap config add-dataset <NAME> <SOURCE>"
        )
    )]
    DatasetNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(ftthmap::config))]
    Config(Box<figment::Error>),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ftthmap::validation))]
    Validation { field: String, reason: String },

    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(ftthmap::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    #[diagnostic(code(ftthmap::serialize))]
    Serialize(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LoadFailed { .. } | Self::HttpStatus { .. } | Self::Decode { .. } => {
                exit_code::LOAD
            }
            Self::EmptyDataset { .. } => exit_code::EMPTY_DATASET,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::DatasetNotFound { .. } => exit_code::NOT_FOUND,
            Self::Config(_) => exit_code::CONFIG,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Io(_) | Self::Serialize(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Fetch { url, reason } => CliError::LoadFailed {
                origin: url,
                source: reason.into(),
            },

            CoreError::Read { path, source } => CliError::LoadFailed {
                origin: path,
                source: Box::new(source),
            },

            CoreError::HttpStatus { url, status } => CliError::HttpStatus { url, status },

            CoreError::Timeout { timeout_secs, .. } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Decode { origin, message } => CliError::Decode { origin, message },

            CoreError::EmptyDataset { origin } => CliError::EmptyDataset { origin },

            CoreError::InvalidSource { input, reason } => CliError::Validation {
                field: "data source".into(),
                reason: format!("'{input}': {reason}"),
            },

            CoreError::Serialize(e) => CliError::Serialize(e.to_string()),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },

            ConfigError::UnknownDataset { name, available } => CliError::DatasetNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            },

            ConfigError::Source(core) => core.into(),

            ConfigError::Figment(e) => CliError::Config(e),

            ConfigError::Serialization(e) => e.into(),

            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
