//! Crate-level error types.

use thiserror::Error;

use crate::engine::context::ConfigError;

/// Errors surfaced to CLI callers. Rule skips are not errors; they are
/// counted in the report summary instead.
#[derive(Debug, Error)]
pub enum CloudAuditError {
    /// Invalid thresholds or prices, rejected before any evaluation runs.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The configuration file could not be read or parsed.
    #[error("Configuration file error: {0}")]
    ConfigFile(String),

    /// An unknown diagnose target.
    #[error("Unsupported resource type '{requested}'. Supported: {supported}")]
    UnsupportedResourceType { requested: String, supported: String },

    /// The snapshot file could not be used.
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CloudAuditError>;
