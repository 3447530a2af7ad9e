//! Error types for the engine.

use std::path::PathBuf;

use gatekeeper_policy::{PolicyError, SystemPolicyError};
use thiserror::Error;

/// Errors that can occur building or querying the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A permission source could not be built.
    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON or has the wrong shape.
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    /// The platform policy failed while answering a check.
    #[error(transparent)]
    SystemPolicy(#[from] SystemPolicyError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
