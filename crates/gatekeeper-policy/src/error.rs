//! Error types for the policy module.

use std::path::PathBuf;

use gatekeeper_core::{CoreError, Origin};
use thiserror::Error;

/// Errors that can occur while building permission sources.
///
/// Every variant is a construction-time failure. None of them is produced
/// while answering a permission check.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The policy document could not be read.
    #[error("failed to read policy {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The policy document is not valid JSON or has the wrong shape.
    #[error("malformed policy {policy}: {source}")]
    Parse {
        policy: String,
        #[source]
        source: serde_json::Error,
    },

    /// A permission entry could not be built.
    #[error("invalid permission in policy {policy}: {source}")]
    Permission {
        policy: String,
        #[source]
        source: CoreError,
    },

    /// A `${...}` placeholder could not be expanded.
    #[error("cannot expand policy {policy}: {source}")]
    Placeholder {
        policy: String,
        #[source]
        source: PlaceholderError,
    },

    /// A codebase expanded to a location with no path.
    #[error("invalid codebase {codebase:?} in policy {policy}")]
    InvalidCodebase { policy: String, codebase: String },

    /// A classpath string contains an empty element.
    #[error("classpath element {index} is empty in {classpath:?}, check for leading, trailing or doubled separators")]
    EmptyClasspathElement { classpath: String, index: usize },

    /// Two classpath entries share a file name.
    #[error("jar {name} is on the classpath twice: {first} and {second}")]
    DuplicateCodebase {
        name: String,
        first: Origin,
        second: Origin,
    },

    /// A plugin origin was registered more than once.
    #[error("plugin origin registered twice: {0}")]
    DuplicatePlugin(Origin),
}

/// Errors raised by `${...}` expansion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
    #[error("unknown property ${{{0}}}")]
    Unknown(String),

    #[error("unterminated placeholder in {0:?}")]
    Unterminated(String),
}

/// Result type for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;
