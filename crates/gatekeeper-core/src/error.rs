//! Error types for the Gatekeeper core.

use thiserror::Error;

/// Errors that can occur while building permission values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("unknown permission type: {0}")]
    UnknownKind(String),

    #[error("{0} permission requires a name")]
    EmptyName(&'static str),

    #[error("{0} permission requires at least one action")]
    EmptyActions(&'static str),

    #[error("unknown {kind} action: {action}")]
    UnknownAction { kind: &'static str, action: String },

    #[error("{kind} permission takes no actions, got {actions:?}")]
    UnexpectedActions { kind: &'static str, actions: String },

    #[error("invalid port range: {0}")]
    InvalidPortRange(String),

    #[error("invalid socket host: {0}")]
    InvalidHost(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
