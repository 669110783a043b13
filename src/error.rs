//! Error types for host access, configuration and binding.

use thiserror::Error;

/// A host (browser) operation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("failed to register `{event}` listener: {reason}")]
    Listener { event: String, reason: String },

    #[error("no document available")]
    NoDocument,

    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },
}

/// Configuration could not be read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse player config")]
    Parse(#[from] serde_json::Error),

    #[error("invalid player config: {0}")]
    Invalid(String),
}

/// One binding step failed. Recorded in the bind report; never aborts the
/// remaining steps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("no control with id `{0}`")]
    MissingControl(String),

    #[error("control `{0}` has no playable element")]
    NoPlayableElement(String),

    #[error(transparent)]
    Host(#[from] HostError),
}
