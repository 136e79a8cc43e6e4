//! Error types for sandhi

use crate::config::ConfigLoadError;

/// Result type alias
pub type Result<T> = std::result::Result<T, ConflationError>;

/// Failure reported by the host while building or running a geometry
/// replacement (or a copy into the subject dataset).
///
/// These are recoverable: a batch records the failure and moves on to the
/// next candidate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReplaceError {
    /// The host refuses to replace this pair (e.g. incompatible geometry types)
    #[error("Cannot replace geometry: {0}")]
    CannotReplace(String),

    /// The operation was built but refused to execute
    #[error("Operation failed: {0}")]
    ExecutionFailed(String),
}

/// sandhi error types
#[derive(Debug, thiserror::Error)]
pub enum ConflationError {
    /// Host replace/copy failure
    #[error(transparent)]
    Replace(#[from] ReplaceError),

    /// Requested behaviour is deliberately not supported
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigLoadError),

    /// A host feature could not be adapted (e.g. empty or non-finite bounds)
    #[error("Invalid feature: {0}")]
    InvalidFeature(String),
}
