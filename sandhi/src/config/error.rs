//! Configuration loading errors.

/// Config load error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigLoadError {
    /// I/O error
    #[error("IO error: {0}")]
    Io(String),
    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
    /// Values parsed but out of range
    #[error("Invalid value: {0}")]
    Invalid(String),
}
