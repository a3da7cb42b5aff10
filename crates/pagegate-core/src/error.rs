//! Error types for the PageGate core.

use thiserror::Error;

/// Errors from parsing core values received as text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown page: {0}")]
    UnknownPage(String),

    #[error("unknown permission action: {0}")]
    UnknownAction(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
