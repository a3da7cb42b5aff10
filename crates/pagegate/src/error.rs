//! Error types for the PageGate facade.

use pagegate_core::{CoreError, PrincipalId};
use pagegate_store::StoreError;
use pagegate_sync::SyncError;
use thiserror::Error;

use crate::directory::FormError;

/// Errors that can occur during PageGate operations.
#[derive(Debug, Error)]
pub enum PageGateError {
    /// Parse error in the data model.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Remote or comment sync error.
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),

    /// Rejected form input.
    #[error("invalid input: {0}")]
    Form(#[from] FormError),

    /// No principal with this id.
    #[error("principal not found: {0}")]
    PrincipalNotFound(PrincipalId),

    /// A principal with this id already exists.
    #[error("principal already exists: {0}")]
    DuplicatePrincipal(PrincipalId),

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for PageGate operations.
pub type Result<T> = std::result::Result<T, PageGateError>;
