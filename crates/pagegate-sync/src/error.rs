//! Error types for the sync module.

use pagegate_core::{CommentId, PageId, PermissionAction};
use thiserror::Error;

/// Errors that can occur during comment synchronization.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// The principal lacks the action needed; no remote call was made.
    #[error("{action} denied on {page}")]
    Denied {
        action: PermissionAction,
        page: PageId,
    },

    /// Comment content was empty after trimming.
    #[error("comment content is empty")]
    EmptyContent,

    /// The comment is not in the local sequence.
    #[error("comment not found: {0}")]
    CommentNotFound(CommentId),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote answered with a non-success status.
    #[error("remote returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The controller was cancelled.
    #[error("sync cancelled")]
    Cancelled,
}

impl SyncError {
    /// Whether the error was produced locally, before any remote call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            SyncError::Denied { .. } | SyncError::EmptyContent | SyncError::CommentNotFound(_)
        )
    }
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
