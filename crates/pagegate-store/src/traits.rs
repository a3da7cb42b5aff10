//! PermissionStore trait: the abstract interface for the principal collection.
//!
//! Each principal carries its role and, for standard users, its per-page
//! permission map, so this collection is where permission state lives.
//! Implementations include SQLite (persistent) and in-memory (for tests).

use async_trait::async_trait;
use pagegate_core::{Principal, PrincipalId};

use crate::error::Result;

/// Result of inserting a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertResult {
    /// Principal was appended to the collection.
    Inserted,
    /// A principal with the same id already exists; nothing was written.
    AlreadyExists,
}

/// Result of replacing a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceResult {
    /// The existing entry was overwritten.
    Replaced,
    /// No principal has this id; nothing was written.
    NotFound,
}

/// The PermissionStore trait: async interface for principal persistence.
///
/// # Design Notes
///
/// - **Insertion order**: `list_principals` returns principals in the order
///   they were first inserted. Replacing a principal keeps its position.
/// - **Wholesale replace**: `replace_principal` overwrites every field,
///   including the whole permission map.
/// - **No validation**: names and emails are stored as given. Input is
///   validated where it is collected, not here.
/// - **No delete**: principals are never removed.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Append a principal to the collection.
    async fn insert_principal(&self, principal: &Principal) -> Result<InsertResult>;

    /// Overwrite the principal sharing `principal.id`.
    async fn replace_principal(&self, principal: &Principal) -> Result<ReplaceResult>;

    /// Get a principal by id.
    async fn get_principal(&self, id: &PrincipalId) -> Result<Option<Principal>>;

    /// All principals, in insertion order.
    async fn list_principals(&self) -> Result<Vec<Principal>>;

    /// Number of principals.
    async fn count_principals(&self) -> Result<usize>;
}

/// Extension trait for common store queries.
pub trait PermissionStoreExt: PermissionStore {
    /// Total explicit (page, action) grants across all principals.
    fn total_grants(&self) -> impl std::future::Future<Output = Result<usize>> + Send;

    /// Whether a principal with `id` exists.
    fn contains_principal(
        &self,
        id: &PrincipalId,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;
}

impl<S: PermissionStore + ?Sized> PermissionStoreExt for S {
    async fn total_grants(&self) -> Result<usize> {
        let principals = self.list_principals().await?;
        Ok(principals
            .iter()
            .map(|p| p.permissions().grant_count())
            .sum())
    }

    async fn contains_principal(&self, id: &PrincipalId) -> Result<bool> {
        Ok(self.get_principal(id).await?.is_some())
    }
}
