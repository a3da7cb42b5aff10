//! In-memory implementation of the PermissionStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use pagegate_core::{Principal, PrincipalId};

use crate::error::{Result, StoreError};
use crate::traits::{InsertResult, PermissionStore, ReplaceResult};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Principals in insertion order.
    principals: Vec<Principal>,

    /// Index: principal id -> position in `principals`.
    positions: HashMap<PrincipalId, usize>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    /// Create a store pre-populated with `principals`.
    ///
    /// Later duplicates of an id are ignored.
    pub fn with_principals(principals: impl IntoIterator<Item = Principal>) -> Self {
        let mut inner = MemoryStoreInner::default();
        for principal in principals {
            if inner.positions.contains_key(&principal.id) {
                continue;
            }
            inner
                .positions
                .insert(principal.id.clone(), inner.principals.len());
            inner.principals.push(principal);
        }
        Self {
            inner: RwLock::new(inner),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn insert_principal(&self, principal: &Principal) -> Result<InsertResult> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;

        if inner.positions.contains_key(&principal.id) {
            return Ok(InsertResult::AlreadyExists);
        }

        let position = inner.principals.len();
        inner.positions.insert(principal.id.clone(), position);
        inner.principals.push(principal.clone());

        Ok(InsertResult::Inserted)
    }

    async fn replace_principal(&self, principal: &Principal) -> Result<ReplaceResult> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;

        let Some(&position) = inner.positions.get(&principal.id) else {
            return Ok(ReplaceResult::NotFound);
        };
        inner.principals[position] = principal.clone();

        Ok(ReplaceResult::Replaced)
    }

    async fn get_principal(&self, id: &PrincipalId) -> Result<Option<Principal>> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner
            .positions
            .get(id)
            .map(|&position| inner.principals[position].clone()))
    }

    async fn list_principals(&self) -> Result<Vec<Principal>> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.principals.clone())
    }

    async fn count_principals(&self) -> Result<usize> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.principals.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::PermissionStoreExt;
    use pagegate_core::{ActionSet, PageId, PermissionAction::*, PermissionMap};

    fn john() -> Principal {
        Principal::standard(
            "1",
            "John Doe",
            "john@example.com",
            PermissionMap::new().with(PageId::ProductsList, [View, Edit]),
        )
    }

    fn jane() -> Principal {
        Principal::standard(
            "2",
            "Jane Smith",
            "jane@example.com",
            PermissionMap::new().with(PageId::SalesReports, [View]),
        )
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryStore::new();
        assert_eq!(
            store.insert_principal(&john()).await.unwrap(),
            InsertResult::Inserted
        );

        let got = store
            .get_principal(&PrincipalId::from("1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got, john());
        assert!(store
            .get_principal(&PrincipalId::from("9"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert() {
        let store = MemoryStore::new();
        store.insert_principal(&john()).await.unwrap();
        assert_eq!(
            store.insert_principal(&john()).await.unwrap(),
            InsertResult::AlreadyExists
        );
        assert_eq!(store.count_principals().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_replace_keeps_position_and_overwrites_map() {
        let store = MemoryStore::with_principals([john(), jane()]);

        let mut updated = john();
        updated.role = pagegate_core::Role::Standard {
            permissions: PermissionMap::new().with(PageId::Clients, ActionSet::ALL),
        };
        assert_eq!(
            store.replace_principal(&updated).await.unwrap(),
            ReplaceResult::Replaced
        );

        let all = store.list_principals().await.unwrap();
        assert_eq!(all[0].id, PrincipalId::from("1"));
        assert!(all[0].permissions().get(PageId::ProductsList).is_empty());
        assert_eq!(all[0].permissions().get(PageId::Clients), ActionSet::ALL);
        assert_eq!(all[1], jane());
    }

    #[tokio::test]
    async fn test_replace_unknown() {
        let store = MemoryStore::new();
        assert_eq!(
            store.replace_principal(&john()).await.unwrap(),
            ReplaceResult::NotFound
        );
        assert_eq!(store.count_principals().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_total_grants() {
        let store = MemoryStore::with_principals([john(), jane()]);
        assert_eq!(store.total_grants().await.unwrap(), 3);
        assert!(store.contains_principal(&PrincipalId::from("2")).await.unwrap());
    }
}
