//! SQLite implementation of the PermissionStore trait.
//!
//! This is the persistent backend for the principal collection. It uses
//! rusqlite with bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use pagegate_core::{PermissionMap, Principal, PrincipalId, Role, RoleKind};

use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::{InsertResult, PermissionStore, ReplaceResult};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn encode_permissions(permissions: &PermissionMap) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(permissions, &mut buf)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(buf)
}

fn decode_permissions(bytes: &[u8]) -> Result<PermissionMap> {
    if bytes.is_empty() {
        return Ok(PermissionMap::new());
    }
    ciborium::from_reader(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Column values for one principal row, before decoding.
struct PrincipalRow {
    id: String,
    name: String,
    email: String,
    role: String,
    permissions: Vec<u8>,
}

impl PrincipalRow {
    fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("principal_id")?,
            name: row.get("name")?,
            email: row.get("email")?,
            role: row.get("role")?,
            permissions: row.get("permissions")?,
        })
    }

    fn into_principal(self) -> Result<Principal> {
        let kind: RoleKind = self
            .role
            .parse()
            .map_err(|e| StoreError::InvalidData(format!("principal {}: {}", self.id, e)))?;
        let role = match kind {
            RoleKind::Admin => Role::Admin,
            RoleKind::User => Role::Standard {
                permissions: decode_permissions(&self.permissions)?,
            },
        };
        Ok(Principal {
            id: PrincipalId::new(self.id),
            name: self.name,
            email: self.email,
            role,
        })
    }
}

#[async_trait]
impl PermissionStore for SqliteStore {
    async fn insert_principal(&self, principal: &Principal) -> Result<InsertResult> {
        let principal = principal.clone();

        self.run(move |conn| {
            let existing: Option<i64> = conn
                .query_row(
                    "SELECT position FROM principals WHERE principal_id = ?1",
                    params![principal.id.as_str()],
                    |row| row.get(0),
                )
                .optional()?;

            if existing.is_some() {
                return Ok(InsertResult::AlreadyExists);
            }

            let permissions = encode_permissions(&principal.permissions())?;
            let now = now_millis();
            conn.execute(
                "INSERT INTO principals (
                    principal_id, name, email, role, permissions, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                params![
                    principal.id.as_str(),
                    principal.name,
                    principal.email,
                    principal.role.kind().as_str(),
                    permissions,
                    now,
                ],
            )?;

            Ok(InsertResult::Inserted)
        })
        .await
    }

    async fn replace_principal(&self, principal: &Principal) -> Result<ReplaceResult> {
        let principal = principal.clone();

        self.run(move |conn| {
            let permissions = encode_permissions(&principal.permissions())?;
            let changed = conn.execute(
                "UPDATE principals
                 SET name = ?2, email = ?3, role = ?4, permissions = ?5, updated_at = ?6
                 WHERE principal_id = ?1",
                params![
                    principal.id.as_str(),
                    principal.name,
                    principal.email,
                    principal.role.kind().as_str(),
                    permissions,
                    now_millis(),
                ],
            )?;

            Ok(if changed == 0 {
                ReplaceResult::NotFound
            } else {
                ReplaceResult::Replaced
            })
        })
        .await
    }

    async fn get_principal(&self, id: &PrincipalId) -> Result<Option<Principal>> {
        let id = id.clone();

        self.run(move |conn| {
            let row = conn
                .query_row(
                    "SELECT principal_id, name, email, role, permissions
                     FROM principals WHERE principal_id = ?1",
                    params![id.as_str()],
                    PrincipalRow::read,
                )
                .optional()?;

            row.map(PrincipalRow::into_principal).transpose()
        })
        .await
    }

    async fn list_principals(&self) -> Result<Vec<Principal>> {
        self.run(|conn| {
            let mut stmt = conn.prepare(
                "SELECT principal_id, name, email, role, permissions
                 FROM principals ORDER BY position ASC",
            )?;
            let rows = stmt
                .query_map([], PrincipalRow::read)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            rows.into_iter().map(PrincipalRow::into_principal).collect()
        })
        .await
    }

    async fn count_principals(&self) -> Result<usize> {
        self.run(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM principals", [], |row| row.get(0))?;
            Ok(count as usize)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::PermissionStoreExt;
    use pagegate_core::{ActionSet, PageId, PermissionAction::*};
    use tempfile::TempDir;

    fn john() -> Principal {
        Principal::standard(
            "1",
            "John Doe",
            "john@example.com",
            PermissionMap::new()
                .with(PageId::ProductsList, [View, Edit])
                .with(PageId::Clients, ActionSet::ALL),
        )
    }

    fn admin() -> Principal {
        Principal::admin("root", "Super Admin", "root@example.com")
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = SqliteStore::open_memory().unwrap();

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
    }

    #[tokio::test]
    async fn test_duplicate_insert() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert_principal(&john()).await.unwrap();

        assert_eq!(
            store.insert_principal(&john()).await.unwrap(),
            InsertResult::AlreadyExists
        );
        assert_eq!(store.count_principals().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_admin_round_trips_without_map() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert_principal(&admin()).await.unwrap();

        let got = store
            .get_principal(&PrincipalId::from("root"))
            .await
            .unwrap()
            .unwrap();
        assert!(got.is_admin());
    }

    #[tokio::test]
    async fn test_replace_overwrites_whole_map() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert_principal(&john()).await.unwrap();
        store.insert_principal(&admin()).await.unwrap();

        let mut updated = john();
        updated.name = "John Q. Doe".into();
        updated.role = Role::Standard {
            permissions: PermissionMap::new().with(PageId::OrderList, [View]),
        };
        assert_eq!(
            store.replace_principal(&updated).await.unwrap(),
            ReplaceResult::Replaced
        );

        let all = store.list_principals().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], updated);
        assert!(all[0].permissions().get(PageId::Clients).is_empty());
        assert_eq!(store.total_grants().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_replace_unknown() {
        let store = SqliteStore::open_memory().unwrap();
        assert_eq!(
            store.replace_principal(&john()).await.unwrap(),
            ReplaceResult::NotFound
        );
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pagegate.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.insert_principal(&admin()).await.unwrap();
            store.insert_principal(&john()).await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let ids: Vec<String> = store
            .list_principals()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id.to_string())
            .collect();
        assert_eq!(ids, vec!["root", "1"]);
    }

    #[tokio::test]
    async fn test_unknown_role_is_invalid_data() {
        let store = SqliteStore::open_memory().unwrap();
        store
            .run(|conn| {
                conn.execute(
                    "INSERT INTO principals (
                        principal_id, name, email, role, permissions, created_at, updated_at
                    ) VALUES ('x', 'X', 'x@example.com', 'owner', x'', 0, 0)",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let err = store
            .get_principal(&PrincipalId::from("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }
}
