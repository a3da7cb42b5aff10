//! The user directory: administrative create and update of principals.
//!
//! The directory is the only writer of permission state. Readers take
//! principal snapshots and evaluate them with `pagegate_perms`.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use pagegate_core::{PermissionMap, Principal, PrincipalId, Role, RoleKind};
use pagegate_perms::PermissionEditor;
use pagegate_store::{InsertResult, PermissionStore, PermissionStoreExt, ReplaceResult};

use crate::error::{PageGateError, Result};

/// Input rejected at collection time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("name is required")]
    EmptyName,

    #[error("email is required")]
    EmptyEmail,
}

/// A validated principal awaiting an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPrincipal {
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Raw input from the add/edit user form.
///
/// `permissions` is edited through a [`PermissionEditor`] and ignored when
/// the role is admin.
#[derive(Debug, Clone)]
pub struct PrincipalForm {
    pub name: String,
    pub email: String,
    pub role: RoleKind,
    pub permissions: PermissionEditor,
}

impl Default for PrincipalForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: RoleKind::User,
            permissions: PermissionEditor::new(),
        }
    }
}

impl PrincipalForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form pre-filled from an existing principal.
    pub fn from_principal(principal: &Principal) -> Self {
        Self {
            name: principal.name.clone(),
            email: principal.email.clone(),
            role: principal.role.kind(),
            permissions: PermissionEditor::for_principal(principal),
        }
    }

    /// Check the input and produce a [`NewPrincipal`].
    ///
    /// Name and email are trimmed; either being blank is an error.
    pub fn validate(&self) -> std::result::Result<NewPrincipal, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::EmptyName);
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(FormError::EmptyEmail);
        }

        let role = match self.role {
            RoleKind::Admin => Role::Admin,
            RoleKind::User => Role::Standard {
                permissions: self.permissions.map().clone(),
            },
        };

        Ok(NewPrincipal {
            name: name.to_string(),
            email: email.to_string(),
            role,
        })
    }

    /// Validate and apply the form to `principal`, keeping its id.
    pub fn apply_to(&self, principal: Principal) -> std::result::Result<Principal, FormError> {
        let input = self.validate()?;
        Ok(Principal {
            id: principal.id,
            name: input.name,
            email: input.email,
            role: input.role,
        })
    }
}

/// Summary counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectoryStats {
    pub total_users: usize,
    /// Explicit (page, action) grants across all standard principals.
    pub total_grants: usize,
}

/// Administrative access to the principal collection.
pub struct UserDirectory<S: PermissionStore> {
    store: Arc<S>,
}

impl<S: PermissionStore> Clone for UserDirectory<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: PermissionStore> UserDirectory<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Add a principal under a fresh identifier.
    pub async fn create(&self, input: NewPrincipal) -> Result<Principal> {
        let principal = Principal {
            id: PrincipalId::new(Uuid::new_v4().to_string()),
            name: input.name,
            email: input.email,
            role: input.role,
        };

        match self.store.insert_principal(&principal).await? {
            InsertResult::Inserted => {
                tracing::info!(principal_id = %principal.id, role = principal.role.kind().as_str(), "created principal");
                Ok(principal)
            }
            InsertResult::AlreadyExists => Err(PageGateError::DuplicatePrincipal(principal.id)),
        }
    }

    /// Insert `principal` with its own id. Used for seeding.
    pub async fn insert(&self, principal: Principal) -> Result<Principal> {
        match self.store.insert_principal(&principal).await? {
            InsertResult::Inserted => Ok(principal),
            InsertResult::AlreadyExists => Err(PageGateError::DuplicatePrincipal(principal.id)),
        }
    }

    /// Replace the stored principal sharing `principal.id`.
    ///
    /// The permission map is replaced wholesale.
    pub async fn update(&self, principal: Principal) -> Result<Principal> {
        match self.store.replace_principal(&principal).await? {
            ReplaceResult::Replaced => {
                tracing::info!(
                    principal_id = %principal.id,
                    grants = principal.permissions().grant_count(),
                    "updated principal"
                );
                Ok(principal)
            }
            ReplaceResult::NotFound => Err(PageGateError::PrincipalNotFound(principal.id)),
        }
    }

    /// Replace only the permission map of principal `id`.
    pub async fn set_permissions(
        &self,
        id: &PrincipalId,
        permissions: PermissionMap,
    ) -> Result<Principal> {
        let principal = self.require(id).await?;
        let editor = PermissionEditor::from_map(permissions);
        self.update(editor.apply_to(principal)).await
    }

    pub async fn get(&self, id: &PrincipalId) -> Result<Option<Principal>> {
        Ok(self.store.get_principal(id).await?)
    }

    /// Like [`get`](Self::get), but a missing principal is an error.
    pub async fn require(&self, id: &PrincipalId) -> Result<Principal> {
        self.get(id)
            .await?
            .ok_or_else(|| PageGateError::PrincipalNotFound(id.clone()))
    }

    /// All principals, in creation order.
    pub async fn list(&self) -> Result<Vec<Principal>> {
        Ok(self.store.list_principals().await?)
    }

    pub async fn stats(&self) -> Result<DirectoryStats> {
        Ok(DirectoryStats {
            total_users: self.store.count_principals().await?,
            total_grants: self.store.total_grants().await?,
        })
    }
}
