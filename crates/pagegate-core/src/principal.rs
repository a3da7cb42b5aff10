//! Principals, roles, and per-page permission maps.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::action::{ActionSet, PermissionAction};
use crate::catalog::PageId;
use crate::error::CoreError;

/// Identifier of a principal.
///
/// Profiles use the username; directory-created principals get a generated id.
/// Comment authorship compares against this value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id used for a principal whose profile could not be fetched.
    pub fn anonymous() -> Self {
        Self(String::new())
    }

    pub fn is_anonymous(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PrincipalId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PrincipalId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Mapping from page to the actions granted on it.
///
/// A page that is absent reads as the empty set. Setting a page to the empty
/// set removes its entry, so "explicitly empty" and "unmapped" compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMap(BTreeMap<PageId, ActionSet>);

impl PermissionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions granted on `page`; empty if unmapped.
    pub fn get(&self, page: PageId) -> ActionSet {
        self.0.get(&page).copied().unwrap_or_default()
    }

    /// Replace the actions for `page`.
    pub fn set(&mut self, page: PageId, actions: ActionSet) {
        if actions.is_empty() {
            self.0.remove(&page);
        } else {
            self.0.insert(page, actions);
        }
    }

    pub fn grant(&mut self, page: PageId, action: PermissionAction) {
        let mut actions = self.get(page);
        actions.insert(action);
        self.set(page, actions);
    }

    pub fn revoke(&mut self, page: PageId, action: PermissionAction) {
        let mut actions = self.get(page);
        actions.remove(action);
        self.set(page, actions);
    }

    /// Builder-style `set`.
    pub fn with(mut self, page: PageId, actions: impl Into<ActionSet>) -> Self {
        self.set(page, actions.into());
        self
    }

    /// Mapped pages and their actions, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (PageId, ActionSet)> + '_ {
        self.0.iter().map(|(page, actions)| (*page, *actions))
    }

    /// Number of pages with at least one action.
    pub fn page_count(&self) -> usize {
        self.0.len()
    }

    /// Total number of (page, action) pairs granted.
    pub fn grant_count(&self) -> usize {
        self.0.values().map(|a| a.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(PageId, ActionSet)> for PermissionMap {
    fn from_iter<I: IntoIterator<Item = (PageId, ActionSet)>>(iter: I) -> Self {
        let mut map = PermissionMap::new();
        for (page, actions) in iter {
            map.set(page, map.get(page).union(actions));
        }
        map
    }
}

/// A principal's role.
///
/// Admins hold every action on every page; their access is not expressed as
/// a map at all. Standard users hold exactly what their map grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Admin,
    Standard { permissions: PermissionMap },
}

impl Role {
    /// A standard role with no grants.
    pub fn standard() -> Self {
        Role::Standard {
            permissions: PermissionMap::new(),
        }
    }

    pub fn kind(&self) -> RoleKind {
        match self {
            Role::Admin => RoleKind::Admin,
            Role::Standard { .. } => RoleKind::User,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Wire discriminator for [`Role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleKind {
    Admin,
    User,
}

impl RoleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RoleKind::Admin => "admin",
            RoleKind::User => "user",
        }
    }
}

impl FromStr for RoleKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(RoleKind::Admin),
            "user" => Ok(RoleKind::User),
            other => Err(CoreError::UnknownRole(other.to_string())),
        }
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PrincipalRecord", into = "PrincipalRecord")]
pub struct Principal {
    pub id: PrincipalId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Principal {
    /// Create a standard principal with the given grants.
    pub fn standard(
        id: impl Into<PrincipalId>,
        name: impl Into<String>,
        email: impl Into<String>,
        permissions: PermissionMap,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: Role::Standard { permissions },
        }
    }

    /// Create an admin principal.
    pub fn admin(
        id: impl Into<PrincipalId>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: Role::Admin,
        }
    }

    /// The principal used when no profile is available: standard, no grants.
    pub fn anonymous() -> Self {
        Self::standard(PrincipalId::anonymous(), "", "", PermissionMap::new())
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// The explicit permission map. Empty for admins.
    pub fn permissions(&self) -> PermissionMap {
        match &self.role {
            Role::Admin => PermissionMap::new(),
            Role::Standard { permissions } => permissions.clone(),
        }
    }
}

/// Flat record form used on the wire and in storage.
#[derive(Serialize, Deserialize)]
struct PrincipalRecord {
    id: PrincipalId,
    name: String,
    email: String,
    role: RoleKind,
    #[serde(default)]
    permissions: PermissionMap,
}

impl From<PrincipalRecord> for Principal {
    fn from(record: PrincipalRecord) -> Self {
        let role = match record.role {
            RoleKind::Admin => Role::Admin,
            RoleKind::User => Role::Standard {
                permissions: record.permissions,
            },
        };
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            role,
        }
    }
}

impl From<Principal> for PrincipalRecord {
    fn from(principal: Principal) -> Self {
        let (role, permissions) = match principal.role {
            Role::Admin => (RoleKind::Admin, PermissionMap::new()),
            Role::Standard { permissions } => (RoleKind::User, permissions),
        };
        Self {
            id: principal.id,
            name: principal.name,
            email: principal.email,
            role,
            permissions,
        }
    }
}
