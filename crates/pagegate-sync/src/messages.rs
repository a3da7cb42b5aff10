//! Request and response bodies exchanged with the remote store.
//!
//! All bodies are JSON. Pages travel as slugs; comments use the camelCase
//! shape of [`Comment`](pagegate_core::Comment).

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use pagegate_core::{
    ActionSet, PageId, PermissionAction, PermissionMap, Principal, PrincipalId, Role, RoleKind,
};

/// Body of `POST /api/comments/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub content: String,
    pub page: PageId,
}

/// Body of `PUT /api/comments/{id}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentEdit {
    pub content: String,
}

/// Body of `GET /api/profile/`.
///
/// Permissions are keyed by wire key (slug or legacy underscore key) and
/// list action names. Decoding into a [`Principal`] is lenient: entries the
/// client does not recognize are skipped with a warning.
///
/// Absent or null fields decode as empty. A role other than `"admin"` is a
/// standard user. A flat list of permissions carries no page association
/// and grants nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient_permissions")]
    pub permissions: BTreeMap<String, Vec<String>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PermissionsWire {
    PerPage(BTreeMap<String, Option<Vec<String>>>),
    Flat(Vec<String>),
}

fn lenient_permissions<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let permissions = match Option::<PermissionsWire>::deserialize(deserializer)? {
        None => BTreeMap::new(),
        Some(PermissionsWire::PerPage(map)) => map
            .into_iter()
            .map(|(page, actions)| (page, actions.unwrap_or_default()))
            .collect(),
        Some(PermissionsWire::Flat(list)) => {
            if !list.is_empty() {
                tracing::warn!(entries = list.len(), "ignoring flat permission list in profile");
            }
            BTreeMap::new()
        }
    };
    Ok(permissions)
}

impl Profile {
    /// Profile describing `principal`, as a server would send it.
    pub fn for_principal(principal: &Principal) -> Self {
        let permissions = principal
            .permissions()
            .iter()
            .map(|(page, actions)| {
                let names = actions.iter().map(|a| a.as_str().to_string()).collect();
                (page.slug().to_string(), names)
            })
            .collect();

        Self {
            username: principal.id.to_string(),
            role: principal.role.kind().as_str().to_string(),
            permissions,
        }
    }

    /// The permission map this profile grants, skipping unknown entries.
    pub fn permission_map(&self) -> PermissionMap {
        let mut map = PermissionMap::new();
        for (key, names) in &self.permissions {
            let Some(page) = PageId::from_wire_key(key) else {
                tracing::warn!(page_key = %key, "skipping unknown page in profile");
                continue;
            };

            let mut actions = ActionSet::new();
            for name in names {
                match name.parse::<PermissionAction>() {
                    Ok(action) => actions.insert(action),
                    Err(_) => {
                        tracing::warn!(page = %page, action = %name, "skipping unknown action in profile")
                    }
                }
            }
            map.set(page, map.get(page).union(actions));
        }
        map
    }

    /// Convert into a principal. The username is both id and name.
    pub fn into_principal(self) -> Principal {
        let role = if self.role == RoleKind::Admin.as_str() {
            Role::Admin
        } else {
            Role::Standard {
                permissions: self.permission_map(),
            }
        };

        Principal {
            id: PrincipalId::new(self.username.clone()),
            name: self.username,
            email: String::new(),
            role,
        }
    }
}
