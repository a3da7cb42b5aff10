//! Client-side permission editing.
//!
//! An administrator edits a principal's grants one checkbox at a time. The
//! editor merges those toggles into a complete [`PermissionMap`] which is
//! then handed to the directory wholesale; the directory never receives
//! incremental diffs.

use pagegate_core::{ActionSet, PageId, PermissionAction, PermissionMap, Principal, Role};

/// Accumulates per-page, per-action changes over a starting map.
#[derive(Debug, Clone, Default)]
pub struct PermissionEditor {
    map: PermissionMap,
    dirty: bool,
}

impl PermissionEditor {
    /// Start from an empty map (new principal).
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a principal's current grants.
    pub fn for_principal(principal: &Principal) -> Self {
        Self::from_map(principal.permissions())
    }

    pub fn from_map(map: PermissionMap) -> Self {
        Self { map, dirty: false }
    }

    /// Whether `action` is currently checked for `page`.
    pub fn is_checked(&self, page: PageId, action: PermissionAction) -> bool {
        self.map.get(page).contains(action)
    }

    /// Flip one checkbox. Returns the new state.
    pub fn toggle(&mut self, page: PageId, action: PermissionAction) -> bool {
        let mut actions = self.map.get(page);
        let now_set = actions.toggle(action);
        self.map.set(page, actions);
        self.dirty = true;
        now_set
    }

    pub fn grant(&mut self, page: PageId, action: PermissionAction) {
        self.map.grant(page, action);
        self.dirty = true;
    }

    pub fn revoke(&mut self, page: PageId, action: PermissionAction) {
        self.map.revoke(page, action);
        self.dirty = true;
    }

    /// Replace every action on `page`.
    pub fn set_page(&mut self, page: PageId, actions: ActionSet) {
        self.map.set(page, actions);
        self.dirty = true;
    }

    pub fn clear_page(&mut self, page: PageId) {
        self.set_page(page, ActionSet::EMPTY);
    }

    /// Whether anything was changed since the editor was created.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn map(&self) -> &PermissionMap {
        &self.map
    }

    /// The merged, complete map.
    pub fn finish(self) -> PermissionMap {
        self.map
    }

    /// Apply the merged map to `principal`.
    ///
    /// Admins are left unchanged; their access is not map-based.
    pub fn apply_to(self, mut principal: Principal) -> Principal {
        if let Role::Standard { permissions } = &mut principal.role {
            *permissions = self.map;
        }
        principal
    }
}
