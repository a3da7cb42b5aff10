//! The access gate.
//!
//! Pure decision functions over a principal snapshot. Nothing here mutates
//! state or performs I/O, so any number of queries made against the same
//! snapshot within one decision cycle agree with each other.

use pagegate_core::{ActionSet, PageId, PermissionAction, Principal, Role};

/// Actions `principal` may perform on `page`.
///
/// Admins get every action on every page. Standard users get exactly what
/// their map grants; an unmapped page yields the empty set.
pub fn effective_actions(principal: &Principal, page: PageId) -> ActionSet {
    match &principal.role {
        Role::Admin => ActionSet::ALL,
        Role::Standard { permissions } => permissions.get(page),
    }
}

/// Whether `page` appears in `principal`'s navigation.
///
/// Any granted action implies visibility; View carries no special weight.
pub fn can_see(principal: &Principal, page: PageId) -> bool {
    !effective_actions(principal, page).is_empty()
}

/// Whether `principal` may perform `action` on `page`.
pub fn can_perform(principal: &Principal, page: PageId, action: PermissionAction) -> bool {
    effective_actions(principal, page).contains(action)
}

/// Pages visible to `principal`, in catalog order.
pub fn visible_pages(principal: &Principal) -> Vec<PageId> {
    PageId::ALL
        .into_iter()
        .filter(|page| can_see(principal, *page))
        .collect()
}
