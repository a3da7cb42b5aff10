//! Proptest generators for property-based testing.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use pagegate_core::{
    ActionSet, Comment, CommentId, PageId, PermissionAction, PermissionMap, Principal,
    PrincipalId,
};

/// Generate a catalog page.
pub fn page_id() -> impl Strategy<Value = PageId> {
    prop::sample::select(PageId::ALL.to_vec())
}

/// Generate a permission action.
pub fn action() -> impl Strategy<Value = PermissionAction> {
    prop::sample::select(PermissionAction::ALL.to_vec())
}

/// Generate any action set, including empty and full.
pub fn action_set() -> impl Strategy<Value = ActionSet> {
    prop::collection::vec(action(), 0..=4).prop_map(|actions| actions.into_iter().collect())
}

/// Generate a permission map over a random subset of pages.
pub fn permission_map() -> impl Strategy<Value = PermissionMap> {
    prop::collection::vec((page_id(), action_set()), 0..=10)
        .prop_map(|entries| entries.into_iter().collect())
}

/// Generate a short principal id.
pub fn principal_id() -> impl Strategy<Value = PrincipalId> {
    "[a-z]{1,8}".prop_map(PrincipalId::from)
}

/// Generate a standard principal.
pub fn standard_principal() -> impl Strategy<Value = Principal> {
    (principal_id(), permission_map()).prop_map(|(id, map)| {
        let name = id.to_string();
        let email = format!("{}@example.com", name);
        Principal::standard(id, name, email, map)
    })
}

/// Generate an admin or standard principal, mostly standard.
pub fn principal() -> impl Strategy<Value = Principal> {
    prop_oneof![
        4 => standard_principal(),
        1 => principal_id().prop_map(|id| {
            let name = id.to_string();
            Principal::admin(id, name.clone(), format!("{}@example.com", name))
        }),
    ]
}

/// Generate non-blank comment content.
pub fn content() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 .,!?]{0,40}"
}

/// Generate a sequence of comments with distinct ids.
pub fn comments(max_len: usize) -> impl Strategy<Value = Vec<Comment>> {
    prop::collection::vec((content(), principal_id(), 0i64..2_000_000_000), 0..=max_len).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (content, author, secs))| {
                    let created_at = chrono_from_secs(secs);
                    Comment::new(CommentId::new(format!("c{}", i + 1)), content, author, created_at)
                })
                .collect()
        },
    )
}

fn chrono_from_secs(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}
