//! Comment authorship policy.
//!
//! Creating a comment needs Create on the page. Editing or deleting needs
//! either authorship of the comment or the matching page action. The
//! anonymous principal is never treated as an author.

use pagegate_core::{Comment, PageId, PermissionAction, Principal};

use crate::gate::can_perform;

/// Whether `principal` may add a comment to `page`.
pub fn may_create_comment(principal: &Principal, page: PageId) -> bool {
    can_perform(principal, page, PermissionAction::Create)
}

/// Whether `principal` may edit `comment`, which lives on `page`.
pub fn may_edit_comment(principal: &Principal, page: PageId, comment: &Comment) -> bool {
    is_author(principal, comment) || can_perform(principal, page, PermissionAction::Edit)
}

/// Whether `principal` may delete `comment`, which lives on `page`.
pub fn may_delete_comment(principal: &Principal, page: PageId, comment: &Comment) -> bool {
    is_author(principal, comment) || can_perform(principal, page, PermissionAction::Delete)
}

fn is_author(principal: &Principal, comment: &Comment) -> bool {
    !principal.id.is_anonymous() && comment.is_authored_by(&principal.id)
}
