//! # PageGate Permissions
//!
//! Access decisions over principal snapshots.
//!
//! ## Overview
//!
//! Every function in this crate is a pure projection: it reads a
//! [`Principal`](pagegate_core::Principal) and answers a question. Nothing
//! here writes permission state; the directory is the only writer.
//!
//! ## Key Concepts
//!
//! - **Effective actions**: Admins hold every action; standard users hold
//!   what their map grants, and nothing on unmapped pages
//! - **Visibility**: a page is visible when any action is granted
//! - **Comment policy**: authors may always edit and delete their own
//!   comments; others need the page's Edit or Delete action
//! - **Editor**: merges checkbox toggles into a full map before a save
//!
//! ## Usage
//!
//! ```rust
//! use pagegate_core::{PageId, PermissionAction, PermissionMap, Principal};
//! use pagegate_perms::{can_perform, can_see};
//!
//! let user = Principal::standard(
//!     "1",
//!     "John Doe",
//!     "john@example.com",
//!     PermissionMap::new().with(PageId::ProductsList, [PermissionAction::View]),
//! );
//!
//! assert!(can_see(&user, PageId::ProductsList));
//! assert!(!can_perform(&user, PageId::ProductsList, PermissionAction::Delete));
//! ```

pub mod editor;
pub mod gate;
pub mod policy;
pub mod summary;

pub use editor::PermissionEditor;
pub use gate::{can_perform, can_see, effective_actions, visible_pages};
pub use policy::{may_create_comment, may_delete_comment, may_edit_comment};
pub use summary::{access_row, grant_count, PageAccess};
