//! # PageGate Core
//!
//! Pure data model for PageGate: the page catalog, permission actions,
//! principals and their roles, and comment records.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`PageId`] - One of the ten catalog pages, with its slug and display name
//! - [`PermissionAction`] / [`ActionSet`] - View, Create, Edit, Delete
//! - [`PermissionMap`] - Per-page action sets for a standard user
//! - [`Role`] / [`Principal`] - Who is asking, and with which grants
//! - [`Comment`] - A per-page annotation
//!
//! ## Page identifiers
//!
//! Pages are addressed on the wire by slug. See [`catalog`] for the registry
//! and [`slugify`] for the derivation rule.

pub mod action;
pub mod catalog;
pub mod comment;
pub mod error;
pub mod principal;

pub use action::{ActionSet, PermissionAction};
pub use catalog::{slugify, PageId};
pub use comment::{Comment, CommentId};
pub use error::{CoreError, Result};
pub use principal::{PermissionMap, Principal, PrincipalId, Role, RoleKind};
