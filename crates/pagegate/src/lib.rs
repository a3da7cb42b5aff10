//! # PageGate
//!
//! Per-page access control and comment synchronization for back-office
//! applications.
//!
//! ## Overview
//!
//! A fixed catalog of pages is protected per principal. Administrators hold
//! every action everywhere; standard users hold the View, Create, Edit, and
//! Delete actions their permission map grants, page by page. Each page has
//! a comment thread kept in sync with a remote store and gated by the same
//! permissions.
//!
//! - [`UserDirectory`] - create and update principals and their grants
//! - [`PageView`] - one open page: the caller's snapshot plus its comments
//! - [`ClientConfig`] - TOML-backed settings for remotes and storage
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pagegate::{ClientConfig, PageView};
//! use pagegate::core::{PageId, PermissionAction};
//! use pagegate::sync::StaticCredential;
//!
//! async fn example() {
//!     let config = ClientConfig::from_file("pagegate.toml").unwrap();
//!     let remote = config.http_remote(StaticCredential::new("token")).unwrap();
//!
//!     let mut view = PageView::open(remote, PageId::ProductsList).await;
//!     if view.can_perform(PermissionAction::Create) {
//!         view.add_comment("Price list updated").await.unwrap();
//!     }
//!     view.close();
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `pagegate::core` - Page catalog, actions, principals, comments
//! - `pagegate::perms` - Access decisions and the permission editor
//! - `pagegate::store` - Principal storage (SQLite, in-memory)
//! - `pagegate::sync` - Comment controller and remote stores

pub mod config;
pub mod directory;
pub mod error;
pub mod view;

pub use config::ClientConfig;
pub use directory::{DirectoryStats, FormError, NewPrincipal, PrincipalForm, UserDirectory};
pub use error::{PageGateError, Result};
pub use view::PageView;

pub use pagegate_core as core;
pub use pagegate_perms as perms;
pub use pagegate_store as store;
pub use pagegate_sync as sync;
