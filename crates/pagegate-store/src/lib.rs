//! # PageGate Store
//!
//! Storage for the principal collection. Provides a trait-based interface
//! for principal persistence with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! Principals carry their role and permission map, so this crate is where
//! permission state lives between sessions. [`PermissionStore`] keeps the
//! directory storage-agnostic; [`SqliteStore`] is the persistent backend and
//! [`MemoryStore`] is used in tests and for seeded demo data.
//!
//! ## Key Types
//!
//! - [`PermissionStore`] - The async trait for all storage operations
//! - [`PermissionStoreExt`] - Aggregate queries built on the trait
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pagegate_core::Principal;
//! use pagegate_store::{InsertResult, PermissionStore, SqliteStore};
//!
//! async fn example() {
//!     let store = SqliteStore::open("pagegate.db").unwrap();
//!
//!     let admin = Principal::admin("root", "Super Admin", "root@example.com");
//!     let result = store.insert_principal(&admin).await.unwrap();
//!     assert_eq!(result, InsertResult::Inserted);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Insertion order**: listing returns principals in the order they were added
//! - **Wholesale replace**: a replace overwrites the entire permission map
//! - **Admins store no map**: an admin's access is implied by the role

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{InsertResult, PermissionStore, PermissionStoreExt, ReplaceResult};
