//! # PageGate Sync
//!
//! Keeps a page's comments in step with the remote store, and fetches the
//! caller's profile.
//!
//! ## Overview
//!
//! A [`CommentSync`] controller owns the local comment sequence for one page.
//! It talks to the remote through the [`RemoteStore`] trait, which has two
//! implementations:
//!
//! - [`HttpRemote`] - the JSON API over `reqwest`
//! - [`memory::MemoryRemote`] - an in-process backend for tests and offline use
//!
//! ## Key Concepts
//!
//! - **Confirmed writes only**: local state changes after the remote
//!   confirms, never before
//! - **Local gating**: writes the comment policy forbids are refused with
//!   [`SyncError::Denied`] and never sent
//! - **Cancellation**: a [`CancelHandle`] turns in-flight and later remote
//!   calls into [`SyncError::Cancelled`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pagegate_core::PageId;
//! use pagegate_sync::{CommentSync, HttpRemote, RemoteStore, StaticCredential, SyncConfig};
//!
//! async fn example() {
//!     let remote = HttpRemote::new(
//!         "https://example.com",
//!         &SyncConfig::default(),
//!         StaticCredential::new("token"),
//!     )
//!     .unwrap();
//!
//!     let me = remote.fetch_profile().await.unwrap().into_principal();
//!     let mut sync = CommentSync::new(remote, PageId::ProductsList);
//!     sync.load(PageId::ProductsList).await.unwrap();
//!     sync.add(&me, "Restock due Friday").await.unwrap();
//! }
//! ```

pub mod cancel;
pub mod comments;
pub mod config;
pub mod credential;
pub mod digest;
pub mod error;
pub mod http;
pub mod messages;
pub mod remote;

pub use cancel::CancelHandle;
pub use comments::CommentSync;
pub use config::SyncConfig;
pub use credential::{
    authorization_value, CredentialProvider, MissingCredential, NoCredential, StaticCredential,
};
pub use digest::SequenceDigest;
pub use error::{Result, SyncError};
pub use http::HttpRemote;
pub use messages::{CommentEdit, NewComment, Profile};
pub use remote::{memory, RemoteStore};
