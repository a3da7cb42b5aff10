//! # PageGate Testkit
//!
//! Testing utilities for PageGate.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Seed data**: the two demo principals and an administrator
//! - **Fixtures**: a memory backend with those principals registered
//! - **Golden vectors**: the stable wire names of every catalog page
//! - **Generators**: Proptest strategies for principals, maps, and comments
//!
//! ## Test Fixtures
//!
//! ```rust
//! use pagegate_core::PageId;
//! use pagegate_testkit::fixtures::{john_doe, TestFixture};
//!
//! # async fn example() {
//! let fixture = TestFixture::new().await;
//! let mut sync = fixture.comment_sync(&john_doe(), PageId::Clients);
//! sync.add(&john_doe(), "Renewal signed").await.unwrap();
//! # }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use pagegate_testkit::generators::principal;
//!
//! proptest! {
//!     #[test]
//!     fn visible_pages_are_in_catalog_order(p in principal()) {
//!         let pages = pagegate_perms::visible_pages(&p);
//!         prop_assert!(pages.windows(2).all(|w| w[0] < w[1]));
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{init_tracing, seed_principals, seeded_directory, TestFixture};
pub use vectors::{page_vectors, verify_page_vectors, PageVector};
