//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::{Arc, Once};

use pagegate::UserDirectory;
use pagegate_core::{ActionSet, PageId, PermissionAction::*, PermissionMap, Principal};
use pagegate_store::MemoryStore;
use pagegate_sync::memory::{MemoryBackend, MemoryRemote};
use pagegate_sync::CommentSync;

/// John Doe from the demo data set.
pub fn john_doe() -> Principal {
    Principal::standard(
        "1",
        "John Doe",
        "john@example.com",
        PermissionMap::new()
            .with(PageId::ProductsList, [View, Edit])
            .with(PageId::MarketingList, [View, Create, Edit])
            .with(PageId::OrderList, [View])
            .with(PageId::Clients, ActionSet::ALL),
    )
}

/// Jane Smith from the demo data set.
pub fn jane_smith() -> Principal {
    Principal::standard(
        "2",
        "Jane Smith",
        "jane@example.com",
        PermissionMap::new()
            .with(PageId::ProductsList, [View, Create])
            .with(PageId::SalesReports, [View])
            .with(PageId::FinanceAndAccounting, [View, Edit]),
    )
}

/// An administrator.
pub fn super_admin() -> Principal {
    Principal::admin("admin", "Super Admin", "admin@example.com")
}

/// The demo principals, in directory order.
pub fn seed_principals() -> Vec<Principal> {
    vec![john_doe(), jane_smith()]
}

/// A directory pre-loaded with the demo principals.
pub fn seeded_directory() -> UserDirectory<MemoryStore> {
    UserDirectory::new(MemoryStore::with_principals(seed_principals()))
}

/// A memory backend with the demo principals and an admin registered.
pub struct TestFixture {
    pub backend: Arc<MemoryBackend>,
}

impl TestFixture {
    pub async fn new() -> Self {
        let backend = MemoryBackend::new();
        for principal in seed_principals() {
            backend.register(principal).await;
        }
        backend.register(super_admin()).await;
        Self { backend }
    }

    /// Register an extra principal.
    pub async fn register(&self, principal: Principal) {
        self.backend.register(principal).await;
    }

    /// A remote authenticated as `principal`.
    pub fn remote(&self, principal: &Principal) -> MemoryRemote {
        self.backend.connect(principal.id.clone())
    }

    /// A comment controller for `page`, authenticated as `principal`.
    pub fn comment_sync(&self, principal: &Principal, page: PageId) -> CommentSync<MemoryRemote> {
        CommentSync::new(self.remote(principal), page)
    }
}

static TRACING: Once = Once::new();

/// Install a test subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
