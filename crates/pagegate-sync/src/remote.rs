//! The remote store abstraction.
//!
//! The remote store is the authority for comments and profiles. Clients talk
//! to it through [`RemoteStore`]; [`crate::http::HttpRemote`] speaks the
//! JSON API and [`memory::MemoryRemote`] is an in-process stand-in.

use std::sync::Arc;

use async_trait::async_trait;

use pagegate_core::{Comment, CommentId, PageId};

use crate::error::Result;
use crate::messages::Profile;

/// Async interface to the remote comment and profile service.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// All comments on `page`, newest first.
    async fn list_comments(&self, page: PageId) -> Result<Vec<Comment>>;

    /// Create a comment on `page` and return it as stored.
    async fn create_comment(&self, page: PageId, content: &str) -> Result<Comment>;

    /// Replace the content of comment `id` and return it as stored.
    async fn update_comment(&self, id: &CommentId, content: &str) -> Result<Comment>;

    /// Delete comment `id`.
    async fn delete_comment(&self, id: &CommentId) -> Result<()>;

    /// Profile of the authenticated caller.
    async fn fetch_profile(&self) -> Result<Profile>;
}

#[async_trait]
impl<R: RemoteStore + ?Sized> RemoteStore for Arc<R> {
    async fn list_comments(&self, page: PageId) -> Result<Vec<Comment>> {
        (**self).list_comments(page).await
    }

    async fn create_comment(&self, page: PageId, content: &str) -> Result<Comment> {
        (**self).create_comment(page, content).await
    }

    async fn update_comment(&self, id: &CommentId, content: &str) -> Result<Comment> {
        (**self).update_comment(id, content).await
    }

    async fn delete_comment(&self, id: &CommentId) -> Result<()> {
        (**self).delete_comment(id).await
    }

    async fn fetch_profile(&self) -> Result<Profile> {
        (**self).fetch_profile().await
    }
}

/// An in-process remote store for tests and offline use.
///
/// A [`MemoryBackend`] holds the server state. Each [`MemoryRemote`] is a
/// client connection authenticated as one principal. The backend applies
/// the same comment policy as the client for registered principals, so a
/// client that skips its own checks is still refused.
pub mod memory {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::time::Duration;

    use chrono::Utc;
    use tokio::sync::{Mutex, MutexGuard};

    use pagegate_core::{Principal, PrincipalId};
    use pagegate_perms::{may_create_comment, may_delete_comment, may_edit_comment};

    use crate::error::SyncError;

    /// A request as seen by the backend.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RemoteRequest {
        ListComments { page: PageId },
        CreateComment { page: PageId, content: String },
        UpdateComment { id: CommentId, content: String },
        DeleteComment { id: CommentId },
        FetchProfile,
    }

    /// A failure to inject into the next request.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Failure {
        Status { status: u16, body: String },
        Transport(String),
    }

    impl Failure {
        pub fn status(status: u16) -> Self {
            Failure::Status {
                status,
                body: String::new(),
            }
        }

        fn into_error(self) -> SyncError {
            match self {
                Failure::Status { status, body } => SyncError::Status { status, body },
                Failure::Transport(message) => SyncError::Transport(message),
            }
        }
    }

    fn refuse(status: u16, body: &str) -> SyncError {
        SyncError::Status {
            status,
            body: body.to_string(),
        }
    }

    #[derive(Default)]
    struct BackendState {
        principals: HashMap<PrincipalId, Principal>,
        /// Comments per page, newest first.
        comments: HashMap<PageId, Vec<Comment>>,
        locations: HashMap<CommentId, PageId>,
        next_id: u64,
        requests: Vec<RemoteRequest>,
        failures: VecDeque<Failure>,
        latency: Option<Duration>,
    }

    impl BackendState {
        fn caller(&self, principal: Option<&PrincipalId>) -> Result<Principal> {
            principal
                .and_then(|id| self.principals.get(id))
                .cloned()
                .ok_or_else(|| refuse(401, "authentication required"))
        }

        fn locate(&mut self, id: &CommentId) -> Result<(PageId, usize)> {
            let page = *self
                .locations
                .get(id)
                .ok_or_else(|| refuse(404, "comment not found"))?;
            let position = self
                .comments
                .get(&page)
                .and_then(|list| list.iter().position(|c| &c.id == id))
                .ok_or_else(|| refuse(404, "comment not found"))?;
            Ok((page, position))
        }

        fn insert(&mut self, page: PageId, content: &str, author: PrincipalId) -> Comment {
            self.next_id += 1;
            let comment = Comment::new(
                CommentId::new(format!("c{}", self.next_id)),
                content,
                author,
                Utc::now(),
            );
            self.locations.insert(comment.id.clone(), page);
            self.comments
                .entry(page)
                .or_default()
                .insert(0, comment.clone());
            comment
        }
    }

    /// Shared server state behind one or more [`MemoryRemote`]s.
    #[derive(Default)]
    pub struct MemoryBackend {
        state: Mutex<BackendState>,
    }

    impl MemoryBackend {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        /// Make `principal` known to the backend. Replaces any earlier entry.
        pub async fn register(&self, principal: Principal) {
            let mut state = self.state.lock().await;
            state.principals.insert(principal.id.clone(), principal);
        }

        /// Open a connection authenticated as `principal`.
        pub fn connect(self: &Arc<Self>, principal: impl Into<PrincipalId>) -> MemoryRemote {
            MemoryRemote {
                backend: Arc::clone(self),
                principal: Some(principal.into()),
            }
        }

        /// Open a connection with no credential.
        pub fn connect_anonymous(self: &Arc<Self>) -> MemoryRemote {
            MemoryRemote {
                backend: Arc::clone(self),
                principal: None,
            }
        }

        /// Store a comment directly, bypassing policy and the request log.
        pub async fn seed_comment(
            &self,
            page: PageId,
            content: &str,
            author: impl Into<PrincipalId>,
        ) -> Comment {
            let mut state = self.state.lock().await;
            state.insert(page, content, author.into())
        }

        /// Comments currently stored for `page`, newest first.
        pub async fn comments(&self, page: PageId) -> Vec<Comment> {
            let state = self.state.lock().await;
            state.comments.get(&page).cloned().unwrap_or_default()
        }

        /// Every request received so far, oldest first.
        pub async fn requests(&self) -> Vec<RemoteRequest> {
            self.state.lock().await.requests.clone()
        }

        pub async fn request_count(&self) -> usize {
            self.state.lock().await.requests.len()
        }

        pub async fn clear_requests(&self) {
            self.state.lock().await.requests.clear();
        }

        /// Fail the next request with `failure`. Failures queue in order.
        pub async fn fail_next(&self, failure: Failure) {
            self.state.lock().await.failures.push_back(failure);
        }

        /// Delay every response by `latency`.
        pub async fn set_latency(&self, latency: Option<Duration>) {
            self.state.lock().await.latency = latency;
        }

        /// Log `request`, apply injected failure and latency, then lock state.
        async fn begin(&self, request: RemoteRequest) -> Result<MutexGuard<'_, BackendState>> {
            let latency = {
                let mut state = self.state.lock().await;
                state.requests.push(request);
                if let Some(failure) = state.failures.pop_front() {
                    return Err(failure.into_error());
                }
                state.latency
            };

            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            Ok(self.state.lock().await)
        }
    }

    /// A client connection to a [`MemoryBackend`].
    #[derive(Clone)]
    pub struct MemoryRemote {
        backend: Arc<MemoryBackend>,
        principal: Option<PrincipalId>,
    }

    impl MemoryRemote {
        pub fn backend(&self) -> &Arc<MemoryBackend> {
            &self.backend
        }
    }

    #[async_trait]
    impl RemoteStore for MemoryRemote {
        async fn list_comments(&self, page: PageId) -> Result<Vec<Comment>> {
            let state = self
                .backend
                .begin(RemoteRequest::ListComments { page })
                .await?;
            Ok(state.comments.get(&page).cloned().unwrap_or_default())
        }

        async fn create_comment(&self, page: PageId, content: &str) -> Result<Comment> {
            let mut state = self
                .backend
                .begin(RemoteRequest::CreateComment {
                    page,
                    content: content.to_string(),
                })
                .await?;

            let caller = state.caller(self.principal.as_ref())?;
            if !may_create_comment(&caller, page) {
                return Err(refuse(403, "forbidden"));
            }
            if content.trim().is_empty() {
                return Err(refuse(400, "content is required"));
            }
            Ok(state.insert(page, content, caller.id))
        }

        async fn update_comment(&self, id: &CommentId, content: &str) -> Result<Comment> {
            let mut state = self
                .backend
                .begin(RemoteRequest::UpdateComment {
                    id: id.clone(),
                    content: content.to_string(),
                })
                .await?;

            let caller = state.caller(self.principal.as_ref())?;
            let (page, position) = state.locate(id)?;
            let list = state.comments.entry(page).or_default();
            let comment = &mut list[position];
            if !may_edit_comment(&caller, page, comment) {
                return Err(refuse(403, "forbidden"));
            }
            if content.trim().is_empty() {
                return Err(refuse(400, "content is required"));
            }
            comment.apply_edit(content, caller.id, Utc::now());
            Ok(comment.clone())
        }

        async fn delete_comment(&self, id: &CommentId) -> Result<()> {
            let mut state = self
                .backend
                .begin(RemoteRequest::DeleteComment { id: id.clone() })
                .await?;

            let caller = state.caller(self.principal.as_ref())?;
            let (page, position) = state.locate(id)?;
            let list = state.comments.entry(page).or_default();
            if !may_delete_comment(&caller, page, &list[position]) {
                return Err(refuse(403, "forbidden"));
            }
            list.remove(position);
            state.locations.remove(id);
            Ok(())
        }

        async fn fetch_profile(&self) -> Result<Profile> {
            let state = self.backend.begin(RemoteRequest::FetchProfile).await?;
            let caller = state.caller(self.principal.as_ref())?;
            Ok(Profile::for_principal(&caller))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use pagegate_core::{PermissionAction::*, PermissionMap};

        async fn backend() -> Arc<MemoryBackend> {
            let backend = MemoryBackend::new();
            backend
                .register(Principal::standard(
                    "alice",
                    "alice",
                    "",
                    PermissionMap::new().with(PageId::Clients, [View, Create]),
                ))
                .await;
            backend
                .register(Principal::standard(
                    "bob",
                    "bob",
                    "",
                    PermissionMap::new().with(PageId::Clients, [View]),
                ))
                .await;
            backend
        }

        #[tokio::test]
        async fn test_create_assigns_ids_newest_first() {
            let backend = backend().await;
            let alice = backend.connect("alice");

            let first = alice.create_comment(PageId::Clients, "one").await.unwrap();
            let second = alice.create_comment(PageId::Clients, "two").await.unwrap();
            assert_eq!(first.id.as_str(), "c1");
            assert_eq!(second.id.as_str(), "c2");
            assert_eq!(first.author, PrincipalId::from("alice"));

            let listed = alice.list_comments(PageId::Clients).await.unwrap();
            assert_eq!(listed, vec![second, first]);
            assert!(alice.list_comments(PageId::Suppliers).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_backend_enforces_policy() {
            let backend = backend().await;
            let bob = backend.connect("bob");
            let comment = backend.seed_comment(PageId::Clients, "hi", "alice").await;

            let err = bob.create_comment(PageId::Clients, "nope").await.unwrap_err();
            assert!(matches!(err, SyncError::Status { status: 403, .. }));
            let err = bob.delete_comment(&comment.id).await.unwrap_err();
            assert!(matches!(err, SyncError::Status { status: 403, .. }));
            assert_eq!(backend.comments(PageId::Clients).await.len(), 1);
        }

        #[tokio::test]
        async fn test_author_edit_and_delete() {
            let backend = backend().await;
            let alice = backend.connect("alice");
            let comment = alice.create_comment(PageId::Clients, "hello").await.unwrap();

            let edited = alice.update_comment(&comment.id, "goodbye").await.unwrap();
            assert_eq!(edited.content, "goodbye");
            assert_eq!(edited.modified_by, Some(PrincipalId::from("alice")));

            alice.delete_comment(&comment.id).await.unwrap();
            let err = alice.delete_comment(&comment.id).await.unwrap_err();
            assert!(matches!(err, SyncError::Status { status: 404, .. }));
        }

        #[tokio::test]
        async fn test_unknown_caller_unauthorized() {
            let backend = backend().await;
            let anon = backend.connect_anonymous();

            let err = anon.fetch_profile().await.unwrap_err();
            assert!(matches!(err, SyncError::Status { status: 401, .. }));
            assert!(anon.list_comments(PageId::Clients).await.is_ok());
        }

        #[tokio::test]
        async fn test_injected_failure_and_request_log() {
            let backend = backend().await;
            let alice = backend.connect("alice");
            backend.fail_next(Failure::Transport("connection reset".into())).await;

            let err = alice.list_comments(PageId::Clients).await.unwrap_err();
            assert!(matches!(err, SyncError::Transport(_)));
            alice.list_comments(PageId::Clients).await.unwrap();

            assert_eq!(
                backend.requests().await,
                vec![
                    RemoteRequest::ListComments { page: PageId::Clients },
                    RemoteRequest::ListComments { page: PageId::Clients },
                ]
            );
        }

        #[tokio::test]
        async fn test_profile_reflects_registration() {
            let backend = backend().await;
            let profile = backend.connect("alice").fetch_profile().await.unwrap();
            assert_eq!(profile.username, "alice");
            assert_eq!(profile.permissions["clients"], vec!["View", "Create"]);
        }
    }
}
