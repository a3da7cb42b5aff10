//! Per-page comment controller.
//!
//! [`CommentSync`] owns the local comment sequence for one page and keeps it
//! in step with the remote store:
//!
//! - Local state changes only after a successful round trip. There is no
//!   optimistic mutation and no retry queue.
//! - Writes are gated locally by the comment policy before any request is
//!   made. A denied write never reaches the remote.
//! - A failed load empties the sequence. A failed write leaves it untouched.

use pagegate_core::{Comment, CommentId, PageId, PermissionAction, Principal};
use pagegate_perms::{may_create_comment, may_delete_comment, may_edit_comment};

use crate::cancel::CancelHandle;
use crate::digest::SequenceDigest;
use crate::error::{Result, SyncError};
use crate::remote::RemoteStore;

/// Comment controller for one page at a time.
pub struct CommentSync<R: RemoteStore> {
    remote: R,
    page: PageId,
    /// Newest first, as returned by the remote.
    comments: Vec<Comment>,
    cancel: CancelHandle,
}

impl<R: RemoteStore> CommentSync<R> {
    /// Create a controller for `page`. Nothing is loaded until [`load`](Self::load).
    pub fn new(remote: R, page: PageId) -> Self {
        Self::with_cancel_handle(remote, page, CancelHandle::new())
    }

    /// Create a controller that observes an existing cancel handle.
    pub fn with_cancel_handle(remote: R, page: PageId, cancel: CancelHandle) -> Self {
        Self {
            remote,
            page,
            comments: Vec::new(),
            cancel,
        }
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn get(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| &c.id == id)
    }

    pub fn digest(&self) -> SequenceDigest {
        SequenceDigest::of(&self.comments)
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Retarget to `page` and replace the local sequence with the remote's.
    ///
    /// On failure the sequence is emptied and the error returned. A
    /// cancelled load leaves local state, including the page, alone.
    pub async fn load(&mut self, page: PageId) -> Result<&[Comment]> {
        match self.cancel.run(self.remote.list_comments(page)).await {
            Ok(comments) => {
                tracing::debug!(page = %page, count = comments.len(), "loaded comments");
                self.page = page;
                self.comments = comments;
                Ok(self.comments.as_slice())
            }
            Err(SyncError::Cancelled) => Err(SyncError::Cancelled),
            Err(e) => {
                tracing::warn!(page = %page, error = %e, "failed to load comments");
                self.page = page;
                self.comments.clear();
                Err(e)
            }
        }
    }

    /// Like [`load`](Self::load), but a failure yields an empty sequence
    /// instead of an error.
    pub async fn load_or_empty(&mut self, page: PageId) -> &[Comment] {
        if self.load(page).await.is_err() {
            self.comments.clear();
        }
        &self.comments
    }

    /// Reload the current page.
    pub async fn reload(&mut self) -> Result<&[Comment]> {
        self.load(self.page).await
    }

    /// Post a new comment and insert the stored result at the head.
    pub async fn add(&mut self, principal: &Principal, content: &str) -> Result<&Comment> {
        let page = self.page;
        if !may_create_comment(principal, page) {
            return Err(SyncError::Denied {
                action: PermissionAction::Create,
                page,
            });
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(SyncError::EmptyContent);
        }

        let created = self
            .cancel
            .run(self.remote.create_comment(page, content))
            .await
            .map_err(|e| {
                tracing::warn!(page = %page, error = %e, "failed to add comment");
                e
            })?;

        tracing::debug!(page = %page, comment_id = %created.id, "added comment");
        self.comments.insert(0, created);
        Ok(&self.comments[0])
    }

    /// Replace the content of comment `id`, keeping its position.
    pub async fn edit(
        &mut self,
        principal: &Principal,
        id: &CommentId,
        content: &str,
    ) -> Result<&Comment> {
        let page = self.page;
        let position = self.position(id)?;
        if !may_edit_comment(principal, page, &self.comments[position]) {
            return Err(SyncError::Denied {
                action: PermissionAction::Edit,
                page,
            });
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(SyncError::EmptyContent);
        }

        let updated = self
            .cancel
            .run(self.remote.update_comment(id, content))
            .await
            .map_err(|e| {
                tracing::warn!(page = %page, comment_id = %id, error = %e, "failed to edit comment");
                e
            })?;

        tracing::debug!(page = %page, comment_id = %id, "edited comment");
        self.comments[position] = updated;
        Ok(&self.comments[position])
    }

    /// Delete comment `id`.
    pub async fn delete(&mut self, principal: &Principal, id: &CommentId) -> Result<()> {
        let page = self.page;
        let position = self.position(id)?;
        if !may_delete_comment(principal, page, &self.comments[position]) {
            return Err(SyncError::Denied {
                action: PermissionAction::Delete,
                page,
            });
        }

        self.cancel
            .run(self.remote.delete_comment(id))
            .await
            .map_err(|e| {
                tracing::warn!(page = %page, comment_id = %id, error = %e, "failed to delete comment");
                e
            })?;

        tracing::debug!(page = %page, comment_id = %id, "deleted comment");
        self.comments.remove(position);
        Ok(())
    }

    fn position(&self, id: &CommentId) -> Result<usize> {
        self.comments
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| SyncError::CommentNotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use pagegate_core::{PermissionAction::*, PermissionMap, PrincipalId};

    use crate::remote::memory::{Failure, MemoryBackend, MemoryRemote, RemoteRequest};

    fn alice() -> Principal {
        Principal::standard(
            "alice",
            "alice",
            "",
            PermissionMap::new().with(PageId::Clients, [View, Create]),
        )
    }

    fn bob() -> Principal {
        Principal::standard(
            "bob",
            "bob",
            "",
            PermissionMap::new().with(PageId::Clients, [View]),
        )
    }

    async fn setup(principal: Principal) -> (Arc<MemoryBackend>, CommentSync<MemoryRemote>) {
        let backend = MemoryBackend::new();
        backend.register(alice()).await;
        backend.register(bob()).await;
        let remote = backend.connect(principal.id.clone());
        (backend, CommentSync::new(remote, PageId::Clients))
    }

    #[tokio::test]
    async fn test_load_replaces_sequence() {
        let (backend, mut sync) = setup(alice()).await;
        backend.seed_comment(PageId::Clients, "one", "alice").await;
        backend.seed_comment(PageId::Clients, "two", "bob").await;

        let loaded = sync.load(PageId::Clients).await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].content, "two");

        let before = sync.digest();
        sync.reload().await.unwrap();
        assert_eq!(sync.digest(), before);
    }

    #[tokio::test]
    async fn test_load_failure_empties() {
        let (backend, mut sync) = setup(alice()).await;
        backend.seed_comment(PageId::Clients, "one", "alice").await;
        sync.load(PageId::Clients).await.unwrap();

        backend.fail_next(Failure::status(500)).await;
        let err = sync.load(PageId::Clients).await.unwrap_err();
        assert!(matches!(err, SyncError::Status { status: 500, .. }));
        assert!(sync.is_empty());

        backend.fail_next(Failure::Transport("down".into())).await;
        assert!(sync.load_or_empty(PageId::Clients).await.is_empty());
    }

    #[tokio::test]
    async fn test_load_retargets_page() {
        let (backend, mut sync) = setup(alice()).await;
        backend.seed_comment(PageId::Suppliers, "s", "bob").await;

        sync.load(PageId::Suppliers).await.unwrap();
        assert_eq!(sync.page(), PageId::Suppliers);
        assert_eq!(sync.len(), 1);
    }

    #[tokio::test]
    async fn test_add_inserts_server_object_at_head() {
        let (backend, mut sync) = setup(alice()).await;
        backend.seed_comment(PageId::Clients, "older", "bob").await;
        sync.load(PageId::Clients).await.unwrap();

        let added = sync.add(&alice(), "  hello ").await.unwrap().clone();
        assert_eq!(added.content, "hello");
        assert_eq!(added.author, PrincipalId::from("alice"));
        assert_eq!(sync.comments()[0], added);
        assert_eq!(sync.len(), 2);
        assert_eq!(backend.comments(PageId::Clients).await[0], added);
    }

    #[tokio::test]
    async fn test_add_denied_without_create_makes_no_request() {
        let (backend, mut sync) = setup(bob()).await;
        sync.load(PageId::Clients).await.unwrap();
        backend.clear_requests().await;

        let err = sync.add(&bob(), "hello").await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::Denied {
                action: PermissionAction::Create,
                ..
            }
        ));
        assert!(err.is_local());
        assert_eq!(backend.request_count().await, 0);
        assert!(sync.is_empty());
    }

    #[tokio::test]
    async fn test_add_empty_content_rejected_locally() {
        let (backend, mut sync) = setup(alice()).await;
        let err = sync.add(&alice(), "   ").await.unwrap_err();
        assert!(matches!(err, SyncError::EmptyContent));
        assert_eq!(backend.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_add_failure_leaves_sequence() {
        let (backend, mut sync) = setup(alice()).await;
        backend.seed_comment(PageId::Clients, "one", "bob").await;
        sync.load(PageId::Clients).await.unwrap();
        let before = sync.digest();

        backend.fail_next(Failure::status(503)).await;
        assert!(sync.add(&alice(), "hello").await.is_err());
        assert_eq!(sync.digest(), before);
    }

    #[tokio::test]
    async fn test_author_edits_in_place() {
        let (backend, mut sync) = setup(alice()).await;
        backend.seed_comment(PageId::Clients, "first", "bob").await;
        sync.load(PageId::Clients).await.unwrap();
        let id = sync.add(&alice(), "hello").await.unwrap().id.clone();

        let edited = sync.edit(&alice(), &id, "goodbye").await.unwrap().clone();
        assert_eq!(edited.content, "goodbye");
        assert!(edited.is_edited());
        assert_eq!(sync.len(), 2);
        assert_eq!(sync.comments()[0].id, id);
        assert_eq!(sync.comments()[1].content, "first");
    }

    #[tokio::test]
    async fn test_edit_unknown_comment() {
        let (backend, mut sync) = setup(alice()).await;
        let err = sync
            .edit(&alice(), &CommentId::from("c99"), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::CommentNotFound(_)));
        assert_eq!(backend.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_non_author_delete_denied() {
        let (backend, mut sync) = setup(bob()).await;
        let comment = backend.seed_comment(PageId::Clients, "mine", "alice").await;
        sync.load(PageId::Clients).await.unwrap();
        backend.clear_requests().await;

        let err = sync.delete(&bob(), &comment.id).await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::Denied {
                action: PermissionAction::Delete,
                ..
            }
        ));
        assert!(sync.get(&comment.id).is_some());
        assert_eq!(backend.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_author_delete() {
        let (backend, mut sync) = setup(bob()).await;
        let comment = backend.seed_comment(PageId::Clients, "mine", "bob").await;
        sync.load(PageId::Clients).await.unwrap();

        sync.delete(&bob(), &comment.id).await.unwrap();
        assert!(sync.is_empty());
        assert!(backend.comments(PageId::Clients).await.is_empty());
        assert_eq!(
            backend.requests().await.last(),
            Some(&RemoteRequest::DeleteComment { id: comment.id })
        );
    }

    #[tokio::test]
    async fn test_cancel_in_flight_load_keeps_state() {
        let (backend, mut sync) = setup(alice()).await;
        backend.seed_comment(PageId::Clients, "one", "alice").await;
        sync.load(PageId::Clients).await.unwrap();

        backend.set_latency(Some(Duration::from_secs(30))).await;
        let handle = sync.cancel_handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
        });

        let err = sync.load(PageId::Clients).await.unwrap_err();
        assert!(matches!(err, SyncError::Cancelled));
        assert_eq!(sync.len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_load_keeps_page() {
        let (backend, mut sync) = setup(alice()).await;
        backend.seed_comment(PageId::Clients, "one", "alice").await;
        backend.seed_comment(PageId::Suppliers, "s", "bob").await;
        sync.load(PageId::Clients).await.unwrap();

        sync.cancel_handle().cancel();
        let err = sync.load(PageId::Suppliers).await.unwrap_err();
        assert!(matches!(err, SyncError::Cancelled));
        assert_eq!(sync.page(), PageId::Clients);
        assert_eq!(sync.comments()[0].content, "one");
    }

    #[tokio::test]
    async fn test_failed_load_retargets_page() {
        let (backend, mut sync) = setup(alice()).await;
        backend.seed_comment(PageId::Clients, "one", "alice").await;
        sync.load(PageId::Clients).await.unwrap();

        backend.fail_next(Failure::status(503)).await;
        assert!(sync.load(PageId::Suppliers).await.is_err());
        assert_eq!(sync.page(), PageId::Suppliers);
        assert!(sync.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_controller_issues_no_requests() {
        let (backend, mut sync) = setup(alice()).await;
        sync.cancel_handle().cancel();

        let err = sync.add(&alice(), "late").await.unwrap_err();
        assert!(matches!(err, SyncError::Cancelled));
        assert_eq!(backend.request_count().await, 0);
        assert!(backend.comments(PageId::Clients).await.is_empty());
    }
}
