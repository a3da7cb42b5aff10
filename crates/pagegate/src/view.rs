//! A page view: one page, one principal snapshot, one comment controller.
//!
//! Each view owns its own state. Opening the same page twice produces two
//! independent views with independent profile fetches and comment loads.

use pagegate_core::{ActionSet, Comment, CommentId, PageId, PermissionAction, Principal};
use pagegate_perms as perms;
use pagegate_sync::{CommentSync, RemoteStore, Result as SyncResult, SyncError};

/// Session state for one open page.
pub struct PageView<R: RemoteStore> {
    principal: Principal,
    sync: CommentSync<R>,
    profile_error: Option<SyncError>,
    load_error: Option<SyncError>,
}

impl<R: RemoteStore> PageView<R> {
    /// Fetch the caller's profile and the page's comments.
    ///
    /// Neither failure is fatal. Without a profile the view runs as an
    /// anonymous standard principal with no grants; without comments it
    /// shows an empty sequence.
    pub async fn open(remote: R, page: PageId) -> Self {
        let mut sync = CommentSync::new(remote, page);

        let cancel = sync.cancel_handle();
        let (principal, profile_error) = match cancel.run(sync.remote().fetch_profile()).await {
            Ok(profile) => (profile.into_principal(), None),
            Err(e) => {
                tracing::warn!(page = %page, error = %e, "profile unavailable, continuing as anonymous");
                (Principal::anonymous(), Some(e))
            }
        };

        let load_error = sync.load(page).await.err();

        Self {
            principal,
            sync,
            profile_error,
            load_error,
        }
    }

    pub fn page(&self) -> PageId {
        self.sync.page()
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn comments(&self) -> &[Comment] {
        self.sync.comments()
    }

    pub fn sync(&self) -> &CommentSync<R> {
        &self.sync
    }

    /// Why the profile fetch failed, if it did.
    pub fn profile_error(&self) -> Option<&SyncError> {
        self.profile_error.as_ref()
    }

    /// Why the most recent comment load failed, if it did.
    pub fn load_error(&self) -> Option<&SyncError> {
        self.load_error.as_ref()
    }

    pub fn can_see(&self, page: PageId) -> bool {
        perms::can_see(&self.principal, page)
    }

    /// Whether the principal may perform `action` on this view's page.
    pub fn can_perform(&self, action: PermissionAction) -> bool {
        perms::can_perform(&self.principal, self.page(), action)
    }

    /// Actions the principal holds on this view's page.
    pub fn permitted_actions(&self) -> ActionSet {
        perms::effective_actions(&self.principal, self.page())
    }

    /// Pages to show in navigation.
    pub fn visible_pages(&self) -> Vec<PageId> {
        perms::visible_pages(&self.principal)
    }

    /// Reload this page's comments, recording any failure.
    pub async fn reload(&mut self) -> SyncResult<&[Comment]> {
        match self.sync.reload().await.map(|_| ()) {
            Ok(()) => {
                self.load_error = None;
                Ok(self.sync.comments())
            }
            Err(e) => {
                self.load_error = Some(e.clone());
                Err(e)
            }
        }
    }

    pub async fn add_comment(&mut self, content: &str) -> SyncResult<&Comment> {
        self.sync.add(&self.principal, content).await
    }

    pub async fn edit_comment(&mut self, id: &CommentId, content: &str) -> SyncResult<&Comment> {
        self.sync.edit(&self.principal, id, content).await
    }

    pub async fn delete_comment(&mut self, id: &CommentId) -> SyncResult<()> {
        self.sync.delete(&self.principal, id).await
    }

    /// Cancel outstanding and future remote work for this view.
    pub fn close(&self) {
        self.sync.cancel_handle().cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.sync.cancel_handle().is_cancelled()
    }
}
