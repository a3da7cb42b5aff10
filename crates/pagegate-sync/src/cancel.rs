//! Cooperative cancellation of remote work.
//!
//! A [`CancelHandle`] is shared between a controller and whoever owns the
//! view it serves. After `cancel()`, any remote call routed through the
//! handle resolves to [`SyncError::Cancelled`], including calls already in
//! flight, so a late response can never reach local state.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

use crate::error::{Result, SyncError};

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cloneable cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    state: Arc<CancelState>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel all current and future work routed through this handle.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
        self.state.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Drive `fut` unless cancelled first.
    ///
    /// A future that has not started by the time of cancellation is never
    /// polled.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let notified = self.state.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent cancel is not missed.
        notified.as_mut().enable();

        if self.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = &mut notified => Err(SyncError::Cancelled),
            result = fut => {
                if self.is_cancelled() {
                    Err(SyncError::Cancelled)
                } else {
                    result
                }
            }
        }
    }
}
