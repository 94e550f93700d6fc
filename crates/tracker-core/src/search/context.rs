//! Cancellation for in-flight searches

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Request-scoped cancellation handle with an optional deadline
///
/// Clones share cancellation state, so a caller can keep one clone and pass
/// another into [`SearchRepository::search_full_text`](super::SearchRepository::search_full_text).
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    inner: Arc<Inner>,
    deadline: Option<Instant>,
}

impl SearchContext {
    /// A context that is never cancelled unless [`cancel`](Self::cancel) is called
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires after `timeout`
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::default().with_deadline(Instant::now() + timeout)
    }

    /// Derive a context sharing this one's cancellation, expiring at `deadline`
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(self.deadline.map_or(deadline, |d| d.min(deadline)));
        self
    }

    /// Cancel this context and every clone of it
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// True once cancelled or past the deadline
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
            || self
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Resolves when the context is cancelled or its deadline passes
    pub async fn done(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            match self.deadline {
                Some(deadline) => tokio::select! {
                    () = notified => {}
                    () = tokio::time::sleep_until(deadline) => return,
                },
                None => notified.await,
            }
        }
    }
}
