//! Context implementation for request-scoped deadlines and cancellation
//!
//! This module provides the Context type which carries the cancellation
//! signal and optional deadline of a single Terraform operation across async
//! boundaries.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, Instant};

/// Context carries request-scoped cancellation signals and timeouts
/// CRITICAL: Pass this as first parameter to ALL async trait methods
/// This enables proper cancellation and timeout handling
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    deadline: Option<Instant>,
    done: Arc<watch::Sender<bool>>,
}

impl Context {
    pub fn new() -> Self {
        let (done_tx, _) = watch::channel(false);

        Self {
            inner: Arc::new(ContextInner {
                deadline: None,
                done: Arc::new(done_tx),
            }),
        }
    }

    /// Derive a context that expires after `timeout`. The earlier of the two
    /// deadlines wins and cancellation is shared with the parent.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        let deadline = match self.inner.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        };

        Self {
            inner: Arc::new(ContextInner {
                deadline: Some(deadline),
                done: Arc::clone(&self.inner.done),
            }),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.done.borrow() || self.deadline().is_some_and(|d| Instant::now() >= d)
    }

    /// True only after an explicit `cancel`; an expired deadline does not count
    pub fn cancel_requested(&self) -> bool {
        *self.inner.done.borrow()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Time left before the deadline, `None` when there is no deadline
    pub fn remaining(&self) -> Option<Duration> {
        self.inner
            .deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Returns a channel that flips to `true` when work done on behalf of
    /// this context should be cancelled
    pub fn done(&self) -> watch::Receiver<bool> {
        self.inner.done.subscribe()
    }

    /// Resolves once the context is cancelled or its deadline passes
    pub async fn cancelled(&self) {
        let mut done = self.done();
        let signalled = async move {
            while !*done.borrow_and_update() {
                if done.changed().await.is_err() {
                    std::future::pending::<()>().await;
                }
            }
        };

        match self.inner.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = signalled => {}
                    _ = time::sleep_until(deadline) => {}
                }
            }
            None => signalled.await,
        }
    }

    pub fn cancel(&self) {
        self.inner.done.send_replace(true);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn context_timeout_cancels() {
        let ctx = Context::new().with_timeout(Duration::from_millis(100));

        assert!(!ctx.is_cancelled());

        sleep(Duration::from_millis(150)).await;

        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn context_manual_cancel() {
        let ctx = Context::new();

        assert!(!ctx.is_cancelled());

        ctx.cancel();

        assert!(ctx.is_cancelled());
        assert!(ctx.cancel_requested());
    }

    #[tokio::test]
    async fn expired_deadline_is_not_a_cancel_request() {
        let ctx = Context::new().with_timeout(Duration::from_millis(10));
        sleep(Duration::from_millis(30)).await;

        assert!(ctx.is_cancelled());
        assert!(!ctx.cancel_requested());
    }

    #[tokio::test]
    async fn context_deadline() {
        let ctx = Context::new();
        assert!(ctx.deadline().is_none());
        assert!(ctx.remaining().is_none());

        let ctx_with_timeout = ctx.with_timeout(Duration::from_secs(1));
        assert!(ctx_with_timeout.deadline().is_some());
        assert!(ctx_with_timeout.remaining().unwrap() <= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn child_keeps_earlier_deadline() {
        let parent = Context::new().with_timeout(Duration::from_millis(50));
        let parent_deadline = parent.deadline();

        let child = parent.with_timeout(Duration::from_secs(60));
        assert_eq!(child.deadline(), parent_deadline);
    }

    #[tokio::test]
    async fn cancel_is_shared_with_children() {
        let parent = Context::new();
        let child = parent.clone().with_timeout(Duration::from_secs(60));

        parent.cancel();

        assert!(child.is_cancelled());
        tokio::time::timeout(Duration::from_secs(1), child.cancelled())
            .await
            .expect("cancelled() should resolve");
    }

    #[tokio::test]
    async fn cancelled_resolves_at_deadline() {
        let ctx = Context::new().with_timeout(Duration::from_millis(20));

        tokio::time::timeout(Duration::from_secs(1), ctx.cancelled())
            .await
            .expect("deadline should resolve cancelled()");
    }
}
