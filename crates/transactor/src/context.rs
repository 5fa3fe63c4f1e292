//! Cancellation context for node operations
//!
//! A [`Context`] combines a [`CancellationToken`] with an optional deadline.
//! Every network call made by the transactor is raced against it.

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use types::CancelReason;

/// Cancellable context with an optional deadline
#[derive(Debug, Clone)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled unless [`Context::cancel`] is called
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// A context that expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// A context that expires at `deadline`
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Derived context: cancelled with its parent, cancellable on its own
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Derived context whose deadline is the earlier of the parent's and `timeout` from now
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        Self {
            token: self.token.child_token(),
            deadline: Some(self.deadline.map_or(deadline, |d| d.min(deadline))),
        }
    }

    /// Cancel this context and every context derived from it
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why the context is done, or `None` while it is still live
    pub fn err(&self) -> Option<CancelReason> {
        if self.token.is_cancelled() {
            return Some(CancelReason::Cancelled);
        }
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Resolves once the context is cancelled or its deadline passes
    pub async fn done(&self) -> CancelReason {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => CancelReason::Cancelled,
                _ = sleep_until(deadline) => CancelReason::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                CancelReason::Cancelled
            }
        }
    }

    /// Run `fut` unless the context finishes first.
    ///
    /// A context that is already done never polls `fut`. When both are ready
    /// at once the future's output wins.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, CancelReason> {
        if let Some(reason) = self.err() {
            return Err(reason);
        }
        tokio::select! {
            biased;
            output = fut => Ok(output),
            reason = self.done() => Err(reason),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_deadline_expires() {
        let ctx = Context::with_timeout(Duration::from_secs(5));
        assert!(!ctx.is_done());

        let start = Instant::now();
        assert_eq!(ctx.done().await, CancelReason::DeadlineExceeded);
        assert!(start.elapsed() >= Duration::from_secs(5));
        assert_eq!(ctx.err(), Some(CancelReason::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_cancel_propagates_to_children() {
        let parent = Context::background();
        let child = parent.child();

        parent.cancel();
        assert_eq!(child.err(), Some(CancelReason::Cancelled));
        assert_eq!(child.done().await, CancelReason::Cancelled);
    }

    #[tokio::test]
    async fn test_child_cancel_leaves_parent_alive() {
        let parent = Context::background();
        let child = parent.child();

        child.cancel();
        assert!(child.is_done());
        assert!(!parent.is_done());
    }

    #[tokio::test(start_paused = true)]
    async fn test_child_with_timeout_keeps_earlier_deadline() {
        let parent = Context::with_timeout(Duration::from_secs(2));
        let child = parent.child_with_timeout(Duration::from_secs(10));
        assert_eq!(child.deadline(), parent.deadline());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_races_future() {
        let ctx = Context::with_timeout(Duration::from_secs(1));

        let fast = ctx.run(async { 7 }).await;
        assert_eq!(fast, Ok(7));

        let slow = ctx
            .run(tokio::time::sleep(Duration::from_secs(60)))
            .await;
        assert_eq!(slow, Err(CancelReason::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_run_skips_work_on_done_context() {
        let ctx = Context::background();
        ctx.cancel();

        let polled = std::sync::atomic::AtomicBool::new(false);
        let result = ctx
            .run(async { polled.store(true, std::sync::atomic::Ordering::SeqCst) })
            .await;

        assert_eq!(result, Err(CancelReason::Cancelled));
        assert!(!polled.load(std::sync::atomic::Ordering::SeqCst));
    }
}
