//! Cancellation and deadline propagation for fetch calls.
//!
//! A [`FetchContext`] is shared by every constituent of a fetch. Fetchers
//! wrap their network work in [`FetchContext::run`] so a cancelled or expired
//! context turns into a `Cancelled` result instead of blocking the caller.

use std::future::{pending, Future};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::errors::FetchError;

/// Deadline and cancellation signal carried through a fetch.
#[derive(Clone, Debug, Default)]
pub struct FetchContext {
    cancel: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Cancels every context derived from the one it was created with.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl FetchContext {
    /// A context that never cancels and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context plus the handle that cancels it.
    pub fn cancellable() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            cancel: Some(rx),
            deadline: None,
        };
        (ctx, CancelHandle { tx })
    }

    /// Derive a context that expires `timeout` from now, or earlier if the
    /// parent deadline is sooner.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        };
        Self {
            cancel: self.cancel.clone(),
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        let cancelled = self.cancel.as_ref().is_some_and(|rx| *rx.borrow());
        let expired = self.deadline.is_some_and(|d| Instant::now() >= d);
        cancelled || expired
    }

    /// Drive `fut` unless the context is cancelled or its deadline passes first.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, FetchError>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            out = fut => Ok(out),
        }
    }

    /// Resolves with the reason once the context is cancelled or expired.
    async fn done(&self) -> FetchError {
        let cancelled = wait_cancelled(self.cancel.clone());
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => FetchError::cancelled("context cancelled"),
            _ = expired => FetchError::cancelled("context deadline exceeded"),
        }
    }
}

async fn wait_cancelled(rx: Option<watch::Receiver<bool>>) {
    let Some(mut rx) = rx else {
        return pending().await;
    };

    loop {
        if *rx.borrow_and_update() {
            return;
        }
        // A dropped handle can never cancel.
        if rx.changed().await.is_err() {
            return pending().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[tokio::test]
    async fn test_background_runs_to_completion() {
        let ctx = FetchContext::background();
        assert!(!ctx.is_cancelled());
        assert_eq!(ctx.run(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_cancelled_before_run() {
        let (ctx, handle) = FetchContext::cancellable();
        handle.cancel();

        assert!(ctx.is_cancelled());
        let err = ctx.run(pending::<()>()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pending_work() {
        let (ctx, handle) = FetchContext::cancellable();
        let task = tokio::spawn(async move { ctx.run(pending::<()>()).await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.cancel();

        let result = task.await.unwrap();
        assert_eq!(result.unwrap_err().message, "context cancelled");
    }

    #[tokio::test]
    async fn test_deadline_expires() {
        let ctx = FetchContext::background().with_timeout(Duration::from_millis(20));
        let err = ctx.run(pending::<()>()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Cancelled);
        assert_eq!(err.message, "context deadline exceeded");
    }

    #[tokio::test]
    async fn test_child_keeps_earlier_deadline() {
        let parent = FetchContext::background().with_timeout(Duration::from_millis(50));
        let child = parent.with_timeout(Duration::from_secs(60));
        assert_eq!(child.deadline(), parent.deadline());
    }

    #[tokio::test]
    async fn test_dropped_handle_never_cancels() {
        let (ctx, handle) = FetchContext::cancellable();
        drop(handle);
        assert_eq!(ctx.run(async { "done" }).await, Ok("done"));
    }
}
