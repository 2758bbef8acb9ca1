use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    pending: AtomicUsize,
    notify: Notify,
}

/// Counts outstanding scrape units and wakes a waiter when all are done
#[derive(Debug, Clone, Default)]
pub struct WaitGroup {
    inner: Arc<Inner>,
}

impl WaitGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one more unit; the returned guard signals its completion
    pub fn add(&self) -> CompletionGuard {
        self.inner.pending.fetch_add(1, Ordering::SeqCst);
        CompletionGuard {
            inner: Some(self.inner.clone()),
        }
    }

    /// Units that have not signalled completion yet
    pub fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::SeqCst)
    }

    /// Waits until every guard handed out by `add` has been released
    pub async fn wait(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Completion signal of one scrape unit
///
/// Signals exactly once: either through [`CompletionGuard::done`] or, on any
/// other exit path (early return, `?`, panic, task abort), when dropped.
#[derive(Debug)]
pub struct CompletionGuard {
    inner: Option<Arc<Inner>>,
}

impl CompletionGuard {
    /// Signals completion now
    pub fn done(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(inner) = self.inner.take() {
            if inner.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
                inner.notify.notify_waiters();
            }
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.release();
    }
}
