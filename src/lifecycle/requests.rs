//! In-flight request tracking for graceful shutdown.
//!
//! # Responsibilities
//! - Count requests between routing and handler completion
//! - Refuse new requests once draining has started
//! - Let the shutdown path wait until the count reaches zero

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

/// Shared counter of requests currently inside a handler.
#[derive(Debug, Clone)]
pub struct RequestTracker {
    inner: Arc<TrackerInner>,
}

#[derive(Debug)]
struct TrackerInner {
    active: watch::Sender<usize>,
    draining: AtomicBool,
}

impl RequestTracker {
    pub fn new() -> Self {
        let (active, _) = watch::channel(0);
        Self {
            inner: Arc::new(TrackerInner {
                active,
                draining: AtomicBool::new(false),
            }),
        }
    }

    /// Record a new request. `None` once draining has started.
    pub fn track(&self) -> Option<RequestGuard> {
        if self.is_draining() {
            return None;
        }
        self.inner.active.send_modify(|n| *n += 1);
        let guard = RequestGuard {
            inner: Arc::clone(&self.inner),
        };

        // Draining may have started between the check and the increment.
        if self.is_draining() {
            drop(guard);
            return None;
        }
        Some(guard)
    }

    pub fn active(&self) -> usize {
        *self.inner.active.borrow()
    }

    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::SeqCst)
    }

    /// Stop admitting requests. Idempotent.
    pub fn start_draining(&self) {
        self.inner.draining.store(true, Ordering::SeqCst);
    }

    /// Resolve once no request is in flight.
    pub async fn drained(&self) {
        let mut rx = self.inner.active.subscribe();
        // The sender lives in `inner`, so the channel cannot close here.
        let _ = rx.wait_for(|n| *n == 0).await;
    }
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrements the in-flight count when dropped, including during unwinding.
#[derive(Debug)]
pub struct RequestGuard {
    inner: Arc<TrackerInner>,
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.inner.active.send_modify(|n| *n = n.saturating_sub(1));
    }
}
