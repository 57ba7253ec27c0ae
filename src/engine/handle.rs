//! Cancellation token for one in-flight enhancement call.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::Notify;

#[derive(Debug)]
struct Inner {
    id: u64,
    cancelled: AtomicBool,
    notify: Notify,
}

/// Identifies one outstanding request. Clones share the same cancel signal;
/// two handles are equal only if they came from the same `new` call.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    inner: Arc<Inner>,
}

impl RequestHandle {
    pub fn new(id: u64) -> Self {
        Self {
            inner: Arc::new(Inner {
                id,
                cancelled: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once `cancel` has been called.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

impl PartialEq for RequestHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for RequestHandle {}
