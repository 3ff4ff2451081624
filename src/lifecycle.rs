//! Mount liveness.
//!
//! A page holds a [`Mount`] for as long as it is on screen. Anything that
//! awaits the network checks [`Mount::is_live`] before touching page state,
//! so a reply that lands after teardown is dropped instead of applied.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

#[derive(Debug, Clone)]
pub struct Mount {
    alive: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl Mount {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
            notify: Arc::new(Notify::new()),
        }
    }

    pub fn is_live(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    /// Tear the page down. Idempotent.
    pub fn unmount(&self) {
        if self.alive.swap(false, Ordering::Relaxed) {
            self.notify.notify_waiters();
        }
    }

    /// Resolves once the page has been unmounted.
    pub async fn unmounted(&self) {
        loop {
            let notified = self.notify.notified();
            if !self.is_live() {
                return;
            }
            notified.await;
        }
    }
}

impl Default for Mount {
    fn default() -> Self {
        Self::new()
    }
}
