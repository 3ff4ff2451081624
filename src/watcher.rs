//! Status watcher: the background poller behind every status page.
//!
//! One watcher per page. It re-fetches the status on a fixed interval, runs
//! it through the resolver and navigates away as soon as the page is no
//! longer the right place. Ticks are awaited in sequence, so at most one
//! fetch is in flight, and a failed fetch just waits for the next tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::api::SellerClient;
use crate::application::resolver::resolve_destination;
use crate::application::routes::{Navigator, Route};
use crate::lifecycle::Mount;

/// Outcome of a single status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The page is still correct.
    Stay,
    /// Moved to another page.
    Navigated(Route),
    /// The page was torn down while the fetch was in flight.
    Discarded,
    /// Status could not be fetched; nothing changed.
    Unavailable,
}

#[derive(Clone)]
pub struct StatusWatcher {
    client: SellerClient,
    navigator: Arc<dyn Navigator>,
    page: Route,
    interval: Duration,
}

impl StatusWatcher {
    /// Watch on behalf of the page rendered at `page`.
    pub fn new(
        client: SellerClient,
        navigator: Arc<dyn Navigator>,
        page: Route,
        interval: Duration,
    ) -> Self {
        Self {
            client,
            navigator,
            page,
            interval,
        }
    }

    pub fn page(&self) -> Route {
        self.page
    }

    /// Fetch a fresh snapshot and navigate if it belongs elsewhere.
    pub async fn check_once(&self, mount: &Mount) -> WatchOutcome {
        let fetched = self.client.application_status().await;
        if !mount.is_live() {
            debug!(page = %self.page, "Dropping status reply after unmount");
            return WatchOutcome::Discarded;
        }

        let snapshot = match fetched {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(page = %self.page, "Error checking application status: {e}");
                return WatchOutcome::Unavailable;
            }
        };

        let destination = resolve_destination(&snapshot);
        if destination.is_served_by(self.page) {
            debug!(page = %self.page, status = %snapshot.status, "Still on the right page");
            return WatchOutcome::Stay;
        }

        let route = destination.route();
        info!(from = %self.page, to = %route, status = %snapshot.status, "Status changed, leaving page");
        self.navigator.navigate(route);
        WatchOutcome::Navigated(route)
    }

    /// Check immediately, then every interval until the page is unmounted
    /// or the watcher navigates away.
    pub fn spawn(self, mount: Mount) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "Status watcher started for {} (every {}s)",
                self.page,
                self.interval.as_secs()
            );

            let mut tick = tokio::time::interval(self.interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = mount.unmounted() => break,
                    _ = tick.tick() => {}
                }

                match self.check_once(&mount).await {
                    WatchOutcome::Navigated(_) | WatchOutcome::Discarded => break,
                    WatchOutcome::Stay | WatchOutcome::Unavailable => {}
                }
            }

            debug!(page = %self.page, "Status watcher stopped");
        })
    }
}
