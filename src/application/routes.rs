//! Navigation targets and the navigator seam pages use to move between them.

use std::sync::Mutex;

use serde::Serialize;
use tokio::sync::watch;

/// Every page the client can send a seller to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Public landing page; where logout ends up.
    Home,
    Auth,
    /// Post-login landing that immediately resolves the real destination.
    Dashboard,
    Onboarding,
    ApplicationPending,
    ApplicationRejected,
    SellerDashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Auth => "/auth",
            Self::Dashboard => "/dashboard",
            Self::Onboarding => "/onboarding",
            Self::ApplicationPending => "/application/pending",
            Self::ApplicationRejected => "/application/rejected",
            Self::SellerDashboard => "/seller/dashboard",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let route = match trimmed {
            "" => Self::Home,
            "/auth" => Self::Auth,
            "/dashboard" => Self::Dashboard,
            "/onboarding" => Self::Onboarding,
            "/application/pending" => Self::ApplicationPending,
            "/application/rejected" => Self::ApplicationRejected,
            "/seller/dashboard" => Self::SellerDashboard,
            _ => return None,
        };
        Some(route)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Page-level navigation primitive.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that records every navigation and publishes the latest one.
///
/// Used by the terminal front end to wait for a page to move on, and by tests
/// to assert where the flow went.
pub struct RouteHistory {
    routes: Mutex<Vec<Route>>,
    tx: watch::Sender<Option<Route>>,
}

impl RouteHistory {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            routes: Mutex::new(Vec::new()),
            tx,
        }
    }

    /// Most recent navigation, if any.
    pub fn last(&self) -> Option<Route> {
        *self.tx.borrow()
    }

    /// All navigations in order.
    pub fn history(&self) -> Vec<Route> {
        self.routes
            .lock()
            .map(|routes| routes.clone())
            .unwrap_or_default()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Route>> {
        self.tx.subscribe()
    }
}

impl Default for RouteHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for RouteHistory {
    fn navigate(&self, route: Route) {
        tracing::debug!(route = %route, "Navigating");
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route);
        }
        self.tx.send_replace(Some(route));
    }
}
