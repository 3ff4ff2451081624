//! Page entry points outside the onboarding flow: the dashboard landing
//! and the status pages (pending, rejected, approved dashboard).

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::application::resolver::resolve_or_onboard;
use crate::application::routes::Route;
use crate::context::PageDeps;
use crate::lifecycle::Mount;
use crate::session::SellerUser;
use crate::watcher::StatusWatcher;

/// Signed-in user, or a redirect to `/auth`.
pub async fn guard(deps: &PageDeps) -> Option<SellerUser> {
    if !deps.session.is_authenticated().await {
        deps.navigator.navigate(Route::Auth);
        return None;
    }
    let user = deps.session.user().await;
    if user.is_none() {
        deps.navigator.navigate(Route::Auth);
    }
    user
}

/// `/dashboard`: send the seller wherever their application status says.
///
/// A failed status fetch lands on onboarding.
pub async fn land(deps: &PageDeps) -> Route {
    if guard(deps).await.is_none() {
        return Route::Auth;
    }

    let snapshot = match deps.client.application_status().await {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!("Error checking application status: {e}");
            None
        }
    };
    let destination = resolve_or_onboard(snapshot.as_ref());
    debug!(destination = %destination, "Dashboard landing");

    let route = destination.route();
    deps.navigator.navigate(route);
    route
}

/// A status page with its watcher running. Dropping it unmounts the page.
pub struct StatusPage {
    deps: PageDeps,
    page: Route,
    user: SellerUser,
    mount: Mount,
    watcher: Option<JoinHandle<()>>,
}

impl StatusPage {
    /// Open the page at `page`. Signed-out visitors are sent to `/auth`.
    pub async fn open(deps: PageDeps, page: Route) -> Result<Self, Route> {
        let Some(user) = guard(&deps).await else {
            return Err(Route::Auth);
        };

        let mount = Mount::new();
        let watcher = StatusWatcher::new(
            deps.client.clone(),
            deps.navigator.clone(),
            page,
            deps.poll_interval,
        )
        .spawn(mount.clone());

        Ok(Self {
            deps,
            page,
            user,
            mount,
            watcher: Some(watcher),
        })
    }

    pub fn page(&self) -> Route {
        self.page
    }

    pub fn user(&self) -> &SellerUser {
        &self.user
    }

    pub fn is_open(&self) -> bool {
        self.mount.is_live()
    }

    /// Wait for the watcher to finish, which happens once it navigates away
    /// or the page is closed.
    pub async fn wait(&mut self) {
        if let Some(handle) = self.watcher.take() {
            if let Err(e) = handle.await {
                warn!(page = %self.page, "Status watcher task failed: {e}");
            }
        }
        self.mount.unmount();
    }

    /// Tear the page down; an in-flight status reply is discarded.
    pub fn close(&self) {
        self.mount.unmount();
    }

    /// "Update application" from the rejected page.
    pub fn reapply(&self) -> Route {
        self.close();
        self.deps.navigator.navigate(Route::Onboarding);
        Route::Onboarding
    }

    pub async fn logout(&self) -> Route {
        self.close();
        crate::auth::logout(&self.deps).await
    }
}

impl Drop for StatusPage {
    fn drop(&mut self) {
        self.mount.unmount();
    }
}
