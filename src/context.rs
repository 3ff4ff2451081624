//! Dependencies every page is handed explicitly.

use std::sync::Arc;
use std::time::Duration;

use crate::api::{HttpTransport, SellerClient};
use crate::application::routes::Navigator;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::onboarding::forms::{DocumentUploader, LocalPathUploader};
use crate::session::{Session, SessionStore};

/// Shared collaborators for the pages. Cheap to clone.
#[derive(Clone)]
pub struct PageDeps {
    pub client: SellerClient,
    pub session: Arc<dyn SessionStore>,
    pub navigator: Arc<dyn Navigator>,
    pub uploader: Arc<dyn DocumentUploader>,
    /// Status page poll interval.
    pub poll_interval: Duration,
}

impl PageDeps {
    /// Open the configured session (file-backed when a path is set) and
    /// connect to the endpoint.
    pub async fn open(config: &ClientConfig, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let session: Arc<dyn SessionStore> = match &config.session_path {
            Some(path) => Arc::new(
                Session::open(path, config.access_token_ttl, config.refresh_token_ttl).await?,
            ),
            None => Arc::new(Session::in_memory(
                config.access_token_ttl,
                config.refresh_token_ttl,
            )),
        };
        Self::connect(config, session, navigator)
    }

    /// Wire the HTTP transport for `config` against `session`.
    pub fn connect(
        config: &ClientConfig,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let transport = HttpTransport::new(config, session.clone())?;
        Ok(Self {
            client: SellerClient::new(Arc::new(transport)),
            session,
            navigator,
            uploader: Arc::new(LocalPathUploader),
            poll_interval: config.status_poll_interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::routes::RouteHistory;
    use crate::error::Error;

    fn config(session_path: Option<std::path::PathBuf>) -> ClientConfig {
        ClientConfig {
            session_path,
            ..ClientConfig::default()
        }
    }

    #[tokio::test]
    async fn opens_signed_out_file_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let deps = PageDeps::open(&config(Some(path)), Arc::new(RouteHistory::new()))
            .await
            .unwrap();
        assert!(!deps.session.is_authenticated().await);
        assert_eq!(deps.poll_interval, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn opens_in_memory_without_path() {
        let deps = PageDeps::open(&config(None), Arc::new(RouteHistory::new()))
            .await
            .unwrap();
        assert!(deps.session.user().await.is_none());
    }

    #[tokio::test]
    async fn unreadable_session_path_is_a_session_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = PageDeps::open(
            &config(Some(dir.path().to_path_buf())),
            Arc::new(RouteHistory::new()),
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(err, Error::Session(_)));
    }
}
