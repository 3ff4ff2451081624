//! Session store: the one piece of state shared across pages.
//!
//! Written once at sign-in/sign-up and cleared once at logout. Pages receive
//! it explicitly through [`crate::context::PageDeps`]; there is no global.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::SessionError;

/// Identity of the signed-in seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
}

impl SellerUser {
    /// Best human-readable handle for the user.
    pub fn display_name(&self) -> &str {
        self.email
            .as_deref()
            .or(self.mobile_number.as_deref())
            .unwrap_or(self.id.as_str())
    }
}

/// Access/refresh token pair issued by sign-in or sign-up.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
}

/// Read/clear interface over the credential store.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a fresh sign-in, replacing whatever was there.
    async fn save(&self, user: SellerUser, tokens: SessionTokens) -> Result<(), SessionError>;

    /// Unexpired access token, if any.
    async fn access_token(&self) -> Option<SecretString>;

    /// Unexpired refresh token, if any.
    async fn refresh_token(&self) -> Option<SecretString>;

    /// Signed-in user, if the session has not expired.
    async fn user(&self) -> Option<SellerUser>;

    /// Drop tokens and user together.
    async fn clear(&self) -> Result<(), SessionError>;

    async fn is_authenticated(&self) -> bool {
        self.access_token().await.is_some()
    }
}

/// On-disk shape of a session. Tokens are only exposed here, at the
/// persistence boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    user: SellerUser,
    access_token: String,
    access_expires_at: DateTime<Utc>,
    refresh_token: String,
    refresh_expires_at: DateTime<Utc>,
}

/// Session store backed by memory, optionally mirrored to a JSON file.
pub struct Session {
    path: Option<PathBuf>,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
    state: RwLock<Option<StoredSession>>,
}

impl Session {
    /// A session that lives only as long as the process.
    pub fn in_memory(access_ttl: chrono::Duration, refresh_ttl: chrono::Duration) -> Self {
        Self {
            path: None,
            access_ttl,
            refresh_ttl,
            state: RwLock::new(None),
        }
    }

    /// Open a file-backed session, loading any previously saved sign-in.
    ///
    /// An unreadable or corrupt file is logged and treated as signed out.
    pub async fn open(
        path: impl Into<PathBuf>,
        access_ttl: chrono::Duration,
        refresh_ttl: chrono::Duration,
    ) -> Result<Self, SessionError> {
        let path = path.into();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<StoredSession>(&bytes) {
                Ok(stored) => {
                    debug!(path = %path.display(), "Loaded session");
                    Some(stored)
                }
                Err(e) => {
                    warn!(path = %path.display(), "Ignoring unreadable session file: {e}");
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(SessionError::Io(e)),
        };

        Ok(Self {
            path: Some(path),
            access_ttl,
            refresh_ttl,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write owner-only next to the final path, then rename into place.
    async fn persist(&self, stored: &StoredSession) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(stored)
            .map_err(|e| SessionError::Serialization(e.to_string()))?;

        let tmp = temp_path(path);
        match tokio::fs::remove_file(&tmp).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(SessionError::Io(e)),
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options.open(&tmp).await?;
        file.write_all(&json).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    fn expiry(now: DateTime<Utc>, ttl: chrono::Duration) -> Result<DateTime<Utc>, SessionError> {
        now.checked_add_signed(ttl)
            .ok_or(SessionError::LifetimeOutOfRange(ttl.num_days()))
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

#[async_trait]
impl SessionStore for Session {
    async fn save(&self, user: SellerUser, tokens: SessionTokens) -> Result<(), SessionError> {
        let now = Utc::now();
        let stored = StoredSession {
            user,
            access_token: tokens.access_token.expose_secret().to_string(),
            access_expires_at: Self::expiry(now, self.access_ttl)?,
            refresh_token: tokens.refresh_token.expose_secret().to_string(),
            refresh_expires_at: Self::expiry(now, self.refresh_ttl)?,
        };

        let mut state = self.state.write().await;
        self.persist(&stored).await?;
        info!(user_id = %stored.user.id, "Session stored");
        *state = Some(stored);
        Ok(())
    }

    async fn access_token(&self) -> Option<SecretString> {
        let state = self.state.read().await;
        state
            .as_ref()
            .filter(|s| Utc::now() < s.access_expires_at)
            .map(|s| SecretString::from(s.access_token.clone()))
    }

    async fn refresh_token(&self) -> Option<SecretString> {
        let state = self.state.read().await;
        state
            .as_ref()
            .filter(|s| Utc::now() < s.refresh_expires_at)
            .map(|s| SecretString::from(s.refresh_token.clone()))
    }

    async fn user(&self) -> Option<SellerUser> {
        let state = self.state.read().await;
        state
            .as_ref()
            .filter(|s| Utc::now() < s.access_expires_at)
            .map(|s| s.user.clone())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        let mut state = self.state.write().await;
        // File first: memory is only cleared once nothing can reload it.
        if let Some(path) = &self.path {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(SessionError::Io(e)),
            }
        }
        *state = None;
        info!("Session cleared");
        Ok(())
    }
}
