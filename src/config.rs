//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GraphQL endpoint all remote operations are posted to.
    pub endpoint: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// How often status pages re-check the application status.
    pub status_poll_interval: Duration,
    /// Where the session is persisted. `None` keeps it in memory only.
    pub session_path: Option<PathBuf>,
    /// Lifetime of the access token and stored user.
    pub access_token_ttl: chrono::Duration,
    /// Lifetime of the refresh token.
    pub refresh_token_ttl: chrono::Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/graphql/".to_string(),
            request_timeout: Duration::from_secs(15),
            status_poll_interval: Duration::from_secs(30),
            session_path: default_session_path(),
            access_token_ttl: chrono::Duration::days(7),
            refresh_token_ttl: chrono::Duration::days(30),
        }
    }
}

impl ClientConfig {
    /// Build config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let endpoint =
            std::env::var("SELLER_GRAPHQL_ENDPOINT").unwrap_or_else(|_| defaults.endpoint.clone());
        reqwest::Url::parse(&endpoint).map_err(|e| ConfigError::InvalidValue {
            key: "SELLER_GRAPHQL_ENDPOINT".to_string(),
            message: e.to_string(),
        })?;

        let request_timeout = Duration::from_secs(parse_var(
            "SELLER_REQUEST_TIMEOUT_SECS",
            defaults.request_timeout.as_secs(),
        )?);
        let status_poll_interval = Duration::from_secs(parse_var(
            "SELLER_STATUS_POLL_SECS",
            defaults.status_poll_interval.as_secs(),
        )?);
        if status_poll_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "SELLER_STATUS_POLL_SECS".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        let session_path = std::env::var("SELLER_SESSION_PATH")
            .ok()
            .map(PathBuf::from)
            .or(defaults.session_path);

        let access_days = parse_days("SELLER_ACCESS_TOKEN_DAYS", 7)?;
        let refresh_days = parse_days("SELLER_REFRESH_TOKEN_DAYS", 30)?;

        Ok(Self {
            endpoint,
            request_timeout,
            status_poll_interval,
            session_path,
            access_token_ttl: chrono::Duration::days(access_days),
            refresh_token_ttl: chrono::Duration::days(refresh_days),
        })
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
        Err(_) => Ok(default),
    }
}

/// Token lifetimes are whole days within ten years.
const TOKEN_DAYS: std::ops::RangeInclusive<i64> = 1..=3650;

fn parse_days(key: &str, default: i64) -> Result<i64, ConfigError> {
    let days = parse_var(key, default)?;
    if !TOKEN_DAYS.contains(&days) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!(
                "{days} days is outside {}..={}",
                TOKEN_DAYS.start(),
                TOKEN_DAYS.end()
            ),
        });
    }
    Ok(days)
}

fn default_session_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".seller-onboarding/session.json"))
}
