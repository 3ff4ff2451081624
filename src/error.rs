//! Error types for the seller onboarding client.

use std::collections::BTreeMap;
use std::fmt;

/// Errors that can stop the client from starting once configured.
///
/// Once pages are running, failures are reported as outcomes instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Failures talking to the seller API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response reached us (DNS, connect, timeout).
    #[error("Network failure: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The server answered and said no.
    #[error("Request rejected: {message}")]
    Rejected { message: String },

    #[error("Invalid response for {operation}: {reason}")]
    InvalidResponse { operation: String, reason: String },
}

impl ApiError {
    /// Text suitable for showing in place of the form that triggered the call.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message } if !message.trim().is_empty() => message.clone(),
            Self::Network(_) => "Network error. Please check your connection.".to_string(),
            _ => "An unexpected error occurred. Please try again.".to_string(),
        }
    }

    /// Whether the failure happened before any response was received.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Session persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Token lifetime of {0} days is out of range")]
    LifetimeOutOfRange(i64),
}

/// Document upload failures.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("File not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("Not a regular file: {0}")]
    NotAFile(std::path::PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Field-level validation failures, keyed by field name.
///
/// Only the first message per field is kept, matching how a form shows one
/// error under each input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field` unless one is already present.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> std::result::Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Result type alias for the client.
pub type Result<T> = std::result::Result<T, Error>;
