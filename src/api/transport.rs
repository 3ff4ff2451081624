//! Transport seam: "send named operation with variables, get back data/errors".

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use super::operations::Operation;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::SessionStore;

/// Maximum body length kept in an [`ApiError::Http`].
const MAX_ERROR_BODY: usize = 512;

/// One GraphQL request as posted to the endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
    pub operation_name: &'static str,
    pub query: &'static str,
    pub variables: Value,
}

impl GraphQlRequest {
    pub fn new(operation: &Operation, variables: Value) -> Self {
        Self {
            operation_name: operation.name,
            query: operation.document,
            variables,
        }
    }
}

/// The `{data, errors}` envelope. Both may be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

impl GraphQlResponse {
    /// A successful response carrying `payload` under `field`.
    pub fn with_field(field: &str, payload: Value) -> Self {
        let mut data = serde_json::Map::new();
        data.insert(field.to_string(), payload);
        Self {
            data: Some(Value::Object(data)),
            errors: Vec::new(),
        }
    }

    /// A response carrying a single error and no data.
    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            errors: vec![GraphQlError {
                message: message.into(),
                path: None,
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
}

/// Executes GraphQL requests. Caching and retries are not its concern.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &GraphQlRequest) -> Result<GraphQlResponse, ApiError>;
}

/// HTTP transport posting JSON to a single endpoint, authenticated with the
/// session's access token when one exists.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    session: Arc<dyn SessionStore>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            session,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &GraphQlRequest) -> Result<GraphQlResponse, ApiError> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(token) = self.session.access_token().await {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            error!(operation = request.operation_name, "[Network error]: {e}");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        debug!(
            operation = request.operation_name,
            status = status.as_u16(),
            bytes = body.len(),
            "GraphQL response"
        );

        match serde_json::from_str::<GraphQlResponse>(&body) {
            Ok(parsed) => {
                for err in &parsed.errors {
                    error!(
                        operation = request.operation_name,
                        path = ?err.path,
                        "[GraphQL error]: {}",
                        err.message
                    );
                }
                Ok(parsed)
            }
            Err(e) if status.is_success() => Err(ApiError::InvalidResponse {
                operation: request.operation_name.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(ApiError::Http {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            }),
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
