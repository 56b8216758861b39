//! `SessionClient` over HTTP.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use session_bridge_core::{ClientError, Operation, SessionClient, SessionRequest};

use crate::{
    config::{ConfigError, HttpClientConfig},
    routes::Route,
};

/// Session client talking to the remote service's REST API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpSessionClient {
    http: Client,
    base_url: String,
}

impl HttpSessionClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the client cannot be built.
    pub fn new(config: &HttpClientConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder().timeout(config.timeout());
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        Self::with_client(builder.build()?, &config.base_url)
    }

    /// Wrap an existing `reqwest` client.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid.
    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url).map_err(|e| ConfigError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                url: base_url.to_string(),
                reason: "not a base URL".to_string(),
            });
        }
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SessionClient for HttpSessionClient {
    async fn call(
        &self,
        operation: Operation,
        request: SessionRequest,
    ) -> Result<Value, ClientError> {
        let route = Route::of(operation);
        let url = format!(
            "{}{}",
            self.base_url,
            route.path(request.session_id.as_deref())?
        );

        let mut builder = self
            .http
            .request(route.method.clone(), &url)
            .query(&[("directory", request.directory.as_str())]);
        if let Some(message_id) = &request.message_id {
            builder = builder.query(&[("messageID", message_id.as_str())]);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        } else if route.has_body() {
            builder = builder.json(&serde_json::Map::new());
        }

        tracing::debug!(operation = operation.name(), method = %route.method, %url, "sending request");

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if !status.is_success() {
            let error = remote_error(status, &bytes);
            tracing::debug!(operation = operation.name(), %status, "remote error: {error}");
            return Err(error);
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// Build the error marker for a non-success response.
///
/// Understands `{name, data: {message}}`, `{message}` and `{error}` bodies,
/// skipping blank fields, then falls back to the raw text or the status line.
fn remote_error(status: StatusCode, body: &[u8]) -> ClientError {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    let name = parsed
        .as_ref()
        .and_then(|v| v.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let message = parsed.as_ref().and_then(|v| {
        let text = |field: Option<&Value>| {
            field
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
        };
        text(v.get("data").and_then(|data| data.get("message")))
            .or_else(|| text(v.get("message")))
            .or_else(|| text(v.get("error")))
    });

    let message = message.unwrap_or_else(|| {
        let text = String::from_utf8_lossy(body).trim().to_string();
        if text.is_empty() || parsed.is_some() {
            format!("HTTP {status}")
        } else {
            text
        }
    });

    ClientError::Remote { name, message }
}
