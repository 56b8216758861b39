//! Local records for remote session data.
//!
//! These are read-only projections of what the remote service returns.
//! Nothing here is owned or mutated locally.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Remote session identifier.
pub type SessionId = String;

/// A session as seen by callers of the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    pub id: SessionId,
    /// Human readable title.
    pub title: String,
    /// Owning project.
    pub project_id: String,
    /// Directory the session works in.
    pub directory: String,
    /// Parent session, for forks and sub-agent sessions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<SessionId>,
    /// Public share URL, when the session is shared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
    /// Creation timestamp (Unix epoch milliseconds).
    pub created_at: i64,
    /// Last update timestamp (Unix epoch milliseconds).
    pub updated_at: i64,
}

/// A message with its parts. Both are opaque to the adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message metadata.
    pub info: Value,
    /// Ordered message parts.
    #[serde(default)]
    pub parts: Vec<Value>,
}

impl Message {
    /// Message id from the info block, if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.info.get("id").and_then(Value::as_str)
    }
}

/// Activity snapshot of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionStatus {
    /// Nothing running.
    Idle,
    /// A prompt is being processed.
    Busy,
    /// Waiting before retrying a failed request.
    Retry {
        /// Attempt number.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attempt: Option<u32>,
        /// Reason for the retry.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        /// Next attempt (Unix epoch milliseconds).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        next: Option<i64>,
    },
}

impl SessionStatus {
    /// Whether the session is doing work.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Todo item tracked by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub content: String,
    pub status: String,
    pub priority: String,
}

/// Per-file change produced by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    pub file: String,
    pub before: String,
    pub after: String,
    pub additions: u64,
    pub deletions: u64,
}

/// Provider and model pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelector {
    #[serde(rename = "providerID")]
    pub provider_id: String,
    #[serde(rename = "modelID")]
    pub model_id: String,
}

impl ModelSelector {
    #[must_use]
    pub fn new(provider_id: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            model_id: model_id.into(),
        }
    }

    /// Build a selector only when both halves are present.
    #[must_use]
    pub fn from_parts(provider_id: Option<&str>, model_id: Option<&str>) -> Option<Self> {
        match (provider_id, model_id) {
            (Some(provider), Some(model)) => Some(Self::new(provider, model)),
            _ => None,
        }
    }
}

impl From<ModelSelector> for Value {
    fn from(selector: ModelSelector) -> Self {
        serde_json::json!({
            "providerID": selector.provider_id,
            "modelID": selector.model_id,
        })
    }
}

/// Data returned alongside a successful share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
}

/// Data returned alongside a successful fork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkOutcome {
    pub session_id: SessionId,
}
