//! Client seam and error types.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::WorkspaceContext;

/// Remote session operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    List,
    Get,
    Messages,
    Delete,
    Update,
    Abort,
    Status,
    Todo,
    Diff,
    Children,
    Init,
    Command,
    Shell,
    Summarize,
    Share,
    Unshare,
    Revert,
    Unrevert,
    Fork,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 20] = [
        Self::Create,
        Self::List,
        Self::Get,
        Self::Messages,
        Self::Delete,
        Self::Update,
        Self::Abort,
        Self::Status,
        Self::Todo,
        Self::Diff,
        Self::Children,
        Self::Init,
        Self::Command,
        Self::Shell,
        Self::Summarize,
        Self::Share,
        Self::Unshare,
        Self::Revert,
        Self::Unrevert,
        Self::Fork,
    ];

    /// Stable dotted name of the remote operation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Create => "session.create",
            Self::List => "session.list",
            Self::Get => "session.get",
            Self::Messages => "session.messages",
            Self::Delete => "session.delete",
            Self::Update => "session.update",
            Self::Abort => "session.abort",
            Self::Status => "session.status",
            Self::Todo => "session.todo",
            Self::Diff => "session.diff",
            Self::Children => "session.children",
            Self::Init => "session.init",
            Self::Command => "session.command",
            Self::Shell => "session.shell",
            Self::Summarize => "session.summarize",
            Self::Share => "session.share",
            Self::Unshare => "session.unshare",
            Self::Revert => "session.revert",
            Self::Unrevert => "session.unrevert",
            Self::Fork => "session.fork",
        }
    }

    /// Whether the operation addresses a single session.
    #[must_use]
    pub const fn is_session_scoped(self) -> bool {
        !matches!(self, Self::Create | Self::List | Self::Status)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Request handed to a [`SessionClient`].
///
/// `directory` is always present. `message_id` narrows read operations (the
/// diff scope); operations that act on a message carry it in `body` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub directory: String,
    #[serde(rename = "sessionID", default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(rename = "messageID", default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Map<String, Value>>,
}

impl SessionRequest {
    /// Request scoped to the workspace only.
    #[must_use]
    pub fn new(ctx: &WorkspaceContext) -> Self {
        Self {
            directory: ctx.directory_string(),
            session_id: None,
            message_id: None,
            body: None,
        }
    }

    /// Request addressing one session.
    #[must_use]
    pub fn for_session(ctx: &WorkspaceContext, session_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            ..Self::new(ctx)
        }
    }

    /// Narrow the request to a message.
    #[must_use]
    pub fn message(mut self, message_id: Option<impl Into<String>>) -> Self {
        self.message_id = message_id.map(Into::into);
        self
    }

    /// Set a body field. The body is created on first use.
    #[must_use]
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.body
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
        self
    }

    /// Set a body field only when a value is present.
    #[must_use]
    pub fn field_opt<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.field(key, value),
            None => self,
        }
    }

    /// Look up a body field.
    #[must_use]
    pub fn body_field(&self, key: &str) -> Option<&Value> {
        self.body.as_ref().and_then(|body| body.get(key))
    }
}

/// Failure reported by a [`SessionClient`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The remote service answered with an error marker.
    #[error("{message}")]
    Remote {
        name: Option<String>,
        message: String,
    },
    /// The request never produced a usable answer.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The answer could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ClientError {
    /// Error marker with a message and no name.
    #[must_use]
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            name: None,
            message: message.into(),
        }
    }

    /// Error marker with a name such as `NotFoundError`.
    #[must_use]
    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            name: Some(name.into()),
            message: message.into(),
        }
    }
}

/// Error surfaced by throwing-mode adapter operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("Inconsistent response: {0}")]
    InconsistentResponse(String),
    #[error("Unexpected response shape: {0}")]
    Reshape(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(e: serde_json::Error) -> Self {
        Self::Reshape(e.to_string())
    }
}

/// Handle to the remote session service.
///
/// Implementations issue exactly one round trip per call and return the raw
/// JSON answer. Narrowing the answer into local records is left to callers.
#[async_trait]
pub trait SessionClient: Send + Sync {
    /// Invoke a remote operation.
    async fn call(&self, operation: Operation, request: SessionRequest)
    -> Result<Value, ClientError>;
}

#[async_trait]
impl<C: SessionClient + ?Sized> SessionClient for Arc<C> {
    async fn call(
        &self,
        operation: Operation,
        request: SessionRequest,
    ) -> Result<Value, ClientError> {
        (**self).call(operation, request).await
    }
}

#[async_trait]
impl<C: SessionClient + ?Sized> SessionClient for Box<C> {
    async fn call(
        &self,
        operation: Operation,
        request: SessionRequest,
    ) -> Result<Value, ClientError> {
        (**self).call(operation, request).await
    }
}
