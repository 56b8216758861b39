//! Narrowing of remote payloads into local records.
//!
//! The remote service returns loosely typed JSON. Each function here accepts
//! exactly the fields the adapter needs and drops the rest, so remote types
//! never leak into the adapter's API.

use std::collections::HashMap;

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use session_bridge_core::{FileDiff, Message, Session, SessionError, SessionStatus, Todo};

#[derive(Debug, Deserialize)]
struct RemoteSession {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(rename = "projectID", default)]
    project_id: String,
    #[serde(default)]
    directory: String,
    #[serde(rename = "parentID", default)]
    parent_id: Option<String>,
    #[serde(default)]
    share: Option<RemoteShare>,
    #[serde(default)]
    time: RemoteTime,
}

#[derive(Debug, Default, Deserialize)]
struct RemoteTime {
    #[serde(default)]
    created: i64,
    #[serde(default)]
    updated: i64,
}

#[derive(Debug, Deserialize)]
struct RemoteShare {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RemoteMessage {
    info: Value,
    #[serde(default)]
    parts: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RemoteTodo {
    id: String,
    content: String,
    status: String,
    priority: String,
}

#[derive(Debug, Deserialize)]
struct RemoteFileDiff {
    file: String,
    #[serde(default)]
    before: String,
    #[serde(default)]
    after: String,
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
}

impl From<RemoteSession> for Session {
    fn from(remote: RemoteSession) -> Self {
        Self {
            id: remote.id,
            title: remote.title,
            project_id: remote.project_id,
            directory: remote.directory,
            parent_id: remote.parent_id,
            share_url: remote.share.and_then(|s| s.url),
            created_at: remote.time.created,
            updated_at: remote.time.updated,
        }
    }
}

impl From<RemoteMessage> for Message {
    fn from(remote: RemoteMessage) -> Self {
        Self {
            info: remote.info,
            parts: remote.parts,
        }
    }
}

impl From<RemoteTodo> for Todo {
    fn from(remote: RemoteTodo) -> Self {
        Self {
            id: remote.id,
            content: remote.content,
            status: remote.status,
            priority: remote.priority,
        }
    }
}

impl From<RemoteFileDiff> for FileDiff {
    fn from(remote: RemoteFileDiff) -> Self {
        Self {
            file: remote.file,
            before: remote.before,
            after: remote.after,
            additions: remote.additions,
            deletions: remote.deletions,
        }
    }
}

/// Decode a JSON array into local records. `null` means "no items".
fn list_of<R, L>(value: Value) -> Result<Vec<L>, SessionError>
where
    R: DeserializeOwned,
    L: From<R>,
{
    if value.is_null() {
        return Ok(Vec::new());
    }
    let items: Vec<R> = serde_json::from_value(value)?;
    Ok(items.into_iter().map(L::from).collect())
}

/// A single session.
///
/// # Errors
/// Returns [`SessionError::Reshape`] if the payload is not a session.
pub fn session(value: Value) -> Result<Session, SessionError> {
    if value.is_null() {
        return Err(SessionError::Reshape("expected a session, got null".to_string()));
    }
    let remote: RemoteSession = serde_json::from_value(value)?;
    Ok(remote.into())
}

/// A list of sessions; `null` yields an empty list.
///
/// # Errors
/// Returns [`SessionError::Reshape`] if the payload is not a session array.
pub fn sessions(value: Value) -> Result<Vec<Session>, SessionError> {
    list_of::<RemoteSession, Session>(value)
}

/// Messages with their parts; `null` yields an empty list.
///
/// # Errors
/// Returns [`SessionError::Reshape`] if the payload is not a message array.
pub fn messages(value: Value) -> Result<Vec<Message>, SessionError> {
    list_of::<RemoteMessage, Message>(value)
}

/// Todo list; `null` yields an empty list.
///
/// # Errors
/// Returns [`SessionError::Reshape`] if the payload is not a todo array.
pub fn todos(value: Value) -> Result<Vec<Todo>, SessionError> {
    list_of::<RemoteTodo, Todo>(value)
}

/// File diffs; `null` yields an empty list.
///
/// # Errors
/// Returns [`SessionError::Reshape`] if the payload is not a diff array.
pub fn diffs(value: Value) -> Result<Vec<FileDiff>, SessionError> {
    list_of::<RemoteFileDiff, FileDiff>(value)
}

/// Status map keyed by session id; `null` yields an empty map.
///
/// # Errors
/// Returns [`SessionError::Reshape`] if the payload is not a status map.
pub fn status_map(value: Value) -> Result<HashMap<String, SessionStatus>, SessionError> {
    if value.is_null() {
        return Ok(HashMap::new());
    }
    Ok(serde_json::from_value(value)?)
}

/// Identifier of a session payload, if it carries one.
#[must_use]
pub fn session_id(value: &Value) -> Option<String> {
    value
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Share URL nested under `share.url`.
#[must_use]
pub fn share_url(value: &Value) -> Option<String> {
    value
        .get("share")
        .and_then(|share| share.get("url"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
