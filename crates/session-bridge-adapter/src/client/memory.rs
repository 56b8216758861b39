//! In-memory session client.

use std::{
    collections::HashMap,
    sync::RwLock,
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use serde_json::{Value, json};
use session_bridge_core::{ClientError, Operation, SessionClient, SessionRequest, SessionStatus};
use uuid::Uuid;

/// Base URL handed out for shared sessions.
const SHARE_BASE_URL: &str = "https://share.local/s";

/// A call seen by the [`MemoryClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: Operation,
    pub request: SessionRequest,
}

#[derive(Debug, Clone)]
struct StoredSession {
    id: String,
    title: String,
    directory: String,
    parent_id: Option<String>,
    share_url: Option<String>,
    revert: Option<String>,
    status: SessionStatus,
    messages: Vec<Value>,
    todos: Vec<Value>,
    /// Diffs tagged with the message that produced them.
    diffs: Vec<(Option<String>, Value)>,
    created: i64,
    updated: i64,
}

impl StoredSession {
    fn to_wire(&self) -> Value {
        let mut value = json!({
            "id": self.id,
            "title": self.title,
            "projectID": project_id(&self.directory),
            "directory": self.directory,
            "version": env!("CARGO_PKG_VERSION"),
            "time": { "created": self.created, "updated": self.updated },
        });
        if let Some(parent_id) = &self.parent_id {
            value["parentID"] = json!(parent_id);
        }
        if let Some(url) = &self.share_url {
            value["share"] = json!({ "url": url });
        }
        if let Some(message_id) = &self.revert {
            value["revert"] = json!({ "messageID": message_id });
        }
        value
    }

    fn touch(&mut self) {
        self.updated = now();
    }
}

/// In-process stand-in for the remote session service.
///
/// Useful for development and tests. Every call is recorded, and any
/// operation can be made to fail with a chosen error. Data is lost on drop.
pub struct MemoryClient {
    sessions: RwLock<HashMap<String, StoredSession>>,
    calls: RwLock<Vec<RecordedCall>>,
    failures: RwLock<HashMap<Operation, ClientError>>,
}

impl MemoryClient {
    /// Create an empty client.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            calls: RwLock::new(Vec::new()),
            failures: RwLock::new(HashMap::new()),
        }
    }

    /// Make every later call to `operation` fail with `error`.
    pub fn fail_with(&self, operation: Operation, error: ClientError) {
        if let Ok(mut failures) = self.failures.write() {
            failures.insert(operation, error);
        }
    }

    /// Undo all [`fail_with`](Self::fail_with) calls.
    pub fn clear_failures(&self) {
        if let Ok(mut failures) = self.failures.write() {
            failures.clear();
        }
    }

    /// Calls received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .read()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Most recent call to `operation`.
    #[must_use]
    pub fn last_call(&self, operation: Operation) -> Option<RecordedCall> {
        self.calls()
            .into_iter()
            .rev()
            .find(|call| call.operation == operation)
    }

    /// Append a message to a session and return its id.
    ///
    /// # Errors
    /// Returns error if the session does not exist.
    pub fn push_message(
        &self,
        session_id: &str,
        role: &str,
        parts: Vec<Value>,
    ) -> Result<String, ClientError> {
        self.with_session(session_id, |session| {
            let message_id = new_id("msg");
            session.messages.push(json!({
                "info": {
                    "id": message_id,
                    "sessionID": session.id,
                    "role": role,
                    "time": { "created": now() },
                },
                "parts": parts,
            }));
            session.touch();
            Ok(message_id)
        })
    }

    /// Replace the todo list of a session.
    ///
    /// # Errors
    /// Returns error if the session does not exist.
    pub fn set_todos(&self, session_id: &str, todos: Vec<Value>) -> Result<(), ClientError> {
        self.with_session(session_id, |session| {
            session.todos = todos;
            Ok(())
        })
    }

    /// Record a file diff, optionally attributed to a message.
    ///
    /// # Errors
    /// Returns error if the session does not exist.
    pub fn add_diff(
        &self,
        session_id: &str,
        message_id: Option<&str>,
        diff: Value,
    ) -> Result<(), ClientError> {
        self.with_session(session_id, |session| {
            session.diffs.push((message_id.map(str::to_string), diff));
            Ok(())
        })
    }

    /// Set the activity status of a session.
    ///
    /// # Errors
    /// Returns error if the session does not exist.
    pub fn set_status(&self, session_id: &str, status: SessionStatus) -> Result<(), ClientError> {
        self.with_session(session_id, |session| {
            session.status = status;
            Ok(())
        })
    }

    fn with_session<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut StoredSession) -> Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| not_found(session_id))?;
        f(session)
    }

    fn read_session<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&StoredSession) -> T,
    ) -> Result<T, ClientError> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        sessions
            .get(session_id)
            .map(f)
            .ok_or_else(|| not_found(session_id))
    }

    fn record(&self, operation: Operation, request: &SessionRequest) {
        if let Ok(mut calls) = self.calls.write() {
            calls.push(RecordedCall {
                operation,
                request: request.clone(),
            });
        }
    }

    fn injected_failure(&self, operation: Operation) -> Option<ClientError> {
        self.failures
            .read()
            .ok()
            .and_then(|failures| failures.get(&operation).cloned())
    }

    fn create(&self, request: &SessionRequest) -> Result<Value, ClientError> {
        let parent_id = body_str(request, "parentID");
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        if let Some(parent) = &parent_id {
            if !sessions.contains_key(parent) {
                return Err(not_found(parent));
            }
        }

        let timestamp = now();
        let session = StoredSession {
            id: new_id("ses"),
            title: body_str(request, "title")
                .unwrap_or_else(|| format!("New session - {timestamp}")),
            directory: request.directory.clone(),
            parent_id,
            share_url: None,
            revert: None,
            status: SessionStatus::Idle,
            messages: Vec::new(),
            todos: Vec::new(),
            diffs: Vec::new(),
            created: timestamp,
            updated: timestamp,
        };
        let wire = session.to_wire();
        sessions.insert(session.id.clone(), session);
        Ok(wire)
    }

    fn list(&self, directory: &str, parent_id: Option<&str>) -> Result<Value, ClientError> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        let mut result: Vec<&StoredSession> = sessions
            .values()
            .filter(|s| s.directory == directory)
            .filter(|s| parent_id.is_none_or(|parent| s.parent_id.as_deref() == Some(parent)))
            .collect();

        // Most recently updated first
        result.sort_by(|a, b| b.updated.cmp(&a.updated).then_with(|| a.id.cmp(&b.id)));

        Ok(Value::Array(result.into_iter().map(StoredSession::to_wire).collect()))
    }

    fn status(&self, directory: &str) -> Result<Value, ClientError> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        let map: serde_json::Map<String, Value> = sessions
            .values()
            .filter(|s| s.directory == directory)
            .map(|s| {
                serde_json::to_value(&s.status)
                    .map(|status| (s.id.clone(), status))
                    .map_err(|e| ClientError::Decode(e.to_string()))
            })
            .collect::<Result<_, _>>()?;
        Ok(Value::Object(map))
    }

    fn delete(&self, session_id: &str) -> Result<Value, ClientError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        if sessions.remove(session_id).is_none() {
            return Err(not_found(session_id));
        }
        // Children go with their parent.
        let mut orphans: Vec<String> = vec![session_id.to_string()];
        while let Some(parent) = orphans.pop() {
            let children: Vec<String> = sessions
                .values()
                .filter(|s| s.parent_id.as_deref() == Some(parent.as_str()))
                .map(|s| s.id.clone())
                .collect();
            for child in children {
                sessions.remove(&child);
                orphans.push(child);
            }
        }
        Ok(Value::Bool(true))
    }

    fn fork(&self, session_id: &str, message_id: Option<String>) -> Result<Value, ClientError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let source = sessions
            .get(session_id)
            .ok_or_else(|| not_found(session_id))?;

        let messages: Vec<Value> = match &message_id {
            Some(message_id) => source
                .messages
                .iter()
                .take_while(|m| message_id_of(m) != Some(message_id.as_str()))
                .cloned()
                .collect(),
            None => source.messages.clone(),
        };

        let timestamp = now();
        let fork = StoredSession {
            id: new_id("ses"),
            title: format!("{} (fork)", source.title),
            directory: source.directory.clone(),
            parent_id: Some(source.id.clone()),
            share_url: None,
            revert: None,
            status: SessionStatus::Idle,
            messages,
            todos: Vec::new(),
            diffs: Vec::new(),
            created: timestamp,
            updated: timestamp,
        };
        let wire = fork.to_wire();
        sessions.insert(fork.id.clone(), fork);
        Ok(wire)
    }

    fn dispatch(&self, operation: Operation, request: &SessionRequest) -> Result<Value, ClientError> {
        let session_id = || {
            request.session_id.as_deref().ok_or_else(|| {
                ClientError::Transport(format!("{operation} requires a session id"))
            })
        };

        match operation {
            Operation::Create => self.create(request),
            Operation::List => self.list(&request.directory, None),
            Operation::Status => self.status(&request.directory),
            Operation::Get => self.read_session(session_id()?, StoredSession::to_wire),
            Operation::Messages => {
                self.read_session(session_id()?, |s| Value::Array(s.messages.clone()))
            }
            Operation::Delete => self.delete(session_id()?),
            Operation::Update => self.with_session(session_id()?, |s| {
                if let Some(title) = body_str(request, "title") {
                    s.title = title;
                }
                s.touch();
                Ok(s.to_wire())
            }),
            Operation::Abort => self.with_session(session_id()?, |s| {
                s.status = SessionStatus::Idle;
                Ok(Value::Bool(true))
            }),
            Operation::Todo => self.read_session(session_id()?, |s| Value::Array(s.todos.clone())),
            Operation::Diff => self.read_session(session_id()?, |s| {
                Value::Array(
                    s.diffs
                        .iter()
                        .filter(|(origin, _)| {
                            request.message_id.is_none() || *origin == request.message_id
                        })
                        .map(|(_, diff)| diff.clone())
                        .collect(),
                )
            }),
            Operation::Children => {
                let parent_id = session_id()?;
                let directory = self.read_session(parent_id, |s| s.directory.clone())?;
                self.list(&directory, Some(parent_id))
            }
            Operation::Init | Operation::Summarize => {
                self.read_session(session_id()?, |_| Value::Bool(true))
            }
            Operation::Command => {
                let session_id = session_id()?;
                let command = body_str(request, "command").unwrap_or_default();
                let arguments = body_str(request, "arguments").unwrap_or_default();
                let text = format!("/{command} {arguments}").trim_end().to_string();
                let message_id = self.push_message(
                    session_id,
                    "user",
                    vec![json!({ "type": "text", "text": text })],
                )?;
                Ok(json!({
                    "info": { "id": message_id, "sessionID": session_id, "role": "user" },
                    "parts": [],
                }))
            }
            Operation::Shell => {
                let session_id = session_id()?;
                let command = body_str(request, "command").unwrap_or_default();
                let message_id = self.push_message(
                    session_id,
                    "assistant",
                    vec![json!({
                        "type": "tool",
                        "tool": "bash",
                        "state": { "input": { "command": command } },
                    })],
                )?;
                Ok(json!({ "id": message_id, "sessionID": session_id, "role": "assistant" }))
            }
            Operation::Share => self.with_session(session_id()?, |s| {
                s.share_url = Some(format!("{SHARE_BASE_URL}/{}", s.id));
                s.touch();
                Ok(s.to_wire())
            }),
            Operation::Unshare => self.with_session(session_id()?, |s| {
                s.share_url = None;
                s.touch();
                Ok(s.to_wire())
            }),
            Operation::Revert => {
                let message_id = body_str(request, "messageID")
                    .ok_or_else(|| ClientError::named("BadRequest", "messageID is required"))?;
                self.with_session(session_id()?, |s| {
                    if !s
                        .messages
                        .iter()
                        .any(|m| message_id_of(m) == Some(message_id.as_str()))
                    {
                        return Err(ClientError::named(
                            "NotFoundError",
                            format!("Message not found: {message_id}"),
                        ));
                    }
                    s.revert = Some(message_id);
                    s.touch();
                    Ok(s.to_wire())
                })
            }
            Operation::Unrevert => self.with_session(session_id()?, |s| {
                s.revert = None;
                s.touch();
                Ok(s.to_wire())
            }),
            Operation::Fork => self.fork(session_id()?, body_str(request, "messageID")),
        }
    }
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionClient for MemoryClient {
    async fn call(
        &self,
        operation: Operation,
        request: SessionRequest,
    ) -> Result<Value, ClientError> {
        self.record(operation, &request);
        if let Some(error) = self.injected_failure(operation) {
            return Err(error);
        }
        self.dispatch(operation, &request)
    }
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

fn project_id(directory: &str) -> String {
    format!("prj_{}", Uuid::new_v5(&Uuid::NAMESPACE_URL, directory.as_bytes()).simple())
}

fn body_str(request: &SessionRequest, key: &str) -> Option<String> {
    request
        .body_field(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn message_id_of(message: &Value) -> Option<&str> {
    message
        .get("info")
        .and_then(|info| info.get("id"))
        .and_then(Value::as_str)
}

fn not_found(session_id: &str) -> ClientError {
    ClientError::named("NotFoundError", format!("Session not found: {session_id}"))
}

fn poisoned<E: std::fmt::Display>(e: E) -> ClientError {
    ClientError::Transport(format!("memory client lock poisoned: {e}"))
}
