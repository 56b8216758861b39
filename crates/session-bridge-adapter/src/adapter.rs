//! Session operations adapter.
//!
//! Each method assembles a request, dispatches it through one of the
//! execution helpers, and narrows the answer into local records. The helper
//! chosen fixes how a method reports failure:
//!
//! | Mode | Return type | Methods |
//! |---|---|---|
//! | raising | `Result<_, SessionError>` | create, list, switch, messages, abort, fork |
//! | reporting | `OperationResult<_>` | delete, update, init, command, shell, summarize, share, unshare, revert, unrevert |
//! | optional | `Option<_>` | status, todos, diff, children |

use std::collections::HashMap;

use serde_json::Value;
use session_bridge_core::{
    ClientError, FileDiff, ForkOutcome, Message, ModelSelector, Operation, OperationResult,
    Session, SessionClient, SessionError, SessionId, SessionRequest, SessionStatus, ShareOutcome,
    Todo, WorkspaceContext,
};

use crate::{
    executor::{execute, execute_optional, execute_or_raise},
    options::{
        CommandOptions, CreateSessionOptions, DEFAULT_SHELL_AGENT, DEFAULT_SUMMARY_MODEL,
        DEFAULT_SUMMARY_PROVIDER, InitOptions, ShellOptions, SummarizeOptions,
    },
    reshape,
};

/// Adapter exposing one method per remote session operation.
///
/// Every request is pinned to the adapter's workspace directory. The adapter
/// keeps no state between calls, so it can be shared and called concurrently
/// whenever the client allows it.
pub struct SessionAdapter<C>
where
    C: SessionClient,
{
    client: C,
    context: WorkspaceContext,
}

impl<C> SessionAdapter<C>
where
    C: SessionClient,
{
    /// Create an adapter for a workspace.
    #[must_use]
    pub const fn new(client: C, context: WorkspaceContext) -> Self {
        Self { client, context }
    }

    /// Underlying client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Workspace every request is scoped to.
    #[must_use]
    pub const fn context(&self) -> &WorkspaceContext {
        &self.context
    }

    fn request(&self) -> SessionRequest {
        SessionRequest::new(&self.context)
    }

    fn session_request(&self, session_id: &str) -> SessionRequest {
        SessionRequest::for_session(&self.context, session_id)
    }

    async fn call(&self, operation: Operation, request: SessionRequest) -> Result<Value, SessionError> {
        tracing::debug!(
            operation = operation.name(),
            session_id = request.session_id.as_deref().unwrap_or("-"),
            "calling remote"
        );
        Ok(self.client.call(operation, request).await?)
    }

    /// Reporting-mode call whose answer carries nothing the caller needs.
    async fn report(
        &self,
        description: &str,
        operation: Operation,
        request: SessionRequest,
    ) -> OperationResult {
        execute(description, async {
            self.call(operation, request).await?;
            Ok(OperationResult::ok())
        })
        .await
    }

    // --- Raising mode ---

    /// Create a session and return its id.
    ///
    /// # Errors
    /// Returns error if the remote call fails or the answer has no id.
    pub async fn create_session(&self) -> Result<SessionId, SessionError> {
        self.create_session_with(CreateSessionOptions::default()).await
    }

    /// Create a session with a title or parent and return its id.
    ///
    /// # Errors
    /// Returns error if the remote call fails or the answer has no id.
    pub async fn create_session_with(
        &self,
        options: CreateSessionOptions,
    ) -> Result<SessionId, SessionError> {
        let request = self
            .request()
            .field_opt("title", options.title)
            .field_opt("parentID", options.parent_id);

        execute_or_raise("create session", async {
            let value = self.call(Operation::Create, request).await?;
            reshape::session_id(&value).ok_or_else(|| {
                SessionError::InconsistentResponse("session created without an id".to_string())
            })
        })
        .await
    }

    /// List sessions in the workspace.
    ///
    /// # Errors
    /// Returns error if the remote call fails or the answer is not a list.
    pub async fn list_sessions(&self) -> Result<Vec<Session>, SessionError> {
        execute_or_raise("list sessions", async {
            let value = self.call(Operation::List, self.request()).await?;
            reshape::sessions(value)
        })
        .await
    }

    /// Fetch a single session, typically to make it the active one.
    ///
    /// # Errors
    /// Returns error if the session does not exist or the call fails.
    pub async fn switch_session(&self, session_id: &str) -> Result<Session, SessionError> {
        execute_or_raise("switch session", async {
            let value = self.call(Operation::Get, self.session_request(session_id)).await?;
            reshape::session(value)
        })
        .await
    }

    /// Messages of a session, in order.
    ///
    /// # Errors
    /// Returns error if the remote call fails or the answer is not a list.
    pub async fn get_messages(&self, session_id: &str) -> Result<Vec<Message>, SessionError> {
        execute_or_raise("get messages", async {
            let value = self
                .call(Operation::Messages, self.session_request(session_id))
                .await?;
            reshape::messages(value)
        })
        .await
    }

    /// Abort whatever the session is running.
    ///
    /// # Errors
    /// Returns error if the remote call fails.
    pub async fn abort_session(&self, session_id: &str) -> Result<(), SessionError> {
        execute_or_raise("abort session", async {
            self.call(Operation::Abort, self.session_request(session_id))
                .await
                .map(|_| ())
        })
        .await
    }

    /// Fork a session at a message.
    ///
    /// An error marker from the remote side is reported in the envelope.
    /// A success answer without a new session id is an inconsistent response
    /// and is returned as an error, like transport failures.
    ///
    /// # Errors
    /// Returns error on transport failure or when the new id is missing.
    pub async fn fork_session(
        &self,
        session_id: &str,
        message_id: &str,
    ) -> Result<OperationResult<ForkOutcome>, SessionError> {
        let request = self
            .session_request(session_id)
            .field("messageID", message_id);

        execute_or_raise("fork session", async {
            match self.call(Operation::Fork, request).await {
                Ok(value) => {
                    let new_id = reshape::session_id(&value).ok_or_else(|| {
                        SessionError::InconsistentResponse(
                            "fork succeeded but no session id was returned".to_string(),
                        )
                    })?;
                    Ok(OperationResult::ok_with(ForkOutcome { session_id: new_id }))
                }
                Err(SessionError::Client(e @ ClientError::Remote { .. })) => {
                    tracing::warn!(session_id, "Fork rejected: {e}");
                    Ok(OperationResult::failure(e.to_string()))
                }
                Err(e) => Err(e),
            }
        })
        .await
    }

    // --- Reporting mode ---

    /// Delete a session.
    pub async fn delete_session(&self, session_id: &str) -> OperationResult {
        self.report("delete session", Operation::Delete, self.session_request(session_id))
            .await
    }

    /// Update a session. Only the title can change.
    pub async fn update_session(&self, session_id: &str, title: Option<&str>) -> OperationResult {
        let request = self.session_request(session_id).field_opt("title", title);
        self.report("update session", Operation::Update, request).await
    }

    /// Analyze the workspace and write its agent instructions.
    pub async fn init_session(&self, session_id: &str, options: InitOptions) -> OperationResult {
        let request = self
            .session_request(session_id)
            .field_opt("providerID", options.provider_id)
            .field_opt("modelID", options.model_id)
            .field_opt("messageID", options.message_id);
        self.report("init session", Operation::Init, request).await
    }

    /// Run a slash command in a session.
    pub async fn execute_command(
        &self,
        session_id: &str,
        command: &str,
        options: CommandOptions,
    ) -> OperationResult {
        let request = self
            .session_request(session_id)
            .field("command", command)
            .field("arguments", options.arguments.unwrap_or_default())
            .field_opt("agent", options.agent)
            .field_opt("model", options.model);
        self.report("execute command", Operation::Command, request).await
    }

    /// Run a shell command in a session.
    ///
    /// The model selector is only sent when both provider and model are given.
    pub async fn execute_shell(
        &self,
        session_id: &str,
        command: &str,
        options: ShellOptions,
    ) -> OperationResult {
        let model = ModelSelector::from_parts(
            options.provider_id.as_deref(),
            options.model_id.as_deref(),
        );
        let request = self
            .session_request(session_id)
            .field("command", command)
            .field(
                "agent",
                options.agent.unwrap_or_else(|| DEFAULT_SHELL_AGENT.to_string()),
            )
            .field_opt("model", model);
        self.report("execute shell", Operation::Shell, request).await
    }

    /// Compact a session into a summary.
    pub async fn summarize_session(
        &self,
        session_id: &str,
        options: SummarizeOptions,
    ) -> OperationResult {
        let request = self
            .session_request(session_id)
            .field(
                "providerID",
                options
                    .provider_id
                    .unwrap_or_else(|| DEFAULT_SUMMARY_PROVIDER.to_string()),
            )
            .field(
                "modelID",
                options
                    .model_id
                    .unwrap_or_else(|| DEFAULT_SUMMARY_MODEL.to_string()),
            )
            .field_opt("auto", options.auto);
        self.report("summarize session", Operation::Summarize, request)
            .await
    }

    /// Share a session, returning its public URL when the remote provides one.
    pub async fn share_session(&self, session_id: &str) -> OperationResult<ShareOutcome> {
        execute("share session", async {
            let value = self
                .call(Operation::Share, self.session_request(session_id))
                .await?;
            Ok(OperationResult::ok_with(ShareOutcome {
                share_url: reshape::share_url(&value),
            }))
        })
        .await
    }

    /// Stop sharing a session.
    pub async fn unshare_session(&self, session_id: &str) -> OperationResult {
        self.report("unshare session", Operation::Unshare, self.session_request(session_id))
            .await
    }

    /// Revert a session to the state before a message.
    pub async fn revert_to_message(&self, session_id: &str, message_id: &str) -> OperationResult {
        let request = self
            .session_request(session_id)
            .field("messageID", message_id);
        self.report("revert to message", Operation::Revert, request)
            .await
    }

    /// Undo a previous revert.
    pub async fn unrevert_session(&self, session_id: &str) -> OperationResult {
        self.report("unrevert session", Operation::Unrevert, self.session_request(session_id))
            .await
    }

    // --- Optional mode ---

    /// Status of every session, keyed by id.
    pub async fn get_session_status(&self) -> Option<HashMap<SessionId, SessionStatus>> {
        execute_optional("get session status", async {
            let value = self.call(Operation::Status, self.request()).await?;
            reshape::status_map(value)
        })
        .await
    }

    /// Todo list of a session.
    pub async fn get_session_todos(&self, session_id: &str) -> Option<Vec<Todo>> {
        execute_optional("get session todos", async {
            let value = self
                .call(Operation::Todo, self.session_request(session_id))
                .await?;
            reshape::todos(value)
        })
        .await
    }

    /// File changes of a session, optionally limited to one message.
    pub async fn get_session_diff(
        &self,
        session_id: &str,
        message_id: Option<&str>,
    ) -> Option<Vec<FileDiff>> {
        let request = self.session_request(session_id).message(message_id);
        execute_optional("get session diff", async {
            let value = self.call(Operation::Diff, request).await?;
            reshape::diffs(value)
        })
        .await
    }

    /// Sessions forked from or spawned by a session.
    pub async fn get_session_children(&self, session_id: &str) -> Option<Vec<Session>> {
        execute_optional("get session children", async {
            let value = self
                .call(Operation::Children, self.session_request(session_id))
                .await?;
            reshape::sessions(value)
        })
        .await
    }
}
