//! Optional parameters for adapter operations.

use serde::{Deserialize, Serialize};

/// Agent used for shell execution when none is given.
pub const DEFAULT_SHELL_AGENT: &str = "build";
/// Provider used for summarization when none is given.
pub const DEFAULT_SUMMARY_PROVIDER: &str = "anthropic";
/// Model used for summarization when none is given.
pub const DEFAULT_SUMMARY_MODEL: &str = "claude-sonnet-4-5";

/// Options for creating a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionOptions {
    pub title: Option<String>,
    /// Create the session as a child of this one.
    pub parent_id: Option<String>,
}

/// Options for initializing a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitOptions {
    pub provider_id: Option<String>,
    pub model_id: Option<String>,
    pub message_id: Option<String>,
}

/// Options for running a slash command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOptions {
    /// Command arguments. Sent as `""` when absent.
    pub arguments: Option<String>,
    pub agent: Option<String>,
    /// Model in `provider/model` form.
    pub model: Option<String>,
}

/// Options for running a shell command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellOptions {
    /// Agent to run under. Defaults to [`DEFAULT_SHELL_AGENT`].
    pub agent: Option<String>,
    pub provider_id: Option<String>,
    pub model_id: Option<String>,
}

/// Options for summarizing a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeOptions {
    /// Defaults to [`DEFAULT_SUMMARY_PROVIDER`].
    pub provider_id: Option<String>,
    /// Defaults to [`DEFAULT_SUMMARY_MODEL`].
    pub model_id: Option<String>,
    /// Mark the summary as automatically triggered.
    pub auto: Option<bool>,
}
