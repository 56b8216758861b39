//! Mapping of session operations onto the REST API.

use reqwest::Method;
use session_bridge_core::{ClientError, Operation};

/// HTTP method and path template for an operation.
///
/// `{id}` in the template stands for the session id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub template: &'static str,
}

impl Route {
    fn new(method: Method, template: &'static str) -> Self {
        Self { method, template }
    }

    /// Route serving `operation`.
    #[must_use]
    pub fn of(operation: Operation) -> Self {
        match operation {
            Operation::Create => Self::new(Method::POST, "/session"),
            Operation::List => Self::new(Method::GET, "/session"),
            Operation::Status => Self::new(Method::GET, "/session/status"),
            Operation::Get => Self::new(Method::GET, "/session/{id}"),
            Operation::Messages => Self::new(Method::GET, "/session/{id}/message"),
            Operation::Delete => Self::new(Method::DELETE, "/session/{id}"),
            Operation::Update => Self::new(Method::PATCH, "/session/{id}"),
            Operation::Abort => Self::new(Method::POST, "/session/{id}/abort"),
            Operation::Todo => Self::new(Method::GET, "/session/{id}/todo"),
            Operation::Diff => Self::new(Method::GET, "/session/{id}/diff"),
            Operation::Children => Self::new(Method::GET, "/session/{id}/children"),
            Operation::Init => Self::new(Method::POST, "/session/{id}/init"),
            Operation::Command => Self::new(Method::POST, "/session/{id}/command"),
            Operation::Shell => Self::new(Method::POST, "/session/{id}/shell"),
            Operation::Summarize => Self::new(Method::POST, "/session/{id}/summarize"),
            Operation::Share => Self::new(Method::POST, "/session/{id}/share"),
            Operation::Unshare => Self::new(Method::DELETE, "/session/{id}/share"),
            Operation::Revert => Self::new(Method::POST, "/session/{id}/revert"),
            Operation::Unrevert => Self::new(Method::POST, "/session/{id}/unrevert"),
            Operation::Fork => Self::new(Method::POST, "/session/{id}/fork"),
        }
    }

    /// Whether the method carries a request body.
    #[must_use]
    pub fn has_body(&self) -> bool {
        self.method == Method::POST || self.method == Method::PATCH
    }

    /// Concrete path with the session id filled in.
    ///
    /// # Errors
    /// Returns error if the template needs a session id and none was given.
    pub fn path(&self, session_id: Option<&str>) -> Result<String, ClientError> {
        if !self.template.contains("{id}") {
            return Ok(self.template.to_string());
        }
        let id = session_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ClientError::Transport(format!("{} requires a session id", self.template)))?;
        Ok(self.template.replace("{id}", &urlencoding::encode(id)))
    }
}
