//! Execution helpers for the three failure-reporting modes.
//!
//! Every adapter operation runs through exactly one of these:
//! - [`execute`] captures failures into an [`OperationResult`]
//! - [`execute_or_raise`] logs and propagates the error
//! - [`execute_optional`] logs and collapses failures into `None`

use std::future::Future;

use session_bridge_core::{OperationResult, SessionError};

/// Run `operation`, reporting failure through the envelope.
pub async fn execute<T, F>(description: &str, operation: F) -> OperationResult<T>
where
    F: Future<Output = Result<OperationResult<T>, SessionError>>,
{
    tracing::debug!(operation = description, "dispatching");
    match operation.await {
        Ok(result) => {
            if let Some(error) = result.error() {
                tracing::warn!(operation = description, "{error}");
            }
            result
        }
        Err(e) => {
            tracing::warn!(operation = description, "Failed: {e}");
            OperationResult::failure(e.to_string())
        }
    }
}

/// Run `operation`, propagating failure to the caller.
///
/// # Errors
/// Returns whatever error `operation` produced.
pub async fn execute_or_raise<T, F>(description: &str, operation: F) -> Result<T, SessionError>
where
    F: Future<Output = Result<T, SessionError>>,
{
    tracing::debug!(operation = description, "dispatching");
    operation.await.inspect_err(|e| {
        tracing::warn!(operation = description, "Failed: {e}");
    })
}

/// Run `operation`, discarding failure detail after logging it.
pub async fn execute_optional<T, F>(description: &str, operation: F) -> Option<T>
where
    F: Future<Output = Result<T, SessionError>>,
{
    tracing::debug!(operation = description, "dispatching");
    match operation.await {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(operation = description, "Failed, returning nothing: {e}");
            None
        }
    }
}
