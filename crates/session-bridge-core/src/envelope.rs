//! Uniform success/error envelope for reporting-mode operations.

use serde::Serialize;

/// Message used when a failure arrives without any detail.
const UNKNOWN_ERROR: &str = "Unknown error";

/// Outcome of an operation that reports failure instead of returning `Err`.
///
/// `error` is set iff the operation failed, and `data` is only ever set on
/// success. Fields are private so that only the constructors below can
/// produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult<T = ()> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl OperationResult<()> {
    /// Successful outcome without extra data.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }
}

impl<T> OperationResult<T> {
    /// Successful outcome carrying `data`.
    #[must_use]
    pub fn ok_with(data: T) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    /// Failed outcome. An empty message is replaced with a generic one.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            error
        };
        Self {
            success: false,
            error: Some(error),
            data: None,
        }
    }

    /// Whether the operation succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Failure message, if the operation failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Success data, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Consume the envelope, yielding the success data.
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Map the success data.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OperationResult<U> {
        OperationResult {
            success: self.success,
            error: self.error,
            data: self.data.map(f),
        }
    }

    /// Convert into a `Result`, with the failure message as the error.
    ///
    /// # Errors
    /// Returns the failure message if the operation failed.
    pub fn into_result(self) -> Result<Option<T>, String> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.data),
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for OperationResult<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok_with(data),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}
