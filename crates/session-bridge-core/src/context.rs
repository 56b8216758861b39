//! Workspace scope for session operations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Workspace the remote calls are pinned to.
///
/// Every request issued through an adapter carries this directory, so a
/// single remote service can host sessions for several workspaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceContext {
    /// Workspace directory.
    pub directory: PathBuf,
}

impl WorkspaceContext {
    /// Create a context for the given directory.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Context for the process working directory, or `.` when it is unavailable.
    #[must_use]
    pub fn current() -> Self {
        Self::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Workspace directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Directory in the string form sent on the wire.
    #[must_use]
    pub fn directory_string(&self) -> String {
        self.directory.to_string_lossy().into_owned()
    }
}
