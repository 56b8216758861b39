//! Core abstractions for remote session operations.
//!
//! This crate provides the fundamental building blocks:
//! - `SessionClient` - The seam to the remote session service
//! - `OperationResult` - Uniform success/error envelope
//! - `WorkspaceContext` - Directory scope pinned onto every request
//! - Session, message, status, todo and diff records

pub mod context;
pub mod envelope;
pub mod traits;
pub mod types;

pub use context::WorkspaceContext;
pub use envelope::OperationResult;
pub use traits::{ClientError, Operation, SessionClient, SessionError, SessionRequest};
pub use types::{
    FileDiff, ForkOutcome, Message, ModelSelector, Session, SessionId, SessionStatus,
    ShareOutcome, Todo,
};
