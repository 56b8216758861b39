//! Session operations adapter for remote agents.
//!
//! Provides:
//! - `SessionAdapter` - One method per remote session operation
//! - Execution helpers for the three failure-reporting modes
//! - Response reshaping into local records
//! - Client implementations (memory)

pub mod adapter;
pub mod client;
pub mod executor;
pub mod options;
pub mod reshape;

pub use adapter::SessionAdapter;
pub use options::{CommandOptions, CreateSessionOptions, InitOptions, ShellOptions, SummarizeOptions};

#[cfg(feature = "memory")]
pub use client::MemoryClient;
