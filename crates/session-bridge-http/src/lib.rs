//! HTTP transport for the remote session service.
//!
//! Provides:
//! - `HttpSessionClient` - `SessionClient` over the service's REST API
//! - `HttpClientConfig` - Base URL and timeout, with environment overrides
//! - Route table mapping operations to HTTP methods and paths

pub mod client;
pub mod config;
pub mod routes;

pub use client::HttpSessionClient;
pub use config::{ConfigError, HttpClientConfig};
pub use routes::Route;
