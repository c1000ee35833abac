//! Shared building blocks for dusseldorf Rust services.
//!
//! This crate provides centralized implementations for:
//! - The shared platform error type
//! - Outbound HTTP client configuration and building
//! - Tracing subscriber setup
//! - Correlation id verification and generation
//! - Problem-details error payloads

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod call_id;
pub mod error;
pub mod http;
pub mod problem;
pub mod tracing_config;

pub use call_id::{generate_call_id, resolve_call_id, verify_call_id};
pub use error::PlatformError;
pub use http::{HttpConfig, build_http_client};
pub use problem::{InvalidParameter, ParameterType, ProblemDetails};
pub use tracing_config::{TracingConfig, init_tracing};
