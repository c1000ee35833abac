//! Shared test utilities for dusseldorf Rust libraries.
//!
//! This crate provides:
//! - Proptest generators for issuers and claim sets
//! - Mock health checks and credential providers
//! - Test fixtures with sample data

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
