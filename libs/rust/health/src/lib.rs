//! Health probes and their aggregation.
//!
//! This crate provides:
//! - [`HealthResult`], the tagged outcome of one probe
//! - [`HealthCheck`], the probe capability
//! - Standard probes for system credentials and downstream HTTP dependencies
//! - [`HealthAggregator`], which runs probes concurrently into a
//!   [`HealthReport`] for the health route

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregator;
pub mod check;
pub mod credentials;
pub mod error;
pub mod http;
pub mod result;

pub use aggregator::{HealthAggregator, HealthReport, aggregate};
pub use check::HealthCheck;
pub use credentials::{CredentialsProviderHealthCheck, SystemCredentialsProvider};
pub use error::HealthError;
pub use http::{DependencyResponse, HttpDependencyHealthCheck};
pub use result::{HealthResult, ResultMap};
