//! Centralized error type for the dusseldorf libraries.
//!
//! Covers the faults raised while building outbound clients and talking to
//! the system credentials endpoint. Nothing here is retried.

use thiserror::Error;

/// Common error type for platform operations.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// HTTP client could not be built or a request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A dependency could not be reached
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PlatformError {
    /// Create an unavailable error with the given message.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an invalid input error with the given message.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlatformError::unavailable("azure token endpoint");
        assert_eq!(err.to_string(), "Service unavailable: azure token endpoint");

        let err = PlatformError::invalid_input("proxy url");
        assert_eq!(err.to_string(), "Invalid input: proxy url");
    }
}
