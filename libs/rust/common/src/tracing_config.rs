//! Tracing subscriber setup for services embedding the dusseldorf libraries.
//!
//! Libraries only emit events through `tracing` macros. The service calls
//! [`init_tracing`] once at startup; the filter it installs sets the
//! service's own level and, separately, the level of the library targets so
//! rule derivation (`debug`) and authorization failures (`warn`) can be
//! turned up without flooding the rest of the service.

use std::env;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log targets of the dusseldorf libraries.
pub const LIBRARY_TARGETS: [&str; 3] = ["dusseldorf_common", "dusseldorf_auth", "dusseldorf_health"];

/// Environment variable selecting the output format (`json` or `plain`).
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Environment variable overriding the level of the library targets.
pub const LIBRARY_LOG_LEVEL_ENV: &str = "DUSSELDORF_LOG_LEVEL";

/// Tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Service name attached to the startup event
    pub service_name: String,
    /// Default level for everything outside [`LIBRARY_TARGETS`]
    pub log_level: String,
    /// Level for [`LIBRARY_TARGETS`]
    pub library_log_level: String,
    /// Whether to output JSON format
    pub json_output: bool,
}

impl TracingConfig {
    /// Plain output at `info` for `service_name` and the libraries.
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            log_level: "info".to_string(),
            library_log_level: "info".to_string(),
            json_output: false,
        }
    }

    /// Apply [`LOG_FORMAT_ENV`] and [`LIBRARY_LOG_LEVEL_ENV`] on top of `self`.
    #[must_use]
    pub fn from_env(self) -> Self {
        dotenvy::dotenv().ok();
        self.with_env_values(
            env::var(LOG_FORMAT_ENV).ok().as_deref(),
            env::var(LIBRARY_LOG_LEVEL_ENV).ok().as_deref(),
        )
    }

    fn with_env_values(mut self, format: Option<&str>, library_level: Option<&str>) -> Self {
        match format.map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => self.json_output = true,
            Some(f) if f.eq_ignore_ascii_case("plain") => self.json_output = false,
            _ => {}
        }
        if let Some(level) = library_level.map(str::trim).filter(|l| !l.is_empty()) {
            self.library_log_level = level.to_string();
        }
        self
    }

    /// Set the service level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the library level.
    #[must_use]
    pub fn with_library_log_level(mut self, level: impl Into<String>) -> Self {
        self.library_log_level = level.into();
        self
    }

    /// Enable JSON output.
    #[must_use]
    pub const fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    /// Filter directives used when `RUST_LOG` is unset.
    ///
    /// `debug` with library level `warn` renders as
    /// `debug,dusseldorf_common=warn,dusseldorf_auth=warn,dusseldorf_health=warn`.
    #[must_use]
    pub fn directives(&self) -> String {
        LIBRARY_TARGETS.iter().fold(self.log_level.clone(), |acc, target| {
            format!("{acc},{target}={}", self.library_log_level)
        })
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over [`TracingConfig::directives`]. Returns `false` if a
/// subscriber was already installed, in which case nothing changes.
pub fn init_tracing(config: &TracingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.directives()));

    let initialized = if config.json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    }
    .is_ok();

    if initialized {
        tracing::info!(
            service = %config.service_name,
            libraries = %config.library_log_level,
            "tracing initialized"
        );
    }
    initialized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_scope_library_targets() {
        let config = TracingConfig::new("k9-sak")
            .with_log_level("warn")
            .with_library_log_level("debug");

        assert_eq!(
            config.directives(),
            "warn,dusseldorf_common=debug,dusseldorf_auth=debug,dusseldorf_health=debug"
        );
        assert!(EnvFilter::try_new(config.directives()).is_ok());
    }

    #[test]
    fn test_env_values() {
        let config = TracingConfig::new("k9-sak").with_env_values(Some("JSON"), Some(" debug "));
        assert!(config.json_output);
        assert_eq!(config.library_log_level, "debug");

        let config = config.with_env_values(Some("plain"), Some(""));
        assert!(!config.json_output);
        assert_eq!(config.library_log_level, "debug");

        let unchanged = TracingConfig::new("k9-sak").with_env_values(Some("yaml"), None);
        assert_eq!(unchanged, TracingConfig::new("k9-sak"));
    }

    #[test]
    fn test_second_init_is_rejected() {
        let config = TracingConfig::new("k9-sak");
        init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
