//! Centralized outbound HTTP client configuration and building.
//!
//! Health probes and other outbound calls share one way of building a
//! `reqwest` client so timeouts and proxy routing stay consistent.

use crate::error::PlatformError;
use reqwest::{Client, ClientBuilder, Proxy};
use std::env;
use std::time::Duration;
use url::Url;

/// Environment variable holding an optional outbound proxy.
pub const PROXY_URL_ENV: &str = "PROXY_URL";

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Total request timeout (default: 30s)
    pub timeout: Duration,
    /// Connection timeout (default: 10s)
    pub connect_timeout: Duration,
    /// Max idle time between reads on the socket (default: 10s)
    pub read_timeout: Duration,
    /// Pool idle timeout (default: 90s)
    pub pool_idle_timeout: Duration,
    /// Optional proxy all requests are routed through
    pub proxy: Option<Url>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            proxy: None,
            user_agent: "dusseldorf-rust/1.0".to_string(),
        }
    }
}

impl HttpConfig {
    /// Preset used by health probes: 2s to connect, 2s between packets.
    ///
    /// The total timeout is the sum of both so a probe can never hang.
    #[must_use]
    pub fn health_check() -> Self {
        Self::default()
            .with_connect_timeout(Duration::from_millis(2_000))
            .with_read_timeout(Duration::from_millis(2_000))
            .with_timeout(Duration::from_millis(4_000))
    }

    /// Apply environment overrides on top of `self`.
    ///
    /// Reads `.env` if present, then [`PROXY_URL_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidInput`] if the proxy is not a valid URL.
    pub fn from_env(self) -> Result<Self, PlatformError> {
        dotenvy::dotenv().ok();
        self.with_proxy_value(env::var(PROXY_URL_ENV).ok().as_deref())
    }

    /// Blank or absent leaves the config untouched.
    fn with_proxy_value(self, raw: Option<&str>) -> Result<Self, PlatformError> {
        match raw.map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                let proxy = Url::parse(raw).map_err(|e| {
                    PlatformError::invalid_input(format!("{PROXY_URL_ENV}: {e}"))
                })?;
                Ok(self.with_proxy(proxy))
            }
            _ => Ok(self),
        }
    }

    /// Create a new HTTP config with custom timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create a new HTTP config with custom connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Create a new HTTP config with custom read timeout.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Route every request through the given proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy: Url) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Create a new HTTP config with custom user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns an error if the proxy is rejected or the client cannot be built
/// (e.g., TLS initialization fails).
///
/// # Examples
///
/// ```
/// use dusseldorf_common::{HttpConfig, build_http_client};
///
/// let client = build_http_client(&HttpConfig::health_check());
/// assert!(client.is_ok());
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, PlatformError> {
    let mut builder = ClientBuilder::new()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .read_timeout(config.read_timeout)
        .pool_idle_timeout(config.pool_idle_timeout)
        .user_agent(&config.user_agent)
        .use_rustls_tls();

    if let Some(proxy) = &config.proxy {
        tracing::debug!(proxy = %proxy, "routing outbound requests through proxy");
        builder = builder.proxy(Proxy::all(proxy.as_str())?);
    }

    Ok(builder.build()?)
}
