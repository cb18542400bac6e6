//! Client configuration.
//!
//! A [`ClientConfig`] is fixed when the [`Client`](crate::Client) is built and
//! shared read-only by every call made through it.

use crate::{Error, Result};
use std::fmt;
use std::time::Duration;

/// API version path segment used when none is configured.
pub const DEFAULT_API_VERSION: &str = "latest";
/// Attempts made for a call failing with transient errors.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;
/// Timeout applied to every individual attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Username and password for HTTP basic authentication.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// The TeamCity username.
    pub username: String,
    /// The TeamCity password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials from a username and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Static settings of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server host, optionally with a scheme (`https://` is assumed otherwise).
    pub host: String,
    /// Basic authentication credentials sent with every request.
    pub credentials: Credentials,
    /// Version segment interposed after `/app/rest`; empty means none.
    pub api_version: String,
    /// Attempt budget for transient failures.
    pub max_attempts: u32,
    /// Timeout of each individual attempt.
    pub timeout: Duration,
    /// Optional bound on all attempts of one call together.
    pub deadline: Option<Duration>,
}

impl ClientConfig {
    /// Creates a configuration with default version, retry budget and timeout.
    pub fn new(host: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            host: host.into(),
            credentials,
            api_version: DEFAULT_API_VERSION.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: DEFAULT_TIMEOUT,
            deadline: None,
        }
    }

    /// Reads the configuration from environment variables.
    ///
    /// - `TEAMCITY_HOST` (required)
    /// - `TEAMCITY_USERNAME` and `TEAMCITY_PASSWORD` (required)
    /// - `TEAMCITY_API_VERSION` (optional, defaults to `latest`)
    /// - `TEAMCITY_MAX_ATTEMPTS` (optional, defaults to 8)
    /// - `TEAMCITY_TIMEOUT_SECS` (optional, defaults to 2)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if a required variable is missing or
    /// a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| Error::Configuration(format!("{key} is not set")))
        };

        let mut config = Self::new(
            required("TEAMCITY_HOST")?,
            Credentials::new(required("TEAMCITY_USERNAME")?, required("TEAMCITY_PASSWORD")?),
        );

        if let Some(version) = lookup("TEAMCITY_API_VERSION") {
            config.api_version = version;
        }
        if let Some(attempts) = lookup("TEAMCITY_MAX_ATTEMPTS") {
            config.max_attempts = attempts.trim().parse().map_err(|e| {
                Error::Configuration(format!("TEAMCITY_MAX_ATTEMPTS: {e}"))
            })?;
        }
        if let Some(secs) = lookup("TEAMCITY_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|e| {
                Error::Configuration(format!("TEAMCITY_TIMEOUT_SECS: {e}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// The host as an absolute base URL: trailing `/` removed, `https://`
    /// added when no scheme is given.
    ///
    /// ```
    /// use teamcity_rest::{ClientConfig, Credentials};
    ///
    /// let config = ClientConfig::new("ci.example.com/", Credentials::default());
    /// assert_eq!(config.base_url(), "https://ci.example.com");
    ///
    /// let config = ClientConfig::new("http://localhost:8111", Credentials::default());
    /// assert_eq!(config.base_url(), "http://localhost:8111");
    /// ```
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{host}")
        }
    }

    /// The REST root, `/app/rest` plus the version segment if any.
    pub fn rest_root(&self) -> String {
        let version = self.api_version.trim_matches('/');
        if version.is_empty() {
            "/app/rest".to_string()
        } else {
            format!("/app/rest/{version}")
        }
    }
}
