//! Client options.

use std::time::Duration;

use reqwest::Url;

use crate::error::{ConfigError, Result};

/// Now API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.zeit.co/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Identifier sent in the `X-Requested-By` header.
pub const DEFAULT_REQUESTED_BY: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Transport-level options for a [`crate::NowClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL every endpoint path is resolved against.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Value of the `X-Requested-By` header.
    pub requested_by: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        // The constant is a valid absolute URL.
        #[allow(clippy::expect_used)]
        let base_url = Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid");
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            requested_by: DEFAULT_REQUESTED_BY.to_string(),
        }
    }
}

impl ClientOptions {
    /// Sets the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or cannot carry a path.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url)
            .map_err(|e| ConfigError::invalid_option(format!("Invalid base URL '{base_url}': {e}")))?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::invalid_option(format!(
                "Base URL '{base_url}' cannot be used as a base"
            ))
            .into());
        }
        self.base_url = url;
        Ok(self)
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `X-Requested-By` value.
    #[must_use]
    pub fn with_requested_by(mut self, requested_by: impl Into<String>) -> Self {
        self.requested_by = requested_by.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ClientOptions::default();
        assert_eq!(options.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert!(options.requested_by.starts_with("now-client/"));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ClientOptions::default().with_base_url("not a url").is_err());
        assert!(ClientOptions::default().with_base_url("mailto:x@y.z").is_err());
    }

    #[test]
    fn test_custom_base_url() {
        let options = ClientOptions::default()
            .with_base_url("http://127.0.0.1:8080/api/")
            .expect("valid URL");
        assert_eq!(options.base_url.path(), "/api/");
    }
}
