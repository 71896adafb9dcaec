//! Client settings
//!
//! [`SdkConfig`] is a plain value built with chained `with_*` calls and
//! checked once by [`SdkConfig::validate`] when a client is created.

use crate::error::{SdkError, SdkResult};
use std::time::Duration;

/// Name of the cookie carrying the session token issued by the auth provider
pub const DEFAULT_SESSION_COOKIE: &str = "better-auth.session_token";

/// Quiet period before a listing request is sent
pub const DEFAULT_LISTING_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// Origin of the web application; API routes live under `/api`
    pub base_url: String,

    pub auth: AuthConfig,

    /// Whole-request deadline
    pub timeout: Duration,

    pub connect_timeout: Duration,

    /// Extra attempts after a transient failure. Zero means failures reach
    /// the caller straight away.
    pub max_retries: u32,

    /// First retry delay; doubled per attempt
    pub retry_initial_backoff: Duration,

    /// Ceiling for the doubled retry delay
    pub retry_max_backoff: Duration,

    pub user_agent: String,

    /// Log request and response bodies at debug level
    pub enable_logging: bool,

    /// Sent with every request, in insertion order
    pub custom_headers: Vec<(String, String)>,

    /// Cookie name used for [`AuthConfig::SessionToken`]
    pub session_cookie: String,

    /// Debounce window of the recipe listing
    pub listing_debounce: Duration,

    /// Object store endpoint for image uploads
    pub blob_base_url: Option<String>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            auth: AuthConfig::None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_retries: 0,
            retry_initial_backoff: Duration::from_millis(100),
            retry_max_backoff: Duration::from_secs(30),
            user_agent: format!("recipe-share-sdk/{}", env!("CARGO_PKG_VERSION")),
            enable_logging: false,
            custom_headers: Vec::new(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            listing_debounce: DEFAULT_LISTING_DEBOUNCE,
            blob_base_url: None,
        }
    }
}

impl SdkConfig {
    /// Defaults pointed at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Authenticate with the session cookie
    pub fn with_session_token(self, token: impl Into<String>) -> Self {
        self.with_auth(AuthConfig::SessionToken(token.into()))
    }

    pub fn with_bearer_token(self, token: impl Into<String>) -> Self {
        self.with_auth(AuthConfig::BearerToken(token.into()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// First delay and ceiling of the retry backoff
    pub fn with_retry_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.retry_initial_backoff = initial;
        self.retry_max_backoff = max.max(initial);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    pub fn with_session_cookie(mut self, name: impl Into<String>) -> Self {
        self.session_cookie = name.into();
        self
    }

    pub fn with_listing_debounce(mut self, window: Duration) -> Self {
        self.listing_debounce = window;
        self
    }

    pub fn with_blob_base_url(mut self, url: impl Into<String>) -> Self {
        self.blob_base_url = Some(url.into());
        self
    }

    /// Reject settings no client could work with
    pub fn validate(&self) -> SdkResult<()> {
        let invalid = |message: &str| Err(SdkError::ConfigurationError(message.to_string()));

        if self.base_url.trim().is_empty() {
            return invalid("base URL is empty");
        }
        url::Url::parse(&self.base_url)?;

        if let Some(blob) = &self.blob_base_url {
            url::Url::parse(blob)?;
        }
        if self.timeout.is_zero() {
            return invalid("request timeout must be greater than zero");
        }
        if self.session_cookie.trim().is_empty() {
            return invalid("session cookie name is empty");
        }

        Ok(())
    }
}

/// How requests identify the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthConfig {
    /// Anonymous browsing
    None,

    /// Session token issued by the auth provider, sent as a cookie
    SessionToken(String),

    /// Sent as `Authorization: Bearer`
    BearerToken(String),
}

impl AuthConfig {
    pub fn is_configured(&self) -> bool {
        self.token().is_some()
    }

    /// The token value, whatever the transport
    pub fn token(&self) -> Option<&str> {
        match self {
            AuthConfig::None => None,
            AuthConfig::SessionToken(token) | AuthConfig::BearerToken(token) => Some(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SdkConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.listing_debounce, Duration::from_millis(500));
        assert_eq!(config.session_cookie, DEFAULT_SESSION_COOKIE);
        assert!(!config.auth.is_configured());
    }

    #[test]
    fn test_chained_settings() {
        let config = SdkConfig::new("https://recepti.example.com")
            .with_session_token("tok")
            .with_timeout(Duration::from_secs(60))
            .with_retry_backoff(Duration::from_secs(2), Duration::from_secs(1));

        assert_eq!(config.base_url, "https://recepti.example.com");
        assert_eq!(config.auth, AuthConfig::SessionToken("tok".to_string()));
        assert_eq!(config.auth.token(), Some("tok"));
        assert_eq!(config.retry_max_backoff, Duration::from_secs(2));
    }

    #[test]
    fn test_validation_failures() {
        assert!(SdkConfig::new("").validate().is_err());
        assert!(SdkConfig::new("not a url").validate().is_err());
        assert!(SdkConfig::new("https://recepti.example.com")
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
        assert!(SdkConfig::new("https://recepti.example.com")
            .with_blob_base_url("::")
            .validate()
            .is_err());
        assert!(SdkConfig::new("https://recepti.example.com").validate().is_ok());
    }
}
