//! HTTP transport shared by the resource clients
//!
//! Attaches the session cookie (or bearer token), retries transient failures
//! when `max_retries` allows it, and decodes JSON bodies. Retries are off by
//! default.

use crate::config::{AuthConfig, SdkConfig};
use crate::error::{SdkError, SdkResult};
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Wait used when a 429 carries no usable `Retry-After`
const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

/// The HTTP client for making API requests
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: Arc<SdkConfig>,
}

/// Result of sending a request once
enum Attempt {
    Done(Response),
    /// Retryable status. Handed back unchanged once retries run out so the
    /// caller still sees the server's error body.
    RetryStatus(Response, Option<Duration>),
    RetryError(SdkError),
    Fail(SdkError),
}

impl HttpClient {
    pub fn new(config: SdkConfig) -> SdkResult<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        for (name, value) in &config.custom_headers {
            match (
                header::HeaderName::try_from(name.as_str()),
                header::HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "Skipping invalid custom header"),
            }
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(SdkError::NetworkError)?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Join `path` onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> SdkResult<T> {
        self.send_json(Method::GET, path, None::<&()>, None::<&()>).await
    }

    /// GET where a 404 or a JSON `null` body means "absent"
    pub async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> SdkResult<Option<T>> {
        match self.get::<Option<T>>(path).await {
            Err(SdkError::NotFound { .. }) => Ok(None),
            other => other,
        }
    }

    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> SdkResult<T> {
        self.send_json(Method::GET, path, None::<&()>, Some(query)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: B) -> SdkResult<T> {
        self.send_json(Method::POST, path, Some(&body), None::<&()>).await
    }

    /// POST with no request body, e.g. toggles
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> SdkResult<T> {
        self.send_json(Method::POST, path, None::<&()>, None::<&()>).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: B) -> SdkResult<T> {
        self.send_json(Method::PUT, path, Some(&body), None::<&()>).await
    }

    /// DELETE; the response body is ignored on success
    pub async fn delete(&self, path: &str) -> SdkResult<()> {
        let response = self
            .send(Method::DELETE, path, None::<&()>, None::<&()>)
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.map_err(SdkError::NetworkError)?;
        Err(self.error_for(status, &text))
    }

    async fn send_json<T, B, Q>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: Option<&Q>,
    ) -> SdkResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
        Q: Serialize + ?Sized,
    {
        let response = self.send(method, path, body, query).await?;
        let status = response.status();
        let text = response.text().await.map_err(SdkError::NetworkError)?;

        if self.config.enable_logging {
            debug!(status = status.as_u16(), body = %text, "Response received");
        }

        if status.is_success() {
            serde_json::from_str(&text).map_err(SdkError::SerializationError)
        } else {
            Err(self.error_for(status, &text))
        }
    }

    /// Send with up to `max_retries` further attempts on timeouts, connection
    /// errors, 429 and 5xx. The delay doubles per attempt up to
    /// `retry_max_backoff`; a 429 waits for its `Retry-After` instead.
    async fn send<B, Q>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: Option<&Q>,
    ) -> SdkResult<Response>
    where
        B: Serialize + ?Sized,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path);
        let body = body.map(serde_json::to_string).transpose()?;
        let max_retries = self.config.max_retries;
        let mut delay = self.config.retry_initial_backoff;
        let mut retries = 0;

        loop {
            let (wait, reason) = match self.attempt(&method, &url, body.as_deref(), query).await {
                Attempt::Done(response) => return Ok(response),
                Attempt::Fail(error) => return Err(error),
                Attempt::RetryStatus(response, _) if retries >= max_retries => return Ok(response),
                Attempt::RetryError(error) if retries >= max_retries => return Err(error),
                Attempt::RetryStatus(response, wait) => (wait, response.status().to_string()),
                Attempt::RetryError(error) => (None, error.to_string()),
            };

            retries += 1;
            let wait = wait.unwrap_or(delay);
            warn!(
                %method,
                url = %url,
                retry = retries,
                max_retries,
                wait_ms = wait.as_millis() as u64,
                reason = %reason,
                "Retrying request"
            );
            tokio::time::sleep(wait).await;
            delay = (delay * 2).min(self.config.retry_max_backoff);
        }
    }

    async fn attempt<Q: Serialize + ?Sized>(
        &self,
        method: &Method,
        url: &str,
        body: Option<&str>,
        query: Option<&Q>,
    ) -> Attempt {
        let mut request = self.authorize(self.client.request(method.clone(), url));
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.body(body.to_owned());
        }
        if self.config.enable_logging {
            debug!(%method, url, body = body.unwrap_or(""), "Sending request");
        }

        match request.send().await {
            Ok(response) if response.status() == StatusCode::TOO_MANY_REQUESTS => {
                let wait = retry_after(&response);
                warn!(url, retry_after_secs = wait.as_secs(), "Rate limited");
                Attempt::RetryStatus(response, Some(wait))
            }
            Ok(response) if response.status().is_server_error() => {
                Attempt::RetryStatus(response, None)
            }
            Ok(response) => Attempt::Done(response),
            Err(e) => {
                error!(url, error = %e, "Request failed");
                if e.is_timeout() {
                    Attempt::RetryError(SdkError::Timeout(self.config.timeout.as_secs()))
                } else if e.is_connect() || e.is_request() {
                    Attempt::RetryError(SdkError::NetworkError(e))
                } else {
                    Attempt::Fail(SdkError::NetworkError(e))
                }
            }
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.auth {
            AuthConfig::None => request,
            AuthConfig::SessionToken(token) => request.header(
                header::COOKIE,
                format!("{}={}", self.config.session_cookie, token),
            ),
            AuthConfig::BearerToken(token) => request.bearer_auth(token),
        }
    }

    /// Map a failed response. Empty bodies get a generic message per class.
    fn error_for(&self, status: StatusCode, body: &str) -> SdkError {
        if !body.trim().is_empty() {
            return SdkError::from_response(status.as_u16(), body);
        }
        match status {
            StatusCode::UNAUTHORIZED => {
                SdkError::AuthenticationError("Invalid or missing session".to_string())
            }
            StatusCode::FORBIDDEN => SdkError::AuthorizationError("Access denied".to_string()),
            s if s.is_server_error() => SdkError::ServerError(format!("Server error: {}", s)),
            _ => SdkError::from_response(status.as_u16(), body),
        }
    }
}

fn retry_after(response: &Response) -> Duration {
    response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RATE_LIMIT_WAIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = HttpClient::new(SdkConfig::new("https://recepti.example.com/")).unwrap();

        assert_eq!(
            client.url("/api/recipes"),
            "https://recepti.example.com/api/recipes"
        );
        assert_eq!(
            client.url("api/categories"),
            "https://recepti.example.com/api/categories"
        );
    }

    #[test]
    fn test_empty_error_bodies() {
        let client = HttpClient::new(SdkConfig::default()).unwrap();

        assert!(matches!(
            client.error_for(StatusCode::UNAUTHORIZED, ""),
            SdkError::AuthenticationError(_)
        ));
        assert!(matches!(
            client.error_for(StatusCode::BAD_GATEWAY, " "),
            SdkError::ServerError(_)
        ));
        assert!(client.error_for(StatusCode::NOT_FOUND, "").is_not_found());
    }
}
