//! HTTP client with retry and rate limiting
//!
//! One client is shared by the account and table services so they see the
//! same cookies and the same cached session secret.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use crate::types::BackoffType;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// When and how long to wait between attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub backoff: BackoffType,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: BackoffType::Exponential,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt + 1`, capped at `max_delay`
    pub fn delay(&self, attempt: u32) -> Duration {
        let delay = match self.backoff {
            BackoffType::Constant => self.initial_delay,
            BackoffType::Linear => self.initial_delay.saturating_mul(attempt + 1),
            BackoffType::Exponential => self
                .initial_delay
                .saturating_mul(2u32.saturating_pow(attempt)),
        };
        delay.min(self.max_delay)
    }
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Prefix for relative paths, e.g. `https://cloud.appwrite.io/v1`
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// `None` disables throttling
    pub rate_limit: Option<RateLimiterConfig>,
    /// Sent with every request (project id, response format)
    pub default_headers: HashMap<String, String>,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            rate_limit: Some(RateLimiterConfig::default()),
            default_headers: HashMap::new(),
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
        }
    }
}

impl HttpClientConfig {
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for [`HttpClientConfig`]
#[derive(Debug, Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.retry.max_retries = retries;
        self
    }

    /// Backoff strategy with its initial and maximum delay
    pub fn backoff(mut self, backoff: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.retry.backoff = backoff;
        self.config.retry.initial_delay = initial;
        self.config.retry.max_delay = max;
        self
    }

    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a header sent with every request
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Per-request options
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters in order; keys may repeat (`queries[]`)
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
    /// Overrides the client retry count for GET/HEAD
    pub max_retries: Option<u32>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }
}

/// Result of a single attempt
enum Attempt {
    Done(Response),
    Retry { delay: Duration, error: Error },
    Fail(Error),
}

/// HTTP client with retry, rate limiting and backend credentials
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Anonymous client
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        Self::with_auth(config, AuthConfig::None)
    }

    /// Client that attaches `auth` to every request.
    ///
    /// The cookie store keeps the backend's session cookie alongside the
    /// cached secret.
    pub fn with_auth(config: HttpClientConfig, auth: AuthConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            rate_limiter: config.rate_limit.as_ref().map(RateLimiter::new),
            authenticator: Authenticator::new(auth),
            config,
        })
    }

    /// Credentials shared by every service using this client
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub async fn delete(&self, url: &str) -> Result<Response> {
        self.request(Method::DELETE, url, RequestConfig::default())
            .await
    }

    /// Send a request, retrying transient failures of GET/HEAD only.
    ///
    /// Writes are sent exactly once. A 429 is retried only when it carries
    /// `Retry-After`; 5xx gateway statuses, timeouts and connect errors are
    /// retried with backoff. Any other 4xx/5xx becomes an error built from
    /// the response body.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        let full_url = self.build_url(url);
        let max_retries = if is_replayable(&method) {
            config.max_retries.unwrap_or(self.config.retry.max_retries)
        } else {
            0
        };
        let mut attempt = 0;

        loop {
            if let Some(limiter) = &self.rate_limiter {
                limiter.wait().await;
            }

            let sent = self.send_once(&method, &full_url, &config).await;
            match self.classify(sent, attempt).await {
                Attempt::Done(response) => {
                    debug!("{method} {full_url} -> {}", response.status().as_u16());
                    return Ok(response);
                }
                Attempt::Fail(error) => {
                    debug!("{method} {full_url} failed: {error}");
                    return Err(error);
                }
                Attempt::Retry { delay, error } if attempt < max_retries => {
                    warn!(
                        "{method} {full_url}: {error}, attempt {}/{}, retrying in {delay:?}",
                        attempt + 1,
                        max_retries + 1
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Attempt::Retry { error, .. } => return Err(error),
            }
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        config: &RequestConfig,
    ) -> reqwest::Result<Response> {
        let mut req = self.client.request(method.clone(), url);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if !config.query.is_empty() {
            req = req.query(&config.query);
        }
        if let Some(body) = &config.body {
            req = req.json(body);
        }

        self.authenticator.apply(req).await.send().await
    }

    async fn classify(
        &self,
        sent: reqwest::Result<Response>,
        attempt: u32,
    ) -> Attempt {
        let response = match sent {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Attempt::Retry {
                    delay: self.calculate_backoff(attempt),
                    error: Error::Timeout {
                        timeout_ms: self.config.timeout.as_millis() as u64,
                    },
                }
            }
            Err(e) if e.is_connect() => {
                return Attempt::Retry {
                    delay: self.calculate_backoff(attempt),
                    error: Error::Http(e),
                }
            }
            Err(e) => return Attempt::Fail(Error::Http(e)),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return match retry_after_secs(&response) {
                Some(wait) => Attempt::Retry {
                    delay: Duration::from_secs(wait),
                    error: Error::RateLimited {
                        retry_after_seconds: wait,
                    },
                },
                None => {
                    let body = response.text().await.unwrap_or_default();
                    Attempt::Fail(Error::from_response(status.as_u16(), &body))
                }
            };
        }
        if !status.is_client_error() && !status.is_server_error() {
            return Attempt::Done(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = Error::from_response(status.as_u16(), &body);
        if error.is_retryable() {
            Attempt::Retry {
                delay: self.calculate_backoff(attempt),
                error,
            }
        } else {
            Attempt::Fail(error)
        }
    }

    /// Send a request and decode the JSON body
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let response = self.request(method, url, config).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::decode(format!("{url}: {e}")))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.request_json(Method::GET, url, RequestConfig::default())
            .await
    }

    pub async fn get_json_with_config<T: DeserializeOwned>(
        &self,
        url: &str,
        config: RequestConfig,
    ) -> Result<T> {
        self.request_json(Method::GET, url, config).await
    }

    /// Send `body` as JSON and decode the JSON response
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Value,
    ) -> Result<T> {
        self.request_json(method, url, RequestConfig::default().json(body))
            .await
    }

    /// Absolute URLs pass through; paths are joined onto the base URL
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        match &self.config.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => path.to_string(),
        }
    }

    /// Backoff delay for a given attempt
    pub(super) fn calculate_backoff(&self, attempt: u32) -> Duration {
        self.config.retry.delay(attempt)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("authenticator", &self.authenticator)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// `Retry-After` in seconds, if present and numeric
fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

/// Methods whose replay cannot duplicate a write
fn is_replayable(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}
