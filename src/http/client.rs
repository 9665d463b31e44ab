//! HTTP client with retry and status mapping
//!
//! Provides the transport used against real servers. It handles:
//! - Automatic retries with configurable backoff
//! - Authentication on every request
//! - Mapping of error statuses to typed errors

use super::transport::{ApiRequest, Transport};
use crate::auth::{AuthConfig, Authenticator};
use crate::codec::parse_error_list;
use crate::error::{Error, Result};
use crate::types::BackoffType;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Content type of request bodies
const XML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            default_headers: HashMap::new(),
            user_agent: format!("redmine-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP transport with retry and authentication
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
}

impl HttpClient {
    /// Create a new anonymous HTTP client
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        Self::with_auth(config, AuthConfig::None)
    }

    /// Create a client with authentication
    pub fn with_auth(config: HttpClientConfig, auth_config: AuthConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            authenticator: Authenticator::new(auth_config),
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    fn prepare(&self, request: &ApiRequest, url: &str, authenticate: bool) -> RequestBuilder {
        let mut req = self.client.request(request.method.into(), url);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if !request.query.is_empty() {
            req = req.query(request.query.as_pairs());
        }

        if let Some(ref body) = request.body {
            req = req
                .header(CONTENT_TYPE, XML_CONTENT_TYPE)
                .body(body.clone());
        }

        if authenticate {
            self.authenticator.apply(req)
        } else {
            req
        }
    }

    /// Whether an absolute URL points at the configured server
    fn is_same_origin(&self, url: &str) -> bool {
        let Some(base) = self.config.base_url.as_deref() else {
            return false;
        };
        match (Url::parse(base), Url::parse(url)) {
            (Ok(base), Ok(target)) => base.origin() == target.origin(),
            _ => false,
        }
    }

    /// Send a request, retrying transient failures
    ///
    /// Returns the response of the last attempt whatever its status; error
    /// statuses are mapped by the caller.
    async fn execute(
        &self,
        request: &ApiRequest,
        url: &str,
        authenticate: bool,
    ) -> Result<Response> {
        let max_retries = self.config.max_retries;
        let mut attempt = 0;

        loop {
            let can_retry = attempt < max_retries;
            let (delay, reason) = match self.prepare(request, url, authenticate).send().await {
                Ok(response) => {
                    let status = response.status();
                    if !can_retry || !is_retryable_status(status) {
                        debug!("{} {} -> {}", request.method, url, status.as_u16());
                        return Ok(response);
                    }
                    let delay = match status {
                        StatusCode::TOO_MANY_REQUESTS => retry_after(&response)
                            .unwrap_or_else(|| self.calculate_backoff(attempt)),
                        _ => self.calculate_backoff(attempt),
                    };
                    (delay, format!("status {}", status.as_u16()))
                }
                Err(e) => {
                    let err = self.transport_error(e, url);
                    if !can_retry || !err.is_retryable() {
                        return Err(err);
                    }
                    (self.calculate_backoff(attempt), err.to_string())
                }
            };

            warn!(
                "Request to {} failed ({}), attempt {}/{}, retrying in {:?}",
                url,
                reason,
                attempt + 1,
                max_retries + 1,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Classify a failed send
    fn transport_error(&self, e: reqwest::Error, url: &str) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else if e.is_connect() {
            Error::communication(format!("cannot reach {url}: {e}"))
        } else {
            Error::Http(e)
        }
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff * factor
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: ApiRequest) -> Result<String> {
        let url = self.build_url(&request.path);
        let response = self.execute(&request, &url, true).await?;
        let status = response.status();
        let body = response.text().await?;
        check_status(status, &url, body)
    }

    /// Credentials are only sent when the URL is on the configured server
    async fn download(&self, url: &str) -> Result<Bytes> {
        let url = self.build_url(url);
        let authenticate = self.is_same_origin(&url);
        if !authenticate {
            debug!("Downloading {} without credentials", url);
        }
        let request = ApiRequest::get(url.clone());
        let response = self.execute(&request, &url, authenticate).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.bytes().await?);
        }
        let body = response.text().await.unwrap_or_default();
        check_status(status, &url, body).map(Bytes::from)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("authenticator", &self.authenticator)
            .finish_non_exhaustive()
    }
}

/// Turn a final response status into the body or a typed error
fn check_status(status: StatusCode, url: &str, body: String) -> Result<String> {
    match status {
        s if s.is_success() => Ok(body),
        StatusCode::UNAUTHORIZED => Err(Error::auth(format!(
            "credentials rejected for {url}; check the API key or login/password"
        ))),
        StatusCode::FORBIDDEN => Err(Error::Forbidden {
            message: format!("not allowed to access {url}"),
        }),
        StatusCode::NOT_FOUND => Err(Error::not_found(url)),
        StatusCode::UNPROCESSABLE_ENTITY => {
            let errors = parse_error_list(&body);
            if errors.is_empty() {
                Err(Error::http_status(status.as_u16(), body))
            } else {
                Err(Error::Processing { errors })
            }
        }
        _ => Err(Error::http_status(status.as_u16(), body)),
    }
}

/// Check if an HTTP status is retryable
fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status.as_u16(),
        429 | 500 | 502 | 503 | 504 | 520 | 521 | 522 | 523 | 524
    )
}

/// Delay requested by a `Retry-After` header given in seconds
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .map(Duration::from_secs)
}
