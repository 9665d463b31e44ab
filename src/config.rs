//! Client configuration
//!
//! This module contains the configuration structures used to set up a
//! [`RedmineManager`] from YAML.
//!
//! ```yaml
//! base_url: "https://redmine.example.com"
//! api_key: "0123456789abcdef"
//! objects_per_page: 50
//! dialect: redmine-1.1
//! http:
//!   timeout_seconds: 30
//!   max_retries: 3
//! ```

use crate::auth::{AuthConfig, Location};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::manager::{RedmineManager, DEFAULT_OBJECTS_PER_PAGE};
use crate::types::{BackoffType, Dialect, OptionStringExt};
use crate::uri;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

// ============================================================================
// Top-Level Client Config
// ============================================================================

/// Complete client configuration loaded from YAML
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server address including protocol and port
    #[serde(default)]
    pub base_url: String,

    /// API access key (My account > API access key)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Where to send the API key
    #[serde(default)]
    pub api_key_location: Location,

    /// Login for HTTP Basic authentication
    #[serde(default)]
    pub username: Option<String>,

    /// Password for HTTP Basic authentication
    #[serde(default)]
    pub password: Option<String>,

    /// Objects requested per list request
    #[serde(default = "default_objects_per_page")]
    pub objects_per_page: usize,

    /// Pagination dialect: `offset_limit` (default) or `page_number`
    #[serde(default)]
    pub dialect: Option<String>,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_objects_per_page() -> usize {
    DEFAULT_OBJECTS_PER_PAGE
}

impl ClientConfig {
    /// Anonymous configuration for the given server
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            api_key_location: Location::default(),
            username: None,
            password: None,
            objects_per_page: DEFAULT_OBJECTS_PER_PAGE,
            dialect: None,
            http: HttpConfig::default(),
        }
    }

    /// Load and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::load_unvalidated(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file without validating it
    ///
    /// Used when further overrides are merged before [`ClientConfig::validate`].
    pub fn load_unvalidated(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Parse and validate a YAML configuration
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration without contacting the server
    pub fn validate(&self) -> Result<()> {
        uri::parse_base_url(&self.base_url)?;

        if self.objects_per_page == 0 {
            return Err(Error::invalid_value(
                "objects_per_page",
                "page size must be greater than zero",
            ));
        }

        self.dialect()?;

        let has_key = self.api_key.clone().none_if_empty().is_some();
        let has_login = self.username.clone().none_if_empty().is_some();
        if has_key && has_login {
            return Err(Error::config(
                "api_key and username are mutually exclusive; configure one of them",
            ));
        }
        if self.password.is_some() && !has_login {
            return Err(Error::missing_field("username"));
        }

        Ok(())
    }

    /// Pagination dialect, parsed from its configured name
    pub fn dialect(&self) -> Result<Dialect> {
        match self.dialect.clone().none_if_empty() {
            Some(name) => name.parse(),
            None => Ok(Dialect::default()),
        }
    }

    /// Credentials to send with every request
    pub fn auth_config(&self) -> AuthConfig {
        if let Some(key) = self.api_key.clone().none_if_empty() {
            return match self.api_key_location {
                Location::Query => AuthConfig::api_key(key),
                Location::Header => AuthConfig::api_key_header(key),
            };
        }
        match self.username.clone().none_if_empty() {
            Some(username) => AuthConfig::basic(username, self.password.clone().unwrap_or_default()),
            None => AuthConfig::None,
        }
    }

    /// HTTP client settings
    pub fn http_config(&self) -> Result<HttpClientConfig> {
        let url = uri::parse_base_url(&self.base_url)?;
        let backoff = &self.http.retry_backoff;
        Ok(HttpClientConfig::builder()
            .base_url(url.as_str())
            .timeout(Duration::from_secs(self.http.timeout_seconds))
            .max_retries(self.http.max_retries)
            .backoff(
                backoff.backoff_type,
                Duration::from_millis(backoff.initial_ms),
                Duration::from_millis(backoff.max_ms),
            )
            .build())
    }

    /// Build a manager talking to the configured server
    pub fn build_manager(&self) -> Result<RedmineManager> {
        self.validate()?;
        let client = HttpClient::with_auth(self.http_config()?, self.auth_config())?;
        RedmineManager::new(client)
            .with_dialect(self.dialect()?)
            .with_objects_per_page(self.objects_per_page)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("api_key_location", &self.api_key_location)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("objects_per_page", &self.objects_per_page)
            .field("dialect", &self.dialect)
            .field("http", &self.http)
            .finish()
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Retry backoff configuration
    #[serde(default)]
    pub retry_backoff: BackoffConfig,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            retry_backoff: BackoffConfig::default(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

/// Backoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    100
}

fn default_max_ms() -> u64 {
    60000
}
