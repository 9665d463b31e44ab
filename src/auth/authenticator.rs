//! Authenticator implementation
//!
//! Applies the configured credentials to outgoing requests.

use super::types::{AuthConfig, Location, API_KEY_HEADER, API_KEY_QUERY_PARAM};
use reqwest::RequestBuilder;

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config {
            AuthConfig::None => req,

            AuthConfig::ApiKey { location, value } => match location {
                Location::Query => req.query(&[(API_KEY_QUERY_PARAM, value.as_str())]),
                Location::Header => req.header(API_KEY_HEADER, value.as_str()),
            },

            AuthConfig::Basic { username, password } => {
                req.basic_auth(username, Some(password))
            }
        }
    }

    /// Get the current auth config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}
