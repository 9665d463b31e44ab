//! Auth configuration types

use serde::{Deserialize, Serialize};

/// Query parameter Redmine reads the API access key from
pub const API_KEY_QUERY_PARAM: &str = "key";

/// Header Redmine reads the API access key from
pub const API_KEY_HEADER: &str = "X-Redmine-API-Key";

/// Location for API key placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Place in query parameter
    #[default]
    Query,
    /// Place in HTTP header
    Header,
}

/// Authentication configuration
#[derive(Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// Anonymous access (public projects)
    #[default]
    None,

    /// API access key from the "My account" page
    ApiKey {
        /// Where to place the API key
        location: Location,
        /// The API key value
        value: String,
    },

    /// HTTP Basic authentication with login and password
    Basic {
        /// Login
        username: String,
        /// Password
        password: String,
    },
}

impl AuthConfig {
    /// API key passed as the `key` query parameter
    pub fn api_key(value: impl Into<String>) -> Self {
        Self::ApiKey {
            location: Location::Query,
            value: value.into(),
        }
    }

    /// API key passed in the `X-Redmine-API-Key` header
    pub fn api_key_header(value: impl Into<String>) -> Self {
        Self::ApiKey {
            location: Location::Header,
            value: value.into(),
        }
    }

    /// HTTP Basic credentials
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Whether any credentials are configured
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::None)
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::ApiKey { location, .. } => f
                .debug_struct("ApiKey")
                .field("location", location)
                .field("value", &"***")
                .finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}
