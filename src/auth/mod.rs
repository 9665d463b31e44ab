//! Authentication module
//!
//! Supports: API key (query parameter or header) and HTTP Basic.
//!
//! Redmine accepts the API access key either as the `key` query parameter or
//! in the `X-Redmine-API-Key` header. Public projects need no credentials.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, Location, API_KEY_HEADER, API_KEY_QUERY_PARAM};
