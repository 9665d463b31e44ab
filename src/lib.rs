//! # Redmine Client
//!
//! An async client for the Redmine REST/XML API.
//!
//! ## Features
//!
//! - **Typed Resources**: Issues, projects, users, time entries, versions,
//!   categories, relations, statuses, trackers, saved queries, news, attachments
//! - **Dual-Dialect Pagination**: `offset`/`limit` (Redmine 1.1+, ChiliProject 1.2)
//!   and `page`/`per_page` (Redmine 1.0) behind one fetcher
//! - **Authentication**: API key (query or header) and HTTP Basic
//! - **Retry with Backoff**: Transient failures are retried by the HTTP client
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use redmine_client::{AuthConfig, RedmineManager, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let manager = RedmineManager::connect(
//!         "https://redmine.example.com",
//!         AuthConfig::api_key("0123456789abcdef"),
//!     )?;
//!
//!     for issue in manager.get_issues(Some("demo"), None, &[]).await? {
//!         println!("#{:?} {}", issue.id, issue.subject);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       RedmineManager                        │
//! │  issues · projects · users · time entries · versions · ...  │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────┬─────────────┬────┴──────────┬──────────┬─────────┐
//! │   Auth   │    HTTP     │  Pagination   │  Codec   │  Model  │
//! ├──────────┼─────────────┼───────────────┼──────────┼─────────┤
//! │ API Key  │ Transport   │ PagedFetcher  │ XML      │ Issue   │
//! │ Basic    │ Retry       │ Offset/Limit  │ Page<T>  │ Project │
//! │          │ Backoff     │ Page Number   │ Errors   │ User …  │
//! └──────────┴─────────────┴───────────────┴──────────┴─────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication implementations
pub mod auth;

/// HTTP transport with retry
pub mod http;

/// Request paths
pub mod uri;

/// Domain objects
pub mod model;

/// XML encoding and decoding
pub mod codec;

/// Paged list retrieval
pub mod pagination;

/// High-level API facade
pub mod manager;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::AuthConfig;
pub use codec::{Codec, Page, XmlCodec};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use http::{ApiRequest, HttpClient, HttpClientConfig, Transport};
pub use manager::{RedmineManager, DEFAULT_OBJECTS_PER_PAGE};
pub use pagination::{ExactBodyMatch, PagedFetcher, RepeatedPageCheck};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
