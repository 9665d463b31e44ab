//! HTTP transport module
//!
//! Provides the [`Transport`] seam and its reqwest-backed implementation.
//!
//! # Features
//!
//! - **Transport trait**: send a request, get the raw body back
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Status Mapping**: 401/403/404/422 become typed errors
//! - **Authentication**: Integration with auth module

mod client;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use transport::{ApiRequest, Transport};

#[cfg(test)]
mod tests;
