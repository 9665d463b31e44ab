//! Transport abstraction
//!
//! Everything above this layer talks in terms of [`ApiRequest`] and raw
//! response bodies, so tests can swap in a scripted transport.

use crate::error::{Error, Result};
use crate::types::{Method, QueryParams};
use async_trait::async_trait;
use bytes::Bytes;

/// A request relative to the server base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base URL, e.g. `issues.xml`
    pub path: String,
    pub query: QueryParams,
    /// Encoded XML body for POST/PUT
    pub body: Option<String>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: String) -> Self {
        Self::new(Method::POST, path).body(body)
    }

    pub fn put(path: impl Into<String>, body: String) -> Self {
        Self::new(Method::PUT, path).body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Replace the query parameters
    #[must_use]
    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Set the request body
    #[must_use]
    pub fn body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

/// Sends requests to the server
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the response body of a successful reply
    ///
    /// Implementations map rejected credentials to [`Error::Auth`], missing
    /// objects to [`Error::NotFound`] and network failures to
    /// [`Error::Http`] or [`Error::Communication`].
    async fn send(&self, request: ApiRequest) -> Result<String>;

    /// Fetch raw bytes from an absolute URL (attachment content)
    async fn download(&self, url: &str) -> Result<Bytes> {
        Err(Error::communication(format!(
            "this transport cannot download '{url}'"
        )))
    }
}
