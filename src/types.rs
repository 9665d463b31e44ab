//! Common types used throughout the Redmine client
//!
//! This module contains shared type definitions used across multiple modules:
//! HTTP methods, pagination dialects, query parameters and include flags.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    DELETE,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Pagination Dialect
// ============================================================================

/// Pagination convention spoken by the server
///
/// Redmine 1.1+ and ChiliProject 1.2 accept `offset`/`limit` and report
/// `total_count` on every list. Redmine 1.0 only understands `page`/`per_page`
/// and answers an out-of-range page with page 1 again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// `offset` + `limit`, terminated by the reported total count
    #[default]
    OffsetLimit,
    /// `page` + `per_page`, terminated by an empty or repeated first page
    PageNumber,
}

impl Dialect {
    /// Canonical configuration name
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::OffsetLimit => "offset_limit",
            Dialect::PageNumber => "page_number",
        }
    }

    /// Query parameter carrying the page size
    pub fn size_param(&self) -> &'static str {
        match self {
            Dialect::OffsetLimit => "limit",
            Dialect::PageNumber => "per_page",
        }
    }

    /// Query parameter carrying the cursor
    pub fn cursor_param(&self) -> &'static str {
        match self {
            Dialect::OffsetLimit => "offset",
            Dialect::PageNumber => "page",
        }
    }

    /// Cursor of the first request
    pub fn first_cursor(&self) -> usize {
        match self {
            Dialect::OffsetLimit => 0,
            Dialect::PageNumber => 1,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "offset_limit" | "offset" | "redmine_1.1" | "chiliproject_1.2" => {
                Ok(Dialect::OffsetLimit)
            }
            "page_number" | "page" | "redmine_1.0" => Ok(Dialect::PageNumber),
            _ => Err(Error::invalid_value(
                "dialect",
                format!(
                    "unsupported dialect '{s}', expected one of: {}, {}",
                    Dialect::OffsetLimit,
                    Dialect::PageNumber
                ),
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Dialect {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Ordered query parameters with unique keys
///
/// Inserting an existing key replaces its value in place, so the last write
/// wins while the original position is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert only when the value is present and non-empty
    pub fn insert_opt(&mut self, key: impl Into<String>, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.insert(key, value);
        }
    }

    /// Look up a parameter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no parameters
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over parameters in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Borrow the underlying pairs (for `reqwest::RequestBuilder::query`)
    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

// ============================================================================
// Include Flags
// ============================================================================

/// Associated data requested with `?include=...` on issue requests
///
/// The wire names are fixed by the server and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Include {
    Journals,
    Relations,
    Attachments,
}

impl Include {
    /// Wire name of this include
    pub fn as_str(&self) -> &'static str {
        match self {
            Include::Journals => "journals",
            Include::Relations => "relations",
            Include::Attachments => "attachments",
        }
    }

    /// Join includes into the comma-separated parameter value
    pub fn join(includes: &[Include]) -> String {
        includes
            .iter()
            .map(Include::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromStr for Include {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "journals" => Ok(Include::Journals),
            "relations" => Ok(Include::Relations),
            "attachments" => Ok(Include::Attachments),
            other => Err(Error::invalid_value(
                "include",
                format!("unknown include '{other}'"),
            )),
        }
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}
