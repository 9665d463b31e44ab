//! Read-only lookup objects

use super::{ObjectKind, Reference, Resource};
use crate::codec::fields;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Issue status such as "New" or "Closed"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStatus {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "fields::flag")]
    pub is_default: bool,
    #[serde(default, deserialize_with = "fields::flag")]
    pub is_closed: bool,
}

impl Resource for IssueStatus {
    const KIND: ObjectKind = ObjectKind::IssueStatus;
}

/// Tracker such as "Bug" or "Feature"
///
/// Listed with child elements, embedded in projects as attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracker {
    #[serde(alias = "@id")]
    pub id: u32,
    #[serde(alias = "@name", default)]
    pub name: String,
}

impl Resource for Tracker {
    const KIND: ObjectKind = ObjectKind::Tracker;
}

/// Saved issue query visible to the current user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "fields::flag")]
    pub is_public: bool,
    #[serde(default, deserialize_with = "fields::lenient")]
    pub project_id: Option<u32>,
}

impl Resource for SavedQuery {
    const KIND: ObjectKind = ObjectKind::SavedQuery;
}

/// News item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct News {
    pub id: u32,
    #[serde(default)]
    pub project: Option<Reference>,
    #[serde(default)]
    pub author: Option<Reference>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "fields::long_date")]
    pub created_on: Option<DateTime<FixedOffset>>,
}

impl Resource for News {
    const KIND: ObjectKind = ObjectKind::News;
}
