//! File attachments

use super::{ObjectKind, Reference, Resource};
use crate::codec::fields;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Metadata of a file attached to an issue, document or wiki page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub filename: String,
    #[serde(default, deserialize_with = "fields::lenient")]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Absolute download URL of the file content
    #[serde(default)]
    pub content_url: Option<String>,
    #[serde(default)]
    pub author: Option<Reference>,
    #[serde(default, deserialize_with = "fields::long_date")]
    pub created_on: Option<DateTime<FixedOffset>>,
}

impl Resource for Attachment {
    const KIND: ObjectKind = ObjectKind::Attachment;
}
