//! Domain objects exchanged with the server
//!
//! Each object type is a [`Resource`]: it knows its [`ObjectKind`], which
//! fixes the XML element names and the collection path. Types that can be
//! created or updated also implement [`Writable`], producing the request
//! payload the server expects (which differs from the shape it returns:
//! `<project_id>3</project_id>` in, `<project id="3" name="..."/>` out).

mod attachment;
mod issue;
mod misc;
mod project;
mod relation;
mod time_entry;
mod user;

pub use attachment::Attachment;
pub use issue::{Issue, IssuePayload, Journal, JournalDetail};
pub use misc::{IssueStatus, News, SavedQuery, Tracker};
pub use project::{IssueCategory, Project, Version};
pub use relation::{IssueRelation, RelationType};
pub use time_entry::TimeEntry;
pub use user::User;

use crate::codec::fields;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of object addressed by a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Issue,
    Project,
    User,
    TimeEntry,
    Version,
    IssueCategory,
    IssueRelation,
    IssueStatus,
    Tracker,
    SavedQuery,
    News,
    Attachment,
}

impl ObjectKind {
    /// Element name of a single object
    pub fn element(&self) -> &'static str {
        match self {
            ObjectKind::Issue => "issue",
            ObjectKind::Project => "project",
            ObjectKind::User => "user",
            ObjectKind::TimeEntry => "time_entry",
            ObjectKind::Version => "version",
            ObjectKind::IssueCategory => "issue_category",
            ObjectKind::IssueRelation => "relation",
            ObjectKind::IssueStatus => "issue_status",
            ObjectKind::Tracker => "tracker",
            ObjectKind::SavedQuery => "query",
            ObjectKind::News => "news",
            ObjectKind::Attachment => "attachment",
        }
    }

    /// Collection name, used both as the list element and the URL segment
    pub fn collection(&self) -> &'static str {
        match self {
            ObjectKind::Issue => "issues",
            ObjectKind::Project => "projects",
            ObjectKind::User => "users",
            ObjectKind::TimeEntry => "time_entries",
            ObjectKind::Version => "versions",
            ObjectKind::IssueCategory => "issue_categories",
            ObjectKind::IssueRelation => "relations",
            ObjectKind::IssueStatus => "issue_statuses",
            ObjectKind::Tracker => "trackers",
            ObjectKind::SavedQuery => "queries",
            ObjectKind::News => "news",
            ObjectKind::Attachment => "attachments",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element())
    }
}

/// An object type the server can return
pub trait Resource: DeserializeOwned + Send + 'static {
    /// Kind of this object
    const KIND: ObjectKind;
}

/// An object with a server-assigned numeric id
pub trait Identifiable {
    /// Id, absent until the object has been created on the server
    fn id(&self) -> Option<u32>;
}

/// An object that can be sent to the server in a create or update request
pub trait Writable: Resource + Identifiable + Sync {
    /// Serializable request body (without the root element)
    type Payload<'a>: Serialize
    where
        Self: 'a;

    /// Build the request payload
    fn payload(&self) -> Self::Payload<'_>;

    /// Client-side checks run before a create request is sent
    fn validate_create(&self) -> Result<()> {
        self.validate_update()
    }

    /// Client-side checks run before an update request is sent
    fn validate_update(&self) -> Result<()> {
        Ok(())
    }
}

/// Reference to another object, e.g. `<project id="3" name="Alpha"/>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename(deserialize = "@id"))]
    pub id: u32,
    #[serde(rename(deserialize = "@name"), default)]
    pub name: Option<String>,
}

impl Reference {
    /// Reference by id only
    pub fn new(id: u32) -> Self {
        Self { id, name: None }
    }

    /// Reference with a display name
    pub fn named(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }
}

/// Value of a custom field on an issue, project or user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    #[serde(rename(deserialize = "@id"))]
    pub id: u32,
    #[serde(rename(deserialize = "@name"), default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "fields::lenient")]
    pub value: Option<String>,
}

impl CustomField {
    /// Custom field value for a create/update request
    pub fn new(id: u32, value: impl Into<String>) -> Self {
        Self {
            id,
            name: None,
            value: Some(value.into()),
        }
    }
}

/// `<custom_fields type="array">` request payload
#[derive(Debug, Serialize)]
pub struct CustomFieldsPayload<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    custom_field: Vec<CustomFieldPayload<'a>>,
}

#[derive(Debug, Serialize)]
struct CustomFieldPayload<'a> {
    #[serde(rename = "@id")]
    id: u32,
    value: &'a str,
}

impl<'a> CustomFieldsPayload<'a> {
    /// Payload for the given fields, `None` when there is nothing to send
    pub fn from_fields(fields: &'a [CustomField]) -> Option<Self> {
        let custom_field: Vec<_> = fields
            .iter()
            .map(|f| CustomFieldPayload {
                id: f.id,
                value: f.value.as_deref().unwrap_or(""),
            })
            .collect();
        if custom_field.is_empty() {
            None
        } else {
            Some(Self {
                kind: "array",
                custom_field,
            })
        }
    }
}
