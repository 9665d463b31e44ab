//! Projects and the objects scoped to them

use super::{CustomField, Identifiable, ObjectKind, Reference, Resource, Tracker, Writable};
use crate::codec::fields;
use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// A project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub name: String,
    /// String key such as `project-abc`, distinct from the numeric id
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub parent: Option<Reference>,
    #[serde(default, deserialize_with = "fields::long_date")]
    pub created_on: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "fields::long_date")]
    pub updated_on: Option<DateTime<FixedOffset>>,
    /// Populated when requested with `include=trackers`
    #[serde(default, deserialize_with = "fields::list")]
    pub trackers: Vec<Tracker>,
    #[serde(default, deserialize_with = "fields::list")]
    pub custom_fields: Vec<CustomField>,
}

impl Project {
    /// New project with a name and identifier, ready to be created
    pub fn new(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            ..Default::default()
        }
    }
}

impl Resource for Project {
    const KIND: ObjectKind = ObjectKind::Project;
}

impl Identifiable for Project {
    fn id(&self) -> Option<u32> {
        self.id
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectPayload<'a> {
    name: &'a str,
    identifier: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    homepage: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<u32>,
}

impl Writable for Project {
    type Payload<'a> = ProjectPayload<'a>;

    fn payload(&self) -> ProjectPayload<'_> {
        ProjectPayload {
            name: &self.name,
            identifier: &self.identifier,
            description: self.description.as_deref(),
            homepage: self.homepage.as_deref(),
            parent_id: self.parent.as_ref().map(|p| p.id),
        }
    }
}

/// A project version (milestone)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub project: Option<Reference>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `open`, `locked` or `closed`
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "fields::short_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub sharing: Option<String>,
    #[serde(default, deserialize_with = "fields::long_date")]
    pub created_on: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "fields::long_date")]
    pub updated_on: Option<DateTime<FixedOffset>>,
}

impl Version {
    /// New version for the given project
    pub fn new(project: Reference, name: impl Into<String>) -> Self {
        Self {
            project: Some(project),
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Resource for Version {
    const KIND: ObjectKind = ObjectKind::Version;
}

impl Identifiable for Version {
    fn id(&self) -> Option<u32> {
        self.id
    }
}

#[derive(Debug, Serialize)]
pub struct VersionPayload<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sharing: Option<&'a str>,
}

impl Writable for Version {
    type Payload<'a> = VersionPayload<'a>;

    fn payload(&self) -> VersionPayload<'_> {
        VersionPayload {
            name: &self.name,
            description: self.description.as_deref(),
            status: self.status.as_deref(),
            due_date: self.due_date.as_ref().map(fields::format_short_date),
            sharing: self.sharing.as_deref(),
        }
    }

    fn validate_create(&self) -> Result<()> {
        if self.project.is_none() {
            return Err(Error::validation("Version must contain a project"));
        }
        Ok(())
    }
}

/// An issue category within a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCategory {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub project: Option<Reference>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub assigned_to: Option<Reference>,
}

impl IssueCategory {
    /// New category for the given project
    pub fn new(project: Reference, name: impl Into<String>) -> Self {
        Self {
            project: Some(project),
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Resource for IssueCategory {
    const KIND: ObjectKind = ObjectKind::IssueCategory;
}

impl Identifiable for IssueCategory {
    fn id(&self) -> Option<u32> {
        self.id
    }
}

#[derive(Debug, Serialize)]
pub struct IssueCategoryPayload<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    assigned_to_id: Option<u32>,
}

impl Writable for IssueCategory {
    type Payload<'a> = IssueCategoryPayload<'a>;

    fn payload(&self) -> IssueCategoryPayload<'_> {
        IssueCategoryPayload {
            name: &self.name,
            assigned_to_id: self.assigned_to.as_ref().map(|r| r.id),
        }
    }

    fn validate_create(&self) -> Result<()> {
        if self.project.is_none() {
            return Err(Error::validation("IssueCategory must contain a project"));
        }
        Ok(())
    }
}
