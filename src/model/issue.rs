//! Issues and their journals

use super::{
    Attachment, CustomField, CustomFieldsPayload, Identifiable, IssueRelation, ObjectKind,
    Reference, Resource, Writable,
};
use crate::codec::fields;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// An issue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub project: Option<Reference>,
    #[serde(default)]
    pub tracker: Option<Reference>,
    #[serde(default)]
    pub status: Option<Reference>,
    #[serde(default)]
    pub priority: Option<Reference>,
    #[serde(default)]
    pub author: Option<Reference>,
    #[serde(default)]
    pub assigned_to: Option<Reference>,
    #[serde(default)]
    pub category: Option<Reference>,
    #[serde(default)]
    pub fixed_version: Option<Reference>,
    #[serde(default)]
    pub parent: Option<Reference>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "fields::short_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "fields::short_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "fields::lenient")]
    pub done_ratio: Option<u32>,
    #[serde(default, deserialize_with = "fields::lenient")]
    pub estimated_hours: Option<f32>,
    #[serde(default, deserialize_with = "fields::lenient")]
    pub spent_hours: Option<f32>,
    #[serde(default, deserialize_with = "fields::list")]
    pub custom_fields: Vec<CustomField>,
    #[serde(default, deserialize_with = "fields::long_date")]
    pub created_on: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "fields::long_date")]
    pub updated_on: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "fields::list")]
    pub relations: Vec<IssueRelation>,
    #[serde(default, deserialize_with = "fields::list")]
    pub journals: Vec<Journal>,
    #[serde(default, deserialize_with = "fields::list")]
    pub attachments: Vec<Attachment>,
}

impl Issue {
    /// New issue with a subject, ready to be created
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Default::default()
        }
    }

    /// Payload for creating this issue in the project with the given identifier
    ///
    /// The server accepts either the numeric id or the string identifier in
    /// `project_id`.
    pub fn payload_for_project(&self, project_key: &str) -> IssuePayload<'_> {
        let mut payload = self.payload();
        payload.project_id = Some(project_key.to_string());
        payload
    }
}

impl Resource for Issue {
    const KIND: ObjectKind = ObjectKind::Issue;
}

impl Identifiable for Issue {
    fn id(&self) -> Option<u32> {
        self.id
    }
}

/// Request body for creating or updating an issue
#[derive(Debug, Serialize)]
pub struct IssuePayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tracker_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assigned_to_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fixed_version_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_issue_id: Option<u32>,
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    done_ratio: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    estimated_hours: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_fields: Option<CustomFieldsPayload<'a>>,
}

fn ref_id(reference: &Option<Reference>) -> Option<u32> {
    reference.as_ref().map(|r| r.id)
}

impl Writable for Issue {
    type Payload<'a> = IssuePayload<'a>;

    fn payload(&self) -> IssuePayload<'_> {
        IssuePayload {
            project_id: self.project.as_ref().map(|p| p.id.to_string()),
            tracker_id: ref_id(&self.tracker),
            status_id: ref_id(&self.status),
            priority_id: ref_id(&self.priority),
            assigned_to_id: ref_id(&self.assigned_to),
            category_id: ref_id(&self.category),
            fixed_version_id: ref_id(&self.fixed_version),
            parent_issue_id: ref_id(&self.parent),
            subject: &self.subject,
            description: self.description.as_deref(),
            start_date: self.start_date.as_ref().map(fields::format_short_date),
            due_date: self.due_date.as_ref().map(fields::format_short_date),
            done_ratio: self.done_ratio,
            estimated_hours: self.estimated_hours,
            custom_fields: CustomFieldsPayload::from_fields(&self.custom_fields),
        }
    }
}

/// One entry of an issue's history (`include=journals`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    #[serde(rename(deserialize = "@id"))]
    pub id: u32,
    #[serde(default)]
    pub user: Option<Reference>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "fields::long_date")]
    pub created_on: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "fields::list")]
    pub details: Vec<JournalDetail>,
}

/// Single attribute change recorded in a journal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalDetail {
    #[serde(rename(deserialize = "@property"), default)]
    pub property: Option<String>,
    #[serde(rename(deserialize = "@name"), default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "fields::lenient")]
    pub old_value: Option<String>,
    #[serde(default, deserialize_with = "fields::lenient")]
    pub new_value: Option<String>,
}
