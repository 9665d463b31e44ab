//! Time tracking entries

use super::{Identifiable, ObjectKind, Reference, Resource, Writable};
use crate::codec::fields;
use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Hours logged against an issue or a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub project: Option<Reference>,
    #[serde(default)]
    pub issue: Option<Reference>,
    #[serde(default)]
    pub user: Option<Reference>,
    #[serde(default)]
    pub activity: Option<Reference>,
    #[serde(default, deserialize_with = "fields::lenient")]
    pub hours: Option<f32>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default, deserialize_with = "fields::short_date")]
    pub spent_on: Option<NaiveDate>,
    #[serde(default, deserialize_with = "fields::long_date")]
    pub created_on: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "fields::long_date")]
    pub updated_on: Option<DateTime<FixedOffset>>,
}

impl TimeEntry {
    /// An entry needs an issue or a project to be accepted by the server
    pub fn is_valid(&self) -> bool {
        self.issue.is_some() || self.project.is_some()
    }
}

impl Resource for TimeEntry {
    const KIND: ObjectKind = ObjectKind::TimeEntry;
}

impl Identifiable for TimeEntry {
    fn id(&self) -> Option<u32> {
        self.id
    }
}

#[derive(Debug, Serialize)]
pub struct TimeEntryPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    issue_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    activity_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    spent_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hours: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comments: Option<&'a str>,
}

impl Writable for TimeEntry {
    type Payload<'a> = TimeEntryPayload<'a>;

    fn payload(&self) -> TimeEntryPayload<'_> {
        TimeEntryPayload {
            issue_id: self.issue.as_ref().map(|r| r.id),
            project_id: self.project.as_ref().map(|r| r.id),
            user_id: self.user.as_ref().map(|r| r.id),
            activity_id: self.activity.as_ref().map(|r| r.id),
            spent_on: self.spent_on.as_ref().map(fields::format_short_date),
            hours: self.hours,
            comments: self.comments.as_deref(),
        }
    }

    fn validate_update(&self) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::validation(
                "You have to either define a Project or Issue ID for a Time Entry. \
                 The given Time Entry object has neither defined.",
            ));
        }
        Ok(())
    }
}
