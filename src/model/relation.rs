//! Relations between issues

use super::{Identifiable, ObjectKind, Resource, Writable};
use crate::codec::fields;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relation between two issues
///
/// Returned as child elements by `relations/{id}.xml` and as attributes
/// inside `<issue>` when `include=relations` is requested; both spellings
/// are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRelation {
    #[serde(alias = "@id", default)]
    pub id: Option<u32>,
    #[serde(alias = "@issue_id", default, deserialize_with = "fields::lenient")]
    pub issue_id: Option<u32>,
    #[serde(alias = "@issue_to_id", default, deserialize_with = "fields::lenient")]
    pub issue_to_id: Option<u32>,
    #[serde(alias = "@relation_type", default)]
    pub relation_type: String,
    #[serde(alias = "@delay", default, deserialize_with = "fields::lenient")]
    pub delay: Option<i32>,
}

impl IssueRelation {
    /// Relation to be created from `issue_id` to `issue_to_id`
    pub fn new(issue_id: u32, issue_to_id: u32, relation_type: RelationType) -> Self {
        Self {
            id: None,
            issue_id: Some(issue_id),
            issue_to_id: Some(issue_to_id),
            relation_type: relation_type.to_string(),
            delay: None,
        }
    }
}

impl Resource for IssueRelation {
    const KIND: ObjectKind = ObjectKind::IssueRelation;
}

impl Identifiable for IssueRelation {
    fn id(&self) -> Option<u32> {
        self.id
    }
}

#[derive(Debug, Serialize)]
pub struct RelationPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    issue_to_id: Option<u32>,
    relation_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    delay: Option<i32>,
}

impl Writable for IssueRelation {
    type Payload<'a> = RelationPayload<'a>;

    fn payload(&self) -> RelationPayload<'_> {
        RelationPayload {
            issue_to_id: self.issue_to_id,
            relation_type: &self.relation_type,
            delay: self.delay,
        }
    }
}

/// Relation types understood by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationType {
    Relates,
    Duplicates,
    Duplicated,
    Blocks,
    Blocked,
    Precedes,
    Follows,
    CopiedTo,
    CopiedFrom,
}

impl RelationType {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Relates => "relates",
            RelationType::Duplicates => "duplicates",
            RelationType::Duplicated => "duplicated",
            RelationType::Blocks => "blocks",
            RelationType::Blocked => "blocked",
            RelationType::Precedes => "precedes",
            RelationType::Follows => "follows",
            RelationType::CopiedTo => "copied_to",
            RelationType::CopiedFrom => "copied_from",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let kind = match s.trim() {
            "relates" => RelationType::Relates,
            "duplicates" => RelationType::Duplicates,
            "duplicated" => RelationType::Duplicated,
            "blocks" => RelationType::Blocks,
            "blocked" => RelationType::Blocked,
            "precedes" => RelationType::Precedes,
            "follows" => RelationType::Follows,
            "copied_to" => RelationType::CopiedTo,
            "copied_from" => RelationType::CopiedFrom,
            other => {
                return Err(Error::validation(format!(
                    "unknown relation type '{other}'"
                )))
            }
        };
        Ok(kind)
    }
}
