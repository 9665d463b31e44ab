//! Request paths
//!
//! Paths are relative to the server base URL and always carry the `.xml`
//! suffix that selects the XML representation.

use crate::error::{Error, Result};
use crate::model::ObjectKind;
use std::fmt::Display;
use url::Url;

const SUFFIX: &str = ".xml";

/// List or create path of a kind, e.g. `issues.xml`
pub fn collection(kind: ObjectKind) -> String {
    format!("{}{SUFFIX}", kind.collection())
}

/// Path of one object, e.g. `issues/12.xml` or `projects/alpha.xml`
pub fn object(kind: ObjectKind, id: impl Display) -> String {
    format!("{}/{id}{SUFFIX}", kind.collection())
}

pub fn current_user() -> String {
    format!("users/current{SUFFIX}")
}

/// Versions of a project (list and create)
pub fn project_versions(project_id: u32) -> String {
    nested("projects", project_id, ObjectKind::Version)
}

/// Issue categories of a project (list and create)
pub fn project_categories(project_id: u32) -> String {
    nested("projects", project_id, ObjectKind::IssueCategory)
}

/// Relations of an issue (create)
pub fn issue_relations(issue_id: u32) -> String {
    nested("issues", issue_id, ObjectKind::IssueRelation)
}

fn nested(parent: &str, id: u32, kind: ObjectKind) -> String {
    format!("{parent}/{id}/{}{SUFFIX}", kind.collection())
}

/// Validate a server base URL such as `http://demo.redmine.org:8080/redmine`
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::missing_field("base_url"));
    }
    let url = Url::parse(trimmed)
        .map_err(|e| Error::invalid_value("base_url", format!("'{trimmed}': {e}")))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{other}', expected http or https"),
            ))
        }
    }
    if url.host_str().is_none() {
        return Err(Error::invalid_value("base_url", "missing host"));
    }
    Ok(url)
}
