//! Users

use super::{CustomField, Identifiable, ObjectKind, Resource, Writable};
use crate::codec::fields;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A user account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub mail: Option<String>,
    /// Write-only; never returned by the server
    #[serde(skip)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "fields::lenient")]
    pub auth_source_id: Option<u32>,
    #[serde(default, deserialize_with = "fields::long_date")]
    pub created_on: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "fields::long_date")]
    pub last_login_on: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "fields::list")]
    pub custom_fields: Vec<CustomField>,
}

impl User {
    /// New user with a login, ready to be created
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            ..Default::default()
        }
    }

    /// "First Last", or the login when no name is set
    pub fn full_name(&self) -> String {
        match (self.firstname.as_deref(), self.lastname.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.to_string(),
            (None, None) => self.login.clone(),
        }
    }
}

impl Resource for User {
    const KIND: ObjectKind = ObjectKind::User;
}

impl Identifiable for User {
    fn id(&self) -> Option<u32> {
        self.id
    }
}

#[derive(Debug, Serialize)]
pub struct UserPayload<'a> {
    login: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    firstname: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lastname: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mail: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth_source_id: Option<u32>,
}

impl Writable for User {
    type Payload<'a> = UserPayload<'a>;

    fn payload(&self) -> UserPayload<'_> {
        UserPayload {
            login: &self.login,
            firstname: self.firstname.as_deref(),
            lastname: self.lastname.as_deref(),
            mail: self.mail.as_deref(),
            password: self.password.as_deref(),
            auth_source_id: self.auth_source_id,
        }
    }
}
