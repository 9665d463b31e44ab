//! Field-level deserializers shared by the domain objects
//!
//! Redmine emits empty elements (`<estimated_hours/>`, `<delay></delay>`)
//! for unset values and two different timestamp layouts depending on the
//! server version, so plain derives are not enough for these fields.

use super::list::XmlList;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;

/// Redmine 1.0 timestamp layout, e.g. `Wed Apr 14 13:56:30 -0700 2010`
const LEGACY_LONG_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Layout of `spent_on`, `start_date`, `due_date`
pub const SHORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a server timestamp in either the 1.1+ (RFC 3339) or the 1.0 layout
pub fn parse_long_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, LEGACY_LONG_FORMAT))
        .ok()
}

/// Format a date the way the server expects it in request bodies
pub fn format_short_date(date: &NaiveDate) -> String {
    date.format(SHORT_DATE_FORMAT).to_string()
}

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

/// `created_on`, `updated_on`, `last_login_on`
pub fn long_date<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    match non_empty(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_long_date(&raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'"))),
    }
}

/// `start_date`, `due_date`, `spent_on`
pub fn short_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match non_empty(deserializer)? {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), SHORT_DATE_FORMAT)
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid date '{raw}': {e}"))),
    }
}

/// Optional scalar that may arrive as an empty element or attribute
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match non_empty(deserializer)? {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid value '{raw}': {e}"))),
    }
}

/// Boolean flag; absent or empty means false
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match non_empty(deserializer)?.as_deref().map(str::trim) {
        None | Some("false" | "0") => Ok(false),
        Some("true" | "1") => Ok(true),
        Some(other) => Err(D::Error::custom(format!("invalid boolean '{other}'"))),
    }
}

/// Nested `type="array"` element flattened into its children
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    XmlList::<T>::deserialize(deserializer).map(|list| list.items)
}
