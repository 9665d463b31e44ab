//! Tests for the codec module

use super::*;
use crate::error::Error;
use crate::model::{Issue, Project, Reference, TimeEntry, Tracker};
use pretty_assertions::assert_eq;

// ============================================================================
// List Decoding
// ============================================================================

#[test]
fn test_decode_list_with_total_count() {
    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<issues type="array" total_count="42" offset="0" limit="2">
  <issue><id>1</id><subject>First</subject></issue>
  <issue><id>2</id><subject>Second</subject></issue>
</issues>"#;

    let page: Page<Issue> = XmlCodec.decode_list(body).unwrap();
    assert_eq!(page.total_count, Some(42));
    assert_eq!(page.len(), 2);
    let subjects: Vec<_> = page.items.iter().map(|i| i.subject.as_str()).collect();
    assert_eq!(subjects, vec!["First", "Second"]);
}

#[test]
fn test_decode_list_without_total_count() {
    let body = r#"<projects type="array"><project><id>1</id><name>A</name><identifier>a</identifier></project></projects>"#;
    let page: Page<Project> = XmlCodec.decode_list(body).unwrap();
    assert_eq!(page.total_count, None);
    assert_eq!(page.items[0].identifier, "a");
}

#[test]
fn test_decode_empty_list() {
    let page: Page<Issue> = XmlCodec
        .decode_list(r#"<issues type="array" total_count="0" offset="0" limit="25"></issues>"#)
        .unwrap();
    assert!(page.is_empty());
    assert_eq!(page.total_count, Some(0));

    let page: Page<Issue> = XmlCodec
        .decode_list(r#"<issues type="array" total_count="0"/>"#)
        .unwrap();
    assert!(page.is_empty());
}

#[test]
fn test_decode_list_irregular_element_names() {
    let body = r#"<time_entries type="array" total_count="1">
  <time_entry><id>5</id><issue id="2"/><hours>1.0</hours></time_entry>
</time_entries>"#;
    let page: Page<TimeEntry> = XmlCodec.decode_list(body).unwrap();
    assert_eq!(page.items[0].issue, Some(Reference::new(2)));

    let body = r#"<trackers type="array"><tracker><id>1</id><name>Bug</name></tracker></trackers>"#;
    let page: Page<Tracker> = XmlCodec.decode_list(body).unwrap();
    assert_eq!(page.items[0].name, "Bug");
}

#[test]
fn test_decode_garbage_is_malformed() {
    let err = XmlCodec
        .decode_list::<Issue>("<issues><issue><done_ratio>half</done_ratio></issue></issues>")
        .unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }));

    let err = XmlCodec
        .decode_list::<Issue>(r#"<issues total_count="many"></issues>"#)
        .unwrap_err();
    assert!(err.to_string().contains("issues"));
}

// ============================================================================
// Single Objects
// ============================================================================

#[test]
fn test_decode_single() {
    let issue: Issue = XmlCodec
        .decode("<issue><id>9</id><subject>Alone</subject></issue>")
        .unwrap();
    assert_eq!(issue.id, Some(9));
}

#[test]
fn test_encode_object() {
    let body = XmlCodec.encode(&Project::new("Beta", "beta")).unwrap();
    assert_eq!(
        body,
        "<project><name>Beta</name><identifier>beta</identifier></project>"
    );
}

// ============================================================================
// Field Helpers
// ============================================================================

#[test]
fn test_parse_long_date_layouts() {
    let modern = fields::parse_long_date("2010-04-14T13:56:30+02:00").unwrap();
    let legacy = fields::parse_long_date("Wed Apr 14 13:56:30 +0200 2010").unwrap();
    assert_eq!(modern, legacy);
    assert!(fields::parse_long_date("yesterday").is_none());
}

#[test]
fn test_format_short_date() {
    let date = chrono::NaiveDate::from_ymd_opt(2009, 12, 3).unwrap();
    assert_eq!(fields::format_short_date(&date), "2009-12-03");
}

// ============================================================================
// Error Lists
// ============================================================================

#[test]
fn test_parse_error_list() {
    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<errors>
  <error>Subject can't be blank</error>
  <error>Tracker can't be blank</error>
</errors>"#;
    assert_eq!(
        parse_error_list(body),
        vec!["Subject can't be blank", "Tracker can't be blank"]
    );
}

#[test]
fn test_parse_error_list_tolerates_other_bodies() {
    assert!(parse_error_list("").is_empty());
    assert!(parse_error_list("Unprocessable Entity").is_empty());
    assert_eq!(
        parse_error_list("<errors><error>Name is too long</error></errors>"),
        vec!["Name is too long"]
    );
}
