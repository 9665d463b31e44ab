//! Tests for pagination module

use super::*;
use crate::codec::XmlCodec;
use crate::error::{Error, Result};
use crate::http::{ApiRequest, Transport};
use crate::model::{Issue, Project};
use crate::types::{Dialect, Method, QueryParams};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// ============================================================================
// Scripted Transport
// ============================================================================

/// Replays canned bodies in order and records every request
#[derive(Default)]
struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    fn new(bodies: impl IntoIterator<Item = String>) -> Self {
        Self {
            replies: Mutex::new(bodies.into_iter().map(Ok).collect()),
            requests: Mutex::default(),
        }
    }

    fn then_fail(self, error: Error) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn cursors(&self, param: &str) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.query.get(param).unwrap_or_default().to_string())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::communication("script exhausted")))
    }
}

fn issues_page(ids: &[u32], total_count: Option<usize>) -> String {
    let mut body = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><issues type="array""#);
    if let Some(total) = total_count {
        body.push_str(&format!(r#" total_count="{total}""#));
    }
    body.push('>');
    for id in ids {
        body.push_str(&format!("<issue><id>{id}</id><subject>Issue {id}</subject></issue>"));
    }
    body.push_str("</issues>");
    body
}

fn ids(issues: &[Issue]) -> Vec<u32> {
    issues.iter().filter_map(|i| i.id).collect()
}

async fn fetch(
    transport: &ScriptedTransport,
    dialect: Dialect,
    page_size: usize,
) -> Result<Vec<Issue>> {
    PagedFetcher::new(transport, &XmlCodec, dialect)
        .fetch_all::<Issue>(QueryParams::new(), page_size)
        .await
}

// ============================================================================
// Offset/Limit Dialect
// ============================================================================

#[tokio::test]
async fn test_offset_empty_result() {
    let transport = ScriptedTransport::new([issues_page(&[], Some(0))]);

    let issues = fetch(&transport, Dialect::OffsetLimit, 25).await.unwrap();

    assert!(issues.is_empty());
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_offset_single_partial_page() {
    let all: Vec<u32> = (1..=10).collect();
    let transport = ScriptedTransport::new([issues_page(&all, Some(10))]);

    let issues = fetch(&transport, Dialect::OffsetLimit, 25).await.unwrap();

    assert_eq!(ids(&issues), all);
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_offset_multiple_pages() {
    let transport = ScriptedTransport::new([
        issues_page(&[1, 2], Some(5)),
        issues_page(&[3, 4], Some(5)),
        issues_page(&[5], Some(5)),
    ]);

    let issues = fetch(&transport, Dialect::OffsetLimit, 2).await.unwrap();

    assert_eq!(ids(&issues), vec![1, 2, 3, 4, 5]);
    assert_eq!(transport.cursors("offset"), vec!["0", "2", "4"]);
    assert_eq!(transport.cursors("limit"), vec!["2", "2", "2"]);
}

#[tokio::test]
async fn test_offset_exact_full_page() {
    let transport = ScriptedTransport::new([issues_page(&[1, 2], Some(2))]);

    let issues = fetch(&transport, Dialect::OffsetLimit, 2).await.unwrap();

    assert_eq!(ids(&issues), vec![1, 2]);
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_offset_empty_page_before_total_is_reached() {
    let transport = ScriptedTransport::new([
        issues_page(&[1, 2, 3], Some(100)),
        issues_page(&[], Some(100)),
    ]);

    let issues = fetch(&transport, Dialect::OffsetLimit, 3).await.unwrap();

    assert_eq!(ids(&issues), vec![1, 2, 3]);
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_offset_short_page_advances_by_items_received() {
    let transport = ScriptedTransport::new([
        issues_page(&[1, 2, 3], Some(5)),
        issues_page(&[4], Some(5)),
        issues_page(&[5], Some(5)),
    ]);

    let issues = fetch(&transport, Dialect::OffsetLimit, 3).await.unwrap();

    assert_eq!(ids(&issues), vec![1, 2, 3, 4, 5]);
    assert_eq!(transport.cursors("offset"), vec!["0", "3", "4"]);
}

#[tokio::test]
async fn test_offset_page_size_one() {
    let transport = ScriptedTransport::new([
        issues_page(&[7], Some(3)),
        issues_page(&[8], Some(3)),
        issues_page(&[9], Some(3)),
    ]);

    let issues = fetch(&transport, Dialect::OffsetLimit, 1).await.unwrap();

    assert_eq!(ids(&issues), vec![7, 8, 9]);
    assert_eq!(transport.requests().len(), 3);
}

#[tokio::test]
async fn test_offset_missing_total_count_stops_after_first_page() {
    let transport = ScriptedTransport::new([
        issues_page(&[1, 2], None),
        issues_page(&[3, 4], None),
    ]);

    let issues = fetch(&transport, Dialect::OffsetLimit, 2).await.unwrap();

    assert_eq!(ids(&issues), vec![1, 2]);
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_offset_total_shrinks_between_pages() {
    let transport = ScriptedTransport::new([
        issues_page(&[1, 2], Some(6)),
        issues_page(&[3, 4], Some(4)),
    ]);

    let issues = fetch(&transport, Dialect::OffsetLimit, 2).await.unwrap();

    assert_eq!(ids(&issues), vec![1, 2, 3, 4]);
    assert_eq!(transport.requests().len(), 2);
}

// ============================================================================
// Page Number Dialect
// ============================================================================

#[tokio::test]
async fn test_page_number_empty_result() {
    let transport = ScriptedTransport::new([issues_page(&[], None)]);

    let issues = fetch(&transport, Dialect::PageNumber, 25).await.unwrap();

    assert!(issues.is_empty());
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_page_number_stops_on_repeated_first_page() {
    let first = issues_page(&[1, 2], None);
    let transport = ScriptedTransport::new([
        first.clone(),
        issues_page(&[3, 4], None),
        issues_page(&[5, 6], None),
        first,
    ]);

    let issues = fetch(&transport, Dialect::PageNumber, 2).await.unwrap();

    assert_eq!(ids(&issues), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(transport.cursors("page"), vec!["1", "2", "3", "4"]);
    assert_eq!(transport.cursors("per_page"), vec!["2", "2", "2", "2"]);
    assert!(transport.requests().iter().all(|r| r.query.get("offset").is_none()));
}

#[tokio::test]
async fn test_page_number_single_full_page() {
    let first = issues_page(&[1, 2], None);
    let transport = ScriptedTransport::new([first.clone(), first]);

    let issues = fetch(&transport, Dialect::PageNumber, 2).await.unwrap();

    assert_eq!(ids(&issues), vec![1, 2]);
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_page_number_stops_on_empty_page() {
    let transport = ScriptedTransport::new([
        issues_page(&[1, 2], None),
        issues_page(&[], None),
    ]);

    let issues = fetch(&transport, Dialect::PageNumber, 2).await.unwrap();

    assert_eq!(ids(&issues), vec![1, 2]);
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_page_number_short_page_does_not_stop() {
    let first = issues_page(&[1, 2], None);
    let transport = ScriptedTransport::new([
        first.clone(),
        issues_page(&[3], None),
        issues_page(&[4, 5], None),
        first,
    ]);

    let issues = fetch(&transport, Dialect::PageNumber, 2).await.unwrap();

    assert_eq!(ids(&issues), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_page_number_ignores_total_count() {
    let transport = ScriptedTransport::new([
        issues_page(&[1], Some(1)),
        issues_page(&[2], Some(1)),
        issues_page(&[], Some(1)),
    ]);

    let issues = fetch(&transport, Dialect::PageNumber, 1).await.unwrap();

    assert_eq!(ids(&issues), vec![1, 2]);
    assert_eq!(transport.requests().len(), 3);
}

/// Treats bodies as equal when they differ only in whitespace
struct IgnoreWhitespace;

impl RepeatedPageCheck for IgnoreWhitespace {
    fn is_repeated_terminal_page(&self, current: &str, first: &str) -> bool {
        let squash = |s: &str| s.split_whitespace().collect::<String>();
        squash(current) == squash(first)
    }
}

#[tokio::test]
async fn test_page_number_custom_repeat_check() {
    let first = issues_page(&[1], None);
    let transport = ScriptedTransport::new([
        first.clone(),
        issues_page(&[2], None),
        format!("{first}\n"),
    ]);

    let issues = PagedFetcher::new(&transport, &XmlCodec, Dialect::PageNumber)
        .with_repeat_check(Arc::new(IgnoreWhitespace))
        .fetch_all::<Issue>(QueryParams::new(), 1)
        .await
        .unwrap();

    assert_eq!(ids(&issues), vec![1, 2]);
    assert_eq!(transport.requests().len(), 3);
}

// ============================================================================
// Shared Behaviour
// ============================================================================

#[tokio::test]
async fn test_zero_page_size_is_config_error_without_request() {
    for dialect in [Dialect::OffsetLimit, Dialect::PageNumber] {
        let transport = ScriptedTransport::new([issues_page(&[1], Some(1))]);

        let err = fetch(&transport, dialect, 0).await.unwrap_err();

        assert!(err.is_configuration());
        assert!(transport.requests().is_empty());
    }
}

#[tokio::test]
async fn test_base_params_sent_on_every_page() {
    let transport = ScriptedTransport::new([
        issues_page(&[1], Some(2)),
        issues_page(&[2], Some(2)),
    ]);
    let params = QueryParams::new()
        .with("project_id", "alpha")
        .with("limit", "500");

    let issues = PagedFetcher::new(&transport, &XmlCodec, Dialect::OffsetLimit)
        .fetch_all::<Issue>(params, 1)
        .await
        .unwrap();

    assert_eq!(issues.len(), 2);
    for request in transport.requests() {
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "issues.xml");
        assert!(request.body.is_none());
        assert_eq!(request.query.get("project_id"), Some("alpha"));
        assert_eq!(request.query.get("limit"), Some("1"));
    }
}

#[tokio::test]
async fn test_fetch_all_at_explicit_path() {
    let transport = ScriptedTransport::new([String::from(
        r#"<projects type="array" total_count="1"><project><id>3</id><name>A</name><identifier>a</identifier></project></projects>"#,
    )]);

    let projects = PagedFetcher::new(&transport, &XmlCodec, Dialect::OffsetLimit)
        .fetch_all_at::<Project>("projects.xml", QueryParams::new().with("include", "trackers"), 25)
        .await
        .unwrap();

    assert_eq!(projects[0].id, Some(3));
    assert_eq!(transport.requests()[0].path, "projects.xml");
}

#[tokio::test]
async fn test_transport_error_discards_partial_result() {
    let transport = ScriptedTransport::new([issues_page(&[1, 2], Some(4))])
        .then_fail(Error::auth("key revoked"));

    let err = fetch(&transport, Dialect::OffsetLimit, 2).await.unwrap_err();

    assert!(matches!(err, Error::Auth { .. }));
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_malformed_page_propagates() {
    let transport = ScriptedTransport::new([
        issues_page(&[1], None),
        String::from("<issues><issue><id>not-a-number</id></issue></issues>"),
    ]);

    let err = fetch(&transport, Dialect::PageNumber, 1).await.unwrap_err();

    assert!(matches!(err, Error::MalformedResponse { .. }));
}

// ============================================================================
// Building Blocks
// ============================================================================

#[test]
fn test_page_request_to_api_request() {
    let request = PageRequest {
        params: QueryParams::new().with("subject", "crash"),
        cursor: 3,
        page_size: 10,
    };

    let api = request.to_api_request("issues.xml", Dialect::PageNumber);
    let pairs: Vec<_> = api.query.iter().collect();
    assert_eq!(
        pairs,
        vec![("subject", "crash"), ("per_page", "10"), ("page", "3")]
    );
}

#[test]
fn test_exact_body_match() {
    assert!(ExactBodyMatch.is_repeated_terminal_page("<a/>", "<a/>"));
    assert!(!ExactBodyMatch.is_repeated_terminal_page("<a/> ", "<a/>"));
}

#[test]
fn test_offset_paginator_next_page() {
    let mut state = PaginationState::starting_at(0);
    assert_eq!(
        OffsetPaginator.next_page(25, Some(60), &mut state),
        NextPage::Continue(25)
    );
    state.cursor = 50;
    assert_eq!(
        OffsetPaginator.next_page(10, Some(60), &mut state),
        NextPage::Done
    );
    assert_eq!(
        OffsetPaginator.next_page(10, None, &mut state),
        NextPage::Done
    );
}

#[test]
fn test_page_number_paginator_records_first_body() {
    let paginator = PageNumberPaginator::new(Arc::new(ExactBodyMatch));
    let mut state = PaginationState::starting_at(1);

    assert!(paginator.accept_body("page one", &mut state));
    assert_eq!(state.first_body.as_deref(), Some("page one"));
    assert_eq!(paginator.next_page(2, None, &mut state), NextPage::Continue(2));

    state.cursor = 2;
    assert!(paginator.accept_body("page two", &mut state));
    assert!(!paginator.accept_body("page one", &mut state));
}
