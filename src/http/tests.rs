//! Tests for the HTTP module

use super::*;
use crate::config::{ScrollConfig, TimeEntriesFilter};
use crate::decode::{decode, read_body};
use crate::error::Error;
use crate::pagination::PageIndex;
use crate::types::{Date, EntityKind, Project};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(base_url: &str) -> HttpPageFetcher {
    let config = ScrollConfig::builder(base_url, "ababab").logging(true).build();
    HttpPageFetcher::new(Arc::new(config)).unwrap()
}

#[tokio::test]
async fn test_fetch_sends_api_key_and_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects.json"))
        .and(header(API_KEY_HEADER, "ababab"))
        .and(header(
            "user-agent",
            format!("redmine-scroll/{}", env!("CARGO_PKG_VERSION")).as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [{"id": 1, "name": "Project1"}],
            "offset": 0, "limit": 25, "total_count": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let raw = fetcher(&server.uri())
        .fetch(EntityKind::Project, PageIndex::FIRST)
        .await
        .unwrap();
    assert_eq!(raw.status, 200);

    let page = decode::<Project>(raw).await.unwrap();
    assert_eq!(page.items[0].name, "Project1");
}

#[tokio::test]
async fn test_fetch_page_parameter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/issues.json"))
        .and(query_param("page", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let raw = fetcher(&server.uri())
        .fetch(EntityKind::Issue, PageIndex::new(4))
        .await
        .unwrap();
    assert_eq!(raw.status, 200);
}

#[tokio::test]
async fn test_fetch_time_entries_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/time_entries.json"))
        .and(query_param("user_id", "7"))
        .and(query_param("from", "2024-03-01"))
        .and(query_param("to", "2024-03-31"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let filter = TimeEntriesFilter::new(
        Date::parse("2024-03-01").unwrap(),
        Date::parse("2024-03-31").unwrap(),
        "7",
    );
    let config = ScrollConfig::builder(server.uri(), "ababab")
        .time_entries(filter)
        .build();
    let fetcher = HttpPageFetcher::new(Arc::new(config)).unwrap();

    let raw = fetcher
        .fetch(EntityKind::TimeEntry, PageIndex::FIRST)
        .await
        .unwrap();
    assert_eq!(raw.status, 200);
}

#[tokio::test]
async fn test_fetch_not_found_hands_body_to_decoder() {
    let server = MockServer::start().await;

    let raw = fetcher(&format!("{}/not-found", server.uri()))
        .fetch(EntityKind::Project, PageIndex::FIRST)
        .await
        .unwrap();
    assert_eq!(raw.status, 404);
    assert!(!raw.is_success());

    let body = read_body(raw.body).await.unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_fetch_malformed_base_url_is_fatal() {
    let err = fetcher("\n")
        .fetch(EntityKind::Project, PageIndex::FIRST)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ApiEndpointUrl { .. }));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_fetch_unreachable_host_is_http_error() {
    // port 1 is reserved and nothing listens on it
    let err = fetcher("http://127.0.0.1:1")
        .fetch(EntityKind::Project, PageIndex::FIRST)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Http(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_fetch_unsupported_scheme_is_http_error() {
    let err = fetcher("sd://sdsdsd")
        .fetch(EntityKind::Project, PageIndex::FIRST)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}

#[tokio::test]
async fn test_fetch_with_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(3)
        .mount(&server)
        .await;

    let config = ScrollConfig::builder(server.uri(), "ababab")
        .rate_limit(RateLimiterConfig::new(100, 3))
        .build();
    let fetcher = HttpPageFetcher::new(Arc::new(config)).unwrap();
    assert!(format!("{fetcher:?}").contains("has_rate_limiter: true"));

    for _ in 0..3 {
        fetcher
            .fetch(EntityKind::Project, PageIndex::FIRST)
            .await
            .unwrap();
    }
}

#[test]
fn test_url_for() {
    let fetcher = fetcher("https://redmine.example.com/");
    let url = fetcher.url_for(EntityKind::Issue, PageIndex::new(2)).unwrap();
    assert_eq!(url.as_str(), "https://redmine.example.com/issues.json?page=2");
}
