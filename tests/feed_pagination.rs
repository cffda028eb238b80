//! Integration tests for the paged video API client and the load-more
//! lifecycle against a mock HTTP backend.
//!
//! Each test spins up its own wiremock server so tests stay isolated and can
//! assert on the exact query parameters the client sends.

use reel::api::{ApiError, PageFetcher, VideoApi};
use reel::feed::{
    BackfillOutcome, FeedState, FilterController, LoadOutcome, SortOrder, SwitchAction,
};
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> VideoApi {
    let base = Url::parse(&format!("{}/api/", server.uri())).unwrap();
    VideoApi::new(reqwest::Client::new(), base, None)
}

fn video_json(id: &str, created_at: i64) -> serde_json::Value {
    json!({
        "id": id,
        "author_id": "author-1",
        "title": format!("Video {}", id),
        "views": 42,
        "created_at": created_at,
    })
}

fn page_json(ids: std::ops::Range<u32>, ts_start: i64) -> serde_json::Value {
    let videos: Vec<_> = ids
        .enumerate()
        .map(|(i, id)| video_json(&format!("v{}", id), ts_start - i as i64))
        .collect();
    json!({ "videos": videos })
}

// ============================================================================
// Wire Contract
// ============================================================================

#[tokio::test]
async fn test_fetch_page_sends_order_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/videos"))
        .and(query_param("order", "desc"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(0..10, 100_000)))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let page = api.fetch_page(SortOrder::Newest, None, 10).await.unwrap();
    assert_eq!(page.len(), 10);
    assert_eq!(&*page[0].id, "v0");
    assert_eq!(page[0].created_at, 100_000);
}

#[tokio::test]
async fn test_fetch_page_sends_cursor_as_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/videos"))
        .and(query_param("order", "asc"))
        .and(query_param("after", "12345"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "videos": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let page = api
        .fetch_page(SortOrder::Oldest, Some(12345), 5)
        .await
        .unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_http_error_maps_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/videos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = api
        .fetch_page(SortOrder::Newest, None, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::HttpStatus(500)));
}

#[tokio::test]
async fn test_malformed_body_maps_to_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = api
        .fetch_page(SortOrder::Newest, None, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_fetch_author_resolves_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/author-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "alice",
            "photo_url": "https://cdn.example.com/alice.png",
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let profile = api.fetch_author("author-1").await.unwrap();
    assert_eq!(&*profile.username, "alice");
    assert!(profile.photo_url.is_some());
}

// ============================================================================
// End-to-End Lifecycle
// ============================================================================

/// Seed, scroll to the bottom twice, and hit the end of the data: the second
/// page comes back short, the order is exhausted, and no further request is
/// ever issued.
#[tokio::test]
async fn test_scroll_until_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/videos"))
        .and(query_param("order", "desc"))
        .and(query_param("after", "99991"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(10..20, 99_990)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/videos"))
        .and(query_param("order", "desc"))
        .and(query_param("after", "99981"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(20..25, 99_980)))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);

    let mut feed = FeedState::new(
        (0..10)
            .map(|i| {
                serde_json::from_value(video_json(&format!("v{}", i), 100_000 - i as i64)).unwrap()
            })
            .collect(),
    );
    let mut controller = FilterController::new(10, 30);
    controller.observe_last(&feed);

    // First crossing: full page of 10.
    let request = controller.notify_last_visible(&feed).unwrap();
    let result = api
        .fetch_page(request.order, request.cursor, request.limit)
        .await;
    let outcome = controller.complete_load(&mut feed, request, result);
    assert!(matches!(
        outcome,
        LoadOutcome::Loaded { appended: 10, exhausted: false }
    ));

    // Second crossing: only 5 of 10 remain, order exhausts.
    let request = controller.notify_last_visible(&feed).unwrap();
    let result = api
        .fetch_page(request.order, request.cursor, request.limit)
        .await;
    let outcome = controller.complete_load(&mut feed, request, result);
    assert!(matches!(
        outcome,
        LoadOutcome::Loaded { appended: 5, exhausted: true }
    ));
    assert_eq!(feed.displayed().len(), 25);

    // Exhausted: no trigger, no request. The mock's expect(1) counts would
    // fail on drop if anything else had been fetched.
    assert!(controller.notify_last_visible(&feed).is_none());
}

/// First switch to the old-first order runs one bulk backfill and activates
/// it; switching back and forth afterwards never fetches again.
#[tokio::test]
async fn test_order_switch_backfills_once() {
    let server = MockServer::start().await;

    let oldest: Vec<_> = (0..30)
        .map(|i| video_json(&format!("old{}", i), 1_000 + i as i64))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/videos"))
        .and(query_param("order", "asc"))
        .and(query_param("limit", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "videos": oldest })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let mut feed = FeedState::new(
        (0..10)
            .map(|i| {
                serde_json::from_value(video_json(&format!("v{}", i), 100_000 - i as i64)).unwrap()
            })
            .collect(),
    );
    let mut controller = FilterController::new(10, 30);
    controller.observe_last(&feed);

    let request = match controller.begin_switch(&mut feed, SortOrder::Oldest) {
        SwitchAction::Backfill(req) => req,
        other => panic!("expected backfill, got {:?}", other),
    };
    assert_eq!(request.limit, 30);

    let result = api
        .fetch_page(request.order, request.cursor, request.limit)
        .await;
    let outcome = controller.complete_backfill(&mut feed, request, result);
    assert!(matches!(outcome, BackfillOutcome::Switched { appended: 30 }));
    assert_eq!(feed.active_order(), SortOrder::Oldest);
    assert_eq!(feed.displayed().len(), 30);
    assert_eq!(&*feed.displayed()[0].id, "old0");

    // Cached switches in both directions, no further requests.
    assert_eq!(
        controller.begin_switch(&mut feed, SortOrder::Newest),
        SwitchAction::Activated
    );
    assert_eq!(
        controller.begin_switch(&mut feed, SortOrder::Oldest),
        SwitchAction::Activated
    );
    assert_eq!(feed.displayed().len(), 30);
}

/// A transient backend failure leaves the cache untouched and the next
/// crossing retries the identical request.
#[tokio::test]
async fn test_failed_load_retries_same_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/videos"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let mut feed = FeedState::new(
        (0..10)
            .map(|i| {
                serde_json::from_value(video_json(&format!("v{}", i), 100_000 - i as i64)).unwrap()
            })
            .collect(),
    );
    let mut controller = FilterController::new(10, 30);
    controller.observe_last(&feed);

    let request = controller.notify_last_visible(&feed).unwrap();
    let result = api
        .fetch_page(request.order, request.cursor, request.limit)
        .await;
    let outcome = controller.complete_load(&mut feed, request, result);
    assert!(matches!(outcome, LoadOutcome::Failed(ApiError::HttpStatus(503))));

    assert_eq!(feed.displayed().len(), 10);
    assert!(!feed.is_exhausted(SortOrder::Newest));

    let retry = controller.notify_last_visible(&feed).unwrap();
    assert_eq!(retry, request);
}
