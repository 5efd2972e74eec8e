mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;

use campusdesk_cache::MonthState;
use campusdesk_models::calendar::MonthKey;
use common::{body_json, test_app};

fn october() -> MonthKey {
    MonthKey::new(2026, 10).unwrap()
}

fn x_cache(response: &axum::http::Response<Body>) -> &str {
    response
        .headers()
        .get("x-cache")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_month_is_fetched_once_then_served_from_cache() {
    let app = test_app();

    let first = app.get("/api/calendar/2026-10").await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(x_cache(&first), "MISS");

    let body = body_json(first).await;
    assert_eq!(body["data"]["month"], "2026-10");
    assert_eq!(body["data"]["public_holidays"].as_array().unwrap().len(), 1);

    let cells = body["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 35);
    assert_eq!(cells[0]["date"], "2026-09-27");
    assert_eq!(cells[0]["is_current_month"], false);
    assert_eq!(cells[0]["classification"]["kind"], "sunday");
    assert_eq!(cells[5]["date"], "2026-10-02");
    assert_eq!(cells[5]["classification"]["kind"], "public_holiday");
    assert_eq!(cells[5]["label"], "Gandhi Jayanti");
    assert_eq!(cells[7]["classification"]["kind"], "sunday");
    assert_eq!(cells[6]["classification"]["kind"], "working_day");

    let second = app.get("/api/calendar/2026-10").await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(x_cache(&second), "HIT");
    assert_eq!(app.feed.calls(), 1);
}

#[tokio::test]
async fn test_force_refetches_month() {
    let app = test_app();

    app.get("/api/calendar/2026-10").await;
    let forced = app.get("/api/calendar/2026-10?force=true").await;

    assert_eq!(forced.status(), StatusCode::OK);
    assert_eq!(x_cache(&forced), "MISS");
    assert_eq!(app.feed.calls(), 2);
}

#[tokio::test]
async fn test_months_are_cached_independently() {
    let app = test_app();

    app.get("/api/calendar/2026-10").await;
    let november = app.get("/api/calendar/2026-11").await;

    assert_eq!(x_cache(&november), "MISS");
    assert_eq!(app.feed.calls(), 2);
}

#[tokio::test]
async fn test_invalid_month_is_rejected() {
    let app = test_app();

    for uri in ["/api/calendar/2026-13", "/api/calendar/october", "/api/calendar/2026-1"] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert!(body_json(response).await["error"].is_string());
    }
    assert_eq!(app.feed.calls(), 0);
}

#[tokio::test]
async fn test_feed_failure_serves_uncached_fallback() {
    let app = test_app();
    app.feed.set_failing(true);

    let response = app.get("/api/calendar/2026-10").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(x_cache(&response), "FALLBACK");
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );

    let body = body_json(response).await;
    assert!(body["data"]["public_holidays"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["sundays"].as_array().unwrap().len(), 4);
    assert_eq!(body["cells"][5]["classification"]["kind"], "working_day");

    // The fallback was not stored, so a recovered feed is used next time
    app.feed.set_failing(false);
    let recovered = app.get("/api/calendar/2026-10").await;
    assert_eq!(x_cache(&recovered), "MISS");
    assert_eq!(app.feed.calls(), 2);
}

#[tokio::test]
async fn test_feed_failure_without_fallback_is_bad_gateway() {
    let app = test_app();
    app.feed.set_failing(true);

    let response = app.get("/api/calendar/2026-10?fallback=false").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );

    let state = app.get("/api/calendar/2026-10/state").await;
    let body = body_json(state).await;
    assert_eq!(body["state"], "error");
    assert!(body["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_month_state_follows_lifecycle() {
    let app = test_app();

    let before = body_json(app.get("/api/calendar/2026-10/state").await).await;
    assert_eq!(before["state"], MonthState::Unfetched.as_str());
    assert!(before["error"].is_null());

    app.get("/api/calendar/2026-10").await;

    let after = body_json(app.get("/api/calendar/2026-10/state").await).await;
    assert_eq!(after["month"], october().to_string());
    assert_eq!(after["state"], "ready");
}

#[tokio::test]
async fn test_month_view_supports_conditional_requests() {
    let app = test_app();

    let first = app.get("/api/calendar/2026-10").await;
    assert_eq!(
        first.headers().get(header::CACHE_CONTROL).unwrap(),
        "private, max-age=60, must-revalidate"
    );
    let etag = first.headers().get(header::ETAG).unwrap().clone();

    let request = Request::builder()
        .uri("/api/calendar/2026-10")
        .header(header::IF_NONE_MATCH, etag.clone())
        .body(Body::empty())
        .unwrap();
    let second = app.send(request).await;

    assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(second.headers().get(header::ETAG).unwrap(), &etag);
}

#[tokio::test]
async fn test_creating_holiday_refreshes_its_month() {
    let app = test_app();

    app.get("/api/calendar/2026-10").await;
    assert_eq!(app.feed.calls(), 1);

    let created = app
        .post_json(
            "/api/calendar/holidays",
            json!({ "date": "2026-10-20", "title": "Convocation", "description": "Main hall" }),
        )
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let holiday = body_json(created).await;
    assert_eq!(holiday["date"], "2026-10-20");
    assert_eq!(holiday["title"], "Convocation");
    assert_eq!(app.feed.calls(), 2);

    let view = app.get("/api/calendar/2026-10").await;
    assert_eq!(x_cache(&view), "HIT");
    let body = body_json(view).await;
    let cell = body["cells"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["date"] == "2026-10-20")
        .unwrap()
        .clone();
    assert_eq!(cell["classification"]["kind"], "institute_holiday");
    assert_eq!(cell["label"], "Convocation");
}

#[tokio::test]
async fn test_deleting_holiday_refreshes_its_month() {
    let app = test_app();

    app.post_json(
        "/api/calendar/holidays",
        json!({ "date": "2026-10-20", "title": "Convocation" }),
    )
    .await;

    let deleted = app.delete("/api/calendar/holidays/2026-10-20").await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let body = body_json(app.get("/api/calendar/2026-10").await).await;
    assert!(body["data"]["custom_holidays"].as_array().unwrap().is_empty());
    assert_eq!(app.feed.calls(), 2);
}

#[tokio::test]
async fn test_holiday_write_succeeds_when_refresh_fails() {
    let app = test_app();
    app.feed.set_failing(true);

    let created = app
        .post_json(
            "/api/calendar/holidays",
            json!({ "date": "2026-10-20", "title": "Convocation" }),
        )
        .await;

    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(app.store.in_month(october()).len(), 1);
}

#[tokio::test]
async fn test_invalid_holiday_is_rejected() {
    let app = test_app();

    let blank_title = app
        .post_json(
            "/api/calendar/holidays",
            json!({ "date": "2026-10-20", "title": "" }),
        )
        .await;
    assert_eq!(blank_title.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(blank_title).await["error"],
        "title must be 1-120 characters"
    );

    let missing_date = app
        .post_json("/api/calendar/holidays", json!({ "title": "Convocation" }))
        .await;
    assert_eq!(missing_date.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(missing_date).await["error"], "date is required");

    assert_eq!(app.feed.calls(), 0);
}
