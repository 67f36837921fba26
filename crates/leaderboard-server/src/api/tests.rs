//! Tests for the REST API.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use leaderboard_core::{Limit, RankedRecord, Ranking, RankingStore, StoreError};
use leaderboard_store::SqliteRankingStore;
use leaderboard_test::{epoch, ManualClock, ALICE, BOB, CAROL, DAVE};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::*;

// ============================================================================
// Fixtures
// ============================================================================

struct Harness {
    app: Router,
    store: Arc<SqliteRankingStore>,
    clock: Arc<ManualClock>,
}

fn harness() -> Harness {
    let clock = Arc::new(ManualClock::new());
    let store = Arc::new(SqliteRankingStore::in_memory_with_clock(clock.clone()).unwrap());
    let app = router(Arc::new(AppState::new(store.clone())));
    Harness { app, store, clock }
}

/// A store whose backing database is gone.
struct BrokenStore;

impl RankingStore for BrokenStore {
    fn submit_score(&self, _: &str, _: &str, _: i64) -> leaderboard_core::Result<()> {
        Err(StoreError::Db("disk I/O error".to_string()))
    }

    fn top_ranking(&self, _: Limit) -> leaderboard_core::Result<Ranking> {
        Err(StoreError::Db("disk I/O error".to_string()))
    }

    fn player_ranking(&self, _: &str) -> leaderboard_core::Result<Option<RankedRecord>> {
        Err(StoreError::Db("disk I/O error".to_string()))
    }

    fn reset(&self) -> leaderboard_core::Result<()> {
        Err(StoreError::Db("disk I/O error".to_string()))
    }
}

async fn send(app: &Router, method: Method, uri: &str, body: Body) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn get_json(app: &Router, uri: &str) -> Value {
    let response = send(app, Method::GET, uri, Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn post(app: &Router, body: Value) -> Response {
    send(app, Method::POST, "/", Body::from(body.to_string())).await
}

async fn submit(app: &Router, id: &str, name: &str, score: i64) {
    let response = post(app, json!({"uuid": id, "user_name": name, "score": score})).await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn body_len(response: Response) -> usize {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().len()
}

fn assert_cors(response: &Response) {
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, POST");
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_submit_then_top_one() {
    let h = harness();
    submit(&h.app, ALICE.id, ALICE.name, 100).await;

    let body = get_json(&h.app, "/?limit=1").await;
    assert_eq!(
        body,
        json!({
            "1": {
                "log_time": "2024-01-01 00:00:00",
                "uuid": ALICE.id,
                "user_name": "alice",
                "score": 100,
            }
        })
    );
}

#[tokio::test]
async fn test_lower_then_higher_submission() {
    let h = harness();
    submit(&h.app, ALICE.id, ALICE.name, 100).await;
    submit(&h.app, ALICE.id, ALICE.name, 50).await;

    let body = get_json(&h.app, &format!("/?uuid={}", ALICE.id)).await;
    assert_eq!(body["1"]["score"], 100);

    h.clock.advance_secs(30);
    submit(&h.app, ALICE.id, ALICE.name, 150).await;

    let body = get_json(&h.app, &format!("/?uuid={}", ALICE.id)).await;
    assert_eq!(body["1"]["score"], 150);
    assert_eq!(body["1"]["log_time"], "2024-01-01 00:00:30");
}

#[tokio::test]
async fn test_unknown_player_is_empty_object() {
    let h = harness();
    submit(&h.app, ALICE.id, ALICE.name, 100).await;

    assert_eq!(get_json(&h.app, "/?uuid=unknown-uuid").await, json!({}));
}

#[tokio::test]
async fn test_empty_leaderboard_is_empty_object() {
    let h = harness();
    assert_eq!(get_json(&h.app, "/").await, json!({}));
    assert_eq!(get_json(&h.app, "/?limit=5").await, json!({}));
}

#[tokio::test]
async fn test_tied_players_share_dense_rank() {
    let h = harness();
    submit(&h.app, BOB.id, BOB.name, 200).await;
    submit(&h.app, CAROL.id, CAROL.name, 200).await;
    submit(&h.app, DAVE.id, DAVE.name, 150).await;

    let bob = get_json(&h.app, &format!("/?uuid={}", BOB.id)).await;
    let carol = get_json(&h.app, &format!("/?uuid={}", CAROL.id)).await;
    let dave = get_json(&h.app, &format!("/?uuid={}", DAVE.id)).await;

    assert_eq!(bob["1"]["uuid"], BOB.id);
    assert_eq!(carol["1"]["uuid"], CAROL.id);
    assert_eq!(dave["2"]["uuid"], DAVE.id);
}

#[tokio::test]
async fn test_partial_post_is_rejected_without_mutation() {
    let h = harness();
    let response = post(&h.app, json!({"uuid": "x"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_cors(&response);
    assert_eq!(body_len(response).await, 0);
    assert!(h.store.top_ranking(Limit::Unbounded).unwrap().is_empty());
}

// ============================================================================
// GET routing
// ============================================================================

#[tokio::test]
async fn test_get_without_params_returns_everyone() {
    let h = harness();
    submit(&h.app, ALICE.id, ALICE.name, 10).await;
    submit(&h.app, BOB.id, BOB.name, 30).await;
    submit(&h.app, CAROL.id, CAROL.name, 20).await;

    let body = get_json(&h.app, "/").await;
    assert_eq!(body.as_object().unwrap().len(), 3);
    assert_eq!(body["1"]["uuid"], BOB.id);
    assert_eq!(body["2"]["uuid"], CAROL.id);
    assert_eq!(body["3"]["uuid"], ALICE.id);

    assert_eq!(get_json(&h.app, "/?limit=0").await, body);
    assert_eq!(get_json(&h.app, "/?limit=-1").await, body);
    assert_eq!(get_json(&h.app, "/?other=1").await, body);
}

#[tokio::test]
async fn test_uuid_wins_over_limit() {
    let h = harness();
    submit(&h.app, ALICE.id, ALICE.name, 10).await;
    submit(&h.app, BOB.id, BOB.name, 30).await;

    let body = get_json(&h.app, &format!("/?limit=1&uuid={}", ALICE.id)).await;
    assert_eq!(body, json!({"2": {
        "log_time": "2024-01-01 00:00:00",
        "uuid": ALICE.id,
        "user_name": "alice",
        "score": 10,
    }}));
}

#[tokio::test]
async fn test_bad_limit_is_rejected() {
    let h = harness();
    let response = send(&h.app, Method::GET, "/?limit=many", Body::empty()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_cors(&response);
    assert_eq!(body_len(response).await, 0);
}

#[tokio::test]
async fn test_get_headers() {
    let h = harness();
    submit(&h.app, ALICE.id, ALICE.name, 10).await;

    let response = send(&h.app, Method::GET, "/", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_cors(&response);

    let headers = response.headers().clone();
    assert_eq!(
        headers[header::CONTENT_TYPE],
        "application/json; charset=utf-8"
    );
    let declared: usize = headers[header::CONTENT_LENGTH]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(declared, body_len(response).await);
}

#[tokio::test]
async fn test_any_path_is_the_same_resource() {
    let h = harness();
    submit(&h.app, ALICE.id, ALICE.name, 10).await;

    assert_eq!(get_json(&h.app, "/ranking").await, get_json(&h.app, "/").await);
}

// ============================================================================
// POST handling
// ============================================================================

#[tokio::test]
async fn test_post_success_has_empty_body() {
    let h = harness();
    let response = post(
        &h.app,
        json!({"uuid": ALICE.id, "user_name": ALICE.name, "score": 5}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors(&response);
    assert_eq!(body_len(response).await, 0);

    let ranked = h.store.player_ranking(ALICE.id).unwrap().unwrap();
    assert_eq!(ranked.record.score, 5);
    assert_eq!(ranked.record.logged_at, epoch());
}

#[tokio::test]
async fn test_post_accepts_string_score() {
    let h = harness();
    let response = post(
        &h.app,
        json!({"uuid": ALICE.id, "user_name": ALICE.name, "score": "250"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        h.store.player_ranking(ALICE.id).unwrap().unwrap().record.score,
        250
    );
}

#[tokio::test]
async fn test_malformed_post_bodies_are_rejected() {
    let h = harness();
    for body in ["", "{", "[]", "null", "\"text\""] {
        let response = send(&h.app, Method::POST, "/", Body::from(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body:?}");
        assert_cors(&response);
    }
    assert!(h.store.top_ranking(Limit::Unbounded).unwrap().is_empty());
}

#[tokio::test]
async fn test_other_methods_are_rejected() {
    let h = harness();
    for method in [
        Method::HEAD,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
        Method::OPTIONS,
    ] {
        let response = send(&h.app, method.clone(), "/", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method}");
        assert_cors(&response);
        assert_eq!(body_len(response).await, 0);
    }
}

#[tokio::test]
async fn test_head_does_not_serve_ranking() {
    let h = harness();
    h.store.submit_score(ALICE.id, ALICE.name, 100).unwrap();

    let response = send(&h.app, Method::HEAD, "/?limit=1", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    assert_cors(&response);
}

// ============================================================================
// Store failures
// ============================================================================

#[tokio::test]
async fn test_store_failure_is_server_error() {
    let app = router(Arc::new(AppState::new(Arc::new(BrokenStore))));

    for uri in ["/", "/?limit=3", "/?uuid=abc"] {
        let response = send(&app, Method::GET, uri, Body::empty()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_cors(&response);
        assert_eq!(body_len(response).await, 0);
    }

    let response = post(&app, json!({"uuid": "a", "user_name": "b", "score": 1})).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&response);
}

#[tokio::test]
async fn test_validation_happens_before_store() {
    let app = router(Arc::new(AppState::new(Arc::new(BrokenStore))));

    let response = post(&app, json!({"uuid": "a"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, Method::GET, "/?limit=x", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
