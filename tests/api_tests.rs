mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::{get, post},
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use auctionhouse_backend::AppState;
use auctionhouse_backend::handlers;
use auctionhouse_backend::services::notification::LogNotifier;

use crate::common::{seed_user, setup_test_db};

async fn build_test_router() -> (Router, AppState) {
    let db = setup_test_db().await;
    let state = AppState {
        db,
        notifier: Arc::new(LogNotifier),
    };

    let router = Router::new()
        .route("/api/auctions", post(handlers::auction::create_auction))
        .route("/api/auctions/{id}", get(handlers::auction::get_auction))
        .route("/api/auctions/{id}/bids", post(handlers::bid::place_bid))
        .route(
            "/api/admin/lifecycle/sweep",
            post(handlers::auction::run_sweep),
        )
        .with_state(state.clone());
    (router, state)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_create_and_get_auction() {
    let (app, state) = build_test_router().await;
    let seller = seed_user(&state.db, "Seller", false).await;

    let now = Utc::now();
    let body = json!({
        "seller_id": seller.id,
        "title": "Vintage radio",
        "auction_type": "english",
        "starting_price": 100,
        "start_date": (now - Duration::hours(1)).to_rfc3339(),
        "end_date": (now + Duration::hours(1)).to_rfc3339(),
    });

    let response = app
        .clone()
        .oneshot(post_json("/api/auctions", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = response_json(response).await;
    assert_eq!(created["title"], "Vintage radio");
    assert_eq!(created["status"], "active");
    assert_eq!(created["current_bid"], "100");
    let auction_id = created["id"].as_i64().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/auctions/{}", auction_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = response_json(response).await;
    assert_eq!(fetched["id"].as_i64().unwrap(), auction_id);
    assert_eq!(fetched["bid_count"], 0);
}

#[tokio::test]
async fn test_get_missing_auction_returns_error_envelope() {
    let (app, _state) = build_test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auctions/9999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["kind"], "NOT_FOUND");
    assert!(body["error"].as_str().unwrap().contains("9999"));
}

#[tokio::test]
async fn test_bid_placement_and_validation_over_http() {
    let (app, state) = build_test_router().await;
    let seller = seed_user(&state.db, "Seller", false).await;
    let alice = seed_user(&state.db, "Alice", false).await;

    let now = Utc::now();
    let create = json!({
        "seller_id": seller.id,
        "title": "Oak desk",
        "auction_type": "english",
        "starting_price": 100,
        "bid_increment": 10,
        "start_date": (now - Duration::hours(1)).to_rfc3339(),
        "end_date": (now + Duration::hours(1)).to_rfc3339(),
    });
    let response = app
        .clone()
        .oneshot(post_json("/api/auctions", create))
        .await
        .unwrap();
    let auction_id = response_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/auctions/{}/bids", auction_id),
            json!({"user_id": alice.id, "amount": 110}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let accepted = response_json(response).await;
    assert_eq!(accepted["auction"]["current_bid"], "110");
    assert_eq!(accepted["bid"]["bidder"].as_i64().unwrap(), alice.id as i64);

    // Below increment: 400 with the sub-reason in the envelope
    let response = app
        .oneshot(post_json(
            &format!("/api/auctions/{}/bids", auction_id),
            json!({"user_id": alice.id, "amount": 115}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["kind"], "INVALID_ARGUMENT");
    assert_eq!(body["code"], "BELOW_INCREMENT");
}

#[tokio::test]
async fn test_manual_sweep_endpoint_reports_stats() {
    let (app, _state) = build_test_router().await;

    let response = app
        .oneshot(post_json("/api/admin/lifecycle/sweep", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["scanned"], 0);
    assert_eq!(body["ended"], 0);
    assert_eq!(body["winners_created"], 0);
}
