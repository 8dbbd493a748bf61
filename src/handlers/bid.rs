//! Bid placement handler

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::AppState;
use crate::models::auction::ErrorResponse;
use crate::models::bid::{PlaceBidRequest, PlaceBidResponse};
use crate::services::bid_engine;

use super::error_response;

pub async fn place_bid(
    State(state): State<AppState>,
    Path(auction_id): Path<i32>,
    Json(body): Json<PlaceBidRequest>,
) -> Result<(StatusCode, Json<PlaceBidResponse>), (StatusCode, Json<ErrorResponse>)> {
    let outcome = bid_engine::place_bid(&state.db, auction_id, body.user_id, body.amount, Utc::now())
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(PlaceBidResponse {
            auction: outcome.auction.into(),
            bid: outcome.bid.into(),
        }),
    ))
}
