//! Auction lifecycle handlers: creation, read, force-end, soft-delete and
//! the manual sweep trigger.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::AppState;
use crate::models::auction::{
    AuctionView, CreateAuctionRequest, DeleteAuctionRequest, ErrorResponse, ForceEndRequest,
    SweepResponse,
};
use crate::services::auction_store::{self, NewAuction};
use crate::services::lifecycle;

use super::error_response;

pub async fn create_auction(
    State(state): State<AppState>,
    Json(body): Json<CreateAuctionRequest>,
) -> Result<(StatusCode, Json<AuctionView>), (StatusCode, Json<ErrorResponse>)> {
    let auction = auction_store::create_auction(
        &state.db,
        NewAuction {
            title: body.title,
            description: body.description,
            auction_type: body.auction_type,
            starting_price: body.starting_price,
            bid_increment: body.bid_increment,
            minimum_price: body.minimum_price,
            reserve_price: body.reserve_price,
            start_date: body.start_date,
            end_date: body.end_date,
            seller_id: body.seller_id,
            auction_code: body.auction_code,
            participation_code: body.participation_code,
        },
        Utc::now(),
    )
    .await
    .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(auction.into())))
}

pub async fn get_auction(
    State(state): State<AppState>,
    Path(auction_id): Path<i32>,
) -> Result<Json<AuctionView>, (StatusCode, Json<ErrorResponse>)> {
    let auction = auction_store::get(&state.db, auction_id, Utc::now())
        .await
        .map_err(error_response)?;
    Ok(Json(auction.into()))
}

pub async fn force_end_auction(
    State(state): State<AppState>,
    Path(auction_id): Path<i32>,
    Json(body): Json<ForceEndRequest>,
) -> Result<Json<AuctionView>, (StatusCode, Json<ErrorResponse>)> {
    let auction = lifecycle::force_end(
        &state.db,
        state.notifier.as_ref(),
        auction_id,
        body.user_id,
        Utc::now(),
    )
    .await
    .map_err(error_response)?;
    Ok(Json(auction.into()))
}

pub async fn delete_auction(
    State(state): State<AppState>,
    Path(auction_id): Path<i32>,
    Json(body): Json<DeleteAuctionRequest>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    auction_store::soft_delete(&state.db, auction_id, body.user_id, Utc::now())
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Manual trigger for one lifecycle sweep pass; same logic as the job tick.
pub async fn run_sweep(
    State(state): State<AppState>,
) -> Result<Json<SweepResponse>, (StatusCode, Json<ErrorResponse>)> {
    let stats = lifecycle::run_sweep(&state.db, state.notifier.as_ref(), Utc::now())
        .await
        .map_err(error_response)?;
    Ok(Json(SweepResponse {
        scanned: stats.scanned,
        ended: stats.ended,
        winners_created: stats.winners_created,
        failures: stats.failures,
    }))
}
