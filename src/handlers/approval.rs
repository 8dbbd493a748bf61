//! Approval pipeline handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::AppState;
use crate::models::approval::{
    ApproveResponse, AuctionRequestView, RejectResponse, ReviewRequestBody,
    SubmitAuctionRequestBody,
};
use crate::models::auction::ErrorResponse;
use crate::services::approval::{self, ApproveOutcome, NewAuctionRequest};

use super::error_response;

pub async fn submit_auction_request(
    State(state): State<AppState>,
    Json(body): Json<SubmitAuctionRequestBody>,
) -> Result<(StatusCode, Json<AuctionRequestView>), (StatusCode, Json<ErrorResponse>)> {
    let request = approval::submit_request(
        &state.db,
        NewAuctionRequest {
            seller_id: body.seller_id,
            title: body.title,
            description: body.description,
            starting_price: body.starting_price,
            bid_increment: body.bid_increment,
            minimum_price: body.minimum_price,
            reserve_price: body.reserve_price,
            start_date: body.start_date,
            end_date: body.end_date,
            auction_code: body.auction_code,
            participation_code: body.participation_code,
        },
        Utc::now(),
    )
    .await
    .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(request.into())))
}

pub async fn approve_request(
    State(state): State<AppState>,
    Path(request_id): Path<i32>,
    Json(body): Json<ReviewRequestBody>,
) -> Result<Json<ApproveResponse>, (StatusCode, Json<ErrorResponse>)> {
    let outcome = approval::approve_request(
        &state.db,
        request_id,
        body.admin_id,
        body.notes,
        Utc::now(),
    )
    .await
    .map_err(error_response)?;

    let response = match outcome {
        ApproveOutcome::Created { auction_id } => ApproveResponse {
            request_id,
            auction_id: Some(auction_id),
            already_approved: false,
        },
        ApproveOutcome::AlreadyApproved { auction_id } => ApproveResponse {
            request_id,
            auction_id,
            already_approved: true,
        },
    };
    Ok(Json(response))
}

pub async fn reject_request(
    State(state): State<AppState>,
    Path(request_id): Path<i32>,
    Json(body): Json<ReviewRequestBody>,
) -> Result<Json<RejectResponse>, (StatusCode, Json<ErrorResponse>)> {
    approval::reject_request(
        &state.db,
        request_id,
        body.admin_id,
        body.notes.unwrap_or_default(),
        Utc::now(),
    )
    .await
    .map_err(error_response)?;

    Ok(Json(RejectResponse {
        request_id,
        approval_status: crate::entities::auction_requests::ApprovalStatus::Rejected,
    }))
}
