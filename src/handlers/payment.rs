//! Payment submission and verification handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::AppState;
use crate::models::auction::ErrorResponse;
use crate::models::payment::{
    AmountDueResponse, PaymentView, ReviewPaymentBody, SubmitPaymentBody,
};
use crate::services::payments::{self, PaymentSubmission};

use super::error_response;

pub async fn submit_participation_payment(
    State(state): State<AppState>,
    Path(auction_id): Path<i32>,
    Json(body): Json<SubmitPaymentBody>,
) -> Result<(StatusCode, Json<PaymentView>), (StatusCode, Json<ErrorResponse>)> {
    let payment = payments::submit_participation_payment(
        &state.db,
        auction_id,
        body.user_id,
        PaymentSubmission {
            amount: body.amount,
            method: body.method,
            screenshot: body.screenshot,
            transaction_id: body.transaction_id,
            payment_date: body.payment_date,
        },
        Utc::now(),
    )
    .await
    .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(payment.into())))
}

pub async fn submit_winner_payment(
    State(state): State<AppState>,
    Path(auction_id): Path<i32>,
    Json(body): Json<SubmitPaymentBody>,
) -> Result<(StatusCode, Json<PaymentView>), (StatusCode, Json<ErrorResponse>)> {
    let payment = payments::submit_winner_payment(
        &state.db,
        auction_id,
        body.user_id,
        PaymentSubmission {
            amount: body.amount,
            method: body.method,
            screenshot: body.screenshot,
            transaction_id: body.transaction_id,
            payment_date: body.payment_date,
        },
        Utc::now(),
    )
    .await
    .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(payment.into())))
}

pub async fn approve_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<i32>,
    Json(body): Json<ReviewPaymentBody>,
) -> Result<Json<PaymentView>, (StatusCode, Json<ErrorResponse>)> {
    let payment = payments::approve_payment(
        &state.db,
        payment_id,
        body.admin_id,
        body.notes,
        Utc::now(),
    )
    .await
    .map_err(error_response)?;
    Ok(Json(payment.into()))
}

pub async fn reject_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<i32>,
    Json(body): Json<ReviewPaymentBody>,
) -> Result<Json<PaymentView>, (StatusCode, Json<ErrorResponse>)> {
    let payment = payments::reject_payment(
        &state.db,
        payment_id,
        body.admin_id,
        body.notes.unwrap_or_default(),
        Utc::now(),
    )
    .await
    .map_err(error_response)?;
    Ok(Json(payment.into()))
}

pub async fn get_amount_due(
    State(state): State<AppState>,
    Path((auction_id, user_id)): Path<(i32, i32)>,
) -> Result<Json<AmountDueResponse>, (StatusCode, Json<ErrorResponse>)> {
    let quote = payments::amount_due_for(&state.db, auction_id, user_id, Utc::now())
        .await
        .map_err(error_response)?;

    Ok(Json(AmountDueResponse {
        auction_id,
        user_id,
        winning_amount: quote.winning_amount,
        floor: quote.floor,
        amount_due: quote.amount_due,
    }))
}
