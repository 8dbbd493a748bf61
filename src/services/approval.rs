//! Approval pipeline
//!
//! Two-phase promotion of a reserve auction request into a live auction.
//! pending -> approved | rejected is one-way; callers get the terminal state
//! back instead of a silent failure when a request was already reviewed.
//! Auction construction and request bookkeeping commit in one transaction so
//! a request can never end up approved without its auction, or vice versa.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
    SqlErr, TransactionError, TransactionTrait,
};
use tracing::info;

use crate::entities::auction_requests::{self, ApprovalStatus};
use crate::entities::auctions::{self, AuctionStatus, AuctionType, BidLedger};
use crate::entities::prelude::*;
use crate::services::auction_store::{
    self, DEFAULT_BID_INCREMENT, ensure_codes_available, generate_code,
};
use crate::services::error::{CoreError, ErrorReason};

/// Fields submitted for a reserve auction awaiting review.
#[derive(Debug, Clone)]
pub struct NewAuctionRequest {
    pub seller_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub starting_price: Decimal,
    pub bid_increment: Option<Decimal>,
    pub minimum_price: Option<Decimal>,
    pub reserve_price: Option<Decimal>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub auction_code: Option<String>,
    pub participation_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApproveOutcome {
    Created { auction_id: i32 },
    /// Request was already approved; the intended end state exists
    AlreadyApproved { auction_id: Option<i32> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectOutcome {
    Rejected,
    /// Request was already rejected; idempotent no-op
    AlreadyRejected,
}

/// Stage a reserve auction for review. Codes must be free across both live
/// auctions and other pending requests.
pub async fn submit_request(
    db: &DatabaseConnection,
    new: NewAuctionRequest,
    now: DateTime<Utc>,
) -> Result<auction_requests::Model, CoreError> {
    let seller = Users::find_by_id(new.seller_id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::not_found("user", new.seller_id))?;
    if seller.suspended {
        return Err(CoreError::forbidden(
            ErrorReason::Suspended,
            format!("user {} is suspended", seller.id),
        ));
    }

    let bid_increment = new.bid_increment.unwrap_or(DEFAULT_BID_INCREMENT);
    auction_store::validate_economics(
        &new.title,
        new.starting_price,
        bid_increment,
        new.start_date,
        new.end_date,
    )?;

    let auction_code = new.auction_code.unwrap_or_else(|| generate_code("AUC"));
    let participation_code = new
        .participation_code
        .unwrap_or_else(|| generate_code("JOIN"));
    ensure_codes_available(db, &auction_code, &participation_code).await?;

    let row = auction_requests::ActiveModel {
        auction_code: Set(auction_code),
        participation_code: Set(participation_code),
        title: Set(new.title),
        description: Set(new.description),
        auction_type: Set(AuctionType::Reserve),
        starting_price: Set(new.starting_price),
        bid_increment: Set(bid_increment),
        minimum_price: Set(new.minimum_price),
        reserve_price: Set(new.reserve_price),
        start_date: Set(new.start_date),
        end_date: Set(new.end_date),
        seller_id: Set(new.seller_id),
        approval_status: Set(ApprovalStatus::Pending),
        submitted_at: Set(now),
        ..Default::default()
    };

    match row.insert(db).await {
        Ok(request) => Ok(request),
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(CoreError::conflict(
                ErrorReason::DuplicateAuctionCode,
                "auction code or participation code already in use",
            )),
            _ => Err(err.into()),
        },
    }
}

/// Promote a pending request into a live auction.
pub async fn approve_request(
    db: &DatabaseConnection,
    request_id: i32,
    admin_id: i32,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<ApproveOutcome, CoreError> {
    let request = AuctionRequests::find_by_id(request_id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::not_found("auction request", request_id))?;

    match request.approval_status {
        ApprovalStatus::Approved => {
            return Ok(ApproveOutcome::AlreadyApproved {
                auction_id: request.created_auction,
            });
        }
        ApprovalStatus::Rejected => {
            let reason = request
                .admin_notes
                .unwrap_or_else(|| "no reason given".to_string());
            return Err(CoreError::invalid_state(
                ErrorReason::AlreadyRejected,
                format!("auction request was already rejected: {}", reason),
            ));
        }
        ApprovalStatus::Pending => {}
    }

    auction_store::validate_economics(
        &request.title,
        request.starting_price,
        request.bid_increment,
        request.start_date,
        request.end_date,
    )?;

    // Replay: an earlier approval already produced the auction. Finish the
    // request bookkeeping and report success instead of a code conflict.
    if let Some(existing_id) = request.created_auction {
        if Auctions::find_by_id(existing_id).one(db).await?.is_some() {
            let mut row: auction_requests::ActiveModel = request.into();
            row.approval_status = Set(ApprovalStatus::Approved);
            row.reviewed_by = Set(Some(admin_id));
            row.reviewed_at = Set(Some(now));
            row.admin_notes = Set(notes);
            row.update(db).await?;
            return Ok(ApproveOutcome::Created {
                auction_id: existing_id,
            });
        }
    }

    let colliding = Auctions::find()
        .filter(
            Condition::any()
                .add(auctions::Column::AuctionCode.eq(&request.auction_code))
                .add(auctions::Column::ParticipationCode.eq(&request.participation_code)),
        )
        .all(db)
        .await?;
    for hit in colliding {
        if Some(hit.id) == request.created_auction {
            continue;
        }
        let reason = if hit.auction_code == request.auction_code {
            ErrorReason::DuplicateAuctionCode
        } else {
            ErrorReason::DuplicateParticipationCode
        };
        return Err(CoreError::conflict(
            reason,
            format!("auction {} already uses this code", hit.auction_code),
        ));
    }

    let status = auction_store::derive_status(
        AuctionStatus::Upcoming,
        request.start_date,
        request.end_date,
        now,
    );
    let request_code = request.auction_code.clone();

    let auction_id = db
        .transaction::<_, i32, CoreError>(|txn| {
            let request = request.clone();
            let notes = notes.clone();
            Box::pin(async move {
                let auction = auctions::ActiveModel {
                    auction_code: Set(request.auction_code.clone()),
                    participation_code: Set(request.participation_code.clone()),
                    title: Set(request.title.clone()),
                    description: Set(request.description.clone()),
                    auction_type: Set(request.auction_type),
                    starting_price: Set(request.starting_price),
                    bid_increment: Set(request.bid_increment),
                    minimum_price: Set(request.minimum_price),
                    reserve_price: Set(request.reserve_price),
                    current_bid: Set(request.starting_price),
                    current_highest_bidder: Set(None),
                    bids: Set(BidLedger::default()),
                    start_date: Set(request.start_date),
                    end_date: Set(request.end_date),
                    status: Set(status),
                    seller_id: Set(request.seller_id),
                    needs_approval: Set(false),
                    approval_status: Set(Some(ApprovalStatus::Approved)),
                    reviewed_by: Set(Some(admin_id)),
                    reviewed_at: Set(Some(now)),
                    admin_notes: Set(notes.clone()),
                    version: Set(0),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                let mut row: auction_requests::ActiveModel = request.into();
                row.approval_status = Set(ApprovalStatus::Approved);
                row.reviewed_by = Set(Some(admin_id));
                row.reviewed_at = Set(Some(now));
                row.admin_notes = Set(notes);
                row.created_auction = Set(Some(auction.id));
                row.update(txn).await?;

                Ok(auction.id)
            })
        })
        .await
        .map_err(unwrap_transaction_error)?;

    info!(
        request_id,
        auction_id,
        auction_code = %request_code,
        reviewed_by = admin_id,
        "Auction request approved"
    );
    Ok(ApproveOutcome::Created { auction_id })
}

/// Reject a pending request with a mandatory reason.
pub async fn reject_request(
    db: &DatabaseConnection,
    request_id: i32,
    admin_id: i32,
    notes: String,
    now: DateTime<Utc>,
) -> Result<RejectOutcome, CoreError> {
    if notes.trim().is_empty() {
        return Err(CoreError::invalid_argument(
            ErrorReason::EmptyNotes,
            "a rejection reason is required",
        ));
    }

    let request = AuctionRequests::find_by_id(request_id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::not_found("auction request", request_id))?;

    match request.approval_status {
        ApprovalStatus::Rejected => return Ok(RejectOutcome::AlreadyRejected),
        ApprovalStatus::Approved => {
            return Err(CoreError::invalid_state(
                ErrorReason::AlreadyApproved,
                "auction request was already approved",
            ));
        }
        ApprovalStatus::Pending => {}
    }

    let mut row: auction_requests::ActiveModel = request.into();
    row.approval_status = Set(ApprovalStatus::Rejected);
    row.reviewed_by = Set(Some(admin_id));
    row.reviewed_at = Set(Some(now));
    row.admin_notes = Set(Some(notes));
    row.update(db).await?;

    info!(request_id, reviewed_by = admin_id, "Auction request rejected");
    Ok(RejectOutcome::Rejected)
}

fn unwrap_transaction_error(err: TransactionError<CoreError>) -> CoreError {
    match err {
        TransactionError::Connection(e) => CoreError::Database(e),
        TransactionError::Transaction(e) => e,
    }
}
