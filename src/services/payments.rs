//! Payment ledger operations
//!
//! Payment requests carry manually uploaded proof and are settled by an
//! admin decision; nothing here talks to a payment processor. The unique
//! (auction, user, payment_type) index backs duplicate detection, and winner
//! payments upgrade an existing participation-fee row in place so one
//! commercial relationship never produces two rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};

use crate::entities::auctions::{AuctionStatus, AuctionType};
use crate::entities::payment_requests::{self, PaymentType, VerificationStatus};
use crate::entities::prelude::*;
use crate::entities::winners;
use crate::services::auction_store;
use crate::services::error::{CoreError, ErrorReason};
use crate::services::settlement::{self, SettlementQuote};

/// User-submitted payment evidence.
#[derive(Debug, Clone)]
pub struct PaymentSubmission {
    pub amount: Decimal,
    pub method: String,
    pub screenshot: String,
    pub transaction_id: String,
    pub payment_date: DateTime<Utc>,
}

/// Reserve-auction bidding gate.
///
/// A user may bid only with an approved participation fee whose eligibility
/// instant has passed. The exact sub-reason is surfaced so the caller can
/// tell "pay first" from "wait for review" from "rejected, fix and retry".
pub async fn check_participation(
    db: &DatabaseConnection,
    auction_id: i32,
    user_id: i32,
    now: DateTime<Utc>,
) -> Result<(), CoreError> {
    let payment = PaymentRequests::find()
        .filter(payment_requests::Column::AuctionId.eq(auction_id))
        .filter(payment_requests::Column::UserId.eq(user_id))
        .filter(payment_requests::Column::PaymentType.eq(PaymentType::ParticipationFee))
        .one(db)
        .await?;

    let payment = match payment {
        None => {
            return Err(CoreError::forbidden(
                ErrorReason::PaymentRequired,
                "a participation fee payment is required before bidding",
            ));
        }
        Some(p) => p,
    };

    match payment.verification_status {
        VerificationStatus::Pending => Err(CoreError::forbidden(
            ErrorReason::PaymentPending,
            "participation fee payment is awaiting verification",
        )),
        VerificationStatus::Rejected => {
            let notes = payment
                .admin_notes
                .unwrap_or_else(|| "no reason given".to_string());
            Err(CoreError::forbidden(
                ErrorReason::PaymentRejected,
                format!("participation fee payment was rejected: {}", notes),
            ))
        }
        VerificationStatus::Approved => match payment.bidding_eligible_from {
            Some(eligible_from) if eligible_from <= now => Ok(()),
            _ => Err(CoreError::forbidden(
                ErrorReason::PaymentPending,
                "participation fee approved but bidding eligibility has not started",
            )),
        },
    }
}

/// Submit a participation fee for a reserve auction. Resubmission is not
/// allowed; the admin decision is the only way the record changes.
pub async fn submit_participation_payment(
    db: &DatabaseConnection,
    auction_id: i32,
    user_id: i32,
    submission: PaymentSubmission,
    now: DateTime<Utc>,
) -> Result<payment_requests::Model, CoreError> {
    let auction = auction_store::get(db, auction_id, now).await?;
    if auction.auction_type != AuctionType::Reserve {
        return Err(CoreError::invalid_argument(
            ErrorReason::NotReserveAuction,
            format!("auction {} does not require a participation fee", auction.auction_code),
        ));
    }
    if !matches!(auction.status, AuctionStatus::Upcoming | AuctionStatus::Active) {
        return Err(CoreError::invalid_state(
            ErrorReason::AuctionClosed,
            format!("auction {} is no longer accepting participants", auction.auction_code),
        ));
    }

    let user = Users::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::not_found("user", user_id))?;
    if user.suspended {
        return Err(CoreError::forbidden(
            ErrorReason::Suspended,
            format!("user {} is suspended", user_id),
        ));
    }

    let existing = PaymentRequests::find()
        .filter(payment_requests::Column::AuctionId.eq(auction_id))
        .filter(payment_requests::Column::UserId.eq(user_id))
        .filter(payment_requests::Column::PaymentType.eq(PaymentType::ParticipationFee))
        .one(db)
        .await?;
    if let Some(existing) = existing {
        return Err(CoreError::conflict(
            ErrorReason::DuplicatePayment,
            format!(
                "a participation fee payment already exists (status: {:?})",
                existing.verification_status
            ),
        ));
    }

    let row = payment_requests::ActiveModel {
        auction_id: Set(auction_id),
        user_id: Set(user_id),
        payment_type: Set(PaymentType::ParticipationFee),
        payment_amount: Set(submission.amount),
        payment_method: Set(submission.method),
        payment_screenshot: Set(submission.screenshot),
        transaction_id: Set(submission.transaction_id),
        payment_date: Set(submission.payment_date),
        verification_status: Set(VerificationStatus::Pending),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match row.insert(db).await {
        Ok(payment) => Ok(payment),
        // Lost a submit race; the unique index is authoritative
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(CoreError::conflict(
                ErrorReason::DuplicatePayment,
                "a participation fee payment already exists",
            )),
            _ => Err(err.into()),
        },
    }
}

/// Submit the winner settlement payment.
///
/// An existing row for this (auction, user) pair is upgraded in place: a
/// participation-fee row switches type to winner_payment, a previous winner
/// payment is overwritten as a resubmission. Either way verification resets
/// to pending. Only when no prior row exists is a new one inserted.
pub async fn submit_winner_payment(
    db: &DatabaseConnection,
    auction_id: i32,
    user_id: i32,
    submission: PaymentSubmission,
    now: DateTime<Utc>,
) -> Result<payment_requests::Model, CoreError> {
    let auction = auction_store::get(db, auction_id, now).await?;
    if auction.status != AuctionStatus::Ended {
        return Err(CoreError::invalid_state(
            ErrorReason::NotEnded,
            format!("auction {} has not ended", auction.auction_code),
        ));
    }

    let winner = Winners::find()
        .filter(winners::Column::AuctionId.eq(auction_id))
        .one(db)
        .await?
        .ok_or_else(|| CoreError::not_found("winner", auction_id))?;
    if winner.user_id != user_id {
        return Err(CoreError::forbidden(
            ErrorReason::NotWinner,
            format!("user {} is not the winner of auction {}", user_id, auction.auction_code),
        ));
    }

    let quote = settlement::amount_due(&auction, winner.amount)?;
    if submission.amount != quote.amount_due {
        return Err(CoreError::invalid_argument(
            ErrorReason::WrongAmount,
            format!(
                "submitted amount {} does not match the amount due {}",
                submission.amount, quote.amount_due
            ),
        ));
    }

    let existing = PaymentRequests::find()
        .filter(payment_requests::Column::AuctionId.eq(auction_id))
        .filter(payment_requests::Column::UserId.eq(user_id))
        .all(db)
        .await?;
    // Prefer overwriting a prior winner payment; otherwise upgrade the fee row
    let upgrade_target = existing
        .iter()
        .find(|p| p.payment_type == PaymentType::WinnerPayment)
        .or_else(|| {
            existing
                .iter()
                .find(|p| p.payment_type == PaymentType::ParticipationFee)
        })
        .cloned();

    if let Some(target) = upgrade_target {
        let mut row: payment_requests::ActiveModel = target.into();
        row.payment_type = Set(PaymentType::WinnerPayment);
        row.payment_amount = Set(submission.amount);
        row.payment_method = Set(submission.method);
        row.payment_screenshot = Set(submission.screenshot);
        row.transaction_id = Set(submission.transaction_id);
        row.payment_date = Set(submission.payment_date);
        row.verification_status = Set(VerificationStatus::Pending);
        row.verified_by = Set(None);
        row.verified_at = Set(None);
        row.admin_notes = Set(None);
        row.bidding_eligible_from = Set(None);
        row.updated_at = Set(now);
        return Ok(row.update(db).await?);
    }

    let row = payment_requests::ActiveModel {
        auction_id: Set(auction_id),
        user_id: Set(user_id),
        payment_type: Set(PaymentType::WinnerPayment),
        payment_amount: Set(submission.amount),
        payment_method: Set(submission.method),
        payment_screenshot: Set(submission.screenshot),
        transaction_id: Set(submission.transaction_id),
        payment_date: Set(submission.payment_date),
        verification_status: Set(VerificationStatus::Pending),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match row.insert(db).await {
        Ok(payment) => Ok(payment),
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(CoreError::conflict(
                ErrorReason::DuplicatePayment,
                "a winner payment already exists for this auction",
            )),
            _ => Err(err.into()),
        },
    }
}

/// Admin approval. Approving an already-approved payment is an idempotent
/// no-op; approving a rejected one is an invalid transition.
pub async fn approve_payment(
    db: &DatabaseConnection,
    payment_id: i32,
    admin_id: i32,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<payment_requests::Model, CoreError> {
    let payment = PaymentRequests::find_by_id(payment_id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::not_found("payment request", payment_id))?;

    match payment.verification_status {
        VerificationStatus::Approved => return Ok(payment),
        VerificationStatus::Rejected => {
            let notes = payment
                .admin_notes
                .clone()
                .unwrap_or_else(|| "no reason given".to_string());
            return Err(CoreError::invalid_state(
                ErrorReason::AlreadyRejected,
                format!("payment request was already rejected: {}", notes),
            ));
        }
        VerificationStatus::Pending => {}
    }

    let payment_type = payment.payment_type;
    let mut row: payment_requests::ActiveModel = payment.into();
    row.verification_status = Set(VerificationStatus::Approved);
    row.verified_by = Set(Some(admin_id));
    row.verified_at = Set(Some(now));
    row.admin_notes = Set(notes);
    if payment_type == PaymentType::ParticipationFee {
        row.bidding_eligible_from = Set(Some(now));
    }
    row.updated_at = Set(now);
    Ok(row.update(db).await?)
}

/// Admin rejection with a mandatory reason.
pub async fn reject_payment(
    db: &DatabaseConnection,
    payment_id: i32,
    admin_id: i32,
    notes: String,
    now: DateTime<Utc>,
) -> Result<payment_requests::Model, CoreError> {
    if notes.trim().is_empty() {
        return Err(CoreError::invalid_argument(
            ErrorReason::EmptyNotes,
            "a rejection reason is required",
        ));
    }

    let payment = PaymentRequests::find_by_id(payment_id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::not_found("payment request", payment_id))?;

    match payment.verification_status {
        VerificationStatus::Rejected => return Ok(payment),
        VerificationStatus::Approved => {
            return Err(CoreError::invalid_state(
                ErrorReason::AlreadyApproved,
                "payment request was already approved",
            ));
        }
        VerificationStatus::Pending => {}
    }

    let mut row: payment_requests::ActiveModel = payment.into();
    row.verification_status = Set(VerificationStatus::Rejected);
    row.verified_by = Set(Some(admin_id));
    row.verified_at = Set(Some(now));
    row.admin_notes = Set(Some(notes));
    row.updated_at = Set(now);
    Ok(row.update(db).await?)
}

/// Amount still owed by the recorded winner, for payment instructions.
pub async fn amount_due_for(
    db: &DatabaseConnection,
    auction_id: i32,
    user_id: i32,
    now: DateTime<Utc>,
) -> Result<SettlementQuote, CoreError> {
    let auction = auction_store::get(db, auction_id, now).await?;
    let winner = Winners::find()
        .filter(winners::Column::AuctionId.eq(auction_id))
        .one(db)
        .await?
        .ok_or_else(|| CoreError::not_found("winner", auction_id))?;
    if winner.user_id != user_id {
        return Err(CoreError::forbidden(
            ErrorReason::NotWinner,
            format!("user {} is not the winner of auction {}", user_id, auction.auction_code),
        ));
    }
    settlement::amount_due(&auction, winner.amount)
}
