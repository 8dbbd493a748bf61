//! Auction store
//!
//! Read/write access to auctions with optimistic concurrency, plus the
//! single status-derivation function used by every path that displays or
//! acts on an auction. Status must never be checked against the stored
//! column directly: clients read state between scheduler ticks, so the
//! stored value can lag the clock.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use crate::entities::auction_requests;
use crate::entities::auctions::{self, AuctionStatus, AuctionType, BidLedger};
use crate::entities::prelude::*;
use crate::services::error::{CoreError, ErrorReason};

/// Fields required to create a live (non-reserve) auction directly.
#[derive(Debug, Clone)]
pub struct NewAuction {
    pub title: String,
    pub description: Option<String>,
    pub auction_type: AuctionType,
    pub starting_price: Decimal,
    pub bid_increment: Option<Decimal>,
    pub minimum_price: Option<Decimal>,
    pub reserve_price: Option<Decimal>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub seller_id: i32,
    pub auction_code: Option<String>,
    pub participation_code: Option<String>,
}

/// Default bid increment when the seller does not set one.
pub const DEFAULT_BID_INCREMENT: Decimal = Decimal::TEN;

/// Derive the effective lifecycle status at `now`.
///
/// Deleted and pending are sticky; everything else follows the schedule.
/// Idempotent: deriving an already-derived status is a no-op.
pub fn derive_status(
    status: AuctionStatus,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AuctionStatus {
    match status {
        AuctionStatus::Deleted | AuctionStatus::Pending => status,
        _ => {
            if now < start_date {
                AuctionStatus::Upcoming
            } else if now < end_date {
                AuctionStatus::Active
            } else {
                AuctionStatus::Ended
            }
        }
    }
}

/// Apply status derivation to a loaded model.
pub fn with_derived_status(mut auction: auctions::Model, now: DateTime<Utc>) -> auctions::Model {
    auction.status = derive_status(auction.status, auction.start_date, auction.end_date, now);
    auction
}

/// Load an auction by id with its status derived at `now`.
pub async fn get(
    db: &DatabaseConnection,
    auction_id: i32,
    now: DateTime<Utc>,
) -> Result<auctions::Model, CoreError> {
    let auction = Auctions::find_by_id(auction_id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::not_found("auction", auction_id))?;
    Ok(with_derived_status(auction, now))
}

/// Load an auction by its human-facing code with its status derived at `now`.
pub async fn get_by_code(
    db: &DatabaseConnection,
    auction_code: &str,
    now: DateTime<Utc>,
) -> Result<auctions::Model, CoreError> {
    let auction = Auctions::find()
        .filter(auctions::Column::AuctionCode.eq(auction_code))
        .one(db)
        .await?
        .ok_or_else(|| CoreError::not_found("auction", auction_code))?;
    Ok(with_derived_status(auction, now))
}

/// Versioned read-modify-write.
///
/// Applies `changes` only if the row still carries the version observed at
/// read time, bumping the version in the same statement. Zero rows affected
/// means a concurrent writer got there first; callers re-read and retry.
pub async fn update_versioned(
    db: &DatabaseConnection,
    read: &auctions::Model,
    mut changes: auctions::ActiveModel,
    now: DateTime<Utc>,
) -> Result<(), CoreError> {
    changes.version = Set(read.version + 1);
    changes.updated_at = Set(now);

    let result = Auctions::update_many()
        .set(changes)
        .filter(auctions::Column::Id.eq(read.id))
        .filter(auctions::Column::Version.eq(read.version))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(CoreError::conflict(
            ErrorReason::VersionConflict,
            format!(
                "auction {} was modified concurrently (version {})",
                read.id, read.version
            ),
        ));
    }
    Ok(())
}

/// Create a live auction directly. Reserve auctions must go through the
/// approval pipeline instead.
pub async fn create_auction(
    db: &DatabaseConnection,
    new: NewAuction,
    now: DateTime<Utc>,
) -> Result<auctions::Model, CoreError> {
    if new.auction_type == AuctionType::Reserve {
        return Err(CoreError::invalid_argument(
            ErrorReason::RequiresApproval,
            "reserve auctions must be submitted as auction requests",
        ));
    }
    validate_economics(
        &new.title,
        new.starting_price,
        new.bid_increment.unwrap_or(DEFAULT_BID_INCREMENT),
        new.start_date,
        new.end_date,
    )?;

    let auction_code = new
        .auction_code
        .unwrap_or_else(|| generate_code("AUC"));
    let participation_code = new
        .participation_code
        .unwrap_or_else(|| generate_code("JOIN"));
    ensure_codes_available(db, &auction_code, &participation_code).await?;

    let bid_increment = new.bid_increment.unwrap_or(DEFAULT_BID_INCREMENT);
    let status = derive_status(AuctionStatus::Upcoming, new.start_date, new.end_date, now);

    let model = auctions::ActiveModel {
        auction_code: Set(auction_code),
        participation_code: Set(participation_code),
        title: Set(new.title),
        description: Set(new.description),
        auction_type: Set(new.auction_type),
        starting_price: Set(new.starting_price),
        bid_increment: Set(bid_increment),
        minimum_price: Set(new.minimum_price),
        reserve_price: Set(new.reserve_price),
        current_bid: Set(new.starting_price),
        current_highest_bidder: Set(None),
        bids: Set(BidLedger::default()),
        start_date: Set(new.start_date),
        end_date: Set(new.end_date),
        status: Set(status),
        seller_id: Set(new.seller_id),
        needs_approval: Set(false),
        approval_status: Set(None),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match model.insert(db).await {
        Ok(auction) => Ok(auction),
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(CoreError::conflict(
                ErrorReason::DuplicateAuctionCode,
                "auction code or participation code already in use",
            )),
            _ => Err(err.into()),
        },
    }
}

/// Soft-delete: the sticky deleted status is the only destruction an auction
/// ever sees while bids, payments or winner records reference it.
pub async fn soft_delete(
    db: &DatabaseConnection,
    auction_id: i32,
    caller_id: i32,
    now: DateTime<Utc>,
) -> Result<(), CoreError> {
    let auction = get(db, auction_id, now).await?;
    if auction.seller_id != caller_id {
        return Err(CoreError::forbidden(
            ErrorReason::NotSeller,
            format!("user {} does not own auction {}", caller_id, auction_id),
        ));
    }
    let changes = auctions::ActiveModel {
        status: Set(AuctionStatus::Deleted),
        ..Default::default()
    };
    update_versioned(db, &auction, changes, now).await
}

/// Check both auctions and pending requests for code collisions.
pub async fn ensure_codes_available(
    db: &DatabaseConnection,
    auction_code: &str,
    participation_code: &str,
) -> Result<(), CoreError> {
    let auction_hit = Auctions::find()
        .filter(auctions::Column::AuctionCode.eq(auction_code))
        .one(db)
        .await?
        .is_some()
        || AuctionRequests::find()
            .filter(auction_requests::Column::AuctionCode.eq(auction_code))
            .one(db)
            .await?
            .is_some();
    if auction_hit {
        return Err(CoreError::conflict(
            ErrorReason::DuplicateAuctionCode,
            format!("auction code {} already in use", auction_code),
        ));
    }

    let participation_hit = Auctions::find()
        .filter(auctions::Column::ParticipationCode.eq(participation_code))
        .one(db)
        .await?
        .is_some()
        || AuctionRequests::find()
            .filter(auction_requests::Column::ParticipationCode.eq(participation_code))
            .one(db)
            .await?
            .is_some();
    if participation_hit {
        return Err(CoreError::conflict(
            ErrorReason::DuplicateParticipationCode,
            format!("participation code {} already in use", participation_code),
        ));
    }
    Ok(())
}

pub(crate) fn validate_economics(
    title: &str,
    starting_price: Decimal,
    bid_increment: Decimal,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::invalid_argument(
            ErrorReason::MissingField,
            "title must not be empty",
        ));
    }
    if starting_price < Decimal::ZERO {
        return Err(CoreError::invalid_argument(
            ErrorReason::MissingField,
            "starting price must not be negative",
        ));
    }
    if bid_increment < Decimal::ONE {
        return Err(CoreError::invalid_argument(
            ErrorReason::MissingField,
            "bid increment must be at least 1",
        ));
    }
    if end_date <= start_date {
        return Err(CoreError::invalid_argument(
            ErrorReason::InvalidSchedule,
            "end date must be after start date",
        ));
    }
    Ok(())
}

pub(crate) fn generate_code(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, suffix[..8].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_derive_status_follows_schedule() {
        let start = at(100);
        let end = at(200);

        assert_eq!(
            derive_status(AuctionStatus::Upcoming, start, end, at(50)),
            AuctionStatus::Upcoming
        );
        assert_eq!(
            derive_status(AuctionStatus::Upcoming, start, end, at(100)),
            AuctionStatus::Active
        );
        assert_eq!(
            derive_status(AuctionStatus::Active, start, end, at(150)),
            AuctionStatus::Active
        );
        assert_eq!(
            derive_status(AuctionStatus::Active, start, end, at(200)),
            AuctionStatus::Ended
        );
        assert_eq!(
            derive_status(AuctionStatus::Upcoming, start, end, at(500)),
            AuctionStatus::Ended
        );
    }

    #[test]
    fn test_derive_status_sticky_states() {
        let start = at(100);
        let end = at(200);

        for now in [at(0), at(150), at(500)] {
            assert_eq!(
                derive_status(AuctionStatus::Deleted, start, end, now),
                AuctionStatus::Deleted
            );
            assert_eq!(
                derive_status(AuctionStatus::Pending, start, end, now),
                AuctionStatus::Pending
            );
        }
    }

    #[test]
    fn test_derive_status_idempotent() {
        let start = at(100);
        let end = at(200);
        let now = at(150);

        let once = derive_status(AuctionStatus::Upcoming, start, end, now);
        let twice = derive_status(once, start, end, now);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_generate_code_shape() {
        let code = generate_code("AUC");
        assert!(code.starts_with("AUC-"));
        assert_eq!(code.len(), "AUC-".len() + 8);
    }

    #[test]
    fn test_validate_economics() {
        let start = at(0);
        let end = at(100);

        assert!(validate_economics("Lot 1", Decimal::ZERO, Decimal::TEN, start, end).is_ok());
        assert!(validate_economics("", Decimal::ZERO, Decimal::TEN, start, end).is_err());
        assert!(
            validate_economics("Lot 1", Decimal::NEGATIVE_ONE, Decimal::TEN, start, end).is_err()
        );
        assert!(validate_economics("Lot 1", Decimal::ZERO, Decimal::ZERO, start, end).is_err());
        assert!(validate_economics("Lot 1", Decimal::ZERO, Decimal::TEN, end, start).is_err());
    }
}
