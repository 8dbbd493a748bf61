//! Bid engine
//!
//! Validates and applies a bid against an auction. The ledger append and the
//! two derived fields (current_bid, current_highest_bidder) always change in
//! one versioned write, so a concurrent lifecycle transition or competing bid
//! can never interleave with an accepted bid. On a version conflict the whole
//! precondition chain re-runs against the fresh row.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::{debug, warn};

use crate::entities::auctions::{self, AuctionStatus, AuctionType, BidEntry};
use crate::entities::{bid_history, prelude::*};
use crate::services::auction_store;
use crate::services::error::{CoreError, ErrorReason};
use crate::services::payments;

/// Retries against concurrent writers before giving up.
const MAX_BID_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct BidOutcome {
    pub auction: auctions::Model,
    pub bid: BidEntry,
}

/// Place a bid. Preconditions are checked in a fixed order; the first
/// failure wins.
pub async fn place_bid(
    db: &DatabaseConnection,
    auction_id: i32,
    user_id: i32,
    amount: Decimal,
    now: DateTime<Utc>,
) -> Result<BidOutcome, CoreError> {
    let bidder = Users::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::not_found("user", user_id))?;
    if bidder.suspended {
        return Err(CoreError::forbidden(
            ErrorReason::Suspended,
            format!("user {} is suspended", user_id),
        ));
    }

    let mut last_conflict = None;
    for attempt in 0..MAX_BID_ATTEMPTS {
        let auction = Auctions::find_by_id(auction_id)
            .one(db)
            .await?
            .ok_or_else(|| CoreError::not_found("auction", auction_id))?;

        let status = auction_store::derive_status(
            auction.status,
            auction.start_date,
            auction.end_date,
            now,
        );
        if status != AuctionStatus::Active {
            return Err(CoreError::invalid_state(
                ErrorReason::NotActive,
                format!("auction {} is not active", auction.auction_code),
            ));
        }

        if auction.auction_type == AuctionType::Reserve {
            payments::check_participation(db, auction_id, user_id, now).await?;
        }

        if auction.seller_id == user_id {
            return Err(CoreError::invalid_argument(
                ErrorReason::SelfBid,
                "sellers cannot bid on their own auction",
            ));
        }
        if amount <= auction.current_bid {
            return Err(CoreError::invalid_argument(
                ErrorReason::BelowCurrent,
                format!(
                    "bid {} must exceed the current bid {}",
                    amount, auction.current_bid
                ),
            ));
        }
        let minimum_next = auction.current_bid + auction.bid_increment;
        if amount < minimum_next {
            return Err(CoreError::invalid_argument(
                ErrorReason::BelowIncrement,
                format!("bid {} is below the minimum next bid {}", amount, minimum_next),
            ));
        }

        let entry = BidEntry {
            bidder: user_id,
            amount,
            timestamp: now,
        };
        let mut ledger = auction.bids.clone();
        ledger.0.push(entry.clone());

        let changes = auctions::ActiveModel {
            bids: Set(ledger.clone()),
            current_bid: Set(amount),
            current_highest_bidder: Set(Some(user_id)),
            ..Default::default()
        };

        match auction_store::update_versioned(db, &auction, changes, now).await {
            Ok(()) => {
                record_bid_history(db, &auction, user_id, amount, now).await;

                let mut updated = auction;
                updated.bids = ledger;
                updated.current_bid = amount;
                updated.current_highest_bidder = Some(user_id);
                updated.version += 1;
                updated.updated_at = now;
                updated.status = status;
                return Ok(BidOutcome {
                    auction: updated,
                    bid: entry,
                });
            }
            Err(err @ CoreError::Conflict {
                reason: ErrorReason::VersionConflict,
                ..
            }) => {
                debug!(
                    auction_id,
                    attempt, "Bid write lost a concurrent update, retrying"
                );
                last_conflict = Some(err);
            }
            Err(err) => return Err(err),
        }
    }

    Err(last_conflict.unwrap_or_else(|| {
        CoreError::conflict(
            ErrorReason::VersionConflict,
            format!("auction {} is receiving concurrent updates", auction_id),
        )
    }))
}

/// Best-effort audit write. Used only for history display; a failure is
/// logged and never surfaced to the bidder.
async fn record_bid_history(
    db: &DatabaseConnection,
    auction: &auctions::Model,
    bidder_id: i32,
    amount: Decimal,
    now: DateTime<Utc>,
) {
    let row = bid_history::ActiveModel {
        auction_id: Set(auction.id),
        bidder_id: Set(bidder_id),
        seller_id: Set(auction.seller_id),
        amount: Set(amount),
        created_at: Set(now),
        ..Default::default()
    };
    if let Err(e) = row.insert(db).await {
        warn!(
            auction_id = auction.id,
            bidder_id,
            error = %e,
            "Failed to append bid history"
        );
    }
}
