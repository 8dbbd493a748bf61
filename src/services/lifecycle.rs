//! Auction lifecycle transitions
//!
//! One shared per-auction path finishes an auction: versioned transition to
//! ended, winner create-if-absent, then at-most-once-effort notification.
//! The periodic sweep, the manual sweep trigger and seller force-end all
//! funnel through it, so the behaviors cannot diverge.
//!
//! The winner insert uses ON CONFLICT DO NOTHING on the auction_id unique
//! index: a sweep that re-observes an auction it already processed (crash
//! between transition and winner write, or two overlapping sweeps) lands on
//! the guard and becomes a no-op instead of a duplicate.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tracing::{debug, error, info, warn};

use crate::entities::auctions::{self, AuctionStatus};
use crate::entities::{prelude::*, winners};
use crate::services::auction_store;
use crate::services::error::{CoreError, ErrorReason};
use crate::services::notification::{WinnerNotification, WinnerNotifier};

/// Retries for the ended transition when a bid writes concurrently.
const MAX_TRANSITION_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct SweepStats {
    pub scanned: usize,
    pub ended: usize,
    pub winners_created: usize,
    pub failures: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct FinishOutcome {
    pub winner_created: bool,
}

/// One sweep pass: transition every overdue active auction and settle its
/// winner. A per-auction failure is logged and does not abort the rest.
pub async fn run_sweep(
    db: &DatabaseConnection,
    notifier: &dyn WinnerNotifier,
    now: DateTime<Utc>,
) -> Result<SweepStats, CoreError> {
    let due = Auctions::find()
        .filter(auctions::Column::Status.eq(AuctionStatus::Active))
        .filter(auctions::Column::EndDate.lte(now))
        .all(db)
        .await?;

    let mut stats = SweepStats {
        scanned: due.len(),
        ..Default::default()
    };

    for auction in due {
        let auction_code = auction.auction_code.clone();
        match finish_auction(db, notifier, auction, now).await {
            Ok(outcome) => {
                stats.ended += 1;
                if outcome.winner_created {
                    stats.winners_created += 1;
                }
            }
            Err(e) => {
                error!(
                    auction_code = %auction_code,
                    error = %e,
                    "Failed to finish auction, will retry next sweep"
                );
                stats.failures += 1;
            }
        }
    }

    info!(
        scanned = stats.scanned,
        ended = stats.ended,
        winners_created = stats.winners_created,
        failures = stats.failures,
        "Lifecycle sweep completed"
    );
    Ok(stats)
}

/// Shared per-auction completion: ended transition, winner create-if-absent,
/// notification.
pub async fn finish_auction(
    db: &DatabaseConnection,
    notifier: &dyn WinnerNotifier,
    mut auction: auctions::Model,
    now: DateTime<Utc>,
) -> Result<FinishOutcome, CoreError> {
    let mut attempts = 0;
    loop {
        match auction.status {
            // Sticky states are never auto-transitioned
            AuctionStatus::Deleted | AuctionStatus::Pending => {
                return Ok(FinishOutcome {
                    winner_created: false,
                });
            }
            // Already ended elsewhere; still run the idempotent winner step
            AuctionStatus::Ended => break,
            _ => {}
        }

        let changes = auctions::ActiveModel {
            status: Set(AuctionStatus::Ended),
            ..Default::default()
        };
        match auction_store::update_versioned(db, &auction, changes, now).await {
            Ok(()) => {
                auction.status = AuctionStatus::Ended;
                auction.version += 1;
                break;
            }
            Err(CoreError::Conflict {
                reason: ErrorReason::VersionConflict,
                ..
            }) => {
                attempts += 1;
                if attempts >= MAX_TRANSITION_ATTEMPTS {
                    return Err(CoreError::conflict(
                        ErrorReason::VersionConflict,
                        format!("auction {} kept changing during transition", auction.id),
                    ));
                }
                auction = Auctions::find_by_id(auction.id)
                    .one(db)
                    .await?
                    .ok_or_else(|| CoreError::not_found("auction", auction.id))?;
            }
            Err(e) => return Err(e),
        }
    }

    let Some(bidder_id) = auction.current_highest_bidder else {
        debug!(auction_code = %auction.auction_code, "Auction ended without bids");
        return Ok(FinishOutcome {
            winner_created: false,
        });
    };

    let user = Users::find_by_id(bidder_id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::not_found("user", bidder_id))?;

    let row = winners::ActiveModel {
        auction_id: Set(auction.id),
        user_id: Set(user.id),
        full_name: Set(user.full_name.clone()),
        email: Set(user.email.clone()),
        phone: Set(user.phone.clone()),
        amount: Set(auction.current_bid),
        notified: Set(false),
        created_at: Set(now),
        ..Default::default()
    };
    let inserted = Winners::insert(row)
        .on_conflict(
            OnConflict::column(winners::Column::AuctionId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    if inserted == 0 {
        debug!(
            auction_code = %auction.auction_code,
            "Winner already recorded, skipping"
        );
        return Ok(FinishOutcome {
            winner_created: false,
        });
    }

    info!(
        auction_code = %auction.auction_code,
        winner_user_id = user.id,
        amount = %auction.current_bid,
        "Winner recorded"
    );

    let payload = WinnerNotification {
        auction_id: auction.id,
        auction_code: auction.auction_code.clone(),
        title: auction.title.clone(),
        winner_user_id: user.id,
        full_name: user.full_name,
        email: user.email,
        phone: user.phone,
        amount: auction.current_bid,
    };
    match notifier.notify(&payload).await {
        Ok(()) => mark_notified(db, auction.id).await,
        // The winner record stays; notification is at-most-once effort
        Err(e) => warn!(
            auction_code = %auction.auction_code,
            error = %e,
            "Winner notification failed"
        ),
    }

    Ok(FinishOutcome {
        winner_created: true,
    })
}

/// Seller-triggered immediate end. Pulls the end date to now and reuses the
/// sweep's per-auction path.
pub async fn force_end(
    db: &DatabaseConnection,
    notifier: &dyn WinnerNotifier,
    auction_id: i32,
    caller_id: i32,
    now: DateTime<Utc>,
) -> Result<auctions::Model, CoreError> {
    let auction = auction_store::get(db, auction_id, now).await?;
    if auction.seller_id != caller_id {
        return Err(CoreError::forbidden(
            ErrorReason::NotSeller,
            format!("user {} does not own auction {}", caller_id, auction_id),
        ));
    }
    if auction.status != AuctionStatus::Active {
        return Err(CoreError::invalid_state(
            ErrorReason::NotActive,
            format!("auction {} is not active", auction.auction_code),
        ));
    }

    let changes = auctions::ActiveModel {
        end_date: Set(now),
        ..Default::default()
    };
    auction_store::update_versioned(db, &auction, changes, now).await?;

    let fresh = Auctions::find_by_id(auction_id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::not_found("auction", auction_id))?;
    finish_auction(db, notifier, fresh, now).await?;

    auction_store::get(db, auction_id, now).await
}

/// Flip the notified flag once delivery succeeded. Best-effort: the flag is
/// bookkeeping, the winner row is authoritative.
async fn mark_notified(db: &DatabaseConnection, auction_id: i32) {
    let winner = match Winners::find()
        .filter(winners::Column::AuctionId.eq(auction_id))
        .one(db)
        .await
    {
        Ok(Some(w)) => w,
        Ok(None) => return,
        Err(e) => {
            warn!(auction_id, error = %e, "Failed to load winner for notified flag");
            return;
        }
    };
    let mut row: winners::ActiveModel = winner.into();
    row.notified = Set(true);
    if let Err(e) = row.update(db).await {
        warn!(auction_id, error = %e, "Failed to set winner notified flag");
    }
}
