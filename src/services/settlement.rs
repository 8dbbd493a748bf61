//! Settlement calculator
//!
//! Pure computation of the amount a winner still owes. Used both when
//! presenting payment instructions and when validating a submitted winner
//! payment, so the two paths cannot drift.

use rust_decimal::Decimal;

use crate::entities::auctions::{self, AuctionType};
use crate::services::error::{CoreError, ErrorReason};

/// Breakdown returned alongside the owed amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementQuote {
    pub winning_amount: Decimal,
    /// Floor deducted for reserve auctions; None for the other types
    pub floor: Option<Decimal>,
    pub amount_due: Decimal,
}

/// Compute the amount the winner must still pay.
///
/// Non-reserve types owe the full winning bid. Reserve auctions deduct the
/// configured floor (minimum price, falling back to reserve price); a reserve
/// auction with no positive floor is a data inconsistency that must surface
/// as a configuration error instead of silently charging the full bid.
pub fn amount_due(
    auction: &auctions::Model,
    winning_amount: Decimal,
) -> Result<SettlementQuote, CoreError> {
    match auction.auction_type {
        AuctionType::Reserve => {
            let floor = auction
                .minimum_price
                .or(auction.reserve_price)
                .unwrap_or(Decimal::ZERO);
            if floor <= Decimal::ZERO {
                return Err(CoreError::configuration(
                    ErrorReason::MissingReserveFloor,
                    format!(
                        "reserve auction {} has no positive floor price",
                        auction.auction_code
                    ),
                ));
            }
            let due = (winning_amount - floor).max(Decimal::ZERO);
            Ok(SettlementQuote {
                winning_amount,
                floor: Some(floor),
                amount_due: due,
            })
        }
        _ => Ok(SettlementQuote {
            winning_amount,
            floor: None,
            amount_due: winning_amount,
        }),
    }
}
