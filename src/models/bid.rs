//! Bid request/response types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::auctions::BidEntry;
use crate::models::auction::AuctionView;

#[derive(Debug, Deserialize)]
pub struct PlaceBidRequest {
    pub user_id: i32,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct BidView {
    pub bidder: i32,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl From<BidEntry> for BidView {
    fn from(entry: BidEntry) -> Self {
        BidView {
            bidder: entry.bidder,
            amount: entry.amount,
            timestamp: entry.timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlaceBidResponse {
    pub auction: AuctionView,
    pub bid: BidView,
}
