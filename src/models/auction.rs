//! Auction request/response types for the HTTP surface

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::auctions::{self, AuctionStatus, AuctionType};

/// Shared error envelope: stable kind + sub-reason codes plus a message the
/// peripheral layer can show as-is.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAuctionRequest {
    pub seller_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub auction_type: AuctionType,
    pub starting_price: Decimal,
    pub bid_increment: Option<Decimal>,
    pub minimum_price: Option<Decimal>,
    pub reserve_price: Option<Decimal>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub auction_code: Option<String>,
    pub participation_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForceEndRequest {
    pub user_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAuctionRequest {
    pub user_id: i32,
}

#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub scanned: usize,
    pub ended: usize,
    pub winners_created: usize,
    pub failures: usize,
}

/// Auction as shown to clients, status derived at read time.
#[derive(Debug, Serialize)]
pub struct AuctionView {
    pub id: i32,
    pub auction_code: String,
    pub participation_code: String,
    pub title: String,
    pub description: Option<String>,
    pub auction_type: AuctionType,
    pub starting_price: Decimal,
    pub bid_increment: Decimal,
    pub minimum_price: Option<Decimal>,
    pub reserve_price: Option<Decimal>,
    pub current_bid: Decimal,
    pub current_highest_bidder: Option<i32>,
    pub bid_count: usize,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: AuctionStatus,
    pub seller_id: i32,
}

impl From<auctions::Model> for AuctionView {
    fn from(auction: auctions::Model) -> Self {
        AuctionView {
            id: auction.id,
            auction_code: auction.auction_code,
            participation_code: auction.participation_code,
            title: auction.title,
            description: auction.description,
            auction_type: auction.auction_type,
            starting_price: auction.starting_price,
            bid_increment: auction.bid_increment,
            minimum_price: auction.minimum_price,
            reserve_price: auction.reserve_price,
            current_bid: auction.current_bid,
            current_highest_bidder: auction.current_highest_bidder,
            bid_count: auction.bids.len(),
            start_date: auction.start_date,
            end_date: auction.end_date,
            status: auction.status,
            seller_id: auction.seller_id,
        }
    }
}
