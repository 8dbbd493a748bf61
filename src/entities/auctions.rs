//! SeaORM Entity for auctions
//!
//! Holds the embedded append-only bid ledger as a JSON column. current_bid
//! and current_highest_bidder duplicate the last accepted ledger entry and
//! are only ever written together with it. The version column backs the
//! optimistic-concurrency writes in the auction store.

use rust_decimal::Decimal;
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::auction_requests::ApprovalStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum AuctionType {
    #[sea_orm(string_value = "english")]
    English,
    #[sea_orm(string_value = "dutch")]
    Dutch,
    #[sea_orm(string_value = "sealed")]
    Sealed,
    #[sea_orm(string_value = "reserve")]
    Reserve,
}

/// Lifecycle status. `Deleted` and `Pending` are sticky: status derivation
/// never overwrites them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
    #[sea_orm(string_value = "upcoming")]
    Upcoming,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "ended")]
    Ended,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "deleted")]
    Deleted,
    #[sea_orm(string_value = "stopped")]
    Stopped,
    #[sea_orm(string_value = "pending")]
    Pending,
}

/// One accepted bid. Insertion order is significant: a later entry with an
/// equal amount is not higher (the engine rejects equal amounts anyway).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidEntry {
    pub bidder: i32,
    pub amount: Decimal,
    pub timestamp: DateTimeUtc,
}

/// Append-only ledger of accepted bids, stored as a JSON column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct BidLedger(pub Vec<BidEntry>);

impl BidLedger {
    pub fn last(&self) -> Option<&BidEntry> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "auctions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Human-facing unique code (e.g. "AUC-4F2A9C1B")
    #[sea_orm(unique)]
    pub auction_code: String,
    /// Unique code used for out-of-band joining
    #[sea_orm(unique)]
    pub participation_code: String,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub auction_type: AuctionType,
    pub starting_price: Decimal,
    pub bid_increment: Decimal,
    /// Reserve-type settlement floor
    pub minimum_price: Option<Decimal>,
    /// Sealed-type settlement floor
    pub reserve_price: Option<Decimal>,
    pub current_bid: Decimal,
    pub current_highest_bidder: Option<i32>,
    #[sea_orm(column_type = "Json")]
    pub bids: BidLedger,
    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,
    pub status: AuctionStatus,
    /// Immutable after creation
    pub seller_id: i32,
    pub needs_approval: bool,
    /// Only meaningful while status is pending; absent for live auctions
    pub approval_status: Option<ApprovalStatus>,
    pub reviewed_by: Option<i32>,
    pub reviewed_at: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Text", nullable)]
    pub admin_notes: Option<String>,
    /// Optimistic-concurrency counter, bumped on every read-modify-write
    pub version: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
