//! SeaORM Entity for auction_requests
//!
//! Staging row for reserve auctions awaiting admin review. Codes must be
//! unique across both this table and auctions. Rows are never deleted.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::auctions::AuctionType;

/// Two-phase review state: pending -> approved | rejected (terminal, one-way).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ApprovalStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "auction_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Uniqueness across requests and live auctions is enforced by the
    /// pipeline (submit check + approval conflict check), not per-table
    pub auction_code: String,
    pub participation_code: String,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub auction_type: AuctionType,
    pub starting_price: Decimal,
    pub bid_increment: Decimal,
    pub minimum_price: Option<Decimal>,
    pub reserve_price: Option<Decimal>,
    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,
    pub seller_id: i32,
    pub approval_status: ApprovalStatus,
    pub submitted_at: DateTimeUtc,
    pub reviewed_by: Option<i32>,
    pub reviewed_at: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Text", nullable)]
    pub admin_notes: Option<String>,
    /// Back-reference to the auction created on approval
    pub created_auction: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
