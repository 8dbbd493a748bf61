//! Approval pipeline request/response types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::auction_requests::{self, ApprovalStatus};

#[derive(Debug, Deserialize)]
pub struct SubmitAuctionRequestBody {
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

#[derive(Debug, Deserialize)]
pub struct ReviewRequestBody {
    pub admin_id: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuctionRequestView {
    pub id: i32,
    pub auction_code: String,
    pub participation_code: String,
    pub title: String,
    pub approval_status: ApprovalStatus,
    pub submitted_at: DateTime<Utc>,
    pub created_auction: Option<i32>,
}

impl From<auction_requests::Model> for AuctionRequestView {
    fn from(request: auction_requests::Model) -> Self {
        AuctionRequestView {
            id: request.id,
            auction_code: request.auction_code,
            participation_code: request.participation_code,
            title: request.title,
            approval_status: request.approval_status,
            submitted_at: request.submitted_at,
            created_auction: request.created_auction,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApproveResponse {
    pub request_id: i32,
    pub auction_id: Option<i32>,
    /// True when the request had already been approved earlier
    pub already_approved: bool,
}

#[derive(Debug, Serialize)]
pub struct RejectResponse {
    pub request_id: i32,
    pub approval_status: ApprovalStatus,
}
