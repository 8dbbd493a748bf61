//! SeaORM Entity for payment_requests
//!
//! Manually verified payment evidence: a user uploads proof, an admin
//! approves or rejects it. Unique per (auction_id, user_id, payment_type).

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    #[sea_orm(string_value = "participation_fee")]
    ParticipationFee,
    #[sea_orm(string_value = "winner_payment")]
    WinnerPayment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum VerificationStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub auction_id: i32,
    pub user_id: i32,
    pub payment_type: PaymentType,
    pub payment_amount: Decimal,
    pub payment_method: String,
    /// Opaque reference into the evidence store; never interpreted here
    pub payment_screenshot: String,
    pub transaction_id: String,
    pub payment_date: DateTimeUtc,
    pub verification_status: VerificationStatus,
    pub verified_by: Option<i32>,
    pub verified_at: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Text", nullable)]
    pub admin_notes: Option<String>,
    /// Set to the approval instant for participation fees; bidding is
    /// allowed only once now >= this value
    pub bidding_eligible_from: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
