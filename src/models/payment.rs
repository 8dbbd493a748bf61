//! Payment request/response types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::payment_requests::{self, PaymentType, VerificationStatus};

#[derive(Debug, Deserialize)]
pub struct SubmitPaymentBody {
    pub user_id: i32,
    pub amount: Decimal,
    pub method: String,
    /// Opaque evidence-store reference for the uploaded proof
    pub screenshot: String,
    pub transaction_id: String,
    pub payment_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewPaymentBody {
    pub admin_id: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentView {
    pub id: i32,
    pub auction_id: i32,
    pub user_id: i32,
    pub payment_type: PaymentType,
    pub payment_amount: Decimal,
    pub payment_method: String,
    pub transaction_id: String,
    pub verification_status: VerificationStatus,
    pub admin_notes: Option<String>,
    pub bidding_eligible_from: Option<DateTime<Utc>>,
}

impl From<payment_requests::Model> for PaymentView {
    fn from(payment: payment_requests::Model) -> Self {
        PaymentView {
            id: payment.id,
            auction_id: payment.auction_id,
            user_id: payment.user_id,
            payment_type: payment.payment_type,
            payment_amount: payment.payment_amount,
            payment_method: payment.payment_method,
            transaction_id: payment.transaction_id,
            verification_status: payment.verification_status,
            admin_notes: payment.admin_notes,
            bidding_eligible_from: payment.bidding_eligible_from,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AmountDueResponse {
    pub auction_id: i32,
    pub user_id: i32,
    pub winning_amount: Decimal,
    pub floor: Option<Decimal>,
    pub amount_due: Decimal,
}
