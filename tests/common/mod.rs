//! Shared test fixtures
//!
//! Tests run the real migrations against an in-memory SQLite database, so
//! every unique index and conflict clause is exercised for real. A single
//! pooled connection keeps the in-memory database alive and shared.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use uuid::Uuid;

use auctionhouse_backend::entities::auctions::{self, AuctionStatus, AuctionType, BidLedger};
use auctionhouse_backend::entities::payment_requests::{self, PaymentType, VerificationStatus};
use auctionhouse_backend::entities::users::{self, UserRole};
use auctionhouse_backend::entities::winners;

/// Set up an in-memory test database with migrations applied.
pub async fn setup_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Fixed reference instant used as "now" across tests.
pub fn t0() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

pub fn hours(n: i64) -> chrono::Duration {
    chrono::Duration::hours(n)
}

pub async fn seed_user(db: &DatabaseConnection, name: &str, suspended: bool) -> users::Model {
    users::ActiveModel {
        full_name: Set(name.to_string()),
        email: Set(format!("{}-{}@example.com", name.to_lowercase().replace(' ', "."), Uuid::new_v4().simple())),
        phone: Set(Some("555-0100".to_string())),
        role: Set(UserRole::User),
        suspended: Set(suspended),
        created_at: Set(t0()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert user")
}

pub async fn seed_admin(db: &DatabaseConnection, name: &str) -> users::Model {
    users::ActiveModel {
        full_name: Set(name.to_string()),
        email: Set(format!("{}-{}@example.com", name.to_lowercase().replace(' ', "."), Uuid::new_v4().simple())),
        phone: Set(None),
        role: Set(UserRole::Admin),
        suspended: Set(false),
        created_at: Set(t0()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert admin")
}

/// Auction fixture. Defaults to an english auction running from one hour
/// before to one hour after t0, starting at 100 with increment 10.
pub struct AuctionSeed {
    pub seller_id: i32,
    pub auction_type: AuctionType,
    pub status: AuctionStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub starting_price: Decimal,
    pub bid_increment: Decimal,
    pub minimum_price: Option<Decimal>,
    pub reserve_price: Option<Decimal>,
    pub current_bid: Option<Decimal>,
    pub current_highest_bidder: Option<i32>,
}

impl AuctionSeed {
    pub fn active(seller_id: i32) -> Self {
        AuctionSeed {
            seller_id,
            auction_type: AuctionType::English,
            status: AuctionStatus::Active,
            start_date: t0() - hours(1),
            end_date: t0() + hours(1),
            starting_price: dec!(100),
            bid_increment: dec!(10),
            minimum_price: None,
            reserve_price: None,
            current_bid: None,
            current_highest_bidder: None,
        }
    }

    pub fn reserve(seller_id: i32, minimum_price: Decimal) -> Self {
        AuctionSeed {
            auction_type: AuctionType::Reserve,
            minimum_price: Some(minimum_price),
            ..AuctionSeed::active(seller_id)
        }
    }
}

pub async fn seed_auction(db: &DatabaseConnection, seed: AuctionSeed) -> auctions::Model {
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    auctions::ActiveModel {
        auction_code: Set(format!("AUC-{}", suffix)),
        participation_code: Set(format!("JOIN-{}", suffix)),
        title: Set("Test lot".to_string()),
        description: Set(None),
        auction_type: Set(seed.auction_type),
        starting_price: Set(seed.starting_price),
        bid_increment: Set(seed.bid_increment),
        minimum_price: Set(seed.minimum_price),
        reserve_price: Set(seed.reserve_price),
        current_bid: Set(seed.current_bid.unwrap_or(seed.starting_price)),
        current_highest_bidder: Set(seed.current_highest_bidder),
        bids: Set(BidLedger::default()),
        start_date: Set(seed.start_date),
        end_date: Set(seed.end_date),
        status: Set(seed.status),
        seller_id: Set(seed.seller_id),
        needs_approval: Set(false),
        approval_status: Set(None),
        version: Set(0),
        created_at: Set(t0()),
        updated_at: Set(t0()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert auction")
}

pub async fn seed_payment(
    db: &DatabaseConnection,
    auction_id: i32,
    user_id: i32,
    payment_type: PaymentType,
    status: VerificationStatus,
    bidding_eligible_from: Option<DateTime<Utc>>,
) -> payment_requests::Model {
    payment_requests::ActiveModel {
        auction_id: Set(auction_id),
        user_id: Set(user_id),
        payment_type: Set(payment_type),
        payment_amount: Set(dec!(50)),
        payment_method: Set("bank_transfer".to_string()),
        payment_screenshot: Set("uploads/proof.png".to_string()),
        transaction_id: Set(format!("TX-{}", Uuid::new_v4().simple())),
        payment_date: Set(t0() - hours(1)),
        verification_status: Set(status),
        bidding_eligible_from: Set(bidding_eligible_from),
        created_at: Set(t0() - hours(1)),
        updated_at: Set(t0() - hours(1)),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert payment request")
}

pub async fn seed_winner(
    db: &DatabaseConnection,
    auction_id: i32,
    user: &users::Model,
    amount: Decimal,
) -> winners::Model {
    winners::ActiveModel {
        auction_id: Set(auction_id),
        user_id: Set(user.id),
        full_name: Set(user.full_name.clone()),
        email: Set(user.email.clone()),
        phone: Set(user.phone.clone()),
        amount: Set(amount),
        notified: Set(false),
        created_at: Set(t0()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert winner")
}
