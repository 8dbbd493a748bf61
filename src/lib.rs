// src/lib.rs

use sea_orm::DatabaseConnection;
use services::notification::WinnerNotifier;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub notifier: Arc<dyn WinnerNotifier>,
}

pub mod entities {
    pub mod prelude;
    pub mod auction_requests;
    pub mod auctions;
    pub mod bid_history;
    pub mod payment_requests;
    pub mod users;
    pub mod winners;
}

pub mod services {
    pub mod approval;
    pub mod auction_store;
    pub mod bid_engine;
    pub mod error;
    pub mod lifecycle;
    pub mod notification;
    pub mod payments;
    pub mod settlement;
}

pub mod handlers;
pub mod jobs;
pub mod models;
