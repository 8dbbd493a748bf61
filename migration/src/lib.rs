pub use sea_orm_migration::prelude::*;

mod m20260801_000001_create_users;
mod m20260801_000002_create_auctions;
mod m20260801_000003_create_auction_requests;
mod m20260801_000004_create_payment_requests;
mod m20260801_000005_create_winners;
mod m20260801_000006_create_bid_history;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_users::Migration),
            Box::new(m20260801_000002_create_auctions::Migration),
            Box::new(m20260801_000003_create_auction_requests::Migration),
            Box::new(m20260801_000004_create_payment_requests::Migration),
            Box::new(m20260801_000005_create_winners::Migration),
            Box::new(m20260801_000006_create_bid_history::Migration),
        ]
    }
}
