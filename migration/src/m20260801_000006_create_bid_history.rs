//! Migration to create the bid_history audit table
//!
//! Best-effort ledger written after each accepted bid, queried two ways:
//! bids a user placed, and bids a seller's auctions received.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BidHistory::Table)
                    .if_not_exists()
                    .col(pk_auto(BidHistory::Id))
                    .col(integer(BidHistory::AuctionId).not_null())
                    .col(integer(BidHistory::BidderId).not_null())
                    .col(integer(BidHistory::SellerId).not_null())
                    .col(decimal(BidHistory::Amount).not_null())
                    .col(timestamp(BidHistory::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bid_history_bidder")
                    .table(BidHistory::Table)
                    .col(BidHistory::BidderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bid_history_seller")
                    .table(BidHistory::Table)
                    .col(BidHistory::SellerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BidHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BidHistory {
    Table,
    Id,
    AuctionId,
    BidderId,
    SellerId,
    Amount,
    CreatedAt,
}
