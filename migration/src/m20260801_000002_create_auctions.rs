//! Migration to create the auctions table
//!
//! The bid ledger is embedded as an append-only JSON column; current_bid and
//! current_highest_bidder mirror its last accepted entry. The version column
//! backs optimistic concurrency for every read-modify-write.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Auctions::Table)
                    .if_not_exists()
                    .col(pk_auto(Auctions::Id))
                    .col(string(Auctions::AuctionCode).not_null())
                    .col(string(Auctions::ParticipationCode).not_null())
                    .col(string(Auctions::Title).not_null())
                    .col(text_null(Auctions::Description))
                    .col(string(Auctions::AuctionType).not_null())
                    .col(decimal(Auctions::StartingPrice).not_null())
                    .col(decimal(Auctions::BidIncrement).not_null())
                    .col(decimal_null(Auctions::MinimumPrice))
                    .col(decimal_null(Auctions::ReservePrice))
                    .col(decimal(Auctions::CurrentBid).not_null())
                    .col(integer_null(Auctions::CurrentHighestBidder))
                    .col(json(Auctions::Bids).not_null())
                    .col(timestamp(Auctions::StartDate).not_null())
                    .col(timestamp(Auctions::EndDate).not_null())
                    .col(string(Auctions::Status).not_null())
                    .col(integer(Auctions::SellerId).not_null())
                    .col(boolean(Auctions::NeedsApproval).default(false))
                    .col(string_null(Auctions::ApprovalStatus))
                    .col(integer_null(Auctions::ReviewedBy))
                    .col(timestamp_null(Auctions::ReviewedAt))
                    .col(text_null(Auctions::AdminNotes))
                    .col(big_integer(Auctions::Version).not_null().default(0))
                    .col(timestamp(Auctions::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Auctions::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_auctions_auction_code")
                    .table(Auctions::Table)
                    .col(Auctions::AuctionCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_auctions_participation_code")
                    .table(Auctions::Table)
                    .col(Auctions::ParticipationCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Lifecycle sweep scans by status + end date
        manager
            .create_index(
                Index::create()
                    .name("idx_auctions_status_end_date")
                    .table(Auctions::Table)
                    .col(Auctions::Status)
                    .col(Auctions::EndDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_auctions_seller")
                    .table(Auctions::Table)
                    .col(Auctions::SellerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Auctions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Auctions {
    Table,
    Id,
    AuctionCode,
    ParticipationCode,
    Title,
    Description,
    AuctionType,
    StartingPrice,
    BidIncrement,
    MinimumPrice,
    ReservePrice,
    CurrentBid,
    CurrentHighestBidder,
    Bids,
    StartDate,
    EndDate,
    Status,
    SellerId,
    NeedsApproval,
    ApprovalStatus,
    ReviewedBy,
    ReviewedAt,
    AdminNotes,
    Version,
    CreatedAt,
    UpdatedAt,
}
