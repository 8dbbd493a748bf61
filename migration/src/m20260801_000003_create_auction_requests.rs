//! Migration to create the auction_requests staging table
//!
//! Reserve auctions are submitted here first and only become live auctions
//! through admin approval. Rows are never deleted (audit trail).

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuctionRequests::Table)
                    .if_not_exists()
                    .col(pk_auto(AuctionRequests::Id))
                    .col(string(AuctionRequests::AuctionCode).not_null())
                    .col(string(AuctionRequests::ParticipationCode).not_null())
                    .col(string(AuctionRequests::Title).not_null())
                    .col(text_null(AuctionRequests::Description))
                    .col(string(AuctionRequests::AuctionType).not_null())
                    .col(decimal(AuctionRequests::StartingPrice).not_null())
                    .col(decimal(AuctionRequests::BidIncrement).not_null())
                    .col(decimal_null(AuctionRequests::MinimumPrice))
                    .col(decimal_null(AuctionRequests::ReservePrice))
                    .col(timestamp(AuctionRequests::StartDate).not_null())
                    .col(timestamp(AuctionRequests::EndDate).not_null())
                    .col(integer(AuctionRequests::SellerId).not_null())
                    .col(string(AuctionRequests::ApprovalStatus).not_null().default("pending"))
                    .col(timestamp(AuctionRequests::SubmittedAt).not_null())
                    .col(integer_null(AuctionRequests::ReviewedBy))
                    .col(timestamp_null(AuctionRequests::ReviewedAt))
                    .col(text_null(AuctionRequests::AdminNotes))
                    .col(integer_null(AuctionRequests::CreatedAuction))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_auction_requests_auction_code")
                    .table(AuctionRequests::Table)
                    .col(AuctionRequests::AuctionCode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_auction_requests_participation_code")
                    .table(AuctionRequests::Table)
                    .col(AuctionRequests::ParticipationCode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_auction_requests_status")
                    .table(AuctionRequests::Table)
                    .col(AuctionRequests::ApprovalStatus)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuctionRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AuctionRequests {
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
    StartDate,
    EndDate,
    SellerId,
    ApprovalStatus,
    SubmittedAt,
    ReviewedBy,
    ReviewedAt,
    AdminNotes,
    CreatedAuction,
}
