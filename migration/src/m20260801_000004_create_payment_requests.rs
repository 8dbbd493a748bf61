//! Migration to create the payment_requests table
//!
//! One row per (auction, user, payment_type). Winner payments upgrade an
//! existing participation_fee row in place instead of inserting a second row
//! for the same commercial relationship.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PaymentRequests::Table)
                    .if_not_exists()
                    .col(pk_auto(PaymentRequests::Id))
                    .col(integer(PaymentRequests::AuctionId).not_null())
                    .col(integer(PaymentRequests::UserId).not_null())
                    .col(string(PaymentRequests::PaymentType).not_null())
                    .col(decimal(PaymentRequests::PaymentAmount).not_null())
                    .col(string(PaymentRequests::PaymentMethod).not_null())
                    .col(string(PaymentRequests::PaymentScreenshot).not_null())
                    .col(string(PaymentRequests::TransactionId).not_null())
                    .col(timestamp(PaymentRequests::PaymentDate).not_null())
                    .col(string(PaymentRequests::VerificationStatus).not_null().default("pending"))
                    .col(integer_null(PaymentRequests::VerifiedBy))
                    .col(timestamp_null(PaymentRequests::VerifiedAt))
                    .col(text_null(PaymentRequests::AdminNotes))
                    .col(timestamp_null(PaymentRequests::BiddingEligibleFrom))
                    .col(timestamp(PaymentRequests::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(PaymentRequests::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // One payment request per auction/user/type
        manager
            .create_index(
                Index::create()
                    .name("idx_payment_requests_auction_user_type")
                    .table(PaymentRequests::Table)
                    .col(PaymentRequests::AuctionId)
                    .col(PaymentRequests::UserId)
                    .col(PaymentRequests::PaymentType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_requests_status")
                    .table(PaymentRequests::Table)
                    .col(PaymentRequests::VerificationStatus)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PaymentRequests {
    Table,
    Id,
    AuctionId,
    UserId,
    PaymentType,
    PaymentAmount,
    PaymentMethod,
    PaymentScreenshot,
    TransactionId,
    PaymentDate,
    VerificationStatus,
    VerifiedBy,
    VerifiedAt,
    AdminNotes,
    BiddingEligibleFrom,
    CreatedAt,
    UpdatedAt,
}
