//! Migration to create the winners table
//!
//! The unique index on auction_id is the create-if-absent guard that keeps
//! overlapping lifecycle sweeps from recording two winners for one auction.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Winners::Table)
                    .if_not_exists()
                    .col(pk_auto(Winners::Id))
                    .col(integer(Winners::AuctionId).not_null())
                    .col(integer(Winners::UserId).not_null())
                    .col(string(Winners::FullName).not_null())
                    .col(string(Winners::Email).not_null())
                    .col(string_null(Winners::Phone))
                    .col(decimal(Winners::Amount).not_null())
                    .col(boolean(Winners::Notified).default(false))
                    .col(timestamp(Winners::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_winners_auction")
                    .table(Winners::Table)
                    .col(Winners::AuctionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_winners_user")
                    .table(Winners::Table)
                    .col(Winners::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Winners::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Winners {
    Table,
    Id,
    AuctionId,
    UserId,
    FullName,
    Email,
    Phone,
    Amount,
    Notified,
    CreatedAt,
}
