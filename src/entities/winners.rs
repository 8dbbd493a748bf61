//! SeaORM Entity for winners
//!
//! At most one row per auction, created exactly once when an ended auction
//! has a highest bidder. Contact fields are snapshotted at creation time.
//! Never mutated afterwards except the notified flag.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "winners")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub auction_id: i32,
    pub user_id: i32,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub amount: Decimal,
    pub notified: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
