//! Recharge entity - Append-only log of prepaid hour grants.
//!
//! Rows are never updated. The live balance is `players.prepaid_minutes`;
//! `balance_after_minutes` records what the grant set it to.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recharge grant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recharges")]
pub struct Model {
    /// Unique identifier for the grant
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Player who bought the recharge
    pub player_id: i64,
    /// Hours granted by the offer
    pub hours_granted: i64,
    /// Price paid for the offer in minor units
    pub amount_paid_cents: i64,
    /// Player balance right after the grant, in minutes
    pub balance_after_minutes: i64,
    /// When the recharge was purchased
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Recharge and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each grant belongs to one player
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::PlayerId",
        to = "super::player::Column::Id"
    )]
    Player,
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
