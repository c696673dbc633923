//! Session entity - One timed visit by a player.
//!
//! A session with no `check_out` is active. Checkout fills in `check_out`,
//! `elapsed_minutes` and both charge columns in one write, after which the row
//! is never modified again.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Session database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Unique identifier for the session
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Player this session belongs to
    pub player_id: i64,
    /// When the player checked in
    pub check_in: DateTimeUtc,
    /// When the player checked out, None while the session is active
    pub check_out: Option<DateTimeUtc>,
    /// Billed duration in whole minutes, set at checkout
    pub elapsed_minutes: Option<i64>,
    /// Time charge in minor units, set at checkout
    pub time_charge_cents: Option<i64>,
    /// Beverage charge in minor units, set at checkout
    pub beverage_charge_cents: Option<i64>,
}

impl Model {
    /// Whether the player is still playing.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.check_out.is_none()
    }
}

/// Defines relationships between Session and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each session belongs to one player
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::PlayerId",
        to = "super::player::Column::Id"
    )]
    Player,
    /// One session has many line items
    #[sea_orm(has_many = "super::session_item::Entity")]
    SessionItems,
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl Related<super::session_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
