//! Session item entity - A beverage order attached to a session.
//!
//! The unit price is copied from the menu when the order is placed so that
//! later menu edits never change a bill.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Session line item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "session_items")]
pub struct Model {
    /// Unique identifier for the line item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Session the order belongs to
    pub session_id: i64,
    /// Beverage that was ordered
    pub beverage_id: i64,
    /// Number of units, always at least 1
    pub quantity: i32,
    /// Unit price in minor units at the time of the order
    pub unit_price_cents: i64,
}

/// Defines relationships between `SessionItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line item belongs to one session
    #[sea_orm(
        belongs_to = "super::session::Entity",
        from = "Column::SessionId",
        to = "super::session::Column::Id"
    )]
    Session,
    /// Each line item references one beverage
    #[sea_orm(
        belongs_to = "super::beverage::Entity",
        from = "Column::BeverageId",
        to = "super::beverage::Column::Id"
    )]
    Beverage,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::beverage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Beverage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
