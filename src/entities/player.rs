//! Player entity - A customer of the lounge.
//!
//! Players are matched through `name_key`, the Unicode-lowercased name, and carry
//! the prepaid balance directly. The history of how that balance was granted lives in the
//! `recharges` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Player database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "players")]
pub struct Model {
    /// Unique identifier for the player
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name as first entered by the operator
    pub name: String,
    /// Lowercased `name`, used for lookups
    #[sea_orm(unique)]
    pub name_key: String,
    /// Optional phone number or other contact
    pub contact: Option<String>,
    /// Remaining prepaid play time in whole minutes
    pub prepaid_minutes: i64,
    /// When the player was first registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Player and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One player has many sessions
    #[sea_orm(has_many = "super::session::Entity")]
    Sessions,
    /// One player has many recharge grants
    #[sea_orm(has_many = "super::recharge::Entity")]
    Recharges,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl Related<super::recharge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recharges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
