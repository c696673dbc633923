//! Beverage entity - The drinks menu.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Beverage database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "beverages")]
pub struct Model {
    /// Unique identifier for the beverage
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Menu name (e.g., "Cold Coffee")
    #[sea_orm(unique)]
    pub name: String,
    /// Unit price in minor currency units (paise/cents)
    pub price_cents: i64,
}

/// Defines relationships between Beverage and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A beverage appears on many session line items
    #[sea_orm(has_many = "super::session_item::Entity")]
    SessionItems,
}

impl Related<super::session_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
