//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod beverage;
pub mod player;
pub mod recharge;
pub mod session;
pub mod session_item;

// Re-export specific types to avoid conflicts
pub use beverage::{Column as BeverageColumn, Entity as Beverage, Model as BeverageModel};
pub use player::{Column as PlayerColumn, Entity as Player, Model as PlayerModel};
pub use recharge::{Column as RechargeColumn, Entity as Recharge, Model as RechargeModel};
pub use session::{Column as SessionColumn, Entity as Session, Model as SessionModel};
pub use session_item::{
    Column as SessionItemColumn, Entity as SessionItem, Model as SessionItemModel,
};
