//! Shared test utilities for `LoungeBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    config::pricing::PricingConfig,
    core::{beverage, player},
    entities::{self, Player},
    errors::{Error, Result},
};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Pricing used throughout the tests: ₹60/hr, ₹500 buys 10 hours.
#[must_use]
pub fn test_pricing() -> PricingConfig {
    PricingConfig {
        hourly_rate: dec!(60.00),
        offer_amount: dec!(500),
        offer_hours: 10,
    }
}

/// Registers a player with an empty prepaid balance.
pub async fn create_test_player(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::player::Model> {
    player::find_or_create_player(db, name, Utc::now()).await
}

/// Creates a test beverage with sensible defaults.
///
/// # Defaults
/// * price: 20.00
pub async fn create_test_beverage(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::beverage::Model> {
    beverage::create_beverage(db, name, dec!(20.00)).await
}

/// Creates a test beverage with custom price.
pub async fn create_custom_beverage(
    db: &DatabaseConnection,
    name: &str,
    price: Decimal,
) -> Result<entities::beverage::Model> {
    beverage::create_beverage(db, name, price).await
}

/// Overwrites a player's prepaid balance without writing a recharge log entry.
pub async fn set_prepaid_minutes(
    db: &DatabaseConnection,
    player_id: i64,
    minutes: i64,
) -> Result<entities::player::Model> {
    let player = Player::find_by_id(player_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::PlayerNotFound {
            name: player_id.to_string(),
        })?;

    let mut active_model: entities::player::ActiveModel = player.into();
    active_model.prepaid_minutes = Set(minutes);
    active_model.update(db).await.map_err(Into::into)
}
