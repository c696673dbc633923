//! Player business logic - Registration and lookup of lounge customers.
//!
//! Names are matched case-insensitively so "Asha" and "asha" are the same person.
//! Folding happens in Rust and is stored in `name_key`; `SQLite`'s `lower()` only
//! knows ASCII. New players start with an empty prepaid balance.

use crate::{
    entities::{Player, player},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Lookup key for a player name: trimmed and lowercased.
#[must_use]
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Retrieves all players ordered alphabetically by name.
pub async fn get_all_players<C>(db: &C) -> Result<Vec<player::Model>>
where
    C: ConnectionTrait,
{
    Player::find()
        .order_by_asc(player::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a player by its unique ID.
pub async fn get_player_by_id<C>(db: &C, player_id: i64) -> Result<Option<player::Model>>
where
    C: ConnectionTrait,
{
    Player::find_by_id(player_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a player by name, ignoring case and surrounding whitespace.
pub async fn get_player_by_name<C>(db: &C, name: &str) -> Result<Option<player::Model>>
where
    C: ConnectionTrait,
{
    Player::find()
        .filter(player::Column::NameKey.eq(name_key(name)))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the player with this name, creating one if none exists.
///
/// # Errors
/// [`Error::InvalidInput`] for an empty or whitespace-only name.
pub async fn find_or_create_player<C>(
    db: &C,
    name: &str,
    now: DateTime<Utc>,
) -> Result<player::Model>
where
    C: ConnectionTrait,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid_input("player name cannot be empty"));
    }

    if let Some(existing) = get_player_by_name(db, name).await? {
        return Ok(existing);
    }

    let player = player::ActiveModel {
        name: Set(name.to_string()),
        name_key: Set(name_key(name)),
        contact: Set(None),
        prepaid_minutes: Set(0),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Registered new player '{}' (#{})", player.name, player.id);
    Ok(player)
}

/// Sets or clears a player's contact details.
pub async fn update_contact<C>(
    db: &C,
    player_id: i64,
    contact: Option<String>,
) -> Result<player::Model>
where
    C: ConnectionTrait,
{
    let player = get_player_by_id(db, player_id)
        .await?
        .ok_or_else(|| Error::PlayerNotFound {
            name: player_id.to_string(),
        })?;

    let contact = contact
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let mut active_model: player::ActiveModel = player.into();
    active_model.contact = Set(contact);
    active_model.update(db).await.map_err(Into::into)
}
