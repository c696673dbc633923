//! Recharge business logic - Prepaid hour balances.
//!
//! Each player carries a single prepaid balance in whole minutes
//! (`players.prepaid_minutes`). Buying a recharge appends a row to the
//! `recharges` log and sets the balance according to the configured
//! [`RechargePolicy`]. Checkout consumes the balance through [`deduct_balance`],
//! which is a compare-and-swap so two concurrent checkouts cannot both spend the
//! same minutes.

use crate::{
    config::pricing::{PricingConfig, RechargePolicy},
    core::{billing, player as player_core},
    entities::{Player, Recharge, player, recharge},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{debug, info, warn};

/// A lost compare-and-swap is retried this many times before giving up
const DEDUCT_RETRIES: usize = 1;

/// A player's prepaid balance together with the time of the latest grant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RechargeBalance {
    /// Player the balance belongs to
    pub player_id: i64,
    /// Remaining prepaid time in whole minutes
    pub prepaid_minutes: i64,
    /// Remaining prepaid time in hours
    pub hours_remaining: Decimal,
    /// When the most recent recharge was bought
    pub created_at: DateTime<Utc>,
}

/// Returns the player's balance and latest grant, or `None` if the player has
/// never recharged.
///
/// # Errors
/// [`Error::PlayerNotFound`] if the player does not exist.
pub async fn get_latest_recharge<C>(db: &C, player_id: i64) -> Result<Option<RechargeBalance>>
where
    C: ConnectionTrait,
{
    let player = player_core::get_player_by_id(db, player_id)
        .await?
        .ok_or_else(|| Error::PlayerNotFound {
            name: player_id.to_string(),
        })?;

    let latest = Recharge::find()
        .filter(recharge::Column::PlayerId.eq(player_id))
        .order_by_desc(recharge::Column::CreatedAt)
        .order_by_desc(recharge::Column::Id)
        .one(db)
        .await?;

    Ok(latest.map(|grant| RechargeBalance {
        player_id,
        prepaid_minutes: player.prepaid_minutes,
        hours_remaining: billing::minutes_to_hours(player.prepaid_minutes),
        created_at: grant.created_at,
    }))
}

/// Retrieves every recharge a player has bought, newest first.
pub async fn get_recharge_history<C>(db: &C, player_id: i64) -> Result<Vec<recharge::Model>>
where
    C: ConnectionTrait,
{
    Recharge::find()
        .filter(recharge::Column::PlayerId.eq(player_id))
        .order_by_desc(recharge::Column::CreatedAt)
        .order_by_desc(recharge::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sells one recharge pack to a player.
///
/// With [`RechargePolicy::Replace`] the balance becomes exactly the offer hours;
/// with [`RechargePolicy::Stack`] the offer hours are added to what is left.
/// The balance update and the log entry are written in one transaction.
///
/// # Errors
/// - [`Error::PlayerNotFound`] if the player does not exist
/// - [`Error::InvalidInput`] if the pricing is invalid
pub async fn grant_recharge(
    db: &DatabaseConnection,
    player_id: i64,
    pricing: &PricingConfig,
    policy: RechargePolicy,
    now: DateTime<Utc>,
) -> Result<recharge::Model> {
    pricing.validate()?;
    let offer_minutes = pricing
        .offer_hours
        .checked_mul(billing::MINUTES_PER_HOUR)
        .ok_or_else(|| Error::invalid_input("offer_hours is too large"))?;

    let txn = db.begin().await?;

    let player = Player::find_by_id(player_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::PlayerNotFound {
            name: player_id.to_string(),
        })?;

    let new_balance = match policy {
        RechargePolicy::Replace => offer_minutes,
        RechargePolicy::Stack => player.prepaid_minutes.saturating_add(offer_minutes),
    };

    if policy == RechargePolicy::Replace && player.prepaid_minutes > 0 {
        warn!(
            "Recharge for '{}' replaces {} unused prepaid minutes",
            player.name, player.prepaid_minutes
        );
    }

    let player_name = player.name.clone();
    let mut active_player: player::ActiveModel = player.into();
    active_player.prepaid_minutes = Set(new_balance);
    active_player.update(&txn).await?;

    let grant = recharge::ActiveModel {
        player_id: Set(player_id),
        hours_granted: Set(pricing.offer_hours),
        amount_paid_cents: Set(billing::to_cents(pricing.offer_amount)?),
        balance_after_minutes: Set(new_balance),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        "Recharged '{}' with {} hrs, balance now {} hrs",
        player_name,
        pricing.offer_hours,
        billing::minutes_to_hours(new_balance)
    );
    Ok(grant)
}

/// Finds or registers the player by name, then sells them a recharge pack.
///
/// # Errors
/// See [`player_core::find_or_create_player`] and [`grant_recharge`].
pub async fn recharge_by_name(
    db: &DatabaseConnection,
    name: &str,
    pricing: &PricingConfig,
    policy: RechargePolicy,
    now: DateTime<Utc>,
) -> Result<(player::Model, recharge::Model)> {
    let player = player_core::find_or_create_player(db, name, now).await?;
    let grant = grant_recharge(db, player.id, pricing, policy, now).await?;
    Ok((player, grant))
}

/// Consumes `elapsed_minutes` of the player's prepaid balance, clamping at zero,
/// and returns the hours left.
///
/// The write only succeeds if the balance still holds the value that was read:
/// `UPDATE players SET prepaid_minutes = new WHERE id = ? AND prepaid_minutes = old`.
/// A lost race re-reads and tries once more before failing.
///
/// # Errors
/// - [`Error::PlayerNotFound`] if the player does not exist
/// - [`Error::InvalidInput`] for a negative elapsed time
/// - [`Error::ConcurrentUpdateConflict`] if the balance keeps changing underneath
pub async fn deduct_balance<C>(db: &C, player_id: i64, elapsed_minutes: i64) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    for attempt in 0..=DEDUCT_RETRIES {
        let player = Player::find_by_id(player_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::PlayerNotFound {
                name: player_id.to_string(),
            })?;

        let current = player.prepaid_minutes;
        let remaining = billing::remaining_minutes_after(current, elapsed_minutes)?;
        if remaining == current {
            debug!("No prepaid time to deduct for player #{}", player_id);
            return Ok(billing::minutes_to_hours(current));
        }

        let result = Player::update_many()
            .col_expr(player::Column::PrepaidMinutes, Expr::value(remaining))
            .filter(player::Column::Id.eq(player_id))
            .filter(player::Column::PrepaidMinutes.eq(current))
            .exec(db)
            .await?;

        if result.rows_affected == 1 {
            debug!(
                "Deducted {} min from player #{}: {} -> {} min",
                elapsed_minutes, player_id, current, remaining
            );
            return Ok(billing::minutes_to_hours(remaining));
        }

        warn!(
            "Prepaid balance for player #{} changed during deduction (attempt {})",
            player_id,
            attempt + 1
        );
    }

    Err(Error::ConcurrentUpdateConflict { player_id })
}
