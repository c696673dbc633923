//! Report generation business logic.
//!
//! This module builds the player profile (session history, lifetime play time and
//! spend, prepaid hours left) and the text formatting shared by the bot replies.
//! All functions are framework-agnostic and return structured data or plain strings.

use crate::{
    core::{billing, player as player_core, session as session_core},
    entities::{player, session},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;

/// Everything the operator sees about one player.
#[derive(Debug, Clone)]
pub struct PlayerProfile {
    /// The player
    pub player: player::Model,
    /// All sessions, newest first
    pub sessions: Vec<session::Model>,
    /// Minutes played across closed sessions
    pub total_minutes: i64,
    /// Amount billed across closed sessions
    pub total_spent: Decimal,
    /// Prepaid hours left, rounded to two places
    pub hours_remaining: Decimal,
}

/// Builds a [`PlayerProfile`].
///
/// Only closed sessions count towards the totals; an open session is listed but
/// has no settled bill yet.
///
/// # Errors
/// [`Error::PlayerNotFound`] if the player does not exist.
pub async fn player_profile<C>(db: &C, player_id: i64) -> Result<PlayerProfile>
where
    C: ConnectionTrait,
{
    let player = player_core::get_player_by_id(db, player_id)
        .await?
        .ok_or_else(|| Error::PlayerNotFound {
            name: player_id.to_string(),
        })?;

    let sessions = session_core::get_sessions_for_player(db, player_id).await?;
    let (total_minutes, total_spent) = sessions
        .iter()
        .filter_map(session_core::settled_bill)
        .fold((0_i64, Decimal::ZERO), |(minutes, spent), bill| {
            (minutes + bill.elapsed_minutes, spent + bill.total)
        });

    let hours_remaining = billing::minutes_to_hours(player.prepaid_minutes).round_dp(2);

    Ok(PlayerProfile {
        player,
        sessions,
        total_minutes,
        total_spent,
        hours_remaining,
    })
}

/// Formats an amount with the venue currency, e.g. `₹90.00`.
#[must_use]
pub fn format_money(currency_symbol: &str, amount: Decimal) -> String {
    format!("{currency_symbol}{:.2}", billing::round_money(amount))
}

/// Formats an hour balance without trailing zeros, e.g. `1.5 hrs`.
#[must_use]
pub fn format_hours(hours: Decimal) -> String {
    format!("{} hrs", hours.round_dp(2).normalize())
}

/// One line of the session log.
///
/// Looks like: `#12 Asha | 01 Mar 18:00 | 1 hr 30 min | ₹90.00`. Open sessions
/// show "In Progress" and no amount.
#[must_use]
pub fn format_session_summary(
    session: &session::Model,
    player_name: &str,
    currency_symbol: &str,
) -> String {
    let started = session.check_in.format("%d %b %H:%M");
    let duration = billing::format_duration(session.elapsed_minutes);
    session_core::settled_bill(session).map_or_else(
        || format!("#{} {player_name} | {started} | {duration}", session.id),
        |bill| {
            format!(
                "#{} {player_name} | {started} | {duration} | {}",
                session.id,
                format_money(currency_symbol, bill.total)
            )
        },
    )
}
