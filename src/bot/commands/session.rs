//! Session Discord commands - `checkin`, `order`, `bill`, `checkout`, `active` and `logs`.
//!
//! Players are addressed by name. Each command resolves the player's open session
//! and hands the work to `core::session`. Replies that list rows are cut to fit
//! a single Discord message.

use crate::{
    bot::push_line_within,
    core::{
        billing::{self, Bill},
        report::{format_hours, format_money, format_session_summary},
        session::CheckoutReceipt,
    },
    entities::{beverage, player, session, session_item},
    errors::Result,
};
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Most sessions `/logs` will show at once
const MAX_LOG_LIMIT: u32 = 25;
const DEFAULT_LOG_LIMIT: u32 = 10;

/// Room kept free for the "and N more" line
const OVERFLOW_NOTE_RESERVE: usize = 40;

fn push_overflow_note(message: &mut String, hidden: usize, what: &str) -> Result<()> {
    if hidden > 0 {
        writeln!(message, "…and {hidden} more {what}")?;
    }
    Ok(())
}

/// Running bill shown by `/bill`.
fn format_bill_preview(
    player: &player::Model,
    session_id: i64,
    bill: &Bill,
    symbol: &str,
) -> Result<String> {
    let mut message = format!("🧾 **{}** (session #{}, running)\n", player.name, session_id);
    writeln!(
        message,
        "Time: {} → {}",
        billing::format_duration(Some(bill.elapsed_minutes)),
        format_money(symbol, bill.time_charge)
    )?;
    writeln!(
        message,
        "Beverages: {}",
        format_money(symbol, bill.beverage_charge)
    )?;
    write!(message, "**Total so far: {}**", format_money(symbol, bill.total))?;
    if player.prepaid_minutes > 0 {
        write!(
            message,
            "\nPrepaid balance: {}",
            format_hours(billing::minutes_to_hours(player.prepaid_minutes))
        )?;
    }
    Ok(message)
}

/// Checkout receipt. The totals always make it into the message; item lines
/// are dropped from the end when there are too many to fit.
fn format_checkout_receipt(
    receipt: &CheckoutReceipt,
    items: &[(session_item::Model, Option<beverage::Model>)],
    symbol: &str,
) -> Result<String> {
    let mut summary = String::new();
    writeln!(
        summary,
        "Beverages: {}",
        format_money(symbol, receipt.bill.beverage_charge)
    )?;
    writeln!(
        summary,
        "**Total due: {}**",
        format_money(symbol, receipt.bill.total)
    )?;
    write!(
        summary,
        "Prepaid left: {}",
        format_hours(receipt.hours_remaining)
    )?;

    let mut message = format!(
        "✅ **{}** checked out (session #{})\n",
        receipt.player.name, receipt.session.id
    );
    writeln!(
        message,
        "Played: {} → {}",
        billing::format_duration(Some(receipt.bill.elapsed_minutes)),
        format_money(symbol, receipt.bill.time_charge)
    )?;

    let reserved = summary.len() + OVERFLOW_NOTE_RESERVE;
    let mut shown = 0;
    for (item, drink) in items {
        let name = drink.as_ref().map_or("Unknown beverage", |d| d.name.as_str());
        let line = format!(
            "• {} x {} @ {}",
            item.quantity,
            name,
            format_money(symbol, billing::from_cents(item.unit_price_cents))
        );
        if !push_line_within(&mut message, &line, reserved) {
            break;
        }
        shown += 1;
    }
    push_overflow_note(&mut message, items.len() - shown, "items")?;

    message.push_str(&summary);
    Ok(message)
}

/// Open sessions shown by `/active`.
fn format_active_sessions(
    sessions: &[(session::Model, Option<player::Model>)],
    now: DateTime<Utc>,
) -> Result<String> {
    let mut message = String::from("🎮 **Active sessions**\n");
    let mut shown = 0;
    for (open, player) in sessions {
        let name = player.as_ref().map_or("Unknown player", |p| p.name.as_str());
        let running = billing::elapsed_minutes_between(open.check_in, now).ok();
        let line = format!(
            "#{} {} since {} ({})",
            open.id,
            name,
            open.check_in.format("%H:%M"),
            billing::format_duration(running)
        );
        if !push_line_within(&mut message, &line, OVERFLOW_NOTE_RESERVE) {
            break;
        }
        shown += 1;
    }
    push_overflow_note(&mut message, sessions.len() - shown, "sessions")?;
    Ok(message)
}

/// The newest `limit` sessions, or as many as fit in one message.
fn format_session_log(
    sessions: &[(session::Model, Option<player::Model>)],
    symbol: &str,
    limit: usize,
) -> Result<String> {
    let mut message = String::from("📜 **Session log**\n");
    for (logged, player) in sessions.iter().take(limit) {
        let name = player.as_ref().map_or("Unknown player", |p| p.name.as_str());
        if !push_line_within(
            &mut message,
            &format_session_summary(logged, name, symbol),
            0,
        ) {
            break;
        }
    }
    Ok(message)
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::{
        DEFAULT_LOG_LIMIT, MAX_LOG_LIMIT, format_active_sessions, format_bill_preview,
        format_checkout_receipt, format_session_log,
    };
    use crate::{
        bot::{BotData, handlers::autocomplete, reply_or_propagate},
        core::{beverage, billing, player::get_player_by_name, report::format_money, session},
        entities::{player, session as session_entity},
        errors::{Error, Result},
    };
    use chrono::Utc;
    use rust_decimal::Decimal;

    /// Looks up a player and their open session, telling the operator when
    /// either is missing.
    async fn find_open_session(
        ctx: poise::Context<'_, BotData, Error>,
        player_name: &str,
    ) -> Result<Option<(player::Model, session_entity::Model)>> {
        let db = &ctx.data().database;

        let Some(player) = get_player_by_name(db, player_name).await? else {
            ctx.say(format!("❌ No player named '{player_name}'."))
                .await?;
            return Ok(None);
        };

        let Some(open) = session::get_active_session_for_player(db, player.id).await? else {
            ctx.say(format!("❌ '{}' is not checked in.", player.name))
                .await?;
            return Ok(None);
        };

        Ok(Some((player, open)))
    }

    /// Starts a play session, registering the player if they are new.
    #[poise::command(slash_command, prefix_command)]
    pub async fn checkin(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Player name"]
        #[autocomplete = "autocomplete::autocomplete_player_name"]
        player: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        match session::check_in_by_name(db, &player, Utc::now()).await {
            Ok((player, opened)) => {
                ctx.say(format!(
                    "✅ **{}** checked in at {} (session #{}).",
                    player.name,
                    opened.check_in.format("%H:%M"),
                    opened.id
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_or_propagate(ctx, e).await,
        }
    }

    /// Adds beverages to a player's open session.
    #[poise::command(slash_command, prefix_command)]
    pub async fn order(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Player name"]
        #[autocomplete = "autocomplete::autocomplete_player_name"]
        player: String,
        #[description = "Beverage from the menu"]
        #[autocomplete = "autocomplete::autocomplete_beverage_name"]
        beverage_name: String,
        #[description = "How many (defaults to 1)"] quantity: Option<u32>,
    ) -> Result<()> {
        let quantity = quantity.unwrap_or(1);
        let db = &ctx.data().database;
        let symbol = &ctx.data().venue.currency_symbol;

        let Some((player, open)) = find_open_session(ctx, &player).await? else {
            return Ok(());
        };

        let Some(drink) = beverage::get_beverage_by_name(db, &beverage_name).await? else {
            ctx.say(format!(
                "❌ '{beverage_name}' is not on the menu. Use `/beverage list` to see it."
            ))
            .await?;
            return Ok(());
        };

        match session::add_line_item(db, open.id, drink.id, quantity).await {
            Ok(item) => {
                let line_total =
                    billing::from_cents(item.unit_price_cents) * Decimal::from(quantity);
                ctx.say(format!(
                    "✅ {} x {} for **{}** ({}).",
                    quantity,
                    drink.name,
                    player.name,
                    format_money(symbol, line_total)
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_or_propagate(ctx, e).await,
        }
    }

    /// Shows what a player's open session costs right now without closing it.
    #[poise::command(slash_command, prefix_command)]
    pub async fn bill(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Player name"]
        #[autocomplete = "autocomplete::autocomplete_player_name"]
        player: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let venue = &ctx.data().venue;

        let Some((player, open)) = find_open_session(ctx, &player).await? else {
            return Ok(());
        };

        let bill = match session::preview_bill(db, open.id, &venue.pricing, Utc::now()).await {
            Ok(bill) => bill,
            Err(e) => return reply_or_propagate(ctx, e).await,
        };

        ctx.say(format_bill_preview(
            &player,
            open.id,
            &bill,
            &venue.currency_symbol,
        )?)
        .await?;
        Ok(())
    }

    /// Closes a player's session, settles the bill and uses up prepaid hours.
    #[poise::command(slash_command, prefix_command)]
    pub async fn checkout(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Player name"]
        #[autocomplete = "autocomplete::autocomplete_player_name"]
        player: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let venue = &ctx.data().venue;

        let Some((_, open)) = find_open_session(ctx, &player).await? else {
            return Ok(());
        };

        let receipt = match session::checkout(db, open.id, &venue.pricing, Utc::now()).await {
            Ok(receipt) => receipt,
            Err(e) => return reply_or_propagate(ctx, e).await,
        };

        let items = session::get_session_items_with_beverages(db, open.id).await?;
        ctx.say(format_checkout_receipt(
            &receipt,
            &items,
            &venue.currency_symbol,
        )?)
        .await?;
        Ok(())
    }

    /// Lists everyone who is currently checked in.
    #[poise::command(slash_command, prefix_command)]
    pub async fn active(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;

        let sessions = session::get_active_sessions(db).await?;
        if sessions.is_empty() {
            ctx.say("Nobody is playing right now.").await?;
            return Ok(());
        }

        ctx.say(format_active_sessions(&sessions, Utc::now())?)
            .await?;
        Ok(())
    }

    /// Shows the most recent sessions, newest first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn logs(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "How many sessions to show (defaults to 10, at most 25)"]
        #[min = 1]
        #[max = 25]
        limit: Option<u32>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let symbol = &ctx.data().venue.currency_symbol;
        let limit = limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT);

        let sessions = session::get_session_logs(db).await?;
        if sessions.is_empty() {
            ctx.say("No sessions recorded yet.").await?;
            return Ok(());
        }

        ctx.say(format_session_log(&sessions, symbol, limit as usize)?)
            .await?;
        Ok(())
    }
}

pub use inner::*;
