//! Recharge Discord commands - `recharge` and `profile`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, reply_or_propagate},
        core::{
            billing,
            player::{get_player_by_name, update_contact},
            recharge as recharge_core,
            report::{self, format_hours, format_money},
        },
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;

    /// Sells a prepaid hours pack to a player, registering them if they are new.
    #[poise::command(slash_command, prefix_command)]
    pub async fn recharge(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Player name"]
        #[autocomplete = "autocomplete::autocomplete_player_name"]
        player: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let venue = &ctx.data().venue;

        match recharge_core::recharge_by_name(
            db,
            &player,
            &venue.pricing,
            venue.recharge_policy,
            Utc::now(),
        )
        .await
        {
            Ok((player, grant)) => {
                ctx.say(format!(
                    "✅ **{}** recharged: {} for {} hrs. Balance now {}.",
                    player.name,
                    format_money(
                        &venue.currency_symbol,
                        billing::from_cents(grant.amount_paid_cents)
                    ),
                    grant.hours_granted,
                    format_hours(billing::minutes_to_hours(grant.balance_after_minutes))
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_or_propagate(ctx, e).await,
        }
    }

    /// Shows a player's history, total spend and prepaid balance.
    ///
    /// Passing `contact` stores new contact details first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn profile(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Player name"]
        #[autocomplete = "autocomplete::autocomplete_player_name"]
        player: String,
        #[description = "Phone number or handle to save"] contact: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let symbol = &ctx.data().venue.currency_symbol;

        let Some(found) = get_player_by_name(db, &player).await? else {
            ctx.say(format!("❌ No player named '{player}'.")).await?;
            return Ok(());
        };

        if contact.is_some() {
            update_contact(db, found.id, contact).await?;
        }

        let profile = match report::player_profile(db, found.id).await {
            Ok(profile) => profile,
            Err(e) => return reply_or_propagate(ctx, e).await,
        };
        let last_recharge = recharge_core::get_latest_recharge(db, found.id).await?;

        let recent: Vec<String> = profile
            .sessions
            .iter()
            .take(5)
            .map(|s| report::format_session_summary(s, &profile.player.name, symbol))
            .collect();

        let mut embed = serenity::CreateEmbed::default()
            .title(format!("**{}**", profile.player.name))
            .color(0x0058_65F2)
            .field(
                "Time played",
                billing::format_duration(Some(profile.total_minutes)),
                true,
            )
            .field(
                "Total spent",
                format_money(symbol, profile.total_spent),
                true,
            )
            .field("Prepaid left", format_hours(profile.hours_remaining), true);

        if let Some(contact) = &profile.player.contact {
            embed = embed.field("Contact", contact, true);
        }
        if let Some(balance) = last_recharge {
            embed = embed.field(
                "Last recharge",
                balance.created_at.format("%d %b %Y").to_string(),
                true,
            );
        }
        embed = embed.field(
            "Recent sessions",
            if recent.is_empty() {
                "None yet".to_string()
            } else {
                recent.join("\n")
            },
            false,
        );

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

pub use inner::*;
