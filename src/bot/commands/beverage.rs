//! Beverage Discord commands - adding to and listing the drinks menu.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, reply_or_propagate},
        core::{beverage, billing, report},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    /// Parent command for managing the drinks menu.
    #[poise::command(slash_command, subcommands("beverage_add", "beverage_list"))]
    pub async fn beverage(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Beverage menu command. Available subcommands:\n\
            `/beverage add` - Add a drink to the menu\n\
            `/beverage list` - Show the menu";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a drink to the menu.
    ///
    /// The price is taken as text so it is parsed exactly, e.g. `45.50`.
    #[poise::command(slash_command, rename = "add")]
    pub async fn beverage_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Menu name (e.g., 'Cold Coffee')"] name: String,
        #[description = "Unit price (e.g., 45.50)"] price: String,
    ) -> Result<()> {
        let Ok(price) = Decimal::from_str(price.trim()) else {
            ctx.say(format!("❌ '{price}' is not a valid price."))
                .await?;
            return Ok(());
        };

        let db = &ctx.data().database;
        let symbol = &ctx.data().venue.currency_symbol;

        if beverage::get_beverage_by_name(db, &name).await?.is_some() {
            ctx.say(format!(
                "⚠️ '{}' is already on the menu. Beverage names must be unique.",
                name.trim()
            ))
            .await?;
            return Ok(());
        }

        match beverage::create_beverage(db, &name, price).await {
            Ok(created) => {
                ctx.say(format!(
                    "✅ Added **{}** at {}.",
                    created.name,
                    report::format_money(symbol, billing::from_cents(created.price_cents))
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_or_propagate(ctx, e).await,
        }
    }

    /// Shows the drinks menu with prices.
    #[poise::command(slash_command, rename = "list")]
    pub async fn beverage_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let symbol = &ctx.data().venue.currency_symbol;

        let beverages = beverage::get_all_beverages(db).await?;
        if beverages.is_empty() {
            ctx.say("The menu is empty. Use `/beverage add` to add drinks!")
                .await?;
            return Ok(());
        }

        let fields = beverages.into_iter().map(|b| {
            (
                b.name,
                report::format_money(symbol, billing::from_cents(b.price_cents)),
                true,
            )
        });

        let menu_embed = serenity::CreateEmbed::default()
            .title("**Menu**")
            .color(0x0058_65F2)
            .fields(fields);

        ctx.send(poise::CreateReply::default().embed(menu_embed))
            .await?;
        Ok(())
    }
}

pub use inner::*;
