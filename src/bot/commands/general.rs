//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let pricing = &ctx.data().venue.pricing;
        let symbol = &ctx.data().venue.currency_symbol;
        let help_text = format!(
            "**LoungeBuddy Help**\n\
            Rate: {symbol}{}/hr. Recharge: {symbol}{} for {} hrs.\n\n\
            **Sessions**\n\
            • `/checkin <player>` - Starts a session (registers new players).\n\
            • `/order <player> <beverage> [quantity]` - Adds drinks to the open session.\n\
            • `/bill <player>` - Shows what the open session costs right now.\n\
            • `/checkout <player>` - Closes the session and settles the bill.\n\
            • `/active` - Lists everyone currently playing.\n\
            • `/logs [limit]` - Shows recent sessions.\n\n\
            **Players**\n\
            • `/recharge <player>` - Sells a prepaid hours pack.\n\
            • `/profile <player>` - Shows history, spend and prepaid hours.\n\n\
            **Menu**\n\
            • `/beverage add <name> <price>` - Adds a drink to the menu.\n\
            • `/beverage list` - Shows the menu.\n\n\
            • `/ping` - Checks if the bot is responsive.",
            pricing.hourly_rate, pricing.offer_amount, pricing.offer_hours
        );

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
