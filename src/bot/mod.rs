//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the LoungeBuddy application,
//! including all slash commands, autocomplete handlers, and bot context management.

/// Discord command implementations (session, recharge, beverage, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::pricing::VenueConfig,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument};

/// Discord rejects messages longer than this many characters
pub const MESSAGE_LIMIT: usize = 2000;

/// Appends `line` and a newline to `message` unless that would take it past
/// [`MESSAGE_LIMIT`] minus `reserved` bytes. Returns whether the line was added.
///
/// Lengths are counted in bytes, which is never less than the character count
/// Discord enforces.
pub fn push_line_within(message: &mut String, line: &str, reserved: usize) -> bool {
    if message.len() + line.len() + 1 + reserved > MESSAGE_LIMIT {
        return false;
    }
    message.push_str(line);
    message.push('\n');
    true
}

/// Shared data available to all bot commands.
/// This structure holds the database connection and the venue configuration
/// that was loaded once at start-up.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Pricing, recharge policy and currency
    pub venue: VenueConfig,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection and
    /// venue configuration.
    #[must_use]
    pub const fn new(database: DatabaseConnection, venue: VenueConfig) -> Self {
        Self { database, venue }
    }
}

/// Replies with a domain error the operator can act on, or hands anything else
/// back to the framework's error hook.
pub async fn reply_or_propagate(
    ctx: poise::Context<'_, BotData, Error>,
    error: Error,
) -> Result<()> {
    if error.is_user_facing() {
        ctx.say(format!("❌ {error}")).await?;
        Ok(())
    } else {
        Err(error)
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx
                .say("⚠️ Something went wrong on our side. The error has been logged.")
                .await
            {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the poise framework with every command and runs the Discord client
/// until it stops.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::checkin(),
                commands::order(),
                commands::bill(),
                commands::checkout(),
                commands::active(),
                commands::logs(),
                commands::recharge(),
                commands::profile(),
                commands::beverage(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;

    Ok(())
}
