//! Unified error type for `LoungeBuddy`.
//!
//! Domain failures (bad input, missing pricing, lookups) and infrastructure failures
//! (database, I/O, Discord) share one enum so `?` works across every layer.

use thiserror::Error;

/// All errors that can occur in the application
#[derive(Debug, Error)]
pub enum Error {
    /// Generic configuration problem (unreadable or malformed file)
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// No pricing policy is available; billing must not proceed
    #[error("Pricing configuration is missing: {message}")]
    ConfigurationMissing {
        /// Where the pricing was expected
        message: String,
    },

    /// Rejected input such as a negative duration or a non-positive rate
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Which value was rejected and why
        message: String,
    },

    /// The prepaid balance changed between read and write twice in a row
    #[error("Prepaid balance for player {player_id} was modified concurrently")]
    ConcurrentUpdateConflict {
        /// Player whose balance could not be updated
        player_id: i64,
    },

    /// Player lookup failed
    #[error("Player not found: {name}")]
    PlayerNotFound {
        /// Name or id used for the lookup
        name: String,
    },

    /// Session lookup failed
    #[error("Session not found: #{id}")]
    SessionNotFound {
        /// Session id used for the lookup
        id: i64,
    },

    /// Beverage lookup failed
    #[error("Beverage not found: {name}")]
    BeverageNotFound {
        /// Name or id used for the lookup
        name: String,
    },

    /// The player is already checked in
    #[error("Player '{name}' already has an active session (#{session_id})")]
    ActiveSessionExists {
        /// Player name
        name: String,
        /// The session that is still open
        session_id: i64,
    },

    /// The session has already been checked out
    #[error("Session #{id} is already checked out")]
    SessionClosed {
        /// Session id
        id: i64,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Failure while writing a reply into a `String`
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Discord framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Convenience constructor for [`Error::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Whether this error is something the operator caused and can fix by
    /// changing the command, as opposed to an infrastructure failure.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::PlayerNotFound { .. }
                | Self::SessionNotFound { .. }
                | Self::BeverageNotFound { .. }
                | Self::ActiveSessionExists { .. }
                | Self::SessionClosed { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_classification() {
        assert!(Error::invalid_input("negative").is_user_facing());
        assert!(Error::SessionClosed { id: 3 }.is_user_facing());
        assert!(!Error::ConcurrentUpdateConflict { player_id: 1 }.is_user_facing());
        assert!(
            !Error::ConfigurationMissing {
                message: "config.toml".to_string()
            }
            .is_user_facing()
        );
    }

    #[test]
    fn test_error_messages() {
        let err = Error::ActiveSessionExists {
            name: "Asha".to_string(),
            session_id: 7,
        };
        assert_eq!(
            err.to_string(),
            "Player 'Asha' already has an active session (#7)"
        );
        assert_eq!(
            Error::invalid_input("quantity must be at least 1").to_string(),
            "Invalid input: quantity must be at least 1"
        );
    }
}
