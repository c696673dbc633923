//! Venue pricing configuration loading from config.toml
//!
//! Pricing is read once at start-up and then passed explicitly to every billing
//! operation. A missing file or a missing `[pricing]` table is a hard
//! [`Error::ConfigurationMissing`]: the lounge must never bill with unknown rates.
//!
//! ```toml
//! currency_symbol = "₹"
//! recharge_policy = "replace"
//!
//! [pricing]
//! hourly_rate = "60.00"
//! offer_amount = "500"
//! offer_hours = 10
//! ```

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Hourly rate and recharge offer for the venue
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PricingConfig {
    /// Price of one hour of play
    pub hourly_rate: Decimal,
    /// Price of one recharge pack
    pub offer_amount: Decimal,
    /// Prepaid hours granted by one recharge pack
    pub offer_hours: i64,
}

impl PricingConfig {
    /// Checks that the values make sense for billing.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] for a non-positive hourly rate, a negative
    /// offer amount or a non-positive number of offer hours.
    pub fn validate(&self) -> Result<()> {
        if self.hourly_rate <= Decimal::ZERO {
            return Err(Error::invalid_input(format!(
                "hourly_rate must be positive, got {}",
                self.hourly_rate
            )));
        }
        if self.offer_amount < Decimal::ZERO {
            return Err(Error::invalid_input(format!(
                "offer_amount cannot be negative, got {}",
                self.offer_amount
            )));
        }
        if self.offer_hours <= 0 {
            return Err(Error::invalid_input(format!(
                "offer_hours must be positive, got {}",
                self.offer_hours
            )));
        }
        Ok(())
    }
}

/// What a new recharge does to an existing prepaid balance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RechargePolicy {
    /// The balance is reset to the offer hours (leftover time is lost)
    #[default]
    Replace,
    /// The offer hours are added on top of the remaining balance
    Stack,
}

/// Raw shape of config.toml
#[derive(Debug, Deserialize)]
struct ConfigFile {
    pricing: Option<PricingConfig>,
    #[serde(default)]
    recharge_policy: RechargePolicy,
    #[serde(default = "default_currency_symbol")]
    currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

/// Validated venue configuration shared by the bot and the core
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueConfig {
    /// Hourly rate and recharge offer
    pub pricing: PricingConfig,
    /// How recharges combine with a remaining balance
    pub recharge_policy: RechargePolicy,
    /// Symbol printed in front of amounts
    pub currency_symbol: String,
}

/// Parses and validates venue configuration from TOML text.
///
/// # Errors
/// Returns an error if:
/// - The TOML syntax is invalid ([`Error::Config`])
/// - The `[pricing]` table is absent ([`Error::ConfigurationMissing`])
/// - A pricing value is out of range ([`Error::InvalidInput`])
pub fn parse_config(contents: &str) -> Result<VenueConfig> {
    let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    let pricing = file.pricing.ok_or_else(|| Error::ConfigurationMissing {
        message: "config.toml has no [pricing] table".to_string(),
    })?;
    pricing.validate()?;

    Ok(VenueConfig {
        pricing,
        recharge_policy: file.recharge_policy,
        currency_symbol: file.currency_symbol,
    })
}

/// Loads venue configuration from a TOML file
///
/// # Errors
/// A file that does not exist is reported as [`Error::ConfigurationMissing`];
/// other read failures are [`Error::Config`]. See [`parse_config`] for the rest.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<VenueConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);

    let contents = std::fs::read_to_string(path_ref).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ConfigurationMissing {
                message: format!("{} does not exist", path_ref.display()),
            }
        } else {
            Error::Config {
                message: format!("Failed to read config file {}: {e}", path_ref.display()),
            }
        }
    })?;

    let config = parse_config(&contents)?;
    info!(
        "Loaded pricing: {}{}/hr, offer {}{} = {} hrs, recharge policy {:?}",
        config.currency_symbol,
        config.pricing.hourly_rate,
        config.currency_symbol,
        config.pricing.offer_amount,
        config.pricing.offer_hours,
        config.recharge_policy
    );
    Ok(config)
}

/// Loads venue configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<VenueConfig> {
    load_config("config.toml")
}
