/// Database configuration and connection management
pub mod database;

/// Venue pricing configuration loading from config.toml
pub mod pricing;
