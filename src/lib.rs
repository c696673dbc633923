//! `LoungeBuddy` - A Discord bot for running a gaming lounge front desk
//!
//! This crate tracks player check-ins and check-outs, beverage orders, prepaid hour
//! packs and time-based billing. Operators drive it through Discord slash commands;
//! the billing and persistence logic underneath is framework-agnostic.

#![deny(
    unsafe_code,
    unreachable_code,
    unreachable_patterns,
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    // Money is Decimal or integer cents
    clippy::float_arithmetic,
    clippy::float_cmp,
    // No panics outside tests
    clippy::dbg_macro,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    future_incompatible,
    rust_2018_idioms,
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
)]

// poise command functions carry macro-generated items without docs, so those
// live in `mod inner` blocks that allow `missing_docs` locally.

/// Discord bot interface - commands, handlers, and bot context
pub mod bot;
/// Configuration management for database and application settings
pub mod config;
/// Core business logic - framework-agnostic billing, session, recharge, and reporting operations
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;

#[cfg(test)]
pub mod test_utils;
