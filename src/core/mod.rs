//! Core business logic - framework-agnostic billing, session and recharge operations.
//!
//! Nothing in here knows about Discord. The bot layer parses commands and formats
//! replies; every rule about what a visit costs lives in these modules.

/// Pure billing arithmetic: time and beverage charges, rounding, deductions
pub mod billing;
/// Beverage menu management
pub mod beverage;
/// Player registration and lookup
pub mod player;
/// Prepaid balances and the recharge log
pub mod recharge;
/// Player profiles and reply formatting
pub mod report;
/// Check-in, orders, bill previews and checkout
pub mod session;
