//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Beverage menu commands
pub mod beverage;

/// General utility commands
pub mod general;

/// Prepaid recharge and player profile commands
pub mod recharge;

/// Session commands: check-in, orders, bills and checkout
pub mod session;

// Export commands
pub use beverage::*;
pub use general::*;
pub use recharge::*;
pub use session::*;
