//! Billing calculation - Pure arithmetic for time and beverage charges.
//!
//! Nothing in this module touches the database. Callers read the session, its line
//! items and the player's prepaid balance, then ask this module what to charge and
//! what balance remains. All money is `rust_decimal::Decimal`; amounts are rounded
//! half-up to two decimal places by [`round_money`] and nowhere else.
//!
//! Time is billed per whole elapsed minute. Prepaid hours are consumed first; once
//! they run out the remaining minutes are billed at the hourly rate.

use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Minutes in one billed hour
pub const MINUTES_PER_HOUR: i64 = 60;

/// Shown in place of a duration while a session has not been checked out
pub const IN_PROGRESS: &str = "In Progress";

/// One beverage order as seen by the calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    /// Price of a single unit
    pub unit_price: Decimal,
    /// Units ordered, at least 1
    pub quantity: u32,
}

impl LineItem {
    /// Unrounded price of the whole line.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Breakdown of what a session costs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bill {
    /// Whole minutes between check-in and check-out (or "now")
    pub elapsed_minutes: i64,
    /// Charge for play time after prepaid minutes
    pub time_charge: Decimal,
    /// Charge for beverages
    pub beverage_charge: Decimal,
    /// `time_charge + beverage_charge`
    pub total: Decimal,
}

/// Rounds a monetary amount half-up (midpoint away from zero) to two decimal places.
///
/// This is the only rounding rule used for money in the crate.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn validate_time_inputs(elapsed_minutes: i64, hourly_rate: Decimal) -> Result<()> {
    if elapsed_minutes < 0 {
        return Err(Error::invalid_input(format!(
            "elapsed time cannot be negative, got {elapsed_minutes} min"
        )));
    }
    if hourly_rate <= Decimal::ZERO {
        return Err(Error::invalid_input(format!(
            "hourly rate must be positive, got {hourly_rate}"
        )));
    }
    Ok(())
}

/// Computes the time charge for a session given prepaid hours.
///
/// * `hours_remaining == 0`: every elapsed minute is billed.
/// * `elapsed_minutes <= hours_remaining * 60`: fully covered, charge is `0.00`.
/// * otherwise only the minutes beyond the prepaid time are billed.
///
/// # Errors
/// [`Error::InvalidInput`] for negative elapsed time, a non-positive rate or
/// negative prepaid hours.
pub fn compute_time_charge(
    elapsed_minutes: i64,
    hourly_rate: Decimal,
    hours_remaining: Decimal,
) -> Result<Decimal> {
    if hours_remaining < Decimal::ZERO {
        return Err(Error::invalid_input(format!(
            "prepaid hours cannot be negative, got {hours_remaining}"
        )));
    }
    let free_minutes = hours_remaining * Decimal::from(MINUTES_PER_HOUR);
    time_charge_with_free_minutes(elapsed_minutes, hourly_rate, free_minutes)
}

/// Same as [`compute_time_charge`] but with the prepaid time already in minutes,
/// which is how balances are stored.
///
/// # Errors
/// See [`compute_time_charge`].
pub fn compute_time_charge_for_prepaid_minutes(
    elapsed_minutes: i64,
    hourly_rate: Decimal,
    prepaid_minutes: i64,
) -> Result<Decimal> {
    if prepaid_minutes < 0 {
        return Err(Error::invalid_input(format!(
            "prepaid minutes cannot be negative, got {prepaid_minutes}"
        )));
    }
    time_charge_with_free_minutes(elapsed_minutes, hourly_rate, Decimal::from(prepaid_minutes))
}

fn time_charge_with_free_minutes(
    elapsed_minutes: i64,
    hourly_rate: Decimal,
    free_minutes: Decimal,
) -> Result<Decimal> {
    validate_time_inputs(elapsed_minutes, hourly_rate)?;

    let elapsed = Decimal::from(elapsed_minutes);
    // Inclusive: using exactly the prepaid time costs nothing.
    if free_minutes > Decimal::ZERO && elapsed <= free_minutes {
        return Ok(Decimal::ZERO);
    }

    let billable = (elapsed - free_minutes).max(Decimal::ZERO);
    Ok(round_money(
        billable * hourly_rate / Decimal::from(MINUTES_PER_HOUR),
    ))
}

/// Sums `quantity × unit_price` over all line items.
///
/// # Errors
/// [`Error::InvalidInput`] if any line has a zero quantity or a negative price.
pub fn compute_beverage_charge(items: &[LineItem]) -> Result<Decimal> {
    let mut total = Decimal::ZERO;
    for item in items {
        if item.quantity == 0 {
            return Err(Error::invalid_input("quantity must be at least 1"));
        }
        if item.unit_price < Decimal::ZERO {
            return Err(Error::invalid_input(format!(
                "unit price cannot be negative, got {}",
                item.unit_price
            )));
        }
        total += item.total();
    }
    Ok(round_money(total))
}

/// Produces the full bill for a session.
///
/// # Errors
/// Propagates the validation errors of [`compute_time_charge_for_prepaid_minutes`]
/// and [`compute_beverage_charge`].
pub fn compute_bill(
    elapsed_minutes: i64,
    hourly_rate: Decimal,
    prepaid_minutes: i64,
    items: &[LineItem],
) -> Result<Bill> {
    let time_charge =
        compute_time_charge_for_prepaid_minutes(elapsed_minutes, hourly_rate, prepaid_minutes)?;
    let beverage_charge = compute_beverage_charge(items)?;

    Ok(Bill {
        elapsed_minutes,
        time_charge,
        beverage_charge,
        total: time_charge + beverage_charge,
    })
}

/// Prepaid minutes left after playing `elapsed_minutes`, clamped at zero.
///
/// # Errors
/// [`Error::InvalidInput`] if either argument is negative.
pub fn remaining_minutes_after(prepaid_minutes: i64, elapsed_minutes: i64) -> Result<i64> {
    if prepaid_minutes < 0 || elapsed_minutes < 0 {
        return Err(Error::invalid_input(format!(
            "cannot deduct {elapsed_minutes} min from a balance of {prepaid_minutes} min"
        )));
    }
    Ok((prepaid_minutes - elapsed_minutes).max(0))
}

/// Hours-based form of [`remaining_minutes_after`]: subtracts `elapsed / 60` hours
/// when the balance covers it, otherwise clamps to zero.
///
/// # Errors
/// [`Error::InvalidInput`] if either argument is negative.
pub fn remaining_hours_after(hours_remaining: Decimal, elapsed_minutes: i64) -> Result<Decimal> {
    if hours_remaining < Decimal::ZERO || elapsed_minutes < 0 {
        return Err(Error::invalid_input(format!(
            "cannot deduct {elapsed_minutes} min from a balance of {hours_remaining} hrs"
        )));
    }
    let used_hours = Decimal::from(elapsed_minutes) / Decimal::from(MINUTES_PER_HOUR);
    if hours_remaining >= used_hours {
        Ok(hours_remaining - used_hours)
    } else {
        Ok(Decimal::ZERO)
    }
}

/// Converts a stored minute balance to hours.
#[must_use]
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    Decimal::from(minutes) / Decimal::from(MINUTES_PER_HOUR)
}

/// Whole minutes between check-in and check-out, rounded down.
///
/// # Errors
/// [`Error::InvalidInput`] if `check_out` is before `check_in`.
pub fn elapsed_minutes_between(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> Result<i64> {
    let minutes = (check_out - check_in).num_minutes();
    if check_out < check_in {
        return Err(Error::invalid_input(format!(
            "check-out {check_out} is before check-in {check_in}"
        )));
    }
    Ok(minutes)
}

/// Formats a duration as `"H hr M min"`, or `"M min"` under an hour.
/// `None` means the session is still running and yields [`IN_PROGRESS`].
#[must_use]
pub fn format_duration(elapsed_minutes: Option<i64>) -> String {
    let Some(total) = elapsed_minutes else {
        return IN_PROGRESS.to_string();
    };
    let hours = total / MINUTES_PER_HOUR;
    let minutes = total % MINUTES_PER_HOUR;
    if hours > 0 {
        format!("{hours} hr {minutes} min")
    } else {
        format!("{minutes} min")
    }
}

/// Converts stored minor units to a decimal amount.
#[must_use]
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Converts a decimal amount to minor units for storage, rounding with [`round_money`].
///
/// # Errors
/// [`Error::InvalidInput`] if the amount does not fit in an `i64` number of cents.
pub fn to_cents(amount: Decimal) -> Result<i64> {
    (round_money(amount) * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or_else(|| Error::invalid_input(format!("amount {amount} is out of range")))
}
