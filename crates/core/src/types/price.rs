//! Price display helpers.
//!
//! Prices travel as `rust_decimal::Decimal` so that cart subtotals are exact.
//! The catalog serves a single currency, so no currency code is carried.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format a price for display with two decimal places (e.g., `"$179.90"`).
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${rounded:.2}")
}
