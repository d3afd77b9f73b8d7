//! Money display and order summary arithmetic.
//!
//! All arithmetic uses `rust_decimal` so totals like `59.99 × 2 + 39.99` are
//! exact. Rounding only happens when a value is formatted for display.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Default sales tax rate applied in the order summary (8%).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Format an amount as dollars with two decimal places, e.g. `$59.99`.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${rounded:.2}")
}

/// Subtotal, tax and grand total for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderSummary {
    /// Build a summary from a cart subtotal and a tax rate (`0.08` = 8%).
    ///
    /// Tax and total saturate instead of overflowing.
    #[must_use]
    pub fn new(subtotal: Decimal, tax_rate: Decimal) -> Self {
        let tax = subtotal.saturating_mul(tax_rate);
        Self {
            subtotal,
            tax,
            total: subtotal.saturating_add(tax),
        }
    }
}
