//! Cart totals.
//!
//! Pure functions over the current line list. Nothing here is cached; every
//! snapshot recomputes its totals from the items it carries.

use crate::cart::CartLineItem;
use crate::money::{Currency, Money};

/// Sum of quantities.
pub fn total_items(items: &[CartLineItem]) -> i64 {
    items
        .iter()
        .fold(0_i64, |acc, item| acc.saturating_add(item.quantity))
}

/// Σ (unit price + customization cost) × quantity, in `currency`.
pub fn total_price(items: &[CartLineItem], currency: Currency) -> Money {
    items
        .iter()
        .fold(Money::zero(currency), |acc, item| acc.saturating_add(&item.line_total()))
}
