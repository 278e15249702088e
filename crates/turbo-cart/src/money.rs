//! Cart amounts.
//!
//! Amounts are integers in the currency's minor unit, so totals never pick
//! up floating-point drift. Storage and display work in major units.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies a cart can be denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
}

impl Currency {
    /// `(code, symbol, decimal places)`
    const fn table(self) -> (&'static str, &'static str, u32) {
        match self {
            Currency::USD => ("USD", "$", 2),
            Currency::EUR => ("EUR", "\u{20ac}", 2),
            Currency::GBP => ("GBP", "\u{00a3}", 2),
            Currency::JPY => ("JPY", "\u{00a5}", 0),
            Currency::CAD => ("CAD", "CA$", 2),
        }
    }

    /// ISO code, e.g. `"USD"`.
    pub fn code(&self) -> &'static str {
        self.table().0
    }

    pub fn symbol(&self) -> &'static str {
        self.table().1
    }

    /// Digits after the decimal point in major units.
    pub fn decimal_places(&self) -> u32 {
        self.table().2
    }

    fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An amount of money in one currency.
///
/// Arithmetic saturates instead of overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the currency's minor unit (cents for USD).
    pub amount_cents: i64,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Amount from major units, rounded to the nearest minor unit.
    ///
    /// `NaN` and infinities become zero.
    ///
    /// ```
    /// use turbo_cart::money::{Money, Currency};
    /// assert_eq!(Money::from_decimal(49.99, Currency::USD).amount_cents, 4999);
    /// assert!(Money::from_decimal(f64::NAN, Currency::USD).is_zero());
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        if !amount.is_finite() {
            return Self::zero(currency);
        }
        // `as` saturates for out-of-range floats.
        let minor = (amount * currency.minor_per_major() as f64).round() as i64;
        Self::new(minor, currency)
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Clamp negative amounts to zero.
    pub fn non_negative(self) -> Self {
        Self::new(self.amount_cents.max(0), self.currency)
    }

    /// Same number of minor units, labelled with `currency`. No conversion.
    pub fn relabel(self, currency: Currency) -> Self {
        Self::new(self.amount_cents, currency)
    }

    /// Amount in major units.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / self.currency.minor_per_major() as f64
    }

    /// Symbol-prefixed string, e.g. `"$49.99"`.
    pub fn display(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        format!("{}{:.places$}", self.currency.symbol(), self.to_decimal())
    }

    /// Sum carrying `self`'s currency.
    pub fn saturating_add(&self, other: &Money) -> Money {
        Money::new(
            self.amount_cents.saturating_add(other.amount_cents),
            self.currency,
        )
    }

    pub fn saturating_mul(&self, factor: i64) -> Money {
        Money::new(self.amount_cents.saturating_mul(factor), self.currency)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decimal_rounds_to_minor_units() {
        assert_eq!(Money::from_decimal(49.99, Currency::USD).amount_cents, 4999);
        assert_eq!(Money::from_decimal(19.999, Currency::EUR).amount_cents, 2000);
        assert_eq!(Money::from_decimal(100.0, Currency::JPY).amount_cents, 100);
    }

    #[test]
    fn test_from_decimal_non_finite_is_zero() {
        for amount in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(Money::from_decimal(amount, Currency::USD).is_zero());
        }
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(Money::new(4999, Currency::USD).to_decimal(), 49.99);
        assert_eq!(Money::new(500, Currency::JPY).to_decimal(), 500.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::new(4999, Currency::USD).to_string(), "$49.99");
        assert_eq!(Money::new(100, Currency::JPY).display(), "\u{00a5}100");
        assert_eq!(Money::new(5, Currency::CAD).display(), "CA$0.05");
    }

    #[test]
    fn test_non_negative() {
        assert!(Money::new(-250, Currency::USD).non_negative().is_zero());
        assert_eq!(Money::new(250, Currency::USD).non_negative().amount_cents, 250);
    }

    #[test]
    fn test_relabel_keeps_minor_units() {
        let m = Money::new(1234, Currency::EUR).relabel(Currency::USD);
        assert_eq!(m, Money::new(1234, Currency::USD));
    }

    #[test]
    fn test_saturating_arithmetic() {
        let big = Money::new(i64::MAX - 1, Currency::USD);
        assert_eq!(big.saturating_add(&Money::new(10, Currency::USD)).amount_cents, i64::MAX);
        assert_eq!(big.saturating_mul(3).amount_cents, i64::MAX);
        assert_eq!(Money::new(250, Currency::USD).saturating_mul(3).amount_cents, 750);
    }
}
