//! Type-safe price representation using decimal arithmetic.
//!
//! The store sells in a single currency, so a [`Price`] is just an exact
//! decimal amount in the standard unit (dollars, not cents). Prices are
//! serialized as JSON numbers because that is what the backend and the
//! persisted cart both use.
//!
//! Arithmetic saturates at `Decimal::MAX` / `Decimal::MIN` instead of
//! overflowing.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Sub};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `qty` units, saturating at the largest representable amount.
    #[must_use]
    pub fn times(self, qty: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(qty)))
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format_price(*self)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<u32> for Price {
    fn from(amount: u32) -> Self {
        Self(Decimal::from(amount))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

/// Format a price as a currency string with two decimals.
#[must_use]
pub fn format_price(price: Price) -> String {
    price.to_string()
}

/// Whether the selling price is below the labelled (list) price.
#[must_use]
pub fn is_discounted(price: Price, labelled_price: Price) -> bool {
    labelled_price > price
}

/// Discount relative to the labelled price, as a whole percentage.
///
/// Returns `None` when there is no discount. Half-percent values round up.
#[must_use]
pub fn discount_percent(price: Price, labelled_price: Price) -> Option<u32> {
    if !is_discounted(price, labelled_price) || labelled_price.0 <= Decimal::ZERO {
        return None;
    }

    let ratio = Decimal::ONE.checked_sub(price.0.checked_div(labelled_price.0)?)?;
    ratio
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from(20).to_string(), "$20.00");
        assert_eq!(Price::from_cents(2999).to_string(), "$29.99");
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from(10).times(2), Price::from(5).times(3)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from(35));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Price::new(Decimal::from_str_exact("50000000000000000000000000000").unwrap());
        assert_eq!(huge.times(2), Price::new(Decimal::MAX));
        assert_eq!(huge + huge, Price::new(Decimal::MAX));
        assert_eq!(
            [huge, huge, Price::from(1)].into_iter().sum::<Price>(),
            Price::new(Decimal::MAX)
        );
        assert_eq!(Price::new(Decimal::MIN) - huge, Price::new(Decimal::MIN));
    }

    #[test]
    fn test_discount_percent_extreme_amounts() {
        let tiny = Price::new(Decimal::new(1, 28));
        assert_eq!(discount_percent(Price::new(Decimal::MIN), tiny), None);
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&Price::from_cents(1250)).unwrap();
        assert_eq!(json, "12.5");
    }

    #[test]
    fn test_deserializes_integers_and_floats() {
        let whole: Price = serde_json::from_str("15").unwrap();
        assert_eq!(whole, Price::from(15));

        let fractional: Price = serde_json::from_str("45.99").unwrap();
        assert_eq!(fractional, Price::new(Decimal::new(4599, 2)));
    }

    #[test]
    fn test_is_discounted() {
        assert!(is_discounted(Price::from(20), Price::from(25)));
        assert!(!is_discounted(Price::from(25), Price::from(25)));
        assert!(!is_discounted(Price::from(30), Price::from(25)));
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(discount_percent(Price::from(20), Price::from(25)), Some(20));
        // 1 - 29.99 / 45.99 = 34.79%
        assert_eq!(
            discount_percent(Price::from_cents(2999), Price::from_cents(4599)),
            Some(35)
        );
        assert_eq!(discount_percent(Price::from(25), Price::from(25)), None);
    }
}
