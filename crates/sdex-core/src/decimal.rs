//! Precision-safe decimal types for quoting.
//!
//! Uses `rust_decimal` for exact decimal arithmetic. Values carry full
//! precision through every intermediate step and are rounded to the
//! exchange precision only when a [`Level`](crate::Level) is emitted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Price with exact decimal precision.
///
/// Wraps `Decimal` to provide type safety and prevent mixing
/// prices with amounts in calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    /// Strictly greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Price of the other asset in terms of this one (`1 / price`).
    ///
    /// Returns `None` for a zero price.
    #[inline]
    pub fn inverse(&self) -> Option<Self> {
        Decimal::ONE.checked_div(self.0).map(Self)
    }

    /// `price * (1 + spread)`, or `None` when the result does not fit.
    #[inline]
    pub fn checked_spread(&self, spread: Decimal) -> Option<Self> {
        self.0
            .checked_mul(spread)
            .and_then(|shift| self.0.checked_add(shift))
            .map(Self)
    }

    /// Round to `precision` fractional digits (banker's rounding).
    #[inline]
    pub fn round_to_precision(&self, precision: u32) -> Self {
        Self(self.0.round_dp(precision))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order amount, denominated in the base asset of the side quoting it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(pub Decimal);

impl Amount {
    pub const ZERO: Self = Self(Decimal::ZERO);
    pub const ONE: Self = Self(Decimal::ONE);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Round to `precision` fractional digits (banker's rounding).
    #[inline]
    pub fn round_to_precision(&self, precision: u32) -> Self {
        Self(self.0.round_dp(precision))
    }

    /// `fraction * of`, the amount of one tier. `None` on overflow.
    #[inline]
    pub fn checked_fraction(fraction: Decimal, of: Decimal) -> Option<Self> {
        fraction.checked_mul(of).map(Self)
    }

    #[inline]
    pub fn checked_add(&self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Value of this amount at `price`, in the counter asset.
    /// `None` when it does not fit in a `Decimal`.
    #[inline]
    pub fn notional(&self, price: Price) -> Option<Amount> {
        self.0.checked_mul(price.0).map(Self)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| acc + a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_round_to_precision() {
        let price = Price::new(dec!(12345.6789));
        assert_eq!(price.round_to_precision(2).inner(), dec!(12345.68));
    }

    #[test]
    fn test_rounding_is_idempotent() {
        let price = Price::new(dec!(0.123456789));
        let once = price.round_to_precision(7);
        assert_eq!(once.round_to_precision(7), once);

        let amount = Amount::new(dec!(1.23456));
        let once = amount.round_to_precision(3);
        assert_eq!(once, Amount::new(dec!(1.235)));
        assert_eq!(once.round_to_precision(3), once);
    }

    #[test]
    fn test_price_inverse() {
        assert_eq!(Price::new(dec!(4)).inverse(), Some(Price::new(dec!(0.25))));
        assert_eq!(Price::ZERO.inverse(), None);
    }

    #[test]
    fn test_checked_spread() {
        assert_eq!(
            Price::new(dec!(100)).checked_spread(dec!(0.01)),
            Some(Price::new(dec!(101)))
        );
        assert_eq!(Price::new(Decimal::MAX).checked_spread(dec!(0.5)), None);
    }

    #[test]
    fn test_checked_amounts() {
        assert_eq!(
            Amount::checked_fraction(dec!(0.5), dec!(30)),
            Some(Amount::new(dec!(15)))
        );
        assert_eq!(Amount::checked_fraction(Decimal::MAX, dec!(2)), None);
        assert_eq!(Amount::new(Decimal::MAX).checked_add(Amount::ONE), None);
    }

    #[test]
    fn test_amount_sum() {
        let total: Amount = [dec!(1.5), dec!(2.25), dec!(0.25)]
            .into_iter()
            .map(Amount::new)
            .sum();
        assert_eq!(total, Amount::new(dec!(4)));
    }

    #[test]
    fn test_notional_calculation() {
        let amount = Amount::new(dec!(0.5));
        let price = Price::new(dec!(50000));
        assert_eq!(amount.notional(price), Some(Amount::new(dec!(25000))));
        assert_eq!(Amount::new(dec!(2)).notional(Price::new(Decimal::MAX)), None);
    }
}
