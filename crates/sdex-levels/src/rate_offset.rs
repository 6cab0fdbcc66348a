//! Manual correction applied to the center price.
//!
//! The offset is always expressed in the natural orientation of the side it
//! configures. For the inverted side of a pair the center price is flipped
//! before and after the adjustment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sdex_core::Price;

/// Percentage scale plus absolute shift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateOffset {
    /// Fractional scale (0.01 = +1%).
    pub percent: Decimal,
    /// Absolute shift in price units.
    pub absolute: Decimal,
    /// Apply the percentage before the absolute shift.
    pub percent_first: bool,
    /// Operate on `1 / price`.
    pub invert: bool,
}

impl RateOffset {
    pub fn new(percent: Decimal, absolute: Decimal, percent_first: bool) -> Self {
        Self {
            percent,
            absolute,
            percent_first,
            invert: false,
        }
    }

    /// Same offset applied to the inverted price.
    pub fn inverted(self) -> Self {
        Self {
            invert: true,
            ..self
        }
    }

    /// True when neither a percentage nor an absolute shift is configured.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.percent.is_zero() && self.absolute.is_zero()
    }

    /// Adjust `center`.
    ///
    /// Returns `None` when an inversion would divide by zero or the
    /// adjusted price does not fit in a `Decimal`.
    pub fn apply(&self, center: Price) -> Option<Price> {
        if self.is_noop() {
            return Some(center);
        }

        let mut price = center;
        if self.invert {
            price = price.inverse()?;
        }

        let scale = Decimal::ONE.checked_add(self.percent)?;
        let adjusted = if self.percent_first {
            price.inner().checked_mul(scale)?.checked_add(self.absolute)?
        } else {
            price.inner().checked_add(self.absolute)?.checked_mul(scale)?
        };
        price = Price::new(adjusted);

        if self.invert {
            price = price.inverse()?;
        }
        Some(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_noop_returns_input() {
        let offset = RateOffset::default();
        for x in [dec!(0), dec!(0.0000001), dec!(1), dec!(12345.6789)] {
            assert_eq!(offset.apply(Price::new(x)), Some(Price::new(x)));
        }
        // Inversion alone is still a no-op, zero included
        assert_eq!(
            offset.inverted().apply(Price::ZERO),
            Some(Price::ZERO)
        );
    }

    #[test]
    fn test_percent_first_ordering() {
        let offset = RateOffset::new(dec!(0.1), dec!(2), true);
        // 10 * 1.1 + 2
        assert_eq!(offset.apply(Price::new(dec!(10))).unwrap().inner(), dec!(13.0));

        let offset = RateOffset::new(dec!(0.1), dec!(2), false);
        // (10 + 2) * 1.1
        assert_eq!(offset.apply(Price::new(dec!(10))).unwrap().inner(), dec!(13.2));
    }

    #[test]
    fn test_negative_offsets() {
        let offset = RateOffset::new(dec!(-0.05), dec!(0), true);
        assert_eq!(offset.apply(Price::new(dec!(200))).unwrap().inner(), dec!(190.00));
    }

    #[test]
    fn test_inversion_symmetry() {
        for percent_first in [true, false] {
            let plain = RateOffset::new(dec!(0.02), dec!(0.5), percent_first);
            let inverted = plain.inverted();
            for p in [dec!(0.25), dec!(4), dec!(0.1234567)] {
                let price = Price::new(p);
                let expected = plain
                    .apply(price.inverse().unwrap())
                    .unwrap()
                    .inverse()
                    .unwrap();
                assert_eq!(inverted.apply(price).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_inverted_example() {
        // 1/4 = 0.25; (0.25 + 0.25) * 1 = 0.5; 1/0.5 = 2
        let offset = RateOffset::new(dec!(0), dec!(0.25), false).inverted();
        assert_eq!(offset.apply(Price::new(dec!(4))).unwrap().inner(), dec!(2));
    }

    #[test]
    fn test_inversion_of_zero_is_none() {
        let offset = RateOffset::new(dec!(0.1), dec!(0), true).inverted();
        assert_eq!(offset.apply(Price::ZERO), None);
        // Adjustment landing exactly on zero cannot be inverted back
        let offset = RateOffset::new(dec!(0), dec!(-1), false).inverted();
        assert_eq!(offset.apply(Price::new(dec!(1))), None);
    }

    #[test]
    fn test_overflow_is_none() {
        let huge = Price::new(Decimal::MAX);
        assert_eq!(RateOffset::new(dec!(0.5), dec!(0), true).apply(huge), None);
        assert_eq!(RateOffset::new(dec!(0), dec!(1), false).apply(huge), None);
        // 1 / 1e-28 = 1e28, doubled past the decimal range
        let tiny = Price::new(Decimal::new(1, 28));
        assert_eq!(RateOffset::new(dec!(9), dec!(0), true).inverted().apply(tiny), None);
    }
}
