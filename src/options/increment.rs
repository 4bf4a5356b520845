use core::num::{NonZeroU128, NonZeroU32};

use crate::{error::ErrorMessage, TemporalError, TemporalResult};

use core_maths::CoreFloat;

/// A `roundingIncrement` option value, in the range `1..=1_000_000_000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RoundingIncrement(pub(crate) NonZeroU32);

impl Default for RoundingIncrement {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<f64> for RoundingIncrement {
    type Error = TemporalError;

    /// `GetRoundingIncrementOption`
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        // 3. Let integerIncrement be truncate(ℝ(value)).
        // 4. If integerIncrement < 1 or integerIncrement > 10**9, throw a RangeError exception.
        if !value.is_finite() {
            return Err(TemporalError::range().with_enum(ErrorMessage::NumberNotFinite));
        }
        let integer_increment = CoreFloat::trunc(value);
        if !(1.0..=1_000_000_000.0).contains(&integer_increment) {
            return Err(TemporalError::range().with_enum(ErrorMessage::RoundingIncrementInvalid));
        }
        Self::try_new(integer_increment as u32)
    }
}

impl RoundingIncrement {
    /// A rounding increment of one.
    pub const ONE: Self = match NonZeroU32::new(1) {
        Some(one) => Self(one),
        None => unreachable!(),
    };

    /// Creates a new rounding increment, which must lie in `1..=1_000_000_000`.
    pub fn try_new(increment: u32) -> TemporalResult<Self> {
        if !(1..=1_000_000_000).contains(&increment) {
            return Err(TemporalError::range().with_enum(ErrorMessage::RoundingIncrementInvalid));
        }
        NonZeroU32::new(increment)
            .map(Self)
            .ok_or(TemporalError::range().with_enum(ErrorMessage::RoundingIncrementInvalid))
    }

    #[inline]
    #[must_use]
    pub fn get(&self) -> u32 {
        self.0.get()
    }

    /// `ValidateTemporalRoundingIncrement`
    pub(crate) fn validate(self, dividend: u64, inclusive: bool) -> TemporalResult<()> {
        // 1. If inclusive is true, then
        //     a. Let maximum be dividend.
        // 2. Else,
        //     a. Assert: dividend > 1.
        //     b. Let maximum be dividend - 1.
        let max = if inclusive { dividend } else { dividend - 1 };
        let increment = u64::from(self.get());

        // 3. If increment > maximum, throw a RangeError exception.
        if increment > max {
            return Err(TemporalError::range().with_enum(ErrorMessage::RoundingIncrementInvalid));
        }

        // 4. If dividend modulo increment ≠ 0, then
        if dividend % increment != 0 {
            // a. Throw a RangeError exception.
            return Err(TemporalError::range().with_enum(ErrorMessage::RoundingIncrementInvalid));
        }

        // 5. Return unused.
        Ok(())
    }

    pub(crate) fn as_extended_increment(&self) -> NonZeroU128 {
        NonZeroU128::from(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::RoundingIncrement;

    #[test]
    fn increment_from_float() {
        assert_eq!(RoundingIncrement::try_from(2.9).unwrap().get(), 2);
        assert!(RoundingIncrement::try_from(0.5).is_err());
        assert!(RoundingIncrement::try_from(f64::NAN).is_err());
        assert!(RoundingIncrement::try_from(1e9 + 1.0).is_err());
    }

    #[test]
    fn increment_validation() {
        let fifteen = RoundingIncrement::try_new(15).unwrap();
        assert!(fifteen.validate(60, false).is_ok());
        assert!(RoundingIncrement::try_new(60).unwrap().validate(60, false).is_err());
        assert!(RoundingIncrement::try_new(7).unwrap().validate(60, false).is_err());
        assert!(RoundingIncrement::ONE.validate(1, true).is_ok());
    }
}
