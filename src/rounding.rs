//! Implementation of increment rounding functionality

use crate::{
    options::{TemporalRoundingMode, UnsignedRoundingMode},
    TemporalError, TemporalResult,
};

use core::{cmp::Ordering, num::NonZeroU128};

/// Rounds an exact integer quantity to a multiple of an increment.
///
/// All Temporal quantities are integers once expressed in nanoseconds (or in
/// nanoseconds scaled by a day length), so the rounding is carried out on the
/// magnitude with exact integer arithmetic and the sign is re-applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IncrementRounder {
    sign: bool,
    dividend: u128,
    divisor: u128,
}

impl IncrementRounder {
    #[inline]
    pub(crate) fn from_signed_num(number: i128, increment: NonZeroU128) -> TemporalResult<Self> {
        if increment.get() > i128::MAX as u128 {
            return Err(TemporalError::range().with_message("increment exceeded valid range."));
        }
        Ok(Self {
            sign: number >= 0,
            dividend: number.unsigned_abs(),
            divisor: increment.get(),
        })
    }

    /// Returns the number of increments in the rounded value, with sign.
    #[inline]
    pub(crate) fn round_to_quotient(&self, mode: TemporalRoundingMode) -> i128 {
        let unsigned_rounding_mode = mode.get_unsigned_round_mode(self.sign);
        let rounded =
            apply_unsigned_rounding_mode(self.dividend, self.divisor, unsigned_rounding_mode)
                as i128;
        if self.sign {
            rounded
        } else {
            -rounded
        }
    }

    /// Returns the rounded value, which is a multiple of the increment.
    #[inline]
    pub(crate) fn round(&self, mode: TemporalRoundingMode) -> i128 {
        self.round_to_quotient(mode) * self.divisor as i128
    }

    /// Rounds as though the value were positive, i.e. toward negative
    /// infinity for `floor` regardless of sign.
    #[inline]
    pub(crate) fn round_as_if_positive(&self, mode: TemporalRoundingMode) -> i128 {
        let unsigned_rounding_mode = mode.get_unsigned_round_mode(true);
        if self.sign {
            return apply_unsigned_rounding_mode(
                self.dividend,
                self.divisor,
                unsigned_rounding_mode,
            ) as i128
                * self.divisor as i128;
        }
        // For x < 0, the bounds on the number line are -ceil(|x|) and -floor(|x|),
        // so the lower bound (r1) is the negated ceiling.
        let floor = self.dividend / self.divisor;
        let remainder_to_r2 = self.dividend % self.divisor;
        if remainder_to_r2 == 0 {
            return -((floor * self.divisor) as i128);
        }
        let (r1, r2) = (-((floor + 1) as i128), -(floor as i128));
        let remainder_to_r1 = self.divisor - remainder_to_r2;
        let result = match unsigned_rounding_mode {
            UnsignedRoundingMode::Zero => r1,
            UnsignedRoundingMode::Infinity => r2,
            _ => match remainder_to_r1.cmp(&remainder_to_r2) {
                Ordering::Less => r1,
                Ordering::Greater => r2,
                Ordering::Equal => match unsigned_rounding_mode {
                    UnsignedRoundingMode::HalfZero => r1,
                    UnsignedRoundingMode::HalfInfinity => r2,
                    _ if r1.rem_euclid(2) == 0 => r1,
                    _ => r2,
                },
            },
        };
        result * self.divisor as i128
    }
}

/// Applies the unsigned rounding mode to `dividend / divisor`, returning the
/// quotient of the chosen bound.
fn apply_unsigned_rounding_mode(
    dividend: u128,
    divisor: u128,
    unsigned_rounding_mode: UnsignedRoundingMode,
) -> u128 {
    let r1 = dividend / divisor;
    let remainder = dividend % divisor;
    // 1. If x is equal to r1, return r1.
    if remainder == 0 {
        return r1;
    }
    // 2. Assert: r1 < x < r2.
    let r2 = r1 + 1;
    // 3. Assert: unsignedRoundingMode is not undefined.

    // 4. If unsignedRoundingMode is zero, return r1.
    if unsigned_rounding_mode == UnsignedRoundingMode::Zero {
        return r1;
    };
    // 5. If unsignedRoundingMode is infinity, return r2.
    if unsigned_rounding_mode == UnsignedRoundingMode::Infinity {
        return r2;
    };

    // 6. Let d1 be x – r1.
    // 7. Let d2 be r2 – x.
    // 8. If d1 < d2, return r1.
    // 9. If d2 < d1, return r2.
    match remainder.cmp(&(divisor - remainder)) {
        Ordering::Less => r1,
        Ordering::Greater => r2,
        Ordering::Equal => {
            // 10. Assert: d1 is equal to d2.
            // 11. If unsignedRoundingMode is half-zero, return r1.
            if unsigned_rounding_mode == UnsignedRoundingMode::HalfZero {
                return r1;
            };
            // 12. If unsignedRoundingMode is half-infinity, return r2.
            if unsigned_rounding_mode == UnsignedRoundingMode::HalfInfinity {
                return r2;
            };
            // 13. Assert: unsignedRoundingMode is half-even.
            debug_assert!(unsigned_rounding_mode == UnsignedRoundingMode::HalfEven);
            // 14. Let cardinality be (r1 / (r2 – r1)) modulo 2.
            // 15. If cardinality is 0, return r1.
            if r1 % 2 == 0 {
                return r1;
            }
            // 16. Return r2.
            r2
        }
    }
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroU128;

    use super::{IncrementRounder, TemporalRoundingMode};

    #[derive(Debug)]
    struct TestCase {
        x: i128,
        increment: u128,
        ceil: i128,
        floor: i128,
        expand: i128,
        trunc: i128,
        half_ceil: i128,
        half_floor: i128,
        half_expand: i128,
        half_trunc: i128,
        half_even: i128,
    }

    impl TestCase {
        fn run(&self) {
            let rounder =
                IncrementRounder::from_signed_num(self.x, NonZeroU128::new(self.increment).unwrap())
                    .unwrap();
            let cases = [
                (TemporalRoundingMode::Ceil, self.ceil),
                (TemporalRoundingMode::Floor, self.floor),
                (TemporalRoundingMode::Expand, self.expand),
                (TemporalRoundingMode::Trunc, self.trunc),
                (TemporalRoundingMode::HalfCeil, self.half_ceil),
                (TemporalRoundingMode::HalfFloor, self.half_floor),
                (TemporalRoundingMode::HalfExpand, self.half_expand),
                (TemporalRoundingMode::HalfTrunc, self.half_trunc),
                (TemporalRoundingMode::HalfEven, self.half_even),
            ];
            for (mode, expected) in cases {
                assert_eq!(
                    expected,
                    rounder.round(mode),
                    "Testing {}/{} with mode {mode:?}",
                    self.x,
                    self.increment
                );
            }
        }
    }

    #[test]
    fn basic_rounding_cases() {
        const CASES: [TestCase; 4] = [
            TestCase {
                x: 100,
                increment: 10,
                ceil: 100,
                floor: 100,
                expand: 100,
                trunc: 100,
                half_ceil: 100,
                half_floor: 100,
                half_expand: 100,
                half_trunc: 100,
                half_even: 100,
            },
            TestCase {
                x: 101,
                increment: 10,
                ceil: 110,
                floor: 100,
                expand: 110,
                trunc: 100,
                half_ceil: 100,
                half_floor: 100,
                half_expand: 100,
                half_trunc: 100,
                half_even: 100,
            },
            TestCase {
                x: 105,
                increment: 10,
                ceil: 110,
                floor: 100,
                expand: 110,
                trunc: 100,
                half_ceil: 110,
                half_floor: 100,
                half_expand: 110,
                half_trunc: 100,
                half_even: 100,
            },
            TestCase {
                x: 107,
                increment: 10,
                ceil: 110,
                floor: 100,
                expand: 110,
                trunc: 100,
                half_ceil: 110,
                half_floor: 110,
                half_expand: 110,
                half_trunc: 110,
                half_even: 110,
            },
        ];

        for case in CASES {
            case.run();
        }
    }

    #[test]
    fn negative_rounding_cases() {
        const CASES: [TestCase; 3] = [
            TestCase {
                x: -101,
                increment: 10,
                ceil: -100,
                floor: -110,
                expand: -110,
                trunc: -100,
                half_ceil: -100,
                half_floor: -100,
                half_expand: -100,
                half_trunc: -100,
                half_even: -100,
            },
            TestCase {
                x: -105,
                increment: 10,
                ceil: -100,
                floor: -110,
                expand: -110,
                trunc: -100,
                half_ceil: -100,
                half_floor: -110,
                half_expand: -110,
                half_trunc: -100,
                half_even: -100,
            },
            TestCase {
                x: -115,
                increment: 10,
                ceil: -110,
                floor: -120,
                expand: -120,
                trunc: -110,
                half_ceil: -110,
                half_floor: -120,
                half_expand: -120,
                half_trunc: -110,
                half_even: -120,
            },
        ];

        for case in CASES {
            case.run();
        }
    }

    #[test]
    fn odd_increment_half_point() {
        // 7 / 3: remainder 1 is below the midpoint 1.5.
        TestCase {
            x: 7,
            increment: 3,
            ceil: 9,
            floor: 6,
            expand: 9,
            trunc: 6,
            half_ceil: 6,
            half_floor: 6,
            half_expand: 6,
            half_trunc: 6,
            half_even: 6,
        }
        .run();
        // 8 / 3: remainder 2 is above the midpoint.
        TestCase {
            x: 8,
            increment: 3,
            ceil: 9,
            floor: 6,
            expand: 9,
            trunc: 6,
            half_ceil: 9,
            half_floor: 9,
            half_expand: 9,
            half_trunc: 9,
            half_even: 9,
        }
        .run();
    }

    #[test]
    fn quotient_rounding() {
        let rounder =
            IncrementRounder::from_signed_num(-25, NonZeroU128::new(10).unwrap()).unwrap();
        assert_eq!(rounder.round_to_quotient(TemporalRoundingMode::HalfExpand), -3);
        assert_eq!(rounder.round_to_quotient(TemporalRoundingMode::HalfEven), -2);
        assert_eq!(rounder.round_to_quotient(TemporalRoundingMode::Trunc), -2);
    }

    #[test]
    fn as_if_positive_rounding() {
        let rounder =
            IncrementRounder::from_signed_num(-15, NonZeroU128::new(10).unwrap()).unwrap();
        assert_eq!(rounder.round_as_if_positive(TemporalRoundingMode::Floor), -20);
        assert_eq!(rounder.round_as_if_positive(TemporalRoundingMode::Trunc), -20);
        assert_eq!(rounder.round_as_if_positive(TemporalRoundingMode::Ceil), -10);
        assert_eq!(rounder.round_as_if_positive(TemporalRoundingMode::HalfExpand), -10);
        assert_eq!(rounder.round_as_if_positive(TemporalRoundingMode::HalfTrunc), -20);
        assert_eq!(rounder.round_as_if_positive(TemporalRoundingMode::HalfEven), -20);

        let rounder =
            IncrementRounder::from_signed_num(-14, NonZeroU128::new(10).unwrap()).unwrap();
        assert_eq!(rounder.round_as_if_positive(TemporalRoundingMode::HalfExpand), -10);
        let rounder = IncrementRounder::from_signed_num(-20, NonZeroU128::new(10).unwrap()).unwrap();
        assert_eq!(rounder.round_as_if_positive(TemporalRoundingMode::Ceil), -20);

        let rounder = IncrementRounder::from_signed_num(15, NonZeroU128::new(10).unwrap()).unwrap();
        assert_eq!(rounder.round_as_if_positive(TemporalRoundingMode::Floor), 10);
    }
}
