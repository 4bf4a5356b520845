//! An implementation of `TimeDuration` and its methods.

use crate::{options::TemporalUnit, Sign, TemporalError, TemporalResult};

use super::{is_valid_duration, normalized::NormalizedTimeDuration, DateDuration};

use core_maths::CoreFloat;

/// `TimeDuration` represents the [Time Duration record][spec] of the `Duration.`
///
/// These fields are laid out in the [Temporal Proposal][field spec] as 64-bit floating point numbers.
///
/// [spec]: https://tc39.es/proposal-temporal/#sec-temporal-time-duration-records
/// [field spec]: https://tc39.es/proposal-temporal/#sec-properties-of-temporal-duration-instances
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeDuration {
    /// `TimeDuration`'s internal hour value.
    pub hours: f64,
    /// `TimeDuration`'s internal minute value.
    pub minutes: f64,
    /// `TimeDuration`'s internal second value.
    pub seconds: f64,
    /// `TimeDuration`'s internal millisecond value.
    pub milliseconds: f64,
    /// `TimeDuration`'s internal microsecond value.
    pub microseconds: f64,
    /// `TimeDuration`'s internal nanosecond value.
    pub nanoseconds: f64,
}

// ==== TimeDuration Private API ====

impl TimeDuration {
    /// Creates a new `TimeDuration` without validating its fields.
    #[must_use]
    pub(crate) const fn new_unchecked(
        hours: f64,
        minutes: f64,
        seconds: f64,
        milliseconds: f64,
        microseconds: f64,
        nanoseconds: f64,
    ) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            milliseconds,
            microseconds,
            nanoseconds,
        }
    }

    /// Balances a normalized time duration up to `largest_unit`.
    ///
    /// Returns the day carry, which is only non-zero when `largest_unit` is a
    /// date unit, and the balanced `TimeDuration`.
    ///
    /// Equivalent: `BalanceTimeDuration`
    pub(crate) fn balance(
        norm: NormalizedTimeDuration,
        largest_unit: TemporalUnit,
    ) -> TemporalResult<(i128, Self)> {
        // 1. Let days, hours, minutes, seconds, milliseconds, and microseconds be 0.
        // 2. Let sign be NormalizedTimeDurationSign(norm).
        let negative = norm.sign() == Sign::Negative;
        // 3. Let nanoseconds be NormalizedTimeDurationAbs(norm).[[TotalNanoseconds]].
        let mut nanoseconds = norm.0.unsigned_abs();

        let depth = match largest_unit {
            TemporalUnit::Year | TemporalUnit::Month | TemporalUnit::Week | TemporalUnit::Day => 6,
            TemporalUnit::Hour => 5,
            TemporalUnit::Minute => 4,
            TemporalUnit::Second => 3,
            TemporalUnit::Millisecond => 2,
            TemporalUnit::Microsecond => 1,
            TemporalUnit::Nanosecond => 0,
            TemporalUnit::Auto => return Err(TemporalError::assert()),
        };

        // 4-10. Repeatedly move the quotient of the current unit into the next larger one.
        let (mut microseconds, mut milliseconds, mut seconds) = (0, 0, 0);
        let (mut minutes, mut hours, mut days) = (0, 0, 0);
        if depth >= 1 {
            microseconds = nanoseconds / 1_000;
            nanoseconds %= 1_000;
        }
        if depth >= 2 {
            milliseconds = microseconds / 1_000;
            microseconds %= 1_000;
        }
        if depth >= 3 {
            seconds = milliseconds / 1_000;
            milliseconds %= 1_000;
        }
        if depth >= 4 {
            minutes = seconds / 60;
            seconds %= 60;
        }
        if depth >= 5 {
            hours = minutes / 60;
            minutes %= 60;
        }
        if depth >= 6 {
            days = hours / 24;
            hours %= 24;
        }

        // 11. NOTE: When largestUnit is millisecond, microsecond, or nanosecond, milliseconds, microseconds, or
        // nanoseconds may be an unsafe integer. In this case, care must be taken when implementing the calculation using
        // floating point arithmetic. It can be implemented in C++ using std::fma(). String manipulation will also give an
        // exact result, since the multiplication is by a power of 10.
        // 12. Return ! CreateTimeDurationRecord(days × sign, hours × sign, minutes × sign, seconds × sign, milliseconds × sign, microseconds × sign, nanoseconds × sign).
        let apply_sign = |value: u128| -> f64 {
            if negative && value != 0 {
                -(value as f64)
            } else {
                value as f64
            }
        };
        let days = if negative {
            -(days as i128)
        } else {
            days as i128
        };
        let result = Self::new_unchecked(
            apply_sign(hours),
            apply_sign(minutes),
            apply_sign(seconds),
            apply_sign(milliseconds),
            apply_sign(microseconds),
            apply_sign(nanoseconds),
        );
        if !result.is_within_range() {
            return Err(TemporalError::range().with_message("Balanced time duration is invalid."));
        }
        Ok((days, result))
    }

    /// Returns this `TimeDuration` as a `NormalizedTimeDuration`.
    #[inline]
    pub(crate) fn to_normalized(self) -> TemporalResult<NormalizedTimeDuration> {
        NormalizedTimeDuration::from_time_duration(&self)
    }

    /// Returns the fields of the `TimeDuration` in order from hours to nanoseconds.
    #[inline]
    #[must_use]
    pub(crate) fn fields(&self) -> [f64; 6] {
        [
            self.hours,
            self.minutes,
            self.seconds,
            self.milliseconds,
            self.microseconds,
            self.nanoseconds,
        ]
    }
}

// ==== TimeDuration's public API ====

impl TimeDuration {
    /// Creates a new validated `TimeDuration`.
    pub fn new(
        hours: f64,
        minutes: f64,
        seconds: f64,
        milliseconds: f64,
        microseconds: f64,
        nanoseconds: f64,
    ) -> TemporalResult<Self> {
        let result = Self::new_unchecked(
            hours,
            minutes,
            seconds,
            milliseconds,
            microseconds,
            nanoseconds,
        );
        if !result.is_within_range() {
            return Err(
                TemporalError::range().with_message("Attempted to create an invalid TimeDuration.")
            );
        }
        Ok(result)
    }

    /// Returns a new `TimeDuration` representing the absolute value of the current.
    #[inline]
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            hours: self.hours.abs(),
            minutes: self.minutes.abs(),
            seconds: self.seconds.abs(),
            milliseconds: self.milliseconds.abs(),
            microseconds: self.microseconds.abs(),
            nanoseconds: self.nanoseconds.abs(),
        }
    }

    /// Returns a negated `TimeDuration`.
    #[inline]
    #[must_use]
    pub fn negated(&self) -> Self {
        let negate = |value: f64| if value == 0.0 { 0.0 } else { -value };
        Self {
            hours: negate(self.hours),
            minutes: negate(self.minutes),
            seconds: negate(self.seconds),
            milliseconds: negate(self.milliseconds),
            microseconds: negate(self.microseconds),
            nanoseconds: negate(self.nanoseconds),
        }
    }

    /// Returns the sign of the `TimeDuration`.
    #[inline]
    #[must_use]
    pub fn sign(&self) -> Sign {
        super::duration_sign(&self.fields())
    }

    /// Utility function for returning if values in a valid range.
    #[inline]
    #[must_use]
    pub fn is_within_range(&self) -> bool {
        is_valid_duration(&DateDuration::default(), self)
    }
}
