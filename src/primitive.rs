//! Implementation of the `FiniteF64` primitive

use crate::{error::ErrorMessage, TemporalError, TemporalResult};
use core_maths::CoreFloat;
use num_traits::{AsPrimitive, Bounded, FromPrimitive};

/// A finite `f64` as handed over by a host for numeric field values.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct FiniteF64(pub(crate) f64);

impl FiniteF64 {
    #[inline]
    pub fn as_inner(&self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    #[inline]
    pub fn negate(&self) -> Self {
        if !self.is_zero() {
            Self(-self.0)
        } else {
            *self
        }
    }

    #[inline]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    #[inline]
    pub fn checked_add(&self, other: &Self) -> TemporalResult<Self> {
        let result = Self(self.0 + other.0);
        if !result.0.is_finite() {
            return Err(TemporalError::range().with_enum(ErrorMessage::NumberNotFinite));
        }
        Ok(result)
    }

    /// Returns whether the value has no fractional part.
    #[inline]
    pub fn is_integral(&self) -> bool {
        self.0.fract() == 0.0
    }

    /// `ToIntegerWithTruncation`: the value truncated toward zero.
    #[inline]
    pub fn to_integer_with_truncation(&self) -> Self {
        // Normalize -0 to +0.
        Self(self.0.trunc() + 0.0)
    }

    /// `ToPositiveIntegerWithTruncation`: a truncated value that must be
    /// greater than zero.
    pub fn to_positive_integer_with_truncation(&self) -> TemporalResult<Self> {
        let truncated = self.to_integer_with_truncation();
        if truncated.0 <= 0.0 {
            return Err(TemporalError::range().with_enum(ErrorMessage::NumberNotPositive));
        }
        Ok(truncated)
    }

    /// Returns the value as `T` when it is integral, or a `RangeError`.
    pub fn as_integer_if_integral<T: FromPrimitive>(&self) -> TemporalResult<T> {
        if !self.is_integral() {
            return Err(TemporalError::range().with_enum(ErrorMessage::NumberNotIntegral));
        }
        T::from_f64(self.0).ok_or(TemporalError::range().with_enum(ErrorMessage::NumberOutOfRange))
    }

    pub(crate) fn as_date_value(&self) -> TemporalResult<i32> {
        if !(f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&self.0) {
            return Err(TemporalError::range().with_enum(ErrorMessage::NumberOutOfRange));
        }
        Ok(self.0 as i32)
    }

    /// Truncate the current `FiniteF64` to the desired numeric type, clamping
    /// to the bounds of `T`.
    pub fn truncate<T: Bounded + AsPrimitive<f64>>(&self) -> T
    where
        f64: AsPrimitive<T>,
    {
        let clamped =
            num_traits::clamp(self.as_inner(), T::min_value().as_(), T::max_value().as_());
        clamped.as_()
    }
}

impl TryFrom<f64> for FiniteF64 {
    type Error = TemporalError;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(TemporalError::range().with_enum(ErrorMessage::NumberNotFinite));
        }
        Ok(Self(value))
    }
}

impl TryFrom<i128> for FiniteF64 {
    type Error = TemporalError;
    fn try_from(value: i128) -> Result<Self, Self::Error> {
        let result = f64::from_i128(value)
            .ok_or(TemporalError::range().with_enum(ErrorMessage::NumberOutOfRange))?;
        Self::try_from(result)
    }
}

impl From<i32> for FiniteF64 {
    fn from(value: i32) -> Self {
        Self(f64::from(value))
    }
}

impl From<u8> for FiniteF64 {
    fn from(value: u8) -> Self {
        Self(f64::from(value))
    }
}

impl From<FiniteF64> for f64 {
    fn from(value: FiniteF64) -> Self {
        value.0
    }
}

impl PartialEq<f64> for FiniteF64 {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<f64> for FiniteF64 {
    fn partial_cmp(&self, other: &f64) -> Option<core::cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}

#[cfg(test)]
mod tests {
    use super::FiniteF64;

    #[test]
    fn finitef64_truncate() {
        let finite = FiniteF64::try_from(8_640_000_000_000_000f64).unwrap();

        assert_eq!(finite.truncate::<u8>(), u8::MAX);
        assert_eq!(finite.truncate::<u16>(), u16::MAX);
        assert_eq!(finite.truncate::<i32>(), i32::MAX);
        assert_eq!(finite.truncate::<i64>(), 8_640_000_000_000_000);

        let negative = FiniteF64::try_from(-300.7).unwrap();
        assert_eq!(negative.truncate::<u8>(), 0);
        assert_eq!(negative.truncate::<i16>(), -300);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(FiniteF64::try_from(f64::NAN).is_err());
        assert!(FiniteF64::try_from(f64::INFINITY).is_err());
    }

    #[test]
    fn integer_conversions() {
        let value = FiniteF64::try_from(-2.9).unwrap();
        assert_eq!(value.to_integer_with_truncation().as_inner(), -2.0);
        assert!(value.to_positive_integer_with_truncation().is_err());
        assert!(value.as_integer_if_integral::<i64>().is_err());

        let zero = FiniteF64::try_from(-0.4).unwrap().to_integer_with_truncation();
        assert!(zero.as_inner().is_sign_positive());

        let value = FiniteF64::try_from(12.0).unwrap();
        assert_eq!(value.as_integer_if_integral::<i64>().unwrap(), 12);
        assert_eq!(value.as_date_value().unwrap(), 12);
    }
}
