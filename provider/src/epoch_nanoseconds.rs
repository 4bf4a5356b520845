//! Nanoseconds since the Unix epoch.

use crate::TimeZoneProviderError;

/// Number of nanoseconds in a day
#[doc(hidden)]
pub const NS_PER_DAY: u64 = MS_PER_DAY as u64 * 1_000_000;

/// Number of nanoseconds in a second
pub const NS_PER_SECOND: i128 = 1_000_000_000;

/// Milliseconds per day constant: 8.64e+7
const MS_PER_DAY: u32 = 24 * 60 * 60 * 1000;
/// Max Instant nanosecond constant
#[doc(hidden)]
pub const NS_MAX_INSTANT: i128 = NS_PER_DAY as i128 * 100_000_000i128;
/// Min Instant nanosecond constant
#[doc(hidden)]
pub const NS_MIN_INSTANT: i128 = -NS_MAX_INSTANT;

/// A signed count of nanoseconds since 1970-01-01T00:00Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct EpochNanoseconds(pub(crate) i128);

impl From<i128> for EpochNanoseconds {
    fn from(value: i128) -> Self {
        Self(value)
    }
}

impl EpochNanoseconds {
    pub fn as_i128(&self) -> i128 {
        self.0
    }

    /// Creates an `EpochNanoseconds` from whole epoch seconds.
    pub fn from_seconds(seconds: i64) -> Self {
        Self(i128::from(seconds) * NS_PER_SECOND)
    }

    /// Returns the epoch seconds, rounded toward negative infinity.
    pub fn floor_seconds(&self) -> i64 {
        self.0.div_euclid(NS_PER_SECOND) as i64
    }

    pub fn check_validity(&self) -> Result<(), TimeZoneProviderError> {
        if !is_valid_epoch_nanos(&self.0) {
            return Err(TimeZoneProviderError::InstantOutOfRange);
        }
        Ok(())
    }
}

/// Utility for determining if the nanos are within a valid range.
#[inline]
#[must_use]
pub fn is_valid_epoch_nanos(nanos: &i128) -> bool {
    (NS_MIN_INSTANT..=NS_MAX_INSTANT).contains(nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_nanosecond_limits() {
        assert!(EpochNanoseconds(NS_MAX_INSTANT).check_validity().is_ok());
        assert!(EpochNanoseconds(NS_MIN_INSTANT).check_validity().is_ok());
        assert_eq!(
            EpochNanoseconds(NS_MAX_INSTANT + 1).check_validity(),
            Err(TimeZoneProviderError::InstantOutOfRange)
        );
    }

    #[test]
    fn floor_seconds_rounds_down() {
        assert_eq!(EpochNanoseconds(-1).floor_seconds(), -1);
        assert_eq!(EpochNanoseconds(1_999_999_999).floor_seconds(), 1);
        assert_eq!(EpochNanoseconds::from_seconds(-5).as_i128(), -5_000_000_000);
    }
}
