//! The `TimeZoneProvider` trait.

use core::str::FromStr;

use crate::utils;
use crate::{epoch_nanoseconds::EpochNanoseconds, TimeZoneProviderError};
use alloc::borrow::Cow;

pub type TimeZoneProviderResult<T> = Result<T, TimeZoneProviderError>;

/// `UtcOffsetSeconds` represents the amount of seconds we need to add to the UTC to reach the local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct UtcOffsetSeconds(pub i64);

impl UtcOffsetSeconds {
    pub fn as_nanoseconds(&self) -> i128 {
        i128::from(self.0) * 1_000_000_000
    }
}

/// A local date and time, without any offset applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsoDateTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
    pub microsecond: u16,
    pub nanosecond: u16,
}

impl IsoDateTime {
    fn to_epoch_days(self) -> i64 {
        utils::epoch_days_from_gregorian_date(self.year, self.month, self.day)
    }

    /// `IsoTimeToEpochMs`
    ///
    /// Functionally the same as Date's `MakeTime`
    fn time_to_epoch_ms(self) -> i64 {
        ((i64::from(self.hour) * utils::MS_PER_HOUR
            + i64::from(self.minute) * utils::MS_PER_MINUTE)
            + i64::from(self.second) * 1000i64)
            + i64::from(self.millisecond)
    }

    /// Convert this datetime to nanoseconds since the Unix epoch, treating
    /// the local fields as if they were UTC.
    pub fn as_nanoseconds(&self) -> EpochNanoseconds {
        let epoch_ms = self.to_epoch_days() * 86_400_000 + self.time_to_epoch_ms();
        EpochNanoseconds(
            i128::from(epoch_ms) * 1_000_000
                + i128::from(self.microsecond) * 1_000
                + i128::from(self.nanosecond),
        )
    }
}

/// `TimeZoneTransitionInfo` represents information about a timezone transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeZoneTransitionInfo {
    /// The transition time epoch at which the offset needs to be applied.
    pub transition_epoch: Option<i64>,
    /// The time zone offset in seconds.
    pub offset: UtcOffsetSeconds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    Next,
    Previous,
}

#[derive(Debug, Clone, Copy)]
pub struct ParseDirectionError;

impl core::fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("provided string was not a valid direction.")
    }
}

impl FromStr for TransitionDirection {
    type Err = ParseDirectionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next" => Ok(Self::Next),
            "previous" => Ok(Self::Previous),
            _ => Err(ParseDirectionError),
        }
    }
}

impl core::fmt::Display for TransitionDirection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Next => "next",
            Self::Previous => "previous",
        })
    }
}

/// The potential candidates for a given local datetime
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CandidateEpochNanoseconds {
    Zero,
    One(EpochNanoseconds),
    Two([EpochNanoseconds; 2]),
}

impl CandidateEpochNanoseconds {
    pub fn as_slice(&self) -> &[EpochNanoseconds] {
        match *self {
            Self::Zero => &[],
            Self::One(ref one) => core::slice::from_ref(one),
            Self::Two(ref multiple) => &multiple[..],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(*self, Self::Zero)
    }

    pub fn len(&self) -> usize {
        match *self {
            Self::Zero => 0,
            Self::One(..) => 1,
            Self::Two(..) => 2,
        }
    }

    pub fn first(&self) -> Option<EpochNanoseconds> {
        match *self {
            Self::Zero => None,
            Self::One(one) | Self::Two([one, _]) => Some(one),
        }
    }

    pub fn last(&self) -> Option<EpochNanoseconds> {
        match *self {
            Self::Zero => None,
            Self::One(last) | Self::Two([_, last]) => Some(last),
        }
    }
}

/// The `TimeZoneProvider` trait provides methods required for a provider
/// to implement in order to source time zone data from that provider.
pub trait TimeZoneProvider {
    /// Returns the case-normalized form of an available identifier.
    fn normalize_identifier(&self, ident: &'_ [u8]) -> TimeZoneProviderResult<Cow<'_, str>>;

    /// Returns every epoch nanosecond value at which the zone reads `local_datetime`.
    fn get_named_tz_epoch_nanoseconds(
        &self,
        identifier: &str,
        local_datetime: IsoDateTime,
    ) -> TimeZoneProviderResult<CandidateEpochNanoseconds>;

    /// Returns the offset in effect at `epoch_nanoseconds`.
    fn get_named_tz_offset_nanoseconds(
        &self,
        identifier: &str,
        epoch_nanoseconds: i128,
    ) -> TimeZoneProviderResult<TimeZoneTransitionInfo>;

    /// Returns the closest offset transition in `direction`, if any.
    fn get_named_tz_transition(
        &self,
        identifier: &str,
        epoch_nanoseconds: i128,
        direction: TransitionDirection,
    ) -> TimeZoneProviderResult<Option<EpochNanoseconds>>;
}

/// A provider that knows no named time zones.
///
/// Useful when only offset time zones are in play.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverProvider;

const NEVER_MSG: &str = "NeverProvider does not provide named time zones.";

impl TimeZoneProvider for NeverProvider {
    fn normalize_identifier(&self, _ident: &'_ [u8]) -> TimeZoneProviderResult<Cow<'_, str>> {
        Err(TimeZoneProviderError::Range(NEVER_MSG))
    }

    fn get_named_tz_epoch_nanoseconds(
        &self,
        _: &str,
        _: IsoDateTime,
    ) -> TimeZoneProviderResult<CandidateEpochNanoseconds> {
        Err(TimeZoneProviderError::Range(NEVER_MSG))
    }

    fn get_named_tz_offset_nanoseconds(
        &self,
        _: &str,
        _: i128,
    ) -> TimeZoneProviderResult<TimeZoneTransitionInfo> {
        Err(TimeZoneProviderError::Range(NEVER_MSG))
    }

    fn get_named_tz_transition(
        &self,
        _: &str,
        _: i128,
        _: TransitionDirection,
    ) -> TimeZoneProviderResult<Option<EpochNanoseconds>> {
        Err(TimeZoneProviderError::Range(NEVER_MSG))
    }
}
