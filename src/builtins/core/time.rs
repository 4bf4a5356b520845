//! This module implements `PlainTime` and any directly related algorithms.

use alloc::string::String;
use core::{num::NonZeroU128, str::FromStr};

use crate::{
    builtins::core::{
        duration::{normalized::NormalizedTimeDuration, TimeDuration},
        timezone::TimeZone,
        Duration, PlainDate, PlainDateTime, ZonedDateTime,
    },
    error::ErrorMessage,
    iso::IsoTime,
    options::{
        ArithmeticOverflow, DifferenceOperation, DifferenceSettings, ResolvedRoundingOptions,
        RoundingOptions, TemporalUnit, ToStringRoundingOptions, UnitGroup,
    },
    parsers::{iso_time_from_record, parse_time, IxdtfStringBuilder},
    provider::TimeZoneProvider,
    TemporalError, TemporalResult, TemporalUnwrap,
};

/// A `PartialTime` represents partially filled `PlainTime` fields.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PartialTime {
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
    pub millisecond: Option<u16>,
    pub microsecond: Option<u16>,
    pub nanosecond: Option<u16>,
}

impl PartialTime {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Convenience methods for building a `PartialTime`
impl PartialTime {
    pub const fn new() -> Self {
        Self {
            hour: None,
            minute: None,
            second: None,
            millisecond: None,
            microsecond: None,
            nanosecond: None,
        }
    }

    pub const fn with_hour(mut self, hour: Option<u8>) -> Self {
        self.hour = hour;
        self
    }

    pub const fn with_minute(mut self, minute: Option<u8>) -> Self {
        self.minute = minute;
        self
    }

    pub const fn with_second(mut self, second: Option<u8>) -> Self {
        self.second = second;
        self
    }

    pub const fn with_millisecond(mut self, millisecond: Option<u16>) -> Self {
        self.millisecond = millisecond;
        self
    }

    pub const fn with_microsecond(mut self, microsecond: Option<u16>) -> Self {
        self.microsecond = microsecond;
        self
    }

    pub const fn with_nanosecond(mut self, nanosecond: Option<u16>) -> Self {
        self.nanosecond = nanosecond;
        self
    }
}

/// The native Rust implementation of `Temporal.PlainTime`.
///
/// A wall-clock time with no date, calendar or time zone. Arithmetic wraps
/// around midnight.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainTime {
    pub(crate) iso: IsoTime,
}

impl core::fmt::Display for PlainTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let string = self
            .to_ixdtf_string(ToStringRoundingOptions::default())
            .map_err(|_| core::fmt::Error)?;
        f.write_str(&string)
    }
}

// ==== Private API ====

impl PlainTime {
    /// Creates a new unvalidated `PlainTime`.
    #[inline]
    #[must_use]
    pub(crate) fn new_unchecked(iso: IsoTime) -> Self {
        Self { iso }
    }

    /// Adds a normalized time duration, dropping any day carry.
    ///
    /// Spec Equivalent: `AddDurationToOrSubtractDurationFromPlainTime`.
    fn add_normalized(&self, norm: NormalizedTimeDuration) -> Self {
        // 4. Let result be AddTime(temporalTime.[[ISOHour]], ..., norm).
        // 5. Assert: IsValidTime(...) is true.
        let (_, iso) = self.iso.add(norm);
        // 6. Return ! CreateTemporalTime(result.[[Hour]], ..., result.[[Nanosecond]]).
        Self::new_unchecked(iso)
    }

    /// Performs a desired difference op between two `PlainTime`'s, returning the resulting `Duration`.
    pub(crate) fn diff_time(
        &self,
        op: DifferenceOperation,
        other: &PlainTime,
        settings: DifferenceSettings,
    ) -> TemporalResult<Duration> {
        // 1. If operation is SINCE, let sign be -1. Otherwise, let sign be 1.
        // 2. Set other to ? ToTemporalTime(other).
        // 3. Let resolvedOptions be ? SnapshotOwnProperties(? GetOptionsObject(options), null).
        // 4. Let settings be ? GetDifferenceSettings(operation, resolvedOptions, TIME, « », "nanosecond", "hour").
        let resolved = ResolvedRoundingOptions::from_diff_settings(
            settings,
            op,
            UnitGroup::Time,
            &[],
            TemporalUnit::Nanosecond,
            TemporalUnit::Hour,
        )?;

        // 5. Let norm be ! DifferenceTime(temporalTime.[[ISOHour]], ..., other.[[ISONanosecond]]).
        let mut norm = self.iso.diff(&other.iso);

        // 6. If settings.[[SmallestUnit]] is not "nanosecond" or settings.[[RoundingIncrement]] ≠ 1, then
        if !resolved.is_noop() {
            // a. Let roundRecord be ! RoundDuration(0, 0, 0, 0, norm, settings.[[RoundingIncrement]],
            // settings.[[SmallestUnit]], settings.[[RoundingMode]]).
            let unit_length = resolved.smallest_unit.as_nanoseconds().temporal_unwrap()?;
            let increment = NonZeroU128::new(u128::from(unit_length))
                .temporal_unwrap()?
                .checked_mul(resolved.increment.as_extended_increment())
                .ok_or(TemporalError::range().with_enum(ErrorMessage::RoundingIncrementInvalid))?;
            // b. Set norm to roundRecord.[[NormalizedDuration]].[[NormalizedTime]].
            norm = norm.round(increment, resolved.rounding_mode)?;
        }

        // 7. Let result be BalanceTimeDuration(norm, settings.[[LargestUnit]]).
        let (_, result) = TimeDuration::balance(norm, resolved.largest_unit)?;

        // 8. Return ! CreateTemporalDuration(0, 0, 0, 0, sign × result.[[Hours]], ..., sign × result.[[Nanoseconds]]).
        match op {
            DifferenceOperation::Until => Ok(Duration::from(result)),
            DifferenceOperation::Since => Ok(Duration::from(result.negated())),
        }
    }
}

// ==== Public API ====

impl PlainTime {
    /// Creates a new `PlainTime`, constraining any field into a valid range.
    ///
    /// ```rust
    /// use temporal_iso::PlainTime;
    ///
    /// let time = PlainTime::new(23, 59, 59, 999, 999, 999).unwrap();
    ///
    /// let constrained_time = PlainTime::new(24, 59, 59, 999, 999, 999).unwrap();
    /// assert_eq!(time, constrained_time);
    /// ```
    pub fn new(
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
        microsecond: u16,
        nanosecond: u16,
    ) -> TemporalResult<Self> {
        Self::new_with_overflow(
            hour,
            minute,
            second,
            millisecond,
            microsecond,
            nanosecond,
            ArithmeticOverflow::Constrain,
        )
    }

    /// Creates a new `PlainTime`, rejecting any field that is not in a valid range.
    ///
    /// ```rust
    /// use temporal_iso::PlainTime;
    ///
    /// assert!(PlainTime::try_new(23, 59, 59, 999, 999, 999).is_ok());
    /// assert!(PlainTime::try_new(24, 0, 0, 0, 0, 0).is_err());
    /// ```
    pub fn try_new(
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
        microsecond: u16,
        nanosecond: u16,
    ) -> TemporalResult<Self> {
        Self::new_with_overflow(
            hour,
            minute,
            second,
            millisecond,
            microsecond,
            nanosecond,
            ArithmeticOverflow::Reject,
        )
    }

    /// Creates a new `PlainTime` with the provided [`ArithmeticOverflow`] option.
    #[inline]
    pub fn new_with_overflow(
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
        microsecond: u16,
        nanosecond: u16,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<Self> {
        let time = IsoTime::new(
            hour.into(),
            minute.into(),
            second.into(),
            millisecond.into(),
            microsecond.into(),
            nanosecond.into(),
            overflow,
        )?;
        Ok(Self::new_unchecked(time))
    }

    /// Creates a new `PlainTime` from a `PartialTime`. Missing fields are zero.
    ///
    /// ```rust
    /// use temporal_iso::{partial::PartialTime, PlainTime};
    ///
    /// let partial_time = PartialTime::new().with_hour(Some(22));
    /// let time = PlainTime::from_partial(partial_time, None).unwrap();
    ///
    /// assert_eq!(time.hour(), 22);
    /// assert_eq!(time.minute(), 0);
    /// ```
    pub fn from_partial(
        partial: PartialTime,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        // NOTE: ToTemporalTimeRecord requires one field to be set.
        if partial.is_empty() {
            return Err(TemporalError::r#type().with_enum(ErrorMessage::FieldsEmpty));
        }

        let iso = IsoTime::default().with(partial, overflow.unwrap_or_default())?;
        Ok(Self::new_unchecked(iso))
    }

    /// Creates a new `PlainTime` using the current `PlainTime` fields as a fallback.
    ///
    /// ```rust
    /// use temporal_iso::{partial::PartialTime, PlainTime};
    ///
    /// let initial = PlainTime::try_new(15, 30, 12, 123, 456, 789).unwrap();
    /// let time = initial.with(PartialTime::new().with_hour(Some(22)), None).unwrap();
    ///
    /// assert_eq!(time.hour(), 22);
    /// assert_eq!(time.minute(), 30);
    /// assert_eq!(time.nanosecond(), 789);
    /// ```
    pub fn with(
        &self,
        partial: PartialTime,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        if partial.is_empty() {
            return Err(TemporalError::r#type().with_enum(ErrorMessage::FieldsEmpty));
        }

        let iso = self.iso.with(partial, overflow.unwrap_or_default())?;
        Ok(Self::new_unchecked(iso))
    }

    /// Returns the internal `hour` field.
    #[inline]
    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.iso.hour
    }

    /// Returns the internal `minute` field.
    #[inline]
    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.iso.minute
    }

    /// Returns the internal `second` field.
    #[inline]
    #[must_use]
    pub const fn second(&self) -> u8 {
        self.iso.second
    }

    /// Returns the internal `millisecond` field.
    #[inline]
    #[must_use]
    pub const fn millisecond(&self) -> u16 {
        self.iso.millisecond
    }

    /// Returns the internal `microsecond` field.
    #[inline]
    #[must_use]
    pub const fn microsecond(&self) -> u16 {
        self.iso.microsecond
    }

    /// Returns the internal `nanosecond` field.
    #[inline]
    #[must_use]
    pub const fn nanosecond(&self) -> u16 {
        self.iso.nanosecond
    }

    /// Returns the ISO time record of this `PlainTime`.
    #[inline]
    #[must_use]
    pub const fn iso_fields(&self) -> IsoTime {
        self.iso
    }

    /// Adds the time portion of a `Duration` to this `PlainTime`. The date
    /// fields of the duration are ignored and the result wraps around midnight.
    pub fn add(&self, duration: &Duration) -> TemporalResult<Self> {
        self.add_time_duration(duration.time())
    }

    /// Adds a `TimeDuration` to the current `PlainTime`.
    #[inline]
    pub fn add_time_duration(&self, duration: &TimeDuration) -> TemporalResult<Self> {
        Ok(self.add_normalized(duration.to_normalized()?))
    }

    /// Subtracts the time portion of a `Duration` from this `PlainTime`.
    pub fn subtract(&self, duration: &Duration) -> TemporalResult<Self> {
        self.subtract_time_duration(duration.time())
    }

    /// Subtracts a `TimeDuration` from the current `PlainTime`.
    #[inline]
    pub fn subtract_time_duration(&self, duration: &TimeDuration) -> TemporalResult<Self> {
        self.add_time_duration(&duration.negated())
    }

    #[inline]
    /// Returns the `Duration` until the provided `PlainTime` from the current `PlainTime`.
    pub fn until(&self, other: &Self, settings: DifferenceSettings) -> TemporalResult<Duration> {
        self.diff_time(DifferenceOperation::Until, other, settings)
    }

    #[inline]
    /// Returns the `Duration` since the provided `PlainTime` from the current `PlainTime`.
    pub fn since(&self, other: &Self, settings: DifferenceSettings) -> TemporalResult<Duration> {
        self.diff_time(DifferenceOperation::Since, other, settings)
    }

    /// Rounds the current `PlainTime` according to the provided options.
    ///
    /// ```rust
    /// use temporal_iso::{options::{RoundingOptions, TemporalUnit}, PlainTime};
    ///
    /// let time = PlainTime::try_new(23, 59, 59, 999, 999, 999).unwrap();
    /// let rounded = time
    ///     .round(RoundingOptions::with_smallest_unit(TemporalUnit::Minute))
    ///     .unwrap();
    /// assert_eq!(rounded, PlainTime::default());
    /// ```
    pub fn round(&self, options: RoundingOptions) -> TemporalResult<Self> {
        let resolved = ResolvedRoundingOptions::from_time_options(options)?;
        let (_, result) = self.iso.round(resolved)?;
        Ok(Self::new_unchecked(result))
    }

    /// Combines this time with `date` into a `PlainDateTime`.
    pub fn to_plain_date_time(&self, date: &PlainDate) -> TemporalResult<PlainDateTime> {
        date.to_plain_date_time(Some(*self))
    }

    /// Resolves this time on `date` in `time_zone` into a `ZonedDateTime`.
    pub fn to_zoned_date_time_with_provider(
        &self,
        date: &PlainDate,
        time_zone: TimeZone,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<ZonedDateTime> {
        date.to_zoned_date_time_with_provider(time_zone, Some(*self), provider)
    }

    /// Returns the RFC 9557 string of this time, rounded as `options` require.
    pub fn to_ixdtf_string(&self, options: ToStringRoundingOptions) -> TemporalResult<String> {
        let resolved = options.resolve()?;
        let (_, result) = self
            .iso
            .round(ResolvedRoundingOptions::from_to_string_options(&resolved))?;
        Ok(IxdtfStringBuilder::default()
            .with_time(result, resolved.precision)
            .build())
    }
}

impl From<PlainDateTime> for PlainTime {
    fn from(value: PlainDateTime) -> Self {
        PlainTime::new_unchecked(value.iso.time)
    }
}

impl FromStr for PlainTime {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let record = parse_time(s.as_bytes())?;
        Ok(Self::new_unchecked(iso_time_from_record(record)?))
    }
}

// ==== Test land ====

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use core::str::FromStr;

    use crate::{
        builtins::core::Duration,
        iso::IsoTime,
        options::{
            DifferenceSettings, RoundingIncrement, RoundingOptions, TemporalRoundingMode,
            TemporalUnit, ToStringRoundingOptions,
        },
        parsers::Precision,
    };

    use super::PlainTime;

    fn assert_time(result: PlainTime, values: (u8, u8, u8, u16, u16, u16)) {
        assert_eq!(
            result.iso,
            IsoTime::new_unchecked(values.0, values.1, values.2, values.3, values.4, values.5)
        );
    }

    fn round_to(
        time: &PlainTime,
        unit: TemporalUnit,
        increment: u32,
        mode: Option<TemporalRoundingMode>,
    ) -> PlainTime {
        let options = RoundingOptions {
            smallest_unit: Some(unit),
            increment: Some(RoundingIncrement::try_new(increment).unwrap()),
            rounding_mode: mode,
            ..Default::default()
        };
        time.round(options).unwrap()
    }

    #[test]
    fn basic_parse_time() {
        let result = "T12:05:24-05:00[u-ca=iso8601]".parse::<PlainTime>();
        assert_time(result.unwrap(), (12, 5, 24, 0, 0, 0));

        let result = "T12:05:24.123456789-05:00[u-ca=iso8601]".parse::<PlainTime>();
        assert_time(result.unwrap(), (12, 5, 24, 123, 456, 789));

        let result = "2024-05-04 12:05:24.123456789-05:00[u-ca=iso8601]".parse::<PlainTime>();
        assert_time(result.unwrap(), (12, 5, 24, 123, 456, 789));

        let result = "23:59:60".parse::<PlainTime>();
        assert_time(result.unwrap(), (23, 59, 59, 0, 0, 0));
    }

    #[test]
    fn invalid_time_from_strs() {
        // UTC designator case
        let invalid_cases = [
            "2019-10-01T09:00:00Z",
            "2019-10-01T09:00:00Z[UTC]",
            "09:00:00Z[UTC]",
            "09:00:00Z",
            "2019-10-01",
        ];
        for invalid_str in invalid_cases {
            let err = PlainTime::from_str(invalid_str);
            assert!(err.is_err(), "{invalid_str} should not parse");
        }
    }

    #[test]
    fn time_round_millisecond() {
        let base = PlainTime::new_unchecked(IsoTime::new_unchecked(3, 34, 56, 987, 654, 321));

        assert_time(
            round_to(&base, TemporalUnit::Millisecond, 1, None),
            (3, 34, 56, 988, 0, 0),
        );
        assert_time(
            round_to(&base, TemporalUnit::Millisecond, 2, None),
            (3, 34, 56, 988, 0, 0),
        );
        assert_time(
            round_to(&base, TemporalUnit::Millisecond, 4, None),
            (3, 34, 56, 988, 0, 0),
        );
        assert_time(
            round_to(&base, TemporalUnit::Millisecond, 5, None),
            (3, 34, 56, 990, 0, 0),
        );
    }

    #[test]
    fn time_round_nanoseconds() {
        let base = PlainTime::new_unchecked(IsoTime::new_unchecked(3, 34, 56, 987, 654, 321));

        let cases = [
            (1, 321),
            (2, 322),
            (4, 320),
            (5, 320),
            (25, 325),
            (50, 300),
            (125, 375),
            (200, 400),
            (250, 250),
            (500, 500),
        ];
        for (increment, nanosecond) in cases {
            assert_time(
                round_to(&base, TemporalUnit::Nanosecond, increment, None),
                (3, 34, 56, 987, 654, nanosecond),
            );
        }
    }

    #[test]
    fn round_wraps_to_midnight() {
        let time = PlainTime::try_new(23, 59, 59, 999, 999, 999).unwrap();
        let result = round_to(
            &time,
            TemporalUnit::Minute,
            1,
            Some(TemporalRoundingMode::HalfExpand),
        );
        assert_time(result, (0, 0, 0, 0, 0, 0));

        let result = round_to(&time, TemporalUnit::Hour, 1, Some(TemporalRoundingMode::Floor));
        assert_time(result, (23, 0, 0, 0, 0, 0));
    }

    #[test]
    fn invalid_rounding_options() {
        let time = PlainTime::try_new(12, 0, 0, 0, 0, 0).unwrap();
        // An increment must evenly divide the next larger unit.
        let options = RoundingOptions {
            smallest_unit: Some(TemporalUnit::Minute),
            increment: Some(RoundingIncrement::try_new(7).unwrap()),
            ..Default::default()
        };
        assert!(time.round(options).is_err());
        assert!(time
            .round(RoundingOptions::with_smallest_unit(TemporalUnit::Day))
            .is_err());
        assert!(time.round(RoundingOptions::default()).is_err());
    }

    #[test]
    fn add_duration_basic() {
        let base = PlainTime::new_unchecked(IsoTime::new_unchecked(15, 23, 30, 123, 456, 789));
        let result = base.add(&"PT16H".parse::<Duration>().unwrap()).unwrap();
        assert_time(result, (7, 23, 30, 123, 456, 789));

        // Days do not affect a wall-clock time.
        let result = base.add(&"P1DT1M".parse::<Duration>().unwrap()).unwrap();
        assert_time(result, (15, 24, 30, 123, 456, 789));

        let result = base
            .subtract(&"PT15H24M".parse::<Duration>().unwrap())
            .unwrap();
        assert_time(result, (23, 59, 30, 123, 456, 789));
    }

    #[test]
    fn since_basic() {
        let one = PlainTime::new(15, 23, 30, 123, 456, 789).unwrap();
        let two = PlainTime::new(14, 23, 30, 123, 456, 789).unwrap();
        let three = PlainTime::new(13, 30, 30, 123, 456, 789).unwrap();

        let result = one.since(&two, DifferenceSettings::default()).unwrap();
        assert_eq!(result.hours(), 1.0);

        let result = two.since(&one, DifferenceSettings::default()).unwrap();
        assert_eq!(result.hours(), -1.0);

        let result = one.since(&three, DifferenceSettings::default()).unwrap();
        assert_eq!(result.hours(), 1.0);
        assert_eq!(result.minutes(), 53.0);

        let result = three.since(&one, DifferenceSettings::default()).unwrap();
        assert_eq!(result.hours(), -1.0);
        assert_eq!(result.minutes(), -53.0);
    }

    #[test]
    fn until_basic() {
        let one = PlainTime::new(15, 23, 30, 123, 456, 789).unwrap();
        let two = PlainTime::new(16, 23, 30, 123, 456, 789).unwrap();
        let three = PlainTime::new(17, 0, 30, 123, 456, 789).unwrap();

        let result = one.until(&two, DifferenceSettings::default()).unwrap();
        assert_eq!(result.hours(), 1.0);

        let result = one.until(&three, DifferenceSettings::default()).unwrap();
        assert_eq!(result.hours(), 1.0);
        assert_eq!(result.minutes(), 37.0);

        let result = three.until(&one, DifferenceSettings::default()).unwrap();
        assert_eq!(result.hours(), -1.0);
        assert_eq!(result.minutes(), -37.0);

        let settings = DifferenceSettings {
            largest_unit: Some(TemporalUnit::Minute),
            ..Default::default()
        };
        let result = one.until(&three, settings).unwrap();
        assert_eq!((result.hours(), result.minutes()), (0.0, 97.0));

        let settings = DifferenceSettings {
            largest_unit: Some(TemporalUnit::Day),
            ..Default::default()
        };
        assert!(one.until(&three, settings).is_err());
    }

    #[test]
    fn since_rounding() {
        let earlier = PlainTime::new(3, 12, 34, 123, 456, 789).unwrap();
        let later = PlainTime::new(13, 47, 57, 988, 655, 322).unwrap();

        let settings = DifferenceSettings {
            smallest_unit: Some(TemporalUnit::Second),
            ..Default::default()
        };
        let result = later.since(&earlier, settings).unwrap();
        assert_eq!(
            (result.hours(), result.minutes(), result.seconds(), result.milliseconds()),
            (10.0, 35.0, 23.0, 0.0)
        );

        let settings = DifferenceSettings {
            smallest_unit: Some(TemporalUnit::Second),
            increment: Some(RoundingIncrement::try_new(4).unwrap()),
            ..Default::default()
        };
        let result = later.since(&earlier, settings).unwrap();
        assert_eq!(
            (result.hours(), result.minutes(), result.seconds()),
            (10.0, 35.0, 20.0)
        );
    }

    #[test]
    fn time_to_string() {
        let time = PlainTime::try_new(9, 5, 7, 120, 0, 0).unwrap();
        assert_eq!(time.to_string(), "09:05:07.12");

        let options = ToStringRoundingOptions {
            smallest_unit: Some(TemporalUnit::Minute),
            ..Default::default()
        };
        assert_eq!(time.to_ixdtf_string(options).unwrap(), "09:05");

        let options = ToStringRoundingOptions {
            precision: Precision::Digit(1),
            rounding_mode: Some(TemporalRoundingMode::Ceil),
            ..Default::default()
        };
        assert_eq!(time.to_ixdtf_string(options).unwrap(), "09:05:07.2");

        let midnight = PlainTime::default();
        assert_eq!(midnight.to_string(), "00:00:00");
    }
}
