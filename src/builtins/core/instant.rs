//! An implementation of the Temporal Instant.

use alloc::string::String;
use core::{num::NonZeroU128, str::FromStr};

use ixdtf::records::UtcOffsetRecordOrZ;

use crate::{
    builtins::core::{
        calendar::Calendar,
        duration::{normalized::NormalizedTimeDuration, TimeDuration},
        timezone::{TimeZone, UtcOffset},
        Duration, ZonedDateTime,
    },
    iso::IsoDateTime,
    options::{
        DifferenceOperation, DifferenceSettings, DisplayOffset, ResolvedRoundingOptions,
        RoundingOptions, TemporalUnit, ToStringRoundingOptions, UnitGroup,
    },
    parsers::{iso_date_from_record, iso_time_from_record, parse_instant, IxdtfStringBuilder},
    provider::TimeZoneProvider,
    rounding::IncrementRounder,
    time::EpochNanoseconds,
    TemporalError, TemporalResult, TemporalUnwrap,
};

use timezone_provider::epoch_nanoseconds::is_valid_epoch_nanos;

const NANOSECONDS_PER_SECOND: i128 = 1_000_000_000;
const NANOSECONDS_PER_MILLISECOND: i128 = 1_000_000;
const NANOSECONDS_PER_MICROSECOND: i128 = 1_000;

/// The native Rust implementation of `Temporal.Instant`.
///
/// An `Instant` is a single point on the UTC timeline with nanosecond
/// precision. It carries neither a calendar nor a time zone.
///
/// ```rust
/// use temporal_iso::{Duration, Instant};
/// use core::str::FromStr;
///
/// let epoch = Instant::try_new(0).unwrap();
/// let later = epoch.add(&Duration::from_str("PT1H").unwrap()).unwrap();
/// assert_eq!(later.epoch_nanoseconds().as_i128(), 3_600_000_000_000);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(EpochNanoseconds);

impl From<EpochNanoseconds> for Instant {
    fn from(value: EpochNanoseconds) -> Self {
        Self(value)
    }
}

// ==== Private API ====

impl Instant {
    /// Adds a `NormalizedTimeDuration` to the current `Instant`.
    ///
    /// Temporal-Proposal equivalent: `AddInstant`.
    pub(crate) fn add_to_instant(&self, duration: &NormalizedTimeDuration) -> TemporalResult<Self> {
        // 1. Let result be epochNanoseconds + norm.[[TotalNanoseconds]].
        let result = self.as_i128() + duration.0;
        // 2. If IsValidEpochNanoseconds(result) is false, throw a RangeError exception.
        // 3. Return result.
        Self::try_new(result)
    }

    /// `DifferenceInstant`
    ///
    /// Returns the rounded difference between `self` and `other`.
    pub(crate) fn diff_instant_internal(
        &self,
        other: &Self,
        resolved_options: ResolvedRoundingOptions,
    ) -> TemporalResult<NormalizedTimeDuration> {
        // 1. Let difference be NormalizedTimeDurationFromEpochNanosecondsDifference(ns2, ns1).
        let diff = NormalizedTimeDuration::from_nanosecond_difference(other.as_i128(), self.as_i128())?;
        // 2. Let roundRecord be ! RoundTimeDuration(difference, roundingIncrement, smallestUnit, roundingMode).
        let unit_ns = resolved_options.smallest_unit.as_nanoseconds().temporal_unwrap()?;
        let increment = NonZeroU128::new(
            u128::from(unit_ns) * u128::from(resolved_options.increment.get()),
        )
        .temporal_unwrap()?;
        diff.round(increment, resolved_options.rounding_mode)
    }

    /// Internal operation to handle `since` and `until` difference ops.
    ///
    /// Equivalent: `DifferenceTemporalInstant`
    pub(crate) fn diff_instant(
        &self,
        op: DifferenceOperation,
        other: &Self,
        options: DifferenceSettings,
    ) -> TemporalResult<Duration> {
        // 1. If operation is since, let sign be -1. Otherwise, let sign be 1.
        // 2. Set other to ? ToTemporalInstant(other).
        // 3. Let resolvedOptions be ? GetOptionsObject(options).
        // 4. Let settings be ? GetDifferenceSettings(operation, resolvedOptions, time, « », "nanosecond", "second").
        let resolved_options = ResolvedRoundingOptions::from_diff_settings(
            options,
            op,
            UnitGroup::Time,
            &[],
            TemporalUnit::Nanosecond,
            TemporalUnit::Second,
        )?;

        // 5. Let internalDuration be DifferenceInstant(instant.[[EpochNanoseconds]], other.[[EpochNanoseconds]],
        // settings.[[RoundingIncrement]], settings.[[SmallestUnit]], settings.[[RoundingMode]]).
        let norm = self.diff_instant_internal(other, resolved_options)?;

        // 6. Let result be ! BalanceTimeDuration(norm, settings.[[LargestUnit]]).
        let (_, time) = TimeDuration::balance(norm, resolved_options.largest_unit)?;
        let result = Duration::from(time);

        // 7. If operation is since, set result to CreateNegatedTemporalDuration(result).
        // 8. Return result.
        match op {
            DifferenceOperation::Until => Ok(result),
            DifferenceOperation::Since => Ok(result.negated()),
        }
    }

    /// Rounds a current `Instant` given the resolved options, returning the
    /// rounded epoch nanoseconds.
    ///
    /// Equivalent: `RoundTemporalInstant`
    pub(crate) fn round_instant(
        &self,
        resolved_options: ResolvedRoundingOptions,
    ) -> TemporalResult<i128> {
        // 1. Let unitLength be the value in the "Length in Nanoseconds" column of the row of Table 21 whose "Value" column contains unit.
        let unit_ns = resolved_options.smallest_unit.as_nanoseconds().ok_or(
            TemporalError::range().with_message("Invalid unit provided for Instant::round."),
        )?;
        // 2. Let incrementNs be increment × unitLength.
        let increment = NonZeroU128::new(
            u128::from(unit_ns) * u128::from(resolved_options.increment.get()),
        )
        .temporal_unwrap()?;
        // 3. Return ℤ(RoundNumberToIncrementAsIfPositive(ℝ(x), incrementNs, roundingMode)).
        Ok(IncrementRounder::from_signed_num(self.as_i128(), increment)?
            .round_as_if_positive(resolved_options.rounding_mode))
    }

    // Utility for converting `Instant` to `i128`.
    pub fn as_i128(&self) -> i128 {
        self.0.as_i128()
    }
}

// ==== Public API ====

impl Instant {
    /// Create a new validated `Instant`.
    #[inline]
    pub fn try_new(nanoseconds: i128) -> TemporalResult<Self> {
        if !is_valid_epoch_nanos(&nanoseconds) {
            return Err(TemporalError::range()
                .with_message("Instant nanoseconds are not within a valid epoch range."));
        }
        Ok(Self::from(EpochNanoseconds::from(nanoseconds)))
    }

    /// Creates an `Instant` from whole seconds since the epoch.
    pub fn from_epoch_seconds(epoch_seconds: i64) -> TemporalResult<Self> {
        Self::try_new(i128::from(epoch_seconds) * NANOSECONDS_PER_SECOND)
    }

    /// Creates an `Instant` from whole milliseconds since the epoch.
    pub fn from_epoch_milliseconds(epoch_milliseconds: i64) -> TemporalResult<Self> {
        Self::try_new(i128::from(epoch_milliseconds) * NANOSECONDS_PER_MILLISECOND)
    }

    /// Creates an `Instant` from whole microseconds since the epoch.
    pub fn from_epoch_microseconds(epoch_microseconds: i128) -> TemporalResult<Self> {
        let epoch_nanos = epoch_microseconds
            .checked_mul(NANOSECONDS_PER_MICROSECOND)
            .ok_or(TemporalError::range().with_message(
                "Instant nanoseconds are not within a valid epoch range.",
            ))?;
        Self::try_new(epoch_nanos)
    }

    /// Creates an `Instant` from nanoseconds since the epoch.
    #[inline]
    pub fn from_epoch_nanoseconds(epoch_nanoseconds: i128) -> TemporalResult<Self> {
        Self::try_new(epoch_nanoseconds)
    }

    /// Adds a `Duration` to the current `Instant`, returning an error if the `Duration`
    /// contains any calendar or day fields.
    #[inline]
    pub fn add(&self, duration: &Duration) -> TemporalResult<Self> {
        if !duration.is_time_duration() {
            return Err(TemporalError::range()
                .with_message("DateDuration values cannot be added to instant."));
        }
        self.add_time_duration(duration.time())
    }

    /// Adds a `TimeDuration` to `Instant`.
    #[inline]
    pub fn add_time_duration(&self, duration: &TimeDuration) -> TemporalResult<Self> {
        self.add_to_instant(&duration.to_normalized()?)
    }

    /// Subtract a `Duration` to the current `Instant`, returning an error if the `Duration`
    /// contains any calendar or day fields.
    #[inline]
    pub fn subtract(&self, duration: &Duration) -> TemporalResult<Self> {
        if !duration.is_time_duration() {
            return Err(TemporalError::range()
                .with_message("DateDuration values cannot be subtracted from instant."));
        }
        self.subtract_time_duration(duration.time())
    }

    /// Subtracts a `TimeDuration` to `Instant`.
    #[inline]
    pub fn subtract_time_duration(&self, duration: &TimeDuration) -> TemporalResult<Self> {
        self.add_to_instant(&duration.negated().to_normalized()?)
    }

    /// Returns a `Duration` representing the duration since provided `Instant`
    #[inline]
    pub fn since(&self, other: &Self, settings: DifferenceSettings) -> TemporalResult<Duration> {
        self.diff_instant(DifferenceOperation::Since, other, settings)
    }

    /// Returns a `Duration` representing the duration until provided `Instant`
    #[inline]
    pub fn until(&self, other: &Self, settings: DifferenceSettings) -> TemporalResult<Duration> {
        self.diff_instant(DifferenceOperation::Until, other, settings)
    }

    /// Returns an `Instant` by rounding the current `Instant` according to the provided settings.
    ///
    /// The rounding increment must evenly divide a solar day.
    pub fn round(&self, options: RoundingOptions) -> TemporalResult<Self> {
        let resolved_options = ResolvedRoundingOptions::from_instant_options(options)?;

        let round_result = self.round_instant(resolved_options)?;
        Self::try_new(round_result)
    }

    /// Returns the `epochSeconds` value for this `Instant`, truncated toward zero.
    #[must_use]
    pub fn epoch_seconds(&self) -> i64 {
        // |ns| ≤ 8.64e21, so the quotient fits an i64.
        (self.as_i128() / NANOSECONDS_PER_SECOND) as i64
    }

    /// Returns the `epochMilliseconds` value for this `Instant`, truncated toward zero.
    #[must_use]
    pub fn epoch_milliseconds(&self) -> i64 {
        (self.as_i128() / NANOSECONDS_PER_MILLISECOND) as i64
    }

    /// Returns the `epochMicroseconds` value for this `Instant`, truncated toward zero.
    #[must_use]
    pub fn epoch_microseconds(&self) -> i128 {
        self.as_i128() / NANOSECONDS_PER_MICROSECOND
    }

    /// Returns the `epochNanoseconds` value for this `Instant`.
    #[must_use]
    pub fn epoch_nanoseconds(&self) -> EpochNanoseconds {
        self.0
    }

    /// Creates a `ZonedDateTime` for this instant in `time_zone` and `calendar`.
    #[inline]
    pub fn to_zoned_date_time(&self, time_zone: TimeZone, calendar: Calendar) -> ZonedDateTime {
        ZonedDateTime::new_unchecked(*self, calendar, time_zone)
    }

    /// Creates an ISO `ZonedDateTime` for this instant in `time_zone`.
    #[inline]
    pub fn to_zoned_date_time_iso(&self, time_zone: TimeZone) -> ZonedDateTime {
        self.to_zoned_date_time(time_zone, Calendar::default())
    }

    /// Returns the RFC 9557 string of this `Instant`.
    ///
    /// Without a time zone, the instant is written in UTC with a `Z`
    /// designator. Otherwise the local time in `timezone` is written with its
    /// offset rounded to the minute.
    pub fn to_ixdtf_string_with_provider(
        &self,
        timezone: Option<&TimeZone>,
        options: ToStringRoundingOptions,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<String> {
        // 1. Let precision be ToSecondsStringPrecisionRecord(smallestUnit, digits).
        let resolved = options.resolve()?;
        // 2. Let roundedNs be RoundTemporalInstant(instant.[[EpochNanoseconds]], precision.[[Increment]], precision.[[Unit]], roundingMode).
        let rounded = self.round_instant(ResolvedRoundingOptions::from_to_string_options(&resolved))?;
        let rounded = Self::try_new(rounded)?;

        // TemporalInstantToString ( instant, timeZone, precision )
        // 1. Let outputTimeZone be timeZone.
        // 2. If outputTimeZone is undefined, set outputTimeZone to "UTC".
        // 3. Let epochNs be instant.[[EpochNanoseconds]].
        // 4. Let isoDateTime be GetISODateTimeFor(outputTimeZone, epochNs).
        // 5. Let dateTimeString be ISODateTimeToString(isoDateTime, "iso8601", precision, never).
        let offset = match timezone {
            Some(timezone) => Some(timezone.get_offset_nanos_for(rounded.as_i128(), provider)?),
            None => None,
        };
        let iso = IsoDateTime::from_epoch_nanos(rounded.as_i128(), offset.unwrap_or(0))?;
        let builder = IxdtfStringBuilder::default()
            .with_date(iso.date)
            .with_time(iso.time, resolved.precision);

        // 6. If timeZone is undefined, then
        //     a. Let timeZoneString be "Z".
        // 7. Else,
        //     a. Let offsetNanoseconds be GetOffsetNanosecondsFor(outputTimeZone, epochNs).
        //     b. Let timeZoneString be FormatDateTimeUTCOffsetRounded(offsetNanoseconds).
        let builder = match offset {
            None => builder.with_z(DisplayOffset::Auto),
            Some(offset) => {
                let (sign, hour, minute) =
                    UtcOffset::from_nanoseconds(offset as i64)?.to_minute_parts();
                builder.with_minute_offset(sign, hour, minute, DisplayOffset::Auto)
            }
        };
        // 8. Return the string-concatenation of dateTimeString and timeZoneString.
        Ok(builder.build())
    }
}

// ==== Utility Functions ====

impl FromStr for Instant {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ixdtf_record = parse_instant(s.as_bytes())?;

        // Find the IsoDate and IsoTime
        let iso_date = iso_date_from_record(ixdtf_record.date)?;
        let iso_time = iso_time_from_record(ixdtf_record.time)?;

        // Find the offset
        let offset = match ixdtf_record.offset {
            UtcOffsetRecordOrZ::Z => 0,
            UtcOffsetRecordOrZ::Offset(offset) => UtcOffset::from_ixdtf_record(offset)?.nanoseconds(),
        };

        // GetUTCEpochNanoseconds of the local time, less the offset.
        let nanoseconds = IsoDateTime::new_unchecked(iso_date, iso_time)
            .as_nanoseconds()
            .as_i128()
            - i128::from(offset);

        Self::try_new(nanoseconds)
    }
}

impl core::fmt::Display for Instant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let string = self
            .to_ixdtf_string_with_provider(
                None,
                ToStringRoundingOptions::default(),
                &crate::provider::NeverProvider,
            )
            .map_err(|_| core::fmt::Error)?;
        f.write_str(&string)
    }
}

// ==== Instant Tests ====

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use alloc::string::ToString;

    use crate::{
        builtins::core::{
            timezone::{TimeZone, UtcOffset},
            Duration, Instant,
        },
        options::{
            DifferenceSettings, RoundingIncrement, RoundingOptions, TemporalRoundingMode,
            TemporalUnit, ToStringRoundingOptions,
        },
        parsers::Precision,
        provider::NeverProvider,
        NS_MAX_INSTANT, NS_MIN_INSTANT,
    };

    fn time_fields(duration: &Duration) -> (f64, f64, f64, f64, f64, f64) {
        (
            duration.hours(),
            duration.minutes(),
            duration.seconds(),
            duration.milliseconds(),
            duration.microseconds(),
            duration.nanoseconds(),
        )
    }

    #[test]
    fn max_and_minimum_instant_bounds() {
        let max_instant = Instant::try_new(NS_MAX_INSTANT).unwrap();
        let min_instant = Instant::try_new(NS_MIN_INSTANT).unwrap();

        assert_eq!(max_instant.epoch_nanoseconds().as_i128(), NS_MAX_INSTANT);
        assert_eq!(min_instant.epoch_nanoseconds().as_i128(), NS_MIN_INSTANT);

        assert!(Instant::try_new(NS_MAX_INSTANT + 1).is_err());
        assert!(Instant::try_new(NS_MIN_INSTANT - 1).is_err());
        assert!(Instant::from_epoch_microseconds(i128::MAX).is_err());
    }

    #[test]
    fn epoch_getters_truncate() {
        let instant = Instant::try_new(-1_500_000_001).unwrap();
        assert_eq!(instant.epoch_seconds(), -1);
        assert_eq!(instant.epoch_milliseconds(), -1_500);
        assert_eq!(instant.epoch_microseconds(), -1_500_000);

        let instant = Instant::from_epoch_milliseconds(1_000).unwrap();
        assert_eq!(instant.epoch_nanoseconds().as_i128(), 1_000_000_000);
        assert_eq!(
            Instant::from_epoch_seconds(1).unwrap(),
            Instant::from_epoch_microseconds(1_000_000).unwrap()
        );
    }

    #[test]
    fn basic_instant_until() {
        let init_diff_setting = |unit: TemporalUnit| -> DifferenceSettings {
            DifferenceSettings {
                largest_unit: Some(TemporalUnit::Hour),
                rounding_mode: Some(TemporalRoundingMode::Ceil),
                increment: None,
                smallest_unit: Some(unit),
            }
        };

        let earlier = Instant::try_new(
            217_178_610_123_456_789, /* 1976-11-18T15:23:30.123456789Z */
        )
        .unwrap();
        let later = Instant::try_new(
            1_572_345_998_271_986_289, /* 2019-10-29T10:46:38.271986289Z */
        )
        .unwrap();

        let positive_result = earlier
            .until(&later, init_diff_setting(TemporalUnit::Hour))
            .unwrap();
        assert_eq!(
            time_fields(&positive_result),
            (376436.0, 0.0, 0.0, 0.0, 0.0, 0.0)
        );
        let negative_result = later
            .until(&earlier, init_diff_setting(TemporalUnit::Hour))
            .unwrap();
        assert_eq!(
            time_fields(&negative_result),
            (-376435.0, 0.0, 0.0, 0.0, 0.0, 0.0)
        );

        let positive_result = earlier
            .until(&later, init_diff_setting(TemporalUnit::Minute))
            .unwrap();
        assert_eq!(
            time_fields(&positive_result),
            (376435.0, 24.0, 0.0, 0.0, 0.0, 0.0)
        );
        let negative_result = later
            .until(&earlier, init_diff_setting(TemporalUnit::Minute))
            .unwrap();
        assert_eq!(
            time_fields(&negative_result),
            (-376435.0, -23.0, 0.0, 0.0, 0.0, 0.0)
        );

        let positive_result = earlier
            .until(&later, init_diff_setting(TemporalUnit::Microsecond))
            .unwrap();
        assert_eq!(
            time_fields(&positive_result),
            (376435.0, 23.0, 8.0, 148.0, 530.0, 0.0)
        );
        let negative_result = later
            .until(&earlier, init_diff_setting(TemporalUnit::Microsecond))
            .unwrap();
        assert_eq!(
            time_fields(&negative_result),
            (-376435.0, -23.0, -8.0, -148.0, -529.0, 0.0)
        );

        let positive_result = earlier
            .until(&later, init_diff_setting(TemporalUnit::Nanosecond))
            .unwrap();
        assert_eq!(
            time_fields(&positive_result),
            (376435.0, 23.0, 8.0, 148.0, 529.0, 500.0)
        );
    }

    #[test]
    fn basic_instant_since() {
        let init_diff_setting = |unit: TemporalUnit| -> DifferenceSettings {
            DifferenceSettings {
                largest_unit: Some(TemporalUnit::Hour),
                rounding_mode: Some(TemporalRoundingMode::Ceil),
                increment: None,
                smallest_unit: Some(unit),
            }
        };

        let earlier = Instant::try_new(217_178_610_123_456_789).unwrap();
        let later = Instant::try_new(1_572_345_998_271_986_289).unwrap();

        let positive_result = later
            .since(&earlier, init_diff_setting(TemporalUnit::Hour))
            .unwrap();
        assert_eq!(
            time_fields(&positive_result),
            (376436.0, 0.0, 0.0, 0.0, 0.0, 0.0)
        );
        let negative_result = earlier
            .since(&later, init_diff_setting(TemporalUnit::Hour))
            .unwrap();
        assert_eq!(
            time_fields(&negative_result),
            (-376435.0, 0.0, 0.0, 0.0, 0.0, 0.0)
        );

        let negative_result = earlier
            .since(&later, init_diff_setting(TemporalUnit::Nanosecond))
            .unwrap();
        assert_eq!(
            time_fields(&negative_result),
            (-376435.0, -23.0, -8.0, -148.0, -529.0, -500.0)
        );

        // Calendar units are not allowed.
        let settings = DifferenceSettings {
            largest_unit: Some(TemporalUnit::Day),
            ..Default::default()
        };
        assert!(later.since(&earlier, settings).is_err());
    }

    #[test]
    fn instant_add_and_subtract() {
        let epoch = Instant::try_new(0).unwrap();
        let one_hour = Duration::from_str("PT1H").unwrap();
        let result = epoch.add(&one_hour).unwrap();
        assert_eq!(result.epoch_nanoseconds().as_i128(), 3_600_000_000_000);
        assert_eq!(result.subtract(&one_hour).unwrap(), epoch);

        // Days are not a fixed length, so they are rejected.
        assert!(epoch.add(&Duration::from_str("P1D").unwrap()).is_err());
        assert!(epoch.subtract(&Duration::from_str("P1Y").unwrap()).is_err());

        let max = Instant::try_new(NS_MAX_INSTANT).unwrap();
        assert!(max
            .add(&Duration::from_str("PT0.000000001S").unwrap())
            .is_err());
    }

    #[test]
    fn instant_round() {
        let instant = Instant::try_new(217_178_610_123_456_789).unwrap();

        let options = RoundingOptions {
            smallest_unit: Some(TemporalUnit::Hour),
            rounding_mode: Some(TemporalRoundingMode::HalfExpand),
            ..Default::default()
        };
        let rounded = instant.round(options).unwrap();
        assert_eq!(rounded.to_string(), "1976-11-18T15:00:00Z");

        let options = RoundingOptions {
            smallest_unit: Some(TemporalUnit::Minute),
            increment: Some(RoundingIncrement::try_new(15).unwrap()),
            rounding_mode: Some(TemporalRoundingMode::Ceil),
            ..Default::default()
        };
        let rounded = instant.round(options).unwrap();
        assert_eq!(rounded.to_string(), "1976-11-18T15:30:00Z");

        // Negative instants round as if positive.
        let before_epoch = Instant::try_new(-1_500_000_000).unwrap();
        let options = RoundingOptions {
            smallest_unit: Some(TemporalUnit::Second),
            rounding_mode: Some(TemporalRoundingMode::Floor),
            ..Default::default()
        };
        assert_eq!(
            before_epoch.round(options).unwrap().epoch_seconds(),
            -2
        );

        // The increment must divide a day.
        let options = RoundingOptions {
            smallest_unit: Some(TemporalUnit::Hour),
            increment: Some(RoundingIncrement::try_new(7).unwrap()),
            ..Default::default()
        };
        assert!(instant.round(options).is_err());
        assert!(instant.round(RoundingOptions::default()).is_err());
    }

    #[test]
    fn instant_strings() {
        let instant = Instant::from_str("1970-01-01T00:00Z").unwrap();
        assert_eq!(instant.as_i128(), 0);
        assert_eq!(instant.to_string(), "1970-01-01T00:00:00Z");

        let instant = Instant::from_str("1970-01-01T01:00+01:00").unwrap();
        assert_eq!(instant.as_i128(), 0);

        let instant = Instant::from_str("2019-10-29T10:46:38.271986289Z").unwrap();
        assert_eq!(instant.as_i128(), 1_572_345_998_271_986_289);

        // An offset is required.
        assert!(Instant::from_str("2019-10-29T10:46:38").is_err());

        let options = ToStringRoundingOptions {
            precision: Precision::Digit(3),
            ..Default::default()
        };
        let string = instant
            .to_ixdtf_string_with_provider(None, options, &NeverProvider)
            .unwrap();
        assert_eq!(string, "2019-10-29T10:46:38.271Z");

        let tz = TimeZone::from(UtcOffset::from_minutes(-330).unwrap());
        let string = instant
            .to_ixdtf_string_with_provider(Some(&tz), options, &NeverProvider)
            .unwrap();
        assert_eq!(string, "2019-10-29T05:16:38.271-05:30");
    }
}
