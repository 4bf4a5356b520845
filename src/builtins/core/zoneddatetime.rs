//! This module contains the core implementation of the `ZonedDateTime`
//! builtin type.

use alloc::string::{String, ToString};
use core::{cmp::Ordering, num::NonZeroU128};

use ixdtf::records::UtcOffsetRecordOrZ;

use crate::{
    builtins::core::{
        calendar::{Calendar, MonthCode},
        duration::{
            normalized::{NormalizedDurationRecord, NormalizedTimeDuration},
            DateDuration, IterationGuard, TimeDuration,
        },
        timezone::{TimeZone, UtcOffset},
        Duration, Instant, PartialDate, PartialTime, PlainDate, PlainDateTime, PlainMonthDay,
        PlainTime, PlainYearMonth,
    },
    error::ErrorMessage,
    iso::{IsoDate, IsoDateTime, IsoTime},
    options::{
        ArithmeticOverflow, DifferenceOperation, DifferenceSettings, Disambiguation,
        DisplayCalendar, DisplayOffset, DisplayTimeZone, OffsetDisambiguation,
        ResolvedRoundingOptions, RoundingOptions, TemporalRoundingMode, TemporalUnit,
        ToStringRoundingOptions, UnitGroup,
    },
    parsers::{
        calendar_from_record, iso_date_from_record, iso_time_from_record, parse_zoned_date_time,
        timezone_from_record, IxdtfStringBuilder,
    },
    provider::{TimeZoneProvider, TransitionDirection},
    rounding::IncrementRounder,
    temporal_assert,
    time::EpochNanoseconds,
    Sign, TemporalError, TemporalResult, TemporalUnwrap,
};

use timezone_provider::epoch_nanoseconds::is_valid_epoch_nanos;


const NS_PER_HOUR: f64 = 3_600_000_000_000.0;
const NS_PER_MINUTE: u128 = 60_000_000_000;

/// A partial ZonedDateTime record
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PartialZonedDateTime {
    /// The `PartialDate` portion of a `PartialZonedDateTime`
    pub date: PartialDate,
    /// The `PartialTime` portion of a `PartialZonedDateTime`
    pub time: PartialTime,
    /// An optional offset string
    pub offset: Option<UtcOffset>,
    /// The time zone value of a partial time zone.
    pub timezone: Option<TimeZone>,
}

impl PartialZonedDateTime {
    pub fn is_empty(&self) -> bool {
        self.date.is_empty()
            && self.time.is_empty()
            && self.offset.is_none()
            && self.timezone.is_none()
    }

    pub const fn new() -> Self {
        Self {
            date: PartialDate::new(),
            time: PartialTime::new(),
            offset: None,
            timezone: None,
        }
    }

    pub const fn with_date(mut self, partial_date: PartialDate) -> Self {
        self.date = partial_date;
        self
    }

    pub const fn with_time(mut self, partial_time: PartialTime) -> Self {
        self.time = partial_time;
        self
    }

    pub const fn with_offset(mut self, offset: Option<UtcOffset>) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_timezone(mut self, timezone: Option<TimeZone>) -> Self {
        self.timezone = timezone;
        self
    }
}

/// The native Rust implementation of `Temporal.ZonedDateTime`.
///
/// A `ZonedDateTime` is an exact instant paired with the time zone and
/// calendar used to read it. Every calendar or wall-clock field is derived
/// from the instant on request, which is why the field getters take a
/// `TimeZoneProvider`.
///
/// ```rust
/// use temporal_iso::{provider::BUILTIN_PROVIDER, Calendar, TimeZone, ZonedDateTime};
///
/// let time_zone =
///     TimeZone::try_from_identifier_str_with_provider("America/New_York", &BUILTIN_PROVIDER)
///         .unwrap();
/// let zdt = ZonedDateTime::try_new(0, Calendar::default(), time_zone).unwrap();
/// assert_eq!(zdt.year_with_provider(&BUILTIN_PROVIDER).unwrap(), 1969);
/// assert_eq!(zdt.hour_with_provider(&BUILTIN_PROVIDER).unwrap(), 19);
/// assert_eq!(zdt.offset_with_provider(&BUILTIN_PROVIDER).unwrap(), "-05:00");
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZonedDateTime {
    instant: Instant,
    calendar: Calendar,
    tz: TimeZone,
}

// ==== Private API ====

impl ZonedDateTime {
    /// Creates a `ZonedDateTime` without validating the input.
    #[inline]
    #[must_use]
    pub(crate) fn new_unchecked(instant: Instant, calendar: Calendar, tz: TimeZone) -> Self {
        Self {
            instant,
            calendar,
            tz,
        }
    }

    /// Returns the local `IsoDateTime` of this `ZonedDateTime`.
    fn local_iso(&self, provider: &impl TimeZoneProvider) -> TemporalResult<IsoDateTime> {
        self.tz.get_iso_datetime_for(self.instant.as_i128(), provider)
    }

    /// Adds a `Duration` to this `ZonedDateTime`, returning the resulting
    /// epoch nanoseconds.
    pub(crate) fn add_as_epoch_nanoseconds(
        &self,
        duration: &Duration,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<i128> {
        add_zoned_date_time(
            self.instant.as_i128(),
            &self.tz,
            self.calendar,
            duration.date(),
            duration.normalized_time()?,
            ArithmeticOverflow::Constrain,
            provider,
        )
    }

    /// Equivalent: `AddDurationToOrSubtractDurationFromZonedDateTime`
    fn add_internal(
        &self,
        duration: &Duration,
        overflow: ArithmeticOverflow,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        // 5. Let epochNanoseconds be ? AddZonedDateTime(zonedDateTime.[[EpochNanoseconds]], timeZone, calendar, internalDuration, overflow).
        let epoch_ns = add_zoned_date_time(
            self.instant.as_i128(),
            &self.tz,
            self.calendar,
            duration.date(),
            duration.normalized_time()?,
            overflow,
            provider,
        )?;
        // 6. Return ! CreateTemporalZonedDateTime(epochNanoseconds, timeZone, calendar).
        Self::try_new(epoch_ns, self.calendar, self.tz.clone())
    }

    /// Equivalent: `MoveRelativeZonedDateTime`
    pub(crate) fn move_relative(
        &self,
        duration: &DateDuration,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        // 1. Let intermediateNs be ? AddZonedDateTime(zonedDateTime.[[Nanoseconds]], zonedDateTime.[[TimeZone]], zonedDateTime.[[Calendar]], years, months, weeks, days, 0, 0, 0, 0, 0, 0).
        let epoch_ns = add_zoned_date_time(
            self.instant.as_i128(),
            &self.tz,
            self.calendar,
            duration,
            NormalizedTimeDuration::default(),
            ArithmeticOverflow::Constrain,
            provider,
        )?;
        // 2. Return ! CreateTemporalZonedDateTime(intermediateNs, zonedDateTime.[[TimeZone]], zonedDateTime.[[Calendar]]).
        Self::try_new(epoch_ns, self.calendar, self.tz.clone())
    }

    /// Equivalent: `NanosecondsToDays`
    ///
    /// Splits `nanoseconds`, measured from this `ZonedDateTime`, into whole
    /// days of this time zone. Returns the days, the nanosecond remainder and
    /// the length of the day following the last whole day.
    pub(crate) fn nanoseconds_to_days(
        &self,
        nanoseconds: i128,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<(i128, i128, i128)> {
        let ns_per_day = i128::from(crate::NS_PER_DAY);
        // 1. If nanoseconds = 0, then
        if nanoseconds == 0 {
            // a. Return the Record { [[Days]]: 0, [[Nanoseconds]]: 0, [[DayLength]]: nsPerDay }.
            return Ok((0, 0, ns_per_day));
        }
        // 2. If nanoseconds < 0, let sign be -1; else, let sign be 1.
        let sign: i128 = if nanoseconds < 0 { -1 } else { 1 };

        // 5. Let startNs be ℝ(relativeTo.[[Nanoseconds]]).
        let start_ns = self.instant.as_i128();
        // 8. Let endNs be startNs + nanoseconds.
        let end_ns = start_ns + nanoseconds;
        // 9. If ! IsValidEpochNanoseconds(ℤ(endNs)) is false, throw a RangeError exception.
        if !is_valid_epoch_nanos(&end_ns) {
            return Err(TemporalError::range().with_enum(ErrorMessage::InstantOutOfRange));
        }

        // 6. Let startDateTime be ? GetPlainDateTimeFor(relativeTo.[[TimeZone]], startInstant, relativeTo.[[Calendar]]).
        let start = self.tz.get_iso_datetime_for(start_ns, provider)?;
        // 10. Let endDateTime be ? GetPlainDateTimeFor(relativeTo.[[TimeZone]], endInstant, relativeTo.[[Calendar]]).
        let end = self.tz.get_iso_datetime_for(end_ns, provider)?;

        // 11. Let date difference be ? DifferenceISODateTime(startDateTime, endDateTime, "day").
        // 12. Let days be dateDifference.[[Days]].
        let mut days = i128::from(end.date.to_epoch_days() - start.date.to_epoch_days());
        if sign == 1 && days > 0 && end.time < start.time {
            days -= 1;
        } else if sign == -1 && days < 0 && end.time > start.time {
            days += 1;
        }

        let add_days = |days: i128| -> TemporalResult<i128> {
            add_zoned_date_time(
                start_ns,
                &self.tz,
                self.calendar,
                &DateDuration::new_unchecked(0.0, 0.0, 0.0, days as f64),
                NormalizedTimeDuration::default(),
                ArithmeticOverflow::Constrain,
                provider,
            )
        };

        // 13. Let intermediateNs be ℝ(? AddDaysToZonedDateTime(startInstant, startDateTime, timeZoneRec, calendar, days).[[EpochNanoseconds]]).
        let mut intermediate_ns = add_days(days)?;

        let mut guard = IterationGuard::default();
        // 14. If sign is 1, then
        if sign == 1 {
            // a. Repeat, while days > 0 and intermediateNs > endNs,
            while days > 0 && intermediate_ns > end_ns {
                guard.tick()?;
                // i. Set days to days - 1.
                days -= 1;
                // ii. Set intermediateNs to ℝ(? AddDaysToZonedDateTime(...)).
                intermediate_ns = add_days(days)?;
            }
        }

        // 15. Set nanoseconds to endNs - intermediateNs.
        let mut remainder = end_ns - intermediate_ns;

        // 16. Let done be false.
        // 17. Repeat, while done is false,
        let day_length = loop {
            guard.tick()?;
            // a. Let oneDayFarther be ? AddDaysToZonedDateTime(..., intermediateDateTime, timeZoneRec, calendar, sign).
            let one_day_farther = add_days(days + sign)?;
            // b. Set dayLengthNs to ℝ(oneDayFarther.[[EpochNanoseconds]]) - intermediateNs.
            let day_length = one_day_farther - intermediate_ns;
            // c. If (nanoseconds - dayLengthNs) × sign ≥ 0, then
            if (remainder - day_length) * sign >= 0 {
                // i. Set nanoseconds to nanoseconds - dayLengthNs.
                remainder -= day_length;
                // ii. Set intermediateInstant to oneDayFarther.[[Instant]].
                intermediate_ns = one_day_farther;
                // iv. Set days to days + sign.
                days += sign;
            } else {
                // d. Else,
                // i. Set done to true.
                break day_length;
            }
        };

        #[cfg(feature = "log")]
        log::trace!(
            "split {nanoseconds}ns into {days} days in {} iterations",
            guard.count()
        );

        // 18. If days < 0 and sign = 1, throw a RangeError exception.
        // 19. If days > 0 and sign = -1, throw a RangeError exception.
        // 20. If nanoseconds < 0, then
        //     a. If sign = 1, throw a RangeError exception.
        // 21. If nanoseconds > 0 and sign = -1, throw a RangeError exception.
        if days * sign < 0 || remainder * sign < 0 {
            return Err(TemporalError::range()
                .with_message("time zone offsets changed the sign of the day count."));
        }
        if day_length == 0 {
            return Err(TemporalError::range().with_enum(ErrorMessage::DayLengthZero));
        }
        // 22. If abs(nanoseconds) ≥ abs(dayLengthNs), throw a RangeError exception.
        if remainder.abs() >= day_length.abs() {
            return Err(TemporalError::range().with_enum(ErrorMessage::ZDTOutOfDayBounds));
        }
        // 23. Return the Record { [[Days]]: days, [[Nanoseconds]]: nanoseconds, [[DayLength]]: abs(dayLengthNs) }.
        Ok((days, remainder, day_length.abs()))
    }

    /// Equivalent: `DifferenceZonedDateTime`
    ///
    /// Returns the unrounded difference between this `ZonedDateTime` and
    /// `end`. Both are read in this time zone.
    pub(crate) fn diff_zoned_datetime_nanos(
        &self,
        end: i128,
        largest_unit: TemporalUnit,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<NormalizedDurationRecord> {
        let start_ns = self.instant.as_i128();
        // 1. If ns1 = ns2, return CombineDateAndTimeDuration(ZeroDateDuration(), 0).
        if start_ns == end {
            return Ok(NormalizedDurationRecord::default());
        }
        // 2. Let startDateTime be GetISODateTimeFor(timeZone, ns1).
        let start = self.tz.get_iso_datetime_for(start_ns, provider)?;
        // 3. Let endDateTime be GetISODateTimeFor(timeZone, ns2).
        let end_dt = self.tz.get_iso_datetime_for(end, provider)?;
        // 4. If ns2 - ns1 < 0, let sign be -1; else let sign be 1.
        let sign = if end < start_ns {
            Sign::Negative
        } else {
            Sign::Positive
        };
        let sign_multiplier = sign as i8;
        // 5. If sign = 1, let maxDayCorrection be 2; else let maxDayCorrection be 1.
        let max_correction: i8 = if sign == Sign::Positive { 2 } else { 1 };
        // 6. Let dayCorrection be 0.
        // 7. Let timeDuration be DifferenceTime(startDateTime.[[Time]], endDateTime.[[Time]]).
        let time = start.time.diff(&end_dt.time);
        // 8. If TimeDurationSign(timeDuration) = -sign, set dayCorrection to dayCorrection + 1.
        let mut day_correction: i8 = if time.sign() as i8 == -sign_multiplier {
            1
        } else {
            0
        };

        // 9. Let success be false.
        let mut intermediate = None;
        // 10. Repeat, while dayCorrection ≤ maxDayCorrection and success is false,
        while day_correction <= max_correction {
            // a. Let intermediateDate be BalanceISODate(endDateTime.[[ISODate]].[[Year]], endDateTime.[[ISODate]].[[Month]], endDateTime.[[ISODate]].[[Day]] - dayCorrection × sign).
            let intermediate_date = IsoDate::balance(
                end_dt.date.year,
                i32::from(end_dt.date.month),
                i64::from(end_dt.date.day) - i64::from(day_correction * sign_multiplier),
            )?;
            // b. Let intermediateDateTime be CombineISODateAndTimeRecord(intermediateDate, startDateTime.[[Time]]).
            let intermediate_dt = IsoDateTime::new_unchecked(intermediate_date, start.time);
            // c. Let intermediateNs be ? GetEpochNanosecondsFor(timeZone, intermediateDateTime, compatible).
            let intermediate_ns = self.tz.get_epoch_nanoseconds_for(
                intermediate_dt,
                Disambiguation::Compatible,
                provider,
            )?;
            // d. Set timeDuration to TimeDurationFromEpochNanosecondsDifference(ns2, intermediateNs).
            let time_duration =
                NormalizedTimeDuration::from_nanosecond_difference(end, intermediate_ns.as_i128())?;
            // e. Let timeSign be TimeDurationSign(timeDuration).
            // f. If sign ≠ -timeSign, then
            if sign_multiplier != -(time_duration.sign() as i8) {
                // i. Set success to true.
                intermediate = Some((intermediate_dt, time_duration));
                break;
            }
            // g. Set dayCorrection to dayCorrection + 1.
            day_correction += 1;
        }
        // 11. Assert: success is true.
        let (intermediate_dt, time_duration) = intermediate.ok_or(
            TemporalError::assert().with_message("could not find an intermediate date-time."),
        )?;

        // 12. Let dateLargestUnit be LargerOfTwoUnits(largestUnit, day).
        let date_largest = largest_unit.max(TemporalUnit::Day);
        // 13. Let dateDifference be CalendarDateUntil(calendar, startDateTime.[[ISODate]], intermediateDateTime.[[ISODate]], dateLargestUnit).
        let date_diff = self
            .calendar
            .date_until(&start.date, &intermediate_dt.date, date_largest)?;
        // 14. Return CombineDateAndTimeDuration(dateDifference, timeDuration).
        NormalizedDurationRecord::new(*date_diff.date(), time_duration)
    }

    /// Equivalent: `DifferenceTemporalZonedDateTime`
    fn diff_internal(
        &self,
        op: DifferenceOperation,
        other: &Self,
        settings: DifferenceSettings,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Duration> {
        // 3. If ? CalendarEquals(zonedDateTime.[[Calendar]], other.[[Calendar]]) is false, then
        if self.calendar != other.calendar {
            // a. Throw a RangeError exception.
            return Err(TemporalError::range().with_enum(ErrorMessage::CalendarMismatch));
        }

        // 4. Let settings be ? GetDifferenceSettings(operation, resolvedOptions, datetime, « », nanosecond, hour).
        let resolved = ResolvedRoundingOptions::from_diff_settings(
            settings,
            op,
            UnitGroup::DateTime,
            &[],
            TemporalUnit::Nanosecond,
            TemporalUnit::Hour,
        )?;

        // 5. If settings.[[LargestUnit]] is not one of "year", "month", "week", or "day", then
        if !resolved.largest_unit.is_date_unit() {
            // a. Let norm be DifferenceInstant(zonedDateTime.[[Nanoseconds]], other.[[Nanoseconds]], settings.[[RoundingIncrement]], settings.[[SmallestUnit]], settings.[[RoundingMode]]).
            let norm = self.instant.diff_instant_internal(&other.instant, resolved)?;
            // b. Let result be ! BalanceTimeDuration(norm, settings.[[LargestUnit]]).
            let (_, time) = TimeDuration::balance(norm, resolved.largest_unit)?;
            let result = Duration::from(time);
            // c. Return ! CreateTemporalDuration(sign × result...).
            return Ok(match op {
                DifferenceOperation::Until => result,
                DifferenceOperation::Since => result.negated(),
            });
        }

        // 6. If ? TimeZoneEquals(zonedDateTime.[[TimeZone]], other.[[TimeZone]]) is false, then
        if !self.tz.time_zone_equals(&other.tz) {
            // a. Throw a RangeError exception.
            return Err(TemporalError::range().with_enum(ErrorMessage::TzMismatch));
        }

        // 7. If zonedDateTime.[[Nanoseconds]] = other.[[Nanoseconds]], then
        if self.instant == other.instant {
            // a. Return ! CreateTemporalDuration(0, 0, 0, 0, 0, 0, 0, 0, 0, 0).
            return Ok(Duration::default());
        }

        // 8. Let difference be ? DifferenceZonedDateTime(zonedDateTime.[[Nanoseconds]], other.[[Nanoseconds]], timeZone, calendar, settings.[[LargestUnit]]).
        let difference =
            self.diff_zoned_datetime_nanos(other.instant.as_i128(), resolved.largest_unit, provider)?;

        // 9. If settings.[[SmallestUnit]] is "nanosecond" and settings.[[RoundingIncrement]] = 1, let roundingGranularityIsNoop be true; else false.
        let record = if resolved.is_noop() {
            difference
        } else {
            // 10. If roundingGranularityIsNoop is false, then
            // a. Let plainRelativeTo be ! CreateTemporalDate(dateTimeStart.[[ISOYear]], ...).
            let plain_relative_to = self.to_plain_date_with_provider(provider)?;
            // b. Let roundRecord be ? RoundDuration(difference..., plainRelativeTo, zonedDateTime).
            let (rounded, _) = difference.round_relative(
                resolved,
                Some(&plain_relative_to),
                Some(self),
                provider,
            )?;
            // c. Let roundResult be roundRecord.[[DurationRecord]].
            // d. Let adjustResult be ? AdjustRoundedDurationDays(roundResult..., zonedDateTime).
            rounded.adjust_rounded_days(resolved, self, provider)?
        };

        // 11. Return ! CreateTemporalDuration(sign × years, ..., sign × nanoseconds).
        let (_, time) = TimeDuration::balance(record.norm, TemporalUnit::Hour)?;
        let result = Duration::try_from_parts(record.date, time)?;
        Ok(match op {
            DifferenceOperation::Until => result,
            DifferenceOperation::Since => result.negated(),
        })
    }
}

// ==== Public API ====

impl ZonedDateTime {
    /// Creates a new valid `ZonedDateTime`.
    #[inline]
    pub fn try_new(nanos: i128, calendar: Calendar, time_zone: TimeZone) -> TemporalResult<Self> {
        let instant = Instant::try_new(nanos)?;
        Ok(Self::new_unchecked(instant, calendar, time_zone))
    }

    /// Creates a new valid `ZonedDateTime` with an ISO 8601 calendar.
    #[inline]
    pub fn try_new_iso(nanos: i128, time_zone: TimeZone) -> TemporalResult<Self> {
        Self::try_new(nanos, Calendar::default(), time_zone)
    }

    /// Returns `ZonedDateTime`'s Calendar.
    #[inline]
    #[must_use]
    pub const fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Returns `ZonedDateTime`'s `TimeZone` slot.
    #[inline]
    #[must_use]
    pub fn timezone(&self) -> &TimeZone {
        &self.tz
    }

    /// Creates a `ZonedDateTime` from a `PartialZonedDateTime`.
    ///
    /// The partial must carry a time zone. An offset in the partial is
    /// weighed against the time zone according to `offset_option`, which
    /// defaults to `reject`.
    pub fn from_partial_with_provider(
        partial: PartialZonedDateTime,
        overflow: Option<ArithmeticOverflow>,
        disambiguation: Option<Disambiguation>,
        offset_option: Option<OffsetDisambiguation>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        let overflow = overflow.unwrap_or_default();
        let timezone = partial
            .timezone
            .ok_or(TemporalError::r#type().with_enum(ErrorMessage::RequiredFieldMissing))?
            .normalize(provider)?;

        let date = Calendar::default().date_from_partial(&partial.date, overflow)?;
        let time = IsoTime::default().with(partial.time, overflow)?;

        let epoch_ns = interpret_isodatetime_offset(
            date.iso,
            Some(time),
            false,
            partial.offset.map(|offset| offset.nanoseconds()),
            &timezone,
            disambiguation.unwrap_or_default(),
            offset_option.unwrap_or(OffsetDisambiguation::Reject),
            false,
            provider,
        )?;

        Self::try_new(epoch_ns.as_i128(), date.calendar(), timezone)
    }

    /// Parses a `ZonedDateTime` from an RFC 9557 string, such as
    /// `2024-03-10T03:30:00-04:00[America/New_York]`.
    ///
    /// An offset in the string is weighed against the time zone annotation
    /// according to `offset_option`.
    pub fn from_str_with_provider(
        source: &str,
        disambiguation: Disambiguation,
        offset_option: OffsetDisambiguation,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        Self::from_utf8_with_provider(source.as_bytes(), disambiguation, offset_option, provider)
    }

    /// Parses a UTF-8 encoded `ZonedDateTime` string.
    pub fn from_utf8_with_provider(
        source: &[u8],
        disambiguation: Disambiguation,
        offset_option: OffsetDisambiguation,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        let record = parse_zoned_date_time(source)?;

        let annotation = record.tz.temporal_unwrap()?;
        let timezone = timezone_from_record(annotation.tz)?.normalize(provider)?;
        let calendar = calendar_from_record(record.calendar)?;

        // Offset behaviour: exact for a `Z` designator, option for a
        // numeric offset, wall otherwise.
        let (offset_nanos, is_exact, match_minutes) = match record.offset {
            None => (None, false, true),
            Some(UtcOffsetRecordOrZ::Z) => (None, true, true),
            Some(UtcOffsetRecordOrZ::Offset(offset)) => {
                let match_minutes = offset.second().is_none();
                let nanoseconds = UtcOffset::from_ixdtf_record(offset)?.nanoseconds();
                (Some(nanoseconds), false, match_minutes)
            }
        };

        let date = iso_date_from_record(record.date.temporal_unwrap()?)?;
        let time = record.time.map(iso_time_from_record).transpose()?;

        let epoch_ns = interpret_isodatetime_offset(
            date,
            time,
            is_exact,
            offset_nanos,
            &timezone,
            disambiguation,
            offset_option,
            match_minutes,
            provider,
        )?;

        Self::try_new(epoch_ns.as_i128(), calendar, timezone)
    }

    /// Returns the `epochSeconds` value of this `ZonedDateTime`.
    #[must_use]
    pub fn epoch_seconds(&self) -> i64 {
        self.instant.epoch_seconds()
    }

    /// Returns the `epochMilliseconds` value of this `ZonedDateTime`.
    #[must_use]
    pub fn epoch_milliseconds(&self) -> i64 {
        self.instant.epoch_milliseconds()
    }

    /// Returns the `epochMicroseconds` value of this `ZonedDateTime`.
    #[must_use]
    pub fn epoch_microseconds(&self) -> i128 {
        self.instant.epoch_microseconds()
    }

    /// Returns the `epochNanoseconds` value of this `ZonedDateTime`.
    #[must_use]
    pub fn epoch_nanoseconds(&self) -> EpochNanoseconds {
        self.instant.epoch_nanoseconds()
    }

    /// Returns the current `ZonedDateTime` as an [`Instant`].
    #[must_use]
    pub fn to_instant(&self) -> Instant {
        self.instant
    }

    /// Creates a new `ZonedDateTime` with the fields of `partial`, using the
    /// local fields and the offset of this `ZonedDateTime` for anything left
    /// unset.
    ///
    /// `disambiguation` defaults to `compatible`, `offset_option` to `prefer`.
    pub fn with_with_provider(
        &self,
        partial: PartialZonedDateTime,
        disambiguation: Option<Disambiguation>,
        offset_option: Option<OffsetDisambiguation>,
        overflow: Option<ArithmeticOverflow>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        if partial.is_empty() {
            return Err(TemporalError::r#type().with_enum(ErrorMessage::FieldsEmpty));
        }
        if partial.timezone.is_some() {
            return Err(TemporalError::r#type().with_enum(ErrorMessage::ForbiddenField));
        }
        let overflow = overflow.unwrap_or_default();

        // 8. Let isoDateTime be GetISODateTimeFor(timeZone, epochNs).
        let iso = self.local_iso(provider)?;
        // 9. Let offsetNanoseconds be GetOffsetNanosecondsFor(timeZone, epochNs).
        let offset = partial.offset.map_or(
            self.tz.get_offset_nanos_for(self.instant.as_i128(), provider)?,
            |offset| i128::from(offset.nanoseconds()),
        );

        // 10-17. Merge the fields and interpret them with the calendar.
        let plain_date = PlainDate::new_unchecked(iso.date, self.calendar);
        let date = if partial.date.is_empty() {
            plain_date
        } else {
            plain_date.with(partial.date, Some(overflow))?
        };
        let time = iso.time.with(partial.time, overflow)?;

        // 24. Let epochNanoseconds be ? InterpretISODateTimeOffset(dateTimeResult.[[ISODate]], dateTimeResult.[[Time]], option, newOffsetNanoseconds, timeZone, disambiguation, offset, match-exactly).
        let epoch_ns = interpret_isodatetime_offset(
            date.iso,
            Some(time),
            false,
            Some(offset as i64),
            &self.tz,
            disambiguation.unwrap_or_default(),
            offset_option.unwrap_or(OffsetDisambiguation::Prefer),
            false,
            provider,
        )?;

        // 25. Return ! CreateTemporalZonedDateTime(epochNanoseconds, timeZone, calendar).
        Self::try_new(epoch_ns.as_i128(), self.calendar, self.tz.clone())
    }

    /// Creates a new `ZonedDateTime` from the current `ZonedDateTime`
    /// combined with the provided `TimeZone`.
    pub fn with_timezone(&self, timezone: TimeZone) -> TemporalResult<Self> {
        Self::try_new(self.instant.as_i128(), self.calendar, timezone)
    }

    /// Creates a new `ZonedDateTime` from the current `ZonedDateTime`
    /// combined with the provided `Calendar`.
    #[must_use]
    pub fn with_calendar(&self, calendar: Calendar) -> Self {
        Self::new_unchecked(self.instant, calendar, self.tz.clone())
    }

    /// Compares the instants of two `ZonedDateTime`s, ignoring the time zone
    /// and calendar.
    #[inline]
    #[must_use]
    pub fn compare_instant(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant)
    }

    /// Returns whether two `ZonedDateTime`s share the instant, time zone and
    /// calendar.
    ///
    /// Time zones are compared after resolving links, so `Etc/UTC` equals
    /// `UTC`.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        self.instant == other.instant
            && self.calendar == other.calendar
            && self.tz.time_zone_equals(&other.tz)
    }

    /// Returns the next (or previous) instant at which the offset of this
    /// time zone changes, or `None` when there is none.
    pub fn get_time_zone_transition_with_provider(
        &self,
        direction: TransitionDirection,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Option<Self>> {
        let Some(transition) =
            self.tz
                .get_time_zone_transition(self.instant.as_i128(), direction, provider)?
        else {
            return Ok(None);
        };
        Self::try_new(transition.as_i128(), self.calendar, self.tz.clone()).map(Some)
    }

    /// Returns the length in hours of the local day of this `ZonedDateTime`.
    pub fn hours_in_day_with_provider(&self, provider: &impl TimeZoneProvider) -> TemporalResult<f64> {
        // 3. Let isoDateTime be GetISODateTimeFor(timeZone, zonedDateTime.[[EpochNanoseconds]]).
        let iso = self.local_iso(provider)?;
        // 4. Let today be isoDateTime.[[ISODate]].
        // 5. Let tomorrow be BalanceISODate(today.[[Year]], today.[[Month]], today.[[Day]] + 1).
        let tomorrow = IsoDate::balance(
            iso.date.year,
            i32::from(iso.date.month),
            i64::from(iso.date.day) + 1,
        )?;
        // 6. Let todayNs be ? GetStartOfDay(timeZone, today).
        let today_ns = self.tz.get_start_of_day(&iso.date, provider)?;
        // 7. Let tomorrowNs be ? GetStartOfDay(timeZone, tomorrow).
        let tomorrow_ns = self.tz.get_start_of_day(&tomorrow, provider)?;
        // 8. Let diff be TimeDurationFromEpochNanosecondsDifference(tomorrowNs, todayNs).
        let diff = tomorrow_ns.as_i128() - today_ns.as_i128();
        // 9. Return 𝔽(TotalTimeDuration(diff, hour)).
        Ok(diff as f64 / NS_PER_HOUR)
    }
}

// ==== HoursInDay accessor method implementation ====

impl ZonedDateTime {
    /// Returns the `year` value for this `ZonedDateTime`.
    #[inline]
    pub fn year_with_provider(&self, provider: &impl TimeZoneProvider) -> TemporalResult<i32> {
        let iso = self.local_iso(provider)?;
        Ok(self.calendar.year(&iso.date))
    }

    /// Returns the `month` value for this `ZonedDateTime`.
    pub fn month_with_provider(&self, provider: &impl TimeZoneProvider) -> TemporalResult<u8> {
        let iso = self.local_iso(provider)?;
        Ok(self.calendar.month(&iso.date))
    }

    /// Returns the `monthCode` value for this `ZonedDateTime`.
    pub fn month_code_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<MonthCode> {
        let iso = self.local_iso(provider)?;
        self.calendar.month_code(&iso.date)
    }

    /// Returns the `day` value for this `ZonedDateTime`.
    pub fn day_with_provider(&self, provider: &impl TimeZoneProvider) -> TemporalResult<u8> {
        let iso = self.local_iso(provider)?;
        Ok(self.calendar.day(&iso.date))
    }

    /// Returns the `hour` value for this `ZonedDateTime`.
    pub fn hour_with_provider(&self, provider: &impl TimeZoneProvider) -> TemporalResult<u8> {
        Ok(self.local_iso(provider)?.time.hour)
    }

    /// Returns the `minute` value for this `ZonedDateTime`.
    pub fn minute_with_provider(&self, provider: &impl TimeZoneProvider) -> TemporalResult<u8> {
        Ok(self.local_iso(provider)?.time.minute)
    }

    /// Returns the `second` value for this `ZonedDateTime`.
    pub fn second_with_provider(&self, provider: &impl TimeZoneProvider) -> TemporalResult<u8> {
        Ok(self.local_iso(provider)?.time.second)
    }

    /// Returns the `millisecond` value for this `ZonedDateTime`.
    pub fn millisecond_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<u16> {
        Ok(self.local_iso(provider)?.time.millisecond)
    }

    /// Returns the `microsecond` value for this `ZonedDateTime`.
    pub fn microsecond_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<u16> {
        Ok(self.local_iso(provider)?.time.microsecond)
    }

    /// Returns the `nanosecond` value for this `ZonedDateTime`.
    pub fn nanosecond_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<u16> {
        Ok(self.local_iso(provider)?.time.nanosecond)
    }

    /// Returns the current offset as a formatted offset string.
    pub fn offset_with_provider(&self, provider: &impl TimeZoneProvider) -> TemporalResult<String> {
        let offset = self.offset_nanoseconds_with_provider(provider)?;
        Ok(UtcOffset::from_nanoseconds(offset)?.to_string())
    }

    /// Returns the current offset in nanoseconds.
    pub fn offset_nanoseconds_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<i64> {
        let offset = self.tz.get_offset_nanos_for(self.instant.as_i128(), provider)?;
        // Offsets are shorter than a day.
        Ok(offset as i64)
    }

    /// Returns the local date and time of this `ZonedDateTime`.
    pub fn iso_fields_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<IsoDateTime> {
        self.local_iso(provider)
    }
}

// ==== Calendar accessor methods ====

impl ZonedDateTime {
    pub fn day_of_week_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<u16> {
        let iso = self.local_iso(provider)?;
        Ok(self.calendar.day_of_week(&iso.date))
    }

    pub fn day_of_year_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<u16> {
        let iso = self.local_iso(provider)?;
        Ok(self.calendar.day_of_year(&iso.date))
    }

    pub fn week_of_year_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<u16> {
        let iso = self.local_iso(provider)?;
        Ok(self.calendar.week_of_year(&iso.date))
    }

    pub fn year_of_week_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<i32> {
        let iso = self.local_iso(provider)?;
        Ok(self.calendar.year_of_week(&iso.date))
    }

    pub fn days_in_week_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<u16> {
        let iso = self.local_iso(provider)?;
        Ok(self.calendar.days_in_week(&iso.date))
    }

    pub fn days_in_month_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<u16> {
        let iso = self.local_iso(provider)?;
        Ok(self.calendar.days_in_month(&iso.date))
    }

    pub fn days_in_year_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<u16> {
        let iso = self.local_iso(provider)?;
        Ok(self.calendar.days_in_year(&iso.date))
    }

    pub fn months_in_year_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<u16> {
        let iso = self.local_iso(provider)?;
        Ok(self.calendar.months_in_year(&iso.date))
    }

    pub fn in_leap_year_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<bool> {
        let iso = self.local_iso(provider)?;
        Ok(self.calendar.in_leap_year(&iso.date))
    }
}

// ==== Core method implementations ====

impl ZonedDateTime {
    /// Creates a new `ZonedDateTime` on the same local date with the
    /// provided wall-clock time. Without a time, the result is the start of
    /// the day.
    pub fn with_plain_time_and_provider(
        &self,
        time: Option<PlainTime>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        let iso = self.local_iso(provider)?;
        let epoch_ns = match time {
            // 5. If plainTimeLike is undefined, then
            // a. Let epochNs be ? GetStartOfDay(timeZone, isoDateTime.[[ISODate]]).
            None => self.tz.get_start_of_day(&iso.date, provider)?,
            // 6. Else,
            Some(time) => {
                // a. Let plainTime be ? ToTemporalTime(plainTimeLike).
                // b. Let resultISODateTime be CombineISODateAndTimeRecord(isoDateTime.[[ISODate]], plainTime.[[Time]]).
                let result = IsoDateTime::new(iso.date, time.iso)?;
                // c. Let epochNs be ? GetEpochNanosecondsFor(timeZone, resultISODateTime, compatible).
                self.tz
                    .get_epoch_nanoseconds_for(result, Disambiguation::Compatible, provider)?
            }
        };
        // 7. Return ! CreateTemporalZonedDateTime(epochNs, timeZone, calendar).
        Self::try_new(epoch_ns.as_i128(), self.calendar, self.tz.clone())
    }

    /// Creates a new `ZonedDateTime` at the same wall-clock time on `date`.
    ///
    /// The calendar of `date` wins unless it is the ISO calendar.
    pub fn with_plain_date_and_provider(
        &self,
        date: &PlainDate,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        let calendar = if date.calendar().is_iso() {
            self.calendar
        } else {
            date.calendar()
        };
        let iso = self.local_iso(provider)?;
        let result = IsoDateTime::new(date.iso, iso.time)?;
        let epoch_ns =
            self.tz
                .get_epoch_nanoseconds_for(result, Disambiguation::Compatible, provider)?;
        Self::try_new(epoch_ns.as_i128(), calendar, self.tz.clone())
    }

    /// Adds a `Duration` to this `ZonedDateTime`.
    ///
    /// Date units are added to the local date-time, time units to the exact
    /// instant.
    pub fn add_with_provider(
        &self,
        duration: &Duration,
        overflow: Option<ArithmeticOverflow>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        self.add_internal(duration, overflow.unwrap_or_default(), provider)
    }

    /// Subtracts a `Duration` from this `ZonedDateTime`.
    pub fn subtract_with_provider(
        &self,
        duration: &Duration,
        overflow: Option<ArithmeticOverflow>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        self.add_internal(&duration.negated(), overflow.unwrap_or_default(), provider)
    }

    /// Returns the `Duration` from `other` to this `ZonedDateTime`.
    pub fn since_with_provider(
        &self,
        other: &Self,
        settings: DifferenceSettings,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Duration> {
        self.diff_internal(DifferenceOperation::Since, other, settings, provider)
    }

    /// Returns the `Duration` from this `ZonedDateTime` to `other`.
    ///
    /// Differences with a date `largest_unit` need both values in the same
    /// time zone.
    pub fn until_with_provider(
        &self,
        other: &Self,
        settings: DifferenceSettings,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Duration> {
        self.diff_internal(DifferenceOperation::Until, other, settings, provider)
    }

    /// Returns the first instant of the local day of this `ZonedDateTime`.
    pub fn start_of_day_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        let iso = self.local_iso(provider)?;
        let epoch_ns = self.tz.get_start_of_day(&iso.date, provider)?;
        Self::try_new(epoch_ns.as_i128(), self.calendar, self.tz.clone())
    }

    /// Rounds this `ZonedDateTime` according to `options`.
    ///
    /// Rounding to `day` uses the length of the local day, which may differ
    /// from 24 hours around offset transitions.
    pub fn round_with_provider(
        &self,
        options: RoundingOptions,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        // 7-13. Resolve and validate the rounding options.
        let resolved = ResolvedRoundingOptions::from_datetime_options(options)?;
        // 14. If smallestUnit is "nanosecond" and roundingIncrement is 1, then
        if resolved.is_noop() {
            // a. Return ! CreateTemporalZonedDateTime(zonedDateTime.[[Nanoseconds]], zonedDateTime.[[TimeZone]], zonedDateTime.[[Calendar]]).
            return Ok(self.clone());
        }
        // 15. Let thisNs be zonedDateTime.[[EpochNanoseconds]].
        let this_ns = self.instant.as_i128();
        // 18. Let isoDateTime be GetISODateTimeFor(timeZone, thisNs).
        let iso = self.local_iso(provider)?;

        // 19. If smallestUnit is day, then
        if resolved.smallest_unit == TemporalUnit::Day {
            // a. Let dateStart be isoDateTime.[[ISODate]].
            // b. Let dateEnd be BalanceISODate(dateStart.[[Year]], dateStart.[[Month]], dateStart.[[Day]] + 1).
            let date_end = IsoDate::balance(
                iso.date.year,
                i32::from(iso.date.month),
                i64::from(iso.date.day) + 1,
            )?;
            // c. Let startNs be ? GetStartOfDay(timeZone, dateStart).
            let start_ns = self.tz.get_start_of_day(&iso.date, provider)?.as_i128();
            // e. Let endNs be ? GetStartOfDay(timeZone, dateEnd).
            let end_ns = self.tz.get_start_of_day(&date_end, provider)?.as_i128();
            // d. Assert: thisNs ≥ startNs.
            // f. Assert: thisNs < endNs.
            if !(start_ns..end_ns).contains(&this_ns) {
                return Err(TemporalError::range().with_enum(ErrorMessage::ZDTOutOfDayBounds));
            }
            // g. Let dayLengthNs be ℝ(endNs - startNs).
            let day_length = NonZeroU128::new((end_ns - start_ns).unsigned_abs())
                .ok_or(TemporalError::range().with_enum(ErrorMessage::DayLengthZero))?;
            // h. Let dayProgressNs be TimeDurationFromEpochNanosecondsDifference(thisNs, startNs).
            // i. Let roundedDayNs be ! RoundTimeDurationToIncrement(dayProgressNs, dayLengthNs, roundingMode).
            let rounded = IncrementRounder::from_signed_num(this_ns - start_ns, day_length)?
                .round(resolved.rounding_mode);
            // j. Let epochNanoseconds be AddTimeDurationToEpochNanoseconds(roundedDayNs, startNs).
            // 21. Return ! CreateTemporalZonedDateTime(epochNanoseconds, timeZone, calendar).
            return Self::try_new(start_ns + rounded, self.calendar, self.tz.clone());
        }

        // 20. Else,
        // a. Let roundResult be RoundISODateTime(isoDateTime, roundingIncrement, smallestUnit, roundingMode).
        let rounded = iso.round(resolved)?;
        // b. Let offsetNanoseconds be GetOffsetNanosecondsFor(timeZone, thisNs).
        let offset = self.tz.get_offset_nanos_for(this_ns, provider)?;
        // c. Let epochNanoseconds be ? InterpretISODateTimeOffset(roundResult.[[ISODate]], roundResult.[[Time]], option, offsetNanoseconds, timeZone, compatible, prefer, match-exactly).
        let epoch_ns = interpret_isodatetime_offset(
            rounded.date,
            Some(rounded.time),
            false,
            Some(offset as i64),
            &self.tz,
            Disambiguation::Compatible,
            OffsetDisambiguation::Prefer,
            false,
            provider,
        )?;
        // 21. Return ! CreateTemporalZonedDateTime(epochNanoseconds, timeZone, calendar).
        Self::try_new(epoch_ns.as_i128(), self.calendar, self.tz.clone())
    }

    /// Returns the local date of this `ZonedDateTime`.
    pub fn to_plain_date_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<PlainDate> {
        let iso = self.local_iso(provider)?;
        Ok(PlainDate::new_unchecked(iso.date, self.calendar))
    }

    /// Returns the local wall-clock time of this `ZonedDateTime`.
    pub fn to_plain_time_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<PlainTime> {
        let iso = self.local_iso(provider)?;
        Ok(PlainTime::new_unchecked(iso.time))
    }

    /// Returns the local date and time of this `ZonedDateTime`.
    pub fn to_plain_datetime_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<PlainDateTime> {
        let iso = self.local_iso(provider)?;
        Ok(PlainDateTime::new_unchecked(iso, self.calendar))
    }

    /// Returns the local year and month of this `ZonedDateTime`.
    pub fn to_plain_year_month_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<PlainYearMonth> {
        self.to_plain_date_with_provider(provider)?
            .to_plain_year_month()
    }

    /// Returns the local month and day of this `ZonedDateTime`.
    pub fn to_plain_month_day_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<PlainMonthDay> {
        self.to_plain_date_with_provider(provider)?
            .to_plain_month_day()
    }

    /// Returns the RFC 9557 string of this `ZonedDateTime`.
    ///
    /// The offset is written rounded to the minute.
    pub fn to_ixdtf_string_with_provider(
        &self,
        display_offset: DisplayOffset,
        display_timezone: DisplayTimeZone,
        display_calendar: DisplayCalendar,
        options: ToStringRoundingOptions,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<String> {
        let resolved = options.resolve()?;
        // 11. Let result be ! RoundTemporalInstant(zonedDateTime.[[EpochNanoseconds]], precision.[[Increment]], precision.[[Unit]], roundingMode).
        let rounded = self
            .instant
            .round_instant(ResolvedRoundingOptions::from_to_string_options(&resolved))?;
        // 12. Let offsetNanoseconds be GetOffsetNanosecondsFor(timeZone, epochNs).
        let offset = self.tz.get_offset_nanos_for(rounded, provider)?;
        // 13. Let isoDateTime be GetISODateTimeFor(timeZone, epochNs).
        let iso = IsoDateTime::from_epoch_nanos(rounded, offset)?;
        // 16. Let offsetString be FormatDateTimeUTCOffsetRounded(offsetNanoseconds).
        let (sign, hour, minute) = UtcOffset::from_nanoseconds(offset as i64)?.to_minute_parts();
        let identifier = self.tz.identifier();

        Ok(IxdtfStringBuilder::default()
            .with_date(iso.date)
            .with_time(iso.time, resolved.precision)
            .with_minute_offset(sign, hour, minute, display_offset)
            .with_timezone(&identifier, display_timezone)
            .with_calendar(self.calendar.identifier(), display_calendar)
            .build())
    }
}

// ==== Free functions ====

/// Equivalent: `AddZonedDateTime`
///
/// Adds the date portion in local time, then the time portion in exact
/// time, returning the resulting epoch nanoseconds.
pub(crate) fn add_zoned_date_time(
    epoch_ns: i128,
    tz: &TimeZone,
    calendar: Calendar,
    date: &DateDuration,
    norm: NormalizedTimeDuration,
    overflow: ArithmeticOverflow,
    provider: &impl TimeZoneProvider,
) -> TemporalResult<i128> {
    // 1. If DateDurationSign(duration.[[Date]]) = 0, then
    let intermediate_ns = if date.sign() == Sign::Zero {
        epoch_ns
    } else {
        // 2. Let isoDateTime be GetISODateTimeFor(timeZone, epochNanoseconds).
        let start = tz.get_iso_datetime_for(epoch_ns, provider)?;
        // 3. Let addedDate be ? CalendarDateAdd(calendar, isoDateTime.[[ISODate]], duration.[[Date]], overflow).
        let added = calendar.date_add(&start.date, date, overflow)?;
        // 4. Let intermediateDateTime be CombineISODateAndTimeRecord(addedDate, isoDateTime.[[Time]]).
        // 5. If ISODateTimeWithinLimits(intermediateDateTime) is false, throw a RangeError exception.
        let intermediate = IsoDateTime::new(added.iso, start.time)?;
        // 6. Let intermediateNs be ! GetEpochNanosecondsFor(timeZone, intermediateDateTime, compatible).
        tz.get_epoch_nanoseconds_for(intermediate, Disambiguation::Compatible, provider)?
            .as_i128()
    };
    // 7. Return ? AddInstant(intermediateNs, duration.[[Time]]).
    let result = intermediate_ns + norm.0;
    if !is_valid_epoch_nanos(&result) {
        return Err(TemporalError::range().with_enum(ErrorMessage::InstantOutOfRange));
    }
    Ok(result)
}

/// Equivalent: `InterpretISODateTimeOffset`
///
/// The offset behaviour is inferred from the arguments:
///
/// - option, when `offset_nanos` is `Some`
/// - exact, when `offset_nanos` is `None` and `is_exact`
/// - wall, when `offset_nanos` is `None` and not `is_exact`
///
/// A missing `time` stands for the start of the day.
#[allow(clippy::too_many_arguments)]
pub(crate) fn interpret_isodatetime_offset(
    date: IsoDate,
    time: Option<IsoTime>,
    is_exact: bool,
    offset_nanos: Option<i64>,
    timezone: &TimeZone,
    disambiguation: Disambiguation,
    offset_option: OffsetDisambiguation,
    match_minutes: bool,
    provider: &impl TimeZoneProvider,
) -> TemporalResult<EpochNanoseconds> {
    // 1. If time is start-of-day, then
    let Some(time) = time else {
        // a. Assert: offsetBehaviour is wall.
        // b. Assert: offsetNanoseconds is 0.
        temporal_assert!(offset_nanos.is_none() && !is_exact);
        // c. Return ? GetStartOfDay(timeZone, isoDate).
        return timezone.get_start_of_day(&date, provider);
    };

    // 2. Let isoDateTime be CombineISODateAndTimeRecord(isoDate, time).
    let iso = IsoDateTime::new_unchecked(date, time);
    match (is_exact, offset_nanos, offset_option) {
        // 3. If offsetBehaviour is wall, or offsetBehaviour is option and offsetOption is ignore, then
        (false, None, _) | (_, Some(_), OffsetDisambiguation::Ignore) => {
            // a. Return ? GetEpochNanosecondsFor(timeZone, isoDateTime, disambiguation).
            timezone.get_epoch_nanoseconds_for(iso, disambiguation, provider)
        }
        // 4. If offsetBehaviour is exact, or offsetBehaviour is option and offsetOption is use, then
        (true, None, _) | (_, Some(_), OffsetDisambiguation::Use) => {
            // a. Let balanced be BalanceISODateTime(..., time.[[Nanosecond]] - offsetNanoseconds).
            // b. Perform ? CheckISODaysRange(balanced.[[ISODate]]).
            if date.to_epoch_days().abs() > 100_000_000 {
                return Err(TemporalError::range().with_enum(ErrorMessage::DateTimeOutOfRange));
            }
            // c. Let epochNanoseconds be GetUTCEpochNanoseconds(balanced).
            let epoch_ns =
                iso.as_nanoseconds().as_i128() - i128::from(offset_nanos.unwrap_or(0));
            // d. If IsValidEpochNanoseconds(epochNanoseconds) is false, throw a RangeError exception.
            if !is_valid_epoch_nanos(&epoch_ns) {
                return Err(TemporalError::range().with_enum(ErrorMessage::InstantOutOfRange));
            }
            // e. Return epochNanoseconds.
            Ok(EpochNanoseconds::from(epoch_ns))
        }
        // 5. Assert: offsetBehaviour is option.
        // 6. Assert: offsetOption is prefer or reject.
        (_, Some(offset), OffsetDisambiguation::Prefer | OffsetDisambiguation::Reject) => {
            // 8. Let utcEpochNanoseconds be GetUTCEpochNanoseconds(isoDateTime).
            let utc_epoch_ns = iso.as_nanoseconds().as_i128();
            // 7. Perform ? CheckISODaysRange(isoDate).
            // 9. Let possibleEpochNs be ? GetPossibleEpochNanoseconds(timeZone, isoDateTime).
            let possible = timezone.get_possible_epoch_ns_for(iso, provider)?;
            // 10. For each element candidate of possibleEpochNs, do
            for candidate in possible.as_slice() {
                // a. Let candidateOffset be utcEpochNanoseconds - candidate.
                let candidate_offset = utc_epoch_ns - candidate.as_i128();
                // b. If candidateOffset = offsetNanoseconds, then
                if candidate_offset == i128::from(offset) {
                    // i. Return candidate.
                    return Ok(*candidate);
                }
                // c. If matchBehaviour is match-minutes, then
                if match_minutes {
                    // i. Let roundedCandidateNanoseconds be RoundNumberToIncrement(candidateOffset, 60 × 10**9, half-expand).
                    let minute = NonZeroU128::new(NS_PER_MINUTE).temporal_unwrap()?;
                    let rounded = IncrementRounder::from_signed_num(candidate_offset, minute)?
                        .round(TemporalRoundingMode::HalfExpand);
                    // ii. If roundedCandidateNanoseconds = offsetNanoseconds, then
                    if rounded == i128::from(offset) {
                        // 1. Return candidate.
                        return Ok(*candidate);
                    }
                }
            }

            // 11. If offsetOption is reject, throw a RangeError exception.
            if offset_option == OffsetDisambiguation::Reject {
                #[cfg(feature = "log")]
                log::debug!(
                    "offset {offset}ns does not match {iso:?} in {}",
                    timezone.identifier()
                );
                return Err(TemporalError::range().with_enum(ErrorMessage::OffsetMismatch));
            }
            // 12. Return ? DisambiguatePossibleEpochNanoseconds(possibleEpochNs, timeZone, isoDateTime, disambiguation).
            timezone.disambiguate_possible_epoch_nanos(possible, iso, disambiguation, provider)
        }
    }
}
