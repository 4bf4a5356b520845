//! This module implements `PlainDateTime` any directly related algorithms.

use alloc::string::String;
use core::{cmp::Ordering, str::FromStr};

use crate::{
    builtins::core::{
        calendar::{Calendar, MonthCode},
        duration::{DateDuration, TimeDuration},
        timezone::TimeZone,
        Duration, PartialDate, PartialTime, PlainDate, PlainMonthDay, PlainTime, PlainYearMonth,
        ZonedDateTime,
    },
    error::ErrorMessage,
    iso::{IsoDate, IsoDateTime, IsoTime},
    options::{
        ArithmeticOverflow, DifferenceOperation, DifferenceSettings, Disambiguation,
        DisplayCalendar, ResolvedRoundingOptions, RoundingOptions, TemporalUnit,
        ToStringRoundingOptions, UnitGroup,
    },
    parsers::{
        calendar_from_record, iso_date_from_record, iso_time_from_record, parse_date_time,
        IxdtfStringBuilder,
    },
    provider::{NeverProvider, TimeZoneProvider},
    TemporalError, TemporalResult,
};

/// A partial PlainDateTime record
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PartialDateTime {
    /// The `PartialDate` portion of a `PartialDateTime`
    pub date: PartialDate,
    /// The `PartialTime` portion of a `PartialDateTime`
    pub time: PartialTime,
}

impl PartialDateTime {
    pub fn is_empty(&self) -> bool {
        self.date.is_empty() && self.time.is_empty()
    }
}

/// The native Rust implementation of `Temporal.PlainDateTime`
///
/// A calendar date and a wall-clock time with no time zone.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlainDateTime {
    pub(crate) iso: IsoDateTime,
    calendar: Calendar,
}

impl core::fmt::Display for PlainDateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let string = self
            .to_ixdtf_string(ToStringRoundingOptions::default(), DisplayCalendar::Auto)
            .map_err(|_| core::fmt::Error)?;
        f.write_str(&string)
    }
}

// ==== Private PlainDateTime API ====

impl PlainDateTime {
    /// Creates a new unchecked `PlainDateTime`.
    #[inline]
    #[must_use]
    pub(crate) fn new_unchecked(iso: IsoDateTime, calendar: Calendar) -> Self {
        Self { iso, calendar }
    }

    // AddDurationToOrSubtractDurationFromPlainDateTime ( operation, dateTime, temporalDurationLike, options )
    fn add_or_subtract_duration(
        &self,
        duration: &Duration,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        // 1. If operation is subtract, let sign be -1. Otherwise, let sign be 1.
        // 2. Let duration be ? ToTemporalDurationRecord(temporalDurationLike).
        // 3. Set options to ? GetOptionsObject(options).
        // 4. Let calendarRec be ? CreateCalendarMethodsRecord(dateTime.[[Calendar]], « date-add »).

        // 5. Let norm be NormalizeTimeDuration(sign × duration.[[Hours]], ..., sign × duration.[[Nanoseconds]]).
        let norm = duration.normalized_time()?;

        // 6. Let result be ? AddDateTime(dateTime.[[ISOYear]], ..., calendarRec, sign × duration.[[Years]],
        // sign × duration.[[Months]], sign × duration.[[Weeks]], sign × duration.[[Days]], norm, options).
        let result = self
            .iso
            .add_date_duration(self.calendar, duration.date(), norm, overflow)?;

        // 7. Assert: IsValidISODate(result.[[Year]], result.[[Month]], result.[[Day]]) is true.
        // 8. Assert: IsValidTime(result.[[Hour]], ..., result.[[Nanosecond]]) is true.
        // 9. Return ? CreateTemporalDateTime(result.[[Year]], ..., dateTime.[[Calendar]]).
        if !result.is_within_limits() {
            return Err(TemporalError::range().with_enum(ErrorMessage::DateTimeOutOfRange));
        }
        Ok(Self::new_unchecked(result, self.calendar))
    }

    /// Equivalent: `DifferencePlainDateTimeWithRounding`
    pub(crate) fn diff_dt_with_rounding(
        &self,
        other: &Self,
        options: ResolvedRoundingOptions,
    ) -> TemporalResult<Duration> {
        // 1. If CompareISODateTime(y1, ..., ns1, y2, ..., ns2) = 0, then
        if self.iso == other.iso {
            // a. Return ! CreateTemporalDuration(0, 0, 0, 0, 0, 0, 0, 0, 0, 0).
            return Ok(Duration::default());
        }

        // 2. Let diff be ? DifferenceISODateTime(y1, ..., ns2, calendarRec, largestUnit, resolvedOptions).
        let diff = self
            .iso
            .diff(&other.iso, self.calendar, options.largest_unit)?;

        // 3. If smallestUnit is "nanosecond" and roundingIncrement = 1, return diff.
        // 4. Let roundResult be ? RoundDuration(diff.[[Years]], ..., diff.[[NormalizedTime]],
        // roundingIncrement, smallestUnit, roundingMode, plainRelativeTo, calendarRec).
        let (rounded, noop) = if options.is_noop() {
            (diff, true)
        } else {
            let relative = PlainDate::new_unchecked(self.iso.date, self.calendar);
            let (rounded, _) =
                diff.round_relative(options, Some(&relative), None, &NeverProvider)?;
            (rounded, false)
        };

        // 5. Let normWithDays be ? Add24HourDaysToNormalizedTimeDuration(roundResult.[[NormalizedTime]], roundResult.[[Days]]).
        let norm_with_days = rounded.norm.add_days(rounded.date.days as i64)?;
        // 6. Let timeResult be ! BalanceTimeDuration(normWithDays, largestUnit).
        let (days, time) = TimeDuration::balance(norm_with_days, options.largest_unit)?;
        let date = DateDuration::new(
            rounded.date.years,
            rounded.date.months,
            rounded.date.weeks,
            days as f64,
        )?;

        // 7. Let balanceResult be ? BalanceDateDurationRelative(roundResult.[[Years]], roundResult.[[Months]],
        // roundResult.[[Weeks]], timeResult.[[Days]], largestUnit, smallestUnit, plainRelativeTo, calendarRec).
        let date = if noop {
            date
        } else {
            let relative = PlainDate::new_unchecked(self.iso.date, self.calendar);
            date.balance_relative(options.largest_unit, Some(&relative))?
        };

        // 8. Return ? CreateDurationRecord(balanceResult.[[Years]], ..., timeResult.[[Nanoseconds]]).
        Duration::try_from_parts(date, time)
    }

    /// Equivalent: `DifferenceTemporalPlainDateTime`
    pub(crate) fn diff(
        &self,
        op: DifferenceOperation,
        other: &Self,
        settings: DifferenceSettings,
    ) -> TemporalResult<Duration> {
        // 3. If ? CalendarEquals(dateTime.[[Calendar]], other.[[Calendar]]) is false, throw a RangeError exception.
        if self.calendar != other.calendar {
            return Err(TemporalError::range().with_enum(ErrorMessage::CalendarMismatch));
        }

        // 5. Let settings be ? GetDifferenceSettings(operation, resolvedOptions, DATETIME, « », "nanosecond", "day").
        let options = ResolvedRoundingOptions::from_diff_settings(
            settings,
            op,
            UnitGroup::DateTime,
            &[],
            TemporalUnit::Nanosecond,
            TemporalUnit::Day,
        )?;

        // 6-8. Let result be ? DifferencePlainDateTimeWithRounding(...).
        let result = self.diff_dt_with_rounding(other, options)?;

        // 9. Return ! CreateTemporalDuration(sign × result.[[Years]], ..., sign × result.[[Nanoseconds]]).
        match op {
            DifferenceOperation::Until => Ok(result),
            DifferenceOperation::Since => Ok(result.negated()),
        }
    }
}

// ==== Public PlainDateTime API ====

impl PlainDateTime {
    /// Creates a new `PlainDateTime`, constraining any field into a valid range.
    ///
    /// ```rust
    /// use temporal_iso::{Calendar, PlainDateTime};
    ///
    /// let date_time = PlainDateTime::new(2024, 2, 30, 24, 0, 0, 0, 0, 0, Calendar::default()).unwrap();
    /// assert_eq!(date_time.day(), 29);
    /// assert_eq!(date_time.hour(), 23);
    /// ```
    #[inline]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
        microsecond: u16,
        nanosecond: u16,
        calendar: Calendar,
    ) -> TemporalResult<Self> {
        Self::new_with_overflow(
            year,
            month,
            day,
            hour,
            minute,
            second,
            millisecond,
            microsecond,
            nanosecond,
            calendar,
            ArithmeticOverflow::Constrain,
        )
    }

    /// Creates a new `PlainDateTime`, rejecting any field that is not in a valid range.
    #[inline]
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
        microsecond: u16,
        nanosecond: u16,
        calendar: Calendar,
    ) -> TemporalResult<Self> {
        Self::new_with_overflow(
            year,
            month,
            day,
            hour,
            minute,
            second,
            millisecond,
            microsecond,
            nanosecond,
            calendar,
            ArithmeticOverflow::Reject,
        )
    }

    /// Creates a new `PlainDateTime` with the provided [`ArithmeticOverflow`] option.
    #[inline]
    #[allow(clippy::too_many_arguments)]
    pub fn new_with_overflow(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
        microsecond: u16,
        nanosecond: u16,
        calendar: Calendar,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<Self> {
        let date = IsoDate::new_with_overflow(year, month.into(), day.into(), overflow)?;
        let time = IsoTime::new(
            hour.into(),
            minute.into(),
            second.into(),
            millisecond.into(),
            microsecond.into(),
            nanosecond.into(),
            overflow,
        )?;
        let iso = IsoDateTime::new(date, time)?;
        Ok(Self::new_unchecked(iso, calendar))
    }

    /// Creates an ISO `PlainDateTime` from a `PartialDateTime`. Missing time
    /// fields are zero.
    ///
    /// ```rust
    /// use temporal_iso::{partial::{PartialDate, PartialDateTime, PartialTime}, PlainDateTime};
    ///
    /// let partial = PartialDateTime {
    ///     date: PartialDate::new()
    ///         .with_year(Some(2000))
    ///         .with_month(Some(13))
    ///         .with_day(Some(2)),
    ///     time: PartialTime::new().with_hour(Some(4)),
    /// };
    ///
    /// let date_time = PlainDateTime::from_partial(partial, None).unwrap();
    /// assert_eq!(date_time.month(), 12);
    /// assert_eq!(date_time.hour(), 4);
    /// ```
    pub fn from_partial(
        partial: PartialDateTime,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        if partial.is_empty() {
            return Err(TemporalError::r#type().with_enum(ErrorMessage::FieldsEmpty));
        }
        let overflow = overflow.unwrap_or_default();
        let date = PlainDate::from_partial(partial.date, Some(overflow))?;
        let time = IsoTime::default().with(partial.time, overflow)?;
        let iso = IsoDateTime::new(date.iso, time)?;
        Ok(Self::new_unchecked(iso, date.calendar()))
    }

    /// Creates a new `PlainDateTime` with the fields of a `PartialDateTime`,
    /// using the fields of this date-time for anything left unset.
    ///
    /// ```rust
    /// use temporal_iso::{partial::{PartialDate, PartialDateTime}, PlainDateTime};
    ///
    /// let initial = "1976-11-18T15:23:30".parse::<PlainDateTime>().unwrap();
    /// let partial = PartialDateTime {
    ///     date: PartialDate::new().with_year(Some(2019)),
    ///     ..Default::default()
    /// };
    /// let result = initial.with(partial, None).unwrap();
    /// assert_eq!(result.to_string(), "2019-11-18T15:23:30");
    /// ```
    pub fn with(
        &self,
        partial: PartialDateTime,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        if partial.is_empty() {
            return Err(TemporalError::r#type().with_enum(ErrorMessage::FieldsEmpty));
        }
        let overflow = overflow.unwrap_or_default();

        // 7. Let fields be ? PrepareCalendarFields(calendar, dateTimeLike, « day, month, month-code, year », « hour, ... », partial).
        // 8. Set fields to CalendarMergeFields(calendar, fields, partialDateTime).
        let date = if partial.date.is_empty() {
            self.to_plain_date()
        } else {
            self.to_plain_date().with(partial.date, Some(overflow))?
        };
        // 9. Let result be ? InterpretTemporalDateTimeFields(calendar, fields, overflow).
        let time = self.iso.time.with(partial.time, overflow)?;

        let iso = IsoDateTime::new(date.iso, time)?;
        Ok(Self::new_unchecked(iso, self.calendar))
    }

    /// Creates a new `PlainDateTime` from this date with the provided time,
    /// or midnight when no time is provided.
    pub fn with_plain_time(&self, time: Option<PlainTime>) -> TemporalResult<Self> {
        let time = time.map_or(IsoTime::default(), |time| time.iso);
        let iso = IsoDateTime::new(self.iso.date, time)?;
        Ok(Self::new_unchecked(iso, self.calendar))
    }

    /// Creates a new `PlainDateTime` from this time on the provided date.
    ///
    /// The calendar of `date` wins unless it is the ISO calendar.
    pub fn with_plain_date(&self, date: &PlainDate) -> TemporalResult<Self> {
        let calendar = if date.calendar() == Calendar::default() {
            self.calendar
        } else {
            date.calendar()
        };
        let iso = IsoDateTime::new(date.iso, self.iso.time)?;
        Ok(Self::new_unchecked(iso, calendar))
    }

    /// Creates a new `PlainDateTime` from the current `PlainDateTime` and the provided calendar.
    #[must_use]
    pub fn with_calendar(&self, calendar: Calendar) -> Self {
        Self::new_unchecked(self.iso, calendar)
    }

    /// Returns this `PlainDateTime`'s ISO year value.
    #[inline]
    #[must_use]
    pub const fn iso_year(&self) -> i32 {
        self.iso.date.year
    }

    /// Returns this `PlainDateTime`'s ISO month value.
    #[inline]
    #[must_use]
    pub const fn iso_month(&self) -> u8 {
        self.iso.date.month
    }

    /// Returns this `PlainDateTime`'s ISO day value.
    #[inline]
    #[must_use]
    pub const fn iso_day(&self) -> u8 {
        self.iso.date.day
    }

    /// Returns the hour value
    #[inline]
    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.iso.time.hour
    }

    /// Returns the minute value
    #[inline]
    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.iso.time.minute
    }

    /// Returns the second value
    #[inline]
    #[must_use]
    pub const fn second(&self) -> u8 {
        self.iso.time.second
    }

    /// Returns the `millisecond` value
    #[inline]
    #[must_use]
    pub const fn millisecond(&self) -> u16 {
        self.iso.time.millisecond
    }

    /// Returns the `microsecond` value
    #[inline]
    #[must_use]
    pub const fn microsecond(&self) -> u16 {
        self.iso.time.microsecond
    }

    /// Returns the `nanosecond` value
    #[inline]
    #[must_use]
    pub const fn nanosecond(&self) -> u16 {
        self.iso.time.nanosecond
    }

    /// Returns the Calendar value.
    #[inline]
    #[must_use]
    pub const fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Compares the ISO fields of two date-times, ignoring their calendars.
    #[inline]
    #[must_use]
    pub fn compare_iso(&self, other: &Self) -> Ordering {
        self.iso.cmp(&other.iso)
    }
}

// ==== Calendar-derived public API ====

impl PlainDateTime {
    /// Returns the calendar year value.
    pub fn year(&self) -> i32 {
        self.calendar.year(&self.iso.date)
    }

    /// Returns the calendar month value.
    pub fn month(&self) -> u8 {
        self.calendar.month(&self.iso.date)
    }

    /// Returns the calendar month code value.
    pub fn month_code(&self) -> TemporalResult<MonthCode> {
        self.calendar.month_code(&self.iso.date)
    }

    /// Returns the calendar day value.
    pub fn day(&self) -> u8 {
        self.calendar.day(&self.iso.date)
    }

    /// Returns the calendar day of week value.
    pub fn day_of_week(&self) -> u16 {
        self.calendar.day_of_week(&self.iso.date)
    }

    /// Returns the calendar day of year value.
    pub fn day_of_year(&self) -> u16 {
        self.calendar.day_of_year(&self.iso.date)
    }

    /// Returns the calendar week of year value.
    pub fn week_of_year(&self) -> u16 {
        self.calendar.week_of_year(&self.iso.date)
    }

    /// Returns the calendar year of week value.
    pub fn year_of_week(&self) -> i32 {
        self.calendar.year_of_week(&self.iso.date)
    }

    /// Returns the calendar days in week value.
    pub fn days_in_week(&self) -> u16 {
        self.calendar.days_in_week(&self.iso.date)
    }

    /// Returns the calendar days in month value.
    pub fn days_in_month(&self) -> u16 {
        self.calendar.days_in_month(&self.iso.date)
    }

    /// Returns the calendar days in year value.
    pub fn days_in_year(&self) -> u16 {
        self.calendar.days_in_year(&self.iso.date)
    }

    /// Returns the calendar months in year value.
    pub fn months_in_year(&self) -> u16 {
        self.calendar.months_in_year(&self.iso.date)
    }

    /// Returns whether the date is in a leap year for the given calendar.
    pub fn in_leap_year(&self) -> bool {
        self.calendar.in_leap_year(&self.iso.date)
    }
}

// ==== Arithmetic and rounding ====

impl PlainDateTime {
    #[inline]
    /// Adds a `Duration` to the current `PlainDateTime`.
    pub fn add(
        &self,
        duration: &Duration,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        self.add_or_subtract_duration(duration, overflow)
    }

    #[inline]
    /// Subtracts a `Duration` from the current `PlainDateTime`.
    pub fn subtract(
        &self,
        duration: &Duration,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        self.add_or_subtract_duration(&duration.negated(), overflow)
    }

    /// Returns a `Duration` representing the period of time from this `PlainDateTime` until the other `PlainDateTime`.
    #[inline]
    pub fn until(&self, other: &Self, settings: DifferenceSettings) -> TemporalResult<Duration> {
        self.diff(DifferenceOperation::Until, other, settings)
    }

    /// Returns a `Duration` representing the period of time from this `PlainDateTime` since the other `PlainDateTime`.
    #[inline]
    pub fn since(&self, other: &Self, settings: DifferenceSettings) -> TemporalResult<Duration> {
        self.diff(DifferenceOperation::Since, other, settings)
    }

    /// Rounds the current `PlainDateTime` based on provided options.
    ///
    /// ```rust
    /// use temporal_iso::{options::{RoundingOptions, TemporalUnit}, PlainDateTime};
    ///
    /// let date_time = "2024-03-15T23:59:59.5".parse::<PlainDateTime>().unwrap();
    /// let rounded = date_time
    ///     .round(RoundingOptions::with_smallest_unit(TemporalUnit::Second))
    ///     .unwrap();
    /// assert_eq!(rounded.to_string(), "2024-03-16T00:00:00");
    /// ```
    pub fn round(&self, options: RoundingOptions) -> TemporalResult<Self> {
        let resolved = ResolvedRoundingOptions::from_datetime_options(options)?;

        if resolved.is_noop() {
            return Ok(*self);
        }

        let result = self.iso.round(resolved)?;
        Ok(Self::new_unchecked(result, self.calendar))
    }
}

// ==== ToX methods ====

impl PlainDateTime {
    /// Returns the date portion of this date-time.
    #[inline]
    #[must_use]
    pub fn to_plain_date(&self) -> PlainDate {
        PlainDate::new_unchecked(self.iso.date, self.calendar)
    }

    /// Returns the wall-clock time of this date-time.
    #[inline]
    #[must_use]
    pub fn to_plain_time(&self) -> PlainTime {
        PlainTime::new_unchecked(self.iso.time)
    }

    /// Converts this date-time into a `PlainYearMonth`.
    pub fn to_plain_year_month(&self) -> TemporalResult<PlainYearMonth> {
        self.to_plain_date().to_plain_year_month()
    }

    /// Converts this date-time into a `PlainMonthDay`.
    pub fn to_plain_month_day(&self) -> TemporalResult<PlainMonthDay> {
        self.to_plain_date().to_plain_month_day()
    }

    /// Interprets this wall-clock date-time in `time_zone`, resolving a
    /// skipped or repeated local time with `disambiguation`.
    pub fn to_zoned_date_time_with_provider(
        &self,
        time_zone: TimeZone,
        disambiguation: Disambiguation,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<ZonedDateTime> {
        // 6. Let epochNs be ? GetEpochNanosecondsFor(timeZone, dateTime.[[ISODateTime]], disambiguation).
        let epoch_ns = time_zone.get_epoch_nanoseconds_for(self.iso, disambiguation, provider)?;
        // 7. Return ! CreateTemporalZonedDateTime(epochNs, timeZone, dateTime.[[Calendar]]).
        ZonedDateTime::try_new(epoch_ns.as_i128(), self.calendar, time_zone)
    }

    /// Returns the RFC 9557 string of this date-time, rounded as `options` require.
    pub fn to_ixdtf_string(
        &self,
        options: ToStringRoundingOptions,
        display_calendar: DisplayCalendar,
    ) -> TemporalResult<String> {
        let resolved = options.resolve()?;
        // 7. Let result be RoundISODateTime(dateTime.[[ISODateTime]], precision.[[Increment]], precision.[[Unit]], roundingMode).
        // 8. If ISODateTimeWithinLimits(result) is false, throw a RangeError exception.
        let result = self
            .iso
            .round(ResolvedRoundingOptions::from_to_string_options(&resolved))?;
        Ok(IxdtfStringBuilder::default()
            .with_date(result.date)
            .with_time(result.time, resolved.precision)
            .with_calendar(self.calendar.identifier(), display_calendar)
            .build())
    }
}

// ==== Trait impls ====

impl From<PlainDate> for PlainDateTime {
    fn from(value: PlainDate) -> Self {
        PlainDateTime::new_unchecked(
            IsoDateTime::new_unchecked(value.iso, IsoTime::default()),
            value.calendar(),
        )
    }
}

impl FromStr for PlainDateTime {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_record = parse_date_time(s.as_bytes())?;

        let calendar = calendar_from_record(parse_record.calendar)?;

        let time = parse_record
            .time
            .map(iso_time_from_record)
            .transpose()?
            .unwrap_or_default();

        let date = parse_record
            .date
            .ok_or(TemporalError::range().with_enum(ErrorMessage::ParserNeedsDate))?;
        let date = iso_date_from_record(date)?;

        Ok(Self::new_unchecked(IsoDateTime::new(date, time)?, calendar))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use crate::{
        options::{RoundingIncrement, TemporalRoundingMode},
        parsers::Precision,
    };

    use super::*;

    fn pdt(s: &str) -> PlainDateTime {
        s.parse::<PlainDateTime>().unwrap()
    }

    fn duration(s: &str) -> Duration {
        s.parse::<Duration>().unwrap()
    }

    #[test]
    fn plain_date_time_limits() {
        // This test is primarily to assert that the `expect` in the epoch methods is
        // valid, i.e., a valid instant is within the range of an f64.
        let negative_limit =
            PlainDateTime::try_new(-271_821, 4, 19, 0, 0, 0, 0, 0, 0, Calendar::default());
        assert!(negative_limit.is_err());
        let positive_limit =
            PlainDateTime::try_new(275_760, 9, 14, 0, 0, 0, 0, 0, 0, Calendar::default());
        assert!(positive_limit.is_err());

        let within_negative_limit =
            PlainDateTime::try_new(-271_821, 4, 19, 0, 0, 0, 0, 0, 1, Calendar::default());
        assert!(within_negative_limit.is_ok());
        let within_positive_limit =
            PlainDateTime::try_new(275_760, 9, 13, 23, 59, 59, 999, 999, 999, Calendar::default());
        assert!(within_positive_limit.is_ok());
    }

    #[test]
    fn basic_with_test() {
        let pdt = PlainDateTime::try_new(1976, 11, 18, 15, 23, 30, 123, 456, 789, Calendar::default())
            .unwrap();

        // Test year
        let partial = PartialDateTime {
            date: PartialDate::new().with_year(Some(2019)),
            time: PartialTime::default(),
        };
        let result = pdt.with(partial, None).unwrap();
        assert_eq!(result.to_string(), "2019-11-18T15:23:30.123456789");

        // Test month
        let partial = PartialDateTime {
            date: PartialDate::new().with_month(Some(5)),
            time: PartialTime::default(),
        };
        let result = pdt.with(partial, None).unwrap();
        assert_eq!(result.month(), 5);

        // Test monthCode
        let partial = PartialDateTime {
            date: PartialDate::new().with_month_code(Some(MonthCode::from_month(5).unwrap())),
            time: PartialTime::default(),
        };
        let result = pdt.with(partial, None).unwrap();
        assert_eq!(result.month(), 5);

        // Test hour and nanosecond together
        let partial = PartialDateTime {
            date: PartialDate::default(),
            time: PartialTime::new()
                .with_hour(Some(2))
                .with_nanosecond(Some(12)),
        };
        let result = pdt.with(partial, None).unwrap();
        assert_eq!(result.to_string(), "1976-11-18T02:23:30.123456012");

        // Test empty partial
        let result = pdt.with(PartialDateTime::default(), None);
        assert!(result.is_err());
    }

    #[test]
    fn datetime_add() {
        let pdt = pdt("2020-01-31T12:34:56.987654321");

        let result = pdt.add(&duration("P1M"), None).unwrap();
        assert_eq!(result.to_string(), "2020-02-29T12:34:56.987654321");

        let result = pdt.add(&duration("P1M"), Some(ArithmeticOverflow::Reject));
        assert!(result.is_err());

        // Time overflow carries into the date.
        let result = pdt.add(&duration("PT12H"), None).unwrap();
        assert_eq!(result.to_string(), "2020-02-01T00:34:56.987654321");

        let result = pdt.add(&duration("-P1DT12H35M"), None).unwrap();
        assert_eq!(result.to_string(), "2020-01-29T23:59:56.987654321");
    }

    #[test]
    fn datetime_subtract() {
        let pdt = pdt("2000-03-31T00:00");
        let result = pdt.subtract(&duration("P1M"), None).unwrap();
        assert_eq!(result.to_string(), "2000-02-29T00:00:00");

        let result = pdt.subtract(&duration("PT1S"), None).unwrap();
        assert_eq!(result.to_string(), "2000-03-30T23:59:59");
    }

    #[test]
    fn datetime_add_out_of_range() {
        let pdt = pdt("+275760-09-13T00:00");
        assert!(pdt.add(&duration("P1D"), None).is_err());
        assert!(pdt.add(&duration("PT23H"), None).is_ok());
    }

    #[test]
    fn datetime_until() {
        let earlier = pdt("2019-01-08T08:22:36.123456789");
        let later = pdt("2021-09-07T12:39:40.987654321");

        let result = earlier.until(&later, DifferenceSettings::default()).unwrap();
        assert_eq!(result.days(), 973.0);
        assert_eq!(result.hours(), 4.0);
        assert_eq!(result.minutes(), 17.0);
        assert_eq!(result.seconds(), 4.0);
        assert_eq!(result.milliseconds(), 864.0);
        assert_eq!(result.microseconds(), 197.0);
        assert_eq!(result.nanoseconds(), 532.0);

        let settings = DifferenceSettings {
            largest_unit: Some(TemporalUnit::Year),
            ..Default::default()
        };
        let result = earlier.until(&later, settings).unwrap();
        assert_eq!(
            (result.years(), result.months(), result.days(), result.hours()),
            (2.0, 7.0, 30.0, 4.0)
        );

        let settings = DifferenceSettings {
            largest_unit: Some(TemporalUnit::Hour),
            ..Default::default()
        };
        let result = earlier.until(&later, settings).unwrap();
        assert_eq!((result.days(), result.hours()), (0.0, 973.0 * 24.0 + 4.0));
    }

    #[test]
    fn datetime_since_with_rounding() {
        let earlier = pdt("2019-01-08T08:22:36.123456789");
        let later = pdt("2021-09-07T12:39:40.987654321");

        let settings = DifferenceSettings {
            smallest_unit: Some(TemporalUnit::Hour),
            rounding_mode: Some(TemporalRoundingMode::HalfExpand),
            ..Default::default()
        };
        let result = later.since(&earlier, settings).unwrap();
        assert_eq!((result.days(), result.hours(), result.minutes()), (973.0, 4.0, 0.0));

        let result = earlier.since(&later, settings).unwrap();
        assert_eq!((result.days(), result.hours()), (-973.0, -4.0));

        let settings = DifferenceSettings {
            smallest_unit: Some(TemporalUnit::Day),
            rounding_mode: Some(TemporalRoundingMode::Ceil),
            ..Default::default()
        };
        let result = later.since(&earlier, settings).unwrap();
        assert_eq!((result.days(), result.hours()), (974.0, 0.0));
    }

    #[test]
    fn diff_rounding_carries_into_days() {
        let one = pdt("2020-01-01T00:00");
        let two = pdt("2020-01-02T23:59:59.9");
        let settings = DifferenceSettings {
            smallest_unit: Some(TemporalUnit::Second),
            rounding_mode: Some(TemporalRoundingMode::HalfExpand),
            ..Default::default()
        };
        let result = one.until(&two, settings).unwrap();
        assert_eq!((result.days(), result.hours(), result.seconds()), (2.0, 0.0, 0.0));
    }

    #[test]
    fn datetime_round() {
        let pdt = pdt("1976-11-18T14:23:30.123456789");

        let options = RoundingOptions {
            smallest_unit: Some(TemporalUnit::Hour),
            ..Default::default()
        };
        assert_eq!(pdt.round(options).unwrap().to_string(), "1976-11-18T14:00:00");

        let options = RoundingOptions {
            smallest_unit: Some(TemporalUnit::Minute),
            increment: Some(RoundingIncrement::try_new(15).unwrap()),
            ..Default::default()
        };
        assert_eq!(pdt.round(options).unwrap().to_string(), "1976-11-18T14:30:00");

        let options = RoundingOptions {
            smallest_unit: Some(TemporalUnit::Day),
            ..Default::default()
        };
        assert_eq!(pdt.round(options).unwrap().to_string(), "1976-11-19T00:00:00");

        let options = RoundingOptions {
            smallest_unit: Some(TemporalUnit::Day),
            increment: Some(RoundingIncrement::try_new(2).unwrap()),
            ..Default::default()
        };
        assert!(pdt.round(options).is_err());

        let options = RoundingOptions {
            smallest_unit: Some(TemporalUnit::Month),
            ..Default::default()
        };
        assert!(pdt.round(options).is_err());
    }

    #[test]
    fn datetime_to_string() {
        let pdt = pdt("1976-11-18T15:23:30.1");
        assert_eq!(pdt.to_string(), "1976-11-18T15:23:30.1");

        let options = ToStringRoundingOptions {
            precision: Precision::Digit(3),
            ..Default::default()
        };
        assert_eq!(
            pdt.to_ixdtf_string(options, DisplayCalendar::Always).unwrap(),
            "1976-11-18T15:23:30.100[u-ca=iso8601]"
        );

        let options = ToStringRoundingOptions {
            smallest_unit: Some(TemporalUnit::Minute),
            rounding_mode: Some(TemporalRoundingMode::Ceil),
            ..Default::default()
        };
        assert_eq!(
            pdt.to_ixdtf_string(options, DisplayCalendar::Critical).unwrap(),
            "1976-11-18T15:24[!u-ca=iso8601]"
        );

        // Rounding past the upper limit is an error.
        let max = pdt_max();
        let options = ToStringRoundingOptions {
            smallest_unit: Some(TemporalUnit::Second),
            rounding_mode: Some(TemporalRoundingMode::Ceil),
            ..Default::default()
        };
        assert!(max.to_ixdtf_string(options, DisplayCalendar::Auto).is_err());
    }

    fn pdt_max() -> PlainDateTime {
        PlainDateTime::try_new(275_760, 9, 13, 23, 59, 59, 999, 999, 999, Calendar::default()).unwrap()
    }

    #[test]
    fn datetime_from_str() {
        let result = pdt("2024-03-15T12:05:24.5[u-ca=iso8601]");
        assert_eq!(result.iso_year(), 2024);
        assert_eq!(result.millisecond(), 500);

        // A date alone is midnight.
        let result = pdt("2024-03-15");
        assert_eq!(result.to_plain_time(), PlainTime::default());

        assert!("2024-03-15T12:00Z".parse::<PlainDateTime>().is_err());
        assert!("12:00".parse::<PlainDateTime>().is_err());
        assert!("-271821-04-19T00:00".parse::<PlainDateTime>().is_err());
        assert!("-271821-04-19T00:00:00.000000001".parse::<PlainDateTime>().is_ok());
    }

    #[test]
    fn datetime_conversions() {
        let pdt = pdt("2024-02-29T10:00");
        assert_eq!(pdt.to_plain_date().to_string(), "2024-02-29");
        assert_eq!(pdt.to_plain_time().hour(), 10);
        let year_month = pdt.to_plain_year_month().unwrap();
        assert_eq!(year_month.month(), 2);
        let month_day = pdt.to_plain_month_day().unwrap();
        assert_eq!(month_day.day(), 29);

        let midnight = pdt.with_plain_time(None).unwrap();
        assert_eq!(midnight.hour(), 0);
        assert_eq!(PlainDateTime::from(pdt.to_plain_date()), midnight);

        let moved = pdt
            .with_plain_date(&PlainDate::try_new_iso(2023, 1, 1).unwrap())
            .unwrap();
        assert_eq!(moved.to_string(), "2023-01-01T10:00:00");
    }

    #[test]
    fn datetime_to_zoned_date_time() {
        let pdt = pdt("2024-02-29T10:00");
        let zdt = pdt
            .to_zoned_date_time_with_provider(
                TimeZone::utc(),
                Disambiguation::Compatible,
                &crate::provider::BUILTIN_PROVIDER,
            )
            .unwrap();
        assert_eq!(
            zdt.epoch_nanoseconds().as_i128(),
            1_709_200_800_000_000_000
        );
    }
}
