//! This module implements `PlainDate` and any directly related algorithms.

use alloc::string::String;
use core::{cmp::Ordering, str::FromStr};

use crate::{
    builtins::core::{
        calendar::{Calendar, MonthCode},
        duration::{
            normalized::{NormalizedDurationRecord, NormalizedTimeDuration},
            DateDuration, TimeDuration,
        },
        timezone::TimeZone,
        Duration, PlainDateTime, PlainMonthDay, PlainTime, PlainYearMonth, ZonedDateTime,
    },
    error::ErrorMessage,
    iso::{IsoDate, IsoDateTime},
    options::{
        ArithmeticOverflow, DifferenceOperation, DifferenceSettings, Disambiguation,
        DisplayCalendar, ResolvedRoundingOptions, RoundingIncrement, TemporalUnit, UnitGroup,
    },
    parsers::{calendar_from_record, iso_date_from_record, parse_date_time, IxdtfStringBuilder},
    provider::{NeverProvider, TimeZoneProvider},
    TemporalError, TemporalResult,
};

/// A `PartialDate` represents partially filled date fields.
///
/// `month` and `month_code` may both be present, in which case they must
/// agree once the date is resolved.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PartialDate {
    // A potentially set `year` field.
    pub year: Option<i32>,
    // A potentially set `month` field.
    pub month: Option<u8>,
    // A potentially set `month_code` field.
    pub month_code: Option<MonthCode>,
    // A potentially set `day` field.
    pub day: Option<u8>,
}

impl PartialDate {
    /// Returns whether no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub const fn new() -> Self {
        Self {
            year: None,
            month: None,
            month_code: None,
            day: None,
        }
    }

    pub const fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }

    pub const fn with_month(mut self, month: Option<u8>) -> Self {
        self.month = month;
        self
    }

    pub const fn with_month_code(mut self, month_code: Option<MonthCode>) -> Self {
        self.month_code = month_code;
        self
    }

    pub const fn with_day(mut self, day: Option<u8>) -> Self {
        self.day = day;
        self
    }
}

/// The native Rust implementation of `Temporal.PlainDate`.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlainDate {
    pub(crate) iso: IsoDate,
    calendar: Calendar,
}

impl core::fmt::Display for PlainDate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_ixdtf_string(DisplayCalendar::Auto))
    }
}

// ==== Private API ====

impl PlainDate {
    /// Create a new `PlainDate` with the date values and calendar slot.
    #[inline]
    #[must_use]
    pub(crate) fn new_unchecked(iso: IsoDate, calendar: Calendar) -> Self {
        Self { iso, calendar }
    }

    /// Returns the date after adding the given duration to date.
    ///
    /// Temporal Equivalent: 3.5.13 `AddDate ( calendar, plainDate, duration [ , options [ , dateAdd ] ] )`
    #[inline]
    pub(crate) fn add_date(
        &self,
        duration: &Duration,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        // 2. If options is not present, set options to undefined.
        let overflow = overflow.unwrap_or(ArithmeticOverflow::Constrain);
        // 3. If duration.[[Years]] ≠ 0, or duration.[[Months]] ≠ 0, or duration.[[Weeks]] ≠ 0, then
        if duration.years() != 0.0 || duration.months() != 0.0 || duration.weeks() != 0.0 {
            // b. Return ? CalendarDateAdd(calendar, plainDate, duration, options, dateAdd).
            return self.calendar.date_add(&self.iso, duration.date(), overflow);
        }

        // 5. Let norm be NormalizeTimeDuration(duration.[[Hours]], ..., duration.[[Nanoseconds]]).
        // 6. Let days be duration.[[Days]] + BalanceTimeDuration(norm, "day").[[Days]].
        let (balanced_days, _) = TimeDuration::balance(duration.normalized_time()?, TemporalUnit::Day)?;
        let days = duration.days() + balanced_days as f64;

        // 7. Let result be ? AddISODate(plainDate.[[ISOYear]], plainDate.[[ISOMonth]], plainDate.[[ISODay]], 0, 0, 0, days, overflow).
        let result = self
            .iso
            .add_date_duration(&DateDuration::new(0.0, 0.0, 0.0, days)?, overflow)?;

        Ok(Self::new_unchecked(result, self.calendar))
    }

    /// Returns a duration representing the difference between the dates one and two.
    ///
    /// Temporal Equivalent: 3.5.6 `DifferenceDate ( calendar, one, two, options )`
    #[inline]
    pub(crate) fn internal_diff_date(
        &self,
        other: &Self,
        largest_unit: TemporalUnit,
    ) -> TemporalResult<Duration> {
        if self.iso == other.iso {
            return Ok(Duration::default());
        }

        if largest_unit == TemporalUnit::Day {
            let days = self.iso.days_until(&other.iso);
            return Ok(Duration::from(DateDuration::new(0.0, 0.0, 0.0, days as f64)?));
        }

        self.calendar.date_until(&self.iso, &other.iso, largest_unit)
    }

    /// Equivalent: `DifferenceTemporalPlainDate`
    pub(crate) fn diff_date(
        &self,
        op: DifferenceOperation,
        other: &Self,
        settings: DifferenceSettings,
    ) -> TemporalResult<Duration> {
        // 1. If operation is SINCE, let sign be -1. Otherwise, let sign be 1.
        // 2. Set other to ? ToTemporalDate(other).
        // 3. If ? CalendarEquals(temporalDate.[[Calendar]], other.[[Calendar]]) is false, throw a RangeError exception.
        if self.calendar != other.calendar {
            return Err(TemporalError::range().with_enum(ErrorMessage::CalendarMismatch));
        }

        // 4. Let resolvedOptions be ? SnapshotOwnProperties(? GetOptionsObject(options), null).
        // 5. Let settings be ? GetDifferenceSettings(operation, resolvedOptions, DATE, « », "day", "day").
        let resolved = ResolvedRoundingOptions::from_diff_settings(
            settings,
            op,
            UnitGroup::Date,
            &[],
            TemporalUnit::Day,
            TemporalUnit::Day,
        )?;

        // 6. If temporalDate.[[ISOYear]] = other.[[ISOYear]], and temporalDate.[[ISOMonth]] = other.[[ISOMonth]],
        // and temporalDate.[[ISODay]] = other.[[ISODay]], then
        if self.iso == other.iso {
            // a. Return ! CreateTemporalDuration(0, 0, 0, 0, 0, 0, 0, 0, 0, 0).
            return Ok(Duration::default());
        }

        // 7. Let result be ? DifferenceDate(calendarRec, temporalDate, other, resolvedOptions).
        let result = self.internal_diff_date(other, resolved.largest_unit)?;

        // 8. If settings.[[SmallestUnit]] is "day" and settings.[[RoundingIncrement]] = 1, let roundingGranularityIsNoop be true; else let roundingGranularityIsNoop be false.
        let date = if resolved.smallest_unit == TemporalUnit::Day
            && resolved.increment == RoundingIncrement::ONE
        {
            *result.date()
        } else {
            // 9. If roundingGranularityIsNoop is false, then
            // a. Let roundRecord be ? RoundDuration(result.[[Years]], result.[[Months]], result.[[Weeks]],
            // result.[[Days]], ZeroTimeDuration(), settings.[[RoundingIncrement]], settings.[[SmallestUnit]],
            // settings.[[RoundingMode]], temporalDate, calendarRec).
            let record =
                NormalizedDurationRecord::new(*result.date(), NormalizedTimeDuration::default())?;
            let (rounded, _) = record.round_relative(resolved, Some(self), None, &NeverProvider)?;
            // b. Let roundResult be roundRecord.[[NormalizedDuration]].
            // c. Set result to ? BalanceDateDurationRelative(roundResult.[[Years]], roundResult.[[Months]],
            // roundResult.[[Weeks]], roundResult.[[Days]], settings.[[LargestUnit]], settings.[[SmallestUnit]],
            // temporalDate, calendarRec).
            rounded
                .date()
                .balance_relative(resolved.largest_unit, Some(self))?
        };

        // 10. Return ! CreateTemporalDuration(sign × result.[[Years]], sign × result.[[Months]], sign × result.[[Weeks]], sign × result.[[Days]], 0, 0, 0, 0, 0, 0).
        match op {
            DifferenceOperation::Until => Ok(Duration::from(date)),
            DifferenceOperation::Since => Ok(Duration::from(date.negated())),
        }
    }

    /// The fields of this date as a `PartialDate`.
    fn to_partial(self) -> TemporalResult<PartialDate> {
        Ok(PartialDate {
            year: Some(self.year()),
            month: Some(self.month()),
            month_code: Some(self.month_code()?),
            day: Some(self.day()),
        })
    }
}

// ==== Public API ====

impl PlainDate {
    /// Creates a new `PlainDate`, constraining any field into a valid range.
    ///
    /// ```rust
    /// use temporal_iso::{Calendar, PlainDate};
    ///
    /// let date = PlainDate::new(2024, 2, 30, Calendar::default()).unwrap();
    /// assert_eq!(date.day(), 29);
    /// ```
    #[inline]
    pub fn new(year: i32, month: u8, day: u8, calendar: Calendar) -> TemporalResult<Self> {
        Self::new_with_overflow(year, month, day, calendar, ArithmeticOverflow::Constrain)
    }

    /// Creates a new `PlainDate`, rejecting any field that is not in a valid range.
    #[inline]
    pub fn try_new(year: i32, month: u8, day: u8, calendar: Calendar) -> TemporalResult<Self> {
        Self::new_with_overflow(year, month, day, calendar, ArithmeticOverflow::Reject)
    }

    /// Creates a new ISO `PlainDate`, rejecting any field that is not in a valid range.
    #[inline]
    pub fn try_new_iso(year: i32, month: u8, day: u8) -> TemporalResult<Self> {
        Self::try_new(year, month, day, Calendar::default())
    }

    /// Creates a new `PlainDate` with the provided [`ArithmeticOverflow`] option.
    #[inline]
    pub fn new_with_overflow(
        year: i32,
        month: u8,
        day: u8,
        calendar: Calendar,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<Self> {
        let iso = IsoDate::new_with_overflow(year, month.into(), day.into(), overflow)?;
        Ok(Self::new_unchecked(iso, calendar))
    }

    /// Creates an ISO `PlainDate` from a `PartialDate`.
    ///
    /// ```rust
    /// use temporal_iso::{partial::PartialDate, PlainDate};
    ///
    /// let partial = PartialDate {
    ///     year: Some(2000),
    ///     month: Some(13),
    ///     day: Some(1),
    ///     ..Default::default()
    /// };
    ///
    /// let date = PlainDate::from_partial(partial, None).unwrap();
    /// assert_eq!(date.month(), 12);
    /// ```
    pub fn from_partial(
        partial: PartialDate,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        Calendar::default().date_from_partial(&partial, overflow.unwrap_or_default())
    }

    /// Creates a date time with values from a `PartialDate`, falling back to
    /// the fields of this date.
    pub fn with(
        &self,
        partial: PartialDate,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        if partial.is_empty() {
            return Err(TemporalError::r#type().with_enum(ErrorMessage::FieldsEmpty));
        }
        // 6. Let fieldsResult be ? PrepareCalendarFieldsAndFieldNames(calendarRec, temporalDate, « "day", "month", "monthCode", "year" »).
        // 7. Let partialDate be ? PrepareTemporalFields(temporalDateLike, fieldsResult.[[FieldNames]], partial).
        // 8. Let fields be ? CalendarMergeFields(calendarRec, fieldsResult.[[Fields]], partialDate).
        let merged = self.calendar.merge_fields(&self.to_partial()?, &partial);
        // 10. Return ? CalendarDateFromFields(calendarRec, fields, resolvedOptions).
        self.calendar
            .date_from_partial(&merged, overflow.unwrap_or_default())
    }

    /// Creates a new `PlainDate` from the current `PlainDate` and the provided calendar.
    #[must_use]
    pub fn with_calendar(&self, calendar: Calendar) -> Self {
        Self::new_unchecked(self.iso, calendar)
    }

    #[inline]
    #[must_use]
    /// Returns this `PlainDate`'s ISO year value.
    pub const fn iso_year(&self) -> i32 {
        self.iso.year
    }

    #[inline]
    #[must_use]
    /// Returns this `PlainDate`'s ISO month value.
    pub const fn iso_month(&self) -> u8 {
        self.iso.month
    }

    #[inline]
    #[must_use]
    /// Returns this `PlainDate`'s ISO day value.
    pub const fn iso_day(&self) -> u8 {
        self.iso.day
    }

    #[inline]
    #[must_use]
    /// Returns the `PlainDate`'s calendar.
    pub const fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Returns the number of days from this date until `other`.
    #[inline]
    #[must_use]
    pub fn days_until(&self, other: &Self) -> i64 {
        self.iso.days_until(&other.iso)
    }

    /// Compares the ISO fields of two dates, ignoring their calendars.
    #[inline]
    #[must_use]
    pub fn compare_iso(&self, other: &Self) -> Ordering {
        self.iso.cmp(&other.iso)
    }

    /// Adds a `Duration` to the current `PlainDate`.
    #[inline]
    pub fn add(
        &self,
        duration: &Duration,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        self.add_date(duration, overflow)
    }

    /// Subtracts a `Duration` from the current `PlainDate`.
    #[inline]
    pub fn subtract(
        &self,
        duration: &Duration,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        self.add_date(&duration.negated(), overflow)
    }

    /// Returns a `Duration` representing the time from this `PlainDate` until the other `PlainDate`.
    #[inline]
    pub fn until(&self, other: &Self, settings: DifferenceSettings) -> TemporalResult<Duration> {
        self.diff_date(DifferenceOperation::Until, other, settings)
    }

    /// Returns a `Duration` representing the time passed from this `PlainDate` since the other `PlainDate`.
    #[inline]
    pub fn since(&self, other: &Self, settings: DifferenceSettings) -> TemporalResult<Duration> {
        self.diff_date(DifferenceOperation::Since, other, settings)
    }
}

// ==== Calendar-derived Public API ====

impl PlainDate {
    /// Returns the calendar year value.
    pub fn year(&self) -> i32 {
        self.calendar.year(&self.iso)
    }

    /// Returns the calendar month value.
    pub fn month(&self) -> u8 {
        self.calendar.month(&self.iso)
    }

    /// Returns the calendar month code value.
    pub fn month_code(&self) -> TemporalResult<MonthCode> {
        self.calendar.month_code(&self.iso)
    }

    /// Returns the calendar day value.
    pub fn day(&self) -> u8 {
        self.calendar.day(&self.iso)
    }

    /// Returns the calendar day of week value, with Monday as 1.
    pub fn day_of_week(&self) -> u16 {
        self.calendar.day_of_week(&self.iso)
    }

    /// Returns the calendar day of year value.
    pub fn day_of_year(&self) -> u16 {
        self.calendar.day_of_year(&self.iso)
    }

    /// Returns the calendar week of year value.
    pub fn week_of_year(&self) -> u16 {
        self.calendar.week_of_year(&self.iso)
    }

    /// Returns the calendar year of week value.
    pub fn year_of_week(&self) -> i32 {
        self.calendar.year_of_week(&self.iso)
    }

    /// Returns the calendar days in week value.
    pub fn days_in_week(&self) -> u16 {
        self.calendar.days_in_week(&self.iso)
    }

    /// Returns the calendar days in month value.
    pub fn days_in_month(&self) -> u16 {
        self.calendar.days_in_month(&self.iso)
    }

    /// Returns the calendar days in year value.
    pub fn days_in_year(&self) -> u16 {
        self.calendar.days_in_year(&self.iso)
    }

    /// Returns the calendar months in year value.
    pub fn months_in_year(&self) -> u16 {
        self.calendar.months_in_year(&self.iso)
    }

    /// Returns whether the date is in a leap year for the given calendar.
    pub fn in_leap_year(&self) -> bool {
        self.calendar.in_leap_year(&self.iso)
    }
}

// ==== ToX Methods ====

impl PlainDate {
    /// Converts the current `PlainDate` into a `PlainDateTime`, using midnight
    /// when no time is provided.
    pub fn to_plain_date_time(&self, time: Option<PlainTime>) -> TemporalResult<PlainDateTime> {
        let time = time.unwrap_or_default();
        let iso = IsoDateTime::new(self.iso, time.iso)?;
        Ok(PlainDateTime::new_unchecked(iso, self.calendar))
    }

    /// Converts the current `PlainDate` into a `ZonedDateTime` in `time_zone`.
    ///
    /// Without a time, the result is the start of the day in `time_zone`.
    pub fn to_zoned_date_time_with_provider(
        &self,
        time_zone: TimeZone,
        plain_time: Option<PlainTime>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<ZonedDateTime> {
        let epoch_ns = match plain_time {
            // 5. If temporalTime is undefined, then
            // a. Let epochNs be ? GetStartOfDay(timeZone, temporalDate.[[ISODate]]).
            None => time_zone.get_start_of_day(&self.iso, provider)?,
            // 6. Else,
            Some(time) => {
                // a. Let isoDateTime be CombineISODateAndTimeRecord(temporalDate.[[ISODate]], temporalTime.[[ISOTime]]).
                // b. If ISODateTimeWithinLimits(isoDateTime) is false, throw a RangeError exception.
                let iso = IsoDateTime::new(self.iso, time.iso)?;
                // c. Let epochNs be ? GetEpochNanosecondsFor(timeZone, isoDateTime, compatible).
                time_zone.get_epoch_nanoseconds_for(iso, Disambiguation::Compatible, provider)?
            }
        };
        // 7. Return ! CreateTemporalZonedDateTime(epochNs, timeZone, temporalDate.[[Calendar]]).
        ZonedDateTime::try_new(epoch_ns.as_i128(), self.calendar, time_zone)
    }

    /// Converts the current `PlainDate` into a `PlainYearMonth`.
    pub fn to_plain_year_month(&self) -> TemporalResult<PlainYearMonth> {
        let partial = PartialDate::new()
            .with_year(Some(self.year()))
            .with_month_code(Some(self.month_code()?));
        self.calendar
            .year_month_from_partial(&partial, ArithmeticOverflow::Constrain)
    }

    /// Converts the current `PlainDate` into a `PlainMonthDay`.
    pub fn to_plain_month_day(&self) -> TemporalResult<PlainMonthDay> {
        let partial = PartialDate::new()
            .with_month_code(Some(self.month_code()?))
            .with_day(Some(self.day()));
        self.calendar
            .month_day_from_partial(&partial, ArithmeticOverflow::Constrain)
    }

    /// Returns the RFC 9557 string of this date.
    #[inline]
    #[must_use]
    pub fn to_ixdtf_string(&self, display_calendar: DisplayCalendar) -> String {
        IxdtfStringBuilder::default()
            .with_date(self.iso)
            .with_calendar(self.calendar.identifier(), display_calendar)
            .build()
    }
}

// ==== Trait impls ====

impl From<PlainDateTime> for PlainDate {
    fn from(value: PlainDateTime) -> Self {
        PlainDate::new_unchecked(value.iso.date, value.calendar())
    }
}

impl FromStr for PlainDate {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let record = parse_date_time(s.as_bytes())?;
        let date = record
            .date
            .ok_or(TemporalError::range().with_enum(ErrorMessage::ParserNeedsDate))?;
        let calendar = calendar_from_record(record.calendar)?;

        let iso = iso_date_from_record(date)?;
        iso.check_within_limits()?;

        Ok(Self::new_unchecked(iso, calendar))
    }
}
