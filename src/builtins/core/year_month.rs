//! This module implements `PlainYearMonth` and any directly related algorithms.

use alloc::string::String;
use core::{cmp::Ordering, str::FromStr};

use crate::{
    builtins::core::{
        calendar::{Calendar, MonthCode},
        duration::{normalized::NormalizedDurationRecord, DateDuration, TimeDuration},
        Duration, PartialDate, PlainDate,
    },
    error::ErrorMessage,
    iso::IsoDate,
    options::{
        ArithmeticOverflow, DifferenceOperation, DifferenceSettings, DisplayCalendar,
        ResolvedRoundingOptions, RoundingIncrement, TemporalUnit, UnitGroup,
    },
    parsers::{
        calendar_from_record, parse_year_month, FormattableCalendar, FormattableDate,
        FormattablePartialDate, PartialDateKind,
    },
    provider::NeverProvider,
    utils, TemporalError, TemporalResult, TemporalUnwrap,
};

/// The native Rust implementation of `Temporal.PlainYearMonth`.
///
/// The ISO day of a `PlainYearMonth` is a reference day that is always `1`
/// for the ISO calendar.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlainYearMonth {
    pub(crate) iso: IsoDate,
    calendar: Calendar,
}

impl core::fmt::Display for PlainYearMonth {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_ixdtf_string(DisplayCalendar::Auto))
    }
}

// ==== Private API ====

impl PlainYearMonth {
    /// Creates an unvalidated `PlainYearMonth`.
    #[inline]
    #[must_use]
    pub(crate) fn new_unchecked(iso: IsoDate, calendar: Calendar) -> Self {
        Self { iso, calendar }
    }

    /// The year and month fields of this year-month as a `PartialDate`.
    fn to_partial(self) -> TemporalResult<PartialDate> {
        Ok(PartialDate::new()
            .with_year(Some(self.year()))
            .with_month_code(Some(self.month_code()?)))
    }

    /// Equivalent: `AddDurationToOrSubtractDurationFromPlainYearMonth`
    fn add_or_subtract_duration(
        &self,
        duration: &Duration,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<Self> {
        // 3. Let internalDuration be ToInternalDurationRecordWith24HourDays(duration).
        // 11. Let durationToAdd be ToDateDurationRecordWithoutTime(duration).
        let (balanced_days, _) =
            TimeDuration::balance(duration.normalized_time()?, TemporalUnit::Day)?;
        let duration_to_add = DateDuration::new(
            duration.years(),
            duration.months(),
            duration.weeks(),
            duration.days() + balanced_days as f64,
        )?;

        // 4. Let sign be DurationSign(duration).
        // 6-8. Let intermediateDate be ? CalendarDateFromFields(calendar, fields with day 1, constrain).
        let first_of_month = IsoDate::new_unchecked(self.iso.year, self.iso.month, 1);
        // 9. If sign < 0, then
        //     a-c. Let date be the last day of the month of intermediateDate.
        // 10. Else, let date be intermediateDate.
        let date = if duration_to_add.sign() == crate::Sign::Negative {
            let last_day = utils::iso_days_in_month(self.iso.year, self.iso.month);
            IsoDate::new_unchecked(self.iso.year, self.iso.month, last_day)
        } else {
            first_of_month
        };

        // 12. Let addedDate be ? CalendarDateAdd(calendar, date, durationToAdd, overflow).
        let added = date.add_date_duration(&duration_to_add, overflow)?;

        // 13. Let addedDateFields be ISODateToFields(calendar, addedDate, year-month).
        // 14. Let isoDate be ? CalendarYearMonthFromFields(calendar, addedDateFields, overflow).
        // 15. Return ! CreateTemporalYearMonth(isoDate, calendar).
        Self::new_with_overflow(added.year, added.month, None, self.calendar, overflow)
    }

    /// Equivalent: `DifferenceTemporalPlainYearMonth`
    fn diff(
        &self,
        op: DifferenceOperation,
        other: &Self,
        settings: DifferenceSettings,
    ) -> TemporalResult<Duration> {
        // 3. If CalendarEquals(yearMonth.[[Calendar]], other.[[Calendar]]) is false, throw a RangeError exception.
        if self.calendar != other.calendar {
            return Err(TemporalError::range().with_enum(ErrorMessage::CalendarMismatch));
        }

        // 4. Let settings be ? GetDifferenceSettings(operation, resolvedOptions, DATE, « week, day », month, year).
        let resolved = ResolvedRoundingOptions::from_diff_settings(
            settings,
            op,
            UnitGroup::Date,
            &[TemporalUnit::Week, TemporalUnit::Day],
            TemporalUnit::Month,
            TemporalUnit::Year,
        )?;

        // 5. If CompareISODate(yearMonth.[[ISODate]], other.[[ISODate]]) = 0, then
        if self.iso == other.iso {
            //     a. Return ! CreateTemporalDuration(0, 0, 0, 0, 0, 0, 0, 0, 0, 0).
            return Ok(Duration::default());
        }

        // 6-11. Let thisDate and otherDate be the first days of each month.
        let this_date = IsoDate::new_unchecked(self.iso.year, self.iso.month, 1);
        let other_date = IsoDate::new_unchecked(other.iso.year, other.iso.month, 1);

        // 12. Let dateDifference be CalendarDateUntil(calendar, thisDate, otherDate, settings.[[LargestUnit]]).
        let difference = self
            .calendar
            .date_until(&this_date, &other_date, resolved.largest_unit)?;
        let mut date = DateDuration::new(difference.years(), difference.months(), 0.0, 0.0)?;

        // 16. If settings.[[SmallestUnit]] is not month or settings.[[RoundingIncrement]] ≠ 1, then
        if resolved.smallest_unit != TemporalUnit::Month
            || resolved.increment != RoundingIncrement::ONE
        {
            // a. Let duration be RoundRelativeDuration(duration, destEpochNs, isoDateTime, unset, calendar, ...).
            let relative = PlainDate::new_unchecked(this_date, self.calendar);
            let record = NormalizedDurationRecord::new(date, Default::default())?;
            let (rounded, _) =
                record.round_relative(resolved, Some(&relative), None, &NeverProvider)?;
            date = rounded
                .date()
                .balance_relative(resolved.largest_unit, Some(&relative))?;
        }

        // 17. Let result be ! TemporalDurationFromInternal(duration, day).
        // 18. If operation is since, set result to CreateNegatedTemporalDuration(result).
        match op {
            DifferenceOperation::Until => Ok(Duration::from(date)),
            DifferenceOperation::Since => Ok(Duration::from(date.negated())),
        }
    }
}

// ==== Public API ====

impl PlainYearMonth {
    /// Creates a new `PlainYearMonth`, constraining the month into a valid range.
    #[inline]
    pub fn new(year: i32, month: u8, calendar: Calendar) -> TemporalResult<Self> {
        Self::new_with_overflow(year, month, None, calendar, ArithmeticOverflow::Constrain)
    }

    /// Creates a new `PlainYearMonth`, rejecting an invalid month or reference day.
    #[inline]
    pub fn try_new(
        year: i32,
        month: u8,
        reference_day: Option<u8>,
        calendar: Calendar,
    ) -> TemporalResult<Self> {
        Self::new_with_overflow(
            year,
            month,
            reference_day,
            calendar,
            ArithmeticOverflow::Reject,
        )
    }

    /// Creates a new valid `PlainYearMonth` with the provided [`ArithmeticOverflow`] option.
    ///
    /// The reference day is validated and then discarded; ISO year-months
    /// always use the first of the month.
    #[inline]
    pub fn new_with_overflow(
        year: i32,
        month: u8,
        reference_day: Option<u8>,
        calendar: Calendar,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<Self> {
        let day = reference_day.unwrap_or(1);
        let regulated = IsoDate::regulate(year, month.into(), day.into(), overflow)?;
        let iso = IsoDate::new_unchecked(regulated.year, regulated.month, 1);
        iso.check_year_month_within_limits()?;
        Ok(Self::new_unchecked(iso, calendar))
    }

    /// Creates an ISO `PlainYearMonth` from the `year` and `month` or
    /// `month_code` of a `PartialDate`.
    ///
    /// ```rust
    /// use temporal_iso::{partial::PartialDate, PlainYearMonth};
    ///
    /// let partial = PartialDate::new().with_year(Some(2024)).with_month(Some(13));
    /// let year_month = PlainYearMonth::from_partial(partial, None).unwrap();
    /// assert_eq!(year_month.to_string(), "2024-12");
    /// ```
    pub fn from_partial(
        partial: PartialDate,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        Calendar::default().year_month_from_partial(&partial, overflow.unwrap_or_default())
    }

    /// Creates a new `PlainYearMonth` with the fields of `partial`, using the
    /// fields of this year-month for anything left unset. A `day` is ignored.
    pub fn with(
        &self,
        partial: PartialDate,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        if partial.year.is_none() && partial.month.is_none() && partial.month_code.is_none() {
            return Err(TemporalError::r#type().with_enum(ErrorMessage::FieldsEmpty));
        }
        let merged = self.calendar.merge_fields(&self.to_partial()?, &partial);
        self.calendar
            .year_month_from_partial(&merged, overflow.unwrap_or_default())
    }

    /// Returns the iso year value for this `YearMonth`.
    #[inline]
    #[must_use]
    pub const fn iso_year(&self) -> i32 {
        self.iso.year
    }

    /// Returns the iso month value for this `YearMonth`.
    #[inline]
    #[must_use]
    pub const fn iso_month(&self) -> u8 {
        self.iso.month
    }

    /// Returns the Calendar value.
    #[inline]
    #[must_use]
    pub const fn calendar(&self) -> Calendar {
        self.calendar
    }

    pub fn year(&self) -> i32 {
        self.calendar.year(&self.iso)
    }

    pub fn month(&self) -> u8 {
        self.calendar.month(&self.iso)
    }

    pub fn month_code(&self) -> TemporalResult<MonthCode> {
        self.calendar.month_code(&self.iso)
    }

    pub fn days_in_month(&self) -> u16 {
        self.calendar.days_in_month(&self.iso)
    }

    pub fn days_in_year(&self) -> u16 {
        self.calendar.days_in_year(&self.iso)
    }

    pub fn months_in_year(&self) -> u16 {
        self.calendar.months_in_year(&self.iso)
    }

    #[inline]
    #[must_use]
    pub fn in_leap_year(&self) -> bool {
        self.calendar.in_leap_year(&self.iso)
    }

    /// Compares the ISO fields of two year-months, ignoring their calendars.
    #[inline]
    #[must_use]
    pub fn compare_iso(&self, other: &Self) -> Ordering {
        self.iso.cmp(&other.iso)
    }

    /// Adds a `Duration` to this year-month. Only whole months move the result.
    pub fn add(
        &self,
        duration: &Duration,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        self.add_or_subtract_duration(duration, overflow.unwrap_or_default())
    }

    /// Subtracts a `Duration` from this year-month.
    pub fn subtract(
        &self,
        duration: &Duration,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        self.add_or_subtract_duration(&duration.negated(), overflow.unwrap_or_default())
    }

    /// Returns the years and months from this year-month until `other`.
    pub fn until(&self, other: &Self, settings: DifferenceSettings) -> TemporalResult<Duration> {
        self.diff(DifferenceOperation::Until, other, settings)
    }

    /// Returns the years and months from `other` until this year-month.
    pub fn since(&self, other: &Self, settings: DifferenceSettings) -> TemporalResult<Duration> {
        self.diff(DifferenceOperation::Since, other, settings)
    }

    /// Creates a `PlainDate` on `day` of this year-month, constraining the day.
    pub fn to_plain_date(&self, day: u8) -> TemporalResult<PlainDate> {
        let partial = self.to_partial()?.with_day(Some(day));
        self.calendar
            .date_from_partial(&partial, ArithmeticOverflow::Constrain)
    }

    /// Returns the RFC 9557 string of this year-month.
    pub fn to_ixdtf_string(&self, display_calendar: DisplayCalendar) -> String {
        FormattablePartialDate {
            kind: PartialDateKind::YearMonth,
            date: FormattableDate(self.iso.year, self.iso.month, self.iso.day),
            calendar: FormattableCalendar {
                show: display_calendar,
                calendar: self.calendar.identifier(),
            },
        }
        .to_string()
    }
}

impl FromStr for PlainYearMonth {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let record = parse_year_month(s.as_bytes())?;
        let calendar = calendar_from_record(record.calendar)?;
        let date = record.date.temporal_unwrap()?;

        Self::new_with_overflow(
            date.year,
            date.month,
            None,
            calendar,
            ArithmeticOverflow::Reject,
        )
    }
}
