//! This module implements `PlainMonthDay` and any directly related algorithms.

use alloc::string::String;
use core::str::FromStr;

use crate::{
    builtins::core::calendar::{Calendar, MonthCode, MONTH_DAY_REFERENCE_YEAR},
    error::ErrorMessage,
    iso::IsoDate,
    options::{ArithmeticOverflow, DisplayCalendar},
    parsers::{
        calendar_from_record, parse_month_day, FormattableCalendar, FormattableDate,
        FormattablePartialDate, PartialDateKind,
    },
    TemporalError, TemporalResult, TemporalUnwrap,
};

use super::{PartialDate, PlainDate};

/// The native Rust implementation of `Temporal.PlainMonthDay`
///
/// A month code and day. The ISO year is a hidden reference year, 1972 for
/// the ISO calendar, chosen so that February 29 is representable.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlainMonthDay {
    pub(crate) iso: IsoDate,
    calendar: Calendar,
}

impl core::fmt::Display for PlainMonthDay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_ixdtf_string(DisplayCalendar::Auto))
    }
}

impl PlainMonthDay {
    /// Creates a new unchecked `PlainMonthDay`
    #[inline]
    #[must_use]
    pub(crate) fn new_unchecked(iso: IsoDate, calendar: Calendar) -> Self {
        Self { iso, calendar }
    }

    /// Creates a new valid `PlainMonthDay`.
    ///
    /// `ref_year` defaults to the leap year 1972.
    #[inline]
    pub fn new_with_overflow(
        month: u8,
        day: u8,
        calendar: Calendar,
        overflow: ArithmeticOverflow,
        ref_year: Option<i32>,
    ) -> TemporalResult<Self> {
        let year = ref_year.unwrap_or(MONTH_DAY_REFERENCE_YEAR);
        let iso = IsoDate::new_with_overflow(year, month.into(), day.into(), overflow)?;
        Ok(Self::new_unchecked(iso, calendar))
    }

    /// Creates a new `PlainMonthDay`, rejecting an invalid month or day.
    ///
    /// ```rust
    /// use temporal_iso::{Calendar, PlainMonthDay};
    ///
    /// let leap_day = PlainMonthDay::try_new(2, 29, Calendar::default()).unwrap();
    /// assert_eq!(leap_day.to_string(), "02-29");
    /// assert!(PlainMonthDay::try_new(2, 30, Calendar::default()).is_err());
    /// ```
    #[inline]
    pub fn try_new(month: u8, day: u8, calendar: Calendar) -> TemporalResult<Self> {
        Self::new_with_overflow(month, day, calendar, ArithmeticOverflow::Reject, None)
    }

    /// Creates an ISO `PlainMonthDay` from a `PartialDate`.
    ///
    /// A `month` without a `month_code` is only accepted alongside a `year`,
    /// which is then used to regulate the day.
    pub fn from_partial(
        partial: PartialDate,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        Calendar::default().month_day_from_partial(&partial, overflow.unwrap_or_default())
    }

    /// Creates a new `PlainMonthDay` with the fields of `partial`, using the
    /// fields of this month-day for anything left unset.
    ///
    /// ```rust
    /// use temporal_iso::{partial::PartialDate, PlainMonthDay};
    ///
    /// let month_day = "01-15".parse::<PlainMonthDay>().unwrap();
    /// let result = month_day.with(PartialDate::new().with_day(Some(22)), None).unwrap();
    /// assert_eq!(result.to_string(), "01-22");
    /// ```
    pub fn with(
        &self,
        partial: PartialDate,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        if partial.is_empty() {
            return Err(TemporalError::r#type().with_enum(ErrorMessage::FieldsEmpty));
        }
        let fields = PartialDate::new()
            .with_month_code(Some(self.month_code()?))
            .with_day(Some(self.day()));
        let merged = self.calendar.merge_fields(&fields, &partial);
        self.calendar
            .month_day_from_partial(&merged, overflow.unwrap_or_default())
    }

    /// Returns the ISO day value of `PlainMonthDay`.
    #[inline]
    #[must_use]
    pub const fn iso_day(&self) -> u8 {
        self.iso.day
    }

    // Returns the ISO month value of `PlainMonthDay`.
    #[inline]
    #[must_use]
    pub const fn iso_month(&self) -> u8 {
        self.iso.month
    }

    // Returns the ISO reference year of `PlainMonthDay`.
    #[inline]
    #[must_use]
    pub const fn iso_year(&self) -> i32 {
        self.iso.year
    }

    /// Returns `PlainMonthDay`'s inner `Calendar`.
    #[inline]
    #[must_use]
    pub const fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Returns the calendar `monthCode` value of `PlainMonthDay`.
    #[inline]
    pub fn month_code(&self) -> TemporalResult<MonthCode> {
        self.calendar.month_code(&self.iso)
    }

    /// Returns the calendar day value of `PlainMonthDay`.
    #[inline]
    pub fn day(&self) -> u8 {
        self.calendar.day(&self.iso)
    }

    /// Creates the `PlainDate` for this month and day in `year`. A day that
    /// does not exist in `year` is constrained.
    ///
    /// ```rust
    /// use temporal_iso::PlainMonthDay;
    ///
    /// let leap_day = "--02-29".parse::<PlainMonthDay>().unwrap();
    /// assert_eq!(leap_day.to_plain_date(2023).unwrap().to_string(), "2023-02-28");
    /// assert_eq!(leap_day.to_plain_date(2024).unwrap().to_string(), "2024-02-29");
    /// ```
    pub fn to_plain_date(&self, year: i32) -> TemporalResult<PlainDate> {
        let partial = PartialDate::new()
            .with_year(Some(year))
            .with_month_code(Some(self.month_code()?))
            .with_day(Some(self.day()));
        self.calendar
            .date_from_partial(&partial, ArithmeticOverflow::Constrain)
    }

    /// Returns the RFC 9557 string of this month-day.
    pub fn to_ixdtf_string(&self, display_calendar: DisplayCalendar) -> String {
        FormattablePartialDate {
            kind: PartialDateKind::MonthDay,
            date: FormattableDate(self.iso.year, self.iso.month, self.iso.day),
            calendar: FormattableCalendar {
                show: display_calendar,
                calendar: self.calendar.identifier(),
            },
        }
        .to_string()
    }
}

impl FromStr for PlainMonthDay {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let record = parse_month_day(s.as_bytes())?;
        let calendar = calendar_from_record(record.calendar)?;
        let date = record.date.temporal_unwrap()?;

        Self::new_with_overflow(
            date.month,
            date.day,
            calendar,
            ArithmeticOverflow::Reject,
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn month_day_strings() {
        let md = "--12-25".parse::<PlainMonthDay>().unwrap();
        assert_eq!((md.iso_year(), md.iso_month(), md.iso_day()), (1972, 12, 25));
        assert_eq!(md.to_string(), "12-25");
        assert_eq!(
            md.to_ixdtf_string(DisplayCalendar::Always),
            "1972-12-25[u-ca=iso8601]"
        );

        let md = "12-25".parse::<PlainMonthDay>().unwrap();
        assert_eq!(md.month_code().unwrap().as_str(), "M12");

        // The year of a full date is only used for parsing.
        let md = "2021-07-04T12:00[u-ca=iso8601]".parse::<PlainMonthDay>().unwrap();
        assert_eq!((md.iso_year(), md.day()), (1972, 4));

        assert!("--02-30".parse::<PlainMonthDay>().is_err());
        assert!("--13-01".parse::<PlainMonthDay>().is_err());
    }

    #[test]
    fn month_day_from_partial() {
        let partial = PartialDate::new()
            .with_month_code(Some(MonthCode::from_month(2).unwrap()))
            .with_day(Some(29));
        let md = PlainMonthDay::from_partial(partial, None).unwrap();
        assert_eq!(md.to_string(), "02-29");

        // A year regulates the day before the reference year is applied.
        let partial = PartialDate::new()
            .with_year(Some(2021))
            .with_month(Some(2))
            .with_day(Some(29));
        let md = PlainMonthDay::from_partial(partial, None).unwrap();
        assert_eq!(md.to_string(), "02-28");
        assert!(PlainMonthDay::from_partial(partial, Some(ArithmeticOverflow::Reject)).is_err());

        // A month without a year is ambiguous.
        let partial = PartialDate::new().with_month(Some(2)).with_day(Some(1));
        assert!(PlainMonthDay::from_partial(partial, None).is_err());
    }

    #[test]
    fn month_day_with() {
        let md = PlainMonthDay::try_new(3, 31, Calendar::default()).unwrap();
        let result = md
            .with(
                PartialDate::new().with_month_code(Some(MonthCode::from_month(4).unwrap())),
                None,
            )
            .unwrap();
        assert_eq!(result.to_string(), "04-30");

        assert!(md.with(PartialDate::default(), None).is_err());
    }

    #[test]
    fn month_day_to_plain_date() {
        let md = PlainMonthDay::try_new(5, 15, Calendar::default()).unwrap();
        let date = md.to_plain_date(2025).unwrap();
        assert_eq!(
            (date.iso_year(), date.iso_month(), date.iso_day()),
            (2025, 5, 15)
        );
        assert!(md.to_plain_date(300_000).is_err());
    }

    #[test]
    fn month_day_equality() {
        let one = PlainMonthDay::try_new(7, 4, Calendar::default()).unwrap();
        let two = "07-04".parse::<PlainMonthDay>().unwrap();
        assert_eq!(one, two);
        let three =
            PlainMonthDay::new_with_overflow(7, 4, Calendar::default(), ArithmeticOverflow::Reject, Some(2000))
                .unwrap();
        assert_ne!(one, three);
    }
}
