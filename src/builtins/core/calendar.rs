//! This module implements the calendar engine and related components.
//!
//! `temporal_iso` supports the ISO 8601 calendar. The `Calendar` type is a
//! closed enum so further calendars can be introduced as new variants without
//! changing any caller.

use alloc::vec::Vec;
use core::str::FromStr;

use crate::{
    builtins::core::{
        duration::DateDuration, Duration, PlainDate, PlainDateTime, PlainMonthDay,
        PlainYearMonth,
    },
    error::ErrorMessage,
    fields::FieldKey,
    iso::IsoDate,
    options::{ArithmeticOverflow, TemporalUnit},
    parsers::parse_allowed_calendar_formats,
    utils, TemporalError, TemporalResult,
};

use super::{PartialDate, ZonedDateTime};

mod types;

pub(crate) use types::{ResolutionType, MONTH_DAY_REFERENCE_YEAR};
pub use types::{MonthCode, ResolvedCalendarFields};

/// The identifier of the ISO 8601 calendar.
pub const ISO_CALENDAR_IDENTIFIER: &str = "iso8601";

/// A Temporal calendar.
///
/// ```rust
/// use temporal_iso::Calendar;
/// use core::str::FromStr;
///
/// let calendar = Calendar::from_str("ISO8601").unwrap();
/// assert_eq!(calendar.identifier(), "iso8601");
/// assert!(Calendar::from_str("gregory").is_err());
/// ```
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Calendar {
    /// The proleptic Gregorian calendar with ISO 8601 week numbering.
    #[default]
    Iso,
}

impl Calendar {
    /// Returns a `Calendar` from a slice of UTF-8 encoded bytes.
    ///
    /// Calendar identifiers are ASCII case-insensitive.
    pub fn from_utf8(bytes: &[u8]) -> TemporalResult<Self> {
        if bytes.eq_ignore_ascii_case(ISO_CALENDAR_IDENTIFIER.as_bytes()) {
            return Ok(Self::Iso);
        }
        Err(TemporalError::range().with_enum(ErrorMessage::CalendarNameInvalid))
    }

    /// Returns the calendar identifier.
    #[inline]
    #[must_use]
    pub const fn identifier(&self) -> &'static str {
        match self {
            Self::Iso => ISO_CALENDAR_IDENTIFIER,
        }
    }

    /// Returns whether the current calendar is `ISO`
    #[inline]
    #[must_use]
    pub const fn is_iso(&self) -> bool {
        matches!(self, Self::Iso)
    }
}

impl FromStr for Calendar {
    type Err = TemporalError;

    // ParseTemporalCalendarString ( string )
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_allowed_calendar_formats(s) {
            Some([]) => Ok(Calendar::default()),
            Some(result) => Calendar::from_utf8(result),
            None => Calendar::from_utf8(s.as_bytes()),
        }
    }
}

impl core::fmt::Display for Calendar {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.identifier())
    }
}

// ==== Field resolution and arithmetic ====

impl Calendar {
    /// `CalendarDateFromFields`
    pub fn date_from_partial(
        &self,
        partial: &PartialDate,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<PlainDate> {
        let resolved =
            ResolvedCalendarFields::try_from_partial(partial, overflow, ResolutionType::Date)?;
        PlainDate::new_with_overflow(
            resolved.year,
            resolved.month_code.to_month_integer(),
            resolved.day,
            *self,
            overflow,
        )
    }

    /// `CalendarYearMonthFromFields`
    pub fn year_month_from_partial(
        &self,
        partial: &PartialDate,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<PlainYearMonth> {
        let resolved =
            ResolvedCalendarFields::try_from_partial(partial, overflow, ResolutionType::YearMonth)?;
        PlainYearMonth::new_with_overflow(
            resolved.year,
            resolved.month_code.to_month_integer(),
            Some(resolved.day),
            *self,
            overflow,
        )
    }

    /// `CalendarMonthDayFromFields`
    pub fn month_day_from_partial(
        &self,
        partial: &PartialDate,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<PlainMonthDay> {
        let resolved =
            ResolvedCalendarFields::try_from_partial(partial, overflow, ResolutionType::MonthDay)?;
        PlainMonthDay::new_with_overflow(
            resolved.month_code.to_month_integer(),
            resolved.day,
            *self,
            overflow,
            Some(resolved.year),
        )
    }

    /// `CalendarDateAdd`
    ///
    /// Adds a date duration to `date`. Any time portion must already have
    /// been balanced into `duration.days` by the caller.
    pub fn date_add(
        &self,
        date: &IsoDate,
        duration: &DateDuration,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<PlainDate> {
        // 1. Let result be ? AddISODate(date.[[ISOYear]], date.[[ISOMonth]], date.[[ISODay]],
        // duration.[[Years]], duration.[[Months]], duration.[[Weeks]], duration.[[Days]], overflow).
        let result = date.add_date_duration(duration, overflow)?;
        // 2. Return ? CreateTemporalDate(result.[[Year]], result.[[Month]], result.[[Day]], "iso8601").
        PlainDate::try_new(result.year, result.month, result.day, *self)
    }

    /// `CalendarDateUntil`
    pub fn date_until(
        &self,
        one: &IsoDate,
        two: &IsoDate,
        largest_unit: TemporalUnit,
    ) -> TemporalResult<Duration> {
        if !largest_unit.is_date_unit() {
            return Err(TemporalError::range().with_enum(ErrorMessage::UnitNotDate));
        }
        let date_duration = one.diff_iso_date(two, largest_unit)?;
        Ok(Duration::from(date_duration))
    }

    /// `CalendarMergeFields`
    ///
    /// Fields present on `additional` take precedence. When `additional`
    /// carries either `month` or `monthCode`, neither of the original month
    /// fields is kept.
    #[must_use]
    pub fn merge_fields(&self, fields: &PartialDate, additional: &PartialDate) -> PartialDate {
        let replaces_month = additional.month.is_some() || additional.month_code.is_some();
        let (month, month_code) = if replaces_month {
            (additional.month, additional.month_code)
        } else {
            (fields.month, fields.month_code)
        };

        PartialDate {
            year: additional.year.or(fields.year),
            month,
            month_code,
            day: additional.day.or(fields.day),
        }
    }

    /// `CalendarFields`
    ///
    /// Validates a list of field names, returning them in the order given.
    /// Unknown or repeated names are a `RangeError`.
    pub fn fields(&self, names: &[&str]) -> TemporalResult<Vec<FieldKey>> {
        let mut keys: Vec<FieldKey> = Vec::with_capacity(names.len());
        for name in names {
            let key = FieldKey::from_str(name)?;
            if keys.contains(&key) {
                return Err(TemporalError::range().with_message("Duplicate field name."));
            }
            keys.push(key);
        }
        Ok(keys)
    }
}

// ==== Calendar getters ====

impl Calendar {
    /// `CalendarYear`
    #[inline]
    #[must_use]
    pub fn year(&self, iso_date: &IsoDate) -> i32 {
        iso_date.year
    }

    /// `CalendarMonth`
    #[inline]
    #[must_use]
    pub fn month(&self, iso_date: &IsoDate) -> u8 {
        iso_date.month
    }

    /// `CalendarMonthCode`
    pub fn month_code(&self, iso_date: &IsoDate) -> TemporalResult<MonthCode> {
        MonthCode::from_month(iso_date.month)
    }

    /// `CalendarDay`
    #[inline]
    #[must_use]
    pub fn day(&self, iso_date: &IsoDate) -> u8 {
        iso_date.day
    }

    /// `CalendarDayOfWeek`, Monday is 1 and Sunday is 7.
    #[must_use]
    pub fn day_of_week(&self, iso_date: &IsoDate) -> u16 {
        utils::iso_day_of_week(iso_date.year, iso_date.month, iso_date.day)
    }

    /// `CalendarDayOfYear`
    #[must_use]
    pub fn day_of_year(&self, iso_date: &IsoDate) -> u16 {
        utils::iso_day_of_year(iso_date.year, iso_date.month, iso_date.day)
    }

    /// `CalendarWeekOfYear`
    #[must_use]
    pub fn week_of_year(&self, iso_date: &IsoDate) -> u16 {
        utils::iso_week_of_year(iso_date.year, iso_date.month, iso_date.day).0
    }

    /// `CalendarYearOfWeek`
    #[must_use]
    pub fn year_of_week(&self, iso_date: &IsoDate) -> i32 {
        utils::iso_week_of_year(iso_date.year, iso_date.month, iso_date.day).1
    }

    /// `CalendarDaysInWeek`
    #[inline]
    #[must_use]
    pub fn days_in_week(&self, _iso_date: &IsoDate) -> u16 {
        7
    }

    /// `CalendarDaysInMonth`
    #[must_use]
    pub fn days_in_month(&self, iso_date: &IsoDate) -> u16 {
        u16::from(utils::iso_days_in_month(iso_date.year, iso_date.month))
    }

    /// `CalendarDaysInYear`
    #[must_use]
    pub fn days_in_year(&self, iso_date: &IsoDate) -> u16 {
        utils::iso_days_in_year(iso_date.year)
    }

    /// `CalendarMonthsInYear`
    #[inline]
    #[must_use]
    pub fn months_in_year(&self, _iso_date: &IsoDate) -> u16 {
        12
    }

    /// `CalendarInLeapYear`
    #[must_use]
    pub fn in_leap_year(&self, iso_date: &IsoDate) -> bool {
        utils::is_leap(iso_date.year)
    }
}

impl From<PlainDate> for Calendar {
    fn from(value: PlainDate) -> Self {
        value.calendar()
    }
}

impl From<PlainDateTime> for Calendar {
    fn from(value: PlainDateTime) -> Self {
        value.calendar()
    }
}

impl From<ZonedDateTime> for Calendar {
    fn from(value: ZonedDateTime) -> Self {
        value.calendar()
    }
}

impl From<PlainMonthDay> for Calendar {
    fn from(value: PlainMonthDay) -> Self {
        value.calendar()
    }
}

impl From<PlainYearMonth> for Calendar {
    fn from(value: PlainYearMonth) -> Self {
        value.calendar()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        builtins::core::PartialDate, error::ErrorKind, fields::FieldKey, iso::IsoDate,
        options::TemporalUnit,
    };
    use core::str::FromStr;

    use super::{Calendar, MonthCode};

    #[test]
    fn calendar_from_str_is_case_insensitive() {
        let calendar = Calendar::from_utf8("iSo8601".as_bytes()).unwrap();
        assert_eq!(calendar, Calendar::default());

        let calendar = Calendar::from_str("ISO8601").unwrap();
        assert_eq!(calendar, Calendar::Iso);
    }

    #[test]
    fn calendar_invalid_identifiers() {
        let err = Calendar::from_str("gregory").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);

        // Non-ASCII case folding is not applied.
        let _err = Calendar::from_str("\u{0130}SO8601").unwrap_err();

        // An empty calendar annotation is an error.
        let _err = Calendar::from_str("2025-02-07T01:24:00-06:00[u-ca=]").unwrap_err();
    }

    #[test]
    fn calendar_from_annotated_string() {
        let calendar = Calendar::from_str("2025-02-07[u-ca=iso8601]").unwrap();
        assert_eq!(calendar, Calendar::Iso);

        let calendar = Calendar::from_str("2025-02-07").unwrap();
        assert_eq!(calendar, Calendar::Iso);
    }

    #[test]
    fn date_until_largest_year() {
        // tests format: (Date one, Date two, (years, months, weeks, days))
        let tests = [
            ((2021, 7, 16), (2021, 7, 16), (0, 0, 0, 0)),
            ((2021, 7, 16), (2021, 7, 17), (0, 0, 0, 1)),
            ((2021, 7, 16), (2021, 7, 23), (0, 0, 0, 7)),
            ((2021, 7, 16), (2021, 8, 16), (0, 1, 0, 0)),
            ((2020, 12, 16), (2021, 1, 16), (0, 1, 0, 0)),
            ((2021, 1, 5), (2021, 2, 5), (0, 1, 0, 0)),
            ((2021, 1, 7), (2021, 3, 7), (0, 2, 0, 0)),
            ((2021, 7, 16), (2021, 8, 17), (0, 1, 0, 1)),
            ((2021, 7, 16), (2021, 8, 13), (0, 0, 0, 28)),
            ((2021, 7, 16), (2022, 7, 16), (1, 0, 0, 0)),
            ((2021, 7, 16), (2031, 7, 16), (10, 0, 0, 0)),
            ((2021, 7, 16), (2022, 9, 19), (1, 2, 0, 3)),
            ((1997, 12, 16), (2021, 7, 16), (23, 7, 0, 0)),
            ((1997, 7, 16), (2021, 7, 15), (23, 11, 0, 29)),
            ((1997, 6, 16), (2021, 6, 15), (23, 11, 0, 30)),
            ((1960, 2, 16), (2020, 3, 16), (60, 1, 0, 0)),
            ((1960, 2, 16), (2021, 3, 15), (61, 0, 0, 27)),
            ((1960, 2, 16), (2020, 3, 15), (60, 0, 0, 28)),
            ((2021, 3, 30), (2021, 7, 16), (0, 3, 0, 16)),
            ((2020, 3, 30), (2021, 7, 16), (1, 3, 0, 16)),
            ((1960, 3, 30), (2021, 7, 16), (61, 3, 0, 16)),
            ((2019, 12, 30), (2021, 7, 16), (1, 6, 0, 16)),
            ((2020, 12, 30), (2021, 7, 16), (0, 6, 0, 16)),
            ((1997, 12, 30), (2021, 7, 16), (23, 6, 0, 16)),
            ((1, 12, 25), (2021, 7, 16), (2019, 6, 0, 21)),
            ((2019, 12, 30), (2021, 3, 5), (1, 2, 0, 5)),
            ((2021, 7, 17), (2021, 7, 16), (0, 0, 0, -1)),
            ((2021, 7, 23), (2021, 7, 16), (0, 0, 0, -7)),
            ((2021, 8, 16), (2021, 7, 16), (0, -1, 0, 0)),
            ((2021, 1, 16), (2020, 12, 16), (0, -1, 0, 0)),
            ((2021, 3, 7), (2021, 1, 7), (0, -2, 0, 0)),
            ((2021, 8, 17), (2021, 7, 16), (0, -1, 0, -1)),
            ((2022, 7, 16), (2021, 7, 16), (-1, 0, 0, 0)),
            ((2022, 9, 19), (2021, 7, 16), (-1, -2, 0, -3)),
            ((2021, 7, 16), (1997, 12, 16), (-23, -7, 0, 0)),
            ((2021, 7, 15), (1997, 7, 16), (-23, -11, 0, -30)),
            ((2021, 7, 16), (2019, 12, 30), (-1, -6, 0, -17)),
            ((2021, 3, 5), (2019, 12, 30), (-1, -2, 0, -6)),
        ];

        let calendar = Calendar::default();
        for (one, two, expected) in tests {
            let first = IsoDate::new_unchecked(one.0, one.1, one.2);
            let second = IsoDate::new_unchecked(two.0, two.1, two.2);
            let result = calendar
                .date_until(&first, &second, TemporalUnit::Year)
                .unwrap();
            assert_eq!(
                (
                    result.years() as i32,
                    result.months() as i32,
                    result.weeks() as i32,
                    result.days() as i32,
                ),
                expected,
                "{first:?} until {second:?}",
            );
        }
    }

    #[test]
    fn date_until_weeks_and_days() {
        let calendar = Calendar::default();
        let one = IsoDate::new_unchecked(2024, 1, 1);
        let two = IsoDate::new_unchecked(2024, 3, 1);

        let weeks = calendar.date_until(&one, &two, TemporalUnit::Week).unwrap();
        assert_eq!((weeks.weeks(), weeks.days()), (8.0, 4.0));

        let days = calendar.date_until(&one, &two, TemporalUnit::Day).unwrap();
        assert_eq!(days.days(), 60.0);

        assert!(calendar.date_until(&one, &two, TemporalUnit::Hour).is_err());
    }

    #[test]
    fn getters() {
        let calendar = Calendar::default();
        let date = IsoDate::new_unchecked(2024, 2, 29);
        assert_eq!(calendar.year(&date), 2024);
        assert_eq!(calendar.month(&date), 2);
        assert_eq!(calendar.month_code(&date).unwrap().as_str(), "M02");
        assert_eq!(calendar.day(&date), 29);
        assert_eq!(calendar.day_of_week(&date), 4);
        assert_eq!(calendar.day_of_year(&date), 60);
        assert_eq!(calendar.days_in_week(&date), 7);
        assert_eq!(calendar.days_in_month(&date), 29);
        assert_eq!(calendar.days_in_year(&date), 366);
        assert_eq!(calendar.months_in_year(&date), 12);
        assert!(calendar.in_leap_year(&date));

        // 2021-01-01 belongs to the last ISO week of 2020.
        let date = IsoDate::new_unchecked(2021, 1, 1);
        assert_eq!(calendar.week_of_year(&date), 53);
        assert_eq!(calendar.year_of_week(&date), 2020);

        let non_leap = IsoDate::new_unchecked(1900, 2, 1);
        assert_eq!(calendar.days_in_month(&non_leap), 28);
        assert!(!calendar.in_leap_year(&non_leap));
    }

    #[test]
    fn merge_fields_drops_original_month_pair() {
        let calendar = Calendar::default();
        let fields = PartialDate {
            year: Some(2020),
            month: Some(5),
            month_code: Some(MonthCode::from_str("M05").unwrap()),
            day: Some(10),
        };

        let additional = PartialDate {
            month_code: Some(MonthCode::from_str("M07").unwrap()),
            ..Default::default()
        };
        let merged = calendar.merge_fields(&fields, &additional);
        assert_eq!(merged.year, Some(2020));
        assert_eq!(merged.month, None);
        assert_eq!(merged.month_code.map(|c| c.to_month_integer()), Some(7));
        assert_eq!(merged.day, Some(10));

        let additional = PartialDate {
            day: Some(1),
            ..Default::default()
        };
        let merged = calendar.merge_fields(&fields, &additional);
        assert_eq!(merged.month, Some(5));
        assert_eq!(merged.day, Some(1));
    }

    #[test]
    fn date_from_partial_overflow() {
        use crate::options::ArithmeticOverflow;

        let calendar = Calendar::default();
        let partial = PartialDate {
            year: Some(2021),
            month: Some(2),
            day: Some(31),
            ..Default::default()
        };
        let date = calendar
            .date_from_partial(&partial, ArithmeticOverflow::Constrain)
            .unwrap();
        assert_eq!(date.day(), 28);

        let err = calendar
            .date_from_partial(&partial, ArithmeticOverflow::Reject)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn fields_validation() {
        let calendar = Calendar::default();
        let keys = calendar.fields(&["day", "monthCode", "year"]).unwrap();
        assert_eq!(keys, [FieldKey::Day, FieldKey::MonthCode, FieldKey::Year]);

        assert!(calendar.fields(&["day", "day"]).is_err());
        assert!(calendar.fields(&["days"]).is_err());
    }
}
