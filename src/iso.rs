//! This module implements the internal ISO field slots.
//!
//! The three main types of slots are:
//!   - `IsoDateTime`
//!   - `IsoDate`
//!   - `IsoTime`
//!
//! An `IsoDate` represents the `[[ISOYear]]`, `[[ISOMonth]]`, and `[[ISODay]]` internal slots.
//!
//! An `IsoTime` represents the `[[ISOHour]]`, `[[ISOMinute]]`, `[[ISOsecond]]`, `[[ISOmillisecond]]`,
//! `[[ISOmicrosecond]]`, and `[[ISOnanosecond]]` internal slots.
//!
//! An `IsoDateTime` has the internal slots of both an `IsoDate` and `IsoTime`.
//!
//! All conversions are carried out on integer epoch days and nanoseconds.

use core::num::NonZeroU128;

use core_maths::CoreFloat;
use num_traits::ToPrimitive;
use timezone_provider::{epoch_nanoseconds::EpochNanoseconds, provider};

use crate::{
    builtins::core::{
        calendar::Calendar,
        duration::{
            normalized::{NormalizedDurationRecord, NormalizedTimeDuration},
            DateDuration,
        },
        PartialTime,
    },
    error::{ErrorMessage, TemporalError},
    options::{ArithmeticOverflow, ResolvedRoundingOptions, TemporalUnit},
    rounding::IncrementRounder,
    utils, TemporalResult, TemporalUnwrap, NS_MAX_INSTANT, NS_MIN_INSTANT, NS_PER_DAY,
};

/// Epoch days beyond which no date arithmetic is attempted.
///
/// This is roughly ten times the representable range, which keeps every
/// intermediate year inside an `i32`.
const MAX_BALANCE_EPOCH_DAYS: i64 = 1_000_000_000;

/// `IsoDateTime` is the record of the `IsoDate` and `IsoTime` internal slots.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDateTime {
    pub date: IsoDate,
    pub time: IsoTime,
}

impl IsoDateTime {
    /// Creates a new `IsoDateTime` without any validation.
    pub(crate) const fn new_unchecked(date: IsoDate, time: IsoTime) -> Self {
        Self { date, time }
    }

    /// Creates a new validated `IsoDateTime` that is within valid limits.
    pub fn new(date: IsoDate, time: IsoTime) -> TemporalResult<Self> {
        if !iso_dt_within_valid_limits(date, &time) {
            return Err(TemporalError::range().with_enum(ErrorMessage::DateTimeOutOfRange));
        }
        Ok(Self::new_unchecked(date, time))
    }

    /// Creates the local `IsoDateTime` for epoch nanoseconds shifted by an
    /// offset in nanoseconds.
    ///
    /// Equivalent to `GetISOPartsFromEpoch` applied to `epochNs + offsetNs`.
    pub(crate) fn from_epoch_nanos(nanos: i128, offset: i128) -> TemporalResult<Self> {
        let local = nanos
            .checked_add(offset)
            .ok_or(TemporalError::range().with_enum(ErrorMessage::InstantOutOfRange))?;
        let ns_per_day = i128::from(NS_PER_DAY);
        let epoch_days = local
            .div_euclid(ns_per_day)
            .to_i64()
            .ok_or(TemporalError::range().with_enum(ErrorMessage::InstantOutOfRange))?;
        if epoch_days.abs() > MAX_BALANCE_EPOCH_DAYS {
            return Err(TemporalError::range().with_enum(ErrorMessage::InstantOutOfRange));
        }
        // The remainder is less than a day, which fits an i64.
        let time = IsoTime::from_nanoseconds_of_day(local.rem_euclid(ns_per_day) as i64);
        Ok(Self::new_unchecked(IsoDate::from_epoch_days(epoch_days), time))
    }

    /// Returns whether the `IsoDateTime` is within valid limits.
    pub(crate) fn is_within_limits(&self) -> bool {
        iso_dt_within_valid_limits(self.date, &self.time)
    }

    /// Returns this `IsoDateTime` in nanoseconds as though the local time were UTC.
    #[must_use]
    pub fn as_nanoseconds(&self) -> EpochNanoseconds {
        EpochNanoseconds::from(utc_epoch_nanos(self.date, &self.time))
    }

    /// `AddDateTime`
    pub(crate) fn add_date_duration(
        &self,
        calendar: Calendar,
        date_duration: &DateDuration,
        norm: NormalizedTimeDuration,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        // 1. Assert: IsValidISODate(year, month, day) is true.
        // 2. Assert: ISODateTimeWithinLimits(...) is true.
        // 3. Let timeResult be AddTime(hour, minute, second, millisecond, microsecond, nanosecond, norm).
        let (days, time) = self.time.add(norm);

        // 4. Let datePart be ! CreateTemporalDate(year, month, day, calendarRec.[[Receiver]]).
        // 5. Let dateDuration be ? CreateTemporalDuration(years, months, weeks, days + timeResult.[[Days]], 0, 0, 0, 0, 0, 0).
        let date_duration = DateDuration::new(
            date_duration.years,
            date_duration.months,
            date_duration.weeks,
            date_duration.days + days as f64,
        )?;

        // 6. Let addedDate be ? AddDate(calendarRec, datePart, dateDuration, options).
        let added_date = calendar.date_add(
            &self.date,
            &date_duration,
            overflow.unwrap_or(ArithmeticOverflow::Constrain),
        )?;

        // 7. Return ISO Date-Time Record { ... }.
        Ok(Self::new_unchecked(added_date.iso, time))
    }

    /// `RoundISODateTime`
    pub(crate) fn round(&self, resolved_options: ResolvedRoundingOptions) -> TemporalResult<Self> {
        let (rounded_days, rounded_time) = self.time.round(resolved_options)?;
        let balance_result = IsoDate::balance(
            self.date.year,
            self.date.month.into(),
            i64::from(self.date.day) + rounded_days,
        )?;
        Self::new(balance_result, rounded_time)
    }

    /// `DifferenceISODateTime`
    pub(crate) fn diff(
        &self,
        other: &Self,
        calendar: Calendar,
        largest_unit: TemporalUnit,
    ) -> TemporalResult<NormalizedDurationRecord> {
        // 1. Assert: ISODateTimeWithinLimits(y1, ...) is true.
        // 2. Assert: ISODateTimeWithinLimits(y2, ...) is true.
        // 3. Let timeDuration be DifferenceTime(h1, min1, s1, ms1, mus1, ns1, h2, min2, s2, ms2, mus2, ns2).
        let mut time_duration = self.time.diff(&other.time);

        // 4. Let timeSign be NormalizedTimeDurationSign(timeDuration).
        let time_sign = time_duration.sign() as i8;

        // 5. Let dateSign be CompareISODate(y2, mon2, d2, y1, mon1, d1).
        let date_sign = other.date.cmp(&self.date) as i8;

        // 6. Let adjustedDate be CreateISODateRecord(y2, mon2, d2).
        let mut adjusted_date = other.date;

        // 7. If timeSign = -dateSign, then
        if time_sign != 0 && time_sign == -date_sign {
            // a. Set adjustedDate to BalanceISODate(adjustedDate.[[Year]], adjustedDate.[[Month]], adjustedDate.[[Day]] + timeSign).
            adjusted_date = IsoDate::balance(
                adjusted_date.year,
                i32::from(adjusted_date.month),
                i64::from(adjusted_date.day) + i64::from(time_sign),
            )?;
            // b. Set timeDuration to ? Add24HourDaysToNormalizedTimeDuration(timeDuration, -timeSign).
            time_duration = time_duration.add_days(-i64::from(time_sign))?;
        }

        // 8. Let dateLargestUnit be LargerOfTwoTemporalUnits("day", largestUnit).
        let date_largest_unit = largest_unit.max(TemporalUnit::Day);

        // 9. Let dateDifference be ? DifferenceDate(calendarRec, date1, date2, untilOptions).
        let date_diff = calendar.date_until(&self.date, &adjusted_date, date_largest_unit)?;

        // 10. Let days be dateDifference.[[Days]].
        // 11. If largestUnit is not dateLargestUnit, then
        let days = if largest_unit == date_largest_unit {
            date_diff.days()
        } else {
            // a. Set timeDuration to ? Add24HourDaysToNormalizedTimeDuration(timeDuration, dateDifference.[[Days]]).
            let days = date_diff
                .days()
                .to_i64()
                .ok_or(TemporalError::range().with_enum(ErrorMessage::NumberOutOfRange))?;
            time_duration = time_duration.add_days(days)?;
            // b. Set days to 0.
            0.0
        };

        // 12. Return ? CreateNormalizedDurationRecord(dateDifference.[[Years]], dateDifference.[[Months]], dateDifference.[[Weeks]], days, timeDuration).
        NormalizedDurationRecord::new(
            DateDuration::new_unchecked(
                date_diff.years(),
                date_diff.months(),
                date_diff.weeks(),
                days,
            ),
            time_duration,
        )
    }
}

impl From<IsoDateTime> for provider::IsoDateTime {
    fn from(value: IsoDateTime) -> Self {
        Self {
            year: value.date.year,
            month: value.date.month,
            day: value.date.day,
            hour: value.time.hour,
            minute: value.time.minute,
            second: value.time.second,
            millisecond: value.time.millisecond,
            microsecond: value.time.microsecond,
            nanosecond: value.time.nanosecond,
        }
    }
}

// ==== `IsoDate` section ====

/// `IsoDate` serves as a record for the `[[ISOYear]]`, `[[ISOMonth]]`,
/// and `[[ISODay]]` internal fields.
///
/// These fields are used for the `Temporal.PlainDate` object, the
/// `Temporal.YearMonth` object, and the `Temporal.MonthDay` object.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl Default for IsoDate {
    fn default() -> Self {
        Self::new_unchecked(1970, 1, 1)
    }
}

impl IsoDate {
    /// Creates a new `IsoDate` without determining the validity.
    pub(crate) const fn new_unchecked(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// `RegulateISODate` followed by a range check.
    pub(crate) fn new_with_overflow(
        year: i32,
        month: i32,
        day: i32,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<Self> {
        let id = Self::regulate(year, month, day, overflow)?;
        id.check_within_limits()?;
        Ok(id)
    }

    /// `RegulateISODate`
    pub(crate) fn regulate(
        year: i32,
        month: i32,
        day: i32,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<Self> {
        let id = match overflow {
            ArithmeticOverflow::Constrain => {
                let month = month.clamp(1, 12) as u8;
                let day = constrain_iso_day(year, month, day);
                Self::new_unchecked(year, month, day)
            }
            ArithmeticOverflow::Reject => {
                if !is_valid_date(year, month, day) {
                    return Err(TemporalError::range().with_message("not a valid ISO date."));
                }
                // NOTE: Values have been verified to be in a u8 range.
                Self::new_unchecked(year, month as u8, day as u8)
            }
        };
        Ok(id)
    }

    /// Creates the `IsoDate` for a count of days since 1970-01-01.
    pub(crate) fn from_epoch_days(epoch_days: i64) -> Self {
        let (year, month, day) = utils::ymd_from_epoch_days(epoch_days);
        Self::new_unchecked(year, month, day)
    }

    /// Create a balanced `IsoDate`
    ///
    /// Equivalent to `BalanceISODate`.
    pub(crate) fn balance(year: i32, month: i32, day: i64) -> TemporalResult<Self> {
        let (year, month) = balance_iso_year_month(i64::from(year), i64::from(month))?;
        let epoch_days = utils::epoch_days_from_gregorian_date(year, month, 1)
            .checked_add(day - 1)
            .ok_or(TemporalError::range().with_enum(ErrorMessage::DateOutOfRange))?;
        if epoch_days.abs() > MAX_BALANCE_EPOCH_DAYS {
            return Err(TemporalError::range().with_enum(ErrorMessage::DateOutOfRange));
        }
        Ok(Self::from_epoch_days(epoch_days))
    }

    /// Returns an error unless the date at noon lies within the representable range.
    pub(crate) fn check_within_limits(&self) -> TemporalResult<()> {
        if !iso_dt_within_valid_limits(*self, &IsoTime::noon()) {
            return Err(TemporalError::range().with_enum(ErrorMessage::DateOutOfRange));
        }
        Ok(())
    }

    /// Equivalent to `ISOYearMonthWithinLimits`.
    pub(crate) fn check_year_month_within_limits(&self) -> TemporalResult<()> {
        // 1. If isoDate.[[Year]] < -271821 or isoDate.[[Year]] > 275760, then
        //    a. Return false.
        // 2. If isoDate.[[Year]] = -271821 and isoDate.[[Month]] < 4, then
        //    a. Return false.
        // 3. If isoDate.[[Year]] = 275760 and isoDate.[[Month]] > 9, then
        //    a. Return false.
        let within = match self.year {
            -271_821 => self.month >= 4,
            275_760 => self.month <= 9,
            year => (-271_821..=275_760).contains(&year),
        };
        if !within {
            return Err(TemporalError::range().with_enum(ErrorMessage::DateOutOfRange));
        }
        Ok(())
    }

    /// Equivalent to `ISODateToEpochDays`
    #[inline]
    #[must_use]
    pub fn to_epoch_days(self) -> i64 {
        utils::epoch_days_from_gregorian_date(self.year, self.month, self.day)
    }

    /// Returns if the current `IsoDate` is valid.
    pub(crate) fn is_valid(self) -> bool {
        is_valid_date(self.year, self.month.into(), self.day.into())
    }

    /// `AddISODate`
    pub(crate) fn add_date_duration(
        self,
        duration: &DateDuration,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<Self> {
        let years = integral_date_value(duration.years)?;
        let months = integral_date_value(duration.months)?;
        let weeks = integral_date_value(duration.weeks)?;
        let days = integral_date_value(duration.days)?;

        // 1. Assert: year, month, day, years, months, weeks, and days are integers.
        // 2. Assert: overflow is either "constrain" or "reject".
        // 3. Let intermediate be ! BalanceISOYearMonth(year + years, month + months).
        let (year, month) = balance_iso_year_month(
            i64::from(self.year) + years,
            i64::from(self.month) + months,
        )?;

        // 4. Let intermediate be ? RegulateISODate(intermediate.[[Year]], intermediate.[[Month]], day, overflow).
        let intermediate =
            Self::new_with_overflow(year, month.into(), i32::from(self.day), overflow)?;

        // 5. Set days to days + 7 × weeks.
        // 6. Let d be intermediate.[[Day]] + days.
        let d = weeks
            .checked_mul(7)
            .and_then(|w| w.checked_add(days))
            .and_then(|d| d.checked_add(i64::from(intermediate.day)))
            .ok_or(TemporalError::range().with_enum(ErrorMessage::DateOutOfRange))?;

        // 7. Return BalanceISODate(intermediate.[[Year]], intermediate.[[Month]], d).
        let result = Self::balance(intermediate.year, intermediate.month.into(), d)?;
        result.check_within_limits()?;
        Ok(result)
    }

    /// `DifferenceISODate`
    pub(crate) fn diff_iso_date(
        &self,
        other: &Self,
        largest_unit: TemporalUnit,
    ) -> TemporalResult<DateDuration> {
        // 1. Assert: IsValidISODate(y1, m1, d1) is true.
        // 2. Assert: IsValidISODate(y2, m2, d2) is true.
        // 3. Let sign be -CompareISODate(y1, m1, d1, y2, m2, d2).
        let sign = -(self.cmp(other) as i8);
        // 4. If sign = 0, return ! CreateDateDurationRecord(0, 0, 0, 0).
        if sign == 0 {
            return Ok(DateDuration::default());
        };

        // 5. Let years be 0.
        let mut years = 0;
        // 7. Let months be 0.
        let mut months = 0;
        // 6. If largestUnit is "year", then
        if largest_unit == TemporalUnit::Year {
            // The candidate search starts one year short of the plain year
            // difference; every smaller candidate is known not to surpass.
            let mut candidate_years: i32 = other.year - self.year;
            if candidate_years != 0 {
                candidate_years -= i32::from(sign);
            }
            // b. Repeat, while ISODateSurpasses(sign, y1 + candidateYears, m1, d1, y2, m2, d2) is false,
            while !iso_date_surpasses(
                &IsoDate::new_unchecked(self.year + candidate_years, self.month, self.day),
                other,
                sign,
            ) {
                // i. Set years to candidateYears.
                years = candidate_years;
                // ii. Set candidateYears to candidateYears + sign.
                candidate_years += i32::from(sign);
            }
        }

        // 8. If largestUnit is "year" or largestUnit is "month", then
        if largest_unit == TemporalUnit::Year || largest_unit == TemporalUnit::Month {
            // a. Let candidateMonths be sign.
            let mut candidate_months: i32 = (other.year - (self.year + years)) * 12
                + i32::from(other.month)
                - i32::from(self.month);
            if candidate_months != 0 {
                candidate_months -= i32::from(sign);
            }
            // c. Repeat, while ISODateSurpasses(sign, intermediate.[[Year]], intermediate.[[Month]], d1, y2, m2, d2) is false,
            loop {
                // b. Let intermediate be BalanceISOYearMonth(y1 + years, m1 + candidateMonths).
                let (year, month) = balance_iso_year_month(
                    i64::from(self.year + years),
                    i64::from(self.month) + i64::from(candidate_months),
                )?;
                if iso_date_surpasses(&IsoDate::new_unchecked(year, month, self.day), other, sign)
                {
                    break;
                }
                // i. Set months to candidateMonths.
                months = candidate_months;
                // ii. Set candidateMonths to candidateMonths + sign.
                candidate_months += i32::from(sign);
            }
        }

        // 9. Set intermediate to BalanceISOYearMonth(y1 + years, m1 + months).
        let (year, month) = balance_iso_year_month(
            i64::from(self.year + years),
            i64::from(self.month) + i64::from(months),
        )?;
        // 10. Let constrained be ! RegulateISODate(intermediate.[[Year]], intermediate.[[Month]], d1, "constrain").
        let constrained =
            Self::new_unchecked(year, month, constrain_iso_day(year, month, self.day.into()));

        // 11. Let weeks be 0.
        // 12. Let days be ISODateToEpochDays(y2, m2 - 1, d2) - ISODateToEpochDays(constrained...).
        let days = other.to_epoch_days() - constrained.to_epoch_days();

        // 13. If largestUnit is "week", then
        let (weeks, days) = if largest_unit == TemporalUnit::Week {
            // a. Set weeks to truncate(days / 7).
            // b. Set days to remainder(days, 7).
            (days / 7, days % 7)
        } else {
            (0, days)
        };

        // 14. Return ! CreateDateDurationRecord(years, months, weeks, days).
        Ok(DateDuration::new_unchecked(
            f64::from(years),
            f64::from(months),
            weeks as f64,
            days as f64,
        ))
    }
}

// ==== `IsoTime` section ====

/// An `IsoTime` record that contains `Temporal`'s
/// time slots.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoTime {
    pub hour: u8,         // 0..=23
    pub minute: u8,       // 0..=59
    pub second: u8,       // 0..=59
    pub millisecond: u16, // 0..=999
    pub microsecond: u16, // 0..=999
    pub nanosecond: u16,  // 0..=999
}

impl IsoTime {
    /// Creates a new `IsoTime` without any validation.
    pub(crate) const fn new_unchecked(
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
        microsecond: u16,
        nanosecond: u16,
    ) -> Self {
        Self {
            hour,
            minute,
            second,
            millisecond,
            microsecond,
            nanosecond,
        }
    }

    /// Creates a new regulated `IsoTime`.
    pub fn new(
        hour: i32,
        minute: i32,
        second: i32,
        millisecond: i32,
        microsecond: i32,
        nanosecond: i32,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<IsoTime> {
        match overflow {
            ArithmeticOverflow::Constrain => {
                let h = hour.clamp(0, 23) as u8;
                let min = minute.clamp(0, 59) as u8;
                let sec = second.clamp(0, 59) as u8;
                let milli = millisecond.clamp(0, 999) as u16;
                let micro = microsecond.clamp(0, 999) as u16;
                let nano = nanosecond.clamp(0, 999) as u16;
                Ok(Self::new_unchecked(h, min, sec, milli, micro, nano))
            }
            ArithmeticOverflow::Reject => {
                if !is_valid_time(hour, minute, second, millisecond, microsecond, nanosecond) {
                    return Err(TemporalError::range().with_message("IsoTime is not valid"));
                };
                Ok(Self::new_unchecked(
                    hour as u8,
                    minute as u8,
                    second as u8,
                    millisecond as u16,
                    microsecond as u16,
                    nanosecond as u16,
                ))
            }
        }
    }

    /// Creates a new `Time` with the fields provided from a `PartialTime`.
    #[inline]
    pub(crate) fn with(
        &self,
        partial: PartialTime,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<Self> {
        Self::new(
            partial.hour.map_or(self.hour.into(), i32::from),
            partial.minute.map_or(self.minute.into(), i32::from),
            partial.second.map_or(self.second.into(), i32::from),
            partial.millisecond.map_or(self.millisecond.into(), i32::from),
            partial.microsecond.map_or(self.microsecond.into(), i32::from),
            partial.nanosecond.map_or(self.nanosecond.into(), i32::from),
            overflow,
        )
    }

    /// Returns an `IsoTime` set to 12:00:00
    pub(crate) const fn noon() -> Self {
        Self::new_unchecked(12, 0, 0, 0, 0, 0)
    }

    /// Returns an `IsoTime` from parsed components, where `fraction` is
    /// the fractional second in nanoseconds.
    pub(crate) fn from_components(
        hour: u8,
        minute: u8,
        second: u8,
        fraction: u32,
    ) -> TemporalResult<Self> {
        // A leap second is read as the last second of the minute.
        let second = second.min(59);
        let millisecond = fraction / 1_000_000;
        let microsecond = (fraction / 1_000) % 1_000;
        let nanosecond = fraction % 1_000;

        Self::new(
            hour.into(),
            minute.into(),
            second.into(),
            millisecond as i32,
            microsecond as i32,
            nanosecond as i32,
            ArithmeticOverflow::Reject,
        )
    }

    /// Creates an `IsoTime` from nanoseconds since midnight.
    ///
    /// `nanos` must be within `0..NS_PER_DAY`.
    pub(crate) fn from_nanoseconds_of_day(nanos: i64) -> Self {
        debug_assert!((0..NS_PER_DAY as i64).contains(&nanos));
        let (_, time) = Self::balance(0, 0, 0, 0, 0, nanos);
        time
    }

    /// Balances and creates a new `IsoTime` with `day` overflow from the provided values.
    ///
    /// Equivalent to `BalanceTime`.
    pub(crate) fn balance(
        hour: i64,
        minute: i64,
        second: i64,
        millisecond: i64,
        microsecond: i64,
        nanosecond: i64,
    ) -> (i64, Self) {
        // 1. Set microsecond to microsecond + floor(nanosecond / 1000).
        // 2. Set nanosecond to nanosecond modulo 1000.
        let (quotient, nanosecond) = div_mod(nanosecond, 1000);
        let microsecond = microsecond + quotient;

        // 3. Set millisecond to millisecond + floor(microsecond / 1000).
        // 4. Set microsecond to microsecond modulo 1000.
        let (quotient, microsecond) = div_mod(microsecond, 1000);
        let millisecond = millisecond + quotient;

        // 5. Set second to second + floor(millisecond / 1000).
        // 6. Set millisecond to millisecond modulo 1000.
        let (quotient, millisecond) = div_mod(millisecond, 1000);
        let second = second + quotient;

        // 7. Set minute to minute + floor(second / 60).
        // 8. Set second to second modulo 60.
        let (quotient, second) = div_mod(second, 60);
        let minute = minute + quotient;

        // 9. Set hour to hour + floor(minute / 60).
        // 10. Set minute to minute modulo 60.
        let (quotient, minute) = div_mod(minute, 60);
        let hour = hour + quotient;

        // 11. Let days be floor(hour / 24).
        // 12. Set hour to hour modulo 24.
        let (days, hour) = div_mod(hour, 24);

        let time = Self::new_unchecked(
            hour as u8,
            minute as u8,
            second as u8,
            millisecond as u16,
            microsecond as u16,
            nanosecond as u16,
        );

        (days, time)
    }

    /// `DifferenceTime`: the normalized duration from this time to `other`.
    pub(crate) fn diff(&self, other: &Self) -> NormalizedTimeDuration {
        NormalizedTimeDuration(
            i128::from(other.to_nanoseconds()) - i128::from(self.to_nanoseconds()),
        )
    }

    /// Rounds the current `IsoTime` according to the provided settings.
    ///
    /// Equivalent to `RoundTime`, returning the day carry alongside the time.
    pub(crate) fn round(
        &self,
        resolved_options: ResolvedRoundingOptions,
    ) -> TemporalResult<(i64, Self)> {
        let (hour, minute, second) = (
            i128::from(self.hour),
            i128::from(self.minute),
            i128::from(self.second),
        );
        let (millis, micros, nanos) = (
            i128::from(self.millisecond),
            i128::from(self.microsecond),
            i128::from(self.nanosecond),
        );
        let quantity = match resolved_options.smallest_unit {
            // 1. If unit is "day" or "hour", then
            // a. Let quantity be ((((hour × 60 + minute) × 60 + second) × 1000 + millisecond)
            // × 1000 + microsecond) × 1000 + nanosecond.
            TemporalUnit::Day | TemporalUnit::Hour => {
                ((((hour * 60 + minute) * 60 + second) * 1000 + millis) * 1000 + micros) * 1000
                    + nanos
            }
            // 2. Else if unit is "minute", then
            // a. Let quantity be (((minute × 60 + second) × 1000 + millisecond) × 1000 + microsecond) × 1000 + nanosecond.
            TemporalUnit::Minute => {
                (((minute * 60 + second) * 1000 + millis) * 1000 + micros) * 1000 + nanos
            }
            // 3. Else if unit is "second", then
            // a. Let quantity be ((second × 1000 + millisecond) × 1000 + microsecond) × 1000 + nanosecond.
            TemporalUnit::Second => ((second * 1000 + millis) * 1000 + micros) * 1000 + nanos,
            // 4. Else if unit is "millisecond", then
            // a. Let quantity be (millisecond × 1000 + microsecond) × 1000 + nanosecond.
            TemporalUnit::Millisecond => (millis * 1000 + micros) * 1000 + nanos,
            // 5. Else if unit is "microsecond", then
            // a. Let quantity be microsecond × 1000 + nanosecond.
            TemporalUnit::Microsecond => micros * 1000 + nanos,
            // 6. Else,
            // a. Assert: unit is "nanosecond".
            // b. Let quantity be nanosecond.
            TemporalUnit::Nanosecond => nanos,
            _ => return Err(TemporalError::range().with_enum(ErrorMessage::RoundToUnitInvalid)),
        };

        // 7. Let unitLength be the value in the "Length in Nanoseconds" column of the row of Table 22 whose "Singular" column contains unit.
        let length = NonZeroU128::new(
            resolved_options
                .smallest_unit
                .as_nanoseconds()
                .temporal_unwrap()?
                .into(),
        )
        .temporal_unwrap()?;

        let increment = resolved_options
            .increment
            .as_extended_increment()
            .checked_mul(length)
            .ok_or(TemporalError::range().with_enum(ErrorMessage::RoundingIncrementInvalid))?;

        // 8. Let result be RoundNumberToIncrement(quantity, increment × unitLength, roundingMode) / unitLength.
        let result = IncrementRounder::from_signed_num(quantity, increment)?
            .round(resolved_options.rounding_mode)
            / length.get() as i128;

        // The quantity is bounded by a day, so the result fits an i64.
        let result = result as i64;

        let (hour, minute, second) = (
            i64::from(self.hour),
            i64::from(self.minute),
            i64::from(self.second),
        );
        let (millis, micros) = (i64::from(self.millisecond), i64::from(self.microsecond));

        match resolved_options.smallest_unit {
            // 9. If unit is "day", then
            // a. Return Time Record { [[Days]]: result, [[Hour]]: 0, ... }.
            TemporalUnit::Day => Ok((result, Self::default())),
            // 10. If unit is "hour", then
            // a. Return BalanceTime(result, 0, 0, 0, 0, 0).
            TemporalUnit::Hour => Ok(Self::balance(result, 0, 0, 0, 0, 0)),
            // 11. If unit is "minute", then
            // a. Return BalanceTime(hour, result, 0, 0, 0, 0).
            TemporalUnit::Minute => Ok(Self::balance(hour, result, 0, 0, 0, 0)),
            // 12. If unit is "second", then
            // a. Return BalanceTime(hour, minute, result, 0, 0, 0).
            TemporalUnit::Second => Ok(Self::balance(hour, minute, result, 0, 0, 0)),
            // 13. If unit is "millisecond", then
            // a. Return BalanceTime(hour, minute, second, result, 0, 0).
            TemporalUnit::Millisecond => Ok(Self::balance(hour, minute, second, result, 0, 0)),
            // 14. If unit is "microsecond", then
            // a. Return BalanceTime(hour, minute, second, millisecond, result, 0).
            TemporalUnit::Microsecond => {
                Ok(Self::balance(hour, minute, second, millis, result, 0))
            }
            // 15. Assert: unit is "nanosecond".
            // 16. Return BalanceTime(hour, minute, second, millisecond, microsecond, result).
            TemporalUnit::Nanosecond => {
                Ok(Self::balance(hour, minute, second, millis, micros, result))
            }
            _ => Err(TemporalError::assert()),
        }
    }

    /// `AddTime`
    pub(crate) fn add(&self, norm: NormalizedTimeDuration) -> (i64, Self) {
        // 1. Set second to second + NormalizedTimeDurationSeconds(norm).
        let seconds = i64::from(self.second) + norm.seconds();
        // 2. Set nanosecond to nanosecond + NormalizedTimeDurationSubseconds(norm).
        let nanos = i64::from(self.nanosecond) + i64::from(norm.subseconds());
        // 3. Return BalanceTime(hour, minute, second, millisecond, microsecond, nanosecond).
        Self::balance(
            self.hour.into(),
            self.minute.into(),
            seconds,
            self.millisecond.into(),
            self.microsecond.into(),
            nanos,
        )
    }

    /// Returns the nanoseconds elapsed since midnight.
    pub(crate) fn to_nanoseconds(self) -> i64 {
        let seconds = (i64::from(self.hour) * 60 + i64::from(self.minute)) * 60
            + i64::from(self.second);
        ((seconds * 1000 + i64::from(self.millisecond)) * 1000 + i64::from(self.microsecond))
            * 1000
            + i64::from(self.nanosecond)
    }
}

// ==== `IsoDateTime` specific utility functions ====

/// Utility function to determine if a `DateTime`'s components create a `DateTime` within valid limits
#[inline]
fn iso_dt_within_valid_limits(date: IsoDate, time: &IsoTime) -> bool {
    if date.to_epoch_days().abs() > 100_000_001 {
        return false;
    }
    let ns = utc_epoch_nanos(date, time);

    let max = NS_MAX_INSTANT + i128::from(NS_PER_DAY);
    let min = NS_MIN_INSTANT - i128::from(NS_PER_DAY);

    min < ns && ns < max
}

/// Utility function to convert a `IsoDate` and `IsoTime` values into epoch nanoseconds
#[inline]
fn utc_epoch_nanos(date: IsoDate, time: &IsoTime) -> i128 {
    i128::from(date.to_epoch_days()) * i128::from(NS_PER_DAY) + i128::from(time.to_nanoseconds())
}

// ==== `IsoDate` specific utiltiy functions ====

/// Converts an integral duration field to an `i64`.
fn integral_date_value(value: f64) -> TemporalResult<i64> {
    if value.fract() != 0.0 {
        return Err(TemporalError::range().with_enum(ErrorMessage::NumberNotIntegral));
    }
    value
        .to_i64()
        .ok_or(TemporalError::range().with_enum(ErrorMessage::NumberOutOfRange))
}

#[inline]
/// Determines if the month and day are valid for the given year.
fn is_valid_date(year: i32, month: i32, day: i32) -> bool {
    if !(1..=12).contains(&month) {
        return false;
    }
    is_valid_iso_day(year, month as u8, day)
}

#[inline]
/// Returns with the `this` surpasses `other`.
fn iso_date_surpasses(this: &IsoDate, other: &IsoDate, sign: i8) -> bool {
    this.cmp(other) as i8 * sign == 1
}

/// `BalanceISOYearMonth`
#[inline]
pub(crate) fn balance_iso_year_month(year: i64, month: i64) -> TemporalResult<(i32, u8)> {
    // 1. Assert: year and month are integers.
    // 2. Set year to year + floor((month - 1) / 12).
    let y = year + (month - 1).div_euclid(12);
    // 3. Set month to ((month - 1) modulo 12) + 1.
    let m = (month - 1).rem_euclid(12) + 1;
    // 4. Return the Record { [[Year]]: year, [[Month]]: month  }.
    let y = i32::try_from(y)
        .map_err(|_| TemporalError::range().with_enum(ErrorMessage::DateOutOfRange))?;
    Ok((y, m as u8))
}

#[inline]
pub(crate) fn constrain_iso_day(year: i32, month: u8, day: i32) -> u8 {
    let days_in_month = utils::iso_days_in_month(year, month);
    day.clamp(1, days_in_month.into()) as u8
}

#[inline]
pub(crate) fn is_valid_iso_day(year: i32, month: u8, day: i32) -> bool {
    let days_in_month = utils::iso_days_in_month(year, month);
    (1..=i32::from(days_in_month)).contains(&day)
}

// ==== `IsoTime` specific utilities ====

#[inline]
fn is_valid_time(hour: i32, minute: i32, second: i32, ms: i32, mis: i32, ns: i32) -> bool {
    if !(0..=23).contains(&hour) {
        return false;
    }

    let min_sec = 0..=59;
    if !min_sec.contains(&minute) || !min_sec.contains(&second) {
        return false;
    }

    let sub_second = 0..=999;
    sub_second.contains(&ms) && sub_second.contains(&mis) && sub_second.contains(&ns)
}

#[inline]
fn div_mod(dividend: i64, divisor: i64) -> (i64, i64) {
    (dividend.div_euclid(divisor), dividend.rem_euclid(divisor))
}

#[cfg(test)]
mod tests {
    use super::{IsoDate, IsoDateTime, IsoTime};
    use crate::{
        builtins::core::duration::DateDuration,
        options::{ArithmeticOverflow, TemporalUnit},
        NS_PER_DAY,
    };

    #[test]
    fn date_limits() {
        // -271821-04-19 and +275760-09-13 are the outermost valid dates.
        assert!(IsoDate::new_with_overflow(-271_821, 4, 19, ArithmeticOverflow::Reject).is_ok());
        assert!(IsoDate::new_with_overflow(-271_821, 4, 18, ArithmeticOverflow::Reject).is_err());
        assert!(IsoDate::new_with_overflow(275_760, 9, 13, ArithmeticOverflow::Reject).is_ok());
        assert!(IsoDate::new_with_overflow(275_760, 9, 14, ArithmeticOverflow::Reject).is_err());
    }

    #[test]
    fn constrain_and_reject() {
        let constrained =
            IsoDate::new_with_overflow(2021, 2, 31, ArithmeticOverflow::Constrain).unwrap();
        assert_eq!(constrained, IsoDate::new_unchecked(2021, 2, 28));
        let constrained =
            IsoDate::new_with_overflow(2021, 13, 0, ArithmeticOverflow::Constrain).unwrap();
        assert_eq!(constrained, IsoDate::new_unchecked(2021, 12, 1));
        assert!(IsoDate::new_with_overflow(2021, 2, 29, ArithmeticOverflow::Reject).is_err());
        assert!(IsoTime::new(24, 0, 0, 0, 0, 0, ArithmeticOverflow::Reject).is_err());
        let time = IsoTime::new(24, 60, 61, 1000, 1000, 1000, ArithmeticOverflow::Constrain)
            .unwrap();
        assert_eq!(time, IsoTime::new_unchecked(23, 59, 59, 999, 999, 999));
    }

    #[test]
    fn balance_dates() {
        assert_eq!(
            IsoDate::balance(2020, 13, 1).unwrap(),
            IsoDate::new_unchecked(2021, 1, 1)
        );
        assert_eq!(
            IsoDate::balance(2020, 3, 0).unwrap(),
            IsoDate::new_unchecked(2020, 2, 29)
        );
        assert_eq!(
            IsoDate::balance(2020, 1, 366).unwrap(),
            IsoDate::new_unchecked(2020, 12, 31)
        );
        assert_eq!(
            IsoDate::balance(2020, 0, 1).unwrap(),
            IsoDate::new_unchecked(2019, 12, 1)
        );
    }

    #[test]
    fn add_months_constrains_day() {
        let date = IsoDate::new_unchecked(2021, 1, 31);
        let one_month = DateDuration::new(0.0, 1.0, 0.0, 0.0).unwrap();
        assert_eq!(
            date.add_date_duration(&one_month, ArithmeticOverflow::Constrain)
                .unwrap(),
            IsoDate::new_unchecked(2021, 2, 28)
        );
        assert!(date
            .add_date_duration(&one_month, ArithmeticOverflow::Reject)
            .is_err());

        let mixed = DateDuration::new(1.0, 1.0, 1.0, 1.0).unwrap();
        assert_eq!(
            IsoDate::new_unchecked(2020, 1, 1)
                .add_date_duration(&mixed, ArithmeticOverflow::Constrain)
                .unwrap(),
            IsoDate::new_unchecked(2021, 2, 9)
        );
    }

    #[test]
    fn date_differences() {
        let one = IsoDate::new_unchecked(2020, 1, 31);
        let two = IsoDate::new_unchecked(2021, 3, 1);

        let diff = one.diff_iso_date(&two, TemporalUnit::Year).unwrap();
        assert_eq!((diff.years, diff.months, diff.weeks, diff.days), (1.0, 1.0, 0.0, 1.0));

        let diff = one.diff_iso_date(&two, TemporalUnit::Month).unwrap();
        assert_eq!((diff.years, diff.months, diff.days), (0.0, 13.0, 1.0));

        let diff = one.diff_iso_date(&two, TemporalUnit::Week).unwrap();
        assert_eq!((diff.weeks, diff.days), (56.0, 3.0));

        let diff = two.diff_iso_date(&one, TemporalUnit::Year).unwrap();
        assert_eq!((diff.years, diff.months, diff.days), (-1.0, -1.0, -1.0));

        let diff = one.diff_iso_date(&two, TemporalUnit::Day).unwrap();
        assert_eq!(diff.days, 395.0);
    }

    #[test]
    fn time_balance_and_add() {
        let (days, time) = IsoTime::balance(25, 61, 0, 0, 0, -1);
        assert_eq!(days, 1);
        assert_eq!(time, IsoTime::new_unchecked(2, 0, 59, 999, 999, 999));

        let (days, time) = IsoTime::balance(0, 0, 0, 0, 0, -1);
        assert_eq!(days, -1);
        assert_eq!(time, IsoTime::new_unchecked(23, 59, 59, 999, 999, 999));
    }

    #[test]
    fn epoch_nanosecond_conversions() {
        let dt = IsoDateTime::from_epoch_nanos(-1, 0).unwrap();
        assert_eq!(dt.date, IsoDate::new_unchecked(1969, 12, 31));
        assert_eq!(dt.time, IsoTime::new_unchecked(23, 59, 59, 999, 999, 999));
        assert_eq!(dt.as_nanoseconds().as_i128(), -1);

        let shifted = IsoDateTime::from_epoch_nanos(0, i128::from(NS_PER_DAY) / 4).unwrap();
        assert_eq!(shifted.time.hour, 6);
    }
}
