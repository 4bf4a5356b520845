//! This module implements the normalized `Duration` records.

use core::num::NonZeroU128;

use core_maths::CoreFloat;

use crate::{
    builtins::core::{zoneddatetime::add_zoned_date_time, PlainDate, ZonedDateTime},
    error::ErrorMessage,
    options::{ArithmeticOverflow, ResolvedRoundingOptions, TemporalRoundingMode, TemporalUnit},
    provider::TimeZoneProvider,
    rounding::IncrementRounder,
    Sign, TemporalError, TemporalResult, TemporalUnwrap, NS_PER_DAY,
};

use super::{DateDuration, IterationGuard, TimeDuration};

/// The largest magnitude of a time duration: `2^53` seconds less one nanosecond.
pub(crate) const MAX_TIME_DURATION: i128 = 9_007_199_254_740_991_999_999_999;

pub(crate) const NS_PER_DAY_128BIT: i128 = NS_PER_DAY as i128;

const NS_PER_HOUR: i128 = 3_600_000_000_000;
const NS_PER_MINUTE: i128 = 60_000_000_000;
const NS_PER_SECOND: i128 = 1_000_000_000;

// ==== NormalizedTimeDuration ====
//
// A time duration represented in pure nanoseconds.
//
// Invariants:
//
// nanoseconds.abs() <= MAX_TIME_DURATION

/// A Normalized `TimeDuration` that represents the current `TimeDuration` in nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct NormalizedTimeDuration(pub(crate) i128);

impl NormalizedTimeDuration {
    /// Equivalent: `NormalizeTimeDuration`
    ///
    /// The time fields are integral and bounded by `is_valid_duration`, so
    /// every field converts to `i128` without loss.
    pub(crate) fn from_time_duration(time: &TimeDuration) -> TemporalResult<Self> {
        let nanoseconds = integral_field(time.hours)? * NS_PER_HOUR
            + integral_field(time.minutes)? * NS_PER_MINUTE
            + integral_field(time.seconds)? * NS_PER_SECOND
            + integral_field(time.milliseconds)? * 1_000_000
            + integral_field(time.microseconds)? * 1_000
            + integral_field(time.nanoseconds)?;
        Self::checked_new(nanoseconds)
    }

    fn checked_new(nanoseconds: i128) -> TemporalResult<Self> {
        if nanoseconds.abs() > MAX_TIME_DURATION {
            return Err(TemporalError::range()
                .with_message("normalizedTimeDuration exceeds maxTimeDuration."));
        }
        Ok(Self(nanoseconds))
    }

    /// Equivalent to `NormalizedTimeDurationFromEpochNanosecondsDifference ( one, two )`
    pub(crate) fn from_nanosecond_difference(one: i128, two: i128) -> TemporalResult<Self> {
        Self::checked_new(one - two)
    }

    /// Equivalent: `Add24HourDaysToNormalizedTimeDuration ( d, days )`
    pub(crate) fn add_days(&self, days: i64) -> TemporalResult<Self> {
        Self::checked_new(self.0 + i128::from(days) * NS_PER_DAY_128BIT)
    }

    /// Equivalent: `AddNormalizedTimeDuration ( one, two )`
    pub(crate) fn checked_add(&self, other: &Self) -> TemporalResult<Self> {
        Self::checked_new(self.0 + other.0)
    }

    /// Equivalent: `NormalizedTimeDurationSign ( d )`
    #[inline]
    #[must_use]
    pub(crate) fn sign(&self) -> Sign {
        Sign::from(self.0.cmp(&0))
    }

    #[inline]
    pub(crate) fn is_zero(&self) -> bool {
        self.0 == 0
    }

    // NOTE: truncating division keeps seconds and subseconds of the same sign.
    /// Return the seconds value of the `NormalizedTimeDuration`.
    pub(crate) fn seconds(&self) -> i64 {
        // |self.0| / 10^9 is at most 2^53.
        (self.0 / NS_PER_SECOND) as i64
    }

    /// Returns the subsecond components of the `NormalizedTimeDuration`.
    pub(crate) fn subseconds(&self) -> i32 {
        (self.0 % NS_PER_SECOND) as i32
    }

    /// `DivideNormalizedTimeDuration`: the exact quotient rendered as an `f64`.
    pub(crate) fn divide(&self, divisor: u64) -> f64 {
        fraction_to_f64(self.0, i128::from(divisor))
    }

    /// `RoundNormalizedTimeDurationToIncrement`
    pub(crate) fn round(
        &self,
        increment: NonZeroU128,
        mode: TemporalRoundingMode,
    ) -> TemporalResult<Self> {
        let rounded = IncrementRounder::from_signed_num(self.0, increment)?.round(mode);
        Self::checked_new(rounded)
    }
}

/// Converts an integral duration field to `i128`.
fn integral_field(value: f64) -> TemporalResult<i128> {
    if !value.is_finite() {
        return Err(TemporalError::range().with_enum(ErrorMessage::NumberNotFinite));
    }
    if value.fract() != 0.0 {
        return Err(TemporalError::range().with_enum(ErrorMessage::NumberNotIntegral));
    }
    // Any integral f64 below 2^127 casts to i128 exactly.
    Ok(value as i128)
}

/// Renders `numerator / denominator` as an `f64`, keeping the integral
/// part exact before the fraction is added.
pub(crate) fn fraction_to_f64(numerator: i128, denominator: i128) -> f64 {
    debug_assert!(denominator != 0);
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    quotient as f64 + remainder as f64 / denominator as f64
}

// ==== NormalizedDurationRecord ====
//
// A record consisting of a DateDuration and NormalizedTimeDuration
//

/// A NormalizedDurationRecord is a duration record that contains
/// a `DateDuration` and `NormalizedTimeDuration`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NormalizedDurationRecord {
    pub(crate) date: DateDuration,
    pub(crate) norm: NormalizedTimeDuration,
}

impl NormalizedDurationRecord {
    /// Creates a new `NormalizedDurationRecord`.
    ///
    /// Equivalent: `CreateNormalizedDurationRecord` & `CombineDateAndNormalizedTimeDuration`.
    pub(crate) fn new(date: DateDuration, norm: NormalizedTimeDuration) -> TemporalResult<Self> {
        let date_sign = date.sign();
        let time_sign = norm.sign();
        if date_sign != Sign::Zero && time_sign != Sign::Zero && date_sign != time_sign {
            return Err(TemporalError::range().with_enum(ErrorMessage::DurationMixedSign));
        }
        Ok(Self { date, norm })
    }

    pub(crate) fn date(&self) -> DateDuration {
        self.date
    }
}

// ==== Relative rounding ====
//
// Fractional days are carried as an exact ratio `numerator / day_length`,
// where `day_length` is the nanosecond length of the day being measured.
// Calendar units are measured the same way, scaled by the day count of the
// unit that the remainder falls into.

impl NormalizedDurationRecord {
    /// Equivalent: `RoundDuration`
    ///
    /// Returns the rounded record along with the unrounded total expressed in
    /// the smallest unit of `options`.
    pub(crate) fn round_relative(
        &self,
        options: ResolvedRoundingOptions,
        plain_relative_to: Option<&PlainDate>,
        zoned_relative_to: Option<&ZonedDateTime>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<(Self, f64)> {
        let unit = options.smallest_unit;
        let increment = u128::from(options.increment.get());
        let mode = options.rounding_mode;

        // 1. If plainRelativeTo is not present, set plainRelativeTo to undefined.
        // 4. If unit is "year", "month", or "week", and plainRelativeTo is undefined, then
        if unit.is_calendar_unit() && plain_relative_to.is_none() {
            // a. Throw a RangeError exception.
            return Err(TemporalError::range().with_enum(ErrorMessage::DurationRelativeToRequired));
        }

        let mut years = integral(self.date.years);
        let mut months = integral(self.date.months);
        let mut weeks = integral(self.date.weeks);
        let mut days = integral(self.date.days);

        // 5. If unit is one of "year", "month", "week", or "day", then
        if !unit.is_date_unit() {
            // 6. Else,
            // a. Let fractionalSeconds be ...
            let unit_ns = unit.as_nanoseconds().temporal_unwrap()?;
            let total = self.norm.divide(unit_ns);
            let step = core::num::NonZeroU128::new(u128::from(unit_ns) * increment)
                .temporal_unwrap()?;
            let norm = self.norm.round(step, mode)?;
            return Ok((Self { date: self.date, norm }, total));
        }

        // a. Let nanoseconds be ! TotalDurationNanoseconds(0, hours, minutes, seconds, milliseconds, microseconds, nanoseconds, 0).
        // b. If zonedRelativeTo is not undefined, then
        let (mut fractional_days, day_length) = if let Some(zoned) = zoned_relative_to {
            // i. Let intermediate be ? MoveRelativeZonedDateTime(zonedRelativeTo, years, months, weeks, days).
            let intermediate = zoned.move_relative(
                &DateDuration::new_unchecked(
                    years as f64,
                    months as f64,
                    weeks as f64,
                    days as f64,
                ),
                provider,
            )?;
            // ii. Let result be ? NanosecondsToDays(nanoseconds, intermediate).
            let (extra_days, remainder, day_length) =
                intermediate.nanoseconds_to_days(self.norm.0, provider)?;
            // iii. Let fractionalDays be days + result.[[Days]] + result.[[Nanoseconds]] / result.[[DayLength]].
            ((days + extra_days) * day_length + remainder, day_length)
        } else {
            // c. Else,
            // i. Let fractionalDays be days + nanoseconds / nsPerDay.
            (days * NS_PER_DAY_128BIT + self.norm.0, NS_PER_DAY_128BIT)
        };
        // d. Set days, hours, minutes, seconds, milliseconds, microseconds, and nanoseconds to 0.
        days = 0;

        let mut guard = IterationGuard::default();
        let total = match unit {
            // 7. If unit is "year", then
            TemporalUnit::Year => {
                let plain = plain_relative_to.temporal_unwrap()?;
                let calendar = plain.calendar();
                // a. Let yearsDuration be ! CreateTemporalDuration(years, 0, 0, 0, 0, 0, 0, 0, 0, 0).
                // b. Let yearsLater be ? AddDate(calendar, relativeTo, yearsDuration, undefined, dateAdd).
                let years_later = calendar.date_add(
                    &plain.iso,
                    &DateDuration::new_unchecked(years as f64, 0.0, 0.0, 0.0),
                    ArithmeticOverflow::Constrain,
                )?;
                // c. Let yearsMonthsWeeks be ! CreateTemporalDuration(years, months, weeks, 0, 0, 0, 0, 0, 0, 0).
                // d. Let yearsMonthsWeeksLater be ? AddDate(calendar, relativeTo, yearsMonthsWeeks, undefined, dateAdd).
                let years_months_weeks_later = calendar.date_add(
                    &plain.iso,
                    &DateDuration::new_unchecked(years as f64, months as f64, weeks as f64, 0.0),
                    ArithmeticOverflow::Constrain,
                )?;
                // e. Let monthsWeeksInDays be DaysUntil(yearsLater, yearsMonthsWeeksLater).
                let months_weeks_in_days =
                    years_later.iso.days_until(&years_months_weeks_later.iso);
                // f. Set relativeTo to yearsLater.
                let mut relative_to = years_later;
                // g. Let days be days + monthsWeeksInDays.
                fractional_days += i128::from(months_weeks_in_days) * day_length;

                // h. Let isoResult be ! AddISODate(relativeTo.[[ISOYear]], relativeTo.[[ISOMonth]], relativeTo.[[ISODay]], 0, 0, 0, truncate(fractionalDays), "constrain").
                // i. Let wholeDaysLater be ? CreateTemporalDate(isoResult.[[Year]], isoResult.[[Month]], isoResult.[[Day]], calendar).
                let whole_days_later = relative_to.iso.add_date_duration(
                    &DateDuration::new_unchecked(
                        0.0,
                        0.0,
                        0.0,
                        (fractional_days / day_length) as f64,
                    ),
                    ArithmeticOverflow::Constrain,
                )?;
                // j. Let untilOptions be OrdinaryObjectCreate(null).
                // k. Perform ! CreateDataPropertyOrThrow(untilOptions, "largestUnit", "year").
                // l. Let timePassed be ? DifferenceDate(calendar, relativeTo, wholeDaysLater, untilOptions).
                let time_passed = relative_to
                    .iso
                    .diff_iso_date(&whole_days_later, TemporalUnit::Year)?;
                // m. Let yearsPassed be timePassed.[[Years]].
                let years_passed = integral(time_passed.years);
                // n. Set years to years + yearsPassed.
                years += years_passed;
                // o. Let yearsDuration be ! CreateTemporalDuration(yearsPassed, 0, 0, 0, 0, 0, 0, 0, 0, 0).
                // p. Let moveResult be ? MoveRelativeDate(calendar, relativeTo, yearsDuration, dateAdd).
                let (moved, days_passed) = relative_to.move_relative_date(
                    &DateDuration::new_unchecked(years_passed as f64, 0.0, 0.0, 0.0),
                )?;
                // q. Set relativeTo to moveResult.[[RelativeTo]].
                relative_to = moved;
                // r. Let daysPassed be moveResult.[[Days]].
                // s. Set fractionalDays to fractionalDays - daysPassed.
                fractional_days -= i128::from(days_passed) * day_length;
                // t. If fractionalDays < 0, let sign be -1; else, let sign be 1.
                let sign = if fractional_days < 0 { -1.0 } else { 1.0 };
                // u. Let oneYear be ! CreateTemporalDuration(sign, 0, 0, 0, 0, 0, 0, 0, 0, 0).
                // v. Set moveResult to ? MoveRelativeDate(calendar, relativeTo, oneYear, dateAdd).
                // w. Let oneYearDays be moveResult.[[Days]].
                let (_, one_year_days) =
                    relative_to.move_relative_date(&DateDuration::one_year(sign))?;
                // x. If oneYearDays = 0, throw a RangeError exception.
                let unit_length = unit_length(one_year_days, day_length)?;
                // y. Let fractionalYears be years + fractionalDays / abs(oneYearDays).
                let fractional_years = years * unit_length + fractional_days;
                // z. Set years to RoundNumberToIncrement(fractionalYears, increment, roundingMode).
                years = round_ratio(fractional_years, unit_length, increment, mode)?;
                // aa. Set months and weeks to 0.
                months = 0;
                weeks = 0;
                fraction_to_f64(fractional_years, unit_length)
            }
            // 8. Else if unit is "month", then
            TemporalUnit::Month => {
                let plain = plain_relative_to.temporal_unwrap()?;
                let calendar = plain.calendar();
                // a. Let yearsMonths be ! CreateTemporalDuration(years, months, 0, 0, 0, 0, 0, 0, 0, 0).
                // b. Let yearsMonthsLater be ? AddDate(calendar, relativeTo, yearsMonths, undefined, dateAdd).
                let years_months_later = calendar.date_add(
                    &plain.iso,
                    &DateDuration::new_unchecked(years as f64, months as f64, 0.0, 0.0),
                    ArithmeticOverflow::Constrain,
                )?;
                // c. Let yearsMonthsWeeks be ! CreateTemporalDuration(years, months, weeks, 0, 0, 0, 0, 0, 0, 0).
                // d. Let yearsMonthsWeeksLater be ? AddDate(calendar, relativeTo, yearsMonthsWeeks, undefined, dateAdd).
                let years_months_weeks_later = calendar.date_add(
                    &plain.iso,
                    &DateDuration::new_unchecked(years as f64, months as f64, weeks as f64, 0.0),
                    ArithmeticOverflow::Constrain,
                )?;
                // e. Let weeksInDays be DaysUntil(yearsMonthsLater, yearsMonthsWeeksLater).
                let weeks_in_days = years_months_later
                    .iso
                    .days_until(&years_months_weeks_later.iso);
                // g. Let fractionalDays be fractionalDays + weeksInDays.
                fractional_days += i128::from(weeks_in_days) * day_length;
                // h. If fractionalDays < 0, let sign be -1; else, let sign be 1.
                let sign = if fractional_days < 0 { -1 } else { 1 };
                // i. Let oneMonth be ! CreateTemporalDuration(0, sign, 0, 0, 0, 0, 0, 0, 0, 0).
                let one_month = DateDuration::one_month(f64::from(sign));
                // j. Let moveResult be ? MoveRelativeDate(calendar, yearsMonthsLater, oneMonth, dateAdd).
                // k. Set relativeTo to moveResult.[[RelativeTo]].
                // l. Let oneMonthDays be moveResult.[[Days]].
                let (mut relative_to, mut one_month_days) =
                    years_months_later.move_relative_date(&one_month)?;
                // m. Repeat, while abs(fractionalDays) ≥ abs(oneMonthDays),
                while one_month_days != 0
                    && fractional_days.abs() >= i128::from(one_month_days.abs()) * day_length
                {
                    guard.tick()?;
                    // i. Set months to months + sign.
                    months += i128::from(sign);
                    // ii. Set fractionalDays to fractionalDays - oneMonthDays.
                    fractional_days -= i128::from(one_month_days) * day_length;
                    // iii. Set moveResult to ? MoveRelativeDate(calendar, relativeTo, oneMonth, dateAdd).
                    // iv. Set relativeTo to moveResult.[[RelativeTo]].
                    // v. Set oneMonthDays to moveResult.[[Days]].
                    (relative_to, one_month_days) = relative_to.move_relative_date(&one_month)?;
                }
                // n. Let fractionalMonths be months + fractionalDays / abs(oneMonthDays).
                let unit_length = unit_length(one_month_days, day_length)?;
                let fractional_months = months * unit_length + fractional_days;
                // o. Set months to RoundNumberToIncrement(fractionalMonths, increment, roundingMode).
                months = round_ratio(fractional_months, unit_length, increment, mode)?;
                // p. Set weeks to 0.
                weeks = 0;
                fraction_to_f64(fractional_months, unit_length)
            }
            // 9. Else if unit is "week", then
            TemporalUnit::Week => {
                let plain = plain_relative_to.temporal_unwrap()?;
                // The remaining days are measured from the end of the existing years, months and weeks.
                let anchor = plain.calendar().date_add(
                    &plain.iso,
                    &DateDuration::new_unchecked(years as f64, months as f64, weeks as f64, 0.0),
                    ArithmeticOverflow::Constrain,
                )?;
                // a. If fractionalDays < 0, let sign be -1; else, let sign be 1.
                let sign = if fractional_days < 0 { -1 } else { 1 };
                // b. Let oneWeek be ! CreateTemporalDuration(0, 0, sign, 0, 0, 0, 0, 0, 0, 0).
                let one_week = DateDuration::one_week(f64::from(sign));
                // c. Let moveResult be ? MoveRelativeDate(calendar, relativeTo, oneWeek, dateAdd).
                // d. Set relativeTo to moveResult.[[RelativeTo]].
                // e. Let oneWeekDays be moveResult.[[Days]].
                let (mut relative_to, mut one_week_days) = anchor.move_relative_date(&one_week)?;
                // f. Repeat, while abs(fractionalDays) ≥ abs(oneWeekDays),
                while one_week_days != 0
                    && fractional_days.abs() >= i128::from(one_week_days.abs()) * day_length
                {
                    guard.tick()?;
                    // i. Set weeks to weeks + sign.
                    weeks += i128::from(sign);
                    // ii. Set fractionalDays to fractionalDays - oneWeekDays.
                    fractional_days -= i128::from(one_week_days) * day_length;
                    // iii. Set moveResult to ? MoveRelativeDate(calendar, relativeTo, oneWeek, dateAdd).
                    (relative_to, one_week_days) = relative_to.move_relative_date(&one_week)?;
                }
                // g. Let fractionalWeeks be weeks + fractionalDays / abs(oneWeekDays).
                let unit_length = unit_length(one_week_days, day_length)?;
                let fractional_weeks = weeks * unit_length + fractional_days;
                // h. Set weeks to RoundNumberToIncrement(fractionalWeeks, increment, roundingMode).
                weeks = round_ratio(fractional_weeks, unit_length, increment, mode)?;
                fraction_to_f64(fractional_weeks, unit_length)
            }
            // 10. Else if unit is "day", then
            _ => {
                // a. Set days to RoundNumberToIncrement(fractionalDays, increment, roundingMode).
                days = round_ratio(fractional_days, day_length, increment, mode)?;
                // b. Let total be fractionalDays.
                fraction_to_f64(fractional_days, day_length)
            }
        };

        #[cfg(feature = "log")]
        log::trace!("rounded duration to {unit} after {} steps", guard.count());

        // 17. Let duration be ? CreateDurationRecord(years, months, weeks, days, hours, minutes, seconds, milliseconds, microseconds, nanoseconds).
        let date = DateDuration::new(years as f64, months as f64, weeks as f64, days as f64)?;
        // 18. Return the Record { [[DurationRecord]]: duration, [[Total]]: total }.
        Ok((Self::new(date, NormalizedTimeDuration::default())?, total))
    }

    /// Equivalent: `AdjustRoundedDurationDays`
    ///
    /// A rounded time remainder that reaches the length of the day it falls
    /// into is carried into the days field.
    pub(crate) fn adjust_rounded_days(
        &self,
        options: ResolvedRoundingOptions,
        zoned_relative_to: &ZonedDateTime,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        // 1. If zonedRelativeTo is undefined, or unit is one of "year", "month", "week", or "day", or unit is
        // "nanosecond" and increment is 1, then
        if options.smallest_unit.is_date_unit() || options.is_noop() || self.norm.is_zero() {
            // a. Return ! CreateDurationRecord(years, months, weeks, days, hours, minutes, seconds, milliseconds, microseconds, nanoseconds).
            return Ok(*self);
        }

        // 2. Let timeRemainderNs be ! TotalDurationNanoseconds(0, hours, minutes, seconds, milliseconds, microseconds, nanoseconds, 0).
        // 3. If timeRemainderNs = 0, let direction be 0.
        // 4. Else if timeRemainderNs < 0, let direction be -1.
        // 5. Else, let direction be 1.
        let direction = i128::from(self.norm.sign().as_sign_multiplier());

        // 6. Let dayStart be ? AddZonedDateTime(zonedRelativeTo.[[Nanoseconds]], zonedRelativeTo.[[TimeZone]], zonedRelativeTo.[[Calendar]], years, months, weeks, days, 0, 0, 0, 0, 0, 0).
        let day_start = add_zoned_date_time(
            zoned_relative_to.epoch_nanoseconds().as_i128(),
            zoned_relative_to.timezone(),
            zoned_relative_to.calendar(),
            &self.date,
            NormalizedTimeDuration::default(),
            ArithmeticOverflow::Constrain,
            provider,
        )?;
        // 7. Let dayEnd be ? AddZonedDateTime(dayStart, zonedRelativeTo.[[TimeZone]], zonedRelativeTo.[[Calendar]], 0, 0, 0, direction, 0, 0, 0, 0, 0, 0).
        let day_end = add_zoned_date_time(
            day_start,
            zoned_relative_to.timezone(),
            zoned_relative_to.calendar(),
            &DateDuration::new_unchecked(0.0, 0.0, 0.0, direction as f64),
            NormalizedTimeDuration::default(),
            ArithmeticOverflow::Constrain,
            provider,
        )?;
        // 8. Let dayLengthNs be ℝ(dayEnd - dayStart).
        let day_length = day_end - day_start;
        // 9. If (timeRemainderNs - dayLengthNs) × direction < 0, then
        let one_day_less = self.norm.0 - day_length;
        if one_day_less * direction < 0 {
            // a. Return ! CreateDurationRecord(years, months, weeks, days, hours, minutes, seconds, milliseconds, microseconds, nanoseconds).
            return Ok(*self);
        }

        // 10. Set timeRemainderNs to ℝ(! RoundTemporalInstant(ℤ(timeRemainderNs - dayLengthNs), increment, unit, roundingMode)).
        let unit_ns = options.smallest_unit.as_nanoseconds().temporal_unwrap()?;
        let step = core::num::NonZeroU128::new(
            u128::from(unit_ns) * u128::from(options.increment.get()),
        )
        .temporal_unwrap()?;
        let remainder = IncrementRounder::from_signed_num(one_day_less, step)?
            .round_as_if_positive(options.rounding_mode);

        // 11. Let adjustedDateDuration be ? AddDuration(years, months, weeks, days, 0, 0, 0, 0, 0, 0, 0, 0, 0, direction, 0, 0, 0, 0, 0, 0, relativeTo).
        let date = DateDuration::new(
            self.date.years,
            self.date.months,
            self.date.weeks,
            self.date.days + direction as f64,
        )?;
        // 12. Let adjustedTimeDuration be ? BalanceDuration(0, 0, 0, 0, 0, 0, timeRemainderNs, "hour").
        // 13. Return ! CreateDurationRecord(...).
        Self::new(date, NormalizedTimeDuration::checked_new(remainder)?)
    }
}

/// Reads an integral, validated duration field as an `i128`.
#[inline]
fn integral(value: f64) -> i128 {
    value as i128
}

/// The nanosecond length of a calendar unit spanning `unit_days` days of
/// `day_length` nanoseconds.
fn unit_length(unit_days: i64, day_length: i128) -> TemporalResult<i128> {
    if unit_days == 0 {
        return Err(TemporalError::range().with_enum(ErrorMessage::DayLengthZero));
    }
    Ok(i128::from(unit_days.abs()) * day_length)
}

/// Rounds `numerator / unit_length` to a multiple of `increment`.
fn round_ratio(
    numerator: i128,
    unit_length: i128,
    increment: u128,
    mode: TemporalRoundingMode,
) -> TemporalResult<i128> {
    let step = core::num::NonZeroU128::new(unit_length.unsigned_abs() * increment)
        .ok_or(TemporalError::range().with_enum(ErrorMessage::DayLengthZero))?;
    let quotient = IncrementRounder::from_signed_num(numerator, step)?.round_to_quotient(mode);
    Ok(quotient * increment as i128)
}
