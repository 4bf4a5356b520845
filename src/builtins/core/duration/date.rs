//! Implementation of a `DateDuration`

use crate::{
    builtins::core::PlainDate, error::ErrorMessage, iso::IsoDate, options::ArithmeticOverflow,
    options::TemporalUnit, Sign, TemporalError, TemporalResult,
};

use super::{duration_sign, is_valid_duration, IterationGuard, TimeDuration};

use core_maths::CoreFloat;

/// `DateDuration` represents the [date duration record][spec] of the `Duration.`
///
/// These fields are laid out in the [Temporal Proposal][field spec] as 64-bit floating point numbers.
///
/// [spec]: https://tc39.es/proposal-temporal/#sec-temporal-date-duration-records
/// [field spec]: https://tc39.es/proposal-temporal/#sec-properties-of-temporal-duration-instances
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct DateDuration {
    /// `DateDuration`'s internal year value.
    pub years: f64,
    /// `DateDuration`'s internal month value.
    pub months: f64,
    /// `DateDuration`'s internal week value.
    pub weeks: f64,
    /// `DateDuration`'s internal day value.
    pub days: f64,
}

impl DateDuration {
    /// Creates a new, non-validated `DateDuration`.
    #[inline]
    #[must_use]
    pub(crate) const fn new_unchecked(years: f64, months: f64, weeks: f64, days: f64) -> Self {
        Self {
            years,
            months,
            weeks,
            days,
        }
    }

    pub(crate) const fn one_year(sign: f64) -> Self {
        Self::new_unchecked(sign, 0.0, 0.0, 0.0)
    }

    pub(crate) const fn one_month(sign: f64) -> Self {
        Self::new_unchecked(0.0, sign, 0.0, 0.0)
    }

    pub(crate) const fn one_week(sign: f64) -> Self {
        Self::new_unchecked(0.0, 0.0, sign, 0.0)
    }

    /// Returns the fields of the `DateDuration` from years to days.
    #[inline]
    #[must_use]
    pub(crate) fn fields(&self) -> [f64; 4] {
        [self.years, self.months, self.weeks, self.days]
    }

    /// Equivalent: `UnbalanceDateDurationRelative`
    ///
    /// Folds the units larger than `largest_unit` into the next smaller
    /// unit by stepping one unit at a time from `plain_relative_to`.
    pub(crate) fn unbalance_relative(
        &self,
        largest_unit: TemporalUnit,
        plain_relative_to: Option<&PlainDate>,
    ) -> TemporalResult<Self> {
        let (mut years, mut months, mut weeks, mut days) =
            (self.years, self.months, self.weeks, self.days);

        // 1. If largestUnit is "year", or years, months, weeks, and days are all 0, then
        if largest_unit == TemporalUnit::Year || self.sign() == Sign::Zero {
            // a. Return ! CreateDateDurationRecord(years, months, weeks, days).
            return Ok(*self);
        }

        // 2. Let sign be ! DurationSign(years, months, weeks, days, 0, 0, 0, 0, 0, 0).
        let sign = f64::from(self.sign().as_sign_multiplier());

        let required_anchor = || {
            plain_relative_to
                .ok_or(TemporalError::range().with_enum(ErrorMessage::DurationRelativeToRequired))
        };

        let mut guard = IterationGuard::default();
        match largest_unit {
            // 7. If largestUnit is "month", then
            TemporalUnit::Month => {
                if years == 0.0 {
                    return Ok(*self);
                }
                // a. If calendar is undefined, then
                //     i. Throw a RangeError exception.
                required_anchor()?;
                // d. Repeat, while years ≠ 0,
                // An ISO year always spans twelve months.
                months += years * 12.0;
                years = 0.0;
            }
            // 8. Else if largestUnit is "week", then
            TemporalUnit::Week => {
                if years == 0.0 && months == 0.0 {
                    return Ok(*self);
                }
                let mut relative_to = required_anchor()?.clone();
                // b. Repeat, while years ≠ 0,
                while years != 0.0 {
                    guard.tick()?;
                    // i. Let moveResult be ? MoveRelativeDate(calendar, relativeTo, oneYear).
                    let (next, one_year_days) =
                        relative_to.move_relative_date(&Self::one_year(sign))?;
                    // ii. Set relativeTo to moveResult.[[RelativeTo]].
                    relative_to = next;
                    // iii. Set days to days + moveResult.[[Days]].
                    days += one_year_days as f64;
                    // iv. Set years to years - sign.
                    years -= sign;
                }
                // c. Repeat, while months ≠ 0,
                while months != 0.0 {
                    guard.tick()?;
                    let (next, one_month_days) =
                        relative_to.move_relative_date(&Self::one_month(sign))?;
                    relative_to = next;
                    days += one_month_days as f64;
                    months -= sign;
                }
            }
            // 9. Else,
            _ => {
                // a. If any of years, months, and weeks are not zero, then
                if years == 0.0 && months == 0.0 && weeks == 0.0 {
                    return Ok(*self);
                }
                // i. If calendar is undefined, then
                //     1. Throw a RangeError exception.
                let mut relative_to = required_anchor()?.clone();
                // ii. Repeat, while years ≠ 0,
                while years != 0.0 {
                    guard.tick()?;
                    let (next, one_year_days) =
                        relative_to.move_relative_date(&Self::one_year(sign))?;
                    relative_to = next;
                    days += one_year_days as f64;
                    years -= sign;
                }
                // iii. Repeat, while months ≠ 0,
                while months != 0.0 {
                    guard.tick()?;
                    let (next, one_month_days) =
                        relative_to.move_relative_date(&Self::one_month(sign))?;
                    relative_to = next;
                    days += one_month_days as f64;
                    months -= sign;
                }
                // iv. Repeat, while weeks ≠ 0,
                while weeks != 0.0 {
                    guard.tick()?;
                    let (next, one_week_days) =
                        relative_to.move_relative_date(&Self::one_week(sign))?;
                    relative_to = next;
                    days += one_week_days as f64;
                    weeks -= sign;
                }
            }
        }

        #[cfg(feature = "log")]
        log::trace!("unbalanced date duration in {} steps", guard.count());

        // 10. Return ? CreateDateDurationRecord(years, months, weeks, days).
        Self::new(years, months, weeks, days)
    }

    /// Equivalent: `BalanceDateDurationRelative`
    ///
    /// Moves whole units of days into weeks, months and years up to
    /// `largest_unit`, measured against `plain_relative_to`.
    pub(crate) fn balance_relative(
        &self,
        largest_unit: TemporalUnit,
        plain_relative_to: Option<&PlainDate>,
    ) -> TemporalResult<Self> {
        let (mut years, mut months, mut weeks, mut days) =
            (self.years, self.months, self.weeks, self.days);

        // 1. If largestUnit is not one of "year", "month", or "week", or years, months, weeks, and days are all 0, then
        if !largest_unit.is_calendar_unit() || self.sign() == Sign::Zero {
            // a. Return ! CreateDateDurationRecord(years, months, weeks, days).
            return Ok(*self);
        }

        // 2. If relativeTo is undefined, then
        //     a. Throw a RangeError exception.
        let mut relative_to = plain_relative_to
            .ok_or(TemporalError::range().with_enum(ErrorMessage::DurationRelativeToRequired))?
            .clone();

        // 3. Let sign be ! DurationSign(years, months, weeks, days, 0, 0, 0, 0, 0, 0).
        // 4. Assert: sign ≠ 0.
        let sign = f64::from(self.sign().as_sign_multiplier());

        let mut guard = IterationGuard::default();
        match largest_unit {
            // 8. If largestUnit is "year", then
            TemporalUnit::Year => {
                // a. Let moveResult be ? MoveRelativeDate(calendar, relativeTo, oneYear).
                // b. Let newRelativeTo be moveResult.[[RelativeTo]].
                // c. Let oneYearDays be moveResult.[[Days]].
                let (mut new_relative_to, mut one_year_days) =
                    relative_to.move_relative_date(&Self::one_year(sign))?;
                // d. Repeat, while abs(days) ≥ abs(oneYearDays),
                while days.abs() >= (one_year_days as f64).abs() {
                    guard.tick()?;
                    // i. Set days to days - oneYearDays.
                    days -= one_year_days as f64;
                    // ii. Set years to years + sign.
                    years += sign;
                    // iii. Set relativeTo to newRelativeTo.
                    relative_to = new_relative_to;
                    // iv. Set moveResult to ? MoveRelativeDate(calendar, relativeTo, oneYear).
                    (new_relative_to, one_year_days) =
                        relative_to.move_relative_date(&Self::one_year(sign))?;
                }

                // e. Set moveResult to ? MoveRelativeDate(calendar, relativeTo, oneMonth).
                let (mut new_relative_to, mut one_month_days) =
                    relative_to.move_relative_date(&Self::one_month(sign))?;
                // f. Repeat, while abs(days) ≥ abs(oneMonthDays),
                while days.abs() >= (one_month_days as f64).abs() {
                    guard.tick()?;
                    days -= one_month_days as f64;
                    months += sign;
                    relative_to = new_relative_to;
                    (new_relative_to, one_month_days) =
                        relative_to.move_relative_date(&Self::one_month(sign))?;
                }

                // g. Repeat, while abs(months) ≥ abs(oneYearMonths),
                // An ISO year always spans twelve months.
                let whole_years = (months / 12.0).trunc();
                years += whole_years;
                months -= whole_years * 12.0;
            }
            // 9. Else if largestUnit is "month", then
            TemporalUnit::Month => {
                let (mut new_relative_to, mut one_month_days) =
                    relative_to.move_relative_date(&Self::one_month(sign))?;
                // c. Repeat, while abs(days) ≥ abs(oneMonthDays),
                while days.abs() >= (one_month_days as f64).abs() {
                    guard.tick()?;
                    days -= one_month_days as f64;
                    months += sign;
                    relative_to = new_relative_to;
                    (new_relative_to, one_month_days) =
                        relative_to.move_relative_date(&Self::one_month(sign))?;
                }
            }
            // 10. Else,
            _ => {
                // a. Assert: largestUnit is "week".
                let (mut new_relative_to, mut one_week_days) =
                    relative_to.move_relative_date(&Self::one_week(sign))?;
                // c. Repeat, while abs(days) ≥ abs(oneWeekDays),
                while days.abs() >= (one_week_days as f64).abs() {
                    guard.tick()?;
                    days -= one_week_days as f64;
                    weeks += sign;
                    relative_to = new_relative_to;
                    (new_relative_to, one_week_days) =
                        relative_to.move_relative_date(&Self::one_week(sign))?;
                }
            }
        }

        #[cfg(feature = "log")]
        log::trace!("balanced date duration in {} steps", guard.count());

        // 11. Return ! CreateDateDurationRecord(years, months, weeks, days).
        Self::new(years, months, weeks, days)
    }
}

impl DateDuration {
    /// Creates a new `DateDuration` with provided values.
    #[inline]
    pub fn new(years: f64, months: f64, weeks: f64, days: f64) -> TemporalResult<Self> {
        let result = Self::new_unchecked(years, months, weeks, days);
        if !is_valid_duration(&result, &TimeDuration::default()) {
            return Err(TemporalError::range().with_message("Invalid DateDuration."));
        }
        Ok(result)
    }

    /// Returns a negated `DateDuration`.
    #[inline]
    #[must_use]
    pub fn negated(&self) -> Self {
        let negate = |value: f64| if value == 0.0 { 0.0 } else { -value };
        Self {
            years: negate(self.years),
            months: negate(self.months),
            weeks: negate(self.weeks),
            days: negate(self.days),
        }
    }

    /// Returns a new `DateDuration` representing the absolute value of the current.
    #[inline]
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            years: self.years.abs(),
            months: self.months.abs(),
            weeks: self.weeks.abs(),
            days: self.days.abs(),
        }
    }

    /// Returns the sign for the current `DateDuration`.
    #[inline]
    #[must_use]
    pub fn sign(&self) -> Sign {
        duration_sign(&self.fields())
    }
}

impl PlainDate {
    /// `MoveRelativeDate`: adds a date duration to this anchor and returns
    /// the new anchor with the number of days moved.
    pub(crate) fn move_relative_date(
        &self,
        duration: &DateDuration,
    ) -> TemporalResult<(PlainDate, i64)> {
        // 1. Let newDate be ? CalendarDateAdd(calendar, relativeTo, duration).
        let new_date =
            self.calendar()
                .date_add(&self.iso, duration, ArithmeticOverflow::Constrain)?;
        // 2. Let days be DaysUntil(relativeTo, newDate).
        let days = self.iso.days_until(&new_date.iso);
        // 3. Return the Record { [[RelativeTo]]: newDate, [[Days]]: days }.
        Ok((new_date, days))
    }
}

impl IsoDate {
    /// `DaysUntil`
    #[inline]
    pub(crate) fn days_until(&self, other: &Self) -> i64 {
        other.to_epoch_days() - self.to_epoch_days()
    }
}
