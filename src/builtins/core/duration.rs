//! This module implements `Duration` along with it's methods and components.

use crate::{
    builtins::core::{zoneddatetime::add_zoned_date_time, PlainDate, ZonedDateTime},
    error::ErrorMessage,
    options::{
        ArithmeticOverflow, RelativeTo, ResolvedRoundingOptions, RoundingIncrement,
        RoundingOptions, TemporalRoundingMode, TemporalUnit, ToStringRoundingOptions,
    },
    parsers::{FormattableDateDuration, FormattableDuration, FormattableTimeDuration, Precision},
    primitive::FiniteF64,
    provider::TimeZoneProvider,
    Sign, TemporalError, TemporalResult, TemporalUnwrap, MAX_RELATIVE_ITERATIONS,
};
use alloc::format;
use alloc::string::String;
use core::{cmp::Ordering, num::NonZeroU128, str::FromStr};
use core_maths::CoreFloat;
use ixdtf::{parsers::IsoDurationParser, records::TimeDurationRecord};
use timezone_provider::epoch_nanoseconds::is_valid_epoch_nanos;
use writeable::Writeable;

use self::normalized::{NormalizedDurationRecord, NormalizedTimeDuration, NS_PER_DAY_128BIT};

mod date;
pub(crate) mod normalized;
mod time;

#[cfg(test)]
mod tests;

#[doc(inline)]
pub use date::DateDuration;
#[doc(inline)]
pub use time::TimeDuration;

/// A `PartialDuration` is a Duration that may have fields not set.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct PartialDuration {
    /// A potentially existent `years` field.
    pub years: Option<FiniteF64>,
    /// A potentially existent `months` field.
    pub months: Option<FiniteF64>,
    /// A potentially existent `weeks` field.
    pub weeks: Option<FiniteF64>,
    /// A potentially existent `days` field.
    pub days: Option<FiniteF64>,
    /// A potentially existent `hours` field.
    pub hours: Option<FiniteF64>,
    /// A potentially existent `minutes` field.
    pub minutes: Option<FiniteF64>,
    /// A potentially existent `seconds` field.
    pub seconds: Option<FiniteF64>,
    /// A potentially existent `milliseconds` field.
    pub milliseconds: Option<FiniteF64>,
    /// A potentially existent `microseconds` field.
    pub microseconds: Option<FiniteF64>,
    /// A potentially existent `nanoseconds` field.
    pub nanoseconds: Option<FiniteF64>,
}

impl PartialDuration {
    /// Returns whether the `PartialDuration` is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// The native Rust implementation of `Temporal.Duration`.
///
/// `Duration` is made up of a `DateDuration` and `TimeDuration`. Every field
/// is an integral `f64`, and all non-zero fields share the same sign.
///
/// ```rust
/// use temporal_iso::Duration;
/// use core::str::FromStr;
///
/// let duration = Duration::from_str("-P1Y2M3DT4H5M6.5S").unwrap();
/// assert_eq!(duration.years(), -1.0);
/// assert_eq!(duration.milliseconds(), -500.0);
/// assert_eq!(duration.to_string(), "-P1Y2M3DT4H5M6.5S");
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Duration {
    date: DateDuration,
    time: TimeDuration,
}

impl core::fmt::Display for Duration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        duration_to_formattable(self, Precision::Auto)
            .map_err(|_| core::fmt::Error)?
            .write_to(f)
    }
}

// NOTE: Structure of the below is going to be a little convoluted,
// but intended to section everything based on the below
//
// Notation - [section](sub-section(s)).
//
// Sections:
//   - Creation (private/public)
//   - Getters/Setters
//   - Methods (private/public/feature)
//

// ==== Private Creation methods ====

impl Duration {
    /// Creates a new `Duration` from a `DateDuration` and `TimeDuration`.
    #[inline]
    pub(crate) const fn new_unchecked(date: DateDuration, time: TimeDuration) -> Self {
        Self { date, time }
    }

    /// Creates a new `Duration` from its parts, validating the combined fields.
    pub(crate) fn try_from_parts(date: DateDuration, time: TimeDuration) -> TemporalResult<Self> {
        if !is_valid_duration(&date, &time) {
            return Err(TemporalError::range().with_message("Duration was not valid."));
        }
        Ok(Self::new_unchecked(date, time))
    }

    /// Returns the fields of the `Duration` from years to nanoseconds.
    pub(crate) fn fields(&self) -> [f64; 10] {
        let [years, months, weeks, days] = self.date.fields();
        let [hours, minutes, seconds, milliseconds, microseconds, nanoseconds] =
            self.time.fields();
        [
            years,
            months,
            weeks,
            days,
            hours,
            minutes,
            seconds,
            milliseconds,
            microseconds,
            nanoseconds,
        ]
    }

    /// Returns whether the `Duration` only carries time fields.
    #[inline]
    #[must_use]
    pub(crate) fn is_time_duration(&self) -> bool {
        self.date == DateDuration::default()
    }

    /// Equivalent: `DefaultTemporalLargestUnit`
    #[inline]
    #[must_use]
    pub(crate) fn default_largest_unit(&self) -> TemporalUnit {
        const UNITS: [TemporalUnit; 10] = [
            TemporalUnit::Year,
            TemporalUnit::Month,
            TemporalUnit::Week,
            TemporalUnit::Day,
            TemporalUnit::Hour,
            TemporalUnit::Minute,
            TemporalUnit::Second,
            TemporalUnit::Millisecond,
            TemporalUnit::Microsecond,
            TemporalUnit::Nanosecond,
        ];
        self.fields()
            .iter()
            .zip(UNITS)
            .find_map(|(value, unit)| (*value != 0.0).then_some(unit))
            .unwrap_or(TemporalUnit::Nanosecond)
    }

    /// Returns the normalized time duration of this `Duration`.
    #[inline]
    pub(crate) fn normalized_time(&self) -> TemporalResult<NormalizedTimeDuration> {
        self.time.to_normalized()
    }
}

// ==== Public Duration API ====

impl Duration {
    /// Creates a new validated `Duration`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        years: f64,
        months: f64,
        weeks: f64,
        days: f64,
        hours: f64,
        minutes: f64,
        seconds: f64,
        milliseconds: f64,
        microseconds: f64,
        nanoseconds: f64,
    ) -> TemporalResult<Self> {
        Self::try_from_parts(
            DateDuration::new_unchecked(years, months, weeks, days),
            TimeDuration::new_unchecked(
                hours,
                minutes,
                seconds,
                milliseconds,
                microseconds,
                nanoseconds,
            ),
        )
    }

    /// Creates a `Duration` from only a day and `TimeDuration` component.
    #[must_use]
    pub fn from_day_and_time(day: f64, time: &TimeDuration) -> Self {
        Self {
            date: DateDuration::new_unchecked(0.0, 0.0, 0.0, day),
            time: *time,
        }
    }

    /// Creates a `Duration` from a provided `PartialDuration`.
    ///
    /// An empty `PartialDuration` is a `TypeError`.
    pub fn from_partial_duration(partial: PartialDuration) -> TemporalResult<Self> {
        if partial.is_empty() {
            return Err(TemporalError::r#type().with_enum(ErrorMessage::FieldsEmpty));
        }
        Self::default().with(partial)
    }

    /// Returns a new `Duration` with the fields of `partial` replacing the
    /// current values.
    pub fn with(&self, partial: PartialDuration) -> TemporalResult<Self> {
        if partial.is_empty() {
            return Err(TemporalError::r#type().with_enum(ErrorMessage::FieldsEmpty));
        }
        let pick = |value: Option<FiniteF64>, current: f64| value.map_or(current, f64::from);
        Self::new(
            pick(partial.years, self.years()),
            pick(partial.months, self.months()),
            pick(partial.weeks, self.weeks()),
            pick(partial.days, self.days()),
            pick(partial.hours, self.hours()),
            pick(partial.minutes, self.minutes()),
            pick(partial.seconds, self.seconds()),
            pick(partial.milliseconds, self.milliseconds()),
            pick(partial.microseconds, self.microseconds()),
            pick(partial.nanoseconds, self.nanoseconds()),
        )
    }

    /// Return if the Durations values are within their valid ranges.
    #[inline]
    #[must_use]
    pub fn is_time_within_range(&self) -> bool {
        self.time.is_within_range()
    }

    /// Compares two `Duration`s, resolving calendar units against `relative_to`.
    ///
    /// Equivalent: `Temporal.Duration.compare`
    pub fn compare_with_provider(
        &self,
        other: &Duration,
        relative_to: Option<RelativeTo>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Ordering> {
        // 5. If one.[[Years]] = two.[[Years]], and ... one.[[Nanoseconds]] = two.[[Nanoseconds]], then
        if self == other {
            // a. Return +0𝔽.
            return Ok(Ordering::Equal);
        }
        // 8. Let largestUnit1 be DefaultTemporalLargestUnit(one).
        // 9. Let largestUnit2 be DefaultTemporalLargestUnit(two).
        let largest_unit_1 = self.default_largest_unit();
        let largest_unit_2 = other.default_largest_unit();
        // 12. If zonedRelativeTo is not undefined, and either largestUnit1 or largestUnit2 is a date unit, then
        if let Some(RelativeTo::ZonedDateTime(zdt)) = relative_to.as_ref() {
            if largest_unit_1.is_date_unit() || largest_unit_2.is_date_unit() {
                // c. Let after1 be ? AddZonedDateTime(zonedRelativeTo.[[EpochNanoseconds]], timeZone, calendar, duration1, constrain).
                // d. Let after2 be ? AddZonedDateTime(zonedRelativeTo.[[EpochNanoseconds]], timeZone, calendar, duration2, constrain).
                let after1 = zdt.add_as_epoch_nanoseconds(self, provider)?;
                let after2 = zdt.add_as_epoch_nanoseconds(other, provider)?;
                // e. If after1 > after2, return 1𝔽.
                // f. If after1 < after2, return -1𝔽.
                // g. Return +0𝔽.
                return Ok(after1.cmp(&after2));
            }
        }
        // 13. If IsCalendarUnit(largestUnit1) is true or IsCalendarUnit(largestUnit2) is true, then
        let (days1, days2) =
            if largest_unit_1.is_calendar_unit() || largest_unit_2.is_calendar_unit() {
                // a. If plainRelativeTo is undefined, throw a RangeError exception.
                let Some(RelativeTo::PlainDate(plain)) = relative_to.as_ref() else {
                    return Err(
                        TemporalError::range().with_enum(ErrorMessage::DurationRelativeToRequired)
                    );
                };
                // b. Let days1 be ? UnbalanceDateDurationRelative(duration1, "day", plainRelativeTo).[[Days]].
                // c. Let days2 be ? UnbalanceDateDurationRelative(duration2, "day", plainRelativeTo).[[Days]].
                let days1 = self
                    .date
                    .unbalance_relative(TemporalUnit::Day, Some(plain))?
                    .days;
                let days2 = other
                    .date
                    .unbalance_relative(TemporalUnit::Day, Some(plain))?
                    .days;
                (days1, days2)
            } else {
                (self.days(), other.days())
            };
        // 15. Let timeDuration1 be ? Add24HourDaysToTimeDuration(duration1.[[Time]], days1).
        let time_duration_1 = self.normalized_time()?.add_days(days1 as i64)?;
        // 16. Let timeDuration2 be ? Add24HourDaysToTimeDuration(duration2.[[Time]], days2).
        let time_duration_2 = other.normalized_time()?.add_days(days2 as i64)?;
        // 17. Return 𝔽(CompareTimeDuration(timeDuration1, timeDuration2)).
        Ok(time_duration_1.cmp(&time_duration_2))
    }
}

// ==== Public `Duration` Getters/Setters ====

impl Duration {
    /// Returns a reference to the inner `TimeDuration`
    #[inline]
    #[must_use]
    pub fn time(&self) -> &TimeDuration {
        &self.time
    }

    /// Returns a reference to the inner `DateDuration`
    #[inline]
    #[must_use]
    pub fn date(&self) -> &DateDuration {
        &self.date
    }

    /// Returns the `years` field of duration.
    #[inline]
    #[must_use]
    pub const fn years(&self) -> f64 {
        self.date.years
    }

    /// Returns the `months` field of duration.
    #[inline]
    #[must_use]
    pub const fn months(&self) -> f64 {
        self.date.months
    }

    /// Returns the `weeks` field of duration.
    #[inline]
    #[must_use]
    pub const fn weeks(&self) -> f64 {
        self.date.weeks
    }

    /// Returns the `days` field of duration.
    #[inline]
    #[must_use]
    pub const fn days(&self) -> f64 {
        self.date.days
    }

    /// Returns the `hours` field of duration.
    #[inline]
    #[must_use]
    pub const fn hours(&self) -> f64 {
        self.time.hours
    }

    /// Returns the `minutes` field of duration.
    #[inline]
    #[must_use]
    pub const fn minutes(&self) -> f64 {
        self.time.minutes
    }

    /// Returns the `seconds` field of duration.
    #[inline]
    #[must_use]
    pub const fn seconds(&self) -> f64 {
        self.time.seconds
    }

    /// Returns the `milliseconds` field of duration.
    #[inline]
    #[must_use]
    pub const fn milliseconds(&self) -> f64 {
        self.time.milliseconds
    }

    /// Returns the `microseconds` field of duration.
    #[inline]
    #[must_use]
    pub const fn microseconds(&self) -> f64 {
        self.time.microseconds
    }

    /// Returns the `nanoseconds` field of duration.
    #[inline]
    #[must_use]
    pub const fn nanoseconds(&self) -> f64 {
        self.time.nanoseconds
    }
}

// ==== Public Duration methods ====

impl Duration {
    /// Determines the sign for the current self.
    #[inline]
    #[must_use]
    pub fn sign(&self) -> Sign {
        duration_sign(&self.fields())
    }

    /// Returns whether the current `Duration` is zero.
    ///
    /// Equivalent to `Temporal.Duration.prototype.blank`.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.sign() == Sign::Zero
    }

    /// Returns a negated `Duration`
    #[inline]
    #[must_use]
    pub fn negated(&self) -> Self {
        Self {
            date: self.date.negated(),
            time: self.time.negated(),
        }
    }

    /// Returns the absolute value of `Duration`.
    #[inline]
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            date: self.date.abs(),
            time: self.time.abs(),
        }
    }

    /// Returns the result of adding a `Duration` to the current `Duration`.
    ///
    /// Calendar units require `relative_to`. With a `ZonedDateTime` anchor,
    /// days follow the lengths of the days in its time zone.
    pub fn add_with_provider(
        &self,
        other: &Self,
        relative_to: Option<RelativeTo>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        // 1. Let largestUnit1 be ! DefaultTemporalLargestUnit(y1, mon1, w1, d1, h1, min1, s1, ms1, mus1).
        // 2. Let largestUnit2 be ! DefaultTemporalLargestUnit(y2, mon2, w2, d2, h2, min2, s2, ms2, mus2).
        // 3. Let largestUnit be ! LargerOfTwoTemporalUnits(largestUnit1, largestUnit2).
        let largest_unit = self
            .default_largest_unit()
            .max(other.default_largest_unit());
        let norm = self.normalized_time()?.checked_add(&other.normalized_time()?)?;

        match relative_to {
            // 4. If relativeTo is undefined, then
            None => {
                // a. If largestUnit is one of "year", "month", or "week", then
                if largest_unit.is_calendar_unit() {
                    // i. Throw a RangeError exception.
                    return Err(
                        TemporalError::range().with_enum(ErrorMessage::DurationRelativeToRequired)
                    );
                }
                // b. Let result be ? BalanceDuration(d1 + d2, h1 + h2, min1 + min2, s1 + s2, ms1 + ms2, mus1 + mus2, ns1 + ns2, largestUnit).
                let norm = norm.add_days((self.days() + other.days()) as i64)?;
                let (days, time) = TimeDuration::balance(norm, largest_unit)?;
                // c. Return ! CreateDurationRecord(0, 0, 0, result.[[Days]], result.[[Hours]], ...).
                Self::try_from_parts(DateDuration::new_unchecked(0.0, 0.0, 0.0, days as f64), time)
            }
            // 5. If relativeTo has an [[InitializedTemporalDate]] internal slot, then
            Some(RelativeTo::PlainDate(plain)) => {
                let calendar = plain.calendar();
                // c. Let intermediate be ? CalendarDateAdd(calendar, relativeTo, dateDuration1, undefined, dateAdd).
                let intermediate =
                    calendar.date_add(&plain.iso, &self.date, ArithmeticOverflow::Constrain)?;
                // d. Let end be ? CalendarDateAdd(calendar, intermediate, dateDuration2, undefined, dateAdd).
                let end = calendar.date_add(
                    &intermediate.iso,
                    &other.date,
                    ArithmeticOverflow::Constrain,
                )?;
                // e. Let dateLargestUnit be ! LargerOfTwoTemporalUnits("day", largestUnit).
                let date_largest_unit = largest_unit.max(TemporalUnit::Day);
                // g. Let dateDifference be ? CalendarDateUntil(calendar, relativeTo, end, differenceOptions).
                let date_difference = calendar.date_until(&plain.iso, &end.iso, date_largest_unit)?;
                // h. Let result be ? BalanceDuration(dateDifference.[[Days]], h1 + h2, ..., largestUnit).
                let norm = norm.add_days(date_difference.days() as i64)?;
                let (days, time) = TimeDuration::balance(norm, largest_unit)?;
                // i. Return ? CreateDurationRecord(dateDifference.[[Years]], dateDifference.[[Months]], dateDifference.[[Weeks]], result.[[Days]], ...).
                Self::try_from_parts(
                    DateDuration::new_unchecked(
                        date_difference.years(),
                        date_difference.months(),
                        date_difference.weeks(),
                        days as f64,
                    ),
                    time,
                )
            }
            // 6. Assert: relativeTo has an [[InitializedTemporalZonedDateTime]] internal slot.
            Some(RelativeTo::ZonedDateTime(zdt)) => {
                // 9. Let intermediateNs be ? AddZonedDateTime(relativeTo.[[Nanoseconds]], timeZone, calendar, y1, mon1, w1, d1, h1, min1, s1, ms1, mus1, ns1).
                let intermediate = zdt.add_as_epoch_nanoseconds(self, provider)?;
                // 10. Let endNs be ? AddZonedDateTime(intermediateNs, timeZone, calendar, y2, mon2, w2, d2, h2, min2, s2, ms2, mus2, ns2).
                let end = add_zoned_date_time(
                    intermediate,
                    zdt.timezone(),
                    zdt.calendar(),
                    &other.date,
                    other.normalized_time()?,
                    ArithmeticOverflow::Constrain,
                    provider,
                )?;
                let start = zdt.epoch_nanoseconds().as_i128();
                // 11. If largestUnit is not one of "year", "month", "week", or "day", then
                if !largest_unit.is_date_unit() {
                    // a. Let result be ! DifferenceInstant(relativeTo.[[Nanoseconds]], endNs, 1, "nanosecond", largestUnit, "halfExpand").
                    let norm = NormalizedTimeDuration::from_nanosecond_difference(end, start)?;
                    let (_, time) = TimeDuration::balance(norm, largest_unit)?;
                    // b. Return ! CreateDurationRecord(0, 0, 0, 0, result.[[Hours]], ...).
                    return Self::try_from_parts(DateDuration::default(), time);
                }
                // 12. Return ? DifferenceZonedDateTime(relativeTo.[[Nanoseconds]], endNs, timeZone, calendar, largestUnit).
                let record = zdt.diff_zoned_datetime_nanos(end, largest_unit, provider)?;
                let (_, time) = TimeDuration::balance(record.norm, TemporalUnit::Hour)?;
                Self::try_from_parts(record.date, time)
            }
        }
    }

    /// Returns the result of subtracting a `Duration` from the current `Duration`
    #[inline]
    pub fn subtract_with_provider(
        &self,
        other: &Self,
        relative_to: Option<RelativeTo>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        self.add_with_provider(&other.negated(), relative_to, provider)
    }

    /// Rounds the current `Duration` according to `options`.
    ///
    /// Equivalent: `Temporal.Duration.prototype.round`
    pub fn round_with_provider(
        &self,
        options: RoundingOptions,
        relative_to: Option<RelativeTo>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        // 14-25. Resolve smallestUnit, largestUnit, roundingIncrement and roundingMode.
        let existing_largest_unit = self.default_largest_unit();
        let resolved_options =
            ResolvedRoundingOptions::from_duration_options(options, existing_largest_unit)?;
        let largest_unit = resolved_options.largest_unit;

        let (plain_relative_to, zoned_relative_to) = split_relative_to(relative_to, provider)?;

        // 26. Let hoursToDaysConversionMayOccur be false.
        // 27. If duration.[[Days]] ≠ 0 and zonedRelativeTo is not undefined, set hoursToDaysConversionMayOccur to true.
        // 28. Else if abs(duration.[[Hours]]) ≥ 24, set hoursToDaysConversionMayOccur to true.
        let hours_to_days_may_occur =
            (self.days() != 0.0 && zoned_relative_to.is_some()) || self.hours().abs() >= 24.0;
        // 30. If duration.[[Years]] = 0 and duration.[[Months]] = 0 and duration.[[Weeks]] = 0,
        // let calendarUnitsPresent be false; else let calendarUnitsPresent be true.
        let calendar_units_present =
            !(self.years() == 0.0 && self.months() == 0.0 && self.weeks() == 0.0);

        // 31. If roundingGranularityIsNoop is true, and largestUnit is existingLargestUnit, and calendarUnitsPresent is false,
        // and hoursToDaysConversionMayOccur is false, and abs(duration.[[Minutes]]) < 60, and abs(duration.[[Seconds]]) < 60,
        // and abs(duration.[[Milliseconds]]) < 1000, and abs(duration.[[Microseconds]]) < 1000, and abs(duration.[[Nanoseconds]]) < 1000, then
        if resolved_options.is_noop()
            && largest_unit == existing_largest_unit
            && !calendar_units_present
            && !hours_to_days_may_occur
            && self.minutes().abs() < 60.0
            && self.seconds().abs() < 60.0
            && self.milliseconds().abs() < 1000.0
            && self.microseconds().abs() < 1000.0
            && self.nanoseconds().abs() < 1000.0
        {
            // b. Return ! CreateTemporalDuration(duration.[[Years]], ..., duration.[[Nanoseconds]]).
            return Ok(*self);
        }

        if plain_relative_to.is_none() && (calendar_units_present || largest_unit.is_calendar_unit())
        {
            return Err(TemporalError::range().with_enum(ErrorMessage::DurationRelativeToRequired));
        }

        // 39. Let unbalanceResult be ? UnbalanceDateDurationRelative(duration.[[Years]], duration.[[Months]], duration.[[Weeks]], duration.[[Days]], largestUnit, plainRelativeTo).
        let unbalanced = self
            .date
            .unbalance_relative(largest_unit, plain_relative_to.as_ref())?;
        let record = NormalizedDurationRecord::new(unbalanced, self.normalized_time()?)?;

        // 40. Let roundRecord be ? RoundDuration(unbalanceResult.[[Years]], ..., roundingIncrement, smallestUnit, roundingMode, plainRelativeTo, zonedRelativeTo).
        // 41. Let roundResult be roundRecord.[[DurationRecord]].
        let (rounded, _) = record.round_relative(
            resolved_options,
            plain_relative_to.as_ref(),
            zoned_relative_to.as_ref(),
            provider,
        )?;

        let (rounded, days, time) = if let Some(zdt) = zoned_relative_to.as_ref() {
            // 42. If zonedRelativeTo is not undefined, then
            // a. Set roundResult to ? AdjustRoundedDurationDays(roundResult.[[Years]], ..., roundingIncrement, smallestUnit, roundingMode, zonedRelativeTo).
            let adjusted = rounded.adjust_rounded_days(resolved_options, zdt, provider)?;
            // b. Let balanceResult be ? BalanceTimeDurationRelative(roundResult.[[Days]], ..., largestUnit, zonedRelativeTo).
            let anchor = zdt.move_relative(
                &DateDuration::new_unchecked(
                    adjusted.date.years,
                    adjusted.date.months,
                    adjusted.date.weeks,
                    0.0,
                ),
                provider,
            )?;
            let (days, norm) = balance_time_duration_relative(
                adjusted.date.days as i128,
                adjusted.norm,
                largest_unit,
                &anchor,
                provider,
            )?;
            let time_largest_unit = if largest_unit.is_date_unit() {
                TemporalUnit::Hour
            } else {
                largest_unit
            };
            let (_, time) = TimeDuration::balance(norm, time_largest_unit)?;
            (adjusted, days, time)
        } else {
            // 43. Else,
            // a. Let balanceResult be ? BalanceTimeDuration(roundResult.[[Days]], ..., largestUnit).
            let norm = rounded.norm.add_days(rounded.date.days as i64)?;
            let (days, time) = TimeDuration::balance(norm, largest_unit)?;
            (rounded, days, time)
        };

        // 44. Let result be ? BalanceDateDurationRelative(roundResult.[[Years]], roundResult.[[Months]], roundResult.[[Weeks]], balanceResult.[[Days]], largestUnit, plainRelativeTo).
        let date = DateDuration::new(
            rounded.date.years,
            rounded.date.months,
            rounded.date.weeks,
            days as f64,
        )?
        .balance_relative(largest_unit, plain_relative_to.as_ref())?;

        // 45. Return ! CreateTemporalDuration(result.[[Years]], ..., balanceResult.[[Nanoseconds]]).
        Self::try_from_parts(date, time)
    }

    /// Returns the total of the `Duration` expressed in `unit`.
    ///
    /// Equivalent: `Temporal.Duration.prototype.total`
    pub fn total_with_provider(
        &self,
        unit: TemporalUnit,
        relative_to: Option<RelativeTo>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<f64> {
        if unit == TemporalUnit::Auto {
            return Err(TemporalError::range().with_enum(ErrorMessage::UnitNoAutoDuringComparison));
        }
        let (plain_relative_to, zoned_relative_to) = split_relative_to(relative_to, provider)?;

        // 8. Let unbalanceResult be ? UnbalanceDurationRelative(duration.[[Years]], duration.[[Months]], duration.[[Weeks]], duration.[[Days]], unit, relativeTo).
        let unbalanced = self
            .date
            .unbalance_relative(unit, plain_relative_to.as_ref())?;
        let norm = self.normalized_time()?;

        // 10. If relativeTo has an [[InitializedTemporalZonedDateTime]] internal slot, then
        let (days, norm) = if let Some(zdt) = zoned_relative_to.as_ref() {
            // a. Set intermediate to ? MoveRelativeZonedDateTime(relativeTo, unbalanceResult.[[Years]], unbalanceResult.[[Months]], unbalanceResult.[[Weeks]], 0).
            let intermediate = zdt.move_relative(
                &DateDuration::new_unchecked(
                    unbalanced.years,
                    unbalanced.months,
                    unbalanced.weeks,
                    0.0,
                ),
                provider,
            )?;
            // 11. Let balanceResult be ? BalanceDuration(unbalanceResult.[[Days]], duration.[[Hours]], ..., unit, intermediate).
            balance_time_duration_relative(
                unbalanced.days as i128,
                norm,
                unit,
                &intermediate,
                provider,
            )?
        } else {
            let norm = norm.add_days(unbalanced.days as i64)?;
            if unit.is_date_unit() {
                (
                    norm.0 / NS_PER_DAY_128BIT,
                    NormalizedTimeDuration(norm.0 % NS_PER_DAY_128BIT),
                )
            } else {
                (0, norm)
            }
        };

        let record = NormalizedDurationRecord::new(
            DateDuration::new(
                unbalanced.years,
                unbalanced.months,
                unbalanced.weeks,
                days as f64,
            )?,
            norm,
        )?;

        // 12. Let roundRecord be ? RoundDuration(unbalanceResult.[[Years]], ..., 1, unit, "trunc", relativeTo).
        let options = ResolvedRoundingOptions {
            largest_unit: unit,
            smallest_unit: unit,
            increment: RoundingIncrement::ONE,
            rounding_mode: TemporalRoundingMode::Trunc,
        };
        let (_, total) = record.round_relative(
            options,
            plain_relative_to.as_ref(),
            zoned_relative_to.as_ref(),
            provider,
        )?;
        // 20. Return 𝔽(roundRecord.[[Total]]).
        Ok(total)
    }

    /// Returns the `Duration` as a formatted string
    pub fn as_temporal_string(&self, options: ToStringRoundingOptions) -> TemporalResult<String> {
        if options.smallest_unit == Some(TemporalUnit::Hour)
            || options.smallest_unit == Some(TemporalUnit::Minute)
        {
            return Err(TemporalError::range().with_message(
                "string rounding options cannot have hour or minute smallest unit.",
            ));
        }

        let resolved_options = options.resolve()?;
        if resolved_options.smallest_unit == TemporalUnit::Nanosecond
            && resolved_options.increment == RoundingIncrement::ONE
        {
            let duration = duration_to_formattable(self, resolved_options.precision)?;
            return Ok(duration.write_to_string().into_owned());
        }

        // 11. Let largestUnit be DefaultTemporalLargestUnit(duration).
        let largest = self.default_largest_unit();
        // 13. Let timeDuration be ? RoundTimeDuration(internalDuration.[[Time]], precision.[[Increment]], precision.[[Unit]], roundingMode).
        let unit_ns = resolved_options.smallest_unit.as_nanoseconds().temporal_unwrap()?;
        let step = NonZeroU128::new(u128::from(unit_ns) * u128::from(resolved_options.increment.get()))
            .temporal_unwrap()?;
        let rounded = self.normalized_time()?.round(step, resolved_options.mode)?;
        // 15. Let roundedLargestUnit be LargerOfTwoTemporalUnits(largestUnit, second).
        let rounded_largest = largest.max(TemporalUnit::Second);
        // 16. Let roundedDuration be ? TemporalDurationFromInternal(internalDuration, roundedLargestUnit).
        let (days, time) = TimeDuration::balance(rounded, rounded_largest)?;
        let rounded = Self::try_from_parts(
            DateDuration::new_unchecked(
                self.years(),
                self.months(),
                self.weeks(),
                self.days() + days as f64,
            ),
            time,
        )?;

        // 17. Return TemporalDurationToString(roundedDuration, precision.[[Precision]]).
        Ok(duration_to_formattable(&rounded, resolved_options.precision)?
            .write_to_string()
            .into_owned())
    }
}

/// Splits a `RelativeTo` into its plain date and zoned anchors. A
/// `ZonedDateTime` anchor also provides the plain date of its local time.
fn split_relative_to(
    relative_to: Option<RelativeTo>,
    provider: &impl TimeZoneProvider,
) -> TemporalResult<(Option<PlainDate>, Option<ZonedDateTime>)> {
    match relative_to {
        None => Ok((None, None)),
        Some(RelativeTo::PlainDate(date)) => Ok((Some(date), None)),
        Some(RelativeTo::ZonedDateTime(zdt)) => {
            let date = zdt.to_plain_date_with_provider(provider)?;
            Ok((Some(date), Some(zdt)))
        }
    }
}

/// Equivalent: `BalanceTimeDurationRelative`
///
/// `anchor` must already be moved by the years, months and weeks of the
/// duration. Returns the number of whole days, measured with the real day
/// lengths of the anchor's time zone when `largest_unit` is a date unit, and
/// the time remainder.
fn balance_time_duration_relative(
    days: i128,
    norm: NormalizedTimeDuration,
    largest_unit: TemporalUnit,
    anchor: &ZonedDateTime,
    provider: &impl TimeZoneProvider,
) -> TemporalResult<(i128, NormalizedTimeDuration)> {
    // 1. Let startNs be zonedRelativeTo.[[Nanoseconds]].
    let start = anchor.epoch_nanoseconds().as_i128();
    // 2. Let intermediateNs be startNs.
    // 3. If days ≠ 0, then
    let intermediate = if days != 0 {
        // a. Set intermediateNs to ? AddDaysToZonedDateTime(startInstant, startDateTime, timeZoneRec, calendar, days).[[EpochNanoseconds]].
        add_zoned_date_time(
            start,
            anchor.timezone(),
            anchor.calendar(),
            &DateDuration::new_unchecked(0.0, 0.0, 0.0, days as f64),
            NormalizedTimeDuration::default(),
            ArithmeticOverflow::Constrain,
            provider,
        )?
    } else {
        start
    };
    // 4. Let endNs be ? AddInstant(intermediateNs, norm).
    let end = intermediate + norm.0;
    if !is_valid_epoch_nanos(&end) {
        return Err(TemporalError::range().with_enum(ErrorMessage::InstantOutOfRange));
    }
    // 5. Set norm to NormalizedTimeDurationFromEpochNanosecondsDifference(endNs, startNs).
    let norm = NormalizedTimeDuration::from_nanosecond_difference(end, start)?;
    // 6. If NormalizedTimeDurationIsZero(norm) is true, return zeros.
    if norm.is_zero() {
        return Ok((0, norm));
    }
    // 7. If largestUnit is one of "year", "month", "week", or "day", then
    if largest_unit.is_date_unit() {
        // a. Let result be ? NanosecondsToDays(norm, zonedRelativeTo).
        let (days, remainder, _) = anchor.nanoseconds_to_days(norm.0, provider)?;
        // b. Set norm to result.[[Nanoseconds]] and days to result.[[Days]].
        return Ok((
            days,
            NormalizedTimeDuration::from_nanosecond_difference(remainder, 0)?,
        ));
    }
    // 8. Else, let days be 0.
    Ok((0, norm))
}

/// Counts the iterations of a relative-date loop and fails once
/// `MAX_RELATIVE_ITERATIONS` is exceeded.
#[derive(Debug, Default)]
pub(crate) struct IterationGuard(u32);

impl IterationGuard {
    #[inline]
    pub(crate) fn tick(&mut self) -> TemporalResult<()> {
        self.0 += 1;
        if self.0 > MAX_RELATIVE_ITERATIONS {
            #[cfg(feature = "log")]
            log::debug!("relative date loop exceeded {MAX_RELATIVE_ITERATIONS} iterations");
            return Err(TemporalError::range().with_enum(ErrorMessage::RelativeIterationLimit));
        }
        Ok(())
    }

    #[cfg(feature = "log")]
    pub(crate) fn count(&self) -> u32 {
        self.0
    }
}

pub(crate) fn duration_to_formattable(
    duration: &Duration,
    precision: Precision,
) -> TemporalResult<FormattableDuration> {
    let sign = duration.sign();
    let duration = duration.abs();
    let date = if duration.is_time_duration() {
        None
    } else {
        Some(FormattableDateDuration {
            years: duration.years() as u32,
            months: duration.months() as u32,
            weeks: duration.weeks() as u32,
            days: duration.days() as u64,
        })
    };

    // Seconds and their fractional part are written as one decimal number,
    // so the subsecond fields are folded into the seconds exactly.
    let time = NormalizedTimeDuration::from_time_duration(&TimeDuration::new_unchecked(
        0.0,
        0.0,
        duration.seconds(),
        duration.milliseconds(),
        duration.microseconds(),
        duration.nanoseconds(),
    ))?;

    let seconds = time.seconds().unsigned_abs();
    let subseconds = time.subseconds().unsigned_abs();

    let time = FormattableTimeDuration {
        hours: duration.hours() as u64,
        minutes: duration.minutes() as u64,
        seconds,
        subseconds,
    };

    Ok(FormattableDuration {
        precision,
        sign,
        date,
        time,
    })
}

/// Utility function to check whether the `Duration` fields are valid.
///
/// Equivalent: `IsValidDuration`
#[must_use]
pub(crate) fn is_valid_duration(date: &DateDuration, time: &TimeDuration) -> bool {
    const TWO_POWER_THIRTY_TWO: f64 = 4_294_967_296.0;
    // Any time field at or above this magnitude is out of range, even nanoseconds.
    const FIELD_LIMIT: f64 = 1e25;

    let date_fields = date.fields();
    let time_fields = time.fields();
    // 1. Let sign be ! DurationSign(years, months, weeks, days, hours, minutes, seconds, milliseconds, microseconds, nanoseconds).
    let sign = match duration_sign(&date_fields) {
        Sign::Zero => duration_sign(&time_fields),
        sign => sign,
    };
    // 2. For each value v of « years, months, weeks, days, hours, minutes, seconds, milliseconds, microseconds, nanoseconds », do
    for v in date_fields.iter().chain(time_fields.iter()) {
        // a. If 𝔽(v) is not finite, return false.
        if !v.is_finite() || v.fract() != 0.0 {
            return false;
        }
        // b. If v < 0 and sign > 0, return false.
        if *v < 0f64 && sign == Sign::Positive {
            return false;
        }
        // c. If v > 0 and sign < 0, return false.
        if *v > 0f64 && sign == Sign::Negative {
            return false;
        }
    }
    // 3. If abs(years) ≥ 2**32, return false.
    // 4. If abs(months) ≥ 2**32, return false.
    // 5. If abs(weeks) ≥ 2**32, return false.
    if date.years.abs() >= TWO_POWER_THIRTY_TWO
        || date.months.abs() >= TWO_POWER_THIRTY_TWO
        || date.weeks.abs() >= TWO_POWER_THIRTY_TWO
    {
        return false;
    }
    if date.days.abs() >= FIELD_LIMIT || time_fields.iter().any(|v| v.abs() >= FIELD_LIMIT) {
        return false;
    }

    // 6. Let normalizedSeconds be days × 86,400 + hours × 3600 + minutes × 60 + seconds
    // + ℝ(𝔽(milliseconds)) × 10**-3 + ℝ(𝔽(microseconds)) × 10**-6 + ℝ(𝔽(nanoseconds)) × 10**-9.
    // 7. NOTE: The above step cannot be implemented directly using floating-point arithmetic.
    // The total is computed in exact integer nanoseconds instead.
    let multipliers: [i128; 7] = [
        NS_PER_DAY_128BIT,
        3_600_000_000_000,
        60_000_000_000,
        1_000_000_000,
        1_000_000,
        1_000,
        1,
    ];
    let total = core::iter::once(date.days)
        .chain(time_fields)
        .zip(multipliers)
        .try_fold(0i128, |acc, (value, multiplier)| {
            (value as i128)
                .checked_mul(multiplier)
                .and_then(|v| acc.checked_add(v))
        });
    // 8. If abs(normalizedSeconds) ≥ 2**53, return false.
    // 9. Return true.
    total.is_some_and(|ns| ns.abs() <= normalized::MAX_TIME_DURATION)
}

/// Utility function for determining the sign for the current set of `Duration` fields.
///
/// Equivalent: 7.5.10 `DurationSign ( years, months, weeks, days, hours, minutes, seconds, milliseconds, microseconds, nanoseconds )`
#[inline]
#[must_use]
pub(crate) fn duration_sign(set: &[f64]) -> Sign {
    // 1. For each value v of « years, months, weeks, days, hours, minutes, seconds, milliseconds, microseconds, nanoseconds », do
    for v in set {
        // a. If v < 0, return -1.
        if *v < 0f64 {
            return Sign::Negative;
        // b. If v > 0, return 1.
        } else if *v > 0f64 {
            return Sign::Positive;
        }
    }
    // 2. Return 0.
    Sign::Zero
}

impl From<TimeDuration> for Duration {
    fn from(value: TimeDuration) -> Self {
        Self {
            time: value,
            date: DateDuration::default(),
        }
    }
}

impl From<DateDuration> for Duration {
    fn from(value: DateDuration) -> Self {
        Self {
            date: value,
            time: TimeDuration::default(),
        }
    }
}

// ==== FromStr trait impl ====

/// Splits a fraction of `unit_ns` nanoseconds into minutes, seconds,
/// milliseconds, microseconds and nanoseconds.
fn split_fraction(fraction_ns: u64, unit_ns: u64) -> [f64; 5] {
    // `fraction_ns` is a fraction of a second scaled to nine digits, so the
    // product is below the unit's length.
    let mut remainder = u128::from(fraction_ns) * u128::from(unit_ns) / 1_000_000_000;
    let mut parts = [0.0; 5];
    for (part, divisor) in parts
        .iter_mut()
        .zip([60_000_000_000u128, 1_000_000_000, 1_000_000, 1_000, 1])
    {
        *part = (remainder / divisor) as f64;
        remainder %= divisor;
    }
    parts
}

impl FromStr for Duration {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_record = IsoDurationParser::from_str(s)
            .parse()
            .map_err(|e| TemporalError::range().with_message(format!("{e}")))?;

        let (hours, minutes, [fraction_minutes, seconds, millis, micros, nanos]) =
            match parse_record.time {
                Some(TimeDurationRecord::Hours { hours, fraction }) => {
                    let fraction = fraction.and_then(|x| x.to_nanoseconds()).unwrap_or(0);
                    (
                        hours as f64,
                        0.0,
                        split_fraction(u64::from(fraction), 3_600_000_000_000),
                    )
                }
                Some(TimeDurationRecord::Minutes {
                    hours,
                    minutes,
                    fraction,
                }) => {
                    let fraction = fraction.and_then(|x| x.to_nanoseconds()).unwrap_or(0);
                    (
                        hours as f64,
                        minutes as f64,
                        split_fraction(u64::from(fraction), 60_000_000_000),
                    )
                }
                Some(TimeDurationRecord::Seconds {
                    hours,
                    minutes,
                    seconds,
                    fraction,
                }) => {
                    let fraction = fraction.and_then(|x| x.to_nanoseconds()).unwrap_or(0);
                    let [_, _, millis, micros, nanos] =
                        split_fraction(u64::from(fraction), 1_000_000_000);
                    (
                        hours as f64,
                        minutes as f64,
                        [0.0, seconds as f64, millis, micros, nanos],
                    )
                }
                None => (0.0, 0.0, [0.0; 5]),
            };

        let (years, months, weeks, days) = if let Some(date) = parse_record.date {
            (date.years, date.months, date.weeks, date.days)
        } else {
            (0, 0, 0, 0)
        };

        let duration = Self::new(
            f64::from(years),
            f64::from(months),
            f64::from(weeks),
            days as f64,
            hours,
            minutes + fraction_minutes,
            seconds,
            millis,
            micros,
            nanos,
        )?;

        if parse_record.sign == ixdtf::records::Sign::Negative {
            return Ok(duration.negated());
        }
        Ok(duration)
    }
}
