//! Native implementation of the `Temporal` options.
//!
//! Temporal has various instances where user's can define options for how an
//! operation may be completed. Each option type parses from, and displays as,
//! its ECMAScript option string.

use crate::{
    error::ErrorMessage, parsers::Precision, TemporalError, TemporalResult, MS_PER_DAY,
    NS_PER_DAY,
};
use core::{fmt, str::FromStr};

mod increment;
mod relative_to;

pub use increment::RoundingIncrement;
pub use relative_to::RelativeTo;

// ==== RoundingOptions / DifferenceSettings ====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DifferenceOperation {
    Until,
    Since,
}

/// The group of units an operation accepts for `largestUnit`/`smallestUnit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnitGroup {
    Date,
    Time,
    DateTime,
}

impl UnitGroup {
    fn validate(self, unit: TemporalUnit) -> TemporalResult<()> {
        match self {
            Self::Date if !unit.is_date_unit() && unit != TemporalUnit::Auto => {
                Err(TemporalError::range().with_enum(ErrorMessage::UnitNotDate))
            }
            Self::Time if !unit.is_time_unit() && unit != TemporalUnit::Auto => {
                Err(TemporalError::range().with_enum(ErrorMessage::UnitNotTime))
            }
            _ => Ok(()),
        }
    }
}

/// The options for an `until` or `since` operation.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DifferenceSettings {
    pub largest_unit: Option<TemporalUnit>,
    pub smallest_unit: Option<TemporalUnit>,
    pub rounding_mode: Option<TemporalRoundingMode>,
    pub increment: Option<RoundingIncrement>,
}

impl DifferenceSettings {
    /// Creates difference settings from the provided values.
    #[must_use]
    pub const fn new(
        largest_unit: Option<TemporalUnit>,
        smallest_unit: Option<TemporalUnit>,
        rounding_mode: Option<TemporalRoundingMode>,
        increment: Option<RoundingIncrement>,
    ) -> Self {
        Self {
            largest_unit,
            smallest_unit,
            rounding_mode,
            increment,
        }
    }
}

/// The options for a `round` operation.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RoundingOptions {
    pub largest_unit: Option<TemporalUnit>,
    pub smallest_unit: Option<TemporalUnit>,
    pub rounding_mode: Option<TemporalRoundingMode>,
    pub increment: Option<RoundingIncrement>,
}

impl RoundingOptions {
    /// Creates rounding options from the provided values.
    #[must_use]
    pub const fn new(
        largest_unit: Option<TemporalUnit>,
        smallest_unit: Option<TemporalUnit>,
        rounding_mode: Option<TemporalRoundingMode>,
        increment: Option<RoundingIncrement>,
    ) -> Self {
        Self {
            largest_unit,
            smallest_unit,
            rounding_mode,
            increment,
        }
    }

    /// Rounding options with only a `smallestUnit`.
    #[must_use]
    pub const fn with_smallest_unit(unit: TemporalUnit) -> Self {
        Self::new(None, Some(unit), None, None)
    }
}

/// Internal options object that represents the resolved rounding options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ResolvedRoundingOptions {
    pub(crate) largest_unit: TemporalUnit,
    pub(crate) smallest_unit: TemporalUnit,
    pub(crate) increment: RoundingIncrement,
    pub(crate) rounding_mode: TemporalRoundingMode,
}

impl ResolvedRoundingOptions {
    /// `GetDifferenceSettings`
    pub(crate) fn from_diff_settings(
        options: DifferenceSettings,
        operation: DifferenceOperation,
        unit_group: UnitGroup,
        disallowed: &[TemporalUnit],
        fallback_smallest: TemporalUnit,
        smallest_largest_default: TemporalUnit,
    ) -> TemporalResult<Self> {
        // 1. NOTE: The following steps read options and perform independent validation in alphabetical order.
        // 2. Let largestUnit be ? GetTemporalUnitValuedOption(options, "largestUnit", unitGroup, "auto").
        let largest_unit = options.largest_unit.unwrap_or(TemporalUnit::Auto);
        unit_group.validate(largest_unit)?;
        // 3. If disallowedUnits contains largestUnit, throw a RangeError exception.
        if disallowed.contains(&largest_unit) {
            return Err(TemporalError::range()
                .with_message("largestUnit is not allowed for this operation."));
        }
        // 4. Let roundingIncrement be ? GetRoundingIncrementOption(options).
        let increment = options.increment.unwrap_or_default();
        // 5. Let roundingMode be ? GetRoundingModeOption(options, "trunc").
        // 6. If operation is since, then
        //     a. Set roundingMode to NegateRoundingMode(roundingMode).
        let rounding_mode = match operation {
            DifferenceOperation::Until => options.rounding_mode.unwrap_or(TemporalRoundingMode::Trunc),
            DifferenceOperation::Since => options
                .rounding_mode
                .unwrap_or(TemporalRoundingMode::Trunc)
                .negate(),
        };
        // 7. Let smallestUnit be ? GetTemporalUnitValuedOption(options, "smallestUnit", unitGroup, fallbackSmallestUnit).
        let smallest_unit = options.smallest_unit.unwrap_or(fallback_smallest);
        if smallest_unit == TemporalUnit::Auto {
            return Err(TemporalError::range().with_message("smallestUnit cannot be 'auto'."));
        }
        unit_group.validate(smallest_unit)?;
        // 8. If disallowedUnits contains smallestUnit, throw a RangeError exception.
        if disallowed.contains(&smallest_unit) {
            return Err(TemporalError::range()
                .with_message("smallestUnit is not allowed for this operation."));
        }
        // 9. Let defaultLargestUnit be LargerOfTwoTemporalUnits(smallestLargestDefaultUnit, smallestUnit).
        let default_largest = smallest_largest_default.max(smallest_unit);
        // 10. If largestUnit is "auto", set largestUnit to defaultLargestUnit.
        let largest_unit = if largest_unit == TemporalUnit::Auto {
            default_largest
        } else {
            largest_unit
        };
        // 11. If LargerOfTwoTemporalUnits(largestUnit, smallestUnit) is not largestUnit, throw a RangeError exception.
        if largest_unit < smallest_unit {
            return Err(
                TemporalError::range().with_enum(ErrorMessage::SmallestUnitLargerThanLargestUnit)
            );
        }
        // 12. Let maximum be MaximumTemporalDurationRoundingIncrement(smallestUnit).
        // 13. If maximum is not unset, perform ? ValidateTemporalRoundingIncrement(roundingIncrement, maximum, false).
        if let Some(max) = smallest_unit.to_maximum_rounding_increment() {
            increment.validate(max.into(), false)?;
        }
        // 14. Return the Record { ... }.
        Ok(Self {
            largest_unit,
            smallest_unit,
            increment,
            rounding_mode,
        })
    }

    /// Resolves the options of `Duration.prototype.round`.
    pub(crate) fn from_duration_options(
        options: RoundingOptions,
        existing_largest: TemporalUnit,
    ) -> TemporalResult<Self> {
        // 22. If smallestUnitPresent is false and largestUnitPresent is false, then
        if options.largest_unit.is_none() && options.smallest_unit.is_none() {
            // a. Throw a RangeError exception.
            return Err(TemporalError::range()
                .with_message("smallestUnit and largestUnit cannot both be None."));
        }

        // 14. Let roundingIncrement be ? ToTemporalRoundingIncrement(roundTo).
        let increment = options.increment.unwrap_or_default();
        // 15. Let roundingMode be ? ToTemporalRoundingMode(roundTo, "halfExpand").
        let rounding_mode = options.rounding_mode.unwrap_or_default();
        // 16. Let smallestUnit be ? GetTemporalUnit(roundTo, "smallestUnit", DATETIME, undefined).
        // 17. If smallestUnit is undefined, set smallestUnit to "nanosecond".
        let smallest_unit = options.smallest_unit.unwrap_or(TemporalUnit::Nanosecond);
        if smallest_unit == TemporalUnit::Auto {
            return Err(TemporalError::range().with_message("smallestUnit cannot be 'auto'."));
        }
        // 19. Let defaultLargestUnit be LargerOfTwoTemporalUnits(existingLargestUnit, smallestUnit).
        let default_largest = existing_largest.max(smallest_unit);
        // 20. If largestUnit is undefined, set largestUnit to defaultLargestUnit.
        // 21. Else if largestUnit is "auto", set largestUnit to defaultLargestUnit.
        let largest_unit = match options.largest_unit {
            Some(TemporalUnit::Auto) | None => default_largest,
            Some(unit) => unit,
        };
        // 23. If LargerOfTwoTemporalUnits(largestUnit, smallestUnit) is not largestUnit, throw a RangeError exception.
        if largest_unit < smallest_unit {
            return Err(
                TemporalError::range().with_enum(ErrorMessage::SmallestUnitLargerThanLargestUnit)
            );
        }
        // 24. Let maximum be MaximumTemporalDurationRoundingIncrement(smallestUnit).
        // 25. If maximum is not undefined, perform ? ValidateTemporalRoundingIncrement(roundingIncrement, maximum, false).
        if let Some(max) = smallest_unit.to_maximum_rounding_increment() {
            increment.validate(max.into(), false)?;
        }

        Ok(Self {
            largest_unit,
            smallest_unit,
            increment,
            rounding_mode,
        })
    }

    /// Resolves the `round` options of `PlainDateTime` and `ZonedDateTime`.
    pub(crate) fn from_datetime_options(options: RoundingOptions) -> TemporalResult<Self> {
        let increment = options.increment.unwrap_or_default();
        let rounding_mode = options.rounding_mode.unwrap_or_default();
        let smallest_unit = options
            .smallest_unit
            .ok_or(TemporalError::range().with_enum(ErrorMessage::UnitRequired))?;
        // 9. If smallestUnit is "day", then
        //     a. Let maximum be 1.
        //     b. Let inclusive be true.
        // 10. Else,
        //     a. Let maximum be ! MaximumTemporalDurationRoundingIncrement(smallestUnit).
        //     b. Assert: maximum is not unset.
        //     c. Let inclusive be false.
        let (maximum, inclusive) = match smallest_unit {
            TemporalUnit::Day => (1, true),
            unit if unit.is_time_unit() => (unit.to_maximum_rounding_increment().unwrap_or(1), false),
            _ => return Err(TemporalError::range().with_enum(ErrorMessage::RoundToUnitInvalid)),
        };
        // 11. Perform ? ValidateTemporalRoundingIncrement(roundingIncrement, maximum, inclusive).
        increment.validate(maximum.into(), inclusive)?;

        Ok(Self {
            largest_unit: TemporalUnit::Auto,
            smallest_unit,
            increment,
            rounding_mode,
        })
    }

    /// Resolves the options of `PlainTime.prototype.round`.
    pub(crate) fn from_time_options(options: RoundingOptions) -> TemporalResult<Self> {
        let increment = options.increment.unwrap_or_default();
        let rounding_mode = options.rounding_mode.unwrap_or_default();
        let smallest_unit = options
            .smallest_unit
            .ok_or(TemporalError::range().with_enum(ErrorMessage::UnitRequired))?;
        if !smallest_unit.is_time_unit() {
            return Err(TemporalError::range().with_enum(ErrorMessage::SmallestUnitNotTimeUnit));
        }
        let maximum = smallest_unit.to_maximum_rounding_increment().unwrap_or(1);
        increment.validate(maximum.into(), false)?;

        Ok(Self {
            largest_unit: TemporalUnit::Auto,
            smallest_unit,
            increment,
            rounding_mode,
        })
    }

    /// Resolves the options of `Instant.prototype.round`.
    pub(crate) fn from_instant_options(options: RoundingOptions) -> TemporalResult<Self> {
        let increment = options.increment.unwrap_or_default();
        let rounding_mode = options.rounding_mode.unwrap_or_default();
        let smallest_unit = options
            .smallest_unit
            .ok_or(TemporalError::range().with_enum(ErrorMessage::UnitRequired))?;
        // The increment must evenly divide a solar day.
        let maximum = match smallest_unit {
            TemporalUnit::Hour => 24u64,
            TemporalUnit::Minute => 24 * 60,
            TemporalUnit::Second => 24 * 3600,
            TemporalUnit::Millisecond => MS_PER_DAY as u64,
            TemporalUnit::Microsecond => MS_PER_DAY as u64 * 1000,
            TemporalUnit::Nanosecond => NS_PER_DAY,
            _ => return Err(TemporalError::range().with_enum(ErrorMessage::RoundToUnitInvalid)),
        };

        increment.validate(maximum, true)?;

        Ok(Self {
            largest_unit: TemporalUnit::Auto,
            smallest_unit,
            increment,
            rounding_mode,
        })
    }

    /// Rounding options equivalent to resolved `toString` options.
    pub(crate) fn from_to_string_options(options: &ResolvedToStringRoundingOptions) -> Self {
        Self {
            largest_unit: TemporalUnit::Auto,
            smallest_unit: options.smallest_unit,
            increment: options.increment,
            rounding_mode: options.mode,
        }
    }

    pub(crate) fn is_noop(&self) -> bool {
        self.smallest_unit == TemporalUnit::Nanosecond && self.increment == RoundingIncrement::ONE
    }
}

// ==== ToString options ====

/// The options for the `toString` family of operations.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ToStringRoundingOptions {
    /// The `fractionalSecondDigits` option.
    pub precision: Precision,
    pub smallest_unit: Option<TemporalUnit>,
    pub rounding_mode: Option<TemporalRoundingMode>,
}

impl ToStringRoundingOptions {
    #[must_use]
    pub const fn new(
        precision: Precision,
        smallest_unit: Option<TemporalUnit>,
        rounding_mode: Option<TemporalRoundingMode>,
    ) -> Self {
        Self {
            precision,
            smallest_unit,
            rounding_mode,
        }
    }
}

/// The resolved `ToSecondsStringPrecisionRecord` paired with a rounding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedToStringRoundingOptions {
    pub(crate) precision: Precision,
    pub(crate) smallest_unit: TemporalUnit,
    pub(crate) mode: TemporalRoundingMode,
    pub(crate) increment: RoundingIncrement,
}

impl ToStringRoundingOptions {
    pub(crate) fn resolve(&self) -> TemporalResult<ResolvedToStringRoundingOptions> {
        let mode = self.rounding_mode.unwrap_or(TemporalRoundingMode::Trunc);
        let (precision, smallest_unit, increment) = match self.smallest_unit {
            // 1. If smallestUnit is "minute", then
            //     a. Return the Record { [[Precision]]: "minute", [[Unit]]: "minute", [[Increment]]: 1 }.
            Some(TemporalUnit::Minute) => (Precision::Minute, TemporalUnit::Minute, 1),
            // 2. If smallestUnit is "second", return { 0, "second", 1 }.
            Some(TemporalUnit::Second) => (Precision::Digit(0), TemporalUnit::Second, 1),
            // 3. If smallestUnit is "millisecond", return { 3, "millisecond", 1 }.
            Some(TemporalUnit::Millisecond) => (Precision::Digit(3), TemporalUnit::Millisecond, 1),
            // 4. If smallestUnit is "microsecond", return { 6, "microsecond", 1 }.
            Some(TemporalUnit::Microsecond) => (Precision::Digit(6), TemporalUnit::Microsecond, 1),
            // 5. If smallestUnit is "nanosecond", return { 9, "nanosecond", 1 }.
            Some(TemporalUnit::Nanosecond) => (Precision::Digit(9), TemporalUnit::Nanosecond, 1),
            Some(_) => {
                return Err(TemporalError::range().with_enum(ErrorMessage::SmallestUnitNotTimeUnit))
            }
            // 6. Assert: smallestUnit is undefined.
            None => match self.precision {
                // 7. If fractionalDigitCount is "auto", then
                //     a. Return the Record { [[Precision]]: "auto", [[Unit]]: "nanosecond", [[Increment]]: 1 }.
                Precision::Auto => (Precision::Auto, TemporalUnit::Nanosecond, 1),
                Precision::Minute => (Precision::Minute, TemporalUnit::Minute, 1),
                // 8. If fractionalDigitCount = 0, then
                Precision::Digit(0) => (Precision::Digit(0), TemporalUnit::Second, 1),
                // 9. If fractionalDigitCount is in the inclusive interval from 1 to 3, then
                //     a. Return { fractionalDigitCount, "millisecond", 10**(3 - fractionalDigitCount) }.
                Precision::Digit(d @ 1..=3) => {
                    (Precision::Digit(d), TemporalUnit::Millisecond, 10u32.pow(3 - u32::from(d)))
                }
                // 10. If fractionalDigitCount is in the inclusive interval from 4 to 6, then
                Precision::Digit(d @ 4..=6) => {
                    (Precision::Digit(d), TemporalUnit::Microsecond, 10u32.pow(6 - u32::from(d)))
                }
                // 11. Assert: fractionalDigitCount is in the inclusive interval from 7 to 9.
                Precision::Digit(d @ 7..=9) => {
                    (Precision::Digit(d), TemporalUnit::Nanosecond, 10u32.pow(9 - u32::from(d)))
                }
                Precision::Digit(_) => {
                    return Err(TemporalError::range()
                        .with_enum(ErrorMessage::FractionalDigitsPrecisionInvalid))
                }
            },
        };

        Ok(ResolvedToStringRoundingOptions {
            precision,
            smallest_unit,
            mode,
            increment: RoundingIncrement::try_new(increment)?,
        })
    }
}

// ==== Options enums and methods ====

/// The relevant unit that should be used for the operation that
/// this option is provided as a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemporalUnit {
    /// The `Auto` unit
    Auto = 0,
    /// The `Nanosecond` unit
    Nanosecond,
    /// The `Microsecond` unit
    Microsecond,
    /// The `Millisecond` unit
    Millisecond,
    /// The `Second` unit
    Second,
    /// The `Minute` unit
    Minute,
    /// The `Hour` unit
    Hour,
    /// The `Day` unit
    Day,
    /// The `Week` unit
    Week,
    /// The `Month` unit
    Month,
    /// The `Year` unit
    Year,
}

impl TemporalUnit {
    /// Returns the `MaximumTemporalDurationRoundingIncrement` for the current `TemporalUnit`.
    #[inline]
    #[must_use]
    pub fn to_maximum_rounding_increment(self) -> Option<u32> {
        use TemporalUnit::{
            Auto, Day, Hour, Microsecond, Millisecond, Minute, Month, Nanosecond, Second, Week,
            Year,
        };
        // 1. If unit is "year", "month", "week", or "day", then
        // a. Return undefined.
        // 2. If unit is "hour", then
        // a. Return 24.
        // 3. If unit is "minute" or "second", then
        // a. Return 60.
        // 4. Assert: unit is one of "millisecond", "microsecond", or "nanosecond".
        // 5. Return 1000.
        match self {
            Year | Month | Week | Day | Auto => None,
            Hour => Some(24),
            Minute | Second => Some(60),
            Millisecond | Microsecond | Nanosecond => Some(1000),
        }
    }

    /// Returns the nanosecond length of a fixed-length unit.
    ///
    /// `Day` is treated as exactly 24 hours.
    #[must_use]
    pub fn as_nanoseconds(&self) -> Option<u64> {
        use TemporalUnit::{
            Auto, Day, Hour, Microsecond, Millisecond, Minute, Month, Nanosecond, Second, Week,
            Year,
        };
        match self {
            Year | Month | Week | Auto => None,
            Day => Some(NS_PER_DAY),
            Hour => Some(3_600_000_000_000),
            Minute => Some(60_000_000_000),
            Second => Some(1_000_000_000),
            Millisecond => Some(1_000_000),
            Microsecond => Some(1_000),
            Nanosecond => Some(1),
        }
    }

    /// Year, month and week.
    #[inline]
    #[must_use]
    pub fn is_calendar_unit(&self) -> bool {
        use TemporalUnit::{Month, Week, Year};
        matches!(self, Year | Month | Week)
    }

    /// Year, month, week and day.
    #[inline]
    #[must_use]
    pub fn is_date_unit(&self) -> bool {
        self.is_calendar_unit() || *self == Self::Day
    }

    #[inline]
    #[must_use]
    pub fn is_time_unit(&self) -> bool {
        use TemporalUnit::{Hour, Microsecond, Millisecond, Minute, Nanosecond, Second};
        matches!(
            self,
            Hour | Minute | Second | Millisecond | Microsecond | Nanosecond
        )
    }
}

/// A parsing error for `TemporalUnit`
#[derive(Debug, Clone, Copy)]
pub struct ParseTemporalUnitError;

impl fmt::Display for ParseTemporalUnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid TemporalUnit")
    }
}

impl FromStr for TemporalUnit {
    type Err = ParseTemporalUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "year" | "years" => Ok(Self::Year),
            "month" | "months" => Ok(Self::Month),
            "week" | "weeks" => Ok(Self::Week),
            "day" | "days" => Ok(Self::Day),
            "hour" | "hours" => Ok(Self::Hour),
            "minute" | "minutes" => Ok(Self::Minute),
            "second" | "seconds" => Ok(Self::Second),
            "millisecond" | "milliseconds" => Ok(Self::Millisecond),
            "microsecond" | "microseconds" => Ok(Self::Microsecond),
            "nanosecond" | "nanoseconds" => Ok(Self::Nanosecond),
            _ => Err(ParseTemporalUnitError),
        }
    }
}

impl fmt::Display for TemporalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Year => "year",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Millisecond => "millisecond",
            Self::Microsecond => "microsecond",
            Self::Nanosecond => "nanosecond",
        })
    }
}

/// `ArithmeticOverflow` can also be used as an
/// assignment overflow and consists of the "constrain"
/// and "reject" options.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOverflow {
    /// Constrain option
    #[default]
    Constrain,
    /// Reject option
    Reject,
}

/// A parsing error for `ArithemeticOverflow`
#[derive(Debug, Clone, Copy)]
pub struct ParseArithmeticOverflowError;

impl fmt::Display for ParseArithmeticOverflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid overflow value")
    }
}

impl FromStr for ArithmeticOverflow {
    type Err = ParseArithmeticOverflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constrain" => Ok(Self::Constrain),
            "reject" => Ok(Self::Reject),
            _ => Err(ParseArithmeticOverflowError),
        }
    }
}

impl fmt::Display for ArithmeticOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Constrain => "constrain",
            Self::Reject => "reject",
        })
    }
}

/// The disambiguation options for resolving a local date-time to an instant.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Disambiguation {
    /// Compatible option
    ///
    /// This picks the earlier of two ambiguous instants and moves skipped
    /// times forward by the length of the gap.
    #[default]
    Compatible,
    /// Earlier option
    Earlier,
    /// Later option
    Later,
    /// Reject option
    Reject,
}

/// A parsing error on `Disambiguation` options.
#[derive(Debug, Clone, Copy)]
pub struct ParseDisambiguationError;

impl fmt::Display for ParseDisambiguationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid disambiguation value")
    }
}

impl FromStr for Disambiguation {
    type Err = ParseDisambiguationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compatible" => Ok(Self::Compatible),
            "earlier" => Ok(Self::Earlier),
            "later" => Ok(Self::Later),
            "reject" => Ok(Self::Reject),
            _ => Err(ParseDisambiguationError),
        }
    }
}

impl fmt::Display for Disambiguation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Compatible => "compatible",
            Self::Earlier => "earlier",
            Self::Later => "later",
            Self::Reject => "reject",
        })
    }
}

/// Offset disambiguation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetDisambiguation {
    /// Use option
    Use,
    /// Prefer option
    Prefer,
    /// Ignore option
    Ignore,
    /// Reject option
    Reject,
}

/// A parsing error for `OffsetDisambiguation` parsing.
#[derive(Debug, Clone, Copy)]
pub struct ParseOffsetDisambiguationError;

impl fmt::Display for ParseOffsetDisambiguationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid offset disambiguation value")
    }
}

impl FromStr for OffsetDisambiguation {
    type Err = ParseOffsetDisambiguationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "use" => Ok(Self::Use),
            "prefer" => Ok(Self::Prefer),
            "ignore" => Ok(Self::Ignore),
            "reject" => Ok(Self::Reject),
            _ => Err(ParseOffsetDisambiguationError),
        }
    }
}

impl fmt::Display for OffsetDisambiguation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Use => "use",
            Self::Prefer => "prefer",
            Self::Ignore => "ignore",
            Self::Reject => "reject",
        })
    }
}

/// Declares the specified `RoundingMode` for the operation.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum TemporalRoundingMode {
    /// Ceil RoundingMode
    Ceil,
    /// Floor RoundingMode
    Floor,
    /// Expand RoundingMode
    Expand,
    /// Truncate RoundingMode
    Trunc,
    /// HalfCeil RoundingMode
    HalfCeil,
    /// HalfFloor RoundingMode
    HalfFloor,
    /// HalfExpand RoundingMode - Default
    #[default]
    HalfExpand,
    /// HalfTruncate RoundingMode
    HalfTrunc,
    /// HalfEven RoundingMode
    HalfEven,
}

/// The `UnsignedRoundingMode`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsignedRoundingMode {
    /// `Infinity` `RoundingMode`
    Infinity,
    /// `Zero` `RoundingMode`
    Zero,
    /// `HalfInfinity` `RoundingMode`
    HalfInfinity,
    /// `HalfZero` `RoundingMode`
    HalfZero,
    /// `HalfEven` `RoundingMode`
    HalfEven,
}

impl TemporalRoundingMode {
    /// Negates the current `RoundingMode`.
    #[inline]
    #[must_use]
    pub const fn negate(self) -> Self {
        use TemporalRoundingMode::{
            Ceil, Expand, Floor, HalfCeil, HalfEven, HalfExpand, HalfFloor, HalfTrunc, Trunc,
        };

        match self {
            Ceil => Self::Floor,
            Floor => Self::Ceil,
            HalfCeil => Self::HalfFloor,
            HalfFloor => Self::HalfCeil,
            Trunc => Self::Trunc,
            Expand => Self::Expand,
            HalfTrunc => Self::HalfTrunc,
            HalfExpand => Self::HalfExpand,
            HalfEven => Self::HalfEven,
        }
    }

    /// `GetUnsignedRoundingMode`
    #[inline]
    #[must_use]
    pub const fn get_unsigned_round_mode(self, is_positive: bool) -> UnsignedRoundingMode {
        use TemporalRoundingMode::{
            Ceil, Expand, Floor, HalfCeil, HalfEven, HalfExpand, HalfFloor, HalfTrunc, Trunc,
        };

        match self {
            Ceil if is_positive => UnsignedRoundingMode::Infinity,
            Ceil => UnsignedRoundingMode::Zero,
            Floor if is_positive => UnsignedRoundingMode::Zero,
            Floor => UnsignedRoundingMode::Infinity,
            Expand => UnsignedRoundingMode::Infinity,
            Trunc => UnsignedRoundingMode::Zero,
            HalfCeil if is_positive => UnsignedRoundingMode::HalfInfinity,
            HalfCeil => UnsignedRoundingMode::HalfZero,
            HalfFloor if is_positive => UnsignedRoundingMode::HalfZero,
            HalfFloor => UnsignedRoundingMode::HalfInfinity,
            HalfExpand => UnsignedRoundingMode::HalfInfinity,
            HalfTrunc => UnsignedRoundingMode::HalfZero,
            HalfEven => UnsignedRoundingMode::HalfEven,
        }
    }
}

impl FromStr for TemporalRoundingMode {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ceil" => Ok(Self::Ceil),
            "floor" => Ok(Self::Floor),
            "expand" => Ok(Self::Expand),
            "trunc" => Ok(Self::Trunc),
            "halfCeil" => Ok(Self::HalfCeil),
            "halfFloor" => Ok(Self::HalfFloor),
            "halfExpand" => Ok(Self::HalfExpand),
            "halfTrunc" => Ok(Self::HalfTrunc),
            "halfEven" => Ok(Self::HalfEven),
            _ => Err(TemporalError::range().with_enum(ErrorMessage::RoundingModeInvalid)),
        }
    }
}

impl fmt::Display for TemporalRoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ceil => "ceil",
            Self::Floor => "floor",
            Self::Expand => "expand",
            Self::Trunc => "trunc",
            Self::HalfCeil => "halfCeil",
            Self::HalfFloor => "halfFloor",
            Self::HalfExpand => "halfExpand",
            Self::HalfTrunc => "halfTrunc",
            Self::HalfEven => "halfEven",
        })
    }
}

/// Whether to show the calendar annotation in `toString` output.
/// <https://tc39.es/proposal-temporal/#sec-temporal-gettemporalshowcalendarnameoption>
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DisplayCalendar {
    /// `Auto` option
    #[default]
    Auto,
    /// `Always` option
    Always,
    /// `Never` option
    Never,
    /// `Critical` option
    Critical,
}

impl fmt::Display for DisplayCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Always => "always",
            Self::Never => "never",
            Self::Critical => "critical",
        })
    }
}

impl FromStr for DisplayCalendar {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            "critical" => Ok(Self::Critical),
            _ => Err(TemporalError::range().with_enum(ErrorMessage::CalendarNameInvalid)),
        }
    }
}

/// Whether to show the UTC offset in `ZonedDateTime` output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOffset {
    #[default]
    Auto,
    Never,
}

impl fmt::Display for DisplayOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Never => "never",
        })
    }
}

impl FromStr for DisplayOffset {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "never" => Ok(Self::Never),
            _ => Err(TemporalError::range().with_enum(ErrorMessage::OffsetOptionInvalid)),
        }
    }
}

/// Whether to show the time zone annotation in `ZonedDateTime` output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DisplayTimeZone {
    #[default]
    Auto,
    Never,
    Critical,
}

impl fmt::Display for DisplayTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Never => "never",
            Self::Critical => "critical",
        })
    }
}

impl FromStr for DisplayTimeZone {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "never" => Ok(Self::Never),
            "critical" => Ok(Self::Critical),
            _ => Err(TemporalError::range().with_enum(ErrorMessage::TimeZoneNameInvalid)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn unsigned_rounding_modes_follow_sign() {
        use UnsignedRoundingMode as U;
        let cases = [
            (TemporalRoundingMode::Ceil, U::Infinity, U::Zero),
            (TemporalRoundingMode::Floor, U::Zero, U::Infinity),
            (TemporalRoundingMode::Expand, U::Infinity, U::Infinity),
            (TemporalRoundingMode::Trunc, U::Zero, U::Zero),
            (TemporalRoundingMode::HalfCeil, U::HalfInfinity, U::HalfZero),
            (TemporalRoundingMode::HalfFloor, U::HalfZero, U::HalfInfinity),
            (TemporalRoundingMode::HalfExpand, U::HalfInfinity, U::HalfInfinity),
            (TemporalRoundingMode::HalfTrunc, U::HalfZero, U::HalfZero),
            (TemporalRoundingMode::HalfEven, U::HalfEven, U::HalfEven),
        ];
        for (mode, positive, negative) in cases {
            assert_eq!(mode.get_unsigned_round_mode(true), positive, "{mode}");
            assert_eq!(mode.get_unsigned_round_mode(false), negative, "{mode}");
        }
    }

    #[test]
    fn unit_strings() {
        assert_eq!("days".parse::<TemporalUnit>().unwrap(), TemporalUnit::Day);
        assert_eq!("millisecond".parse::<TemporalUnit>().unwrap(), TemporalUnit::Millisecond);
        assert!("fortnight".parse::<TemporalUnit>().is_err());
        assert_eq!(TemporalUnit::Millisecond.to_string(), "millisecond");
        assert!(TemporalUnit::Year > TemporalUnit::Day);
    }

    #[test]
    fn difference_settings_defaults_and_ordering() {
        let resolved = ResolvedRoundingOptions::from_diff_settings(
            DifferenceSettings::default(),
            DifferenceOperation::Since,
            UnitGroup::Date,
            &[],
            TemporalUnit::Day,
            TemporalUnit::Day,
        )
        .unwrap();
        assert_eq!(resolved.largest_unit, TemporalUnit::Day);
        assert_eq!(resolved.rounding_mode, TemporalRoundingMode::Trunc);

        let settings = DifferenceSettings::new(
            Some(TemporalUnit::Day),
            Some(TemporalUnit::Month),
            None,
            None,
        );
        let err = ResolvedRoundingOptions::from_diff_settings(
            settings,
            DifferenceOperation::Until,
            UnitGroup::Date,
            &[],
            TemporalUnit::Day,
            TemporalUnit::Day,
        );
        assert!(err.is_err());

        let settings = DifferenceSettings::new(None, Some(TemporalUnit::Hour), None, None);
        assert!(ResolvedRoundingOptions::from_diff_settings(
            settings,
            DifferenceOperation::Until,
            UnitGroup::Date,
            &[],
            TemporalUnit::Day,
            TemporalUnit::Day,
        )
        .is_err());

        let settings = DifferenceSettings::new(
            None,
            Some(TemporalUnit::Minute),
            Some(TemporalRoundingMode::Floor),
            Some(RoundingIncrement::try_new(15).unwrap()),
        );
        let resolved = ResolvedRoundingOptions::from_diff_settings(
            settings,
            DifferenceOperation::Since,
            UnitGroup::Time,
            &[],
            TemporalUnit::Nanosecond,
            TemporalUnit::Hour,
        )
        .unwrap();
        assert_eq!(resolved.largest_unit, TemporalUnit::Hour);
        assert_eq!(resolved.rounding_mode, TemporalRoundingMode::Ceil);
    }

    #[test]
    fn datetime_and_instant_increment_limits() {
        let mut options = RoundingOptions::with_smallest_unit(TemporalUnit::Hour);
        options.increment = Some(RoundingIncrement::try_new(24).unwrap());
        assert!(ResolvedRoundingOptions::from_datetime_options(options).is_err());
        assert!(ResolvedRoundingOptions::from_instant_options(options).is_ok());

        options.increment = Some(RoundingIncrement::try_new(5).unwrap());
        assert!(ResolvedRoundingOptions::from_instant_options(options).is_err());

        options.smallest_unit = Some(TemporalUnit::Day);
        options.increment = None;
        assert!(ResolvedRoundingOptions::from_datetime_options(options).is_ok());
        assert!(ResolvedRoundingOptions::from_time_options(options).is_err());
    }

    #[test]
    fn to_string_precision_records() {
        let resolved = ToStringRoundingOptions::new(Precision::Digit(2), None, None)
            .resolve()
            .unwrap();
        assert_eq!(resolved.smallest_unit, TemporalUnit::Millisecond);
        assert_eq!(resolved.increment.get(), 10);
        assert_eq!(resolved.mode, TemporalRoundingMode::Trunc);

        let resolved =
            ToStringRoundingOptions::new(Precision::Digit(2), Some(TemporalUnit::Second), None)
                .resolve()
                .unwrap();
        assert_eq!(resolved.precision, Precision::Digit(0));

        assert!(ToStringRoundingOptions::new(Precision::Auto, Some(TemporalUnit::Hour), None)
            .resolve()
            .is_err());
        assert!(ToStringRoundingOptions::new(Precision::Digit(10), None, None)
            .resolve()
            .is_err());
    }
}
