//! This module implements `TemporalError`.

use alloc::borrow::Cow;
use core::fmt;

use timezone_provider::TimeZoneProviderError;

/// `TemporalError`'s error type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Error.
    #[default]
    Generic,
    /// TypeError
    Type,
    /// RangeError
    Range,
    /// SyntaxError
    Syntax,
    /// Assert
    Assert,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Generic => "Error",
            Self::Type => "TypeError",
            Self::Range => "RangeError",
            Self::Syntax => "SyntaxError",
            Self::Assert => "ImplementationError",
        })
    }
}

/// The error type for `temporal_iso`.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalError {
    kind: ErrorKind,
    msg: Cow<'static, str>,
}

impl TemporalError {
    #[inline]
    #[must_use]
    const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            msg: Cow::Borrowed(""),
        }
    }

    /// Create a generic error
    #[inline]
    #[must_use]
    pub fn general<S>(msg: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        Self::new(ErrorKind::Generic).with_message(msg)
    }

    /// Create a range error.
    #[inline]
    #[must_use]
    pub const fn range() -> Self {
        Self::new(ErrorKind::Range)
    }

    /// Create a type error.
    #[inline]
    #[must_use]
    pub const fn r#type() -> Self {
        Self::new(ErrorKind::Type)
    }

    /// Create a syntax error.
    #[inline]
    #[must_use]
    pub const fn syntax() -> Self {
        Self::new(ErrorKind::Syntax)
    }

    /// Creates an assertion error
    #[inline]
    #[must_use]
    #[cfg_attr(debug_assertions, track_caller)]
    pub(crate) const fn assert() -> Self {
        #[cfg(not(debug_assertions))]
        {
            Self::new(ErrorKind::Assert)
        }
        #[cfg(debug_assertions)]
        Self {
            kind: ErrorKind::Assert,
            msg: Cow::Borrowed(core::panic::Location::caller().file()),
        }
    }

    /// Create an abrupt end error.
    #[inline]
    #[must_use]
    pub fn abrupt_end() -> Self {
        Self::syntax().with_message("Abrupt end to parsing target.")
    }

    /// Add a message to the error.
    #[inline]
    #[must_use]
    pub fn with_message<S>(mut self, msg: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        self.msg = msg.into();
        self
    }

    /// Add a message enum to the error.
    #[inline]
    #[must_use]
    pub(crate) fn with_enum(mut self, msg: ErrorMessage) -> Self {
        self.msg = Cow::Borrowed(msg.to_str());
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Extracts the error message.
    #[inline]
    #[must_use]
    pub fn into_message(self) -> Cow<'static, str> {
        self.msg
    }
}

impl fmt::Display for TemporalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        let msg = self.msg.trim();
        if !msg.is_empty() {
            write!(f, ": {msg}")?;
        }

        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TemporalError {}

impl From<TimeZoneProviderError> for TemporalError {
    fn from(value: TimeZoneProviderError) -> Self {
        match value {
            TimeZoneProviderError::InstantOutOfRange => {
                Self::range().with_enum(ErrorMessage::InstantOutOfRange)
            }
            TimeZoneProviderError::Assert(msg) => Self::assert().with_message(msg),
            TimeZoneProviderError::Range(msg) => Self::range().with_message(msg),
            _ => Self::general("time zone provider error"),
        }
    }
}

/// The error message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorMessage {
    // Range
    InstantOutOfRange,
    DateOutOfRange,
    DateTimeOutOfRange,
    ZDTOutOfDayBounds,
    DayLengthZero,
    RelativeIterationLimit,

    // Numerical errors
    NumberNotFinite,
    NumberNotIntegral,
    NumberNotPositive,
    NumberOutOfRange,
    FractionalDigitsPrecisionInvalid,

    // Duration
    DurationMixedSign,
    DurationRelativeToRequired,

    // Options validity
    SmallestUnitNotTimeUnit,
    SmallestUnitLargerThanLargestUnit,
    UnitNotDate,
    UnitNotTime,
    UnitRequired,
    UnitNoAutoDuringComparison,
    RoundToUnitInvalid,
    RoundingModeInvalid,
    RoundingIncrementInvalid,
    CalendarNameInvalid,
    OffsetOptionInvalid,
    TimeZoneNameInvalid,

    // Field mismatches
    CalendarMismatch,
    TzMismatch,
    MonthCodeMismatch,
    MonthCodeInvalid,
    FieldsEmpty,
    ForbiddenField,
    RequiredFieldMissing,

    // Parsing
    ParserNeedsDate,
    ParserNeedsTime,
    ParserUtcDesignator,

    // Disambiguation
    DisambiguationRejected,
    OffsetMismatch,
}

impl ErrorMessage {
    pub(crate) const fn to_str(self) -> &'static str {
        match self {
            Self::InstantOutOfRange => "Instant nanoseconds are not within a valid epoch range.",
            Self::DateOutOfRange => "Date is not within ISO date time limits.",
            Self::DateTimeOutOfRange => "DateTime is not within ISO date time limits.",
            Self::ZDTOutOfDayBounds => "ZonedDateTime is outside the expected day bounds",
            Self::DayLengthZero => "day length must not be zero.",
            Self::RelativeIterationLimit => {
                "relative duration stepping exceeded the supported iteration range."
            }
            Self::NumberNotFinite => "number value is not a finite value.",
            Self::NumberNotIntegral => "value must be integral.",
            Self::NumberNotPositive => "integer must be positive.",
            Self::NumberOutOfRange => "number exceeded a valid range.",
            Self::FractionalDigitsPrecisionInvalid => "Invalid fractionalDigits precision value",
            Self::DurationMixedSign => "Duration fields must all share the same sign.",
            Self::DurationRelativeToRequired => {
                "relativeTo is required for durations with calendar units."
            }
            Self::SmallestUnitNotTimeUnit => "smallestUnit must be a valid time unit.",
            Self::SmallestUnitLargerThanLargestUnit => {
                "smallestUnit was larger than largestUnit in difference settings."
            }
            Self::UnitNotDate => "Unit was not part of the date unit group.",
            Self::UnitNotTime => "Unit was not part of the time unit group.",
            Self::UnitRequired => "Unit is required",
            Self::UnitNoAutoDuringComparison => "'auto' units are not allowed during comparison",
            Self::RoundToUnitInvalid => "Invalid roundTo unit provided.",
            Self::RoundingModeInvalid => "Invalid roundingMode option provided",
            Self::RoundingIncrementInvalid => "roundingIncrement is not valid for the unit.",
            Self::CalendarNameInvalid => "Invalid calendarName option provided",
            Self::OffsetOptionInvalid => "Invalid offsetOption option provided",
            Self::TimeZoneNameInvalid => "Invalid timeZoneName option provided",
            Self::CalendarMismatch => {
                "Calendar must be the same for operations involving two calendared types."
            }
            Self::TzMismatch => "Timezones must be the same if unit is a day unit.",
            Self::MonthCodeMismatch => "month and monthCode could not be resolved.",
            Self::MonthCodeInvalid => "monthCode is not a valid ISO month code.",
            Self::FieldsEmpty => "At least one field must be provided.",
            Self::ForbiddenField => "calendar and timeZone fields are not allowed here.",
            Self::RequiredFieldMissing => "A required field is missing.",
            Self::ParserNeedsDate => "Could not find a valid DateRecord node during parsing.",
            Self::ParserNeedsTime => "Could not find a valid TimeRecord node during parsing.",
            Self::ParserUtcDesignator => "UTC designator is not allowed for plain types.",
            Self::DisambiguationRejected => {
                "Local time is ambiguous or skipped and disambiguation is 'reject'."
            }
            Self::OffsetMismatch => "Offset does not match the time zone's offset.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_kind_and_message() {
        let err = TemporalError::range().with_message("out of range");
        assert_eq!(err.to_string(), "RangeError: out of range");
        assert_eq!(TemporalError::r#type().to_string(), "TypeError");
    }

    #[test]
    fn provider_errors_map_to_range() {
        let err = TemporalError::from(TimeZoneProviderError::Range("unknown zone"));
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.message(), "unknown zone");
        let err = TemporalError::from(TimeZoneProviderError::InstantOutOfRange);
        assert_eq!(err.kind(), ErrorKind::Range);
    }
}
