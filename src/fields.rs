//! Typed extraction of Temporal property bags.
//!
//! Hosts hand Temporal a dynamic bag of properties. [`TemporalFields`]
//! whitelists the recognized keys, converts each value with the conversion
//! its key requires, and produces the typed partial records consumed by the
//! `with` and `from` operations.

use alloc::string::String;
use core::str::FromStr;

use crate::{
    builtins::core::{
        calendar::MonthCode, PartialDate, PartialDateTime, PartialTime, PartialZonedDateTime,
    },
    error::ErrorMessage,
    options::ArithmeticOverflow,
    primitive::FiniteF64,
    TemporalError, TemporalResult, TimeZone, UtcOffset,
};

use num_traits::{AsPrimitive, Bounded};

/// A recognized Temporal field name.
#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldKey {
    Year,
    Month,
    MonthCode,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
    Offset,
    TimeZone,
    Calendar,
}

impl FieldKey {
    /// Returns the property name of this field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::MonthCode => "monthCode",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Millisecond => "millisecond",
            Self::Microsecond => "microsecond",
            Self::Nanosecond => "nanosecond",
            Self::Offset => "offset",
            Self::TimeZone => "timeZone",
            Self::Calendar => "calendar",
        }
    }

    /// Returns the conversion applied to this field's value.
    #[must_use]
    pub const fn conversion(&self) -> FieldConversion {
        match self {
            Self::Year
            | Self::Hour
            | Self::Minute
            | Self::Second
            | Self::Millisecond
            | Self::Microsecond
            | Self::Nanosecond => FieldConversion::ToIntegerWithTruncation,
            Self::Month | Self::Day => FieldConversion::ToPositiveIntegerWithTruncation,
            Self::MonthCode | Self::Offset => FieldConversion::ToPrimitiveAndRequireString,
            Self::TimeZone | Self::Calendar => FieldConversion::None,
        }
    }
}

impl FromStr for FieldKey {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year" => Ok(Self::Year),
            "month" => Ok(Self::Month),
            "monthCode" => Ok(Self::MonthCode),
            "day" => Ok(Self::Day),
            "hour" => Ok(Self::Hour),
            "minute" => Ok(Self::Minute),
            "second" => Ok(Self::Second),
            "millisecond" => Ok(Self::Millisecond),
            "microsecond" => Ok(Self::Microsecond),
            "nanosecond" => Ok(Self::Nanosecond),
            "offset" => Ok(Self::Offset),
            "timeZone" => Ok(Self::TimeZone),
            "calendar" => Ok(Self::Calendar),
            _ => Err(TemporalError::range().with_message("Invalid Temporal field name.")),
        }
    }
}

impl core::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The Conversion type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldConversion {
    /// Designates the Conversion type is `ToIntegerWithTruncation`
    ToIntegerWithTruncation,
    /// Designates the Conversion type is `ToPositiveIntegerWithTruncation`
    ToPositiveIntegerWithTruncation,
    /// Designates the Conversion type is `ToPrimitive` followed by `RequireString`
    ToPrimitiveAndRequireString,
    /// Designates the Conversion type is nothing
    None,
}

/// A property value as handed over by a host.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A numeric value.
    Number(f64),
    /// A string value.
    String(String),
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(String::from(value))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl FieldValue {
    fn to_number(&self, conversion: FieldConversion) -> TemporalResult<FiniteF64> {
        let Self::Number(value) = self else {
            return Err(TemporalError::r#type().with_message("Expected a numeric field value."));
        };
        let finite = FiniteF64::try_from(*value)?;
        match conversion {
            FieldConversion::ToPositiveIntegerWithTruncation => {
                finite.to_positive_integer_with_truncation()
            }
            _ => Ok(finite.to_integer_with_truncation()),
        }
    }

    fn as_string(&self) -> TemporalResult<&str> {
        match self {
            Self::String(value) => Ok(value),
            Self::Number(_) => {
                Err(TemporalError::r#type().with_message("Expected a string field value."))
            }
        }
    }
}

/// The typed result of extracting a property bag.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TemporalFields {
    /// The date fields.
    pub date: PartialDate,
    /// The time fields.
    pub time: PartialTime,
    /// The `offset` field, unparsed.
    pub offset: Option<String>,
}

impl TemporalFields {
    /// Extracts the recognized fields from a property bag.
    ///
    /// Unknown keys are ignored. A `calendar` or `timeZone` key is a
    /// `TypeError`. Integer values that do not fit their field are
    /// saturated under `constrain` and rejected under `reject`.
    ///
    /// ```rust
    /// use temporal_iso::{fields::{FieldValue, TemporalFields}, options::ArithmeticOverflow};
    ///
    /// let bag = [("year", FieldValue::from(2024)), ("monthCode", FieldValue::from("M02"))];
    /// let fields = TemporalFields::from_property_bag(bag, ArithmeticOverflow::Constrain).unwrap();
    /// assert_eq!(fields.date.year, Some(2024));
    /// assert_eq!(fields.date.month_code.unwrap().as_str(), "M02");
    /// ```
    pub fn from_property_bag<'a, I>(bag: I, overflow: ArithmeticOverflow) -> TemporalResult<Self>
    where
        I: IntoIterator<Item = (&'a str, FieldValue)>,
    {
        let mut fields = Self::default();
        for (name, value) in bag {
            let Ok(key) = FieldKey::from_str(name) else {
                continue;
            };
            fields.insert(key, &value, overflow)?;
        }
        Ok(fields)
    }

    /// Returns whether no field was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.date.is_empty() && self.time.is_empty() && self.offset.is_none()
    }

    fn insert(
        &mut self,
        key: FieldKey,
        value: &FieldValue,
        overflow: ArithmeticOverflow,
    ) -> TemporalResult<()> {
        let conversion = key.conversion();
        match key {
            FieldKey::TimeZone | FieldKey::Calendar => {
                return Err(TemporalError::r#type().with_enum(ErrorMessage::ForbiddenField));
            }
            FieldKey::Year => {
                let year = value.to_number(conversion)?;
                self.date.year = Some(year.as_date_value()?);
            }
            FieldKey::Month => {
                self.date.month = Some(fit(value.to_number(conversion)?, overflow)?);
            }
            FieldKey::MonthCode => {
                self.date.month_code = Some(MonthCode::from_str(value.as_string()?)?);
            }
            FieldKey::Day => self.date.day = Some(fit(value.to_number(conversion)?, overflow)?),
            FieldKey::Hour => self.time.hour = Some(fit(value.to_number(conversion)?, overflow)?),
            FieldKey::Minute => {
                self.time.minute = Some(fit(value.to_number(conversion)?, overflow)?);
            }
            FieldKey::Second => {
                self.time.second = Some(fit(value.to_number(conversion)?, overflow)?);
            }
            FieldKey::Millisecond => {
                self.time.millisecond = Some(fit(value.to_number(conversion)?, overflow)?);
            }
            FieldKey::Microsecond => {
                self.time.microsecond = Some(fit(value.to_number(conversion)?, overflow)?);
            }
            FieldKey::Nanosecond => {
                self.time.nanosecond = Some(fit(value.to_number(conversion)?, overflow)?);
            }
            FieldKey::Offset => self.offset = Some(String::from(value.as_string()?)),
        }
        Ok(())
    }

    /// Returns the date and time fields as a `PartialDateTime`.
    #[must_use]
    pub fn to_partial_date_time(&self) -> PartialDateTime {
        PartialDateTime {
            date: self.date,
            time: self.time,
        }
    }

    /// Returns the fields as a `PartialZonedDateTime` in `timezone`,
    /// parsing the `offset` field.
    pub fn to_partial_zoned_date_time(
        &self,
        timezone: Option<TimeZone>,
    ) -> TemporalResult<PartialZonedDateTime> {
        let offset = self
            .offset
            .as_deref()
            .map(UtcOffset::from_str)
            .transpose()?;
        Ok(PartialZonedDateTime {
            date: self.date,
            time: self.time,
            offset,
            timezone,
        })
    }
}

/// Fits a truncated field value into the field's integer type.
fn fit<T>(value: FiniteF64, overflow: ArithmeticOverflow) -> TemporalResult<T>
where
    T: Bounded + AsPrimitive<f64>,
    f64: AsPrimitive<T>,
{
    let fits = value >= T::min_value().as_() && value <= T::max_value().as_();
    if !fits && overflow == ArithmeticOverflow::Reject {
        return Err(TemporalError::range().with_enum(ErrorMessage::NumberOutOfRange));
    }
    Ok(value.truncate::<T>())
}

#[cfg(test)]
mod tests {
    use super::{FieldKey, FieldValue, TemporalFields};
    use crate::{error::ErrorKind, options::ArithmeticOverflow};
    use alloc::vec;

    #[test]
    fn property_bag_extraction() {
        let bag = vec![
            ("year", FieldValue::Number(2020.9)),
            ("month", FieldValue::Number(3.0)),
            ("day", FieldValue::from(15)),
            ("hour", FieldValue::from(10)),
            ("nanosecond", FieldValue::from(999)),
            ("offset", FieldValue::from("+01:00")),
            ("somethingElse", FieldValue::from("ignored")),
        ];
        let fields = TemporalFields::from_property_bag(bag, ArithmeticOverflow::Constrain).unwrap();
        assert_eq!(fields.date.year, Some(2020));
        assert_eq!(fields.date.month, Some(3));
        assert_eq!(fields.date.day, Some(15));
        assert_eq!(fields.time.hour, Some(10));
        assert_eq!(fields.time.minute, None);
        assert_eq!(fields.time.nanosecond, Some(999));
        assert_eq!(fields.offset.as_deref(), Some("+01:00"));

        let zoned = fields.to_partial_zoned_date_time(None).unwrap();
        assert_eq!(zoned.offset.unwrap().nanoseconds(), 3_600_000_000_000);
    }

    #[test]
    fn forbidden_and_mistyped_fields() {
        let err = TemporalFields::from_property_bag(
            [("calendar", FieldValue::from("iso8601"))],
            ArithmeticOverflow::Constrain,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);

        let err = TemporalFields::from_property_bag(
            [("timeZone", FieldValue::from("UTC"))],
            ArithmeticOverflow::Constrain,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);

        let err = TemporalFields::from_property_bag(
            [("year", FieldValue::from("2020"))],
            ArithmeticOverflow::Constrain,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);

        let err = TemporalFields::from_property_bag(
            [("monthCode", FieldValue::Number(1.0))],
            ArithmeticOverflow::Constrain,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn numeric_conversions() {
        let err = TemporalFields::from_property_bag(
            [("month", FieldValue::Number(0.5))],
            ArithmeticOverflow::Constrain,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);

        let err = TemporalFields::from_property_bag(
            [("day", FieldValue::Number(f64::INFINITY))],
            ArithmeticOverflow::Constrain,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);

        let fields = TemporalFields::from_property_bag(
            [("hour", FieldValue::Number(-3.0))],
            ArithmeticOverflow::Constrain,
        )
        .unwrap();
        assert_eq!(fields.time.hour, Some(0));

        assert!(TemporalFields::from_property_bag(
            [("hour", FieldValue::Number(-3.0))],
            ArithmeticOverflow::Reject,
        )
        .is_err());
    }

    #[test]
    fn field_key_names() {
        for key in [FieldKey::Year, FieldKey::MonthCode, FieldKey::TimeZone] {
            assert_eq!(key.as_str().parse::<FieldKey>().unwrap(), key);
        }
        assert!("era".parse::<FieldKey>().is_err());
    }
}
