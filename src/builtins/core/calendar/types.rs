//! Implementation of `MonthCode` and `ResolvedCalendarFields`

use core::str::FromStr;

use tinystr::{tinystr, TinyAsciiStr};

use crate::{
    builtins::core::PartialDate,
    error::ErrorMessage,
    iso::{constrain_iso_day, is_valid_iso_day},
    options::ArithmeticOverflow,
    TemporalError, TemporalResult,
};

/// The year an ISO `PlainMonthDay` is stored in. 1972 is the first leap year
/// after the epoch, so every month and day pair is representable.
pub(crate) const MONTH_DAY_REFERENCE_YEAR: i32 = 1972;

/// Which record a set of calendar fields is being resolved into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResolutionType {
    Date,
    YearMonth,
    MonthDay,
}

/// `ResolvedCalendarFields` represents the resolved field values necessary for
/// creating a Date from potentially partial values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCalendarFields {
    pub(crate) year: i32,
    pub(crate) month_code: MonthCode,
    pub(crate) day: u8,
}

impl ResolvedCalendarFields {
    /// Resolves the fields of `partial` for `resolution`, regulating the
    /// month and day with `overflow`.
    ///
    /// Equivalent: `ISODateFromFields`, `ISOYearMonthFromFields` and
    /// `ISOMonthDayFromFields`.
    pub(crate) fn try_from_partial(
        partial: &PartialDate,
        overflow: ArithmeticOverflow,
        resolution: ResolutionType,
    ) -> TemporalResult<Self> {
        // A PlainMonthDay is identified by its month code; a bare month needs
        // a year to be interpreted.
        if resolution == ResolutionType::MonthDay
            && partial.month_code.is_none()
            && partial.month.is_some()
            && partial.year.is_none()
        {
            return Err(TemporalError::r#type()
                .with_message("A year is required when month is provided without monthCode."));
        }

        let year = match (resolution, partial.year) {
            (ResolutionType::MonthDay, Some(year)) => year,
            (ResolutionType::MonthDay, None) => MONTH_DAY_REFERENCE_YEAR,
            (_, Some(year)) => year,
            (_, None) => {
                return Err(TemporalError::r#type()
                    .with_enum(ErrorMessage::RequiredFieldMissing)
                    .with_message("Required year field is empty."))
            }
        };

        let month = resolve_iso_month(partial.month_code, partial.month, overflow)?;

        let day = match (resolution, partial.day) {
            (ResolutionType::YearMonth, _) => 1,
            (_, Some(day)) => day,
            (_, None) => {
                return Err(TemporalError::r#type().with_message("Required day field is empty."))
            }
        };

        let day = match overflow {
            ArithmeticOverflow::Constrain => constrain_iso_day(year, month, i32::from(day)),
            ArithmeticOverflow::Reject => {
                if !is_valid_iso_day(year, month, i32::from(day)) {
                    return Err(
                        TemporalError::range().with_message("day value is not in a valid range.")
                    );
                }
                day
            }
        };

        // A month code always resolves against the reference year.
        let year = if resolution == ResolutionType::MonthDay {
            MONTH_DAY_REFERENCE_YEAR
        } else {
            year
        };

        Ok(Self {
            year,
            month_code: MonthCode::from_month(month)?,
            day,
        })
    }
}

/// Resolves `month` against `monthCode`, applying `overflow` to `month`.
fn resolve_iso_month(
    month_code: Option<MonthCode>,
    month: Option<u8>,
    overflow: ArithmeticOverflow,
) -> TemporalResult<u8> {
    match (month_code, month) {
        (None, None) => Err(TemporalError::r#type()
            .with_message("Month and monthCode values cannot both be undefined.")),
        (None, Some(month)) => regulate_month(month, overflow),
        (Some(month_code), None) => Ok(month_code.to_month_integer()),
        (Some(month_code), Some(month)) => {
            if month != month_code.to_month_integer() {
                return Err(TemporalError::range().with_enum(ErrorMessage::MonthCodeMismatch));
            }
            Ok(month)
        }
    }
}

fn regulate_month(month: u8, overflow: ArithmeticOverflow) -> TemporalResult<u8> {
    match overflow {
        ArithmeticOverflow::Constrain => Ok(month.clamp(1, 12)),
        ArithmeticOverflow::Reject if (1..=12).contains(&month) => Ok(month),
        ArithmeticOverflow::Reject => {
            Err(TemporalError::range().with_message("month value is not in a valid range."))
        }
    }
}

const ISO_MONTH_CODES: [TinyAsciiStr<4>; 12] = [
    tinystr!(4, "M01"),
    tinystr!(4, "M02"),
    tinystr!(4, "M03"),
    tinystr!(4, "M04"),
    tinystr!(4, "M05"),
    tinystr!(4, "M06"),
    tinystr!(4, "M07"),
    tinystr!(4, "M08"),
    tinystr!(4, "M09"),
    tinystr!(4, "M10"),
    tinystr!(4, "M11"),
    tinystr!(4, "M12"),
];

/// A month code of the ISO calendar, `M01` through `M12`.
///
/// ```rust
/// use temporal_iso::MonthCode;
/// use core::str::FromStr;
///
/// let code = MonthCode::from_str("M02").unwrap();
/// assert_eq!(code.to_month_integer(), 2);
/// assert!(MonthCode::from_str("M13").is_err());
/// assert!(MonthCode::from_str("M05L").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthCode(pub(crate) TinyAsciiStr<4>);

impl MonthCode {
    /// Returns the `MonthCode` for an ordinal ISO month.
    pub fn from_month(month: u8) -> TemporalResult<Self> {
        ISO_MONTH_CODES
            .get(usize::from(month).wrapping_sub(1))
            .copied()
            .map(Self)
            .ok_or(TemporalError::range().with_enum(ErrorMessage::MonthCodeInvalid))
    }

    /// Validates and creates a `MonthCode` from UTF-8 bytes.
    pub fn try_from_utf8(bytes: &[u8]) -> TemporalResult<Self> {
        let code = TinyAsciiStr::<4>::try_from_utf8(bytes)
            .map_err(|_| TemporalError::range().with_enum(ErrorMessage::MonthCodeInvalid))?;
        if !ISO_MONTH_CODES.contains(&code) {
            return Err(TemporalError::range().with_enum(ErrorMessage::MonthCodeInvalid));
        }
        Ok(Self(code))
    }

    /// Returns the ordinal month of this code.
    #[inline]
    #[must_use]
    pub fn to_month_integer(&self) -> u8 {
        let bytes = self.0.all_bytes();
        // Validated as `M01`..=`M12` on construction.
        (bytes[1] - b'0') * 10 + (bytes[2] - b'0')
    }

    /// Returns the month code as a `str`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner `TinyAsciiStr`.
    #[inline]
    #[must_use]
    pub fn as_tinystr(&self) -> TinyAsciiStr<4> {
        self.0
    }
}

impl FromStr for MonthCode {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_utf8(s.as_bytes())
    }
}

impl core::fmt::Display for MonthCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(year: Option<i32>, month: Option<u8>, code: Option<&str>, day: Option<u8>) -> PartialDate {
        PartialDate {
            year,
            month,
            month_code: code.map(|c| MonthCode::from_str(c).unwrap()),
            day,
        }
    }

    #[test]
    fn month_code_round_trip() {
        for month in 1..=12 {
            let code = MonthCode::from_month(month).unwrap();
            assert_eq!(code.to_month_integer(), month);
        }
        assert!(MonthCode::from_month(0).is_err());
        assert!(MonthCode::from_month(13).is_err());
        assert!(MonthCode::from_str("m01").is_err());
        assert!(MonthCode::from_str("M1").is_err());
    }

    #[test]
    fn month_and_month_code_must_agree() {
        let fields = partial(Some(2024), Some(3), Some("M03"), Some(1));
        let resolved = ResolvedCalendarFields::try_from_partial(
            &fields,
            ArithmeticOverflow::Reject,
            ResolutionType::Date,
        )
        .unwrap();
        assert_eq!(resolved.month_code.to_month_integer(), 3);

        let fields = partial(Some(2024), Some(4), Some("M03"), Some(1));
        assert!(ResolvedCalendarFields::try_from_partial(
            &fields,
            ArithmeticOverflow::Constrain,
            ResolutionType::Date,
        )
        .is_err());
    }

    #[test]
    fn overflow_regulates_month_and_day() {
        let fields = partial(Some(2023), Some(13), None, Some(40));
        let resolved = ResolvedCalendarFields::try_from_partial(
            &fields,
            ArithmeticOverflow::Constrain,
            ResolutionType::Date,
        )
        .unwrap();
        assert_eq!(resolved.month_code.as_str(), "M12");
        assert_eq!(resolved.day, 31);

        assert!(ResolvedCalendarFields::try_from_partial(
            &fields,
            ArithmeticOverflow::Reject,
            ResolutionType::Date,
        )
        .is_err());
    }

    #[test]
    fn missing_fields_are_type_errors() {
        use crate::error::ErrorKind;

        let no_year = partial(None, Some(1), None, Some(1));
        let err = ResolvedCalendarFields::try_from_partial(
            &no_year,
            ArithmeticOverflow::Constrain,
            ResolutionType::Date,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);

        let no_month = partial(Some(2020), None, None, Some(1));
        let err = ResolvedCalendarFields::try_from_partial(
            &no_month,
            ArithmeticOverflow::Constrain,
            ResolutionType::YearMonth,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);

        let month_without_year = partial(None, Some(2), None, Some(29));
        assert!(ResolvedCalendarFields::try_from_partial(
            &month_without_year,
            ArithmeticOverflow::Constrain,
            ResolutionType::MonthDay,
        )
        .is_err());
    }

    #[test]
    fn month_day_uses_reference_year() {
        let leap_day = partial(None, None, Some("M02"), Some(29));
        let resolved = ResolvedCalendarFields::try_from_partial(
            &leap_day,
            ArithmeticOverflow::Reject,
            ResolutionType::MonthDay,
        )
        .unwrap();
        assert_eq!(resolved.year, MONTH_DAY_REFERENCE_YEAR);
        assert_eq!(resolved.day, 29);

        // An explicit year regulates the day before the reference year is applied.
        let with_year = partial(Some(2023), Some(2), None, Some(29));
        let resolved = ResolvedCalendarFields::try_from_partial(
            &with_year,
            ArithmeticOverflow::Constrain,
            ResolutionType::MonthDay,
        )
        .unwrap();
        assert_eq!(resolved.year, MONTH_DAY_REFERENCE_YEAR);
        assert_eq!(resolved.day, 28);
    }
}
