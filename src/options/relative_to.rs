//! The `relativeTo` rounding option

use crate::builtins::core::zoneddatetime::interpret_isodatetime_offset;
use crate::builtins::core::{timezone::UtcOffset, PlainDate, ZonedDateTime};
use crate::iso::{IsoDate, IsoTime};
use crate::options::{Disambiguation, OffsetDisambiguation};
use crate::parsers::{
    calendar_from_record, iso_date_from_record, iso_time_from_record, parse_date_time,
    parse_zoned_date_time, timezone_from_record,
};
use crate::provider::TimeZoneProvider;
use crate::{TemporalResult, TemporalUnwrap};

use ixdtf::records::UtcOffsetRecordOrZ;

/// The anchor for duration operations that involve calendar units.
///
/// A `ZonedDateTime` anchor makes day lengths follow its time zone; a
/// `PlainDate` anchor treats every day as 24 hours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelativeTo {
    PlainDate(PlainDate),
    ZonedDateTime(ZonedDateTime),
}

impl From<PlainDate> for RelativeTo {
    fn from(value: PlainDate) -> Self {
        Self::PlainDate(value)
    }
}

impl From<ZonedDateTime> for RelativeTo {
    fn from(value: ZonedDateTime) -> Self {
        Self::ZonedDateTime(value)
    }
}

impl RelativeTo {
    /// Parses a `relativeTo` string.
    ///
    /// A string with a time zone annotation produces a `ZonedDateTime`; any
    /// other date or date-time string produces a `PlainDate`.
    pub fn try_from_str_with_provider(
        source: &str,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        let bytes = source.as_bytes();
        // b. Let result be ? ParseISODateTime(value, « TemporalDateTimeString[~Zoned], TemporalDateTimeString[+Zoned] »).
        let result = parse_date_time(bytes).or_else(|_| parse_zoned_date_time(bytes))?;

        // c. Let annotation be result.[[TimeZone]].[[TimeZoneAnnotation]].
        // d. If annotation is empty, return the plain date.
        let Some(annotation) = result.tz else {
            let date = iso_date_from_record(result.date.temporal_unwrap()?)?;
            let calendar = calendar_from_record(result.calendar)?;
            return Ok(PlainDate::try_new(date.year, date.month, date.day, calendar)?.into());
        };

        // e. Let timeZone be ? ToTemporalTimeZoneIdentifier(annotation).
        let timezone = timezone_from_record(annotation.tz)?.normalize(provider)?;
        let calendar = calendar_from_record(result.calendar)?;

        // f. Let offsetString be result.[[TimeZone]].[[OffsetString]].
        // g. If result.[[TimeZone]].[[Z]] is true, set offsetBehaviour to exact.
        // h. Else if offsetString is empty, set offsetBehaviour to wall.
        // i. Set matchBehaviour to match-minutes unless the offset has seconds.
        let (offset_nanos, is_exact, match_minutes) = match result.offset {
            None => (None, false, true),
            Some(UtcOffsetRecordOrZ::Z) => (None, true, true),
            Some(UtcOffsetRecordOrZ::Offset(offset)) => {
                let match_minutes = offset.second().is_none();
                let nanoseconds = UtcOffset::from_ixdtf_record(offset)?.nanoseconds();
                (Some(nanoseconds), false, match_minutes)
            }
        };

        let date: IsoDate = iso_date_from_record(result.date.temporal_unwrap()?)?;
        let time: Option<IsoTime> = result.time.map(iso_time_from_record).transpose()?;

        // 7. Let epochNanoseconds be ? InterpretISODateTimeOffset(..., compatible, reject, matchBehaviour).
        let epoch_ns = interpret_isodatetime_offset(
            date,
            time,
            is_exact,
            offset_nanos,
            &timezone,
            Disambiguation::Compatible,
            OffsetDisambiguation::Reject,
            match_minutes,
            provider,
        )?;

        // 8. Return ! CreateTemporalZonedDateTime(epochNanoseconds, timeZone, calendar).
        Ok(ZonedDateTime::try_new(epoch_ns.as_i128(), calendar, timezone)?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::RelativeTo;
    use crate::provider::BUILTIN_PROVIDER;

    #[test]
    fn relative_to_from_str() {
        let plain = RelativeTo::try_from_str_with_provider("2024-03-10T12:00", &BUILTIN_PROVIDER)
            .unwrap();
        let RelativeTo::PlainDate(date) = plain else {
            panic!("expected a plain date");
        };
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 10));

        let zoned = RelativeTo::try_from_str_with_provider(
            "2024-03-10T12:00-04:00[America/New_York]",
            &BUILTIN_PROVIDER,
        )
        .unwrap();
        let RelativeTo::ZonedDateTime(zdt) = zoned else {
            panic!("expected a zoned date-time");
        };
        assert_eq!(zdt.hour_with_provider(&BUILTIN_PROVIDER).unwrap(), 12);

        // A conflicting offset is rejected.
        assert!(RelativeTo::try_from_str_with_provider(
            "2024-03-10T12:00-05:00[America/New_York]",
            &BUILTIN_PROVIDER,
        )
        .is_err());
        assert!(RelativeTo::try_from_str_with_provider("2024-03-10T12:00Z", &BUILTIN_PROVIDER)
            .is_err());
    }
}
