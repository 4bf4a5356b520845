//! Parsing of time zone identifiers and UTC offsets.

use alloc::{format, string::String};
use ixdtf::{
    encoding::Utf8,
    parsers::TimeZoneParser,
    records::{TimeZoneRecord, UtcOffsetRecordOrZ},
    ParseError,
};

use super::{parse_ixdtf, ParseVariant};
use crate::{
    builtins::core::timezone::{TimeZone, UtcOffset},
    TemporalError, TemporalResult,
};

fn invalid_time_zone(err: ParseError) -> TemporalError {
    TemporalError::range().with_message(format!("invalid time zone identifier: {err}"))
}

pub(crate) fn timezone_from_record(record: TimeZoneRecord<'_, Utf8>) -> TemporalResult<TimeZone> {
    match record {
        TimeZoneRecord::Name(name) => core::str::from_utf8(name)
            .map(|name| TimeZone::IanaIdentifier(String::from(name)))
            .map_err(|_| TemporalError::range().with_message("time zone name is not UTF-8.")),
        TimeZoneRecord::Offset(offset) => {
            Ok(TimeZone::UtcOffset(UtcOffset::from_minute_record(offset)))
        }
        _ => Err(TemporalError::range().with_message("unsupported time zone record.")),
    }
}

/// Parses a `TimeZoneIdentifier`: an IANA name or a `±HH:MM` offset.
///
/// Names are returned as written. Checking them against the available
/// zones is left to the caller's provider.
pub(crate) fn parse_identifier(source: &str) -> TemporalResult<TimeZone> {
    let record = TimeZoneParser::from_str(source)
        .parse_identifier()
        .map_err(invalid_time_zone)?;
    timezone_from_record(record)
}

/// Parses a UTC offset of any precision, `±HH[:MM[:SS[.fffffffff]]]`.
pub(crate) fn parse_offset(source: &str) -> TemporalResult<UtcOffset> {
    let record = TimeZoneParser::from_str(source)
        .parse_offset()
        .map_err(|err| TemporalError::range().with_message(format!("invalid UTC offset: {err}")))?;
    UtcOffset::from_ixdtf_record(record)
}

/// Extracts the time zone named by any Temporal string.
///
/// The bracketed annotation wins over the offset. Without an annotation, `Z`
/// names UTC and a minute precision offset names a fixed offset zone. A
/// sub-minute offset does not name a time zone.
pub(crate) fn parse_allowed_timezone_formats(source: &str) -> Option<TimeZone> {
    let record = [
        ParseVariant::DateTime,
        ParseVariant::Time,
        ParseVariant::YearMonth,
        ParseVariant::MonthDay,
    ]
    .into_iter()
    .find_map(|variant| parse_ixdtf(source.as_bytes(), variant).ok())?;

    if let Some(annotation) = record.tz {
        return timezone_from_record(annotation.tz).ok();
    }

    match record.offset? {
        UtcOffsetRecordOrZ::Z => Some(TimeZone::utc()),
        UtcOffsetRecordOrZ::Offset(offset) if offset.is_minute_precision() => {
            UtcOffset::from_ixdtf_record(offset)
                .ok()
                .map(TimeZone::UtcOffset)
        }
        UtcOffsetRecordOrZ::Offset(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert_eq!(
            parse_identifier("America/New_York").unwrap(),
            TimeZone::IanaIdentifier("America/New_York".into())
        );
        assert_eq!(
            parse_identifier("-05:30").unwrap(),
            TimeZone::UtcOffset(UtcOffset::from_minutes(-330).unwrap())
        );
        assert_eq!(
            parse_identifier("+0100").unwrap(),
            TimeZone::UtcOffset(UtcOffset::from_minutes(60).unwrap())
        );
        // Offset identifiers are minute precision.
        assert!(parse_identifier("+01:00:30").is_err());
        assert!(parse_identifier("").is_err());
        assert!(parse_identifier("2020-01-01").is_err());
    }

    #[test]
    fn offsets() {
        let offset = parse_offset("-05:00:30.5").unwrap();
        assert_eq!(offset.nanoseconds(), -(5 * 3_600 + 30) * 1_000_000_000 - 500_000_000);
        assert_eq!(parse_offset("+14").unwrap().minutes(), 840);
        assert!(parse_offset("+24:00").is_err());
        assert!(parse_offset("UTC").is_err());
    }

    #[test]
    fn time_zone_of_temporal_strings() {
        assert_eq!(
            parse_allowed_timezone_formats("2020-01-01T00:00Z"),
            Some(TimeZone::utc())
        );
        assert_eq!(
            parse_allowed_timezone_formats("2020-01-01T00:00+01:00[Europe/Paris]"),
            Some(TimeZone::IanaIdentifier("Europe/Paris".into()))
        );
        assert_eq!(
            parse_allowed_timezone_formats("2020-01-01T00:00-03:30"),
            Some(TimeZone::UtcOffset(UtcOffset::from_minutes(-210).unwrap()))
        );
        assert_eq!(
            parse_allowed_timezone_formats("2020-01-01T00:00+01:00:01"),
            None
        );
        assert_eq!(parse_allowed_timezone_formats("2020-01-01"), None);
        assert_eq!(parse_allowed_timezone_formats("not a date"), None);
    }
}
