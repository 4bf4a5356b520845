//! This module implements the Temporal `TimeZone` and `UtcOffset`.

use alloc::string::{String, ToString};
use core::str::FromStr;

use ixdtf::records::{MinutePrecisionOffset, UtcOffsetRecord};
use timezone_provider::epoch_nanoseconds::is_valid_epoch_nanos;

use crate::{
    error::ErrorMessage,
    iso::{IsoDate, IsoDateTime, IsoTime},
    options::Disambiguation,
    parsers::{
        parse_allowed_timezone_formats, parse_identifier, parse_offset, FormattableOffset,
        FormattableTime, Precision,
    },
    provider::{CandidateEpochNanoseconds, TimeZoneProvider, TransitionDirection},
    time::EpochNanoseconds,
    Sign, TemporalError, TemporalResult, NS_PER_DAY,
};

const NS_PER_SECOND: i64 = 1_000_000_000;
const NS_PER_MINUTE: i64 = 60 * NS_PER_SECOND;

/// A UTC offset with nanosecond precision.
///
/// Offsets are strictly shorter than a day in either direction.
///
/// ```rust
/// use temporal_iso::UtcOffset;
/// use core::str::FromStr;
///
/// let offset = UtcOffset::from_str("-03:30").unwrap();
/// assert_eq!(offset.minutes(), -210);
/// assert_eq!(offset.to_string(), "-03:30");
///
/// let precise = UtcOffset::from_str("+01:00:00.5").unwrap();
/// assert_eq!(precise.to_string(), "+01:00:00.5");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcOffset(i64);

impl UtcOffset {
    /// Creates a `UtcOffset` from a signed count of minutes.
    pub fn from_minutes(minutes: i16) -> TemporalResult<Self> {
        Self::from_nanoseconds(i64::from(minutes) * NS_PER_MINUTE)
    }

    /// Creates a `UtcOffset` from a signed count of nanoseconds.
    pub fn from_nanoseconds(nanoseconds: i64) -> TemporalResult<Self> {
        if nanoseconds.unsigned_abs() >= NS_PER_DAY {
            return Err(
                TemporalError::range().with_message("UTC offsets must be less than a day.")
            );
        }
        Ok(Self(nanoseconds))
    }

    pub(crate) fn from_minute_record(record: MinutePrecisionOffset) -> Self {
        let minutes = i64::from(record.hour) * 60 + i64::from(record.minute);
        Self(record.sign as i64 * minutes * NS_PER_MINUTE)
    }

    pub(crate) fn from_ixdtf_record(record: UtcOffsetRecord) -> TemporalResult<Self> {
        let fraction = match record.fraction() {
            Some(fraction) => fraction.to_nanoseconds().ok_or(
                TemporalError::range()
                    .with_message("UTC offsets support at most nine fractional digits."),
            )?,
            None => 0,
        };
        let magnitude = (i64::from(record.hour()) * 60 + i64::from(record.minute())) * NS_PER_MINUTE
            + i64::from(record.second().unwrap_or(0)) * NS_PER_SECOND
            + i64::from(fraction);
        Self::from_nanoseconds(record.sign() as i64 * magnitude)
    }

    /// Returns the offset in nanoseconds.
    #[inline]
    #[must_use]
    pub fn nanoseconds(&self) -> i64 {
        self.0
    }

    /// Returns the whole minutes of the offset, truncated toward zero.
    #[inline]
    #[must_use]
    pub fn minutes(&self) -> i16 {
        // |self.0| < NS_PER_DAY, so the minutes fit.
        (self.0 / NS_PER_MINUTE) as i16
    }

    /// Returns whether the offset has a seconds or subseconds component.
    #[inline]
    #[must_use]
    pub fn is_sub_minute(&self) -> bool {
        self.0 % NS_PER_MINUTE != 0
    }

    /// Rounds the offset to the nearest minute, half away from zero.
    pub(crate) fn round_to_minute(&self) -> Self {
        let half = NS_PER_MINUTE / 2;
        let minutes = if self.0 < 0 {
            (self.0 - half) / NS_PER_MINUTE
        } else {
            (self.0 + half) / NS_PER_MINUTE
        };
        Self(minutes * NS_PER_MINUTE)
    }

    /// Returns the sign, hours and minutes of the offset rounded to the
    /// nearest minute.
    pub(crate) fn to_minute_parts(self) -> (Sign, u8, u8) {
        let minutes = self.round_to_minute().minutes();
        let sign = if minutes < 0 {
            Sign::Negative
        } else {
            Sign::Positive
        };
        let magnitude = minutes.unsigned_abs();
        (sign, (magnitude / 60) as u8, (magnitude % 60) as u8)
    }

    /// Returns the formattable form of this offset. Seconds are written only
    /// when present.
    pub(crate) fn to_formattable(self, precision: Precision) -> FormattableOffset {
        let sign = if self.0 < 0 {
            Sign::Negative
        } else {
            Sign::Positive
        };
        let magnitude = self.0.unsigned_abs();
        let ns_per_minute = NS_PER_MINUTE as u64;
        let ns_per_second = NS_PER_SECOND as u64;
        let precision = match precision {
            Precision::Auto if magnitude % ns_per_minute == 0 => Precision::Minute,
            precision => precision,
        };
        FormattableOffset {
            sign,
            time: FormattableTime {
                hour: (magnitude / (60 * ns_per_minute)) as u8,
                minute: ((magnitude / ns_per_minute) % 60) as u8,
                second: ((magnitude / ns_per_second) % 60) as u8,
                nanosecond: (magnitude % ns_per_second) as u32,
                precision,
                include_sep: true,
            },
        }
    }
}

impl FromStr for UtcOffset {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_offset(s)
    }
}

impl core::fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.to_formattable(Precision::Auto), f)
    }
}

/// A Temporal time zone: either a named zone resolved through a
/// [`TimeZoneProvider`] or a fixed offset from UTC.
///
/// Fixed offset zones are minute precision and never consult a provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimeZone {
    IanaIdentifier(String),
    UtcOffset(UtcOffset),
}

impl From<UtcOffset> for TimeZone {
    fn from(value: UtcOffset) -> Self {
        Self::UtcOffset(value)
    }
}

impl Default for TimeZone {
    fn default() -> Self {
        Self::utc()
    }
}

impl TimeZone {
    /// Returns the `UTC` time zone.
    #[must_use]
    pub fn utc() -> Self {
        Self::IanaIdentifier(String::from("UTC"))
    }

    /// Parses a time zone identifier: an IANA name or a `±HH:MM` offset.
    ///
    /// Names are case-normalized against `provider`.
    pub fn try_from_identifier_str_with_provider(
        source: &str,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        parse_identifier(source)?.normalize(provider)
    }

    /// Parses a time zone from a time zone identifier or from any Temporal
    /// string that names one.
    ///
    /// ```rust
    /// use temporal_iso::{provider::BUILTIN_PROVIDER, TimeZone};
    ///
    /// let tz = TimeZone::try_from_str_with_provider("america/new_york", &BUILTIN_PROVIDER).unwrap();
    /// assert_eq!(tz.identifier(), "America/New_York");
    ///
    /// let tz = TimeZone::try_from_str_with_provider("2020-01-01T00:00+09:00", &BUILTIN_PROVIDER).unwrap();
    /// assert_eq!(tz.identifier(), "+09:00");
    /// ```
    pub fn try_from_str_with_provider(
        source: &str,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        if let Ok(timezone) = parse_identifier(source) {
            return timezone.normalize(provider);
        }
        parse_allowed_timezone_formats(source)
            .ok_or(TemporalError::range().with_message("a valid time zone was not provided."))?
            .normalize(provider)
    }

    pub(crate) fn normalize(self, provider: &impl TimeZoneProvider) -> TemporalResult<Self> {
        match self {
            Self::IanaIdentifier(identifier) => {
                let normalized = provider
                    .normalize_identifier(identifier.as_bytes())
                    .map_err(|_| {
                        TemporalError::range().with_message("time zone identifier is not available.")
                    })?;
                Ok(Self::IanaIdentifier(normalized.into_owned()))
            }
            offset @ Self::UtcOffset(_) => Ok(offset),
        }
    }

    /// Returns the identifier of this time zone: the IANA name or the
    /// `±HH:MM` offset string.
    #[must_use]
    pub fn identifier(&self) -> String {
        match self {
            Self::IanaIdentifier(identifier) => identifier.clone(),
            Self::UtcOffset(offset) => offset.to_string(),
        }
    }

    /// Returns whether both zones have the same identifier.
    pub(crate) fn time_zone_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::IanaIdentifier(one), Self::IanaIdentifier(two)) => {
                one.eq_ignore_ascii_case(two)
            }
            (Self::UtcOffset(one), Self::UtcOffset(two)) => one == two,
            _ => false,
        }
    }
}

// ==== Offset and local time lookups ====

impl TimeZone {
    /// Returns the offset in nanoseconds in effect at `epoch_ns`.
    ///
    /// Equivalent to `GetOffsetNanosecondsFor`.
    pub fn get_offset_nanos_for(
        &self,
        epoch_ns: i128,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<i128> {
        // 1. Let parseResult be ! ParseTimeZoneIdentifier(timeZone).
        match self {
            // 2. If parseResult.[[OffsetMinutes]] is not empty, return parseResult.[[OffsetMinutes]] × (60 × 10**9).
            Self::UtcOffset(offset) => Ok(i128::from(offset.nanoseconds())),
            // 3. Return GetNamedTimeZoneOffsetNanoseconds(parseResult.[[Name]], epochNs).
            Self::IanaIdentifier(identifier) => Ok(provider
                .get_named_tz_offset_nanoseconds(identifier, epoch_ns)?
                .offset
                .as_nanoseconds()),
        }
    }

    /// Returns the local date and time of `epoch_ns` in this time zone.
    ///
    /// Equivalent to `GetISODateTimeFor`.
    pub fn get_iso_datetime_for(
        &self,
        epoch_ns: i128,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<IsoDateTime> {
        // 1. Let offsetNanoseconds be ? GetOffsetNanosecondsFor(timeZone, epochNs).
        let offset = self.get_offset_nanos_for(epoch_ns, provider)?;
        // 2. Let result be GetISOPartsFromEpoch(ℝ(epochNs)).
        // 3. Return BalanceISODateTime(..., result.[[Nanosecond]] + offsetNanoseconds).
        IsoDateTime::from_epoch_nanos(epoch_ns, offset)
    }

    /// Returns every instant at which this time zone reads `iso`.
    ///
    /// Equivalent to `GetPossibleEpochNanoseconds`.
    pub fn get_possible_epoch_ns_for(
        &self,
        iso: IsoDateTime,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<CandidateEpochNanoseconds> {
        // CheckISODaysRange
        if iso.date.to_epoch_days().abs() > 100_000_000 {
            return Err(TemporalError::range().with_enum(ErrorMessage::DateTimeOutOfRange));
        }
        // 1. Let parseResult be ! ParseTimeZoneIdentifier(timeZone).
        let candidates = match self {
            // 2. If parseResult.[[OffsetMinutes]] is not empty, then
            Self::UtcOffset(offset) => {
                // a-c. Let epochNanoseconds be GetUTCEpochNanoseconds(balanced local time - offset).
                let epoch_ns =
                    iso.as_nanoseconds().as_i128() - i128::from(offset.nanoseconds());
                CandidateEpochNanoseconds::One(EpochNanoseconds::from(epoch_ns))
            }
            // 3. Else, let possibleEpochNanoseconds be GetNamedTimeZoneEpochNanoseconds(parseResult.[[Name]], isoDateTime).
            Self::IanaIdentifier(identifier) => {
                provider.get_named_tz_epoch_nanoseconds(identifier, iso.into())?
            }
        };
        // 4. For each value epochNanoseconds in possibleEpochNanoseconds, do
        //    a. If IsValidEpochNanoseconds(epochNanoseconds) is false, throw a RangeError exception.
        if candidates
            .as_slice()
            .iter()
            .any(|ns| !is_valid_epoch_nanos(&ns.as_i128()))
        {
            return Err(TemporalError::range().with_enum(ErrorMessage::InstantOutOfRange));
        }
        // 5. Return possibleEpochNanoseconds.
        Ok(candidates)
    }

    /// Resolves `iso` to a single instant according to `disambiguation`.
    ///
    /// Equivalent to `GetEpochNanosecondsFor`.
    pub fn get_epoch_nanoseconds_for(
        &self,
        iso: IsoDateTime,
        disambiguation: Disambiguation,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<EpochNanoseconds> {
        // 1. Let possibleEpochNs be ? GetPossibleEpochNanoseconds(timeZone, isoDateTime).
        let possible = self.get_possible_epoch_ns_for(iso, provider)?;
        // 2. Return ? DisambiguatePossibleEpochNanoseconds(possibleEpochNs, timeZone, isoDateTime, disambiguation).
        self.disambiguate_possible_epoch_nanos(possible, iso, disambiguation, provider)
    }

    /// Equivalent to `DisambiguatePossibleEpochNanoseconds`.
    pub(crate) fn disambiguate_possible_epoch_nanos(
        &self,
        possible: CandidateEpochNanoseconds,
        iso: IsoDateTime,
        disambiguation: Disambiguation,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<EpochNanoseconds> {
        match (possible, disambiguation) {
            // 2. If n = 1, then
            //    a. Return possibleEpochNs[0].
            (CandidateEpochNanoseconds::One(epoch_ns), _) => return Ok(epoch_ns),
            // 3. If n ≠ 0, then
            //    a. If disambiguation is earlier or compatible, return possibleEpochNs[0].
            (
                CandidateEpochNanoseconds::Two([earlier, _]),
                Disambiguation::Compatible | Disambiguation::Earlier,
            ) => return Ok(earlier),
            //    b. If disambiguation is later, return possibleEpochNs[n - 1].
            (CandidateEpochNanoseconds::Two([_, later]), Disambiguation::Later) => {
                return Ok(later)
            }
            //    c-d. Assert: disambiguation is reject. Throw a RangeError exception.
            (CandidateEpochNanoseconds::Two(_), Disambiguation::Reject)
            // 4-5. If disambiguation is reject, throw a RangeError exception.
            | (CandidateEpochNanoseconds::Zero, Disambiguation::Reject) => {
                return Err(TemporalError::range().with_enum(ErrorMessage::DisambiguationRejected))
            }
            (CandidateEpochNanoseconds::Zero, _) => {}
        }

        #[cfg(feature = "log")]
        log::debug!(
            "{iso:?} does not exist in {}, resolving with {disambiguation:?}",
            self.identifier()
        );

        // 6. Let epochDays be ISODateToEpochDays(...).
        // 7. Let dayBefore be GetUTCEpochNanoseconds(BalanceISODate(..., epochDays - 1)).
        // 8. Assert: IsValidEpochNanoseconds(dayBefore) is true.
        let local_ns = iso.as_nanoseconds().as_i128();
        let ns_per_day = i128::from(NS_PER_DAY);
        // 9. Let offsetBefore be ? GetOffsetNanosecondsFor(timeZone, dayBefore).
        let offset_before = self.get_offset_nanos_for(local_ns - ns_per_day, provider)?;
        // 10. Let dayAfter be GetUTCEpochNanoseconds(BalanceISODate(..., epochDays + 1)).
        // 12. Let offsetAfter be ? GetOffsetNanosecondsFor(timeZone, dayAfter).
        let offset_after = self.get_offset_nanos_for(local_ns + ns_per_day, provider)?;
        // 13. Let nanoseconds be offsetAfter - offsetBefore.
        let nanoseconds = offset_after - offset_before;
        // 14. Assert: abs(nanoseconds) ≤ nsPerDay.
        debug_assert!(nanoseconds.abs() <= ns_per_day);

        // 15. If disambiguation is earlier, then
        if disambiguation == Disambiguation::Earlier {
            // a-d. Let earlierDateTime be isoDateTime moved back by nanoseconds.
            let earlier = IsoDateTime::from_epoch_nanos(local_ns - nanoseconds, 0)?;
            // e. Set possibleEpochNs to ? GetPossibleEpochNanoseconds(timeZone, earlierDateTime).
            // f. Assert: possibleEpochNs is not empty.
            // g. Return possibleEpochNs[0].
            return self
                .get_possible_epoch_ns_for(earlier, provider)?
                .first()
                .ok_or(TemporalError::assert().with_message("gap resolution found no instant."));
        }
        // 16. Assert: disambiguation is compatible or later.
        // 17-20. Let laterDateTime be isoDateTime moved forward by nanoseconds.
        let later = IsoDateTime::from_epoch_nanos(local_ns + nanoseconds, 0)?;
        // 21. Set possibleEpochNs to ? GetPossibleEpochNanoseconds(timeZone, laterDateTime).
        // 22-24. Assert: n ≠ 0. Return possibleEpochNs[n - 1].
        self.get_possible_epoch_ns_for(later, provider)?
            .last()
            .ok_or(TemporalError::assert().with_message("gap resolution found no instant."))
    }

    /// Returns the first instant of `iso_date` in this time zone.
    ///
    /// Equivalent to `GetStartOfDay`.
    pub(crate) fn get_start_of_day(
        &self,
        iso_date: &IsoDate,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<EpochNanoseconds> {
        // 1. Let isoDateTime be CombineISODateAndTimeRecord(isoDate, MidnightTimeRecord()).
        let iso = IsoDateTime::new_unchecked(*iso_date, IsoTime::default());
        // 2. Let possibleEpochNs be ? GetPossibleEpochNanoseconds(timeZone, isoDateTime).
        // 3. If possibleEpochNs is not empty, return possibleEpochNs[0].
        if let Some(epoch_ns) = self.get_possible_epoch_ns_for(iso, provider)?.first() {
            return Ok(epoch_ns);
        }
        // 4. Assert: IsOffsetTimeZoneIdentifier(timeZone) is false.
        let Self::IanaIdentifier(identifier) = self else {
            return Err(TemporalError::assert().with_message("offset time zones have no gaps."));
        };
        // 5-7. Return the first instant after the transition that skipped midnight.
        //
        // Midnight read with the offset in effect before the gap lies at or
        // after the transition, so the previous transition from just past it
        // is the one that skipped midnight.
        let local_ns = iso.as_nanoseconds().as_i128();
        let offset_before =
            self.get_offset_nanos_for(local_ns - i128::from(NS_PER_DAY), provider)?;
        let transition = provider
            .get_named_tz_transition(
                identifier,
                local_ns - offset_before + 1,
                TransitionDirection::Previous,
            )?
            .ok_or(
                TemporalError::range()
                    .with_message("could not determine the start of day for the provided date."),
            )?;
        Ok(transition)
    }

    /// Returns the next (or previous) instant at which the offset of this
    /// time zone changes. Offset time zones have no transitions.
    pub fn get_time_zone_transition(
        &self,
        epoch_ns: i128,
        direction: TransitionDirection,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Option<EpochNanoseconds>> {
        match self {
            Self::UtcOffset(_) => Ok(None),
            Self::IanaIdentifier(identifier) => Ok(provider.get_named_tz_transition(
                identifier,
                epoch_ns,
                direction,
            )?),
        }
    }

    /// Returns the next offset transition strictly after `epoch_ns`.
    pub fn get_next_transition(
        &self,
        epoch_ns: i128,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Option<EpochNanoseconds>> {
        self.get_time_zone_transition(epoch_ns, TransitionDirection::Next, provider)
    }

    /// Returns the closest offset transition strictly before `epoch_ns`.
    pub fn get_previous_transition(
        &self,
        epoch_ns: i128,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Option<EpochNanoseconds>> {
        self.get_time_zone_transition(epoch_ns, TransitionDirection::Previous, provider)
    }
}

#[cfg(test)]
mod tests {
    use super::{TimeZone, UtcOffset};
    use alloc::string::ToString;
    use crate::{
        iso::{IsoDate, IsoDateTime, IsoTime},
        options::Disambiguation,
        provider::{CandidateEpochNanoseconds, NeverProvider, BUILTIN_PROVIDER},
    };
    use core::str::FromStr;

    const NS_PER_HOUR: i128 = 3_600_000_000_000;

    fn local(year: i32, month: u8, day: u8, hour: u8, minute: u8) -> IsoDateTime {
        IsoDateTime::new_unchecked(
            IsoDate::new_unchecked(year, month, day),
            IsoTime::new_unchecked(hour, minute, 0, 0, 0, 0),
        )
    }

    fn new_york() -> TimeZone {
        TimeZone::try_from_str_with_provider("America/New_York", &BUILTIN_PROVIDER).unwrap()
    }

    #[test]
    fn from_and_to_string() {
        for src in ["+09:30", "-09:30", "-12:30", "+00:00"] {
            let tz = TimeZone::try_from_str_with_provider(src, &NeverProvider).unwrap();
            assert_eq!(tz.identifier(), src);
        }
        let tz = TimeZone::try_from_str_with_provider("-0800", &NeverProvider).unwrap();
        assert_eq!(tz.identifier(), "-08:00");

        let tz = TimeZone::try_from_str_with_provider("europe/PARIS", &BUILTIN_PROVIDER).unwrap();
        assert_eq!(tz.identifier(), "Europe/Paris");

        assert!(TimeZone::try_from_str_with_provider("Mars/Olympus", &BUILTIN_PROVIDER).is_err());
        assert!(TimeZone::try_from_str_with_provider("Europe/Paris", &NeverProvider).is_err());
    }

    #[test]
    fn time_zone_from_temporal_strings() {
        let tz =
            TimeZone::try_from_str_with_provider("2021-08-19T17:30Z", &BUILTIN_PROVIDER).unwrap();
        assert_eq!(tz, TimeZone::utc());

        let tz = TimeZone::try_from_str_with_provider(
            "2021-08-19T17:30-07:00[America/Los_Angeles]",
            &BUILTIN_PROVIDER,
        )
        .unwrap();
        assert_eq!(tz.identifier(), "America/Los_Angeles");

        let err = TimeZone::try_from_str_with_provider(
            "2021-08-19T17:30-07:00:01",
            &BUILTIN_PROVIDER,
        );
        assert!(err.is_err());
        assert!(TimeZone::try_from_identifier_str_with_provider(
            "2021-08-19T17:30Z",
            &BUILTIN_PROVIDER
        )
        .is_err());
    }

    #[test]
    fn utc_offset_formatting() {
        assert_eq!(UtcOffset::from_minutes(330).unwrap().to_string(), "+05:30");
        assert_eq!(UtcOffset::from_minutes(-1).unwrap().to_string(), "-00:01");
        assert_eq!(
            UtcOffset::from_str("-00:00:01.000000001").unwrap().to_string(),
            "-00:00:01.000000001"
        );
        assert!(UtcOffset::from_minutes(24 * 60).is_err());
        assert!(UtcOffset::from_minutes(23 * 60 + 59).is_ok());

        let offset = UtcOffset::from_str("+05:30:30").unwrap();
        assert!(offset.is_sub_minute());
        assert_eq!(offset.round_to_minute(), UtcOffset::from_minutes(331).unwrap());
        let offset = UtcOffset::from_str("-05:30:29.999").unwrap();
        assert_eq!(offset.round_to_minute(), UtcOffset::from_minutes(-330).unwrap());
    }

    #[test]
    fn offset_zone_lookups() {
        let tz = TimeZone::UtcOffset(UtcOffset::from_minutes(-300).unwrap());
        assert_eq!(tz.get_offset_nanos_for(0, &NeverProvider).unwrap(), -5 * NS_PER_HOUR);

        let iso = tz.get_iso_datetime_for(0, &NeverProvider).unwrap();
        assert_eq!(iso, local(1969, 12, 31, 19, 0));

        let epoch = tz
            .get_epoch_nanoseconds_for(iso, Disambiguation::Reject, &NeverProvider)
            .unwrap();
        assert_eq!(epoch.as_i128(), 0);
        assert_eq!(tz.get_next_transition(0, &NeverProvider).unwrap(), None);
    }

    #[test]
    fn dst_gap_disambiguation() {
        let tz = new_york();
        // 2024-03-10 02:00 EST jumps to 03:00 EDT.
        let skipped = local(2024, 3, 10, 2, 30);
        assert_eq!(
            tz.get_possible_epoch_ns_for(skipped, &BUILTIN_PROVIDER).unwrap(),
            CandidateEpochNanoseconds::Zero
        );
        assert!(tz
            .get_epoch_nanoseconds_for(skipped, Disambiguation::Reject, &BUILTIN_PROVIDER)
            .is_err());

        let compatible = tz
            .get_epoch_nanoseconds_for(skipped, Disambiguation::Compatible, &BUILTIN_PROVIDER)
            .unwrap();
        let resolved = tz
            .get_iso_datetime_for(compatible.as_i128(), &BUILTIN_PROVIDER)
            .unwrap();
        assert_eq!(resolved, local(2024, 3, 10, 3, 30));

        let earlier = tz
            .get_epoch_nanoseconds_for(skipped, Disambiguation::Earlier, &BUILTIN_PROVIDER)
            .unwrap();
        let resolved = tz
            .get_iso_datetime_for(earlier.as_i128(), &BUILTIN_PROVIDER)
            .unwrap();
        assert_eq!(resolved, local(2024, 3, 10, 1, 30));
    }

    #[test]
    fn dst_overlap_disambiguation() {
        let tz = new_york();
        // 2024-11-03 01:30 happens twice.
        let repeated = local(2024, 11, 3, 1, 30);
        let earlier = tz
            .get_epoch_nanoseconds_for(repeated, Disambiguation::Compatible, &BUILTIN_PROVIDER)
            .unwrap();
        let later = tz
            .get_epoch_nanoseconds_for(repeated, Disambiguation::Later, &BUILTIN_PROVIDER)
            .unwrap();
        assert_eq!(later.as_i128() - earlier.as_i128(), NS_PER_HOUR);
        assert_eq!(
            tz.get_offset_nanos_for(earlier.as_i128(), &BUILTIN_PROVIDER).unwrap(),
            -4 * NS_PER_HOUR
        );
        assert!(tz
            .get_epoch_nanoseconds_for(repeated, Disambiguation::Reject, &BUILTIN_PROVIDER)
            .is_err());
    }

    #[test]
    fn transitions() {
        let tz = new_york();
        let start = tz
            .get_epoch_nanoseconds_for(
                local(2024, 1, 1, 0, 0),
                Disambiguation::Reject,
                &BUILTIN_PROVIDER,
            )
            .unwrap();
        let next = tz
            .get_next_transition(start.as_i128(), &BUILTIN_PROVIDER)
            .unwrap()
            .unwrap();
        assert_eq!(
            tz.get_iso_datetime_for(next.as_i128(), &BUILTIN_PROVIDER).unwrap(),
            local(2024, 3, 10, 3, 0)
        );
        let previous = tz
            .get_previous_transition(next.as_i128(), &BUILTIN_PROVIDER)
            .unwrap()
            .unwrap();
        assert!(previous.as_i128() < start.as_i128());
    }

    #[test]
    fn start_of_day_skipped_midnight() {
        // A zone whose DST starts at midnight.
        use crate::provider::RuleTableProvider;
        let mut provider = RuleTableProvider::new();
        provider
            .insert("Test/Midnight", "STD3DST,M10.1.0/0,M2.3.0/0")
            .unwrap();
        let tz = TimeZone::try_from_str_with_provider("Test/Midnight", &provider).unwrap();

        // 2023-10-01 is the first Sunday of October.
        let date = IsoDate::new_unchecked(2023, 10, 1);
        let start = tz.get_start_of_day(&date, &provider).unwrap();
        assert_eq!(
            tz.get_iso_datetime_for(start.as_i128(), &provider).unwrap(),
            local(2023, 10, 1, 1, 0)
        );

        let ordinary = IsoDate::new_unchecked(2023, 10, 2);
        let start = tz.get_start_of_day(&ordinary, &provider).unwrap();
        assert_eq!(
            tz.get_iso_datetime_for(start.as_i128(), &provider).unwrap(),
            local(2023, 10, 2, 0, 0)
        );
    }
}
