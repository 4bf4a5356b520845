use crate::builtins::TZ_PROVIDER;
use crate::iso::IsoDateTime;
use crate::partial::PartialZonedDateTime;
use crate::provider::TransitionDirection;
use crate::{
    options::{
        ArithmeticOverflow, DifferenceSettings, Disambiguation, DisplayCalendar, DisplayOffset,
        DisplayTimeZone, OffsetDisambiguation, RoundingOptions, ToStringRoundingOptions,
    },
    Duration, MonthCode, PlainDate, PlainDateTime, PlainMonthDay, PlainTime, PlainYearMonth,
    TemporalError, TemporalResult, ZonedDateTime,
};
use alloc::string::String;
use core::str::FromStr;

impl core::fmt::Display for ZonedDateTime {
    /// Writes the RFC 9557 string with the default options.
    ///
    /// Enable with the `compiled_data` feature flag.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let string = self.to_ixdtf_string(
            DisplayOffset::Auto,
            DisplayTimeZone::Auto,
            DisplayCalendar::Auto,
            ToStringRoundingOptions::default(),
        );
        debug_assert!(
            string.is_ok(),
            "A valid ZonedDateTime string with default options."
        );
        f.write_str(&string.map_err(|_| Default::default())?)
    }
}

impl FromStr for ZonedDateTime {
    type Err = TemporalError;

    /// Parses with `compatible` disambiguation, rejecting an offset that
    /// disagrees with the time zone.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_with_provider(
            s,
            Disambiguation::Compatible,
            OffsetDisambiguation::Reject,
            TZ_PROVIDER,
        )
    }
}

// ==== Getters ====

/// Calendar and wall-clock getters for `ZonedDateTime`.
///
/// The following [`ZonedDateTime`] methods are feature gated behind the
/// `compiled_data` feature flag.
impl ZonedDateTime {
    pub fn year(&self) -> TemporalResult<i32> {
        self.year_with_provider(TZ_PROVIDER)
    }

    pub fn month(&self) -> TemporalResult<u8> {
        self.month_with_provider(TZ_PROVIDER)
    }

    pub fn month_code(&self) -> TemporalResult<MonthCode> {
        self.month_code_with_provider(TZ_PROVIDER)
    }

    pub fn day(&self) -> TemporalResult<u8> {
        self.day_with_provider(TZ_PROVIDER)
    }

    pub fn hour(&self) -> TemporalResult<u8> {
        self.hour_with_provider(TZ_PROVIDER)
    }

    pub fn minute(&self) -> TemporalResult<u8> {
        self.minute_with_provider(TZ_PROVIDER)
    }

    pub fn second(&self) -> TemporalResult<u8> {
        self.second_with_provider(TZ_PROVIDER)
    }

    pub fn millisecond(&self) -> TemporalResult<u16> {
        self.millisecond_with_provider(TZ_PROVIDER)
    }

    pub fn microsecond(&self) -> TemporalResult<u16> {
        self.microsecond_with_provider(TZ_PROVIDER)
    }

    pub fn nanosecond(&self) -> TemporalResult<u16> {
        self.nanosecond_with_provider(TZ_PROVIDER)
    }

    /// Returns the offset as a `±HH:MM` string.
    pub fn offset(&self) -> TemporalResult<String> {
        self.offset_with_provider(TZ_PROVIDER)
    }

    pub fn offset_nanoseconds(&self) -> TemporalResult<i64> {
        self.offset_nanoseconds_with_provider(TZ_PROVIDER)
    }

    pub fn iso_fields(&self) -> TemporalResult<IsoDateTime> {
        self.iso_fields_with_provider(TZ_PROVIDER)
    }

    pub fn day_of_week(&self) -> TemporalResult<u16> {
        self.day_of_week_with_provider(TZ_PROVIDER)
    }

    pub fn day_of_year(&self) -> TemporalResult<u16> {
        self.day_of_year_with_provider(TZ_PROVIDER)
    }

    pub fn week_of_year(&self) -> TemporalResult<u16> {
        self.week_of_year_with_provider(TZ_PROVIDER)
    }

    pub fn year_of_week(&self) -> TemporalResult<i32> {
        self.year_of_week_with_provider(TZ_PROVIDER)
    }

    pub fn days_in_week(&self) -> TemporalResult<u16> {
        self.days_in_week_with_provider(TZ_PROVIDER)
    }

    pub fn days_in_month(&self) -> TemporalResult<u16> {
        self.days_in_month_with_provider(TZ_PROVIDER)
    }

    pub fn days_in_year(&self) -> TemporalResult<u16> {
        self.days_in_year_with_provider(TZ_PROVIDER)
    }

    pub fn months_in_year(&self) -> TemporalResult<u16> {
        self.months_in_year_with_provider(TZ_PROVIDER)
    }

    pub fn in_leap_year(&self) -> TemporalResult<bool> {
        self.in_leap_year_with_provider(TZ_PROVIDER)
    }

    /// Returns the length of the current day in hours.
    pub fn hours_in_day(&self) -> TemporalResult<f64> {
        self.hours_in_day_with_provider(TZ_PROVIDER)
    }

    pub fn get_time_zone_transition(
        &self,
        direction: TransitionDirection,
    ) -> TemporalResult<Option<Self>> {
        self.get_time_zone_transition_with_provider(direction, TZ_PROVIDER)
    }
}

// ==== Operations ====

/// The primary `ZonedDateTime` method implementations.
///
/// The following [`ZonedDateTime`] methods are feature gated behind the
/// `compiled_data` feature flag.
impl ZonedDateTime {
    #[inline]
    pub fn from_partial(
        partial: PartialZonedDateTime,
        overflow: Option<ArithmeticOverflow>,
        disambiguation: Option<Disambiguation>,
        offset_option: Option<OffsetDisambiguation>,
    ) -> TemporalResult<Self> {
        Self::from_partial_with_provider(
            partial,
            overflow,
            disambiguation,
            offset_option,
            TZ_PROVIDER,
        )
    }

    /// Parses a UTF-8 encoded `ZonedDateTime` string.
    pub fn from_utf8(
        source: &[u8],
        disambiguation: Disambiguation,
        offset_option: OffsetDisambiguation,
    ) -> TemporalResult<Self> {
        Self::from_utf8_with_provider(source, disambiguation, offset_option, TZ_PROVIDER)
    }

    #[inline]
    pub fn with(
        &self,
        partial: PartialZonedDateTime,
        disambiguation: Option<Disambiguation>,
        offset_option: Option<OffsetDisambiguation>,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        self.with_with_provider(
            partial,
            disambiguation,
            offset_option,
            overflow,
            TZ_PROVIDER,
        )
    }

    /// Replaces the wall-clock time, or moves to the start of the day when
    /// no time is provided.
    pub fn with_plain_time(&self, time: Option<PlainTime>) -> TemporalResult<Self> {
        self.with_plain_time_and_provider(time, TZ_PROVIDER)
    }

    /// Replaces the calendar date, keeping the wall-clock time.
    pub fn with_plain_date(&self, date: &PlainDate) -> TemporalResult<Self> {
        self.with_plain_date_and_provider(date, TZ_PROVIDER)
    }

    pub fn add(
        &self,
        duration: &Duration,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        self.add_with_provider(duration, overflow, TZ_PROVIDER)
    }

    pub fn subtract(
        &self,
        duration: &Duration,
        overflow: Option<ArithmeticOverflow>,
    ) -> TemporalResult<Self> {
        self.subtract_with_provider(duration, overflow, TZ_PROVIDER)
    }

    pub fn since(&self, other: &Self, settings: DifferenceSettings) -> TemporalResult<Duration> {
        self.since_with_provider(other, settings, TZ_PROVIDER)
    }

    pub fn until(&self, other: &Self, settings: DifferenceSettings) -> TemporalResult<Duration> {
        self.until_with_provider(other, settings, TZ_PROVIDER)
    }

    pub fn start_of_day(&self) -> TemporalResult<Self> {
        self.start_of_day_with_provider(TZ_PROVIDER)
    }

    pub fn round(&self, options: RoundingOptions) -> TemporalResult<Self> {
        self.round_with_provider(options, TZ_PROVIDER)
    }

    pub fn to_plain_date(&self) -> TemporalResult<PlainDate> {
        self.to_plain_date_with_provider(TZ_PROVIDER)
    }

    pub fn to_plain_time(&self) -> TemporalResult<PlainTime> {
        self.to_plain_time_with_provider(TZ_PROVIDER)
    }

    pub fn to_plain_datetime(&self) -> TemporalResult<PlainDateTime> {
        self.to_plain_datetime_with_provider(TZ_PROVIDER)
    }

    pub fn to_plain_year_month(&self) -> TemporalResult<PlainYearMonth> {
        self.to_plain_year_month_with_provider(TZ_PROVIDER)
    }

    pub fn to_plain_month_day(&self) -> TemporalResult<PlainMonthDay> {
        self.to_plain_month_day_with_provider(TZ_PROVIDER)
    }

    /// Returns the RFC 9557 string with the provided options.
    pub fn to_ixdtf_string(
        &self,
        display_offset: DisplayOffset,
        display_timezone: DisplayTimeZone,
        display_calendar: DisplayCalendar,
        options: ToStringRoundingOptions,
    ) -> TemporalResult<String> {
        self.to_ixdtf_string_with_provider(
            display_offset,
            display_timezone,
            display_calendar,
            options,
            TZ_PROVIDER,
        )
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use core::str::FromStr;

    use crate::{
        options::{DifferenceSettings, TemporalUnit},
        Duration, PlainTime, ZonedDateTime,
    };

    #[test]
    fn compiled_round_trip() {
        let source = "2024-11-03T01:30:00-05:00[America/New_York]";
        let zdt = ZonedDateTime::from_str(source).unwrap();
        assert_eq!(zdt.to_string(), source);
        assert_eq!(zdt.offset().unwrap(), "-05:00");
        assert_eq!(zdt.hours_in_day().unwrap(), 25.0);
        assert_eq!(zdt.to_plain_time().unwrap().to_string(), "01:30:00");

        let parsed: ZonedDateTime = "2024-11-03T01:30[America/New_York][u-ca=iso8601]"
            .parse()
            .unwrap();
        assert_eq!(parsed.offset().unwrap(), "-04:00");
        assert_eq!(parsed.until(&zdt, DifferenceSettings::default()).unwrap().hours(), 1.0);
    }

    #[test]
    fn compiled_arithmetic() {
        let zdt = ZonedDateTime::from_str("2024-03-09T02:30:00-05:00[America/New_York]").unwrap();
        let next = zdt.add(&Duration::from_str("P1D").unwrap(), None).unwrap();
        // 02:30 is skipped on March 10th, so the time is pushed forward.
        assert_eq!(next.to_string(), "2024-03-10T03:30:00-04:00[America/New_York]");

        let mut settings = DifferenceSettings::default();
        settings.largest_unit = Some(TemporalUnit::Day);
        let difference = zdt.until(&next, settings).unwrap();
        assert_eq!((difference.days(), difference.hours()), (1.0, 0.0));

        let noon = next
            .with_plain_time(Some(PlainTime::try_new(12, 0, 0, 0, 0, 0).unwrap()))
            .unwrap();
        assert_eq!(noon.start_of_day().unwrap().hour().unwrap(), 0);
    }
}
