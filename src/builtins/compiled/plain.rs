use crate::{
    builtins::core::{PlainDate, PlainDateTime, PlainTime, ZonedDateTime},
    builtins::TZ_PROVIDER,
    options::Disambiguation,
    TemporalResult, TimeZone,
};

impl PlainDate {
    /// Returns the `ZonedDateTime` of this date at `plain_time` in
    /// `time_zone`, or at the start of the day when no time is provided.
    ///
    /// Enable with the `compiled_data` feature flag.
    pub fn to_zoned_date_time(
        &self,
        time_zone: TimeZone,
        plain_time: Option<PlainTime>,
    ) -> TemporalResult<ZonedDateTime> {
        self.to_zoned_date_time_with_provider(time_zone, plain_time, TZ_PROVIDER)
    }
}

impl PlainTime {
    /// Returns the `ZonedDateTime` of this time on `date` in `time_zone`.
    ///
    /// Enable with the `compiled_data` feature flag.
    pub fn to_zoned_date_time(
        &self,
        date: &PlainDate,
        time_zone: TimeZone,
    ) -> TemporalResult<ZonedDateTime> {
        self.to_zoned_date_time_with_provider(date, time_zone, TZ_PROVIDER)
    }
}

impl PlainDateTime {
    /// Returns a `ZonedDateTime` with the provided `TimeZone` and
    /// `Disambiguation`.
    ///
    /// Enable with the `compiled_data` feature flag.
    pub fn to_zoned_date_time(
        &self,
        time_zone: TimeZone,
        disambiguation: Disambiguation,
    ) -> TemporalResult<ZonedDateTime> {
        self.to_zoned_date_time_with_provider(time_zone, disambiguation, TZ_PROVIDER)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use crate::{options::Disambiguation, Calendar, PlainDate, PlainDateTime, PlainTime, TimeZone};

    fn los_angeles() -> TimeZone {
        TimeZone::try_from_identifier_str("America/Los_Angeles").unwrap()
    }

    #[test]
    fn to_zoned_date_time_edge_cases() {
        let pdt = PlainDateTime::try_new(2020, 3, 8, 2, 30, 0, 0, 0, 0, Calendar::default()).unwrap();
        let zdt = pdt
            .to_zoned_date_time(los_angeles(), Disambiguation::Compatible)
            .unwrap();
        assert_eq!(zdt.hour().unwrap(), 3);

        let zdt = pdt
            .to_zoned_date_time(los_angeles(), Disambiguation::Earlier)
            .unwrap();
        assert_eq!(zdt.hour().unwrap(), 1);

        assert!(pdt
            .to_zoned_date_time(los_angeles(), Disambiguation::Reject)
            .is_err());
    }

    #[test]
    fn plain_date_and_time_to_zoned() {
        let date = PlainDate::try_new_iso(2020, 3, 8).unwrap();
        let start = date.to_zoned_date_time(los_angeles(), None).unwrap();
        assert_eq!(start.to_string(), "2020-03-08T00:00:00-08:00[America/Los_Angeles]");

        let time = PlainTime::try_new(12, 0, 0, 0, 0, 0).unwrap();
        let noon = time.to_zoned_date_time(&date, los_angeles()).unwrap();
        assert_eq!(noon.to_string(), "2020-03-08T12:00:00-07:00[America/Los_Angeles]");
        assert_eq!(noon.hours_in_day().unwrap(), 23.0);
    }
}
