use crate::builtins::{
    core::{Now, PlainDate, PlainDateTime, PlainTime, ZonedDateTime},
    TZ_PROVIDER,
};
use crate::host::HostHooks;
use crate::{TemporalResult, TimeZone};

/// `Now` methods resolved against the builtin time zone table.
///
/// Enable with the `compiled_data` feature flag.
impl<H: HostHooks> Now<H> {
    pub fn time_zone(&self) -> TemporalResult<TimeZone> {
        self.time_zone_with_provider(TZ_PROVIDER)
    }

    pub fn zoned_date_time_iso(&self, time_zone: Option<TimeZone>) -> TemporalResult<ZonedDateTime> {
        self.zoned_date_time_iso_with_provider(time_zone, TZ_PROVIDER)
    }

    pub fn plain_date_time_iso(&self, time_zone: Option<TimeZone>) -> TemporalResult<PlainDateTime> {
        self.plain_date_time_iso_with_provider(time_zone, TZ_PROVIDER)
    }

    pub fn plain_date_iso(&self, time_zone: Option<TimeZone>) -> TemporalResult<PlainDate> {
        self.plain_date_iso_with_provider(time_zone, TZ_PROVIDER)
    }

    pub fn plain_time_iso(&self, time_zone: Option<TimeZone>) -> TemporalResult<PlainTime> {
        self.plain_time_iso_with_provider(time_zone, TZ_PROVIDER)
    }
}

#[cfg(all(test, feature = "sys"))]
mod tests {
    use crate::{options::DifferenceSettings, Temporal, TimeZone};

    #[test]
    fn system_now_moves_forward() {
        let now = Temporal::now();
        let before = now.plain_date_time_iso(Some(TimeZone::utc())).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let after = now.plain_date_time_iso(Some(TimeZone::utc())).unwrap();

        let diff = after.since(&before, DifferenceSettings::default()).unwrap();
        assert_eq!(diff.hours(), 0.0);
        assert!(diff.milliseconds() >= 20.0 || diff.seconds() >= 1.0);
        assert!(now.time_zone().is_ok());
    }
}
