//! The Temporal Now component

use crate::host::HostHooks;
use crate::iso::IsoDateTime;
use crate::provider::TimeZoneProvider;
use crate::TemporalResult;

use super::{
    calendar::Calendar, timezone::TimeZone, Instant, PlainDate, PlainDateTime, PlainTime,
    ZonedDateTime,
};

/// The `Temporal.Now` object, reading the current time through a set of
/// [`HostHooks`].
///
/// Every operation that needs a time zone resolves it before the clock is
/// read.
#[derive(Debug, Clone)]
pub struct Now<H: HostHooks> {
    host_hooks: H,
}

impl<H: HostHooks> Now<H> {
    pub fn new(host_hooks: H) -> Self {
        Self { host_hooks }
    }

    /// Resolves the time zone and then the local date and time for the
    /// current instant.
    fn system_datetime_with_provider(
        &self,
        time_zone: Option<TimeZone>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<IsoDateTime> {
        // 1. If temporalTimeZoneLike is undefined, then
        // a. Let timeZone be SystemTimeZoneIdentifier().
        // 2. Else,
        // a. Let timeZone be ? ToTemporalTimeZoneIdentifier(temporalTimeZoneLike).
        let time_zone = self.resolve_time_zone(time_zone, provider)?;
        // 3. Let epochNs be SystemUTCEpochNanoseconds().
        let epoch_ns = self.host_hooks.get_system_epoch_nanoseconds()?;
        // 4. Return GetISODateTimeFor(timeZone, epochNs).
        time_zone.get_iso_datetime_for(epoch_ns.as_i128(), provider)
    }

    fn resolve_time_zone(
        &self,
        time_zone: Option<TimeZone>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<TimeZone> {
        match time_zone {
            Some(time_zone) => time_zone.normalize(provider),
            None => self.host_hooks.get_system_time_zone(provider),
        }
    }

    /// Returns the current instant.
    pub fn instant(&self) -> TemporalResult<Instant> {
        let epoch_ns = self.host_hooks.get_system_epoch_nanoseconds()?;
        Instant::try_new(epoch_ns.as_i128())
    }

    /// Returns the host's current time zone.
    pub fn time_zone_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<TimeZone> {
        self.host_hooks.get_system_time_zone(provider)
    }

    /// Returns the current time as an ISO `ZonedDateTime` in `time_zone`, or
    /// in the host's time zone when none is provided.
    pub fn zoned_date_time_iso_with_provider(
        &self,
        time_zone: Option<TimeZone>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<ZonedDateTime> {
        let time_zone = self.resolve_time_zone(time_zone, provider)?;
        let instant = self.instant()?;
        Ok(ZonedDateTime::new_unchecked(
            instant,
            Calendar::default(),
            time_zone,
        ))
    }

    /// Returns the current local date and time.
    pub fn plain_date_time_iso_with_provider(
        &self,
        time_zone: Option<TimeZone>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<PlainDateTime> {
        let iso = self.system_datetime_with_provider(time_zone, provider)?;
        Ok(PlainDateTime::new_unchecked(iso, Calendar::default()))
    }

    /// Returns the current local date.
    pub fn plain_date_iso_with_provider(
        &self,
        time_zone: Option<TimeZone>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<PlainDate> {
        let iso = self.system_datetime_with_provider(time_zone, provider)?;
        Ok(PlainDate::new_unchecked(iso.date, Calendar::default()))
    }

    /// Returns the current local wall-clock time.
    pub fn plain_time_iso_with_provider(
        &self,
        time_zone: Option<TimeZone>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<PlainTime> {
        let iso = self.system_datetime_with_provider(time_zone, provider)?;
        Ok(PlainTime::new_unchecked(iso.time))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::Now;
    use crate::{
        host::FixedHostSystem, options::DifferenceSettings, provider::BUILTIN_PROVIDER,
        time::EpochNanoseconds, TimeZone, UtcOffset,
    };

    // 2025-03-12T03:46:28.077363694Z
    const TIME_BASE: i128 = 1_741_751_188_077_363_694;

    fn chicago() -> TimeZone {
        TimeZone::try_from_identifier_str_with_provider("America/Chicago", &BUILTIN_PROVIDER)
            .unwrap()
    }

    #[test]
    fn mocked_datetime() {
        let provider = &BUILTIN_PROVIDER;
        let cdt = TimeZone::from(UtcOffset::from_minutes(-300).unwrap());
        let now = Now::new(FixedHostSystem::new(
            EpochNanoseconds::from(TIME_BASE),
            chicago(),
        ));

        let fixed = now
            .plain_date_time_iso_with_provider(Some(cdt.clone()), provider)
            .unwrap();
        assert_eq!(fixed.year(), 2025);
        assert_eq!(fixed.month(), 3);
        assert_eq!(fixed.day(), 11);
        assert_eq!(fixed.hour(), 22);
        assert_eq!(fixed.minute(), 46);
        assert_eq!(fixed.second(), 28);
        assert_eq!(fixed.millisecond(), 77);
        assert_eq!(fixed.microsecond(), 363);
        assert_eq!(fixed.nanosecond(), 694);

        // Chicago observes daylight saving time on March 11th.
        let host_zone = now.plain_date_time_iso_with_provider(None, provider).unwrap();
        assert_eq!(fixed, host_zone);

        let later = Now::new(FixedHostSystem::new(
            EpochNanoseconds::from(TIME_BASE + 5_000_000_000),
            cdt,
        ));
        let plus_five = later.plain_date_time_iso_with_provider(None, provider).unwrap();
        let duration = fixed
            .until(&plus_five, DifferenceSettings::default())
            .unwrap();
        assert_eq!(duration.hours(), 0.0);
        assert_eq!(duration.seconds(), 5.0);
    }

    #[test]
    fn now_components() {
        let provider = &BUILTIN_PROVIDER;
        let now = Now::new(FixedHostSystem::new(
            EpochNanoseconds::from(TIME_BASE),
            chicago(),
        ));

        assert_eq!(now.instant().unwrap().epoch_milliseconds(), 1_741_751_188_077);
        assert_eq!(
            now.time_zone_with_provider(provider).unwrap().identifier(),
            "America/Chicago"
        );
        assert_eq!(
            now.plain_date_iso_with_provider(None, provider)
                .unwrap()
                .to_string(),
            "2025-03-11"
        );
        assert_eq!(
            now.plain_time_iso_with_provider(Some(TimeZone::utc()), provider)
                .unwrap()
                .to_string(),
            "03:46:28.077363694"
        );

        let zoned = now.zoned_date_time_iso_with_provider(None, provider).unwrap();
        assert_eq!(zoned.hour_with_provider(provider).unwrap(), 22);
        assert_eq!(zoned.offset_with_provider(provider).unwrap(), "-05:00");
    }

    #[test]
    fn unit_host_is_the_epoch_in_utc() {
        let now = Now::new(());
        let date = now
            .plain_date_time_iso_with_provider(None, &BUILTIN_PROVIDER)
            .unwrap();
        assert_eq!(date.to_string(), "1970-01-01T00:00:00");
        assert!(now
            .plain_date_iso_with_provider(
                Some(TimeZone::IanaIdentifier("Mars/Olympus_Mons".into())),
                &BUILTIN_PROVIDER
            )
            .is_err());
    }
}
