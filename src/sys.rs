use crate::builtins::Now;
use crate::host::{HostClock, HostHooks, HostTimeZone};
use crate::provider::TimeZoneProvider;
use crate::time::EpochNanoseconds;
use crate::{TemporalError, TemporalResult, TimeZone};

use web_time::{SystemTime, UNIX_EPOCH};

/// The entry point for reading the current system time.
pub struct Temporal;

impl Temporal {
    /// Returns a `Now` backed by the [`DefaultHostSystem`].
    ///
    /// ```rust
    /// use temporal_iso::Temporal;
    ///
    /// let instant = Temporal::now().instant().unwrap();
    /// assert!(instant.epoch_milliseconds() > 0);
    /// ```
    pub fn now() -> Now<DefaultHostSystem> {
        Now::new(DefaultHostSystem)
    }
}

/// The host system backed by the system clock and the system time zone.
///
/// The clock is read with `web_time`, the time zone identifier with
/// `iana_time_zone`. An identifier the provider does not know resolves to
/// UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHostSystem;

impl HostClock for DefaultHostSystem {
    fn get_host_epoch_nanoseconds(&self) -> TemporalResult<EpochNanoseconds> {
        get_system_nanoseconds()
    }
}

impl HostTimeZone for DefaultHostSystem {
    fn get_host_time_zone(&self, provider: &impl TimeZoneProvider) -> TemporalResult<TimeZone> {
        let identifier = get_system_timezone()?;
        match TimeZone::try_from_identifier_str_with_provider(&identifier, provider) {
            Ok(time_zone) => Ok(time_zone),
            Err(_e) => {
                #[cfg(feature = "log")]
                log::debug!("system time zone {identifier} is not available: {_e}");
                Ok(TimeZone::utc())
            }
        }
    }
}

impl HostHooks for DefaultHostSystem {}

/// Returns the identifier of the system time zone.
#[inline]
pub(crate) fn get_system_timezone() -> TemporalResult<alloc::string::String> {
    iana_time_zone::get_timezone()
        .map_err(|_| TemporalError::general("Error fetching system time zone"))
}

/// Returns the system time in nanoseconds.
pub(crate) fn get_system_nanoseconds() -> TemporalResult<EpochNanoseconds> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| TemporalError::general("Error fetching system time"))
        .map(|d| EpochNanoseconds::from(d.as_nanos() as i128))
}
