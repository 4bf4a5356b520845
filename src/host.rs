//! Hooks into the host environment for the current time and time zone.
//!
//! `Now` never reads the clock directly. It asks a [`HostHooks`]
//! implementation, which lets embedders supply their own clock (or a fixed
//! one in tests).

use crate::{provider::TimeZoneProvider, time::EpochNanoseconds, TemporalResult, TimeZone};

/// A source of the current epoch nanoseconds.
pub trait HostClock {
    fn get_host_epoch_nanoseconds(&self) -> TemporalResult<EpochNanoseconds>;
}

/// A source of the host's current time zone.
pub trait HostTimeZone {
    fn get_host_time_zone(&self, provider: &impl TimeZoneProvider) -> TemporalResult<TimeZone>;
}

/// The full set of host hooks used by `Now`.
///
/// The `system_*` methods are the `SystemUTCEpochNanoseconds` and
/// `SystemTimeZoneIdentifier` abstract operations.
pub trait HostHooks: HostClock + HostTimeZone {
    fn get_system_epoch_nanoseconds(&self) -> TemporalResult<EpochNanoseconds> {
        self.get_host_epoch_nanoseconds()
    }

    fn get_system_time_zone(&self, provider: &impl TimeZoneProvider) -> TemporalResult<TimeZone> {
        self.get_host_time_zone(provider)
    }
}

/// A host that is always at the epoch in UTC.
impl HostClock for () {
    fn get_host_epoch_nanoseconds(&self) -> TemporalResult<EpochNanoseconds> {
        Ok(EpochNanoseconds::from_seconds(0))
    }
}

impl HostTimeZone for () {
    fn get_host_time_zone(&self, _: &impl TimeZoneProvider) -> TemporalResult<TimeZone> {
        Ok(TimeZone::utc())
    }
}

impl HostHooks for () {}

/// A host frozen at a single instant in a single time zone.
///
/// ```rust
/// use temporal_iso::{host::FixedHostSystem, time::EpochNanoseconds, Now, TimeZone};
///
/// let host = FixedHostSystem::new(EpochNanoseconds::from_seconds(86_400), TimeZone::utc());
/// let now = Now::new(host);
/// assert_eq!(now.instant().unwrap().epoch_milliseconds(), 86_400_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedHostSystem {
    epoch_nanoseconds: EpochNanoseconds,
    time_zone: TimeZone,
}

impl FixedHostSystem {
    pub fn new(epoch_nanoseconds: EpochNanoseconds, time_zone: TimeZone) -> Self {
        Self {
            epoch_nanoseconds,
            time_zone,
        }
    }
}

impl HostClock for FixedHostSystem {
    fn get_host_epoch_nanoseconds(&self) -> TemporalResult<EpochNanoseconds> {
        Ok(self.epoch_nanoseconds)
    }
}

impl HostTimeZone for FixedHostSystem {
    fn get_host_time_zone(&self, provider: &impl TimeZoneProvider) -> TemporalResult<TimeZone> {
        self.time_zone.clone().normalize(provider)
    }
}

impl HostHooks for FixedHostSystem {}
