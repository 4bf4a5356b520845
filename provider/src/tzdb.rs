//! Time zone providers.
//!
//! [`BuiltinProvider`] resolves IANA identifiers against the compiled time
//! zone database bundled by `jiff-tzdb`, parsing each zone's TZif data on
//! first use. [`RuleTableProvider`] resolves a caller supplied table of POSIX
//! TZ rules and works without `std`.

use alloc::{borrow::Cow, string::String, vec::Vec};

use crate::{
    epoch_nanoseconds::EpochNanoseconds,
    posix::PosixTimeZone,
    provider::{
        CandidateEpochNanoseconds, IsoDateTime, TimeZoneProvider, TimeZoneProviderResult,
        TimeZoneTransitionInfo, TransitionDirection,
    },
    TimeZoneProviderError,
};

#[cfg(feature = "tzif")]
use crate::tzif::Tzif;
#[cfg(feature = "tzif")]
use alloc::{collections::BTreeMap, sync::Arc};
#[cfg(feature = "tzif")]
use std::sync::RwLock;

const UNKNOWN_IDENTIFIER: &str = "Unknown time zone identifier.";

/// The offset rules of one zone.
trait ZoneRules {
    fn offset_at(&self, epoch_seconds: i64) -> TimeZoneTransitionInfo;

    fn candidates(&self, local_nanoseconds: i128) -> CandidateEpochNanoseconds;

    fn transition_from(&self, epoch_seconds: i64, direction: TransitionDirection) -> Option<i64>;
}

impl ZoneRules for PosixTimeZone {
    fn offset_at(&self, epoch_seconds: i64) -> TimeZoneTransitionInfo {
        self.resolve_for_epoch_seconds(epoch_seconds)
    }

    fn candidates(&self, local_nanoseconds: i128) -> CandidateEpochNanoseconds {
        self.candidate_epoch_nanoseconds(local_nanoseconds)
    }

    fn transition_from(&self, epoch_seconds: i64, direction: TransitionDirection) -> Option<i64> {
        self.transition(epoch_seconds, direction)
    }
}

#[cfg(feature = "tzif")]
impl ZoneRules for Tzif {
    fn offset_at(&self, epoch_seconds: i64) -> TimeZoneTransitionInfo {
        self.resolve_for_epoch_seconds(epoch_seconds)
    }

    fn candidates(&self, local_nanoseconds: i128) -> CandidateEpochNanoseconds {
        self.candidate_epoch_nanoseconds(local_nanoseconds)
    }

    fn transition_from(&self, epoch_seconds: i64, direction: TransitionDirection) -> Option<i64> {
        self.transition(epoch_seconds, direction)
    }
}

// ==== Compiled IANA data ====

/// A provider over the IANA time zone database compiled into `jiff-tzdb`.
///
/// Identifiers are matched case-insensitively and normalized to the casing
/// used by the database. Links keep their own name.
#[cfg(feature = "tzif")]
#[derive(Debug, Default)]
pub struct BuiltinProvider {
    cache: RwLock<BTreeMap<&'static str, Arc<Tzif>>>,
}

/// The provider used by `temporal_iso`'s `compiled_data` APIs.
#[cfg(feature = "tzif")]
pub static BUILTIN_PROVIDER: BuiltinProvider = BuiltinProvider::new();

#[cfg(feature = "tzif")]
impl BuiltinProvider {
    pub const fn new() -> Self {
        Self {
            cache: RwLock::new(BTreeMap::new()),
        }
    }

    fn lookup(identifier: &[u8]) -> Option<(&'static str, &'static [u8])> {
        let identifier = core::str::from_utf8(identifier).ok()?;
        jiff_tzdb::get(identifier)
    }

    /// Returns the zone data for `identifier`, parsing it on first use.
    pub fn get(&self, identifier: &str) -> TimeZoneProviderResult<Arc<Tzif>> {
        let (canonical, data) = Self::lookup(identifier.as_bytes())
            .ok_or(TimeZoneProviderError::Range(UNKNOWN_IDENTIFIER))?;
        if let Some(tzif) = self
            .cache
            .read()
            .map_err(|_| TimeZoneProviderError::Assert("poisoned RwLock"))?
            .get(canonical)
        {
            return Ok(tzif.clone());
        }

        let tzif = Arc::new(Tzif::from_bytes(data)?);
        Ok(self
            .cache
            .write()
            .map_err(|_| TimeZoneProviderError::Assert("poisoned RwLock"))?
            .entry(canonical)
            .or_insert(tzif)
            .clone())
    }
}

#[cfg(feature = "tzif")]
impl TimeZoneProvider for BuiltinProvider {
    fn normalize_identifier(&self, ident: &'_ [u8]) -> TimeZoneProviderResult<Cow<'_, str>> {
        Self::lookup(ident)
            .map(|(id, _)| Cow::Borrowed(id))
            .ok_or(TimeZoneProviderError::Range(UNKNOWN_IDENTIFIER))
    }

    fn get_named_tz_epoch_nanoseconds(
        &self,
        identifier: &str,
        local_datetime: IsoDateTime,
    ) -> TimeZoneProviderResult<CandidateEpochNanoseconds> {
        resolve_local(self.get(identifier)?.as_ref(), local_datetime)
    }

    fn get_named_tz_offset_nanoseconds(
        &self,
        identifier: &str,
        epoch_nanoseconds: i128,
    ) -> TimeZoneProviderResult<TimeZoneTransitionInfo> {
        resolve_offset(self.get(identifier)?.as_ref(), epoch_nanoseconds)
    }

    fn get_named_tz_transition(
        &self,
        identifier: &str,
        epoch_nanoseconds: i128,
        direction: TransitionDirection,
    ) -> TimeZoneProviderResult<Option<EpochNanoseconds>> {
        resolve_transition(self.get(identifier)?.as_ref(), epoch_nanoseconds, direction)
    }
}

// ==== POSIX rule tables ====

/// A provider over a caller supplied table of POSIX rules.
///
/// A rule describes the zone for all time, so a table is only as accurate as
/// its rules are for the instants being resolved.
///
/// ```rust
/// use timezone_provider::{provider::TimeZoneProvider, RuleTableProvider};
///
/// let mut provider = RuleTableProvider::new();
/// provider.insert("Custom/Zone", "CUS-3").unwrap();
/// let info = provider.get_named_tz_offset_nanoseconds("custom/zone", 0).unwrap();
/// assert_eq!(info.offset.0, 3 * 3600);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleTableProvider {
    zones: Vec<(String, PosixTimeZone)>,
}

impl RuleTableProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a zone, validating the POSIX rule.
    pub fn insert(&mut self, identifier: &str, posix: &str) -> TimeZoneProviderResult<()> {
        let zone = PosixTimeZone::parse(posix)?;
        match self
            .zones
            .iter_mut()
            .find(|(id, _)| id.eq_ignore_ascii_case(identifier))
        {
            Some(entry) => *entry = (String::from(identifier), zone),
            None => self.zones.push((String::from(identifier), zone)),
        }
        Ok(())
    }

    fn entry(&self, identifier: &[u8]) -> Option<&(String, PosixTimeZone)> {
        self.zones
            .iter()
            .find(|(id, _)| id.as_bytes().eq_ignore_ascii_case(identifier))
    }

    fn zone(&self, identifier: &str) -> TimeZoneProviderResult<&PosixTimeZone> {
        self.entry(identifier.as_bytes())
            .map(|(_, zone)| zone)
            .ok_or(TimeZoneProviderError::Range(UNKNOWN_IDENTIFIER))
    }
}

impl TimeZoneProvider for RuleTableProvider {
    fn normalize_identifier(&self, ident: &'_ [u8]) -> TimeZoneProviderResult<Cow<'_, str>> {
        self.entry(ident)
            .map(|(id, _)| Cow::Borrowed(id.as_str()))
            .ok_or(TimeZoneProviderError::Range(UNKNOWN_IDENTIFIER))
    }

    fn get_named_tz_epoch_nanoseconds(
        &self,
        identifier: &str,
        local_datetime: IsoDateTime,
    ) -> TimeZoneProviderResult<CandidateEpochNanoseconds> {
        resolve_local(self.zone(identifier)?, local_datetime)
    }

    fn get_named_tz_offset_nanoseconds(
        &self,
        identifier: &str,
        epoch_nanoseconds: i128,
    ) -> TimeZoneProviderResult<TimeZoneTransitionInfo> {
        resolve_offset(self.zone(identifier)?, epoch_nanoseconds)
    }

    fn get_named_tz_transition(
        &self,
        identifier: &str,
        epoch_nanoseconds: i128,
        direction: TransitionDirection,
    ) -> TimeZoneProviderResult<Option<EpochNanoseconds>> {
        resolve_transition(self.zone(identifier)?, epoch_nanoseconds, direction)
    }
}

// ==== Shared resolution ====

fn resolve_local(
    zone: &impl ZoneRules,
    local_datetime: IsoDateTime,
) -> TimeZoneProviderResult<CandidateEpochNanoseconds> {
    let local = local_datetime.as_nanoseconds();
    Ok(zone.candidates(local.as_i128()))
}

fn resolve_offset(
    zone: &impl ZoneRules,
    epoch_nanoseconds: i128,
) -> TimeZoneProviderResult<TimeZoneTransitionInfo> {
    let epoch = EpochNanoseconds::from(epoch_nanoseconds);
    epoch.check_validity()?;
    Ok(zone.offset_at(epoch.floor_seconds()))
}

fn resolve_transition(
    zone: &impl ZoneRules,
    epoch_nanoseconds: i128,
    direction: TransitionDirection,
) -> TimeZoneProviderResult<Option<EpochNanoseconds>> {
    let epoch = EpochNanoseconds::from(epoch_nanoseconds);
    epoch.check_validity()?;
    let seconds = epoch.floor_seconds();
    // A sub-second instant sits after the whole second it floors to.
    let seconds = match direction {
        TransitionDirection::Previous if epoch_nanoseconds.rem_euclid(1_000_000_000) != 0 => {
            seconds + 1
        }
        _ => seconds,
    };
    let transition = zone
        .transition_from(seconds, direction)
        .map(EpochNanoseconds::from_seconds)
        .filter(|ns| ns.check_validity().is_ok());
    Ok(transition)
}
