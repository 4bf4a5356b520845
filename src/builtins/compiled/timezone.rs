use crate::{builtins::TZ_PROVIDER, TemporalResult, TimeZone};

impl TimeZone {
    /// Parses a time zone identifier.
    ///
    /// Enable with the `compiled_data` feature flag.
    pub fn try_from_identifier_str(source: &str) -> TemporalResult<Self> {
        Self::try_from_identifier_str_with_provider(source, TZ_PROVIDER)
    }

    /// Parses a time zone from an identifier or from any Temporal string
    /// that names one.
    ///
    /// Enable with the `compiled_data` feature flag.
    pub fn try_from_str(source: &str) -> TemporalResult<Self> {
        Self::try_from_str_with_provider(source, TZ_PROVIDER)
    }
}
