use crate::{
    builtins::TZ_PROVIDER,
    options::{RelativeTo, RoundingOptions, TemporalUnit},
    Duration, TemporalResult,
};
use core::cmp::Ordering;


impl Duration {
    /// Adds two durations, balancing calendar units against `relative_to`.
    ///
    /// Enable with the `compiled_data` feature flag.
    pub fn add(&self, other: &Self, relative_to: Option<RelativeTo>) -> TemporalResult<Self> {
        self.add_with_provider(other, relative_to, TZ_PROVIDER)
    }

    /// Subtracts `other`, balancing calendar units against `relative_to`.
    ///
    /// Enable with the `compiled_data` feature flag.
    pub fn subtract(&self, other: &Self, relative_to: Option<RelativeTo>) -> TemporalResult<Self> {
        self.subtract_with_provider(other, relative_to, TZ_PROVIDER)
    }

    /// Rounds the `Duration` according to `options`.
    ///
    /// Enable with the `compiled_data` feature flag.
    pub fn round(
        &self,
        options: RoundingOptions,
        relative_to: Option<RelativeTo>,
    ) -> TemporalResult<Self> {
        self.round_with_provider(options, relative_to, TZ_PROVIDER)
    }

    /// Returns the total of the `Duration` in `unit`.
    ///
    /// Enable with the `compiled_data` feature flag.
    pub fn total(&self, unit: TemporalUnit, relative_to: Option<RelativeTo>) -> TemporalResult<f64> {
        self.total_with_provider(unit, relative_to, TZ_PROVIDER)
    }

    /// Compares two durations.
    ///
    /// Enable with the `compiled_data` feature flag.
    pub fn compare(&self, other: &Self, relative_to: Option<RelativeTo>) -> TemporalResult<Ordering> {
        self.compare_with_provider(other, relative_to, TZ_PROVIDER)
    }
}

impl RelativeTo {
    /// Parses a `relativeTo` string.
    ///
    /// Enable with the `compiled_data` feature flag.
    pub fn try_from_str(source: &str) -> TemporalResult<Self> {
        Self::try_from_str_with_provider(source, TZ_PROVIDER)
    }
}
