//! The `TimeZoneProvider` trait and the providers shipped with `timezone_provider`.
//!
//! Named time zones are resolved through a [`TimeZoneProvider`]. Offset time
//! zones never consult a provider.

#[doc(inline)]
pub use timezone_provider::provider::{
    CandidateEpochNanoseconds, IsoDateTime as ProviderIsoDateTime, NeverProvider,
    ParseDirectionError, TimeZoneProvider, TimeZoneProviderResult, TimeZoneTransitionInfo,
    TransitionDirection, UtcOffsetSeconds,
};

#[doc(inline)]
pub use timezone_provider::{RuleTableProvider, TimeZoneProviderError};

#[cfg(any(test, feature = "tzdb"))]
#[doc(inline)]
pub use timezone_provider::{BuiltinProvider, BUILTIN_PROVIDER};
