//! Error types for time zone providers.

use core::fmt;

/// An error that occurred while resolving time zone data.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeZoneProviderError {
    /// The requested instant is outside of the representable range.
    InstantOutOfRange,
    /// An internal invariant of the provider was broken.
    Assert(&'static str),
    /// A value was outside of the range the provider accepts.
    Range(&'static str),
}

impl fmt::Display for TimeZoneProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstantOutOfRange => f.write_str("instant out of range"),
            Self::Assert(msg) => write!(f, "provider assertion failed: {msg}"),
            Self::Range(msg) => f.write_str(msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TimeZoneProviderError {}
