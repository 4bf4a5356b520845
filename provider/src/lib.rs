//! Data providers for time zone data
//!
//! This crate provides the [`TimeZoneProvider`](provider::TimeZoneProvider) trait that `temporal_iso`
//! uses to resolve named time zones, along with a rule based provider
//! built on POSIX TZ strings and, with the `tzif` feature, a provider over
//! the compiled IANA time zone database.
//!
#![cfg_attr(feature = "tzif", doc = "```rust")]
#![cfg_attr(not(feature = "tzif"), doc = "```rust,ignore")]
//! use timezone_provider::{provider::TimeZoneProvider, BUILTIN_PROVIDER};
//!
//! let id = BUILTIN_PROVIDER.normalize_identifier(b"america/new_york").unwrap();
//! assert_eq!(id, "America/New_York");
//! ```
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod error;

pub mod epoch_nanoseconds;
pub mod posix;
pub mod provider;
pub mod tzdb;
#[cfg(feature = "tzif")]
pub mod tzif;
pub mod utils;

pub use error::TimeZoneProviderError;
pub use tzdb::RuleTableProvider;
#[cfg(feature = "tzif")]
pub use tzdb::{BuiltinProvider, BUILTIN_PROVIDER};

#[cfg(all(test, feature = "tzif"))]
mod tests {
    use crate::provider::TimeZoneProvider;
    use crate::BUILTIN_PROVIDER;

    #[test]
    fn basic_normalization() {
        assert_eq!(
            BUILTIN_PROVIDER
                .normalize_identifier(b"America/CHICAGO")
                .unwrap(),
            "America/Chicago"
        );
        assert_eq!(BUILTIN_PROVIDER.normalize_identifier(b"uTc").unwrap(), "UTC");
        assert_eq!(
            BUILTIN_PROVIDER.normalize_identifier(b"eTC/uTc").unwrap(),
            "Etc/UTC"
        );
        assert_eq!(
            BUILTIN_PROVIDER.normalize_identifier(b"europe/kyiv").unwrap(),
            "Europe/Kyiv"
        );
        assert!(BUILTIN_PROVIDER
            .normalize_identifier(b"Mars/Olympus_Mons")
            .is_err());
    }
}
