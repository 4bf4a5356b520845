//! The `temporal_iso` crate is an implementation of the calendrical subsystem of
//! ECMAScript's Temporal built-in objects, restricted to the ISO 8601 calendar.
//!
//! ```rust
//! use temporal_iso::{options::ArithmeticOverflow, Duration, PlainDate};
//! use core::str::FromStr;
//!
//! let date = PlainDate::try_new_iso(2021, 1, 31).unwrap();
//! let one_month = Duration::from_str("P1M").unwrap();
//!
//! let constrained = date.add(&one_month, None).unwrap();
//! assert_eq!(constrained.to_string(), "2021-02-28");
//!
//! let rejected = date.add(&one_month, Some(ArithmeticOverflow::Reject));
//! assert!(rejected.is_err());
//! ```
//!
//! [`Temporal`][proposal] is the ECMAScript proposal that provides
//! new JS objects and functions for working with dates and times.
//!
//! [proposal]: https://github.com/tc39/proposal-temporal
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    // Currently throws a false positive regarding dependencies that are only used in tests.
    unused_crate_dependencies,
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::too_many_lines,
    clippy::cognitive_complexity,
    clippy::missing_errors_doc,
    clippy::let_unit_value,
    clippy::option_if_let_else,

    // It may be worth to look if we can fix the issues highlighted by these lints.
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap,

    // Add temporarily - Needs addressing
    clippy::missing_panics_doc,
)]

extern crate alloc;
extern crate core;

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod fields;
pub mod host;
pub mod iso;
pub mod options;
pub mod parsers;
pub mod primitive;
pub mod provider;

#[cfg(feature = "sys")]
mod sys;

mod builtins;

#[doc(hidden)]
pub(crate) mod rounding;
#[doc(hidden)]
pub(crate) mod utils;

use core::cmp::Ordering;

/// Re-export of `TinyAsciiStr` from `tinystr`.
pub use tinystr::TinyAsciiStr;

#[doc(inline)]
pub use error::TemporalError;

#[cfg(feature = "sys")]
pub use sys::{DefaultHostSystem, Temporal};

/// The `Temporal` result type
pub type TemporalResult<T> = Result<T, TemporalError>;

pub mod partial {
    //! Partial Date/Time component records.
    //!
    //! The partial records are `temporal_iso`'s typed replacement for the
    //! dynamic property bags of `with`-style updates.
    pub use crate::builtins::core::{
        PartialDate, PartialDateTime, PartialDuration, PartialTime, PartialZonedDateTime,
    };
}

pub mod time {
    //! Nanosecond instants on the epoch timeline.
    pub use timezone_provider::epoch_nanoseconds::EpochNanoseconds;
}

pub use crate::builtins::{
    calendar::{Calendar, MonthCode},
    core::timezone::{TimeZone, UtcOffset},
    DateDuration, Duration, Instant, Now, PlainDate, PlainDateTime, PlainMonthDay, PlainTime,
    PlainYearMonth, TimeDuration, ZonedDateTime,
};

/// A library specific trait for unwrapping assertions.
pub(crate) trait TemporalUnwrap {
    type Output;

    /// `temporal_iso` based assertion for unwrapping. This will panic in
    /// debug builds, but throws error during runtime.
    fn temporal_unwrap(self) -> TemporalResult<Self::Output>;
}

impl<T> TemporalUnwrap for Option<T> {
    type Output = T;

    fn temporal_unwrap(self) -> TemporalResult<Self::Output> {
        debug_assert!(self.is_some());
        self.ok_or(TemporalError::assert())
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! temporal_assert {
    ($condition:expr $(,)*) => {
        if !$condition {
            return Err(TemporalError::assert());
        }
    };
    ($condition:expr, $($args:tt)+) => {
        if !$condition {
            #[cfg(feature = "log")]
            log::error!($($args)+);
            return Err(TemporalError::assert());
        }
    };
}

/// A general Sign type.
#[repr(i8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Sign {
    #[default]
    Positive = 1,
    Zero = 0,
    Negative = -1,
}

impl From<i8> for Sign {
    fn from(value: i8) -> Self {
        match value.cmp(&0) {
            Ordering::Greater => Self::Positive,
            Ordering::Equal => Self::Zero,
            Ordering::Less => Self::Negative,
        }
    }
}

impl From<Ordering> for Sign {
    fn from(value: Ordering) -> Self {
        Self::from(value as i8)
    }
}

impl Sign {
    /// Coerces the current `Sign` to be either negative or positive.
    pub(crate) fn as_sign_multiplier(&self) -> i8 {
        if matches!(self, Self::Zero) {
            return 1;
        }
        *self as i8
    }
}

// Relevant numeric constants
/// Nanoseconds per day constant: 8.64e+13
pub const NS_PER_DAY: u64 = MS_PER_DAY as u64 * 1_000_000;
/// Milliseconds per day constant: 8.64e+7
pub const MS_PER_DAY: u32 = 24 * 60 * 60 * 1000;
/// Max Instant nanosecond constant
#[doc(hidden)]
pub(crate) const NS_MAX_INSTANT: i128 = NS_PER_DAY as i128 * 100_000_000i128;
/// Min Instant nanosecond constant
#[doc(hidden)]
pub(crate) const NS_MIN_INSTANT: i128 = -NS_MAX_INSTANT;

/// The upper bound on single-unit steps taken while balancing or rounding a
/// duration relative to an anchor date.
///
/// The supported ISO years span 547,582 years, which is under 29 million weeks;
/// no valid anchor can be moved by more single units than that.
pub(crate) const MAX_RELATIVE_ITERATIONS: u32 = 29_000_000;
