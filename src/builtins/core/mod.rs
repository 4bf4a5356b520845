//! The `Temporal` built-ins, implemented over the ISO 8601 calendar.
//!
//! Operations that touch a named time zone take a provider and carry a
//! `_with_provider` suffix.

pub mod calendar;
pub mod duration;
pub mod timezone;

mod date;
mod datetime;
mod instant;
mod month_day;
mod now;
mod time;
mod year_month;

pub(crate) mod zoneddatetime;

#[doc(inline)]
pub use date::{PartialDate, PlainDate};
#[doc(inline)]
pub use datetime::{PartialDateTime, PlainDateTime};
#[doc(inline)]
pub use duration::{DateDuration, Duration, PartialDuration, TimeDuration};
#[doc(inline)]
pub use instant::Instant;
#[doc(inline)]
pub use month_day::PlainMonthDay;
#[doc(inline)]
pub use now::Now;
#[doc(inline)]
pub use time::{PartialTime, PlainTime};
#[doc(inline)]
pub use year_month::PlainYearMonth;
#[doc(inline)]
pub use zoneddatetime::{PartialZonedDateTime, ZonedDateTime};
