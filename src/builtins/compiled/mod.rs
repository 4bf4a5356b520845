//! Convenience methods backed by the builtin time zone table.
//!
//! Every method here forwards to its `_with_provider` counterpart.

mod duration;
mod instant;
mod now;
mod plain;
mod timezone;
mod zoneddatetime;
