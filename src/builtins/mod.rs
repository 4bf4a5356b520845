pub mod core;

#[cfg(feature = "compiled_data")]
mod compiled;

pub use core::*;

#[cfg(feature = "compiled_data")]
use crate::provider::{BuiltinProvider, BUILTIN_PROVIDER};

/// The provider behind the `compiled_data` convenience methods.
#[cfg(feature = "compiled_data")]
pub(crate) static TZ_PROVIDER: &BuiltinProvider = &BUILTIN_PROVIDER;
