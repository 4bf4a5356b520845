use alloc::string::ToString;
use core::{cmp::Ordering, str::FromStr};

use timezone_provider::BUILTIN_PROVIDER;

use crate::{
    builtins::core::PlainDate,
    options::{
        RelativeTo, RoundingOptions, TemporalRoundingMode, TemporalUnit, ToStringRoundingOptions,
    },
    parsers::Precision,
    partial::PartialDuration,
    error::{ErrorKind, ErrorMessage},
    primitive::FiniteF64,
    Sign, MAX_RELATIVE_ITERATIONS,
};

use super::{Duration, IterationGuard};

fn plain_relative_to(year: i32, month: u8, day: u8) -> Option<RelativeTo> {
    Some(RelativeTo::PlainDate(
        PlainDate::try_new_iso(year, month, day).unwrap(),
    ))
}

#[test]
fn partial_duration_empty() {
    let err = Duration::from_partial_duration(PartialDuration::default());
    assert!(err.is_err())
}

#[test]
fn partial_duration_values() {
    let mut partial = PartialDuration::default();
    let _ = partial.years.insert(FiniteF64(20.0));
    let result = Duration::from_partial_duration(partial).unwrap();
    assert_eq!(result.years(), 20.0);
}

#[test]
fn with_replaces_present_fields() {
    let duration = Duration::from_str("PT1H").unwrap();
    let partial = PartialDuration {
        minutes: Some(FiniteF64(30.0)),
        ..Default::default()
    };
    let result = duration.with(partial).unwrap();
    assert_eq!(result.hours(), 1.0);
    assert_eq!(result.minutes(), 30.0);

    let mixed = PartialDuration {
        minutes: Some(FiniteF64(-30.0)),
        ..Default::default()
    };
    assert!(duration.with(mixed).is_err());
}

#[test]
fn validation_rules() {
    assert!(Duration::new(1.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0).is_err());
    assert!(Duration::new(0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0).is_err());
    assert!(Duration::new(f64::INFINITY, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0).is_err());
    assert!(
        Duration::new(4_294_967_296.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0).is_err()
    );
    assert!(
        Duration::new(4_294_967_295.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0).is_ok()
    );
    // 2^53 seconds is the first value out of range.
    assert!(
        Duration::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 9_007_199_254_740_992.0, 0.0, 0.0, 0.0)
            .is_err()
    );
    assert!(
        Duration::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 9_007_199_254_740_991.0, 0.0, 0.0, 0.0)
            .is_ok()
    );
}

#[test]
fn sign_and_blank() {
    let duration = Duration::new(0.0, 0.0, 0.0, 0.0, 0.0, -5.0, 0.0, 0.0, 0.0, 0.0).unwrap();
    assert_eq!(duration.sign(), Sign::Negative);
    assert_eq!(duration.negated().sign(), Sign::Positive);
    assert_eq!(duration.abs().minutes(), 5.0);
    assert!(Duration::default().is_zero());
    assert!(!duration.is_zero());
}

#[test]
fn default_duration_string() {
    let duration = Duration::default();

    let options = ToStringRoundingOptions {
        precision: Precision::Auto,
        smallest_unit: None,
        rounding_mode: None,
    };
    let result = duration.as_temporal_string(options).unwrap();
    assert_eq!(&result, "PT0S");

    let options = ToStringRoundingOptions {
        precision: Precision::Digit(0),
        smallest_unit: None,
        rounding_mode: None,
    };
    let result = duration.as_temporal_string(options).unwrap();
    assert_eq!(&result, "PT0S");

    let options = ToStringRoundingOptions {
        precision: Precision::Digit(1),
        smallest_unit: None,
        rounding_mode: None,
    };
    let result = duration.as_temporal_string(options).unwrap();
    assert_eq!(&result, "PT0.0S");

    let options = ToStringRoundingOptions {
        precision: Precision::Digit(3),
        smallest_unit: None,
        rounding_mode: None,
    };
    let result = duration.as_temporal_string(options).unwrap();
    assert_eq!(&result, "PT0.000S");
}

#[test]
fn duration_to_string_auto_precision() {
    let duration = Duration::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 0.0, 0.0, 0.0).unwrap();
    let result = duration
        .as_temporal_string(ToStringRoundingOptions::default())
        .unwrap();
    assert_eq!(&result, "P1Y2M3W4DT5H6M7S");

    let duration = Duration::new(0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 500.0, 0.0, 0.0).unwrap();
    assert_eq!(duration.to_string(), "P1DT0.5S");

    let duration = Duration::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0).unwrap();
    assert_eq!(duration.to_string(), "-PT0.000000001S");
}

#[test]
fn subsecond_fields_are_carried_into_seconds() {
    let duration = Duration::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1_500.0, 0.0, 0.0).unwrap();
    assert_eq!(duration.to_string(), "PT2.5S");
}

#[test]
fn duration_to_string_rounding() {
    let duration = Duration::from_str("PT1.987S").unwrap();
    let options = ToStringRoundingOptions {
        precision: Precision::Digit(2),
        smallest_unit: None,
        rounding_mode: None,
    };
    assert_eq!(&duration.as_temporal_string(options).unwrap(), "PT1.98S");

    let options = ToStringRoundingOptions {
        precision: Precision::Auto,
        smallest_unit: Some(TemporalUnit::Second),
        rounding_mode: Some(TemporalRoundingMode::HalfExpand),
    };
    assert_eq!(&duration.as_temporal_string(options).unwrap(), "PT2S");

    let duration = Duration::from_str("PT59.9S").unwrap();
    assert_eq!(&duration.as_temporal_string(options).unwrap(), "PT60S");

    let options = ToStringRoundingOptions {
        precision: Precision::Auto,
        smallest_unit: Some(TemporalUnit::Minute),
        rounding_mode: None,
    };
    assert!(duration.as_temporal_string(options).is_err());
}

#[test]
fn parse_duration_strings() {
    let duration = Duration::from_str("P1Y2M3W4DT5H6M7.123456789S").unwrap();
    assert_eq!(duration.years(), 1.0);
    assert_eq!(duration.weeks(), 3.0);
    assert_eq!(duration.seconds(), 7.0);
    assert_eq!(duration.milliseconds(), 123.0);
    assert_eq!(duration.microseconds(), 456.0);
    assert_eq!(duration.nanoseconds(), 789.0);

    let duration = Duration::from_str("PT1.5H").unwrap();
    assert_eq!(duration.hours(), 1.0);
    assert_eq!(duration.minutes(), 30.0);
    assert_eq!(duration.to_string(), "PT1H30M");

    // 0.03125 hours is 112.5 seconds.
    let duration = Duration::from_str("PT1.03125H").unwrap();
    assert_eq!(duration.minutes(), 1.0);
    assert_eq!(duration.seconds(), 52.0);
    assert_eq!(duration.milliseconds(), 500.0);

    let duration = Duration::from_str("-P1D").unwrap();
    assert_eq!(duration.days(), -1.0);
    assert_eq!(duration.sign(), Sign::Negative);

    assert!(Duration::from_str("P").is_err());
    assert!(Duration::from_str("PT").is_err());
    assert!(Duration::from_str("P1.5Y").is_err());
}

#[test]
fn add_without_relative_to() {
    let one = Duration::from_str("PT1H").unwrap();
    let two = Duration::from_str("PT30M").unwrap();
    let result = one.add_with_provider(&two, None, &BUILTIN_PROVIDER).unwrap();
    assert_eq!(result.hours(), 1.0);
    assert_eq!(result.minutes(), 30.0);

    let one = Duration::from_str("P1D").unwrap();
    let two = Duration::from_str("PT25H").unwrap();
    let result = one.add_with_provider(&two, None, &BUILTIN_PROVIDER).unwrap();
    assert_eq!(result.days(), 2.0);
    assert_eq!(result.hours(), 1.0);

    let result = one
        .subtract_with_provider(&two, None, &BUILTIN_PROVIDER)
        .unwrap();
    assert_eq!(result.days(), 0.0);
    assert_eq!(result.hours(), -1.0);

    let years = Duration::from_str("P1Y").unwrap();
    assert!(years.add_with_provider(&two, None, &BUILTIN_PROVIDER).is_err());
}

#[test]
fn add_relative_to_plain_date() {
    let one = Duration::from_str("P1M").unwrap();
    let result = one
        .add_with_provider(&one, plain_relative_to(2020, 1, 1), &BUILTIN_PROVIDER)
        .unwrap();
    assert_eq!(result.months(), 2.0);
    assert_eq!(result.days(), 0.0);

    let days = Duration::from_str("P31D").unwrap();
    let result = one
        .add_with_provider(&days, plain_relative_to(2020, 1, 1), &BUILTIN_PROVIDER)
        .unwrap();
    // 2020-01-01 + P1M + P31D is 2020-03-03.
    assert_eq!(result.months(), 2.0);
    assert_eq!(result.days(), 2.0);
}

#[test]
fn round_time_units() {
    let duration = Duration::from_str("PT1H30M").unwrap();
    let result = duration
        .round_with_provider(
            RoundingOptions::with_smallest_unit(TemporalUnit::Hour),
            None,
            &BUILTIN_PROVIDER,
        )
        .unwrap();
    assert_eq!(result.hours(), 2.0);
    assert_eq!(result.minutes(), 0.0);

    let result = duration
        .negated()
        .round_with_provider(
            RoundingOptions::with_smallest_unit(TemporalUnit::Hour),
            None,
            &BUILTIN_PROVIDER,
        )
        .unwrap();
    assert_eq!(result.hours(), -2.0);

    let options = RoundingOptions {
        largest_unit: Some(TemporalUnit::Day),
        ..Default::default()
    };
    let duration = Duration::from_str("PT36H").unwrap();
    let result = duration
        .round_with_provider(options, None, &BUILTIN_PROVIDER)
        .unwrap();
    assert_eq!(result.days(), 1.0);
    assert_eq!(result.hours(), 12.0);
}

#[test]
fn round_requires_relative_to_for_calendar_units() {
    let duration = Duration::from_str("P1M").unwrap();
    let options = RoundingOptions::with_smallest_unit(TemporalUnit::Day);
    assert!(duration
        .round_with_provider(options, None, &BUILTIN_PROVIDER)
        .is_err());

    let options = RoundingOptions {
        largest_unit: Some(TemporalUnit::Year),
        ..Default::default()
    };
    let days = Duration::from_str("P400D").unwrap();
    assert!(days.round_with_provider(options, None, &BUILTIN_PROVIDER).is_err());
}

#[test]
fn round_relative_to_plain_date() {
    let options = RoundingOptions {
        largest_unit: Some(TemporalUnit::Day),
        ..Default::default()
    };
    let duration = Duration::from_str("P1Y").unwrap();
    let result = duration
        .round_with_provider(options, plain_relative_to(2020, 1, 1), &BUILTIN_PROVIDER)
        .unwrap();
    assert_eq!(result.years(), 0.0);
    assert_eq!(result.days(), 366.0);

    let options = RoundingOptions {
        largest_unit: Some(TemporalUnit::Year),
        ..Default::default()
    };
    let duration = Duration::from_str("P400D").unwrap();
    let result = duration
        .round_with_provider(options, plain_relative_to(2020, 1, 1), &BUILTIN_PROVIDER)
        .unwrap();
    assert_eq!(result.years(), 1.0);
    assert_eq!(result.months(), 1.0);
    assert_eq!(result.days(), 3.0);
}

#[test]
fn total_units() {
    let duration = Duration::from_str("PT1H30M").unwrap();
    let total = duration
        .total_with_provider(TemporalUnit::Minute, None, &BUILTIN_PROVIDER)
        .unwrap();
    assert_eq!(total, 90.0);
    let total = duration
        .total_with_provider(TemporalUnit::Hour, None, &BUILTIN_PROVIDER)
        .unwrap();
    assert_eq!(total, 1.5);

    let duration = Duration::from_str("P1D").unwrap();
    let total = duration
        .total_with_provider(TemporalUnit::Hour, None, &BUILTIN_PROVIDER)
        .unwrap();
    assert_eq!(total, 24.0);

    let duration = Duration::from_str("P1M").unwrap();
    let total = duration
        .total_with_provider(TemporalUnit::Day, plain_relative_to(2020, 2, 1), &BUILTIN_PROVIDER)
        .unwrap();
    assert_eq!(total, 29.0);
    assert!(duration
        .total_with_provider(TemporalUnit::Day, None, &BUILTIN_PROVIDER)
        .is_err());

    let duration = Duration::from_str("P1Y").unwrap();
    let total = duration
        .total_with_provider(
            TemporalUnit::Month,
            plain_relative_to(2020, 1, 1),
            &BUILTIN_PROVIDER,
        )
        .unwrap();
    assert_eq!(total, 12.0);
}

#[test]
fn compare_durations() {
    let one = Duration::from_str("PT1H").unwrap();
    let two = Duration::from_str("PT60M").unwrap();
    assert_eq!(
        one.compare_with_provider(&two, None, &BUILTIN_PROVIDER)
            .unwrap(),
        Ordering::Equal
    );

    let three = Duration::from_str("PT61M").unwrap();
    assert_eq!(
        one.compare_with_provider(&three, None, &BUILTIN_PROVIDER)
            .unwrap(),
        Ordering::Less
    );

    let month = Duration::from_str("P1M").unwrap();
    let days = Duration::from_str("P30D").unwrap();
    assert!(month
        .compare_with_provider(&days, None, &BUILTIN_PROVIDER)
        .is_err());
    // February 2020 has 29 days.
    assert_eq!(
        month
            .compare_with_provider(&days, plain_relative_to(2020, 2, 1), &BUILTIN_PROVIDER)
            .unwrap(),
        Ordering::Less
    );
    assert_eq!(
        month
            .compare_with_provider(&days, plain_relative_to(2020, 1, 1), &BUILTIN_PROVIDER)
            .unwrap(),
        Ordering::Greater
    );
}

#[test]
fn iteration_guard_limit() {
    let mut guard = IterationGuard::default();
    for _ in 0..1_000 {
        assert!(guard.tick().is_ok());
    }

    let mut guard = IterationGuard(MAX_RELATIVE_ITERATIONS - 1);
    assert!(guard.tick().is_ok());
    let err = guard.tick().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
    assert_eq!(err.message(), ErrorMessage::RelativeIterationLimit.to_str());
    // Stays failed once the limit is passed.
    assert!(guard.tick().is_err());
}
