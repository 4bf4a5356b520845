//! Integer date equations shared by providers and `temporal_iso`.
//!
//! The epoch day conversions follow Howard Hinnant's [`days_from_civil`]
//! and `civil_from_days` algorithms over the proleptic Gregorian calendar,
//! computed in `i64` so the full Temporal year range is supported.
//!
//! [`days_from_civil`]: https://howardhinnant.github.io/date_algorithms.html

pub const MS_PER_HOUR: i64 = 3_600_000;
pub const MS_PER_MINUTE: i64 = 60_000;
pub const SECONDS_PER_DAY: i64 = 86_400;

const DAYS_IN_A_400Y_CYCLE: i64 = 146_097;
// Days from 0000-03-01 to 1970-01-01
const EPOCH_SHIFT: i64 = 719_468;

/// Returns whether `year` is a leap year in the proleptic Gregorian calendar.
#[inline]
pub const fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Returns the number of days in the year.
#[inline]
pub const fn iso_days_in_year(year: i32) -> u16 {
    if is_leap(year) {
        366
    } else {
        365
    }
}

/// Returns the number of days in `month` (1-based) of `year`.
pub const fn iso_days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap(year) => 29,
        _ => 28,
    }
}

/// Returns the number of days in the year preceding the zero-indexed `month`.
pub const fn month_to_day(month: u8, is_leap: bool) -> u16 {
    let leap_day = is_leap as u16;
    match month {
        0 => 0,
        1 => 31,
        2 => 59 + leap_day,
        3 => 90 + leap_day,
        4 => 120 + leap_day,
        5 => 151 + leap_day,
        6 => 181 + leap_day,
        7 => 212 + leap_day,
        8 => 243 + leap_day,
        9 => 273 + leap_day,
        10 => 304 + leap_day,
        _ => 334 + leap_day,
    }
}

/// Returns the days since the Unix epoch for the provided Gregorian date.
pub const fn epoch_days_from_gregorian_date(year: i32, month: u8, day: u8) -> i64 {
    let year = year as i64 - (month <= 2) as i64;
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let shifted_month = (month as i64 + 9) % 12;
    let day_of_year = (153 * shifted_month + 2) / 5 + day as i64 - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * DAYS_IN_A_400Y_CYCLE + day_of_era - EPOCH_SHIFT
}

/// Returns the Gregorian year, month and day for days since the Unix epoch.
pub const fn ymd_from_epoch_days(epoch_days: i64) -> (i32, u8, u8) {
    let shifted = epoch_days + EPOCH_SHIFT;
    let era = shifted.div_euclid(DAYS_IN_A_400Y_CYCLE);
    let day_of_era = shifted - era * DAYS_IN_A_400Y_CYCLE;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * shifted_month + 2) / 5 + 1;
    let month = if shifted_month < 10 {
        shifted_month + 3
    } else {
        shifted_month - 9
    };
    let year = year_of_era + era * 400 + (month <= 2) as i64;
    (year as i32, month as u8, day as u8)
}

/// Returns the epoch days of January 1st of `year`.
#[inline]
pub const fn epoch_days_for_year(year: i32) -> i64 {
    epoch_days_from_gregorian_date(year, 1, 1)
}

/// Returns the day of the week with Sunday as 0.
#[inline]
pub const fn epoch_days_to_day_of_week(epoch_days: i64) -> u8 {
    // 1970-01-01 was a Thursday
    (epoch_days + 4).rem_euclid(7) as u8
}

/// Returns the day of the week with Sunday as 0.
#[inline]
pub const fn epoch_seconds_to_day_of_week(seconds: i64) -> u8 {
    epoch_days_to_day_of_week(seconds.div_euclid(SECONDS_PER_DAY))
}

/// Returns the Gregorian year containing the epoch seconds.
#[inline]
pub const fn epoch_seconds_to_year(seconds: i64) -> i32 {
    ymd_from_epoch_days(seconds.div_euclid(SECONDS_PER_DAY)).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_days_round_trip() {
        assert_eq!(epoch_days_from_gregorian_date(1970, 1, 1), 0);
        assert_eq!(epoch_days_from_gregorian_date(2000, 3, 1), 11_017);
        assert_eq!(epoch_days_from_gregorian_date(1969, 12, 31), -1);
        assert_eq!(ymd_from_epoch_days(0), (1970, 1, 1));
        assert_eq!(ymd_from_epoch_days(-1), (1969, 12, 31));
        assert_eq!(ymd_from_epoch_days(11_016), (2000, 2, 29));

        for days in [-100_000_001i64, -719_468, -1, 0, 59, 10_000, 100_000_000] {
            let (y, m, d) = ymd_from_epoch_days(days);
            assert_eq!(epoch_days_from_gregorian_date(y, m, d), days);
        }
    }

    #[test]
    fn extreme_dates() {
        assert_eq!(ymd_from_epoch_days(-100_000_000), (-271_821, 4, 20));
        assert_eq!(ymd_from_epoch_days(100_000_000), (275_760, 9, 13));
    }

    #[test]
    fn leap_years() {
        assert!(is_leap(2000));
        assert!(!is_leap(1900));
        assert!(is_leap(2024));
        assert!(!is_leap(2023));
        assert_eq!(iso_days_in_month(2024, 2), 29);
        assert_eq!(iso_days_in_month(2023, 2), 28);
        assert_eq!(month_to_day(2, true), 60);
    }

    #[test]
    fn day_of_week() {
        // 1970-01-01 was a Thursday
        assert_eq!(epoch_days_to_day_of_week(0), 4);
        // 2024-03-10 was a Sunday
        assert_eq!(
            epoch_days_to_day_of_week(epoch_days_from_gregorian_date(2024, 3, 10)),
            0
        );
        assert_eq!(epoch_seconds_to_day_of_week(-1), 3);
    }
}
