//! Utility date and time equations for Temporal

pub(crate) use timezone_provider::utils::{
    epoch_days_from_gregorian_date, is_leap, iso_days_in_month, iso_days_in_year, month_to_day,
    ymd_from_epoch_days,
};

/// The ISO day of the week for the given date, with Monday as 1 and Sunday as 7.
pub(crate) fn iso_day_of_week(year: i32, month: u8, day: u8) -> u16 {
    let epoch_days = epoch_days_from_gregorian_date(year, month, day);
    // 1970-01-01 was a Thursday.
    ((epoch_days + 3).rem_euclid(7) + 1) as u16
}

/// The one-based ordinal day of the year for the given date.
pub(crate) fn iso_day_of_year(year: i32, month: u8, day: u8) -> u16 {
    month_to_day(month - 1, is_leap(year)) + u16::from(day)
}

/// Returns the number of ISO weeks in `year`, either 52 or 53.
fn iso_weeks_in_year(year: i32) -> u16 {
    // A year has 53 weeks when it starts on a Thursday, or on a Wednesday in a leap year.
    let jan_first = iso_day_of_week(year, 1, 1);
    if jan_first == 4 || (jan_first == 3 && is_leap(year)) {
        53
    } else {
        52
    }
}

/// `ToISOWeekOfYear`: returns the ISO week number and the week-numbering year.
pub(crate) fn iso_week_of_year(year: i32, month: u8, day: u8) -> (u16, i32) {
    let day_of_year = i32::from(iso_day_of_year(year, month, day));
    let day_of_week = i32::from(iso_day_of_week(year, month, day));
    let week = (day_of_year - day_of_week + 10).div_euclid(7);

    if week < 1 {
        return (iso_weeks_in_year(year - 1), year - 1);
    }
    let week = week as u16;
    if week > iso_weeks_in_year(year) {
        return (1, year + 1);
    }
    (week, year)
}
