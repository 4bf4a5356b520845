//! POSIX time zone rules
//!
//! A POSIX TZ string describes a standard offset and an optional daylight
//! saving rule, for example `EST5EDT,M3.2.0,M11.1.0`. For more information,
//! see the [POSIX tz string docs](https://sourceware.org/glibc/manual/2.40/html_node/Proleptic-TZ.html).
//!
//! Offsets in a POSIX string are written west of Greenwich (`EST5` is five
//! hours *behind* UTC). Every offset stored on the parsed types is already
//! inverted to a [`UtcOffsetSeconds`], i.e. seconds east of UTC.

use core::str::FromStr;

use tinystr::TinyAsciiStr;

use crate::{
    epoch_nanoseconds::EpochNanoseconds,
    provider::{
        CandidateEpochNanoseconds, TimeZoneProviderResult, TimeZoneTransitionInfo,
        TransitionDirection, UtcOffsetSeconds,
    },
    utils, TimeZoneProviderError,
};

const DEFAULT_TRANSITION_TIME: i64 = 7200;
const MAX_OFFSET_HOURS: u32 = 24;
const MAX_TRANSITION_HOURS: u32 = 167;

/// A parsed POSIX time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosixTimeZone {
    /// Standard time.
    pub std: PosixZoneInfo,
    /// Daylight saving time, if the zone observes it.
    pub dst: Option<PosixDstInfo>,
}

/// An abbreviation and its offset from UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosixZoneInfo {
    pub abbr: TinyAsciiStr<8>,
    pub offset: UtcOffsetSeconds,
}

/// The daylight saving variant of a zone and the rule for when it applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosixDstInfo {
    pub abbr: TinyAsciiStr<8>,
    pub offset: UtcOffsetSeconds,
    /// Standard to daylight saving time, in local standard time.
    pub start: PosixTransitionDateTime,
    /// Daylight saving to standard time, in local daylight saving time.
    pub end: PosixTransitionDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosixTransitionDateTime {
    /// The date at which a transition should occur.
    pub date: PosixDate,
    /// The local time of day in seconds. May be negative or exceed a day.
    pub time: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosixDate {
    /// `Jn`: day 1..=365, February 29th is never counted.
    JulianNoLeap(u16),
    /// `n`: zero-based day 0..=365, February 29th is counted.
    JulianLeap(u16),
    /// `Mm.w.d`: day `d` (0 = Sunday) of week `w` (5 = last) of month `m`.
    MonthWeekDay { month: u8, week: u8, day: u8 },
}

// ==== Parsing ====

struct Cursor<'a> {
    source: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a [u8]) -> Self {
        Self { source, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<u8> {
        let value = self.peek();
        if value.is_some() {
            self.pos += 1;
        }
        value
    }

    fn check_and_advance(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn is_done(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn take_while(&mut self, predicate: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        while self.peek().is_some_and(&predicate) {
            self.pos += 1;
        }
        &self.source[start..self.pos]
    }
}

impl FromStr for PosixTimeZone {
    type Err = TimeZoneProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PosixTimeZone {
    /// Parses a POSIX TZ string.
    pub fn parse(source: &str) -> TimeZoneProviderResult<Self> {
        let mut cursor = Cursor::new(source.as_bytes());
        let std_abbr = parse_abbreviation(&mut cursor)?;
        let std_offset = UtcOffsetSeconds(-parse_time(&mut cursor, MAX_OFFSET_HOURS)?);
        let std = PosixZoneInfo {
            abbr: std_abbr,
            offset: std_offset,
        };

        if cursor.is_done() {
            return Ok(Self { std, dst: None });
        }

        let dst_abbr = parse_abbreviation(&mut cursor)?;
        let dst_offset = match cursor.peek() {
            Some(b'+' | b'-' | b'0'..=b'9') => {
                UtcOffsetSeconds(-parse_time(&mut cursor, MAX_OFFSET_HOURS)?)
            }
            // Daylight saving time defaults to one hour ahead of standard time.
            _ => UtcOffsetSeconds(std_offset.0 + 3600),
        };

        let (start, end) = if cursor.check_and_advance(b',') {
            let start = parse_transition(&mut cursor)?;
            if !cursor.check_and_advance(b',') {
                return Err(TimeZoneProviderError::Range(
                    "POSIX rule is missing its end transition.",
                ));
            }
            (start, parse_transition(&mut cursor)?)
        } else {
            // No rule: fall back to the current United States rule.
            (
                PosixTransitionDateTime {
                    date: PosixDate::MonthWeekDay {
                        month: 3,
                        week: 2,
                        day: 0,
                    },
                    time: DEFAULT_TRANSITION_TIME,
                },
                PosixTransitionDateTime {
                    date: PosixDate::MonthWeekDay {
                        month: 11,
                        week: 1,
                        day: 0,
                    },
                    time: DEFAULT_TRANSITION_TIME,
                },
            )
        };

        if !cursor.is_done() {
            return Err(TimeZoneProviderError::Range(
                "unexpected trailing characters in POSIX time zone.",
            ));
        }

        Ok(Self {
            std,
            dst: Some(PosixDstInfo {
                abbr: dst_abbr,
                offset: dst_offset,
                start,
                end,
            }),
        })
    }
}

fn parse_abbreviation(cursor: &mut Cursor<'_>) -> TimeZoneProviderResult<TinyAsciiStr<8>> {
    let abbr = if cursor.check_and_advance(b'<') {
        let abbr = cursor.take_while(|c| c.is_ascii_alphanumeric() || c == b'+' || c == b'-');
        if !cursor.check_and_advance(b'>') {
            return Err(TimeZoneProviderError::Range(
                "unterminated quoted POSIX abbreviation.",
            ));
        }
        abbr
    } else {
        cursor.take_while(|c| c.is_ascii_alphabetic())
    };
    if abbr.len() < 3 {
        return Err(TimeZoneProviderError::Range(
            "POSIX abbreviations must be at least three characters.",
        ));
    }
    TinyAsciiStr::try_from_utf8(abbr)
        .map_err(|_| TimeZoneProviderError::Range("POSIX abbreviation is too long."))
}

fn parse_number(cursor: &mut Cursor<'_>, max_digits: usize) -> TimeZoneProviderResult<u32> {
    let digits = cursor.take_while(|c| c.is_ascii_digit());
    if digits.is_empty() || digits.len() > max_digits {
        return Err(TimeZoneProviderError::Range(
            "invalid number in POSIX time zone.",
        ));
    }
    Ok(digits
        .iter()
        .fold(0u32, |acc, digit| acc * 10 + u32::from(digit - b'0')))
}

/// Parses `[+|-]hh[:mm[:ss]]` into signed seconds.
fn parse_time(cursor: &mut Cursor<'_>, max_hours: u32) -> TimeZoneProviderResult<i64> {
    let sign = match cursor.peek() {
        Some(b'-') => {
            cursor.next();
            -1
        }
        Some(b'+') => {
            cursor.next();
            1
        }
        _ => 1,
    };
    let hours = parse_number(cursor, 3)?;
    let mut minutes = 0;
    let mut seconds = 0;
    if cursor.check_and_advance(b':') {
        minutes = parse_number(cursor, 2)?;
        if cursor.check_and_advance(b':') {
            seconds = parse_number(cursor, 2)?;
        }
    }
    if hours > max_hours || minutes > 59 || seconds > 59 {
        return Err(TimeZoneProviderError::Range(
            "POSIX time is out of range.",
        ));
    }
    Ok(sign * i64::from(hours * 3600 + minutes * 60 + seconds))
}

fn parse_transition(cursor: &mut Cursor<'_>) -> TimeZoneProviderResult<PosixTransitionDateTime> {
    let date = match cursor.peek() {
        Some(b'J') => {
            cursor.next();
            let day = parse_number(cursor, 3)?;
            if !(1..=365).contains(&day) {
                return Err(TimeZoneProviderError::Range(
                    "Julian day must be within 1..=365.",
                ));
            }
            PosixDate::JulianNoLeap(day as u16)
        }
        Some(b'M') => {
            cursor.next();
            let month = parse_number(cursor, 2)?;
            if !cursor.check_and_advance(b'.') {
                return Err(TimeZoneProviderError::Range("malformed POSIX Mm.w.d rule."));
            }
            let week = parse_number(cursor, 1)?;
            if !cursor.check_and_advance(b'.') {
                return Err(TimeZoneProviderError::Range("malformed POSIX Mm.w.d rule."));
            }
            let day = parse_number(cursor, 1)?;
            if !(1..=12).contains(&month) || !(1..=5).contains(&week) || day > 6 {
                return Err(TimeZoneProviderError::Range(
                    "POSIX Mm.w.d rule is out of range.",
                ));
            }
            PosixDate::MonthWeekDay {
                month: month as u8,
                week: week as u8,
                day: day as u8,
            }
        }
        _ => {
            let day = parse_number(cursor, 3)?;
            if day > 365 {
                return Err(TimeZoneProviderError::Range(
                    "zero-based Julian day must be within 0..=365.",
                ));
            }
            PosixDate::JulianLeap(day as u16)
        }
    };
    let time = if cursor.check_and_advance(b'/') {
        parse_time(cursor, MAX_TRANSITION_HOURS)?
    } else {
        DEFAULT_TRANSITION_TIME
    };
    Ok(PosixTransitionDateTime { date, time })
}

// ==== Resolution ====

/// Returns the epoch seconds at which `transition` occurs in `year`, given
/// the offset in effect immediately before it.
fn calculate_transition_seconds_for_year(
    year: i32,
    transition: PosixTransitionDateTime,
    offset_before: UtcOffsetSeconds,
) -> i64 {
    let year_epoch_days = utils::epoch_days_for_year(year);
    let is_leap = utils::is_leap(year);

    // Zero-indexed day of the year of the transition date.
    let days = match transition.date {
        PosixDate::JulianNoLeap(day) => i64::from(day) - 1 + i64::from(is_leap && day > 59),
        PosixDate::JulianLeap(day) => i64::from(day),
        PosixDate::MonthWeekDay { month, week, day } => {
            let days_to_month = i64::from(utils::month_to_day(month - 1, is_leap));
            let days_in_month = i64::from(utils::iso_days_in_month(year, month));

            // Day of the week the month starts on.
            let day_offset =
                i64::from(utils::epoch_days_to_day_of_week(year_epoch_days + days_to_month));
            let (week, day) = (i64::from(week), i64::from(day));

            // If the month starts on or before the requested weekday, the first
            // occurrence is in week zero of the month; otherwise in week one.
            //
            // Note: this day_of_month is zero-indexed!
            let mut day_of_month = (week - i64::from(day_offset <= day)) * 7 + day - day_offset;

            // Week 5 means "last <weekday> of the month", which may spill
            // into the next month. One step back is always enough.
            if day_of_month + 1 > days_in_month {
                day_of_month -= 7;
            }

            days_to_month + day_of_month
        }
    };

    // The transition time is local, so remove the offset in effect to reach UTC.
    (year_epoch_days + days) * utils::SECONDS_PER_DAY + transition.time - offset_before.0
}

impl PosixDstInfo {
    /// The two transitions of `year` as `(epoch_seconds, offset_after)`.
    fn transitions_for_year(
        &self,
        std_offset: UtcOffsetSeconds,
        year: i32,
    ) -> [(i64, UtcOffsetSeconds); 2] {
        [
            (
                calculate_transition_seconds_for_year(year, self.start, std_offset),
                self.offset,
            ),
            (
                calculate_transition_seconds_for_year(year, self.end, self.offset),
                std_offset,
            ),
        ]
    }
}

impl PosixTimeZone {
    /// Transitions surrounding `epoch_seconds` in ascending order.
    fn transitions_around(
        &self,
        dst: &PosixDstInfo,
        epoch_seconds: i64,
    ) -> [(i64, UtcOffsetSeconds); 6] {
        let year = utils::epoch_seconds_to_year(epoch_seconds);
        let [a, b] = dst.transitions_for_year(self.std.offset, year - 1);
        let [c, d] = dst.transitions_for_year(self.std.offset, year);
        let [e, f] = dst.transitions_for_year(self.std.offset, year + 1);
        let mut transitions = [a, b, c, d, e, f];
        // Stable, so a year's end that meets the next year's start stays
        // ahead of it.
        transitions.sort_by_key(|(seconds, _)| *seconds);
        transitions
    }

    /// Resolves the offset in effect at `epoch_seconds`.
    pub fn resolve_for_epoch_seconds(&self, epoch_seconds: i64) -> TimeZoneTransitionInfo {
        let Some(dst) = &self.dst else {
            // Regardless of the time, there is one variant and we can return it.
            return TimeZoneTransitionInfo {
                transition_epoch: None,
                offset: self.std.offset,
            };
        };

        let transitions = self.transitions_around(dst, epoch_seconds);
        match transitions
            .iter()
            .rev()
            .find(|(seconds, _)| *seconds <= epoch_seconds)
        {
            Some((seconds, offset)) => TimeZoneTransitionInfo {
                transition_epoch: Some(*seconds),
                offset: *offset,
            },
            None => {
                // Before the first computed transition: the opposite of what it switches to.
                let offset = if transitions[0].1 == dst.offset {
                    self.std.offset
                } else {
                    dst.offset
                };
                TimeZoneTransitionInfo {
                    transition_epoch: None,
                    offset,
                }
            }
        }
    }

    /// Returns every epoch nanosecond value that reads as `local_nanoseconds`
    /// (the local date and time measured as if it were UTC).
    pub fn candidate_epoch_nanoseconds(&self, local_nanoseconds: i128) -> CandidateEpochNanoseconds {
        let Some(dst) = &self.dst else {
            return CandidateEpochNanoseconds::One(EpochNanoseconds(
                local_nanoseconds - self.std.offset.as_nanoseconds(),
            ));
        };

        let mut candidates = [None; 2];
        for (slot, offset) in candidates.iter_mut().zip([self.std.offset, dst.offset]) {
            let epoch = EpochNanoseconds(local_nanoseconds - offset.as_nanoseconds());
            if self.resolve_for_epoch_seconds(epoch.floor_seconds()).offset == offset {
                *slot = Some(epoch);
            }
        }

        match candidates {
            [Some(a), Some(b)] if a == b => CandidateEpochNanoseconds::One(a),
            [Some(a), Some(b)] => CandidateEpochNanoseconds::Two([a.min(b), a.max(b)]),
            [Some(one), None] | [None, Some(one)] => CandidateEpochNanoseconds::One(one),
            [None, None] => CandidateEpochNanoseconds::Zero,
        }
    }

    /// Returns the closest transition that changes the offset, strictly
    /// after (or before) `epoch_seconds`.
    pub fn transition(&self, epoch_seconds: i64, direction: TransitionDirection) -> Option<i64> {
        let dst = self.dst.as_ref()?;
        let transitions = self.transitions_around(dst, epoch_seconds);
        let changes_offset = |seconds: i64, offset: UtcOffsetSeconds| {
            self.resolve_for_epoch_seconds(seconds - 1).offset != offset
        };
        match direction {
            TransitionDirection::Next => transitions
                .iter()
                .find(|(seconds, offset)| *seconds > epoch_seconds && changes_offset(*seconds, *offset))
                .map(|(seconds, _)| *seconds),
            TransitionDirection::Previous => transitions
                .iter()
                .rev()
                .find(|(seconds, offset)| *seconds < epoch_seconds && changes_offset(*seconds, *offset))
                .map(|(seconds, _)| *seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::epoch_days_from_gregorian_date;

    const HOUR: i64 = 3600;

    fn local_seconds(year: i32, month: u8, day: u8, hour: i64, minute: i64) -> i64 {
        epoch_days_from_gregorian_date(year, month, day) * utils::SECONDS_PER_DAY
            + hour * HOUR
            + minute * 60
    }

    #[test]
    fn parse_new_york() {
        let tz = PosixTimeZone::parse("EST5EDT,M3.2.0,M11.1.0").unwrap();
        assert_eq!(tz.std.abbr.as_str(), "EST");
        assert_eq!(tz.std.offset, UtcOffsetSeconds(-5 * HOUR));
        let dst = tz.dst.unwrap();
        assert_eq!(dst.abbr.as_str(), "EDT");
        assert_eq!(dst.offset, UtcOffsetSeconds(-4 * HOUR));
        assert_eq!(
            dst.start.date,
            PosixDate::MonthWeekDay {
                month: 3,
                week: 2,
                day: 0
            }
        );
        assert_eq!(dst.end.time, 7200);
    }

    #[test]
    fn parse_variants() {
        let kolkata = PosixTimeZone::parse("IST-5:30").unwrap();
        assert_eq!(kolkata.std.offset, UtcOffsetSeconds(5 * HOUR + 1800));
        assert!(kolkata.dst.is_none());

        let quoted = PosixTimeZone::parse("<+0545>-5:45").unwrap();
        assert_eq!(quoted.std.abbr.as_str(), "+0545");

        let berlin = PosixTimeZone::parse("CET-1CEST,M3.5.0,M10.5.0/3").unwrap();
        assert_eq!(berlin.dst.unwrap().end.time, 3 * HOUR);

        let julian = PosixTimeZone::parse("XXX3YYY,J60/-1,100/25:30").unwrap();
        let dst = julian.dst.unwrap();
        assert_eq!(dst.start.date, PosixDate::JulianNoLeap(60));
        assert_eq!(dst.start.time, -HOUR);
        assert_eq!(dst.end.date, PosixDate::JulianLeap(100));
        assert_eq!(dst.end.time, 25 * HOUR + 1800);

        let default_rule = PosixTimeZone::parse("EST5EDT").unwrap();
        assert_eq!(default_rule.dst.unwrap().offset, UtcOffsetSeconds(-4 * HOUR));
    }

    #[test]
    fn parse_errors() {
        for invalid in [
            "",
            "E5",
            "EST",
            "EST25",
            "EST5EDT,M3.2.0",
            "EST5EDT,M13.2.0,M11.1.0",
            "EST5EDT,M3.6.0,M11.1.0",
            "EST5EDT,J0,J100",
            "<EST5",
            "EST5EDT,M3.2.0,M11.1.0x",
        ] {
            assert!(PosixTimeZone::parse(invalid).is_err(), "{invalid}");
        }
    }

    #[test]
    fn new_york_transitions_2024() {
        let tz = PosixTimeZone::parse("EST5EDT,M3.2.0,M11.1.0").unwrap();
        // 2024-03-10T07:00Z, 02:00 EST
        let spring = local_seconds(2024, 3, 10, 7, 0);
        // 2024-11-03T06:00Z, 02:00 EDT
        let fall = local_seconds(2024, 11, 3, 6, 0);

        assert_eq!(
            tz.resolve_for_epoch_seconds(spring - 1).offset,
            UtcOffsetSeconds(-5 * HOUR)
        );
        let info = tz.resolve_for_epoch_seconds(spring);
        assert_eq!(info.offset, UtcOffsetSeconds(-4 * HOUR));
        assert_eq!(info.transition_epoch, Some(spring));
        assert_eq!(
            tz.resolve_for_epoch_seconds(fall).offset,
            UtcOffsetSeconds(-5 * HOUR)
        );

        assert_eq!(
            tz.transition(spring - 10, TransitionDirection::Next),
            Some(spring)
        );
        assert_eq!(tz.transition(spring, TransitionDirection::Next), Some(fall));
        assert_eq!(
            tz.transition(fall, TransitionDirection::Previous),
            Some(spring)
        );
    }

    #[test]
    fn new_york_candidates() {
        let tz = PosixTimeZone::parse("EST5EDT,M3.2.0,M11.1.0").unwrap();
        let ns = |seconds: i64| i128::from(seconds) * 1_000_000_000;

        // Spring forward gap: 02:30 does not exist.
        let gap = tz.candidate_epoch_nanoseconds(ns(local_seconds(2024, 3, 10, 2, 30)));
        assert!(gap.is_empty());

        // Fall back overlap: 01:30 exists twice.
        let overlap = tz.candidate_epoch_nanoseconds(ns(local_seconds(2024, 11, 3, 1, 30)));
        assert_eq!(
            overlap,
            CandidateEpochNanoseconds::Two([
                EpochNanoseconds(ns(local_seconds(2024, 11, 3, 5, 30))),
                EpochNanoseconds(ns(local_seconds(2024, 11, 3, 6, 30))),
            ])
        );

        let summer = tz.candidate_epoch_nanoseconds(ns(local_seconds(2024, 7, 4, 12, 0)));
        assert_eq!(
            summer,
            CandidateEpochNanoseconds::One(EpochNanoseconds(ns(local_seconds(2024, 7, 4, 16, 0))))
        );
    }

    #[test]
    fn southern_hemisphere() {
        let tz = PosixTimeZone::parse("AEST-10AEDT,M10.1.0,M4.1.0/3").unwrap();
        assert_eq!(
            tz.resolve_for_epoch_seconds(local_seconds(2024, 1, 15, 0, 0))
                .offset,
            UtcOffsetSeconds(11 * HOUR)
        );
        assert_eq!(
            tz.resolve_for_epoch_seconds(local_seconds(2024, 6, 15, 0, 0))
                .offset,
            UtcOffsetSeconds(10 * HOUR)
        );
        // 2024-04-07T03:00 AEDT == 2024-04-06T16:00Z
        let end = local_seconds(2024, 4, 6, 16, 0);
        assert_eq!(
            tz.transition(local_seconds(2024, 1, 1, 0, 0), TransitionDirection::Next),
            Some(end)
        );
    }

    #[test]
    fn last_sunday_rules() {
        let tz = PosixTimeZone::parse("GMT0BST,M3.5.0/1,M10.5.0").unwrap();
        // 2024-03-31T01:00Z and 2024-10-27T01:00Z
        let start = local_seconds(2024, 3, 31, 1, 0);
        let end = local_seconds(2024, 10, 27, 1, 0);
        assert_eq!(tz.transition(start - 1, TransitionDirection::Next), Some(start));
        assert_eq!(tz.transition(start, TransitionDirection::Next), Some(end));
    }
}
