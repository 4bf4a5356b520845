//! Parsing of RFC 9557 / ISO 8601 strings into Temporal records, and the
//! `Writeable` formatters that serialize Temporal values back into strings.

use crate::{
    builtins::core::calendar::Calendar,
    error::ErrorMessage,
    iso::{IsoDate, IsoTime},
    options::{DisplayCalendar, DisplayOffset, DisplayTimeZone},
    Sign, TemporalError, TemporalResult,
};
use alloc::format;
use ixdtf::{
    encoding::Utf8,
    parsers::IxdtfParser,
    records::{Annotation, DateRecord, IxdtfParseRecord, TimeRecord, UtcOffsetRecordOrZ},
    ParseError,
};
use writeable::{impl_display_with_writeable, LengthHint, Writeable};

mod timezone;

pub(crate) use timezone::{
    parse_allowed_timezone_formats, parse_identifier, parse_offset, timezone_from_record,
};

// ==== Formatting ====

/// The precision used when writing the seconds of a time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precision {
    /// Seconds are always written; trailing zeros of the fraction are trimmed.
    #[default]
    Auto,
    /// Seconds are omitted.
    Minute,
    /// Seconds are written with exactly this many fractional digits.
    Digit(u8),
}

/// Incrementally assembles an RFC 9557 string.
#[derive(Debug, Default)]
pub struct IxdtfStringBuilder<'a> {
    inner: FormattableIxdtf<'a>,
}

impl<'a> IxdtfStringBuilder<'a> {
    pub fn with_date(mut self, iso: IsoDate) -> Self {
        self.inner.date = Some(FormattableDate(iso.year, iso.month, iso.day));
        self
    }

    pub fn with_time(mut self, time: IsoTime, precision: Precision) -> Self {
        self.inner.time = Some(FormattableTime::from_iso(time, precision));
        self
    }

    /// Writes a `±HH:MM` offset unless `show` is `never`.
    pub fn with_minute_offset(
        mut self,
        sign: Sign,
        hour: u8,
        minute: u8,
        show: DisplayOffset,
    ) -> Self {
        if show == DisplayOffset::Never {
            return self;
        }
        self.inner.utc_offset = Some(FormattableUtcOffset::Offset(FormattableOffset {
            sign,
            time: FormattableTime {
                hour,
                minute,
                precision: Precision::Minute,
                include_sep: true,
                ..Default::default()
            },
        }));
        self
    }

    /// Writes the `Z` designator unless `show` is `never`.
    pub fn with_z(mut self, show: DisplayOffset) -> Self {
        if show != DisplayOffset::Never {
            self.inner.utc_offset = Some(FormattableUtcOffset::Z);
        }
        self
    }

    pub fn with_timezone(mut self, timezone: &'a str, show: DisplayTimeZone) -> Self {
        self.inner.timezone = match show {
            DisplayTimeZone::Never => None,
            show => Some(FormattableTimeZone {
                critical: show == DisplayTimeZone::Critical,
                timezone,
            }),
        };
        self
    }

    pub fn with_calendar(mut self, calendar: &'static str, show: DisplayCalendar) -> Self {
        self.inner.calendar = Some(FormattableCalendar { show, calendar });
        self
    }

    pub fn build(self) -> alloc::string::String {
        self.inner.write_to_string().into_owned()
    }
}

impl Writeable for IxdtfStringBuilder<'_> {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        self.inner.write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        self.inner.writeable_length_hint()
    }
}

/// `hh:mm[:ss[.fffffffff]]`
#[derive(Debug, Default, Clone, Copy)]
pub struct FormattableTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
    pub precision: Precision,
    pub include_sep: bool,
}

impl FormattableTime {
    fn from_iso(time: IsoTime, precision: Precision) -> Self {
        Self {
            hour: time.hour,
            minute: time.minute,
            second: time.second,
            nanosecond: u32::from(time.millisecond) * 1_000_000
                + u32::from(time.microsecond) * 1_000
                + u32::from(time.nanosecond),
            precision,
            include_sep: true,
        }
    }

    fn writes_fraction(&self) -> bool {
        match self.precision {
            Precision::Auto => self.nanosecond != 0,
            Precision::Minute | Precision::Digit(0) => false,
            Precision::Digit(_) => true,
        }
    }
}

impl Writeable for FormattableTime {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        write_padded_u8(self.hour, sink)?;
        write_time_separator(self.include_sep, sink)?;
        write_padded_u8(self.minute, sink)?;
        if self.precision == Precision::Minute {
            return Ok(());
        }
        write_time_separator(self.include_sep, sink)?;
        write_padded_u8(self.second, sink)?;
        if self.writes_fraction() {
            sink.write_char('.')?;
            write_nanosecond(self.nanosecond, self.precision, sink)?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let separators = usize::from(self.include_sep);
        if self.precision == Precision::Minute {
            return LengthHint::exact(4 + separators);
        }
        let whole_seconds = 6 + 2 * separators;
        match self.precision {
            _ if !self.writes_fraction() => LengthHint::exact(whole_seconds),
            Precision::Digit(digits) => LengthHint::exact(whole_seconds + 1 + usize::from(digits)),
            _ => LengthHint::between(whole_seconds + 2, whole_seconds + 10),
        }
    }
}

fn write_time_separator<W: core::fmt::Write + ?Sized>(
    include: bool,
    sink: &mut W,
) -> core::fmt::Result {
    if include {
        sink.write_char(':')?;
    }
    Ok(())
}

/// A signed UTC offset, `±hh:mm[:ss[.fffffffff]]`.
#[derive(Debug, Clone, Copy)]
pub struct FormattableOffset {
    pub sign: Sign,
    pub time: FormattableTime,
}

impl Writeable for FormattableOffset {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        sink.write_char(if self.sign == Sign::Negative { '-' } else { '+' })?;
        self.time.write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        self.time.writeable_length_hint() + 1
    }
}

/// The offset portion of a date-time string.
#[derive(Debug, Clone, Copy)]
pub enum FormattableUtcOffset {
    Z,
    Offset(FormattableOffset),
}

impl Writeable for FormattableUtcOffset {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        match self {
            Self::Z => sink.write_char('Z'),
            Self::Offset(offset) => offset.write_to(sink),
        }
    }

    fn writeable_length_hint(&self) -> LengthHint {
        match self {
            Self::Z => LengthHint::exact(1),
            Self::Offset(offset) => offset.writeable_length_hint(),
        }
    }
}

/// `YYYY-MM-DD`, with the year extended to `±YYYYYY` outside of `0..=9999`.
#[derive(Debug, Clone, Copy)]
pub struct FormattableDate(pub i32, pub u8, pub u8);

impl Writeable for FormattableDate {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        write_year(self.0, sink)?;
        sink.write_char('-')?;
        write_padded_u8(self.1, sink)?;
        sink.write_char('-')?;
        write_padded_u8(self.2, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::exact(year_length(self.0) + 6)
    }
}

/// The `[time-zone]` annotation.
#[derive(Debug, Clone, Copy)]
pub struct FormattableTimeZone<'a> {
    pub critical: bool,
    pub timezone: &'a str,
}

impl Writeable for FormattableTimeZone<'_> {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        sink.write_str(if self.critical { "[!" } else { "[" })?;
        sink.write_str(self.timezone)?;
        sink.write_char(']')
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::exact(2 + usize::from(self.critical) + self.timezone.len())
    }
}

/// The `[u-ca=calendar]` annotation.
#[derive(Debug, Clone, Copy)]
pub struct FormattableCalendar<'a> {
    pub show: DisplayCalendar,
    pub calendar: &'a str,
}

impl FormattableCalendar<'_> {
    fn is_hidden(&self) -> bool {
        match self.show {
            DisplayCalendar::Never => true,
            DisplayCalendar::Auto => self.calendar == Calendar::Iso.identifier(),
            _ => false,
        }
    }

    /// Whether the reference year or day of a partial date must be written.
    fn requires_reference_fields(&self) -> bool {
        matches!(self.show, DisplayCalendar::Always | DisplayCalendar::Critical)
            || self.calendar != Calendar::Iso.identifier()
    }
}

impl Writeable for FormattableCalendar<'_> {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        if self.is_hidden() {
            return Ok(());
        }
        let open = if self.show == DisplayCalendar::Critical {
            "[!u-ca="
        } else {
            "[u-ca="
        };
        sink.write_str(open)?;
        sink.write_str(self.calendar)?;
        sink.write_char(']')
    }

    fn writeable_length_hint(&self) -> LengthHint {
        if self.is_hidden() {
            return LengthHint::exact(0);
        }
        let critical = usize::from(self.show == DisplayCalendar::Critical);
        LengthHint::exact(7 + critical + self.calendar.len())
    }
}

/// Which projection of a date a [`FormattablePartialDate`] writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialDateKind {
    /// `YYYY-MM`, plus the reference day when required.
    YearMonth,
    /// `MM-DD`, prefixed by the reference year when required.
    MonthDay,
}

/// The string form of a `PlainYearMonth` or a `PlainMonthDay`.
#[derive(Debug, Clone, Copy)]
pub struct FormattablePartialDate<'a> {
    pub kind: PartialDateKind,
    pub date: FormattableDate,
    pub calendar: FormattableCalendar<'a>,
}

impl Writeable for FormattablePartialDate<'_> {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        let FormattableDate(year, month, day) = self.date;
        match (self.kind, self.calendar.requires_reference_fields()) {
            (_, true) => self.date.write_to(sink)?,
            (PartialDateKind::YearMonth, false) => {
                write_year(year, sink)?;
                sink.write_char('-')?;
                write_padded_u8(month, sink)?;
            }
            (PartialDateKind::MonthDay, false) => {
                write_padded_u8(month, sink)?;
                sink.write_char('-')?;
                write_padded_u8(day, sink)?;
            }
        }
        self.calendar.write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let date = match (self.kind, self.calendar.requires_reference_fields()) {
            (_, true) => self.date.writeable_length_hint(),
            (PartialDateKind::YearMonth, false) => LengthHint::exact(year_length(self.date.0) + 3),
            (PartialDateKind::MonthDay, false) => LengthHint::exact(5),
        };
        date + self.calendar.writeable_length_hint()
    }
}

/// A full RFC 9557 string: any combination of date, time, offset and annotations.
#[derive(Debug, Default)]
pub struct FormattableIxdtf<'a> {
    pub date: Option<FormattableDate>,
    pub time: Option<FormattableTime>,
    pub utc_offset: Option<FormattableUtcOffset>,
    pub timezone: Option<FormattableTimeZone<'a>>,
    pub calendar: Option<FormattableCalendar<'a>>,
}

impl Writeable for FormattableIxdtf<'_> {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        if let Some(date) = &self.date {
            date.write_to(sink)?;
        }
        if let Some(time) = &self.time {
            if self.date.is_some() {
                sink.write_char('T')?;
            }
            time.write_to(sink)?;
        }
        if let Some(offset) = &self.utc_offset {
            offset.write_to(sink)?;
        }
        if let Some(timezone) = &self.timezone {
            timezone.write_to(sink)?;
        }
        if let Some(calendar) = &self.calendar {
            calendar.write_to(sink)?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        fn hint<T: Writeable>(part: &Option<T>) -> LengthHint {
            part.as_ref()
                .map_or(LengthHint::exact(0), |part| part.writeable_length_hint())
        }
        let designator = usize::from(self.date.is_some() && self.time.is_some());
        hint(&self.date)
            + designator
            + hint(&self.time)
            + hint(&self.utc_offset)
            + hint(&self.timezone)
            + hint(&self.calendar)
    }
}

/// The absolute date fields of a duration string.
#[derive(Debug, Clone, Copy)]
pub struct FormattableDateDuration {
    pub years: u32,
    pub months: u32,
    pub weeks: u32,
    pub days: u64,
}

/// The absolute time fields of a duration string. Subsecond units are
/// always folded into the seconds.
#[derive(Debug, Clone, Copy)]
pub struct FormattableTimeDuration {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub subseconds: u32,
}

/// `±PnYnMnWnDTnHnMn.fS`
#[derive(Debug, Clone, Copy)]
pub struct FormattableDuration {
    pub precision: Precision,
    pub sign: Sign,
    /// `None` when every date field is zero.
    pub date: Option<FormattableDateDuration>,
    pub time: FormattableTimeDuration,
}

impl FormattableDuration {
    fn writes_seconds(&self) -> bool {
        let FormattableTimeDuration {
            hours,
            minutes,
            seconds,
            subseconds,
        } = self.time;
        let zero_minutes_and_higher = self.date.is_none() && hours == 0 && minutes == 0;
        seconds != 0
            || subseconds != 0
            || zero_minutes_and_higher
            || self.precision != Precision::Auto
    }
}

impl Writeable for FormattableDuration {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        if self.sign == Sign::Negative {
            sink.write_char('-')?;
        }
        sink.write_char('P')?;
        if let Some(date) = self.date {
            write_nonzero_with_suffix(u64::from(date.years), 'Y', sink)?;
            write_nonzero_with_suffix(u64::from(date.months), 'M', sink)?;
            write_nonzero_with_suffix(u64::from(date.weeks), 'W', sink)?;
            write_nonzero_with_suffix(date.days, 'D', sink)?;
        }

        let time = self.time;
        let writes_seconds = self.writes_seconds();
        if time.hours == 0 && time.minutes == 0 && !writes_seconds {
            return Ok(());
        }
        sink.write_char('T')?;
        write_nonzero_with_suffix(time.hours, 'H', sink)?;
        write_nonzero_with_suffix(time.minutes, 'M', sink)?;
        if writes_seconds {
            time.seconds.write_to(sink)?;
            let fraction = match self.precision {
                Precision::Auto => time.subseconds != 0,
                Precision::Digit(digits) => digits != 0,
                Precision::Minute => false,
            };
            if fraction {
                sink.write_char('.')?;
                write_nanosecond(time.subseconds, self.precision, sink)?;
            }
            sink.write_char('S')?;
        }
        Ok(())
    }
}

impl_display_with_writeable!(FormattableIxdtf<'_>);
impl_display_with_writeable!(FormattablePartialDate<'_>);
impl_display_with_writeable!(FormattableDuration);
impl_display_with_writeable!(FormattableDate);
impl_display_with_writeable!(FormattableTime);
impl_display_with_writeable!(FormattableOffset);
impl_display_with_writeable!(FormattableUtcOffset);
impl_display_with_writeable!(FormattableTimeZone<'_>);
impl_display_with_writeable!(FormattableCalendar<'_>);

fn write_nonzero_with_suffix<W: core::fmt::Write + ?Sized>(
    value: u64,
    suffix: char,
    sink: &mut W,
) -> core::fmt::Result {
    if value != 0 {
        value.write_to(sink)?;
        sink.write_char(suffix)?;
    }
    Ok(())
}

fn write_padded_u8<W: core::fmt::Write + ?Sized>(num: u8, sink: &mut W) -> core::fmt::Result {
    if num < 10 {
        sink.write_char('0')?;
    }
    num.write_to(sink)
}

/// Writes the nine fractional digits of `nanoseconds`, cut to `precision`.
/// `Auto` trims the trailing zeros.
fn write_nanosecond<W: core::fmt::Write + ?Sized>(
    nanoseconds: u32,
    precision: Precision,
    sink: &mut W,
) -> core::fmt::Result {
    let (digits, significant) = u32_to_digits(nanoseconds);
    let count = match precision {
        Precision::Digit(digit) if digit <= 9 => usize::from(digit),
        _ => significant,
    };
    write_digits(&digits[..count], sink)
}

/// Splits `value` into nine zero-padded decimal digits, returning the digits
/// and the number of digits up to the last non-zero one.
pub fn u32_to_digits(mut value: u32) -> ([u8; 9], usize) {
    let mut digits = [0; 9];
    let mut significant = 0;
    for index in (0..9).rev() {
        let digit = (value % 10) as u8;
        value /= 10;
        if significant == 0 && digit != 0 {
            significant = index + 1;
        }
        digits[index] = digit;
    }
    (digits, significant)
}

fn write_digits<W: core::fmt::Write + ?Sized>(digits: &[u8], sink: &mut W) -> core::fmt::Result {
    digits.iter().try_for_each(|digit| digit.write_to(sink))
}

fn year_length(year: i32) -> usize {
    if (0..=9999).contains(&year) {
        4
    } else {
        7
    }
}

fn write_year<W: core::fmt::Write + ?Sized>(year: i32, sink: &mut W) -> core::fmt::Result {
    let (digits, _) = u32_to_digits(year.unsigned_abs());
    if (0..=9999).contains(&year) {
        return write_digits(&digits[5..], sink);
    }
    sink.write_char(if year < 0 { '-' } else { '+' })?;
    write_digits(&digits[3..], sink)
}

// ==== Parsing ====

/// The grammar an input string is parsed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseVariant {
    DateTime,
    YearMonth,
    MonthDay,
    Time,
}

fn syntax_error(err: ParseError) -> TemporalError {
    TemporalError::range().with_message(format!("invalid RFC 9557 string: {err}"))
}

/// Parses `source` with the `ixdtf` parser for `variant`, collecting the
/// calendar annotation.
///
/// Only the first `u-ca` annotation is kept. A repeated calendar annotation
/// is an error if either occurrence is critical.
fn parse_ixdtf<'a>(
    source: &'a [u8],
    variant: ParseVariant,
) -> TemporalResult<IxdtfParseRecord<'a, Utf8>> {
    let mut calendar: Option<Annotation<'a, Utf8>> = None;
    let mut duplicate_critical_calendar = false;

    let handler = |annotation: Annotation<'a, Utf8>| {
        if annotation.key != b"u-ca" {
            // Unknown annotations are validated by the parser.
            return Some(annotation);
        }
        match &calendar {
            Some(first) => {
                duplicate_critical_calendar |= first.critical || annotation.critical;
            }
            None => calendar = Some(annotation),
        }
        None
    };

    let mut parser = IxdtfParser::from_utf8(source);
    let mut record = match variant {
        ParseVariant::DateTime => parser.parse_with_annotation_handler(handler),
        ParseVariant::YearMonth => parser.parse_year_month_with_annotation_handler(handler),
        ParseVariant::MonthDay => parser.parse_month_day_with_annotation_handler(handler),
        ParseVariant::Time => parser.parse_time_with_annotation_handler(handler),
    }
    .map_err(syntax_error)?;

    if duplicate_critical_calendar {
        return Err(TemporalError::range()
            .with_message("a critical calendar annotation may not be repeated."));
    }

    if variant != ParseVariant::Time && record.date.is_none() {
        return Err(TemporalError::range().with_enum(ErrorMessage::ParserNeedsDate));
    }

    record.calendar = calendar.map(|annotation| annotation.value);
    Ok(record)
}

/// Rejects a `Z` designator, which only exact types may carry.
fn reject_utc_designator(
    record: IxdtfParseRecord<'_, Utf8>,
) -> TemporalResult<IxdtfParseRecord<'_, Utf8>> {
    if record.offset == Some(UtcOffsetRecordOrZ::Z) {
        return Err(TemporalError::range().with_enum(ErrorMessage::ParserUtcDesignator));
    }
    Ok(record)
}

/// Parses a `TemporalDateTimeString[~Zoned]`.
pub(crate) fn parse_date_time(source: &[u8]) -> TemporalResult<IxdtfParseRecord<'_, Utf8>> {
    parse_ixdtf(source, ParseVariant::DateTime).and_then(reject_utc_designator)
}

/// Parses a `TemporalDateTimeString[+Zoned]`, which requires a time zone annotation.
pub(crate) fn parse_zoned_date_time(source: &[u8]) -> TemporalResult<IxdtfParseRecord<'_, Utf8>> {
    let record = parse_ixdtf(source, ParseVariant::DateTime)?;
    if record.tz.is_none() {
        return Err(TemporalError::range()
            .with_message("a time zone annotation is required to parse a ZonedDateTime."));
    }
    Ok(record)
}

/// The parts of a `TemporalInstantString`, all of which are required.
pub(crate) struct IxdtfParseInstantRecord {
    pub(crate) date: DateRecord,
    pub(crate) time: TimeRecord,
    pub(crate) offset: UtcOffsetRecordOrZ,
}

/// Parses a `TemporalInstantString`.
pub(crate) fn parse_instant(source: &[u8]) -> TemporalResult<IxdtfParseInstantRecord> {
    let record = parse_ixdtf(source, ParseVariant::DateTime)?;
    match (record.date, record.time, record.offset) {
        (Some(date), Some(time), Some(offset)) => Ok(IxdtfParseInstantRecord { date, time, offset }),
        (_, None, _) => Err(TemporalError::range().with_enum(ErrorMessage::ParserNeedsTime)),
        _ => Err(TemporalError::range()
            .with_message("an Instant string requires a UTC offset or the Z designator.")),
    }
}

/// Parses `source` with `variant`, falling back to a full date-time string.
///
/// The error of the `variant` grammar is reported when both fail.
fn parse_with_date_time_fallback(
    source: &[u8],
    variant: ParseVariant,
) -> TemporalResult<IxdtfParseRecord<'_, Utf8>> {
    match parse_ixdtf(source, variant) {
        Ok(record) => reject_utc_designator(record),
        Err(err) => parse_date_time(source).map_err(|_| err),
    }
}

/// Parses a `TemporalYearMonthString`.
pub(crate) fn parse_year_month(source: &[u8]) -> TemporalResult<IxdtfParseRecord<'_, Utf8>> {
    parse_with_date_time_fallback(source, ParseVariant::YearMonth)
}

/// Parses a `TemporalMonthDayString`, accepting both `--MM-DD` and `MM-DD`.
pub(crate) fn parse_month_day(source: &[u8]) -> TemporalResult<IxdtfParseRecord<'_, Utf8>> {
    parse_with_date_time_fallback(source, ParseVariant::MonthDay)
}

/// Parses a `TemporalTimeString`. A date-time string is accepted as long as
/// it has a time component.
pub(crate) fn parse_time(source: &[u8]) -> TemporalResult<TimeRecord> {
    parse_with_date_time_fallback(source, ParseVariant::Time)?
        .time
        .ok_or(TemporalError::range().with_enum(ErrorMessage::ParserNeedsTime))
}

/// Returns the calendar annotation of `s` if `s` is any Temporal string.
/// An empty slice is returned for a string without a calendar annotation,
/// and `None` when `s` is not a Temporal string at all.
#[inline]
pub fn parse_allowed_calendar_formats(s: &str) -> Option<&[u8]> {
    [
        ParseVariant::DateTime,
        ParseVariant::Time,
        ParseVariant::YearMonth,
        ParseVariant::MonthDay,
    ]
    .into_iter()
    .find_map(|variant| parse_ixdtf(s.as_bytes(), variant).ok())
    .map(|record| record.calendar.unwrap_or(&[]))
}

/// Converts a parsed date into an `IsoDate`. The date is checked against the
/// calendar but not against the representable range, which depends on the
/// type being constructed.
pub(crate) fn iso_date_from_record(record: DateRecord) -> TemporalResult<IsoDate> {
    let date = IsoDate::new_unchecked(record.year, record.month, record.day);
    if !date.is_valid() {
        return Err(TemporalError::range().with_message("parsed date is not a valid ISO date."));
    }
    Ok(date)
}

/// Converts a parsed time into an `IsoTime`, mapping a leap second to `:59`.
pub(crate) fn iso_time_from_record(record: TimeRecord) -> TemporalResult<IsoTime> {
    let fraction = record
        .fraction
        .and_then(|fraction| fraction.to_nanoseconds())
        .unwrap_or(0);
    IsoTime::from_components(record.hour, record.minute, record.second, fraction)
}

/// Resolves the calendar annotation of a parsed string, defaulting to ISO.
pub(crate) fn calendar_from_record(calendar: Option<&[u8]>) -> TemporalResult<Calendar> {
    calendar.map_or(Ok(Calendar::default()), Calendar::from_utf8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use writeable::assert_writeable_eq;

    fn time(hour: u8, minute: u8, second: u8, nanosecond: u32, precision: Precision) -> FormattableTime {
        FormattableTime {
            hour,
            minute,
            second,
            nanosecond,
            precision,
            include_sep: true,
        }
    }

    #[test]
    fn time_precision() {
        assert_writeable_eq!(time(9, 5, 7, 0, Precision::Auto), "09:05:07");
        assert_writeable_eq!(time(9, 5, 7, 120_000_000, Precision::Auto), "09:05:07.12");
        assert_writeable_eq!(time(9, 5, 7, 120_000_000, Precision::Digit(5)), "09:05:07.12000");
        assert_writeable_eq!(time(9, 5, 7, 120_000_000, Precision::Digit(0)), "09:05:07");
        assert_writeable_eq!(time(9, 5, 7, 120_000_000, Precision::Minute), "09:05");
        assert_writeable_eq!(time(23, 59, 59, 999_999_999, Precision::Auto), "23:59:59.999999999");
    }

    #[test]
    fn offsets() {
        let offset = FormattableOffset {
            sign: Sign::Negative,
            time: time(5, 30, 0, 0, Precision::Minute),
        };
        assert_writeable_eq!(offset, "-05:30");
        let offset = FormattableOffset {
            sign: Sign::Zero,
            time: time(0, 0, 0, 0, Precision::Minute),
        };
        assert_writeable_eq!(offset, "+00:00");
    }

    #[test]
    fn extended_years() {
        assert_writeable_eq!(FormattableDate(2024, 2, 9), "2024-02-09");
        assert_writeable_eq!(FormattableDate(12, 11, 30), "0012-11-30");
        assert_writeable_eq!(FormattableDate(-1, 1, 1), "-000001-01-01");
        assert_writeable_eq!(FormattableDate(10_000, 1, 1), "+010000-01-01");
        assert_writeable_eq!(FormattableDate(-271_821, 4, 19), "-271821-04-19");
    }

    #[test]
    fn partial_dates() {
        let iso = FormattableCalendar {
            show: DisplayCalendar::Auto,
            calendar: "iso8601",
        };
        let year_month = FormattablePartialDate {
            kind: PartialDateKind::YearMonth,
            date: FormattableDate(2024, 3, 1),
            calendar: iso,
        };
        assert_writeable_eq!(year_month, "2024-03");
        let month_day = FormattablePartialDate {
            kind: PartialDateKind::MonthDay,
            date: FormattableDate(1972, 2, 29),
            calendar: iso,
        };
        assert_writeable_eq!(month_day, "02-29");

        let always = FormattableCalendar {
            show: DisplayCalendar::Always,
            calendar: "iso8601",
        };
        let month_day = FormattablePartialDate {
            calendar: always,
            ..month_day
        };
        assert_writeable_eq!(month_day, "1972-02-29[u-ca=iso8601]");
        let critical = FormattableCalendar {
            show: DisplayCalendar::Critical,
            calendar: "iso8601",
        };
        let year_month = FormattablePartialDate {
            calendar: critical,
            ..year_month
        };
        assert_writeable_eq!(year_month, "2024-03-01[!u-ca=iso8601]");
    }

    #[test]
    fn builder() {
        let string = IxdtfStringBuilder::default()
            .with_date(IsoDate::new_unchecked(2024, 3, 10))
            .with_time(IsoTime::new_unchecked(2, 30, 0, 5, 0, 0), Precision::Auto)
            .with_minute_offset(Sign::Negative, 5, 0, DisplayOffset::Auto)
            .with_timezone("America/New_York", DisplayTimeZone::Auto)
            .with_calendar("iso8601", DisplayCalendar::Auto)
            .build();
        assert_eq!(string, "2024-03-10T02:30:00.005-05:00[America/New_York]");

        let string = IxdtfStringBuilder::default()
            .with_date(IsoDate::new_unchecked(1970, 1, 1))
            .with_time(IsoTime::default(), Precision::Minute)
            .with_z(DisplayOffset::Never)
            .with_timezone("UTC", DisplayTimeZone::Critical)
            .with_calendar("iso8601", DisplayCalendar::Always)
            .build();
        assert_eq!(string, "1970-01-01T00:00[!UTC][u-ca=iso8601]");
    }

    fn duration(
        date: Option<(u32, u32, u32, u64)>,
        time: (u64, u64, u64, u32),
        precision: Precision,
    ) -> FormattableDuration {
        FormattableDuration {
            precision,
            sign: Sign::Positive,
            date: date.map(|(years, months, weeks, days)| FormattableDateDuration {
                years,
                months,
                weeks,
                days,
            }),
            time: FormattableTimeDuration {
                hours: time.0,
                minutes: time.1,
                seconds: time.2,
                subseconds: time.3,
            },
        }
    }

    #[test]
    fn durations() {
        assert_writeable_eq!(duration(None, (0, 0, 0, 0), Precision::Auto), "PT0S");
        assert_writeable_eq!(duration(Some((1, 0, 0, 3)), (0, 0, 0, 0), Precision::Auto), "P1Y3D");
        assert_writeable_eq!(duration(Some((0, 0, 2, 0)), (4, 0, 0, 0), Precision::Auto), "P2WT4H");
        assert_writeable_eq!(duration(None, (0, 30, 0, 0), Precision::Auto), "PT30M");
        assert_writeable_eq!(duration(None, (0, 0, 1, 500_000_000), Precision::Auto), "PT1.5S");
        assert_writeable_eq!(duration(None, (0, 30, 0, 0), Precision::Digit(2)), "PT30M0.00S");
        assert_writeable_eq!(duration(None, (1, 0, 5, 0), Precision::Digit(0)), "PT1H5S");

        let negative = FormattableDuration {
            sign: Sign::Negative,
            ..duration(Some((0, 1, 0, 0)), (0, 0, 0, 0), Precision::Auto)
        };
        assert_eq!(negative.to_string(), "-P1M");
    }

    #[test]
    fn date_time_strings() {
        let record = parse_date_time(b"2024-03-10T02:30:00.123[u-ca=iso8601]").unwrap();
        let date = iso_date_from_record(record.date.unwrap()).unwrap();
        assert_eq!((date.year, date.month, date.day), (2024, 3, 10));
        let time = iso_time_from_record(record.time.unwrap()).unwrap();
        assert_eq!((time.hour, time.minute, time.millisecond), (2, 30, 123));
        assert_eq!(calendar_from_record(record.calendar).unwrap(), Calendar::Iso);

        assert!(parse_date_time(b"2024-03-10T02:30:00Z").is_err());
        assert!(parse_date_time(b"T02:30").is_err());
        assert!(parse_date_time(b"2024-13-10").is_err());
        assert!(calendar_from_record(Some(b"gregory")).is_err());
    }

    #[test]
    fn leap_second_is_constrained() {
        let time = iso_time_from_record(parse_time(b"23:59:60").unwrap()).unwrap();
        assert_eq!((time.hour, time.minute, time.second), (23, 59, 59));
    }

    #[test]
    fn calendar_annotations() {
        assert!(parse_date_time(b"2024-01-01[u-ca=iso8601][u-ca=iso8601]").is_ok());
        assert!(parse_date_time(b"2024-01-01[!u-ca=iso8601][u-ca=iso8601]").is_err());
        assert!(parse_date_time(b"2024-01-01[u-ca=iso8601][!u-ca=iso8601]").is_err());
        assert!(parse_date_time(b"2024-01-01[!foo=bar]").is_err());
        assert!(parse_date_time(b"2024-01-01[foo=bar]").is_ok());

        assert_eq!(
            parse_allowed_calendar_formats("2024-01-01[u-ca=iso8601]"),
            Some(&b"iso8601"[..])
        );
        assert_eq!(parse_allowed_calendar_formats("T10:00"), Some(&[][..]));
        assert_eq!(parse_allowed_calendar_formats("iso8601"), None);
    }

    #[test]
    fn zoned_and_instant_strings() {
        assert!(parse_zoned_date_time(b"2024-03-10T02:30:00-05:00[America/New_York]").is_ok());
        assert!(parse_zoned_date_time(b"2024-03-10T02:30:00-05:00").is_err());

        let instant = parse_instant(b"1970-01-01T00:00Z").unwrap();
        assert!(matches!(instant.offset, UtcOffsetRecordOrZ::Z));
        assert!(parse_instant(b"1970-01-01T00:00").is_err());
        assert!(parse_instant(b"1970-01-01Z").is_err());
    }

    #[test]
    fn partial_date_strings() {
        let record = parse_year_month(b"2024-03").unwrap();
        let date = record.date.unwrap();
        assert_eq!((date.year, date.month), (2024, 3));
        assert!(parse_year_month(b"2024-03-15T10:00").is_ok());
        assert!(parse_year_month(b"2024-03-15T10:00Z").is_err());

        for source in ["--03-15", "03-15", "2024-03-15"] {
            let date = parse_month_day(source.as_bytes()).unwrap().date.unwrap();
            assert_eq!((date.month, date.day), (3, 15));
        }
        assert!(parse_month_day(b"02-30").is_err());
    }

    #[test]
    fn time_strings() {
        let time = parse_time(b"T12:30").unwrap();
        assert_eq!((time.hour, time.minute, time.second), (12, 30, 0));
        let time = parse_time(b"2024-01-01T08:15:30.5").unwrap();
        assert_eq!(iso_time_from_record(time).unwrap().millisecond, 500);
        assert!(parse_time(b"2024-01-01").is_err());
        assert!(parse_time(b"12:30Z").is_err());
    }
}
