//! # ISO 8601 / RFC 9557 Text Grammar
//!
//! Byte-level parsers shared by every kind. Each parser works over a
//! [`Cursor`] and yields a [`Fault`], which the kind-specific entry point
//! binds to its [`Kind`] and the original input via [`Fault::at`].
//!
//! ## Grammar
//!
//! ```text
//! DateTime    := Date ( ('T' | 't' | ' ') Time Offset? )? Annotation*
//! Date        := Year '-'? MM '-'? DD          (separators used consistently)
//! Year        := DDDD | ('+' | '-') DDDDDD     ('-000000' rejected)
//! Time        := HH ( ':'? MM ( ':'? SS Fraction? )? )?
//! Fraction    := ('.' | ',') D{1,9}
//! Offset      := 'Z' | 'z' | ('+' | '-') HH ( ':'? MM ( ':'? SS )? )?
//! Annotation  := '[' '!'? ( ZoneId | Key '=' Value ) ']'
//! ```
//!
//! Calendar validation happens while parsing: a syntactically valid
//! `2021-02-31` fails with a range fault, not a syntax fault.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use crate::error::ParseError;
use crate::kind::Kind;

/// Leap year used to validate month-day pairs, so `02-29` is accepted.
pub const REFERENCE_LEAP_YEAR: i32 = 1972;

/// A parser failure that has not yet been bound to a kind and input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Fault {
    Syntax,
    Range(&'static str),
    MissingTime,
    MissingOffset,
    MissingZone,
    UnknownZone(String),
    OffsetMismatch { offset: String, zone: String },
    UtcDesignator,
    Calendar(String),
}

impl Fault {
    /// Bind the fault to the kind being parsed and the rejected text.
    pub(crate) fn at(self, kind: Kind, input: &str) -> ParseError {
        let input = input.to_string();
        match self {
            Self::Syntax => ParseError::Malformed { kind, input },
            Self::Range(component) => ParseError::OutOfRange { kind, input, component },
            Self::MissingTime => ParseError::MissingTime { kind, input },
            Self::MissingOffset => ParseError::MissingOffset { kind, input },
            Self::MissingZone => ParseError::MissingTimeZone { kind, input },
            Self::UnknownZone(zone) => ParseError::UnknownTimeZone { kind, input, zone },
            Self::OffsetMismatch { offset, zone } => {
                ParseError::OffsetMismatch { kind, input, offset, zone }
            }
            Self::UtcDesignator => ParseError::UtcDesignator { kind, input },
            Self::Calendar(calendar) => ParseError::UnsupportedCalendar { kind, input, calendar },
        }
    }
}

pub(crate) type Parsed<T> = Result<T, Fault>;

/// A UTC offset as written in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Offset {
    /// The `Z` designator: an exact time with no local offset implied.
    Utc,
    /// A numeric offset in seconds east of UTC.
    Fixed(i32),
}

/// Everything a date-time string can carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DateTimeRecord {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub offset: Option<Offset>,
    pub zone: Option<String>,
}

impl DateTimeRecord {
    /// Plain kinds ignore offsets but reject the `Z` designator.
    pub(crate) fn plain(self) -> Parsed<Self> {
        if self.offset == Some(Offset::Utc) {
            return Err(Fault::UtcDesignator);
        }
        Ok(self)
    }
}

// ─── Cursor ──────────────────────────────────────────────────────────

pub(crate) struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    pub(crate) fn peek_digit(&self) -> bool {
        self.peek().is_some_and(|b| b.is_ascii_digit())
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub(crate) fn advance(&mut self) {
        self.pos += 1;
    }

    pub(crate) fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume exactly `n` ASCII digits.
    pub(crate) fn digits(&mut self, n: usize) -> Parsed<u32> {
        let slice = self
            .bytes
            .get(self.pos..self.pos + n)
            .ok_or(Fault::Syntax)?;
        let mut value = 0u32;
        for b in slice {
            if !b.is_ascii_digit() {
                return Err(Fault::Syntax);
            }
            value = value * 10 + u32::from(b - b'0');
        }
        self.pos += n;
        Ok(value)
    }

    pub(crate) fn expect_end(&self) -> Parsed<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(Fault::Syntax)
        }
    }
}

// ─── Calendar arithmetic ─────────────────────────────────────────────

/// Proleptic Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-based) of `year`; 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Validate a year/month/day triple and build the date.
pub(crate) fn calendar_date(year: i32, month: u32, day: u32) -> Parsed<NaiveDate> {
    if !(1..=12).contains(&month) {
        return Err(Fault::Range("month"));
    }
    if day == 0 || day > days_in_month(year, month) {
        return Err(Fault::Range("day"));
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or(Fault::Range("year"))
}

// ─── Components ──────────────────────────────────────────────────────

fn year(c: &mut Cursor<'_>) -> Parsed<i32> {
    match c.peek() {
        Some(sign @ (b'+' | b'-')) => {
            c.advance();
            let magnitude = c.digits(6)? as i32;
            if sign == b'-' {
                if magnitude == 0 {
                    return Err(Fault::Range("year"));
                }
                Ok(-magnitude)
            } else {
                Ok(magnitude)
            }
        }
        _ => Ok(c.digits(4)? as i32),
    }
}

fn date(c: &mut Cursor<'_>) -> Parsed<NaiveDate> {
    let year = year(c)?;
    let extended = c.eat(b'-');
    let month = c.digits(2)?;
    if extended && !c.eat(b'-') {
        return Err(Fault::Syntax);
    }
    let day = c.digits(2)?;
    calendar_date(year, month, day)
}

fn fraction(c: &mut Cursor<'_>) -> Parsed<Option<u32>> {
    if !(c.eat(b'.') || c.eat(b',')) {
        return Ok(None);
    }
    let mut nanos = 0u32;
    let mut count = 0u32;
    while let Some(b) = c.peek().filter(u8::is_ascii_digit) {
        if count == 9 {
            return Err(Fault::Syntax);
        }
        nanos = nanos * 10 + u32::from(b - b'0');
        count += 1;
        c.advance();
    }
    if count == 0 {
        return Err(Fault::Syntax);
    }
    Ok(Some(nanos * 10u32.pow(9 - count)))
}

fn time(c: &mut Cursor<'_>) -> Parsed<NaiveTime> {
    let hour = c.digits(2)?;
    let (mut minute, mut second, mut nanos) = (0, 0, 0);
    let extended = c.eat(b':');
    if extended || c.peek_digit() {
        minute = c.digits(2)?;
        let has_seconds = if extended { c.eat(b':') } else { c.peek_digit() };
        if has_seconds {
            second = c.digits(2)?;
            nanos = fraction(c)?.unwrap_or(0);
        }
    }
    if hour > 23 {
        return Err(Fault::Range("hour"));
    }
    if minute > 59 {
        return Err(Fault::Range("minute"));
    }
    if second > 60 {
        return Err(Fault::Range("second"));
    }
    // Leap seconds are constrained to the last second of the minute.
    let second = second.min(59);
    NaiveTime::from_hms_nano_opt(hour, minute, second, nanos).ok_or(Fault::Range("time"))
}

/// Parse `±HH[:MM[:SS]]` or `±HHMM[SS]` into seconds east of UTC.
pub(crate) fn numeric_offset(c: &mut Cursor<'_>) -> Parsed<i32> {
    let sign = if c.eat(b'-') {
        -1
    } else if c.eat(b'+') {
        1
    } else {
        return Err(Fault::Syntax);
    };
    let hours = c.digits(2)?;
    let (mut minutes, mut seconds) = (0, 0);
    let extended = c.eat(b':');
    if extended || c.peek_digit() {
        minutes = c.digits(2)?;
        let has_seconds = if extended { c.eat(b':') } else { c.peek_digit() };
        if has_seconds {
            seconds = c.digits(2)?;
        }
    }
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(Fault::Range("offset"));
    }
    Ok(sign * (hours * 3600 + minutes * 60 + seconds) as i32)
}

fn offset(c: &mut Cursor<'_>) -> Parsed<Option<Offset>> {
    match c.peek() {
        Some(b'Z' | b'z') => {
            c.advance();
            Ok(Some(Offset::Utc))
        }
        Some(b'+' | b'-') => Ok(Some(Offset::Fixed(numeric_offset(c)?))),
        _ => Ok(None),
    }
}

/// Parse bracketed annotations, returning the time zone identifier if any.
///
/// The zone annotation, when present, must come first. Calendar
/// annotations must name the ISO 8601 calendar. Unknown keys are ignored
/// unless flagged critical.
fn annotations(c: &mut Cursor<'_>) -> Parsed<Option<String>> {
    let mut zone = None;
    let mut seen_keyed = false;
    while c.eat(b'[') {
        let critical = c.eat(b'!');
        let start = c.pos;
        while let Some(b) = c.peek() {
            if b == b']' {
                break;
            }
            if b == b'[' {
                return Err(Fault::Syntax);
            }
            c.advance();
        }
        let end = c.pos;
        if !c.eat(b']') || end == start {
            return Err(Fault::Syntax);
        }
        let body = std::str::from_utf8(&c.bytes[start..end]).map_err(|_| Fault::Syntax)?;
        match body.split_once('=') {
            Some((key, value)) => {
                seen_keyed = true;
                if key.is_empty()
                    || value.is_empty()
                    || key.bytes().any(|b| b.is_ascii_uppercase())
                {
                    return Err(Fault::Syntax);
                }
                if key == "u-ca" {
                    if !value.eq_ignore_ascii_case("iso8601") {
                        return Err(Fault::Calendar(value.to_string()));
                    }
                } else if critical {
                    return Err(Fault::Syntax);
                }
            }
            None => {
                if zone.is_some() || seen_keyed {
                    return Err(Fault::Syntax);
                }
                zone = Some(body.to_string());
            }
        }
    }
    Ok(zone)
}

// ─── Entry points ────────────────────────────────────────────────────

/// Parse a full date-time string: date, optional time, offset, annotations.
pub(crate) fn date_time(text: &str) -> Parsed<DateTimeRecord> {
    let mut c = Cursor::new(text);
    let date = date(&mut c)?;
    let time = if matches!(c.peek(), Some(b'T' | b't' | b' ')) {
        c.advance();
        Some(time(&mut c)?)
    } else {
        None
    };
    let offset = if time.is_some() { offset(&mut c)? } else { None };
    let zone = annotations(&mut c)?;
    c.expect_end()?;
    Ok(DateTimeRecord {
        date,
        time,
        offset,
        zone,
    })
}

/// Whether the text should be read as a bare time of day.
///
/// Extended times (`HH:MM…`) are unambiguous. Basic-format times must
/// carry a leading `T` since `1214` could also be a month-day.
pub(crate) fn looks_like_time(text: &str) -> bool {
    let c = Cursor::new(text);
    matches!(c.peek(), Some(b'T' | b't')) || c.peek_at(2) == Some(b':')
}

/// Parse a bare time of day, optionally prefixed by `T`.
pub(crate) fn time_only(text: &str) -> Parsed<NaiveTime> {
    let mut c = Cursor::new(text);
    let _ = c.eat(b'T') || c.eat(b't');
    let parsed = time(&mut c)?;
    if offset(&mut c)? == Some(Offset::Utc) {
        return Err(Fault::UtcDesignator);
    }
    annotations(&mut c)?;
    c.expect_end()?;
    Ok(parsed)
}

/// Parse `YYYY-MM`/`YYYYMM`, falling back to a full date-time string.
pub(crate) fn year_month(text: &str) -> Parsed<(i32, u32)> {
    if let Some(pair) = short_year_month(text)? {
        return Ok(pair);
    }
    let record = date_time(text)?.plain()?;
    Ok((record.date.year(), record.date.month()))
}

fn short_year_month(text: &str) -> Parsed<Option<(i32, u32)>> {
    let mut c = Cursor::new(text);
    let Ok(year) = year(&mut c) else {
        return Ok(None);
    };
    let _ = c.eat(b'-');
    let Ok(month) = c.digits(2) else {
        return Ok(None);
    };
    if !(c.at_end() || c.peek() == Some(b'[')) {
        return Ok(None);
    }
    annotations(&mut c)?;
    c.expect_end()?;
    calendar_date(year, month, 1)?;
    Ok(Some((year, month)))
}

/// Parse `MM-DD`, `MMDD`, `--MM-DD`, `--MMDD`, falling back to a full
/// date-time string.
pub(crate) fn month_day(text: &str) -> Parsed<(u32, u32)> {
    if let Some(pair) = short_month_day(text)? {
        return Ok(pair);
    }
    let record = date_time(text)?.plain()?;
    Ok((record.date.month(), record.date.day()))
}

fn short_month_day(text: &str) -> Parsed<Option<(u32, u32)>> {
    let mut c = Cursor::new(text);
    if c.eat(b'-') && !c.eat(b'-') {
        return Ok(None);
    }
    let Ok(month) = c.digits(2) else {
        return Ok(None);
    };
    let _ = c.eat(b'-');
    let Ok(day) = c.digits(2) else {
        return Ok(None);
    };
    if !(c.at_end() || c.peek() == Some(b'[')) {
        return Ok(None);
    }
    annotations(&mut c)?;
    c.expect_end()?;
    calendar_date(REFERENCE_LEAP_YEAR, month, day)?;
    Ok(Some((month, day)))
}

// ─── Canonical text ──────────────────────────────────────────────────

/// Four-digit years, or sign plus six digits outside 0..=9999.
pub(crate) fn write_year<W: fmt::Write>(w: &mut W, year: i32) -> fmt::Result {
    if (0..=9999).contains(&year) {
        write!(w, "{year:04}")
    } else {
        let sign = if year < 0 { '-' } else { '+' };
        write!(w, "{sign}{:06}", year.unsigned_abs())
    }
}

pub(crate) fn write_date<W: fmt::Write>(w: &mut W, date: NaiveDate) -> fmt::Result {
    write_year(w, date.year())?;
    write!(w, "-{:02}-{:02}", date.month(), date.day())
}

/// Fractional seconds with trailing zeros trimmed; nothing when zero.
pub(crate) fn write_fraction<W: fmt::Write>(w: &mut W, nanos: u32) -> fmt::Result {
    if nanos == 0 {
        return Ok(());
    }
    let digits = format!("{nanos:09}");
    write!(w, ".{}", digits.trim_end_matches('0'))
}

pub(crate) fn write_time<W: fmt::Write>(w: &mut W, time: NaiveTime) -> fmt::Result {
    write!(w, "{:02}:{:02}:{:02}", time.hour(), time.minute(), time.second())?;
    write_fraction(w, time.nanosecond())
}

/// `±HH:MM`, with `:SS` only when the offset has a seconds component.
pub(crate) fn write_offset<W: fmt::Write>(w: &mut W, seconds: i32) -> fmt::Result {
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.unsigned_abs();
    write!(w, "{sign}{:02}:{:02}", abs / 3600, abs / 60 % 60)?;
    if abs % 60 != 0 {
        write!(w, ":{:02}", abs % 60)?;
    }
    Ok(())
}
