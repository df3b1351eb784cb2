//! # Plain (Zone-less) Kinds
//!
//! Calendar dates, wall-clock times, their combination, and the two
//! partial dates (year-month, month-day). None of these carry a zone;
//! text with a numeric offset or zone annotation is accepted and the
//! extra information discarded, but the `Z` designator is rejected
//! because it asserts an exact time that a plain value cannot hold.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::clock::Clock;
use crate::error::ParseError;
use crate::iso::{self, Fault};
use crate::kind::Kind;

// ─── PlainDate ───────────────────────────────────────────────────────

/// A calendar date in the proleptic Gregorian calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainDate(NaiveDate);

impl PlainDate {
    /// Build a date, rejecting calendar overflow (`2021-02-31`).
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        iso::calendar_date(year, month, day).ok().map(Self)
    }

    /// Parse `YYYY-MM-DD` or any date-time string without `Z`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        iso::date_time(text)
            .and_then(iso::DateTimeRecord::plain)
            .map(|record| Self(record.date))
            .map_err(|fault| fault.at(Kind::PlainDate, text))
    }

    /// Today's date on the clock, in the clock's zone.
    pub fn current(clock: &dyn Clock) -> Self {
        Self(clock.local_now().date())
    }

    /// Wrap a `chrono` date.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Access the inner `chrono` date.
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Shift by a signed number of days; `None` past the representable range.
    pub fn add_days(&self, days: i64) -> Option<Self> {
        let delta = chrono::TimeDelta::try_days(days)?;
        self.0.checked_add_signed(delta).map(Self)
    }
}

impl fmt::Display for PlainDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        iso::write_date(f, self.0)
    }
}

// ─── PlainTime ───────────────────────────────────────────────────────

/// A wall-clock time of day with nanosecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainTime(NaiveTime);

impl PlainTime {
    /// Build a time from hour, minute, second.
    pub fn new(hour: u32, minute: u32, second: u32) -> Option<Self> {
        Self::with_nanos(hour, minute, second, 0)
    }

    /// Build a time with a sub-second component.
    pub fn with_nanos(hour: u32, minute: u32, second: u32, nanos: u32) -> Option<Self> {
        if second > 59 || nanos > 999_999_999 {
            return None;
        }
        NaiveTime::from_hms_nano_opt(hour, minute, second, nanos).map(Self)
    }

    /// Parse `HH:MM[:SS[.f]]`, `THHMM…`, or a date-time string with a time.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let parsed = if iso::looks_like_time(text) {
            iso::time_only(text)
        } else {
            iso::date_time(text)
                .and_then(iso::DateTimeRecord::plain)
                .and_then(|record| record.time.ok_or(Fault::MissingTime))
        };
        parsed
            .map(Self)
            .map_err(|fault| fault.at(Kind::PlainTime, text))
    }

    /// The current wall-clock time on the clock, in the clock's zone.
    pub fn current(clock: &dyn Clock) -> Self {
        Self(clock.local_now().time())
    }

    /// Wrap a `chrono` time.
    pub fn from_naive(time: NaiveTime) -> Self {
        Self(time)
    }

    /// Access the inner `chrono` time.
    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    pub fn nanosecond(&self) -> u32 {
        self.0.nanosecond()
    }
}

impl fmt::Display for PlainTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        iso::write_time(f, self.0)
    }
}

// ─── PlainDateTime ───────────────────────────────────────────────────

/// A calendar date and wall-clock time with no zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainDateTime(NaiveDateTime);

impl PlainDateTime {
    /// Combine a date and a time.
    pub fn new(date: PlainDate, time: PlainTime) -> Self {
        Self(date.as_naive().and_time(time.as_naive()))
    }

    /// Parse a date-time string without `Z`; a bare date means midnight.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        iso::date_time(text)
            .and_then(iso::DateTimeRecord::plain)
            .map(|record| Self(record.date.and_time(record.time.unwrap_or(NaiveTime::MIN))))
            .map_err(|fault| fault.at(Kind::PlainDateTime, text))
    }

    /// The current wall-clock date-time on the clock, in the clock's zone.
    pub fn current(clock: &dyn Clock) -> Self {
        Self(clock.local_now())
    }

    /// Wrap a `chrono` date-time.
    pub fn from_naive(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    /// Access the inner `chrono` date-time.
    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    pub fn date(&self) -> PlainDate {
        PlainDate(self.0.date())
    }

    pub fn time(&self) -> PlainTime {
        PlainTime(self.0.time())
    }
}

impl fmt::Display for PlainDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        iso::write_date(f, self.0.date())?;
        f.write_str("T")?;
        iso::write_time(f, self.0.time())
    }
}

// ─── PlainYearMonth ──────────────────────────────────────────────────

/// A month of a specific year. Ordered by year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainYearMonth {
    year: i32,
    month: u32,
}

impl PlainYearMonth {
    /// Build a year-month, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        iso::calendar_date(year, month, 1).ok()?;
        Some(Self { year, month })
    }

    /// Parse `YYYY-MM`, `YYYYMM`, or any date-time string without `Z`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        iso::year_month(text)
            .map(|(year, month)| Self { year, month })
            .map_err(|fault| fault.at(Kind::PlainYearMonth, text))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Number of days in this month.
    pub fn days_in_month(&self) -> u32 {
        iso::days_in_month(self.year, self.month)
    }
}

impl fmt::Display for PlainYearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        iso::write_year(f, self.year)?;
        write!(f, "-{:02}", self.month)
    }
}

// ─── PlainMonthDay ───────────────────────────────────────────────────

/// A day of a month with no year, such as a birthday.
///
/// Deliberately not `Ord`: whether `02-29` falls before `03-01` depends
/// on a year that the value does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlainMonthDay {
    month: u32,
    day: u32,
}

impl PlainMonthDay {
    /// Build a month-day, validated against a leap year so `02-29` is allowed.
    pub fn new(month: u32, day: u32) -> Option<Self> {
        iso::calendar_date(iso::REFERENCE_LEAP_YEAR, month, day).ok()?;
        Some(Self { month, day })
    }

    /// Parse `MM-DD`, `--MM-DD`, `MMDD`, or any date-time string without `Z`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        iso::month_day(text)
            .map(|(month, day)| Self { month, day })
            .map_err(|fault| fault.at(Kind::PlainMonthDay, text))
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// The date this month-day falls on in `year`, if it exists there.
    pub fn in_year(&self, year: i32) -> Option<PlainDate> {
        PlainDate::new(year, self.month, self.day)
    }
}

impl fmt::Display for PlainMonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- PlainDate ----

    #[test]
    fn test_plain_date_parse_and_display() {
        let d = PlainDate::parse("2024-02-29").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2024, 2, 29));
        assert_eq!(d.to_string(), "2024-02-29");
    }

    #[test]
    fn test_plain_date_accepts_date_time_text() {
        let d = PlainDate::parse("2024-02-29T23:59:59+05:00[Asia/Karachi]").unwrap();
        assert_eq!(d.to_string(), "2024-02-29");
    }

    #[test]
    fn test_plain_date_rejects_overflow_and_z() {
        assert!(matches!(
            PlainDate::parse("2021-02-31"),
            Err(ParseError::OutOfRange { component: "day", .. })
        ));
        assert!(matches!(
            PlainDate::parse("2023-02-29"),
            Err(ParseError::OutOfRange { .. })
        ));
        assert!(matches!(
            PlainDate::parse("2024-01-01T00:00Z"),
            Err(ParseError::UtcDesignator { .. })
        ));
        assert!(matches!(
            PlainDate::parse("not-a-date"),
            Err(ParseError::Malformed { .. })
        ));
    }

    #[test]
    fn test_plain_date_new_and_add_days() {
        assert!(PlainDate::new(2021, 2, 31).is_none());
        let d = PlainDate::new(2024, 3, 1).unwrap();
        assert_eq!(d.add_days(-1).unwrap().to_string(), "2024-02-29");
    }

    // ---- PlainTime ----

    #[test]
    fn test_plain_time_forms() {
        assert_eq!(PlainTime::parse("10:30").unwrap().to_string(), "10:30:00");
        assert_eq!(PlainTime::parse("T103045.5").unwrap().to_string(), "10:30:45.5");
        assert_eq!(
            PlainTime::parse("2024-01-01T08:15:00").unwrap().to_string(),
            "08:15:00"
        );
    }

    #[test]
    fn test_plain_time_rejections() {
        assert!(matches!(
            PlainTime::parse("2024-01-01"),
            Err(ParseError::MissingTime { .. })
        ));
        assert!(matches!(
            PlainTime::parse("25:00"),
            Err(ParseError::OutOfRange { component: "hour", .. })
        ));
        assert!(matches!(
            PlainTime::parse("10:00Z"),
            Err(ParseError::UtcDesignator { .. })
        ));
    }

    #[test]
    fn test_plain_time_new_rejects_leap_second() {
        assert!(PlainTime::new(23, 59, 60).is_none());
        assert!(PlainTime::with_nanos(0, 0, 0, 1_000_000_000).is_none());
    }

    // ---- PlainDateTime ----

    #[test]
    fn test_plain_date_time_parse() {
        let dt = PlainDateTime::parse("2024-01-15T10:30:00.250").unwrap();
        assert_eq!(dt.to_string(), "2024-01-15T10:30:00.25");
        assert_eq!(dt.date().to_string(), "2024-01-15");
        let midnight = PlainDateTime::parse("2024-01-15").unwrap();
        assert_eq!(midnight.to_string(), "2024-01-15T00:00:00");
    }

    // ---- PlainYearMonth ----

    #[test]
    fn test_plain_year_month() {
        let ym = PlainYearMonth::parse("2024-02").unwrap();
        assert_eq!(ym.to_string(), "2024-02");
        assert_eq!(ym.days_in_month(), 29);
        assert!(PlainYearMonth::new(2024, 13).is_none());
        assert!(ym < PlainYearMonth::parse("2024-03").unwrap());
        assert!(PlainYearMonth::parse("2023-12").unwrap() < ym);
    }

    // ---- PlainMonthDay ----

    #[test]
    fn test_plain_month_day() {
        let md = PlainMonthDay::parse("--02-29").unwrap();
        assert_eq!(md.to_string(), "02-29");
        assert!(md.in_year(2023).is_none());
        assert_eq!(md.in_year(2024).unwrap().to_string(), "2024-02-29");
        assert!(PlainMonthDay::new(4, 31).is_none());
    }
}
