//! # Durations
//!
//! A signed amount of time in ten units, from years down to nanoseconds.
//! All units share one sign; mixed signs are unrepresentable.
//!
//! ## Comparison
//!
//! Durations made only of fixed-length units (weeks and smaller) compare
//! by total nanoseconds. Years and months have no fixed length, so a
//! duration carrying either is measured by adding it to a reference date:
//! `P1M` equals `P29D` from 2024-02-01 and `P28D` from 2023-02-01.
//! Callers supply the reference date per comparison.

use std::cmp::Ordering;
use std::fmt;

use chrono::{Months, NaiveDateTime, NaiveTime, TimeDelta};

use crate::error::ParseError;
use crate::iso::{self, Cursor, Fault};
use crate::kind::Kind;
use crate::plain::PlainDate;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: u128 = 24 * NANOS_PER_HOUR;

/// Mean Gregorian month (146 097 days per 400 years / 4 800 months), in seconds.
const MEAN_MONTH_SECONDS: i128 = 2_629_746;

/// Unsigned magnitudes of each unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DurationUnits {
    pub years: u64,
    pub months: u64,
    pub weeks: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub milliseconds: u64,
    pub microseconds: u64,
    pub nanoseconds: u64,
}

impl DurationUnits {
    fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// A signed ISO 8601 duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Duration {
    negative: bool,
    units: DurationUnits,
}

impl Duration {
    /// Build a duration. A zero duration is never negative.
    pub fn new(units: DurationUnits, negative: bool) -> Self {
        Self {
            negative: negative && !units.is_zero(),
            units,
        }
    }

    /// The zero duration, `PT0S`.
    pub fn zero() -> Self {
        Self::new(DurationUnits::default(), false)
    }

    /// Parse `[±]P[nY][nM][nW][nD][T[nH][nM][n[.f]S]]`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parse_duration(text).map_err(|fault| fault.at(Kind::Duration, text))
    }

    /// The unit magnitudes.
    pub fn units(&self) -> &DurationUnits {
        &self.units
    }

    /// `-1`, `0`, or `1`.
    pub fn sign(&self) -> i32 {
        if self.units.is_zero() {
            0
        } else if self.negative {
            -1
        } else {
            1
        }
    }

    pub fn is_zero(&self) -> bool {
        self.units.is_zero()
    }

    /// The same magnitudes with the opposite sign.
    pub fn negated(&self) -> Self {
        Self::new(self.units, !self.negative)
    }

    /// Whether the duration carries units with no fixed length.
    pub fn has_calendar_units(&self) -> bool {
        self.units.years != 0 || self.units.months != 0
    }

    /// Signed total of the fixed-length units (weeks and smaller).
    pub fn fixed_nanoseconds(&self) -> i128 {
        let u = &self.units;
        let total = u128::from(u.weeks) * 7 * NANOS_PER_DAY
            + u128::from(u.days) * NANOS_PER_DAY
            + u128::from(u.hours) * NANOS_PER_HOUR
            + u128::from(u.minutes) * NANOS_PER_MINUTE
            + u128::from(u.seconds) * NANOS_PER_SECOND
            + u128::from(u.milliseconds) * NANOS_PER_MILLI
            + u128::from(u.microseconds) * NANOS_PER_MICRO
            + u128::from(u.nanoseconds);
        // Ten u64 magnitudes times at most 6.048e14 stay well inside i128.
        let total = total as i128;
        if self.negative {
            -total
        } else {
            total
        }
    }

    /// Compare two durations, measuring calendar units from `relative_to`.
    ///
    /// Without calendar units on either side the reference date is unused
    /// and the comparison is exact.
    pub fn compare(&self, other: &Self, relative_to: PlainDate) -> Ordering {
        if !self.has_calendar_units() && !other.has_calendar_units() {
            return self.fixed_nanoseconds().cmp(&other.fixed_nanoseconds());
        }
        let start = relative_to.as_naive().and_time(NaiveTime::MIN);
        match (self.end_from(start), other.end_from(start)) {
            (Some(a), Some(b)) => a.cmp(&b),
            // Past chrono's range: fall back to mean month lengths.
            _ => self.approximate_nanoseconds().cmp(&other.approximate_nanoseconds()),
        }
    }

    /// The date-time reached by adding this duration to `start`.
    fn end_from(&self, start: NaiveDateTime) -> Option<NaiveDateTime> {
        let months = self
            .units
            .years
            .checked_mul(12)?
            .checked_add(self.units.months)?;
        let months = Months::new(u32::try_from(months).ok()?);
        let date = if self.negative {
            start.date().checked_sub_months(months)?
        } else {
            start.date().checked_add_months(months)?
        };
        let nanos = self.fixed_nanoseconds();
        let seconds = i64::try_from(nanos.div_euclid(NANOS_PER_SECOND as i128)).ok()?;
        let subsec = nanos.rem_euclid(NANOS_PER_SECOND as i128) as i64;
        let delta = TimeDelta::try_seconds(seconds)?.checked_add(&TimeDelta::nanoseconds(subsec))?;
        date.and_time(start.time()).checked_add_signed(delta)
    }

    fn approximate_nanoseconds(&self) -> i128 {
        let months = i128::from(self.units.years) * 12 + i128::from(self.units.months);
        let calendar = months * MEAN_MONTH_SECONDS * NANOS_PER_SECOND as i128;
        let calendar = if self.negative { -calendar } else { calendar };
        calendar + self.fixed_nanoseconds()
    }
}

// ─── Parsing ─────────────────────────────────────────────────────────

/// Position of each designator; designators must appear in strictly
/// increasing rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Unit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

fn integer(c: &mut Cursor<'_>) -> Result<u64, Fault> {
    if !c.peek_digit() {
        return Err(Fault::Syntax);
    }
    let mut value = 0u64;
    while let Some(b) = c.peek().filter(u8::is_ascii_digit) {
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(b - b'0')))
            .ok_or(Fault::Range("duration"))?;
        c.advance();
    }
    Ok(value)
}

/// Optional `.digits`; returns the numerator and the digit count.
fn fraction(c: &mut Cursor<'_>) -> Result<Option<(u64, u32)>, Fault> {
    if !(c.eat(b'.') || c.eat(b',')) {
        return Ok(None);
    }
    let mut numerator = 0u64;
    let mut count = 0u32;
    while let Some(b) = c.peek().filter(u8::is_ascii_digit) {
        if count == 9 {
            return Err(Fault::Syntax);
        }
        numerator = numerator * 10 + u64::from(b - b'0');
        count += 1;
        c.advance();
    }
    if count == 0 {
        return Err(Fault::Syntax);
    }
    Ok(Some((numerator, count)))
}

fn add(slot: &mut u64, amount: u128) -> Result<(), Fault> {
    let amount = u64::try_from(amount).map_err(|_| Fault::Range("duration"))?;
    *slot = slot.checked_add(amount).ok_or(Fault::Range("duration"))?;
    Ok(())
}

/// Spread a fractional hour, minute, or second over the smaller units.
fn distribute(
    units: &mut DurationUnits,
    unit: Unit,
    numerator: u64,
    digits: u32,
) -> Result<(), Fault> {
    let scale = match unit {
        Unit::Hours => NANOS_PER_HOUR,
        Unit::Minutes => NANOS_PER_MINUTE,
        _ => NANOS_PER_SECOND,
    };
    let mut rest = u128::from(numerator) * scale / 10u128.pow(digits);
    if unit == Unit::Hours {
        add(&mut units.minutes, rest / NANOS_PER_MINUTE)?;
        rest %= NANOS_PER_MINUTE;
    }
    if unit <= Unit::Minutes {
        add(&mut units.seconds, rest / NANOS_PER_SECOND)?;
        rest %= NANOS_PER_SECOND;
    }
    add(&mut units.milliseconds, rest / NANOS_PER_MILLI)?;
    rest %= NANOS_PER_MILLI;
    add(&mut units.microseconds, rest / NANOS_PER_MICRO)?;
    add(&mut units.nanoseconds, rest % NANOS_PER_MICRO)
}

fn parse_duration(text: &str) -> Result<Duration, Fault> {
    let mut c = Cursor::new(text);
    let negative = c.eat(b'-');
    if !negative {
        let _ = c.eat(b'+');
    }
    if !(c.eat(b'P') || c.eat(b'p')) {
        return Err(Fault::Syntax);
    }

    let mut units = DurationUnits::default();
    let mut in_time = false;
    let mut last: Option<Unit> = None;
    let mut fractional = false;

    while !c.at_end() {
        if !in_time && (c.eat(b'T') || c.eat(b't')) {
            in_time = true;
            if c.at_end() {
                return Err(Fault::Syntax);
            }
            continue;
        }
        // A fractional component must be the last one.
        if fractional {
            return Err(Fault::Syntax);
        }
        let whole = integer(&mut c)?;
        let frac = fraction(&mut c)?;
        let designator = c.peek().ok_or(Fault::Syntax)?.to_ascii_uppercase();
        c.advance();
        let unit = match (in_time, designator) {
            (false, b'Y') => Unit::Years,
            (false, b'M') => Unit::Months,
            (false, b'W') => Unit::Weeks,
            (false, b'D') => Unit::Days,
            (true, b'H') => Unit::Hours,
            (true, b'M') => Unit::Minutes,
            (true, b'S') => Unit::Seconds,
            _ => return Err(Fault::Syntax),
        };
        if last.is_some_and(|prev| unit <= prev) {
            return Err(Fault::Syntax);
        }
        last = Some(unit);
        let slot = match unit {
            Unit::Years => &mut units.years,
            Unit::Months => &mut units.months,
            Unit::Weeks => &mut units.weeks,
            Unit::Days => &mut units.days,
            Unit::Hours => &mut units.hours,
            Unit::Minutes => &mut units.minutes,
            Unit::Seconds => &mut units.seconds,
        };
        *slot = whole;
        if let Some((numerator, digits)) = frac {
            if !in_time {
                return Err(Fault::Syntax);
            }
            fractional = true;
            distribute(&mut units, unit, numerator, digits)?;
        }
    }

    if last.is_none() {
        return Err(Fault::Syntax);
    }
    Ok(Duration::new(units, negative))
}

// ─── Canonical text ──────────────────────────────────────────────────

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("PT0S");
        }
        let u = &self.units;
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        for (value, designator) in [(u.years, 'Y'), (u.months, 'M'), (u.weeks, 'W'), (u.days, 'D')] {
            if value != 0 {
                write!(f, "{value}{designator}")?;
            }
        }

        let subsecond = u128::from(u.milliseconds) * NANOS_PER_MILLI
            + u128::from(u.microseconds) * NANOS_PER_MICRO
            + u128::from(u.nanoseconds);
        let seconds = u128::from(u.seconds) + subsecond / NANOS_PER_SECOND;
        let nanos = (subsecond % NANOS_PER_SECOND) as u32;

        if u.hours != 0 || u.minutes != 0 || seconds != 0 || nanos != 0 {
            f.write_str("T")?;
            if u.hours != 0 {
                write!(f, "{}H", u.hours)?;
            }
            if u.minutes != 0 {
                write!(f, "{}M", u.minutes)?;
            }
            if seconds != 0 || nanos != 0 {
                write!(f, "{seconds}")?;
                iso::write_fraction(f, nanos)?;
                f.write_str("S")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(text: &str) -> Duration {
        Duration::parse(text).unwrap()
    }

    fn date(text: &str) -> PlainDate {
        PlainDate::parse(text).unwrap()
    }

    // ---- parsing ----

    #[test]
    fn test_parse_full_form() {
        let dur = d("P1Y2M3W4DT5H6M7.008009010S");
        let u = dur.units();
        assert_eq!((u.years, u.months, u.weeks, u.days), (1, 2, 3, 4));
        assert_eq!((u.hours, u.minutes, u.seconds), (5, 6, 7));
        assert_eq!((u.milliseconds, u.microseconds, u.nanoseconds), (8, 9, 10));
        assert_eq!(dur.to_string(), "P1Y2M3W4DT5H6M7.00800901S");
    }

    #[test]
    fn test_parse_sign_and_case() {
        assert_eq!(d("-PT1H").sign(), -1);
        assert_eq!(d("+pt1h").sign(), 1);
        assert_eq!(d("-PT1H").to_string(), "-PT1H");
    }

    #[test]
    fn test_zero_is_unsigned() {
        assert_eq!(d("-PT0S").sign(), 0);
        assert_eq!(d("-PT0S"), d("P0D"));
        assert_eq!(d("P0D").to_string(), "PT0S");
    }

    #[test]
    fn test_fraction_balances_into_smaller_units() {
        assert_eq!(d("PT1.5H").to_string(), "PT1H30M");
        assert_eq!(d("PT0.5M").to_string(), "PT30S");
        assert_eq!(d("PT0,25S").to_string(), "PT0.25S");
    }

    #[test]
    fn test_parse_rejections() {
        for bad in ["", "P", "PT", "P1DT", "1D", "PT1S1M", "P1D1Y", "P1.5D", "PT1.5H2M", "P1H", "PT1D", "P1Y1Y"] {
            assert!(
                matches!(Duration::parse(bad), Err(ParseError::Malformed { .. })),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_parse_overflow() {
        assert!(matches!(
            Duration::parse("P99999999999999999999D"),
            Err(ParseError::OutOfRange { .. })
        ));
    }

    // ---- comparison ----

    #[test]
    fn test_compare_fixed_units() {
        let any_day = date("2024-01-01");
        assert_eq!(d("PT60M").compare(&d("PT1H"), any_day), Ordering::Equal);
        assert_eq!(d("P1W").compare(&d("P6DT23H"), any_day), Ordering::Greater);
        assert_eq!(d("-PT1S").compare(&d("PT0S"), any_day), Ordering::Less);
    }

    #[test]
    fn test_compare_month_depends_on_reference_date() {
        let leap_feb = date("2024-02-01");
        let plain_feb = date("2023-02-01");
        assert_eq!(d("P1M").compare(&d("P29D"), leap_feb), Ordering::Equal);
        assert_eq!(d("P1M").compare(&d("P29D"), plain_feb), Ordering::Less);
        assert_eq!(d("P1M").compare(&d("P30D"), date("2024-01-01")), Ordering::Greater);
    }

    #[test]
    fn test_compare_negative_calendar_units() {
        let reference = date("2024-03-31");
        // Back one month from 2024-03-31 clamps to 2024-02-29, 31 days earlier.
        assert_eq!(d("-P1M").compare(&d("-P31D"), reference), Ordering::Equal);
        assert_eq!(d("-P1Y").compare(&d("P1D"), reference), Ordering::Less);
    }

    #[test]
    fn test_negated() {
        assert_eq!(d("P1D").negated(), d("-P1D"));
        assert_eq!(Duration::zero().negated(), Duration::zero());
    }
}
