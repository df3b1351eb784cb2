//! # Exact-Time Kinds
//!
//! [`Instant`] is a point on the UTC timeline. [`ZonedDateTime`] is the
//! same point bound to a [`TimeZone`], which fixes its wall-clock reading
//! and offset. Both order by the underlying instant, so
//! `2024-01-01T01:00:00+01:00[Europe/Paris]` and
//! `2024-01-01T00:00:00+00:00[UTC]` compare equal.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeDelta, Utc};

use crate::error::ParseError;
use crate::iso::{self, Fault, Offset};
use crate::kind::Kind;
use crate::plain::PlainDateTime;
use crate::zone::TimeZone;

// ─── Instant ─────────────────────────────────────────────────────────

/// An exact point in time with nanosecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(DateTime<Utc>);

impl Instant {
    /// Parse a date-time with a mandatory time and a mandatory offset or `Z`.
    /// A trailing zone annotation is accepted and ignored.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Self::parse_record(text).map_err(|fault| fault.at(Kind::Instant, text))
    }

    fn parse_record(text: &str) -> Result<Self, Fault> {
        let record = iso::date_time(text)?;
        let time = record.time.ok_or(Fault::MissingTime)?;
        let offset = match record.offset.ok_or(Fault::MissingOffset)? {
            Offset::Utc => 0,
            Offset::Fixed(seconds) => seconds,
        };
        record
            .date
            .and_time(time)
            .checked_sub_signed(TimeDelta::seconds(i64::from(offset)))
            .map(|naive| Self(naive.and_utc()))
            .ok_or(Fault::Range("instant"))
    }

    /// Wrap a `chrono` UTC date-time.
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// Access the inner `chrono` date-time.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Nanoseconds since the Unix epoch.
    pub fn epoch_nanoseconds(&self) -> i128 {
        i128::from(self.0.timestamp()) * 1_000_000_000
            + i128::from(self.0.timestamp_subsec_nanos())
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let naive = self.0.naive_utc();
        iso::write_date(f, naive.date())?;
        f.write_str("T")?;
        iso::write_time(f, naive.time())?;
        f.write_str("Z")
    }
}

// ─── ZonedDateTime ───────────────────────────────────────────────────

/// An exact instant together with the zone it is observed in.
///
/// The wall-clock reading and offset are derived once at construction,
/// so rendering never has to re-resolve the zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZonedDateTime {
    instant: DateTime<Utc>,
    local: NaiveDateTime,
    offset: i32,
    zone: TimeZone,
}

impl ZonedDateTime {
    /// Bind an instant to a zone. `None` if the wall-clock reading falls
    /// outside the representable range.
    pub fn from_instant(instant: Instant, zone: TimeZone) -> Option<Self> {
        let instant = instant.0;
        let local = zone.to_local(&instant)?;
        Some(Self {
            instant,
            local,
            offset: zone.offset_at(&instant),
            zone,
        })
    }

    /// Parse a date-time carrying a mandatory `[Zone]` annotation.
    ///
    /// - With `Z`, the text denotes an exact instant which is then viewed
    ///   in the zone.
    /// - With a numeric offset, the offset must agree with the zone at
    ///   that wall time.
    /// - With no offset, the wall time is resolved in the zone (earlier
    ///   instant when repeated, shifted past the gap when skipped).
    /// - With no time, the start of the day (midnight) is used.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Self::parse_record(text).map_err(|fault| fault.at(Kind::ZonedDateTime, text))
    }

    fn parse_record(text: &str) -> Result<Self, Fault> {
        let record = iso::date_time(text)?;
        let zone_id = record.zone.as_deref().ok_or(Fault::MissingZone)?;
        let zone = TimeZone::parse_annotation(zone_id)?;
        let local = record.date.and_time(record.time.unwrap_or(NaiveTime::MIN));

        let instant = match record.offset {
            Some(Offset::Utc) => local.and_utc(),
            Some(Offset::Fixed(seconds)) => {
                let instant = local
                    .checked_sub_signed(TimeDelta::seconds(i64::from(seconds)))
                    .ok_or(Fault::Range("instant"))?
                    .and_utc();
                if zone.offset_at(&instant) != seconds {
                    let mut offset = String::new();
                    let _ = iso::write_offset(&mut offset, seconds);
                    return Err(Fault::OffsetMismatch {
                        offset,
                        zone: zone.id(),
                    });
                }
                instant
            }
            None => zone.resolve_local(local).ok_or(Fault::Range("instant"))?,
        };

        Self::from_instant(Instant(instant), zone).ok_or(Fault::Range("instant"))
    }

    /// The exact instant.
    pub fn instant(&self) -> Instant {
        Instant(self.instant)
    }

    /// The zone this value is observed in.
    pub fn time_zone(&self) -> &TimeZone {
        &self.zone
    }

    /// Identifier of the zone, as matched by the `timezone` rule.
    pub fn time_zone_id(&self) -> String {
        self.zone.id()
    }

    /// Offset from UTC, in seconds, at this instant.
    pub fn offset_seconds(&self) -> i32 {
        self.offset
    }

    /// The wall-clock reading in the zone.
    pub fn to_plain_date_time(&self) -> PlainDateTime {
        PlainDateTime::from_naive(self.local)
    }

    /// Order by instant, ignoring the zone.
    pub fn compare_instant(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant)
    }
}

impl fmt::Display for ZonedDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        iso::write_date(f, self.local.date())?;
        f.write_str("T")?;
        iso::write_time(f, self.local.time())?;
        iso::write_offset(f, self.offset)?;
        write!(f, "[{}]", self.zone)
    }
}
