//! # Time Zones
//!
//! A zone is either an IANA zone from the bundled `chrono-tz` database or
//! a fixed UTC offset. Identifiers are matched case-sensitively and no
//! link/alias resolution is applied: `Asia/Calcutta` stays
//! `Asia/Calcutta`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone as _, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::iso::{self, Cursor, Fault};

/// A time zone a [`ZonedDateTime`](crate::ZonedDateTime) is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeZone {
    /// A named zone from the IANA database.
    Iana(Tz),
    /// A constant offset in seconds east of UTC.
    Fixed(i32),
}

impl TimeZone {
    /// The UTC zone.
    pub fn utc() -> Self {
        Self::Iana(Tz::UTC)
    }

    /// Resolve an identifier: `±HH:MM` for fixed offsets, otherwise an
    /// exact IANA name.
    pub fn from_id(id: &str) -> Option<Self> {
        if id.starts_with(['+', '-']) {
            let mut c = Cursor::new(id);
            let seconds = iso::numeric_offset(&mut c).ok()?;
            c.expect_end().ok()?;
            // Offset zones carry minute precision only.
            if seconds % 60 != 0 {
                return None;
            }
            return Some(Self::Fixed(seconds));
        }
        id.parse::<Tz>().ok().map(Self::Iana)
    }

    /// The identifier as it appears in canonical text.
    pub fn id(&self) -> String {
        match self {
            Self::Iana(tz) => tz.name().to_string(),
            Self::Fixed(seconds) => {
                let mut s = String::new();
                // Writing to a String cannot fail.
                let _ = iso::write_offset(&mut s, *seconds);
                s
            }
        }
    }

    /// Offset from UTC, in seconds, in effect at `instant`.
    pub fn offset_at(&self, instant: &DateTime<Utc>) -> i32 {
        match self {
            Self::Iana(tz) => tz
                .offset_from_utc_datetime(&instant.naive_utc())
                .fix()
                .local_minus_utc(),
            Self::Fixed(seconds) => *seconds,
        }
    }

    /// Wall-clock reading of `instant` in this zone.
    pub fn to_local(&self, instant: &DateTime<Utc>) -> Option<NaiveDateTime> {
        instant
            .naive_utc()
            .checked_add_signed(TimeDelta::seconds(i64::from(self.offset_at(instant))))
    }

    /// Map a wall-clock reading to an instant.
    ///
    /// Ambiguous readings (a repeated hour) take the earlier instant.
    /// Skipped readings (a gap) are interpreted with the offset in effect
    /// before the transition, which lands after the gap.
    pub fn resolve_local(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Self::Fixed(seconds) => shift(local, *seconds),
            Self::Iana(tz) => match tz.from_local_datetime(&local) {
                LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
                LocalResult::Ambiguous(earlier, _) => Some(earlier.with_timezone(&Utc)),
                LocalResult::None => {
                    let before = local.checked_sub_signed(TimeDelta::days(1))?;
                    let offset = tz.offset_from_utc_datetime(&before).fix().local_minus_utc();
                    shift(local, offset)
                }
            },
        }
    }

    /// Resolve the bracketed zone annotation of a parsed string.
    pub(crate) fn parse_annotation(id: &str) -> Result<Self, Fault> {
        Self::from_id(id).ok_or_else(|| Fault::UnknownZone(id.to_string()))
    }
}

/// Interpret `local` as a reading `offset` seconds east of UTC.
fn shift(local: NaiveDateTime, offset: i32) -> Option<DateTime<Utc>> {
    local
        .checked_sub_signed(TimeDelta::seconds(i64::from(offset)))
        .map(|naive| naive.and_utc())
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl FromStr for TimeZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| format!("unknown time zone {s:?}"))
    }
}

impl Serialize for TimeZone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeZone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
