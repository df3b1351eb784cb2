//! # Temporal Kinds
//!
//! The closed set of date/time value categories. One definition, eight
//! variants, exhaustive `match` everywhere: adding a kind forces every
//! consumer (parsers, descriptors, error codes) to handle it.

use serde::{Deserialize, Serialize};

/// One of the eight supported date/time value categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Kind {
    /// A calendar date with no time or zone (`2024-02-29`).
    PlainDate,
    /// A wall-clock time of day (`10:30:00`).
    PlainTime,
    /// A calendar date and wall-clock time with no zone.
    PlainDateTime,
    /// An exact instant bound to a time zone.
    ZonedDateTime,
    /// An exact instant on the UTC timeline.
    Instant,
    /// A signed amount of time expressed in calendar and clock units.
    Duration,
    /// A year and month (`2024-03`).
    PlainYearMonth,
    /// A month and day with no year (`02-29`).
    PlainMonthDay,
}

/// Number of supported kinds.
pub const KIND_COUNT: usize = 8;

impl Kind {
    /// Every kind, in registry order.
    pub const ALL: [Kind; KIND_COUNT] = [
        Kind::PlainDate,
        Kind::PlainTime,
        Kind::PlainDateTime,
        Kind::ZonedDateTime,
        Kind::Instant,
        Kind::Duration,
        Kind::PlainYearMonth,
        Kind::PlainMonthDay,
    ];

    /// The stable identifier used in error codes (`temporal.<name>.<rule>`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlainDate => "plainDate",
            Self::PlainTime => "plainTime",
            Self::PlainDateTime => "plainDateTime",
            Self::ZonedDateTime => "zonedDateTime",
            Self::Instant => "instant",
            Self::Duration => "duration",
            Self::PlainYearMonth => "plainYearMonth",
            Self::PlainMonthDay => "plainMonthDay",
        }
    }

    /// Human-readable noun used in default messages.
    pub fn title(&self) -> &'static str {
        match self {
            Self::PlainDate => "calendar date",
            Self::PlainTime => "time of day",
            Self::PlainDateTime => "date-time",
            Self::ZonedDateTime => "zoned date-time",
            Self::Instant => "instant",
            Self::Duration => "duration",
            Self::PlainYearMonth => "year-month",
            Self::PlainMonthDay => "month-day",
        }
    }

    /// Look up a kind by its identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
