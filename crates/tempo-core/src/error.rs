//! # Error Types
//!
//! Structured errors for text parsing and the startup capability check.
//! All errors use `thiserror` for derive-based `Display` and `Error`.
//!
//! ## Design
//!
//! - Every parse error names the kind and echoes the rejected input.
//! - The variant distinguishes the failure class (syntax, range, missing
//!   component, zone resolution). Callers that only need pass/fail can
//!   ignore the variant; the schema layer maps all of them to one code.

use thiserror::Error;

use crate::kind::Kind;

/// Failure to interpret text as a value of a given kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The text does not match the grammar for the kind.
    #[error("invalid {kind} {input:?}: malformed syntax")]
    Malformed {
        /// Kind being parsed.
        kind: Kind,
        /// Rejected input.
        input: String,
    },

    /// A component is syntactically valid but outside its calendar range
    /// (month 13, February 30th, hour 24).
    #[error("invalid {kind} {input:?}: {component} out of range")]
    OutOfRange {
        /// Kind being parsed.
        kind: Kind,
        /// Rejected input.
        input: String,
        /// Name of the offending component.
        component: &'static str,
    },

    /// The kind requires a time-of-day component.
    #[error("invalid {kind} {input:?}: a time of day is required")]
    MissingTime {
        /// Kind being parsed.
        kind: Kind,
        /// Rejected input.
        input: String,
    },

    /// The kind requires a UTC offset or `Z` designator.
    #[error("invalid {kind} {input:?}: a UTC offset is required")]
    MissingOffset {
        /// Kind being parsed.
        kind: Kind,
        /// Rejected input.
        input: String,
    },

    /// The kind requires a bracketed time zone annotation.
    #[error("invalid {kind} {input:?}: a bracketed time zone annotation is required")]
    MissingTimeZone {
        /// Kind being parsed.
        kind: Kind,
        /// Rejected input.
        input: String,
    },

    /// The time zone identifier is not in the zone database.
    #[error("invalid {kind} {input:?}: unknown time zone {zone:?}")]
    UnknownTimeZone {
        /// Kind being parsed.
        kind: Kind,
        /// Rejected input.
        input: String,
        /// The unresolved identifier.
        zone: String,
    },

    /// The numeric offset disagrees with the zone's offset at that wall time.
    #[error("invalid {kind} {input:?}: offset {offset} does not match time zone {zone}")]
    OffsetMismatch {
        /// Kind being parsed.
        kind: Kind,
        /// Rejected input.
        input: String,
        /// Offset found in the text.
        offset: String,
        /// Zone found in the annotation.
        zone: String,
    },

    /// A plain (zone-less) kind was given text carrying the `Z` designator.
    #[error("invalid {kind} {input:?}: the Z designator is not allowed")]
    UtcDesignator {
        /// Kind being parsed.
        kind: Kind,
        /// Rejected input.
        input: String,
    },

    /// A calendar annotation other than ISO 8601.
    #[error("invalid {kind} {input:?}: unsupported calendar {calendar:?}")]
    UnsupportedCalendar {
        /// Kind being parsed.
        kind: Kind,
        /// Rejected input.
        input: String,
        /// The calendar identifier found.
        calendar: String,
    },
}

impl ParseError {
    /// The kind the text was parsed as.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Malformed { kind, .. }
            | Self::OutOfRange { kind, .. }
            | Self::MissingTime { kind, .. }
            | Self::MissingOffset { kind, .. }
            | Self::MissingTimeZone { kind, .. }
            | Self::UnknownTimeZone { kind, .. }
            | Self::OffsetMismatch { kind, .. }
            | Self::UtcDesignator { kind, .. }
            | Self::UnsupportedCalendar { kind, .. } => *kind,
        }
    }

    /// The rejected input text.
    pub fn input(&self) -> &str {
        match self {
            Self::Malformed { input, .. }
            | Self::OutOfRange { input, .. }
            | Self::MissingTime { input, .. }
            | Self::MissingOffset { input, .. }
            | Self::MissingTimeZone { input, .. }
            | Self::UnknownTimeZone { input, .. }
            | Self::OffsetMismatch { input, .. }
            | Self::UtcDesignator { input, .. }
            | Self::UnsupportedCalendar { input, .. } => input,
        }
    }
}

/// A required date/time capability is unavailable at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// The bundled time zone database cannot resolve a required zone.
    #[error("time zone database unavailable: cannot resolve {zone:?}")]
    TimeZoneDatabase {
        /// The zone that failed to resolve.
        zone: String,
    },

    /// The clock produced a moment that cannot be expressed as a local date-time.
    #[error("clock reading {moment} cannot be represented in time zone {zone}")]
    ClockOutOfRange {
        /// The clock's reading, RFC 3339.
        moment: String,
        /// The clock's zone.
        zone: String,
    },
}
