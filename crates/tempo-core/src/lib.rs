//! # tempo-core: Date/Time Value Kinds
//!
//! The eight value kinds the validation layer works with, their text
//! grammar, and their canonical text. `tempo-schema` builds on this crate;
//! it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One type per kind.** `PlainDate`, `PlainTime`, `PlainDateTime`,
//!    `ZonedDateTime`, `Instant`, `Duration`, `PlainYearMonth`,
//!    `PlainMonthDay`. Each parses with `parse()` / `FromStr` and renders
//!    canonical text with `Display`; serde goes through that text.
//!
//! 2. **Parsing is strict.** Calendar overflow (`2021-02-31`), a missing
//!    offset on an instant, or a missing zone annotation on a zoned
//!    date-time are [`ParseError`]s, never silently repaired.
//!
//! 3. **Ordering is per kind.** Plain kinds derive `Ord`. Exact kinds
//!    order by instant. Durations compare against a reference date.
//!    `PlainMonthDay` has no ordering at all.
//!
//! 4. **Time is injected.** Nothing reads the system clock except
//!    [`SystemClock`]. "Today" is always `PlainDate::current(&clock)`.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod capability;
pub mod clock;
pub mod duration;
pub mod error;
pub mod exact;
mod iso;
pub mod kind;
pub mod plain;
pub mod value;
pub mod zone;

// Re-export primary types for ergonomic imports.
pub use clock::{Clock, FixedClock, ManualClock, SystemClock};
pub use duration::{Duration, DurationUnits};
pub use error::{CapabilityError, ParseError};
pub use exact::{Instant, ZonedDateTime};
pub use iso::{days_in_month, is_leap_year, REFERENCE_LEAP_YEAR};
pub use kind::{Kind, KIND_COUNT};
pub use plain::{PlainDate, PlainDateTime, PlainMonthDay, PlainTime, PlainYearMonth};
pub use value::{Temporal, TemporalValue};
pub use zone::TimeZone;
