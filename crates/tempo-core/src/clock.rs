//! # Clocks
//!
//! Every "current value" (today's date, the time right now, the reference
//! date for duration comparison) is read from a [`Clock`]. Production code
//! uses [`SystemClock`]; tests pin time with [`FixedClock`] or step it with
//! [`ManualClock`].
//!
//! A clock also names the zone that wall-clock readings are taken in, so
//! "today" on a clock in `Pacific/Auckland` can differ from "today" in UTC.

use std::fmt::Debug;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use parking_lot::RwLock;

use crate::zone::TimeZone;

/// Source of the current instant and local zone.
pub trait Clock: Send + Sync + Debug {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The zone local readings are taken in.
    fn time_zone(&self) -> TimeZone {
        TimeZone::utc()
    }

    /// The current wall-clock reading in [`Clock::time_zone`].
    fn local_now(&self) -> NaiveDateTime {
        let now = self.now();
        self.time_zone()
            .to_local(&now)
            .unwrap_or_else(|| now.naive_utc())
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn time_zone(&self) -> TimeZone {
        (**self).time_zone()
    }

    fn local_now(&self) -> NaiveDateTime {
        (**self).local_now()
    }
}

// ─── SystemClock ─────────────────────────────────────────────────────

/// The host's clock and configured zone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    zone: TimeZone,
}

impl SystemClock {
    /// Read the host zone. Falls back to UTC when the host zone is
    /// unavailable or not in the bundled database.
    pub fn new() -> Self {
        let zone = match iana_time_zone::get_timezone() {
            Ok(name) => TimeZone::from_id(&name).unwrap_or_else(|| {
                tracing::warn!(zone = %name, "host time zone not in database, using UTC");
                TimeZone::utc()
            }),
            Err(err) => {
                tracing::warn!(error = %err, "host time zone unavailable, using UTC");
                TimeZone::utc()
            }
        };
        Self { zone }
    }

    /// The system clock observed in an explicit zone.
    pub fn in_zone(zone: TimeZone) -> Self {
        Self { zone }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn time_zone(&self) -> TimeZone {
        self.zone
    }
}

// ─── FixedClock ──────────────────────────────────────────────────────

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
    zone: TimeZone,
}

impl FixedClock {
    /// Frozen at `instant`, observed in UTC.
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            zone: TimeZone::utc(),
        }
    }

    /// Observe the frozen instant in `zone`.
    pub fn with_time_zone(mut self, zone: TimeZone) -> Self {
        self.zone = zone;
        self
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }

    fn time_zone(&self) -> TimeZone {
        self.zone
    }
}

// ─── ManualClock ─────────────────────────────────────────────────────

/// A clock that moves only when told to.
///
/// Clones share state, so a test can keep a handle while a schema
/// registry owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    instant: Arc<RwLock<DateTime<Utc>>>,
    zone: TimeZone,
}

impl ManualClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Arc::new(RwLock::new(instant)),
            zone: TimeZone::utc(),
        }
    }

    pub fn with_time_zone(mut self, zone: TimeZone) -> Self {
        self.zone = zone;
        self
    }

    /// Jump to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.instant.write() = instant;
    }

    /// Move forward (or back, for a negative delta). Saturates at the
    /// representable range.
    pub fn advance(&self, delta: TimeDelta) {
        let mut guard = self.instant.write();
        if let Some(next) = guard.checked_add_signed(delta) {
            *guard = next;
        } else {
            tracing::warn!(delta = %delta, "manual clock advance out of range, ignored");
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.read()
    }

    fn time_zone(&self) -> TimeZone {
        self.zone
    }
}
