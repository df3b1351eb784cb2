//! # Type Registry
//!
//! The eight descriptors, one per kind. Everything kind-specific in the
//! layer is here; the synthesizer is generic over these records.
//!
//! | kind           | ordered by            | `"now"` | extra rules       |
//! |----------------|-----------------------|---------|-------------------|
//! | plainDate      | calendar              | yes     |                   |
//! | plainTime      | clock time            | yes     |                   |
//! | plainDateTime  | calendar + clock time | yes     |                   |
//! | zonedDateTime  | instant               | no      | `timezone`        |
//! | instant        | instant               | no      |                   |
//! | duration       | length from today     | no      | sign rules        |
//! | plainYearMonth | calendar              | no      |                   |
//! | plainMonthDay  | (unordered)           | no      |                   |

use std::cmp::Ordering;
use std::sync::Arc;

use tempo_core::{
    Clock, Duration, Instant, PlainDate, PlainDateTime, PlainMonthDay, PlainTime,
    PlainYearMonth, Temporal, ZonedDateTime,
};

use crate::descriptor::{holds, natural_order, Descriptor};
use crate::extension::Extension;
use crate::predicate::{DURATION_PREDICATES, ZONED_PREDICATES};
use crate::registry::TemporalSchemas;

pub static PLAIN_DATE: Descriptor<PlainDate> = Descriptor {
    name: "plainDate",
    is_instance: holds::<PlainDate>,
    parse: PlainDate::parse,
    compare: Some(natural_order::<PlainDate>),
    current: Some(PlainDate::current),
    messages: &[],
    predicates: &[],
};

pub static PLAIN_TIME: Descriptor<PlainTime> = Descriptor {
    name: "plainTime",
    is_instance: holds::<PlainTime>,
    parse: PlainTime::parse,
    compare: Some(natural_order::<PlainTime>),
    current: Some(PlainTime::current),
    messages: &[],
    predicates: &[],
};

pub static PLAIN_DATE_TIME: Descriptor<PlainDateTime> = Descriptor {
    name: "plainDateTime",
    is_instance: holds::<PlainDateTime>,
    parse: PlainDateTime::parse,
    compare: Some(natural_order::<PlainDateTime>),
    current: Some(PlainDateTime::current),
    messages: &[],
    predicates: &[],
};

pub static ZONED_DATE_TIME: Descriptor<ZonedDateTime> = Descriptor {
    name: "zonedDateTime",
    is_instance: holds::<ZonedDateTime>,
    parse: ZonedDateTime::parse,
    compare: Some(instant_order),
    current: None,
    messages: &[],
    predicates: &ZONED_PREDICATES,
};

pub static INSTANT: Descriptor<Instant> = Descriptor {
    name: "instant",
    is_instance: holds::<Instant>,
    parse: Instant::parse,
    compare: Some(natural_order::<Instant>),
    current: None,
    messages: &[],
    predicates: &[],
};

pub static DURATION: Descriptor<Duration> = Descriptor {
    name: "duration",
    is_instance: holds::<Duration>,
    parse: Duration::parse,
    compare: Some(duration_order),
    current: None,
    messages: &[
        ("min", "{#label} must be at least {#limit}"),
        ("max", "{#label} must be at most {#limit}"),
        ("gt", "{#label} must be greater than {#limit}"),
        ("lt", "{#label} must be less than {#limit}"),
    ],
    predicates: &DURATION_PREDICATES,
};

pub static PLAIN_YEAR_MONTH: Descriptor<PlainYearMonth> = Descriptor {
    name: "plainYearMonth",
    is_instance: holds::<PlainYearMonth>,
    parse: PlainYearMonth::parse,
    compare: Some(natural_order::<PlainYearMonth>),
    current: None,
    messages: &[],
    predicates: &[],
};

/// A month-day repeats every year and cannot be ordered without one.
pub static PLAIN_MONTH_DAY: Descriptor<PlainMonthDay> = Descriptor {
    name: "plainMonthDay",
    is_instance: holds::<PlainMonthDay>,
    parse: PlainMonthDay::parse,
    compare: None,
    current: None,
    messages: &[],
    predicates: &[],
};

fn instant_order(a: &ZonedDateTime, b: &ZonedDateTime, _clock: &dyn Clock) -> Ordering {
    a.compare_instant(b)
}

/// Calendar units are measured from the clock's current date.
fn duration_order(a: &Duration, b: &Duration, clock: &dyn Clock) -> Ordering {
    a.compare(b, PlainDate::current(clock))
}

// ─── Typed access ────────────────────────────────────────────────────

/// A kind with a descriptor and a synthesized extension.
pub trait Registered: Temporal {
    fn descriptor() -> &'static Descriptor<Self>;

    /// This kind's extension within a registry.
    fn extension(schemas: &TemporalSchemas) -> &Arc<Extension<Self>>;
}

/// A kind with a total order. Only these schemas expose `min`, `max`,
/// `gt`, `lt`, `gte` and `lte`.
pub trait Ordered: Registered {}

macro_rules! registered {
    ($ty:ty, $descriptor:ident, $field:ident) => {
        impl Registered for $ty {
            fn descriptor() -> &'static Descriptor<Self> {
                &$descriptor
            }

            fn extension(schemas: &TemporalSchemas) -> &Arc<Extension<Self>> {
                &schemas.$field
            }
        }
    };
}

registered!(PlainDate, PLAIN_DATE, plain_date);
registered!(PlainTime, PLAIN_TIME, plain_time);
registered!(PlainDateTime, PLAIN_DATE_TIME, plain_date_time);
registered!(ZonedDateTime, ZONED_DATE_TIME, zoned_date_time);
registered!(Instant, INSTANT, instant);
registered!(Duration, DURATION, duration);
registered!(PlainYearMonth, PLAIN_YEAR_MONTH, plain_year_month);
registered!(PlainMonthDay, PLAIN_MONTH_DAY, plain_month_day);

impl Ordered for PlainDate {}
impl Ordered for PlainTime {}
impl Ordered for PlainDateTime {}
impl Ordered for ZonedDateTime {}
impl Ordered for Instant {}
impl Ordered for Duration {}
impl Ordered for PlainYearMonth {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_core::{FixedClock, Kind};

    fn assert_named<T: Registered>() {
        assert_eq!(T::descriptor().name, T::KIND.name());
    }

    #[test]
    fn test_descriptor_names_match_kinds() {
        assert_named::<PlainDate>();
        assert_named::<PlainTime>();
        assert_named::<PlainDateTime>();
        assert_named::<ZonedDateTime>();
        assert_named::<Instant>();
        assert_named::<Duration>();
        assert_named::<PlainYearMonth>();
        assert_named::<PlainMonthDay>();
    }

    #[test]
    fn test_only_month_day_is_unordered() {
        assert!(PLAIN_MONTH_DAY.compare.is_none());
        assert!(PLAIN_YEAR_MONTH.compare.is_some());
        assert_eq!(Kind::ALL.len(), 8);
    }

    #[test]
    fn test_now_only_on_plain_kinds() {
        assert!(PLAIN_DATE.current.is_some());
        assert!(PLAIN_TIME.current.is_some());
        assert!(PLAIN_DATE_TIME.current.is_some());
        assert!(INSTANT.current.is_none());
        assert!(ZONED_DATE_TIME.current.is_none());
        assert!(DURATION.current.is_none());
    }

    #[test]
    fn test_duration_order_uses_clock_date() {
        let leap = FixedClock::new("2024-02-01T12:00:00Z".parse().unwrap());
        let plain = FixedClock::new("2023-02-01T12:00:00Z".parse().unwrap());
        let month = Duration::parse("P1M").unwrap();
        let days = Duration::parse("P29D").unwrap();
        assert_eq!(duration_order(&month, &days, &leap), Ordering::Equal);
        assert_eq!(duration_order(&month, &days, &plain), Ordering::Less);
    }

    #[test]
    fn test_zoned_order_is_by_instant() {
        let clock = FixedClock::new("2024-01-01T00:00:00Z".parse().unwrap());
        let a = ZonedDateTime::parse("2024-01-01T01:00+01:00[Europe/Paris]").unwrap();
        let b = ZonedDateTime::parse("2024-01-01T00:00+00:00[UTC]").unwrap();
        assert_eq!(instant_order(&a, &b, &clock), Ordering::Equal);
    }
}
