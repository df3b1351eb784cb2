//! # Comparison Rule Generator
//!
//! Builds `min`, `max`, `gt`, `lt` and the aliases `gte`, `lte` from a
//! single comparator. Each primitive rule is a tie-break predicate over
//! `compare(value, limit)`:
//!
//! | rule | passes when          |
//! |------|----------------------|
//! | min  | `>= 0` (on or after) |
//! | max  | `<= 0` (on or before)|
//! | gt   | `> 0`                |
//! | lt   | `< 0`                |
//!
//! `gte` and `lte` apply `min` and `max` under the delegate's name, code,
//! and message.
//!
//! ## Limits
//!
//! A limit is either text or a typed value. Text is parsed when the rule
//! is attached (so a bad limit is a [`SchemaError`](crate::SchemaError))
//! and again on every run. The text [`NOW`] is special for kinds that
//! define a current value: it is resolved from the clock on every run,
//! never at attach time.

use std::cmp::Ordering;
use std::sync::Arc;

use tempo_core::{Clock, Temporal};

use crate::descriptor::{CompareFn, Descriptor};
use crate::error::ErrorContext;
use crate::extension::RuleDef;
use crate::value::{Arg, RuleArgs};

/// Sentinel limit resolved to the current value at validation time.
pub const NOW: &str = "now";

const LIMIT: &[&str] = &["limit"];

struct Comparison {
    name: &'static str,
    accepts: fn(Ordering) -> bool,
    message: &'static str,
}

const COMPARISONS: [Comparison; 4] = [
    Comparison {
        name: "min",
        accepts: Ordering::is_ge,
        message: "{#label} must be on or after {#limit}",
    },
    Comparison {
        name: "max",
        accepts: Ordering::is_le,
        message: "{#label} must be on or before {#limit}",
    },
    Comparison {
        name: "gt",
        accepts: Ordering::is_gt,
        message: "{#label} must be after {#limit}",
    },
    Comparison {
        name: "lt",
        accepts: Ordering::is_lt,
        message: "{#label} must be before {#limit}",
    },
];

/// Alias name and the rule it applies.
const ALIASES: [(&str, &str); 2] = [("gte", "min"), ("lte", "max")];

/// Rule entries with their default message (`None` for aliases).
pub(crate) fn comparison_rules<T: Temporal>(
    descriptor: &'static Descriptor<T>,
    compare: CompareFn<T>,
) -> Vec<(RuleDef<T>, Option<&'static str>)> {
    let mut rules: Vec<(RuleDef<T>, Option<&'static str>)> = COMPARISONS
        .iter()
        .map(|comparison| {
            let accepts = comparison.accepts;
            let def = RuleDef::new(
                comparison.name,
                LIMIT,
                Arc::new(move |args: &RuleArgs| assert_limit(descriptor, args)),
                Arc::new(move |value: &T, args: &RuleArgs, clock: &dyn Clock| {
                    check_limit(descriptor, compare, accepts, value, args, clock)
                }),
            );
            (def, Some(comparison.message))
        })
        .collect();

    let aliases: Vec<_> = ALIASES
        .iter()
        .filter_map(|&(alias, target)| {
            rules
                .iter()
                .find(|(def, _)| def.name() == target)
                .map(|(def, _)| (RuleDef::alias(alias, def), None::<&'static str>))
        })
        .collect();
    rules.extend(aliases);
    rules
}

fn is_sentinel<T>(descriptor: &Descriptor<T>, arg: &Arg) -> bool {
    descriptor.current.is_some() && arg.as_text() == Some(NOW)
}

/// Attach-time check: the limit must parse, be of this kind, or be the
/// sentinel on a kind that supports it.
fn assert_limit<T: Temporal>(descriptor: &Descriptor<T>, args: &RuleArgs) -> Result<(), String> {
    let arg = args.get("limit").ok_or("missing argument 'limit'")?;
    if is_sentinel(descriptor, arg) {
        return Ok(());
    }
    match arg {
        Arg::Text(text) => (descriptor.parse)(text).map(drop).map_err(|err| err.to_string()),
        Arg::Temporal(value) => match T::from_value(value) {
            Some(_) => Ok(()),
            None => Err(format!(
                "limit must be a {}, got a {}",
                descriptor.name,
                value.kind().name()
            )),
        },
    }
}

/// Resolve the limit for this run.
fn resolve_limit<T: Temporal>(
    descriptor: &Descriptor<T>,
    arg: &Arg,
    clock: &dyn Clock,
) -> Option<T> {
    match (arg, descriptor.current) {
        (Arg::Text(text), Some(current)) if text == NOW => {
            let limit = current(clock);
            tracing::trace!(kind = descriptor.name, %limit, "resolved current value");
            Some(limit)
        }
        (Arg::Text(text), _) => (descriptor.parse)(text).ok(),
        (Arg::Temporal(value), _) => T::from_value(value).cloned(),
    }
}

fn check_limit<T: Temporal>(
    descriptor: &Descriptor<T>,
    compare: CompareFn<T>,
    accepts: fn(Ordering) -> bool,
    value: &T,
    args: &RuleArgs,
    clock: &dyn Clock,
) -> Result<(), ErrorContext> {
    let Some(arg) = args.get("limit") else {
        return Err(ErrorContext::new());
    };
    let Some(limit) = resolve_limit(descriptor, arg, clock) else {
        // Unreachable for asserted arguments; fail closed.
        tracing::warn!(kind = descriptor.name, limit = %arg, "limit no longer resolves");
        return Err(ErrorContext::from([("limit".to_string(), arg.to_string())]));
    };
    if accepts(compare(value, &limit, clock)) {
        Ok(())
    } else {
        Err(ErrorContext::from([("limit".to_string(), limit.to_string())]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::Extension;
    use crate::kinds;
    use tempo_core::{FixedClock, Instant, PlainDate, PlainYearMonth};

    fn clock() -> FixedClock {
        // 2024-06-10T06:13:20Z
        FixedClock::new(chrono::DateTime::from_timestamp(1_718_000_000, 0).unwrap())
    }

    fn run<T: Temporal>(ext: &Extension<T>, rule: &str, value: &T, limit: &str) -> Result<(), String> {
        ext.apply(rule, value, &RuleArgs::limit(limit), &clock())
            .map_err(|report| report.code)
    }

    // ---- tie-break table ----

    #[test]
    fn test_tie_break_on_equal_values() {
        let ext = Extension::synthesize(&kinds::PLAIN_YEAR_MONTH);
        let v = PlainYearMonth::parse("2024-03").unwrap();
        assert!(run(&ext, "min", &v, "2024-03").is_ok());
        assert!(run(&ext, "max", &v, "2024-03").is_ok());
        assert_eq!(run(&ext, "gt", &v, "2024-03").unwrap_err(), "temporal.plainYearMonth.gt");
        assert_eq!(run(&ext, "lt", &v, "2024-03").unwrap_err(), "temporal.plainYearMonth.lt");
    }

    #[test]
    fn test_strict_rules_on_distinct_values() {
        let ext = Extension::synthesize(&kinds::PLAIN_YEAR_MONTH);
        let v = PlainYearMonth::parse("2024-03").unwrap();
        assert!(run(&ext, "gt", &v, "2024-02").is_ok());
        assert!(run(&ext, "lt", &v, "2024-04").is_ok());
        assert!(run(&ext, "min", &v, "2024-04").is_err());
        assert!(run(&ext, "max", &v, "2024-02").is_err());
    }

    // ---- sentinel ----

    #[test]
    fn test_now_resolves_for_plain_date() {
        let ext = Extension::synthesize(&kinds::PLAIN_DATE);
        let today = PlainDate::parse("2024-06-10").unwrap();
        let yesterday = PlainDate::parse("2024-06-09").unwrap();
        assert!(run(&ext, "min", &today, NOW).is_ok());
        let report = ext
            .apply("min", &yesterday, &RuleArgs::limit(NOW), &clock())
            .unwrap_err();
        assert_eq!(report.context["limit"], "2024-06-10");
    }

    #[test]
    fn test_now_is_plain_text_for_instant() {
        let ext = Extension::synthesize(&kinds::INSTANT);
        let err = ext.rule("min").unwrap().assert(&RuleArgs::limit(NOW)).unwrap_err();
        assert!(err.contains("instant"));
    }

    #[test]
    fn test_assert_rejects_unparseable_and_wrong_kind() {
        let ext = Extension::synthesize(&kinds::PLAIN_DATE);
        let min = ext.rule("min").unwrap();
        assert!(min.assert(&RuleArgs::limit("2021-02-31")).is_err());
        let instant = Instant::parse("2024-01-01T00:00:00Z").unwrap();
        assert!(min
            .assert(&RuleArgs::limit(instant))
            .unwrap_err()
            .contains("got a instant"));
        assert!(min.assert(&RuleArgs::limit(PlainDate::new(2024, 1, 1).unwrap())).is_ok());
    }

    #[test]
    fn test_failure_context_uses_canonical_limit() {
        let ext = Extension::synthesize(&kinds::PLAIN_DATE);
        let v = PlainDate::parse("2024-01-01").unwrap();
        let report = ext
            .apply("min", &v, &RuleArgs::limit("20240102"), &clock())
            .unwrap_err();
        assert_eq!(report.context["limit"], "2024-01-02");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::extension::Extension;
    use crate::kinds;
    use proptest::prelude::*;
    use tempo_core::{FixedClock, PlainDate};

    fn date(offset: i64) -> PlainDate {
        PlainDate::new(2000, 1, 1).and_then(|d| d.add_days(offset)).unwrap()
    }

    proptest! {
        #[test]
        fn prop_tie_break(offset in -100_000i64..100_000) {
            let ext = Extension::synthesize(&kinds::PLAIN_DATE);
            let clock = FixedClock::new(chrono::DateTime::from_timestamp(0, 0).unwrap());
            let v = date(offset);
            let args = RuleArgs::limit(v);
            prop_assert!(ext.apply("min", &v, &args, &clock).is_ok());
            prop_assert!(ext.apply("max", &v, &args, &clock).is_ok());
            prop_assert!(ext.apply("gt", &v, &args, &clock).is_err());
            prop_assert!(ext.apply("lt", &v, &args, &clock).is_err());
        }

        #[test]
        fn prop_alias_equivalence(a in -5_000i64..5_000, b in -5_000i64..5_000) {
            let ext = Extension::synthesize(&kinds::PLAIN_DATE);
            let clock = FixedClock::new(chrono::DateTime::from_timestamp(0, 0).unwrap());
            let (v, limit) = (date(a), RuleArgs::limit(date(b)));
            prop_assert_eq!(
                ext.apply("gte", &v, &limit, &clock),
                ext.apply("min", &v, &limit, &clock)
            );
            prop_assert_eq!(
                ext.apply("lte", &v, &limit, &clock),
                ext.apply("max", &v, &limit, &clock)
            );
        }
    }
}
