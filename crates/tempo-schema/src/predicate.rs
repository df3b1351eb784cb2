//! # Extra Predicates
//!
//! Rules outside the comparison family: the sign rules on durations and
//! the exact zone match on zoned date-times. Each is independent; a
//! schema may chain them in any order.

use tempo_core::{Duration, ZonedDateTime};

use crate::descriptor::Predicate;
use crate::error::ErrorContext;
use crate::value::{Arg, RuleArgs};

// ─── Duration sign ───────────────────────────────────────────────────

pub(crate) static DURATION_PREDICATES: [Predicate<Duration>; 3] = [
    Predicate {
        name: "positive",
        params: &[],
        message: "{#label} must be a positive duration",
        assert: no_args,
        check: positive,
    },
    Predicate {
        name: "negative",
        params: &[],
        message: "{#label} must be a negative duration",
        assert: no_args,
        check: negative,
    },
    Predicate {
        name: "nonzero",
        params: &[],
        message: "{#label} must be a nonzero duration",
        assert: no_args,
        check: nonzero,
    },
];

fn no_args(_: &RuleArgs) -> Result<(), String> {
    Ok(())
}

fn positive(value: &Duration, _: &RuleArgs) -> Result<(), ErrorContext> {
    sign_is(value.sign() > 0)
}

fn negative(value: &Duration, _: &RuleArgs) -> Result<(), ErrorContext> {
    sign_is(value.sign() < 0)
}

fn nonzero(value: &Duration, _: &RuleArgs) -> Result<(), ErrorContext> {
    sign_is(value.sign() != 0)
}

fn sign_is(accepted: bool) -> Result<(), ErrorContext> {
    if accepted {
        Ok(())
    } else {
        Err(ErrorContext::new())
    }
}

// ─── Zone match ──────────────────────────────────────────────────────

pub(crate) static ZONED_PREDICATES: [Predicate<ZonedDateTime>; 1] = [Predicate {
    name: "timezone",
    params: &["timezone"],
    message: "{#label} must be in time zone {#timezone}",
    assert: assert_zone_name,
    check: in_zone,
}];

fn assert_zone_name(args: &RuleArgs) -> Result<(), String> {
    match args.get("timezone") {
        Some(Arg::Text(name)) if !name.is_empty() => Ok(()),
        Some(_) => Err("timezone must be a non-empty zone identifier".to_string()),
        None => Err("missing argument 'timezone'".to_string()),
    }
}

/// Exact, case-sensitive match; no alias resolution.
fn in_zone(value: &ZonedDateTime, args: &RuleArgs) -> Result<(), ErrorContext> {
    let expected = args.get("timezone").and_then(Arg::as_text).unwrap_or_default();
    if value.time_zone_id() == expected {
        Ok(())
    } else {
        Err(ErrorContext::from([(
            "timezone".to_string(),
            expected.to_string(),
        )]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run<T>(predicates: &[Predicate<T>], name: &str, value: &T, args: &RuleArgs) -> bool {
        let predicate = predicates.iter().find(|p| p.name == name).unwrap();
        (predicate.check)(value, args).is_ok()
    }

    #[test]
    fn test_sign_rules() {
        let none = RuleArgs::new();
        let cases = [("PT0S", [false, false, false]), ("PT1S", [true, false, true]), ("-P1D", [false, true, true])];
        for (text, [positive, negative, nonzero]) in cases {
            let d = Duration::parse(text).unwrap();
            assert_eq!(run(&DURATION_PREDICATES, "positive", &d, &none), positive, "{text}");
            assert_eq!(run(&DURATION_PREDICATES, "negative", &d, &none), negative, "{text}");
            assert_eq!(run(&DURATION_PREDICATES, "nonzero", &d, &none), nonzero, "{text}");
        }
    }

    #[test]
    fn test_timezone_exact_match() {
        let z = ZonedDateTime::parse("2024-01-01T00:00+05:30[Asia/Calcutta]").unwrap();
        let args = |name: &str| RuleArgs::new().with("timezone", name);
        assert!(run(&ZONED_PREDICATES, "timezone", &z, &args("Asia/Calcutta")));
        // Links are not resolved and matching is case-sensitive.
        assert!(!run(&ZONED_PREDICATES, "timezone", &z, &args("Asia/Kolkata")));
        assert!(!run(&ZONED_PREDICATES, "timezone", &z, &args("asia/calcutta")));
    }

    #[test]
    fn test_timezone_failure_context() {
        let z = ZonedDateTime::parse("2024-01-01T00:00Z[UTC]").unwrap();
        let err = in_zone(&z, &RuleArgs::new().with("timezone", "Europe/Paris")).unwrap_err();
        assert_eq!(err["timezone"], "Europe/Paris");
    }

    #[test]
    fn test_timezone_assert() {
        assert!(assert_zone_name(&RuleArgs::new().with("timezone", "UTC")).is_ok());
        assert!(assert_zone_name(&RuleArgs::new().with("timezone", "")).is_err());
        assert!(assert_zone_name(&RuleArgs::new()).is_err());
    }
}
