//! Property tests across the public schema API.

use proptest::prelude::*;
use tempo_core::{Duration, DurationUnits, FixedClock, PlainDate, PlainTime};
use tempo_schema::{TemporalSchemas, Value};

fn schemas() -> TemporalSchemas {
    TemporalSchemas::new(FixedClock::new("2024-06-10T12:00:00Z".parse().unwrap())).unwrap()
}

fn any_date() -> impl Strategy<Value = PlainDate> {
    (1900i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| PlainDate::new(y, m, d).unwrap())
}

fn any_time() -> impl Strategy<Value = PlainTime> {
    (0u32..24, 0u32..60, 0u32..60).prop_map(|(h, m, s)| PlainTime::new(h, m, s).unwrap())
}

fn any_fixed_duration() -> impl Strategy<Value = Duration> {
    (any::<bool>(), 0u64..48, 0u64..120, 0u64..3600).prop_map(|(negative, hours, minutes, seconds)| {
        let units = DurationUnits {
            hours,
            minutes,
            seconds,
            ..DurationUnits::default()
        };
        Duration::new(units, negative)
    })
}

proptest! {
    #[test]
    fn typed_date_passes_through_unchanged(date in any_date()) {
        let result = schemas().plain_date().validate(&Value::from(date));
        prop_assert!(result.is_ok());
        prop_assert_eq!(result.value, Some(date));
    }

    #[test]
    fn canonical_text_revalidates_to_same_value(time in any_time()) {
        let schema = schemas().plain_time();
        let first = schema.validate(&Value::from(time.to_string())).value.unwrap();
        let second = schema.validate(&Value::from(first.to_string())).value.unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(first, time);
    }

    #[test]
    fn aliases_behave_like_their_targets(date in any_date(), limit in any_date()) {
        let s = schemas();
        let input = Value::from(date);
        let min = s.plain_date().min(limit).unwrap().validate(&input);
        let gte = s.plain_date().gte(limit).unwrap().validate(&input);
        prop_assert_eq!(min, gte);

        let max = s.plain_date().max(limit).unwrap().validate(&input);
        let lte = s.plain_date().lte(limit).unwrap().validate(&input);
        prop_assert_eq!(max, lte);
    }

    #[test]
    fn value_as_its_own_limit(duration in any_fixed_duration()) {
        let s = schemas();
        let input = Value::from(duration);
        prop_assert!(s.duration().min(duration).unwrap().validate(&input).is_ok());
        prop_assert!(s.duration().max(duration).unwrap().validate(&input).is_ok());
        prop_assert!(!s.duration().gt(duration).unwrap().validate(&input).is_ok());
        prop_assert!(!s.duration().lt(duration).unwrap().validate(&input).is_ok());
    }

    #[test]
    fn strict_and_inclusive_bounds_agree(date in any_date(), limit in any_date()) {
        let s = schemas();
        let input = Value::from(date);
        let gt = s.plain_date().gt(limit).unwrap().validate(&input).is_ok();
        let min = s.plain_date().min(limit).unwrap().validate(&input).is_ok();
        prop_assert_eq!(gt, date > limit);
        prop_assert_eq!(min, date >= limit);
    }

    #[test]
    fn sign_rules_partition_durations(duration in any_fixed_duration()) {
        let s = schemas();
        let input = Value::from(duration);
        let positive = s.duration().positive().unwrap().validate(&input).is_ok();
        let negative = s.duration().negative().unwrap().validate(&input).is_ok();
        let nonzero = s.duration().nonzero().unwrap().validate(&input).is_ok();
        prop_assert_eq!(nonzero, !duration.is_zero());
        prop_assert_eq!(u8::from(positive) + u8::from(negative), u8::from(nonzero));
    }
}
