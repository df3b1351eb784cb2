//! # Typed Values
//!
//! [`Temporal`] is the common surface of the eight kinds: each knows its
//! [`Kind`], parses itself from text, and moves in and out of the
//! [`TemporalValue`] union that carries already-typed input.
//!
//! Every kind serializes to and deserializes from its canonical text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::duration::Duration;
use crate::error::ParseError;
use crate::exact::{Instant, ZonedDateTime};
use crate::kind::Kind;
use crate::plain::{PlainDate, PlainDateTime, PlainMonthDay, PlainTime, PlainYearMonth};

/// A date/time value kind.
pub trait Temporal:
    Clone + fmt::Debug + fmt::Display + PartialEq + Send + Sync + 'static
{
    /// The kind this type implements.
    const KIND: Kind;

    /// Parse text in any accepted form.
    fn parse(text: &str) -> Result<Self, ParseError>;

    /// Borrow the value if `value` holds this kind.
    fn from_value(value: &TemporalValue) -> Option<&Self>;

    /// Take the value out if `value` holds this kind, else hand it back.
    fn try_from_value(value: TemporalValue) -> Result<Self, TemporalValue>;

    fn into_value(self) -> TemporalValue;
}

/// An already-typed value of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TemporalValue {
    PlainDate(PlainDate),
    PlainTime(PlainTime),
    PlainDateTime(PlainDateTime),
    ZonedDateTime(ZonedDateTime),
    Instant(Instant),
    Duration(Duration),
    PlainYearMonth(PlainYearMonth),
    PlainMonthDay(PlainMonthDay),
}

impl TemporalValue {
    pub fn kind(&self) -> Kind {
        match self {
            Self::PlainDate(_) => Kind::PlainDate,
            Self::PlainTime(_) => Kind::PlainTime,
            Self::PlainDateTime(_) => Kind::PlainDateTime,
            Self::ZonedDateTime(_) => Kind::ZonedDateTime,
            Self::Instant(_) => Kind::Instant,
            Self::Duration(_) => Kind::Duration,
            Self::PlainYearMonth(_) => Kind::PlainYearMonth,
            Self::PlainMonthDay(_) => Kind::PlainMonthDay,
        }
    }
}

impl fmt::Display for TemporalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlainDate(v) => v.fmt(f),
            Self::PlainTime(v) => v.fmt(f),
            Self::PlainDateTime(v) => v.fmt(f),
            Self::ZonedDateTime(v) => v.fmt(f),
            Self::Instant(v) => v.fmt(f),
            Self::Duration(v) => v.fmt(f),
            Self::PlainYearMonth(v) => v.fmt(f),
            Self::PlainMonthDay(v) => v.fmt(f),
        }
    }
}

/// Wire a kind into [`Temporal`], [`FromStr`], serde, and the
/// [`TemporalValue`] union.
macro_rules! temporal_kind {
    ($ty:ident) => {
        impl Temporal for $ty {
            const KIND: Kind = Kind::$ty;

            fn parse(text: &str) -> Result<Self, ParseError> {
                $ty::parse(text)
            }

            fn from_value(value: &TemporalValue) -> Option<&Self> {
                match value {
                    TemporalValue::$ty(v) => Some(v),
                    _ => None,
                }
            }

            fn try_from_value(value: TemporalValue) -> Result<Self, TemporalValue> {
                match value {
                    TemporalValue::$ty(v) => Ok(v),
                    other => Err(other),
                }
            }

            fn into_value(self) -> TemporalValue {
                TemporalValue::$ty(self)
            }
        }

        impl From<$ty> for TemporalValue {
            fn from(value: $ty) -> Self {
                TemporalValue::$ty(value)
            }
        }

        impl FromStr for $ty {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::parse(s)
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                $ty::parse(&text).map_err(serde::de::Error::custom)
            }
        }
    };
}

temporal_kind!(PlainDate);
temporal_kind!(PlainTime);
temporal_kind!(PlainDateTime);
temporal_kind!(ZonedDateTime);
temporal_kind!(Instant);
temporal_kind!(Duration);
temporal_kind!(PlainYearMonth);
temporal_kind!(PlainMonthDay);

impl Serialize for TemporalValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- union ----

    #[test]
    fn test_value_kind_matches_variant() {
        let date = PlainDate::parse("2024-02-29").unwrap();
        let value: TemporalValue = date.into();
        assert_eq!(value.kind(), Kind::PlainDate);
        assert_eq!(PlainDate::from_value(&value), Some(&date));
        assert_eq!(PlainTime::from_value(&value), None);
    }

    #[test]
    fn test_try_from_value_hands_back_other_kinds() {
        let value = Duration::parse("PT1H").unwrap().into_value();
        let back = PlainDate::try_from_value(value.clone()).unwrap_err();
        assert_eq!(back, value);
        assert!(Duration::try_from_value(value).is_ok());
    }

    // ---- serde ----

    #[test]
    fn test_serde_uses_canonical_text() {
        let zoned = ZonedDateTime::parse("2024-01-01T00:00+01:00[Europe/Paris]").unwrap();
        let json = serde_json::to_string(&zoned).unwrap();
        assert_eq!(json, "\"2024-01-01T00:00:00+01:00[Europe/Paris]\"");
        let back: ZonedDateTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, zoned);
    }

    #[test]
    fn test_deserialize_rejects_invalid_text() {
        let result: Result<PlainDate, _> = serde_json::from_str("\"2021-02-31\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_str() {
        let md: PlainMonthDay = "--02-29".parse().unwrap();
        assert_eq!(md.to_string(), "02-29");
    }

    #[test]
    fn test_kind_constants() {
        assert_eq!(<PlainYearMonth as Temporal>::KIND, Kind::PlainYearMonth);
        assert_eq!(<Instant as Temporal>::KIND.name(), "instant");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn reparse<T: Temporal>(text: &str) -> (T, T) {
        let first = T::parse(text).unwrap();
        let second = T::parse(&first.to_string()).unwrap();
        (first, second)
    }

    proptest! {
        #[test]
        fn prop_plain_date_roundtrip(y in -9999i32..=9999, m in 1u32..=12, d in 1u32..=28) {
            let text = PlainDate::new(y, m, d).unwrap().to_string();
            let (a, b) = reparse::<PlainDate>(&text);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_plain_time_roundtrip(h in 0u32..24, mi in 0u32..60, s in 0u32..60, ns in 0u32..1_000_000_000) {
            let text = PlainTime::with_nanos(h, mi, s, ns).unwrap().to_string();
            let (a, b) = reparse::<PlainTime>(&text);
            prop_assert_eq!(a, b);
            prop_assert_eq!(a.nanosecond(), ns);
        }

        #[test]
        fn prop_duration_roundtrip(
            negative in any::<bool>(),
            years in 0u64..1000,
            days in 0u64..10_000,
            hours in 0u64..100,
            millis in 0u64..1000,
        ) {
            let sign = if negative { "-" } else { "" };
            let text = format!("{sign}P{years}Y{days}DT{hours}H0.{millis:03}S");
            let (a, b) = reparse::<Duration>(&text);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_instant_roundtrip(secs in -62_135_596_800i64..253_402_300_799, ns in 0u32..1_000_000_000) {
            let instant = Instant::from_utc(chrono::DateTime::from_timestamp(secs, ns).unwrap());
            let (a, b) = reparse::<Instant>(&instant.to_string());
            prop_assert_eq!(a, instant);
            prop_assert_eq!(b, instant);
        }
    }
}
