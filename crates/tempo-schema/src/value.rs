//! # Input Values and Rule Arguments
//!
//! [`Value`] is what a schema receives: nothing, null, text, some other
//! JSON value, or an already-typed temporal value. [`Arg`] is what a rule
//! receives from the schema author: text or an already-typed value.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use tempo_core::{
    Duration, Instant, PlainDate, PlainDateTime, PlainMonthDay, PlainTime, PlainYearMonth,
    Temporal, TemporalValue, ZonedDateTime,
};

/// Raw input to [`Schema::validate`](crate::Schema::validate).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The key was not supplied at all.
    #[default]
    Undefined,
    Null,
    Text(String),
    /// Any non-string, non-null JSON value.
    Other(serde_json::Value),
    Temporal(TemporalValue),
}

impl Value {
    /// Short type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Text(_) => "string",
            Self::Other(serde_json::Value::Bool(_)) => "boolean",
            Self::Other(serde_json::Value::Number(_)) => "number",
            Self::Other(serde_json::Value::Array(_)) => "array",
            Self::Other(_) => "object",
            Self::Temporal(v) => v.kind().name(),
        }
    }

    /// The typed value of kind `T`, if this holds one.
    pub fn as_temporal<T: Temporal>(&self) -> Option<&T> {
        match self {
            Self::Temporal(v) => T::from_value(v),
            _ => None,
        }
    }

    /// JSON rendering; typed values become canonical text.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Undefined | Self::Null => serde_json::Value::Null,
            Self::Text(text) => serde_json::Value::String(text.clone()),
            Self::Other(json) => json.clone(),
            Self::Temporal(v) => serde_json::Value::String(v.to_string()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::String(text) => Self::Text(text),
            other => Self::Other(other),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<TemporalValue> for Value {
    fn from(value: TemporalValue) -> Self {
        Self::Temporal(value)
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(value: Option<V>) -> Self {
        value.map_or(Self::Undefined, Into::into)
    }
}

// ─── Rule arguments ──────────────────────────────────────────────────

/// A rule argument as supplied by the schema author.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Text: parsed by the kind, or the `"now"` sentinel.
    Text(String),
    /// An already-typed value.
    Temporal(TemporalValue),
}

impl Arg {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Temporal(_) => None,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Temporal(v) => v.fmt(f),
        }
    }
}

impl Serialize for Arg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for Arg {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Arg {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<TemporalValue> for Arg {
    fn from(value: TemporalValue) -> Self {
        Self::Temporal(value)
    }
}

macro_rules! from_kind {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Temporal(value.into_value())
                }
            }

            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Self::Temporal(value.into_value())
                }
            }
        )*
    };
}

from_kind!(
    PlainDate,
    PlainTime,
    PlainDateTime,
    ZonedDateTime,
    Instant,
    Duration,
    PlainYearMonth,
    PlainMonthDay,
);

/// Named arguments of one attached rule.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct RuleArgs(BTreeMap<String, Arg>);

impl RuleArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arguments for a comparison rule.
    pub fn limit(limit: impl Into<Arg>) -> Self {
        Self::new().with("limit", limit)
    }

    pub fn with(mut self, name: &str, arg: impl Into<Arg>) -> Self {
        self.0.insert(name.to_string(), arg.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arg> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Arguments as literal text, for introspection.
    pub fn to_text_map(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(name, arg)| (name.clone(), arg.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        assert_eq!(Value::from(json!(null)), Value::Null);
        assert_eq!(Value::from(json!("2024-01-01")), Value::Text("2024-01-01".into()));
        assert_eq!(Value::from(json!(42)).type_name(), "number");
        assert_eq!(Value::from(json!({"a": 1})).type_name(), "object");
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<&str>), Value::Undefined);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }

    #[test]
    fn test_as_temporal() {
        let date = PlainDate::parse("2024-02-29").unwrap();
        let value = Value::from(date);
        assert_eq!(value.as_temporal::<PlainDate>(), Some(&date));
        assert_eq!(value.as_temporal::<PlainTime>(), None);
        assert_eq!(value.type_name(), "plainDate");
        assert_eq!(value.to_json(), json!("2024-02-29"));
    }

    #[test]
    fn test_rule_args_text_map_uses_canonical_text() {
        let args = RuleArgs::limit(Duration::parse("pt90m").unwrap());
        assert_eq!(args.to_text_map().get("limit").map(String::as_str), Some("PT90M"));
        assert_eq!(args.names().collect::<Vec<_>>(), vec!["limit"]);
    }

    #[test]
    fn test_args_serialize_as_map_of_text() {
        let args = RuleArgs::limit("now");
        assert_eq!(serde_json::to_value(&args).unwrap(), json!({"limit": "now"}));
    }
}
