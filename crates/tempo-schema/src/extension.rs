//! # Extension Synthesizer
//!
//! [`Extension::synthesize`] turns one [`Descriptor`] into everything a
//! schema needs for that kind: the message table, the coerce step, the
//! defensive validate step, and the rule table.
//!
//! ## Pipeline
//!
//! ```text
//! input ──coerce──▶ typed value ──validate──▶ T ──rules (attachment order)──▶ ok
//!          │                        │               │
//!          └ <kind>.base            └ <kind>.base    └ <kind>.<rule>
//! ```
//!
//! Coercion never re-parses a value that is already typed, and every
//! parse failure maps to the same `base` code. The parse error text is
//! kept in the `reason` context entry.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tempo_core::{Clock, Temporal};

use crate::compare;
use crate::descriptor::{Descriptor, Predicate};
use crate::error::ErrorContext;
use crate::value::{RuleArgs, Value};

/// Prefix of every code the layer emits.
pub const CODE_PREFIX: &str = "temporal";

/// Build `temporal.<kind>.<rule>`.
pub fn code(kind: &str, rule: &str) -> String {
    format!("{CODE_PREFIX}.{kind}.{rule}")
}

/// A failure before message rendering: the code plus its context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub code: String,
    pub context: ErrorContext,
}

impl Report {
    pub fn new(code: String) -> Self {
        Self {
            code,
            context: ErrorContext::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }
}

pub(crate) type AssertFn = Arc<dyn Fn(&RuleArgs) -> Result<(), String> + Send + Sync>;
pub(crate) type CheckFn<T> =
    Arc<dyn Fn(&T, &RuleArgs, &dyn Clock) -> Result<(), ErrorContext> + Send + Sync>;

/// One entry of a kind's rule table.
pub struct RuleDef<T> {
    name: &'static str,
    delegate: Option<&'static str>,
    params: &'static [&'static str],
    assert: AssertFn,
    check: CheckFn<T>,
}

impl<T> Clone for RuleDef<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            delegate: self.delegate,
            params: self.params,
            assert: Arc::clone(&self.assert),
            check: Arc::clone(&self.check),
        }
    }
}

impl<T> fmt::Debug for RuleDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDef")
            .field("name", &self.name)
            .field("delegate", &self.delegate)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl<T> RuleDef<T> {
    pub(crate) fn new(
        name: &'static str,
        params: &'static [&'static str],
        assert: AssertFn,
        check: CheckFn<T>,
    ) -> Self {
        Self {
            name,
            delegate: None,
            params,
            assert,
            check,
        }
    }

    /// An alias that applies `target` under its own name.
    pub(crate) fn alias(name: &'static str, target: &RuleDef<T>) -> Self {
        Self {
            name,
            delegate: Some(target.name),
            ..target.clone()
        }
    }

    pub(crate) fn from_predicate(predicate: &'static Predicate<T>) -> Self
    where
        T: 'static,
    {
        let check = predicate.check;
        Self::new(
            predicate.name,
            predicate.params,
            Arc::new(predicate.assert),
            Arc::new(move |value: &T, args: &RuleArgs, _clock: &dyn Clock| check(value, args)),
        )
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The rule this one is an alias of.
    pub fn delegate(&self) -> Option<&'static str> {
        self.delegate
    }

    pub fn params(&self) -> &'static [&'static str] {
        self.params
    }

    /// The name failures are reported under.
    pub fn applied_name(&self) -> &'static str {
        self.delegate.unwrap_or(self.name)
    }

    pub fn assert(&self, args: &RuleArgs) -> Result<(), String> {
        for name in args.names() {
            if !self.params.contains(&name) {
                return Err(format!("unexpected argument '{name}'"));
            }
        }
        for param in self.params {
            if args.get(param).is_none() {
                return Err(format!("missing argument '{param}'"));
            }
        }
        (self.assert)(args)
    }

    pub fn check(&self, value: &T, args: &RuleArgs, clock: &dyn Clock) -> Result<(), ErrorContext> {
        (self.check)(value, args, clock)
    }
}

/// The synthesized behavior of one kind.
pub struct Extension<T: 'static> {
    descriptor: &'static Descriptor<T>,
    messages: BTreeMap<String, String>,
    rules: BTreeMap<&'static str, RuleDef<T>>,
}

impl<T: 'static> fmt::Debug for Extension<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("name", &self.descriptor.name)
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<T: Temporal> Extension<T> {
    /// Build the extension for `descriptor`.
    pub fn synthesize(descriptor: &'static Descriptor<T>) -> Self {
        let name = descriptor.name;
        let mut messages = BTreeMap::new();
        messages.insert(
            code(name, "base"),
            format!("{{#label}} must be a valid {}", T::KIND.title()),
        );

        let mut rules = BTreeMap::new();
        if let Some(compare) = descriptor.compare {
            for (def, message) in compare::comparison_rules(descriptor, compare) {
                if let Some(message) = message {
                    messages.insert(code(name, def.name), message.to_string());
                }
                rules.insert(def.name, def);
            }
        }
        for predicate in descriptor.predicates {
            messages.insert(code(name, predicate.name), predicate.message.to_string());
            rules.insert(predicate.name, RuleDef::from_predicate(predicate));
        }
        for (rule, template) in descriptor.messages {
            messages.insert(code(name, rule), (*template).to_string());
        }

        tracing::trace!(kind = name, rules = rules.len(), "extension synthesized");
        Self {
            descriptor,
            messages,
            rules,
        }
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn descriptor(&self) -> &'static Descriptor<T> {
        self.descriptor
    }

    pub fn base_code(&self) -> String {
        code(self.descriptor.name, "base")
    }

    /// Default template for a full code.
    pub fn message(&self, code: &str) -> Option<&str> {
        self.messages.get(code).map(String::as_str)
    }

    pub fn messages(&self) -> &BTreeMap<String, String> {
        &self.messages
    }

    pub fn rule(&self, name: &str) -> Option<&RuleDef<T>> {
        self.rules.get(name)
    }

    /// Rule names, including aliases.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.keys().copied().collect()
    }

    fn base_report(&self) -> Report {
        Report::new(self.base_code())
    }

    /// Turn text into a typed value. Absent, null, and already-typed
    /// values pass through untouched.
    pub fn coerce(&self, value: Value) -> Result<Value, Report> {
        if matches!(value, Value::Undefined | Value::Null) || (self.descriptor.is_instance)(&value) {
            return Ok(value);
        }
        match value {
            Value::Text(text) => match (self.descriptor.parse)(&text) {
                Ok(parsed) => Ok(Value::Temporal(parsed.into_value())),
                Err(err) => {
                    tracing::debug!(kind = self.name(), error = %err, "coercion failed");
                    Err(self.base_report().with("reason", err.to_string()))
                }
            },
            other => {
                tracing::debug!(kind = self.name(), input = other.type_name(), "not coercible");
                Err(self.base_report())
            }
        }
    }

    /// Accept only a typed value of this kind.
    pub fn validate(&self, value: Value) -> Result<T, Report> {
        if !(self.descriptor.is_instance)(&value) {
            return Err(self.base_report());
        }
        match value {
            Value::Temporal(typed) => T::try_from_value(typed).map_err(|_| self.base_report()),
            _ => Err(self.base_report()),
        }
    }

    /// Run one attached rule against a validated value.
    pub fn apply(
        &self,
        rule: &str,
        value: &T,
        args: &RuleArgs,
        clock: &dyn Clock,
    ) -> Result<(), Report> {
        let def = self.rule(rule).ok_or_else(|| Report::new(code(self.name(), rule)))?;
        def.check(value, args, clock).map_err(|context| {
            let code = code(self.name(), def.applied_name());
            tracing::debug!(kind = self.name(), rule = def.applied_name(), %code, "rule failed");
            Report { code, context }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds;
    use tempo_core::{Duration, FixedClock, PlainDate, PlainMonthDay};

    fn clock() -> FixedClock {
        FixedClock::new(chrono::DateTime::from_timestamp(1_718_000_000, 0).unwrap())
    }

    // ---- coerce ----

    #[test]
    fn test_coerce_parses_text() {
        let ext = Extension::synthesize(&kinds::PLAIN_DATE);
        let out = ext.coerce(Value::from("2024-02-29")).unwrap();
        assert_eq!(out, Value::from(PlainDate::new(2024, 2, 29).unwrap()));
    }

    #[test]
    fn test_coerce_passes_through_absent_and_typed() {
        let ext = Extension::synthesize(&kinds::PLAIN_DATE);
        assert_eq!(ext.coerce(Value::Null).unwrap(), Value::Null);
        assert_eq!(ext.coerce(Value::Undefined).unwrap(), Value::Undefined);
        let typed = Value::from(PlainDate::new(2020, 1, 1).unwrap());
        assert_eq!(ext.coerce(typed.clone()).unwrap(), typed);
    }

    #[test]
    fn test_coerce_failures_use_base_code() {
        let ext = Extension::synthesize(&kinds::PLAIN_DATE);
        let report = ext.coerce(Value::from("2021-02-31")).unwrap_err();
        assert_eq!(report.code, "temporal.plainDate.base");
        assert!(report.context["reason"].contains("day out of range"));

        let report = ext.coerce(Value::from(serde_json::json!(20210231))).unwrap_err();
        assert_eq!(report.code, "temporal.plainDate.base");

        // A typed value of another kind is not coerced across kinds.
        let other = Value::from(PlainMonthDay::new(2, 1).unwrap());
        assert!(ext.coerce(other).is_err());
    }

    // ---- validate ----

    #[test]
    fn test_validate_rejects_raw_text() {
        let ext = Extension::synthesize(&kinds::PLAIN_DATE);
        let report = ext.validate(Value::from("2024-01-01")).unwrap_err();
        assert_eq!(report.code, "temporal.plainDate.base");
    }

    // ---- rule table ----

    #[test]
    fn test_ordered_kind_has_comparison_rules() {
        let ext = Extension::synthesize(&kinds::PLAIN_DATE);
        assert_eq!(ext.rule_names(), vec!["gt", "gte", "lt", "lte", "max", "min"]);
        assert_eq!(ext.rule("gte").unwrap().applied_name(), "min");
        assert_eq!(ext.rule("lte").unwrap().delegate(), Some("max"));
    }

    #[test]
    fn test_month_day_has_no_rules() {
        let ext = Extension::synthesize(&kinds::PLAIN_MONTH_DAY);
        assert!(ext.rule_names().is_empty());
        assert_eq!(ext.messages().len(), 1);
        assert_eq!(
            ext.message("temporal.plainMonthDay.base"),
            Some("{#label} must be a valid month-day")
        );
    }

    #[test]
    fn test_descriptor_messages_override_defaults() {
        let ext = Extension::synthesize(&kinds::DURATION);
        assert_eq!(
            ext.message("temporal.duration.min"),
            Some("{#label} must be at least {#limit}")
        );
        assert!(ext.rule("positive").is_some());
    }

    #[test]
    fn test_apply_reports_delegate_code() {
        let ext = Extension::synthesize(&kinds::DURATION);
        let value = Duration::parse("PT1M").unwrap();
        let report = ext
            .apply("gte", &value, &RuleArgs::limit("PT1H"), &clock())
            .unwrap_err();
        assert_eq!(report.code, "temporal.duration.min");
        assert_eq!(report.context["limit"], "PT1H");
    }

    #[test]
    fn test_assert_checks_argument_names() {
        let ext = Extension::synthesize(&kinds::PLAIN_DATE);
        let min = ext.rule("min").unwrap();
        assert!(min.assert(&RuleArgs::new()).unwrap_err().contains("missing"));
        let extra = RuleArgs::limit("2024-01-01").with("other", "x");
        assert!(min.assert(&extra).unwrap_err().contains("unexpected"));
    }
}
