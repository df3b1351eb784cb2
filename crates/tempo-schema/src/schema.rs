//! # Schemas
//!
//! [`Schema<T>`] validates one value of kind `T`. It is an immutable
//! builder: every flag or rule method consumes the schema and returns a
//! new one, so a base schema can be cloned and specialized freely.
//!
//! ## Validation order
//!
//! 1. Absent input: the default if one is set, `any.required` if the
//!    schema is required, otherwise nothing.
//! 2. Null input passes only with [`Schema::allow_null`]; otherwise it is
//!    not a value of the kind and fails with the base code.
//! 3. Coercion (unless `convert(false)`), then the defensive type check.
//! 4. Rules, in attachment order. With `abort_early(true)` (the default)
//!    the first failure stops validation.
//!
//! Rules whose limit is `"now"` read the clock on every call, so the same
//! schema can accept a value today and reject it tomorrow.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tempo_core::{Clock, Duration, Kind, Temporal, ZonedDateTime};

use crate::error::{ErrorDetail, SchemaError, ValidationError};
use crate::extension::{Extension, Report};
use crate::kinds::{Ordered, Registered};
use crate::messages::{host_message, render, Messages, DEFAULT_LABEL};
use crate::object::{AnySchema, Outcome};
use crate::value::{Arg, RuleArgs, Value};

/// Whether an absent value is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    #[default]
    Optional,
    Required,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Flags {
    presence: Presence,
    allow_null: bool,
    label: Option<String>,
    convert: bool,
    abort_early: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            presence: Presence::Optional,
            allow_null: false,
            label: None,
            convert: true,
            abort_early: true,
        }
    }
}

/// A rule attached to a schema, under its resolved name.
#[derive(Debug, Clone, PartialEq)]
struct Applied {
    name: &'static str,
    args: RuleArgs,
}

/// Result of [`Schema::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    /// The typed value, when the input was (or coerced to) a value of the
    /// kind. Present alongside a rule failure.
    pub value: Option<T>,
    pub error: Option<ValidationError>,
}

impl<T> Validated<T> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<Option<T>, ValidationError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.value),
        }
    }
}

/// One attached rule as reported by `describe()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDescription {
    pub name: String,
    /// Arguments as supplied; typed values as canonical text.
    pub args: BTreeMap<String, String>,
}

/// Introspection output of a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Description {
    #[serde(rename = "type")]
    pub kind: String,
    /// Flags that differ from their defaults.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: BTreeMap<String, serde_json::Value>,
    pub rules: Vec<RuleDescription>,
    /// Child schemas of an object.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub keys: BTreeMap<String, Description>,
}

/// A schema for values of kind `T`.
#[derive(Debug, Clone)]
pub struct Schema<T: Registered> {
    extension: Arc<Extension<T>>,
    clock: Arc<dyn Clock>,
    flags: Flags,
    default: Option<T>,
    rules: Vec<Applied>,
    messages: Messages,
}

impl<T: Registered> Schema<T> {
    pub(crate) fn new(extension: Arc<Extension<T>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            extension,
            clock,
            flags: Flags::default(),
            default: None,
            rules: Vec::new(),
            messages: Messages::new(),
        }
    }

    pub fn kind(&self) -> Kind {
        T::KIND
    }

    // ─── Flags ───────────────────────────────────────────────────────

    /// Reject absent values with `any.required`.
    pub fn required(mut self) -> Self {
        self.flags.presence = Presence::Required;
        self
    }

    pub fn optional(mut self) -> Self {
        self.flags.presence = Presence::Optional;
        self
    }

    /// Accept null as "no value".
    pub fn allow_null(mut self) -> Self {
        self.flags.allow_null = true;
        self
    }

    /// Value returned for absent input. Rules are not applied to it.
    pub fn default(mut self, value: T) -> Self {
        self.default = Some(value);
        self
    }

    /// Name rendered for `{#label}`.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.flags.label = Some(label.into());
        self
    }

    /// Whether text input is parsed. With `false`, only typed values pass.
    pub fn convert(mut self, enabled: bool) -> Self {
        self.flags.convert = enabled;
        self
    }

    /// Whether validation stops at the first rule failure.
    pub fn abort_early(mut self, enabled: bool) -> Self {
        self.flags.abort_early = enabled;
        self
    }

    /// Replace templates by code, e.g. `temporal.plainDate.min`.
    pub fn messages<K, V>(mut self, overrides: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.messages
            .extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn message(self, code: impl Into<String>, template: impl Into<String>) -> Self {
        self.messages([(code.into(), template.into())])
    }

    // ─── Rules ───────────────────────────────────────────────────────

    /// Attach a rule by name. Aliases are recorded under the rule they
    /// apply. Arguments are checked now; a bad limit is an error here,
    /// not at validation.
    pub fn rule(mut self, name: &str, args: RuleArgs) -> Result<Self, SchemaError> {
        let kind = self.extension.name();
        let def = self
            .extension
            .rule(name)
            .ok_or_else(|| SchemaError::UnknownRule {
                kind,
                rule: name.to_string(),
            })?;
        let applied = def.applied_name();
        def.assert(&args)
            .map_err(|reason| SchemaError::InvalidArgument {
                kind,
                rule: applied,
                reason,
            })?;
        self.rules.push(Applied {
            name: applied,
            args,
        });
        Ok(self)
    }

    // ─── Introspection ───────────────────────────────────────────────

    pub fn describe(&self) -> Description {
        let mut flags = BTreeMap::new();
        if self.flags.presence == Presence::Required {
            flags.insert("presence".to_string(), serde_json::json!("required"));
        }
        if self.flags.allow_null {
            flags.insert("allowNull".to_string(), serde_json::json!(true));
        }
        if let Some(label) = &self.flags.label {
            flags.insert("label".to_string(), serde_json::json!(label));
        }
        if !self.flags.convert {
            flags.insert("convert".to_string(), serde_json::json!(false));
        }
        if !self.flags.abort_early {
            flags.insert("abortEarly".to_string(), serde_json::json!(false));
        }
        if let Some(default) = &self.default {
            flags.insert("default".to_string(), serde_json::json!(default.to_string()));
        }
        Description {
            kind: self.extension.name().to_string(),
            flags,
            rules: self
                .rules
                .iter()
                .map(|applied| RuleDescription {
                    name: applied.name.to_string(),
                    args: applied.args.to_text_map(),
                })
                .collect(),
            keys: BTreeMap::new(),
        }
    }

    // ─── Validation ──────────────────────────────────────────────────

    pub fn validate(&self, value: &Value) -> Validated<T> {
        let (value, details) = self.run(value, &[], None);
        Validated {
            value,
            error: (!details.is_empty()).then(|| ValidationError::new(details)),
        }
    }

    /// Validate at `path`, labelling with `key` unless the schema has its
    /// own label.
    pub(crate) fn run(
        &self,
        value: &Value,
        path: &[String],
        key: Option<&str>,
    ) -> (Option<T>, Vec<ErrorDetail>) {
        let label = self.flags.label.as_deref().or(key).unwrap_or(DEFAULT_LABEL);
        let fail = |report: Report| (None::<T>, vec![self.detail(report, path, label)]);

        match value {
            Value::Undefined => {
                if let Some(default) = &self.default {
                    return (Some(default.clone()), Vec::new());
                }
                if self.flags.presence == Presence::Required {
                    return fail(Report::new("any.required".to_string()));
                }
                return (None, Vec::new());
            }
            Value::Null if self.flags.allow_null => return (None, Vec::new()),
            _ => {}
        }

        let input = if self.flags.convert {
            match self.extension.coerce(value.clone()) {
                Ok(coerced) => coerced,
                Err(report) => return fail(report),
            }
        } else {
            value.clone()
        };
        let typed = match self.extension.validate(input) {
            Ok(typed) => typed,
            Err(report) => return fail(report),
        };

        let mut details = Vec::new();
        for applied in &self.rules {
            let outcome = self.extension.apply(
                applied.name,
                &typed,
                &applied.args,
                self.clock.as_ref(),
            );
            if let Err(report) = outcome {
                details.push(self.detail(report, path, label));
                if self.flags.abort_early {
                    break;
                }
            }
        }
        (Some(typed), details)
    }

    /// Render a report: schema overrides, then kind templates, then host
    /// templates.
    fn detail(&self, report: Report, path: &[String], label: &str) -> ErrorDetail {
        let template = self
            .messages
            .get(&report.code)
            .map(String::as_str)
            .or_else(|| self.extension.message(&report.code))
            .or_else(|| host_message(&report.code))
            .unwrap_or(report.code.as_str());
        let message = render(template, label, &report.context);
        let mut context = report.context;
        context.insert("label".to_string(), label.to_string());
        ErrorDetail {
            code: report.code,
            message,
            path: path.to_vec(),
            context,
        }
    }
}

// ─── Typed rule methods ──────────────────────────────────────────────

impl<T: Ordered> Schema<T> {
    /// On or after `limit`.
    pub fn min(self, limit: impl Into<Arg>) -> Result<Self, SchemaError> {
        self.rule("min", RuleArgs::limit(limit))
    }

    /// On or before `limit`.
    pub fn max(self, limit: impl Into<Arg>) -> Result<Self, SchemaError> {
        self.rule("max", RuleArgs::limit(limit))
    }

    /// Strictly after `limit`.
    pub fn gt(self, limit: impl Into<Arg>) -> Result<Self, SchemaError> {
        self.rule("gt", RuleArgs::limit(limit))
    }

    /// Strictly before `limit`.
    pub fn lt(self, limit: impl Into<Arg>) -> Result<Self, SchemaError> {
        self.rule("lt", RuleArgs::limit(limit))
    }

    /// Alias of [`Schema::min`].
    pub fn gte(self, limit: impl Into<Arg>) -> Result<Self, SchemaError> {
        self.rule("gte", RuleArgs::limit(limit))
    }

    /// Alias of [`Schema::max`].
    pub fn lte(self, limit: impl Into<Arg>) -> Result<Self, SchemaError> {
        self.rule("lte", RuleArgs::limit(limit))
    }
}

impl Schema<Duration> {
    pub fn positive(self) -> Result<Self, SchemaError> {
        self.rule("positive", RuleArgs::new())
    }

    pub fn negative(self) -> Result<Self, SchemaError> {
        self.rule("negative", RuleArgs::new())
    }

    pub fn nonzero(self) -> Result<Self, SchemaError> {
        self.rule("nonzero", RuleArgs::new())
    }
}

impl Schema<ZonedDateTime> {
    /// Require the value's zone identifier to equal `name` exactly.
    pub fn timezone(self, name: impl Into<String>) -> Result<Self, SchemaError> {
        self.rule("timezone", RuleArgs::new().with("timezone", name.into()))
    }
}

impl<T: Registered> AnySchema for Schema<T> {
    fn kind_name(&self) -> &'static str {
        T::KIND.name()
    }

    fn check(&self, value: &Value, path: &[String], key: Option<&str>) -> Outcome {
        let (typed, details) = self.run(value, path, key);
        Outcome {
            value: typed.map(|t| Value::Temporal(t.into_value())),
            details,
        }
    }

    fn describe(&self) -> Description {
        Schema::describe(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TemporalSchemas;
    use tempo_core::{FixedClock, PlainDate};

    fn schemas() -> TemporalSchemas {
        TemporalSchemas::new(FixedClock::new("2024-06-10T12:00:00Z".parse().unwrap())).unwrap()
    }

    fn text(s: &str) -> Value {
        Value::from(s)
    }

    // ---- presence ----

    #[test]
    fn test_absent_optional_passes() {
        let result = schemas().plain_date().validate(&Value::Undefined);
        assert!(result.is_ok());
        assert_eq!(result.value, None);
    }

    #[test]
    fn test_absent_required_fails() {
        let result = schemas().plain_date().required().validate(&Value::Undefined);
        let err = result.error.unwrap();
        assert_eq!(err.code(), "any.required");
        assert_eq!(err.to_string(), "\"value\" is required");
    }

    #[test]
    fn test_default_skips_rules() {
        let fallback = PlainDate::new(2000, 1, 1).unwrap();
        let schema = schemas().plain_date().min("2024-01-01").unwrap().default(fallback);
        let result = schema.validate(&Value::Undefined);
        assert!(result.is_ok());
        assert_eq!(result.value, Some(fallback));
    }

    #[test]
    fn test_null_handling() {
        let schema = schemas().plain_date();
        let err = schema.validate(&Value::Null).error.unwrap();
        assert_eq!(err.code(), "temporal.plainDate.base");
        assert!(schema.allow_null().validate(&Value::Null).is_ok());
    }

    // ---- coercion ----

    #[test]
    fn test_text_is_coerced() {
        let result = schemas().plain_date().validate(&text("20240229"));
        assert_eq!(result.value.map(|d| d.to_string()).as_deref(), Some("2024-02-29"));
    }

    #[test]
    fn test_convert_false_rejects_text() {
        let schema = schemas().plain_date().convert(false);
        assert_eq!(
            schema.validate(&text("2024-02-29")).error.unwrap().code(),
            "temporal.plainDate.base"
        );
        let typed = Value::from(PlainDate::new(2024, 2, 29).unwrap());
        assert!(schema.validate(&typed).is_ok());
    }

    #[test]
    fn test_base_message_and_reason() {
        let err = schemas().plain_date().validate(&text("2021-02-31")).error.unwrap();
        let detail = &err.details()[0];
        assert_eq!(detail.message, "\"value\" must be a valid calendar date");
        assert!(detail.context.contains_key("reason"));
        assert_eq!(detail.context["label"], "value");
    }

    // ---- rules ----

    #[test]
    fn test_rules_in_attachment_order() {
        let schema = schemas()
            .plain_date()
            .max("2024-01-31")
            .unwrap()
            .min("2024-02-01")
            .unwrap()
            .abort_early(false);
        let err = schema.validate(&text("2024-03-01")).error.unwrap();
        assert_eq!(err.codes(), vec!["temporal.plainDate.max"]);

        let err = schema.validate(&text("2024-01-15")).error.unwrap();
        assert_eq!(err.codes(), vec!["temporal.plainDate.min"]);
    }

    #[test]
    fn test_abort_early_collects_all() {
        let base = schemas().duration().positive().unwrap().min("PT1H").unwrap();
        let err = base.clone().validate(&text("-PT5M")).error.unwrap();
        assert_eq!(err.codes(), vec!["temporal.duration.positive"]);
        let err = base.abort_early(false).validate(&text("-PT5M")).error.unwrap();
        assert_eq!(
            err.codes(),
            vec!["temporal.duration.positive", "temporal.duration.min"]
        );
        assert_eq!(
            err.to_string(),
            "\"value\" must be a positive duration. \"value\" must be at least PT1H"
        );
    }

    #[test]
    fn test_rule_failure_keeps_value() {
        let result = schemas().duration().nonzero().unwrap().validate(&text("PT0S"));
        assert_eq!(result.value, Some(Duration::zero()));
        assert!(!result.is_ok());
    }

    #[test]
    fn test_unknown_rule_rejected() {
        let err = schemas()
            .plain_month_day()
            .rule("min", RuleArgs::limit("02-01"))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownRule {
                kind: "plainMonthDay",
                rule: "min".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_limit_rejected_at_attach() {
        let err = schemas().plain_date().gte("2021-02-31").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidArgument { rule: "min", .. }
        ));
        assert!(schemas().instant().min("now").is_err());
    }

    // ---- messages ----

    #[test]
    fn test_message_precedence() {
        let schema = schemas()
            .duration()
            .min("PT1H")
            .unwrap()
            .label("timeout")
            .message("temporal.duration.min", "{#label} too short (min {#limit})");
        let err = schema.validate(&text("PT1M")).error.unwrap();
        assert_eq!(err.to_string(), "\"timeout\" too short (min PT1H)");
    }

    // ---- describe ----

    #[test]
    fn test_describe_records_aliases_under_delegate() {
        let schema = schemas()
            .plain_date()
            .gte("2024-01-01")
            .unwrap()
            .lte(PlainDate::new(2024, 12, 31).unwrap())
            .unwrap()
            .required();
        let description = schema.describe();
        assert_eq!(description.kind, "plainDate");
        let names: Vec<_> = description.rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["min", "max"]);
        assert_eq!(description.rules[1].args["limit"], "2024-12-31");
        assert_eq!(description.flags["presence"], "required");
    }

    #[test]
    fn test_describe_serializes() {
        let schema = schemas().plain_time().min("now").unwrap();
        let json = serde_json::to_value(schema.describe()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "plainTime",
                "rules": [{"name": "min", "args": {"limit": "now"}}]
            })
        );
    }
}
