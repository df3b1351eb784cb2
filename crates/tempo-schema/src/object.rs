//! # Object Schemas
//!
//! [`ObjectSchema`] validates a map of named fields, each with its own
//! schema. Field schemas are type-erased behind [`AnySchema`] so one
//! object can mix kinds. Each field's key becomes its error path and its
//! default label.

use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::error::{ErrorContext, ErrorDetail, ValidationError};
use crate::messages::{host_message, render, DEFAULT_LABEL};
use crate::schema::Description;
use crate::value::Value;

/// Result of validating one field.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// The validated value, typed when the schema is temporal.
    pub value: Option<Value>,
    pub details: Vec<ErrorDetail>,
}

/// A schema of any kind, as stored inside an object.
pub trait AnySchema: Debug + Send + Sync {
    fn kind_name(&self) -> &'static str;

    /// Validate `value` found at `path`; `key` is the default label.
    fn check(&self, value: &Value, path: &[String], key: Option<&str>) -> Outcome;

    fn describe(&self) -> Description;
}

/// Result of [`ObjectSchema::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedObject {
    /// Validated fields; absent optional fields are omitted.
    pub value: Option<BTreeMap<String, Value>>,
    pub error: Option<ValidationError>,
}

impl ValidatedObject {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// A map of field schemas.
#[derive(Debug)]
pub struct ObjectSchema {
    keys: Vec<(String, Box<dyn AnySchema>)>,
    allow_unknown: bool,
    abort_early: bool,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            allow_unknown: false,
            abort_early: true,
        }
    }

    /// Add or replace the schema for `name`. Fields validate in the order
    /// they were first added.
    pub fn key(mut self, name: impl Into<String>, schema: impl AnySchema + 'static) -> Self {
        let name = name.into();
        let schema: Box<dyn AnySchema> = Box::new(schema);
        match self.keys.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = schema,
            None => self.keys.push((name, schema)),
        }
        self
    }

    /// Pass keys with no schema through instead of rejecting them.
    pub fn unknown(mut self, allow: bool) -> Self {
        self.allow_unknown = allow;
        self
    }

    /// Whether validation stops at the first failing field.
    pub fn abort_early(mut self, enabled: bool) -> Self {
        self.abort_early = enabled;
        self
    }

    pub fn describe(&self) -> Description {
        let mut flags = BTreeMap::new();
        if self.allow_unknown {
            flags.insert("unknown".to_string(), serde_json::json!(true));
        }
        if !self.abort_early {
            flags.insert("abortEarly".to_string(), serde_json::json!(false));
        }
        Description {
            kind: "object".to_string(),
            flags,
            rules: Vec::new(),
            keys: self
                .keys
                .iter()
                .map(|(name, schema)| (name.clone(), schema.describe()))
                .collect(),
        }
    }

    /// Validate a JSON document. Anything but a JSON object fails with
    /// `object.base`.
    pub fn validate(&self, input: &serde_json::Value) -> ValidatedObject {
        match input {
            serde_json::Value::Object(fields) => {
                let fields: BTreeMap<String, Value> = fields
                    .iter()
                    .map(|(key, value)| (key.clone(), Value::from(value.clone())))
                    .collect();
                self.validate_map(&fields)
            }
            _ => {
                let detail = host_detail("object.base", DEFAULT_LABEL, Vec::new());
                ValidatedObject {
                    value: None,
                    error: Some(ValidationError::new(vec![detail])),
                }
            }
        }
    }

    /// Validate already-decoded fields.
    pub fn validate_map(&self, fields: &BTreeMap<String, Value>) -> ValidatedObject {
        let mut output = BTreeMap::new();
        let mut details = Vec::new();

        for (key, schema) in &self.keys {
            let input = fields.get(key).cloned().unwrap_or_default();
            let path = [key.clone()];
            let outcome = schema.check(&input, &path, Some(key));
            if let Some(value) = outcome.value {
                output.insert(key.clone(), value);
            }
            if !outcome.details.is_empty() {
                details.extend(outcome.details);
                if self.abort_early {
                    return self.finish(output, details);
                }
            }
        }

        for (key, value) in fields {
            if self.keys.iter().any(|(known, _)| known == key) {
                continue;
            }
            if self.allow_unknown {
                output.insert(key.clone(), value.clone());
                continue;
            }
            tracing::debug!(key = %key, "unknown key");
            details.push(host_detail("object.unknown", key, vec![key.clone()]));
            if self.abort_early {
                break;
            }
        }

        self.finish(output, details)
    }

    fn finish(&self, output: BTreeMap<String, Value>, details: Vec<ErrorDetail>) -> ValidatedObject {
        ValidatedObject {
            value: Some(output),
            error: (!details.is_empty()).then(|| ValidationError::new(details)),
        }
    }
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new()
    }
}

fn host_detail(code: &str, label: &str, path: Vec<String>) -> ErrorDetail {
    let template = host_message(code).unwrap_or(code);
    let mut context = ErrorContext::new();
    context.insert("label".to_string(), label.to_string());
    ErrorDetail {
        code: code.to_string(),
        message: render(template, label, &context),
        path,
        context,
    }
}
