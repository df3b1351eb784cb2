//! # Message Templates
//!
//! Templates name substitution tokens as `{#name}`. `{#label}` renders the
//! field label in double quotes; any other token is looked up in the
//! failure's context. Unknown tokens are left as written.

use std::collections::BTreeMap;

use crate::error::ErrorContext;

/// Label used when neither the schema nor an enclosing object names the
/// field.
pub const DEFAULT_LABEL: &str = "value";

/// Codes emitted by the host engine itself, with their templates.
pub const HOST_MESSAGES: &[(&str, &str)] = &[
    ("any.required", "{#label} is required"),
    ("object.base", "{#label} must be an object"),
    ("object.unknown", "{#label} is not allowed"),
];

/// Per-schema template overrides, keyed by code.
pub type Messages = BTreeMap<String, String>;

/// Default host template for `code`.
pub fn host_message(code: &str) -> Option<&'static str> {
    HOST_MESSAGES
        .iter()
        .find(|(host, _)| *host == code)
        .map(|(_, template)| *template)
}

/// Substitute `{#label}` and context tokens into `template`.
pub fn render(template: &str, label: &str, context: &ErrorContext) -> String {
    let mut out = String::with_capacity(template.len() + label.len());
    let mut rest = template;
    while let Some(start) = rest.find("{#") {
        out.push_str(&rest[..start]);
        let token = &rest[start + 2..];
        let Some(end) = token.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &token[..end];
        if key == "label" {
            out.push('"');
            out.push_str(label);
            out.push('"');
        } else if let Some(value) = context.get(key) {
            out.push_str(value);
        } else {
            out.push_str(&rest[start..start + 2 + end + 1]);
        }
        rest = &token[end + 1..];
    }
    out.push_str(rest);
    out
}
