//! # Errors
//!
//! Two failure families, kept apart:
//!
//! - [`SchemaError`]: a schema was configured wrongly (unknown rule,
//!   unparseable limit). Raised when the rule is attached, never during
//!   validation.
//! - [`ValidationError`]: an input failed. Carries one [`ErrorDetail`]
//!   per failure, each keyed by a stable code such as
//!   `temporal.plainDate.min`.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Named values substituted into message templates (`{#limit}`,
/// `{#timezone}`, `{#label}`).
pub type ErrorContext = BTreeMap<String, String>;

/// Attach-time configuration error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The kind defines no rule with this name.
    #[error("unknown rule '{rule}' for {kind}")]
    UnknownRule {
        /// Kind name, e.g. `plainMonthDay`.
        kind: &'static str,
        /// The rule that was requested.
        rule: String,
    },

    /// The rule exists but its arguments were rejected.
    #[error("invalid argument for {kind}.{rule}: {reason}")]
    InvalidArgument {
        /// Kind name.
        kind: &'static str,
        /// Rule name after alias resolution.
        rule: &'static str,
        /// Why the argument was rejected.
        reason: String,
    },
}

/// A single failure with a rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    /// Stable code, e.g. `temporal.duration.positive` or `any.required`.
    pub code: String,
    /// The rendered message.
    pub message: String,
    /// Keys leading to the failing value; empty at the root.
    pub path: Vec<String>,
    /// Substitution values, including `label`.
    pub context: ErrorContext,
}

/// One or more failures from a single `validate()` call.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{}", join_messages(.details))]
pub struct ValidationError {
    details: Vec<ErrorDetail>,
}

fn join_messages(details: &[ErrorDetail]) -> String {
    details
        .iter()
        .map(|d| d.message.as_str())
        .collect::<Vec<_>>()
        .join(". ")
}

impl ValidationError {
    pub(crate) fn new(details: Vec<ErrorDetail>) -> Self {
        Self { details }
    }

    /// All failures, in the order they were found.
    pub fn details(&self) -> &[ErrorDetail] {
        &self.details
    }

    pub fn into_details(self) -> Vec<ErrorDetail> {
        self.details
    }

    /// Code of the first failure.
    pub fn code(&self) -> &str {
        self.details.first().map_or("", |d| d.code.as_str())
    }

    /// Codes of every failure, in order.
    pub fn codes(&self) -> Vec<&str> {
        self.details.iter().map(|d| d.code.as_str()).collect()
    }
}
