//! # Type Descriptors
//!
//! One [`Descriptor`] per kind states everything the synthesizer needs:
//! how to recognize a typed value, how to parse text, how (and whether)
//! to order two values, how to produce the current value, and which
//! extra predicates the kind offers. Descriptors are plain data built from
//! function pointers and live in statics.

use std::cmp::Ordering;
use std::fmt;

use tempo_core::{Clock, ParseError, Temporal};

use crate::error::ErrorContext;
use crate::value::{RuleArgs, Value};

/// Three-way comparison. The clock supplies context some kinds need
/// (the reference date for durations); most ignore it.
pub type CompareFn<T> = fn(&T, &T, &dyn Clock) -> Ordering;

/// Produces the kind's current value.
pub type CurrentFn<T> = fn(&dyn Clock) -> T;

/// A kind-specific rule outside the comparison family.
pub struct Predicate<T> {
    pub name: &'static str,
    /// Argument names, in method-signature order.
    pub params: &'static [&'static str],
    /// Default message template.
    pub message: &'static str,
    /// Validates arguments when the rule is attached.
    pub assert: fn(&RuleArgs) -> Result<(), String>,
    /// Validates a value; `Err` carries the message context.
    pub check: fn(&T, &RuleArgs) -> Result<(), ErrorContext>,
}

/// Declarative description of one kind.
pub struct Descriptor<T: 'static> {
    /// Kind name, used in codes as `temporal.<name>.<rule>`.
    pub name: &'static str,
    /// Whether the input is already a typed value of this kind.
    pub is_instance: fn(&Value) -> bool,
    pub parse: fn(&str) -> Result<T, ParseError>,
    /// Absent for kinds without a total order; no comparison rules are
    /// generated for them.
    pub compare: Option<CompareFn<T>>,
    /// Present only for kinds with a notion of "now".
    pub current: Option<CurrentFn<T>>,
    /// Per-rule template overrides, keyed by rule name.
    pub messages: &'static [(&'static str, &'static str)],
    pub predicates: &'static [Predicate<T>],
}

impl<T: 'static> fmt::Debug for Descriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("name", &self.name)
            .field("ordered", &self.compare.is_some())
            .field("current", &self.current.is_some())
            .field(
                "predicates",
                &self.predicates.iter().map(|p| p.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Membership test shared by every descriptor.
pub(crate) fn holds<T: Temporal>(value: &Value) -> bool {
    value.as_temporal::<T>().is_some()
}

/// `compare` for kinds with a natural order.
pub(crate) fn natural_order<T: Ord>(a: &T, b: &T, _clock: &dyn Clock) -> Ordering {
    a.cmp(b)
}
