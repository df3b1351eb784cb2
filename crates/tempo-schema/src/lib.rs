//! # tempo-schema: Temporal Schema Validation
//!
//! Validation and coercion for the eight `tempo-core` value kinds, with
//! range, sign, and zone rules.
//!
//! ## Architecture
//!
//! - [`kinds`]: the registry: one declarative [`Descriptor`] per kind.
//! - [`extension`]: the synthesizer: turns a descriptor into coercion,
//!   validation, and a rule table.
//! - [`compare`]: the comparison rule generator (`min`, `max`, `gt`,
//!   `lt`, and the aliases `gte`, `lte`).
//! - [`schema`], [`object`], [`messages`]: the host engine: builders,
//!   composition, message rendering, and `describe()`.
//!
//! ## Example
//!
//! ```
//! use tempo_schema::{TemporalSchemas, Value};
//! use tempo_core::FixedClock;
//!
//! let clock = FixedClock::new("2024-06-10T12:00:00Z".parse().unwrap());
//! let schemas = TemporalSchemas::new(clock).unwrap();
//! let check_in = schemas.plain_date().required().min("now").unwrap();
//!
//! assert!(check_in.validate(&Value::from("2024-06-10")).is_ok());
//! let err = check_in.validate(&Value::from("2024-06-09")).error.unwrap();
//! assert_eq!(err.code(), "temporal.plainDate.min");
//! assert_eq!(err.to_string(), "\"value\" must be on or after 2024-06-10");
//! ```
//!
//! ## Crate Policy
//!
//! - Error codes (`temporal.<kind>.<rule>`) are a public contract and
//!   never change.
//! - Bad input never panics; it produces a [`ValidationError`].
//! - Bad schema configuration is a [`SchemaError`] at attach time.
//! - The only fatal path is the startup [`CapabilityError`].

pub mod compare;
pub mod descriptor;
pub mod error;
pub mod extension;
pub mod kinds;
pub mod messages;
pub mod object;
mod predicate;
pub mod registry;
pub mod schema;
pub mod value;

pub use compare::NOW;
pub use descriptor::{Descriptor, Predicate};
pub use error::{ErrorContext, ErrorDetail, SchemaError, ValidationError};
pub use extension::{Extension, Report, RuleDef};
pub use kinds::{Ordered, Registered};
pub use object::{AnySchema, ObjectSchema, Outcome, ValidatedObject};
pub use registry::{ExtensionInfo, TemporalSchemas};
pub use schema::{Description, Presence, RuleDescription, Schema, Validated};
pub use tempo_core::CapabilityError;
pub use value::{Arg, RuleArgs, Value};
