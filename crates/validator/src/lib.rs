//! # arbiter-validator
//!
//! Validates a nested `serde_json::Value` against a declarative tree of
//! constraints and reports a flat, ordered list of failures addressed by
//! dotted path.
//!
//! ## Quick Start
//!
//! ```rust
//! use arbiter_validator::prelude::*;
//! use serde_json::json;
//!
//! let validator = Validator::new(
//!     vec![
//!         ConstraintNode::new("name").typed(DataType::String).required(true),
//!         ConstraintNode::new("contacts").typed(DataType::Array).element(
//!             ConstraintNode::element_schema().fields(vec![
//!                 ConstraintNode::new("kind")
//!                     .typed(DataType::String)
//!                     .required(true)
//!                     .rule(
//!                         Resolvable::new("oneOf")
//!                             .target()
//!                             .literal(json!(["email", "phone"]))
//!                             .with_message("$prop must be email or phone"),
//!                     ),
//!             ]),
//!         ),
//!     ],
//!     Context::new(),
//! )
//! .unwrap();
//!
//! let errors = validator
//!     .validate(&json!({"name": "Ada", "contacts": [{"kind": "fax"}, {}]}))
//!     .unwrap_err();
//!
//! let found: Vec<_> = errors.iter().map(|m| m.to_string()).collect();
//! assert_eq!(
//!     found,
//!     [
//!         "[contacts.0.kind] contacts.0.kind must be email or phone",
//!         "[contacts.1.kind] contacts.1.kind is required",
//!     ]
//! );
//! ```
//!
//! ## Building Blocks
//!
//! - [`schema`]: [`ConstraintNode`](schema::ConstraintNode) trees, checked by
//!   [`Schema::new`](schema::Schema::new).
//! - [`registry`]: the [`Context`](registry::Context) of named functions used
//!   by rules and dynamic `required` conditions, plus the [`builtins`](registry::builtins).
//! - [`path`]: dotted-path access, runtime type classification, blankness.
//! - [`message`]: `$prop` substitution and default messages.
//! - [`Validator`]: construction checks and the recursive engine.

pub mod engine;
pub mod error;
pub mod message;
pub mod path;
pub mod prelude;
pub mod registry;
pub mod schema;

pub use engine::{Validator, ValidatorBuilder};
pub use error::{ConfigurationError, ValidationErrors, ValidationMessage};
