//! Prelude module for convenient imports.
//!
//! ```rust
//! use arbiter_validator::prelude::*;
//!
//! let node = ConstraintNode::new("age")
//!     .typed(DataType::Number)
//!     .rule(Resolvable::new("minimum").target().arg(18));
//! let validator = Validator::new(vec![node], Context::new()).unwrap();
//! # let _ = validator;
//! ```

pub use crate::engine::{Validator, ValidatorBuilder};
pub use crate::error::{ConfigurationError, ValidationErrors, ValidationMessage};
pub use crate::registry::{Arguments, Context, Resolved};
pub use crate::schema::{ArgumentSpec, Children, ConstraintNode, DataType, Required, Resolvable};
