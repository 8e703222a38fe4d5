//! The validator
//!
//! A [`Validator`] owns a checked schema, the merged function registry, and
//! the compiled plan. Construction does all the configuration checking;
//! [`Validator::validate`] is a pure function of the validator and the data,
//! so one instance can be shared across threads and called concurrently.
//!
//! # Evaluation order
//!
//! For every node, in declaration order:
//!
//! 1. **Type.** A missing value passes. Otherwise the runtime type must match
//!    (nodes with children also accept objects, element schemas accept arrays).
//! 2. **Required.** Only for blank values.
//! 3. **Rules.** Only for non-blank values, in order.
//! 4. **Children.** Element schemas run once per array member; fixed-shape
//!    members run once each.
//!
//! The first failure in steps 1–3 produces the node's only message and skips
//! its children. Siblings and other array elements are always evaluated.

mod builder;
mod plan;

pub use builder::ValidatorBuilder;

use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigurationError, ValidationErrors};
use crate::registry::Context;
use crate::schema::{ConstraintNode, Schema};
use plan::PlanNode;

/// Validates data values against a constraint tree.
///
/// # Examples
///
/// ```
/// use arbiter_validator::prelude::*;
/// use serde_json::json;
///
/// let validator = Validator::new(
///     vec![ConstraintNode::new("name").typed(DataType::String).required(true)],
///     Context::new(),
/// )
/// .unwrap();
///
/// assert!(validator.validate(&json!({"name": "Ada"})).is_ok());
///
/// let errors = validator.validate(&json!({})).unwrap_err();
/// assert_eq!(errors.messages()[0].message, "name is required");
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    schema: Schema,
    context: Context,
    plan: Vec<PlanNode>,
}

impl Validator {
    /// Checks `nodes`, merges `context` over [`Context::builtin`] and compiles
    /// the plan.
    ///
    /// # Errors
    ///
    /// Any [`ConfigurationError`]: a node without type or children, an empty
    /// or duplicate id, or a function name missing from the merged registry.
    pub fn new(nodes: Vec<ConstraintNode>, context: Context) -> Result<Self, ConfigurationError> {
        let schema = Schema::new(nodes)?;
        let context = Context::builtin().merge(context);
        let plan = plan::compile(schema.nodes(), "", &context)?;

        debug!(
            nodes = schema.nodes().len(),
            functions = context.len(),
            "validator constructed"
        );

        Ok(Self {
            schema,
            context,
            plan,
        })
    }

    /// Creates a [`ValidatorBuilder`].
    #[must_use]
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    /// Validates `data`.
    ///
    /// Returns `Ok(())` when valid, otherwise every independent failure in
    /// schema-declaration order.
    pub fn validate(&self, data: &Value) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for node in &self.plan {
            node.validate(node.id(), data, &mut errors);
        }

        debug!(failures = errors.len(), "validation finished");
        errors.into_result(())
    }

    /// Shorthand for `validate(data).is_ok()`.
    #[must_use]
    pub fn is_valid(&self, data: &Value) -> bool {
        self.validate(data).is_ok()
    }

    /// The schema nodes as given, for introspection.
    #[must_use]
    pub fn meta(&self) -> &[ConstraintNode] {
        self.schema.nodes()
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The merged function registry.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Arguments;
    use crate::schema::{DataType, Resolvable};
    use serde_json::json;

    #[test]
    fn test_validator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator>();
    }

    #[test]
    fn test_unknown_function_fails_construction() {
        let err = Validator::new(
            vec![ConstraintNode::new("a")
                .typed(DataType::String)
                .rule(Resolvable::new("isPostcode").target())],
            Context::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownFunction { .. }));
    }

    #[test]
    fn test_caller_functions_override_builtins() {
        let context = Context::new().with_function("isEmpty", |_: &Arguments<'_>| false);
        let validator = Validator::new(
            vec![ConstraintNode::new("a")
                .typed(DataType::String)
                .rule(Resolvable::new("isEmpty").target())],
            context,
        )
        .unwrap();

        assert!(!validator.is_valid(&json!({"a": "x"})));
        assert!(validator.context().contains("lengthAtLeast"));
    }

    #[test]
    fn test_meta_returns_nodes_as_given() {
        let nodes = vec![ConstraintNode::new("a").fields(vec![
            ConstraintNode::new("b").typed(DataType::Boolean),
        ])];
        let validator = Validator::new(nodes.clone(), Context::new()).unwrap();
        assert_eq!(validator.meta(), nodes.as_slice());
    }

    #[test]
    fn test_empty_schema_accepts_anything() {
        let validator = Validator::new(Vec::new(), Context::new()).unwrap();
        assert!(validator.is_valid(&json!(null)));
        assert!(validator.is_valid(&json!({"a": 1})));
    }
}
