//! Fluent construction of a [`Validator`].

use crate::error::ConfigurationError;
use crate::registry::{Arguments, Context, Resolved};
use crate::schema::ConstraintNode;

use super::Validator;

/// Collects schema nodes and caller functions, then builds a [`Validator`].
///
/// ```
/// use arbiter_validator::prelude::*;
/// use serde_json::json;
///
/// let validator = Validator::builder()
///     .node(
///         ConstraintNode::new("code")
///             .typed(DataType::String)
///             .rule(Resolvable::new("isUpper").target().with_message("$prop must be upper case")),
///     )
///     .function("isUpper", |args: &Arguments<'_>| {
///         args.str(0).is_some_and(|s| s.chars().all(|c| c.is_ascii_uppercase()))
///     })
///     .build()
///     .unwrap();
///
/// let errors = validator.validate(&json!({"code": "abc"})).unwrap_err();
/// assert_eq!(errors.messages()[0].message, "code must be upper case");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidatorBuilder {
    nodes: Vec<ConstraintNode>,
    context: Context,
}

impl ValidatorBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a root node.
    #[must_use = "builder methods must be chained or built"]
    pub fn node(mut self, node: ConstraintNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Appends several root nodes.
    #[must_use = "builder methods must be chained or built"]
    pub fn nodes(mut self, nodes: impl IntoIterator<Item = ConstraintNode>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    /// Registers one caller function.
    #[must_use = "builder methods must be chained or built"]
    pub fn function<F, R>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&Arguments<'_>) -> R + Send + Sync + 'static,
        R: Into<Resolved>,
    {
        self.context.register(name, function);
        self
    }

    /// Overlays a whole registry; its entries win over earlier ones.
    #[must_use = "builder methods must be chained or built"]
    pub fn context(mut self, context: Context) -> Self {
        self.context = self.context.merge(context);
        self
    }

    /// Runs the construction checks.
    pub fn build(self) -> Result<Validator, ConfigurationError> {
        Validator::new(self.nodes, self.context)
    }
}
