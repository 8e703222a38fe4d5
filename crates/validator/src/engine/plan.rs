//! Compiled validation plan
//!
//! The schema is compiled once into [`PlanNode`]s whose resolvables are bound
//! to their registry functions. Unknown function names therefore fail at
//! construction, and evaluation never looks anything up by name.

use std::fmt;

use serde_json::Value;
use tracing::trace;

use crate::error::{ConfigurationError, ValidationErrors, ValidationMessage};
use crate::message::{self, FailureKind};
use crate::path::{self, RuntimeType};
use crate::registry::{self, Context, Function, Resolved};
use crate::schema::{Children, ConstraintNode, DataType, ELEMENT_SEGMENT, Required, Resolvable};

// ============================================================================
// BOUND RESOLVABLE
// ============================================================================

/// A resolvable paired with the function its name refers to.
#[derive(Clone)]
pub(crate) struct Bound {
    spec: Resolvable,
    function: Function,
}

impl Bound {
    fn bind(
        spec: &Resolvable,
        context: &Context,
        schema_path: &str,
    ) -> Result<Self, ConfigurationError> {
        let function = context
            .get(&spec.function)
            .ok_or_else(|| ConfigurationError::UnknownFunction {
                function: spec.function.clone(),
                path: schema_path.to_string(),
            })?;
        Ok(Self {
            spec: spec.clone(),
            function: function.clone(),
        })
    }

    fn evaluate(&self, root: &Value, target: &str) -> Resolved {
        registry::call(&self.function, &self.spec, root, target)
    }
}

impl fmt::Debug for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bound")
            .field("function", &self.spec.function)
            .field("arguments", &self.spec.arguments)
            .finish()
    }
}

// ============================================================================
// PLAN NODES
// ============================================================================

#[derive(Debug, Clone)]
enum RequiredCheck {
    Always,
    Message(String),
    When(Bound),
}

impl RequiredCheck {
    /// Failure message if the blank value at `path` is required here.
    fn check(&self, path: &str, root: &Value) -> Option<String> {
        match self {
            Self::Always => Some(FailureKind::Required.default_message(path)),
            Self::Message(template) => Some(message::render(template, path).into_owned()),
            Self::When(bound) => {
                let resolved = bound.evaluate(root, path);
                if !resolved.is_truthy() {
                    return None;
                }
                let template = bound.spec.message.as_deref().or_else(|| resolved.as_text());
                Some(message::compose(template, path, FailureKind::Required))
            }
        }
    }
}

#[derive(Debug, Clone)]
enum Shape {
    Leaf,
    Fields(Vec<PlanNode>),
    Element(Box<PlanNode>),
}

#[derive(Debug, Clone)]
pub(crate) struct PlanNode {
    id: String,
    declared: Option<DataType>,
    expected: DataType,
    required: Option<RequiredCheck>,
    rules: Vec<Bound>,
    shape: Shape,
}

/// Compiles sibling nodes; `parent` is their schema path.
pub(crate) fn compile(
    nodes: &[ConstraintNode],
    parent: &str,
    context: &Context,
) -> Result<Vec<PlanNode>, ConfigurationError> {
    nodes
        .iter()
        .map(|node| compile_node(node, &path::join(parent, &node.id), context))
        .collect()
}

fn compile_node(
    node: &ConstraintNode,
    schema_path: &str,
    context: &Context,
) -> Result<PlanNode, ConfigurationError> {
    let expected =
        node.effective_type()
            .ok_or_else(|| ConfigurationError::MissingTypeOrChildren {
                path: schema_path.to_string(),
            })?;

    let required = match &node.required {
        None | Some(Required::Flag(false)) => None,
        Some(Required::Flag(true)) => Some(RequiredCheck::Always),
        Some(Required::Message(template)) => Some(RequiredCheck::Message(template.clone())),
        Some(Required::When(spec)) => {
            Some(RequiredCheck::When(Bound::bind(spec, context, schema_path)?))
        }
    };

    let rules = node
        .validations
        .iter()
        .map(|rule| Bound::bind(rule, context, schema_path))
        .collect::<Result<Vec<_>, _>>()?;

    let shape = match &node.children {
        None => Shape::Leaf,
        Some(Children::Fields(fields)) => Shape::Fields(compile(fields, schema_path, context)?),
        Some(Children::Element(element)) => {
            let element_path = path::join(schema_path, ELEMENT_SEGMENT);
            Shape::Element(Box::new(compile_node(element, &element_path, context)?))
        }
    };

    Ok(PlanNode {
        id: node.id.clone(),
        declared: node.data_type,
        expected,
        required,
        rules,
        shape,
    })
}

// ============================================================================
// EVALUATION
// ============================================================================

impl PlanNode {
    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    /// Validates the value at `path` and its descendants, appending failures
    /// to `into` in declaration order.
    ///
    /// At most one message comes from this node itself. Once it fails, its
    /// children are not visited.
    pub(crate) fn validate(&self, path: &str, root: &Value, into: &mut ValidationErrors) {
        let value = path::get(root, path);

        if let Some(failure) = self.check(path, root, value) {
            into.add(failure);
            return;
        }

        match &self.shape {
            Shape::Element(element) => {
                if let Some(Value::Array(items)) = value {
                    for index in 0..items.len() {
                        element.validate(&path::join(path, index), root, into);
                    }
                }
            }
            Shape::Fields(fields) => {
                for field in fields {
                    field.validate(&path::join(path, &field.id), root, into);
                }
            }
            Shape::Leaf => {}
        }
    }

    /// Type, then required, then rules. First failure wins.
    fn check(&self, path: &str, root: &Value, value: Option<&Value>) -> Option<ValidationMessage> {
        if let Some(actual) = self.type_mismatch(value) {
            // Undeclared types are reported as `object`, element schemas included.
            let kind = FailureKind::TypeMismatch {
                expected: self.declared.unwrap_or(DataType::Object),
                actual,
            };
            return Some(fail(path, kind.default_message(path), kind));
        }

        if path::is_blank(value) {
            return self
                .required
                .as_ref()
                .and_then(|required| required.check(path, root))
                .map(|message| fail(path, message, FailureKind::Required));
        }

        self.rules.iter().find_map(|rule| {
            if rule.evaluate(root, path).is_truthy() {
                return None;
            }
            let kind = FailureKind::Rule {
                function: &rule.spec.function,
            };
            let message = message::compose(rule.spec.message.as_deref(), path, kind);
            Some(fail(path, message, kind))
        })
    }

    /// Runtime type of `value` when it does not satisfy this node.
    fn type_mismatch(&self, value: Option<&Value>) -> Option<RuntimeType> {
        if self.declared == Some(DataType::Any) {
            return None;
        }
        // A missing value is left to `required`.
        value?;

        let actual = RuntimeType::of(value);
        let implied = match (&self.shape, actual) {
            (Shape::Fields(_) | Shape::Element(_), RuntimeType::Object) => true,
            (Shape::Element(_), RuntimeType::Array) => true,
            _ => false,
        };
        if implied || self.expected.accepts(actual) {
            None
        } else {
            Some(actual)
        }
    }
}

fn fail(path: &str, message: String, kind: FailureKind<'_>) -> ValidationMessage {
    trace!(path, kind = kind.code(), message = %message, "constraint failed");
    ValidationMessage::new(path, message)
}
