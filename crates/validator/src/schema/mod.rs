//! Constraint schema
//!
//! A schema is an ordered list of [`ConstraintNode`]s. Each node describes the
//! expected runtime type of one field, whether it is required, the rules it
//! must satisfy, and optionally its children:
//!
//! - [`Children::Fields`]: fixed-shape object members, addressed by `id`.
//! - [`Children::Element`]: one element schema broadcast over every member of
//!   an array, addressed by index.
//!
//! [`Schema::new`] checks the tree eagerly. A node must declare a `type` or
//! `children`; root nodes and fixed-shape members need a non-empty id, free of
//! the `.` separator, that is unique among their siblings.
//!
//! # Examples
//!
//! ```
//! use arbiter_validator::schema::{ConstraintNode, DataType, Resolvable, Schema};
//!
//! let schema = Schema::new(vec![
//!     ConstraintNode::new("name").typed(DataType::String).required(true),
//!     ConstraintNode::new("tags").element(
//!         ConstraintNode::element_schema()
//!             .typed(DataType::String)
//!             .rule(Resolvable::new("lengthAtLeast").target().arg(2)),
//!     ),
//! ])
//! .unwrap();
//!
//! assert_eq!(schema.nodes().len(), 2);
//! ```

mod argument;

pub use argument::{ArgumentSpec, PATH_PREFIX, TARGET_TOKEN};

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::path::{self, RuntimeType};

/// Schema path segment standing for an array element schema.
pub(crate) const ELEMENT_SEGMENT: &str = "*";

// ============================================================================
// DATA TYPE
// ============================================================================

/// Declared type of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Function,
    /// Accepts every value.
    Any,
}

impl DataType {
    /// Whether a value of runtime category `actual` satisfies this type.
    #[must_use]
    pub fn accepts(self, actual: RuntimeType) -> bool {
        matches!(
            (self, actual),
            (Self::Any, _)
                | (Self::String, RuntimeType::String)
                | (Self::Number, RuntimeType::Number)
                | (Self::Boolean, RuntimeType::Boolean)
                | (Self::Object, RuntimeType::Object)
                | (Self::Array, RuntimeType::Array)
                | (Self::Function, RuntimeType::Function)
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Function => "function",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RESOLVABLE
// ============================================================================

/// A named function call evaluated against the root data.
///
/// Used both as a validation rule and as a dynamic `required` condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolvable {
    /// Registry name of the function to call.
    #[serde(alias = "fn")]
    pub function: String,
    /// Arguments, resolved in order before the call.
    #[serde(default, alias = "args", skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentSpec>,
    /// Failure message template; may contain `$prop`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Resolvable {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            arguments: Vec::new(),
            message: None,
        }
    }

    /// Appends an argument. Strings follow the `$value` / `$.path` conventions.
    #[must_use = "builder methods must be chained or built"]
    pub fn arg(mut self, argument: impl Into<ArgumentSpec>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    /// Appends the current target value as an argument.
    #[must_use = "builder methods must be chained or built"]
    pub fn target(self) -> Self {
        self.arg(ArgumentSpec::Target)
    }

    /// Appends the value at an absolute path as an argument.
    #[must_use = "builder methods must be chained or built"]
    pub fn path(self, path: impl Into<String>) -> Self {
        self.arg(ArgumentSpec::Path(path.into()))
    }

    /// Appends a literal, bypassing the string conventions.
    #[must_use = "builder methods must be chained or built"]
    pub fn literal(self, value: impl Into<serde_json::Value>) -> Self {
        self.arg(ArgumentSpec::Literal(value.into()))
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

// ============================================================================
// REQUIRED / CHILDREN
// ============================================================================

/// The `required` setting of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Required {
    /// `true` requires a non-blank value with the default message;
    /// `false` is the same as not setting `required`.
    Flag(bool),
    /// Required, failing with this message template.
    Message(String),
    /// Required when the resolvable evaluates truthy.
    When(Resolvable),
}

impl From<bool> for Required {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<&str> for Required {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for Required {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<Resolvable> for Required {
    fn from(resolvable: Resolvable) -> Self {
        Self::When(resolvable)
    }
}

/// Children of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Children {
    /// Fixed-shape object members; implies `object` when no type is declared.
    Fields(Vec<ConstraintNode>),
    /// Element schema applied to every array member; implies `array`.
    Element(Box<ConstraintNode>),
}

// ============================================================================
// CONSTRAINT NODE
// ============================================================================

/// One schema unit describing a single field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstraintNode {
    /// Local path segment. Unused (and usually empty) for element schemas.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Required>,

    /// Rules checked in order; the first failure wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validations: Vec<Resolvable>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Children>,
}

impl ConstraintNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// A node without an id, for use as an array element schema.
    #[must_use]
    pub fn element_schema() -> Self {
        Self::default()
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn typed(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn required(mut self, required: impl Into<Required>) -> Self {
        self.required = Some(required.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn rule(mut self, rule: Resolvable) -> Self {
        self.validations.push(rule);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn fields(mut self, fields: Vec<ConstraintNode>) -> Self {
        self.children = Some(Children::Fields(fields));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn element(mut self, element: ConstraintNode) -> Self {
        self.children = Some(Children::Element(Box::new(element)));
        self
    }

    /// Type the node is checked against: the declared type, else `object`
    /// for fixed-shape children and `array` for an element schema.
    ///
    /// `None` only for a node that fails [`Schema::new`].
    #[must_use]
    pub fn effective_type(&self) -> Option<DataType> {
        self.data_type.or(match self.children {
            Some(Children::Fields(_)) => Some(DataType::Object),
            Some(Children::Element(_)) => Some(DataType::Array),
            None => None,
        })
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// A checked, read-only constraint tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    nodes: Vec<ConstraintNode>,
}

impl Schema {
    /// Checks every node recursively and takes ownership of the tree.
    pub fn new(nodes: Vec<ConstraintNode>) -> Result<Self, ConfigurationError> {
        check_siblings(&nodes, "")?;
        Ok(Self { nodes })
    }

    /// Root nodes, as given.
    #[must_use]
    pub fn nodes(&self) -> &[ConstraintNode] {
        &self.nodes
    }
}

fn check_siblings(nodes: &[ConstraintNode], parent: &str) -> Result<(), ConfigurationError> {
    let mut seen = HashSet::with_capacity(nodes.len());
    for node in nodes {
        let node_path = path::join(parent, &node.id);
        if node.id.is_empty() {
            return Err(ConfigurationError::MissingId { path: node_path });
        }
        if node.id.contains(path::SEPARATOR) {
            return Err(ConfigurationError::SeparatorInId {
                id: node.id.clone(),
                path: node_path,
            });
        }
        if !seen.insert(node.id.as_str()) {
            return Err(ConfigurationError::DuplicateId {
                id: node.id.clone(),
                path: node_path,
            });
        }
        check_node(node, &node_path)?;
    }
    Ok(())
}

fn check_node(node: &ConstraintNode, node_path: &str) -> Result<(), ConfigurationError> {
    match &node.children {
        None if node.data_type.is_none() => Err(ConfigurationError::MissingTypeOrChildren {
            path: node_path.to_string(),
        }),
        None => Ok(()),
        Some(Children::Fields(fields)) => check_siblings(fields, node_path),
        Some(Children::Element(element)) => {
            check_node(element, &path::join(node_path, ELEMENT_SEGMENT))
        }
    }
}
