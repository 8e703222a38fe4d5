//! Resolvable arguments
//!
//! On the wire an argument is any JSON value. Two string forms are reserved:
//! `"$value"` is the current target and `"$.some.path"` is an absolute path
//! into the root data. Everything else is a literal.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path;

/// Wire form of [`ArgumentSpec::Target`].
pub const TARGET_TOKEN: &str = "$value";

/// Prefix of [`ArgumentSpec::Path`] on the wire.
pub const PATH_PREFIX: &str = "$.";

/// One argument of a resolvable call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum ArgumentSpec {
    /// Passed through unchanged, including nested containers.
    Literal(Value),
    /// The value at the node currently being validated.
    Target,
    /// The value at an absolute dotted path in the root data.
    Path(String),
}

impl ArgumentSpec {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    #[must_use]
    pub fn target() -> Self {
        Self::Target
    }

    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// Resolves against `root`, with `target` the path of the node under
    /// validation. `None` means missing.
    pub fn resolve<'a>(&'a self, root: &'a Value, target: &str) -> Option<&'a Value> {
        match self {
            Self::Literal(value) => Some(value),
            Self::Target => path::get(root, target),
            Self::Path(p) => path::get(root, p),
        }
    }
}

impl From<Value> for ArgumentSpec {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) if s == TARGET_TOKEN => Self::Target,
            Value::String(s) if s.starts_with(PATH_PREFIX) => {
                Self::Path(s[PATH_PREFIX.len()..].to_string())
            }
            other => Self::Literal(other),
        }
    }
}

impl From<ArgumentSpec> for Value {
    fn from(arg: ArgumentSpec) -> Self {
        match arg {
            ArgumentSpec::Literal(value) => value,
            ArgumentSpec::Target => Value::String(TARGET_TOKEN.to_string()),
            ArgumentSpec::Path(p) => Value::String(format!("{PATH_PREFIX}{p}")),
        }
    }
}

impl From<&str> for ArgumentSpec {
    fn from(s: &str) -> Self {
        Value::from(s).into()
    }
}

impl From<String> for ArgumentSpec {
    fn from(s: String) -> Self {
        Value::from(s).into()
    }
}

impl From<i32> for ArgumentSpec {
    fn from(n: i32) -> Self {
        Self::Literal(n.into())
    }
}

impl From<i64> for ArgumentSpec {
    fn from(n: i64) -> Self {
        Self::Literal(n.into())
    }
}

impl From<u64> for ArgumentSpec {
    fn from(n: u64) -> Self {
        Self::Literal(n.into())
    }
}

impl From<f64> for ArgumentSpec {
    fn from(n: f64) -> Self {
        Self::Literal(n.into())
    }
}

impl From<bool> for ArgumentSpec {
    fn from(b: bool) -> Self {
        Self::Literal(b.into())
    }
}
