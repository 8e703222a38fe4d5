//! Dotted-path access and classification for `serde_json::Value`
//!
//! Paths are segments joined by `.`: object keys, or zero-based decimal
//! indices for array elements (`contacts.0.contact_type`). The empty path
//! addresses the root value.
//!
//! A missing value is `None`. `Value::Null` is present.

use std::fmt;

use serde_json::Value;

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// Reads the value at `path`, or `None` if any segment is absent or the
/// current value cannot be indexed by it.
///
/// ```
/// use arbiter_validator::path;
/// use serde_json::json;
///
/// let data = json!({"contacts": [{"kind": "email"}]});
/// assert_eq!(path::get(&data, "contacts.0.kind"), Some(&json!("email")));
/// assert_eq!(path::get(&data, "contacts.1.kind"), None);
/// ```
pub fn get<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(data);
    }

    path.split(SEPARATOR)
        .try_fold(data, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => parse_index(segment).and_then(|index| items.get(index)),
            _ => None,
        })
}

/// Canonical decimal index: `0`, or ASCII digits without a leading zero.
fn parse_index(segment: &str) -> Option<usize> {
    let digits = !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
    if digits && (segment == "0" || !segment.starts_with('0')) {
        segment.parse().ok()
    } else {
        None
    }
}

/// Appends `segment` to `parent`. An empty parent yields the bare segment.
#[must_use]
pub fn join(parent: &str, segment: impl fmt::Display) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}{SEPARATOR}{segment}")
    }
}

// ============================================================================
// RUNTIME TYPE
// ============================================================================

/// Runtime category of a (possibly missing) value.
///
/// `Null` is categorised as [`RuntimeType::Object`]. [`RuntimeType::Function`]
/// is part of the vocabulary but never produced for JSON data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Function,
    Undefined,
}

impl RuntimeType {
    /// Classifies a value; `None` is [`RuntimeType::Undefined`].
    #[must_use]
    pub fn of(value: Option<&Value>) -> Self {
        match value {
            None => Self::Undefined,
            Some(Value::Null | Value::Object(_)) => Self::Object,
            Some(Value::Bool(_)) => Self::Boolean,
            Some(Value::Number(_)) => Self::Number,
            Some(Value::String(_)) => Self::String,
            Some(Value::Array(_)) => Self::Array,
        }
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
            Self::Undefined => "undefined",
        }
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True for missing, `null`, `""`, and objects or arrays without members.
/// Numbers and booleans are never blank.
#[must_use]
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Bool(_) | Value::Number(_)) => false,
    }
}
