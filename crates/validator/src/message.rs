//! Message templating
//!
//! User-authored messages may contain [`PLACEHOLDER`], replaced verbatim with
//! the node's full dotted path. Without a template, a default message is
//! synthesized per failure kind.

use std::borrow::Cow;

use crate::path::RuntimeType;
use crate::schema::DataType;

/// Token substituted with the failing node's full path.
pub const PLACEHOLDER: &str = "$prop";

/// What went wrong at a node. Drives the default wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind<'a> {
    /// The value's runtime category does not match the expected type.
    TypeMismatch {
        expected: DataType,
        actual: RuntimeType,
    },
    /// The value is blank but required.
    Required,
    /// A validation rule returned a falsy result.
    Rule { function: &'a str },
}

impl FailureKind<'_> {
    /// Stable short code, used for tracing.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::Required => "required",
            Self::Rule { .. } => "rule",
        }
    }

    /// Default message for a failure at `path`.
    #[must_use]
    pub fn default_message(&self, path: &str) -> String {
        match self {
            Self::TypeMismatch { expected, actual } => {
                format!("{path} is not of type {expected} (got {actual})")
            }
            Self::Required => format!("{path} is required"),
            Self::Rule { function } => format!("{path} is invalid ({function})"),
        }
    }
}

/// Replaces every [`PLACEHOLDER`] in `template` with `path`.
///
/// ```
/// use arbiter_validator::message::render;
///
/// assert_eq!(render("$prop must be set", "a.b"), "a.b must be set");
/// ```
#[must_use]
pub fn render<'t>(template: &'t str, path: &str) -> Cow<'t, str> {
    if template.contains(PLACEHOLDER) {
        Cow::Owned(template.replace(PLACEHOLDER, path))
    } else {
        Cow::Borrowed(template)
    }
}

/// Final message: the rendered template when given, the default otherwise.
#[must_use]
pub fn compose(template: Option<&str>, path: &str, kind: FailureKind<'_>) -> String {
    match template {
        Some(template) => render(template, path).into_owned(),
        None => kind.default_message(path),
    }
}
