//! Error types
//!
//! Two kinds of failure exist and they never mix:
//!
//! - [`ConfigurationError`]: the schema or registry is malformed. Returned when
//!   a [`Validator`](crate::Validator) is built and never produced by `validate`.
//! - [`ValidationMessage`]: one data failure addressed by dotted path. A
//!   `validate` call collects every independent failure into a
//!   [`ValidationErrors`] list in schema-declaration order.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// CONFIGURATION ERROR
// ============================================================================

/// A malformed schema or an unresolvable function reference.
///
/// `path` is the schema position of the offending node: member ids joined by
/// `.`, with `*` standing for an array element schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// A node declares neither a `type` nor `children`.
    #[error("constraint node `{path}` must declare a type or children")]
    MissingTypeOrChildren { path: String },

    /// A root node or fixed-shape member has no `id`.
    #[error("constraint node at `{path}` has an empty id")]
    MissingId { path: String },

    /// An `id` contains the path separator and could never be addressed.
    #[error("constraint id `{id}` at `{path}` must not contain `.`")]
    SeparatorInId { id: String, path: String },

    /// Two siblings share an `id`.
    #[error("duplicate constraint id `{id}` at `{path}`")]
    DuplicateId { id: String, path: String },

    /// A resolvable names a function the registry does not contain.
    #[error("function `{function}` referenced by `{path}` is not registered")]
    UnknownFunction { function: String, path: String },
}

impl ConfigurationError {
    /// Schema position the error refers to.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::MissingTypeOrChildren { path }
            | Self::MissingId { path }
            | Self::SeparatorInId { path, .. }
            | Self::DuplicateId { path, .. }
            | Self::UnknownFunction { path, .. } => path,
        }
    }
}

// ============================================================================
// VALIDATION MESSAGE
// ============================================================================

/// One data failure: the dotted path of the failing value and a human-readable
/// message.
///
/// ```
/// use arbiter_validator::ValidationMessage;
///
/// let msg = ValidationMessage::new("contacts.0.kind", "contacts.0.kind is required");
/// assert_eq!(msg.target, "contacts.0.kind");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationMessage {
    /// Dotted path of the failing value, e.g. `contacts.0.contact_type`.
    pub target: String,
    /// Final message with placeholders already substituted.
    pub message: String,
}

impl ValidationMessage {
    pub fn new(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.target, self.message)
    }
}

// ============================================================================
// ERROR COLLECTION
// ============================================================================

/// Ordered collection of validation messages from one `validate` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    messages: Vec<ValidationMessage>,
}

impl ValidationErrors {
    /// Creates a new empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Appends a message, keeping insertion order.
    pub fn add(&mut self, message: ValidationMessage) {
        self.messages.push(message);
    }

    /// Returns the number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if no failure was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns all messages in order.
    #[must_use]
    pub fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationMessage> {
        self.messages.iter()
    }

    /// Messages whose target is exactly `target`.
    pub fn for_target<'a>(
        &'a self,
        target: &'a str,
    ) -> impl Iterator<Item = &'a ValidationMessage> + 'a {
        self.messages.iter().filter(move |m| m.target == target)
    }

    /// Consumes the collection and returns the raw list.
    #[must_use]
    pub fn into_messages(self) -> Vec<ValidationMessage> {
        self.messages
    }

    /// `Ok(ok_value)` when empty, otherwise `Err(self)`.
    #[must_use = "result must be used"]
    pub fn into_result<T>(self, ok_value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(ok_value)
        } else {
            Err(self)
        }
    }
}

impl FromIterator<ValidationMessage> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationMessage>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationMessage;
    type IntoIter = std::vec::IntoIter<ValidationMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationMessage;
    type IntoIter = std::slice::Iter<'a, ValidationMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.messages.len())?;
        for (i, message) in self.messages.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// TESTS
// ============================================================================
