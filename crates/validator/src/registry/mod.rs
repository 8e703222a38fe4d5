//! Function registry for resolvables
//!
//! A [`Context`] maps names to functions that receive resolved
//! [`Arguments`] and return a [`Resolved`] outcome. The validator merges the
//! caller's context over [`Context::builtin`]; caller entries win on name
//! collision.

pub mod builtins;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ConfigurationError;
use crate::schema::Resolvable;

/// Type alias for a registered function.
pub type Function = Arc<dyn Fn(&Arguments<'_>) -> Resolved + Send + Sync>;

// ============================================================================
// RESOLVED
// ============================================================================

/// Result of calling a registered function.
///
/// Rules only look at truthiness. A dynamic `required` condition may also
/// return text, which becomes the failure message when no explicit message is
/// configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Bool(bool),
    Text(String),
}

impl Resolved {
    /// `Bool(true)` and non-empty text are truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// The text payload, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Bool(_) => None,
        }
    }
}

impl From<bool> for Resolved {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<String> for Resolved {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Resolved {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

// ============================================================================
// ARGUMENTS
// ============================================================================

/// Resolved call arguments, in declaration order. `None` marks a missing value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments<'a> {
    values: Vec<Option<&'a Value>>,
}

impl<'a> Arguments<'a> {
    #[must_use]
    pub fn new(values: Vec<Option<&'a Value>>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Argument at `index`; `None` if missing or out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a Value> {
        self.values.get(index).copied().flatten()
    }

    /// True if the argument resolved to a missing value or was not passed.
    #[must_use]
    pub fn is_missing(&self, index: usize) -> bool {
        self.get(index).is_none()
    }

    #[must_use]
    pub fn str(&self, index: usize) -> Option<&'a str> {
        self.get(index).and_then(Value::as_str)
    }

    #[must_use]
    pub fn number(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(Value::as_f64)
    }

    #[must_use]
    pub fn array(&self, index: usize) -> Option<&'a Vec<Value>> {
        self.get(index).and_then(Value::as_array)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&'a Value>> + '_ {
        self.values.iter().copied()
    }
}

impl<'a> FromIterator<Option<&'a Value>> for Arguments<'a> {
    fn from_iter<I: IntoIterator<Item = Option<&'a Value>>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// CONTEXT
// ============================================================================

/// Named functions available to resolvables.
#[derive(Clone, Default)]
pub struct Context {
    functions: HashMap<String, Function>,
}

impl Context {
    /// An empty registry, typically filled with caller functions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The default function set. See [`builtins`].
    #[must_use]
    pub fn builtin() -> Self {
        let mut context = Self::new();
        builtins::register_all(&mut context);
        context
    }

    /// Registers `function` under `name`, replacing any previous entry.
    pub fn register<F, R>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&Arguments<'_>) -> R + Send + Sync + 'static,
        R: Into<Resolved>,
    {
        self.functions.insert(
            name.into(),
            Arc::new(move |args: &Arguments<'_>| -> Resolved { function(args).into() }),
        );
    }

    /// Builder-style [`register`](Self::register).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_function<F, R>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&Arguments<'_>) -> R + Send + Sync + 'static,
        R: Into<Resolved>,
    {
        self.register(name, function);
        self
    }

    /// Overlays `overrides` on `self`; entries in `overrides` win.
    #[must_use]
    pub fn merge(mut self, overrides: Context) -> Self {
        self.functions.extend(overrides.functions);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Looks up `spec.function`, resolves its arguments against `root` with
    /// `target` as the current node path, and calls it.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::UnknownFunction`] if the name is not registered.
    pub fn resolve(
        &self,
        spec: &Resolvable,
        root: &Value,
        target: &str,
    ) -> Result<Resolved, ConfigurationError> {
        let function =
            self.get(&spec.function)
                .ok_or_else(|| ConfigurationError::UnknownFunction {
                    function: spec.function.clone(),
                    path: target.to_string(),
                })?;
        Ok(call(function, spec, root, target))
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("functions", &self.function_names())
            .finish()
    }
}

/// Resolves `spec`'s arguments and invokes `function` with them.
pub(crate) fn call(function: &Function, spec: &Resolvable, root: &Value, target: &str) -> Resolved {
    let args: Arguments<'_> = spec
        .arguments
        .iter()
        .map(|arg| arg.resolve(root, target))
        .collect();
    function(&args)
}
