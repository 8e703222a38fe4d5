//! Default functions
//!
//! Every builtin is a plain predicate over [`Arguments`]. An argument of the
//! wrong shape (or a missing one) makes the predicate return `false` rather
//! than erroring, so a mis-typed value shows up as a validation message.
//!
//! | Name            | Arguments             | Passes when                                  |
//! |-----------------|-----------------------|----------------------------------------------|
//! | `isEmpty`       | value                 | value is blank (missing, null, "", [], {})   |
//! | `isNotEmpty`    | value                 | value is not blank                           |
//! | `equals`        | a, b                  | both present and equal                       |
//! | `notEquals`     | a, b                  | not `equals`                                 |
//! | `lengthAtLeast` | string or array, n    | length >= n                                  |
//! | `lengthAtMost`  | string or array, n    | length <= n                                  |
//! | `minimum`       | number, n             | number >= n                                  |
//! | `maximum`       | number, n             | number <= n                                  |
//! | `matches`       | string, pattern       | the regular expression matches               |
//! | `oneOf`         | value, array          | the array contains the value                 |
//!
//! String length counts Unicode scalar values. `matches` compiles each distinct
//! pattern once per registry and reuses it across calls.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use super::{Arguments, Context};
use crate::path;

/// Registers every builtin into `context`.
pub(crate) fn register_all(context: &mut Context) {
    context.register("isEmpty", is_empty);
    context.register("isNotEmpty", is_not_empty);
    context.register("equals", equals);
    context.register("notEquals", not_equals);
    context.register("lengthAtLeast", length_at_least);
    context.register("lengthAtMost", length_at_most);
    context.register("minimum", minimum);
    context.register("maximum", maximum);
    let patterns = PatternCache::new();
    context.register("matches", move |args: &Arguments<'_>| matches(&patterns, args));
    context.register("oneOf", one_of);
}

pub fn is_empty(args: &Arguments<'_>) -> bool {
    path::is_blank(args.get(0))
}

pub fn is_not_empty(args: &Arguments<'_>) -> bool {
    !is_empty(args)
}

pub fn equals(args: &Arguments<'_>) -> bool {
    match (args.get(0), args.get(1)) {
        (Some(a), Some(b)) => values_equal(a, b),
        _ => false,
    }
}

pub fn not_equals(args: &Arguments<'_>) -> bool {
    !equals(args)
}

pub fn length_at_least(args: &Arguments<'_>) -> bool {
    compare_length(args, |len, bound| len >= bound)
}

pub fn length_at_most(args: &Arguments<'_>) -> bool {
    compare_length(args, |len, bound| len <= bound)
}

pub fn minimum(args: &Arguments<'_>) -> bool {
    compare_number(args, |n, bound| n >= bound)
}

pub fn maximum(args: &Arguments<'_>) -> bool {
    compare_number(args, |n, bound| n <= bound)
}

pub fn matches(patterns: &PatternCache, args: &Arguments<'_>) -> bool {
    let (Some(text), Some(pattern)) = (args.str(0), args.str(1)) else {
        return false;
    };
    patterns.is_match(text, pattern).unwrap_or(false)
}

pub fn one_of(args: &Arguments<'_>) -> bool {
    match (args.get(0), args.array(1)) {
        (Some(value), Some(options)) => options.iter().any(|option| values_equal(value, option)),
        _ => false,
    }
}

// ============================================================================
// PATTERN CACHE
// ============================================================================

/// Compiled regular expressions keyed by their source.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: Mutex<HashMap<String, Regex>>,
}

impl PatternCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `pattern` matches `text`; `None` if the pattern does not compile.
    pub fn is_match(&self, text: &str, pattern: &str) -> Option<bool> {
        let mut compiled = self.compiled.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(re) = compiled.get(pattern) {
            return Some(re.is_match(text));
        }
        match Regex::new(pattern) {
            Ok(re) => {
                let matched = re.is_match(text);
                compiled.insert(pattern.to_string(), re);
                Some(matched)
            }
            Err(e) => {
                warn!(pattern, error = %e, "invalid pattern in `matches`");
                None
            }
        }
    }

    /// Number of compiled patterns held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.compiled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Numbers compare by value (`1` equals `1.0`); everything else structurally.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn compare_length(args: &Arguments<'_>, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (args.get(0).and_then(length_of), args.number(1)) {
        (Some(len), Some(bound)) => cmp(len as f64, bound),
        _ => false,
    }
}

fn compare_number(args: &Arguments<'_>, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (args.number(0), args.number(1)) {
        (Some(n), Some(bound)) => cmp(n, bound),
        _ => false,
    }
}
