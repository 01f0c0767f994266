//! Variable interpolation for strings
//!
//! This module handles parsing and replacing variables in strings using the ${var} syntax.

use crate::error::{InterpolationError, InterpolationResult};
use regex::Regex;
use std::collections::HashMap;
use std::env;
use std::sync::OnceLock;

/// Nesting limit for variables whose values reference other variables
const MAX_DEPTH: usize = 32;

fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").unwrap())
}

/// Interpolate variables in a string
///
/// Supports:
/// - `${var}` - variable from context
/// - Environment variables (when not found in context)
///
/// Unknown variables are left as written.
pub fn interpolate(s: &str, vars: &HashMap<String, String>) -> InterpolationResult<String> {
    expand(s, vars, 0)
}

fn expand(s: &str, vars: &HashMap<String, String>, depth: usize) -> InterpolationResult<String> {
    if depth > MAX_DEPTH {
        return Err(InterpolationError::RecursiveInterpolation);
    }

    let mut result = String::with_capacity(s.len());
    let mut last = 0;

    for caps in variable_pattern().captures_iter(s) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        result.push_str(&s[last..whole.start()]);

        match lookup(name.as_str(), vars) {
            Some(value) => result.push_str(&expand(&value, vars, depth + 1)?),
            None => result.push_str(whole.as_str()),
        }
        last = whole.end();
    }

    result.push_str(&s[last..]);
    Ok(result)
}

fn lookup(name: &str, vars: &HashMap<String, String>) -> Option<String> {
    vars.get(name).cloned().or_else(|| env::var(name).ok())
}

/// Interpolate with strict mode - errors on undefined variables
pub fn interpolate_strict(
    s: &str,
    vars: &HashMap<String, String>,
) -> InterpolationResult<String> {
    let result = interpolate(s, vars)?;

    if let Some(caps) = variable_pattern().captures(&result) {
        return Err(InterpolationError::UndefinedVariable(caps[1].to_string()));
    }

    Ok(result)
}
