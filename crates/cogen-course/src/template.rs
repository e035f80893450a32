//! `{{variable}}` placeholder expansion.
//!
//! Templating is open: a placeholder whose key is not in the mapping is left
//! exactly as written, so a course can be rendered before every variable is
//! known. Expansion is a single pass; substituted values are never expanded
//! again.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::model::Variables;

// Keys may contain inner whitespace ("Pod IP"); surrounding whitespace is
// not part of the key.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").expect("invalid placeholder regex"));

/// Expand placeholders in `body` using `vars`.
///
/// Keys are matched case-sensitively. Values are inserted verbatim.
pub fn expand(body: &str, vars: &Variables) -> String {
    if !body.contains("{{") {
        return body.to_owned();
    }

    PLACEHOLDER
        .replace_all(body, |caps: &Captures<'_>| match vars.get(caps[1].trim()) {
            Some(value) => value.clone(),
            None => caps[0].to_owned(),
        })
        .into_owned()
}

/// Placeholder keys in `body`, in order of appearance.
pub fn placeholders(body: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|key| !key.is_empty())
        .collect()
}

/// Placeholder keys in `body` that `vars` cannot resolve.
pub fn unresolved<'a>(body: &'a str, vars: &Variables) -> Vec<&'a str> {
    placeholders(body)
        .into_iter()
        .filter(|key| !vars.contains_key(*key))
        .collect()
}
