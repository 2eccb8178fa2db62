//! Template Renderer
//!
//! Substitutes `{{identifier}}` placeholders from a binding set.
//! Unbound placeholders are emitted verbatim so a dashboard preview and the
//! live call show identical text. Substituted values are never re-scanned.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{([^}]+)\}\}").expect("placeholder pattern compiles"))
}

/// Render `content` against `bindings`
pub fn render(content: &str, bindings: &HashMap<String, String>) -> String {
    placeholder_pattern()
        .replace_all(content, |caps: &Captures| match bindings.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Distinct placeholder identifiers in order of first appearance
pub fn placeholders(content: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for caps in placeholder_pattern().captures_iter(content) {
        let ident = &caps[1];
        if !seen.iter().any(|s: &String| s == ident) {
            seen.push(ident.to_string());
        }
    }
    seen
}

/// Placeholders in `content` that `bindings` leaves unresolved
pub fn unresolved(content: &str, bindings: &HashMap<String, String>) -> Vec<String> {
    placeholders(content)
        .into_iter()
        .filter(|p| !bindings.contains_key(p))
        .collect()
}
