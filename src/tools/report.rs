//! HTML report rendering
//!
//! Minimal `$name` / `${name}` substitution for consultation reports.
//! Values are HTML-escaped; `$$` yields a literal `$`; placeholders with
//! no value are left as written. No loops or conditionals.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?:(?P<escaped>\$)|(?P<named>[_a-zA-Z][_a-zA-Z0-9]*)|\{(?P<braced>[_a-zA-Z][_a-zA-Z0-9]*)\})")
        .expect("placeholder pattern is valid")
});

/// Render `template`, substituting escaped `variables`
pub fn render_html(template: &str, variables: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            if caps.name("escaped").is_some() {
                return "$".to_string();
            }
            let name = caps
                .name("named")
                .or_else(|| caps.name("braced"))
                .map(|m| m.as_str())
                .unwrap_or_default();
            match variables.get(name) {
                Some(value) => escape_html(value),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Escape `& < > " '` for safe inclusion in HTML text and attributes
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
