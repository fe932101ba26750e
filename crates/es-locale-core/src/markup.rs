//! Heuristic markup detection.
//!
//! This is a quick scan for tags and HTML entities, not a parser. Text that
//! happens to contain angle brackets without being markup can be misread in
//! either direction; that is a known limitation.

use regex::Regex;
use std::sync::LazyLock;

static HTML_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(&[^\s]*;|</?\w+((\s+\w+(\s*=\s*(?:".*?"|'.*?'|[\^'">\s]+))?)+\s*|\s*)/?>)"#,
    )
    .expect("markup pattern is a valid regex")
});

/// Returns `true` if `value` contains something that looks like an HTML tag
/// or entity.
pub fn has_html_tags(value: &str) -> bool {
    HTML_PATTERN.is_match(value)
}
