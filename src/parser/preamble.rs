//! Frontmatter and title removal.
//!
//! Posts are stored with a YAML frontmatter block and repeat their title as a
//! leading `# H1`. The page header already renders both, so the body handed to
//! segmentation starts after them.

use regex::Regex;
use std::sync::OnceLock;

fn frontmatter_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Opening `---` line at byte 0, lazily up to the first line that is exactly
    // `---`, then any whitespace that follows it.
    PATTERN.get_or_init(|| Regex::new(r"(?m)\A---\r?\n(?s:.*?)^---\r?$\s*").unwrap())
}

fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\A#[ \t]+[^\n]+(?:\n+|\z)").unwrap())
}

/// Remove a leading frontmatter block and a leading H1, then trim.
///
/// At most one frontmatter block and one H1 are removed, and only when they
/// sit at the very start of the document. A document without either passes
/// through unchanged apart from trimming.
///
/// # Examples
///
/// ```
/// use dsqr_content::parser::strip_preamble;
///
/// let raw = "---\ntitle: Caching\n---\n# Caching\n\nStart here.\n";
/// assert_eq!(strip_preamble(raw), "Start here.");
/// ```
pub fn strip_preamble(document: &str) -> String {
    let body = match frontmatter_pattern().find(document) {
        Some(m) => &document[m.end()..],
        None => document,
    };

    let body = match title_pattern().find(body) {
        Some(m) => &body[m.end()..],
        None => body,
    };

    body.trim().to_string()
}
