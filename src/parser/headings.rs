//! Heading extraction and anchor ids.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::code::strip_code_blocks;
use super::utils::strip_markdown_inline;

/// A heading in the document outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Anchor id, see [`generate_heading_id`]
    pub id: String,
    /// Heading text with inline formatting removed
    pub text: String,
    /// Heading level (1-6)
    pub level: usize,
}

impl Heading {
    /// Indentation step in the on-page outline. `##` sits flush, deeper
    /// levels step in by one per level.
    pub fn indent(&self) -> usize {
        self.level.saturating_sub(2)
    }

    /// `#<id>` link target.
    pub fn href(&self) -> String {
        format!("#{}", self.id)
    }
}

fn heading_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?m)^(#{1,6})[ \t]+([^\n]+)$").unwrap())
}

/// Extract ATX headings in document order, skipping fenced code.
///
/// Ids are not de-duplicated: two headings with the same text share an id.
///
/// # Examples
///
/// ```
/// use dsqr_content::parser::extract_headings;
///
/// let headings = extract_headings("## Setup\n```sh\n# install\n```\n### **Run** it");
/// assert_eq!(headings.len(), 2);
/// assert_eq!(headings[1].text, "Run it");
/// assert_eq!(headings[1].id, "run-it");
/// ```
pub fn extract_headings(document: &str) -> Vec<Heading> {
    let without_code = strip_code_blocks(document);

    heading_pattern()
        .captures_iter(&without_code)
        .filter_map(|caps| {
            let level = caps.get(1)?.as_str().len();
            let text = strip_markdown_inline(caps.get(2)?.as_str().trim());
            Some(Heading {
                id: generate_heading_id(&text),
                text,
                level,
            })
        })
        .collect()
}

/// Derive a URL-fragment-safe id from heading text.
///
/// Lowercases and trims, drops everything except ASCII word characters,
/// whitespace, `.`, `-` and `/`, turns whitespace runs into `-`, collapses
/// repeated `-` and strips one trailing `-`. Renderers must use this same
/// function when assigning ids so outline links land on their headings.
///
/// # Examples
///
/// ```
/// use dsqr_content::parser::generate_heading_id;
///
/// assert_eq!(generate_heading_id("Hello, World!"), "hello-world");
/// assert_eq!(generate_heading_id("  Multiple   Spaces  "), "multiple-spaces");
/// assert_eq!(generate_heading_id("v1.2 / Upgrade"), "v1.2-/-upgrade");
/// ```
pub fn generate_heading_id(text: &str) -> String {
    static DISALLOWED: OnceLock<Regex> = OnceLock::new();
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    static DASHES: OnceLock<Regex> = OnceLock::new();

    let disallowed = DISALLOWED.get_or_init(|| Regex::new(r"[^A-Za-z0-9_\s.\-/]").unwrap());
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap());
    let dashes = DASHES.get_or_init(|| Regex::new(r"-+").unwrap());

    let lowered = text.to_lowercase();
    let kept = disallowed.replace_all(lowered.trim(), "");
    let dashed = whitespace.replace_all(&kept, "-");
    let collapsed = dashes.replace_all(&dashed, "-");

    collapsed
        .strip_suffix('-')
        .unwrap_or(&collapsed)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generate_heading_id() {
        assert_eq!(generate_heading_id("Hello, World!"), "hello-world");
        assert_eq!(generate_heading_id("  Multiple   Spaces  "), "multiple-spaces");
        assert_eq!(generate_heading_id("What's new?"), "whats-new");
        assert_eq!(generate_heading_id("a -- b"), "a-b");
        assert_eq!(generate_heading_id("Trailing -"), "trailing");
        assert_eq!(generate_heading_id("snake_case"), "snake_case");
        assert_eq!(generate_heading_id("Café"), "caf");
        assert_eq!(generate_heading_id(""), "");
    }

    #[test]
    fn test_generate_heading_id_is_deterministic() {
        let text = "Deploying to Fly.io";
        assert_eq!(generate_heading_id(text), generate_heading_id(text));
        assert_eq!(generate_heading_id(text), "deploying-to-fly.io");
    }

    #[test]
    fn test_extract_headings_levels() {
        let md = "# Title\n## Section\n### Sub\n#### Four\n##### Five\n###### Six\n####### Seven";
        let headings = extract_headings(md);
        let levels: Vec<_> = headings.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_hash_inside_code_block_ignored() {
        let md = "## Install\n\n```bash\n# this is a comment\n## also a comment\n```\n\n## Usage\n";
        let headings = extract_headings(md);
        let texts: Vec<_> = headings.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Install", "Usage"]);
    }

    #[test]
    fn test_no_space_not_a_heading() {
        assert!(extract_headings("#hashtag\n##nope").is_empty());
    }

    #[test]
    fn test_heading_does_not_span_lines() {
        assert!(extract_headings("##\nText").is_empty());
    }

    #[test]
    fn test_duplicate_ids_kept() {
        let headings = extract_headings("## Notes\ntext\n## Notes\n");
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].id, headings[1].id);
    }

    #[test]
    fn test_heading_text_trimmed_and_stripped() {
        let headings = extract_headings("##   `cargo` **build**   \r\n");
        assert_eq!(
            headings,
            vec![Heading {
                id: "cargo-build".to_string(),
                text: "cargo build".to_string(),
                level: 2,
            }]
        );
    }

    #[test]
    fn test_indent_and_href() {
        let headings = extract_headings("# A\n## B\n#### D");
        let indents: Vec<_> = headings.iter().map(Heading::indent).collect();
        assert_eq!(indents, vec![0, 0, 2]);
        assert_eq!(headings[1].href(), "#b");
    }
}
