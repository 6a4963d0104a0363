//! Fenced code blocks.
//!
//! Only triple-backtick fences are recognised. Matching is lazy, so a fence
//! closes at the next ``` regardless of the info string.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A fenced code block with what the renderer needs for its chrome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// First word of the info string, if any
    pub language: Option<String>,
    /// Code between the fences, without the info string line
    pub code: String,
    /// Lines in the trimmed code (line-number gutter height)
    pub line_count: usize,
}

fn fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)```(.*?)```").unwrap())
}

/// Remove every fenced code block, fences included.
///
/// Used before heading extraction so `# comments` in shell snippets do not
/// show up in the outline. An unterminated fence is left alone.
pub fn strip_code_blocks(document: &str) -> String {
    fence_pattern().replace_all(document, "").into_owned()
}

/// Extract every fenced code block in document order.
///
/// # Examples
///
/// ```
/// use dsqr_content::parser::extract_code_blocks;
///
/// let blocks = extract_code_blocks("```rust\nfn main() {}\n```");
/// assert_eq!(blocks[0].language.as_deref(), Some("rust"));
/// assert_eq!(blocks[0].code, "fn main() {}\n");
/// assert_eq!(blocks[0].line_count, 1);
/// ```
pub fn extract_code_blocks(document: &str) -> Vec<CodeBlock> {
    fence_pattern()
        .captures_iter(document)
        .filter_map(|caps| caps.get(1))
        .map(|inner| {
            let inner = inner.as_str();
            let (info, code) = match inner.split_once('\n') {
                Some((info, code)) => (info, code),
                None => ("", inner),
            };

            let language = info
                .split_whitespace()
                .next()
                .map(str::to_string);

            let trimmed = code.trim();
            let line_count = if trimmed.is_empty() {
                0
            } else {
                trimmed.lines().count()
            };

            CodeBlock {
                language,
                code: code.to_string(),
                line_count,
            }
        })
        .collect()
}
