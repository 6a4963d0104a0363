//! Callout extraction.
//!
//! Posts mark asides with a directive block:
//!
//! ```text
//! :::tip[Fast Fact]
//! Use caching.
//! :::
//! ```
//!
//! [`segment_document`] splits a document into plain markdown runs and callout
//! blocks so a renderer can wrap each callout in its styled container. Older
//! posts used JSX-style tags (`<Note>...</Note>`) instead; those are handled by
//! [`segment_document_with`] with [`CalloutSyntax::JsxTag`].
//!
//! Segmentation is total: anything that does not form a complete block is left
//! in the surrounding markdown as literal text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::OnceLock;
use strum::{EnumIter, IntoStaticStr};

use crate::error::InputError;

/// The styled aside a callout renders as.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CalloutVariant {
    Note,
    Tip,
    Warning,
    Important,
    Caution,
    MoreInfo,
}

impl CalloutVariant {
    /// Default title shown when the block carries no label.
    pub fn title(self) -> &'static str {
        match self {
            CalloutVariant::Note => "Note",
            CalloutVariant::Tip => "Tip",
            CalloutVariant::Warning => "Warning",
            CalloutVariant::Important => "Important",
            CalloutVariant::Caution => "Caution",
            CalloutVariant::MoreInfo => "More Info",
        }
    }

    /// Directive keyword, e.g. `moreinfo`.
    pub fn keyword(self) -> &'static str {
        self.into()
    }

    /// Tag name used by the JSX syntax, e.g. `MoreInfo`.
    pub fn tag_name(self) -> &'static str {
        match self {
            CalloutVariant::Note => "Note",
            CalloutVariant::Tip => "Tip",
            CalloutVariant::Warning => "Warning",
            CalloutVariant::Important => "Important",
            CalloutVariant::Caution => "Caution",
            CalloutVariant::MoreInfo => "MoreInfo",
        }
    }

    fn from_tag_name(tag: &str) -> Option<Self> {
        match tag {
            "Note" => Some(CalloutVariant::Note),
            "Tip" => Some(CalloutVariant::Tip),
            "Warning" => Some(CalloutVariant::Warning),
            "Important" => Some(CalloutVariant::Important),
            "Caution" => Some(CalloutVariant::Caution),
            "MoreInfo" => Some(CalloutVariant::MoreInfo),
            _ => None,
        }
    }
}

impl FromStr for CalloutVariant {
    type Err = InputError;

    /// Case-insensitive. `purple` is the legacy spelling of `moreinfo`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "note" => Ok(CalloutVariant::Note),
            "tip" => Ok(CalloutVariant::Tip),
            "warning" => Ok(CalloutVariant::Warning),
            "important" => Ok(CalloutVariant::Important),
            "caution" => Ok(CalloutVariant::Caution),
            "moreinfo" | "purple" => Ok(CalloutVariant::MoreInfo),
            _ => Err(InputError::UnknownVariant(s.to_string())),
        }
    }
}

impl fmt::Display for CalloutVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Which block syntax to recognise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalloutSyntax {
    /// `:::variant[label]` ... `:::`
    #[default]
    Directive,
    /// `<Variant>` ... `</Variant>`
    JsxTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SegmentKind {
    Markdown,
    Callout {
        variant: CalloutVariant,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
}

/// A contiguous run of a document, either plain markdown or one callout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Markdown to render. For callouts this is the inner content only.
    pub text: String,
    /// Byte range in the segmented input, callout delimiters included
    pub span: Range<usize>,
}

impl Segment {
    fn markdown(document: &str, span: Range<usize>) -> Self {
        Self {
            kind: SegmentKind::Markdown,
            text: document[span.clone()].to_string(),
            span,
        }
    }

    pub fn is_callout(&self) -> bool {
        matches!(self.kind, SegmentKind::Callout { .. })
    }

    pub fn variant(&self) -> Option<CalloutVariant> {
        match self.kind {
            SegmentKind::Callout { variant, .. } => Some(variant),
            SegmentKind::Markdown => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match &self.kind {
            SegmentKind::Callout { label, .. } => label.as_deref(),
            SegmentKind::Markdown => None,
        }
    }

    /// Title a renderer should display: the label if given, else the variant's
    /// default title. `None` for markdown segments.
    pub fn title(&self) -> Option<&str> {
        match &self.kind {
            SegmentKind::Callout { variant, label } => {
                Some(label.as_deref().unwrap_or(variant.title()))
            }
            SegmentKind::Markdown => None,
        }
    }
}

fn directive_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?mi)^:::(note|tip|warning|important|caution|moreinfo|purple)(?:\[([^\]\n]*)\])?[ \t]*\r?\n((?s:.*?))^:::[ \t]*\r?$",
        )
        .unwrap()
    })
}

fn tag_open_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<(Important|Note|Tip|Warning|Caution|MoreInfo)>").unwrap())
}

/// Split a document into markdown and `:::` callout segments.
///
/// Does not strip frontmatter; call [`strip_preamble`](super::strip_preamble)
/// first when that is wanted.
///
/// # Examples
///
/// ```
/// use dsqr_content::parser::{segment_document, CalloutVariant};
///
/// let segments = segment_document(":::tip[Fast Fact]\nUse caching.\n:::");
/// assert_eq!(segments.len(), 1);
/// assert_eq!(segments[0].variant(), Some(CalloutVariant::Tip));
/// assert_eq!(segments[0].label(), Some("Fast Fact"));
/// assert_eq!(segments[0].text, "Use caching.");
/// ```
pub fn segment_document(document: &str) -> Vec<Segment> {
    segment_document_with(document, CalloutSyntax::Directive)
}

/// Split a document into segments using the given callout syntax.
pub fn segment_document_with(document: &str, syntax: CalloutSyntax) -> Vec<Segment> {
    let blocks = match syntax {
        CalloutSyntax::Directive => directive_blocks(document),
        CalloutSyntax::JsxTag => tag_blocks(document),
    };

    let mut segments = Vec::with_capacity(blocks.len() * 2 + 1);
    let mut last_index = 0;

    for block in blocks {
        if block.span.start > last_index {
            segments.push(Segment::markdown(document, last_index..block.span.start));
        }
        last_index = block.span.end;
        segments.push(block);
    }

    if last_index < document.len() {
        segments.push(Segment::markdown(document, last_index..document.len()));
    }

    if segments.is_empty() {
        segments.push(Segment::markdown(document, 0..document.len()));
    }

    segments
}

fn directive_blocks(document: &str) -> Vec<Segment> {
    directive_pattern()
        .captures_iter(document)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let variant = caps.get(1)?.as_str().parse().ok()?;
            let label = caps
                .get(2)
                .map(|m| m.as_str().trim())
                .filter(|label| !label.is_empty())
                .map(str::to_string);
            let body = caps.get(3).map_or("", |m| m.as_str());

            Some(Segment {
                kind: SegmentKind::Callout { variant, label },
                text: body.trim().to_string(),
                span: whole.range(),
            })
        })
        .collect()
}

// Rust's regex has no backreferences, so the closing tag is searched for
// explicitly. An opening tag without its own closing tag is skipped and the
// scan continues right after it.
fn tag_blocks(document: &str) -> Vec<Segment> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some(caps) = tag_open_pattern().captures_at(document, pos) {
        let (Some(open), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let Some(variant) = CalloutVariant::from_tag_name(name.as_str()) else {
            pos = open.end();
            continue;
        };

        let closing = format!("</{}>", name.as_str());
        match document[open.end()..].find(&closing) {
            Some(rel) => {
                let body_end = open.end() + rel;
                let end = body_end + closing.len();
                blocks.push(Segment {
                    kind: SegmentKind::Callout {
                        variant,
                        label: None,
                    },
                    text: document[open.end()..body_end].to_string(),
                    span: open.start()..end,
                });
                pos = end;
            }
            None => pos = open.end(),
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    fn reconstruct(document: &str, segments: &[Segment]) -> String {
        segments.iter().map(|s| &document[s.span.clone()]).collect()
    }

    #[test]
    fn test_no_callouts_single_segment() {
        let doc = "## Intro\n\nSome *markdown* here.\n";
        let segments = segment_document(doc);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::Markdown);
        assert_eq!(segments[0].text, doc);
    }

    #[test]
    fn test_empty_document_single_segment() {
        let segments = segment_document("");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "");
        assert_eq!(segments[0].span, 0..0);
    }

    #[test]
    fn test_callout_with_label() {
        let segments = segment_document(":::tip[Fast Fact]\nUse caching.\n:::");
        assert_eq!(
            segments,
            vec![Segment {
                kind: SegmentKind::Callout {
                    variant: CalloutVariant::Tip,
                    label: Some("Fast Fact".to_string()),
                },
                text: "Use caching.".to_string(),
                span: 0..34,
            }]
        );
        assert_eq!(segments[0].title(), Some("Fast Fact"));
    }

    #[test]
    fn test_markdown_around_callouts() {
        let doc = "Before.\n\n:::note\nFirst.\n:::\n\nBetween.\n\n:::warning\nSecond.\n:::\n\nAfter.";
        let segments = segment_document(doc);

        let kinds: Vec<_> = segments.iter().map(|s| s.variant()).collect();
        assert_eq!(
            kinds,
            vec![
                None,
                Some(CalloutVariant::Note),
                None,
                Some(CalloutVariant::Warning),
                None
            ]
        );
        assert_eq!(segments[0].text, "Before.\n\n");
        assert_eq!(segments[1].text, "First.");
        assert_eq!(segments[1].title(), Some("Note"));
        assert_eq!(segments[2].text, "\n\nBetween.\n\n");
        assert_eq!(segments[4].text, "\n\nAfter.");
        assert_eq!(reconstruct(doc, &segments), doc);
    }

    #[test]
    fn test_adjacent_callouts_not_merged() {
        let doc = ":::note\nA\n:::\n:::note\nB\n:::";
        let segments = segment_document(doc);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].text, "A");
        assert_eq!(segments[1].text, "\n");
        assert_eq!(segments[2].text, "B");
        assert_eq!(reconstruct(doc, &segments), doc);
    }

    #[test]
    fn test_variant_case_insensitive() {
        let segments = segment_document(":::NOTE\nLoud.\n:::");
        assert_eq!(segments[0].variant(), Some(CalloutVariant::Note));

        let segments = segment_document(":::MoreInfo\nHi.\n:::");
        assert_eq!(segments[0].variant(), Some(CalloutVariant::MoreInfo));
    }

    #[test]
    fn test_purple_alias() {
        let segments = segment_document(":::purple\nAbout me.\n:::");
        assert_eq!(segments[0].variant(), Some(CalloutVariant::MoreInfo));
        assert_eq!(segments[0].title(), Some("More Info"));
    }

    #[test]
    fn test_unknown_variant_stays_markdown() {
        let doc = ":::danger\nNope.\n:::";
        let segments = segment_document(doc);
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].is_callout());
        assert_eq!(segments[0].text, doc);
    }

    #[test]
    fn test_variant_prefix_is_not_a_match() {
        let doc = ":::notes\nNope.\n:::";
        assert!(!segment_document(doc)[0].is_callout());
    }

    #[test]
    fn test_unterminated_callout_stays_markdown() {
        let doc = "Text\n:::note\nNever closed.\n";
        let segments = segment_document(doc);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, doc);
    }

    #[test]
    fn test_close_line_must_be_bare() {
        // `::: trailing` is not a closing line, the later `:::` is
        let doc = ":::note\none\n::: trailing\ntwo\n:::";
        let segments = segment_document(doc);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "one\n::: trailing\ntwo");
    }

    #[test]
    fn test_empty_label_is_none() {
        let segments = segment_document(":::caution[]\nCareful.\n:::");
        assert_eq!(segments[0].label(), None);
        assert_eq!(segments[0].title(), Some("Caution"));
    }

    #[test]
    fn test_empty_callout_body() {
        let segments = segment_document(":::important\n:::");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].variant(), Some(CalloutVariant::Important));
        assert_eq!(segments[0].text, "");
    }

    #[test]
    fn test_callout_body_keeps_markdown() {
        let doc = ":::note\n- one\n- two\n\n```rust\nlet x = 1;\n```\n:::";
        let segments = segment_document(doc);
        assert_eq!(segments[0].text, "- one\n- two\n\n```rust\nlet x = 1;\n```");
    }

    #[test]
    fn test_crlf_callout() {
        let doc = ":::tip\r\nWindows.\r\n:::\r\n";
        let segments = segment_document(doc);
        assert_eq!(segments[0].variant(), Some(CalloutVariant::Tip));
        assert_eq!(segments[0].text, "Windows.");
        assert_eq!(reconstruct(doc, &segments), doc);
    }

    #[test]
    fn test_jsx_tags() {
        let doc = "Intro\n<Note>\nRemember this.\n</Note>\nOutro";
        let segments = segment_document_with(doc, CalloutSyntax::JsxTag);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].variant(), Some(CalloutVariant::Note));
        assert_eq!(segments[1].text, "\nRemember this.\n");
        assert_eq!(reconstruct(doc, &segments), doc);
    }

    #[test]
    fn test_jsx_mismatched_close_stays_markdown() {
        let doc = "<Tip>text</Note>";
        let segments = segment_document_with(doc, CalloutSyntax::JsxTag);
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].is_callout());
    }

    #[test]
    fn test_jsx_unclosed_tag_skipped() {
        let doc = "<Warning>open <Tip>inner</Tip>";
        let segments = segment_document_with(doc, CalloutSyntax::JsxTag);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "<Warning>open ");
        assert_eq!(segments[1].variant(), Some(CalloutVariant::Tip));
        assert_eq!(segments[1].text, "inner");
    }

    #[test]
    fn test_jsx_syntax_ignores_directives() {
        let doc = ":::note\nx\n:::";
        let segments = segment_document_with(doc, CalloutSyntax::JsxTag);
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].is_callout());
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("Tip".parse::<CalloutVariant>().unwrap(), CalloutVariant::Tip);
        assert_eq!(
            "PURPLE".parse::<CalloutVariant>().unwrap(),
            CalloutVariant::MoreInfo
        );
        assert!(matches!(
            "danger".parse::<CalloutVariant>(),
            Err(InputError::UnknownVariant(token)) if token == "danger"
        ));
    }

    #[test]
    fn test_every_variant_round_trips_through_keyword() {
        for variant in CalloutVariant::iter() {
            assert_eq!(variant.keyword().parse::<CalloutVariant>().unwrap(), variant);
            assert_eq!(
                CalloutVariant::from_tag_name(variant.tag_name()),
                Some(variant)
            );
        }
    }

    #[test]
    fn test_segment_serializes_with_type_tag() {
        let segments = segment_document(":::purple[Me]\nHi\n:::");
        let json = serde_json::to_value(&segments[0]).unwrap();
        assert_eq!(json["kind"]["type"], "callout");
        assert_eq!(json["kind"]["variant"], "moreinfo");
        assert_eq!(json["kind"]["label"], "Me");
        assert_eq!(json["text"], "Hi");
    }
}
