//! Markdown content pipeline.
//!
//! Turns a raw post into render segments (plain markdown vs. callouts), a
//! heading outline and a list of fenced code blocks. Every function here is
//! pure and total: malformed syntax degrades to literal text, never to an
//! error.
//!
//! The usual order is [`strip_preamble`] once, then [`segment_document`] and
//! [`extract_headings`] over the result. [`parse_post`] does exactly that.

pub mod callout;
pub mod code;
pub mod headings;
pub mod outline;
pub mod output;
pub mod preamble;
pub mod utils;

pub use callout::{
    CalloutSyntax, CalloutVariant, Segment, SegmentKind, segment_document, segment_document_with,
};
pub use code::{CodeBlock, extract_code_blocks, strip_code_blocks};
pub use headings::{Heading, extract_headings, generate_heading_id};
pub use outline::{OutlineNode, build_outline};
pub use output::{Post, PostMetadata};
pub use preamble::strip_preamble;

use crate::config::ContentConfig;
use crate::error::InputResult;
use crate::input::{self, InputSource};

/// Run the whole pipeline with default settings.
///
/// # Examples
///
/// ```
/// use dsqr_content::parse_post;
///
/// let raw = "---\ntitle: Hi\n---\n# Hi\n\n## Setup\n\n:::note\nRead me.\n:::\n";
/// let post = parse_post(raw);
/// assert_eq!(post.headings[0].id, "setup");
/// assert_eq!(post.callouts().count(), 1);
/// ```
pub fn parse_post(raw: &str) -> Post {
    parse_post_with(raw, &ContentConfig::default())
}

/// Run the whole pipeline with the given content settings.
pub fn parse_post_with(raw: &str, config: &ContentConfig) -> Post {
    let body = if config.strip_preamble {
        strip_preamble(raw)
    } else {
        raw.to_string()
    };

    let segments = segment_document_with(&body, config.callout_syntax);
    let headings = extract_headings(&body);
    let code_blocks = extract_code_blocks(&body);

    let metadata = PostMetadata {
        source: None,
        heading_count: headings.len(),
        callout_count: segments.iter().filter(|s| s.is_callout()).count(),
        word_count: utils::word_count(&body),
    };

    tracing::debug!(
        segments = segments.len(),
        callouts = metadata.callout_count,
        headings = headings.len(),
        code_blocks = code_blocks.len(),
        "parsed post"
    );

    Post {
        metadata,
        body,
        segments,
        headings,
        code_blocks,
    }
}

/// Read and parse a post from a file or stdin, enforcing the size limit.
///
/// # Errors
///
/// Returns an error if the source cannot be read, is larger than
/// `max_bytes`, or is not UTF-8.
pub fn parse_source(
    source: &InputSource,
    config: &ContentConfig,
    max_bytes: usize,
) -> InputResult<Post> {
    let raw = input::read_document(source, max_bytes)?;
    Ok(parse_post_with(&raw, config).with_source(source.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const POST: &str = r#"---
title: Caching at the edge
date: 2025-03-02
---

# Caching at the edge

Intro paragraph.

## Why cache

:::tip[Fast Fact]
Use caching.
:::

```sh
# warm the cache
curl https://dsqr.dev
```

## How

:::purple
Written by me.
:::
"#;

    #[test]
    fn test_parse_post() {
        let post = parse_post(POST);

        assert!(post.body.starts_with("Intro paragraph."));
        let ids: Vec<_> = post.headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["why-cache", "how"]);

        let callouts: Vec<_> = post.callouts().collect();
        assert_eq!(callouts.len(), 2);
        assert_eq!(callouts[0].title(), Some("Fast Fact"));
        assert_eq!(callouts[1].variant(), Some(CalloutVariant::MoreInfo));

        assert_eq!(post.code_blocks.len(), 1);
        assert_eq!(post.code_blocks[0].language.as_deref(), Some("sh"));
        assert_eq!(post.metadata.heading_count, 2);
        assert_eq!(post.metadata.callout_count, 2);
    }

    #[test]
    fn test_segments_reconstruct_body() {
        let post = parse_post(POST);
        let rebuilt: String = post
            .segments
            .iter()
            .map(|s| &post.body[s.span.clone()])
            .collect();
        assert_eq!(rebuilt, post.body);
    }

    #[test]
    fn test_keep_preamble() {
        let config = ContentConfig {
            strip_preamble: false,
            ..ContentConfig::default()
        };
        let post = parse_post_with(POST, &config);
        assert!(post.body.starts_with("---\ntitle"));
        assert_eq!(post.headings[0].level, 1);
    }

    #[test]
    fn test_jsx_syntax_from_config() {
        let config = ContentConfig {
            callout_syntax: CalloutSyntax::JsxTag,
            ..ContentConfig::default()
        };
        let post = parse_post_with("<Warning>Hot.</Warning>", &config);
        assert_eq!(post.segments[0].variant(), Some(CalloutVariant::Warning));
    }
}
