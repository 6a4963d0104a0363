//! Output types for a fully processed post.

use serde::{Deserialize, Serialize};

use super::callout::Segment;
use super::code::CodeBlock;
use super::headings::Heading;

/// Everything a renderer needs for one post body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub metadata: PostMetadata,
    /// Body after preamble removal; segment spans index into this
    pub body: String,
    pub segments: Vec<Segment>,
    pub headings: Vec<Heading>,
    #[serde(rename = "codeBlocks")]
    pub code_blocks: Vec<CodeBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetadata {
    pub source: Option<String>,
    #[serde(rename = "headingCount")]
    pub heading_count: usize,
    #[serde(rename = "calloutCount")]
    pub callout_count: usize,
    #[serde(rename = "wordCount")]
    pub word_count: usize,
}

impl Post {
    /// Only the callout segments, in document order.
    pub fn callouts(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_callout())
    }

    /// Attach the name of the file (or `-`) the post was read from.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.metadata.source = Some(source.into());
        self
    }
}
