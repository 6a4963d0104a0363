//! # dsqr-content
//!
//! The content pipeline and comment threading behind the dsqr.dev blog.
//!
//! Posts are markdown with two additions: a YAML frontmatter block and
//! `:::variant[label]` callout blocks. This library turns a raw post into
//! render segments and an in-page heading outline, and rebuilds nested reply
//! threads from flat comment rows.
//!
//! ## Features
//!
//! - Strip frontmatter and the repeated title heading
//! - Split a body into markdown and callout segments
//! - Extract headings (code-block aware) with stable anchor ids
//! - Nest headings into an outline tree
//! - Rebuild comment reply trees and count comments per post
//!
//! ## Example
//!
//! ```rust
//! use dsqr_content::{parse_post, comments};
//!
//! let raw = r#"---
//! title: Edge caching
//! ---
//! # Edge caching
//!
//! ## Why
//!
//! :::tip[Fast Fact]
//! Use caching.
//! :::
//! "#;
//!
//! let post = parse_post(raw);
//! for heading in &post.headings {
//!     println!("{} -> #{}", heading.text, heading.id);
//! }
//! for segment in post.callouts() {
//!     println!("{}: {}", segment.title().unwrap_or_default(), segment.text);
//! }
//!
//! let threads = comments::build_tree(&[]);
//! assert!(threads.is_empty());
//! ```

/// Configuration file support.
///
/// Provides content, comment and input-limit settings loaded from TOML.
pub mod config;

/// Boundary error types.
pub mod error;

/// Input handling for files and stdin.
///
/// Enforces document size and comment row limits.
pub mod input;

/// Content pipeline for markdown posts.
///
/// Provides preamble stripping, callout segmentation, heading extraction and
/// outline building.
pub mod parser;

/// Comment thread reconstruction and counts.
pub mod comments;

/// Tracing subscriber setup.
pub mod logging;

// Re-export commonly used types for convenience
pub use comments::{Comment, CommentNode, OrphanPolicy, build_tree, count_active};
pub use config::Config;
pub use error::{ConfigError, InputError};
pub use parser::{
    CalloutVariant, Heading, Post, Segment, extract_headings, generate_heading_id, parse_post,
    segment_document, strip_preamble,
};
