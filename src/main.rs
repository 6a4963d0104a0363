//! # dsqr-content
//!
//! Command-line front end for the dsqr.dev content pipeline.
//!
//! ## Usage
//!
//! Show how a post splits into markdown and callouts:
//! ```sh
//! dsqr-content segments post.mdx
//! ```
//!
//! Show the in-page outline:
//! ```sh
//! dsqr-content headings -o tree post.mdx
//! ```
//!
//! Rebuild the reply threads of one post:
//! ```sh
//! dsqr-content comments rows.json --post 42
//! ```

mod cli;

use clap::Parser as ClapParser;
use cli::{Cli, Command, OrphansArg, OutputFormat, SyntaxArg};
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use dsqr_content::comments::{self, Comment, CommentNode, OrphanPolicy};
use dsqr_content::config::{Config, ContentConfig};
use dsqr_content::input::{self, InputSource};
use dsqr_content::logging;
use dsqr_content::parser::utils::trim_line_ends;
use dsqr_content::parser::{self, CalloutSyntax, Post};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

fn main() -> Result<()> {
    color_eyre::install()?;

    // Handle dynamic shell completions
    #[cfg(feature = "unstable-dynamic")]
    clap_complete::CompleteEnv::with_factory(|| {
        use clap::CommandFactory;
        Cli::command()
    })
    .complete();

    let args = Cli::parse();
    logging::init(args.verbose)?;

    let config = load_config(args.config.as_deref())?;
    tracing::debug!(?config, "loaded config");

    match args.command {
        Command::Segments {
            file,
            output,
            syntax,
            keep_preamble,
        } => {
            let mut content = content_config(&config, syntax);
            if keep_preamble {
                content.strip_preamble = false;
            }
            let post = read_post(&file, &content, &config)?;
            print_segments(&post, output)
        }
        Command::Headings { file, output } => {
            let post = read_post(&file, &config.content, &config)?;
            print_headings(&post, output)
        }
        Command::Code { file, output } => {
            let post = read_post(&file, &config.content, &config)?;
            print_code_blocks(&post, output)
        }
        Command::Render { file, syntax } => {
            let post = read_post(&file, &content_config(&config, syntax), &config)?;
            render_post(&post);
            Ok(())
        }
        Command::Comments {
            file,
            post,
            count,
            orphans,
            output,
            width,
        } => {
            let source = InputSource::from_arg(&file);
            let rows = input::read_comments(
                &source,
                config.limits.max_document_bytes,
                config.limits.max_comment_rows,
            )
            .wrap_err_with(|| format!("Failed to load comments from {source}"))?;

            if count {
                return print_comment_counts(&rows, post.as_deref(), output);
            }

            let rows = comments::working_set(&rows, post.as_deref());
            let policy = orphans
                .map(OrphanPolicy::from)
                .unwrap_or(config.comments.orphans);
            let tree = comments::build_tree_with(&rows, policy);
            tracing::debug!(
                rows = rows.len(),
                threads = tree.len(),
                shown = comments::tree_size(&tree),
                "built comment tree"
            );
            print_comment_tree(&tree, output, width)
        }
    }
}

/// Explicit `--config` paths must exist and parse; the default path is best effort.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::load());
    };

    Config::load_from_path(path)?
        .ok_or_else(|| color_eyre::eyre::eyre!("Config file not found: {}", path.display()))
}

fn content_config(config: &Config, syntax: Option<SyntaxArg>) -> ContentConfig {
    let mut content = config.content.clone();
    if let Some(syntax) = syntax {
        content.callout_syntax = syntax.into();
    }
    content
}

fn read_post(file: &Path, content: &ContentConfig, config: &Config) -> Result<Post> {
    let source = InputSource::from_arg(file);
    parser::parse_source(&source, content, config.limits.max_document_bytes)
        .wrap_err_with(|| format!("Failed to load post from {source}"))
}

impl From<SyntaxArg> for CalloutSyntax {
    fn from(arg: SyntaxArg) -> Self {
        match arg {
            SyntaxArg::Directive => CalloutSyntax::Directive,
            SyntaxArg::JsxTag => CalloutSyntax::JsxTag,
        }
    }
}

impl From<OrphansArg> for OrphanPolicy {
    fn from(arg: OrphansArg) -> Self {
        match arg {
            OrphansArg::Drop => OrphanPolicy::Drop,
            OrphansArg::Promote => OrphanPolicy::Promote,
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

fn print_segments(post: &Post, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&post.segments),
        OutputFormat::Plain | OutputFormat::Tree => {
            for segment in &post.segments {
                let span = format!("{}..{}", segment.span.start, segment.span.end);
                match (segment.variant(), segment.title()) {
                    (Some(variant), Some(title)) => {
                        println!("{:<12} callout  {} \"{}\"", span, variant, title)
                    }
                    _ => println!("{:<12} markdown", span),
                }
            }
            println!(
                "\n{} segments, {} callouts",
                post.segments.len(),
                post.metadata.callout_count
            );
            Ok(())
        }
    }
}

fn print_headings(post: &Post, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Plain => {
            for heading in &post.headings {
                println!(
                    "{}{} {}  {}",
                    "  ".repeat(heading.indent()),
                    "#".repeat(heading.level),
                    heading.text,
                    heading.href()
                );
            }
            Ok(())
        }
        OutputFormat::Json => print_json(&post.headings),
        OutputFormat::Tree => {
            let outline = parser::build_outline(&post.headings);
            for (i, node) in outline.iter().enumerate() {
                let is_last = i == outline.len() - 1;
                print!("{}", node.render_box_tree("", is_last));
            }
            Ok(())
        }
    }
}

fn print_code_blocks(post: &Post, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&post.code_blocks),
        OutputFormat::Plain | OutputFormat::Tree => {
            for (i, block) in post.code_blocks.iter().enumerate() {
                println!(
                    "{:>3}. {:<12} {} lines",
                    i + 1,
                    block.language.as_deref().unwrap_or("text"),
                    block.line_count
                );
            }
            Ok(())
        }
    }
}

/// Terminal preview. Callouts become block quotes headed by their title.
fn render_post(post: &Post) {
    let mut markdown = String::with_capacity(post.body.len());
    for segment in &post.segments {
        match segment.title() {
            Some(title) => {
                markdown.push_str(&format!("\n> **{}**\n>\n", title));
                for line in segment.text.lines() {
                    markdown.push_str("> ");
                    markdown.push_str(line);
                    markdown.push('\n');
                }
                markdown.push('\n');
            }
            None => markdown.push_str(&segment.text),
        }
    }

    let skin = termimad::MadSkin::default();
    skin.print_text(&trim_line_ends(&markdown));
}

fn print_comment_counts(rows: &[Comment], post: Option<&str>, format: OutputFormat) -> Result<()> {
    match post {
        Some(post_id) => {
            let count = comments::count_active(&comments::filter_for_post(rows, post_id));
            match format {
                OutputFormat::Json => print_json(&BTreeMap::from([(post_id, count)])),
                OutputFormat::Plain | OutputFormat::Tree => {
                    println!("{}", count);
                    Ok(())
                }
            }
        }
        None => {
            let counts = comments::count_by_post(rows);
            match format {
                OutputFormat::Json => print_json(&counts),
                OutputFormat::Plain | OutputFormat::Tree => {
                    for (post_id, count) in &counts {
                        println!("{}\t{}", post_id, count);
                    }
                    println!("\nTotal: {}", comments::count_active(rows));
                    Ok(())
                }
            }
        }
    }
}

fn print_comment_tree(tree: &[CommentNode], format: OutputFormat, width: usize) -> Result<()> {
    match format {
        // Compact: pretty-printing indents once per reply level
        OutputFormat::Json => {
            let mut out = io::BufWriter::new(io::stdout().lock());
            comments::write_json(tree, &mut out)?;
            writeln!(out)?;
            out.flush()?;
            Ok(())
        }
        OutputFormat::Tree => {
            let mut rendered = String::new();
            for (i, node) in tree.iter().enumerate() {
                let is_last = i == tree.len() - 1;
                node.write_box_tree(&mut rendered, "", is_last, width)?;
            }
            print!("{}", rendered);
            Ok(())
        }
        OutputFormat::Plain => {
            // Depth-first with explicit stack; threads can be arbitrarily deep
            let mut pending: Vec<(usize, &CommentNode)> =
                tree.iter().rev().map(|node| (0, node)).collect();
            while let Some((depth, node)) = pending.pop() {
                println!(
                    "{}{}\t{}\t{}",
                    "  ".repeat(depth.min(comments::MAX_INDENT_DEPTH)),
                    node.comment.id,
                    node.comment.author(),
                    node.comment.created_at.to_rfc3339()
                );
                pending.extend(node.replies.iter().rev().map(|reply| (depth + 1, reply)));
            }
            Ok(())
        }
    }
}
