use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[cfg(feature = "unstable-dynamic")]
use clap_complete::engine::{ArgValueCompleter, CompletionCandidate, ValueCompleter};

#[derive(Parser, Debug)]
#[command(name = "dsqr-content")]
#[command(version)]
#[command(about = "Inspect dsqr.dev posts and comment threads")]
#[command(
    long_about = "dsqr-content - the content pipeline behind dsqr.dev, as a command-line tool.\n\n\
    Splits posts into markdown and callout segments, extracts the heading outline\n\
    used for in-page navigation, and rebuilds comment reply threads from exported rows.\n\n\
    Examples:\n  \
    dsqr-content segments post.mdx             # Markdown vs. callout segments\n  \
    dsqr-content headings -o tree post.mdx     # Heading outline as a tree\n  \
    dsqr-content render post.mdx               # Terminal preview\n  \
    dsqr-content comments rows.json --post ID  # Reply threads for one post\n  \
    cat post.mdx | dsqr-content headings -     # Read from stdin"
)]
pub struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (DSQR_LOG / RUST_LOG take precedence)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Split a post into markdown and callout segments
    ///
    /// Frontmatter and the leading title are stripped first unless
    /// --keep-preamble is given.
    Segments {
        /// Post file (.md, .mdx), or '-' for stdin
        #[arg(add = document_completer())]
        file: PathBuf,

        #[arg(short = 'o', long = "output", default_value = "plain")]
        output: OutputFormat,

        /// Callout syntax to recognise (overrides config)
        #[arg(long = "syntax", value_name = "SYNTAX")]
        syntax: Option<SyntaxArg>,

        /// Do not strip frontmatter and the leading H1
        #[arg(long = "keep-preamble")]
        keep_preamble: bool,
    },

    /// List the heading outline with anchor ids
    ///
    /// Headings inside fenced code blocks are ignored.
    Headings {
        /// Post file (.md, .mdx), or '-' for stdin
        #[arg(add = document_completer())]
        file: PathBuf,

        /// plain: one heading per line, json: flat list, tree: nested outline
        #[arg(short = 'o', long = "output", default_value = "plain")]
        output: OutputFormat,
    },

    /// List fenced code blocks with language and line count
    Code {
        /// Post file (.md, .mdx), or '-' for stdin
        #[arg(add = document_completer())]
        file: PathBuf,

        #[arg(short = 'o', long = "output", default_value = "plain")]
        output: OutputFormat,
    },

    /// Preview a post in the terminal with callouts as quoted blocks
    Render {
        /// Post file (.md, .mdx), or '-' for stdin
        #[arg(add = document_completer())]
        file: PathBuf,

        /// Callout syntax to recognise (overrides config)
        #[arg(long = "syntax", value_name = "SYNTAX")]
        syntax: Option<SyntaxArg>,
    },

    /// Rebuild reply threads from a JSON array of comment rows
    ///
    /// Rows use the API's camelCase fields (id, postId, userId,
    /// parentCommentId, content, isActive, createdAt). Inactive rows are always
    /// left out. Without --post the rest are assumed to be scoped and ordered.
    Comments {
        /// JSON file, or '-' for stdin
        #[arg(add = json_completer())]
        file: PathBuf,

        /// Keep only active comments of this post, newest first
        #[arg(long = "post", value_name = "POST_ID")]
        post: Option<String>,

        /// Print active comment counts instead of threads
        #[arg(long = "count")]
        count: bool,

        /// Replies whose parent is missing (overrides config)
        #[arg(long = "orphans", value_name = "POLICY")]
        orphans: Option<OrphansArg>,

        #[arg(short = 'o', long = "output", default_value = "tree")]
        output: OutputFormat,

        /// Maximum preview width for comment bodies in tree output
        #[arg(long = "width", default_value_t = 72)]
        width: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// JSON output
    Json,
    /// Tree format with box-drawing
    Tree,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SyntaxArg {
    /// :::variant[label] ... :::
    Directive,
    /// <Variant> ... </Variant>
    JsxTag,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrphansArg {
    /// Leave replies to missing comments out
    Drop,
    /// Show them at the top level, marked as orphaned
    Promote,
}

#[cfg(feature = "unstable-dynamic")]
fn document_completer() -> ArgValueCompleter {
    ArgValueCompleter::new(ExtensionCompleter(&["md", "mdx", "markdown"]))
}

#[cfg(feature = "unstable-dynamic")]
fn json_completer() -> ArgValueCompleter {
    ArgValueCompleter::new(ExtensionCompleter(&["json"]))
}

/// Completes directories and files with one of the given extensions.
#[cfg(feature = "unstable-dynamic")]
struct ExtensionCompleter(&'static [&'static str]);

#[cfg(feature = "unstable-dynamic")]
impl ValueCompleter for ExtensionCompleter {
    fn complete(&self, current: &std::ffi::OsStr) -> Vec<CompletionCandidate> {
        use std::path::Path;

        let input_str = current.to_string_lossy();
        let input_path = Path::new(input_str.as_ref());

        let (search_dir, prefix) = if input_str.is_empty() {
            (Path::new("."), String::new())
        } else if input_str.ends_with('/') || input_str.ends_with('\\') {
            (input_path, String::new())
        } else {
            // parent() is Some("") for bare file names
            let parent = input_path.parent().unwrap_or(Path::new("."));
            let dir = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            let prefix = input_path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            (dir, prefix)
        };

        let Ok(entries) = std::fs::read_dir(search_dir) else {
            return vec![];
        };

        entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let path = entry.path();
                let file_name = path.file_name()?.to_string_lossy().to_string();

                if !prefix.is_empty()
                    && !file_name.to_lowercase().starts_with(&prefix.to_lowercase())
                {
                    return None;
                }

                let completion_value = if search_dir == Path::new(".") {
                    file_name.clone()
                } else {
                    search_dir.join(&file_name).to_string_lossy().to_string()
                };

                if path.is_dir() {
                    let mut dir_completion = completion_value;
                    if !dir_completion.ends_with('/') {
                        dir_completion.push('/');
                    }
                    return Some(
                        CompletionCandidate::new(dir_completion).help(Some("directory".into())),
                    );
                }

                let ext = path.extension()?.to_string_lossy().to_lowercase();
                self.0
                    .contains(&ext.as_str())
                    .then(|| CompletionCandidate::new(completion_value))
            })
            .collect()
    }
}

#[cfg(not(feature = "unstable-dynamic"))]
fn document_completer() -> clap::builder::ValueHint {
    clap::ValueHint::FilePath
}

#[cfg(not(feature = "unstable-dynamic"))]
fn json_completer() -> clap::builder::ValueHint {
    clap::ValueHint::FilePath
}
