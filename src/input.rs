//! Reading documents and comment exports from files or stdin.
//!
//! This is the only place that enforces size limits; the pipeline itself
//! assumes its input has already been bounded.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::comments::Comment;
use crate::error::{InputError, InputResult};

/// Where input comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

impl InputSource {
    /// `-` means stdin, anything else is a path.
    pub fn from_arg(arg: &Path) -> Self {
        if arg.as_os_str() == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(arg.to_path_buf())
        }
    }

    fn path(&self) -> PathBuf {
        match self {
            InputSource::File(path) => path.clone(),
            InputSource::Stdin => PathBuf::from("<stdin>"),
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::File(path) => write!(f, "{}", path.display()),
            InputSource::Stdin => f.write_str("-"),
        }
    }
}

/// Read at most `max_bytes` from the source as UTF-8.
///
/// # Errors
///
/// [`InputError::TooLarge`] when the source holds more than `max_bytes`,
/// [`InputError::NotUtf8`] for invalid text, [`InputError::Io`] otherwise.
pub fn read_document(source: &InputSource, max_bytes: usize) -> InputResult<String> {
    let io_err = |source_err: io::Error| InputError::Io {
        path: source.path(),
        source: source_err,
    };

    let mut buf = Vec::new();
    // One byte past the limit is enough to know the input is too large
    let cap = (max_bytes as u64).saturating_add(1);
    match source {
        InputSource::File(path) => {
            let file = File::open(path).map_err(io_err)?;
            file.take(cap).read_to_end(&mut buf).map_err(io_err)?;
        }
        InputSource::Stdin => {
            io::stdin().lock().take(cap).read_to_end(&mut buf).map_err(io_err)?;
        }
    }

    check_document(buf, max_bytes)
}

/// Validate an in-memory document against the byte limit and decode it.
pub fn check_document(bytes: Vec<u8>, max_bytes: usize) -> InputResult<String> {
    if bytes.len() > max_bytes {
        return Err(InputError::TooLarge { limit: max_bytes });
    }
    String::from_utf8(bytes).map_err(|_| InputError::NotUtf8)
}

/// Decode a JSON array of comment rows, rejecting exports above `max_rows`.
///
/// # Errors
///
/// [`InputError::Json`] for malformed rows, [`InputError::TooManyRows`] past
/// the limit.
pub fn parse_comments(json: &str, max_rows: usize) -> InputResult<Vec<Comment>> {
    let comments: Vec<Comment> = serde_json::from_str(json)?;
    if comments.len() > max_rows {
        return Err(InputError::TooManyRows {
            rows: comments.len(),
            limit: max_rows,
        });
    }
    Ok(comments)
}

/// Read and decode comment rows from a file or stdin.
pub fn read_comments(
    source: &InputSource,
    max_bytes: usize,
    max_rows: usize,
) -> InputResult<Vec<Comment>> {
    let json = read_document(source, max_bytes)?;
    parse_comments(&json, max_rows)
}
