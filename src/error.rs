//! Error types for the input boundary and configuration loading.
//!
//! The content pipeline and the comment tree builder are total over their
//! inputs and never return errors. Everything that can fail happens at the
//! edge: reading files, enforcing size limits, decoding JSON rows.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for boundary operations
pub type InputResult<T> = Result<T, InputError>;

/// Errors raised when input is rejected before it reaches the pipeline.
#[derive(Debug, Error)]
pub enum InputError {
    /// Document exceeds the configured byte limit. Reads stop one byte past
    /// the limit, so the full size is not known.
    #[error("document is larger than {limit} bytes")]
    TooLarge { limit: usize },

    /// Comment export contains more rows than allowed
    #[error("comment file has {rows} rows, limit is {limit}")]
    TooManyRows { rows: usize, limit: usize },

    /// Document is not valid UTF-8
    #[error("document is not valid UTF-8")]
    NotUtf8,

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid comment JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Token that does not name a callout variant
    #[error("unknown callout variant '{0}'")]
    UnknownVariant(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {config_path}: {source}")]
    Read {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {config_path}: {source}")]
    Parse {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}
