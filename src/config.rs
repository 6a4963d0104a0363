use crate::comments::OrphanPolicy;
use crate::error::ConfigError;
use crate::parser::CalloutSyntax;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub comments: CommentsConfig,

    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Content pipeline options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Callout block syntax: "directive" (default) or "jsx-tag"
    #[serde(default)]
    pub callout_syntax: CalloutSyntax,

    /// Remove frontmatter and the leading H1 before segmenting (default: true)
    #[serde(default = "default_strip_preamble")]
    pub strip_preamble: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            callout_syntax: CalloutSyntax::default(),
            strip_preamble: default_strip_preamble(),
        }
    }
}

fn default_strip_preamble() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentsConfig {
    /// Replies whose parent is missing: "drop" (default) or "promote"
    #[serde(default)]
    pub orphans: OrphanPolicy,
}

/// Input bounds enforced before anything is parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,

    #[serde(default = "default_max_comment_rows")]
    pub max_comment_rows: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: default_max_document_bytes(),
            max_comment_rows: default_max_comment_rows(),
        }
    }
}

fn default_max_document_bytes() -> usize {
    1024 * 1024
}

fn default_max_comment_rows() -> usize {
    10_000
}

impl Config {
    /// Get the platform-specific config file path
    /// - macOS: ~/Library/Application Support/dsqr-content/config.toml
    /// - Linux: ~/.config/dsqr-content/config.toml
    /// - Windows: %APPDATA%/dsqr-content/config.toml
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dsqr-content").join("config.toml"))
    }

    /// Load config from the default location, or return defaults.
    ///
    /// A missing file is normal. An unreadable or invalid one is logged and
    /// ignored so a broken config never blocks a one-off command.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        match Self::load_from_path(&path) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(err) => {
                tracing::warn!(%err, "ignoring config file");
                Self::default()
            }
        }
    }

    /// Load config from an explicit path. `Ok(None)` if the file does not exist.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            config_path: config_path.to_path_buf(),
            source,
        })?;

        let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            config_path: config_path.to_path_buf(),
            source,
        })?;

        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.content.callout_syntax, CalloutSyntax::Directive);
        assert!(config.content.strip_preamble);
        assert_eq!(config.comments.orphans, OrphanPolicy::Drop);
        assert_eq!(config.limits.max_document_bytes, 1_048_576);
        assert_eq!(config.limits.max_comment_rows, 10_000);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[comments]\norphans = \"promote\"\n").unwrap();
        assert_eq!(config.comments.orphans, OrphanPolicy::Promote);
        assert_eq!(config.content, ContentConfig::default());
        assert_eq!(config.limits, LimitsConfig::default());
    }

    #[test]
    fn test_full_toml() {
        let toml_str = r#"
[content]
callout_syntax = "jsx-tag"
strip_preamble = false

[limits]
max_document_bytes = 2048
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.content.callout_syntax, CalloutSyntax::JsxTag);
        assert!(!config.content.strip_preamble);
        assert_eq!(config.limits.max_document_bytes, 2048);
        assert_eq!(config.limits.max_comment_rows, 10_000);
    }

    #[test]
    fn test_load_from_missing_path() {
        let result = Config::load_from_path("/definitely/not/a/config.toml").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[content]\ncallout_syntax = \"jsx-tag\"").unwrap();
        let config = Config::load_from_path(file.path()).unwrap().unwrap();
        assert_eq!(config.content.callout_syntax, CalloutSyntax::JsxTag);
    }

    #[test]
    fn test_load_from_invalid_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[comments]\norphans = \"keep\"").unwrap();
        assert!(matches!(
            Config::load_from_path(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_config_path() {
        if let Some(path) = Config::config_path() {
            assert!(path.ends_with("dsqr-content/config.toml"));
        }
    }
}
