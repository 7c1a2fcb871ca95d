//! Configuration file loader for plugin options.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;

use crate::options::{DEFAULT_FILE_EXT_PATTERN, DEFAULT_HASH_LENGTH, DEFAULT_OUTPUT, RevsOptions};

/// File name looked up by [`RevsConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "filerevs.config.json";

/// Serialised form of [`RevsOptions`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevsConfig {
    /// Length of the content hash in emitted filenames.
    pub hash_length: usize,
    /// Public URL prefix for manifest consumers.
    pub public_path: Option<String>,
    /// Extension pattern source. An explicit `null` selects last-dot extension extraction.
    #[serde(default = "default_file_ext_regex")]
    pub file_ext_regex: Option<String>,
    /// Manifest destination.
    pub output: PathBuf,
}

fn default_file_ext_regex() -> Option<String> {
    Some(DEFAULT_FILE_EXT_PATTERN.to_string())
}

impl Default for RevsConfig {
    fn default() -> Self {
        Self {
            hash_length: DEFAULT_HASH_LENGTH,
            public_path: None,
            file_ext_regex: default_file_ext_regex(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

/// Errors that can occur while loading plugin configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Source I/O error.
        source: std::io::Error,
    },
    /// Failed to parse the configuration JSON.
    Parse {
        /// Path that caused the error.
        path: PathBuf,
        /// Source parse error.
        source: serde_json::Error,
    },
    /// The extension pattern is not a valid regular expression.
    Pattern {
        /// Offending pattern source.
        pattern: String,
        /// Source regex error.
        source: regex::Error,
    },
}

impl RevsConfig {
    /// Load configuration from `dir`, falling back to defaults when the file is absent or
    /// cannot be parsed.
    pub fn discover(dir: &Path) -> Self {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        match Self::from_path(&candidate) {
            Ok(config) => config,
            Err(err) => {
                if !matches!(&err, ConfigError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
                {
                    tracing::warn!(error = %err, "using default filerevs configuration");
                }
                Self::default()
            }
        }
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Compile the configuration into resolver options.
    pub fn into_options(self) -> Result<RevsOptions, ConfigError> {
        let file_ext_regex = match self.file_ext_regex {
            Some(pattern) => Some(Regex::new(&pattern).map_err(|source| ConfigError::Pattern {
                pattern: pattern.clone(),
                source,
            })?),
            None => None,
        };

        Ok(RevsOptions {
            hash_length: self.hash_length,
            public_path: self.public_path,
            file_ext_regex,
            output: self.output,
        })
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
            Self::Pattern { pattern, source } => {
                write!(f, "invalid fileExtRegex `{}`: {}", pattern, source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Pattern { source, .. } => Some(source),
        }
    }
}
