//! Resolver and plugin options.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

/// Default file name of the persisted manifest.
pub const DEFAULT_OUTPUT: &str = "filerevs.json";

/// Default length of the content hash embedded in emitted filenames.
pub const DEFAULT_HASH_LENGTH: usize = 7;

/// Default extension pattern.
///
/// Compound `.js.map` / `.css.gz` suffixes are tried before the plain trailing extension so
/// source maps and precompressed files keep their full logical suffix. Word characters are
/// ASCII only.
pub const DEFAULT_FILE_EXT_PATTERN: &str = r"(?i)\.(?-u:\w){2,4}\.(?:map|gz)$|\.(?-u:\w)+$";

pub(crate) fn default_file_ext_regex() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(DEFAULT_FILE_EXT_PATTERN).expect("invalid extension regex"))
}

/// Immutable configuration for [`crate::AssetNameResolver`] and [`crate::RevsPlugin`].
#[derive(Debug, Clone)]
pub struct RevsOptions {
  /// Length of the content hash in emitted filenames. Currently informational only.
  pub hash_length: usize,
  /// Public URL prefix for manifest consumers. Currently informational only.
  pub public_path: Option<String>,
  /// Pattern used to extract the logical extension of an emitted file.
  ///
  /// `None` falls back to plain last-dot extension extraction.
  pub file_ext_regex: Option<Regex>,
  /// Destination of the persisted manifest, relative to the compilation output path.
  pub output: PathBuf,
}

impl Default for RevsOptions {
  fn default() -> Self {
    Self {
      hash_length: DEFAULT_HASH_LENGTH,
      public_path: None,
      file_ext_regex: Some(default_file_ext_regex().clone()),
      output: PathBuf::from(DEFAULT_OUTPUT),
    }
  }
}

impl RevsOptions {
  /// Replace the manifest destination.
  pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
    self.output = output.into();
    self
  }

  /// Replace the extension pattern, or disable it with `None`.
  pub fn with_file_ext_regex(mut self, pattern: Option<Regex>) -> Self {
    self.file_ext_regex = pattern;
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_match_documented_values() {
    let options = RevsOptions::default();
    assert_eq!(options.hash_length, 7);
    assert!(options.public_path.is_none());
    assert_eq!(options.output, PathBuf::from("filerevs.json"));
    assert_eq!(
      options.file_ext_regex.as_ref().map(Regex::as_str),
      Some(DEFAULT_FILE_EXT_PATTERN)
    );
  }

  #[test]
  fn default_pattern_prefers_compound_suffixes() {
    let pattern = default_file_ext_regex();
    let found = |name: &str| pattern.find(name).map(|m| m.as_str().to_string());

    assert_eq!(found("vendor.1a2b3c4.js.map").as_deref(), Some(".js.map"));
    assert_eq!(found("site.1a2b3c4.CSS.GZ").as_deref(), Some(".CSS.GZ"));
    assert_eq!(found("vendor.1a2b3c4.js").as_deref(), Some(".js"));
    assert_eq!(found("README"), None);
  }
}
