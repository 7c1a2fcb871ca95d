use std::sync::OnceLock;

use regex::{Captures, Regex};

fn placeholder_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"(?i)\[[a-z]+(?::(\d+))?\]").expect("invalid placeholder regex"))
}

/// Recognises transient hot-update filenames emitted during watch builds.
#[derive(Debug, Clone)]
pub struct HmrMatcher {
  pattern: Regex,
}

impl HmrMatcher {
  /// Build a matcher from the bundler's output filename templates.
  ///
  /// Returns `None` when there is no hot-update template or it is identical to the main
  /// filename template, since hot-update files are then indistinguishable from real chunks.
  pub fn from_templates(filename: Option<&str>, hot_update: Option<&str>) -> Option<Self> {
    let hot_update = hot_update?;
    if filename == Some(hot_update) {
      return None;
    }
    Self::from_template(hot_update)
  }

  /// Compile a single hot-update template such as `[id].[hash:8].hot-update.js`.
  ///
  /// Placeholders with a width become fixed-length wildcards, other placeholders match one or
  /// more characters, and the result is anchored to the end of the filename.
  pub fn from_template(template: &str) -> Option<Self> {
    let mut source = String::from("(?i)");
    let mut last = 0;

    for caps in placeholder_pattern().captures_iter(template) {
      let Some(whole) = caps.get(0) else {
        continue;
      };
      source.push_str(&regex::escape(&template[last..whole.start()]));
      source.push_str(&placeholder_wildcard(&caps));
      last = whole.end();
    }
    source.push_str(&regex::escape(&template[last..]));
    source.push('$');

    match Regex::new(&source) {
      Ok(pattern) => Some(Self { pattern }),
      Err(err) => {
        tracing::warn!(template, error = %err, "ignoring unusable hot-update template");
        None
      }
    }
  }

  /// Whether `filename` ends in something produced by the hot-update template.
  pub fn is_match(&self, filename: &str) -> bool {
    self.pattern.is_match(filename)
  }

  /// Compiled pattern source.
  pub fn as_str(&self) -> &str {
    self.pattern.as_str()
  }
}

fn placeholder_wildcard(caps: &Captures<'_>) -> String {
  match caps.get(1) {
    Some(width) => format!(".{{{}}}", width.as_str()),
    None => ".+".to_string(),
  }
}
