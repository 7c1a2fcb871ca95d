use std::path::Path;

use regex::Regex;

/// Remove any `?query` or `#fragment` suffix from an emitted filename.
pub fn strip_query_suffix(filename: &str) -> &str {
    filename
        .split(['?', '#'])
        .next()
        .unwrap_or(filename)
}

/// Derive the logical extension of an emitted filename.
///
/// Query and fragment suffixes are stripped first. With a pattern, the first match is the
/// extension and a miss yields an empty string. Without one, the last dot-separated segment
/// of the file name is used, so dotfiles such as `.env` have no extension.
pub fn derive_extension(filename: Option<&str>, pattern: Option<&Regex>) -> String {
    let Some(filename) = filename.filter(|value| !value.is_empty()) else {
        return String::new();
    };

    let filename = strip_query_suffix(filename);

    match pattern {
        Some(pattern) => pattern
            .find(filename)
            .map(|found| found.as_str().to_string())
            .unwrap_or_default(),
        None => Path::new(filename)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default(),
    }
}
