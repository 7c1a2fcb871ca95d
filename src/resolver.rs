//! Maps emitted, content-hashed files back to their logical chunk names.

use crate::asset_names::{AssetNameTable, HmrMatcher, derive_extension};
use crate::models::{AssetsByChunkName, OutputTemplates, SourceModule};
use crate::options::RevsOptions;

/// Resolves hashed filenames to `chunk + extension` names across successive compilations.
///
/// The resolver is created once per plugin instance. Its table is never reset, so in watch
/// mode files from earlier rebuilds keep their entries until overwritten.
#[derive(Debug, Default)]
pub struct AssetNameResolver {
  options: RevsOptions,
  hmr: Option<HmrMatcher>,
  table: AssetNameTable,
  passes: u64,
}

impl AssetNameResolver {
  /// Create a resolver with an empty table and no hot-update matcher.
  pub fn new(options: RevsOptions) -> Self {
    Self {
      options,
      hmr: None,
      table: AssetNameTable::default(),
      passes: 0,
    }
  }

  /// Attach to a compiler, deriving the hot-update matcher from its output templates.
  pub fn attach(&mut self, templates: &OutputTemplates) {
    self.hmr = HmrMatcher::from_templates(
      templates.filename.as_deref(),
      templates.hot_update_chunk_filename.as_deref(),
    );
    match &self.hmr {
      Some(matcher) => tracing::debug!(pattern = matcher.as_str(), "hot-update matcher ready"),
      None => tracing::debug!("hot-update files are not distinguishable; matcher disabled"),
    }
  }

  /// Options the resolver was built with.
  pub fn options(&self) -> &RevsOptions {
    &self.options
  }

  /// Active hot-update matcher, if any.
  pub fn hmr_matcher(&self) -> Option<&HmrMatcher> {
    self.hmr.as_ref()
  }

  /// Cumulative table of every file recorded so far.
  pub fn table(&self) -> &AssetNameTable {
    &self.table
  }

  /// Logical extension of `filename` under the configured pattern.
  pub fn derive_extension(&self, filename: &str) -> String {
    derive_extension(Some(filename), self.options.file_ext_regex.as_ref())
  }

  /// Whether `filename` is a transient hot-update file.
  pub fn is_hmr(&self, filename: &str) -> bool {
    self
      .hmr
      .as_ref()
      .is_some_and(|matcher| matcher.is_match(filename))
  }

  /// Record every non hot-update file of one compilation and return the cumulative table.
  ///
  /// A filename listed under several chunks ends up named after the last one.
  pub fn process_assets_by_chunk_name(&mut self, assets: &AssetsByChunkName) -> &AssetNameTable {
    self.passes += 1;
    let pass = self.passes;

    for (chunk, files) in assets.iter() {
      for filename in files {
        if self.is_hmr(filename) {
          tracing::trace!(chunk, filename = filename.as_str(), "skipping hot-update file");
          continue;
        }

        let logical = format!("{chunk}{}", self.derive_extension(filename));
        tracing::debug!(chunk, filename = filename.as_str(), logical = logical.as_str(), "recorded asset");
        self.table.insert(filename.clone(), logical, pass);
      }
    }

    &self.table
  }

  /// Per-module asset notification.
  ///
  /// Hot-update files are declined. Recovering the module's original source path is not
  /// implemented, so accepted files leave the table untouched.
  pub fn record_module_asset(&mut self, module: &SourceModule, hashed_file: &str) -> bool {
    if self.is_hmr(hashed_file) {
      return false;
    }

    tracing::trace!(
      module = module.identifier.as_str(),
      request = module.user_request.as_deref(),
      hashed_file,
      "module asset"
    );
    true
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn hot_resolver() -> AssetNameResolver {
    let mut resolver = AssetNameResolver::new(RevsOptions::default());
    resolver.attach(&OutputTemplates::new(
      "[name].[chunkhash].js",
      "[id].[hash:8].hot-update.js",
    ));
    resolver
  }

  fn table_pairs(table: &AssetNameTable) -> Vec<(String, String)> {
    table
      .iter()
      .map(|(file, logical)| (file.to_string(), logical.to_string()))
      .collect()
  }

  #[test]
  fn names_files_after_their_chunk() {
    let mut resolver = AssetNameResolver::new(RevsOptions::default());
    let assets = AssetsByChunkName::new()
      .with("main", "main.abc1234.js")
      .with("vendor", ["vendor.def5678.js", "vendor.def5678.js.map"]);

    let table = resolver.process_assets_by_chunk_name(&assets);

    assert_eq!(table_pairs(table), vec![
      ("main.abc1234.js".to_string(), "main.js".to_string()),
      ("vendor.def5678.js".to_string(), "vendor.js".to_string()),
      ("vendor.def5678.js.map".to_string(), "vendor.js.map".to_string()),
    ]);
  }

  #[test]
  fn accumulates_across_passes() {
    let mut resolver = AssetNameResolver::new(RevsOptions::default());
    resolver.process_assets_by_chunk_name(
      &AssetsByChunkName::new()
        .with("main", "main.aaa.js")
        .with("shared", "shared.bbb.js"),
    );
    let table = resolver.process_assets_by_chunk_name(
      &AssetsByChunkName::new()
        .with("main", "main.ccc.js")
        .with("app", "shared.bbb.js"),
    );

    assert_eq!(table.len(), 3);
    assert_eq!(table.get("main.aaa.js"), Some("main.js"));
    assert_eq!(table.get("main.ccc.js"), Some("main.js"));
    assert_eq!(table.get("shared.bbb.js"), Some("app.js"));
    assert_eq!(table.entry("main.aaa.js").map(|name| name.pass), Some(1));
    assert_eq!(table.entry("shared.bbb.js").map(|name| name.pass), Some(2));
  }

  #[test]
  fn non_ascii_extensions_are_not_part_of_the_logical_name() {
    let mut resolver = AssetNameResolver::new(RevsOptions::default());
    let table = resolver.process_assets_by_chunk_name(
      &AssetsByChunkName::new()
        .with("report", "report.données")
        .with("app", "app.ab.jś.map"),
    );

    assert_eq!(table.get("report.données"), Some("report"));
    assert_eq!(table.get("app.ab.jś.map"), Some("app.map"));
  }

  #[test]
  fn last_chunk_wins_for_shared_filename() {
    let mut resolver = AssetNameResolver::new(RevsOptions::default());
    let table = resolver.process_assets_by_chunk_name(
      &AssetsByChunkName::new()
        .with("first", "common.123.js")
        .with("second", "common.123.js"),
    );

    assert_eq!(table.get("common.123.js"), Some("second.js"));
  }

  #[test]
  fn never_records_hot_update_files() {
    let mut resolver = hot_resolver();
    let batches = [
      AssetsByChunkName::new().with("main", ["main.1.js", "0.a1b2c3d4.hot-update.js"]),
      AssetsByChunkName::new().with("0", "0.ffffffff.hot-update.js"),
      AssetsByChunkName::new().with("main", ["main.2.js", "main.A1B2C3D4.HOT-UPDATE.JS"]),
    ];

    for batch in &batches {
      resolver.process_assets_by_chunk_name(batch);
    }

    let table = resolver.table();
    assert_eq!(table.len(), 2);
    assert!(table.iter().all(|(file, _)| !resolver.is_hmr(file)));
  }

  #[test]
  fn is_hmr_is_false_without_distinct_template() {
    let mut resolver = AssetNameResolver::new(RevsOptions::default());
    assert!(!resolver.is_hmr("0.a1b2c3d4.hot-update.js"));

    resolver.attach(&OutputTemplates::new("[name].js", "[name].js"));
    assert!(resolver.hmr_matcher().is_none());
    assert!(!resolver.is_hmr("0.a1b2c3d4.hot-update.js"));
    assert!(!resolver.is_hmr("main.js"));
  }

  #[test]
  fn is_hmr_matches_configured_template() {
    let resolver = hot_resolver();
    assert!(resolver.is_hmr("3.a1b2c3d4.hot-update.js"));
    assert!(!resolver.is_hmr("app.a1b2c3d4.js"));
  }

  #[test]
  fn uses_path_extension_when_pattern_disabled() {
    let mut resolver =
      AssetNameResolver::new(RevsOptions::default().with_file_ext_regex(None));
    let table = resolver
      .process_assets_by_chunk_name(&AssetsByChunkName::new().with("app", "app.123.js.map"));

    assert_eq!(table.get("app.123.js.map"), Some("app.map"));
  }

  #[test]
  fn record_module_asset_declines_hot_updates_only() {
    let mut resolver = hot_resolver();
    let module = SourceModule {
      identifier: "./src/logo.png".into(),
      user_request: Some("./logo.png".into()),
    };

    assert!(!resolver.record_module_asset(&module, "1.deadbeef.hot-update.js"));
    assert!(resolver.record_module_asset(&module, "logo.3f2a1c9.png"));
    assert!(resolver.table().is_empty());
  }
}
