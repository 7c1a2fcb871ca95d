use std::path::PathBuf;

use anyhow::Result;

use super::{BuildPlugin, PluginName, RevsHooks};
use crate::asset_names::AssetNameTable;
use crate::manifest::Manifest;
use crate::models::{CompilationStats, OutputTemplates, SourceModule};
use crate::options::RevsOptions;
use crate::resolver::AssetNameResolver;

const PLUGIN_NAME: &str = "filerevs";

/// Records logical names for hashed chunk files and writes them as a revision manifest.
#[derive(Debug, Default)]
pub struct RevsPlugin {
  resolver: AssetNameResolver,
  hooks: RevsHooks,
}

impl RevsPlugin {
  /// Create a plugin with the given options.
  pub fn new(options: RevsOptions) -> Self {
    Self {
      resolver: AssetNameResolver::new(options),
      hooks: RevsHooks::default(),
    }
  }

  /// Register observers.
  pub fn hooks_mut(&mut self) -> &mut RevsHooks {
    &mut self.hooks
  }

  /// Underlying resolver.
  pub fn resolver(&self) -> &AssetNameResolver {
    &self.resolver
  }

  /// Cumulative name table.
  pub fn table(&self) -> &AssetNameTable {
    self.resolver.table()
  }

  /// Manifest view of the current table. `transform` observers only run when it is written.
  pub fn manifest(&self) -> Manifest {
    Manifest::from_table(self.resolver.table())
  }

  fn transformed_manifest(&mut self) -> Manifest {
    let table = self.resolver.table();
    self.hooks.call_transform(Manifest::from_table(table), table)
  }

  /// Where the manifest of `stats` is written, if anywhere.
  ///
  /// A relative `output` is resolved against the compilation output path; without one there
  /// is no destination.
  pub fn manifest_path(&self, stats: &CompilationStats) -> Option<PathBuf> {
    let output = &self.resolver.options().output;
    if output.is_absolute() {
      return Some(output.clone());
    }
    stats
      .output_path
      .as_ref()
      .map(|output_path| output_path.join(output))
  }
}

impl BuildPlugin for RevsPlugin {
  fn name(&self) -> PluginName<'_> {
    PLUGIN_NAME.into()
  }

  fn apply(&mut self, templates: &OutputTemplates) {
    self.resolver.attach(templates);
    self.hooks.call_apply(self.resolver.table());
  }

  fn compilation(&mut self, stats: &CompilationStats) {
    tracing::trace!(hash = stats.hash.as_deref(), "compilation started");
  }

  fn module_asset(&mut self, module: &SourceModule, hashed_file: &str) -> bool {
    self.resolver.record_module_asset(module, hashed_file)
  }

  fn emit(&mut self, stats: &CompilationStats) -> Result<()> {
    let table = self
      .resolver
      .process_assets_by_chunk_name(&stats.assets_by_chunk_name);
    tracing::debug!(entries = table.len(), "asset names updated");
    Ok(())
  }

  fn after_emit(&mut self, stats: &CompilationStats) -> Result<()> {
    let Some(path) = self.manifest_path(stats) else {
      tracing::debug!("no output path for compilation; manifest not written");
      return Ok(());
    };

    let manifest = self.transformed_manifest();
    manifest.write(&path)?;
    tracing::info!(path = %path.display(), entries = manifest.len(), "wrote revision manifest");
    Ok(())
  }

  fn done(&mut self, stats: &CompilationStats) {
    self.hooks.call_done(self.resolver.table(), stats);
  }
}
