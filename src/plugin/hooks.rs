use crate::asset_names::AssetNameTable;
use crate::manifest::Manifest;
use crate::models::CompilationStats;

type ApplyHook = Box<dyn FnMut(&AssetNameTable)>;
type TransformHook = Box<dyn FnMut(Manifest, &AssetNameTable) -> Manifest>;
type DoneHook = Box<dyn FnMut(&AssetNameTable, &CompilationStats)>;

/// Observer lists exposed by [`super::RevsPlugin`].
///
/// Handlers run synchronously in the order they were registered.
#[derive(Default)]
pub struct RevsHooks {
  apply: Vec<ApplyHook>,
  transform: Vec<TransformHook>,
  done: Vec<DoneHook>,
}

impl RevsHooks {
  /// Called once the plugin has attached to a compiler.
  pub fn on_apply(&mut self, hook: impl FnMut(&AssetNameTable) + 'static) -> &mut Self {
    self.apply.push(Box::new(hook));
    self
  }

  /// Waterfall over the manifest before it is written. Each handler receives the previous
  /// handler's output.
  pub fn on_transform(
    &mut self,
    hook: impl FnMut(Manifest, &AssetNameTable) -> Manifest + 'static,
  ) -> &mut Self {
    self.transform.push(Box::new(hook));
    self
  }

  /// Called when the build finished.
  pub fn on_done(
    &mut self,
    hook: impl FnMut(&AssetNameTable, &CompilationStats) + 'static,
  ) -> &mut Self {
    self.done.push(Box::new(hook));
    self
  }

  pub(crate) fn call_apply(&mut self, table: &AssetNameTable) {
    for hook in &mut self.apply {
      hook(table);
    }
  }

  pub(crate) fn call_transform(&mut self, manifest: Manifest, table: &AssetNameTable) -> Manifest {
    let mut manifest = manifest;
    for hook in &mut self.transform {
      manifest = hook(manifest, table);
      tracing::debug!(entries = manifest.len(), "transform");
    }
    manifest
  }

  pub(crate) fn call_done(&mut self, table: &AssetNameTable, stats: &CompilationStats) {
    for hook in &mut self.done {
      hook(table, stats);
    }
  }
}

impl std::fmt::Debug for RevsHooks {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RevsHooks")
      .field("apply", &self.apply.len())
      .field("transform", &self.transform.len())
      .field("done", &self.done.len())
      .finish()
  }
}
