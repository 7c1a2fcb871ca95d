//! Host lifecycle surface.
//!
//! The bundler drives plugins through a fixed set of touchpoints. Every hook has a no-op
//! default so a plugin only implements the events it cares about.

mod driver;
mod hooks;
mod revs;

use std::borrow::Cow;

use anyhow::Result;

use crate::models::{CompilationStats, OutputTemplates, SourceModule};

pub use driver::PluginDriver;
pub use hooks::RevsHooks;
pub use revs::RevsPlugin;

/// Display name of a plugin.
pub type PluginName<'a> = Cow<'a, str>;

/// Lifecycle hooks a host bundler invokes on each registered plugin.
pub trait BuildPlugin {
  /// Plugin name for diagnostics.
  fn name(&self) -> PluginName<'_>;

  /// Attach to a compiler with the given output templates.
  fn apply(&mut self, _templates: &OutputTemplates) {}

  /// A new compilation started.
  fn compilation(&mut self, _stats: &CompilationStats) {}

  /// An asset was associated with the module that produced it.
  ///
  /// Returning `false` declines the asset.
  fn module_asset(&mut self, _module: &SourceModule, _hashed_file: &str) -> bool {
    true
  }

  /// Assets of a finished compilation are about to be written.
  fn emit(&mut self, _stats: &CompilationStats) -> Result<()> {
    Ok(())
  }

  /// Assets of a finished compilation have been written.
  fn after_emit(&mut self, _stats: &CompilationStats) -> Result<()> {
    Ok(())
  }

  /// The build finished.
  fn done(&mut self, _stats: &CompilationStats) {}
}
