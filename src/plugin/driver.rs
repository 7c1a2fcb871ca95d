use anyhow::{Context, Result};

use super::BuildPlugin;
use crate::models::{CompilationStats, OutputTemplates, SourceModule};

/// Dispatches host lifecycle events to plugins in registration order.
#[derive(Default)]
pub struct PluginDriver {
  plugins: Vec<Box<dyn BuildPlugin>>,
}

impl PluginDriver {
  /// Driver over an initial set of plugins.
  pub fn new(plugins: Vec<Box<dyn BuildPlugin>>) -> Self {
    Self { plugins }
  }

  /// Register another plugin after the existing ones.
  pub fn register(&mut self, plugin: Box<dyn BuildPlugin>) {
    self.plugins.push(plugin);
  }

  /// Number of registered plugins.
  pub fn len(&self) -> usize {
    self.plugins.len()
  }

  /// Whether no plugins are registered.
  pub fn is_empty(&self) -> bool {
    self.plugins.is_empty()
  }

  /// Give back the registered plugins.
  pub fn into_plugins(self) -> Vec<Box<dyn BuildPlugin>> {
    self.plugins
  }

  /// Attach every plugin to a compiler.
  pub fn apply(&mut self, templates: &OutputTemplates) {
    for plugin in &mut self.plugins {
      plugin.apply(templates);
    }
  }

  /// Announce a new compilation.
  pub fn compilation(&mut self, stats: &CompilationStats) {
    for plugin in &mut self.plugins {
      plugin.compilation(stats);
    }
  }

  /// Every plugin sees the asset; it is accepted only if none declined it.
  pub fn module_asset(&mut self, module: &SourceModule, hashed_file: &str) -> bool {
    let mut accepted = true;
    for plugin in &mut self.plugins {
      accepted &= plugin.module_asset(module, hashed_file);
    }
    accepted
  }

  /// Run `emit`, stopping at the first failure.
  pub fn emit(&mut self, stats: &CompilationStats) -> Result<()> {
    for plugin in &mut self.plugins {
      let name = plugin.name().into_owned();
      plugin
        .emit(stats)
        .with_context(|| format!("[{name}] emit failed"))?;
    }
    Ok(())
  }

  /// Run `after_emit`, stopping at the first failure.
  pub fn after_emit(&mut self, stats: &CompilationStats) -> Result<()> {
    for plugin in &mut self.plugins {
      let name = plugin.name().into_owned();
      plugin
        .after_emit(stats)
        .with_context(|| format!("[{name}] afterEmit failed"))?;
    }
    Ok(())
  }

  /// Announce that the build finished.
  pub fn done(&mut self, stats: &CompilationStats) {
    for plugin in &mut self.plugins {
      plugin.done(stats);
    }
  }
}
