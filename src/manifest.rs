//! Revision manifest: logical asset names mapped to their current hashed filenames.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::asset_names::AssetNameTable;

/// Serialisable manifest written for downstream consumers such as template engines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Manifest {
  assets: BTreeMap<String, String>,
}

impl Manifest {
  /// Build the manifest view of a cumulative name table.
  ///
  /// When a logical name maps to several files, the one written by the latest pass wins; ties
  /// within a pass go to the lexicographically last filename.
  pub fn from_table(table: &AssetNameTable) -> Self {
    let mut latest: BTreeMap<&str, (u64, &str)> = BTreeMap::new();

    for (filename, name) in table.entries() {
      let candidate = (name.pass, filename.as_str());
      latest
        .entry(name.logical.as_str())
        .and_modify(|current| {
          if candidate >= *current {
            *current = candidate;
          }
        })
        .or_insert(candidate);
    }

    Self {
      assets: latest
        .into_iter()
        .map(|(logical, (_, filename))| (logical.to_string(), filename.to_string()))
        .collect(),
    }
  }

  /// Hashed filename recorded for `logical`.
  pub fn get(&self, logical: &str) -> Option<&str> {
    self.assets.get(logical).map(String::as_str)
  }

  /// Add or replace an entry.
  pub fn insert(&mut self, logical: impl Into<String>, filename: impl Into<String>) {
    self.assets.insert(logical.into(), filename.into());
  }

  /// Remove an entry, returning its filename.
  pub fn remove(&mut self, logical: &str) -> Option<String> {
    self.assets.remove(logical)
  }

  /// Iterate `(logical name, hashed filename)` pairs in logical-name order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .assets
      .iter()
      .map(|(logical, filename)| (logical.as_str(), filename.as_str()))
  }

  /// Number of entries.
  pub fn len(&self) -> usize {
    self.assets.len()
  }

  /// Whether the manifest has no entries.
  pub fn is_empty(&self) -> bool {
    self.assets.is_empty()
  }

  /// Render the manifest as prettified JSON.
  pub fn to_json(&self) -> Result<String> {
    serde_json::to_string_pretty(self).context("failed to serialise revision manifest")
  }

  /// Write the manifest to `path`, creating parent directories as needed.
  pub fn write(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
      fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = self.to_json()?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
  }
}

/// Load a previously written manifest from disk.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
  let content = fs::read_to_string(path)
    .with_context(|| format!("manifest not found at {}", path.display()))?;
  let manifest: Manifest =
    serde_json::from_str(&content).context("failed to parse revision manifest JSON")?;
  Ok(manifest)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  fn table(entries: &[(&str, &str, u64)]) -> AssetNameTable {
    let mut table = AssetNameTable::default();
    for (filename, logical, pass) in entries {
      table.insert(filename.to_string(), logical.to_string(), *pass);
    }
    table
  }

  #[test]
  fn inverts_table_into_logical_names() {
    let manifest = Manifest::from_table(&table(&[
      ("main.abc1234.js", "main.js", 1),
      ("vendor.def5678.js.map", "vendor.js.map", 1),
    ]));

    assert_eq!(manifest.get("main.js"), Some("main.abc1234.js"));
    assert_eq!(manifest.get("vendor.js.map"), Some("vendor.def5678.js.map"));
    assert_eq!(manifest.len(), 2);
  }

  #[test]
  fn prefers_most_recent_pass() {
    let manifest = Manifest::from_table(&table(&[
      ("main.zzz.js", "main.js", 1),
      ("main.aaa.js", "main.js", 2),
    ]));

    assert_eq!(manifest.get("main.js"), Some("main.aaa.js"));
  }

  #[test]
  fn serialises_as_flat_object() {
    let mut manifest = Manifest::default();
    manifest.insert("main.js", "main.abc.js");

    let value: serde_json::Value = serde_json::from_str(&manifest.to_json().unwrap()).unwrap();
    assert_eq!(value, serde_json::json!({ "main.js": "main.abc.js" }));
  }

  #[test]
  fn writes_and_loads_from_nested_path() -> Result<()> {
    let temp = tempdir()?;
    let path = temp.path().join("nested/dir/filerevs.json");
    let mut manifest = Manifest::default();
    manifest.insert("app.css", "app.9f8e7d6.css");

    manifest.write(&path)?;
    let loaded = load_manifest(&path)?;

    assert_eq!(loaded, manifest);
    Ok(())
  }

  #[test]
  fn load_reports_missing_file() {
    let temp = tempdir().unwrap();
    let err = load_manifest(&temp.path().join("missing.json")).unwrap_err();
    assert!(err.to_string().contains("manifest not found"));
  }
}
