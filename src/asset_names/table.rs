use std::collections::BTreeMap;
use std::collections::btree_map;

/// Logical name recorded for one emitted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetName {
  /// Chunk name followed by the logical extension, e.g. `vendor.js.map`.
  pub logical: String,
  /// Processing pass that last wrote this entry.
  pub pass: u64,
}

/// Cumulative mapping of emitted filename to logical asset name.
///
/// Entries are only ever inserted or overwritten; files from earlier watch rebuilds stay
/// listed until a later pass writes the same filename again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetNameTable {
  entries: BTreeMap<String, AssetName>,
}

impl AssetNameTable {
  pub(crate) fn insert(&mut self, filename: String, logical: String, pass: u64) {
    self.entries.insert(filename, AssetName { logical, pass });
  }

  /// Logical name recorded for `filename`.
  pub fn get(&self, filename: &str) -> Option<&str> {
    self.entries.get(filename).map(|name| name.logical.as_str())
  }

  /// Full record for `filename`, including the pass that wrote it.
  pub fn entry(&self, filename: &str) -> Option<&AssetName> {
    self.entries.get(filename)
  }

  /// Whether `filename` has been recorded.
  pub fn contains(&self, filename: &str) -> bool {
    self.entries.contains_key(filename)
  }

  /// Number of recorded files.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Whether nothing has been recorded yet.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Iterate `(filename, logical name)` pairs in filename order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .entries
      .iter()
      .map(|(filename, name)| (filename.as_str(), name.logical.as_str()))
  }

  /// Iterate full records in filename order.
  pub fn entries(&self) -> btree_map::Iter<'_, String, AssetName> {
    self.entries.iter()
  }
}
