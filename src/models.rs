//! Data structures exchanged with the host bundler.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Output filename templates configured on the host compiler.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputTemplates {
  /// Template for regular chunk files, e.g. `[name].[chunkhash].js`.
  #[serde(default)]
  pub filename: Option<String>,
  /// Template for hot-update chunk files, e.g. `[id].[hash].hot-update.js`.
  #[serde(default)]
  pub hot_update_chunk_filename: Option<String>,
}

impl OutputTemplates {
  /// Templates with both the chunk and hot-update filename set.
  pub fn new(filename: impl Into<String>, hot_update_chunk_filename: impl Into<String>) -> Self {
    Self {
      filename: Some(filename.into()),
      hot_update_chunk_filename: Some(hot_update_chunk_filename.into()),
    }
  }
}

/// Module that produced an emitted asset.
#[derive(Debug, Clone, Default)]
pub struct SourceModule {
  /// Bundler identifier of the module.
  pub identifier: String,
  /// Request path as written by the user, when known.
  pub user_request: Option<String>,
}

/// Files emitted for one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkAssets {
  /// A chunk that emitted exactly one file.
  Single(String),
  /// A chunk that emitted several files, e.g. a script and its source map.
  Multiple(Vec<String>),
}

impl ChunkAssets {
  /// Filenames as a slice, regardless of shape.
  pub fn files(&self) -> &[String] {
    match self {
      Self::Single(file) => std::slice::from_ref(file),
      Self::Multiple(files) => files,
    }
  }

  /// Interpret a raw stats value. Non-string entries are dropped.
  pub fn from_value(value: &Value) -> Self {
    match value {
      Value::String(file) => Self::Single(file.clone()),
      Value::Array(items) => Self::Multiple(
        items
          .iter()
          .filter_map(|item| item.as_str().map(str::to_string))
          .collect(),
      ),
      _ => Self::Multiple(Vec::new()),
    }
  }
}

impl From<&str> for ChunkAssets {
  fn from(file: &str) -> Self {
    Self::Single(file.to_string())
  }
}

impl From<String> for ChunkAssets {
  fn from(file: String) -> Self {
    Self::Single(file)
  }
}

impl From<Vec<String>> for ChunkAssets {
  fn from(files: Vec<String>) -> Self {
    Self::Multiple(files)
  }
}

impl<const N: usize> From<[&str; N]> for ChunkAssets {
  fn from(files: [&str; N]) -> Self {
    Self::Multiple(files.iter().map(|file| file.to_string()).collect())
  }
}

/// Chunk name to emitted files, in the order the bundler reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetsByChunkName {
  chunks: Vec<(String, ChunkAssets)>,
}

impl AssetsByChunkName {
  /// Empty mapping.
  pub fn new() -> Self {
    Self::default()
  }

  /// Add or replace the files of a chunk. A replaced chunk keeps its position.
  pub fn insert(&mut self, chunk: impl Into<String>, assets: impl Into<ChunkAssets>) {
    let chunk = chunk.into();
    let assets = assets.into();
    match self.chunks.iter_mut().find(|(name, _)| *name == chunk) {
      Some((_, existing)) => *existing = assets,
      None => self.chunks.push((chunk, assets)),
    }
  }

  /// Builder-style [`AssetsByChunkName::insert`].
  pub fn with(mut self, chunk: impl Into<String>, assets: impl Into<ChunkAssets>) -> Self {
    self.insert(chunk, assets);
    self
  }

  /// Convert a raw stats object. Anything other than an object yields an empty mapping.
  pub fn from_value(value: &Value) -> Self {
    match value {
      Value::Object(map) => Self::from_map(map),
      _ => Self::default(),
    }
  }

  fn from_map(map: &Map<String, Value>) -> Self {
    Self {
      chunks: map
        .iter()
        .map(|(chunk, files)| (chunk.clone(), ChunkAssets::from_value(files)))
        .collect(),
    }
  }

  /// Iterate chunks in reported order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
    self
      .chunks
      .iter()
      .map(|(chunk, assets)| (chunk.as_str(), assets.files()))
  }

  /// Number of chunks.
  pub fn len(&self) -> usize {
    self.chunks.len()
  }

  /// Whether no chunks were reported.
  pub fn is_empty(&self) -> bool {
    self.chunks.is_empty()
  }
}

impl<'de> Deserialize<'de> for AssetsByChunkName {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let value = Value::deserialize(deserializer)?;
    Ok(Self::from_value(&value))
  }
}

/// Subset of the bundler's compilation stats consumed by the plugin.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationStats {
  /// Compilation hash.
  #[serde(default)]
  pub hash: Option<String>,
  /// Directory the bundler writes emitted assets to.
  #[serde(default)]
  pub output_path: Option<PathBuf>,
  /// Emitted files grouped by chunk name.
  #[serde(default)]
  pub assets_by_chunk_name: AssetsByChunkName,
}

impl CompilationStats {
  /// Stats for a compilation that emitted `assets`.
  pub fn new(assets_by_chunk_name: AssetsByChunkName) -> Self {
    Self {
      assets_by_chunk_name,
      ..Self::default()
    }
  }

  /// Attach the output directory.
  pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
    self.output_path = Some(output_path.into());
    self
  }
}
