#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_names;
pub mod config;
pub mod manifest;
pub mod models;
pub mod options;
pub mod plugin;
pub mod resolver;

pub use asset_names::{AssetNameTable, HmrMatcher};
pub use config::{ConfigError, RevsConfig};
pub use manifest::{Manifest, load_manifest};
pub use models::{AssetsByChunkName, ChunkAssets, CompilationStats, OutputTemplates, SourceModule};
pub use options::RevsOptions;
pub use plugin::{BuildPlugin, PluginDriver, RevsHooks, RevsPlugin};
pub use resolver::AssetNameResolver;
