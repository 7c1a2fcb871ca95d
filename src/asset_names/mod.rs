//! Building blocks for naming emitted assets.
//!
//! Extension extraction, hot-update detection and the cumulative name table live in separate
//! submodules so each can be tested on its own. [`crate::AssetNameResolver`] composes them.

mod extension;
mod hmr;
mod table;

pub use extension::{derive_extension, strip_query_suffix};
pub use hmr::HmrMatcher;
pub use table::{AssetName, AssetNameTable};
