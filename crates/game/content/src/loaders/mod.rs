//! Content loaders for reading combat data from files.
//!
//! Loot tables are RON, combat tuning is TOML. Every loader reports the
//! offending path on failure.

pub mod config;
pub mod factory;
pub mod loot;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use loot::{LootCatalog, LootTableLoader};

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}
