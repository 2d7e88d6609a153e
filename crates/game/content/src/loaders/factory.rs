//! Content factory for loading everything from one data directory.

use std::path::{Path, PathBuf};

use combat_core::CombatConfig;

use crate::loaders::{ConfigLoader, LoadResult, LootTableLoader};
use crate::registry::LootTableRegistry;

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// └── loot.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "combat.toml";
    pub const LOOT_FILE: &'static str = "loot.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data directory bundled with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load combat configuration from `combat.toml`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load loot tables from `loot.ron`.
    pub fn load_loot(&self) -> LoadResult<LootTableRegistry> {
        LootTableLoader::load(&self.loot_path())
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(Self::CONFIG_FILE)
    }

    pub fn loot_path(&self) -> PathBuf {
        self.data_dir.join(Self::LOOT_FILE)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
