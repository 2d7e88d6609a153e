//! Loot table loader.

use std::path::Path;

use anyhow::Context;
use combat_core::LootTable;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::registry::LootTableRegistry;

/// Loot catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LootCatalog {
    pub tables: Vec<LootTable>,
}

/// Loader for loot tables from RON files.
pub struct LootTableLoader;

impl LootTableLoader {
    /// Load a loot catalog from a RON file into a registry.
    pub fn load(path: &Path) -> LoadResult<LootTableRegistry> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parse a loot catalog from RON text.
    ///
    /// Duplicate ids, inverted ranges and tables whose entries can never drop
    /// are rejected.
    pub fn parse(content: &str) -> LoadResult<LootTableRegistry> {
        let catalog: LootCatalog =
            ron::from_str(content).context("Failed to parse loot catalog RON")?;

        let mut registry = LootTableRegistry::new();
        for table in catalog.tables {
            validate(&table)?;
            let id = table.id.clone();
            anyhow::ensure!(registry.insert(table).is_none(), "duplicate loot table '{id}'");
        }
        Ok(registry)
    }
}

fn validate(table: &LootTable) -> LoadResult<()> {
    anyhow::ensure!(!table.id.is_empty(), "loot table with empty id");
    anyhow::ensure!(
        table.gold_min <= table.gold_max,
        "loot table '{}': gold_min {} exceeds gold_max {}",
        table.id,
        table.gold_min,
        table.gold_max
    );
    for entry in &table.entries {
        anyhow::ensure!(
            entry.min_quantity <= entry.max_quantity,
            "loot table '{}': entry '{}' has min_quantity above max_quantity",
            table.id,
            entry.item_id
        );
    }
    if table.rolls > 0 && !table.entries.is_empty() {
        anyhow::ensure!(
            table.entries.iter().any(|entry| entry.weight > 0),
            "loot table '{}': every entry has zero weight",
            table.id
        );
    }
    Ok(())
}
