//! In-memory loot table registry.

use std::collections::HashMap;

use combat_core::{LootOracle, LootTable};

/// Loot tables keyed by id.
///
/// Implements [`LootOracle`] so the death handler can look tables up by the
/// id stored on each NPC.
#[derive(Clone, Debug, Default)]
pub struct LootTableRegistry {
    tables: HashMap<String, LootTable>,
}

impl LootTableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table, returning the one it replaced.
    pub fn insert(&mut self, table: LootTable) -> Option<LootTable> {
        self.tables.insert(table.id.clone(), table)
    }

    pub fn with_table(mut self, table: LootTable) -> Self {
        self.insert(table);
        self
    }

    pub fn get(&self, id: &str) -> Option<&LootTable> {
        self.tables.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tables.contains_key(id)
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.tables.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl FromIterator<LootTable> for LootTableRegistry {
    fn from_iter<T: IntoIterator<Item = LootTable>>(iter: T) -> Self {
        let mut registry = Self::new();
        for table in iter {
            registry.insert(table);
        }
        registry
    }
}

impl LootOracle for LootTableRegistry {
    fn table(&self, id: &str) -> Option<&LootTable> {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::LootEntry;

    #[test]
    fn later_tables_replace_earlier_ones() {
        let mut registry = LootTableRegistry::new().with_table(LootTable::new("wolf", 1));
        let previous = registry.insert(
            LootTable::new("wolf", 2).with_entry(LootEntry::new("wolf_pelt", 1, 1, 1)),
        );

        assert_eq!(previous.map(|t| t.rolls), Some(1));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.table("wolf").map(|t| t.rolls), Some(2));
    }

    #[test]
    fn oracle_misses_unknown_ids() {
        let registry: LootTableRegistry = [LootTable::new("rat", 1), LootTable::new("bat", 1)]
            .into_iter()
            .collect();

        assert!(registry.table("dragon").is_none());
        assert_eq!(registry.ids(), vec!["bat", "rat"]);
    }
}
