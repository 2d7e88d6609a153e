//! Loot tables and the oracle that serves them.

/// Loot quality tier, elevated for tougher combatants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LootTier {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
}

impl LootTier {
    /// Tier from a combatant's maximum health.
    ///
    /// Common ≤ 30 < Uncommon ≤ 80 < Rare ≤ 150 < Epic.
    pub fn from_max_health(max_health: u32) -> Self {
        match max_health {
            0..=30 => Self::Common,
            31..=80 => Self::Uncommon,
            81..=150 => Self::Rare,
            _ => Self::Epic,
        }
    }

    /// Extra rolls on the table on top of its base roll count.
    pub const fn bonus_rolls(self) -> u32 {
        match self {
            Self::Common => 0,
            Self::Uncommon => 1,
            Self::Rare => 1,
            Self::Epic => 2,
        }
    }

    /// Multiplier applied to the rolled gold amount.
    pub const fn gold_multiplier(self) -> u32 {
        match self {
            Self::Common => 1,
            Self::Uncommon => 2,
            Self::Rare => 3,
            Self::Epic => 5,
        }
    }

    /// Quality grade stamped on dropped items.
    pub const fn quality(self) -> u8 {
        self as u8
    }
}

/// One weighted drop in a loot table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootEntry {
    pub item_id: String,
    pub weight: u32,
    pub min_quantity: u32,
    pub max_quantity: u32,
    /// Entry only rolls for combatants of at least this tier.
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_tier: LootTier,
}

impl LootEntry {
    pub fn new(
        item_id: impl Into<String>,
        weight: u32,
        min_quantity: u32,
        max_quantity: u32,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            weight,
            min_quantity,
            max_quantity,
            min_tier: LootTier::Common,
        }
    }

    pub fn with_min_tier(mut self, tier: LootTier) -> Self {
        self.min_tier = tier;
        self
    }
}

/// A weighted catalog of possible drops plus a gold range.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootTable {
    pub id: String,
    /// Base number of rolls against `entries`.
    pub rolls: u32,
    pub entries: Vec<LootEntry>,
    pub gold_min: u32,
    pub gold_max: u32,
}

impl LootTable {
    pub fn new(id: impl Into<String>, rolls: u32) -> Self {
        Self {
            id: id.into(),
            rolls,
            entries: Vec::new(),
            gold_min: 0,
            gold_max: 0,
        }
    }

    pub fn with_entry(mut self, entry: LootEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn with_gold(mut self, min: u32, max: u32) -> Self {
        self.gold_min = min;
        self.gold_max = max;
        self
    }
}

/// Registry mapping loot-table ids to tables.
pub trait LootOracle: Send + Sync {
    fn table(&self, id: &str) -> Option<&LootTable>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(LootTier::from_max_health(30), LootTier::Common);
        assert_eq!(LootTier::from_max_health(31), LootTier::Uncommon);
        assert_eq!(LootTier::from_max_health(150), LootTier::Rare);
        assert_eq!(LootTier::from_max_health(151), LootTier::Epic);
    }

    #[test]
    fn gold_multiplier_grows_with_tier() {
        assert!(LootTier::Epic.gold_multiplier() > LootTier::Rare.gold_multiplier());
        assert!(LootTier::Rare.gold_multiplier() > LootTier::Common.gold_multiplier());
    }
}
