use crate::env::LootTier;

/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Base time cost per action kind before speed scaling.
    pub action_costs: ActionCostTable,

    /// Floor applied after speed scaling; prevents zero-cost turn loops.
    pub min_action_cost: u64,

    /// Damage variance as a percentage of the raw damage sum (symmetric).
    pub variance_percent: u32,

    /// Dispositions at or below this value are hostile.
    pub hostility_threshold: i32,

    /// Corpse decay timers by loot tier, in world-time units.
    pub corpse_decay: CorpseDecayTable,

    /// Player corpses decay on their own, slower clock.
    pub player_corpse_decay: u64,

    /// Percent chance that each item of an expiring corpse lands on the floor.
    /// Zero destroys everything with the corpse.
    pub corpse_scatter_chance: u32,

    /// Practice needed per level step: `(level + 1) * practice_per_level`.
    pub practice_per_level: u32,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum concurrent status effects per combatant (stacked instances included).
    pub const MAX_STATUS_EFFECTS: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MIN_ACTION_COST: u64 = 2;
    pub const DEFAULT_VARIANCE_PERCENT: u32 = 20;
    pub const DEFAULT_HOSTILITY_THRESHOLD: i32 = -50;
    pub const DEFAULT_PLAYER_CORPSE_DECAY: u64 = 1_200;
    pub const DEFAULT_CORPSE_SCATTER_CHANCE: u32 = 50;
    pub const DEFAULT_PRACTICE_PER_LEVEL: u32 = 10;

    /// Most hostile disposition value.
    pub const MIN_DISPOSITION: i32 = -100;
    /// Friendliest disposition value.
    pub const MAX_DISPOSITION: i32 = 100;

    pub fn new() -> Self {
        Self {
            action_costs: ActionCostTable::default(),
            min_action_cost: Self::DEFAULT_MIN_ACTION_COST,
            variance_percent: Self::DEFAULT_VARIANCE_PERCENT,
            hostility_threshold: Self::DEFAULT_HOSTILITY_THRESHOLD,
            corpse_decay: CorpseDecayTable::default(),
            player_corpse_decay: Self::DEFAULT_PLAYER_CORPSE_DECAY,
            corpse_scatter_chance: Self::DEFAULT_CORPSE_SCATTER_CHANCE,
            practice_per_level: Self::DEFAULT_PRACTICE_PER_LEVEL,
        }
    }

    pub fn with_scatter_chance(mut self, percent: u32) -> Self {
        self.corpse_scatter_chance = percent.min(100);
        self
    }

    /// Whether a disposition value counts as hostile.
    pub fn is_hostile(&self, disposition: i32) -> bool {
        disposition <= self.hostility_threshold
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Base costs for each action kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActionCostTable {
    pub melee: u64,
    pub ranged: u64,
    pub spell: u64,
    pub item_use: u64,
    pub movement: u64,
    pub social: u64,
    pub defend: u64,
    pub hide: u64,
    pub flee: u64,
}

impl Default for ActionCostTable {
    fn default() -> Self {
        Self {
            melee: 5,
            ranged: 6,
            spell: 8,
            item_use: 4,
            movement: 3,
            social: 2,
            defend: 3,
            hide: 4,
            flee: 6,
        }
    }
}

/// Corpse decay timers per loot tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CorpseDecayTable {
    pub common: u64,
    pub uncommon: u64,
    pub rare: u64,
    pub epic: u64,
}

impl CorpseDecayTable {
    pub fn for_tier(&self, tier: LootTier) -> u64 {
        match tier {
            LootTier::Common => self.common,
            LootTier::Uncommon => self.uncommon,
            LootTier::Rare => self.rare,
            LootTier::Epic => self.epic,
        }
    }
}

impl Default for CorpseDecayTable {
    fn default() -> Self {
        Self {
            common: 300,
            uncommon: 450,
            rare: 600,
            epic: 900,
        }
    }
}
