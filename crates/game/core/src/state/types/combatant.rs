//! Combatant state.

use std::collections::BTreeMap;

use super::common::{EntityId, HealthMeter, ItemStack, Tick};
use super::status::StatusEffects;
use crate::config::CombatConfig;
use crate::skills::{Skill, SkillSet};

/// Whether a combatant is driven by a player or by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantKind {
    Player,
    Npc,
}

/// Opposed-check modifiers derived from skills.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub accuracy: i32,
    pub evasion: i32,
    pub speed_level: u32,
}

impl CombatStats {
    /// Derives combat stats from skill levels.
    ///
    /// - accuracy = Accuracy + Agility / 2
    /// - evasion = Evasion + Agility / 2
    /// - speed_level = Speed
    pub fn derive(skills: &SkillSet) -> Self {
        let agility_half = (skills.level(Skill::Agility) / 2) as i32;
        Self {
            accuracy: skills.level(Skill::Accuracy) as i32 + agility_half,
            evasion: skills.level(Skill::Evasion) as i32 + agility_half,
            speed_level: skills.level(Skill::Speed),
        }
    }
}

/// A participant in combat.
///
/// Mutated only through the engine and its components; external code reads it
/// from the [`WorldSnapshot`](crate::state::WorldSnapshot).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: EntityId,
    pub name: String,
    pub kind: CombatantKind,
    pub health: HealthMeter,

    /// World time at which this actor may act next. Zero means unscheduled.
    pub ready_at: Tick,

    pub status_effects: StatusEffects,
    pub skills: SkillSet,
    /// Practice accumulated towards each skill's next level.
    pub practice: BTreeMap<Skill, u32>,

    /// Attitude towards players, `-100..=100`. Only meaningful for NPCs.
    pub disposition: i32,

    /// Cached modifiers; NPCs get them derived when they turn hostile.
    pub combat_stats: Option<CombatStats>,

    /// Wielded weapon or natural attack, used when the world drives the attack.
    pub weapon: Option<String>,
    /// Flat damage bonus from equipment.
    pub item_bonus: i32,

    pub loot_table: Option<String>,
    pub inventory: Vec<ItemStack>,
    pub gold: u32,
}

impl Combatant {
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        kind: CombatantKind,
        max_health: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            health: HealthMeter::full(max_health),
            ready_at: Tick::ZERO,
            status_effects: StatusEffects::empty(),
            skills: SkillSet::new(),
            practice: BTreeMap::new(),
            disposition: 0,
            combat_stats: None,
            weapon: None,
            item_bonus: 0,
            loot_table: None,
            inventory: Vec::new(),
            gold: 0,
        }
    }

    pub fn player(id: EntityId, name: impl Into<String>, max_health: u32) -> Self {
        Self::new(id, name, CombatantKind::Player, max_health)
    }

    pub fn npc(id: EntityId, name: impl Into<String>, max_health: u32) -> Self {
        Self::new(id, name, CombatantKind::Npc, max_health)
    }

    pub fn with_skills(mut self, skills: SkillSet) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_weapon(mut self, weapon: impl Into<String>) -> Self {
        self.weapon = Some(weapon.into());
        self
    }

    pub fn with_item_bonus(mut self, bonus: i32) -> Self {
        self.item_bonus = bonus;
        self
    }

    pub fn with_loot_table(mut self, table: impl Into<String>) -> Self {
        self.loot_table = Some(table.into());
        self
    }

    pub fn with_disposition(mut self, disposition: i32) -> Self {
        self.disposition =
            disposition.clamp(CombatConfig::MIN_DISPOSITION, CombatConfig::MAX_DISPOSITION);
        self
    }

    pub fn with_inventory(mut self, items: Vec<ItemStack>, gold: u32) -> Self {
        self.inventory = items;
        self.gold = gold;
        self
    }

    pub fn with_health(mut self, current: u32) -> Self {
        self.health = HealthMeter::new(current, self.health.maximum);
        self
    }

    pub fn with_ready_at(mut self, ready_at: Tick) -> Self {
        self.ready_at = ready_at;
        self
    }

    pub fn is_player(&self) -> bool {
        self.kind == CombatantKind::Player
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }

    /// Stored combat stats, or freshly derived ones when none are cached.
    pub fn stats(&self) -> CombatStats {
        self.combat_stats
            .unwrap_or_else(|| CombatStats::derive(&self.skills))
    }

    /// Action text used when this combatant attacks without a command.
    pub fn attack_text(&self) -> &str {
        self.weapon.as_deref().unwrap_or("punch")
    }
}
