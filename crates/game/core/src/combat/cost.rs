//! Action kinds and their time cost.
//!
//! Formula:
//! - speed_multiplier = 1 + speed_level / 10
//! - cost = max(min_cost, round(base_cost / speed_multiplier))

use crate::config::{ActionCostTable, CombatConfig};
use crate::effects::StatusEffectEngine;
use crate::skills::tokenize;
use crate::state::Combatant;

/// Coarse category of an action, used only for timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    Melee,
    Ranged,
    Spell,
    ItemUse,
    Move,
    Social,
    Defend,
    Hide,
    Flee,
}

/// Keywords checked in this order; the first kind with a hit wins.
const KIND_KEYWORDS: &[(ActionKind, &[&str])] = &[
    (ActionKind::Flee, &["flee", "run", "escape", "retreat"]),
    (
        ActionKind::Spell,
        &[
            "cast", "spell", "fire", "fireball", "firebolt", "flame", "frost", "lightning", "shock",
            "hex", "incant",
        ],
    ),
    (ActionKind::Ranged, &["shoot", "bow", "arrow", "crossbow", "throw", "sling"]),
    (ActionKind::ItemUse, &["drink", "quaff", "eat", "use", "apply", "read", "potion"]),
    (ActionKind::Defend, &["defend", "block", "parry", "guard", "brace"]),
    (ActionKind::Hide, &["hide", "sneak", "conceal", "stealth"]),
    (ActionKind::Social, &["talk", "persuade", "intimidate", "taunt", "bribe", "plead"]),
    (
        ActionKind::Move,
        &["go", "move", "walk", "north", "south", "east", "west", "up", "down", "climb"],
    ),
];

impl ActionKind {
    /// Maps free text to an action kind, defaulting to melee.
    pub fn from_text(text: &str) -> Self {
        let tokens = tokenize(text);
        KIND_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| tokens.iter().any(|t| t == kw)))
            .map_or(ActionKind::Melee, |(kind, _)| *kind)
    }

    pub fn base_cost(self, table: &ActionCostTable) -> u64 {
        match self {
            Self::Melee => table.melee,
            Self::Ranged => table.ranged,
            Self::Spell => table.spell,
            Self::ItemUse => table.item_use,
            Self::Move => table.movement,
            Self::Social => table.social,
            Self::Defend => table.defend,
            Self::Hide => table.hide,
            Self::Flee => table.flee,
        }
    }
}

/// Speed-scaled cost of an action.
///
/// The result is never below `config.min_action_cost`.
pub fn action_cost(kind: ActionKind, speed_level: u32, config: &CombatConfig) -> u64 {
    scaled_cost(kind.base_cost(&config.action_costs), speed_level, config.min_action_cost)
}

/// Cost for a specific actor: speed skill adjusted by Hasted/Slowed.
pub fn actor_cost(kind: ActionKind, actor: &Combatant, config: &CombatConfig) -> u64 {
    let speed = actor.stats().speed_level as i64
        + StatusEffectEngine::speed_modifier(&actor.status_effects) as i64;
    action_cost(kind, speed.max(0) as u32, config)
}

/// `max(min_cost, round(base_cost / (1 + speed_level / 10)))`.
pub fn scaled_cost(base_cost: u64, speed_level: u32, min_cost: u64) -> u64 {
    let multiplier = 1.0 + speed_level as f64 / 10.0;
    let scaled = (base_cost as f64 / multiplier).round() as u64;
    scaled.max(min_cost)
}
