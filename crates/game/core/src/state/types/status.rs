//! Status effect data carried by combatants.
//!
//! Effects store the remaining duration in world-time units. The
//! [`StatusEffectEngine`](crate::effects::StatusEffectEngine) owns every
//! mutation rule (stacking, replacement, ticking); this module only holds data.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::state::EntityId;

/// Active status effects on a combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { CombatConfig::MAX_STATUS_EFFECTS }>,
}

/// A single status effect instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    /// Per-pulse damage or healing for periodic kinds; strength otherwise.
    pub magnitude: u32,
    /// World-time units left before the effect expires.
    pub remaining: u64,
    /// Who applied the effect.
    pub source: EntityId,
    /// Whether several instances may coexist on one combatant.
    pub stackable: bool,
}

impl StatusEffect {
    /// Creates an effect using the kind's default stacking rule.
    pub fn new(kind: StatusEffectKind, magnitude: u32, remaining: u64, source: EntityId) -> Self {
        Self {
            kind,
            magnitude,
            remaining,
            source,
            stackable: kind.is_stackable_by_default(),
        }
    }
}

/// Types of status effects.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusEffectKind {
    // ========================================================================
    // Damage over time
    // ========================================================================
    /// Stackable venom; every dose ticks separately.
    Poisoned,

    /// Stackable open wounds.
    Bleeding,

    /// Fire damage over time; a new burn replaces the old one.
    Burning,

    // ========================================================================
    // Healing
    // ========================================================================
    Regenerating,

    // ========================================================================
    // Control
    // ========================================================================
    /// Cannot act.
    Stunned,

    /// Actions cost more time.
    Slowed,

    // ========================================================================
    // Buffs
    // ========================================================================
    /// Actions cost less time.
    Hasted,

    /// Flat damage absorption.
    Shielded,
}

/// What a periodic effect does each pulse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PeriodicKind {
    Damage,
    Heal,
}

impl StatusEffectKind {
    pub const fn is_stackable_by_default(self) -> bool {
        matches!(self, Self::Poisoned | Self::Bleeding)
    }

    pub const fn periodic(self) -> Option<PeriodicKind> {
        match self {
            Self::Poisoned | Self::Bleeding | Self::Burning => Some(PeriodicKind::Damage),
            Self::Regenerating => Some(PeriodicKind::Heal),
            Self::Stunned | Self::Slowed | Self::Hasted | Self::Shielded => None,
        }
    }
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Number of concurrent instances of `kind`.
    pub fn count(&self, kind: StatusEffectKind) -> usize {
        self.effects.iter().filter(|e| e.kind == kind).count()
    }

    /// Sum of magnitudes of all instances of `kind`.
    pub fn total_magnitude(&self, kind: StatusEffectKind) -> u32 {
        self.effects
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.magnitude)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.effects.is_full()
    }

    pub(crate) fn push(&mut self, effect: StatusEffect) -> Result<(), StatusEffect> {
        self.effects.try_push(effect).map_err(|err| err.element())
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut StatusEffect> {
        self.effects.iter_mut()
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&mut StatusEffect) -> bool) {
        self.effects.retain(keep);
    }
}
