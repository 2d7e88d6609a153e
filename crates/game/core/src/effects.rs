//! Status effect rules: stacking, replacement, periodic pulses, expiry.
//!
//! Every operation works on a single combatant's [`StatusEffects`]. Health is
//! not touched here; [`tick`](StatusEffectEngine::tick) reports what each
//! effect did and the engine applies it.

use crate::config::CombatConfig;
use crate::error::{CombatError, ErrorSeverity};
use crate::state::{EntityId, PeriodicKind, StatusEffect, StatusEffectKind, StatusEffects};

/// Speed levels granted (Hasted) or removed (Slowed) per point of magnitude.
pub const SPEED_PER_MAGNITUDE: i32 = 5;

/// Result of [`StatusEffectEngine::apply`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Added next to at least one existing instance of the same kind.
    pub was_stacked: bool,
    /// Replaced the previous instance of a non-stackable kind.
    pub was_replaced: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RemovalReason {
    /// Duration ran out.
    Expired,
    /// Removed on purpose (potion, spell, death).
    Cured,
}

/// Result of [`StatusEffectEngine::remove`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemovalOutcome {
    pub kind: StatusEffectKind,
    /// Number of instances removed; zero if none was active.
    pub removed: usize,
    pub reason: RemovalReason,
}

impl RemovalOutcome {
    pub fn was_expired(&self) -> bool {
        self.reason == RemovalReason::Expired
    }
}

/// What one effect did during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectApplication {
    pub kind: StatusEffectKind,
    pub source: EntityId,
    pub pulses: u64,
    pub damage: u32,
    pub healing: u32,
    /// The effect reached zero duration and was dropped.
    pub expired: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    #[error("status effect capacity exceeded (max {capacity})")]
    CapacityExceeded { capacity: usize },

    #[error("status effect {0} has zero duration")]
    ZeroDuration(StatusEffectKind),
}

impl CombatError for StatusError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CapacityExceeded { .. } => ErrorSeverity::Recoverable,
            Self::ZeroDuration(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CapacityExceeded { .. } => "STATUS_CAPACITY_EXCEEDED",
            Self::ZeroDuration(_) => "STATUS_ZERO_DURATION",
        }
    }
}

/// Stateless rule set over a combatant's effect list.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatusEffectEngine;

impl StatusEffectEngine {
    /// Adds an effect.
    ///
    /// Stackable effects are appended as a new instance. Non-stackable
    /// effects overwrite the existing instance of their kind in place.
    pub fn apply(
        effects: &mut StatusEffects,
        effect: StatusEffect,
    ) -> Result<ApplyOutcome, StatusError> {
        if effect.remaining == 0 {
            return Err(StatusError::ZeroDuration(effect.kind));
        }

        if !effect.stackable
            && let Some(existing) = effects.iter_mut().find(|e| e.kind == effect.kind)
        {
            *existing = effect;
            return Ok(ApplyOutcome {
                was_stacked: false,
                was_replaced: true,
            });
        }

        let was_stacked = effects.has(effect.kind);
        effects.push(effect).map_err(|_| StatusError::CapacityExceeded {
            capacity: CombatConfig::MAX_STATUS_EFFECTS,
        })?;

        Ok(ApplyOutcome {
            was_stacked,
            was_replaced: false,
        })
    }

    /// Removes every instance of `kind`.
    pub fn remove(
        effects: &mut StatusEffects,
        kind: StatusEffectKind,
        reason: RemovalReason,
    ) -> RemovalOutcome {
        let before = effects.len();
        effects.retain(|e| e.kind != kind);
        RemovalOutcome {
            kind,
            removed: before - effects.len(),
            reason,
        }
    }

    /// Advances every effect by `elapsed` world-time units.
    ///
    /// A periodic effect pulses once per unit it was still active, so an
    /// effect with 2 units left ticked by 5 pulses twice and expires.
    pub fn tick(effects: &mut StatusEffects, elapsed: u64) -> Vec<EffectApplication> {
        if elapsed == 0 {
            return Vec::new();
        }

        let mut applications = Vec::new();
        for effect in effects.iter_mut() {
            let pulses = elapsed.min(effect.remaining);
            effect.remaining = effect.remaining.saturating_sub(elapsed);

            let amount = u32::try_from(pulses)
                .unwrap_or(u32::MAX)
                .saturating_mul(effect.magnitude);
            let (damage, healing) = match effect.kind.periodic() {
                Some(PeriodicKind::Damage) => (amount, 0),
                Some(PeriodicKind::Heal) => (0, amount),
                None => (0, 0),
            };
            let expired = effect.remaining == 0;

            if damage > 0 || healing > 0 || expired {
                applications.push(EffectApplication {
                    kind: effect.kind,
                    source: effect.source,
                    pulses,
                    damage,
                    healing,
                    expired,
                });
            }
        }

        effects.retain(|e| e.remaining > 0);
        applications
    }

    /// Net speed-level adjustment from Hasted and Slowed.
    pub fn speed_modifier(effects: &StatusEffects) -> i32 {
        let hasted = effects.total_magnitude(StatusEffectKind::Hasted) as i32;
        let slowed = effects.total_magnitude(StatusEffectKind::Slowed) as i32;
        (hasted - slowed) * SPEED_PER_MAGNITUDE
    }

    pub fn is_incapacitated(effects: &StatusEffects) -> bool {
        effects.has(StatusEffectKind::Stunned)
    }
}
