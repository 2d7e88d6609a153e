//! Attack result types.

use super::damage::DamageResult;
use crate::error::{CombatError, ErrorSeverity};
use crate::state::EntityId;

/// Outcome of one attack resolution. Exactly one variant per attack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackResult {
    Hit {
        damage: DamageResult,
        critical: bool,
        /// The defender partly dodged (glancing blow).
        dodged: bool,
    },
    Miss {
        was_dodged: bool,
    },
    Failure(AttackFailure),
}

impl AttackResult {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    /// Final damage dealt, zero for misses and failures.
    pub fn damage_dealt(&self) -> u32 {
        match self {
            Self::Hit { damage, .. } => damage.final_damage,
            Self::Miss { .. } | Self::Failure(_) => 0,
        }
    }
}

/// Why an attack could not be resolved at all.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackFailure {
    #[error("attacker {0} not found")]
    AttackerNotFound(EntityId),

    #[error("defender {0} not found")]
    DefenderNotFound(EntityId),

    #[error("{0} is dead and cannot attack")]
    AttackerDead(EntityId),

    #[error("{0} is already dead")]
    DefenderDead(EntityId),

    #[error("{0} cannot attack itself")]
    SelfTarget(EntityId),

    #[error("{attacker} and {defender} are not in the same location")]
    NotInReach { attacker: EntityId, defender: EntityId },

    #[error("{0} is stunned")]
    Stunned(EntityId),

    #[error("no skill applies to the action")]
    NoApplicableSkill,
}

impl CombatError for AttackFailure {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotInReach { .. } | Self::Stunned(_) => ErrorSeverity::Recoverable,
            Self::AttackerNotFound(_)
            | Self::DefenderNotFound(_)
            | Self::AttackerDead(_)
            | Self::DefenderDead(_)
            | Self::SelfTarget(_)
            | Self::NoApplicableSkill => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AttackerNotFound(_) => "ATTACK_ATTACKER_NOT_FOUND",
            Self::DefenderNotFound(_) => "ATTACK_DEFENDER_NOT_FOUND",
            Self::AttackerDead(_) => "ATTACK_ATTACKER_DEAD",
            Self::DefenderDead(_) => "ATTACK_DEFENDER_DEAD",
            Self::SelfTarget(_) => "ATTACK_SELF_TARGET",
            Self::NotInReach { .. } => "ATTACK_NOT_IN_REACH",
            Self::Stunned(_) => "ATTACK_STUNNED",
            Self::NoApplicableSkill => "ATTACK_NO_SKILL",
        }
    }
}
