//! Escape attempts against pursuers.
//!
//! Formula:
//! - flee_modifier = round(agility * 0.6 + escape * 0.4)
//! - flee_roll = d20 + flee_modifier
//! - pursuit_roll = d20 + pursuit (per pursuer)
//! - success iff flee_roll > max(pursuit_roll)

use super::result::AttackResult;
use crate::env::{RngOracle, RollContext, compute_seed};
use crate::error::{CombatError, ErrorSeverity};
use crate::skills::{Skill, SkillSet};
use crate::state::{EntityId, LocationId};

/// Outcome of an escape attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FleeResult {
    /// Escaped. Both rolls are `None` when nobody was pursuing.
    Success {
        flee_roll: Option<u32>,
        max_pursuit_roll: Option<u32>,
        destination: LocationId,
    },
    /// Intercepted; the interceptor's free attack already resolved.
    Failure {
        flee_roll: u32,
        max_pursuit_roll: u32,
        interceptor: EntityId,
        free_attack: AttackResult,
    },
    Error(FleeError),
}

impl FleeResult {
    pub fn escaped(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Free attacks granted to pursuers: one on failure, none otherwise.
    pub fn free_attacks(&self) -> usize {
        match self {
            Self::Failure { .. } => 1,
            Self::Success { .. } | Self::Error(_) => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FleeError {
    #[error("fleeing actor {0} not found")]
    ActorNotFound(EntityId),

    #[error("{0} is dead and cannot flee")]
    ActorDead(EntityId),

    #[error("pursuer {0} not found")]
    PursuerNotFound(EntityId),

    #[error("no exit '{direction}' from {location}")]
    NoExit {
        location: LocationId,
        direction: String,
    },

    #[error("{0} is stunned")]
    Stunned(EntityId),
}

impl CombatError for FleeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Stunned(_) => ErrorSeverity::Recoverable,
            Self::ActorNotFound(_)
            | Self::ActorDead(_)
            | Self::PursuerNotFound(_)
            | Self::NoExit { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ActorNotFound(_) => "FLEE_ACTOR_NOT_FOUND",
            Self::ActorDead(_) => "FLEE_ACTOR_DEAD",
            Self::PursuerNotFound(_) => "FLEE_PURSUER_NOT_FOUND",
            Self::NoExit { .. } => "FLEE_NO_EXIT",
            Self::Stunned(_) => "FLEE_STUNNED",
        }
    }
}

/// `round(agility * 0.6 + escape * 0.4)`.
pub fn flee_modifier(skills: &SkillSet) -> u32 {
    let agility = skills.level(Skill::Agility) as f64;
    let escape = skills.level(Skill::Escape) as f64;
    (agility * 0.6 + escape * 0.4).round() as u32
}

/// Pursuer's flat bonus.
pub fn pursuit_modifier(skills: &SkillSet) -> u32 {
    skills.level(Skill::Pursuit)
}

/// Result of the roll-off, before any free attack resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FleeCheck {
    /// No pursuers: nothing rolled.
    Unopposed,
    Escaped {
        flee_roll: u32,
        max_pursuit_roll: u32,
    },
    Intercepted {
        flee_roll: u32,
        max_pursuit_roll: u32,
        interceptor: EntityId,
    },
}

/// Roll-off with given totals. `pursuit_rolls` pairs each pursuer with its
/// total; the first pursuer holding the maximum becomes the interceptor.
pub fn check_with_rolls(flee_roll: u32, pursuit_rolls: &[(EntityId, u32)]) -> FleeCheck {
    let mut best: Option<(EntityId, u32)> = None;
    for &(pursuer, roll) in pursuit_rolls {
        if best.is_none_or(|(_, max)| roll > max) {
            best = Some((pursuer, roll));
        }
    }

    match best {
        None => FleeCheck::Unopposed,
        Some((_, max_pursuit_roll)) if flee_roll > max_pursuit_roll => FleeCheck::Escaped {
            flee_roll,
            max_pursuit_roll,
        },
        Some((interceptor, max_pursuit_roll)) => FleeCheck::Intercepted {
            flee_roll,
            max_pursuit_roll,
            interceptor,
        },
    }
}

/// Draws the flee and pursuit dice.
#[derive(Clone, Copy)]
pub struct FleeResolver<'a> {
    rng: &'a dyn RngOracle,
}

impl<'a> FleeResolver<'a> {
    pub fn new(rng: &'a dyn RngOracle) -> Self {
        Self { rng }
    }

    /// Rolls for the fleeing actor and every pursuer, then compares.
    ///
    /// `pursuers` pairs each pursuer id with its skills.
    pub fn check(
        &self,
        fleeing: EntityId,
        fleeing_skills: &SkillSet,
        pursuers: &[(EntityId, &SkillSet)],
        game_seed: u64,
        nonce: u64,
    ) -> FleeCheck {
        if pursuers.is_empty() {
            return FleeCheck::Unopposed;
        }

        let flee_roll = self
            .rng
            .roll_d20(compute_seed(game_seed, nonce, fleeing.0, RollContext::Flee))
            + flee_modifier(fleeing_skills);

        let pursuit_rolls: Vec<(EntityId, u32)> = pursuers
            .iter()
            .enumerate()
            .map(|(index, (pursuer, skills))| {
                let context = RollContext::Pursuit(index as u32);
                let seed = compute_seed(game_seed, nonce, pursuer.0, context);
                (*pursuer, self.rng.roll_d20(seed) + pursuit_modifier(skills))
            })
            .collect();

        check_with_rolls(flee_roll, &pursuit_rolls)
    }
}

impl std::fmt::Debug for FleeResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FleeResolver").finish_non_exhaustive()
    }
}
