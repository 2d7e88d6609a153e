//! Flee processing.

use super::CombatEngine;
use super::attack::AttackReport;
use crate::combat::{ActionKind, FleeCheck, FleeError, FleeResolver, FleeResult, actor_cost};
use crate::death::DeathOutcome;
use crate::effects::StatusEffectEngine;
use crate::env::CombatEnv;
use crate::events::CombatEvent;
use crate::skills::SkillSet;
use crate::state::{EntityId, LocationId};

/// Everything that happened during one escape attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct FleeReport {
    pub result: FleeResult,
    /// Time the fleeing actor spent. Zero for errors.
    pub cost: u64,
    /// The interceptor's free attack, when the attempt failed.
    pub free_attack: Option<AttackReport>,
}

impl FleeReport {
    fn error(error: FleeError) -> Self {
        Self {
            result: FleeResult::Error(error),
            cost: 0,
            free_attack: None,
        }
    }

    pub fn death(&self) -> Option<&DeathOutcome> {
        self.free_attack.as_ref().and_then(|attack| attack.death.as_ref())
    }
}

impl CombatEngine<'_> {
    /// Resolves `fleeing` running through `direction` while `pursuers` give chase.
    ///
    /// Pursuers standing elsewhere, dead, or equal to the fleeing actor are
    /// ignored. On success the actor moves and nobody follows. On failure the
    /// best pursuer gets one free attack that skips the evasion check, and
    /// the actor stays put.
    pub fn process_flee(
        &mut self,
        env: CombatEnv<'_>,
        fleeing: EntityId,
        pursuers: &[EntityId],
        direction: &str,
    ) -> FleeReport {
        let (origin, destination, active) = match self.validate_flee(fleeing, pursuers, direction) {
            Ok(validated) => validated,
            Err(error) => return FleeReport::error(error),
        };

        let world = &*self.world;
        let check = {
            let Some(runner) = world.actor(fleeing) else {
                return FleeReport::error(FleeError::ActorNotFound(fleeing));
            };
            let pursuit: Vec<(EntityId, &SkillSet)> = active
                .iter()
                .filter_map(|id| world.actor(*id).map(|p| (*id, &p.skills)))
                .collect();
            FleeResolver::new(env.rng()).check(
                fleeing,
                &runner.skills,
                &pursuit,
                world.game_seed,
                world.nonce,
            )
        };
        let cost = world
            .actor(fleeing)
            .map_or(0, |runner| actor_cost(ActionKind::Flee, runner, env.config()));
        let is_player = world.actor(fleeing).is_some_and(|runner| runner.is_player());
        self.world.nonce += 1;

        if !is_player {
            let ready_at = self.world.clock + cost;
            self.world.schedule(fleeing, ready_at);
        }

        let (flee_roll, max_pursuit_roll) = match check {
            FleeCheck::Unopposed => (None, None),
            FleeCheck::Escaped {
                flee_roll,
                max_pursuit_roll,
            }
            | FleeCheck::Intercepted {
                flee_roll,
                max_pursuit_roll,
                ..
            } => (Some(flee_roll), Some(max_pursuit_roll)),
        };
        env.events().emit(CombatEvent::FleeResolved {
            actor: fleeing,
            flee_roll,
            max_pursuit_roll,
            escaped: !matches!(check, FleeCheck::Intercepted { .. }),
        });

        match check {
            FleeCheck::Unopposed | FleeCheck::Escaped { .. } => {
                // Exit leads to a location missing from the snapshot.
                if self.world.move_actor(fleeing, destination).is_err() {
                    return FleeReport {
                        result: FleeResult::Error(FleeError::NoExit {
                            location: origin,
                            direction: direction.to_string(),
                        }),
                        cost,
                        free_attack: None,
                    };
                }
                FleeReport {
                    result: FleeResult::Success {
                        flee_roll,
                        max_pursuit_roll,
                        destination,
                    },
                    cost,
                    free_attack: None,
                }
            }
            FleeCheck::Intercepted {
                flee_roll,
                max_pursuit_roll,
                interceptor,
            } => {
                let text = self
                    .world
                    .actor(interceptor)
                    .map(|p| p.attack_text().to_string())
                    .unwrap_or_default();
                let attack = self.resolve_attack(env, interceptor, fleeing, &text, None, true);
                FleeReport {
                    result: FleeResult::Failure {
                        flee_roll,
                        max_pursuit_roll,
                        interceptor,
                        free_attack: attack.result.clone(),
                    },
                    cost,
                    free_attack: Some(attack),
                }
            }
        }
    }

    /// Returns origin, destination and the pursuers that actually take part.
    fn validate_flee(
        &self,
        fleeing: EntityId,
        pursuers: &[EntityId],
        direction: &str,
    ) -> Result<(LocationId, LocationId, Vec<EntityId>), FleeError> {
        let world = &*self.world;
        let runner = world.actor(fleeing).ok_or(FleeError::ActorNotFound(fleeing))?;
        if !runner.is_alive() {
            return Err(FleeError::ActorDead(fleeing));
        }
        if StatusEffectEngine::is_incapacitated(&runner.status_effects) {
            return Err(FleeError::Stunned(fleeing));
        }

        let origin = world
            .location_of(fleeing)
            .ok_or(FleeError::ActorNotFound(fleeing))?;
        let destination = world
            .location(origin)
            .and_then(|room| room.exit(direction))
            .ok_or_else(|| FleeError::NoExit {
                location: origin,
                direction: direction.to_string(),
            })?;

        let mut active = Vec::with_capacity(pursuers.len());
        for &pursuer in pursuers {
            let chaser = world.actor(pursuer).ok_or(FleeError::PursuerNotFound(pursuer))?;
            let engaged = pursuer != fleeing
                && chaser.is_alive()
                && world.location_of(pursuer) == Some(origin)
                && !active.contains(&pursuer);
            if engaged {
                active.push(pursuer);
            }
        }

        Ok((origin, destination, active))
    }
}
