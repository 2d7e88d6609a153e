//! Bridges NPC disposition into scheduler membership.
//!
//! Hostile NPCs hold a pending turn; calm ones do not. Disposition changes
//! are persisted best-effort: a failed save is reported as an event and the
//! in-memory change stands.

use crate::combat::{ActionKind, actor_cost};
use crate::config::CombatConfig;
use crate::env::CombatEnv;
use crate::error::{CombatError, ErrorSeverity};
use crate::events::CombatEvent;
use crate::state::{CombatStats, EntityId, Tick, WorldSnapshot};

/// Result of turning an NPC hostile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostilityOutcome {
    pub actor: EntityId,
    pub previous_disposition: i32,
    /// A new turn was enqueued (false if one was already pending).
    pub scheduled: bool,
    pub ready_at: Tick,
}

/// Result of calming an NPC down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeEscalation {
    pub actor: EntityId,
    pub disposition: i32,
    /// The NPC left the scheduler.
    pub unscheduled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TriggerError {
    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error("{0} is a player; disposition applies to NPCs only")]
    NotAnNpc(EntityId),

    #[error("{0} is dead")]
    Dead(EntityId),
}

impl CombatError for TriggerError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ActorNotFound(_) => "TRIGGER_ACTOR_NOT_FOUND",
            Self::NotAnNpc(_) => "TRIGGER_NOT_AN_NPC",
            Self::Dead(_) => "TRIGGER_DEAD",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CombatBehaviorTrigger<'a> {
    env: CombatEnv<'a>,
}

impl<'a> CombatBehaviorTrigger<'a> {
    pub fn new(env: CombatEnv<'a>) -> Self {
        Self { env }
    }

    /// Makes an NPC maximally hostile and gives it a turn if it has none.
    ///
    /// Combat stats are derived from skills when missing. The first turn
    /// lands one melee action after the current clock.
    pub fn trigger_hostility(
        &self,
        world: &mut WorldSnapshot,
        actor: EntityId,
    ) -> Result<HostilityOutcome, TriggerError> {
        let config = self.env.config();
        let clock = world.clock;
        let npc = world.actor_mut(actor).ok_or(TriggerError::ActorNotFound(actor))?;
        if npc.is_player() {
            return Err(TriggerError::NotAnNpc(actor));
        }
        if !npc.is_alive() {
            return Err(TriggerError::Dead(actor));
        }

        let previous_disposition = npc.disposition;
        npc.disposition = CombatConfig::MIN_DISPOSITION;
        if npc.combat_stats.is_none() {
            npc.combat_stats = Some(CombatStats::derive(&npc.skills));
        }
        let first_turn = clock + actor_cost(ActionKind::Melee, npc, config);

        let scheduled = !world.scheduler.contains(actor);
        if scheduled {
            world.schedule(actor, first_turn);
            self.env.events().emit(CombatEvent::TurnScheduled {
                actor,
                ready_at: first_turn,
            });
        }
        let ready_at = world.scheduler.ready_at(actor).unwrap_or(first_turn);

        self.persist(actor, CombatConfig::MIN_DISPOSITION);
        self.env
            .events()
            .emit(CombatEvent::HostilityTriggered { actor, scheduled });

        Ok(HostilityOutcome {
            actor,
            previous_disposition,
            scheduled,
            ready_at,
        })
    }

    /// [`trigger_hostility`](Self::trigger_hostility) for each actor, in order.
    pub fn trigger_group_hostility(
        &self,
        world: &mut WorldSnapshot,
        actors: &[EntityId],
    ) -> Vec<(EntityId, Result<HostilityOutcome, TriggerError>)> {
        actors
            .iter()
            .map(|&actor| (actor, self.trigger_hostility(world, actor)))
            .collect()
    }

    /// Raises an NPC's disposition. Never lowers it.
    ///
    /// If the result is above the hostility threshold the NPC leaves the
    /// scheduler.
    pub fn de_escalate(
        &self,
        world: &mut WorldSnapshot,
        actor: EntityId,
        new_disposition: i32,
    ) -> Result<DeEscalation, TriggerError> {
        let config = self.env.config();
        let npc = world.actor_mut(actor).ok_or(TriggerError::ActorNotFound(actor))?;
        if npc.is_player() {
            return Err(TriggerError::NotAnNpc(actor));
        }

        let disposition = new_disposition
            .max(npc.disposition)
            .clamp(CombatConfig::MIN_DISPOSITION, CombatConfig::MAX_DISPOSITION);
        npc.disposition = disposition;

        let unscheduled = !config.is_hostile(disposition) && world.unschedule(actor);
        if unscheduled {
            self.env.events().emit(CombatEvent::Unscheduled { actor });
        }

        self.persist(actor, disposition);
        self.env.events().emit(CombatEvent::DeEscalated {
            actor,
            disposition,
            unscheduled,
        });

        Ok(DeEscalation {
            actor,
            disposition,
            unscheduled,
        })
    }

    /// Loads a stored disposition into the snapshot, if the repository has one.
    pub fn restore_disposition(&self, world: &mut WorldSnapshot, actor: EntityId) -> Option<i32> {
        let repository = self.env.disposition_repository()?;
        let stored = match repository.load(actor) {
            Ok(stored) => stored?,
            Err(err) => {
                self.env.events().emit(CombatEvent::PersistenceFailed {
                    actor,
                    operation: "load_disposition",
                    reason: err.to_string(),
                });
                return None;
            }
        };
        let npc = world.actor_mut(actor)?;
        npc.disposition =
            stored.clamp(CombatConfig::MIN_DISPOSITION, CombatConfig::MAX_DISPOSITION);
        Some(npc.disposition)
    }

    fn persist(&self, actor: EntityId, disposition: i32) {
        let Some(repository) = self.env.disposition_repository() else {
            return;
        };
        if let Err(err) = repository.save(actor, disposition) {
            self.env.events().emit(CombatEvent::PersistenceFailed {
                actor,
                operation: "save_disposition",
                reason: err.to_string(),
            });
        }
    }
}
