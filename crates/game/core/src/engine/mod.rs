//! Public combat surface.
//!
//! The [`CombatEngine`] is the only writer of a [`WorldSnapshot`] during
//! combat. It wires the components together: classification, attack
//! resolution, status effects, flee checks, death and corpse decay, and the
//! turn scheduler. Every command resolves to completion before it returns.

mod attack;
mod flee;
mod practice;
mod time;

pub use attack::AttackReport;
pub use flee::FleeReport;
pub use practice::SkillUp;
pub use time::{StatusTick, TurnRecord, WorldTickReport};

use crate::behavior::{CombatBehaviorTrigger, DeEscalation, HostilityOutcome, TriggerError};
use crate::env::CombatEnv;
use crate::state::{EntityId, Tick, WorldSnapshot};

/// Combat engine over a borrowed world snapshot.
///
/// Operations:
/// - `process_attack`: classify, resolve, apply damage and effects, reschedule
/// - `process_flee`: escape roll-off with a free attack on failure
/// - `advance_world_time`: NPC turns, status ticks, corpse decay
/// - `trigger_hostility` / `trigger_group_hostility` / `de_escalate`
pub struct CombatEngine<'a> {
    world: &'a mut WorldSnapshot,
}

impl<'a> CombatEngine<'a> {
    pub fn new(world: &'a mut WorldSnapshot) -> Self {
        Self { world }
    }

    pub fn world(&self) -> &WorldSnapshot {
        self.world
    }

    pub fn clock(&self) -> Tick {
        self.world.clock
    }

    pub fn trigger_hostility(
        &mut self,
        env: CombatEnv<'_>,
        actor: EntityId,
    ) -> Result<HostilityOutcome, TriggerError> {
        CombatBehaviorTrigger::new(env).trigger_hostility(self.world, actor)
    }

    pub fn trigger_group_hostility(
        &mut self,
        env: CombatEnv<'_>,
        actors: &[EntityId],
    ) -> Vec<(EntityId, Result<HostilityOutcome, TriggerError>)> {
        CombatBehaviorTrigger::new(env).trigger_group_hostility(self.world, actors)
    }

    pub fn de_escalate(
        &mut self,
        env: CombatEnv<'_>,
        actor: EntityId,
        new_disposition: i32,
    ) -> Result<DeEscalation, TriggerError> {
        CombatBehaviorTrigger::new(env).de_escalate(self.world, actor, new_disposition)
    }
}
