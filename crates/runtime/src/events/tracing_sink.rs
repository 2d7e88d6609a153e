//! Maps combat events onto `tracing` levels.
//!
//! Rolls and bookkeeping go to `debug`, deaths and progression to `info`,
//! degraded outcomes to `warn`.

use tracing::{debug, info, trace, warn};

use combat_core::{CombatEvent, EventSink};

#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: CombatEvent) {
        let name = event.name();
        match &event {
            CombatEvent::PersistenceFailed {
                actor,
                operation,
                reason,
            } => warn!(
                event = name,
                %actor,
                operation,
                reason = %reason,
                "persistence failed, keeping in-memory state"
            ),
            CombatEvent::LootUnavailable { actor, table } => warn!(
                event = name,
                %actor,
                table = ?table,
                "loot table unavailable, corpse left empty"
            ),
            CombatEvent::Death {
                actor,
                location,
                was_player,
            } => info!(event = name, %actor, %location, was_player, "combatant died"),
            CombatEvent::SkillImproved { actor, skill, level } => {
                info!(event = name, %actor, %skill, level, "skill improved")
            }
            CombatEvent::HostilityTriggered { actor, scheduled } => {
                info!(event = name, %actor, scheduled, "npc turned hostile")
            }
            CombatEvent::DeEscalated {
                actor,
                disposition,
                unscheduled,
            } => info!(event = name, %actor, disposition, unscheduled, "npc calmed down"),
            CombatEvent::HostilityRejected { actor, code, reason } => {
                debug!(event = name, %actor, code, reason = %reason, "npc not provoked")
            }
            CombatEvent::AttackResolved {
                attacker,
                defender,
                attack_roll,
                defense_roll,
                result,
            } => debug!(
                event = name,
                %attacker,
                %defender,
                attack_roll,
                defense_roll = ?defense_roll,
                result = ?result,
                "attack resolved"
            ),
            CombatEvent::FleeResolved {
                actor,
                flee_roll,
                max_pursuit_roll,
                escaped,
            } => debug!(
                event = name,
                %actor,
                flee_roll = ?flee_roll,
                max_pursuit_roll = ?max_pursuit_roll,
                escaped,
                "flee resolved"
            ),
            CombatEvent::DamageDealt {
                target,
                amount,
                remaining_health,
                ..
            } => debug!(event = name, %target, amount, remaining_health, "damage dealt"),
            CombatEvent::SkillsClassified {
                actor,
                source,
                dominant,
                effective_level,
                discarded,
            } => debug!(
                event = name,
                %actor,
                source = ?source,
                dominant = ?dominant,
                effective_level,
                discarded = discarded.len(),
                "skills classified"
            ),
            CombatEvent::CorpseDecayed {
                owner,
                location,
                scattered,
                destroyed,
            } => debug!(event = name, %owner, %location, scattered, destroyed, "corpse decayed"),
            _ => trace!(event = name, details = ?event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{EntityId, LocationId};

    #[test]
    fn emits_without_subscriber() {
        let sink = TracingEventSink;
        sink.emit(CombatEvent::Death {
            actor: EntityId(2),
            location: LocationId(1),
            was_player: false,
        });
        sink.emit(CombatEvent::PersistenceFailed {
            actor: EntityId(2),
            operation: "save_skills",
            reason: "offline".into(),
        });
        sink.emit(CombatEvent::HostilityRejected {
            actor: EntityId::PLAYER,
            code: "TRIGGER_NOT_AN_NPC",
            reason: "not an npc".into(),
        });
    }
}
