//! World time: NPC turns, status ticks, corpse decay.

use super::CombatEngine;
use super::attack::AttackReport;
use crate::combat::{ActionKind, actor_cost};
use crate::death::{CorpseDecayManager, DeathHandler, DeathOutcome, DecayedCorpse};
use crate::effects::{EffectApplication, StatusEffectEngine};
use crate::env::CombatEnv;
use crate::events::CombatEvent;
use crate::state::{EntityId, Tick};

/// One dequeued NPC turn.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnRecord {
    pub actor: EntityId,
    pub at: Tick,
    /// `None` if the actor had no one to attack, was stunned, or is calm.
    pub attack: Option<AttackReport>,
}

/// Effects that pulsed on one actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusTick {
    pub actor: EntityId,
    pub applications: Vec<EffectApplication>,
}

/// Everything that happened while world time advanced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldTickReport {
    pub from: Tick,
    pub to: Tick,
    pub turns: Vec<TurnRecord>,
    pub status: Vec<StatusTick>,
    pub deaths: Vec<DeathOutcome>,
    pub decayed: Vec<DecayedCorpse>,
}

impl WorldTickReport {
    pub fn player_died(&self) -> bool {
        self.deaths.iter().any(DeathOutcome::is_player)
    }
}

impl CombatEngine<'_> {
    /// Advances the clock by `elapsed`.
    ///
    /// 1. Every scheduled actor whose readiness falls within the window acts,
    ///    in ascending readiness order (an actor may act several times).
    /// 2. Status effects tick once for the whole window.
    /// 3. Corpses age by the whole window.
    pub fn advance_world_time(&mut self, env: CombatEnv<'_>, elapsed: u64) -> WorldTickReport {
        let from = self.world.clock;
        let to = from + elapsed;
        let mut report = WorldTickReport {
            from,
            to,
            ..WorldTickReport::default()
        };

        while let Some(turn) = self.world.scheduler.dequeue(to) {
            if turn.ready_at > self.world.clock {
                self.world.clock = turn.ready_at;
            }
            if let Some(record) = self.take_turn(env, turn.actor) {
                if let Some(death) = record.attack.as_ref().and_then(|a| a.death.clone()) {
                    report.deaths.push(death);
                }
                report.turns.push(record);
            }
        }
        self.world.clock = to;

        self.tick_status_effects(env, elapsed, &mut report);

        report.decayed = CorpseDecayManager::new(env.config(), env.rng()).tick(self.world, elapsed);
        for corpse in &report.decayed {
            env.events().emit(CombatEvent::CorpseDecayed {
                owner: corpse.owner,
                location: corpse.location,
                scattered: corpse.scattered,
                destroyed: corpse.destroyed,
            });
        }

        report
    }

    /// Runs one NPC turn. The turn was already dequeued.
    fn take_turn(&mut self, env: CombatEnv<'_>, actor: EntityId) -> Option<TurnRecord> {
        let at = self.world.clock;
        let events = env.events();
        let npc = self.world.actor(actor)?;
        if !npc.is_alive() {
            return None;
        }
        events.emit(CombatEvent::TurnTaken { actor, at });

        if StatusEffectEngine::is_incapacitated(&npc.status_effects) {
            let ready_at = at + actor_cost(ActionKind::Defend, npc, env.config());
            self.world.schedule(actor, ready_at);
            events.emit(CombatEvent::TurnScheduled { actor, ready_at });
            return Some(TurnRecord {
                actor,
                at,
                attack: None,
            });
        }

        let target = self.world.location_of(actor).and_then(|location| {
            self.world
                .actors_in(location)
                .find(|other| other.is_player() && other.is_alive())
                .map(|player| player.id)
        });
        let hostile = env.config().is_hostile(npc.disposition);

        let Some(target) = target.filter(|_| hostile) else {
            self.world.unschedule(actor);
            events.emit(CombatEvent::Unscheduled { actor });
            return Some(TurnRecord {
                actor,
                at,
                attack: None,
            });
        };

        let text = npc.attack_text().to_string();
        let attack = self.process_attack(env, actor, target, &text, None);
        if attack.rolls.is_none() {
            // Failed before rolling: nothing rescheduled it.
            self.world.unschedule(actor);
            events.emit(CombatEvent::Unscheduled { actor });
        }

        Some(TurnRecord {
            actor,
            at,
            attack: Some(attack),
        })
    }

    fn tick_status_effects(
        &mut self,
        env: CombatEnv<'_>,
        elapsed: u64,
        report: &mut WorldTickReport,
    ) {
        if elapsed == 0 {
            return;
        }
        let events = env.events();

        for actor in self.world.actor_ids() {
            let Some(combatant) = self.world.actor_mut(actor) else {
                continue;
            };
            let applications = StatusEffectEngine::tick(&mut combatant.status_effects, elapsed);
            if applications.is_empty() {
                continue;
            }

            for applied in &applications {
                let removed = combatant.health.damage(applied.damage);
                let restored = combatant.health.heal(applied.healing);
                if applied.damage > 0 || applied.healing > 0 {
                    events.emit(CombatEvent::StatusTicked {
                        target: actor,
                        kind: applied.kind,
                        damage: removed,
                        healing: restored,
                    });
                }
                if applied.expired {
                    events.emit(CombatEvent::StatusExpired {
                        target: actor,
                        kind: applied.kind,
                    });
                }
            }
            let died = !combatant.is_alive();

            report.status.push(StatusTick { actor, applications });
            if died && let Ok(outcome) = DeathHandler::new(env).handle_death(self.world, actor) {
                report.deaths.push(outcome);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::env::PcgRng;
    use crate::events::RecordingSink;
    use crate::state::{
        Combatant, CorpseData, Location, LocationId, StatusEffect, StatusEffectKind, WorldSnapshot,
    };

    const RAT: EntityId = EntityId(41);
    const BAT: EntityId = EntityId(42);

    fn cellar() -> WorldSnapshot {
        let mut world = WorldSnapshot::new(23)
            .with_location(Location::new(LocationId(1), "Cellar"))
            .with_location(Location::new(LocationId(2), "Attic"));
        world
            .spawn(Combatant::player(EntityId::PLAYER, "Hero", 500), LocationId(1))
            .unwrap();
        world
            .spawn(
                Combatant::npc(RAT, "Rat", 5).with_weapon("bite").with_disposition(-100),
                LocationId(1),
            )
            .unwrap();
        world
            .spawn(
                Combatant::npc(BAT, "Bat", 5).with_disposition(-100),
                LocationId(2),
            )
            .unwrap();
        world
    }

    #[test]
    fn hostile_npc_acts_repeatedly_within_window() {
        let config = CombatConfig::default();
        let mut world = cellar();
        world.schedule(RAT, Tick(2));

        let env = CombatEnv::with_defaults(&config);
        let report = CombatEngine::new(&mut world).advance_world_time(env, 12);

        // Unarmed melee costs 5: turns at 2, 7 and 12.
        let times: Vec<_> = report.turns.iter().map(|t| t.at).collect();
        assert_eq!(times, vec![Tick(2), Tick(7), Tick(12)]);
        assert!(report.turns.iter().all(|t| t.attack.is_some()));
        assert_eq!(world.clock, Tick(12));
        assert_eq!(world.scheduler.ready_at(RAT), Some(Tick(17)));
    }

    #[test]
    fn npc_without_target_leaves_schedule() {
        let config = CombatConfig::default();
        let sink = RecordingSink::new();
        let rng = PcgRng;
        let mut world = cellar();
        world.schedule(BAT, Tick(3));

        let env = CombatEnv::new(&config, &rng, &sink);
        let report = CombatEngine::new(&mut world).advance_world_time(env, 10);

        assert_eq!(report.turns.len(), 1);
        assert!(report.turns[0].attack.is_none());
        assert!(!world.scheduler.contains(BAT));
        assert!(sink.events().contains(&CombatEvent::Unscheduled { actor: BAT }));
    }

    #[test]
    fn future_turns_wait() {
        let config = CombatConfig::default();
        let mut world = cellar();
        world.schedule(RAT, Tick(30));

        let env = CombatEnv::with_defaults(&config);
        let report = CombatEngine::new(&mut world).advance_world_time(env, 10);

        assert!(report.turns.is_empty());
        assert_eq!(world.scheduler.ready_at(RAT), Some(Tick(30)));
    }

    #[test]
    fn poison_ticks_and_kills() {
        let config = CombatConfig::default();
        let mut world = cellar();
        if let Some(rat) = world.actor_mut(RAT) {
            rat.status_effects
                .push(StatusEffect::new(StatusEffectKind::Poisoned, 2, 10, EntityId::PLAYER))
                .unwrap();
        }

        let env = CombatEnv::with_defaults(&config);
        let report = CombatEngine::new(&mut world).advance_world_time(env, 3);

        assert_eq!(report.status.len(), 1);
        assert_eq!(report.status[0].applications[0].damage, 6);
        assert_eq!(report.deaths.len(), 1);
        assert!(world.actor(RAT).is_none());
        assert_eq!(world.corpses_at(LocationId(1)).len(), 1);
    }

    #[test]
    fn corpses_decay_with_world_time() {
        let config = CombatConfig::default();
        let mut world = cellar();
        if let Some(room) = world.location_mut(LocationId(2)) {
            room.corpses.push(CorpseData::new(EntityId(90), "Spider", LocationId(2), 100));
        }
        let env = CombatEnv::with_defaults(&config);
        let mut engine = CombatEngine::new(&mut world);

        assert!(engine.advance_world_time(env, 60).decayed.is_empty());
        assert_eq!(engine.advance_world_time(env, 41).decayed.len(), 1);
        assert!(world.corpses_at(LocationId(2)).is_empty());
    }
}
