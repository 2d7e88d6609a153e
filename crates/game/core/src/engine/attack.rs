//! Attack processing.

use super::CombatEngine;
use super::practice::SkillUp;
use crate::behavior::CombatBehaviorTrigger;
use crate::combat::{
    ActionKind, AttackContext, AttackFailure, AttackResolver, AttackResult, AttackRolls,
    WeaponProfile, actor_cost,
};
use crate::death::{DeathHandler, DeathOutcome};
use crate::effects::{ApplyOutcome, StatusEffectEngine};
use crate::env::CombatEnv;
use crate::error::CombatError;
use crate::events::CombatEvent;
use crate::skills::{Classification, ProposedWeight, classify, dominant_skill, effective_level};
use crate::state::{EntityId, StatusEffect, StatusEffectKind};

/// Everything that happened during one attack.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackReport {
    pub attacker: EntityId,
    pub defender: EntityId,
    pub result: AttackResult,
    /// Dice used; `None` when the attack failed before rolling.
    pub rolls: Option<AttackRolls>,
    pub classification: Option<Classification>,
    /// Time the attacker spent. Zero for failures.
    pub cost: u64,
    pub status: Option<(StatusEffectKind, ApplyOutcome)>,
    pub skill_up: Option<SkillUp>,
    pub death: Option<DeathOutcome>,
}

impl AttackReport {
    fn failed(attacker: EntityId, defender: EntityId, failure: AttackFailure) -> Self {
        Self {
            attacker,
            defender,
            result: AttackResult::Failure(failure),
            rolls: None,
            classification: None,
            cost: 0,
            status: None,
            skill_up: None,
            death: None,
        }
    }

    pub fn defender_died(&self) -> bool {
        self.death.is_some()
    }
}

impl CombatEngine<'_> {
    /// Resolves `attacker` attacking `defender` with a free-text action.
    ///
    /// `proposal` is the external classifier's answer, if one arrived in
    /// time. Failures (missing actors, different rooms, stun) come back as
    /// [`AttackResult::Failure`] and change nothing.
    pub fn process_attack(
        &mut self,
        env: CombatEnv<'_>,
        attacker: EntityId,
        defender: EntityId,
        action_text: &str,
        proposal: Option<&[ProposedWeight]>,
    ) -> AttackReport {
        if let Err(failure) = self.validate_attack(attacker, defender) {
            return AttackReport::failed(attacker, defender, failure);
        }
        self.hydrate_skills(env, attacker);
        self.resolve_attack(env, attacker, defender, action_text, proposal, false)
    }

    fn validate_attack(&self, attacker: EntityId, defender: EntityId) -> Result<(), AttackFailure> {
        let world = &*self.world;
        let attacking = world
            .actor(attacker)
            .ok_or(AttackFailure::AttackerNotFound(attacker))?;
        let defending = world
            .actor(defender)
            .ok_or(AttackFailure::DefenderNotFound(defender))?;

        if attacker == defender {
            return Err(AttackFailure::SelfTarget(attacker));
        }
        if !attacking.is_alive() {
            return Err(AttackFailure::AttackerDead(attacker));
        }
        if !defending.is_alive() {
            return Err(AttackFailure::DefenderDead(defender));
        }
        let here = world.location_of(attacker);
        if here.is_none() || here != world.location_of(defender) {
            return Err(AttackFailure::NotInReach { attacker, defender });
        }
        if StatusEffectEngine::is_incapacitated(&attacking.status_effects) {
            return Err(AttackFailure::Stunned(attacker));
        }
        Ok(())
    }

    /// Shared by regular attacks and flee free attacks (`guaranteed`).
    /// Callers have already validated both actors. Free attacks cost the
    /// attacker no time and never touch its schedule.
    pub(super) fn resolve_attack(
        &mut self,
        env: CombatEnv<'_>,
        attacker: EntityId,
        defender: EntityId,
        action_text: &str,
        proposal: Option<&[ProposedWeight]>,
        guaranteed: bool,
    ) -> AttackReport {
        let config = env.config();
        let events = env.events();
        let (Some(attacking), Some(defending)) =
            (self.world.actor(attacker), self.world.actor(defender))
        else {
            let failure = AttackFailure::DefenderNotFound(defender);
            return AttackReport::failed(attacker, defender, failure);
        };

        let classification = classify(action_text, &attacking.skills, proposal);
        events.emit(CombatEvent::SkillsClassified {
            actor: attacker,
            source: classification.source,
            dominant: dominant_skill(&classification.weights),
            effective_level: effective_level(&classification.weights, &attacking.skills),
            discarded: classification.discarded.clone(),
        });

        let weapon = WeaponProfile::from_text(action_text);
        let ctx = AttackContext::new(attacking, defending, &classification.weights, weapon);
        let resolver = AttackResolver::new(config, env.rng());
        let (result, rolls) = if guaranteed {
            resolver.resolve_guaranteed(&ctx, self.world.game_seed, self.world.nonce)
        } else {
            resolver.resolve(&ctx, self.world.game_seed, self.world.nonce)
        };
        let cost = actor_cost(ActionKind::from_text(action_text), attacking, config);
        let attacker_is_player = attacking.is_player();

        events.emit(CombatEvent::AttackResolved {
            attacker,
            defender,
            attack_roll: rolls.attack,
            defense_roll: rolls.defense,
            result: result.clone(),
        });
        self.world.nonce += 1;

        let mut report = AttackReport {
            attacker,
            defender,
            result,
            rolls: Some(rolls),
            classification: None,
            cost,
            status: None,
            skill_up: None,
            death: None,
        };

        // A free attack leaves the interceptor's own turn where it was.
        if !attacker_is_player && !guaranteed {
            let ready_at = self.world.clock + cost;
            self.world.schedule(attacker, ready_at);
            events.emit(CombatEvent::TurnScheduled {
                actor: attacker,
                ready_at,
            });
        }

        let landed = match &report.result {
            AttackResult::Hit { damage, .. } => Some((damage.final_damage, damage.damage_type)),
            AttackResult::Miss { .. } | AttackResult::Failure(_) => None,
        };
        if let Some((amount, damage_type)) = landed {
            if let Some(target) = self.world.actor_mut(defender) {
                target.health.damage(amount);
                events.emit(CombatEvent::DamageDealt {
                    target: defender,
                    amount,
                    damage_type: Some(damage_type),
                    remaining_health: target.health.current,
                });

                if let Some(on_hit) = weapon.on_hit
                    && target.is_alive()
                {
                    let effect =
                        StatusEffect::new(on_hit.kind, on_hit.magnitude, on_hit.duration, attacker);
                    if let Ok(outcome) =
                        StatusEffectEngine::apply(&mut target.status_effects, effect)
                    {
                        events.emit(CombatEvent::StatusApplied {
                            target: defender,
                            kind: on_hit.kind,
                            was_stacked: outcome.was_stacked,
                            was_replaced: outcome.was_replaced,
                        });
                        report.status = Some((on_hit.kind, outcome));
                    }
                }
            }

            if let Some(skill) = dominant_skill(&classification.weights) {
                report.skill_up = self.practice(env, attacker, skill);
            }
        }

        self.settle_defender(env, attacker_is_player, defender, &mut report);
        report.classification = Some(classification);
        report
    }

    /// Death handling for a dead defender; hostility for a living NPC one.
    fn settle_defender(
        &mut self,
        env: CombatEnv<'_>,
        attacker_is_player: bool,
        defender: EntityId,
        report: &mut AttackReport,
    ) {
        let Some(target) = self.world.actor(defender) else {
            return;
        };

        if !target.is_alive() {
            if let Ok(outcome) = DeathHandler::new(env).handle_death(self.world, defender) {
                report.death = Some(outcome);
            }
        } else if attacker_is_player && !target.is_player() {
            self.provoke(env, defender);
        }
    }

    /// Turns an attacked NPC hostile; a refusal is reported, not raised.
    fn provoke(&mut self, env: CombatEnv<'_>, npc: EntityId) {
        if let Err(err) = CombatBehaviorTrigger::new(env).trigger_hostility(self.world, npc) {
            env.events().emit(CombatEvent::HostilityRejected {
                actor: npc,
                code: err.error_code(),
                reason: err.to_string(),
            });
        }
    }
}
