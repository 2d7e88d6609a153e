//! Skill loading and practice.

use super::CombatEngine;
use crate::env::CombatEnv;
use crate::events::CombatEvent;
use crate::skills::Skill;
use crate::state::EntityId;

/// A skill level gained through practice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkillUp {
    pub skill: Skill,
    pub level: u32,
}

impl CombatEngine<'_> {
    /// Fills an actor's empty skill set from the skill repository.
    pub(super) fn hydrate_skills(&mut self, env: CombatEnv<'_>, actor: EntityId) {
        let Some(repository) = env.skill_repository() else {
            return;
        };
        let Some(combatant) = self.world.actor_mut(actor) else {
            return;
        };
        if !combatant.skills.is_empty() {
            return;
        }

        match repository.load(actor) {
            Ok(Some(skills)) => combatant.skills = skills,
            Ok(None) => {}
            Err(err) => env.events().emit(CombatEvent::PersistenceFailed {
                actor,
                operation: "load_skills",
                reason: err.to_string(),
            }),
        }
    }

    /// Adds one point of practice to `skill`.
    ///
    /// Reaching `(level + 1) * practice_per_level` raises the level, resets
    /// practice, and saves the skill set. A failed save keeps the new level.
    pub(super) fn practice(
        &mut self,
        env: CombatEnv<'_>,
        actor: EntityId,
        skill: Skill,
    ) -> Option<SkillUp> {
        let per_level = env.config().practice_per_level;
        if per_level == 0 {
            return None;
        }
        let combatant = self.world.actor_mut(actor)?;

        let level = combatant.skills.level(skill);
        let practice = combatant.practice.entry(skill).or_insert(0);
        *practice += 1;
        if *practice < (level + 1).saturating_mul(per_level) {
            return None;
        }

        *practice = 0;
        let level = level + 1;
        combatant.skills.set(skill, level);
        if let Some(stats) = combatant.combat_stats.as_mut() {
            *stats = crate::state::CombatStats::derive(&combatant.skills);
        }

        if let Some(repository) = env.skill_repository()
            && let Err(err) = repository.save(actor, &combatant.skills)
        {
            env.events().emit(CombatEvent::PersistenceFailed {
                actor,
                operation: "save_skills",
                reason: err.to_string(),
            });
        }
        env.events().emit(CombatEvent::SkillImproved { actor, skill, level });

        Some(SkillUp { skill, level })
    }
}
