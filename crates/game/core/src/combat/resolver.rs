//! Attack resolution: opposed check composed with damage calculation.

use super::damage::{DamageInputs, calculate_damage, roll_variance};
use super::hit::{HitOutcome, guaranteed_check, opposed_check};
use super::result::{AttackFailure, AttackResult};
use super::weapons::WeaponProfile;
use crate::config::CombatConfig;
use crate::env::{RngOracle, RollContext, compute_seed};
use crate::skills::{SkillWeight, effective_level};
use crate::state::{Combatant, StatusEffectKind};

/// Everything an attack needs besides dice.
#[derive(Clone, Copy, Debug)]
pub struct AttackContext<'a> {
    pub attacker: &'a Combatant,
    pub defender: &'a Combatant,
    pub weights: &'a [SkillWeight],
    pub weapon: WeaponProfile,
}

impl<'a> AttackContext<'a> {
    pub fn new(
        attacker: &'a Combatant,
        defender: &'a Combatant,
        weights: &'a [SkillWeight],
        weapon: WeaponProfile,
    ) -> Self {
        Self {
            attacker,
            defender,
            weights,
            weapon,
        }
    }

    /// Damage inputs: weapon base, effective skill level as modifier,
    /// attacker item bonus, defender resistance for the weapon's damage type.
    pub fn damage_inputs(&self) -> DamageInputs {
        let damage_type = self.weapon.damage_type;
        DamageInputs {
            base: self.weapon.base_damage,
            skill_modifier: effective_level(self.weights, &self.attacker.skills),
            item_bonus: self.attacker.item_bonus,
            resistance_level: self.defender.skills.level(damage_type.resistance_skill()),
            damage_type,
        }
    }
}

/// Dice for one attack. `defense` is `None` on the guaranteed-hit path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackRolls {
    pub attack: u32,
    pub defense: Option<u32>,
    pub variance: i32,
}

/// Resolves a fully-specified attack.
///
/// Pure: the same context and rolls always produce the same result.
pub fn resolve_with_rolls(ctx: &AttackContext<'_>, rolls: AttackRolls) -> AttackResult {
    if ctx.weights.is_empty() {
        return AttackResult::Failure(AttackFailure::NoApplicableSkill);
    }

    let outcome = match rolls.defense {
        Some(defense) => opposed_check(
            rolls.attack,
            ctx.attacker.stats().accuracy,
            defense,
            ctx.defender.stats().evasion,
        ),
        None => guaranteed_check(rolls.attack),
    };

    let (critical, dodged) = match outcome {
        HitOutcome::Fumble => return AttackResult::Miss { was_dodged: false },
        HitOutcome::Evaded => return AttackResult::Miss { was_dodged: true },
        HitOutcome::Glancing => (false, true),
        HitOutcome::Hit { critical } => (critical, false),
    };

    let base = calculate_damage(&ctx.damage_inputs(), rolls.variance);
    let mut final_damage = base.final_damage;
    if critical {
        final_damage = final_damage.saturating_mul(2);
    }
    if dodged {
        final_damage /= 2;
    }
    let shield = ctx.defender.status_effects.total_magnitude(StatusEffectKind::Shielded);
    final_damage = final_damage.saturating_sub(shield);

    AttackResult::Hit {
        damage: base.with_final(final_damage),
        critical,
        dodged,
    }
}

/// Draws dice from the RNG oracle and resolves attacks.
#[derive(Clone, Copy)]
pub struct AttackResolver<'a> {
    config: &'a CombatConfig,
    rng: &'a dyn RngOracle,
}

impl<'a> AttackResolver<'a> {
    pub fn new(config: &'a CombatConfig, rng: &'a dyn RngOracle) -> Self {
        Self { config, rng }
    }

    /// Rolls every die an attack needs, seeded by `(game_seed, nonce, actor)`.
    pub fn roll(
        &self,
        ctx: &AttackContext<'_>,
        game_seed: u64,
        nonce: u64,
        guaranteed: bool,
    ) -> AttackRolls {
        let attacker = ctx.attacker.id.0;
        let defender = ctx.defender.id.0;

        let attack = self
            .rng
            .roll_d20(compute_seed(game_seed, nonce, attacker, RollContext::Accuracy));
        let defense = (!guaranteed).then(|| {
            self.rng
                .roll_d20(compute_seed(game_seed, nonce, defender, RollContext::Evasion))
        });
        let variance = roll_variance(
            &ctx.damage_inputs(),
            self.config.variance_percent,
            self.rng,
            compute_seed(game_seed, nonce, attacker, RollContext::Variance),
        );

        AttackRolls {
            attack,
            defense,
            variance,
        }
    }

    /// Regular attack with an opposed evasion check.
    pub fn resolve(
        &self,
        ctx: &AttackContext<'_>,
        game_seed: u64,
        nonce: u64,
    ) -> (AttackResult, AttackRolls) {
        let rolls = self.roll(ctx, game_seed, nonce, false);
        (resolve_with_rolls(ctx, rolls), rolls)
    }

    /// Attack that skips the defender's evasion check.
    pub fn resolve_guaranteed(
        &self,
        ctx: &AttackContext<'_>,
        game_seed: u64,
        nonce: u64,
    ) -> (AttackResult, AttackRolls) {
        let rolls = self.roll(ctx, game_seed, nonce, true);
        (resolve_with_rolls(ctx, rolls), rolls)
    }
}

impl std::fmt::Debug for AttackResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttackResolver")
            .field("variance_percent", &self.config.variance_percent)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;
    use crate::skills::{Skill, SkillSet};
    use crate::state::{EntityId, StatusEffect};

    fn knight() -> Combatant {
        Combatant::player(EntityId::PLAYER, "Knight", 40).with_skills(
            SkillSet::new()
                .with(Skill::SwordFighting, 10)
                .with(Skill::Strength, 4),
        )
    }

    fn ogre() -> Combatant {
        Combatant::npc(EntityId(7), "Ogre", 60)
            .with_skills(SkillSet::new().with(Skill::Toughness, 6))
    }

    fn sword_weights() -> Vec<SkillWeight> {
        vec![
            SkillWeight::new(Skill::SwordFighting, 0.7),
            SkillWeight::new(Skill::Strength, 0.3),
        ]
    }

    fn sword() -> WeaponProfile {
        WeaponProfile {
            base_damage: 10,
            ..WeaponProfile::from_text("sword")
        }
    }

    #[test]
    fn hit_uses_effective_level_and_resistance() {
        let (attacker, defender) = (knight(), ogre());
        let weights = sword_weights();
        let ctx = AttackContext::new(&attacker, &defender, &weights, sword());

        let rolls = AttackRolls {
            attack: 15,
            defense: Some(5),
            variance: -2,
        };
        match resolve_with_rolls(&ctx, rolls) {
            AttackResult::Hit {
                damage,
                critical,
                dodged,
            } => {
                assert_eq!(damage.skill_modifier, 8);
                assert_eq!(damage.resistance_reduction, 3);
                assert_eq!(damage.final_damage, 13);
                assert!(!critical);
                assert!(!dodged);
            }
            other => panic!("expected hit, got {other:?}"),
        }
    }

    #[test]
    fn item_bonus_adds_to_damage() {
        let (attacker, defender) = (knight().with_item_bonus(3), ogre());
        let weights = sword_weights();
        let ctx = AttackContext::new(&attacker, &defender, &weights, sword());

        let inputs = ctx.damage_inputs();
        assert_eq!(inputs.item_bonus, 3);

        let rolls = AttackRolls {
            attack: 15,
            defense: Some(5),
            variance: -2,
        };
        let AttackResult::Hit { damage, .. } = resolve_with_rolls(&ctx, rolls) else {
            panic!("expected hit");
        };
        assert_eq!(damage.final_damage, 16);
    }

    #[test]
    fn natural_one_misses_without_dodge() {
        let (attacker, defender) = (knight(), ogre());
        let weights = sword_weights();
        let ctx = AttackContext::new(&attacker, &defender, &weights, sword());
        let rolls = AttackRolls {
            attack: 1,
            defense: Some(1),
            variance: 0,
        };
        assert_eq!(resolve_with_rolls(&ctx, rolls), AttackResult::Miss { was_dodged: false });
    }

    #[test]
    fn higher_defense_is_dodged() {
        let (attacker, defender) = (knight(), ogre());
        let weights = sword_weights();
        let ctx = AttackContext::new(&attacker, &defender, &weights, sword());
        let rolls = AttackRolls {
            attack: 4,
            defense: Some(18),
            variance: 0,
        };
        assert_eq!(resolve_with_rolls(&ctx, rolls), AttackResult::Miss { was_dodged: true });
    }

    #[test]
    fn glancing_hit_halves_damage() {
        let (attacker, defender) = (knight(), ogre());
        let weights = sword_weights();
        let ctx = AttackContext::new(&attacker, &defender, &weights, sword());
        let rolls = AttackRolls {
            attack: 10,
            defense: Some(10),
            variance: 0,
        };
        match resolve_with_rolls(&ctx, rolls) {
            AttackResult::Hit { damage, dodged, .. } => {
                assert!(dodged);
                // (10 + 8 - 3) / 2
                assert_eq!(damage.final_damage, 7);
            }
            other => panic!("expected glancing hit, got {other:?}"),
        }
    }

    #[test]
    fn critical_doubles_damage() {
        let (attacker, defender) = (knight(), ogre());
        let weights = sword_weights();
        let ctx = AttackContext::new(&attacker, &defender, &weights, sword());
        let rolls = AttackRolls {
            attack: 20,
            defense: Some(2),
            variance: 0,
        };
        match resolve_with_rolls(&ctx, rolls) {
            AttackResult::Hit { damage, critical, .. } => {
                assert!(critical);
                assert_eq!(damage.final_damage, 30);
            }
            other => panic!("expected critical, got {other:?}"),
        }
    }

    #[test]
    fn shield_absorbs_but_keeps_floor() {
        let attacker = knight();
        let mut defender = ogre();
        defender
            .status_effects
            .push(StatusEffect::new(StatusEffectKind::Shielded, 100, 5, EntityId(7)))
            .expect("capacity");
        let weights = sword_weights();
        let ctx = AttackContext::new(&attacker, &defender, &weights, sword());
        let rolls = AttackRolls {
            attack: 15,
            defense: Some(2),
            variance: 0,
        };
        assert_eq!(resolve_with_rolls(&ctx, rolls).damage_dealt(), 1);
    }

    #[test]
    fn empty_weights_fail() {
        let (attacker, defender) = (knight(), ogre());
        let ctx = AttackContext::new(&attacker, &defender, &[], sword());
        let rolls = AttackRolls {
            attack: 15,
            defense: Some(2),
            variance: 0,
        };
        assert_eq!(
            resolve_with_rolls(&ctx, rolls),
            AttackResult::Failure(AttackFailure::NoApplicableSkill)
        );
    }

    #[test]
    fn guaranteed_path_never_misses() {
        let config = CombatConfig::default();
        let rng = PcgRng;
        let resolver = AttackResolver::new(&config, &rng);
        let (attacker, defender) = (knight(), ogre());
        let weights = sword_weights();
        let ctx = AttackContext::new(&attacker, &defender, &weights, sword());

        for nonce in 0..100 {
            let (result, rolls) = resolver.resolve_guaranteed(&ctx, 99, nonce);
            assert!(result.is_hit());
            assert_eq!(rolls.defense, None);
        }
    }

    #[test]
    fn resolution_is_deterministic() {
        let config = CombatConfig::default();
        let rng = PcgRng;
        let resolver = AttackResolver::new(&config, &rng);
        let (attacker, defender) = (knight(), ogre());
        let weights = sword_weights();
        let ctx = AttackContext::new(&attacker, &defender, &weights, sword());

        assert_eq!(resolver.resolve(&ctx, 5, 11), resolver.resolve(&ctx, 5, 11));
    }
}
