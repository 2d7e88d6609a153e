//! Damage calculation.

use crate::env::RngOracle;
use crate::skills::Skill;

/// Damage type for resistances and on-hit effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageType {
    /// Physical damage (melee, projectiles).
    Physical,
    Fire,
    Cold,
    Lightning,
    Poison,
    /// Pure magic.
    Arcane,
}

impl DamageType {
    /// The defender skill that reduces this damage type.
    pub const fn resistance_skill(self) -> Skill {
        match self {
            Self::Physical => Skill::Toughness,
            Self::Fire => Skill::FireResistance,
            Self::Cold => Skill::ColdResistance,
            Self::Lightning => Skill::LightningResistance,
            Self::Poison => Skill::PoisonResistance,
            Self::Arcane => Skill::MagicResistance,
        }
    }
}

/// Inputs to a damage calculation, variance excluded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageInputs {
    pub base: u32,
    pub skill_modifier: u32,
    pub item_bonus: i32,
    /// Defender's resistance skill level for `damage_type`.
    pub resistance_level: u32,
    pub damage_type: DamageType,
}

impl DamageInputs {
    /// `base + skill_modifier + item_bonus`, the sum variance is drawn against.
    pub fn raw_sum(&self) -> i64 {
        self.base as i64 + self.skill_modifier as i64 + self.item_bonus as i64
    }

    /// Flat reduction: half the resistance level (integer division).
    pub fn resistance_reduction(&self) -> u32 {
        self.resistance_level / 2
    }
}

/// Immutable breakdown of a damage calculation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageResult {
    pub base: u32,
    pub skill_modifier: u32,
    pub item_bonus: i32,
    pub resistance_reduction: u32,
    pub variance: i32,
    /// Always at least 1.
    pub final_damage: u32,
    pub damage_type: DamageType,
}

impl DamageResult {
    /// Same breakdown with `final_damage` replaced (critical or glancing hits).
    /// The floor of 1 still applies.
    pub fn with_final(self, final_damage: u32) -> Self {
        Self {
            final_damage: final_damage.max(1),
            ..self
        }
    }
}

/// Half-width of the variance window: `percent` of the raw sum, rounded down.
pub fn variance_span(inputs: &DamageInputs, percent: u32) -> u32 {
    let raw = inputs.raw_sum().max(0) as u64;
    (raw * percent as u64 / 100) as u32
}

/// Draws a symmetric variance in `[-span, +span]`.
pub fn roll_variance(inputs: &DamageInputs, percent: u32, rng: &dyn RngOracle, seed: u64) -> i32 {
    rng.signed_range(seed, variance_span(inputs, percent))
}

/// Calculate damage from inputs and an already-drawn variance.
///
/// # Formula
///
/// ```text
/// final = max(1, base + skill_modifier + item_bonus + variance - resistance / 2)
/// ```
///
/// The reduction is flat rather than a percentage of the total, so it never
/// depends on the damage it reduces.
pub fn calculate_damage(inputs: &DamageInputs, variance: i32) -> DamageResult {
    let reduction = inputs.resistance_reduction();
    let total = inputs.raw_sum() + variance as i64 - reduction as i64;

    DamageResult {
        base: inputs.base,
        skill_modifier: inputs.skill_modifier,
        item_bonus: inputs.item_bonus,
        resistance_reduction: reduction,
        variance,
        final_damage: total.clamp(1, u32::MAX as i64) as u32,
        damage_type: inputs.damage_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;

    fn inputs(base: u32, skill: u32, item: i32, resistance: u32) -> DamageInputs {
        DamageInputs {
            base,
            skill_modifier: skill,
            item_bonus: item,
            resistance_level: resistance,
            damage_type: DamageType::Physical,
        }
    }

    #[test]
    fn worked_example_with_negative_variance() {
        // Resistance level 6 → reduction 3.
        let result = calculate_damage(&inputs(10, 8, 0, 6), -2);
        assert_eq!(result.resistance_reduction, 3);
        assert_eq!(result.final_damage, 13);
    }

    #[test]
    fn resistance_uses_integer_division() {
        assert_eq!(inputs(0, 0, 0, 7).resistance_reduction(), 3);
    }

    #[test]
    fn final_damage_floors_at_one() {
        let result = calculate_damage(&inputs(2, 0, -5, 40), -1);
        assert_eq!(result.final_damage, 1);

        let result = calculate_damage(&inputs(0, 0, 0, 0), 0);
        assert_eq!(result.final_damage, 1);
    }

    #[test]
    fn variance_stays_within_twenty_percent() {
        let rng = PcgRng;
        let damage = inputs(10, 8, 2, 0);
        assert_eq!(variance_span(&damage, 20), 4);

        for seed in 0..200u64 {
            let v = roll_variance(&damage, 20, &rng, seed);
            assert!((-4..=4).contains(&v));
        }
    }

    #[test]
    fn with_final_keeps_floor() {
        let result = calculate_damage(&inputs(10, 0, 0, 0), 0).with_final(0);
        assert_eq!(result.final_damage, 1);
    }
}
