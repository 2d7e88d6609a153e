//! Weighted skill lists and effective skill level.

use super::catalog::{Skill, SkillSet};

/// Tolerance used when checking that a weight list is normalized.
pub const WEIGHT_EPSILON: f64 = 1e-9;

/// One skill's share in an action.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillWeight {
    pub skill: Skill,
    /// Share in `[0, 1]`; a normalized list sums to 1.0.
    pub weight: f64,
}

impl SkillWeight {
    pub fn new(skill: Skill, weight: f64) -> Self {
        Self { skill, weight }
    }
}

/// Normalizes weights so they sum to 1.0.
///
/// Duplicate skills are merged, and non-finite or non-positive weights are
/// dropped. First-seen order is preserved. Returns an empty list when nothing
/// usable remains.
pub fn normalize(weights: impl IntoIterator<Item = SkillWeight>) -> Vec<SkillWeight> {
    let mut merged: Vec<SkillWeight> = Vec::new();
    for entry in weights {
        if !entry.weight.is_finite() || entry.weight <= 0.0 {
            continue;
        }
        match merged.iter_mut().find(|w| w.skill == entry.skill) {
            Some(existing) => existing.weight += entry.weight,
            None => merged.push(entry),
        }
    }

    let total: f64 = merged.iter().map(|w| w.weight).sum();
    if total <= 0.0 || !total.is_finite() {
        return Vec::new();
    }

    for entry in &mut merged {
        entry.weight /= total;
    }
    merged
}

/// Sum of weights, for invariant checks.
pub fn total_weight(weights: &[SkillWeight]) -> f64 {
    weights.iter().map(|w| w.weight).sum()
}

/// Effective skill level: `round(Σ weight × level)`.
pub fn effective_level(weights: &[SkillWeight], skills: &SkillSet) -> u32 {
    let raw: f64 = weights
        .iter()
        .map(|w| w.weight * skills.level(w.skill) as f64)
        .sum();
    raw.round().max(0.0) as u32
}

/// The skill carrying the largest weight (first wins on ties).
pub fn dominant_skill(weights: &[SkillWeight]) -> Option<Skill> {
    weights
        .iter()
        .fold(None::<&SkillWeight>, |best, w| match best {
            Some(b) if b.weight >= w.weight => Some(b),
            _ => Some(w),
        })
        .map(|w| w.skill)
}
