//! Canonical skill catalog and per-actor skill levels.

use std::collections::BTreeMap;

/// Every skill the combat rules know about.
///
/// Display and parsing use the human-readable names ("Sword Fighting"), which
/// is also the vocabulary an external classifier is expected to answer in.
/// Names outside this catalog are rejected during classification.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Skill {
    // ========================================================================
    // Weapons
    // ========================================================================
    #[strum(serialize = "Sword Fighting")]
    SwordFighting,
    #[strum(serialize = "Axe Fighting")]
    AxeFighting,
    #[strum(serialize = "Dagger Fighting")]
    DaggerFighting,
    #[strum(serialize = "Blunt Weapons")]
    BluntWeapons,
    #[strum(serialize = "Polearms")]
    Polearms,
    #[strum(serialize = "Archery")]
    Archery,
    #[strum(serialize = "Unarmed Combat")]
    UnarmedCombat,

    // ========================================================================
    // Magic
    // ========================================================================
    #[strum(serialize = "Fire Magic")]
    FireMagic,
    #[strum(serialize = "Ice Magic")]
    IceMagic,
    #[strum(serialize = "Lightning Magic")]
    LightningMagic,
    #[strum(serialize = "Arcane Magic")]
    ArcaneMagic,
    #[strum(serialize = "Alchemy")]
    Alchemy,

    // ========================================================================
    // Attributes
    // ========================================================================
    #[strum(serialize = "Strength")]
    Strength,
    #[strum(serialize = "Agility")]
    Agility,
    #[strum(serialize = "Speed")]
    Speed,

    // ========================================================================
    // Movement
    // ========================================================================
    #[strum(serialize = "Escape")]
    Escape,
    #[strum(serialize = "Pursuit")]
    Pursuit,

    // ========================================================================
    // Defense
    // ========================================================================
    #[strum(serialize = "Accuracy")]
    Accuracy,
    #[strum(serialize = "Evasion")]
    Evasion,
    #[strum(serialize = "Toughness")]
    Toughness,
    #[strum(serialize = "Fire Resistance")]
    FireResistance,
    #[strum(serialize = "Cold Resistance")]
    ColdResistance,
    #[strum(serialize = "Lightning Resistance")]
    LightningResistance,
    #[strum(serialize = "Poison Resistance")]
    PoisonResistance,
    #[strum(serialize = "Magic Resistance")]
    MagicResistance,
}

impl Skill {
    /// Looks up a catalog skill by its display name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        name.trim().parse().ok()
    }
}

/// Skill levels of one combatant. Missing skills are level zero (locked).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSet {
    levels: BTreeMap<Skill, u32>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper for fixtures and content.
    pub fn with(mut self, skill: Skill, level: u32) -> Self {
        self.set(skill, level);
        self
    }

    pub fn level(&self, skill: Skill) -> u32 {
        self.levels.get(&skill).copied().unwrap_or(0)
    }

    pub fn set(&mut self, skill: Skill, level: u32) {
        if level == 0 {
            self.levels.remove(&skill);
        } else {
            self.levels.insert(skill, level);
        }
    }

    pub fn is_locked(&self, skill: Skill) -> bool {
        self.level(skill) == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Skill, u32)> + '_ {
        self.levels.iter().map(|(skill, level)| (*skill, *level))
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl FromIterator<(Skill, u32)> for SkillSet {
    fn from_iter<T: IntoIterator<Item = (Skill, u32)>>(iter: T) -> Self {
        let mut set = SkillSet::new();
        for (skill, level) in iter {
            set.set(skill, level);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_display_names_case_insensitively() {
        assert_eq!(Skill::from_name("Sword Fighting"), Some(Skill::SwordFighting));
        assert_eq!(Skill::from_name("  fire magic "), Some(Skill::FireMagic));
        assert_eq!(Skill::from_name("Basket Weaving"), None);
    }

    #[test]
    fn display_round_trips_through_from_name() {
        use strum::IntoEnumIterator;

        for skill in Skill::iter() {
            assert_eq!(Skill::from_name(&skill.to_string()), Some(skill));
        }
    }

    #[test]
    fn missing_skill_reads_as_locked() {
        let skills = SkillSet::new().with(Skill::Strength, 4);
        assert_eq!(skills.level(Skill::Strength), 4);
        assert!(skills.is_locked(Skill::Archery));
    }
}
