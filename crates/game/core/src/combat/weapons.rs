//! Weapon and element keyword table.

use super::damage::DamageType;
use crate::skills::tokenize;
use crate::state::StatusEffectKind;

/// On-hit status effect carried by a weapon or element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OnHitEffect {
    pub kind: StatusEffectKind,
    pub magnitude: u32,
    pub duration: u64,
}

/// Base damage, damage type and optional rider for an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponProfile {
    pub name: &'static str,
    pub base_damage: u32,
    pub damage_type: DamageType,
    pub on_hit: Option<OnHitEffect>,
}

struct WeaponRule {
    keywords: &'static [&'static str],
    profile: WeaponProfile,
}

const fn rider(kind: StatusEffectKind, magnitude: u32, duration: u64) -> Option<OnHitEffect> {
    Some(OnHitEffect {
        kind,
        magnitude,
        duration,
    })
}

const WEAPON_TABLE: &[WeaponRule] = &[
    WeaponRule {
        keywords: &["fire", "fireball", "firebolt", "flame", "flames", "burn", "inferno"],
        profile: WeaponProfile {
            name: "fire",
            base_damage: 10,
            damage_type: DamageType::Fire,
            on_hit: rider(StatusEffectKind::Burning, 2, 3),
        },
    },
    WeaponRule {
        keywords: &["ice", "frost", "freeze", "blizzard", "icicle"],
        profile: WeaponProfile {
            name: "ice",
            base_damage: 9,
            damage_type: DamageType::Cold,
            on_hit: rider(StatusEffectKind::Slowed, 1, 4),
        },
    },
    WeaponRule {
        keywords: &["lightning", "shock", "thunder", "spark", "bolt"],
        profile: WeaponProfile {
            name: "lightning",
            base_damage: 10,
            damage_type: DamageType::Lightning,
            on_hit: None,
        },
    },
    WeaponRule {
        keywords: &["poison", "venom", "toxin", "acid"],
        profile: WeaponProfile {
            name: "poison",
            base_damage: 6,
            damage_type: DamageType::Poison,
            on_hit: rider(StatusEffectKind::Poisoned, 2, 5),
        },
    },
    WeaponRule {
        keywords: &["arcane", "magic", "missile", "spell"],
        profile: WeaponProfile {
            name: "arcane",
            base_damage: 8,
            damage_type: DamageType::Arcane,
            on_hit: None,
        },
    },
    WeaponRule {
        keywords: &["axe", "hatchet", "battleaxe"],
        profile: WeaponProfile {
            name: "axe",
            base_damage: 9,
            damage_type: DamageType::Physical,
            on_hit: rider(StatusEffectKind::Bleeding, 1, 3),
        },
    },
    WeaponRule {
        keywords: &["sword", "longsword", "shortsword", "blade", "sabre", "saber", "rapier"],
        profile: WeaponProfile {
            name: "sword",
            base_damage: 8,
            damage_type: DamageType::Physical,
            on_hit: None,
        },
    },
    WeaponRule {
        keywords: &["mace", "club", "hammer", "warhammer", "cudgel", "staff"],
        profile: WeaponProfile {
            name: "blunt",
            base_damage: 7,
            damage_type: DamageType::Physical,
            on_hit: None,
        },
    },
    WeaponRule {
        keywords: &["spear", "halberd", "pike", "lance", "trident"],
        profile: WeaponProfile {
            name: "polearm",
            base_damage: 7,
            damage_type: DamageType::Physical,
            on_hit: None,
        },
    },
    WeaponRule {
        keywords: &["bow", "arrow", "crossbow", "shoot", "sling"],
        profile: WeaponProfile {
            name: "bow",
            base_damage: 6,
            damage_type: DamageType::Physical,
            on_hit: None,
        },
    },
    WeaponRule {
        keywords: &["dagger", "knife", "stab", "shiv"],
        profile: WeaponProfile {
            name: "dagger",
            base_damage: 5,
            damage_type: DamageType::Physical,
            on_hit: rider(StatusEffectKind::Bleeding, 1, 2),
        },
    },
];

/// Bare-handed strike.
pub const UNARMED: WeaponProfile = WeaponProfile {
    name: "unarmed",
    base_damage: 3,
    damage_type: DamageType::Physical,
    on_hit: None,
};

impl WeaponProfile {
    /// First table entry whose keyword appears in the text, or [`UNARMED`].
    pub fn from_text(text: &str) -> Self {
        let tokens = tokenize(text);
        WEAPON_TABLE
            .iter()
            .find(|rule| rule.keywords.iter().any(|kw| tokens.iter().any(|t| t == kw)))
            .map_or(UNARMED, |rule| rule.profile)
    }

    pub fn is_unarmed(&self) -> bool {
        self.name == UNARMED.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_text_is_unarmed() {
        let profile = WeaponProfile::from_text("kick the door");
        assert!(profile.is_unarmed());
        assert_eq!(profile.base_damage, 3);
        assert_eq!(profile.damage_type, DamageType::Physical);
    }

    #[test]
    fn elements_carry_riders() {
        let fire = WeaponProfile::from_text("hurl a fireball");
        assert_eq!(fire.damage_type, DamageType::Fire);
        assert_eq!(fire.on_hit.map(|e| e.kind), Some(StatusEffectKind::Burning));

        let venom = WeaponProfile::from_text("coat the blade in venom");
        // Elements are listed before weapons.
        assert_eq!(venom.damage_type, DamageType::Poison);
    }

    #[test]
    fn sword_is_physical() {
        let sword = WeaponProfile::from_text("slash with my sword");
        assert_eq!(sword.base_damage, 8);
        assert_eq!(sword.on_hit, None);
    }
}
