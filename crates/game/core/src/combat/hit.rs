//! Opposed accuracy/evasion check.

/// Raw d20 faces that always miss or always crit.
pub const NATURAL_MISS: u32 = 1;
pub const NATURAL_CRITICAL: u32 = 20;

/// Outcome of the opposed check, before damage is computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitOutcome {
    /// Clean hit; `critical` on a natural 20.
    Hit { critical: bool },
    /// Totals tied: the defender partly dodged.
    Glancing,
    /// Natural 1: the attacker fumbled, nothing was dodged.
    Fumble,
    /// Defender's total beat the attacker's.
    Evaded,
}

impl HitOutcome {
    pub fn lands(self) -> bool {
        matches!(self, Self::Hit { .. } | Self::Glancing)
    }
}

/// `d20 + accuracy` against `d20 + evasion`.
///
/// # Rules
///
/// - natural 1 on the attack roll misses regardless of totals
/// - attacker total below defender total is evaded
/// - equal totals is a glancing hit
/// - otherwise a hit, critical when the attack roll is a natural 20
pub fn opposed_check(
    attack_roll: u32,
    accuracy: i32,
    defense_roll: u32,
    evasion: i32,
) -> HitOutcome {
    if attack_roll == NATURAL_MISS {
        return HitOutcome::Fumble;
    }

    let attack_total = attack_roll as i64 + accuracy as i64;
    let defense_total = defense_roll as i64 + evasion as i64;

    match attack_total.cmp(&defense_total) {
        std::cmp::Ordering::Less => HitOutcome::Evaded,
        std::cmp::Ordering::Equal => HitOutcome::Glancing,
        std::cmp::Ordering::Greater => HitOutcome::Hit {
            critical: attack_roll == NATURAL_CRITICAL,
        },
    }
}

/// Check with no evasion roll: only a natural 20 matters.
pub fn guaranteed_check(attack_roll: u32) -> HitOutcome {
    HitOutcome::Hit {
        critical: attack_roll == NATURAL_CRITICAL,
    }
}
