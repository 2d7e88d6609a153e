use std::fmt;

/// Unique identifier for any combatant tracked in the world snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for the controllable player character.
    pub const PLAYER: Self = Self(0);
}

impl Default for EntityId {
    fn default() -> Self {
        Self::PLAYER
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a location (room) in the world graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationId(pub u32);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Discrete world-time unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns true when this tick marks an actor as unscheduled.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0.saturating_add(rhs))
    }
}

impl std::ops::Sub<u64> for Tick {
    type Output = Tick;
    fn sub(self, rhs: u64) -> Tick {
        Tick(self.0.saturating_sub(rhs))
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Health pair tracked per combatant.
///
/// `current` never exceeds `maximum`; every mutator clamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthMeter {
    pub current: u32,
    pub maximum: u32,
}

impl HealthMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    /// Full health at the given maximum.
    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    /// Subtracts damage, clamped at zero. Returns the amount actually removed.
    pub fn damage(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_sub(amount);
        before - self.current
    }

    /// Adds healing, clamped at maximum. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_add(amount).min(self.maximum);
        self.current - before
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }
}

/// A stack of identical items held by a combatant, corpse or location floor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStack {
    pub item_id: String,
    pub quantity: u32,
    /// Quality grade rolled with the drop (higher is better).
    pub quality: u8,
}

impl ItemStack {
    pub fn new(item_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
            quality: 0,
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_damage_clamps_at_zero() {
        let mut hp = HealthMeter::full(10);
        assert_eq!(hp.damage(25), 10);
        assert_eq!(hp.current, 0);
        assert!(hp.is_depleted());
    }

    #[test]
    fn health_heal_clamps_at_maximum() {
        let mut hp = HealthMeter::new(8, 10);
        assert_eq!(hp.heal(5), 2);
        assert_eq!(hp.current, 10);
    }

    #[test]
    fn new_meter_clamps_current() {
        let hp = HealthMeter::new(50, 20);
        assert_eq!(hp.current, 20);
    }
}
