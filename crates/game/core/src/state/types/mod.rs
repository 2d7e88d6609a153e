pub mod combatant;
pub mod common;
pub mod location;
pub mod status;

pub use combatant::{CombatStats, Combatant, CombatantKind};
pub use common::{EntityId, HealthMeter, ItemStack, LocationId, Tick};
pub use location::{CorpseData, Location};
pub use status::{PeriodicKind, StatusEffect, StatusEffectKind, StatusEffects};
