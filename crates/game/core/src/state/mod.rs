//! Authoritative combat state representation.
//!
//! This module owns the data structures that describe combatants, locations,
//! corpses and turn bookkeeping. Callers read the snapshot freely but mutate it
//! exclusively through the engine and its components.
pub mod turn;
pub mod types;
pub mod world;

pub use turn::{ScheduledTurn, TurnScheduler};
pub use types::{
    CombatStats, Combatant, CombatantKind, CorpseData, EntityId, HealthMeter, ItemStack, Location,
    LocationId, PeriodicKind, StatusEffect, StatusEffectKind, StatusEffects, Tick,
};
pub use world::{SnapshotError, WorldSnapshot};
