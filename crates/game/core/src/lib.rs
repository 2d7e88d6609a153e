//! Deterministic combat rules for a turn-based text adventure.
//!
//! `combat-core` decides when each combatant acts next, how an attack or an
//! escape resolves, and what remains when a combatant dies. It performs no
//! I/O and holds no global state: randomness, persistence, loot tables and
//! event output are injected through [`env::CombatEnv`]. All mutation of a
//! [`WorldSnapshot`] flows through [`engine::CombatEngine`].
pub mod behavior;
pub mod combat;
pub mod config;
pub mod death;
pub mod effects;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod skills;
pub mod state;

pub use behavior::{CombatBehaviorTrigger, DeEscalation, HostilityOutcome, TriggerError};
pub use combat::{
    ActionKind, AttackFailure, AttackResolver, AttackResult, DamageResult, DamageType, FleeError,
    FleeResolver, FleeResult, WeaponProfile, action_cost, calculate_damage,
};
pub use config::{ActionCostTable, CombatConfig, CorpseDecayTable};
pub use death::{CorpseDecayManager, DeathError, DeathHandler, DeathOutcome, loot_corpse, roll_loot};
pub use effects::{
    ApplyOutcome, EffectApplication, RemovalOutcome, RemovalReason, StatusEffectEngine, StatusError,
};
pub use engine::{AttackReport, CombatEngine, FleeReport, WorldTickReport};
pub use env::{
    CombatEnv, DispositionRepository, LootEntry, LootOracle, LootTable, LootTier, PcgRng,
    PersistenceError, RngOracle, SkillRepository,
};
pub use error::{CombatError, ErrorSeverity};
pub use events::{CombatEvent, EventSink, NullSink, RecordingSink};
pub use skills::{
    Classification, ClassificationSource, ProposedWeight, Skill, SkillSet, SkillWeight, classify,
    effective_level,
};
pub use state::{
    Combatant, CombatantKind, CorpseData, EntityId, HealthMeter, ItemStack, Location, LocationId,
    StatusEffect, StatusEffectKind, Tick, TurnScheduler, WorldSnapshot,
};
