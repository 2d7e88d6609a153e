//! Injected collaborators.
//!
//! Oracles expose read-only data (loot tables, randomness); repositories
//! persist mutable per-actor data; the event sink receives structured combat
//! events. [`CombatEnv`] bundles them so the engine never reaches for global
//! state.
mod loot;
mod repository;
mod rng;

pub use loot::{LootEntry, LootOracle, LootTable, LootTier};
pub use repository::{DispositionRepository, PersistenceError, SkillRepository};
pub use rng::{PcgRng, RngOracle, RollContext, compute_seed};

use crate::config::CombatConfig;
use crate::events::{EventSink, NullSink};

static DEFAULT_RNG: PcgRng = PcgRng;
static NULL_SINK: NullSink = NullSink;

/// Aggregates the collaborators the engine needs.
///
/// Only the configuration, the RNG and the event sink are mandatory. Missing
/// repositories turn persistence into a no-op; a missing loot oracle yields
/// empty NPC corpses.
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    config: &'a CombatConfig,
    rng: &'a dyn RngOracle,
    events: &'a dyn EventSink,
    loot: Option<&'a dyn LootOracle>,
    skills: Option<&'a dyn SkillRepository>,
    dispositions: Option<&'a dyn DispositionRepository>,
}

impl<'a> CombatEnv<'a> {
    pub fn new(
        config: &'a CombatConfig,
        rng: &'a dyn RngOracle,
        events: &'a dyn EventSink,
    ) -> Self {
        Self {
            config,
            rng,
            events,
            loot: None,
            skills: None,
            dispositions: None,
        }
    }

    /// PCG rng and a sink that drops every event.
    pub fn with_defaults(config: &'a CombatConfig) -> Self {
        Self::new(config, &DEFAULT_RNG, &NULL_SINK)
    }

    pub fn with_loot(mut self, loot: &'a dyn LootOracle) -> Self {
        self.loot = Some(loot);
        self
    }

    pub fn with_skill_repository(mut self, repository: &'a dyn SkillRepository) -> Self {
        self.skills = Some(repository);
        self
    }

    pub fn with_disposition_repository(
        mut self,
        repository: &'a dyn DispositionRepository,
    ) -> Self {
        self.dispositions = Some(repository);
        self
    }

    pub fn config(&self) -> &'a CombatConfig {
        self.config
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    pub fn events(&self) -> &'a dyn EventSink {
        self.events
    }

    pub fn loot(&self) -> Option<&'a dyn LootOracle> {
        self.loot
    }

    pub fn skill_repository(&self) -> Option<&'a dyn SkillRepository> {
        self.skills
    }

    pub fn disposition_repository(&self) -> Option<&'a dyn DispositionRepository> {
        self.dispositions
    }
}

impl std::fmt::Debug for CombatEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatEnv")
            .field("config", self.config)
            .field("loot", &self.loot.is_some())
            .field("skills", &self.skills.is_some())
            .field("dispositions", &self.dispositions.is_some())
            .finish_non_exhaustive()
    }
}
