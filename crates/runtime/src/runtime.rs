//! High-level runtime orchestrator.
//!
//! The runtime owns the world snapshot behind one async mutex, the injected
//! collaborators, and the optional external classifier. Every command locks
//! the snapshot, resolves to completion, and releases it; the classifier call
//! is the only await while the lock is held.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};

use combat_core::{
    AttackReport, CombatBehaviorTrigger, CombatConfig, CombatEngine, CombatEnv, CombatError,
    CombatEvent, DeEscalation, DeathError, DispositionRepository, EntityId, EventSink, FleeReport,
    HostilityOutcome, ItemStack, LocationId, LootOracle, PcgRng, RngOracle, SkillRepository,
    TriggerError, WorldSnapshot, WorldTickReport, loot_corpse,
};

use crate::api::{Result, SkillClassifierProvider, TimedClassifier};
use crate::config::RuntimeConfig;
use crate::events::{EventBus, SinkSet, TracingEventSink};

/// Collaborators handed to the core on every command.
struct Services {
    config: CombatConfig,
    rng: Arc<dyn RngOracle>,
    events: SinkSet,
    loot: Option<Arc<dyn LootOracle>>,
    skills: Option<Arc<dyn SkillRepository>>,
    dispositions: Option<Arc<dyn DispositionRepository>>,
}

impl Services {
    fn env(&self) -> CombatEnv<'_> {
        let mut env = CombatEnv::new(&self.config, self.rng.as_ref(), &self.events);
        if let Some(loot) = &self.loot {
            env = env.with_loot(loot.as_ref());
        }
        if let Some(skills) = &self.skills {
            env = env.with_skill_repository(skills.as_ref());
        }
        if let Some(dispositions) = &self.dispositions {
            env = env.with_disposition_repository(dispositions.as_ref());
        }
        env
    }
}

/// Outcome of a player command plus the world time it let pass.
#[derive(Clone, Debug, PartialEq)]
pub struct CommandOutcome<R> {
    pub report: R,
    /// NPC turns, status ticks and decay during the command's cost.
    pub world: WorldTickReport,
}

/// Main runtime that serializes combat commands over one world snapshot.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct CombatRuntime {
    world: Mutex<WorldSnapshot>,
    services: Services,
    classifier: Option<TimedClassifier>,
    bus: EventBus,
}

impl CombatRuntime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn combat_config(&self) -> &CombatConfig {
        &self.services.config
    }

    /// Subscribe to combat events
    pub fn subscribe_events(&self) -> broadcast::Receiver<CombatEvent> {
        self.bus.subscribe()
    }

    /// A copy of the current world.
    pub async fn snapshot(&self) -> WorldSnapshot {
        self.world.lock().await.clone()
    }

    /// Runs `f` against the world without copying it.
    pub async fn inspect<R>(&self, f: impl FnOnce(&WorldSnapshot) -> R) -> R {
        f(&*self.world.lock().await)
    }

    /// Resolves one attack. The external classifier, when configured, gets
    /// its bounded chance to weigh the action text first.
    pub async fn process_attack(
        &self,
        attacker: EntityId,
        defender: EntityId,
        action_text: &str,
    ) -> AttackReport {
        let mut world = self.world.lock().await;
        self.attack_locked(&mut world, attacker, defender, action_text).await
    }

    pub async fn process_flee(
        &self,
        fleeing: EntityId,
        pursuers: &[EntityId],
        direction: &str,
    ) -> FleeReport {
        let mut world = self.world.lock().await;
        self.flee_locked(&mut world, fleeing, pursuers, direction)
    }

    pub async fn advance_world_time(&self, elapsed: u64) -> WorldTickReport {
        let mut world = self.world.lock().await;
        CombatEngine::new(&mut world).advance_world_time(self.services.env(), elapsed)
    }

    /// Player attack followed by the world time it costs.
    ///
    /// Players are never scheduled; their action cost is spent here. The
    /// attack and the NPC turns it lets through run under one lock.
    pub async fn player_attack(
        &self,
        player: EntityId,
        target: EntityId,
        action_text: &str,
    ) -> CommandOutcome<AttackReport> {
        let mut world = self.world.lock().await;
        let report = self.attack_locked(&mut world, player, target, action_text).await;
        let ticked =
            CombatEngine::new(&mut world).advance_world_time(self.services.env(), report.cost);
        CommandOutcome { report, world: ticked }
    }

    /// Player flee attempt followed by the world time it costs, under one lock.
    pub async fn player_flee(
        &self,
        player: EntityId,
        pursuers: &[EntityId],
        direction: &str,
    ) -> CommandOutcome<FleeReport> {
        let mut world = self.world.lock().await;
        let report = self.flee_locked(&mut world, player, pursuers, direction);
        let ticked =
            CombatEngine::new(&mut world).advance_world_time(self.services.env(), report.cost);
        CommandOutcome { report, world: ticked }
    }

    async fn attack_locked(
        &self,
        world: &mut WorldSnapshot,
        attacker: EntityId,
        defender: EntityId,
        action_text: &str,
    ) -> AttackReport {
        let skills = world.actor(attacker).map(|actor| actor.skills.clone());
        let proposal = match (&self.classifier, skills) {
            (Some(classifier), Some(skills)) => classifier.propose(action_text, &skills).await,
            _ => None,
        };

        let report = CombatEngine::new(world).process_attack(
            self.services.env(),
            attacker,
            defender,
            action_text,
            proposal.as_deref(),
        );
        tracing::debug!(
            %attacker,
            %defender,
            cost = report.cost,
            result = ?report.result,
            "attack processed"
        );
        report
    }

    fn flee_locked(
        &self,
        world: &mut WorldSnapshot,
        fleeing: EntityId,
        pursuers: &[EntityId],
        direction: &str,
    ) -> FleeReport {
        let report = CombatEngine::new(world).process_flee(
            self.services.env(),
            fleeing,
            pursuers,
            direction,
        );
        tracing::debug!(
            %fleeing,
            escaped = report.result.escaped(),
            cost = report.cost,
            "flee processed"
        );
        report
    }

    pub async fn trigger_hostility(
        &self,
        actor: EntityId,
    ) -> std::result::Result<HostilityOutcome, TriggerError> {
        let mut world = self.world.lock().await;
        CombatEngine::new(&mut world)
            .trigger_hostility(self.services.env(), actor)
            .inspect_err(|err| log_rejection("trigger_hostility", err))
    }

    pub async fn trigger_group_hostility(
        &self,
        actors: &[EntityId],
    ) -> Vec<(EntityId, std::result::Result<HostilityOutcome, TriggerError>)> {
        let mut world = self.world.lock().await;
        CombatEngine::new(&mut world).trigger_group_hostility(self.services.env(), actors)
    }

    pub async fn de_escalate(
        &self,
        actor: EntityId,
        new_disposition: i32,
    ) -> std::result::Result<DeEscalation, TriggerError> {
        let mut world = self.world.lock().await;
        CombatEngine::new(&mut world)
            .de_escalate(self.services.env(), actor, new_disposition)
            .inspect_err(|err| log_rejection("de_escalate", err))
    }

    /// Empties a corpse and marks it looted.
    pub async fn loot_corpse(
        &self,
        location: LocationId,
        owner: EntityId,
    ) -> std::result::Result<(Vec<ItemStack>, u32), DeathError> {
        let mut world = self.world.lock().await;
        loot_corpse(&mut world, location, owner)
    }
}

fn log_rejection(command: &'static str, err: &impl CombatError) {
    let severity = err.severity();
    if severity.is_internal() {
        tracing::error!(command, code = err.error_code(), severity = severity.as_str(), "{err}");
    } else {
        tracing::debug!(command, code = err.error_code(), severity = severity.as_str(), "{err}");
    }
}

/// Builder for [`CombatRuntime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    combat: Option<CombatConfig>,
    world: Option<WorldSnapshot>,
    rng: Option<Arc<dyn RngOracle>>,
    sinks: Vec<Arc<dyn EventSink>>,
    tracing: bool,
    loot: Option<Arc<dyn LootOracle>>,
    skills: Option<Arc<dyn SkillRepository>>,
    dispositions: Option<Arc<dyn DispositionRepository>>,
    classifier: Option<Arc<dyn SkillClassifierProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            combat: None,
            world: None,
            rng: None,
            sinks: Vec::new(),
            tracing: true,
            loot: None,
            skills: None,
            dispositions: None,
            classifier: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Combat tuning; otherwise loaded from `RuntimeConfig::config_path`.
    pub fn combat_config(mut self, combat: CombatConfig) -> Self {
        self.combat = Some(combat);
        self
    }

    /// Provide the initial world; otherwise an empty one seeded from the config.
    pub fn world(mut self, world: WorldSnapshot) -> Self {
        self.world = Some(world);
        self
    }

    pub fn rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Adds a sink next to the tracing sink and the broadcast bus.
    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Disable the tracing sink (events still reach subscribers).
    pub fn without_tracing(mut self) -> Self {
        self.tracing = false;
        self
    }

    /// Loot tables; otherwise loaded from `RuntimeConfig::loot_path`.
    pub fn loot(mut self, loot: Arc<dyn LootOracle>) -> Self {
        self.loot = Some(loot);
        self
    }

    pub fn skill_repository(mut self, repository: Arc<dyn SkillRepository>) -> Self {
        self.skills = Some(repository);
        self
    }

    pub fn disposition_repository(mut self, repository: Arc<dyn DispositionRepository>) -> Self {
        self.dispositions = Some(repository);
        self
    }

    /// External classifier, bounded by `RuntimeConfig::classifier_timeout`.
    pub fn classifier(mut self, provider: Arc<dyn SkillClassifierProvider>) -> Self {
        self.classifier = Some(provider);
        self
    }

    /// Build the runtime
    ///
    /// Rebuilds the snapshot's derived data and pulls stored dispositions for
    /// every NPC when a disposition repository is present.
    pub fn build(self) -> Result<CombatRuntime> {
        let combat = match self.combat {
            Some(combat) => combat,
            None => self.config.load_combat_config()?,
        };
        let loot = match self.loot {
            Some(loot) => Some(loot),
            None if self.config.loot_path.is_some() => {
                Some(Arc::new(self.config.load_loot()?) as Arc<dyn LootOracle>)
            }
            None => None,
        };

        let bus = EventBus::new(self.config.event_buffer_size);
        let mut events = SinkSet::new().with(Arc::new(bus.clone()));
        if self.tracing {
            events = events.with(Arc::new(TracingEventSink));
        }
        for sink in self.sinks {
            events = events.with(sink);
        }

        let services = Services {
            config: combat,
            rng: self.rng.unwrap_or_else(|| Arc::new(PcgRng)),
            events,
            loot,
            skills: self.skills,
            dispositions: self.dispositions,
        };

        let mut world = self
            .world
            .unwrap_or_else(|| WorldSnapshot::new(self.config.game_seed));
        world.restore();
        if services.dispositions.is_some() {
            let trigger = CombatBehaviorTrigger::new(services.env());
            let npcs: Vec<_> = world.actors().filter(|a| !a.is_player()).map(|a| a.id).collect();
            for npc in npcs {
                trigger.restore_disposition(&mut world, npc);
            }
        }

        tracing::info!(
            seed = world.game_seed,
            actors = world.actors().count(),
            classifier = self.classifier.is_some(),
            "combat runtime ready"
        );

        Ok(CombatRuntime {
            world: Mutex::new(world),
            services,
            classifier: self
                .classifier
                .map(|provider| TimedClassifier::new(provider, self.config.classifier_timeout)),
            bus,
        })
    }
}
