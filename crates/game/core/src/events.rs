//! Structured combat events.
//!
//! The core never logs. Every notable step (rolls, damage, deaths, persistence
//! hiccups) is handed to an [`EventSink`]; the runtime decides what to print.

use std::sync::Mutex;

use crate::combat::{AttackResult, DamageType};
use crate::skills::{ClassificationSource, Skill};
use crate::state::{EntityId, LocationId, StatusEffectKind, Tick};

/// Everything the core reports while resolving commands and world time.
#[derive(Clone, Debug, PartialEq)]
pub enum CombatEvent {
    SkillsClassified {
        actor: EntityId,
        source: ClassificationSource,
        dominant: Option<Skill>,
        effective_level: u32,
        discarded: Vec<String>,
    },
    AttackResolved {
        attacker: EntityId,
        defender: EntityId,
        attack_roll: u32,
        defense_roll: Option<u32>,
        result: AttackResult,
    },
    DamageDealt {
        target: EntityId,
        amount: u32,
        damage_type: Option<DamageType>,
        remaining_health: u32,
    },
    StatusApplied {
        target: EntityId,
        kind: StatusEffectKind,
        was_stacked: bool,
        was_replaced: bool,
    },
    StatusTicked {
        target: EntityId,
        kind: StatusEffectKind,
        damage: u32,
        healing: u32,
    },
    StatusExpired {
        target: EntityId,
        kind: StatusEffectKind,
    },
    TurnScheduled {
        actor: EntityId,
        ready_at: Tick,
    },
    TurnTaken {
        actor: EntityId,
        at: Tick,
    },
    /// Actor left the schedule (no target, de-escalated, dead).
    Unscheduled {
        actor: EntityId,
    },
    FleeResolved {
        actor: EntityId,
        flee_roll: Option<u32>,
        max_pursuit_roll: Option<u32>,
        escaped: bool,
    },
    Death {
        actor: EntityId,
        location: LocationId,
        was_player: bool,
    },
    CorpseDecayed {
        owner: EntityId,
        location: LocationId,
        scattered: usize,
        destroyed: usize,
    },
    HostilityTriggered {
        actor: EntityId,
        scheduled: bool,
    },
    DeEscalated {
        actor: EntityId,
        disposition: i32,
        unscheduled: bool,
    },
    /// An attacked NPC could not be made hostile.
    HostilityRejected {
        actor: EntityId,
        code: &'static str,
        reason: String,
    },
    SkillImproved {
        actor: EntityId,
        skill: Skill,
        level: u32,
    },
    PersistenceFailed {
        actor: EntityId,
        operation: &'static str,
        reason: String,
    },
    LootUnavailable {
        actor: EntityId,
        table: Option<String>,
    },
}

impl CombatEvent {
    /// Short, stable name for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SkillsClassified { .. } => "skills_classified",
            Self::AttackResolved { .. } => "attack_resolved",
            Self::DamageDealt { .. } => "damage_dealt",
            Self::StatusApplied { .. } => "status_applied",
            Self::StatusTicked { .. } => "status_ticked",
            Self::StatusExpired { .. } => "status_expired",
            Self::TurnScheduled { .. } => "turn_scheduled",
            Self::TurnTaken { .. } => "turn_taken",
            Self::Unscheduled { .. } => "unscheduled",
            Self::FleeResolved { .. } => "flee_resolved",
            Self::Death { .. } => "death",
            Self::CorpseDecayed { .. } => "corpse_decayed",
            Self::HostilityTriggered { .. } => "hostility_triggered",
            Self::DeEscalated { .. } => "de_escalated",
            Self::HostilityRejected { .. } => "hostility_rejected",
            Self::SkillImproved { .. } => "skill_improved",
            Self::PersistenceFailed { .. } => "persistence_failed",
            Self::LootUnavailable { .. } => "loot_unavailable",
        }
    }

    /// Whether the event signals a degraded outcome worth a warning.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::PersistenceFailed { .. } | Self::LootUnavailable { .. }
        )
    }
}

/// Receives combat events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: CombatEvent);
}

/// Drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: CombatEvent) {}
}

/// Keeps events in memory, mostly for tests and replays.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<CombatEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<CombatEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&self) -> Vec<CombatEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: CombatEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
