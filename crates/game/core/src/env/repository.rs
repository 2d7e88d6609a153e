//! Persistence ports for mutable per-actor data.
//!
//! The core calls these synchronously. A failed save never rolls back an
//! in-memory resolution; the engine reports it as a
//! [`CombatEvent::PersistenceFailed`](crate::events::CombatEvent) and moves on.

use crate::error::{CombatError, ErrorSeverity};
use crate::skills::SkillSet;
use crate::state::EntityId;

/// Skill levels by actor id.
pub trait SkillRepository: Send + Sync {
    fn load(&self, actor: EntityId) -> Result<Option<SkillSet>, PersistenceError>;

    fn save(&self, actor: EntityId, skills: &SkillSet) -> Result<(), PersistenceError>;
}

/// NPC disposition by actor id.
pub trait DispositionRepository: Send + Sync {
    fn load(&self, actor: EntityId) -> Result<Option<i32>, PersistenceError>;

    fn save(&self, actor: EntityId, disposition: i32) -> Result<(), PersistenceError>;
}

/// Failures reported by repository adapters.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PersistenceError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),

    #[error("repository backend error: {0}")]
    Backend(String),
}

impl CombatError for PersistenceError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Unavailable(_) => ErrorSeverity::Recoverable,
            Self::Backend(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "PERSISTENCE_UNAVAILABLE",
            Self::Backend(_) => "PERSISTENCE_BACKEND",
        }
    }
}
