//! Repository layer for per-actor data that changes during play.
//!
//! Repositories handle data that outlives a combat:
//! - Skill levels (raised through practice)
//! - NPC dispositions (changed by hostility and de-escalation)
//!
//! Static content (loot tables, tuning) is served by `combat-content`, not
//! repositories. The ports themselves live in `combat_core::env`.

mod memory;

pub use memory::{InMemoryDispositionRepo, InMemorySkillRepo};

use combat_core::PersistenceError;

pub(crate) fn lock_poisoned() -> PersistenceError {
    PersistenceError::Unavailable("repository lock was poisoned".into())
}
