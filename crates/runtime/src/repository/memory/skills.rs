//! In-memory SkillRepository implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use combat_core::{EntityId, PersistenceError, SkillRepository, SkillSet};

use crate::repository::lock_poisoned;

/// Skill sets indexed by actor id.
#[derive(Debug, Default)]
pub struct InMemorySkillRepo {
    skills: RwLock<HashMap<EntityId, SkillSet>>,
}

impl InMemorySkillRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with a stored skill set.
    pub fn with_skills(self, actor: EntityId, skills: SkillSet) -> Self {
        if let Ok(mut stored) = self.skills.write() {
            stored.insert(actor, skills);
        }
        self
    }

    /// Number of stored skill sets.
    pub fn len(&self) -> usize {
        self.skills.read().map(|stored| stored.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SkillRepository for InMemorySkillRepo {
    fn load(&self, actor: EntityId) -> Result<Option<SkillSet>, PersistenceError> {
        let stored = self.skills.read().map_err(|_| lock_poisoned())?;
        Ok(stored.get(&actor).cloned())
    }

    fn save(&self, actor: EntityId, skills: &SkillSet) -> Result<(), PersistenceError> {
        let mut stored = self.skills.write().map_err(|_| lock_poisoned())?;
        stored.insert(actor, skills.clone());
        Ok(())
    }
}
