//! In-memory DispositionRepository implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use combat_core::{DispositionRepository, EntityId, PersistenceError};

use crate::repository::lock_poisoned;

/// NPC dispositions indexed by actor id.
#[derive(Debug, Default)]
pub struct InMemoryDispositionRepo {
    dispositions: RwLock<HashMap<EntityId, i32>>,
}

impl InMemoryDispositionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_disposition(self, actor: EntityId, disposition: i32) -> Self {
        if let Ok(mut stored) = self.dispositions.write() {
            stored.insert(actor, disposition);
        }
        self
    }

    /// Last saved value, if any.
    pub fn get(&self, actor: EntityId) -> Option<i32> {
        self.dispositions
            .read()
            .ok()
            .and_then(|stored| stored.get(&actor).copied())
    }
}

impl DispositionRepository for InMemoryDispositionRepo {
    fn load(&self, actor: EntityId) -> Result<Option<i32>, PersistenceError> {
        let stored = self.dispositions.read().map_err(|_| lock_poisoned())?;
        Ok(stored.get(&actor).copied())
    }

    fn save(&self, actor: EntityId, disposition: i32) -> Result<(), PersistenceError> {
        let mut stored = self.dispositions.write().map_err(|_| lock_poisoned())?;
        stored.insert(actor, disposition);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrites_previous_value() {
        let repo = InMemoryDispositionRepo::new().with_disposition(EntityId(9), 20);
        repo.save(EntityId(9), -100).unwrap();

        assert_eq!(repo.load(EntityId(9)).unwrap(), Some(-100));
        assert_eq!(repo.get(EntityId(10)), None);
    }
}
