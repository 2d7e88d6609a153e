//! Locations and the corpses lying in them.

use std::collections::BTreeMap;

use super::common::{EntityId, ItemStack, LocationId};

/// Remains of a defeated combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorpseData {
    pub owner: EntityId,
    pub owner_name: String,
    pub location: LocationId,
    pub items: Vec<ItemStack>,
    pub gold: u32,
    /// World-time units left before the corpse is removed.
    pub decay_remaining: u64,
    /// Set once anything has been taken; never cleared.
    looted: bool,
    pub from_player: bool,
}

impl CorpseData {
    pub fn new(
        owner: EntityId,
        owner_name: impl Into<String>,
        location: LocationId,
        decay_remaining: u64,
    ) -> Self {
        Self {
            owner,
            owner_name: owner_name.into(),
            location,
            items: Vec::new(),
            gold: 0,
            decay_remaining,
            looted: false,
            from_player: false,
        }
    }

    pub fn with_contents(mut self, items: Vec<ItemStack>, gold: u32) -> Self {
        self.items = items;
        self.gold = gold;
        self
    }

    pub fn is_looted(&self) -> bool {
        self.looted
    }

    pub fn mark_looted(&mut self) {
        self.looted = true;
    }

    /// Empties the corpse and marks it looted.
    pub fn take_contents(&mut self) -> (Vec<ItemStack>, u32) {
        self.looted = true;
        (std::mem::take(&mut self.items), std::mem::take(&mut self.gold))
    }

    pub fn is_expired(&self) -> bool {
        self.decay_remaining == 0
    }
}

/// A room in the world graph, as far as combat cares about it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    /// Living combatants present, in arrival order.
    pub occupants: Vec<EntityId>,
    pub corpses: Vec<CorpseData>,
    /// Items lying loose on the floor.
    pub floor: Vec<ItemStack>,
    pub floor_gold: u32,
    /// Exit name (direction) to destination.
    pub exits: BTreeMap<String, LocationId>,
}

impl Location {
    pub fn new(id: LocationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_exit(mut self, direction: impl Into<String>, destination: LocationId) -> Self {
        self.exits.insert(direction.into().to_lowercase(), destination);
        self
    }

    pub fn exit(&self, direction: &str) -> Option<LocationId> {
        self.exits.get(&direction.trim().to_lowercase()).copied()
    }

    pub fn contains(&self, actor: EntityId) -> bool {
        self.occupants.contains(&actor)
    }

    pub(crate) fn add_occupant(&mut self, actor: EntityId) {
        if !self.occupants.contains(&actor) {
            self.occupants.push(actor);
        }
    }

    pub(crate) fn remove_occupant(&mut self, actor: EntityId) -> bool {
        let before = self.occupants.len();
        self.occupants.retain(|id| *id != actor);
        before != self.occupants.len()
    }

    pub fn corpse(&self, owner: EntityId) -> Option<&CorpseData> {
        self.corpses.iter().find(|c| c.owner == owner)
    }

    pub fn corpse_mut(&mut self, owner: EntityId) -> Option<&mut CorpseData> {
        self.corpses.iter_mut().find(|c| c.owner == owner)
    }
}
