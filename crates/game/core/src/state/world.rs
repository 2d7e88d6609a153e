use std::collections::{BTreeMap, HashMap};

use super::turn::TurnScheduler;
use super::types::{Combatant, CorpseData, EntityId, Location, LocationId, Tick};
use crate::error::{CombatError, ErrorSeverity};

/// The world as the combat core sees it: actors, locations and the turn queue.
///
/// The snapshot is a plain value. It performs no locking; callers serialize
/// access (the runtime keeps one mutex around it).
///
/// Actor lookup goes through an explicit actor → location index, so nothing
/// ever scans every location to find an actor. The index and the scheduler
/// are derived data and are not serialized; call [`restore`](Self::restore)
/// after loading.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldSnapshot {
    /// Base seed for every random roll; combined with `nonce` per action.
    pub game_seed: u64,

    /// Current world time.
    pub clock: Tick,

    /// Sequence number of resolved actions.
    pub nonce: u64,

    actors: BTreeMap<EntityId, Combatant>,
    locations: BTreeMap<LocationId, Location>,

    #[cfg_attr(feature = "serde", serde(skip))]
    actor_index: HashMap<EntityId, LocationId>,

    /// Pending turns. Rebuilt from actor readiness on [`restore`](Self::restore).
    #[cfg_attr(feature = "serde", serde(skip))]
    pub scheduler: TurnScheduler,
}

impl WorldSnapshot {
    pub fn new(game_seed: u64) -> Self {
        Self {
            game_seed,
            ..Self::default()
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.add_location(location);
        self
    }

    pub fn add_location(&mut self, location: Location) {
        for occupant in &location.occupants {
            self.actor_index.insert(*occupant, location.id);
        }
        self.locations.insert(location.id, location);
    }

    /// Places a new combatant into a location.
    pub fn spawn(&mut self, actor: Combatant, location: LocationId) -> Result<(), SnapshotError> {
        if self.actors.contains_key(&actor.id) {
            return Err(SnapshotError::DuplicateActor(actor.id));
        }
        let room = self
            .locations
            .get_mut(&location)
            .ok_or(SnapshotError::UnknownLocation(location))?;

        room.add_occupant(actor.id);
        self.actor_index.insert(actor.id, location);
        if !actor.ready_at.is_zero() {
            self.scheduler.enqueue(actor.id, actor.ready_at);
        }
        self.actors.insert(actor.id, actor);
        Ok(())
    }

    pub fn actor(&self, id: EntityId) -> Option<&Combatant> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.actors.get_mut(&id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &Combatant> {
        self.actors.values()
    }

    pub fn actor_ids(&self) -> Vec<EntityId> {
        self.actors.keys().copied().collect()
    }

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(&id)
    }

    pub fn location_mut(&mut self, id: LocationId) -> Option<&mut Location> {
        self.locations.get_mut(&id)
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    pub fn locations_mut(&mut self) -> impl Iterator<Item = &mut Location> {
        self.locations.values_mut()
    }

    /// O(1) lookup of where an actor stands.
    pub fn location_of(&self, actor: EntityId) -> Option<LocationId> {
        self.actor_index.get(&actor).copied()
    }

    /// Living combatants in a location, in arrival order.
    pub fn actors_in(&self, location: LocationId) -> impl Iterator<Item = &Combatant> {
        self.locations
            .get(&location)
            .into_iter()
            .flat_map(|room| room.occupants.iter())
            .filter_map(|id| self.actors.get(id))
    }

    pub fn corpses_at(&self, location: LocationId) -> &[CorpseData] {
        self.locations
            .get(&location)
            .map(|room| room.corpses.as_slice())
            .unwrap_or(&[])
    }

    /// Moves an actor between locations, keeping the index in sync.
    pub fn move_actor(
        &mut self,
        actor: EntityId,
        destination: LocationId,
    ) -> Result<(), SnapshotError> {
        if !self.actors.contains_key(&actor) {
            return Err(SnapshotError::UnknownActor(actor));
        }
        if !self.locations.contains_key(&destination) {
            return Err(SnapshotError::UnknownLocation(destination));
        }

        if let Some(origin) = self.actor_index.get(&actor).copied()
            && let Some(room) = self.locations.get_mut(&origin)
        {
            room.remove_occupant(actor);
        }
        if let Some(room) = self.locations.get_mut(&destination) {
            room.add_occupant(actor);
        }
        self.actor_index.insert(actor, destination);
        Ok(())
    }

    /// Takes an actor out of the world entirely: actor table, location,
    /// index and scheduler.
    pub fn remove_actor(&mut self, actor: EntityId) -> Option<(Combatant, Option<LocationId>)> {
        let combatant = self.actors.remove(&actor)?;
        let location = self.actor_index.remove(&actor);
        if let Some(location) = location
            && let Some(room) = self.locations.get_mut(&location)
        {
            room.remove_occupant(actor);
        }
        self.scheduler.remove(actor);
        Some((combatant, location))
    }

    /// Sets an actor's readiness and (re)enqueues it. Returns false for
    /// unknown actors.
    pub fn schedule(&mut self, actor: EntityId, ready_at: Tick) -> bool {
        let Some(combatant) = self.actors.get_mut(&actor) else {
            return false;
        };
        combatant.ready_at = ready_at;
        self.scheduler.enqueue(actor, ready_at);
        true
    }

    /// Clears an actor's readiness and drops its pending turn.
    /// Returns whether a turn was pending.
    pub fn unschedule(&mut self, actor: EntityId) -> bool {
        if let Some(combatant) = self.actors.get_mut(&actor) {
            combatant.ready_at = Tick::ZERO;
        }
        self.scheduler.remove(actor)
    }

    /// Rebuilds derived data (location index, turn queue) after deserialization.
    pub fn restore(&mut self) {
        self.actor_index = self
            .locations
            .values()
            .flat_map(|room| room.occupants.iter().map(move |id| (*id, room.id)))
            .collect();

        let readiness: Vec<_> = self
            .actors
            .values()
            .map(|actor| (actor.id, actor.ready_at))
            .collect();
        self.scheduler.rebuild(readiness);
    }
}

/// Errors raised by snapshot accessors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SnapshotError {
    #[error("actor {0} not found")]
    UnknownActor(EntityId),

    #[error("location {0} not found")]
    UnknownLocation(LocationId),

    #[error("actor {0} already exists")]
    DuplicateActor(EntityId),
}

impl CombatError for SnapshotError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownActor(_) => "SNAPSHOT_UNKNOWN_ACTOR",
            Self::UnknownLocation(_) => "SNAPSHOT_UNKNOWN_LOCATION",
            Self::DuplicateActor(_) => "SNAPSHOT_DUPLICATE_ACTOR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_rooms() -> WorldSnapshot {
        WorldSnapshot::new(7)
            .with_location(Location::new(LocationId(1), "Hall").with_exit("north", LocationId(2)))
            .with_location(Location::new(LocationId(2), "Vault"))
    }

    #[test]
    fn spawn_indexes_actor_location() {
        let mut world = two_rooms();
        world
            .spawn(Combatant::npc(EntityId(5), "rat", 5), LocationId(1))
            .unwrap();

        assert_eq!(world.location_of(EntityId(5)), Some(LocationId(1)));
        assert_eq!(world.actors_in(LocationId(1)).count(), 1);
    }

    #[test]
    fn spawn_rejects_duplicates_and_unknown_rooms() {
        let mut world = two_rooms();
        world
            .spawn(Combatant::npc(EntityId(5), "rat", 5), LocationId(1))
            .unwrap();

        assert_eq!(
            world.spawn(Combatant::npc(EntityId(5), "rat", 5), LocationId(1)),
            Err(SnapshotError::DuplicateActor(EntityId(5)))
        );
        assert_eq!(
            world.spawn(Combatant::npc(EntityId(6), "bat", 5), LocationId(9)),
            Err(SnapshotError::UnknownLocation(LocationId(9)))
        );
    }

    #[test]
    fn move_actor_updates_both_rooms() {
        let mut world = two_rooms();
        world
            .spawn(Combatant::player(EntityId::PLAYER, "hero", 20), LocationId(1))
            .unwrap();

        world.move_actor(EntityId::PLAYER, LocationId(2)).unwrap();

        assert_eq!(world.location_of(EntityId::PLAYER), Some(LocationId(2)));
        assert!(!world.location(LocationId(1)).unwrap().contains(EntityId::PLAYER));
        assert!(world.location(LocationId(2)).unwrap().contains(EntityId::PLAYER));
    }

    #[test]
    fn restore_rebuilds_index_and_scheduler() {
        let mut world = two_rooms();
        world
            .spawn(
                Combatant::npc(EntityId(5), "rat", 5).with_ready_at(Tick(12)),
                LocationId(2),
            )
            .unwrap();

        let mut reloaded = world.clone();
        reloaded.actor_index.clear();
        reloaded.scheduler = TurnScheduler::new();
        reloaded.restore();

        assert_eq!(reloaded.location_of(EntityId(5)), Some(LocationId(2)));
        assert_eq!(reloaded.scheduler.ready_at(EntityId(5)), Some(Tick(12)));
    }
}
