use std::collections::{BTreeMap, HashMap};

use super::{EntityId, Tick};

/// A pending turn: the actor and the world time at which it becomes ready.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduledTurn {
    pub actor: EntityId,
    pub ready_at: Tick,
}

/// Readiness-ordered turn queue with exactly one pending entry per actor.
///
/// Entries are keyed by `(ready_at, sequence)`. The sequence number grows with
/// every enqueue, so actors sharing a readiness time leave the queue in the
/// order they were (re-)enqueued.
///
/// The scheduler is event-driven: [`dequeue`](Self::dequeue) only yields an
/// entry whose time has come and otherwise leaves the queue untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnScheduler {
    queue: BTreeMap<(Tick, u64), EntityId>,
    pending: HashMap<EntityId, (Tick, u64)>,
    next_sequence: u64,
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the actor's pending entry.
    ///
    /// Returns the readiness time of the replaced entry, if any.
    pub fn enqueue(&mut self, actor: EntityId, ready_at: Tick) -> Option<Tick> {
        let previous = self.take(actor);

        let key = (ready_at, self.next_sequence);
        self.next_sequence += 1;
        self.queue.insert(key, actor);
        self.pending.insert(actor, key);

        previous
    }

    /// Earliest entry, without removing it.
    pub fn peek(&self) -> Option<ScheduledTurn> {
        self.queue
            .first_key_value()
            .map(|(&(ready_at, _), &actor)| ScheduledTurn { actor, ready_at })
    }

    /// Removes and returns the earliest entry if it is ready at `now`.
    pub fn dequeue(&mut self, now: Tick) -> Option<ScheduledTurn> {
        let next = self.peek()?;
        if next.ready_at > now {
            return None;
        }
        self.take(next.actor);
        Some(next)
    }

    /// Drops the actor's pending entry. Returns whether one existed.
    pub fn remove(&mut self, actor: EntityId) -> bool {
        self.take(actor).is_some()
    }

    /// Clears the queue and re-enqueues every actor with a positive readiness time.
    ///
    /// Used after loading a snapshot, since the queue itself is never persisted.
    pub fn rebuild(&mut self, actors: impl IntoIterator<Item = (EntityId, Tick)>) {
        self.queue.clear();
        self.pending.clear();
        self.next_sequence = 0;

        for (actor, ready_at) in actors {
            if !ready_at.is_zero() {
                self.enqueue(actor, ready_at);
            }
        }
    }

    pub fn contains(&self, actor: EntityId) -> bool {
        self.pending.contains_key(&actor)
    }

    pub fn ready_at(&self, actor: EntityId) -> Option<Tick> {
        self.pending.get(&actor).map(|(ready_at, _)| *ready_at)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending entries in dequeue order.
    pub fn iter(&self) -> impl Iterator<Item = ScheduledTurn> + '_ {
        self.queue
            .iter()
            .map(|(&(ready_at, _), &actor)| ScheduledTurn { actor, ready_at })
    }

    fn take(&mut self, actor: EntityId) -> Option<Tick> {
        let key = self.pending.remove(&actor)?;
        self.queue.remove(&key);
        Some(key.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reenqueue_keeps_single_entry_with_latest_time() {
        let mut scheduler = TurnScheduler::new();
        scheduler.enqueue(EntityId(1), Tick(10));
        let previous = scheduler.enqueue(EntityId(1), Tick(25));

        assert_eq!(previous, Some(Tick(10)));
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.ready_at(EntityId(1)), Some(Tick(25)));
    }

    #[test]
    fn dequeue_waits_for_ready_time() {
        let mut scheduler = TurnScheduler::new();
        scheduler.enqueue(EntityId(1), Tick(10));

        assert_eq!(scheduler.dequeue(Tick(9)), None);
        assert_eq!(scheduler.len(), 1);

        let turn = scheduler.dequeue(Tick(10)).unwrap();
        assert_eq!(turn.actor, EntityId(1));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn dequeue_order_is_non_decreasing() {
        let mut scheduler = TurnScheduler::new();
        scheduler.enqueue(EntityId(3), Tick(30));
        scheduler.enqueue(EntityId(1), Tick(10));
        scheduler.enqueue(EntityId(2), Tick(20));

        let mut times = Vec::new();
        while let Some(turn) = scheduler.dequeue(Tick(100)) {
            times.push(turn.ready_at);
        }
        assert_eq!(times, vec![Tick(10), Tick(20), Tick(30)]);
    }

    #[test]
    fn ties_leave_in_insertion_order() {
        let mut scheduler = TurnScheduler::new();
        scheduler.enqueue(EntityId(9), Tick(5));
        scheduler.enqueue(EntityId(2), Tick(5));
        scheduler.enqueue(EntityId(4), Tick(5));

        let order: Vec<_> = std::iter::from_fn(|| scheduler.dequeue(Tick(5)))
            .map(|turn| turn.actor)
            .collect();
        assert_eq!(order, vec![EntityId(9), EntityId(2), EntityId(4)]);
    }

    #[test]
    fn remove_reports_existence() {
        let mut scheduler = TurnScheduler::new();
        scheduler.enqueue(EntityId(1), Tick(10));

        assert!(scheduler.remove(EntityId(1)));
        assert!(!scheduler.remove(EntityId(1)));
        assert_eq!(scheduler.peek(), None);
    }

    #[test]
    fn rebuild_skips_unscheduled_actors() {
        let mut scheduler = TurnScheduler::new();
        scheduler.enqueue(EntityId(7), Tick(99));

        scheduler.rebuild(vec![
            (EntityId(1), Tick(12)),
            (EntityId(2), Tick::ZERO),
            (EntityId(3), Tick(4)),
        ]);

        assert_eq!(scheduler.len(), 2);
        assert!(!scheduler.contains(EntityId(7)));
        assert!(!scheduler.contains(EntityId(2)));
        assert_eq!(scheduler.peek().map(|t| t.actor), Some(EntityId(3)));
    }
}
