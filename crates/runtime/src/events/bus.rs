//! Broadcast channel for combat events.

use tokio::sync::broadcast;

use combat_core::{CombatEvent, EventSink};

/// Broadcasts combat events to any number of async subscribers.
///
/// Events emitted while nobody listens are dropped; slow subscribers observe
/// `RecvError::Lagged` once they fall `capacity` events behind.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<CombatEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CombatEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventSink for EventBus {
    fn emit(&self, event: CombatEvent) {
        // Err only means there are no subscribers right now.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::EntityId;

    #[tokio::test]
    async fn subscribers_receive_events() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.emit(CombatEvent::Unscheduled { actor: EntityId(3) });

        assert_eq!(rx.recv().await.unwrap(), CombatEvent::Unscheduled { actor: EntityId(3) });
    }

    #[test]
    fn emitting_without_subscribers_is_harmless() {
        let bus = EventBus::new(8);
        bus.emit(CombatEvent::Unscheduled { actor: EntityId(3) });
        assert_eq!(bus.subscriber_count(), 0);
    }
}
