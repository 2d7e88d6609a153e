//! Event delivery for combat events emitted by the core.
//!
//! - [`TracingEventSink`] turns events into `tracing` records
//! - [`EventBus`] broadcasts them to async subscribers
//! - [`SinkSet`] fans one stream out to several sinks

mod bus;
mod tracing_sink;

pub use bus::EventBus;
pub use tracing_sink::TracingEventSink;

use std::sync::Arc;

use combat_core::{CombatEvent, EventSink};

/// Forwards every event to each registered sink, in registration order.
#[derive(Clone, Default)]
pub struct SinkSet {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl SinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for SinkSet {
    fn emit(&self, event: CombatEvent) {
        let Some((last, rest)) = self.sinks.split_last() else {
            return;
        };
        for sink in rest {
            sink.emit(event.clone());
        }
        last.emit(event);
    }
}

impl std::fmt::Debug for SinkSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkSet").field("sinks", &self.sinks.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{EntityId, RecordingSink};

    #[test]
    fn every_sink_sees_every_event() {
        let first = Arc::new(RecordingSink::new());
        let second = Arc::new(RecordingSink::new());
        let set = SinkSet::new().with(first.clone()).with(second.clone());

        set.emit(CombatEvent::Unscheduled { actor: EntityId(4) });

        assert_eq!(first.events().len(), 1);
        assert_eq!(second.events(), first.events());
    }
}
