//! Event emission
//!
//! The dispatcher hands every decoded event to an [`EventSink`]. Publishing
//! happens on the decoding thread, so implementations must not block; a
//! slow consumer should buffer (a channel sender is a good sink).

use std::sync::Arc;

use parking_lot::Mutex;
use zwrust_types::Event;

/// Consumer of decoded events
#[cfg_attr(test, mockall::automock)]
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &Event);
}

impl<F> EventSink for F
where
    F: Fn(&Event) + Send + Sync,
{
    fn publish(&self, event: &Event) {
        self(event)
    }
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: &Event) {}
}

/// Sink that keeps every event in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything published so far
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Take everything published so far
    pub fn drain(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &Event) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use zwrust_types::{CommandClassId, EventKind};

    fn event() -> Event {
        Event::new(3, 0, CommandClassId::Basic, EventKind::Basic { value: 0xFF })
    }

    #[test]
    fn test_recording_sink() {
        let sink = RecordingSink::new();
        let shared = sink.clone();

        shared.publish(&event());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.events(), vec![event()]);

        assert_eq!(sink.drain().len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_closure_sink() {
        let count = Arc::new(Mutex::new(0));
        let counter = count.clone();
        let sink = move |_: &Event| *counter.lock() += 1;

        sink.publish(&event());
        sink.publish(&event());
        assert_eq!(*count.lock(), 2);
    }

    #[test]
    fn test_mock_sink() {
        let mut sink = MockEventSink::new();
        sink.expect_publish()
            .withf(|event| event.node_id == 3)
            .times(1)
            .return_const(());

        sink.publish(&event());
    }
}
