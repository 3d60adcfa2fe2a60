//! Channel-backed event sink

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::trace;
use zwrust_protocol::EventSink;
use zwrust_types::Event;

/// Forwards events to an unbounded tokio channel
///
/// Publishing never blocks; events published after the receiver is
/// dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: UnboundedSender<Event>,
}

impl ChannelSink {
    /// Sink plus the receiving end of its channel
    pub fn new() -> (Self, UnboundedReceiver<Event>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn publish(&self, event: &Event) {
        if self.sender.send(event.clone()).is_err() {
            trace!(%event, "Event receiver gone");
        }
    }
}
