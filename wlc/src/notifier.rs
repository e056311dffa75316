//! Delivery of WLC events to the caller's result sink.

use crate::types::WlcEvent;
use nfa_core::effect::Effect;
use tokio::sync::mpsc;

/// Sending half of a caller-owned event channel
///
/// The caller keeps the receiver. Dropping the receiver closes the sink; the
/// module treats a closed sink like a missing one.
#[derive(Debug, Clone)]
pub struct ResultSink {
    sender: mpsc::UnboundedSender<WlcEvent>,
}

impl ResultSink {
    /// Wrap the sending half of an event channel
    #[must_use]
    pub const fn new(sender: mpsc::UnboundedSender<WlcEvent>) -> Self {
        Self { sender }
    }

    /// Create a sink together with the receiver the caller reads events from
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<WlcEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }

    /// Returns true once the receiver has been dropped
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Hand `event` to the receiver. Returns false if the receiver is gone.
    pub fn deliver(&self, event: WlcEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Effect delivering `event` to `sink` on the worker
///
/// Without a sink the event is dropped and no effect is produced.
pub fn notify(sink: Option<ResultSink>, event: WlcEvent) -> Effect {
    let Some(sink) = sink else {
        tracing::trace!(event = event.name(), "No result sink, event dropped");
        return Effect::None;
    };

    Effect::call(move || {
        if sink.deliver(event) {
            tracing::debug!(event = event.name(), data = ?event.data(), "Event delivered");
            metrics::counter!("wlc.events.delivered", "event" => event.name()).increment(1);
        } else {
            tracing::warn!(event = event.name(), "Result sink closed, event dropped");
        }
    })
}
