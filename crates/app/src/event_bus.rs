//! In-process event bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use coinflip_domain::error::CoinflipError;
use coinflip_domain::event::Event;

use crate::ports::EventPublisher;

/// Fan-out of host events to any number of in-process listeners.
///
/// A publish with nobody listening is not an error; the event is dropped.
/// Slow listeners see [`broadcast::error::RecvError::Lagged`] rather than
/// stalling the host.
pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
}

impl InProcessEventBus {
    /// Create a bus that buffers up to `capacity` events per listener.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Receive every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), CoinflipError>> + Send {
        let delivered = self.sender.send(event).unwrap_or_default();
        tracing::trace!(delivered, "event published");
        async { Ok(()) }
    }
}
