//! In-process fan-out of committed events over a tokio broadcast channel

use async_trait::async_trait;
use gamer_core::traits::{EventPublisher, RepoResult};
use gamer_core::DomainEvent;
use tokio::sync::broadcast;
use tracing::trace;

/// Fans events out to every live subscriber.
///
/// Publishing with no subscribers is not an error; the event is dropped.
/// Slow subscribers see `RecvError::Lagged` once they fall `capacity`
/// events behind.
#[derive(Debug, Clone)]
pub struct BroadcastPublisher {
    sender: broadcast::Sender<DomainEvent>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EventPublisher for BroadcastPublisher {
    async fn publish(&self, event: DomainEvent) -> RepoResult<()> {
        match self.sender.send(event) {
            Ok(receivers) => trace!(receivers, "Event broadcast"),
            Err(_) => trace!("Event dropped, no subscribers"),
        }
        Ok(())
    }
}
