//! Publisher that writes every event to the log

use async_trait::async_trait;
use gamer_core::traits::{EventPublisher, RepoResult};
use gamer_core::{DomainError, DomainEvent};
use tracing::info;

/// Logs events as structured JSON at `info`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPublisher;

impl TracingPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for TracingPublisher {
    async fn publish(&self, event: DomainEvent) -> RepoResult<()> {
        let payload = serde_json::to_string(&event)
            .map_err(|e| DomainError::InternalError(format!("event serialization: {e}")))?;

        info!(
            event_type = event.event_type(),
            community_id = ?event.community_id(),
            %payload,
            "Domain event"
        );
        Ok(())
    }
}
