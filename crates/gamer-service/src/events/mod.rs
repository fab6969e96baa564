//! Event publishers
//!
//! Implementations of the `EventPublisher` port. Services publish only after
//! their transaction committed.

mod broadcast;
mod tracing_publisher;

pub use broadcast::BroadcastPublisher;
pub use tracing_publisher::TracingPublisher;

use gamer_core::DomainEvent;
use tracing::warn;

use crate::services::ServiceContext;

/// Publish a committed event; delivery failures are logged and swallowed
pub(crate) async fn publish(ctx: &ServiceContext, event: DomainEvent) {
    let event_type = event.event_type();
    if let Err(e) = ctx.publisher().publish(event).await {
        warn!(event_type, error = %e, "Failed to publish domain event");
    }
}
