//! Event publishing port

use async_trait::async_trait;

use crate::events::DomainEvent;
use crate::traits::RepoResult;

/// Delivers committed domain events to whoever listens.
///
/// Services call this only after the owning transaction committed and
/// never fail an operation because delivery failed.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: DomainEvent) -> RepoResult<()>;
}
