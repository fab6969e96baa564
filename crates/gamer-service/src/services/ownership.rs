//! Ownership transfer

use chrono::Utc;
use gamer_core::events::OwnershipTransferredEvent;
use gamer_core::{CommunityRole, DomainError, DomainEvent, GamerCommunity, Permission, Snowflake};
use tracing::{info, instrument};

use crate::events::publish;

use super::authorization::require_permission;
use super::community::fetch_community;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::ledger::ensure_owner_admin;

/// Ownership service
pub struct OwnershipService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> OwnershipService<'a> {
    /// Create a new OwnershipService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Hand the community to `new_owner_id`.
    ///
    /// The new owner must already be an admin: not a member at all is
    /// `NotInCommunity`, any lesser role is `NewOwnerNotAdmin`. The previous
    /// owner keeps their admin membership.
    #[instrument(skip(self))]
    pub async fn transfer_ownership(
        &self,
        actor_id: Snowflake,
        community_id: Snowflake,
        new_owner_id: Snowflake,
    ) -> ServiceResult<GamerCommunity> {
        let mut community = fetch_community(self.ctx, community_id).await?;
        require_permission(self.ctx, actor_id, Permission::TransferOwnership, &community).await?;

        let mut tx = self.ctx.unit_of_work().begin().await?;
        let target = tx
            .find_membership(community_id, new_owner_id)
            .await?
            .ok_or(DomainError::NotInCommunity)?;
        if target.role != CommunityRole::Admin {
            return Err(DomainError::NewOwnerNotAdmin.into());
        }

        let previous_owner_id = community.owner_id;
        community.transfer_ownership(new_owner_id);
        tx.update_community(&community).await?;
        ensure_owner_admin(tx.as_mut(), &community).await?;
        tx.commit().await?;

        info!(
            community_id = %community_id,
            previous_owner_id = %previous_owner_id,
            new_owner_id = %new_owner_id,
            "Ownership transferred"
        );
        publish(
            self.ctx,
            DomainEvent::OwnershipTransferred(OwnershipTransferredEvent {
                community_id,
                previous_owner_id,
                new_owner_id,
                timestamp: Utc::now(),
            }),
        )
        .await;

        fetch_community(self.ctx, community_id).await
    }
}
