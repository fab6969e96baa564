//! Moderation service
//!
//! Kick and ban. Each writes its record and removes the membership in one
//! transaction; if the target is not a member, nothing is written.

use chrono::Utc;
use gamer_core::events::ModerationEvent;
use gamer_core::{
    BannedUser, DomainError, DomainEvent, GamerCommunity, KickedUser, Permission, Snowflake,
};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{BanRequest, KickRequest};
use crate::events::publish;

use super::authorization::require_permission;
use super::community::fetch_community;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::ledger::delete_member;

/// Moderation service
pub struct ModerationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ModerationService<'a> {
    /// Create a new ModerationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Kick a member. They may reapply once `earliest_reapply` has passed.
    #[instrument(skip(self, request))]
    pub async fn kick_user(
        &self,
        actor_id: Snowflake,
        community_id: Snowflake,
        target_id: Snowflake,
        request: KickRequest,
    ) -> ServiceResult<KickedUser> {
        request.validate()?;
        let community = self
            .authorize(actor_id, community_id, target_id, Permission::KickUser)
            .await?;

        let kick = KickedUser::new(
            self.ctx.generate_id(),
            community.id,
            actor_id,
            target_id,
            request.reason,
            request.earliest_reapply,
        );

        let mut tx = self.ctx.unit_of_work().begin().await?;
        tx.insert_kick(&kick).await?;
        delete_member(tx.as_mut(), community.id, target_id).await?;
        tx.commit().await?;

        info!(
            community_id = %community.id,
            actor_id = %actor_id,
            target_id = %target_id,
            until = ?kick.end_date,
            "Member kicked"
        );
        publish(
            self.ctx,
            DomainEvent::MemberKicked(ModerationEvent {
                community_id: community.id,
                gamer_id: target_id,
                actor_id,
                reason: Some(kick.reason.clone()),
                until: kick.end_date,
                timestamp: Utc::now(),
            }),
        )
        .await;

        Ok(kick)
    }

    /// Ban a member permanently
    #[instrument(skip(self, request))]
    pub async fn ban_user(
        &self,
        actor_id: Snowflake,
        community_id: Snowflake,
        target_id: Snowflake,
        request: BanRequest,
    ) -> ServiceResult<BannedUser> {
        request.validate()?;
        let community = self
            .authorize(actor_id, community_id, target_id, Permission::BanUser)
            .await?;

        let ban = BannedUser::new(
            self.ctx.generate_id(),
            community.id,
            actor_id,
            target_id,
            request.reason,
        );

        let mut tx = self.ctx.unit_of_work().begin().await?;
        tx.insert_ban(&ban).await?;
        delete_member(tx.as_mut(), community.id, target_id).await?;
        tx.commit().await?;

        info!(
            community_id = %community.id,
            actor_id = %actor_id,
            target_id = %target_id,
            "Member banned"
        );
        publish(
            self.ctx,
            DomainEvent::MemberBanned(ModerationEvent {
                community_id: community.id,
                gamer_id: target_id,
                actor_id,
                reason: Some(ban.reason.clone()),
                until: None,
                timestamp: Utc::now(),
            }),
        )
        .await;

        Ok(ban)
    }

    /// Lift every ban on the gamer. `BanNotFound` if there was none.
    #[instrument(skip(self))]
    pub async fn unban_user(
        &self,
        actor_id: Snowflake,
        community_id: Snowflake,
        target_id: Snowflake,
    ) -> ServiceResult<()> {
        let community = fetch_community(self.ctx, community_id).await?;
        require_permission(self.ctx, actor_id, Permission::BanUser, &community).await?;

        let removed = self
            .ctx
            .moderation_repo()
            .delete_bans(community_id, target_id)
            .await?;
        if removed == 0 {
            return Err(DomainError::BanNotFound.into());
        }

        info!(community_id = %community_id, target_id = %target_id, removed, "Member unbanned");
        publish(
            self.ctx,
            DomainEvent::MemberUnbanned(ModerationEvent {
                community_id,
                gamer_id: target_id,
                actor_id,
                reason: None,
                until: None,
                timestamp: Utc::now(),
            }),
        )
        .await;

        Ok(())
    }

    /// Ban records of a community
    #[instrument(skip(self))]
    pub async fn bans(&self, community_id: Snowflake) -> ServiceResult<Vec<BannedUser>> {
        Ok(self.ctx.moderation_repo().find_bans(community_id).await?)
    }

    /// Kick records of a community
    #[instrument(skip(self))]
    pub async fn kicks(&self, community_id: Snowflake) -> ServiceResult<Vec<KickedUser>> {
        Ok(self.ctx.moderation_repo().find_kicks(community_id).await?)
    }

    /// Permission first, then owner protection regardless of the permission result
    async fn authorize(
        &self,
        actor_id: Snowflake,
        community_id: Snowflake,
        target_id: Snowflake,
        permission: Permission,
    ) -> ServiceResult<GamerCommunity> {
        let community = fetch_community(self.ctx, community_id).await?;
        require_permission(self.ctx, actor_id, permission, &community).await?;

        if community.is_owner(target_id) {
            return Err(DomainError::permission_denied("cannot moderate the community owner").into());
        }
        Ok(community)
    }
}
