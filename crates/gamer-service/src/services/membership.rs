//! Membership service
//!
//! The membership ledger: who belongs to a community and with which role.
//! Adds and removes change the row and `member_count` in one transaction.

use chrono::Utc;
use gamer_core::events::{MembershipEvent, RoleChangedEvent};
use gamer_core::{
    CommunityMembership, CommunityRole, DomainError, DomainEvent, Permission, Snowflake,
};
use tracing::{debug, info, instrument};

use crate::events::publish;

use super::authorization::require_permission;
use super::community::fetch_community;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::ledger::{delete_member, insert_member};

/// Membership service
pub struct MembershipService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MembershipService<'a> {
    /// Create a new MembershipService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add a gamer to a community and count them.
    ///
    /// A second add for the same pair fails with `AlreadyInCommunity` from
    /// the store's uniqueness check, with no pre-check.
    #[instrument(skip(self))]
    pub async fn add_member(
        &self,
        community_id: Snowflake,
        gamer_id: Snowflake,
        role: CommunityRole,
    ) -> ServiceResult<CommunityMembership> {
        let membership = CommunityMembership::new(community_id, gamer_id, role);

        let mut tx = self.ctx.unit_of_work().begin().await?;
        insert_member(tx.as_mut(), &membership).await?;
        tx.commit().await?;

        info!(community_id = %community_id, gamer_id = %gamer_id, %role, "Member added");
        publish(
            self.ctx,
            DomainEvent::MemberJoined(MembershipEvent::new(community_id, gamer_id, role)),
        )
        .await;

        Ok(membership)
    }

    /// Remove a gamer from a community and uncount them
    #[instrument(skip(self))]
    pub async fn remove_member(&self, community_id: Snowflake, gamer_id: Snowflake) -> ServiceResult<()> {
        let mut tx = self.ctx.unit_of_work().begin().await?;
        let existing = tx
            .find_membership(community_id, gamer_id)
            .await?
            .ok_or(DomainError::NotInCommunity)?;
        delete_member(tx.as_mut(), community_id, gamer_id).await?;
        tx.commit().await?;

        info!(community_id = %community_id, gamer_id = %gamer_id, "Member removed");
        publish(
            self.ctx,
            DomainEvent::MemberLeft(MembershipEvent::new(community_id, gamer_id, existing.role)),
        )
        .await;

        Ok(())
    }

    /// Set a role, inserting the membership when there is none.
    ///
    /// The insert path goes through the counting helper so `member_count`
    /// stays equal to the row count.
    #[instrument(skip(self))]
    pub async fn set_role(
        &self,
        community_id: Snowflake,
        gamer_id: Snowflake,
        role: CommunityRole,
    ) -> ServiceResult<CommunityMembership> {
        let mut tx = self.ctx.unit_of_work().begin().await?;
        let previous = tx.find_membership(community_id, gamer_id).await?;
        let previous_role = previous.as_ref().map(|m| m.role);

        let membership = match previous {
            Some(mut existing) => {
                tx.update_membership_role(community_id, gamer_id, role).await?;
                existing.set_role(role);
                existing
            }
            None => {
                let membership = CommunityMembership::new(community_id, gamer_id, role);
                insert_member(tx.as_mut(), &membership).await?;
                membership
            }
        };
        tx.commit().await?;

        info!(community_id = %community_id, gamer_id = %gamer_id, ?previous_role, %role, "Role set");
        self.publish_role_change(community_id, gamer_id, previous_role, role)
            .await;

        Ok(membership)
    }

    /// Display label of the gamer's role ("Member", "Moderator", "Admin")
    #[instrument(skip(self))]
    pub async fn get_role(&self, community_id: Snowflake, gamer_id: Snowflake) -> ServiceResult<&'static str> {
        Ok(self.membership(community_id, gamer_id).await?.role_label())
    }

    /// Membership row or `NotInCommunity`
    #[instrument(skip(self))]
    pub async fn membership(
        &self,
        community_id: Snowflake,
        gamer_id: Snowflake,
    ) -> ServiceResult<CommunityMembership> {
        self.ctx
            .membership_repo()
            .find(community_id, gamer_id)
            .await?
            .ok_or_else(|| DomainError::NotInCommunity.into())
    }

    /// All members of a community
    #[instrument(skip(self))]
    pub async fn members(&self, community_id: Snowflake) -> ServiceResult<Vec<CommunityMembership>> {
        Ok(self.ctx.membership_repo().find_by_community(community_id).await?)
    }

    /// Members holding the admin role
    #[instrument(skip(self))]
    pub async fn admins(&self, community_id: Snowflake) -> ServiceResult<Vec<CommunityMembership>> {
        Ok(self
            .ctx
            .membership_repo()
            .find_by_role(community_id, CommunityRole::Admin)
            .await?)
    }

    /// Members holding the moderator role
    #[instrument(skip(self))]
    pub async fn moderators(&self, community_id: Snowflake) -> ServiceResult<Vec<CommunityMembership>> {
        Ok(self
            .ctx
            .membership_repo()
            .find_by_role(community_id, CommunityRole::Moderator)
            .await?)
    }

    /// Raise the gamer's role only if `role` strictly outranks the current one.
    ///
    /// Used to sync a role observed elsewhere. Returns whether anything changed.
    #[instrument(skip(self))]
    pub async fn promote_if_outranks(
        &self,
        community_id: Snowflake,
        gamer_id: Snowflake,
        role: CommunityRole,
    ) -> ServiceResult<bool> {
        let mut tx = self.ctx.unit_of_work().begin().await?;
        let current = tx
            .find_membership(community_id, gamer_id)
            .await?
            .ok_or(DomainError::NotInCommunity)?
            .role;

        if !current.less_than(role) {
            debug!(%current, %role, "Role not raised");
            return Ok(false);
        }

        tx.update_membership_role(community_id, gamer_id, role).await?;
        tx.commit().await?;

        info!(community_id = %community_id, gamer_id = %gamer_id, %current, %role, "Role raised");
        self.publish_role_change(community_id, gamer_id, Some(current), role)
            .await;
        Ok(true)
    }

    /// Change another member's role. Requires `ManageRoles`; the owner's
    /// role is fixed at admin.
    #[instrument(skip(self))]
    pub async fn change_role(
        &self,
        actor_id: Snowflake,
        community_id: Snowflake,
        target_id: Snowflake,
        role: CommunityRole,
    ) -> ServiceResult<CommunityMembership> {
        let community = fetch_community(self.ctx, community_id).await?;
        require_permission(self.ctx, actor_id, Permission::ManageRoles, &community).await?;
        if community.is_owner(target_id) {
            return Err(DomainError::permission_denied("cannot change the owner's role").into());
        }

        let mut tx = self.ctx.unit_of_work().begin().await?;
        let mut membership = tx
            .find_membership(community_id, target_id)
            .await?
            .ok_or(DomainError::NotInCommunity)?;
        let previous = membership.role;
        tx.update_membership_role(community_id, target_id, role).await?;
        tx.commit().await?;
        membership.set_role(role);

        info!(
            community_id = %community_id,
            actor_id = %actor_id,
            target_id = %target_id,
            %previous,
            %role,
            "Role changed"
        );
        self.publish_role_change(community_id, target_id, Some(previous), role)
            .await;

        Ok(membership)
    }

    async fn publish_role_change(
        &self,
        community_id: Snowflake,
        gamer_id: Snowflake,
        previous_role: Option<CommunityRole>,
        role: CommunityRole,
    ) {
        publish(
            self.ctx,
            DomainEvent::RoleChanged(RoleChangedEvent {
                community_id,
                gamer_id,
                previous_role,
                role,
                timestamp: Utc::now(),
            }),
        )
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{community, context, gamer};
    use crate::services::CommunityService;

    fn ids(rows: &[CommunityMembership]) -> Vec<Snowflake> {
        let mut ids: Vec<_> = rows.iter().map(|m| m.gamer_id).collect();
        ids.sort();
        ids
    }

    #[tokio::test]
    async fn test_add_member_twice_leaves_first_row() {
        let (ctx, _) = context();
        let owner = gamer(&ctx, "keeper").await;
        let player = gamer(&ctx, "player").await;
        let c = community(&ctx, &owner, "Dice", false).await;
        let service = MembershipService::new(&ctx);

        service
            .add_member(c.id, player.id, CommunityRole::Moderator)
            .await
            .unwrap();
        let err = service
            .add_member(c.id, player.id, CommunityRole::Member)
            .await
            .unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::AlreadyInCommunity)));

        assert_eq!(service.get_role(c.id, player.id).await.unwrap(), "Moderator");
        let stored = CommunityService::new(&ctx).get_community(c.id).await.unwrap();
        assert_eq!(stored.member_count, 2);
    }

    #[tokio::test]
    async fn test_role_queries() {
        let (ctx, _) = context();
        let owner = gamer(&ctx, "owner").await;
        let a = gamer(&ctx, "alice").await;
        let m2 = gamer(&ctx, "mod").await;
        let c = community(&ctx, &owner, "Dice", false).await;
        let service = MembershipService::new(&ctx);

        service.add_member(c.id, a.id, CommunityRole::Member).await.unwrap();
        service.add_member(c.id, m2.id, CommunityRole::Member).await.unwrap();
        service
            .set_role(c.id, m2.id, CommunityRole::Moderator)
            .await
            .unwrap();

        assert_eq!(ids(&service.admins(c.id).await.unwrap()), vec![owner.id]);
        assert_eq!(ids(&service.moderators(c.id).await.unwrap()), vec![m2.id]);
        assert_eq!(service.members(c.id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_set_role_inserts_and_counts() {
        let (ctx, _) = context();
        let owner = gamer(&ctx, "keeper").await;
        let player = gamer(&ctx, "player").await;
        let c = community(&ctx, &owner, "Dice", false).await;

        MembershipService::new(&ctx)
            .set_role(c.id, player.id, CommunityRole::Moderator)
            .await
            .unwrap();

        let stored = CommunityService::new(&ctx).get_community(c.id).await.unwrap();
        assert_eq!(stored.member_count, 2);
    }

    #[tokio::test]
    async fn test_get_role_for_stranger() {
        let (ctx, _) = context();
        let owner = gamer(&ctx, "keeper").await;
        let stranger = gamer(&ctx, "stranger").await;
        let c = community(&ctx, &owner, "Dice", false).await;

        let err = MembershipService::new(&ctx)
            .get_role(c.id, stranger.id)
            .await
            .unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::NotInCommunity)));
    }

    #[tokio::test]
    async fn test_promote_if_outranks() {
        let (ctx, _) = context();
        let owner = gamer(&ctx, "keeper").await;
        let player = gamer(&ctx, "player").await;
        let c = community(&ctx, &owner, "Dice", false).await;
        let service = MembershipService::new(&ctx);
        service
            .add_member(c.id, player.id, CommunityRole::Moderator)
            .await
            .unwrap();

        assert!(!service
            .promote_if_outranks(c.id, player.id, CommunityRole::Member)
            .await
            .unwrap());
        assert!(!service
            .promote_if_outranks(c.id, player.id, CommunityRole::Moderator)
            .await
            .unwrap());
        assert!(service
            .promote_if_outranks(c.id, player.id, CommunityRole::Admin)
            .await
            .unwrap());
        assert_eq!(service.get_role(c.id, player.id).await.unwrap(), "Admin");
    }

    #[tokio::test]
    async fn test_change_role_rules() {
        let (ctx, _) = context();
        let owner = gamer(&ctx, "keeper").await;
        let admin = gamer(&ctx, "admin").await;
        let player = gamer(&ctx, "player").await;
        let c = community(&ctx, &owner, "Dice", false).await;
        let service = MembershipService::new(&ctx);
        service.add_member(c.id, admin.id, CommunityRole::Admin).await.unwrap();
        service.add_member(c.id, player.id, CommunityRole::Member).await.unwrap();

        let err = service
            .change_role(player.id, c.id, admin.id, CommunityRole::Member)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "PERMISSION_DENIED");

        let err = service
            .change_role(admin.id, c.id, owner.id, CommunityRole::Member)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "PERMISSION_DENIED");
        assert_eq!(service.get_role(c.id, owner.id).await.unwrap(), "Admin");

        let updated = service
            .change_role(admin.id, c.id, player.id, CommunityRole::Moderator)
            .await
            .unwrap();
        assert_eq!(updated.role, CommunityRole::Moderator);
    }
}
