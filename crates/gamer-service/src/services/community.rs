//! Community service
//!
//! Handles community creation, settings, and direct join/leave for public
//! communities. Every save runs the owner-admin repair in the same
//! transaction.

use chrono::Utc;
use gamer_core::events::CommunityEvent;
use gamer_core::{
    slug_candidate, slugify, CommunityMembership, CommunityRole, DomainError, DomainEvent,
    GamerCommunity, Permission, Snowflake,
};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{CreateCommunityRequest, UpdateCommunityRequest};
use crate::events::publish;

use super::application::check_eligibility;
use super::authorization::require_permission;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::ledger::ensure_owner_admin;
use super::membership::MembershipService;

/// Give up on slug allocation after this many lost races
const MAX_SLUG_RETRIES: u32 = 5;

/// Load a community or fail with `CommunityNotFound`
pub(crate) async fn fetch_community(
    ctx: &ServiceContext,
    community_id: Snowflake,
) -> ServiceResult<GamerCommunity> {
    ctx.community_repo()
        .find_by_id(community_id)
        .await?
        .ok_or_else(|| DomainError::CommunityNotFound(community_id).into())
}

/// Community service
pub struct CommunityService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommunityService<'a> {
    /// Create a new CommunityService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a community owned by `owner_id`.
    ///
    /// The owner is added as admin in the same transaction, so the new
    /// community starts with `member_count == 1`.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_community(
        &self,
        owner_id: Snowflake,
        request: CreateCommunityRequest,
    ) -> ServiceResult<GamerCommunity> {
        request.validate()?;

        self.ctx
            .profile_repo()
            .find_by_id(owner_id)
            .await?
            .ok_or(DomainError::ProfileNotFound(owner_id))?;

        let name = request.name.trim().to_string();
        let base = slugify(&name);
        let mut attempt = self.first_free_slug(&base).await?;

        let mut community =
            GamerCommunity::new(self.ctx.generate_id(), name, slug_candidate(&base, attempt), owner_id);
        community.set_description(request.description);
        community.set_private(request.private);
        community.set_thresholds(
            request.application_approval.unwrap_or(CommunityRole::Admin),
            request.invite_role.unwrap_or(CommunityRole::Member),
        );

        let mut retries = 0;
        loop {
            match self.insert_with_owner(&community).await {
                Ok(()) => break,
                // Another writer took the slug between the probe and the insert
                Err(DomainError::SlugTaken(slug)) if retries < MAX_SLUG_RETRIES => {
                    warn!(%slug, "Slug taken concurrently, retrying");
                    retries += 1;
                    attempt = self.first_free_slug(&base).await?.max(attempt + 1);
                    community.slug = slug_candidate(&base, attempt);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let community = fetch_community(self.ctx, community.id).await?;
        info!(
            community_id = %community.id,
            owner_id = %owner_id,
            slug = %community.slug,
            "Community created"
        );

        publish(
            self.ctx,
            DomainEvent::CommunityCreated(CommunityEvent {
                community_id: community.id,
                owner_id,
                timestamp: Utc::now(),
            }),
        )
        .await;

        Ok(community)
    }

    /// Get community by ID
    #[instrument(skip(self))]
    pub async fn get_community(&self, community_id: Snowflake) -> ServiceResult<GamerCommunity> {
        fetch_community(self.ctx, community_id).await
    }

    /// Get community by slug
    #[instrument(skip(self))]
    pub async fn find_by_slug(&self, slug: &str) -> ServiceResult<Option<GamerCommunity>> {
        Ok(self.ctx.community_repo().find_by_slug(slug).await?)
    }

    /// Communities the gamer belongs to
    #[instrument(skip(self))]
    pub async fn communities_for(&self, gamer_id: Snowflake) -> ServiceResult<Vec<GamerCommunity>> {
        Ok(self.ctx.community_repo().find_by_member(gamer_id).await?)
    }

    /// Update community settings. The slug never changes.
    #[instrument(skip(self, request))]
    pub async fn update_community(
        &self,
        actor_id: Snowflake,
        community_id: Snowflake,
        request: UpdateCommunityRequest,
    ) -> ServiceResult<GamerCommunity> {
        request.validate()?;

        let mut community = fetch_community(self.ctx, community_id).await?;
        require_permission(self.ctx, actor_id, Permission::EditCommunity, &community).await?;

        if let Some(name) = request.name {
            community.set_name(name.trim().to_string());
        }
        if request.description.is_some() {
            community.set_description(request.description);
        }
        if let Some(private) = request.private {
            community.set_private(private);
        }
        if request.application_approval.is_some() || request.invite_role.is_some() {
            community.set_thresholds(
                request
                    .application_approval
                    .unwrap_or(community.application_approval),
                request.invite_role.unwrap_or(community.invite_role),
            );
        }

        let mut tx = self.ctx.unit_of_work().begin().await?;
        tx.update_community(&community).await?;
        ensure_owner_admin(tx.as_mut(), &community).await?;
        tx.commit().await?;

        info!(community_id = %community_id, actor_id = %actor_id, "Community updated");
        publish(
            self.ctx,
            DomainEvent::CommunityUpdated(CommunityEvent {
                community_id,
                owner_id: community.owner_id,
                timestamp: Utc::now(),
            }),
        )
        .await;

        fetch_community(self.ctx, community_id).await
    }

    /// Join a public community directly.
    ///
    /// Runs the same eligibility checks as an application. Private
    /// communities only accept members through applications.
    #[instrument(skip(self))]
    pub async fn join_community(
        &self,
        community_id: Snowflake,
        gamer_id: Snowflake,
    ) -> ServiceResult<CommunityMembership> {
        let community = fetch_community(self.ctx, community_id).await?;
        if community.private {
            return Err(DomainError::permission_denied("community is private").into());
        }

        check_eligibility(self.ctx, community_id, gamer_id, Utc::now()).await?;

        MembershipService::new(self.ctx)
            .add_member(community_id, gamer_id, CommunityRole::Member)
            .await
    }

    /// Leave a community. The owner has to transfer ownership first.
    #[instrument(skip(self))]
    pub async fn leave_community(
        &self,
        community_id: Snowflake,
        gamer_id: Snowflake,
    ) -> ServiceResult<()> {
        let community = fetch_community(self.ctx, community_id).await?;
        if community.is_owner(gamer_id) {
            return Err(DomainError::permission_denied("owner cannot leave the community").into());
        }

        MembershipService::new(self.ctx)
            .remove_member(community_id, gamer_id)
            .await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn first_free_slug(&self, base: &str) -> ServiceResult<u32> {
        let mut attempt = 0;
        while self
            .ctx
            .community_repo()
            .slug_exists(&slug_candidate(base, attempt))
            .await?
        {
            attempt += 1;
        }
        Ok(attempt)
    }

    async fn insert_with_owner(&self, community: &GamerCommunity) -> Result<(), DomainError> {
        let mut tx = self.ctx.unit_of_work().begin().await?;
        tx.insert_community(community).await?;
        ensure_owner_admin(tx.as_mut(), community).await?;
        tx.commit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{community, context, gamer};

    #[tokio::test]
    async fn test_create_community_adds_owner_as_admin() {
        let (ctx, _) = context();
        let owner = gamer(&ctx, "keeper").await;

        let created = CommunityService::new(&ctx)
            .create_community(owner.id, CreateCommunityRequest::new("Friday Night Dice"))
            .await
            .unwrap();

        assert_eq!(created.slug, "friday-night-dice");
        assert_eq!(created.member_count, 1);
        assert_eq!(created.application_approval, CommunityRole::Admin);

        let role = MembershipService::new(&ctx)
            .get_role(created.id, owner.id)
            .await
            .unwrap();
        assert_eq!(role, "Admin");
    }

    #[tokio::test]
    async fn test_slug_collision_gets_suffix() {
        let (ctx, _) = context();
        let owner = gamer(&ctx, "keeper").await;
        let service = CommunityService::new(&ctx);

        let first = service
            .create_community(owner.id, CreateCommunityRequest::new("Dice Table"))
            .await
            .unwrap();
        let second = service
            .create_community(owner.id, CreateCommunityRequest::new("Dice  Table!"))
            .await
            .unwrap();
        let third = service
            .create_community(owner.id, CreateCommunityRequest::new("dice table?"))
            .await
            .unwrap();

        assert_eq!(first.slug, "dice-table");
        assert_eq!(second.slug, "dice-table-1");
        assert_eq!(third.slug, "dice-table-2");
        assert_eq!(
            service.find_by_slug("dice-table-1").await.unwrap().map(|c| c.id),
            Some(second.id)
        );
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let (ctx, _) = context();
        let owner = gamer(&ctx, "keeper").await;
        let service = CommunityService::new(&ctx);

        service
            .create_community(owner.id, CreateCommunityRequest::new("Dice"))
            .await
            .unwrap();
        let err = service
            .create_community(owner.id, CreateCommunityRequest::new("Dice"))
            .await
            .unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::CommunityNameTaken)));
    }

    #[tokio::test]
    async fn test_update_requires_edit_permission() {
        let (ctx, _) = context();
        let owner = gamer(&ctx, "keeper").await;
        let player = gamer(&ctx, "player").await;
        let c = community(&ctx, &owner, "Dice", false).await;
        let service = CommunityService::new(&ctx);
        service.join_community(c.id, player.id).await.unwrap();

        let request = UpdateCommunityRequest {
            private: Some(true),
            ..UpdateCommunityRequest::default()
        };
        let err = service
            .update_community(player.id, c.id, request.clone())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "PERMISSION_DENIED");

        let updated = service.update_community(owner.id, c.id, request).await.unwrap();
        assert!(updated.private);
        assert_eq!(updated.slug, c.slug);
        assert_eq!(updated.member_count, 2);
    }

    #[tokio::test]
    async fn test_join_and_leave() {
        let (ctx, _) = context();
        let owner = gamer(&ctx, "keeper").await;
        let player = gamer(&ctx, "player").await;
        let c = community(&ctx, &owner, "Dice", false).await;
        let service = CommunityService::new(&ctx);

        let membership = service.join_community(c.id, player.id).await.unwrap();
        assert_eq!(membership.role, CommunityRole::Member);
        assert_eq!(service.communities_for(player.id).await.unwrap().len(), 1);

        let err = service.join_community(c.id, player.id).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::AlreadyInCommunity)));

        service.leave_community(c.id, player.id).await.unwrap();
        assert_eq!(service.get_community(c.id).await.unwrap().member_count, 1);

        let err = service.leave_community(c.id, player.id).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::NotInCommunity)));
    }

    #[tokio::test]
    async fn test_private_join_and_owner_leave_are_denied() {
        let (ctx, _) = context();
        let owner = gamer(&ctx, "keeper").await;
        let player = gamer(&ctx, "player").await;
        let c = community(&ctx, &owner, "Secret Table", true).await;
        let service = CommunityService::new(&ctx);

        let err = service.join_community(c.id, player.id).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::PermissionDenied(_))));

        let err = service.leave_community(c.id, owner.id).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::PermissionDenied(_))));
    }
}
