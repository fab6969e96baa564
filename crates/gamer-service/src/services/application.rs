//! Application service
//!
//! Requests to join a private community:
//!
//! ```text
//! new --submit--> review --approve--> approve
//!                 review --reject---> reject
//! ```
//!
//! Submission and approval both re-check eligibility, since a ban or kick
//! may land between the two.

use chrono::{DateTime, Utc};
use gamer_core::events::{ApplicationEvent, MembershipEvent};
use gamer_core::{
    ApplicationStatus, CommunityApplication, CommunityMembership, CommunityRole, DomainError,
    DomainEvent, Permission, Snowflake,
};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::CreateApplicationRequest;
use crate::events::publish;

use super::authorization::require_permission;
use super::community::fetch_community;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::ledger::insert_member;

/// Eligibility to become a member, checked in this order:
/// existing membership, ban, then a kick whose end date is after `now`.
///
/// A kick without an end date never counts as an active suspension.
pub(crate) async fn check_eligibility(
    ctx: &ServiceContext,
    community_id: Snowflake,
    gamer_id: Snowflake,
    now: DateTime<Utc>,
) -> ServiceResult<()> {
    if ctx
        .membership_repo()
        .find(community_id, gamer_id)
        .await?
        .is_some()
    {
        return Err(DomainError::AlreadyInCommunity.into());
    }

    let moderation = ctx.moderation_repo();
    if moderation.is_banned(community_id, gamer_id).await? {
        return Err(DomainError::CurrentlyBanned.into());
    }
    if moderation
        .has_active_suspension(community_id, gamer_id, now)
        .await?
    {
        return Err(DomainError::CurrentlySuspended.into());
    }

    Ok(())
}

/// Application service
pub struct ApplicationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ApplicationService<'a> {
    /// Create a new ApplicationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an application in `new`
    #[instrument(skip(self, request))]
    pub async fn create_application(
        &self,
        gamer_id: Snowflake,
        community_id: Snowflake,
        request: CreateApplicationRequest,
    ) -> ServiceResult<CommunityApplication> {
        request.validate()?;

        fetch_community(self.ctx, community_id).await?;
        self.ctx
            .profile_repo()
            .find_by_id(gamer_id)
            .await?
            .ok_or(DomainError::ProfileNotFound(gamer_id))?;

        let application = CommunityApplication::new(
            self.ctx.generate_id(),
            gamer_id,
            community_id,
            request.message,
        );
        self.ctx.application_repo().create(&application).await?;

        info!(application_id = %application.id, "Application created");
        Ok(application)
    }

    /// Get application by ID
    #[instrument(skip(self))]
    pub async fn get_application(&self, application_id: Snowflake) -> ServiceResult<CommunityApplication> {
        self.ctx
            .application_repo()
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| DomainError::ApplicationNotFound(application_id).into())
    }

    /// Check the applicant is still eligible right now
    pub async fn validate_application(&self, application_id: Snowflake) -> ServiceResult<()> {
        self.validate_application_at(application_id, Utc::now()).await
    }

    /// Check the applicant is eligible at `now`
    #[instrument(skip(self))]
    pub async fn validate_application_at(
        &self,
        application_id: Snowflake,
        now: DateTime<Utc>,
    ) -> ServiceResult<()> {
        let application = self.get_application(application_id).await?;
        check_eligibility(self.ctx, application.community_id, application.gamer_id, now).await
    }

    /// Validate and move to `review`
    pub async fn submit_application(&self, application_id: Snowflake) -> ServiceResult<CommunityApplication> {
        self.submit_application_at(application_id, Utc::now()).await
    }

    /// Validate at `now` and move to `review`.
    ///
    /// Allowed from `new`, `hold` or `review`; on any failure the status is
    /// untouched.
    #[instrument(skip(self))]
    pub async fn submit_application_at(
        &self,
        application_id: Snowflake,
        now: DateTime<Utc>,
    ) -> ServiceResult<CommunityApplication> {
        let mut application = self.get_application(application_id).await?;
        application.ensure_status("submit", ApplicationStatus::can_submit)?;
        check_eligibility(self.ctx, application.community_id, application.gamer_id, now).await?;

        self.ctx
            .application_repo()
            .update_status(application_id, ApplicationStatus::Review)
            .await?;
        application.set_status(ApplicationStatus::Review);

        info!(
            application_id = %application_id,
            community_id = %application.community_id,
            gamer_id = %application.gamer_id,
            "Application submitted"
        );
        publish(
            self.ctx,
            DomainEvent::ApplicationSubmitted(Self::event(&application)),
        )
        .await;

        Ok(application)
    }

    /// Approve: re-validate, then add the member and mark `approve` together
    pub async fn approve_application(
        &self,
        actor_id: Snowflake,
        application_id: Snowflake,
    ) -> ServiceResult<CommunityApplication> {
        self.approve_application_at(actor_id, application_id, Utc::now())
            .await
    }

    /// Approve a `review` application with eligibility evaluated at `now`.
    ///
    /// A failed check propagates and leaves the status unchanged.
    #[instrument(skip(self))]
    pub async fn approve_application_at(
        &self,
        actor_id: Snowflake,
        application_id: Snowflake,
        now: DateTime<Utc>,
    ) -> ServiceResult<CommunityApplication> {
        let mut application = self.get_application(application_id).await?;
        let community = fetch_community(self.ctx, application.community_id).await?;
        require_permission(self.ctx, actor_id, Permission::ApproveApplications, &community).await?;
        application.ensure_status("approve", ApplicationStatus::can_approve)?;

        check_eligibility(self.ctx, community.id, application.gamer_id, now).await?;

        let membership =
            CommunityMembership::new(community.id, application.gamer_id, CommunityRole::Member);
        let mut tx = self.ctx.unit_of_work().begin().await?;
        insert_member(tx.as_mut(), &membership).await?;
        tx.set_application_status(application_id, ApplicationStatus::Approve)
            .await?;
        tx.commit().await?;
        application.set_status(ApplicationStatus::Approve);

        info!(
            application_id = %application_id,
            community_id = %community.id,
            gamer_id = %application.gamer_id,
            actor_id = %actor_id,
            "Application approved"
        );
        publish(
            self.ctx,
            DomainEvent::MemberJoined(MembershipEvent::new(
                community.id,
                application.gamer_id,
                CommunityRole::Member,
            )),
        )
        .await;
        publish(
            self.ctx,
            DomainEvent::ApplicationApproved(Self::event(&application)),
        )
        .await;

        Ok(application)
    }

    /// Reject without any eligibility check
    #[instrument(skip(self))]
    pub async fn reject_application(
        &self,
        actor_id: Snowflake,
        application_id: Snowflake,
    ) -> ServiceResult<CommunityApplication> {
        let application = self
            .decide(actor_id, application_id, ApplicationStatus::Reject)
            .await?;

        info!(application_id = %application_id, actor_id = %actor_id, "Application rejected");
        publish(
            self.ctx,
            DomainEvent::ApplicationRejected(Self::event(&application)),
        )
        .await;

        Ok(application)
    }

    /// Park an application in `hold`
    #[instrument(skip(self))]
    pub async fn put_on_hold(
        &self,
        actor_id: Snowflake,
        application_id: Snowflake,
    ) -> ServiceResult<CommunityApplication> {
        let application = self
            .decide(actor_id, application_id, ApplicationStatus::Hold)
            .await?;
        info!(application_id = %application_id, actor_id = %actor_id, "Application on hold");
        Ok(application)
    }

    /// Applications of a community waiting in `review`
    #[instrument(skip(self))]
    pub async fn pending_applications(
        &self,
        community_id: Snowflake,
    ) -> ServiceResult<Vec<CommunityApplication>> {
        Ok(self
            .ctx
            .application_repo()
            .find_by_community(community_id, ApplicationStatus::Review)
            .await?)
    }

    /// Every application a gamer has made
    #[instrument(skip(self))]
    pub async fn applications_for(&self, gamer_id: Snowflake) -> ServiceResult<Vec<CommunityApplication>> {
        Ok(self.ctx.application_repo().find_by_gamer(gamer_id).await?)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn decide(
        &self,
        actor_id: Snowflake,
        application_id: Snowflake,
        status: ApplicationStatus,
    ) -> ServiceResult<CommunityApplication> {
        let mut application = self.get_application(application_id).await?;
        let community = fetch_community(self.ctx, application.community_id).await?;
        require_permission(self.ctx, actor_id, Permission::ApproveApplications, &community).await?;

        self.ctx
            .application_repo()
            .update_status(application_id, status)
            .await?;
        application.set_status(status);
        Ok(application)
    }

    fn event(application: &CommunityApplication) -> ApplicationEvent {
        ApplicationEvent::new(application.id, application.community_id, application.gamer_id)
    }
}
