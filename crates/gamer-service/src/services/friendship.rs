//! Friend service
//!
//! `new --accept--> accept` adds each profile to the other's friend set;
//! `new --deny--> reject` only records the decision. Neither transition is
//! guarded against being replayed, and duplicate requests are allowed.

use gamer_core::events::FriendRequestEvent;
use gamer_core::{
    DomainError, DomainEvent, FriendRequestStatus, GamerFriendRequest, Snowflake,
};
use tracing::{info, instrument};

use crate::events::publish;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Friend service
pub struct FriendService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FriendService<'a> {
    /// Create a new FriendService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Send a friend request
    #[instrument(skip(self))]
    pub async fn send_friend_request(
        &self,
        requester_id: Snowflake,
        recipient_id: Snowflake,
    ) -> ServiceResult<GamerFriendRequest> {
        if requester_id == recipient_id {
            return Err(
                DomainError::ValidationError("cannot send a friend request to yourself".into())
                    .into(),
            );
        }
        for id in [requester_id, recipient_id] {
            self.ctx
                .profile_repo()
                .find_by_id(id)
                .await?
                .ok_or(DomainError::ProfileNotFound(id))?;
        }

        let request = GamerFriendRequest::new(self.ctx.generate_id(), requester_id, recipient_id);
        self.ctx.friend_request_repo().create(&request).await?;

        info!(request_id = %request.id, "Friend request sent");
        publish(self.ctx, DomainEvent::FriendRequestSent(Self::event(&request))).await;

        Ok(request)
    }

    /// Get friend request by ID
    #[instrument(skip(self))]
    pub async fn get_friend_request(&self, request_id: Snowflake) -> ServiceResult<GamerFriendRequest> {
        self.ctx
            .friend_request_repo()
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| DomainError::FriendRequestNotFound(request_id).into())
    }

    /// Accept: mark `accept` and befriend both sides in one transaction
    #[instrument(skip(self))]
    pub async fn accept_friend_request(&self, request_id: Snowflake) -> ServiceResult<GamerFriendRequest> {
        let mut request = self.get_friend_request(request_id).await?;

        let mut tx = self.ctx.unit_of_work().begin().await?;
        tx.set_friend_request_status(request_id, FriendRequestStatus::Accept)
            .await?;
        tx.add_friend(request.requester_id, request.recipient_id)
            .await?;
        tx.commit().await?;
        request.set_status(FriendRequestStatus::Accept);

        info!(
            request_id = %request_id,
            requester_id = %request.requester_id,
            recipient_id = %request.recipient_id,
            "Friend request accepted"
        );
        publish(self.ctx, DomainEvent::FriendRequestAccepted(Self::event(&request))).await;

        Ok(request)
    }

    /// Deny: mark `reject`, nothing else
    #[instrument(skip(self))]
    pub async fn deny_friend_request(&self, request_id: Snowflake) -> ServiceResult<GamerFriendRequest> {
        let mut request = self.get_friend_request(request_id).await?;

        let mut tx = self.ctx.unit_of_work().begin().await?;
        tx.set_friend_request_status(request_id, FriendRequestStatus::Reject)
            .await?;
        tx.commit().await?;
        request.set_status(FriendRequestStatus::Reject);

        info!(request_id = %request_id, "Friend request denied");
        publish(self.ctx, DomainEvent::FriendRequestDenied(Self::event(&request))).await;

        Ok(request)
    }

    /// Unfriend on both sides
    #[instrument(skip(self))]
    pub async fn remove_friend(&self, gamer_id: Snowflake, friend_id: Snowflake) -> ServiceResult<()> {
        let mut tx = self.ctx.unit_of_work().begin().await?;
        tx.remove_friend(gamer_id, friend_id).await?;
        tx.commit().await?;

        info!(gamer_id = %gamer_id, friend_id = %friend_id, "Friend removed");
        Ok(())
    }

    /// Requests still waiting on the recipient
    #[instrument(skip(self))]
    pub async fn pending_friend_requests(
        &self,
        recipient_id: Snowflake,
    ) -> ServiceResult<Vec<GamerFriendRequest>> {
        Ok(self
            .ctx
            .friend_request_repo()
            .find_pending_for(recipient_id)
            .await?)
    }

    /// Friend ids of a gamer
    #[instrument(skip(self))]
    pub async fn friends(&self, gamer_id: Snowflake) -> ServiceResult<Vec<Snowflake>> {
        let profile = self
            .ctx
            .profile_repo()
            .find_by_id(gamer_id)
            .await?
            .ok_or(DomainError::ProfileNotFound(gamer_id))?;
        Ok(profile.friends.into_iter().collect())
    }

    fn event(request: &GamerFriendRequest) -> FriendRequestEvent {
        FriendRequestEvent::new(request.id, request.requester_id, request.recipient_id)
    }
}
