//! Transaction ports - every multi-step mutation runs inside one of these
//!
//! A [`Transaction`] is all-or-nothing: nothing it wrote is visible until
//! [`Transaction::commit`] succeeds, and dropping it without committing
//! rolls everything back.

use async_trait::async_trait;

use crate::entities::{
    ApplicationStatus, BannedUser, CommunityMembership, FriendRequestStatus, GamerCommunity,
    KickedUser,
};
use crate::traits::RepoResult;
use crate::value_objects::{CommunityRole, Snowflake};

/// Opens transactions against the backing store
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    async fn begin(&self) -> RepoResult<Box<dyn Transaction>>;
}

#[async_trait]
pub trait Transaction: Send {
    // =========================================================================
    // Communities
    // =========================================================================

    /// Insert a community (unique name and slug)
    async fn insert_community(&mut self, community: &GamerCommunity) -> RepoResult<()>;

    /// Persist community fields. `member_count` is left alone.
    async fn update_community(&mut self, community: &GamerCommunity) -> RepoResult<()>;

    /// Add `delta` to the cached member count
    async fn adjust_member_count(&mut self, community_id: Snowflake, delta: i64)
        -> RepoResult<()>;

    // =========================================================================
    // Memberships
    // =========================================================================

    /// Read a membership through this transaction
    async fn find_membership(
        &mut self,
        community_id: Snowflake,
        gamer_id: Snowflake,
    ) -> RepoResult<Option<CommunityMembership>>;

    /// Insert a membership row.
    ///
    /// The pair's unique constraint surfaces as `AlreadyInCommunity`; no
    /// existence check is made beforehand.
    async fn insert_membership(&mut self, membership: &CommunityMembership) -> RepoResult<()>;

    /// Delete a membership row, `NotInCommunity` when none matched
    async fn delete_membership(
        &mut self,
        community_id: Snowflake,
        gamer_id: Snowflake,
    ) -> RepoResult<()>;

    /// Change the role of an existing row, `NotInCommunity` when none matched
    async fn update_membership_role(
        &mut self,
        community_id: Snowflake,
        gamer_id: Snowflake,
        role: CommunityRole,
    ) -> RepoResult<()>;

    // =========================================================================
    // Moderation Records
    // =========================================================================

    async fn insert_kick(&mut self, kick: &KickedUser) -> RepoResult<()>;

    async fn insert_ban(&mut self, ban: &BannedUser) -> RepoResult<()>;

    // =========================================================================
    // Workflows
    // =========================================================================

    async fn set_application_status(
        &mut self,
        application_id: Snowflake,
        status: ApplicationStatus,
    ) -> RepoResult<()>;

    async fn set_friend_request_status(
        &mut self,
        request_id: Snowflake,
        status: FriendRequestStatus,
    ) -> RepoResult<()>;

    /// Record `a` and `b` as friends of each other. Existing links are kept.
    async fn add_friend(&mut self, a: Snowflake, b: Snowflake) -> RepoResult<()>;

    /// Remove the friendship in both directions
    async fn remove_friend(&mut self, a: Snowflake, b: Snowflake) -> RepoResult<()>;

    /// Make every write visible at once
    async fn commit(self: Box<Self>) -> RepoResult<()>;
}
