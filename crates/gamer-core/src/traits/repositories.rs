//! Repository traits (ports) - read access and single-row writes
//!
//! The domain layer defines what it needs, and the persistence layer
//! provides the implementation. Writes that touch more than one row go
//! through [`crate::traits::Transaction`] instead.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    ApplicationStatus, BannedUser, CommunityApplication, CommunityMembership, GamerCommunity,
    GamerFriendRequest, GamerProfile, KickedUser,
};
use crate::error::DomainError;
use crate::value_objects::{CommunityRole, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Profile Repository
// ============================================================================

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find profile by ID, including its friend set
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<GamerProfile>>;

    /// Find profile by username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<GamerProfile>>;

    /// Create a new profile (unique username -> `UsernameTaken`)
    async fn create(&self, profile: &GamerProfile) -> RepoResult<()>;
}

// ============================================================================
// Community Repository
// ============================================================================

#[async_trait]
pub trait CommunityRepository: Send + Sync {
    /// Find community by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<GamerCommunity>>;

    /// Find community by slug
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<GamerCommunity>>;

    /// Check if a slug is already in use
    async fn slug_exists(&self, slug: &str) -> RepoResult<bool>;

    /// List all communities a gamer is a member of
    async fn find_by_member(&self, gamer_id: Snowflake) -> RepoResult<Vec<GamerCommunity>>;
}

// ============================================================================
// Membership Repository
// ============================================================================

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Find the membership for a (community, gamer) pair
    async fn find(
        &self,
        community_id: Snowflake,
        gamer_id: Snowflake,
    ) -> RepoResult<Option<CommunityMembership>>;

    /// List all memberships of a community, oldest first
    async fn find_by_community(&self, community_id: Snowflake)
        -> RepoResult<Vec<CommunityMembership>>;

    /// List memberships of a community holding exactly `role`
    async fn find_by_role(
        &self,
        community_id: Snowflake,
        role: CommunityRole,
    ) -> RepoResult<Vec<CommunityMembership>>;

    /// List all memberships of a gamer
    async fn find_by_gamer(&self, gamer_id: Snowflake) -> RepoResult<Vec<CommunityMembership>>;

    /// Live row count for a community
    async fn count(&self, community_id: Snowflake) -> RepoResult<i64>;
}

// ============================================================================
// Application Repository
// ============================================================================

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Find application by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<CommunityApplication>>;

    /// List a community's applications in the given status
    async fn find_by_community(
        &self,
        community_id: Snowflake,
        status: ApplicationStatus,
    ) -> RepoResult<Vec<CommunityApplication>>;

    /// List all applications made by a gamer
    async fn find_by_gamer(&self, gamer_id: Snowflake) -> RepoResult<Vec<CommunityApplication>>;

    /// Create a new application
    async fn create(&self, application: &CommunityApplication) -> RepoResult<()>;

    /// Persist a status change
    async fn update_status(&self, id: Snowflake, status: ApplicationStatus) -> RepoResult<()>;
}

// ============================================================================
// Moderation Repository
// ============================================================================

#[async_trait]
pub trait ModerationRepository: Send + Sync {
    /// Check whether any ban record exists for the pair
    async fn is_banned(&self, community_id: Snowflake, gamer_id: Snowflake) -> RepoResult<bool>;

    /// Check whether a kick record with `end_date > now` exists for the pair
    async fn has_active_suspension(
        &self,
        community_id: Snowflake,
        gamer_id: Snowflake,
        now: DateTime<Utc>,
    ) -> RepoResult<bool>;

    /// List ban records of a community, newest first
    async fn find_bans(&self, community_id: Snowflake) -> RepoResult<Vec<BannedUser>>;

    /// List kick records of a community, newest first
    async fn find_kicks(&self, community_id: Snowflake) -> RepoResult<Vec<KickedUser>>;

    /// Delete every ban record for the pair, returning how many were removed
    async fn delete_bans(&self, community_id: Snowflake, gamer_id: Snowflake) -> RepoResult<u64>;
}

// ============================================================================
// Friend Request Repository
// ============================================================================

#[async_trait]
pub trait FriendRequestRepository: Send + Sync {
    /// Find friend request by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<GamerFriendRequest>>;

    /// List requests addressed to a gamer that are still `new`
    async fn find_pending_for(&self, recipient_id: Snowflake)
        -> RepoResult<Vec<GamerFriendRequest>>;

    /// Create a new friend request
    async fn create(&self, request: &GamerFriendRequest) -> RepoResult<()>;
}
