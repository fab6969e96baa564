//! Domain events - emitted after a community state transition commits
//!
//! Used by the notification layer (in-app notices, mail fan-out) and for
//! audit logging. An event is only published once its transaction has
//! committed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{CommunityRole, Snowflake};

/// All possible domain events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    // =========================================================================
    // Community Events
    // =========================================================================
    CommunityCreated(CommunityEvent),
    CommunityUpdated(CommunityEvent),
    OwnershipTransferred(OwnershipTransferredEvent),

    // =========================================================================
    // Membership Events
    // =========================================================================
    MemberJoined(MembershipEvent),
    MemberLeft(MembershipEvent),
    RoleChanged(RoleChangedEvent),
    MemberKicked(ModerationEvent),
    MemberBanned(ModerationEvent),
    MemberUnbanned(ModerationEvent),

    // =========================================================================
    // Application Events
    // =========================================================================
    ApplicationSubmitted(ApplicationEvent),
    ApplicationApproved(ApplicationEvent),
    ApplicationRejected(ApplicationEvent),

    // =========================================================================
    // Friendship Events
    // =========================================================================
    FriendRequestSent(FriendRequestEvent),
    FriendRequestAccepted(FriendRequestEvent),
    FriendRequestDenied(FriendRequestEvent),
}

impl DomainEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CommunityCreated(_) => "COMMUNITY_CREATED",
            Self::CommunityUpdated(_) => "COMMUNITY_UPDATED",
            Self::OwnershipTransferred(_) => "OWNERSHIP_TRANSFERRED",
            Self::MemberJoined(_) => "MEMBER_JOINED",
            Self::MemberLeft(_) => "MEMBER_LEFT",
            Self::RoleChanged(_) => "ROLE_CHANGED",
            Self::MemberKicked(_) => "MEMBER_KICKED",
            Self::MemberBanned(_) => "MEMBER_BANNED",
            Self::MemberUnbanned(_) => "MEMBER_UNBANNED",
            Self::ApplicationSubmitted(_) => "APPLICATION_SUBMITTED",
            Self::ApplicationApproved(_) => "APPLICATION_APPROVED",
            Self::ApplicationRejected(_) => "APPLICATION_REJECTED",
            Self::FriendRequestSent(_) => "FRIEND_REQUEST_SENT",
            Self::FriendRequestAccepted(_) => "FRIEND_REQUEST_ACCEPTED",
            Self::FriendRequestDenied(_) => "FRIEND_REQUEST_DENIED",
        }
    }

    /// Community the event belongs to, if any
    pub fn community_id(&self) -> Option<Snowflake> {
        match self {
            Self::CommunityCreated(e) | Self::CommunityUpdated(e) => Some(e.community_id),
            Self::OwnershipTransferred(e) => Some(e.community_id),
            Self::MemberJoined(e) | Self::MemberLeft(e) => Some(e.community_id),
            Self::RoleChanged(e) => Some(e.community_id),
            Self::MemberKicked(e) | Self::MemberBanned(e) | Self::MemberUnbanned(e) => {
                Some(e.community_id)
            }
            Self::ApplicationSubmitted(e)
            | Self::ApplicationApproved(e)
            | Self::ApplicationRejected(e) => Some(e.community_id),
            Self::FriendRequestSent(_)
            | Self::FriendRequestAccepted(_)
            | Self::FriendRequestDenied(_) => None,
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::CommunityCreated(e) | Self::CommunityUpdated(e) => e.timestamp,
            Self::OwnershipTransferred(e) => e.timestamp,
            Self::MemberJoined(e) | Self::MemberLeft(e) => e.timestamp,
            Self::RoleChanged(e) => e.timestamp,
            Self::MemberKicked(e) | Self::MemberBanned(e) | Self::MemberUnbanned(e) => e.timestamp,
            Self::ApplicationSubmitted(e)
            | Self::ApplicationApproved(e)
            | Self::ApplicationRejected(e) => e.timestamp,
            Self::FriendRequestSent(e)
            | Self::FriendRequestAccepted(e)
            | Self::FriendRequestDenied(e) => e.timestamp,
        }
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityEvent {
    pub community_id: Snowflake,
    pub owner_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipTransferredEvent {
    pub community_id: Snowflake,
    pub previous_owner_id: Snowflake,
    pub new_owner_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipEvent {
    pub community_id: Snowflake,
    pub gamer_id: Snowflake,
    pub role: CommunityRole,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleChangedEvent {
    pub community_id: Snowflake,
    pub gamer_id: Snowflake,
    pub previous_role: Option<CommunityRole>,
    pub role: CommunityRole,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationEvent {
    pub community_id: Snowflake,
    pub gamer_id: Snowflake,
    pub actor_id: Snowflake,
    pub reason: Option<String>,
    pub until: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationEvent {
    pub application_id: Snowflake,
    pub community_id: Snowflake,
    pub gamer_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRequestEvent {
    pub request_id: Snowflake,
    pub requester_id: Snowflake,
    pub recipient_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Event Creation Helpers
// ============================================================================

impl MembershipEvent {
    pub fn new(community_id: Snowflake, gamer_id: Snowflake, role: CommunityRole) -> Self {
        Self {
            community_id,
            gamer_id,
            role,
            timestamp: Utc::now(),
        }
    }
}

impl ApplicationEvent {
    pub fn new(application_id: Snowflake, community_id: Snowflake, gamer_id: Snowflake) -> Self {
        Self {
            application_id,
            community_id,
            gamer_id,
            timestamp: Utc::now(),
        }
    }
}

impl FriendRequestEvent {
    pub fn new(request_id: Snowflake, requester_id: Snowflake, recipient_id: Snowflake) -> Self {
        Self {
            request_id,
            requester_id,
            recipient_id,
            timestamp: Utc::now(),
        }
    }
}
