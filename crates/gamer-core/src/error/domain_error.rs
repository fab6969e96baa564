//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Membership State
    // =========================================================================
    #[error("Gamer is not a member of this community")]
    NotInCommunity,

    #[error("Gamer is already a member of this community")]
    AlreadyInCommunity,

    #[error("Gamer is currently suspended from this community")]
    CurrentlySuspended,

    #[error("Gamer is banned from this community")]
    CurrentlyBanned,

    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Gamer profile not found: {0}")]
    ProfileNotFound(Snowflake),

    #[error("Community not found: {0}")]
    CommunityNotFound(Snowflake),

    #[error("Community application not found: {0}")]
    ApplicationNotFound(Snowflake),

    #[error("Friend request not found: {0}")]
    FriendRequestNotFound(Snowflake),

    #[error("No ban on record for this gamer")]
    BanNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid community role: {0}")]
    InvalidRole(String),

    #[error("New owner must already be an admin of the community")]
    NewOwnerNotAdmin,

    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already taken")]
    UsernameTaken,

    #[error("Community name already taken")]
    CommunityNameTaken,

    #[error("Community slug already taken: {0}")]
    SlugTaken(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Create a permission denied error
    pub fn permission_denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied(reason.into())
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotInCommunity => "NOT_IN_COMMUNITY",
            Self::AlreadyInCommunity => "ALREADY_IN_COMMUNITY",
            Self::CurrentlySuspended => "CURRENTLY_SUSPENDED",
            Self::CurrentlyBanned => "CURRENTLY_BANNED",

            Self::ProfileNotFound(_) => "UNKNOWN_PROFILE",
            Self::CommunityNotFound(_) => "UNKNOWN_COMMUNITY",
            Self::ApplicationNotFound(_) => "UNKNOWN_APPLICATION",
            Self::FriendRequestNotFound(_) => "UNKNOWN_FRIEND_REQUEST",
            Self::BanNotFound => "UNKNOWN_BAN",

            Self::InvalidRole(_) => "INVALID_ROLE",
            Self::NewOwnerNotAdmin => "NEW_OWNER_NOT_ADMIN",
            Self::ValidationError(_) => "VALIDATION_ERROR",

            Self::PermissionDenied(_) => "PERMISSION_DENIED",

            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::CommunityNameTaken => "COMMUNITY_NAME_TAKEN",
            Self::SlugTaken(_) => "SLUG_TAKEN",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Membership-state rejections raised by the ledger and application checks
    pub fn is_membership_state(&self) -> bool {
        matches!(
            self,
            Self::NotInCommunity
                | Self::AlreadyInCommunity
                | Self::CurrentlySuspended
                | Self::CurrentlyBanned
        )
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotInCommunity
                | Self::ProfileNotFound(_)
                | Self::CommunityNotFound(_)
                | Self::ApplicationNotFound(_)
                | Self::FriendRequestNotFound(_)
                | Self::BanNotFound
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidRole(_) | Self::NewOwnerNotAdmin | Self::ValidationError(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied(_) | Self::CurrentlySuspended | Self::CurrentlyBanned
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyInCommunity
                | Self::UsernameTaken
                | Self::CommunityNameTaken
                | Self::SlugTaken(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DomainError::NotInCommunity.code(), "NOT_IN_COMMUNITY");
        assert_eq!(DomainError::CurrentlyBanned.code(), "CURRENTLY_BANNED");
        assert_eq!(
            DomainError::InvalidRole("owner".to_string()).code(),
            "INVALID_ROLE"
        );
    }

    #[test]
    fn test_membership_state_taxonomy() {
        assert!(DomainError::NotInCommunity.is_membership_state());
        assert!(DomainError::AlreadyInCommunity.is_membership_state());
        assert!(DomainError::CurrentlySuspended.is_membership_state());
        assert!(DomainError::CurrentlyBanned.is_membership_state());
        assert!(!DomainError::permission_denied("nope").is_membership_state());
    }

    #[test]
    fn test_classification() {
        assert!(DomainError::NotInCommunity.is_not_found());
        assert!(DomainError::AlreadyInCommunity.is_conflict());
        assert!(DomainError::CurrentlyBanned.is_authorization());
        assert!(DomainError::NewOwnerNotAdmin.is_validation());
        assert!(!DomainError::DatabaseError("x".to_string()).is_conflict());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::CommunityNotFound(Snowflake::new(77));
        assert_eq!(err.to_string(), "Community not found: 77");

        let err = DomainError::InvalidRole("owner".to_string());
        assert_eq!(err.to_string(), "Invalid community role: owner");
    }
}
