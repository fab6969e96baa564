//! Request DTOs
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use chrono::{DateTime, Utc};
use gamer_core::CommunityRole;
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Profile Requests
// ============================================================================

/// Create gamer profile request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProfileRequest {
    #[validate(length(min = 2, max = 150, message = "Username must be 2-150 characters"))]
    pub username: String,
}

// ============================================================================
// Community Requests
// ============================================================================

/// Create community request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommunityRequest {
    #[validate(length(min = 1, max = 255, message = "Community name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub private: bool,

    /// Lowest role allowed to approve applications (defaults to admin)
    pub application_approval: Option<CommunityRole>,

    /// Lowest role allowed to invite (defaults to member)
    pub invite_role: Option<CommunityRole>,
}

impl CreateCommunityRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            private: false,
            application_approval: None,
            invite_role: None,
        }
    }

    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }
}

/// Update community request; absent fields are left alone
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCommunityRequest {
    #[validate(length(min = 1, max = 255, message = "Community name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub private: Option<bool>,

    pub application_approval: Option<CommunityRole>,

    pub invite_role: Option<CommunityRole>,
}

// ============================================================================
// Moderation Requests
// ============================================================================

/// Kick request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct KickRequest {
    #[validate(length(min = 1, max = 1000, message = "Reason must be 1-1000 characters"))]
    pub reason: String,

    /// When the gamer may apply again; `None` leaves the kick open-ended
    pub earliest_reapply: Option<DateTime<Utc>>,
}

impl KickRequest {
    pub fn new(reason: impl Into<String>, earliest_reapply: Option<DateTime<Utc>>) -> Self {
        Self {
            reason: reason.into(),
            earliest_reapply,
        }
    }
}

/// Ban request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BanRequest {
    #[validate(length(min = 1, max = 1000, message = "Reason must be 1-1000 characters"))]
    pub reason: String,
}

impl BanRequest {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Application Requests
// ============================================================================

/// Apply to a private community
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateApplicationRequest {
    #[validate(length(max = 1000, message = "Message must be at most 1000 characters"))]
    pub message: Option<String>,
}
