//! Profile service
//!
//! Creates and looks up gamer profiles.

use gamer_core::{DomainError, GamerProfile, Snowflake};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::CreateProfileRequest;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Profile service
pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    /// Create a new ProfileService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a profile with an empty friend set and zeroed stats
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn create_profile(&self, request: CreateProfileRequest) -> ServiceResult<GamerProfile> {
        request.validate()?;

        let profile = GamerProfile::new(self.ctx.generate_id(), request.username.trim());
        self.ctx.profile_repo().create(&profile).await?;

        info!(gamer_id = %profile.id, "Gamer profile created");
        Ok(profile)
    }

    /// Get profile by ID
    #[instrument(skip(self))]
    pub async fn get_profile(&self, gamer_id: Snowflake) -> ServiceResult<GamerProfile> {
        self.ctx
            .profile_repo()
            .find_by_id(gamer_id)
            .await?
            .ok_or_else(|| DomainError::ProfileNotFound(gamer_id).into())
    }

    /// Look up a profile by its username
    #[instrument(skip(self))]
    pub async fn find_by_username(&self, username: &str) -> ServiceResult<Option<GamerProfile>> {
        Ok(self.ctx.profile_repo().find_by_username(username).await?)
    }
}
