//! Authorization service
//!
//! The capability check "may this actor do P on community C". Services call
//! [`require_permission`] before mutating; the rule tree lives in
//! `gamer_core::rules`.

use std::sync::Arc;

use async_trait::async_trait;
use gamer_core::traits::{MembershipRepository, RepoResult};
use gamer_core::{DomainError, GamerCommunity, Permission, RuleContext, Snowflake};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Authorization collaborator
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn is_allowed(
        &self,
        actor_id: Snowflake,
        permission: Permission,
        community: &GamerCommunity,
    ) -> RepoResult<bool>;
}

/// Looks up the actor's role and evaluates the permission's rule
pub struct RuleAuthorizer {
    memberships: Arc<dyn MembershipRepository>,
}

impl RuleAuthorizer {
    pub fn new(memberships: Arc<dyn MembershipRepository>) -> Self {
        Self { memberships }
    }
}

#[async_trait]
impl Authorizer for RuleAuthorizer {
    #[instrument(skip(self, community), fields(community_id = %community.id))]
    async fn is_allowed(
        &self,
        actor_id: Snowflake,
        permission: Permission,
        community: &GamerCommunity,
    ) -> RepoResult<bool> {
        let actor_role = self
            .memberships
            .find(community.id, actor_id)
            .await?
            .map(|m| m.role);

        let allowed = permission.allows(&RuleContext::new(actor_id, actor_role, community));
        debug!(?actor_role, %permission, allowed, "Authorization decision");
        Ok(allowed)
    }
}

/// Check permission and return `PermissionDenied` if refused
pub(crate) async fn require_permission(
    ctx: &ServiceContext,
    actor_id: Snowflake,
    permission: Permission,
    community: &GamerCommunity,
) -> ServiceResult<()> {
    if !ctx
        .authorizer()
        .is_allowed(actor_id, permission, community)
        .await?
    {
        return Err(DomainError::permission_denied(permission.as_str()).into());
    }
    Ok(())
}
