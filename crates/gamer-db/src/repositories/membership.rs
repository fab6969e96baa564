//! PostgreSQL implementation of MembershipRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use gamer_core::traits::{MembershipRepository, RepoResult};
use gamer_core::{CommunityMembership, CommunityRole, Snowflake};

use crate::models::MembershipModel;

use super::error::map_db_error;

pub(crate) const MEMBERSHIP_COLUMNS: &str = "community_id, gamer_id, community_role, \
     games_joined, games_created, games_left, games_finished, reputation_score, \
     joined_at, updated_at";

/// PostgreSQL implementation of MembershipRepository
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    /// Create a new PgMembershipRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_memberships(models: Vec<MembershipModel>) -> RepoResult<Vec<CommunityMembership>> {
    models.into_iter().map(CommunityMembership::try_from).collect()
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        community_id: Snowflake,
        gamer_id: Snowflake,
    ) -> RepoResult<Option<CommunityMembership>> {
        sqlx::query_as::<_, MembershipModel>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM community_memberships \
             WHERE community_id = $1 AND gamer_id = $2"
        ))
        .bind(community_id.into_inner())
        .bind(gamer_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .map(CommunityMembership::try_from)
        .transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_community(
        &self,
        community_id: Snowflake,
    ) -> RepoResult<Vec<CommunityMembership>> {
        let models = sqlx::query_as::<_, MembershipModel>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM community_memberships \
             WHERE community_id = $1 ORDER BY joined_at, gamer_id"
        ))
        .bind(community_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_memberships(models)
    }

    #[instrument(skip(self))]
    async fn find_by_role(
        &self,
        community_id: Snowflake,
        role: CommunityRole,
    ) -> RepoResult<Vec<CommunityMembership>> {
        let models = sqlx::query_as::<_, MembershipModel>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM community_memberships \
             WHERE community_id = $1 AND community_role = $2 ORDER BY joined_at, gamer_id"
        ))
        .bind(community_id.into_inner())
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_memberships(models)
    }

    #[instrument(skip(self))]
    async fn find_by_gamer(&self, gamer_id: Snowflake) -> RepoResult<Vec<CommunityMembership>> {
        let models = sqlx::query_as::<_, MembershipModel>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM community_memberships \
             WHERE gamer_id = $1 ORDER BY joined_at DESC"
        ))
        .bind(gamer_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_memberships(models)
    }

    #[instrument(skip(self))]
    async fn count(&self, community_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM community_memberships WHERE community_id = $1",
        )
        .bind(community_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
