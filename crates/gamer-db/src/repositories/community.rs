//! PostgreSQL implementation of CommunityRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use gamer_core::traits::{CommunityRepository, RepoResult};
use gamer_core::{GamerCommunity, Snowflake};

use crate::models::CommunityModel;

use super::error::map_db_error;

const COMMUNITY_COLUMNS: &str = "id, name, slug, description, owner_id, private, \
     member_count, application_approval, invite_role, created_at, updated_at";

/// PostgreSQL implementation of CommunityRepository
#[derive(Clone)]
pub struct PgCommunityRepository {
    pool: PgPool,
}

impl PgCommunityRepository {
    /// Create a new PgCommunityRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommunityRepository for PgCommunityRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<GamerCommunity>> {
        sqlx::query_as::<_, CommunityModel>(&format!(
            "SELECT {COMMUNITY_COLUMNS} FROM gamer_communities WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .map(GamerCommunity::try_from)
        .transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<GamerCommunity>> {
        sqlx::query_as::<_, CommunityModel>(&format!(
            "SELECT {COMMUNITY_COLUMNS} FROM gamer_communities WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .map(GamerCommunity::try_from)
        .transpose()
    }

    #[instrument(skip(self))]
    async fn slug_exists(&self, slug: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM gamer_communities WHERE slug = $1)",
        )
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn find_by_member(&self, gamer_id: Snowflake) -> RepoResult<Vec<GamerCommunity>> {
        let models = sqlx::query_as::<_, CommunityModel>(
            r"
            SELECT c.id, c.name, c.slug, c.description, c.owner_id, c.private,
                   c.member_count, c.application_approval, c.invite_role,
                   c.created_at, c.updated_at
            FROM gamer_communities c
            JOIN community_memberships m ON m.community_id = c.id
            WHERE m.gamer_id = $1
            ORDER BY m.joined_at DESC
            ",
        )
        .bind(gamer_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        models.into_iter().map(GamerCommunity::try_from).collect()
    }
}
