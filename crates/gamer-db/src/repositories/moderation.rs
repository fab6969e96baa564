//! PostgreSQL implementation of ModerationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use gamer_core::traits::{ModerationRepository, RepoResult};
use gamer_core::{BannedUser, KickedUser, Snowflake};

use crate::models::{BanModel, KickModel};

use super::error::map_db_error;

/// PostgreSQL implementation of ModerationRepository
#[derive(Clone)]
pub struct PgModerationRepository {
    pool: PgPool,
}

impl PgModerationRepository {
    /// Create a new PgModerationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ModerationRepository for PgModerationRepository {
    #[instrument(skip(self))]
    async fn is_banned(&self, community_id: Snowflake, gamer_id: Snowflake) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM banned_users WHERE community_id = $1 AND gamer_id = $2
            )
            ",
        )
        .bind(community_id.into_inner())
        .bind(gamer_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn has_active_suspension(
        &self,
        community_id: Snowflake,
        gamer_id: Snowflake,
        now: DateTime<Utc>,
    ) -> RepoResult<bool> {
        // NULL end_date never compares greater, so open-ended kicks do not match
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM kicked_users
                WHERE community_id = $1 AND gamer_id = $2 AND end_date > $3
            )
            ",
        )
        .bind(community_id.into_inner())
        .bind(gamer_id.into_inner())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn find_bans(&self, community_id: Snowflake) -> RepoResult<Vec<BannedUser>> {
        let models = sqlx::query_as::<_, BanModel>(
            r"
            SELECT id, community_id, banner_id, gamer_id, reason, created_at
            FROM banned_users
            WHERE community_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(community_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(BannedUser::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_kicks(&self, community_id: Snowflake) -> RepoResult<Vec<KickedUser>> {
        let models = sqlx::query_as::<_, KickModel>(
            r"
            SELECT id, community_id, kicker_id, gamer_id, reason, end_date, created_at
            FROM kicked_users
            WHERE community_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(community_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(KickedUser::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete_bans(&self, community_id: Snowflake, gamer_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query(
            "DELETE FROM banned_users WHERE community_id = $1 AND gamer_id = $2",
        )
        .bind(community_id.into_inner())
        .bind(gamer_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
