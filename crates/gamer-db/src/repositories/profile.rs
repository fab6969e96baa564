//! PostgreSQL implementation of ProfileRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use gamer_core::traits::{ProfileRepository, RepoResult};
use gamer_core::{DomainError, GamerProfile, Snowflake};

use crate::mappers::profile_with_friends;
use crate::models::ProfileModel;

use super::error::{map_db_error, map_unique_violation};

const PROFILE_COLUMNS: &str = "id, username, games_joined, games_created, games_left, \
     games_finished, reputation_score, created_at, updated_at";

/// PostgreSQL implementation of ProfileRepository
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    /// Create a new PgProfileRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_friends(&self, profile_id: i64) -> RepoResult<Vec<i64>> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT friend_id FROM gamer_friends WHERE profile_id = $1 ORDER BY friend_id
            ",
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn with_friends(&self, model: Option<ProfileModel>) -> RepoResult<Option<GamerProfile>> {
        match model {
            Some(model) => {
                let friends = self.load_friends(model.id).await?;
                Ok(Some(profile_with_friends(model, friends)))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<GamerProfile>> {
        let model = sqlx::query_as::<_, ProfileModel>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM gamer_profiles WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.with_friends(model).await
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<GamerProfile>> {
        let model = sqlx::query_as::<_, ProfileModel>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM gamer_profiles WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.with_friends(model).await
    }

    #[instrument(skip(self, profile), fields(profile_id = %profile.id))]
    async fn create(&self, profile: &GamerProfile) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO gamer_profiles
                (id, username, games_joined, games_created, games_left, games_finished,
                 reputation_score, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(profile.id.into_inner())
        .bind(&profile.username)
        .bind(profile.stats.games_joined)
        .bind(profile.stats.games_created)
        .bind(profile.stats.games_left)
        .bind(profile.stats.games_finished)
        .bind(profile.stats.reputation_score)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, |_| DomainError::UsernameTaken))?;

        Ok(())
    }
}
