//! PostgreSQL implementation of ApplicationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use gamer_core::traits::{ApplicationRepository, RepoResult};
use gamer_core::{ApplicationStatus, CommunityApplication, DomainError, Snowflake};

use crate::models::ApplicationModel;

use super::error::{map_db_error, map_foreign_key_violation};

const APPLICATION_COLUMNS: &str =
    "id, gamer_id, community_id, message, status, created_at, updated_at";

/// PostgreSQL implementation of ApplicationRepository
#[derive(Clone)]
pub struct PgApplicationRepository {
    pool: PgPool,
}

impl PgApplicationRepository {
    /// Create a new PgApplicationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<CommunityApplication>> {
        sqlx::query_as::<_, ApplicationModel>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM community_applications WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .map(CommunityApplication::try_from)
        .transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_community(
        &self,
        community_id: Snowflake,
        status: ApplicationStatus,
    ) -> RepoResult<Vec<CommunityApplication>> {
        let models = sqlx::query_as::<_, ApplicationModel>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM community_applications \
             WHERE community_id = $1 AND status = $2 ORDER BY created_at"
        ))
        .bind(community_id.into_inner())
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        models.into_iter().map(CommunityApplication::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_gamer(&self, gamer_id: Snowflake) -> RepoResult<Vec<CommunityApplication>> {
        let models = sqlx::query_as::<_, ApplicationModel>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM community_applications \
             WHERE gamer_id = $1 ORDER BY created_at DESC"
        ))
        .bind(gamer_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        models.into_iter().map(CommunityApplication::try_from).collect()
    }

    #[instrument(skip(self, application), fields(application_id = %application.id))]
    async fn create(&self, application: &CommunityApplication) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO community_applications
                (id, gamer_id, community_id, message, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(application.id.into_inner())
        .bind(application.gamer_id.into_inner())
        .bind(application.community_id.into_inner())
        .bind(&application.message)
        .bind(application.status.as_str())
        .bind(application.created_at)
        .bind(application.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_foreign_key_violation(e, || DomainError::CommunityNotFound(application.community_id))
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: Snowflake, status: ApplicationStatus) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE community_applications SET status = $2, updated_at = NOW() WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ApplicationNotFound(id));
        }
        Ok(())
    }
}
