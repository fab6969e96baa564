//! PostgreSQL implementation of FriendRequestRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use gamer_core::traits::{FriendRequestRepository, RepoResult};
use gamer_core::{DomainError, GamerFriendRequest, Snowflake};

use crate::models::FriendRequestModel;

use super::error::{map_db_error, map_foreign_key_violation};

/// PostgreSQL implementation of FriendRequestRepository
#[derive(Clone)]
pub struct PgFriendRequestRepository {
    pool: PgPool,
}

impl PgFriendRequestRepository {
    /// Create a new PgFriendRequestRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FriendRequestRepository for PgFriendRequestRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<GamerFriendRequest>> {
        sqlx::query_as::<_, FriendRequestModel>(
            r"
            SELECT id, requester_id, recipient_id, status, created_at, updated_at
            FROM gamer_friend_requests
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .map(GamerFriendRequest::try_from)
        .transpose()
    }

    #[instrument(skip(self))]
    async fn find_pending_for(
        &self,
        recipient_id: Snowflake,
    ) -> RepoResult<Vec<GamerFriendRequest>> {
        let models = sqlx::query_as::<_, FriendRequestModel>(
            r"
            SELECT id, requester_id, recipient_id, status, created_at, updated_at
            FROM gamer_friend_requests
            WHERE recipient_id = $1 AND status = 'new'
            ORDER BY created_at
            ",
        )
        .bind(recipient_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        models.into_iter().map(GamerFriendRequest::try_from).collect()
    }

    #[instrument(skip(self, request), fields(request_id = %request.id))]
    async fn create(&self, request: &GamerFriendRequest) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO gamer_friend_requests
                (id, requester_id, recipient_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(request.id.into_inner())
        .bind(request.requester_id.into_inner())
        .bind(request.recipient_id.into_inner())
        .bind(request.status.as_str())
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_foreign_key_violation(e, || DomainError::ProfileNotFound(request.recipient_id))
        })?;

        Ok(())
    }
}
