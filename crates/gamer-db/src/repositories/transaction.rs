//! PostgreSQL implementation of UnitOfWork / Transaction

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tracing::{debug, instrument};

use gamer_core::traits::{RepoResult, Transaction, UnitOfWork};
use gamer_core::{
    ApplicationStatus, BannedUser, CommunityMembership, CommunityRole, DomainError,
    FriendRequestStatus, GamerCommunity, KickedUser, Snowflake,
};

use crate::models::MembershipModel;

use super::error::{map_db_error, map_foreign_key_violation, map_unique_violation};
use super::membership::MEMBERSHIP_COLUMNS;

const MEMBERSHIP_PAIR: &str = "community_memberships_pkey";
const COMMUNITY_NAME: &str = "gamer_communities_name_key";
const COMMUNITY_SLUG: &str = "gamer_communities_slug_key";

/// Opens PostgreSQL transactions from a pool
#[derive(Clone)]
pub struct PgUnitOfWork {
    pool: PgPool,
}

impl PgUnitOfWork {
    /// Create a new PgUnitOfWork
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    #[instrument(skip(self))]
    async fn begin(&self) -> RepoResult<Box<dyn Transaction>> {
        let tx = self.pool.begin().await.map_err(map_db_error)?;
        Ok(Box::new(PgTransaction { tx }))
    }
}

/// A live PostgreSQL transaction. Dropping it rolls back.
pub struct PgTransaction {
    tx: sqlx::Transaction<'static, Postgres>,
}

fn community_conflict(constraint: Option<&str>, community: &GamerCommunity) -> DomainError {
    match constraint {
        Some(COMMUNITY_SLUG) => DomainError::SlugTaken(community.slug.clone()),
        Some(COMMUNITY_NAME) => DomainError::CommunityNameTaken,
        other => DomainError::DatabaseError(format!(
            "unexpected unique violation on {}",
            other.unwrap_or("unknown constraint")
        )),
    }
}

#[async_trait]
impl Transaction for PgTransaction {
    #[instrument(skip(self, community), fields(community_id = %community.id))]
    async fn insert_community(&mut self, community: &GamerCommunity) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO gamer_communities
                (id, name, slug, description, owner_id, private, member_count,
                 application_approval, invite_role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 0, $7, $8, $9, $10)
            ",
        )
        .bind(community.id.into_inner())
        .bind(&community.name)
        .bind(&community.slug)
        .bind(&community.description)
        .bind(community.owner_id.into_inner())
        .bind(community.private)
        .bind(community.application_approval.as_str())
        .bind(community.invite_role.as_str())
        .bind(community.created_at)
        .bind(community.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_unique_violation(e, |c| community_conflict(c, community)))?;

        Ok(())
    }

    #[instrument(skip(self, community), fields(community_id = %community.id))]
    async fn update_community(&mut self, community: &GamerCommunity) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE gamer_communities
            SET name = $2, slug = $3, description = $4, owner_id = $5, private = $6,
                application_approval = $7, invite_role = $8, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(community.id.into_inner())
        .bind(&community.name)
        .bind(&community.slug)
        .bind(&community.description)
        .bind(community.owner_id.into_inner())
        .bind(community.private)
        .bind(community.application_approval.as_str())
        .bind(community.invite_role.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_unique_violation(e, |c| community_conflict(c, community)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CommunityNotFound(community.id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn adjust_member_count(&mut self, community_id: Snowflake, delta: i64) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE gamer_communities SET member_count = member_count + $2 WHERE id = $1
            ",
        )
        .bind(community_id.into_inner())
        .bind(delta)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CommunityNotFound(community_id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_membership(
        &mut self,
        community_id: Snowflake,
        gamer_id: Snowflake,
    ) -> RepoResult<Option<CommunityMembership>> {
        sqlx::query_as::<_, MembershipModel>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM community_memberships \
             WHERE community_id = $1 AND gamer_id = $2"
        ))
        .bind(community_id.into_inner())
        .bind(gamer_id.into_inner())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?
        .map(CommunityMembership::try_from)
        .transpose()
    }

    #[instrument(skip(self, membership), fields(
        community_id = %membership.community_id,
        gamer_id = %membership.gamer_id,
    ))]
    async fn insert_membership(&mut self, membership: &CommunityMembership) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO community_memberships
                (community_id, gamer_id, community_role, games_joined, games_created,
                 games_left, games_finished, reputation_score, joined_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(membership.community_id.into_inner())
        .bind(membership.gamer_id.into_inner())
        .bind(membership.role.as_str())
        .bind(membership.stats.games_joined)
        .bind(membership.stats.games_created)
        .bind(membership.stats.games_left)
        .bind(membership.stats.games_finished)
        .bind(membership.stats.reputation_score)
        .bind(membership.joined_at)
        .bind(membership.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, |constraint| match constraint {
                Some(MEMBERSHIP_PAIR) | None => DomainError::AlreadyInCommunity,
                Some(other) => {
                    DomainError::DatabaseError(format!("unexpected unique violation on {other}"))
                }
            })
        })?;

        debug!("Membership row inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_membership(
        &mut self,
        community_id: Snowflake,
        gamer_id: Snowflake,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            "DELETE FROM community_memberships WHERE community_id = $1 AND gamer_id = $2",
        )
        .bind(community_id.into_inner())
        .bind(gamer_id.into_inner())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotInCommunity);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_membership_role(
        &mut self,
        community_id: Snowflake,
        gamer_id: Snowflake,
        role: CommunityRole,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE community_memberships
            SET community_role = $3, updated_at = NOW()
            WHERE community_id = $1 AND gamer_id = $2
            ",
        )
        .bind(community_id.into_inner())
        .bind(gamer_id.into_inner())
        .bind(role.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotInCommunity);
        }
        Ok(())
    }

    #[instrument(skip(self, kick), fields(kick_id = %kick.id))]
    async fn insert_kick(&mut self, kick: &KickedUser) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO kicked_users
                (id, community_id, kicker_id, gamer_id, reason, end_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(kick.id.into_inner())
        .bind(kick.community_id.into_inner())
        .bind(kick.kicker_id.into_inner())
        .bind(kick.gamer_id.into_inner())
        .bind(&kick.reason)
        .bind(kick.end_date)
        .bind(kick.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::CommunityNotFound(kick.community_id)))?;

        Ok(())
    }

    #[instrument(skip(self, ban), fields(ban_id = %ban.id))]
    async fn insert_ban(&mut self, ban: &BannedUser) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO banned_users (id, community_id, banner_id, gamer_id, reason, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(ban.id.into_inner())
        .bind(ban.community_id.into_inner())
        .bind(ban.banner_id.into_inner())
        .bind(ban.gamer_id.into_inner())
        .bind(&ban.reason)
        .bind(ban.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::CommunityNotFound(ban.community_id)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_application_status(
        &mut self,
        application_id: Snowflake,
        status: ApplicationStatus,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE community_applications SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(application_id.into_inner())
        .bind(status.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ApplicationNotFound(application_id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_friend_request_status(
        &mut self,
        request_id: Snowflake,
        status: FriendRequestStatus,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE gamer_friend_requests SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(request_id.into_inner())
        .bind(status.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::FriendRequestNotFound(request_id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_friend(&mut self, a: Snowflake, b: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO gamer_friends (profile_id, friend_id)
            VALUES ($1, $2), ($2, $1)
            ON CONFLICT (profile_id, friend_id) DO NOTHING
            ",
        )
        .bind(a.into_inner())
        .bind(b.into_inner())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::ProfileNotFound(b)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_friend(&mut self, a: Snowflake, b: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r"
            DELETE FROM gamer_friends
            WHERE (profile_id = $1 AND friend_id = $2) OR (profile_id = $2 AND friend_id = $1)
            ",
        )
        .bind(a.into_inner())
        .bind(b.into_inner())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await.map_err(map_db_error)
    }
}
