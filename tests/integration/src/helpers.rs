//! Test helpers for integration tests
//!
//! [`TestWorld`] wires a service context to a store and subscribes to its
//! events, and checks the ledger invariants after each step.

use std::path::Path;
use std::sync::{Arc, LazyLock};

use anyhow::Result;
use gamer_core::traits::{CommunityRepository, MembershipRepository};
use gamer_core::{
    CommunityMembership, CommunityRole, DomainEvent, GamerCommunity, GamerProfile, Snowflake,
    SnowflakeGenerator,
};
use gamer_db::{
    run_migrations, MemoryStore, PgApplicationRepository, PgCommunityRepository,
    PgFriendRequestRepository, PgMembershipRepository, PgModerationRepository, PgPool,
    PgProfileRepository, PgUnitOfWork, MIGRATIONS_DIR,
};
use gamer_service::dto::CreateProfileRequest;
use gamer_service::{
    BroadcastPublisher, CommunityService, MembershipService, ProfileService, RuleAuthorizer,
    ServiceContext,
};
use tokio::sync::broadcast;

use crate::fixtures::community_request;

/// One generator per process so parallel tests never mint the same id.
/// gamer-db's own tests use worker 1023.
static IDS: LazyLock<Arc<SnowflakeGenerator>> =
    LazyLock::new(|| Arc::new(SnowflakeGenerator::new(1022)));

fn subscribed_publisher() -> (Arc<BroadcastPublisher>, broadcast::Receiver<DomainEvent>) {
    let publisher = BroadcastPublisher::new(1024);
    let events = publisher.subscribe();
    (Arc::new(publisher), events)
}

/// A service context plus a subscription to everything it publishes
pub struct TestWorld {
    pub ctx: ServiceContext,
    events: broadcast::Receiver<DomainEvent>,
}

impl TestWorld {
    /// World on a fresh in-memory store
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        let (publisher, events) = subscribed_publisher();

        let ctx = ServiceContext::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(RuleAuthorizer::new(store)),
            publisher,
            IDS.clone(),
        );

        Self { ctx, events }
    }

    /// World on PostgreSQL, or `None` when `DATABASE_URL` is not set
    pub async fn postgres() -> Option<Self> {
        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = PgPool::connect(&url).await.ok()?;
        run_migrations(&pool, Path::new(MIGRATIONS_DIR)).await.ok()?;

        let (publisher, events) = subscribed_publisher();
        let memberships = Arc::new(PgMembershipRepository::new(pool.clone()));
        let ctx = ServiceContext::new(
            Arc::new(PgProfileRepository::new(pool.clone())),
            Arc::new(PgCommunityRepository::new(pool.clone())),
            memberships.clone(),
            Arc::new(PgApplicationRepository::new(pool.clone())),
            Arc::new(PgModerationRepository::new(pool.clone())),
            Arc::new(PgFriendRequestRepository::new(pool.clone())),
            Arc::new(PgUnitOfWork::new(pool)),
            Arc::new(RuleAuthorizer::new(memberships)),
            publisher,
            IDS.clone(),
        );

        Some(Self { ctx, events })
    }

    /// Fresh id, also used to make names unique across runs
    pub fn next_id(&self) -> Snowflake {
        self.ctx.generate_id()
    }

    pub async fn gamer(&self, prefix: &str) -> Result<GamerProfile> {
        let username = format!("{prefix}_{}", self.next_id());
        Ok(ProfileService::new(&self.ctx)
            .create_profile(CreateProfileRequest { username })
            .await?)
    }

    pub async fn community(&self, owner: &GamerProfile, private: bool) -> Result<GamerCommunity> {
        Ok(CommunityService::new(&self.ctx)
            .create_community(owner.id, community_request(self.next_id(), private))
            .await?)
    }

    pub async fn add(
        &self,
        community: &GamerCommunity,
        gamer: &GamerProfile,
        role: CommunityRole,
    ) -> Result<CommunityMembership> {
        Ok(MembershipService::new(&self.ctx)
            .add_member(community.id, gamer.id, role)
            .await?)
    }

    /// `member_count` equals the number of membership rows
    pub async fn assert_member_count_consistent(&self, community_id: Snowflake) -> Result<i64> {
        let stored = self
            .ctx
            .community_repo()
            .find_by_id(community_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("community {community_id} missing"))?;
        let rows = self.ctx.membership_repo().count(community_id).await?;
        assert_eq!(
            stored.member_count, rows,
            "member_count drifted from the membership rows"
        );
        Ok(rows)
    }

    /// The owner holds an admin membership
    pub async fn assert_owner_is_admin(&self, community_id: Snowflake) -> Result<()> {
        let stored = self
            .ctx
            .community_repo()
            .find_by_id(community_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("community {community_id} missing"))?;
        let owner = self
            .ctx
            .membership_repo()
            .find(community_id, stored.owner_id)
            .await?;
        assert_eq!(
            owner.map(|m| m.role),
            Some(CommunityRole::Admin),
            "owner must be an admin member"
        );
        Ok(())
    }

    /// Event types published since the last call, oldest first
    pub fn drain_events(&mut self) -> Vec<&'static str> {
        let mut seen = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            seen.push(event.event_type());
        }
        seen
    }
}

/// Skip helper for PostgreSQL-backed tests
pub async fn postgres_world() -> Option<TestWorld> {
    let world = TestWorld::postgres().await;
    if world.is_none() {
        eprintln!("Skipping test: DATABASE_URL not set");
    }
    world
}
