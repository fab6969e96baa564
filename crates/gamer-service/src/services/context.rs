//! Service context - dependency container for services
//!
//! Holds the repositories, the unit of work, the authorizer, the event
//! publisher, and the id generator needed by services.

use std::sync::Arc;

use gamer_common::AppConfig;
use gamer_core::traits::{
    ApplicationRepository, CommunityRepository, EventPublisher, FriendRequestRepository,
    MembershipRepository, ModerationRepository, ProfileRepository, UnitOfWork,
};
use gamer_core::{Snowflake, SnowflakeGenerator};
use gamer_db::{
    create_pool, DatabaseConfig, MemoryStore, PgApplicationRepository, PgCommunityRepository,
    PgFriendRequestRepository, PgMembershipRepository, PgModerationRepository, PgPool,
    PgProfileRepository, PgUnitOfWork,
};
use tracing::info;

use crate::events::TracingPublisher;

use super::authorization::{Authorizer, RuleAuthorizer};
use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the container that gets passed to all services. It provides:
/// - Read repositories for every entity
/// - The unit of work that opens write transactions
/// - The authorization collaborator
/// - The event publisher notified after commits
/// - Snowflake generator for ID generation
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    profile_repo: Arc<dyn ProfileRepository>,
    community_repo: Arc<dyn CommunityRepository>,
    membership_repo: Arc<dyn MembershipRepository>,
    application_repo: Arc<dyn ApplicationRepository>,
    moderation_repo: Arc<dyn ModerationRepository>,
    friend_request_repo: Arc<dyn FriendRequestRepository>,

    // Writes
    unit_of_work: Arc<dyn UnitOfWork>,

    // Collaborators
    authorizer: Arc<dyn Authorizer>,
    publisher: Arc<dyn EventPublisher>,
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        profile_repo: Arc<dyn ProfileRepository>,
        community_repo: Arc<dyn CommunityRepository>,
        membership_repo: Arc<dyn MembershipRepository>,
        application_repo: Arc<dyn ApplicationRepository>,
        moderation_repo: Arc<dyn ModerationRepository>,
        friend_request_repo: Arc<dyn FriendRequestRepository>,
        unit_of_work: Arc<dyn UnitOfWork>,
        authorizer: Arc<dyn Authorizer>,
        publisher: Arc<dyn EventPublisher>,
        snowflake_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            profile_repo,
            community_repo,
            membership_repo,
            application_repo,
            moderation_repo,
            friend_request_repo,
            unit_of_work,
            authorizer,
            publisher,
            snowflake_generator,
        }
    }

    /// Context backed entirely by one in-memory store
    pub fn in_memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(RuleAuthorizer::new(store)),
            Arc::new(TracingPublisher::new()),
            Arc::new(SnowflakeGenerator::new(0)),
        )
    }

    /// Context backed by PostgreSQL repositories sharing one pool
    pub fn postgres(pool: PgPool, snowflake_generator: Arc<SnowflakeGenerator>) -> Self {
        let membership_repo = Arc::new(PgMembershipRepository::new(pool.clone()));
        Self::new(
            Arc::new(PgProfileRepository::new(pool.clone())),
            Arc::new(PgCommunityRepository::new(pool.clone())),
            membership_repo.clone(),
            Arc::new(PgApplicationRepository::new(pool.clone())),
            Arc::new(PgModerationRepository::new(pool.clone())),
            Arc::new(PgFriendRequestRepository::new(pool.clone())),
            Arc::new(PgUnitOfWork::new(pool)),
            Arc::new(RuleAuthorizer::new(membership_repo)),
            Arc::new(TracingPublisher::new()),
            snowflake_generator,
        )
    }

    /// Connect to the configured database and build a PostgreSQL context
    pub async fn connect(config: &AppConfig) -> ServiceResult<Self> {
        let pool = create_pool(&DatabaseConfig::from(&config.database))
            .await
            .map_err(|e| ServiceError::internal(format!("database connection failed: {e}")))?;

        info!(
            worker_id = config.snowflake.worker_id,
            "Service context connected to PostgreSQL"
        );

        Ok(Self::postgres(
            pool,
            Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)),
        ))
    }

    // === Repositories ===

    /// Get the profile repository
    pub fn profile_repo(&self) -> &dyn ProfileRepository {
        self.profile_repo.as_ref()
    }

    /// Get the community repository
    pub fn community_repo(&self) -> &dyn CommunityRepository {
        self.community_repo.as_ref()
    }

    /// Get the membership repository
    pub fn membership_repo(&self) -> &dyn MembershipRepository {
        self.membership_repo.as_ref()
    }

    /// Get the application repository
    pub fn application_repo(&self) -> &dyn ApplicationRepository {
        self.application_repo.as_ref()
    }

    /// Get the moderation repository
    pub fn moderation_repo(&self) -> &dyn ModerationRepository {
        self.moderation_repo.as_ref()
    }

    /// Get the friend request repository
    pub fn friend_request_repo(&self) -> &dyn FriendRequestRepository {
        self.friend_request_repo.as_ref()
    }

    // === Writes ===

    /// Get the unit of work used to open transactions
    pub fn unit_of_work(&self) -> &dyn UnitOfWork {
        self.unit_of_work.as_ref()
    }

    // === Collaborators ===

    /// Get the authorization collaborator
    pub fn authorizer(&self) -> &dyn Authorizer {
        self.authorizer.as_ref()
    }

    /// Get the event publisher
    pub fn publisher(&self) -> &dyn EventPublisher {
        self.publisher.as_ref()
    }

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("unit_of_work", &"...")
            .field("worker_id", &self.snowflake_generator.worker_id())
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
///
/// The authorizer defaults to [`RuleAuthorizer`] over the membership
/// repository and the publisher defaults to [`TracingPublisher`].
#[derive(Default)]
pub struct ServiceContextBuilder {
    profile_repo: Option<Arc<dyn ProfileRepository>>,
    community_repo: Option<Arc<dyn CommunityRepository>>,
    membership_repo: Option<Arc<dyn MembershipRepository>>,
    application_repo: Option<Arc<dyn ApplicationRepository>>,
    moderation_repo: Option<Arc<dyn ModerationRepository>>,
    friend_request_repo: Option<Arc<dyn FriendRequestRepository>>,
    unit_of_work: Option<Arc<dyn UnitOfWork>>,
    authorizer: Option<Arc<dyn Authorizer>>,
    publisher: Option<Arc<dyn EventPublisher>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile_repo(mut self, repo: Arc<dyn ProfileRepository>) -> Self {
        self.profile_repo = Some(repo);
        self
    }

    pub fn community_repo(mut self, repo: Arc<dyn CommunityRepository>) -> Self {
        self.community_repo = Some(repo);
        self
    }

    pub fn membership_repo(mut self, repo: Arc<dyn MembershipRepository>) -> Self {
        self.membership_repo = Some(repo);
        self
    }

    pub fn application_repo(mut self, repo: Arc<dyn ApplicationRepository>) -> Self {
        self.application_repo = Some(repo);
        self
    }

    pub fn moderation_repo(mut self, repo: Arc<dyn ModerationRepository>) -> Self {
        self.moderation_repo = Some(repo);
        self
    }

    pub fn friend_request_repo(mut self, repo: Arc<dyn FriendRequestRepository>) -> Self {
        self.friend_request_repo = Some(repo);
        self
    }

    pub fn unit_of_work(mut self, unit_of_work: Arc<dyn UnitOfWork>) -> Self {
        self.unit_of_work = Some(unit_of_work);
        self
    }

    pub fn authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let membership_repo = self
            .membership_repo
            .ok_or_else(|| ServiceError::validation("membership_repo is required"))?;
        let authorizer = self
            .authorizer
            .unwrap_or_else(|| Arc::new(RuleAuthorizer::new(membership_repo.clone())));
        let publisher = self
            .publisher
            .unwrap_or_else(|| Arc::new(TracingPublisher::new()));

        Ok(ServiceContext::new(
            self.profile_repo.ok_or_else(|| ServiceError::validation("profile_repo is required"))?,
            self.community_repo.ok_or_else(|| ServiceError::validation("community_repo is required"))?,
            membership_repo,
            self.application_repo.ok_or_else(|| ServiceError::validation("application_repo is required"))?,
            self.moderation_repo.ok_or_else(|| ServiceError::validation("moderation_repo is required"))?,
            self.friend_request_repo.ok_or_else(|| ServiceError::validation("friend_request_repo is required"))?,
            self.unit_of_work.ok_or_else(|| ServiceError::validation("unit_of_work is required"))?,
            authorizer,
            publisher,
            self.snowflake_generator.ok_or_else(|| ServiceError::validation("snowflake_generator is required"))?,
        ))
    }
}
