//! # gamer-db
//!
//! Persistence layer implementing the gamer-core ports.
//!
//! ## Overview
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Model -> entity mappers
//! - PostgreSQL repositories and transactions
//! - [`MemoryStore`], an in-memory implementation with the same constraints
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gamer_db::{create_pool, DatabaseConfig, PgUnitOfWork};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     let uow = PgUnitOfWork::new(pool);
//!     // Hand `uow` to the services...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{MemoryStore, MemoryTransaction};
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool, MIGRATIONS_DIR};
pub use repositories::{
    PgApplicationRepository, PgCommunityRepository, PgFriendRequestRepository,
    PgMembershipRepository, PgModerationRepository, PgProfileRepository, PgTransaction,
    PgUnitOfWork,
};
