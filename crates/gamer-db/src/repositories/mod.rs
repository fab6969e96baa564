//! Repository implementations
//!
//! PostgreSQL implementations of the repository and transaction ports
//! defined in gamer-core.

mod application;
mod community;
mod error;
mod friend_request;
mod membership;
mod moderation;
mod profile;
mod transaction;

pub use application::PgApplicationRepository;
pub use community::PgCommunityRepository;
pub use friend_request::PgFriendRequestRepository;
pub use membership::PgMembershipRepository;
pub use moderation::PgModerationRepository;
pub use profile::PgProfileRepository;
pub use transaction::{PgTransaction, PgUnitOfWork};
