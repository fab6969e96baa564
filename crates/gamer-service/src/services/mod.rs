//! Business logic services
//!
//! Each service borrows the [`ServiceContext`] and orchestrates repositories,
//! transactions, authorization, and event publishing for one area.

pub mod application;
pub mod authorization;
pub mod community;
pub mod context;
pub mod error;
pub mod friendship;
pub mod membership;
pub mod moderation;
pub mod ownership;
pub mod profile;

mod ledger;

#[cfg(test)]
pub(crate) mod testing;

// Re-export all services for convenience
pub use application::ApplicationService;
pub use authorization::{Authorizer, RuleAuthorizer};
pub use community::CommunityService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use friendship::FriendService;
pub use membership::MembershipService;
pub use moderation::ModerationService;
pub use ownership::OwnershipService;
pub use profile::ProfileService;
