//! Ports implemented by the persistence and notification layers

mod publisher;
mod repositories;
mod transaction;

pub use publisher::EventPublisher;
pub use repositories::{
    ApplicationRepository, CommunityRepository, FriendRequestRepository, MembershipRepository,
    ModerationRepository, ProfileRepository, RepoResult,
};
pub use transaction::{Transaction, UnitOfWork};
