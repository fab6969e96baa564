//! # gamer-core
//!
//! Domain layer for gamer communities: entities, role ordering, authorization
//! rules, domain events, and the ports the persistence layer implements.
//! This crate has zero dependencies on infrastructure (database, runtime, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod rules;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    slug_candidate, slugify, ApplicationStatus, BannedUser, CommunityApplication,
    CommunityMembership, FriendRequestStatus, GamerCommunity, GamerFriendRequest, GamerProfile,
    GamerStats, KickedUser,
};
pub use error::DomainError;
pub use events::DomainEvent;
pub use rules::{Permission, Predicate, Rule, RuleContext};
pub use traits::{
    ApplicationRepository, CommunityRepository, EventPublisher, FriendRequestRepository,
    MembershipRepository, ModerationRepository, ProfileRepository, RepoResult, Transaction,
    UnitOfWork,
};
pub use value_objects::{
    role_less_than, CommunityRole, Snowflake, SnowflakeGenerator, SnowflakeParseError,
};
