//! # gamer-service
//!
//! Application layer: the membership ledger and the moderation, application,
//! ownership, and friendship workflows built on it.

pub mod dto;
pub mod events;
pub mod services;

pub use events::{BroadcastPublisher, TracingPublisher};
pub use services::{
    ApplicationService, Authorizer, CommunityService, FriendService, MembershipService,
    ModerationService, OwnershipService, ProfileService, RuleAuthorizer, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult,
};
