//! Database models - SQLx-compatible structs for PostgreSQL tables

mod application;
mod community;
mod friend_request;
mod membership;
mod moderation;
mod profile;

pub use application::ApplicationModel;
pub use community::CommunityModel;
pub use friend_request::FriendRequestModel;
pub use membership::MembershipModel;
pub use moderation::{BanModel, KickModel};
pub use profile::ProfileModel;
