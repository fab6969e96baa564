//! Domain entities - core business objects

mod application;
mod community;
mod friend_request;
mod membership;
mod moderation;
mod profile;

pub use application::{ApplicationStatus, CommunityApplication};
pub use community::{slug_candidate, slugify, GamerCommunity};
pub use friend_request::{FriendRequestStatus, GamerFriendRequest};
pub use membership::CommunityMembership;
pub use moderation::{BannedUser, KickedUser};
pub use profile::{GamerProfile, GamerStats};
