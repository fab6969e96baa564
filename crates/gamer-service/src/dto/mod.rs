//! Data Transfer Objects
//!
//! Request types accepted by the services, validated with `validator`.

pub mod requests;

pub use requests::{
    BanRequest, CreateApplicationRequest, CreateCommunityRequest, CreateProfileRequest,
    KickRequest, UpdateCommunityRequest,
};
