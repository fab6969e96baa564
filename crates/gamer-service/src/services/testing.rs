//! Fixtures shared by the service tests

use gamer_core::{GamerCommunity, GamerProfile};
use gamer_db::MemoryStore;

use crate::dto::{CreateCommunityRequest, CreateProfileRequest};

use super::{CommunityService, ProfileService, ServiceContext};

pub(crate) fn context() -> (ServiceContext, MemoryStore) {
    let store = MemoryStore::new();
    (ServiceContext::in_memory(store.clone()), store)
}

pub(crate) async fn gamer(ctx: &ServiceContext, username: &str) -> GamerProfile {
    ProfileService::new(ctx)
        .create_profile(CreateProfileRequest {
            username: username.to_string(),
        })
        .await
        .unwrap()
}

pub(crate) async fn community(
    ctx: &ServiceContext,
    owner: &GamerProfile,
    name: &str,
    private: bool,
) -> GamerCommunity {
    let mut request = CreateCommunityRequest::new(name);
    request.private = private;
    CommunityService::new(ctx)
        .create_community(owner.id, request)
        .await
        .unwrap()
}
