//! Application, moderation, and friend request mappers

use gamer_core::{
    ApplicationStatus, BannedUser, CommunityApplication, DomainError, FriendRequestStatus,
    GamerFriendRequest, KickedUser, Snowflake,
};

use crate::models::{ApplicationModel, BanModel, FriendRequestModel, KickModel};

impl TryFrom<ApplicationModel> for CommunityApplication {
    type Error = DomainError;

    fn try_from(model: ApplicationModel) -> Result<Self, Self::Error> {
        let status = ApplicationStatus::parse(&model.status)
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;
        Ok(CommunityApplication {
            id: Snowflake::new(model.id),
            gamer_id: Snowflake::new(model.gamer_id),
            community_id: Snowflake::new(model.community_id),
            message: model.message,
            status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<FriendRequestModel> for GamerFriendRequest {
    type Error = DomainError;

    fn try_from(model: FriendRequestModel) -> Result<Self, Self::Error> {
        let status = FriendRequestStatus::parse(&model.status)
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;
        Ok(GamerFriendRequest {
            id: Snowflake::new(model.id),
            requester_id: Snowflake::new(model.requester_id),
            recipient_id: Snowflake::new(model.recipient_id),
            status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<KickModel> for KickedUser {
    fn from(model: KickModel) -> Self {
        KickedUser {
            id: Snowflake::new(model.id),
            community_id: Snowflake::new(model.community_id),
            kicker_id: Snowflake::new(model.kicker_id),
            gamer_id: Snowflake::new(model.gamer_id),
            reason: model.reason,
            end_date: model.end_date,
            created_at: model.created_at,
        }
    }
}

impl From<BanModel> for BannedUser {
    fn from(model: BanModel) -> Self {
        BannedUser {
            id: Snowflake::new(model.id),
            community_id: Snowflake::new(model.community_id),
            banner_id: Snowflake::new(model.banner_id),
            gamer_id: Snowflake::new(model.gamer_id),
            reason: model.reason,
            created_at: model.created_at,
        }
    }
}
