//! GamerCommunity entity <-> model mapper

use gamer_core::{DomainError, GamerCommunity, Snowflake};

use crate::models::CommunityModel;

use super::stored_role;

impl TryFrom<CommunityModel> for GamerCommunity {
    type Error = DomainError;

    fn try_from(model: CommunityModel) -> Result<Self, Self::Error> {
        Ok(GamerCommunity {
            id: Snowflake::new(model.id),
            name: model.name,
            slug: model.slug,
            description: model.description,
            owner_id: Snowflake::new(model.owner_id),
            private: model.private,
            member_count: model.member_count,
            application_approval: stored_role(&model.application_approval)?,
            invite_role: stored_role(&model.invite_role)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
