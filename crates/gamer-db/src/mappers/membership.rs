//! CommunityMembership entity <-> model mapper

use gamer_core::{CommunityMembership, DomainError, Snowflake};

use crate::models::MembershipModel;

use super::{stats_from_columns, stored_role};

impl TryFrom<MembershipModel> for CommunityMembership {
    type Error = DomainError;

    fn try_from(model: MembershipModel) -> Result<Self, Self::Error> {
        Ok(CommunityMembership {
            community_id: Snowflake::new(model.community_id),
            gamer_id: Snowflake::new(model.gamer_id),
            role: stored_role(&model.community_role)?,
            stats: stats_from_columns(
                model.games_joined,
                model.games_created,
                model.games_left,
                model.games_finished,
                model.reputation_score,
            ),
            joined_at: model.joined_at,
            updated_at: model.updated_at,
        })
    }
}
