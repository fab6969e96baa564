//! GamerProfile entity <-> model mapper

use gamer_core::{GamerProfile, Snowflake};

use crate::models::ProfileModel;

use super::stats_from_columns;

/// Build a profile from its row and the ids of its friends
pub fn profile_with_friends(model: ProfileModel, friend_ids: Vec<i64>) -> GamerProfile {
    GamerProfile {
        id: Snowflake::new(model.id),
        username: model.username,
        friends: friend_ids.into_iter().map(Snowflake::new).collect(),
        stats: stats_from_columns(
            model.games_joined,
            model.games_created,
            model.games_left,
            model.games_finished,
            model.reputation_score,
        ),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
