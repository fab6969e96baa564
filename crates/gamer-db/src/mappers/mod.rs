//! Entity to model mappers
//!
//! - `TryFrom<Model> for Entity`: convert database rows to domain objects.
//!   Enum columns that fail to parse surface as `DatabaseError`.
//! - `*_stats` helpers split `GamerStats` across its columns.

mod community;
mod membership;
mod profile;
mod workflow;

pub use profile::profile_with_friends;

use gamer_core::{CommunityRole, DomainError, GamerStats};

/// Parse a role column
pub(crate) fn stored_role(value: &str) -> Result<CommunityRole, DomainError> {
    CommunityRole::parse(value)
        .map_err(|_| DomainError::DatabaseError(format!("corrupt role column: {value}")))
}

pub(crate) fn stats_from_columns(
    games_joined: i32,
    games_created: i32,
    games_left: i32,
    games_finished: i32,
    reputation_score: i32,
) -> GamerStats {
    GamerStats {
        games_joined,
        games_created,
        games_left,
        games_finished,
        reputation_score,
    }
}
