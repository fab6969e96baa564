//! Membership database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for community_memberships table
#[derive(Debug, Clone, FromRow)]
pub struct MembershipModel {
    pub community_id: i64,
    pub gamer_id: i64,
    pub community_role: String,
    pub games_joined: i32,
    pub games_created: i32,
    pub games_left: i32,
    pub games_finished: i32,
    pub reputation_score: i32,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
