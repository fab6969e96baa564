//! Profile database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for gamer_profiles table
#[derive(Debug, Clone, FromRow)]
pub struct ProfileModel {
    pub id: i64,
    pub username: String,
    pub games_joined: i32,
    pub games_created: i32,
    pub games_left: i32,
    pub games_finished: i32,
    pub reputation_score: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
