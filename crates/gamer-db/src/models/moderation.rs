//! Kick and ban database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for kicked_users table
#[derive(Debug, Clone, FromRow)]
pub struct KickModel {
    pub id: i64,
    pub community_id: i64,
    pub kicker_id: i64,
    pub gamer_id: i64,
    pub reason: String,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Database model for banned_users table
#[derive(Debug, Clone, FromRow)]
pub struct BanModel {
    pub id: i64,
    pub community_id: i64,
    pub banner_id: i64,
    pub gamer_id: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
