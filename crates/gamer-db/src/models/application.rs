//! Application database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for community_applications table
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationModel {
    pub id: i64,
    pub gamer_id: i64,
    pub community_id: i64,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
