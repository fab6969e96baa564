//! Community database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for gamer_communities table
#[derive(Debug, Clone, FromRow)]
pub struct CommunityModel {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub owner_id: i64,
    pub private: bool,
    pub member_count: i64,
    pub application_approval: String,
    pub invite_role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
