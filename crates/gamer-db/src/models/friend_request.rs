//! Friend request database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for gamer_friend_requests table
#[derive(Debug, Clone, FromRow)]
pub struct FriendRequestModel {
    pub id: i64,
    pub requester_id: i64,
    pub recipient_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
