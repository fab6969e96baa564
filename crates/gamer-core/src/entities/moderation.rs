//! Moderation records - kicks (optionally time-bounded) and permanent bans

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Record of a gamer removed from a community by a moderator or admin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KickedUser {
    pub id: Snowflake,
    pub community_id: Snowflake,
    pub kicker_id: Snowflake,
    pub gamer_id: Snowflake,
    pub reason: String,
    /// Earliest time the gamer may re-apply
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl KickedUser {
    pub fn new(
        id: Snowflake,
        community_id: Snowflake,
        kicker_id: Snowflake,
        gamer_id: Snowflake,
        reason: impl Into<String>,
        end_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            community_id,
            kicker_id,
            gamer_id,
            reason: reason.into(),
            end_date,
            created_at: Utc::now(),
        }
    }

    /// A suspension is active only while `end_date` is in the future.
    ///
    /// A kick without an end date never counts as active.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.end_date.is_some_and(|end| end > now)
    }
}

/// Record of a gamer permanently excluded from a community
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannedUser {
    pub id: Snowflake,
    pub community_id: Snowflake,
    pub banner_id: Snowflake,
    pub gamer_id: Snowflake,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl BannedUser {
    pub fn new(
        id: Snowflake,
        community_id: Snowflake,
        banner_id: Snowflake,
        gamer_id: Snowflake,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id,
            community_id,
            banner_id,
            gamer_id,
            reason: reason.into(),
            created_at: Utc::now(),
        }
    }
}
