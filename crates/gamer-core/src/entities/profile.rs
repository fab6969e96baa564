//! Gamer profile entity - one per registered account

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Aggregate play statistics, kept per profile and per community membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GamerStats {
    pub games_joined: i32,
    pub games_created: i32,
    pub games_left: i32,
    pub games_finished: i32,
    pub reputation_score: i32,
}

/// Gamer profile entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamerProfile {
    pub id: Snowflake,
    /// Cached copy of the account username
    pub username: String,
    /// Mutual friend set; both sides always list each other
    pub friends: BTreeSet<Snowflake>,
    pub stats: GamerStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GamerProfile {
    /// Create a new profile with no friends and zeroed stats
    pub fn new(id: Snowflake, username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            username: username.into(),
            friends: BTreeSet::new(),
            stats: GamerStats::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_friend(&self, other: Snowflake) -> bool {
        self.friends.contains(&other)
    }

    /// Add a friend; returns false if already present
    pub fn add_friend(&mut self, other: Snowflake) -> bool {
        let added = self.friends.insert(other);
        if added {
            self.updated_at = Utc::now();
        }
        added
    }

    /// Remove a friend; returns false if absent
    pub fn remove_friend(&mut self, other: Snowflake) -> bool {
        let removed = self.friends.remove(&other);
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }
}
