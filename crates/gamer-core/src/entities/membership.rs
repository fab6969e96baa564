//! Membership entity - a gamer's role within one community

use chrono::{DateTime, Utc};

use crate::entities::GamerStats;
use crate::error::DomainError;
use crate::value_objects::{CommunityRole, Snowflake};

/// Community membership (junction between GamerProfile and GamerCommunity)
///
/// At most one row exists per `(community_id, gamer_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityMembership {
    pub community_id: Snowflake,
    pub gamer_id: Snowflake,
    pub role: CommunityRole,
    /// Per-community statistics
    pub stats: GamerStats,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommunityMembership {
    pub fn new(community_id: Snowflake, gamer_id: Snowflake, role: CommunityRole) -> Self {
        let now = Utc::now();
        Self {
            community_id,
            gamer_id,
            role,
            stats: GamerStats::default(),
            joined_at: now,
            updated_at: now,
        }
    }

    /// Display label of the current role
    #[inline]
    pub fn role_label(&self) -> &'static str {
        self.role.label()
    }

    /// Whether this membership's role ranks strictly below `role`
    pub fn role_less_than(&self, role: &str) -> Result<bool, DomainError> {
        Ok(self.role.less_than(CommunityRole::parse(role)?))
    }

    pub fn set_role(&mut self, role: CommunityRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }
}
