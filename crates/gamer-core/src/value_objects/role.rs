//! Community roles and their fixed ordering
//!
//! Ranking is `member < moderator < admin`. Storage uses the lowercase key,
//! display uses the capitalized label.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// A gamer's role within one community
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunityRole {
    #[default]
    Member,
    Moderator,
    Admin,
}

impl CommunityRole {
    /// Every role, lowest first
    pub const ALL: [CommunityRole; 3] = [Self::Member, Self::Moderator, Self::Admin];

    #[inline]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Member => 0,
            Self::Moderator => 1,
            Self::Admin => 2,
        }
    }

    /// Storage key (`"member"`, `"moderator"`, `"admin"`)
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }

    /// Human-readable label for display
    pub const fn label(self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Moderator => "Moderator",
            Self::Admin => "Admin",
        }
    }

    /// Parse a role key, case-insensitive
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainError::InvalidRole(value.to_string()))
    }

    /// Strictly lower-ranked than `other`
    #[inline]
    pub fn less_than(self, other: CommunityRole) -> bool {
        self.rank() < other.rank()
    }

    /// Strictly higher-ranked than `other`
    #[inline]
    pub fn outranks(self, other: CommunityRole) -> bool {
        other.less_than(self)
    }

    /// Same rank as `floor` or higher
    #[inline]
    pub fn at_least(self, floor: CommunityRole) -> bool {
        !self.less_than(floor)
    }
}

/// Compare two role keys; fails when either is outside the known set
pub fn role_less_than(first: &str, second: &str) -> Result<bool, DomainError> {
    Ok(CommunityRole::parse(first)?.less_than(CommunityRole::parse(second)?))
}

impl PartialOrd for CommunityRole {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CommunityRole {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for CommunityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CommunityRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
