//! Community entity - a named, sluggable group of gamers

use chrono::{DateTime, Utc};

use crate::value_objects::{CommunityRole, Snowflake};

/// Gamer community entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamerCommunity {
    pub id: Snowflake,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// Always holds an admin membership in this community
    pub owner_id: Snowflake,
    /// Private communities are joined through applications only
    pub private: bool,
    /// Mirrors the live membership row count
    pub member_count: i64,
    /// Lowest role allowed to approve applications
    pub application_approval: CommunityRole,
    /// Lowest role allowed to invite gamers
    pub invite_role: CommunityRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GamerCommunity {
    /// Create a public community with default thresholds and no members yet
    pub fn new(
        id: Snowflake,
        name: impl Into<String>,
        slug: impl Into<String>,
        owner_id: Snowflake,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            slug: slug.into(),
            description: None,
            owner_id,
            private: false,
            member_count: 0,
            application_approval: CommunityRole::Admin,
            invite_role: CommunityRole::Member,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_owner(&self, gamer_id: Snowflake) -> bool {
        self.owner_id == gamer_id
    }

    /// Reassign the owner field
    pub fn transfer_ownership(&mut self, new_owner_id: Snowflake) {
        self.owner_id = new_owner_id;
        self.updated_at = Utc::now();
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.updated_at = Utc::now();
    }

    pub fn set_private(&mut self, private: bool) {
        self.private = private;
        self.updated_at = Utc::now();
    }

    pub fn set_thresholds(&mut self, application_approval: CommunityRole, invite_role: CommunityRole) {
        self.application_approval = application_approval;
        self.invite_role = invite_role;
        self.updated_at = Utc::now();
    }
}

/// Derive a URL slug: lowercase ASCII alphanumerics joined by single hyphens
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        slug.push_str("community");
    }
    slug
}

/// Candidate slug for collision attempt `n` (`base`, `base-1`, `base-2`, ...)
pub fn slug_candidate(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}
