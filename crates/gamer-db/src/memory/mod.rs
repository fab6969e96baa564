//! In-memory store
//!
//! Implements every repository and transaction port on shared tables guarded
//! by a mutex. Uniqueness and not-found rules match the SQL schema, and
//! transactions publish all of their writes or none of them. Used by the
//! service tests and for running the workflows without a database.

mod state;
mod transaction;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use gamer_core::traits::{
    ApplicationRepository, CommunityRepository, FriendRequestRepository, MembershipRepository,
    ModerationRepository, ProfileRepository, RepoResult, Transaction, UnitOfWork,
};
use gamer_core::{
    ApplicationStatus, BannedUser, CommunityApplication, CommunityMembership, CommunityRole,
    DomainError, FriendRequestStatus, GamerCommunity, GamerFriendRequest, GamerProfile,
    KickedUser, Snowflake,
};

use state::MemoryState;
pub use transaction::MemoryTransaction;

/// Shared in-memory tables. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&MemoryState) -> T) -> T {
        f(&self.state.lock())
    }

    fn write<T>(&self, f: impl FnOnce(&mut MemoryState) -> T) -> T {
        f(&mut self.state.lock())
    }
}

fn sorted_memberships<'a>(
    rows: impl Iterator<Item = &'a CommunityMembership>,
) -> Vec<CommunityMembership> {
    let mut rows: Vec<_> = rows.cloned().collect();
    rows.sort_by_key(|m| (m.joined_at, m.gamer_id));
    rows
}

#[async_trait]
impl UnitOfWork for MemoryStore {
    async fn begin(&self) -> RepoResult<Box<dyn Transaction>> {
        Ok(Box::new(MemoryTransaction::new(Arc::clone(&self.state))))
    }
}

// ============================================================================
// Profiles
// ============================================================================

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<GamerProfile>> {
        Ok(self.read(|s| s.profiles.get(&id).cloned()))
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<GamerProfile>> {
        Ok(self.read(|s| s.profiles.values().find(|p| p.username == username).cloned()))
    }

    async fn create(&self, profile: &GamerProfile) -> RepoResult<()> {
        self.write(|s| {
            if s.profiles.values().any(|p| p.username == profile.username) {
                return Err(DomainError::UsernameTaken);
            }
            s.profiles.insert(profile.id, profile.clone());
            Ok(())
        })
    }
}

// ============================================================================
// Communities
// ============================================================================

#[async_trait]
impl CommunityRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<GamerCommunity>> {
        Ok(self.read(|s| s.communities.get(&id).cloned()))
    }

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<GamerCommunity>> {
        Ok(self.read(|s| s.communities.values().find(|c| c.slug == slug).cloned()))
    }

    async fn slug_exists(&self, slug: &str) -> RepoResult<bool> {
        Ok(self.read(|s| s.communities.values().any(|c| c.slug == slug)))
    }

    async fn find_by_member(&self, gamer_id: Snowflake) -> RepoResult<Vec<GamerCommunity>> {
        Ok(self.read(|s| {
            s.memberships
                .values()
                .filter(|m| m.gamer_id == gamer_id)
                .filter_map(|m| s.communities.get(&m.community_id).cloned())
                .collect()
        }))
    }
}

// ============================================================================
// Memberships
// ============================================================================

#[async_trait]
impl MembershipRepository for MemoryStore {
    async fn find(
        &self,
        community_id: Snowflake,
        gamer_id: Snowflake,
    ) -> RepoResult<Option<CommunityMembership>> {
        Ok(self.read(|s| s.memberships.get(&(community_id, gamer_id)).cloned()))
    }

    async fn find_by_community(
        &self,
        community_id: Snowflake,
    ) -> RepoResult<Vec<CommunityMembership>> {
        Ok(self.read(|s| {
            sorted_memberships(s.memberships.values().filter(|m| m.community_id == community_id))
        }))
    }

    async fn find_by_role(
        &self,
        community_id: Snowflake,
        role: CommunityRole,
    ) -> RepoResult<Vec<CommunityMembership>> {
        Ok(self.read(|s| {
            sorted_memberships(
                s.memberships
                    .values()
                    .filter(|m| m.community_id == community_id && m.role == role),
            )
        }))
    }

    async fn find_by_gamer(&self, gamer_id: Snowflake) -> RepoResult<Vec<CommunityMembership>> {
        Ok(self.read(|s| sorted_memberships(s.memberships.values().filter(|m| m.gamer_id == gamer_id))))
    }

    async fn count(&self, community_id: Snowflake) -> RepoResult<i64> {
        let rows = self.read(|s| {
            s.memberships
                .keys()
                .filter(|(community, _)| *community == community_id)
                .count()
        });
        i64::try_from(rows).map_err(|e| DomainError::InternalError(e.to_string()))
    }
}

// ============================================================================
// Applications
// ============================================================================

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<CommunityApplication>> {
        Ok(self.read(|s| s.applications.get(&id).cloned()))
    }

    async fn find_by_community(
        &self,
        community_id: Snowflake,
        status: ApplicationStatus,
    ) -> RepoResult<Vec<CommunityApplication>> {
        Ok(self.read(|s| {
            s.applications
                .values()
                .filter(|a| a.community_id == community_id && a.status == status)
                .cloned()
                .collect()
        }))
    }

    async fn find_by_gamer(&self, gamer_id: Snowflake) -> RepoResult<Vec<CommunityApplication>> {
        Ok(self.read(|s| {
            s.applications
                .values()
                .filter(|a| a.gamer_id == gamer_id)
                .cloned()
                .collect()
        }))
    }

    async fn create(&self, application: &CommunityApplication) -> RepoResult<()> {
        self.write(|s| {
            if !s.communities.contains_key(&application.community_id) {
                return Err(DomainError::CommunityNotFound(application.community_id));
            }
            s.applications.insert(application.id, application.clone());
            Ok(())
        })
    }

    async fn update_status(&self, id: Snowflake, status: ApplicationStatus) -> RepoResult<()> {
        self.write(|s| {
            s.applications
                .get_mut(&id)
                .ok_or(DomainError::ApplicationNotFound(id))?
                .set_status(status);
            Ok(())
        })
    }
}

// ============================================================================
// Moderation
// ============================================================================

#[async_trait]
impl ModerationRepository for MemoryStore {
    async fn is_banned(&self, community_id: Snowflake, gamer_id: Snowflake) -> RepoResult<bool> {
        Ok(self.read(|s| {
            s.bans
                .iter()
                .any(|b| b.community_id == community_id && b.gamer_id == gamer_id)
        }))
    }

    async fn has_active_suspension(
        &self,
        community_id: Snowflake,
        gamer_id: Snowflake,
        now: DateTime<Utc>,
    ) -> RepoResult<bool> {
        Ok(self.read(|s| {
            s.kicks.iter().any(|k| {
                k.community_id == community_id && k.gamer_id == gamer_id && k.is_active_at(now)
            })
        }))
    }

    async fn find_bans(&self, community_id: Snowflake) -> RepoResult<Vec<BannedUser>> {
        Ok(self.read(|s| {
            s.bans
                .iter()
                .rev()
                .filter(|b| b.community_id == community_id)
                .cloned()
                .collect()
        }))
    }

    async fn find_kicks(&self, community_id: Snowflake) -> RepoResult<Vec<KickedUser>> {
        Ok(self.read(|s| {
            s.kicks
                .iter()
                .rev()
                .filter(|k| k.community_id == community_id)
                .cloned()
                .collect()
        }))
    }

    async fn delete_bans(&self, community_id: Snowflake, gamer_id: Snowflake) -> RepoResult<u64> {
        Ok(self.write(|s| {
            let before = s.bans.len();
            s.bans
                .retain(|b| !(b.community_id == community_id && b.gamer_id == gamer_id));
            (before - s.bans.len()) as u64
        }))
    }
}

// ============================================================================
// Friend Requests
// ============================================================================

#[async_trait]
impl FriendRequestRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<GamerFriendRequest>> {
        Ok(self.read(|s| s.friend_requests.get(&id).cloned()))
    }

    async fn find_pending_for(
        &self,
        recipient_id: Snowflake,
    ) -> RepoResult<Vec<GamerFriendRequest>> {
        Ok(self.read(|s| {
            s.friend_requests
                .values()
                .filter(|r| r.recipient_id == recipient_id && r.status == FriendRequestStatus::New)
                .cloned()
                .collect()
        }))
    }

    async fn create(&self, request: &GamerFriendRequest) -> RepoResult<()> {
        self.write(|s| {
            for id in [request.requester_id, request.recipient_id] {
                if !s.profiles.contains_key(&id) {
                    return Err(DomainError::ProfileNotFound(id));
                }
            }
            s.friend_requests.insert(request.id, request.clone());
            Ok(())
        })
    }
}
