//! Tables of the in-memory store and the write operations applied to them

use std::collections::BTreeMap;

use chrono::Utc;

use gamer_core::traits::RepoResult;
use gamer_core::{
    ApplicationStatus, BannedUser, CommunityApplication, CommunityMembership, CommunityRole,
    DomainError, FriendRequestStatus, GamerCommunity, GamerFriendRequest, GamerProfile,
    KickedUser, Snowflake,
};

/// Every table, keyed the way the SQL schema keys it
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryState {
    pub profiles: BTreeMap<Snowflake, GamerProfile>,
    pub communities: BTreeMap<Snowflake, GamerCommunity>,
    /// Keyed by (community, gamer)
    pub memberships: BTreeMap<(Snowflake, Snowflake), CommunityMembership>,
    pub applications: BTreeMap<Snowflake, CommunityApplication>,
    pub kicks: Vec<KickedUser>,
    pub bans: Vec<BannedUser>,
    pub friend_requests: BTreeMap<Snowflake, GamerFriendRequest>,
}

/// A write staged by a transaction
#[derive(Debug, Clone)]
pub(crate) enum WriteOp {
    InsertCommunity(GamerCommunity),
    UpdateCommunity(GamerCommunity),
    AdjustMemberCount(Snowflake, i64),
    InsertMembership(CommunityMembership),
    DeleteMembership(Snowflake, Snowflake),
    UpdateMembershipRole(Snowflake, Snowflake, CommunityRole),
    InsertKick(KickedUser),
    InsertBan(BannedUser),
    SetApplicationStatus(Snowflake, ApplicationStatus),
    SetFriendRequestStatus(Snowflake, FriendRequestStatus),
    AddFriend(Snowflake, Snowflake),
    RemoveFriend(Snowflake, Snowflake),
}

impl MemoryState {
    /// Apply one write, enforcing the same constraints as the SQL schema
    pub fn apply(&mut self, op: &WriteOp) -> RepoResult<()> {
        match op {
            WriteOp::InsertCommunity(community) => {
                self.ensure_profile(community.owner_id)?;
                self.check_community_unique(community)?;
                let mut stored = community.clone();
                stored.member_count = 0;
                self.communities.insert(stored.id, stored);
            }
            WriteOp::UpdateCommunity(community) => {
                self.check_community_unique(community)?;
                let stored = self
                    .communities
                    .get_mut(&community.id)
                    .ok_or(DomainError::CommunityNotFound(community.id))?;
                let member_count = stored.member_count;
                *stored = community.clone();
                stored.member_count = member_count;
                stored.updated_at = Utc::now();
            }
            WriteOp::AdjustMemberCount(community_id, delta) => {
                let stored = self
                    .communities
                    .get_mut(community_id)
                    .ok_or(DomainError::CommunityNotFound(*community_id))?;
                let next = stored.member_count + delta;
                if next < 0 {
                    return Err(DomainError::DatabaseError(
                        "member_count would become negative".to_string(),
                    ));
                }
                stored.member_count = next;
            }
            WriteOp::InsertMembership(membership) => {
                let key = (membership.community_id, membership.gamer_id);
                if !self.communities.contains_key(&membership.community_id) {
                    return Err(DomainError::CommunityNotFound(membership.community_id));
                }
                self.ensure_profile(membership.gamer_id)?;
                if self.memberships.contains_key(&key) {
                    return Err(DomainError::AlreadyInCommunity);
                }
                self.memberships.insert(key, membership.clone());
            }
            WriteOp::DeleteMembership(community_id, gamer_id) => {
                self.memberships
                    .remove(&(*community_id, *gamer_id))
                    .ok_or(DomainError::NotInCommunity)?;
            }
            WriteOp::UpdateMembershipRole(community_id, gamer_id, role) => {
                let stored = self
                    .memberships
                    .get_mut(&(*community_id, *gamer_id))
                    .ok_or(DomainError::NotInCommunity)?;
                stored.set_role(*role);
            }
            WriteOp::InsertKick(kick) => {
                if !self.communities.contains_key(&kick.community_id) {
                    return Err(DomainError::CommunityNotFound(kick.community_id));
                }
                self.kicks.push(kick.clone());
            }
            WriteOp::InsertBan(ban) => {
                if !self.communities.contains_key(&ban.community_id) {
                    return Err(DomainError::CommunityNotFound(ban.community_id));
                }
                self.bans.push(ban.clone());
            }
            WriteOp::SetApplicationStatus(id, status) => {
                self.applications
                    .get_mut(id)
                    .ok_or(DomainError::ApplicationNotFound(*id))?
                    .set_status(*status);
            }
            WriteOp::SetFriendRequestStatus(id, status) => {
                self.friend_requests
                    .get_mut(id)
                    .ok_or(DomainError::FriendRequestNotFound(*id))?
                    .set_status(*status);
            }
            WriteOp::AddFriend(a, b) => {
                self.ensure_profile(*a)?;
                self.ensure_profile(*b)?;
                if let Some(profile) = self.profiles.get_mut(a) {
                    profile.add_friend(*b);
                }
                if let Some(profile) = self.profiles.get_mut(b) {
                    profile.add_friend(*a);
                }
            }
            WriteOp::RemoveFriend(a, b) => {
                if let Some(profile) = self.profiles.get_mut(a) {
                    profile.remove_friend(*b);
                }
                if let Some(profile) = self.profiles.get_mut(b) {
                    profile.remove_friend(*a);
                }
            }
        }
        Ok(())
    }

    fn ensure_profile(&self, id: Snowflake) -> RepoResult<()> {
        if self.profiles.contains_key(&id) {
            Ok(())
        } else {
            Err(DomainError::ProfileNotFound(id))
        }
    }

    fn check_community_unique(&self, community: &GamerCommunity) -> RepoResult<()> {
        for other in self.communities.values().filter(|c| c.id != community.id) {
            if other.name == community.name {
                return Err(DomainError::CommunityNameTaken);
            }
            if other.slug == community.slug {
                return Err(DomainError::SlugTaken(community.slug.clone()));
            }
        }
        Ok(())
    }
}
