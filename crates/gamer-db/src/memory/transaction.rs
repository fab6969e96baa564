//! In-memory transaction: stage on a snapshot, replay on commit

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use gamer_core::traits::{RepoResult, Transaction};
use gamer_core::{
    ApplicationStatus, BannedUser, CommunityMembership, CommunityRole, FriendRequestStatus,
    GamerCommunity, KickedUser, Snowflake,
};

use super::state::{MemoryState, WriteOp};

/// Writes are applied to a private snapshot as they are issued, so
/// constraint errors surface at the call. On commit the same writes are
/// replayed against the live tables under the lock; if any of them fails
/// there, nothing is published.
pub struct MemoryTransaction {
    live: Arc<Mutex<MemoryState>>,
    staged: MemoryState,
    ops: Vec<WriteOp>,
}

impl MemoryTransaction {
    pub(crate) fn new(live: Arc<Mutex<MemoryState>>) -> Self {
        let staged = live.lock().clone();
        Self {
            live,
            staged,
            ops: Vec::new(),
        }
    }

    fn stage(&mut self, op: WriteOp) -> RepoResult<()> {
        self.staged.apply(&op)?;
        self.ops.push(op);
        Ok(())
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn insert_community(&mut self, community: &GamerCommunity) -> RepoResult<()> {
        self.stage(WriteOp::InsertCommunity(community.clone()))
    }

    async fn update_community(&mut self, community: &GamerCommunity) -> RepoResult<()> {
        self.stage(WriteOp::UpdateCommunity(community.clone()))
    }

    async fn adjust_member_count(&mut self, community_id: Snowflake, delta: i64) -> RepoResult<()> {
        self.stage(WriteOp::AdjustMemberCount(community_id, delta))
    }

    async fn find_membership(
        &mut self,
        community_id: Snowflake,
        gamer_id: Snowflake,
    ) -> RepoResult<Option<CommunityMembership>> {
        Ok(self.staged.memberships.get(&(community_id, gamer_id)).cloned())
    }

    async fn insert_membership(&mut self, membership: &CommunityMembership) -> RepoResult<()> {
        self.stage(WriteOp::InsertMembership(membership.clone()))
    }

    async fn delete_membership(
        &mut self,
        community_id: Snowflake,
        gamer_id: Snowflake,
    ) -> RepoResult<()> {
        self.stage(WriteOp::DeleteMembership(community_id, gamer_id))
    }

    async fn update_membership_role(
        &mut self,
        community_id: Snowflake,
        gamer_id: Snowflake,
        role: CommunityRole,
    ) -> RepoResult<()> {
        self.stage(WriteOp::UpdateMembershipRole(community_id, gamer_id, role))
    }

    async fn insert_kick(&mut self, kick: &KickedUser) -> RepoResult<()> {
        self.stage(WriteOp::InsertKick(kick.clone()))
    }

    async fn insert_ban(&mut self, ban: &BannedUser) -> RepoResult<()> {
        self.stage(WriteOp::InsertBan(ban.clone()))
    }

    async fn set_application_status(
        &mut self,
        application_id: Snowflake,
        status: ApplicationStatus,
    ) -> RepoResult<()> {
        self.stage(WriteOp::SetApplicationStatus(application_id, status))
    }

    async fn set_friend_request_status(
        &mut self,
        request_id: Snowflake,
        status: FriendRequestStatus,
    ) -> RepoResult<()> {
        self.stage(WriteOp::SetFriendRequestStatus(request_id, status))
    }

    async fn add_friend(&mut self, a: Snowflake, b: Snowflake) -> RepoResult<()> {
        self.stage(WriteOp::AddFriend(a, b))
    }

    async fn remove_friend(&mut self, a: Snowflake, b: Snowflake) -> RepoResult<()> {
        self.stage(WriteOp::RemoveFriend(a, b))
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let mut live = self.live.lock();
        let mut next = live.clone();
        for op in &self.ops {
            next.apply(op)?;
        }
        *live = next;
        debug!(writes = self.ops.len(), "In-memory transaction committed");
        Ok(())
    }
}
