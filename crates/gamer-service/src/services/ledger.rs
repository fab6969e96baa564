//! Membership ledger primitives
//!
//! The only code that writes membership rows. Each helper runs inside the
//! caller's transaction so the row change and the `member_count` change
//! commit together.

use gamer_core::traits::{RepoResult, Transaction};
use gamer_core::{CommunityMembership, CommunityRole, GamerCommunity, Snowflake};
use tracing::debug;

/// What [`ensure_owner_admin`] had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OwnerRepair {
    Unchanged,
    Inserted,
    Promoted(CommunityRole),
}

/// Insert a membership row and count it.
///
/// A duplicate pair surfaces as `AlreadyInCommunity` from the insert itself.
pub(crate) async fn insert_member(
    tx: &mut dyn Transaction,
    membership: &CommunityMembership,
) -> RepoResult<()> {
    tx.insert_membership(membership).await?;
    tx.adjust_member_count(membership.community_id, 1).await
}

/// Delete a membership row and uncount it. `NotInCommunity` if absent.
pub(crate) async fn delete_member(
    tx: &mut dyn Transaction,
    community_id: Snowflake,
    gamer_id: Snowflake,
) -> RepoResult<()> {
    tx.delete_membership(community_id, gamer_id).await?;
    tx.adjust_member_count(community_id, -1).await
}

/// Make sure the owner holds an admin row.
///
/// Runs after every community insert/update in the same transaction. It
/// writes membership rows only, never the community, so it cannot retrigger
/// itself.
pub(crate) async fn ensure_owner_admin(
    tx: &mut dyn Transaction,
    community: &GamerCommunity,
) -> RepoResult<OwnerRepair> {
    let repair = match tx.find_membership(community.id, community.owner_id).await? {
        None => {
            let membership =
                CommunityMembership::new(community.id, community.owner_id, CommunityRole::Admin);
            insert_member(tx, &membership).await?;
            OwnerRepair::Inserted
        }
        Some(existing) if existing.role < CommunityRole::Admin => {
            tx.update_membership_role(community.id, community.owner_id, CommunityRole::Admin)
                .await?;
            OwnerRepair::Promoted(existing.role)
        }
        Some(_) => OwnerRepair::Unchanged,
    };

    if repair != OwnerRepair::Unchanged {
        debug!(
            community_id = %community.id,
            owner_id = %community.owner_id,
            ?repair,
            "Owner admin membership repaired"
        );
    }
    Ok(repair)
}
