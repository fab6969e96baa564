//! Authorization rules - composable predicates over a community and an actor
//!
//! A [`Rule`] is a small expression tree (`Leaf`, `And`, `Or`, `Not`) that is
//! evaluated against a [`RuleContext`]. Each [`Permission`] maps to one rule.
//! Callers look up the actor's role; the rule itself performs no I/O.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::GamerCommunity;
use crate::value_objects::{CommunityRole, Snowflake};

/// Everything a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub actor_id: Snowflake,
    /// Actor's role in the community, `None` when not a member
    pub actor_role: Option<CommunityRole>,
    pub community: &'a GamerCommunity,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        actor_id: Snowflake,
        actor_role: Option<CommunityRole>,
        community: &'a GamerCommunity,
    ) -> Self {
        Self {
            actor_id,
            actor_role,
            community,
        }
    }
}

/// Leaf predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    IsOwner,
    IsMember,
    RoleAtLeast(CommunityRole),
    /// Actor role meets the community's application approval threshold
    MeetsApprovalThreshold,
    /// Actor role meets the community's invite threshold
    MeetsInviteThreshold,
}

impl Predicate {
    fn check(self, ctx: &RuleContext<'_>) -> bool {
        match self {
            Self::IsOwner => ctx.community.is_owner(ctx.actor_id),
            Self::IsMember => ctx.actor_role.is_some(),
            Self::RoleAtLeast(floor) => ctx.actor_role.is_some_and(|role| role.at_least(floor)),
            Self::MeetsApprovalThreshold => ctx
                .actor_role
                .is_some_and(|role| role.at_least(ctx.community.application_approval)),
            Self::MeetsInviteThreshold => ctx
                .actor_role
                .is_some_and(|role| role.at_least(ctx.community.invite_role)),
        }
    }
}

/// Boolean composition of predicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Leaf(Predicate),
    And(Box<Rule>, Box<Rule>),
    Or(Box<Rule>, Box<Rule>),
    Not(Box<Rule>),
}

impl Rule {
    pub fn leaf(predicate: Predicate) -> Self {
        Self::Leaf(predicate)
    }

    pub fn and(self, other: Rule) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Rule) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> bool {
        match self {
            Self::Leaf(predicate) => predicate.check(ctx),
            Self::And(a, b) => a.evaluate(ctx) && b.evaluate(ctx),
            Self::Or(a, b) => a.evaluate(ctx) || b.evaluate(ctx),
            Self::Not(inner) => !inner.evaluate(ctx),
        }
    }
}

/// Named capabilities checked before community mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    KickUser,
    BanUser,
    ApproveApplications,
    /// Evaluates the community's stored invite threshold. No service here
    /// invites anyone; this is exposed for callers that build invites on top.
    InviteMembers,
    EditCommunity,
    ManageRoles,
    TransferOwnership,
}

impl Permission {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KickUser => "kick_user",
            Self::BanUser => "ban_user",
            Self::ApproveApplications => "approve_applications",
            Self::InviteMembers => "invite_members",
            Self::EditCommunity => "edit_community",
            Self::ManageRoles => "manage_roles",
            Self::TransferOwnership => "transfer_ownership",
        }
    }

    /// Registry entry for this permission
    pub fn rule(self) -> Rule {
        use Predicate::{IsOwner, MeetsApprovalThreshold, MeetsInviteThreshold, RoleAtLeast};

        match self {
            Self::KickUser => Rule::leaf(RoleAtLeast(CommunityRole::Moderator)),
            Self::BanUser | Self::EditCommunity | Self::ManageRoles => {
                Rule::leaf(RoleAtLeast(CommunityRole::Admin))
            }
            Self::ApproveApplications => Rule::leaf(MeetsApprovalThreshold),
            Self::InviteMembers => Rule::leaf(MeetsInviteThreshold),
            Self::TransferOwnership => Rule::leaf(IsOwner),
        }
    }

    pub fn allows(self, ctx: &RuleContext<'_>) -> bool {
        self.rule().evaluate(ctx)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn community() -> GamerCommunity {
        let mut community =
            GamerCommunity::new(Snowflake::new(1), "Dice", "dice", Snowflake::new(100));
        community.set_thresholds(CommunityRole::Moderator, CommunityRole::Member);
        community
    }

    #[test]
    fn test_kick_requires_moderator() {
        let c = community();
        let member = RuleContext::new(Snowflake::new(2), Some(CommunityRole::Member), &c);
        let moderator = RuleContext::new(Snowflake::new(3), Some(CommunityRole::Moderator), &c);
        let outsider = RuleContext::new(Snowflake::new(4), None, &c);

        assert!(!Permission::KickUser.allows(&member));
        assert!(Permission::KickUser.allows(&moderator));
        assert!(!Permission::KickUser.allows(&outsider));
    }

    #[test]
    fn test_ban_requires_admin() {
        let c = community();
        let moderator = RuleContext::new(Snowflake::new(3), Some(CommunityRole::Moderator), &c);
        let admin = RuleContext::new(Snowflake::new(5), Some(CommunityRole::Admin), &c);

        assert!(!Permission::BanUser.allows(&moderator));
        assert!(Permission::BanUser.allows(&admin));
    }

    #[test]
    fn test_thresholds_follow_community_settings() {
        let mut c = community();
        let moderator = RuleContext::new(Snowflake::new(3), Some(CommunityRole::Moderator), &c);
        assert!(Permission::ApproveApplications.allows(&moderator));

        c.set_thresholds(CommunityRole::Admin, CommunityRole::Admin);
        let moderator = RuleContext::new(Snowflake::new(3), Some(CommunityRole::Moderator), &c);
        assert!(!Permission::ApproveApplications.allows(&moderator));
        assert!(!Permission::InviteMembers.allows(&moderator));
    }

    #[test]
    fn test_transfer_requires_owner() {
        let c = community();
        let owner = RuleContext::new(Snowflake::new(100), Some(CommunityRole::Admin), &c);
        let admin = RuleContext::new(Snowflake::new(5), Some(CommunityRole::Admin), &c);

        assert!(Permission::TransferOwnership.allows(&owner));
        assert!(!Permission::TransferOwnership.allows(&admin));
    }

    #[test]
    fn test_composition() {
        let c = community();
        let admin = RuleContext::new(Snowflake::new(5), Some(CommunityRole::Admin), &c);
        let owner = RuleContext::new(Snowflake::new(100), Some(CommunityRole::Admin), &c);

        let admin_not_owner = Rule::leaf(Predicate::RoleAtLeast(CommunityRole::Admin))
            .and(Rule::leaf(Predicate::IsOwner).negate());
        assert!(admin_not_owner.evaluate(&admin));
        assert!(!admin_not_owner.evaluate(&owner));

        let member_or_owner =
            Rule::leaf(Predicate::IsMember).or(Rule::leaf(Predicate::IsOwner));
        let outsider = RuleContext::new(Snowflake::new(9), None, &c);
        assert!(member_or_owner.evaluate(&admin));
        assert!(!member_or_owner.evaluate(&outsider));
    }
}
