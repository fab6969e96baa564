//! Community membership and moderation scenarios
//!
//! Run through the service layer on the in-memory store. The tests at the
//! bottom repeat the core scenarios on PostgreSQL when DATABASE_URL is set:
//!
//! ```bash
//! cargo test -p gamer-integration-tests --test community_tests
//! ```

use chrono::{Duration, Utc};
use gamer_core::{role_less_than, ApplicationStatus, CommunityRole, DomainError};
use gamer_integration_tests::{ban, kick_until, open_kick, postgres_world, tomorrow, TestWorld};
use gamer_service::dto::CreateApplicationRequest;
use gamer_service::{
    ApplicationService, CommunityService, FriendService, MembershipService, ModerationService,
    OwnershipService, ServiceError,
};

fn domain(err: &ServiceError) -> &DomainError {
    err.as_domain().expect("expected a domain error")
}

// ============================================================================
// Invariants
// ============================================================================

#[tokio::test]
async fn test_member_count_tracks_rows_through_every_operation() {
    let world = TestWorld::in_memory();
    let owner = world.gamer("owner").await.unwrap();
    let players = [
        world.gamer("a").await.unwrap(),
        world.gamer("b").await.unwrap(),
        world.gamer("c").await.unwrap(),
        world.gamer("d").await.unwrap(),
    ];
    let c = world.community(&owner, false).await.unwrap();
    assert_eq!(world.assert_member_count_consistent(c.id).await.unwrap(), 1);

    for player in &players {
        world.add(&c, player, CommunityRole::Member).await.unwrap();
        world.assert_member_count_consistent(c.id).await.unwrap();
    }
    assert_eq!(world.assert_member_count_consistent(c.id).await.unwrap(), 5);

    let moderation = ModerationService::new(&world.ctx);
    moderation
        .kick_user(owner.id, c.id, players[0].id, kick_until(tomorrow()))
        .await
        .unwrap();
    world.assert_member_count_consistent(c.id).await.unwrap();

    moderation
        .ban_user(owner.id, c.id, players[1].id, ban())
        .await
        .unwrap();
    world.assert_member_count_consistent(c.id).await.unwrap();

    MembershipService::new(&world.ctx)
        .remove_member(c.id, players[2].id)
        .await
        .unwrap();

    // Failed operations leave the count alone too
    assert!(moderation
        .kick_user(owner.id, c.id, players[2].id, open_kick())
        .await
        .is_err());
    assert!(world.add(&c, &players[3], CommunityRole::Member).await.is_err());

    assert_eq!(world.assert_member_count_consistent(c.id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_owner_is_admin_after_every_save() {
    let world = TestWorld::in_memory();
    let owner = world.gamer("owner").await.unwrap();
    let heir = world.gamer("heir").await.unwrap();
    let c = world.community(&owner, true).await.unwrap();
    world.assert_owner_is_admin(c.id).await.unwrap();

    CommunityService::new(&world.ctx)
        .update_community(
            owner.id,
            c.id,
            gamer_service::dto::UpdateCommunityRequest {
                description: Some("Weekly one-shots".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    world.assert_owner_is_admin(c.id).await.unwrap();

    world.add(&c, &heir, CommunityRole::Admin).await.unwrap();
    OwnershipService::new(&world.ctx)
        .transfer_ownership(owner.id, c.id, heir.id)
        .await
        .unwrap();
    world.assert_owner_is_admin(c.id).await.unwrap();
    assert_eq!(world.assert_member_count_consistent(c.id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_second_add_is_already_in_community() {
    let world = TestWorld::in_memory();
    let owner = world.gamer("owner").await.unwrap();
    let player = world.gamer("player").await.unwrap();
    let c = world.community(&owner, false).await.unwrap();

    world.add(&c, &player, CommunityRole::Moderator).await.unwrap();
    let err = world
        .add(&c, &player, CommunityRole::Admin)
        .await
        .unwrap_err();
    let err = err.downcast_ref::<ServiceError>().unwrap();
    assert!(matches!(domain(err), DomainError::AlreadyInCommunity));

    let role = MembershipService::new(&world.ctx)
        .get_role(c.id, player.id)
        .await
        .unwrap();
    assert_eq!(role, "Moderator");
    assert_eq!(world.assert_member_count_consistent(c.id).await.unwrap(), 2);
}

// The store never yields, so these two adds run back to back. Interleaved
// transactions are covered by gamer-db's `test_conflicting_commit_publishes_nothing`.
#[tokio::test]
async fn test_joined_adds_admit_exactly_one() {
    let world = TestWorld::in_memory();
    let owner = world.gamer("owner").await.unwrap();
    let player = world.gamer("player").await.unwrap();
    let c = world.community(&owner, false).await.unwrap();

    let service = MembershipService::new(&world.ctx);
    let (first, second) = tokio::join!(
        service.add_member(c.id, player.id, CommunityRole::Member),
        service.add_member(c.id, player.id, CommunityRole::Member),
    );

    assert_eq!(usize::from(first.is_ok()) + usize::from(second.is_ok()), 1);
    assert_eq!(world.assert_member_count_consistent(c.id).await.unwrap(), 2);
}

#[test]
fn test_role_ordering_labels() {
    let labels = ["member", "moderator", "admin"];
    for (i, a) in labels.iter().enumerate() {
        for (j, b) in labels.iter().enumerate() {
            assert_eq!(role_less_than(a, b).unwrap(), i < j, "{a} < {b}");
        }
    }
    assert!(matches!(
        role_less_than("member", "owner"),
        Err(DomainError::InvalidRole(_))
    ));
}

#[tokio::test]
async fn test_kick_of_non_member_persists_nothing() {
    let world = TestWorld::in_memory();
    let owner = world.gamer("owner").await.unwrap();
    let stranger = world.gamer("stranger").await.unwrap();
    let c = world.community(&owner, false).await.unwrap();
    let moderation = ModerationService::new(&world.ctx);

    let err = moderation
        .kick_user(owner.id, c.id, stranger.id, kick_until(tomorrow()))
        .await
        .unwrap_err();
    assert!(matches!(domain(&err), DomainError::NotInCommunity));
    assert!(moderation.kicks(c.id).await.unwrap().is_empty());

    // The rolled-back kick must not block an application either
    let applications = ApplicationService::new(&world.ctx);
    let app = applications
        .create_application(stranger.id, c.id, CreateApplicationRequest::default())
        .await
        .unwrap();
    applications.validate_application(app.id).await.unwrap();
}

#[tokio::test]
async fn test_owner_cannot_be_kicked_or_banned_by_anyone() {
    let world = TestWorld::in_memory();
    let owner = world.gamer("owner").await.unwrap();
    let admin = world.gamer("admin").await.unwrap();
    let moderator = world.gamer("moderator").await.unwrap();
    let member = world.gamer("member").await.unwrap();
    let c = world.community(&owner, false).await.unwrap();
    world.add(&c, &admin, CommunityRole::Admin).await.unwrap();
    world.add(&c, &moderator, CommunityRole::Moderator).await.unwrap();
    world.add(&c, &member, CommunityRole::Member).await.unwrap();
    let moderation = ModerationService::new(&world.ctx);

    for actor in [&owner, &admin, &moderator, &member] {
        let err = moderation
            .kick_user(actor.id, c.id, owner.id, open_kick())
            .await
            .unwrap_err();
        assert!(matches!(domain(&err), DomainError::PermissionDenied(_)));

        let err = moderation
            .ban_user(actor.id, c.id, owner.id, ban())
            .await
            .unwrap_err();
        assert!(matches!(domain(&err), DomainError::PermissionDenied(_)));
    }

    assert!(moderation.kicks(c.id).await.unwrap().is_empty());
    assert!(moderation.bans(c.id).await.unwrap().is_empty());
    world.assert_owner_is_admin(c.id).await.unwrap();
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_admins_and_moderators_projection() {
    let world = TestWorld::in_memory();
    let owner = world.gamer("o").await.unwrap();
    let a = world.gamer("a").await.unwrap();
    let m2 = world.gamer("m2").await.unwrap();
    let c = world.community(&owner, false).await.unwrap();

    world.add(&c, &a, CommunityRole::Member).await.unwrap();
    world.add(&c, &m2, CommunityRole::Member).await.unwrap();
    let members = MembershipService::new(&world.ctx);
    members
        .set_role(c.id, m2.id, CommunityRole::Moderator)
        .await
        .unwrap();

    let admins: Vec<_> = members
        .admins(c.id)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.gamer_id)
        .collect();
    let moderators: Vec<_> = members
        .moderators(c.id)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.gamer_id)
        .collect();
    assert_eq!(admins, vec![owner.id]);
    assert_eq!(moderators, vec![m2.id]);
}

#[tokio::test]
async fn test_ban_before_approval_keeps_review() {
    let world = TestWorld::in_memory();
    let owner = world.gamer("owner").await.unwrap();
    let g = world.gamer("g").await.unwrap();
    let c = world.community(&owner, true).await.unwrap();
    let applications = ApplicationService::new(&world.ctx);

    let app = applications
        .create_application(g.id, c.id, CreateApplicationRequest::default())
        .await
        .unwrap();
    let app = applications.submit_application(app.id).await.unwrap();
    assert_eq!(app.status, ApplicationStatus::Review);

    // G had been let in by hand; the ban removes that membership again
    world.add(&c, &g, CommunityRole::Member).await.unwrap();
    ModerationService::new(&world.ctx)
        .ban_user(owner.id, c.id, g.id, ban())
        .await
        .unwrap();

    let err = applications
        .approve_application(owner.id, app.id)
        .await
        .unwrap_err();
    assert!(matches!(domain(&err), DomainError::CurrentlyBanned));
    assert_eq!(
        applications.get_application(app.id).await.unwrap().status,
        ApplicationStatus::Review
    );
    assert_eq!(world.assert_member_count_consistent(c.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_kick_blocks_reapplication_until_end_date() {
    let world = TestWorld::in_memory();
    let owner = world.gamer("owner").await.unwrap();
    let g = world.gamer("g").await.unwrap();
    let c = world.community(&owner, true).await.unwrap();
    world.add(&c, &g, CommunityRole::Member).await.unwrap();

    let earliest_reapply = tomorrow();
    ModerationService::new(&world.ctx)
        .kick_user(owner.id, c.id, g.id, kick_until(earliest_reapply))
        .await
        .unwrap();

    let applications = ApplicationService::new(&world.ctx);
    let app = applications
        .create_application(g.id, c.id, CreateApplicationRequest::default())
        .await
        .unwrap();

    let err = applications.validate_application(app.id).await.unwrap_err();
    assert!(matches!(domain(&err), DomainError::CurrentlySuspended));
    let err = applications.submit_application(app.id).await.unwrap_err();
    assert!(matches!(domain(&err), DomainError::CurrentlySuspended));

    let later = earliest_reapply + Duration::hours(1);
    applications
        .validate_application_at(app.id, later)
        .await
        .unwrap();
    let app = applications
        .submit_application_at(app.id, later)
        .await
        .unwrap();
    assert_eq!(app.status, ApplicationStatus::Review);
}

#[tokio::test]
async fn test_open_ended_kick_does_not_suspend() {
    let world = TestWorld::in_memory();
    let owner = world.gamer("owner").await.unwrap();
    let g = world.gamer("g").await.unwrap();
    let c = world.community(&owner, false).await.unwrap();
    world.add(&c, &g, CommunityRole::Member).await.unwrap();

    ModerationService::new(&world.ctx)
        .kick_user(owner.id, c.id, g.id, open_kick())
        .await
        .unwrap();

    CommunityService::new(&world.ctx)
        .join_community(c.id, g.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_friend_accept_is_symmetric_and_deduplicated() {
    let world = TestWorld::in_memory();
    let g1 = world.gamer("g1").await.unwrap();
    let g2 = world.gamer("g2").await.unwrap();
    let friends = FriendService::new(&world.ctx);

    let request = friends.send_friend_request(g1.id, g2.id).await.unwrap();
    friends.accept_friend_request(request.id).await.unwrap();
    friends.accept_friend_request(request.id).await.unwrap();

    assert_eq!(friends.friends(g1.id).await.unwrap(), vec![g2.id]);
    assert_eq!(friends.friends(g2.id).await.unwrap(), vec![g1.id]);
}

#[tokio::test]
async fn test_transfer_ownership_only_to_admins() {
    let world = TestWorld::in_memory();
    let o = world.gamer("o").await.unwrap();
    let m = world.gamer("m").await.unwrap();
    let n = world.gamer("n").await.unwrap();
    let c = world.community(&o, false).await.unwrap();
    world.add(&c, &m, CommunityRole::Admin).await.unwrap();
    world.add(&c, &n, CommunityRole::Member).await.unwrap();
    let ownership = OwnershipService::new(&world.ctx);

    let err = ownership
        .transfer_ownership(o.id, c.id, n.id)
        .await
        .unwrap_err();
    assert!(matches!(domain(&err), DomainError::NewOwnerNotAdmin));
    let unchanged = CommunityService::new(&world.ctx)
        .get_community(c.id)
        .await
        .unwrap();
    assert_eq!(unchanged.owner_id, o.id);

    let updated = ownership.transfer_ownership(o.id, c.id, m.id).await.unwrap();
    assert_eq!(updated.owner_id, m.id);
}

#[tokio::test]
async fn test_approval_adds_member_through_ledger() {
    let world = TestWorld::in_memory();
    let owner = world.gamer("owner").await.unwrap();
    let g = world.gamer("g").await.unwrap();
    let c = world.community(&owner, true).await.unwrap();
    let applications = ApplicationService::new(&world.ctx);

    let app = applications
        .create_application(g.id, c.id, CreateApplicationRequest::default())
        .await
        .unwrap();
    applications.submit_application(app.id).await.unwrap();
    applications
        .approve_application(owner.id, app.id)
        .await
        .unwrap();

    assert_eq!(world.assert_member_count_consistent(c.id).await.unwrap(), 2);

    // `approve` is terminal: a second approval is refused and changes nothing
    let err = applications
        .approve_application(owner.id, app.id)
        .await
        .unwrap_err();
    assert!(matches!(domain(&err), DomainError::ValidationError(_)));
    assert_eq!(world.assert_member_count_consistent(c.id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_rejected_application_stays_rejected() {
    let mut world = TestWorld::in_memory();
    let owner = world.gamer("owner").await.unwrap();
    let g = world.gamer("g").await.unwrap();
    let c = world.community(&owner, true).await.unwrap();
    let applications = ApplicationService::new(&world.ctx);

    let app = applications
        .create_application(g.id, c.id, CreateApplicationRequest::default())
        .await
        .unwrap();
    applications.submit_application(app.id).await.unwrap();
    applications
        .reject_application(owner.id, app.id)
        .await
        .unwrap();
    world.drain_events();
    let applications = ApplicationService::new(&world.ctx);

    let err = applications.submit_application(app.id).await.unwrap_err();
    assert!(matches!(domain(&err), DomainError::ValidationError(_)));
    let err = applications
        .approve_application(owner.id, app.id)
        .await
        .unwrap_err();
    assert!(matches!(domain(&err), DomainError::ValidationError(_)));

    assert_eq!(
        applications.get_application(app.id).await.unwrap().status,
        ApplicationStatus::Reject
    );
    assert_eq!(world.assert_member_count_consistent(c.id).await.unwrap(), 1);
    assert!(world.drain_events().is_empty());
}

// ============================================================================
// PostgreSQL
// ============================================================================

#[tokio::test]
async fn test_postgres_ledger_and_moderation() {
    let Some(world) = postgres_world().await else {
        return;
    };

    let owner = world.gamer("owner").await.unwrap();
    let player = world.gamer("player").await.unwrap();
    let stranger = world.gamer("stranger").await.unwrap();
    let c = world.community(&owner, false).await.unwrap();
    world.assert_owner_is_admin(c.id).await.unwrap();

    world.add(&c, &player, CommunityRole::Member).await.unwrap();
    let err = world
        .add(&c, &player, CommunityRole::Member)
        .await
        .unwrap_err();
    let err = err.downcast_ref::<ServiceError>().unwrap();
    assert!(matches!(domain(err), DomainError::AlreadyInCommunity));

    let moderation = ModerationService::new(&world.ctx);
    let err = moderation
        .kick_user(owner.id, c.id, stranger.id, open_kick())
        .await
        .unwrap_err();
    assert!(matches!(domain(&err), DomainError::NotInCommunity));
    assert!(moderation.kicks(c.id).await.unwrap().is_empty());

    moderation
        .kick_user(owner.id, c.id, player.id, kick_until(Utc::now() + Duration::days(1)))
        .await
        .unwrap();
    assert_eq!(world.assert_member_count_consistent(c.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_postgres_application_flow() {
    let Some(world) = postgres_world().await else {
        return;
    };

    let owner = world.gamer("owner").await.unwrap();
    let g = world.gamer("g").await.unwrap();
    let c = world.community(&owner, true).await.unwrap();
    let applications = ApplicationService::new(&world.ctx);

    let app = applications
        .create_application(g.id, c.id, CreateApplicationRequest::default())
        .await
        .unwrap();
    applications.submit_application(app.id).await.unwrap();
    let app = applications
        .approve_application(owner.id, app.id)
        .await
        .unwrap();
    assert_eq!(app.status, ApplicationStatus::Approve);
    assert_eq!(world.assert_member_count_consistent(c.id).await.unwrap(), 2);
}
