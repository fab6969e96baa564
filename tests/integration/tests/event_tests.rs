//! Events are published after a commit and never for a failed operation

use gamer_core::CommunityRole;
use gamer_integration_tests::{ban, kick_until, open_kick, tomorrow, TestWorld};
use gamer_service::dto::CreateApplicationRequest;
use gamer_service::{
    ApplicationService, CommunityService, FriendService, MembershipService, ModerationService,
    OwnershipService,
};

#[tokio::test]
async fn test_community_lifecycle_events() {
    let mut world = TestWorld::in_memory();
    let owner = world.gamer("owner").await.unwrap();
    let player = world.gamer("player").await.unwrap();
    let c = world.community(&owner, false).await.unwrap();
    assert_eq!(world.drain_events(), vec!["COMMUNITY_CREATED"]);

    CommunityService::new(&world.ctx)
        .join_community(c.id, player.id)
        .await
        .unwrap();
    MembershipService::new(&world.ctx)
        .change_role(owner.id, c.id, player.id, CommunityRole::Admin)
        .await
        .unwrap();
    OwnershipService::new(&world.ctx)
        .transfer_ownership(owner.id, c.id, player.id)
        .await
        .unwrap();
    CommunityService::new(&world.ctx)
        .leave_community(c.id, owner.id)
        .await
        .unwrap();

    assert_eq!(
        world.drain_events(),
        vec![
            "MEMBER_JOINED",
            "ROLE_CHANGED",
            "OWNERSHIP_TRANSFERRED",
            "MEMBER_LEFT"
        ]
    );
}

#[tokio::test]
async fn test_failed_operations_publish_nothing() {
    let mut world = TestWorld::in_memory();
    let owner = world.gamer("owner").await.unwrap();
    let member = world.gamer("member").await.unwrap();
    let stranger = world.gamer("stranger").await.unwrap();
    let c = world.community(&owner, false).await.unwrap();
    world.add(&c, &member, CommunityRole::Member).await.unwrap();
    world.drain_events();

    let moderation = ModerationService::new(&world.ctx);
    assert!(moderation
        .kick_user(owner.id, c.id, stranger.id, open_kick())
        .await
        .is_err());
    assert!(moderation
        .ban_user(member.id, c.id, owner.id, ban())
        .await
        .is_err());
    assert!(moderation.unban_user(owner.id, c.id, member.id).await.is_err());
    assert!(world.add(&c, &member, CommunityRole::Member).await.is_err());
    assert!(OwnershipService::new(&world.ctx)
        .transfer_ownership(owner.id, c.id, member.id)
        .await
        .is_err());
    assert!(CommunityService::new(&world.ctx)
        .leave_community(c.id, owner.id)
        .await
        .is_err());

    assert!(world.drain_events().is_empty());
}

#[tokio::test]
async fn test_moderation_events() {
    let mut world = TestWorld::in_memory();
    let owner = world.gamer("owner").await.unwrap();
    let a = world.gamer("a").await.unwrap();
    let b = world.gamer("b").await.unwrap();
    let c = world.community(&owner, false).await.unwrap();
    world.add(&c, &a, CommunityRole::Member).await.unwrap();
    world.add(&c, &b, CommunityRole::Member).await.unwrap();
    world.drain_events();

    let moderation = ModerationService::new(&world.ctx);
    moderation
        .kick_user(owner.id, c.id, a.id, kick_until(tomorrow()))
        .await
        .unwrap();
    moderation.ban_user(owner.id, c.id, b.id, ban()).await.unwrap();
    moderation.unban_user(owner.id, c.id, b.id).await.unwrap();

    assert_eq!(
        world.drain_events(),
        vec!["MEMBER_KICKED", "MEMBER_BANNED", "MEMBER_UNBANNED"]
    );
}

#[tokio::test]
async fn test_application_events() {
    let mut world = TestWorld::in_memory();
    let owner = world.gamer("owner").await.unwrap();
    let g = world.gamer("g").await.unwrap();
    let h = world.gamer("h").await.unwrap();
    let c = world.community(&owner, true).await.unwrap();
    world.drain_events();
    let applications = ApplicationService::new(&world.ctx);

    let approved = applications
        .create_application(g.id, c.id, CreateApplicationRequest::default())
        .await
        .unwrap();
    applications.submit_application(approved.id).await.unwrap();
    applications
        .approve_application(owner.id, approved.id)
        .await
        .unwrap();

    let rejected = applications
        .create_application(h.id, c.id, CreateApplicationRequest::default())
        .await
        .unwrap();
    applications.submit_application(rejected.id).await.unwrap();
    applications
        .reject_application(owner.id, rejected.id)
        .await
        .unwrap();

    assert_eq!(
        world.drain_events(),
        vec![
            "APPLICATION_SUBMITTED",
            "MEMBER_JOINED",
            "APPLICATION_APPROVED",
            "APPLICATION_SUBMITTED",
            "APPLICATION_REJECTED"
        ]
    );
}

#[tokio::test]
async fn test_friend_request_events() {
    let mut world = TestWorld::in_memory();
    let g1 = world.gamer("g1").await.unwrap();
    let g2 = world.gamer("g2").await.unwrap();
    let friends = FriendService::new(&world.ctx);

    let first = friends.send_friend_request(g1.id, g2.id).await.unwrap();
    friends.accept_friend_request(first.id).await.unwrap();
    let second = friends.send_friend_request(g2.id, g1.id).await.unwrap();
    friends.deny_friend_request(second.id).await.unwrap();
    assert!(friends.send_friend_request(g1.id, g1.id).await.is_err());

    assert_eq!(
        world.drain_events(),
        vec![
            "FRIEND_REQUEST_SENT",
            "FRIEND_REQUEST_ACCEPTED",
            "FRIEND_REQUEST_SENT",
            "FRIEND_REQUEST_DENIED"
        ]
    );
}
