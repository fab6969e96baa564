//! Domain events

mod domain_event;

pub use domain_event::{
    ApplicationEvent, CommunityEvent, DomainEvent, FriendRequestEvent, MembershipEvent,
    ModerationEvent, OwnershipTransferredEvent, RoleChangedEvent,
};
