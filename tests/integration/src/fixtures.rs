//! Test fixtures and data generators

use chrono::{DateTime, Duration, Utc};
use gamer_service::dto::{BanRequest, CreateCommunityRequest, KickRequest};

/// Community request with a name nobody else is using
pub fn community_request(suffix: impl std::fmt::Display, private: bool) -> CreateCommunityRequest {
    let mut request = CreateCommunityRequest::new(format!("Table {suffix}"));
    request.private = private;
    request
}

/// Kick that blocks reapplying until `until`
pub fn kick_until(until: DateTime<Utc>) -> KickRequest {
    KickRequest::new("needs a break from the table", Some(until))
}

/// Kick without a reapply date
pub fn open_kick() -> KickRequest {
    KickRequest::new("no end date given", None)
}

pub fn ban() -> BanRequest {
    BanRequest::new("cheating at dice")
}

pub fn tomorrow() -> DateTime<Utc> {
    Utc::now() + Duration::days(1)
}
