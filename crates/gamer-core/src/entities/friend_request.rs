//! Friend request entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Friend request status: `new --accept--> accept`, `new --deny--> reject`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendRequestStatus {
    #[default]
    New,
    Accept,
    Reject,
}

impl FriendRequestStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Accept => "accept",
            Self::Reject => "reject",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "new" => Ok(Self::New),
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            other => Err(DomainError::ValidationError(format!(
                "unknown friend request status: {other}"
            ))),
        }
    }
}

/// Friend request between two gamer profiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamerFriendRequest {
    pub id: Snowflake,
    pub requester_id: Snowflake,
    pub recipient_id: Snowflake,
    pub status: FriendRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GamerFriendRequest {
    pub fn new(id: Snowflake, requester_id: Snowflake, recipient_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            requester_id,
            recipient_id,
            status: FriendRequestStatus::New,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: FriendRequestStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_starts_new() {
        let request = GamerFriendRequest::new(Snowflake::new(1), Snowflake::new(2), Snowflake::new(3));
        assert_eq!(request.status, FriendRequestStatus::New);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(FriendRequestStatus::parse("accept").unwrap(), FriendRequestStatus::Accept);
        assert!(FriendRequestStatus::parse("maybe").is_err());
    }
}
