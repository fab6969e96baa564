//! Community application entity - a request to join a private community

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Application lifecycle status
///
/// `new --submit--> review --approve--> approve` or `review --reject--> reject`.
/// `hold` parks an open application; it goes back to `review` on submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    New,
    Review,
    Reject,
    Approve,
    Hold,
}

impl ApplicationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Review => "review",
            Self::Reject => "reject",
            Self::Approve => "approve",
            Self::Hold => "hold",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "new" => Ok(Self::New),
            "review" => Ok(Self::Review),
            "reject" => Ok(Self::Reject),
            "approve" => Ok(Self::Approve),
            "hold" => Ok(Self::Hold),
            other => Err(DomainError::ValidationError(format!(
                "unknown application status: {other}"
            ))),
        }
    }

    /// `approve` and `reject` end the workflow
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Approve | Self::Reject)
    }

    /// States `submit` may move to `review`
    #[inline]
    pub fn can_submit(self) -> bool {
        matches!(self, Self::New | Self::Hold | Self::Review)
    }

    /// Only a submitted application can be approved
    #[inline]
    pub fn can_approve(self) -> bool {
        matches!(self, Self::Review)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Community application entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityApplication {
    pub id: Snowflake,
    pub gamer_id: Snowflake,
    pub community_id: Snowflake,
    pub message: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommunityApplication {
    /// Create a new application in `new`
    pub fn new(
        id: Snowflake,
        gamer_id: Snowflake,
        community_id: Snowflake,
        message: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            gamer_id,
            community_id,
            message,
            status: ApplicationStatus::New,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fails with `ValidationError` unless `allowed` holds for the current status
    pub fn ensure_status(
        &self,
        action: &str,
        allowed: fn(ApplicationStatus) -> bool,
    ) -> Result<(), DomainError> {
        if allowed(self.status) {
            Ok(())
        } else {
            Err(DomainError::ValidationError(format!(
                "cannot {action} an application in {}",
                self.status
            )))
        }
    }

    pub fn set_status(&mut self, status: ApplicationStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}
