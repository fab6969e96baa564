//! Service layer error types
//!
//! Membership rejections stay as their `DomainError` variant so callers can
//! match on them; a rejected request DTO keeps the validator's field errors.

use gamer_common::AppError;
use gamer_core::DomainError;
use validator::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    App(#[from] AppError),

    /// Request DTO failed its `validate()` rules
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] ValidationErrors),

    /// Wiring or argument problem not tied to a request field
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// The wrapped domain error, if any
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }

    /// Names of the request fields that failed validation, sorted
    pub fn invalid_fields(&self) -> Vec<&str> {
        let Self::InvalidRequest(errors) = self else {
            return Vec::new();
        };
        let mut fields: Vec<&str> = errors.errors().keys().map(|field| &**field).collect();
        fields.sort_unstable();
        fields
    }

    /// HTTP-style status for whoever renders the error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => AppError::status_for(e),
            Self::App(e) => e.status_code(),
            Self::InvalidRequest(_) | Self::Validation(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::InvalidRequest(_) | Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::InvalidRequest(e) => AppError::Validation(e.to_string()),
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Kick {
        #[validate(length(min = 1))]
        reason: String,
        #[validate(length(max = 3))]
        note: String,
    }

    #[test]
    fn test_domain_errors_keep_their_code() {
        let err = ServiceError::from(DomainError::CurrentlyBanned);
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "CURRENTLY_BANNED");
        assert!(matches!(err.as_domain(), Some(DomainError::CurrentlyBanned)));
    }

    #[test]
    fn test_invalid_request_lists_fields() {
        let err: ServiceError = Kick {
            reason: String::new(),
            note: "too long".to_string(),
        }
        .validate()
        .unwrap_err()
        .into();

        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.invalid_fields(), vec!["note", "reason"]);
        assert!(err.as_domain().is_none());
    }

    #[test]
    fn test_wiring_validation_has_no_fields() {
        let err = ServiceError::validation("unit_of_work is required");
        assert_eq!(err.status_code(), 400);
        assert!(err.invalid_fields().is_empty());
    }

    #[test]
    fn test_convert_to_app_error() {
        let app_err: AppError = ServiceError::from(DomainError::NotInCommunity).into();
        assert_eq!(app_err.status_code(), 404);
        assert_eq!(app_err.error_code(), "NOT_IN_COMMUNITY");

        let app_err: AppError = ServiceError::internal("pool closed").into();
        assert!(app_err.is_server_error());
    }
}
