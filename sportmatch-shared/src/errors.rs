use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{area}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Account errors
/// - E2xxx: Profile errors
/// - E3xxx: Like/match errors
/// - E4xxx: Messaging errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    Unauthorized,
    Forbidden,
    ServiceUnavailable,

    // Account (E1xxx)
    InvalidCredentials,
    EmailAlreadyExists,
    UsernameTaken,
    TokenExpired,
    TokenInvalid,
    PasswordTooWeak,

    // Profile (E2xxx)
    ProfileNotFound,
    InvalidUsername,
    NotProfileOwner,

    // Like/match (E3xxx)
    CannotLikeSelf,
    MatchNotFound,
    NoMutualLike,
    NotMatchParticipant,

    // Messaging (E4xxx)
    ReceiverMismatch,
    MessageBodyInvalid,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::Unauthorized => "E0004",
            Self::Forbidden => "E0005",
            Self::ServiceUnavailable => "E0008",

            // Account
            Self::InvalidCredentials => "E1001",
            Self::EmailAlreadyExists => "E1002",
            Self::UsernameTaken => "E1003",
            Self::TokenExpired => "E1004",
            Self::TokenInvalid => "E1005",
            Self::PasswordTooWeak => "E1006",

            // Profile
            Self::ProfileNotFound => "E2001",
            Self::InvalidUsername => "E2002",
            Self::NotProfileOwner => "E2003",

            // Like/match
            Self::CannotLikeSelf => "E3001",
            Self::MatchNotFound => "E3002",
            Self::NoMutualLike => "E3003",
            Self::NotMatchParticipant => "E3004",

            // Messaging
            Self::ReceiverMismatch => "E4001",
            Self::MessageBodyInvalid => "E4002",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            // duplicate unique fields are validation failures, not conflicts
            Self::ValidationError | Self::EmailAlreadyExists | Self::UsernameTaken
            | Self::PasswordTooWeak | Self::InvalidUsername | Self::CannotLikeSelf
            | Self::NoMutualLike | Self::ReceiverMismatch | Self::MessageBodyInvalid => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound | Self::ProfileNotFound | Self::MatchNotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized | Self::InvalidCredentials | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::NotProfileOwner | Self::NotMatchParticipant => StatusCode::FORBIDDEN,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// The code this error will be reported under.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Known { code, .. } => *code,
            AppError::Internal(_) => ErrorCode::InternalError,
            AppError::Validation(_) => ErrorCode::ValidationError,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message, .. }
                if matches!(code, ErrorCode::InternalError | ErrorCode::ServiceUnavailable) =>
            {
                // raw fault text stays in the logs
                tracing::error!(code = code.code(), error = %message, "request failed");
                let public = match code {
                    ErrorCode::ServiceUnavailable => "service temporarily unavailable",
                    _ => "internal server error",
                };
                (code.status_code(), ApiErrorResponse::new(code.code(), public))
            }
            AppError::Known { code, message, details } => {
                let status = code.status_code();
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                (status, resp)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new("E0001", "internal server error"),
                )
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::new("E0002", msg),
            ),
        };

        (status, Json(error_response)).into_response()
    }
}

// Extractor rejections (missing fields, wrong types, bad path ids) go through
// the envelope instead of axum's plain-text defaults.

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorCode::ProfileNotFound, StatusCode::NOT_FOUND)]
    #[case(ErrorCode::MatchNotFound, StatusCode::NOT_FOUND)]
    #[case(ErrorCode::ValidationError, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::CannotLikeSelf, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::InvalidCredentials, StatusCode::UNAUTHORIZED)]
    #[case(ErrorCode::NotMatchParticipant, StatusCode::FORBIDDEN)]
    #[case(ErrorCode::EmailAlreadyExists, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::UsernameTaken, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::InternalError, StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_codes_follow_taxonomy(#[case] code: ErrorCode, #[case] expected: StatusCode) {
        assert_eq!(code.status_code(), expected);
    }

    #[tokio::test]
    async fn internal_errors_hide_the_raw_message() {
        let response = AppError::internal("connection refused at 10.0.0.3:5432").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ApiErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(!body.success);
        assert_eq!(body.error.code, "E0001");
        assert_eq!(body.error.message, "internal server error");
    }

    #[tokio::test]
    async fn known_errors_carry_code_and_details() {
        let err = AppError::with_details(
            ErrorCode::ValidationError,
            "request validation failed",
            serde_json::json!({ "email": ["invalid email format"] }),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ApiErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error.code, "E0002");
        assert!(body.error.details.is_some());
    }

    #[test]
    fn anyhow_errors_are_internal() {
        let err = AppError::from(anyhow::anyhow!("socket closed"));
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
