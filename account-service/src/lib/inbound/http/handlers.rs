use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::user::errors::AccountError;

pub mod health;
pub mod login;
pub mod me;
pub mod register;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError {
        message: String,
        details: Option<String>,
    },
    BadRequest {
        message: String,
        details: Option<String>,
    },
    Conflict(String),
    Unauthorized(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::InternalServerError { message, details }
            | ApiError::BadRequest { message, details } => ApiErrorData {
                error: message,
                details,
            },
            ApiError::Conflict(message) | ApiError::Unauthorized(message) => ApiErrorData {
                error: message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Maps domain failures to HTTP errors.
///
/// `details` carries the underlying cause and is only filled in outside
/// production.
#[derive(Debug, Clone, Copy)]
pub struct ErrorTranslator {
    expose_details: bool,
}

impl ErrorTranslator {
    pub fn new(expose_details: bool) -> Self {
        Self { expose_details }
    }

    pub fn production() -> Self {
        Self::new(false)
    }

    pub fn development() -> Self {
        Self::new(true)
    }

    fn details(&self, cause: String) -> Option<String> {
        self.expose_details.then_some(cause)
    }

    pub fn translate(&self, err: AccountError) -> ApiError {
        match err {
            AccountError::Validation(e) => ApiError::BadRequest {
                message: e.to_string(),
                details: None,
            },
            AccountError::EmailAlreadyInUse => ApiError::Conflict(err.to_string()),
            AccountError::InvalidCredentials
            | AccountError::AccountInactive
            | AccountError::MissingToken
            | AccountError::InvalidToken(_)
            | AccountError::UserNotFoundOrInactive => ApiError::Unauthorized(err.to_string()),
            AccountError::DatabaseError(cause) => {
                tracing::error!(error = %cause, "Store operation failed");
                ApiError::BadRequest {
                    message: "Database error".to_string(),
                    details: self.details(cause),
                }
            }
            AccountError::Password(_) | AccountError::Unknown(_) => {
                tracing::error!(error = %err, "Unhandled error");
                ApiError::InternalServerError {
                    message: "Internal server error".to_string(),
                    details: self.details(err.to_string()),
                }
            }
        }
    }

    pub fn reject_body(&self, rejection: JsonRejection) -> ApiError {
        tracing::warn!(reason = %rejection.body_text(), "Unreadable request body");
        ApiError::BadRequest {
            message: "Invalid request body".to_string(),
            details: self.details(rejection.body_text()),
        }
    }
}
