use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

/// Field-level input rejection. Messages name the offending field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Password must be less than {max} characters")]
    PasswordTooLong { max: usize },

    #[error("Color must be a valid hex color (e.g., #3B82F6)")]
    InvalidHexColor,
}

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for registration, login and request admission.
///
/// Authentication failures stay coarse: callers only learn which of the
/// unauthorized variants applies, never the underlying check.
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Email already in use")]
    EmailAlreadyInUse,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User account is inactive")]
    AccountInactive,

    #[error("No token provided")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken(#[from] TokenError),

    #[error("User not found or inactive")]
    UserNotFoundOrInactive,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AccountError {
    /// Whether the failure is an authentication rejection (401 class).
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AccountError::InvalidCredentials
                | AccountError::AccountInactive
                | AccountError::MissingToken
                | AccountError::InvalidToken(_)
                | AccountError::UserNotFoundOrInactive
        )
    }
}

impl From<tokio::task::JoinError> for AccountError {
    fn from(err: tokio::task::JoinError) -> Self {
        AccountError::Unknown(format!("Blocking task failed: {}", err))
    }
}
