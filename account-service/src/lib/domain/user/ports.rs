use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Identity;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Session;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::AccountError;

/// Port for registration and login.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Create a new active account.
    ///
    /// Registration does not issue a token; a login is required afterwards.
    ///
    /// # Returns
    /// Identifier of the created user
    ///
    /// # Errors
    /// * `Validation` - Name, email or password rejected
    /// * `EmailAlreadyInUse` - Email is already registered
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<UserId, AccountError>;

    /// Verify credentials and issue a bearer token.
    ///
    /// # Errors
    /// * `Validation` - Email or password missing, or email malformed
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `AccountInactive` - Password matched but the account is inactive
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, command: LoginCommand) -> Result<Session, AccountError>;
}

/// Port for admitting protected requests.
#[async_trait]
pub trait AuthGatePort: Send + Sync + 'static {
    /// Resolve the caller from a raw `Authorization` header value.
    ///
    /// # Errors
    /// * `MissingToken` - Header absent or not `Bearer <token>`
    /// * `InvalidToken` - Bad signature, malformed or expired token
    /// * `UserNotFoundOrInactive` - Subject no longer exists or was deactivated
    /// * `DatabaseError` - Store operation failed
    async fn admit(&self, authorization: Option<&str>) -> Result<Identity, AccountError>;
}

/// Credential store for user records.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by (normalized) email.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AccountError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError>;

    /// Persist a new user atomically.
    ///
    /// The store's unique email index is the final authority on duplicates.
    ///
    /// # Errors
    /// * `EmailAlreadyInUse` - Unique email constraint violated
    /// * `DatabaseError` - Database operation failed
    async fn insert(&self, user: User) -> Result<User, AccountError>;
}

/// Source of uniform random indices.
pub trait RandomSource: Send + Sync + 'static {
    /// Uniform index in `0..upper`. `upper` is never zero.
    fn next_index(&self, upper: usize) -> usize;
}
