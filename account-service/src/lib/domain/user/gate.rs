use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenError;

use crate::domain::user::models::Identity;
use crate::domain::user::models::UserId;
use crate::user::errors::AccountError;
use crate::user::ports::AuthGatePort;
use crate::user::ports::UserRepository;

/// Case-sensitive scheme prefix, single space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Request guard: verifies the bearer token, then re-reads the live user.
///
/// The store lookup runs on every request, so deactivating a user rejects
/// their outstanding tokens before those tokens expire.
pub struct AuthGate<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthGate<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR> AuthGatePort for AuthGate<UR>
where
    UR: UserRepository,
{
    async fn admit(&self, authorization: Option<&str>) -> Result<Identity, AccountError> {
        let token = authorization
            .and_then(|header| header.strip_prefix(BEARER_PREFIX))
            .ok_or(AccountError::MissingToken)?;

        let claims = self.authenticator.validate_token(token).map_err(|e| {
            tracing::warn!(reason = %e, "Token rejected");
            AccountError::InvalidToken(e)
        })?;

        let user_id = UserId::from_string(&claims.user_id).map_err(|e| {
            tracing::warn!(reason = %e, "Token subject is not a user id");
            AccountError::InvalidToken(TokenError::Malformed(e.to_string()))
        })?;

        match self.repository.find_by_id(&user_id).await? {
            Some(user) if user.active => {
                tracing::debug!(user_id = %user.id, "Request admitted");
                Ok(Identity::from(&user))
            }
            Some(_) => {
                tracing::warn!(user_id = %user_id, "Token subject is inactive");
                Err(AccountError::UserNotFoundOrInactive)
            }
            None => {
                tracing::warn!(user_id = %user_id, "Token subject not found");
                Err(AccountError::UserNotFoundOrInactive)
            }
        }
    }
}
