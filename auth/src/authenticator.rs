use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;

use crate::jwt::TokenClaims;
use crate::jwt::TokenError;
use crate::jwt::TokenHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Plaintext behind the decoy hash. Never a valid login: the decoy check
/// rejects unconditionally.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Credential coordinator combining password hashing and token handling.
///
/// Holds the process-wide signing keys and token time-to-live; construct it
/// once at startup and share it behind an `Arc`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_handler: TokenHandler,
    token_ttl: Duration,
    decoy_hash: String,
}

/// A freshly signed bearer token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `token_secret` - Secret key for token signing
    /// * `token_ttl` - Lifetime of issued tokens
    ///
    /// # Errors
    /// * `TokenError` - Secret has no bytes
    /// * `PasswordError` - Decoy hash could not be computed
    pub fn new(token_secret: &[u8], token_ttl: Duration) -> Result<Self, AuthenticationError> {
        let password_hasher = PasswordHasher::new();
        let decoy_hash = password_hasher.hash(DECOY_PASSWORD)?;

        Ok(Self {
            password_hasher,
            token_handler: TokenHandler::new(token_secret)?,
            token_ttl,
            decoy_hash,
        })
    }

    /// Hash a password for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against its stored hash.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is unusable
    pub fn check_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<(), AuthenticationError> {
        if self.password_hasher.verify(password, stored_hash)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Spend a full password verification for a login with no stored account,
    /// so an unknown email costs as much as a wrong password.
    ///
    /// Always fails with `InvalidCredentials`.
    pub fn check_password_without_account(
        &self,
        password: &str,
    ) -> Result<(), AuthenticationError> {
        let _ = self.password_hasher.verify(password, &self.decoy_hash);
        Err(AuthenticationError::InvalidCredentials)
    }

    /// Sign a token for a subject, valid for the configured time-to-live.
    pub fn issue_token(&self, user_id: &str, email: &str) -> Result<IssuedToken, TokenError> {
        let claims = TokenClaims::new(user_id, email, self.token_ttl);
        let access_token = self.token_handler.issue(&claims)?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or_else(|| TokenError::EncodingFailed("expiry out of range".to_string()))?;

        Ok(IssuedToken {
            access_token,
            expires_at,
        })
    }

    /// Validate a token and return its claims.
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.token_handler.verify(token)
    }
}
