use thiserror::Error;

/// Failures of the password hashing primitives.
///
/// A wrong password is never an error here; `verify` reports it as `false`.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored password hash is unusable: {0}")]
    VerificationFailed(String),
}
