use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// One-way salted password hashing (Argon2id, default cost parameters).
///
/// Both operations are CPU bound. Async callers should run them on a
/// blocking worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext secret with a fresh random salt.
    ///
    /// # Returns
    /// PHC string (`$argon2id$v=19$...`) embedding parameters and salt
    ///
    /// # Errors
    /// * `HashingFailed` - Argon2 rejected the input or parameters
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Check a plaintext secret against a stored PHC hash.
    ///
    /// The digest comparison inside `argon2` is constant time.
    ///
    /// # Returns
    /// `true` on match, `false` on mismatch
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is not a parseable PHC string
    pub fn verify(&self, plaintext: &str, hashed: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hashed)
            .map_err(|e| PasswordError::VerificationFailed(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok())
    }
}
