//! Credential primitives shared by account services.
//!
//! - Password hashing (Argon2id)
//! - Bearer token signing and verification (HS256 JWT)
//! - An `Authenticator` bundling both with the configured token lifetime
//!
//! # Examples
//!
//! ```
//! use auth::Authenticator;
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24)).unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("secret1").unwrap();
//!
//! // Login: verify and issue token
//! auth.check_password("secret1", &hash).unwrap();
//! let issued = auth.issue_token("user-1", "ana@x.com").unwrap();
//!
//! // Protected request: validate token
//! let claims = auth.validate_token(&issued.access_token).unwrap();
//! assert_eq!(claims.email, "ana@x.com");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::IssuedToken;
pub use jwt::TokenClaims;
pub use jwt::TokenError;
pub use jwt::TokenHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
