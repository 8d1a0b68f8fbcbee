use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::TokenClaims;
use super::errors::TokenError;

/// Signs and verifies bearer tokens with HS256.
///
/// Keys are derived once from the process-wide secret; the handler is
/// immutable afterwards and safe to share across tasks.
pub struct TokenHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenHandler {
    /// Create a handler from the signing secret.
    ///
    /// # Errors
    /// * `EmptySecret` - Secret has no bytes
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        })
    }

    /// Sign claims into a compact token string.
    ///
    /// # Errors
    /// * `EncodingFailed` - Serialization or signing failed
    pub fn issue(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify signature and expiry, returning the embedded claims.
    ///
    /// # Errors
    /// * `InvalidSignature` - Token was not signed with this secret
    /// * `Expired` - Current time is at or past `exp`
    /// * `Malformed` - Token cannot be parsed or lacks required claims
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        // jsonwebtoken still accepts a token during its `exp` second
        if claims.is_expired(Utc::now().timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
