use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity claims carried by a bearer token.
///
/// Serialized as `{"userId", "email", "iat", "exp"}` with Unix-second
/// timestamps. Claims are signed, not encrypted, so nothing secret belongs here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Subject user identifier
    pub user_id: String,

    /// Subject email at issuance time
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    /// Claims issued now and valid for `ttl`.
    pub fn new(user_id: impl ToString, email: impl ToString, ttl: Duration) -> Self {
        let now = Utc::now();
        Self::issued_at(user_id, email, now.timestamp(), ttl)
    }

    /// Claims with an explicit issuance timestamp.
    pub fn issued_at(
        user_id: impl ToString,
        email: impl ToString,
        iat: i64,
        ttl: Duration,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            email: email.to_string(),
            iat,
            exp: iat + ttl.num_seconds(),
        }
    }

    /// A token is expired from its `exp` second onwards.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
