use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity claims carried by an access token.
///
/// Timestamps are Unix seconds. `exp` is always present so tokens
/// without an expiry are never accepted by [`JwtHandler::decode`].
///
/// [`JwtHandler::decode`]: super::JwtHandler::decode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Numeric user identifier
    pub user_id: i64,

    /// Email address the user authenticated with
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, issued now.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `email` - User email address
    /// * `expiration_hours` - Hours until token expires
    ///
    /// # Returns
    /// Claims with `iat` set to now and `exp` set `expiration_hours` later
    pub fn for_user(user_id: i64, email: impl Into<String>, expiration_hours: i64) -> Self {
        Self::issued_at(user_id, email, Utc::now(), Duration::hours(expiration_hours))
    }

    /// Create claims with an explicit issue instant and lifetime.
    pub fn issued_at(
        user_id: i64,
        email: impl Into<String>,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            user_id,
            email: email.into(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
        }
    }
}
