use auth::Claims;
use auth::JwtHandler;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::user::models::TokenClaims;
use crate::domain::user::models::UserId;
use crate::user::errors::TokenError;
use crate::user::ports::TokenService;

/// Token service issuing HS256 JWTs through the auth library.
///
/// Owns the signing key for the whole process; build one instance at startup
/// and share it behind an `Arc`.
pub struct JwtTokenService {
    handler: JwtHandler,
    lifetime: Duration,
}

impl JwtTokenService {
    /// Create a token service.
    ///
    /// # Arguments
    /// * `secret` - Signing secret loaded from configuration
    /// * `expiration_hours` - Token lifetime
    pub fn new(secret: &[u8], expiration_hours: i64) -> Self {
        Self {
            handler: JwtHandler::new(secret),
            lifetime: Duration::hours(expiration_hours),
        }
    }

    /// Issue a token as if it were `issued_at`.
    pub fn issue_at(
        &self,
        user_id: UserId,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims::issued_at(user_id.0, email, issued_at, self.lifetime);

        self.handler
            .encode(&claims)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: UserId, email: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, email, Utc::now())
    }

    fn validate(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let claims: Claims = self.handler.decode(token).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            TokenError::Invalid
        })?;

        Ok(TokenClaims {
            user_id: UserId(claims.user_id),
            email: claims.email,
        })
    }
}
