use std::any::Any;
use std::sync::Arc;

use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::INTERNAL_ERROR;
use crate::user::errors::IdentityError;
use crate::user::ports::TokenService;

/// Extension type to store the authenticated identity in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

/// Middleware that validates bearer tokens and adds the caller's identity to
/// request extensions.
///
/// Any rejection answers 401 before the wrapped handler runs.
pub async fn authenticate(
    State(tokens): State<Arc<dyn TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer_token(&req).map_err(|e| e.into_response())?;

    let claims = tokens.validate(token).map_err(|e| {
        tracing::warn!(error = %e, "Bearer token rejected");
        ApiError::from(IdentityError::from(e)).into_response()
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.user_id,
        email: claims.email,
    });

    Ok(next.run(req).await)
}

fn unauthorized(message: &str) -> ApiError {
    ApiError::Unauthorized {
        message: message.to_string(),
        code: IdentityError::Unauthorized.code(),
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn extract_bearer_token(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            unauthorized("Invalid Authorization header format. Expected: Bearer <token>")
        })?;

    Ok(token)
}

/// Answer a panicking handler with the generic 500 envelope.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::InternalServerError {
        detail: format!("handler panicked: {}", detail),
        code: INTERNAL_ERROR,
    }
    .into_response()
}
