use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserProfileData;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<UserProfileData>, ApiError> {
    let user_id: UserId = user_id
        .parse()
        .map_err(|_| ApiError::validation("Invalid user id"))?;

    state
        .identity_service
        .get_user(user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}
