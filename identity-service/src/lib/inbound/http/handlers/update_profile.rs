use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserProfileData;
use crate::domain::user::models::parse_birthday;
use crate::domain::user::models::UpdateUserCommand;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::IdentityError;
use crate::user::ports::IdentityServicePort;

/// HTTP request body for updating the caller's profile (raw JSON)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<String>,
}

impl UpdateProfileRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, IdentityError> {
        let birthday = self
            .birthday
            .filter(|raw| !raw.is_empty())
            .map(|raw| parse_birthday(&raw))
            .transpose()?;

        Ok(UpdateUserCommand {
            first_name: self.firstname,
            last_name: self.lastname,
            phone: self.phone,
            birthday,
        })
    }
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserProfileData>, ApiError> {
    let Json(body) = body?;
    let command = body.try_into_command()?;

    state
        .identity_service
        .update_user(user.user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}
