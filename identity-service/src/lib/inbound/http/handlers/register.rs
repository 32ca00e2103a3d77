use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserProfileData;
use crate::domain::user::models::parse_birthday;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::IdentityError;

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserProfileData>, ApiError> {
    let Json(body) = body?;

    let profile = state
        .identity_service
        .register(body.try_into_command()?)
        .await?;
    tracing::info!(user_id = %profile.id, "User registered");

    Ok(ApiSuccess::new(StatusCode::CREATED, (&profile).into()))
}

/// HTTP request body for registering a user (raw JSON)
///
/// Fields are optional so a missing field is reported with our own error
/// envelope instead of the extractor's rejection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    email: Option<String>,
    password: Option<String>,
    firstname: Option<String>,
    lastname: Option<String>,
    phone: Option<String>,
    birthday: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("All fields are required")]
    MissingFields,

    #[error(transparent)]
    Birthday(#[from] IdentityError),
}

fn required(value: Option<String>) -> Result<String, ParseRegisterRequestError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ParseRegisterRequestError::MissingFields)
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        let email = required(self.email)?;
        let password = required(self.password)?;
        let first_name = required(self.firstname)?;
        let last_name = required(self.lastname)?;
        let phone = required(self.phone)?;
        let birthday = parse_birthday(&required(self.birthday)?)?;

        Ok(RegisterCommand {
            email,
            password,
            first_name,
            last_name,
            phone,
            birthday,
        })
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        match err {
            ParseRegisterRequestError::MissingFields => ApiError::validation(err.to_string()),
            ParseRegisterRequestError::Birthday(e) => ApiError::from(e),
        }
    }
}
