use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Serialize;

use crate::domain::user::models::UserProfile;
use crate::user::errors::IdentityError;

pub mod get_profile;
pub mod get_user;
pub mod hello;
pub mod login;
pub mod register;
pub mod update_profile;

/// Code attached to request-shape failures (missing fields, malformed JSON).
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

/// Code attached to failures the client cannot act on.
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Error returned by handlers.
///
/// Client errors carry a user-facing message and a stable code. Internal
/// errors carry a detail that is logged and never sent to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError { detail: String, code: &'static str },
    BadRequest { message: String, code: &'static str },
    NotFound { message: String, code: &'static str },
    Conflict { message: String, code: &'static str },
    Unauthorized { message: String, code: &'static str },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            code: VALIDATION_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            ApiError::InternalServerError { detail, code } => {
                tracing::error!(error = %detail, code, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                    code,
                )
            }
            ApiError::BadRequest { message, code } => (StatusCode::BAD_REQUEST, message, code),
            ApiError::NotFound { message, code } => (StatusCode::NOT_FOUND, message, code),
            ApiError::Conflict { message, code } => (StatusCode::CONFLICT, message, code),
            ApiError::Unauthorized { message, code } => (StatusCode::UNAUTHORIZED, message, code),
        };

        (status, Json(ApiResponseBody::new_error(status, message, code))).into_response()
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        let code = err.code();
        match err {
            IdentityError::UserNotFound => ApiError::NotFound {
                message: err.to_string(),
                code,
            },
            IdentityError::UserAlreadyExists => ApiError::Conflict {
                message: err.to_string(),
                code,
            },
            IdentityError::InvalidCredentials
            | IdentityError::InvalidToken
            | IdentityError::Unauthorized => ApiError::Unauthorized {
                message: err.to_string(),
                code,
            },
            IdentityError::InvalidEmail
            | IdentityError::InvalidFirstName
            | IdentityError::InvalidLastName
            | IdentityError::InvalidBirthday => ApiError::BadRequest {
                message: err.to_string(),
                code,
            },
            IdentityError::PasswordHashError
            | IdentityError::UserCreationError
            | IdentityError::TokenGenerationError
            | IdentityError::Repository(_) => ApiError::InternalServerError {
                detail: err.to_string(),
                code,
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::validation("Invalid request body")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String, code: &str) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData {
                message,
                code: code.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    pub code: String,
}

/// Public JSON shape of a user. Has no password field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfileData {
    pub id: i64,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&UserProfile> for UserProfileData {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.0,
            email: profile.email.clone(),
            firstname: profile.first_name.clone(),
            lastname: profile.last_name.clone(),
            phone: profile.phone.clone(),
            birthday: profile.birthday,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}
